//! JSON Pointer representation for locating values in instances and schemas.
//!
//! This module provides [`Pointer`], an RFC 6901 style path made of unescaped
//! segments. Segments are stored unescaped and only escaped (`~` as `~0`,
//! `/` as `~1`) when the pointer is rendered, so prefix checks compare whole
//! segments rather than raw strings.

use std::fmt::{self, Display};

/// Errors produced when parsing a pointer string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    /// A non-empty pointer did not start with `/`.
    #[error("pointer '{0}' must be empty or start with '/'")]
    MissingLeadingSlash(String),

    /// A `~` was not followed by `0` or `1`.
    #[error("pointer '{0}' contains an invalid '~' escape")]
    InvalidEscape(String),
}

/// Escapes a single segment for inclusion in a rendered pointer.
///
/// # Example
///
/// ```rust
/// use errata::path::escape_segment;
///
/// assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
/// ```
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Unescapes a single rendered segment.
///
/// Returns `None` when the segment contains a `~` that is not part of a
/// valid `~0` or `~1` escape.
pub fn unescape_segment(segment: &str) -> Option<String> {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// A path to a value in an instance or a schema.
///
/// `Pointer` is immutable: the `push_*` methods return a new pointer and
/// leave the original untouched, so one base location can be extended along
/// many branches during validation.
///
/// # Example
///
/// ```rust
/// use errata::Pointer;
///
/// let pointer = Pointer::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("a/b");
///
/// assert_eq!(pointer.to_string(), "/users/0/a~1b");
/// assert_eq!(Pointer::parse("/users/0/a~1b").unwrap(), pointer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// Creates an empty pointer referring to the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a rendered pointer such as `/properties/a~1b`.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError`] if the string is non-empty and lacks a
    /// leading `/`, or if it contains an invalid `~` escape.
    pub fn parse(input: &str) -> Result<Self, PointerError> {
        if input.is_empty() {
            return Ok(Self::root());
        }
        let rest = input
            .strip_prefix('/')
            .ok_or_else(|| PointerError::MissingLeadingSlash(input.to_string()))?;
        let segments = rest
            .split('/')
            .map(|raw| {
                unescape_segment(raw).ok_or_else(|| PointerError::InvalidEscape(input.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Returns a new pointer with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Returns a new pointer with an array index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.push_field(index.to_string())
    }

    /// Returns true if this is the root pointer (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this pointer.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this pointer has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the unescaped segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the parent pointer, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns true if `prefix` is equal to this pointer or one of its
    /// ancestors. Comparison is segment-wise, so `/ab` does not start with `/a`.
    pub fn starts_with(&self, prefix: &Pointer) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Returns the segments remaining after `prefix`, or None if `prefix` is
    /// not an ancestor-or-self of this pointer.
    pub fn strip_prefix(&self, prefix: &Pointer) -> Option<&[String]> {
        self.segments.strip_prefix(prefix.segments.as_slice())
    }

    /// Renders the pointer in the legacy property syntax (`users[0].email`).
    ///
    /// Segments made only of ASCII digits are rendered as indices.
    pub fn to_property_path(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let is_index = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            if is_index {
                out.push('[');
                out.push_str(segment);
                out.push(']');
            } else {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(segment);
            }
        }
        out
    }
}

impl Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape_segment(segment))?;
        }
        Ok(())
    }
}
