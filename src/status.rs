//! Error kinds for layout operations
//!
//! This module defines the coarse classification of every failure the engine can
//! report. The detailed error type lives in [`crate::error`].

use std::fmt;

/// Kind of failure returned by schema declaration, layout resolution or field access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Invalid field declaration (zero-sized type, reserved or duplicate name,
    /// handle kind or size mismatch)
    Definition = 1,
    /// Number of array lengths differs from the number of array fields
    LengthMismatch = 2,
    /// Bounds-checked array access outside `[0, n)`
    OutOfRange = 3,
    /// Bound buffer is shorter than the resolved layout
    BufferTooSmall = 4,
    /// Size arithmetic overflowed `usize`
    LayoutOverflow = 5,
    /// Resolved layout exceeds configured limits
    LayoutTooLarge = 6,
    /// Slice copied into an array field has a different element count
    SliceLengthMismatch = 7,
}

impl ErrorKind {
    /// Check if the caller is expected to handle this kind at the call site.
    ///
    /// Only [`ErrorKind::OutOfRange`] is recoverable; every other kind is a
    /// misuse of the API and should be propagated, not retried.
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::OutOfRange)
    }

    /// Check if the kind is raised while declaring a schema
    #[inline]
    pub const fn is_definition_time(&self) -> bool {
        matches!(self, ErrorKind::Definition)
    }

    /// Check if the kind is raised by a field access on a bound view
    #[inline]
    pub const fn is_access_time(&self) -> bool {
        matches!(self, ErrorKind::OutOfRange | ErrorKind::SliceLengthMismatch)
    }

    /// Check if the kind is raised while resolving or binding a layout
    #[inline]
    pub const fn is_resolve_time(&self) -> bool {
        matches!(
            self,
            ErrorKind::LengthMismatch
                | ErrorKind::BufferTooSmall
                | ErrorKind::LayoutOverflow
                | ErrorKind::LayoutTooLarge
        )
    }

    /// Get the kind as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Definition => "Definition",
            ErrorKind::LengthMismatch => "LengthMismatch",
            ErrorKind::OutOfRange => "OutOfRange",
            ErrorKind::BufferTooSmall => "BufferTooSmall",
            ErrorKind::LayoutOverflow => "LayoutOverflow",
            ErrorKind::LayoutTooLarge => "LayoutTooLarge",
            ErrorKind::SliceLengthMismatch => "SliceLengthMismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an indexed array access validates its index against the element count.
///
/// Has no `Default`; every indexed call site names its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheck {
    /// Fail with [`ErrorKind::OutOfRange`] when `index >= element_count`
    Checked,
    /// Skip the element-count check (caller has already validated the index)
    Unchecked,
}

impl BoundsCheck {
    /// Check if the index must be validated
    #[inline]
    pub const fn is_checked(&self) -> bool {
        matches!(self, BoundsCheck::Checked)
    }
}
