//! Error type for schema declaration, layout resolution and field access.

use crate::status::ErrorKind;

/// Result type alias for varstruct operations
pub type Result<T> = std::result::Result<T, VarStructError>;

/// Errors returned by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VarStructError {
    /// Invalid field declaration.
    #[error("invalid definition of field {field} in schema {schema}: {reason}")]
    Definition {
        /// Schema being declared.
        schema: String,
        /// Field name, or `#index` for unnamed fields.
        field: String,
        /// What is wrong with the declaration.
        reason: String,
    },
    /// Length sequence does not match the schema's array fields.
    #[error("schema {schema} declares {expected} array fields, got {actual} lengths")]
    LengthMismatch {
        /// Schema being resolved.
        schema: String,
        /// Number of array fields in the schema.
        expected: usize,
        /// Number of lengths supplied.
        actual: usize,
    },
    /// Bounds-checked access outside the array.
    #[error("index {index} out of range for field #{field} with {len} elements")]
    OutOfRange {
        /// Field index in declaration order.
        field: usize,
        /// Requested element index.
        index: usize,
        /// Element count of the field.
        len: usize,
    },
    /// Slice length differs from the element count of the target array.
    #[error("field #{field} holds {expected} elements, got a slice of {actual}")]
    SliceLengthMismatch {
        /// Field index in declaration order.
        field: usize,
        /// Element count of the field.
        expected: usize,
        /// Length of the supplied slice.
        actual: usize,
    },
    /// Bound buffer shorter than the layout.
    #[error("buffer of {actual} bytes is too small for a layout of {required} bytes")]
    BufferTooSmall {
        /// Resolved total size.
        required: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
    /// Size arithmetic overflowed.
    #[error("layout of schema {schema} overflows usize at field #{field}")]
    LayoutOverflow {
        /// Schema being resolved.
        schema: String,
        /// Field at which the overflow happened.
        field: usize,
    },
    /// Layout exceeds configured limits.
    #[error("{what} of {value} exceeds configured limit {limit}")]
    LayoutTooLarge {
        /// Which limit was hit.
        what: &'static str,
        /// Offending value.
        value: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl VarStructError {
    /// Create a definition error
    pub fn definition(
        schema: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Definition {
            schema: schema.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(schema: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            schema: schema.into(),
            expected,
            actual,
        }
    }

    /// Create an out of range error
    pub fn out_of_range(field: usize, index: usize, len: usize) -> Self {
        Self::OutOfRange { field, index, len }
    }

    /// Create a slice length mismatch error
    pub fn slice_length_mismatch(field: usize, expected: usize, actual: usize) -> Self {
        Self::SliceLengthMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Create a buffer too small error
    pub fn buffer_too_small(required: usize, actual: usize) -> Self {
        Self::BufferTooSmall { required, actual }
    }

    /// Create a layout overflow error
    pub fn layout_overflow(schema: impl Into<String>, field: usize) -> Self {
        Self::LayoutOverflow {
            schema: schema.into(),
            field,
        }
    }

    /// Create a layout too large error
    pub fn layout_too_large(what: &'static str, value: usize, limit: usize) -> Self {
        Self::LayoutTooLarge { what, value, limit }
    }

    /// Coarse classification of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Definition { .. } => ErrorKind::Definition,
            Self::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::SliceLengthMismatch { .. } => ErrorKind::SliceLengthMismatch,
            Self::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Self::LayoutOverflow { .. } => ErrorKind::LayoutOverflow,
            Self::LayoutTooLarge { .. } => ErrorKind::LayoutTooLarge,
        }
    }

    /// Shorthand for `self.kind().is_recoverable()`
    pub const fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }
}
