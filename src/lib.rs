//! varstruct - Runtime layouts for structures with variable-length arrays
//!
//! A structure is declared once as an ordered list of fields. Each field is a
//! scalar or an array of plain-old-data elements. Array lengths are supplied
//! when a view is resolved, and fields are packed back to back with no padding:
//!
//! - **Schema**: the ordered field list, with typed handles per field
//! - **Resolver**: turns a schema plus array lengths into byte offsets
//! - **Views**: offsets-only, read-only and mutable bindings to a buffer
//!
//! # Quick Start
//!
//! ```rust
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("Packet");
//! let id = builder.scalar::<u32>("id").unwrap();
//! let payload = builder.array::<u8>("payload").unwrap();
//! let crc = builder.scalar::<u64>("crc").unwrap();
//! let schema = builder.build();
//!
//! // size the allocation first
//! let total = schema.resolve(&[5]).unwrap().total_size();
//! assert_eq!(total, 17);
//!
//! let mut buf = vec![0u8; total];
//! let mut view = schema.resolve_mut(&mut buf, &[5]).unwrap();
//! view.set(id, 7);
//! view.copy_from_slice(payload, b"hello").unwrap();
//! view.set(crc, 0xC0FFEE);
//!
//! let view = schema.resolve_ref(&buf, &[5]).unwrap();
//! assert_eq!(view.get(id), 7);
//! assert_eq!(view.field_bytes(payload), b"hello");
//! assert_eq!(view.start(crc), 9);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod layout;
mod macros;
pub mod schema;
pub mod status;
pub mod view;

// Re-exports for convenience
pub use error::{Result, VarStructError};
pub use schema::{Array, Scalar, Schema, SchemaBuilder};
pub use status::{BoundsCheck, ErrorKind};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::VarStructConfig;
    pub use crate::error::{Result, VarStructError};
    pub use crate::layout::{LayoutTable, ResolveLimits, Resolver};
    pub use crate::schema::{Array, FieldRef, Scalar, Schema, SchemaBuilder};
    pub use crate::status::{BoundsCheck, ErrorKind};
    pub use crate::view::{FieldLayout, FieldRead, MutView, OffsetsView, ReadView, Unbound};
}
