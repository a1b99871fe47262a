//! Layout resolution
//!
//! Turns a schema plus one element count per array field into concrete byte
//! offsets. Resolution is pure: the same schema and lengths always produce the
//! same [`LayoutTable`].
//!
//! ## Algorithm
//!
//! ```text
//! raw_size[i] = element_size[i]                 (scalar)
//!             = element_size[i] * lengths[k++]  (array)
//! offsets[i]  = offsets[i-1] + raw_size[i]      (offsets[-1] = 0)
//! total_size  = offsets[last]                   (0 for an empty schema)
//! ```

mod resolver;
mod table;

pub use resolver::{resolve_layout, ResolveLimits, Resolver};
pub use table::LayoutTable;
