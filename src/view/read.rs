use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::error::Result;
use crate::layout::{resolve_layout, LayoutTable};
use crate::schema::Schema;
use crate::view::{FieldLayout, FieldRead};

/// Layout bound to a read-only buffer.
///
/// Reads go through [`FieldRead`]; there are no write methods.
pub struct ReadView<'a> {
    schema: Arc<Schema>,
    layout: LayoutTable,
    bytes: &'a [u8],
}

impl<'a> ReadView<'a> {
    pub(crate) fn new(schema: Arc<Schema>, layout: LayoutTable, bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), layout.total_size());
        Self {
            schema,
            layout,
            bytes,
        }
    }

    /// Resolve a read-only view over memory at `base`.
    ///
    /// # Safety
    /// `base` must point to at least `total_size()` initialized bytes that stay
    /// valid and are not written through any other path for `'a`.
    pub unsafe fn from_raw(
        schema: &Arc<Schema>,
        base: *const u8,
        lengths: &[usize],
    ) -> Result<Self> {
        let layout = resolve_layout(schema, lengths)?;
        let total = layout.total_size();
        let bytes: &'a [u8] = if total == 0 {
            &[]
        } else {
            debug_assert!(!base.is_null());
            unsafe { slice::from_raw_parts(base, total) }
        };
        Ok(Self::new(Arc::clone(schema), layout, bytes))
    }
}

impl FieldLayout for ReadView<'_> {
    #[inline]
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[inline]
    fn layout(&self) -> &LayoutTable {
        &self.layout
    }
}

impl FieldRead for ReadView<'_> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl fmt::Debug for ReadView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadView")
            .field("schema", &self.schema.name())
            .field("total_size", &self.layout.total_size())
            .finish()
    }
}
