use std::sync::Arc;

use crate::layout::LayoutTable;
use crate::schema::Schema;
use crate::view::FieldLayout;

/// Layout without a buffer: answers offset, size and count queries only.
///
/// Useful to size an allocation before any memory exists:
///
/// ```
/// use varstruct::prelude::*;
///
/// let mut builder = SchemaBuilder::new("Packet");
/// builder.scalar::<u32>("id").unwrap();
/// let payload = builder.array::<u16>("payload").unwrap();
/// let schema = builder.build();
///
/// let view = schema.resolve(&[3]).unwrap();
/// assert_eq!(view.total_size(), 10);
/// assert_eq!(view.start(payload), 4);
///
/// let mut buf = vec![0u8; view.total_size()];
/// let bound = schema.resolve_mut(&mut buf, &[3]).unwrap();
/// assert_eq!(bound.start(payload), view.start(payload));
/// ```
#[derive(Debug, Clone)]
pub struct OffsetsView {
    schema: Arc<Schema>,
    layout: LayoutTable,
}

impl OffsetsView {
    pub(crate) fn new(schema: Arc<Schema>, layout: LayoutTable) -> Self {
        Self { schema, layout }
    }

    /// Give up the view and keep its offsets.
    pub fn into_layout(self) -> LayoutTable {
        self.layout
    }
}

impl FieldLayout for OffsetsView {
    #[inline]
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[inline]
    fn layout(&self) -> &LayoutTable {
        &self.layout
    }
}
