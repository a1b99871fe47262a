use std::fmt;
use std::mem;
use std::slice;
use std::sync::Arc;

use bytemuck::Pod;

use crate::error::{Result, VarStructError};
use crate::layout::{resolve_layout, LayoutTable};
use crate::schema::{Array, FieldRef, Scalar, Schema};
use crate::status::BoundsCheck;
use crate::view::{element_range, FieldLayout, FieldRead};

/// Layout bound to a writable buffer.
///
/// Reads go through [`FieldRead`]; writes are inherent methods and copy the
/// value's bytes in place with no alignment requirement.
///
/// ```
/// use varstruct::prelude::*;
///
/// let mut builder = SchemaBuilder::new("Packet");
/// let id = builder.scalar::<u32>("id").unwrap();
/// let payload = builder.array::<u16>("payload").unwrap();
/// let schema = builder.build();
///
/// let mut buf = vec![0u8; 10];
/// let mut view = schema.resolve_mut(&mut buf, &[3]).unwrap();
/// view.set(id, 42);
/// view.set_at(payload, 2, 7, BoundsCheck::Checked).unwrap();
/// assert!(view.set_at(payload, 3, 7, BoundsCheck::Checked).is_err());
///
/// assert_eq!(view.get(id), 42);
/// assert_eq!(view.array_to_vec(payload), vec![0, 0, 7]);
/// ```
pub struct MutView<'a> {
    schema: Arc<Schema>,
    layout: LayoutTable,
    bytes: &'a mut [u8],
}

impl<'a> MutView<'a> {
    pub(crate) fn new(schema: Arc<Schema>, layout: LayoutTable, bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(bytes.len(), layout.total_size());
        Self {
            schema,
            layout,
            bytes,
        }
    }

    /// Resolve a mutable view over memory at `base`.
    ///
    /// # Safety
    /// `base` must point to at least `total_size()` initialized, writable bytes
    /// that stay valid and are not accessed through any other path for `'a`.
    pub unsafe fn from_raw(
        schema: &Arc<Schema>,
        base: *mut u8,
        lengths: &[usize],
    ) -> Result<Self> {
        let layout = resolve_layout(schema, lengths)?;
        let total = layout.total_size();
        let bytes: &'a mut [u8] = if total == 0 {
            &mut []
        } else {
            debug_assert!(!base.is_null());
            unsafe { slice::from_raw_parts_mut(base, total) }
        };
        Ok(Self::new(Arc::clone(schema), layout, bytes))
    }

    /// Mutable bytes of the whole structure
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..]
    }

    /// Mutable bytes of `field`
    #[inline]
    pub fn field_bytes_mut<F: FieldRef>(&mut self, field: F) -> &mut [u8] {
        let index = self.schema.position(&field);
        let range = self.layout.range(index);
        &mut self.bytes[range]
    }

    /// Write a scalar field.
    #[inline]
    pub fn set<T: Pod>(&mut self, field: Scalar<T>, value: T) {
        self.field_bytes_mut(field)
            .copy_from_slice(bytemuck::bytes_of(&value));
    }

    /// Write element `index` of an array field.
    ///
    /// Follows the same bounds policy as [`FieldRead::get_at`].
    #[inline]
    pub fn set_at<T: Pod>(
        &mut self,
        field: Array<T>,
        index: usize,
        value: T,
        check: BoundsCheck,
    ) -> Result<()> {
        let range = element_range(&*self, &field, index, check)?;
        self.bytes[range].copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Overwrite every element of an array field from `values`.
    ///
    /// Fails with `SliceLengthMismatch` unless `values.len()` equals the
    /// element count; nothing is written in that case.
    pub fn copy_from_slice<T: Pod>(&mut self, field: Array<T>, values: &[T]) -> Result<()> {
        let index = self.schema.position(&field);
        let len = self.layout.element_count(index);
        if values.len() != len {
            return Err(VarStructError::slice_length_mismatch(
                index,
                len,
                values.len(),
            ));
        }
        self.field_bytes_mut(field)
            .copy_from_slice(bytemuck::cast_slice(values));
        Ok(())
    }

    /// Set every element of an array field to `value`.
    pub fn fill<T: Pod>(&mut self, field: Array<T>, value: T) {
        let pattern = bytemuck::bytes_of(&value);
        for chunk in self
            .field_bytes_mut(field)
            .chunks_exact_mut(mem::size_of::<T>())
        {
            chunk.copy_from_slice(pattern);
        }
    }
}

impl FieldLayout for MutView<'_> {
    #[inline]
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[inline]
    fn layout(&self) -> &LayoutTable {
        &self.layout
    }
}

impl FieldRead for MutView<'_> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl fmt::Debug for MutView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutView")
            .field("schema", &self.schema.name())
            .field("total_size", &self.layout.total_size())
            .finish()
    }
}
