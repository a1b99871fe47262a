//! Views over resolved layouts
//!
//! A view binds one [`LayoutTable`] to an optional backing buffer. There are three
//! view types, one per capability set, and a view never changes type:
//!
//! | View | Buffer | Queries | Read | Write |
//! |---|---|---|---|---|
//! | [`OffsetsView`] | none | yes | no | no |
//! | [`ReadView`] | `&[u8]` | yes | yes | no |
//! | [`MutView`] | `&mut [u8]` | yes | yes | yes |
//!
//! Offset queries come from [`FieldLayout`], reads from [`FieldRead`], and writes
//! are inherent methods of [`MutView`]. An operation a view does not support is
//! not callable at all:
//!
//! ```compile_fail
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let a = builder.scalar::<u32>("a").unwrap();
//! let schema = builder.build();
//!
//! let buf = [0u8; 4];
//! let view = schema.resolve_ref(&buf, &[]).unwrap();
//! view.set(a, 1); // read-only views have no setters
//! ```
//!
//! ```compile_fail
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let a = builder.scalar::<u32>("a").unwrap();
//! let schema = builder.build();
//!
//! let view = schema.resolve(&[]).unwrap();
//! let _ = view.get(a); // offsets-only views have no buffer to read
//! ```
//!
//! ```compile_fail
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let b = builder.array::<u16>("b").unwrap();
//! let schema = builder.build();
//!
//! let buf = [0u8; 4];
//! let view = schema.resolve_ref(&buf, &[2]).unwrap();
//! view.set_at(b, 0, 1, BoundsCheck::Checked).unwrap();
//! ```
//!
//! ```compile_fail
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let a = builder.scalar::<u32>("a").unwrap();
//! let schema = builder.build();
//!
//! let buf = [0u8; 4];
//! let mut view = schema.resolve_ref(&buf, &[]).unwrap();
//! view.field_bytes_mut(a)[0] = 1;
//! ```
//!
//! ```compile_fail
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let a = builder.scalar::<u32>("a").unwrap();
//! let schema = builder.build();
//!
//! let view = schema.resolve(&[]).unwrap();
//! let _ = view.field_bytes(a);
//! ```
//!
//! ```compile_fail
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let b = builder.array::<u16>("b").unwrap();
//! let schema = builder.build();
//!
//! let view = schema.resolve(&[2]).unwrap();
//! let _ = view.get_at(b, 0, BoundsCheck::Checked);
//! ```
//!
//! The same calls compile on a mutable view:
//!
//! ```
//! use varstruct::prelude::*;
//!
//! let mut builder = SchemaBuilder::new("T");
//! let a = builder.scalar::<u32>("a").unwrap();
//! let b = builder.array::<u16>("b").unwrap();
//! let schema = builder.build();
//!
//! let mut buf = [0u8; 8];
//! let mut view = schema.resolve_mut(&mut buf, &[2]).unwrap();
//! view.set_at(b, 0, 1, BoundsCheck::Checked).unwrap();
//! view.field_bytes_mut(a)[0] = 1;
//! assert_eq!(view.field_bytes(a)[0], 1);
//! assert_eq!(view.get_at(b, 0, BoundsCheck::Checked).unwrap(), 1);
//! ```

mod mutable;
mod offsets;
mod read;

use std::mem;
use std::ops::Range;
use std::sync::Arc;

use bytemuck::Pod;

pub use mutable::MutView;
pub use offsets::OffsetsView;
pub use read::ReadView;

use crate::error::{Result, VarStructError};
use crate::layout::{resolve_layout, LayoutTable, Resolver};
use crate::schema::{Array, FieldRef, Scalar, Schema};
use crate::status::BoundsCheck;

/// A schema paired with a layout resolved from it, ready to be bound.
///
/// Only the resolver can produce one, so a view can never pair a schema with a
/// layout computed for another schema.
#[derive(Debug)]
pub struct ResolvedLayout {
    schema: Arc<Schema>,
    layout: LayoutTable,
}

impl ResolvedLayout {
    pub(crate) fn new(schema: Arc<Schema>, layout: LayoutTable) -> Self {
        Self { schema, layout }
    }
}

/// Selects the view type produced by a resolve.
///
/// Implemented for [`Unbound`] (offsets only), `&[u8]` (read-only) and
/// `&mut [u8]` (mutable).
pub trait Binding<'a> {
    /// View type produced by this binding
    type View;

    /// Attach the resolved layout to the backing memory, if any.
    fn bind(self, resolved: ResolvedLayout) -> Result<Self::View>;
}

/// Binding without a buffer; produces an [`OffsetsView`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbound;

impl<'a> Binding<'a> for Unbound {
    type View = OffsetsView;

    fn bind(self, resolved: ResolvedLayout) -> Result<OffsetsView> {
        Ok(OffsetsView::new(resolved.schema, resolved.layout))
    }
}

impl<'a> Binding<'a> for &'a [u8] {
    type View = ReadView<'a>;

    fn bind(self, resolved: ResolvedLayout) -> Result<ReadView<'a>> {
        let total = resolved.layout.total_size();
        if self.len() < total {
            return Err(VarStructError::buffer_too_small(total, self.len()));
        }
        Ok(ReadView::new(
            resolved.schema,
            resolved.layout,
            &self[..total],
        ))
    }
}

impl<'a> Binding<'a> for &'a mut [u8] {
    type View = MutView<'a>;

    fn bind(self, resolved: ResolvedLayout) -> Result<MutView<'a>> {
        let total = resolved.layout.total_size();
        if self.len() < total {
            return Err(VarStructError::buffer_too_small(total, self.len()));
        }
        Ok(MutView::new(
            resolved.schema,
            resolved.layout,
            &mut self[..total],
        ))
    }
}

/// Offset, size and count queries, available on every view.
pub trait FieldLayout {
    /// Schema the view was resolved from
    fn schema(&self) -> &Arc<Schema>;

    /// Resolved offsets
    fn layout(&self) -> &LayoutTable;

    /// Byte offset where `field` starts
    #[inline]
    fn start<F: FieldRef>(&self, field: F) -> usize {
        self.layout().start(self.schema().position(&field))
    }

    /// Size in bytes of `field`
    #[inline]
    fn size<F: FieldRef>(&self, field: F) -> usize {
        self.layout().size(self.schema().position(&field))
    }

    /// Exclusive byte offset where `field` ends
    #[inline]
    fn end<F: FieldRef>(&self, field: F) -> usize {
        self.layout().end(self.schema().position(&field))
    }

    /// Number of elements in `field` (1 for scalars)
    #[inline]
    fn element_count<F: FieldRef>(&self, field: F) -> usize {
        self.layout().element_count(self.schema().position(&field))
    }

    /// Size in bytes of the whole structure
    #[inline]
    fn total_size(&self) -> usize {
        self.layout().total_size()
    }

    /// Number of declared fields
    #[inline]
    fn field_count(&self) -> usize {
        self.layout().field_count()
    }
}

/// Field reads, available on views bound to a buffer.
///
/// Reads copy the bytes out with an unaligned load, so the buffer needs no
/// particular alignment.
pub trait FieldRead: FieldLayout {
    /// The bound bytes, exactly `total_size()` long
    fn as_bytes(&self) -> &[u8];

    /// Bytes of `field`
    #[inline]
    fn field_bytes<F: FieldRef>(&self, field: F) -> &[u8] {
        let index = self.schema().position(&field);
        &self.as_bytes()[self.layout().range(index)]
    }

    /// Read a scalar field.
    #[inline]
    fn get<T: Pod>(&self, field: Scalar<T>) -> T {
        bytemuck::pod_read_unaligned(self.field_bytes(field))
    }

    /// Read element `index` of an array field.
    ///
    /// With [`BoundsCheck::Checked`], fails with `OutOfRange` unless
    /// `index < element_count(field)`. With [`BoundsCheck::Unchecked`] the read
    /// happens unconditionally; it may land in a later field of the same
    /// record, and panics if it would leave the bound buffer.
    #[inline]
    fn get_at<T: Pod>(&self, field: Array<T>, index: usize, check: BoundsCheck) -> Result<T> {
        let range = element_range(self, &field, index, check)?;
        Ok(bytemuck::pod_read_unaligned(&self.as_bytes()[range]))
    }

    /// Iterate over the elements of an array field.
    fn iter<T: Pod>(&self, field: Array<T>) -> impl Iterator<Item = T> + '_ {
        self.field_bytes(field)
            .chunks_exact(mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned::<T>)
    }

    /// Copy all elements of an array field into a `Vec`.
    fn array_to_vec<T: Pod>(&self, field: Array<T>) -> Vec<T> {
        self.iter(field).collect()
    }
}

/// Byte range of element `index` of `field`, applying the bounds policy.
pub(crate) fn element_range<V, T>(
    view: &V,
    field: &Array<T>,
    index: usize,
    check: BoundsCheck,
) -> Result<Range<usize>>
where
    V: FieldLayout + ?Sized,
{
    let position = view.schema().position(field);
    let layout = view.layout();
    if check.is_checked() {
        let len = layout.element_count(position);
        if index >= len {
            return Err(VarStructError::out_of_range(position, index, len));
        }
    }
    let size = layout.element_size(position);
    // An overflowing unchecked index maps past any buffer and panics on slicing.
    let start = index
        .checked_mul(size)
        .and_then(|offset| offset.checked_add(layout.start(position)))
        .unwrap_or(usize::MAX);
    Ok(start..start.saturating_add(size))
}

impl Schema {
    /// Compute the layout for `lengths` without binding it.
    pub fn layout(&self, lengths: &[usize]) -> Result<LayoutTable> {
        resolve_layout(self, lengths)
    }

    /// Resolve an offsets-only view.
    pub fn resolve(self: &Arc<Self>, lengths: &[usize]) -> Result<OffsetsView> {
        Resolver::new().resolve(self, lengths)
    }

    /// Resolve a read-only view over `buf`.
    ///
    /// `buf` must hold at least `total_size()` bytes; extra bytes are ignored.
    pub fn resolve_ref<'a>(
        self: &Arc<Self>,
        buf: &'a [u8],
        lengths: &[usize],
    ) -> Result<ReadView<'a>> {
        Resolver::new().resolve_ref(self, buf, lengths)
    }

    /// Resolve a mutable view over `buf`.
    ///
    /// `buf` must hold at least `total_size()` bytes; extra bytes are never touched.
    pub fn resolve_mut<'a>(
        self: &Arc<Self>,
        buf: &'a mut [u8],
        lengths: &[usize],
    ) -> Result<MutView<'a>> {
        Resolver::new().resolve_mut(self, buf, lengths)
    }

    /// Resolve through any [`Binding`]; the binding picks the view type.
    pub fn resolve_with<'a, B: Binding<'a>>(
        self: &Arc<Self>,
        binding: B,
        lengths: &[usize],
    ) -> Result<B::View> {
        Resolver::new().resolve_with(self, binding, lengths)
    }
}
