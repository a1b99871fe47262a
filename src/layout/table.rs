//! Resolved offsets of one structure instance.

use std::ops::Range;

/// Concrete byte layout of a schema for one set of array lengths.
///
/// `offsets[i]` is the exclusive end of field `i`; field `i` starts where field
/// `i - 1` ends, and the first field starts at 0. There is no padding between
/// fields, so the last end offset is the total size.
///
/// ## Memory Layout
///
/// ```text
/// [field 0][field 1 ............][field 2]...
/// 0        offsets[0]            offsets[1] ...  offsets[n-1] == total_size
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTable {
    offsets: Box<[usize]>,
    element_sizes: Box<[usize]>,
}

impl LayoutTable {
    pub(crate) fn new(offsets: Vec<usize>, element_sizes: Vec<usize>) -> Self {
        debug_assert_eq!(offsets.len(), element_sizes.len());
        Self {
            offsets: offsets.into_boxed_slice(),
            element_sizes: element_sizes.into_boxed_slice(),
        }
    }

    /// Number of fields
    #[inline]
    pub fn field_count(&self) -> usize {
        self.offsets.len()
    }

    /// Check if the layout has no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Size in bytes of the whole structure (0 when there are no fields)
    #[inline]
    pub fn total_size(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Byte offset where field `index` starts.
    ///
    /// # Panics
    /// Panics if `index >= self.field_count()`; the same holds for every
    /// per-field query below.
    #[inline]
    pub fn start(&self, index: usize) -> usize {
        assert!(index < self.offsets.len(), "field #{index} out of range");
        if index == 0 {
            0
        } else {
            self.offsets[index - 1]
        }
    }

    /// Exclusive byte offset where field `index` ends
    #[inline]
    pub fn end(&self, index: usize) -> usize {
        self.offsets[index]
    }

    /// Size in bytes of field `index`
    #[inline]
    pub fn size(&self, index: usize) -> usize {
        self.end(index) - self.start(index)
    }

    /// Byte range of field `index`
    #[inline]
    pub fn range(&self, index: usize) -> Range<usize> {
        self.start(index)..self.end(index)
    }

    /// Size in bytes of one element of field `index`
    #[inline]
    pub fn element_size(&self, index: usize) -> usize {
        self.element_sizes[index]
    }

    /// Number of elements in field `index` (1 for scalars)
    #[inline]
    pub fn element_count(&self, index: usize) -> usize {
        self.size(index) / self.element_sizes[index]
    }

    /// End offsets in declaration order
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}
