//! Layout resolution: schema + array lengths -> offsets.

use std::sync::Arc;

use crate::config::VarStructConfig;
use crate::error::{Result, VarStructError};
use crate::layout::LayoutTable;
use crate::schema::{FieldKind, Schema};
use crate::view::{Binding, MutView, OffsetsView, ReadView, ResolvedLayout, Unbound};

/// Upper bounds applied by a configured [`Resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveLimits {
    /// Largest accepted total size in bytes
    pub max_total_size: Option<usize>,
    /// Largest accepted element count for a single array field
    pub max_array_len: Option<usize>,
}

impl ResolveLimits {
    /// No limits
    pub const UNLIMITED: Self = Self {
        max_total_size: None,
        max_array_len: None,
    };

    /// Set the total size limit
    pub fn with_max_total_size(mut self, limit: usize) -> Self {
        self.max_total_size = Some(limit);
        self
    }

    /// Set the per-array element count limit
    pub fn with_max_array_len(mut self, limit: usize) -> Self {
        self.max_array_len = Some(limit);
        self
    }

    /// Check if any limit is set
    pub fn is_limited(&self) -> bool {
        self.max_total_size.is_some() || self.max_array_len.is_some()
    }

    fn check_array_len(&self, len: usize) -> Result<()> {
        match self.max_array_len {
            Some(limit) if len > limit => {
                Err(VarStructError::layout_too_large("array length", len, limit))
            }
            _ => Ok(()),
        }
    }

    fn check_total_size(&self, total: usize) -> Result<()> {
        match self.max_total_size {
            Some(limit) if total > limit => {
                Err(VarStructError::layout_too_large("total size", total, limit))
            }
            _ => Ok(()),
        }
    }
}

/// Resolve `schema` for `lengths` without limits.
///
/// `lengths` holds one element count per array field, in declaration order.
/// Fails with `LengthMismatch` when the count of lengths differs from the number
/// of array fields, whatever the values are.
pub fn resolve_layout(schema: &Schema, lengths: &[usize]) -> Result<LayoutTable> {
    Resolver::new().resolve_layout(schema, lengths)
}

/// Resolves layouts and binds them to buffers, applying [`ResolveLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    limits: ResolveLimits,
}

impl Resolver {
    /// Resolver without limits
    pub const fn new() -> Self {
        Self {
            limits: ResolveLimits::UNLIMITED,
        }
    }

    /// Resolver with the given limits
    pub const fn with_limits(limits: ResolveLimits) -> Self {
        Self { limits }
    }

    /// Resolver configured from a loaded [`VarStructConfig`]
    pub fn from_config(config: &VarStructConfig) -> Self {
        Self::with_limits(config.to_limits())
    }

    /// Active limits
    pub fn limits(&self) -> &ResolveLimits {
        &self.limits
    }

    /// Compute the layout of `schema` for `lengths`.
    pub fn resolve_layout(&self, schema: &Schema, lengths: &[usize]) -> Result<LayoutTable> {
        let expected = schema.array_field_count();
        if lengths.len() != expected {
            return Err(VarStructError::length_mismatch(
                schema.name(),
                expected,
                lengths.len(),
            ));
        }

        let mut remaining = lengths.iter().copied();
        let mut offsets = Vec::with_capacity(schema.len());
        let mut element_sizes = Vec::with_capacity(schema.len());
        let mut total = 0usize;

        for slot in schema.slots() {
            let raw_size = match slot.kind() {
                FieldKind::Scalar => slot.element_size(),
                FieldKind::Array => {
                    let len = remaining.next().ok_or_else(|| {
                        VarStructError::length_mismatch(schema.name(), expected, lengths.len())
                    })?;
                    self.limits.check_array_len(len).inspect_err(|err| {
                        warn_rejected(schema, err);
                    })?;
                    slot.element_size().checked_mul(len).ok_or_else(|| {
                        VarStructError::layout_overflow(schema.name(), slot.index())
                    })?
                }
            };
            total = total
                .checked_add(raw_size)
                .ok_or_else(|| VarStructError::layout_overflow(schema.name(), slot.index()))?;
            offsets.push(total);
            element_sizes.push(slot.element_size());
        }
        debug_assert!(remaining.next().is_none());

        self.limits
            .check_total_size(total)
            .inspect_err(|err| warn_rejected(schema, err))?;

        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(schema = %schema.name(), total_size = total, "layout resolved");
        }
        Ok(LayoutTable::new(offsets, element_sizes))
    }

    /// Resolve and bind through any [`Binding`].
    pub fn resolve_with<'a, B: Binding<'a>>(
        &self,
        schema: &Arc<Schema>,
        binding: B,
        lengths: &[usize],
    ) -> Result<B::View> {
        let layout = self.resolve_layout(schema, lengths)?;
        binding.bind(ResolvedLayout::new(Arc::clone(schema), layout))
    }

    /// Resolve an offsets-only view.
    pub fn resolve(&self, schema: &Arc<Schema>, lengths: &[usize]) -> Result<OffsetsView> {
        self.resolve_with(schema, Unbound, lengths)
    }

    /// Resolve a read-only view over `buf`.
    pub fn resolve_ref<'a>(
        &self,
        schema: &Arc<Schema>,
        buf: &'a [u8],
        lengths: &[usize],
    ) -> Result<ReadView<'a>> {
        self.resolve_with(schema, buf, lengths)
    }

    /// Resolve a mutable view over `buf`.
    pub fn resolve_mut<'a>(
        &self,
        schema: &Arc<Schema>,
        buf: &'a mut [u8],
        lengths: &[usize],
    ) -> Result<MutView<'a>> {
        self.resolve_with(schema, buf, lengths)
    }
}

fn warn_rejected(schema: &Schema, err: &VarStructError) {
    if tracing::enabled!(tracing::Level::WARN) {
        tracing::warn!(schema = %schema.name(), error = %err, "layout rejected by limits");
    }
}
