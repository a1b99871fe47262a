//! Schema descriptors
//!
//! A schema is the ordered, type-level declaration of a structure's fields,
//! independent of any instance's array lengths. It is declared once with a
//! [`SchemaBuilder`], frozen into an `Arc<Schema>`, and shared read-only by
//! every layout resolved from it.
//!
//! ## Key Types
//!
//! - `FieldSlot`: element size, kind and ordinal of one field
//! - `Scalar<T>` / `Array<T>`: typed handles used by the field accessors
//! - `Schema`: the frozen, shareable declaration

mod builder;
mod field;

use std::mem;

use bytemuck::Pod;

pub use builder::SchemaBuilder;
pub use field::{Array, FieldKind, FieldRef, FieldSlot, Scalar, SchemaId};

use crate::error::{Result, VarStructError};

/// Field names that would shadow whole-structure queries.
pub const RESERVED_NAMES: [&str; 4] = ["size_bytes", "num_members", "total_size", "field_count"];

/// Frozen declaration of a variable-length structure.
#[derive(Debug)]
pub struct Schema {
    pub(crate) id: SchemaId,
    pub(crate) name: String,
    pub(crate) slots: Vec<FieldSlot>,
    pub(crate) names: Vec<Option<String>>,
    pub(crate) array_count: usize,
}

impl Schema {
    /// Process-unique identity
    #[inline]
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Structure name given at declaration
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared fields
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the schema has no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot of field `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn slot(&self, index: usize) -> &FieldSlot {
        &self.slots[index]
    }

    /// All slots in declaration order
    #[inline]
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    /// Number of array fields, i.e. the number of lengths a resolve expects
    #[inline]
    pub fn array_field_count(&self) -> usize {
        self.array_count
    }

    /// Total size when every array is empty.
    pub fn fixed_size(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| !s.is_array())
            .map(|s| s.element_size())
            .sum()
    }

    /// Ordinal of the field called `name`
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
    }

    /// Name of field `index`, if it was declared with one
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(|n| n.as_deref())
    }

    /// Recover a typed scalar handle for field `index`.
    pub fn scalar_handle<T: Pod>(&self, index: usize) -> Result<Scalar<T>> {
        self.check_handle::<T>(index, FieldKind::Scalar)?;
        Ok(Scalar::new(self.id, index))
    }

    /// Recover a typed array handle for field `index`.
    pub fn array_handle<T: Pod>(&self, index: usize) -> Result<Array<T>> {
        self.check_handle::<T>(index, FieldKind::Array)?;
        Ok(Array::new(self.id, index))
    }

    /// Map a field reference onto an ordinal of this schema.
    ///
    /// # Panics
    /// Panics when the reference was produced by another schema or is out of range;
    /// both are programming errors that must never reach memory.
    #[inline]
    pub(crate) fn position<F: FieldRef>(&self, field: &F) -> usize {
        if let Some(owner) = field.owner() {
            assert_eq!(
                owner, self.id,
                "field handle from {owner} used with schema {} ({})",
                self.name, self.id
            );
        }
        let index = field.field_index();
        assert!(
            index < self.slots.len(),
            "field #{index} out of range for schema {} with {} fields",
            self.name,
            self.slots.len()
        );
        index
    }

    fn check_handle<T: Pod>(&self, index: usize, kind: FieldKind) -> Result<()> {
        let label = || {
            self.field_name(index)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{index}"))
        };
        let slot = self.slots.get(index).ok_or_else(|| {
            VarStructError::definition(&self.name, label(), "no such field")
        })?;
        if slot.kind() != kind {
            return Err(VarStructError::definition(
                &self.name,
                label(),
                format!("field is a {}, not a {}", slot.kind(), kind),
            ));
        }
        if slot.element_size() != mem::size_of::<T>() {
            return Err(VarStructError::definition(
                &self.name,
                label(),
                format!(
                    "element size {} does not match {} ({} bytes)",
                    slot.element_size(),
                    std::any::type_name::<T>(),
                    mem::size_of::<T>()
                ),
            ));
        }
        Ok(())
    }
}
