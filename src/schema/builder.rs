//! Schema declaration.

use std::mem;
use std::sync::Arc;

use bytemuck::Pod;

use crate::error::{Result, VarStructError};
use crate::schema::field::{Array, FieldKind, FieldSlot, Scalar, SchemaId};
use crate::schema::{Schema, RESERVED_NAMES};

/// Declares the fields of one structure type, in order, then freezes them into a [`Schema`].
///
/// ```
/// use varstruct::schema::SchemaBuilder;
///
/// let mut builder = SchemaBuilder::new("Packet");
/// let id = builder.scalar::<u32>("id").unwrap();
/// let payload = builder.array::<u16>("payload").unwrap();
/// let schema = builder.build();
///
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.field_index("payload"), Some(payload.index()));
/// assert_eq!(id.index(), 0);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    id: SchemaId,
    name: String,
    slots: Vec<FieldSlot>,
    names: Vec<Option<String>>,
}

impl SchemaBuilder {
    /// Start declaring a structure called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SchemaId::next(),
            name: name.into(),
            slots: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Number of fields declared so far
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no field has been declared yet
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append an unnamed, untyped field.
    ///
    /// Typed handles for the slot can be recovered later with
    /// [`Schema::scalar_handle`] or [`Schema::array_handle`].
    pub fn declare(&mut self, element_size: usize, is_array: bool) -> Result<FieldSlot> {
        self.push(None, element_size, kind_of(is_array), "raw")
    }

    /// Append a named, untyped field.
    pub fn declare_named(
        &mut self,
        name: &str,
        element_size: usize,
        is_array: bool,
    ) -> Result<FieldSlot> {
        self.push(Some(name), element_size, kind_of(is_array), "raw")
    }

    /// Append a scalar field holding one `T`.
    pub fn scalar<T: Pod>(&mut self, name: &str) -> Result<Scalar<T>> {
        let slot = self.push(
            Some(name),
            mem::size_of::<T>(),
            FieldKind::Scalar,
            std::any::type_name::<T>(),
        )?;
        Ok(Scalar::new(self.id, slot.index()))
    }

    /// Append an array field of `T` elements; its length is supplied at resolve time.
    pub fn array<T: Pod>(&mut self, name: &str) -> Result<Array<T>> {
        let slot = self.push(
            Some(name),
            mem::size_of::<T>(),
            FieldKind::Array,
            std::any::type_name::<T>(),
        )?;
        Ok(Array::new(self.id, slot.index()))
    }

    /// Freeze the declaration into a shared, immutable schema.
    pub fn build(self) -> Arc<Schema> {
        let array_count = self.slots.iter().filter(|s| s.is_array()).count();
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                schema = %self.name,
                id = %self.id,
                fields = self.slots.len(),
                arrays = array_count,
                "schema declared"
            );
        }
        Arc::new(Schema {
            id: self.id,
            name: self.name,
            slots: self.slots,
            names: self.names,
            array_count,
        })
    }

    fn push(
        &mut self,
        name: Option<&str>,
        element_size: usize,
        kind: FieldKind,
        type_name: &'static str,
    ) -> Result<FieldSlot> {
        let index = self.slots.len();
        let label = match name {
            Some(name) => name.to_string(),
            None => format!("#{index}"),
        };

        if element_size == 0 {
            return Err(VarStructError::definition(
                &self.name,
                label,
                format!("element type {type_name} has zero size"),
            ));
        }

        if let Some(name) = name {
            self.validate_name(name)?;
        }

        let slot = FieldSlot::new(self.id, index, element_size, kind, type_name);
        self.slots.push(slot);
        self.names.push(name.map(str::to_string));
        Ok(slot)
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(VarStructError::definition(
                &self.name,
                format!("#{}", self.slots.len()),
                "field name is empty",
            ));
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(VarStructError::definition(
                &self.name,
                name,
                "name collides with a reserved operation",
            ));
        }
        if self.names.iter().flatten().any(|n| n == name) {
            return Err(VarStructError::definition(
                &self.name,
                name,
                "field name declared twice",
            ));
        }
        Ok(())
    }
}

fn kind_of(is_array: bool) -> FieldKind {
    if is_array {
        FieldKind::Array
    } else {
        FieldKind::Scalar
    }
}
