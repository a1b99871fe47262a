//! Field slots and typed field handles.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of a declared schema.
///
/// Typed handles carry the id of the schema that produced them so a handle can
/// never be used to address a field of a different structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

impl SchemaId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema#{}", self.0)
    }
}

/// Whether a field holds one element or a caller-sized run of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single fixed-size value
    Scalar,
    /// A variable-length array whose length is supplied at resolve time
    Array,
}

impl FieldKind {
    /// Get the kind as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Array => "array",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared field: owning schema, element size, kind and declaration ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    schema: SchemaId,
    index: usize,
    element_size: usize,
    kind: FieldKind,
    type_name: &'static str,
}

impl FieldSlot {
    pub(crate) const fn new(
        schema: SchemaId,
        index: usize,
        element_size: usize,
        kind: FieldKind,
        type_name: &'static str,
    ) -> Self {
        Self {
            schema,
            index,
            element_size,
            kind,
            type_name,
        }
    }

    /// Declaration ordinal, starting at 0
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Schema that declared the field
    #[inline]
    pub const fn schema_id(&self) -> SchemaId {
        self.schema
    }

    /// Size in bytes of one element
    #[inline]
    pub const fn element_size(&self) -> usize {
        self.element_size
    }

    /// Scalar or array
    #[inline]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Check if the field is an array
    #[inline]
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, FieldKind::Array)
    }

    /// Element type name, `"raw"` for untyped declarations
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Anything that identifies a field of a schema.
///
/// Raw indices carry no owner and are only range-checked; slots and typed
/// handles are also checked against the schema that declared them.
pub trait FieldRef {
    /// Declaration ordinal of the field
    fn field_index(&self) -> usize;

    /// Schema that declared the field, if known
    fn owner(&self) -> Option<SchemaId>;
}

impl FieldRef for usize {
    #[inline]
    fn field_index(&self) -> usize {
        *self
    }

    #[inline]
    fn owner(&self) -> Option<SchemaId> {
        None
    }
}

impl FieldRef for FieldSlot {
    #[inline]
    fn field_index(&self) -> usize {
        self.index
    }

    #[inline]
    fn owner(&self) -> Option<SchemaId> {
        Some(self.schema)
    }
}

/// Typed handle to a scalar field holding one `T`.
pub struct Scalar<T> {
    schema: SchemaId,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

/// Typed handle to an array field of `T` elements.
pub struct Array<T> {
    schema: SchemaId,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

macro_rules! impl_handle {
    ($handle:ident) => {
        impl<T> $handle<T> {
            pub(crate) const fn new(schema: SchemaId, index: usize) -> Self {
                Self {
                    schema,
                    index,
                    _marker: PhantomData,
                }
            }

            /// Declaration ordinal of the field
            #[inline]
            pub const fn index(&self) -> usize {
                self.index
            }

            /// Schema that declared the field
            #[inline]
            pub const fn schema_id(&self) -> SchemaId {
                self.schema
            }
        }

        impl<T> Clone for $handle<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $handle<T> {}

        impl<T> PartialEq for $handle<T> {
            fn eq(&self, other: &Self) -> bool {
                self.schema == other.schema && self.index == other.index
            }
        }

        impl<T> Eq for $handle<T> {}

        impl<T> fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($handle))
                    .field("schema", &self.schema)
                    .field("index", &self.index)
                    .field("type", &std::any::type_name::<T>())
                    .finish()
            }
        }

        impl<T> FieldRef for $handle<T> {
            #[inline]
            fn field_index(&self) -> usize {
                self.index
            }

            #[inline]
            fn owner(&self) -> Option<SchemaId> {
                Some(self.schema)
            }
        }
    };
}

impl_handle!(Scalar);
impl_handle!(Array);
