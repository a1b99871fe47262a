//! Declaration macro
//!
//! `varstruct!` is a thin convenience over [`SchemaBuilder`](crate::schema::SchemaBuilder):
//! it generates a struct holding one typed handle per field and a lazily built,
//! process-wide schema.
//!
//! ```
//! use varstruct::prelude::*;
//!
//! varstruct::varstruct! {
//!     /// A length-prefixed sample record.
//!     pub struct Sample {
//!         scalar id: u32,
//!         array values: u16,
//!         scalar checksum: u64,
//!     }
//! }
//!
//! let f = Sample::fields();
//! let mut buf = vec![0u8; 64];
//! let mut view = Sample::schema().resolve_mut(&mut buf, &[3]).unwrap();
//! view.set(f.id, 1);
//! view.copy_from_slice(f.values, &[10, 20, 30]).unwrap();
//! assert_eq!(view.start(f.checksum), 10);
//! assert_eq!(view.total_size(), 18);
//! ```
//!
//! Declaration errors (for example a reserved field name) panic on first use
//! of the generated type.

/// Declare a variable-length structure type.
///
/// Each field is written `scalar name: Type` or `array name: ElementType`, in
/// layout order. Types must implement `bytemuck::Pod`.
#[macro_export]
macro_rules! varstruct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $kind:ident $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis struct $name {
            $( pub $field: $crate::__varstruct_handle!($kind $ty), )*
        }

        impl $name {
            fn __registry() -> &'static ($name, ::std::sync::Arc<$crate::schema::Schema>) {
                static REGISTRY: ::std::sync::OnceLock<(
                    $name,
                    ::std::sync::Arc<$crate::schema::Schema>,
                )> = ::std::sync::OnceLock::new();
                REGISTRY.get_or_init(|| {
                    #[allow(unused_mut)]
                    let mut builder = $crate::schema::SchemaBuilder::new(stringify!($name));
                    let fields = $name {
                        $(
                            $field: match $crate::__varstruct_declare!(builder, $kind, $field, $ty) {
                                Ok(handle) => handle,
                                Err(err) => panic!("{}", err),
                            },
                        )*
                    };
                    (fields, builder.build())
                })
            }

            /// Shared schema of this structure
            $vis fn schema() -> &'static ::std::sync::Arc<$crate::schema::Schema> {
                &Self::__registry().1
            }

            /// Typed handles of every field
            $vis fn fields() -> Self {
                Self::__registry().0
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __varstruct_handle {
    (scalar $ty:ty) => {
        $crate::schema::Scalar<$ty>
    };
    (array $ty:ty) => {
        $crate::schema::Array<$ty>
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __varstruct_declare {
    ($builder:ident, scalar, $field:ident, $ty:ty) => {
        $builder.scalar::<$ty>(stringify!($field))
    };
    ($builder:ident, array, $field:ident, $ty:ty) => {
        $builder.array::<$ty>(stringify!($field))
    };
}
