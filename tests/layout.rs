use std::sync::Arc;

use varstruct::layout::resolve_layout;
use varstruct::prelude::*;
use varstruct::schema::FieldKind;

struct Abc {
    schema: Arc<Schema>,
    a: Scalar<u32>,
    b: Array<u16>,
    c: Scalar<u64>,
}

fn abc() -> Abc {
    let mut builder = SchemaBuilder::new("Abc");
    let a = builder.scalar::<u32>("a").unwrap();
    let b = builder.array::<u16>("b").unwrap();
    let c = builder.scalar::<u64>("c").unwrap();
    Abc {
        schema: builder.build(),
        a,
        b,
        c,
    }
}

#[test]
fn test_abc_offsets() {
    let t = abc();
    let view = t.schema.resolve(&[3]).unwrap();

    assert_eq!((view.start(t.a), view.size(t.a)), (0, 4));
    assert_eq!((view.start(t.b), view.size(t.b)), (4, 6));
    assert_eq!((view.start(t.c), view.size(t.c)), (10, 8));
    assert_eq!(view.total_size(), 18);
    assert_eq!(view.field_count(), 3);
}

#[test]
fn test_abc_length_mismatch() {
    let t = abc();
    for lengths in [&[][..], &[3, 1][..]] {
        let err = t.schema.resolve(lengths).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        assert!(!err.is_recoverable());
    }

    let err = resolve_layout(&t.schema, &[1, 2, 3]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema Abc declares 1 array fields, got 3 lengths"
    );
}

#[test]
fn test_declaration_order_is_layout_order() {
    let mut builder = SchemaBuilder::new("Order");
    let first = builder.array::<u8>("first").unwrap();
    let second = builder.scalar::<u32>("second").unwrap();
    let third = builder.array::<u64>("third").unwrap();
    let schema = builder.build();

    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
    assert_eq!(third.index(), 2);
    assert_eq!(schema.slot(2).kind(), FieldKind::Array);
    assert_eq!(schema.array_field_count(), 2);
    assert_eq!(schema.fixed_size(), 4);

    // array lengths bind in declaration order
    let view = schema.resolve(&[5, 2]).unwrap();
    assert_eq!(view.element_count(first), 5);
    assert_eq!(view.element_count(third), 2);
    assert_eq!(view.start(second), 5);
    assert_eq!(view.start(third), 9);
    assert_eq!(view.total_size(), 25);
}

#[test]
fn test_resolution_is_deterministic() {
    let t = abc();
    let one = t.schema.layout(&[7]).unwrap();
    let two = t.schema.layout(&[7]).unwrap();
    assert_eq!(one, two);
    assert_eq!(one.offsets(), &[4, 18, 26]);
}

#[test]
fn test_empty_arrays_and_empty_schema() {
    let t = abc();
    let view = t.schema.resolve(&[0]).unwrap();
    assert_eq!(view.size(t.b), 0);
    assert_eq!(view.start(t.b), view.start(t.c));
    assert_eq!(view.total_size(), 12);

    let empty = SchemaBuilder::new("Empty").build();
    let view = empty.resolve(&[]).unwrap();
    assert_eq!(view.total_size(), 0);
    assert_eq!(view.field_count(), 0);
}

#[test]
fn test_overflow_is_an_error() {
    let mut builder = SchemaBuilder::new("Huge");
    builder.array::<u64>("words").unwrap();
    builder.array::<u8>("bytes").unwrap();
    let schema = builder.build();

    let err = schema.resolve(&[usize::MAX / 4, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutOverflow);

    let err = schema.resolve(&[usize::MAX / 16, usize::MAX]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutOverflow);
}

#[test]
fn test_configured_limits() {
    let t = abc();
    let resolver = Resolver::with_limits(
        ResolveLimits::default()
            .with_max_total_size(64)
            .with_max_array_len(10),
    );

    assert_eq!(resolver.resolve(&t.schema, &[10]).unwrap().total_size(), 32);

    let err = resolver.resolve(&t.schema, &[11]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutTooLarge);
    assert_eq!(err.to_string(), "array length of 11 exceeds configured limit 10");

    let resolver = Resolver::with_limits(ResolveLimits::default().with_max_total_size(20));
    assert_eq!(resolver.resolve(&t.schema, &[4]).unwrap().total_size(), 20);
    let err = resolver.resolve(&t.schema, &[5]).unwrap_err();
    assert_eq!(err, VarStructError::layout_too_large("total size", 22, 20));
}

#[test]
fn test_recovering_handles_by_index() {
    let t = abc();
    let a: Scalar<u32> = t.schema.scalar_handle(0).unwrap();
    assert_eq!(a, t.a);
    let b: Array<u16> = t.schema.array_handle(1).unwrap();
    assert_eq!(b, t.b);

    assert_eq!(
        t.schema.scalar_handle::<u16>(0).unwrap_err().kind(),
        ErrorKind::Definition
    );
    assert!(t.schema.array_handle::<u16>(0).is_err());
    assert!(t.schema.scalar_handle::<u64>(9).is_err());
    assert_eq!(t.schema.field_index("c"), Some(2));
    assert_eq!(t.schema.field_name(1), Some("b"));
}

#[test]
#[should_panic(expected = "used with schema")]
fn test_foreign_handle_panics() {
    let t = abc();
    let other = abc();
    let view = other.schema.resolve(&[1]).unwrap();
    let _ = view.start(t.c);
}
