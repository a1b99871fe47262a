use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use varstruct::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Point {
    x: i32,
    y: i32,
}

struct Shape {
    schema: Arc<Schema>,
    tag: Scalar<u8>,
    points: Array<Point>,
    weights: Array<f32>,
    id: Scalar<u64>,
}

fn shape() -> Shape {
    let mut builder = SchemaBuilder::new("Shape");
    let tag = builder.scalar::<u8>("tag").unwrap();
    let points = builder.array::<Point>("points").unwrap();
    let weights = builder.array::<f32>("weights").unwrap();
    let id = builder.scalar::<u64>("id").unwrap();
    Shape {
        schema: builder.build(),
        tag,
        points,
        weights,
        id,
    }
}

#[test]
fn test_write_then_read_back() {
    let s = shape();
    let points = [Point { x: 1, y: -1 }, Point { x: 2, y: -2 }];
    let lengths = [points.len(), 3];

    let total = s.schema.resolve(&lengths).unwrap().total_size();
    assert_eq!(total, 1 + 16 + 12 + 8);

    let mut buf = vec![0u8; total];
    {
        let mut view = s.schema.resolve_mut(&mut buf, &lengths).unwrap();
        view.set(s.tag, 7);
        view.copy_from_slice(s.points, &points).unwrap();
        view.fill(s.weights, 0.5);
        view.set_at(s.weights, 2, 1.5, BoundsCheck::Checked).unwrap();
        view.set(s.id, u64::MAX);
    }

    let view = s.schema.resolve_ref(&buf, &lengths).unwrap();
    assert_eq!(view.get(s.tag), 7);
    assert_eq!(view.array_to_vec(s.points), points.to_vec());
    assert_eq!(view.array_to_vec(s.weights), vec![0.5, 0.5, 1.5]);
    assert_eq!(view.get(s.id), u64::MAX);

    // the point array sits at odd offset 1
    assert_eq!(view.start(s.points), 1);
    assert_eq!(
        view.get_at(s.points, 1, BoundsCheck::Checked).unwrap(),
        Point { x: 2, y: -2 }
    );
}

#[test]
fn test_views_agree_on_offsets() {
    let s = shape();
    let lengths = [4, 1];
    let offsets = s.schema.resolve(&lengths).unwrap();

    let mut buf = vec![0u8; offsets.total_size()];
    let mutable = s.schema.resolve_mut(&mut buf, &lengths).unwrap();
    for index in 0..s.schema.len() {
        assert_eq!(offsets.start(index), mutable.start(index));
        assert_eq!(offsets.size(index), mutable.size(index));
    }
    drop(mutable);

    let read = s.schema.resolve_ref(&buf, &lengths).unwrap();
    assert_eq!(read.layout(), offsets.layout());
    assert_eq!(read.as_bytes().len(), offsets.total_size());
}

#[test]
fn test_short_buffers_are_rejected() {
    let s = shape();
    let mut buf = vec![0u8; 20];

    let err = s.schema.resolve_mut(&mut buf, &[1, 1]).unwrap_err();
    assert_eq!(err, VarStructError::buffer_too_small(21, 20));
    assert_eq!(err.kind(), ErrorKind::BufferTooSmall);

    assert!(s.schema.resolve_ref(&buf, &[0, 0]).is_ok());
}

#[test]
fn test_iter_and_zero_length_arrays() {
    let s = shape();
    let mut buf = vec![0u8; 9];
    let view = s.schema.resolve_mut(&mut buf, &[0, 0]).unwrap();

    assert_eq!(view.iter(s.points).count(), 0);
    assert!(view.field_bytes(s.weights).is_empty());
    assert_eq!(view.start(s.id), 1);
    let err = view.get_at(s.points, 0, BoundsCheck::Checked).unwrap_err();
    assert_eq!(err, VarStructError::out_of_range(1, 0, 0));
}

#[test]
fn test_raw_field_indices() {
    let s = shape();
    let mut buf = vec![0u8; 37];
    let mut view = s.schema.resolve_mut(&mut buf, &[2, 3]).unwrap();

    view.field_bytes_mut(0usize)[0] = 0x42;
    assert_eq!(view.get(s.tag), 0x42);
    assert_eq!(view.element_count(2usize), 3);
    assert_eq!(view.field_bytes(3usize).len(), 8);
}

#[test]
fn test_resolver_binds_through_config() {
    let s = shape();
    let mut config = VarStructConfig::default();
    config
        .apply_overrides([("VARSTRUCT__limits__max_array_len".to_string(), "2".to_string())])
        .unwrap();
    let resolver = Resolver::from_config(&config);

    let buf = vec![0u8; 64];
    assert!(resolver.resolve_ref(&s.schema, &buf, &[2, 2]).is_ok());
    let err = resolver.resolve_ref(&s.schema, &buf, &[2, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LayoutTooLarge);
}

#[test]
fn test_raw_pointer_views() {
    let s = shape();
    let mut buf = vec![0u8; 9];
    unsafe {
        let mut view = MutView::from_raw(&s.schema, buf.as_mut_ptr(), &[0, 0]).unwrap();
        view.set(s.id, 99);
    }
    let view = unsafe { ReadView::from_raw(&s.schema, buf.as_ptr(), &[0, 0]) }.unwrap();
    assert_eq!(view.get(s.id), 99);
    assert_eq!(view.get(s.tag), 0);
}

#[test]
fn test_copy_from_slice_length_mismatch() {
    let s = shape();
    let mut buf = vec![0u8; 37];
    let mut view = s.schema.resolve_mut(&mut buf, &[2, 3]).unwrap();
    view.copy_from_slice(s.weights, &[1.0, 2.0, 3.0]).unwrap();

    let err = view.copy_from_slice(s.weights, &[9.0, 9.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SliceLengthMismatch);
    assert!(!err.is_recoverable());
    assert_eq!(err.to_string(), "field #2 holds 3 elements, got a slice of 2");
    assert_eq!(view.array_to_vec(s.weights), vec![1.0, 2.0, 3.0]);
}

#[test]
#[should_panic(expected = "used with schema")]
fn test_slot_from_another_schema_panics() {
    let mut first = SchemaBuilder::new("First");
    first.declare_named("x", 2, false).unwrap();
    let wide = first.declare_named("wide", 8, false).unwrap();

    let mut second = SchemaBuilder::new("Second");
    second.declare_named("x", 2, false).unwrap();
    second.declare_named("y", 2, false).unwrap();
    let second = second.build();

    let view = second.resolve(&[]).unwrap();
    let _ = view.size(wide);
}

#[test]
fn test_declared_slots_address_their_own_schema() {
    let mut builder = SchemaBuilder::new("Slots");
    let head = builder.declare_named("head", 2, false).unwrap();
    let body = builder.declare_named("body", 4, true).unwrap();
    let schema = builder.build();

    let view = schema.resolve(&[3]).unwrap();
    assert_eq!(view.size(head), 2);
    assert_eq!(view.start(body), 2);
    assert_eq!(view.element_count(body), 3);
}
