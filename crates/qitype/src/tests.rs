// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests across the type system: signature round trips,
//! collection inference, registry behavior.

use crate::factory::{make_list_type, make_map_type, make_tuple_type, type_from_signature};
use crate::registry::{get_type, register_type};
use crate::signature::{signature_of, Signature};
use crate::type_info::TypeInfo;
use crate::types::{type_of, Buffer, ObjectPtr, SharedPointerType, Type, UnknownType};
use crate::value::GenericValue;
use std::sync::Arc;

/// Wrap a value in a dynamic.
fn dynamic(value: GenericValue) -> GenericValue {
    GenericValue::of(value)
}

fn list_of_dynamics(values: Vec<GenericValue>) -> GenericValue {
    let ty = make_list_type(type_of::<GenericValue>());
    let mut list = GenericValue::new(&ty).expect("list value");
    for v in values {
        let element = dynamic(v);
        list.as_mut().push_back(element.as_ptr());
    }
    list
}

#[test]
fn test_primitive_round_trips() {
    // values produce their codes, and each code produces a type with
    // the same declared signature
    let cases = [
        (GenericValue::of(true), "b"),
        (GenericValue::of(-1i8), "c"),
        (GenericValue::of(1u64), "L"),
        (GenericValue::of(1.5f32), "f"),
        (GenericValue::of(2.5f64), "d"),
        (GenericValue::of("x".to_string()), "s"),
    ];
    for (value, expected) in cases {
        let declared = value.signature(false);
        assert_eq!(declared.to_string(), expected);
        assert_eq!(value.signature(true).to_string(), expected);

        let ty = type_from_signature(&declared).expect("materialized type");
        assert_eq!(ty.signature(), declared);
    }
}

#[test]
fn test_homogeneous_list_signature() {
    let ty = make_list_type(type_of::<i32>());
    let mut list = GenericValue::new(&ty).expect("list value");
    for v in [1i32, 2, 3] {
        let element = GenericValue::of(v);
        list.as_mut().push_back(element.as_ptr());
    }
    assert_eq!(list.signature(false).to_string(), "[i]");
    assert_eq!(list.signature(true).to_string(), "[i]");
}

#[test]
fn test_heterogeneous_list_widens() {
    let list = list_of_dynamics(vec![GenericValue::of(1i32), GenericValue::of(2i64)]);
    // Int32 widens into Int64 when resolving the actual content
    assert_eq!(list.signature(true).to_string(), "[l]");
    // the declared element type is dynamic
    assert_eq!(list.signature(false).to_string(), "[m]");
}

#[test]
fn test_irreconcilable_list_falls_back_to_declared() {
    let list = list_of_dynamics(vec![
        GenericValue::of(1i32),
        GenericValue::of("two".to_string()),
    ]);
    assert_eq!(list.signature(true).to_string(), "[m]");
}

#[test]
fn test_empty_collections_infer_placeholders() {
    let list = GenericValue::new(&make_list_type(type_of::<i32>())).expect("list");
    assert_eq!(list.signature(true).to_string(), "[_]");
    assert_eq!(list.signature(false).to_string(), "[i]");

    let map = GenericValue::new(&make_map_type(type_of::<String>(), type_of::<i64>()))
        .expect("map");
    assert_eq!(map.signature(true).to_string(), "{__}");
    assert_eq!(map.signature(false).to_string(), "{sl}");
}

#[test]
fn test_map_with_dynamic_values() {
    let ty = make_map_type(type_of::<String>(), type_of::<GenericValue>());
    let mut map = GenericValue::new(&ty).expect("map value");
    for (k, v) in [
        ("k1", dynamic(GenericValue::of(1i32))),
        ("k2", dynamic(GenericValue::of("s".to_string()))),
    ] {
        let key = GenericValue::of(k.to_string());
        map.as_mut().insert(key.as_ptr(), v.as_ptr());
    }
    // value reconciliation fails (i vs s), so the declared dynamic wins
    assert_eq!(map.signature(true).to_string(), "{sm}");
    assert_eq!(map.signature(false).to_string(), "{sm}");
}

#[test]
fn test_map_reconciles_homogeneous_values() {
    let ty = make_map_type(type_of::<String>(), type_of::<GenericValue>());
    let mut map = GenericValue::new(&ty).expect("map value");
    for (k, v) in [("a", 1i32), ("b", 2i32)] {
        let key = GenericValue::of(k.to_string());
        let value = dynamic(GenericValue::of(v));
        map.as_mut().insert(key.as_ptr(), value.as_ptr());
    }
    assert_eq!(map.signature(true).to_string(), "{si}");
}

#[test]
fn test_annotated_tuple_round_trip() {
    let names = ["x".to_string(), "y".to_string()];
    let ty = make_tuple_type(vec![type_of::<i32>(), type_of::<String>()], "Point", &names);
    assert_eq!(ty.signature().to_string(), "(is)<Point,x,y>");

    let materialized =
        type_from_signature(&Signature::parse("(is)<Point,x,y>")).expect("materialized");
    // same parameterization, identical descriptor
    assert!(Arc::ptr_eq(&ty, &materialized));
}

#[test]
fn test_tuple_inference_carries_annotations() {
    let names = ["x".to_string(), "y".to_string()];
    let ty = make_tuple_type(vec![type_of::<i32>(), type_of::<f64>()], "Pose2D", &names);
    let mut value = GenericValue::new(&ty).expect("tuple value");
    let x = GenericValue::of(3i32);
    value.as_mut().set_member(0, x.as_ptr()).expect("set x");
    assert_eq!(value.signature(true).to_string(), "(id)<Pose2D,x,y>");
}

#[test]
fn test_late_registration_sequence() {
    let info = TypeInfo::named("tests.integration.Frame");
    assert!(get_type(&info).is_none());

    let descriptor = UnknownType::named("tests.integration.Frame");
    assert!(register_type(info.clone(), descriptor.clone()));

    let found = get_type(&info).expect("descriptor after registration");
    assert!(Arc::ptr_eq(&found, &descriptor));
}

#[test]
fn test_identity_through_info() {
    let a = make_list_type(type_of::<u8>());
    let b = make_list_type(type_of::<u8>());
    assert_eq!(a.info(), b.info());
    assert!(crate::types::same_type(&a, &b));
}

#[test]
fn test_clone_destroy_of_nested_value() {
    // a list of (i, s) tuples exercises deep clone and recursive
    // destruction without leaks or double frees
    let point = make_tuple_type(vec![type_of::<i32>(), type_of::<String>()], "", &[]);
    let list_ty = make_list_type(point.clone());
    let mut list = GenericValue::new(&list_ty).expect("list value");

    let mut element = GenericValue::new(&point).expect("tuple value");
    let label = GenericValue::of("p1".to_string());
    element.as_mut().set_member(1, label.as_ptr()).expect("set");
    list.as_mut().push_back(element.as_ptr());
    list.as_mut().push_back(element.as_ptr());

    let copy = list.clone();
    drop(list);
    drop(element);

    let inner = copy.as_ptr().iter().next().expect("first element");
    let label = inner.member(1).expect("member 1");
    assert_eq!(
        label.downcast_ref::<String>().map(String::as_str),
        Some("p1")
    );
}

#[test]
fn test_materialize_then_infer_round_trip() {
    for text in ["b", "i", "[s]", "{il}", "([i]{sd})", "(is)<Point,x,y>", "m", "r", "o", "v"] {
        let signature = Signature::parse(text);
        let ty = type_from_signature(&signature).expect("type");
        let value = GenericValue::new(&ty).expect("default value");
        assert_eq!(
            signature_of(value.as_ptr(), false),
            signature,
            "for '{}'",
            text
        );
    }
}

#[test]
fn test_object_pointer_signatures() {
    let ptr = GenericValue::of(ObjectPtr::default());
    assert_eq!(ptr.signature(false).to_string(), "o");
    assert_eq!(ptr.signature(true).to_string(), "o");

    let shared = SharedPointerType::make(UnknownType::named("srv.NotYetRegistered"));
    let value = GenericValue::new(&shared).expect("pointer value");
    assert_eq!(value.signature(false).to_string(), "o");
    assert_eq!(value.signature(true).to_string(), "o");

    let plain: Arc<dyn Type> = SharedPointerType::make(type_of::<Buffer>());
    let value = GenericValue::new(&plain).expect("pointer value");
    assert_eq!(value.signature(true).to_string(), "X");
}

#[test]
fn test_dynamic_list_of_mixed_numerics_narrows_stepwise() {
    // i8 -> i16 -> i64 all widen along the same signed chain
    let list = list_of_dynamics(vec![
        GenericValue::of(1i8),
        GenericValue::of(2i16),
        GenericValue::of(3i64),
    ]);
    assert_eq!(list.signature(true).to_string(), "[l]");
}

#[test]
fn test_registry_prefers_last_registration() {
    let info = TypeInfo::named("tests.integration.Rewritten");
    register_type(info.clone(), UnknownType::named("v1"));
    let second = UnknownType::named("v2");
    register_type(info.clone(), second.clone());
    let found = get_type(&info).expect("descriptor");
    assert!(Arc::ptr_eq(&found, &second));
}
