// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synthesized container types and the signature-to-type bridge.
//!
//! The factories hand out the default list, map and tuple descriptors,
//! memoized one per parameterization: asking twice for the same
//! element/key/member configuration yields the identical descriptor.
//! [`type_from_signature`] walks a signature tree and materializes a
//! type from these factories and the canonical primitives.

mod list;
mod map;
pub(crate) mod tuple;

use crate::error::{Error, Result};
use crate::logging::TYPE_TARGET;
use crate::registry::{
    intern_list_type, intern_map_type, intern_tuple_type, memoized_list_type, memoized_map_type,
    memoized_tuple_type, TupleKey,
};
use crate::signature::{Signature, SignatureItem, TypeCode};
use crate::types::{object_ptr_type, type_of, Buffer, Storage, Type};
use crate::value::{GenericValue, GenericValuePtr};
use list::DefaultListType;
use map::DefaultMapType;
use std::sync::Arc;
use tuple::{DefaultTupleType, TupleStorage};

/// Default list descriptor for the given element type.
///
/// One descriptor exists per element identity; concurrent calls for
/// the same element agree on it.
pub fn make_list_type(element: Arc<dyn Type>) -> Arc<dyn Type> {
    let key = element.info();
    if let Some(existing) = memoized_list_type(&key) {
        return existing;
    }
    // built outside the registry lock; intern dedupes a concurrent build
    let built: Arc<dyn Type> = Arc::new(DefaultListType::new(element));
    intern_list_type(key, built)
}

/// Default map descriptor for the given key and element types.
pub fn make_map_type(key: Arc<dyn Type>, element: Arc<dyn Type>) -> Arc<dyn Type> {
    let memo_key = (key.info(), element.info());
    if let Some(existing) = memoized_map_type(&memo_key) {
        return existing;
    }
    let pair: Arc<dyn Type> = make_default_tuple(vec![key.clone(), element.clone()], "", &[]);
    let built: Arc<dyn Type> = Arc::new(DefaultMapType::new(key, element, pair));
    intern_map_type(memo_key, built)
}

/// Default tuple descriptor for the given members, record name and
/// element names. Identical requests return the identical descriptor.
pub fn make_tuple_type(
    members: Vec<Arc<dyn Type>>,
    class_name: &str,
    element_names: &[String],
) -> Arc<dyn Type> {
    make_default_tuple(members, class_name, element_names)
}

fn make_default_tuple(
    members: Vec<Arc<dyn Type>>,
    class_name: &str,
    element_names: &[String],
) -> Arc<DefaultTupleType> {
    let key = TupleKey {
        members: members.iter().map(|m| m.info()).collect(),
        class_name: class_name.to_string(),
        element_names: element_names.to_vec(),
    };
    if let Some(existing) = memoized_tuple_type(&key) {
        return existing;
    }
    log::debug!(
        target: TYPE_TARGET,
        "Instantiating tuple <{}> '{}'",
        key.members
            .iter()
            .map(|m| m.as_string())
            .collect::<Vec<_>>()
            .join(","),
        class_name
    );
    let built = Arc::new(DefaultTupleType::new(
        members,
        class_name.to_string(),
        element_names.to_vec(),
    ));
    intern_tuple_type(key, built)
}

/// Build an anonymous tuple value holding a copy of each input value.
pub fn make_generic_tuple(values: &[GenericValuePtr<'_>]) -> Result<GenericValue> {
    let members: Vec<Arc<dyn Type>> = values.iter().map(|v| v.ty().clone()).collect();
    let tuple = make_default_tuple(members, "", &[]);
    let mut storage = tuple.initialize_storage(None)?;
    for (index, value) in values.iter().enumerate() {
        crate::types::TupleType::set(&*tuple, &mut storage, index, value.clone())?;
    }
    Ok(GenericValue::from_parts(tuple, storage))
}

/// Build an anonymous tuple value adopting the given member storages.
///
/// The storages are taken over as-is (no cloning); their count must
/// match the member count exactly.
pub fn make_generic_tuple_ptr(
    members: Vec<Arc<dyn Type>>,
    storages: Vec<Storage>,
) -> Result<GenericValue> {
    let tuple = make_default_tuple(members, "", &[]);
    let seed: Storage = Box::new(TupleStorage { slots: storages });
    let storage = tuple.initialize_storage(Some(seed))?;
    Ok(GenericValue::from_parts(tuple, storage))
}

/// Materialize a type from a signature.
///
/// Primitive codes resolve to the canonical descriptors, composites to
/// the default containers. A signature with several top-level elements
/// is a caller mistake: it is reported and the first element is used.
pub fn type_from_signature(signature: &Signature) -> Result<Arc<dyn Type>> {
    if signature.size() > 1 {
        log::warn!(
            target: TYPE_TARGET,
            "type_from_signature: signature has more than one element: {}",
            signature
        );
    }
    let first = signature.first().ok_or_else(|| {
        log::error!(
            target: TYPE_TARGET,
            "Cannot get type from invalid signature"
        );
        Error::UnknownType(signature.to_string())
    })?;
    item_to_type(first)
}

fn item_to_type(item: SignatureItem<'_>) -> Result<Arc<dyn Type>> {
    match item.code() {
        TypeCode::None | TypeCode::Void => Ok(type_of::<()>()),
        TypeCode::Bool => Ok(type_of::<bool>()),
        TypeCode::Int8 => Ok(type_of::<i8>()),
        TypeCode::UInt8 => Ok(type_of::<u8>()),
        TypeCode::Int16 => Ok(type_of::<i16>()),
        TypeCode::UInt16 => Ok(type_of::<u16>()),
        TypeCode::Int32 => Ok(type_of::<i32>()),
        TypeCode::UInt32 => Ok(type_of::<u32>()),
        TypeCode::Int64 => Ok(type_of::<i64>()),
        TypeCode::UInt64 => Ok(type_of::<u64>()),
        TypeCode::Float => Ok(type_of::<f32>()),
        TypeCode::Double => Ok(type_of::<f64>()),
        TypeCode::String => Ok(type_of::<String>()),
        TypeCode::Dynamic => Ok(type_of::<GenericValue>()),
        TypeCode::Raw => Ok(type_of::<Buffer>()),
        TypeCode::Object => Ok(object_ptr_type()),
        TypeCode::Unknown => {
            log::warn!(
                target: TYPE_TARGET,
                "Cannot get type from signature {}",
                item.to_signature()
            );
            Err(Error::UnknownType(item.to_signature().to_string()))
        }
        TypeCode::List => {
            let children = item.children();
            let element = children.first().copied().ok_or_else(|| {
                Error::UnknownType(item.to_signature().to_string())
            })?;
            let element = item_to_type(element).map_err(|error| {
                log::error!(
                    target: TYPE_TARGET,
                    "Cannot get type from list of unknown element type"
                );
                error
            })?;
            Ok(make_list_type(element))
        }
        TypeCode::Map => {
            let children = item.children();
            let (key_item, value_item) = match (children.first(), children.get(1)) {
                (Some(k), Some(v)) => (*k, *v),
                _ => return Err(Error::UnknownType(item.to_signature().to_string())),
            };
            let key = item_to_type(key_item).map_err(|error| {
                log::error!(
                    target: TYPE_TARGET,
                    "Cannot get type from map of unknown key type"
                );
                error
            })?;
            let value = item_to_type(value_item).map_err(|error| {
                log::error!(
                    target: TYPE_TARGET,
                    "Cannot get type from map of unknown element type"
                );
                error
            })?;
            Ok(make_map_type(key, value))
        }
        TypeCode::Tuple => {
            let mut members = Vec::new();
            for child in item.children() {
                let member = item_to_type(child).map_err(|error| {
                    log::error!(
                        target: TYPE_TARGET,
                        "Cannot get type from tuple of unknown member type"
                    );
                    error
                })?;
                members.push(member);
            }
            // the first annotation field is the record name, the rest
            // are element names
            let (class_name, element_names) = match item.annotation() {
                Some(annotation) => {
                    let mut fields = annotation.split(',');
                    let name = fields.next().unwrap_or("").to_string();
                    let elements: Vec<String> = fields.map(str::to_string).collect();
                    (name, elements)
                }
                None => (String::new(), Vec::new()),
            };
            Ok(make_tuple_type(members, &class_name, &element_names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::signature_of;

    #[test]
    fn test_factories_memoize() {
        let a = make_list_type(type_of::<i32>());
        let b = make_list_type(type_of::<i32>());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &make_list_type(type_of::<i64>())));

        let m1 = make_map_type(type_of::<String>(), type_of::<i32>());
        let m2 = make_map_type(type_of::<String>(), type_of::<i32>());
        assert!(Arc::ptr_eq(&m1, &m2));
    }

    #[test]
    fn test_tuple_memoization_key() {
        let names = ["x".to_string(), "y".to_string()];
        let a = make_tuple_type(vec![type_of::<i32>(), type_of::<String>()], "Point", &names);
        let b = make_tuple_type(vec![type_of::<i32>(), type_of::<String>()], "Point", &names);
        assert!(Arc::ptr_eq(&a, &b));

        // a different name is a different descriptor
        let c = make_tuple_type(vec![type_of::<i32>(), type_of::<String>()], "Pose", &names);
        assert!(!Arc::ptr_eq(&a, &c));

        // different element names too
        let other = ["u".to_string(), "v".to_string()];
        let d = make_tuple_type(vec![type_of::<i32>(), type_of::<String>()], "Point", &other);
        assert!(!Arc::ptr_eq(&a, &d));
    }

    #[test]
    fn test_make_generic_tuple_clones() {
        let a = GenericValue::of(1i32);
        let b = GenericValue::of("two".to_string());
        let tuple = make_generic_tuple(&[a.as_ptr(), b.as_ptr()]).expect("tuple");
        drop(a);
        drop(b);
        assert_eq!(tuple.signature(false).to_string(), "(is)");
        let first = tuple.as_ptr().member(0).expect("member 0");
        assert_eq!(first.downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_make_generic_tuple_ptr_adopts() {
        let members: Vec<Arc<dyn Type>> = vec![type_of::<i32>(), type_of::<f64>()];
        let storages: Vec<Storage> = vec![Box::new(4i32), Box::new(0.5f64)];
        let tuple = make_generic_tuple_ptr(members, storages).expect("tuple");
        let second = tuple.as_ptr().member(1).expect("member 1");
        assert_eq!(second.downcast_ref::<f64>(), Some(&0.5));
    }

    #[test]
    fn test_make_generic_tuple_ptr_checks_arity() {
        let members: Vec<Arc<dyn Type>> = vec![type_of::<i32>(), type_of::<f64>()];
        let storages: Vec<Storage> = vec![Box::new(4i32)];
        match make_generic_tuple_ptr(members, storages) {
            Err(Error::StorageShapeMismatch {
                expected: 2,
                got: 1,
            }) => {}
            other => panic!("expected StorageShapeMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_type_from_signature_primitives() {
        for (text, expected) in [
            ("v", "v"),
            ("b", "b"),
            ("i", "i"),
            ("L", "L"),
            ("f", "f"),
            ("d", "d"),
            ("s", "s"),
            ("m", "m"),
            ("r", "r"),
            ("o", "o"),
        ] {
            let ty = type_from_signature(&Signature::parse(text)).expect("type");
            assert_eq!(ty.signature().to_string(), expected, "for '{}'", text);
        }
        // None maps to void
        let ty = type_from_signature(&Signature::parse("_")).expect("type");
        assert_eq!(ty.signature().to_string(), "v");
    }

    #[test]
    fn test_type_from_signature_composites() {
        let list = type_from_signature(&Signature::parse("[i]")).expect("list");
        assert_eq!(list.signature().to_string(), "[i]");

        let map = type_from_signature(&Signature::parse("{s[d]}")).expect("map");
        assert_eq!(map.signature().to_string(), "{s[d]}");

        let tuple =
            type_from_signature(&Signature::parse("(is)<Point,x,y>")).expect("tuple");
        assert_eq!(tuple.signature().to_string(), "(is)<Point,x,y>");
    }

    #[test]
    fn test_type_from_signature_unknown_fails() {
        assert!(type_from_signature(&Signature::parse("X")).is_err());
        assert!(type_from_signature(&Signature::parse("[X]")).is_err());
        assert!(type_from_signature(&Signature::invalid()).is_err());
    }

    #[test]
    fn test_materialized_value_round_trips() {
        for text in ["[i]", "{sl}", "(ifs)", "(is)<Point,x,y>", "m", "r"] {
            let signature = Signature::parse(text);
            let ty = type_from_signature(&signature).expect("type");
            let value = GenericValue::new(&ty).expect("default value");
            assert_eq!(
                signature_of(value.as_ptr(), false),
                signature,
                "round trip for '{}'",
                text
            );
        }
    }
}
