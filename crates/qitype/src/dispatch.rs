// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind-directed dispatch over generic values.
//!
//! [`type_dispatch`] examines a value's [`Kind`] and invokes the
//! matching hook on a caller-supplied [`TypeVisitor`] with the
//! kind-specific parameters already extracted. Signature inference,
//! conversion and formatting are all written as visitors.

use crate::error::Result;
use crate::kind::Kind;
use crate::types::{object_ptr_type, type_fail, PointerKind, Type};
use crate::value::{GenericIterator, GenericValuePtr};
use std::sync::Arc;

/// Hooks invoked by [`type_dispatch`], one per [`Kind`].
pub trait TypeVisitor {
    /// A unit value.
    fn visit_void(&mut self);

    /// A boolean value.
    fn visit_bool(&mut self, value: bool);

    /// An integer value with its signedness and byte width.
    fn visit_int(&mut self, value: i64, signed: bool, byte_size: usize);

    /// A float value with its byte width.
    fn visit_float(&mut self, value: f64, byte_size: usize);

    /// A string value.
    fn visit_string(&mut self, value: &str);

    /// A list value, as a cursor over its elements.
    fn visit_list(&mut self, elements: GenericIterator<'_>);

    /// A map value, as a cursor over its (key, value) pairs.
    fn visit_map(&mut self, pairs: GenericIterator<'_>);

    /// A tuple value with its record name, members and element names.
    fn visit_tuple(
        &mut self,
        class_name: &str,
        members: &[GenericValuePtr<'_>],
        element_names: &[String],
    );

    /// A remote object (or the canonical Object pointer).
    fn visit_object(&mut self);

    /// A pointer, described by its flavor and pointed-to type.
    fn visit_pointer(&mut self, pointer_kind: PointerKind, pointed: &Arc<dyn Type>);

    /// One unwrapped layer of a dynamic value. The visitor decides
    /// whether to recurse into `inner`.
    fn visit_dynamic(&mut self, inner: GenericValuePtr<'_>);

    /// An opaque byte buffer.
    fn visit_raw(&mut self, data: &[u8]);

    /// A container cursor value.
    fn visit_iterator(&mut self, value: GenericValuePtr<'_>);

    /// A value of a type the runtime cannot describe.
    fn visit_unknown(&mut self, value: GenericValuePtr<'_>);
}

/// Dispatch `value` to the kind-appropriate hook of `visitor`.
///
/// A type whose kind promises a capability it does not actually expose
/// is reported through the failure reporter and visited as unknown.
pub fn type_dispatch<V: TypeVisitor>(visitor: &mut V, value: GenericValuePtr<'_>) -> Result<()> {
    match value.kind() {
        Kind::Void => visitor.visit_void(),
        Kind::Bool => match value.ty().as_int() {
            Some(int) => visitor.visit_bool(int.get(value.storage()) != 0),
            None => visit_missing_capability(visitor, value, "bool access"),
        },
        Kind::Int => match value.ty().as_int() {
            Some(int) => visitor.visit_int(
                int.get(value.storage()),
                int.is_signed(),
                int.byte_size(),
            ),
            None => visit_missing_capability(visitor, value, "int access"),
        },
        Kind::Float => match value.ty().as_float() {
            Some(float) => visitor.visit_float(float.get(value.storage()), float.byte_size()),
            None => visit_missing_capability(visitor, value, "float access"),
        },
        Kind::String => match value.ty().as_string() {
            Some(string) => visitor.visit_string(string.get(value.storage())),
            None => visit_missing_capability(visitor, value, "string access"),
        },
        Kind::List => match value.ty().as_list() {
            Some(list) => visitor.visit_list(list.iter(value.storage())),
            None => visit_missing_capability(visitor, value, "list iteration"),
        },
        Kind::Map => match value.ty().as_map() {
            Some(map) => visitor.visit_map(map.iter(value.storage())),
            None => visit_missing_capability(visitor, value, "map iteration"),
        },
        Kind::Tuple => match value.ty().as_tuple() {
            Some(tuple) => {
                let mut members = Vec::with_capacity(tuple.member_count());
                for index in 0..tuple.member_count() {
                    members.push(tuple.get(value.storage(), index)?);
                }
                visitor.visit_tuple(tuple.class_name(), &members, tuple.element_names());
            }
            None => visit_missing_capability(visitor, value, "member access"),
        },
        Kind::Object => visitor.visit_object(),
        Kind::Pointer => match value.ty().as_pointer() {
            Some(pointer) => {
                visitor.visit_pointer(pointer.pointer_kind(), &pointer.pointed_type())
            }
            None => visit_missing_capability(visitor, value, "pointer access"),
        },
        Kind::Dynamic => {
            // The canonical Object pointer is a Dynamic-kind type, but
            // visitors see it as an object.
            if value.ty().info() == object_ptr_type().info() {
                visitor.visit_object();
            } else {
                match value.ty().as_dynamic().and_then(|d| d.get(value.storage())) {
                    Some(inner) => visitor.visit_dynamic(inner),
                    None => visit_missing_capability(visitor, value, "dynamic access"),
                }
            }
        }
        Kind::Raw => match value.ty().as_raw() {
            Some(raw) => visitor.visit_raw(raw.get(value.storage())),
            None => visit_missing_capability(visitor, value, "raw access"),
        },
        Kind::Iterator => visitor.visit_iterator(value),
        Kind::Unknown => visitor.visit_unknown(value),
    }
    Ok(())
}

fn visit_missing_capability<V: TypeVisitor>(
    visitor: &mut V,
    value: GenericValuePtr<'_>,
    operation: &str,
) {
    type_fail(&value.ty().info().as_string(), operation);
    visitor.visit_unknown(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{type_of, Buffer, ObjectPtr};
    use crate::value::GenericValue;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl TypeVisitor for Recorder {
        fn visit_void(&mut self) {
            self.seen.push("void".into());
        }

        fn visit_bool(&mut self, value: bool) {
            self.seen.push(format!("bool:{}", value));
        }

        fn visit_int(&mut self, value: i64, signed: bool, byte_size: usize) {
            self.seen.push(format!("int:{}:{}:{}", value, signed, byte_size));
        }

        fn visit_float(&mut self, value: f64, byte_size: usize) {
            self.seen.push(format!("float:{}:{}", value, byte_size));
        }

        fn visit_string(&mut self, value: &str) {
            self.seen.push(format!("string:{}", value));
        }

        fn visit_list(&mut self, elements: GenericIterator<'_>) {
            self.seen.push(format!("list:{}", elements.count()));
        }

        fn visit_map(&mut self, pairs: GenericIterator<'_>) {
            self.seen.push(format!("map:{}", pairs.count()));
        }

        fn visit_tuple(
            &mut self,
            class_name: &str,
            members: &[GenericValuePtr<'_>],
            _element_names: &[String],
        ) {
            self.seen.push(format!("tuple:{}:{}", class_name, members.len()));
        }

        fn visit_object(&mut self) {
            self.seen.push("object".into());
        }

        fn visit_pointer(&mut self, pointer_kind: PointerKind, _pointed: &Arc<dyn Type>) {
            self.seen.push(format!("pointer:{:?}", pointer_kind));
        }

        fn visit_dynamic(&mut self, inner: GenericValuePtr<'_>) {
            self.seen.push(format!("dynamic:{:?}", inner.kind()));
        }

        fn visit_raw(&mut self, data: &[u8]) {
            self.seen.push(format!("raw:{}", data.len()));
        }

        fn visit_iterator(&mut self, _value: GenericValuePtr<'_>) {
            self.seen.push("iterator".into());
        }

        fn visit_unknown(&mut self, _value: GenericValuePtr<'_>) {
            self.seen.push("unknown".into());
        }
    }

    fn dispatch_one(value: &GenericValue) -> String {
        let mut recorder = Recorder::default();
        type_dispatch(&mut recorder, value.as_ptr()).expect("dispatch");
        recorder.seen.join(",")
    }

    #[test]
    fn test_primitive_dispatch() {
        assert_eq!(dispatch_one(&GenericValue::void()), "void");
        assert_eq!(dispatch_one(&GenericValue::of(true)), "bool:true");
        assert_eq!(dispatch_one(&GenericValue::of(-3i16)), "int:-3:true:2");
        assert_eq!(dispatch_one(&GenericValue::of(7u64)), "int:7:false:8");
        assert_eq!(dispatch_one(&GenericValue::of(1.5f32)), "float:1.5:4");
        assert_eq!(
            dispatch_one(&GenericValue::of("hi".to_string())),
            "string:hi"
        );
        assert_eq!(
            dispatch_one(&GenericValue::of(Buffer::from_bytes(&[0, 1]))),
            "raw:2"
        );
    }

    #[test]
    fn test_dynamic_unwraps_one_layer() {
        let value = GenericValue::of(GenericValue::of(42i32));
        assert_eq!(dispatch_one(&value), "dynamic:Int");
    }

    #[test]
    fn test_canonical_object_ptr_visits_object() {
        let value = GenericValue::of(ObjectPtr::default());
        assert_eq!(dispatch_one(&value), "object");
    }

    #[test]
    fn test_shared_pointer_dispatch() {
        let ty = crate::types::SharedPointerType::make(type_of::<i32>());
        let value = GenericValue::new(&ty).expect("value");
        assert_eq!(dispatch_one(&value), "pointer:Shared");
    }
}
