// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signature inference over generic values.
//!
//! Without dynamic resolution the declared signature of the value's
//! type is the answer and no storage is touched. With it, the value is
//! dispatched and collections are narrowed to the signature their
//! actual content supports: elements unify along the convertibility
//! rules, and a collection whose elements cannot be reconciled falls
//! back to the declared element type.

use crate::dispatch::{type_dispatch, TypeVisitor};
use crate::kind::Kind;
use crate::logging::SIGNATURE_TARGET;
use crate::signature::{tuple_annotation, Signature, TypeCode};
use crate::types::{PointerKind, Type};
use crate::value::{GenericIterator, GenericValuePtr};
use std::sync::Arc;

/// Signature of `value`.
///
/// With `resolve_dynamic`, dynamic wrappers are looked through and
/// collection element types are unified from the actual elements;
/// without it, the declared signature of the value's type is returned
/// (valid even for a value with untouched storage).
pub fn signature_of(value: GenericValuePtr<'_>, resolve_dynamic: bool) -> Signature {
    if !resolve_dynamic {
        return value.ty().signature();
    }
    let mut visitor = SignatureVisitor {
        value: value.clone(),
        result: Signature::invalid(),
    };
    match type_dispatch(&mut visitor, value) {
        Ok(()) => visitor.result,
        Err(_) => Signature::invalid(),
    }
}

struct SignatureVisitor<'a> {
    value: GenericValuePtr<'a>,
    result: Signature,
}

impl SignatureVisitor<'_> {
    fn declared_list_element(&self) -> Signature {
        self.value
            .ty()
            .as_list()
            .map(|list| list.element_type().signature())
            .unwrap_or_else(Signature::invalid)
    }

    fn declared_map_types(&self) -> (Signature, Signature) {
        match self.value.ty().as_map() {
            Some(map) => (map.key_type().signature(), map.element_type().signature()),
            None => (Signature::invalid(), Signature::invalid()),
        }
    }
}

/// Unify a running element signature with the next element's.
///
/// Keeps the wider of the two along the convertibility rules; two
/// irreconcilable signatures yield the invalid sentinel, which stops
/// the narrowing.
fn reconcile(running: Signature, next: Signature, what: &str) -> Signature {
    if next == running {
        return running;
    }
    if next.is_convertible_to(&running) {
        running
    } else if running.is_convertible_to(&next) {
        next
    } else {
        log::debug!(
            target: SIGNATURE_TARGET,
            "Heterogeneous {} {} {}",
            what,
            running,
            next
        );
        Signature::invalid()
    }
}

impl TypeVisitor for SignatureVisitor<'_> {
    fn visit_void(&mut self) {
        self.result = Signature::from_code(TypeCode::Void);
    }

    fn visit_bool(&mut self, _value: bool) {
        self.result = Signature::from_code(TypeCode::Bool);
    }

    fn visit_int(&mut self, _value: i64, signed: bool, byte_size: usize) {
        let code = match (signed, byte_size) {
            (_, 0) => TypeCode::Bool,
            (true, 1) => TypeCode::Int8,
            (false, 1) => TypeCode::UInt8,
            (true, 2) => TypeCode::Int16,
            (false, 2) => TypeCode::UInt16,
            (true, 4) => TypeCode::Int32,
            (false, 4) => TypeCode::UInt32,
            (true, 8) => TypeCode::Int64,
            (false, 8) => TypeCode::UInt64,
            _ => TypeCode::Unknown,
        };
        self.result = Signature::from_code(code);
    }

    fn visit_float(&mut self, _value: f64, byte_size: usize) {
        self.result = Signature::from_code(if byte_size == 4 {
            TypeCode::Float
        } else {
            TypeCode::Double
        });
    }

    fn visit_string(&mut self, _value: &str) {
        self.result = Signature::from_code(TypeCode::String);
    }

    fn visit_list(&mut self, mut elements: GenericIterator<'_>) {
        let declared = self.declared_list_element();
        let first = match elements.next() {
            None => {
                self.result = Signature::list_of(&Signature::from_code(TypeCode::None));
                return;
            }
            Some(element) => element,
        };
        let mut running = signature_of(first, true);
        for element in elements {
            if !running.is_valid() {
                break;
            }
            running = reconcile(running, signature_of(element, true), "elements");
        }
        self.result = Signature::list_of(if running.is_valid() { &running } else { &declared });
    }

    fn visit_map(&mut self, mut pairs: GenericIterator<'_>) {
        let (declared_key, declared_value) = self.declared_map_types();
        let first = match pairs.next() {
            None => {
                let none = Signature::from_code(TypeCode::None);
                self.result = Signature::map_of(&none, &none);
                return;
            }
            Some(pair) => pair,
        };
        let (Ok(first_key), Ok(first_value)) = (first.member(0), first.member(1)) else {
            self.result = Signature::map_of(&declared_key, &declared_value);
            return;
        };
        let mut key_sig = signature_of(first_key, true);
        let mut value_sig = signature_of(first_value, true);
        for pair in pairs {
            let (Ok(key), Ok(value)) = (pair.member(0), pair.member(1)) else {
                continue;
            };
            if key_sig.is_valid() {
                key_sig = reconcile(key_sig, signature_of(key, true), "keys");
            }
            if value_sig.is_valid() {
                value_sig = reconcile(value_sig, signature_of(value, true), "values");
            }
        }
        self.result = Signature::map_of(
            if key_sig.is_valid() { &key_sig } else { &declared_key },
            if value_sig.is_valid() {
                &value_sig
            } else {
                &declared_value
            },
        );
    }

    fn visit_tuple(
        &mut self,
        class_name: &str,
        members: &[GenericValuePtr<'_>],
        element_names: &[String],
    ) {
        let member_sigs: Vec<Signature> = members
            .iter()
            .map(|member| signature_of(member.clone(), true))
            .collect();
        let annotation = tuple_annotation(class_name, element_names, members.len());
        self.result = Signature::tuple_of(&member_sigs, annotation);
    }

    fn visit_object(&mut self) {
        self.result = Signature::from_code(TypeCode::Object);
    }

    fn visit_pointer(&mut self, pointer_kind: PointerKind, pointed: &Arc<dyn Type>) {
        if pointer_kind == PointerKind::Shared
            && matches!(pointed.kind(), Kind::Object | Kind::Unknown)
        {
            if pointed.kind() != Kind::Object {
                log::debug!(
                    target: SIGNATURE_TARGET,
                    "Shared pointer to unknown type {}, assuming object not yet registered",
                    pointed.info().as_string()
                );
            }
            self.result = Signature::from_code(TypeCode::Object);
        } else {
            log::debug!(
                target: SIGNATURE_TARGET,
                "Pointer to type {}, signature is X",
                pointed.info().as_string()
            );
            self.result = Signature::from_code(TypeCode::Unknown);
        }
    }

    fn visit_dynamic(&mut self, inner: GenericValuePtr<'_>) {
        self.result = signature_of(inner, true);
    }

    fn visit_raw(&mut self, _data: &[u8]) {
        self.result = Signature::from_code(TypeCode::Raw);
    }

    fn visit_iterator(&mut self, _value: GenericValuePtr<'_>) {
        self.result = Signature::from_code(TypeCode::Unknown);
    }

    fn visit_unknown(&mut self, _value: GenericValuePtr<'_>) {
        self.result = Signature::from_code(TypeCode::Unknown);
    }
}
