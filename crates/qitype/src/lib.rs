// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # qitype - dynamic type and value system
//!
//! The runtime type core of a cross-process messaging middleware:
//! compile-time type information is erased into portable descriptors,
//! and generic algorithms (clone, destroy, compare, iterate, element
//! access) are recovered for arbitrary types behind a uniform
//! interface.
//!
//! ## Quick Start
//!
//! ```rust
//! use qitype::{make_list_type, type_of, GenericValue};
//!
//! // a list type synthesized at runtime
//! let ty = make_list_type(type_of::<i32>());
//! let mut list = GenericValue::new(&ty)?;
//!
//! for v in [1i32, 2, 3] {
//!     let element = GenericValue::of(v);
//!     list.as_mut().push_back(element.as_ptr());
//! }
//!
//! // the canonical wire-portable descriptor of the value
//! assert_eq!(list.signature(false).to_string(), "[i]");
//! # Ok::<(), qitype::Error>(())
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Type`] | Capability descriptor for one runtime type |
//! | [`TypeInfo`] | Identity token (native or named) |
//! | [`GenericValue`] | Owning (type, storage) couple |
//! | [`GenericValuePtr`] | Borrowing (type, storage) couple |
//! | [`Signature`] | Canonical string descriptor, portable across processes |
//!
//! ## Modules Overview
//!
//! - [`types`] - the `Type` trait, kind sub-traits and built-in descriptors
//! - [`value`] - owning and borrowing generic values, generic iterators
//! - [`registry`] - process-wide identity-to-descriptor registry
//! - [`signature`] - signature grammar, convertibility and inference
//! - [`factory`] - synthesized list/map/tuple types, signature-to-type bridge
//! - [`dispatch`] - kind-directed visitor over generic values
//!
//! Logging goes through the `log` facade under the `qitype.*` targets;
//! set `QITYPE_DEBUG` to a non-empty value to lower the threshold from
//! info to debug (see [`logging`]).

/// Kind-directed dispatch over generic values.
pub mod dispatch;
/// Error types surfaced by the dynamic type system.
pub mod error;
/// Synthesized containers and the signature-to-type bridge.
pub mod factory;
/// Coarse classification of runtime types.
pub mod kind;
/// Console logging for the `qitype.*` log targets.
pub mod logging;
/// Process-wide type registry.
pub mod registry;
/// Canonical string descriptors for runtime types.
pub mod signature;
/// Identity tokens for runtime types.
pub mod type_info;
/// Runtime type descriptors and built-in types.
pub mod types;
/// Generic (type, storage) value couples.
pub mod value;

pub use dispatch::{type_dispatch, TypeVisitor};
pub use error::{Error, Result};
pub use factory::{
    make_generic_tuple, make_generic_tuple_ptr, make_list_type, make_map_type, make_tuple_type,
    type_from_signature,
};
pub use kind::Kind;
pub use registry::{get_type, register_type};
pub use signature::{signature_of, Signature, SignatureItem, TypeCode};
pub use type_info::TypeInfo;
pub use types::{
    same_type, type_fail, type_of, Buffer, DynamicType, FloatType, IntType, ListType, MapType,
    Object, ObjectPtr, PointerKind, PointerType, RawType, SharedPointerType, StaticType, Storage,
    StringType, TupleType, Type, UnknownType,
};
pub use value::{GenericIterator, GenericValue, GenericValuePtr, GenericValueRef};

#[cfg(test)]
mod tests;
