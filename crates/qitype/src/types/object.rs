// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object handles, pointer descriptors and the unknown-type descriptor.
//!
//! An [`Object`] stands for a remote service object; method dispatch
//! lives entirely in the RPC layer, this core only needs its identity
//! and lifecycle. [`ObjectPtr`] is the canonical shared handle whose
//! declared signature is `o`.

use crate::error::Result;
use crate::kind::Kind;
use crate::logging::TYPE_TARGET;
use crate::signature::{Signature, TypeCode};
use crate::type_info::TypeInfo;
use crate::types::{
    adopt_storage, type_fail, PointerKind, PointerType, Storage, Type,
};
use crate::value::{GenericValue, GenericValuePtr};
use std::sync::Arc;

/// A remote service object, identified by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    name: String,
}

impl Object {
    /// Object with the given service name.
    pub fn named(name: impl Into<String>) -> Object {
        Object { name: name.into() }
    }

    /// Service name of this object.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Shared handle to a remote service object.
#[derive(Debug, Clone, Default)]
pub struct ObjectPtr {
    inner: Arc<Object>,
}

impl ObjectPtr {
    /// Handle owning the given object.
    pub fn new(object: Object) -> ObjectPtr {
        ObjectPtr {
            inner: Arc::new(object),
        }
    }

    /// The pointed-to object.
    pub fn object(&self) -> &Object {
        &self.inner
    }
}

/// Descriptor of a bare [`Object`] value.
pub(crate) struct ObjectType;

impl Type for ObjectType {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<Object>()
    }

    fn kind(&self) -> Kind {
        Kind::Object
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Object)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<Object>(seed, &self.info()),
            None => Ok(Box::new(Object::default())),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<Object>() {
            Some(object) => Box::new(object.clone()),
            None => {
                type_fail(&self.info().as_string(), "clone");
                Box::new(Object::default())
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<Object>(), b.downcast_ref::<Object>()) {
            (Some(a), Some(b)) => a.name() < b.name(),
            _ => {
                type_fail(&self.info().as_string(), "less");
                false
            }
        }
    }
}

/// Descriptor of the canonical Object pointer.
///
/// It is a Dynamic-kind type (the wrapped content is only known at
/// runtime) with a declared signature of `o`; the dispatcher
/// special-cases it so visitors see an object, not a dynamic.
pub(crate) struct ObjectPtrType;

impl Type for ObjectPtrType {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<ObjectPtr>()
    }

    fn kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Object)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<ObjectPtr>(seed, &self.info()),
            None => Ok(Box::new(ObjectPtr::default())),
        }
    }

    // Handles share the pointee.
    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<ObjectPtr>() {
            Some(ptr) => Box::new(ptr.clone()),
            None => {
                type_fail(&self.info().as_string(), "clone");
                Box::new(ObjectPtr::default())
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<ObjectPtr>(), b.downcast_ref::<ObjectPtr>()) {
            (Some(a), Some(b)) => Arc::as_ptr(&a.inner) < Arc::as_ptr(&b.inner),
            _ => {
                type_fail(&self.info().as_string(), "less");
                false
            }
        }
    }
}

/// Descriptor for a type the runtime has no useful description of,
/// identified only by name.
pub struct UnknownType {
    info: TypeInfo,
}

impl UnknownType {
    /// Descriptor with the given opaque identity.
    pub fn named(name: impl Into<String>) -> Arc<dyn Type> {
        Arc::new(UnknownType {
            info: TypeInfo::named(name),
        })
    }
}

impl Type for UnknownType {
    fn info(&self) -> TypeInfo {
        self.info.clone()
    }

    fn kind(&self) -> Kind {
        Kind::Unknown
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Unknown)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => Ok(seed),
            None => {
                type_fail(&self.info.as_string(), "initialize_storage");
                Ok(Box::new(()))
            }
        }
    }

    fn clone_storage(&self, _storage: &Storage) -> Storage {
        type_fail(&self.info.as_string(), "clone");
        Box::new(())
    }

    fn less(&self, _a: &Storage, _b: &Storage) -> bool {
        false
    }
}

/// Shared-pointer descriptor over an arbitrary pointed-to type.
///
/// The storage is a reference-counted handle to the pointee; cloning
/// shares it. A shared pointer to an Object (or to a type not yet
/// registered) is how remote objects travel, so its declared signature
/// is `o`; every other pointee yields `X`.
pub struct SharedPointerType {
    pointed: Arc<dyn Type>,
    info: TypeInfo,
}

impl SharedPointerType {
    /// Descriptor of a shared pointer to `pointed`.
    pub fn make(pointed: Arc<dyn Type>) -> Arc<dyn Type> {
        let info = TypeInfo::named(format!("SharedPointer<{}>", pointed.info().as_string()));
        Arc::new(SharedPointerType { pointed, info })
    }
}

impl Type for SharedPointerType {
    fn info(&self) -> TypeInfo {
        self.info.clone()
    }

    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn signature(&self) -> Signature {
        match self.pointed.kind() {
            Kind::Object => Signature::from_code(TypeCode::Object),
            Kind::Unknown => {
                log::debug!(
                    target: TYPE_TARGET,
                    "Shared pointer to unknown type {}, assuming object not yet registered",
                    self.pointed.info().as_string()
                );
                Signature::from_code(TypeCode::Object)
            }
            _ => {
                log::debug!(
                    target: TYPE_TARGET,
                    "Pointer to type {}, signature is X",
                    self.pointed.info().as_string()
                );
                Signature::from_code(TypeCode::Unknown)
            }
        }
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<Arc<GenericValue>>(seed, &self.info),
            None => Ok(Box::new(Arc::new(GenericValue::new(&self.pointed)?))),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<Arc<GenericValue>>() {
            Some(pointee) => Box::new(pointee.clone()),
            None => {
                type_fail(&self.info.as_string(), "clone");
                Box::new(())
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (
            a.downcast_ref::<Arc<GenericValue>>(),
            b.downcast_ref::<Arc<GenericValue>>(),
        ) {
            (Some(a), Some(b)) => Arc::as_ptr(a) < Arc::as_ptr(b),
            _ => {
                type_fail(&self.info.as_string(), "less");
                false
            }
        }
    }

    fn as_pointer(&self) -> Option<&dyn PointerType> {
        Some(self)
    }
}

impl PointerType for SharedPointerType {
    fn pointed_type(&self) -> Arc<dyn Type> {
        self.pointed.clone()
    }

    fn pointer_kind(&self) -> PointerKind {
        PointerKind::Shared
    }

    fn dereference<'a>(&self, storage: &'a Storage) -> Option<GenericValuePtr<'a>> {
        storage
            .downcast_ref::<Arc<GenericValue>>()
            .map(|pointee| pointee.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::type_of;

    #[test]
    fn test_object_ptr_declares_object_signature() {
        let ty = type_of::<ObjectPtr>();
        assert_eq!(ty.kind(), Kind::Dynamic);
        assert_eq!(ty.signature().to_string(), "o");
    }

    #[test]
    fn test_shared_pointer_to_object() {
        let ty = SharedPointerType::make(Arc::new(ObjectType));
        assert_eq!(ty.kind(), Kind::Pointer);
        assert_eq!(ty.signature().to_string(), "o");
    }

    #[test]
    fn test_shared_pointer_to_unknown_assumes_object() {
        let ty = SharedPointerType::make(UnknownType::named("ext.NotRegistered"));
        assert_eq!(ty.signature().to_string(), "o");
    }

    #[test]
    fn test_shared_pointer_to_plain_type_is_unknown() {
        let ty = SharedPointerType::make(type_of::<i32>());
        assert_eq!(ty.signature().to_string(), "X");
    }

    #[test]
    fn test_shared_pointer_dereference() {
        let ty = SharedPointerType::make(type_of::<i32>());
        let storage = ty.initialize_storage(None).expect("storage");
        let pointer = ty.as_pointer().expect("pointer capability");
        assert_eq!(pointer.pointer_kind(), PointerKind::Shared);
        let pointee = pointer.dereference(&storage).expect("pointee");
        assert_eq!(pointee.downcast_ref::<i32>(), Some(&0));
    }

    #[test]
    fn test_shared_pointer_clone_shares_pointee() {
        let ty = SharedPointerType::make(type_of::<i32>());
        let storage = ty.initialize_storage(None).expect("storage");
        let copy = ty.clone_storage(&storage);
        let a = storage.downcast_ref::<Arc<GenericValue>>().expect("arc");
        let b = copy.downcast_ref::<Arc<GenericValue>>().expect("arc");
        assert!(Arc::ptr_eq(a, b));
    }
}
