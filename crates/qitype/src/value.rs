// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic (type, storage) value couples.
//!
//! [`GenericValue`] owns its storage and releases it through its type
//! on drop; [`GenericValuePtr`] and [`GenericValueRef`] borrow storage
//! that someone else keeps alive (shared and exclusive borrow
//! respectively). All generic algorithms (cloning, ordering, dispatch,
//! signature inference) are expressed over these couples.

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::signature::{signature_of, Signature};
use crate::types::{type_fail, type_of, StaticType, Storage, Type};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An owning (type, storage) couple.
pub struct GenericValue {
    ty: Arc<dyn Type>,
    storage: Storage,
}

impl GenericValue {
    /// Default-construct a value of the given type.
    pub fn new(ty: &Arc<dyn Type>) -> Result<GenericValue> {
        Ok(GenericValue {
            ty: ty.clone(),
            storage: ty.initialize_storage(None)?,
        })
    }

    /// Assemble a value from a type and a storage known to belong to it.
    pub fn from_parts(ty: Arc<dyn Type>, storage: Storage) -> GenericValue {
        GenericValue { ty, storage }
    }

    /// Wrap a native Rust value.
    pub fn of<T: StaticType>(value: T) -> GenericValue {
        GenericValue {
            ty: type_of::<T>(),
            storage: Box::new(value),
        }
    }

    /// The unit value.
    pub fn void() -> GenericValue {
        GenericValue::of(())
    }

    /// Descriptor of this value's type.
    pub fn ty(&self) -> &Arc<dyn Type> {
        &self.ty
    }

    /// Kind of this value's type.
    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    /// Borrow the storage handle.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Shared borrow of this value.
    pub fn as_ptr(&self) -> GenericValuePtr<'_> {
        GenericValuePtr {
            ty: self.ty.clone(),
            storage: &self.storage,
        }
    }

    /// Exclusive borrow of this value, for mutation.
    pub fn as_mut(&mut self) -> GenericValueRef<'_> {
        GenericValueRef {
            ty: self.ty.clone(),
            storage: &mut self.storage,
        }
    }

    /// Borrow the raw native value, if `T` is its actual representation.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.storage.downcast_ref::<T>()
    }

    /// Signature of this value (see [`signature_of`]).
    pub fn signature(&self, resolve_dynamic: bool) -> Signature {
        signature_of(self.as_ptr(), resolve_dynamic)
    }

    /// Give up ownership of the storage (used by adoption paths).
    pub fn into_storage(mut self) -> Storage {
        std::mem::replace(&mut self.storage, Box::new(()))
    }
}

impl Clone for GenericValue {
    fn clone(&self) -> Self {
        GenericValue {
            ty: self.ty.clone(),
            storage: self.ty.clone_storage(&self.storage),
        }
    }
}

impl Drop for GenericValue {
    fn drop(&mut self) {
        let storage = std::mem::replace(&mut self.storage, Box::new(()));
        self.ty.destroy(storage);
    }
}

impl fmt::Debug for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericValue")
            .field("type", &self.ty.info().as_string())
            .field("kind", &self.ty.kind())
            .finish()
    }
}

/// A borrowing (type, storage) couple. Holds no ownership; the
/// underlying value must outlive the borrow.
pub struct GenericValuePtr<'a> {
    ty: Arc<dyn Type>,
    storage: &'a Storage,
}

impl<'a> GenericValuePtr<'a> {
    /// Borrow a storage handle as a value of the given type.
    pub fn new(ty: Arc<dyn Type>, storage: &'a Storage) -> GenericValuePtr<'a> {
        GenericValuePtr { ty, storage }
    }

    /// Descriptor of this value's type.
    pub fn ty(&self) -> &Arc<dyn Type> {
        &self.ty
    }

    /// Kind of this value's type.
    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    /// The borrowed storage handle.
    pub fn storage(&self) -> &'a Storage {
        self.storage
    }

    /// Borrow the raw native value, if `T` is its actual representation.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.storage.downcast_ref::<T>()
    }

    /// Deep-copy into an owning value.
    pub fn to_value(&self) -> GenericValue {
        GenericValue {
            ty: self.ty.clone(),
            storage: self.ty.clone_storage(self.storage),
        }
    }

    /// Signature of this value (see [`signature_of`]).
    pub fn signature(&self, resolve_dynamic: bool) -> Signature {
        signature_of(self.clone(), resolve_dynamic)
    }

    /// Iterate a list or map value; empty for other kinds.
    pub fn iter(&self) -> GenericIterator<'a> {
        if let Some(list) = self.ty.as_list() {
            return list.iter(self.storage);
        }
        if let Some(map) = self.ty.as_map() {
            return map.iter(self.storage);
        }
        type_fail(&self.ty.info().as_string(), "iterate");
        GenericIterator::empty()
    }

    /// Borrow a tuple member.
    pub fn member(&self, index: usize) -> Result<GenericValuePtr<'a>> {
        match self.ty.as_tuple() {
            Some(tuple) => tuple.get(self.storage, index),
            None => {
                type_fail(&self.ty.info().as_string(), "member access");
                Err(Error::OutOfRange { index, len: 0 })
            }
        }
    }
}

impl Clone for GenericValuePtr<'_> {
    fn clone(&self) -> Self {
        GenericValuePtr {
            ty: self.ty.clone(),
            storage: self.storage,
        }
    }
}

impl fmt::Debug for GenericValuePtr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericValuePtr")
            .field("type", &self.ty.info().as_string())
            .field("kind", &self.ty.kind())
            .finish()
    }
}

/// An exclusively borrowing (type, storage) couple, used for the
/// mutating container operations.
pub struct GenericValueRef<'a> {
    ty: Arc<dyn Type>,
    storage: &'a mut Storage,
}

impl<'a> GenericValueRef<'a> {
    /// Borrow a storage handle mutably as a value of the given type.
    pub fn new(ty: Arc<dyn Type>, storage: &'a mut Storage) -> GenericValueRef<'a> {
        GenericValueRef { ty, storage }
    }

    /// Descriptor of this value's type.
    pub fn ty(&self) -> &Arc<dyn Type> {
        &self.ty
    }

    /// Shared reborrow.
    pub fn as_ptr(&self) -> GenericValuePtr<'_> {
        GenericValuePtr {
            ty: self.ty.clone(),
            storage: &*self.storage,
        }
    }

    /// Append a copy of `value` to a list.
    pub fn push_back(&mut self, value: GenericValuePtr<'_>) {
        match self.ty.as_list() {
            Some(list) => list.push_back(self.storage, value),
            None => type_fail(&self.ty.info().as_string(), "push_back"),
        }
    }

    /// Insert a copy of (`key`, `value`) into a map.
    pub fn insert(&mut self, key: GenericValuePtr<'_>, value: GenericValuePtr<'_>) {
        match self.ty.as_map() {
            Some(map) => map.insert(self.storage, key, value),
            None => type_fail(&self.ty.info().as_string(), "insert"),
        }
    }

    /// Borrow (and optionally auto-insert) a map value slot.
    pub fn map_element(
        &mut self,
        key: GenericValuePtr<'_>,
        auto_insert: bool,
    ) -> Result<Option<GenericValuePtr<'_>>> {
        match self.ty.as_map() {
            Some(map) => map.element(self.storage, key, auto_insert),
            None => {
                type_fail(&self.ty.info().as_string(), "map element access");
                Ok(None)
            }
        }
    }

    /// Replace a tuple member with a copy of `value`.
    pub fn set_member(&mut self, index: usize, value: GenericValuePtr<'_>) -> Result<()> {
        match self.ty.as_tuple() {
            Some(tuple) => tuple.set(self.storage, index, value),
            None => {
                type_fail(&self.ty.info().as_string(), "member assignment");
                Ok(())
            }
        }
    }

    /// Replace the wrapped value of a dynamic.
    pub fn set_dynamic(&mut self, value: GenericValuePtr<'_>) {
        match self.ty.as_dynamic() {
            Some(dynamic) => dynamic.set(self.storage, value),
            None => type_fail(&self.ty.info().as_string(), "dynamic assignment"),
        }
    }
}

impl fmt::Debug for GenericValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericValueRef")
            .field("type", &self.ty.info().as_string())
            .field("kind", &self.ty.kind())
            .finish()
    }
}

/// Cursor over the elements of a generic container.
///
/// List iteration yields the elements in insertion order; map
/// iteration yields (key, value) pairs as tuple values in key order.
pub struct GenericIterator<'a> {
    inner: Box<dyn Iterator<Item = GenericValuePtr<'a>> + 'a>,
}

impl<'a> GenericIterator<'a> {
    /// Wrap a container-provided cursor.
    pub fn new(inner: impl Iterator<Item = GenericValuePtr<'a>> + 'a) -> GenericIterator<'a> {
        GenericIterator {
            inner: Box::new(inner),
        }
    }

    /// An exhausted cursor.
    pub fn empty() -> GenericIterator<'a> {
        GenericIterator {
            inner: Box::new(std::iter::empty()),
        }
    }
}

impl<'a> Iterator for GenericIterator<'a> {
    type Item = GenericValuePtr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
