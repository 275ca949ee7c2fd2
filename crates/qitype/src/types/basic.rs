// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in type descriptors for the native Rust types.
//!
//! One canonical descriptor exists per built-in type, created lazily
//! and shared process-wide. [`type_of`] resolves a compile-time Rust
//! type to its canonical descriptor through the [`StaticType`] trait.

use crate::error::Result;
use crate::kind::Kind;
use crate::signature::{Signature, TypeCode};
use crate::type_info::TypeInfo;
use crate::types::object::{ObjectPtrType, ObjectType};
use crate::types::{
    adopt_storage, type_fail, DynamicType, FloatType, IntType, RawType, Storage, StringType, Type,
};
use crate::value::{GenericValue, GenericValuePtr};
use std::sync::{Arc, OnceLock};

/// Rust types with a canonical runtime descriptor.
pub trait StaticType: std::any::Any + Send + Sync + Sized {
    /// The canonical descriptor for this type.
    fn static_type() -> Arc<dyn Type>;
}

/// Canonical descriptor for the compile-time type `T`.
pub fn type_of<T: StaticType>() -> Arc<dyn Type> {
    T::static_type()
}

/// Opaque byte buffer, the value form of the `r` (Raw) signature code.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Empty buffer.
    pub fn new() -> Buffer {
        Buffer::default()
    }

    /// Buffer holding a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> Buffer {
        Buffer {
            data: data.to_vec(),
        }
    }

    /// Borrow the content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Primitive descriptors
// ---------------------------------------------------------------------------

struct VoidType;

impl Type for VoidType {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<()>()
    }

    fn kind(&self) -> Kind {
        Kind::Void
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Void)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<()>(seed, &self.info()),
            None => Ok(Box::new(())),
        }
    }

    fn clone_storage(&self, _storage: &Storage) -> Storage {
        Box::new(())
    }

    fn less(&self, _a: &Storage, _b: &Storage) -> bool {
        false
    }
}

macro_rules! int_type {
    ($name:ident, $native:ty, $signed:expr, $size:expr, $kind:expr, $code:expr) => {
        struct $name;

        impl Type for $name {
            fn info(&self) -> TypeInfo {
                TypeInfo::of::<$native>()
            }

            fn kind(&self) -> Kind {
                $kind
            }

            fn signature(&self) -> Signature {
                Signature::from_code($code)
            }

            fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
                match seed {
                    Some(seed) => adopt_storage::<$native>(seed, &self.info()),
                    None => Ok(Box::new(<$native>::default())),
                }
            }

            fn clone_storage(&self, storage: &Storage) -> Storage {
                match storage.downcast_ref::<$native>() {
                    Some(value) => Box::new(*value),
                    None => {
                        type_fail(&self.info().as_string(), "clone");
                        Box::new(<$native>::default())
                    }
                }
            }

            fn less(&self, a: &Storage, b: &Storage) -> bool {
                match (a.downcast_ref::<$native>(), b.downcast_ref::<$native>()) {
                    (Some(a), Some(b)) => a < b,
                    _ => {
                        type_fail(&self.info().as_string(), "less");
                        false
                    }
                }
            }

            fn as_int(&self) -> Option<&dyn IntType> {
                Some(self)
            }
        }

        impl IntType for $name {
            fn is_signed(&self) -> bool {
                $signed
            }

            fn byte_size(&self) -> usize {
                $size
            }

            fn get(&self, storage: &Storage) -> i64 {
                match storage.downcast_ref::<$native>() {
                    Some(value) => *value as i64,
                    None => {
                        type_fail(&self.info().as_string(), "get");
                        0
                    }
                }
            }

            fn set(&self, storage: &mut Storage, value: i64) {
                match storage.downcast_mut::<$native>() {
                    Some(slot) => *slot = value as $native,
                    None => type_fail(&self.info().as_string(), "set"),
                }
            }
        }
    };
}

int_type!(Int8Type, i8, true, 1, Kind::Int, TypeCode::Int8);
int_type!(UInt8Type, u8, false, 1, Kind::Int, TypeCode::UInt8);
int_type!(Int16Type, i16, true, 2, Kind::Int, TypeCode::Int16);
int_type!(UInt16Type, u16, false, 2, Kind::Int, TypeCode::UInt16);
int_type!(Int32Type, i32, true, 4, Kind::Int, TypeCode::Int32);
int_type!(UInt32Type, u32, false, 4, Kind::Int, TypeCode::UInt32);
int_type!(Int64Type, i64, true, 8, Kind::Int, TypeCode::Int64);
int_type!(UInt64Type, u64, false, 8, Kind::Int, TypeCode::UInt64);

// A boolean is a zero-width integer for dispatch purposes.
struct BoolType;

impl Type for BoolType {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<bool>()
    }

    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Bool)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<bool>(seed, &self.info()),
            None => Ok(Box::new(false)),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<bool>() {
            Some(value) => Box::new(*value),
            None => {
                type_fail(&self.info().as_string(), "clone");
                Box::new(false)
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<bool>(), b.downcast_ref::<bool>()) {
            (Some(a), Some(b)) => a < b,
            _ => {
                type_fail(&self.info().as_string(), "less");
                false
            }
        }
    }

    fn as_int(&self) -> Option<&dyn IntType> {
        Some(self)
    }
}

impl IntType for BoolType {
    fn is_signed(&self) -> bool {
        true
    }

    fn byte_size(&self) -> usize {
        0
    }

    fn get(&self, storage: &Storage) -> i64 {
        match storage.downcast_ref::<bool>() {
            Some(value) => i64::from(*value),
            None => {
                type_fail(&self.info().as_string(), "get");
                0
            }
        }
    }

    fn set(&self, storage: &mut Storage, value: i64) {
        match storage.downcast_mut::<bool>() {
            Some(slot) => *slot = value != 0,
            None => type_fail(&self.info().as_string(), "set"),
        }
    }
}

macro_rules! float_type {
    ($name:ident, $native:ty, $size:expr, $code:expr) => {
        struct $name;

        impl Type for $name {
            fn info(&self) -> TypeInfo {
                TypeInfo::of::<$native>()
            }

            fn kind(&self) -> Kind {
                Kind::Float
            }

            fn signature(&self) -> Signature {
                Signature::from_code($code)
            }

            fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
                match seed {
                    Some(seed) => adopt_storage::<$native>(seed, &self.info()),
                    None => Ok(Box::new(<$native>::default())),
                }
            }

            fn clone_storage(&self, storage: &Storage) -> Storage {
                match storage.downcast_ref::<$native>() {
                    Some(value) => Box::new(*value),
                    None => {
                        type_fail(&self.info().as_string(), "clone");
                        Box::new(<$native>::default())
                    }
                }
            }

            fn less(&self, a: &Storage, b: &Storage) -> bool {
                match (a.downcast_ref::<$native>(), b.downcast_ref::<$native>()) {
                    (Some(a), Some(b)) => a < b,
                    _ => {
                        type_fail(&self.info().as_string(), "less");
                        false
                    }
                }
            }

            fn as_float(&self) -> Option<&dyn FloatType> {
                Some(self)
            }
        }

        impl FloatType for $name {
            fn byte_size(&self) -> usize {
                $size
            }

            fn get(&self, storage: &Storage) -> f64 {
                match storage.downcast_ref::<$native>() {
                    Some(value) => *value as f64,
                    None => {
                        type_fail(&self.info().as_string(), "get");
                        0.0
                    }
                }
            }

            fn set(&self, storage: &mut Storage, value: f64) {
                match storage.downcast_mut::<$native>() {
                    Some(slot) => *slot = value as $native,
                    None => type_fail(&self.info().as_string(), "set"),
                }
            }
        }
    };
}

float_type!(Float32Type, f32, 4, TypeCode::Float);
float_type!(Float64Type, f64, 8, TypeCode::Double);

struct StringTypeImpl;

impl Type for StringTypeImpl {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<String>()
    }

    fn kind(&self) -> Kind {
        Kind::String
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::String)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<String>(seed, &self.info()),
            None => Ok(Box::new(String::new())),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<String>() {
            Some(value) => Box::new(value.clone()),
            None => {
                type_fail(&self.info().as_string(), "clone");
                Box::new(String::new())
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<String>(), b.downcast_ref::<String>()) {
            (Some(a), Some(b)) => a < b,
            _ => {
                type_fail(&self.info().as_string(), "less");
                false
            }
        }
    }

    fn as_string(&self) -> Option<&dyn StringType> {
        Some(self)
    }
}

impl StringType for StringTypeImpl {
    fn get<'a>(&self, storage: &'a Storage) -> &'a str {
        match storage.downcast_ref::<String>() {
            Some(value) => value,
            None => {
                type_fail(&self.info().as_string(), "get");
                ""
            }
        }
    }

    fn set(&self, storage: &mut Storage, value: &str) {
        match storage.downcast_mut::<String>() {
            Some(slot) => {
                slot.clear();
                slot.push_str(value);
            }
            None => type_fail(&self.info().as_string(), "set"),
        }
    }
}

/// Descriptor of the dynamic wrapper: a value holding a value of any
/// type ([`GenericValue`] as a value).
struct DynamicTypeImpl;

impl Type for DynamicTypeImpl {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<GenericValue>()
    }

    fn kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Dynamic)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<GenericValue>(seed, &self.info()),
            None => Ok(Box::new(GenericValue::void())),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<GenericValue>() {
            Some(inner) => Box::new(inner.clone()),
            None => {
                type_fail(&self.info().as_string(), "clone");
                Box::new(GenericValue::void())
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (
            a.downcast_ref::<GenericValue>(),
            b.downcast_ref::<GenericValue>(),
        ) {
            (Some(a), Some(b)) => {
                if a.ty().info() == b.ty().info() {
                    a.ty().less(a.storage(), b.storage())
                } else {
                    a.ty().info() < b.ty().info()
                }
            }
            _ => {
                type_fail(&self.info().as_string(), "less");
                false
            }
        }
    }

    fn as_dynamic(&self) -> Option<&dyn DynamicType> {
        Some(self)
    }
}

impl DynamicType for DynamicTypeImpl {
    fn get<'a>(&self, storage: &'a Storage) -> Option<GenericValuePtr<'a>> {
        match storage.downcast_ref::<GenericValue>() {
            Some(inner) => Some(inner.as_ptr()),
            None => {
                type_fail(&self.info().as_string(), "get");
                None
            }
        }
    }

    fn set(&self, storage: &mut Storage, value: GenericValuePtr<'_>) {
        match storage.downcast_mut::<GenericValue>() {
            Some(inner) => *inner = value.to_value(),
            None => type_fail(&self.info().as_string(), "set"),
        }
    }
}

struct RawTypeImpl;

impl Type for RawTypeImpl {
    fn info(&self) -> TypeInfo {
        TypeInfo::of::<Buffer>()
    }

    fn kind(&self) -> Kind {
        Kind::Raw
    }

    fn signature(&self) -> Signature {
        Signature::from_code(TypeCode::Raw)
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<Buffer>(seed, &self.info()),
            None => Ok(Box::new(Buffer::new())),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<Buffer>() {
            Some(value) => Box::new(value.clone()),
            None => {
                type_fail(&self.info().as_string(), "clone");
                Box::new(Buffer::new())
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<Buffer>(), b.downcast_ref::<Buffer>()) {
            (Some(a), Some(b)) => a < b,
            _ => {
                type_fail(&self.info().as_string(), "less");
                false
            }
        }
    }

    fn as_raw(&self) -> Option<&dyn RawType> {
        Some(self)
    }
}

impl RawType for RawTypeImpl {
    fn get<'a>(&self, storage: &'a Storage) -> &'a [u8] {
        match storage.downcast_ref::<Buffer>() {
            Some(value) => value.as_bytes(),
            None => {
                type_fail(&self.info().as_string(), "get");
                &[]
            }
        }
    }

    fn set(&self, storage: &mut Storage, data: &[u8]) {
        match storage.downcast_mut::<Buffer>() {
            Some(slot) => *slot = Buffer::from_bytes(data),
            None => type_fail(&self.info().as_string(), "set"),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical instances
// ---------------------------------------------------------------------------

struct Builtins {
    void: Arc<dyn Type>,
    boolean: Arc<dyn Type>,
    int8: Arc<dyn Type>,
    uint8: Arc<dyn Type>,
    int16: Arc<dyn Type>,
    uint16: Arc<dyn Type>,
    int32: Arc<dyn Type>,
    uint32: Arc<dyn Type>,
    int64: Arc<dyn Type>,
    uint64: Arc<dyn Type>,
    float32: Arc<dyn Type>,
    float64: Arc<dyn Type>,
    string: Arc<dyn Type>,
    dynamic: Arc<dyn Type>,
    raw: Arc<dyn Type>,
    object: Arc<dyn Type>,
    object_ptr: Arc<dyn Type>,
}

static BUILTINS: OnceLock<Builtins> = OnceLock::new();

fn builtins() -> &'static Builtins {
    BUILTINS.get_or_init(|| Builtins {
        void: Arc::new(VoidType),
        boolean: Arc::new(BoolType),
        int8: Arc::new(Int8Type),
        uint8: Arc::new(UInt8Type),
        int16: Arc::new(Int16Type),
        uint16: Arc::new(UInt16Type),
        int32: Arc::new(Int32Type),
        uint32: Arc::new(UInt32Type),
        int64: Arc::new(Int64Type),
        uint64: Arc::new(UInt64Type),
        float32: Arc::new(Float32Type),
        float64: Arc::new(Float64Type),
        string: Arc::new(StringTypeImpl),
        dynamic: Arc::new(DynamicTypeImpl),
        raw: Arc::new(RawTypeImpl),
        object: Arc::new(ObjectType),
        object_ptr: Arc::new(ObjectPtrType),
    })
}

/// Canonical descriptor of the Object pointer (declared signature `o`).
pub(crate) fn object_ptr_type() -> Arc<dyn Type> {
    builtins().object_ptr.clone()
}

/// All built-in descriptors, used to seed the global registry.
pub(crate) fn builtin_types() -> Vec<Arc<dyn Type>> {
    let b = builtins();
    vec![
        b.void.clone(),
        b.boolean.clone(),
        b.int8.clone(),
        b.uint8.clone(),
        b.int16.clone(),
        b.uint16.clone(),
        b.int32.clone(),
        b.uint32.clone(),
        b.int64.clone(),
        b.uint64.clone(),
        b.float32.clone(),
        b.float64.clone(),
        b.string.clone(),
        b.dynamic.clone(),
        b.raw.clone(),
        b.object.clone(),
        b.object_ptr.clone(),
    ]
}

macro_rules! impl_static_type {
    ($native:ty, $field:ident) => {
        impl StaticType for $native {
            fn static_type() -> Arc<dyn Type> {
                builtins().$field.clone()
            }
        }
    };
}

impl_static_type!((), void);
impl_static_type!(bool, boolean);
impl_static_type!(i8, int8);
impl_static_type!(u8, uint8);
impl_static_type!(i16, int16);
impl_static_type!(u16, uint16);
impl_static_type!(i32, int32);
impl_static_type!(u32, uint32);
impl_static_type!(i64, int64);
impl_static_type!(u64, uint64);
impl_static_type!(f32, float32);
impl_static_type!(f64, float64);
impl_static_type!(String, string);
impl_static_type!(GenericValue, dynamic);
impl_static_type!(Buffer, raw);
impl_static_type!(crate::types::object::ObjectPtr, object_ptr);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_instances_are_shared() {
        assert!(Arc::ptr_eq(&type_of::<i32>(), &type_of::<i32>()));
        assert!(!Arc::ptr_eq(&type_of::<i32>(), &type_of::<i64>()));
    }

    #[test]
    fn test_declared_signatures() {
        let cases: Vec<(Arc<dyn Type>, &str)> = vec![
            (type_of::<()>(), "v"),
            (type_of::<bool>(), "b"),
            (type_of::<i8>(), "c"),
            (type_of::<u8>(), "C"),
            (type_of::<i16>(), "w"),
            (type_of::<u16>(), "W"),
            (type_of::<i32>(), "i"),
            (type_of::<u32>(), "I"),
            (type_of::<i64>(), "l"),
            (type_of::<u64>(), "L"),
            (type_of::<f32>(), "f"),
            (type_of::<f64>(), "d"),
            (type_of::<String>(), "s"),
            (type_of::<GenericValue>(), "m"),
            (type_of::<Buffer>(), "r"),
        ];
        for (ty, expected) in cases {
            assert_eq!(ty.signature().to_string(), expected);
        }
    }

    #[test]
    fn test_int_access() {
        let ty = type_of::<i16>();
        let int = ty.as_int().expect("int capability");
        assert!(int.is_signed());
        assert_eq!(int.byte_size(), 2);

        let mut storage = ty.initialize_storage(None).expect("storage");
        assert_eq!(int.get(&storage), 0);
        int.set(&mut storage, -7);
        assert_eq!(int.get(&storage), -7);
    }

    #[test]
    fn test_clone_is_independent() {
        let ty = type_of::<String>();
        let mut storage = ty.initialize_storage(None).expect("storage");
        let string = ty.as_string().expect("string capability");
        string.set(&mut storage, "first");

        let copy = ty.clone_storage(&storage);
        string.set(&mut storage, "second");
        assert_eq!(string.get(&copy), "first");
        assert_eq!(string.get(&storage), "second");
    }

    #[test]
    fn test_seed_adoption() {
        let ty = type_of::<u32>();
        let adopted = ty
            .initialize_storage(Some(Box::new(9u32)))
            .expect("adopt seed");
        assert_eq!(ty.as_int().expect("int").get(&adopted), 9);

        // a foreign storage is rejected
        assert!(ty.initialize_storage(Some(Box::new("no".to_string()))).is_err());
    }

    #[test]
    fn test_dynamic_wraps_inner_value() {
        let ty = type_of::<GenericValue>();
        let storage: Storage = Box::new(GenericValue::of(5i32));
        let dynamic = ty.as_dynamic().expect("dynamic capability");
        let inner = dynamic.get(&storage).expect("inner value");
        assert_eq!(inner.kind(), Kind::Int);
        assert_eq!(inner.downcast_ref::<i32>(), Some(&5));
    }

    #[test]
    fn test_buffer_type() {
        let ty = type_of::<Buffer>();
        let mut storage = ty.initialize_storage(None).expect("storage");
        let raw = ty.as_raw().expect("raw capability");
        assert!(raw.get(&storage).is_empty());
        raw.set(&mut storage, &[1, 2, 3]);
        assert_eq!(raw.get(&storage), &[1, 2, 3]);
    }

    #[test]
    fn test_less_ordering() {
        let ty = type_of::<i32>();
        let a: Storage = Box::new(1i32);
        let b: Storage = Box::new(2i32);
        assert!(ty.less(&a, &b));
        assert!(!ty.less(&b, &a));
        assert!(!ty.less(&a, &a));
    }
}
