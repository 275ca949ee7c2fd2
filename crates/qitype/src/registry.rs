// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide type registry.
//!
//! One mutex guards the identity map and the factory memoization
//! tables. The registry is seeded with the built-in descriptors on
//! first access; further descriptors arrive through [`register_type`]
//! or through the container factories.
//!
//! Descriptor construction never happens under the lock: factories
//! look up, build outside, then intern with an insert-if-absent
//! re-check, so a concurrent build of the same parameterization still
//! yields one shared descriptor.

use crate::factory::tuple::DefaultTupleType;
use crate::logging::TYPE_TARGET;
use crate::type_info::TypeInfo;
use crate::types::{builtin_types, Type};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Memoization key of a tuple parameterization.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct TupleKey {
    pub(crate) members: Vec<TypeInfo>,
    pub(crate) class_name: String,
    pub(crate) element_names: Vec<String>,
}

struct GlobalRegistry {
    /// `None` records an access that happened before registration.
    types: HashMap<TypeInfo, Option<Arc<dyn Type>>>,
    list_types: HashMap<TypeInfo, Arc<dyn Type>>,
    map_types: HashMap<(TypeInfo, TypeInfo), Arc<dyn Type>>,
    tuple_types: HashMap<TupleKey, Arc<DefaultTupleType>>,
}

static REGISTRY: OnceLock<Mutex<GlobalRegistry>> = OnceLock::new();

fn registry() -> &'static Mutex<GlobalRegistry> {
    REGISTRY.get_or_init(|| {
        let mut types: HashMap<TypeInfo, Option<Arc<dyn Type>>> = HashMap::new();
        for ty in builtin_types() {
            types.insert(ty.info(), Some(ty));
        }
        Mutex::new(GlobalRegistry {
            types,
            list_types: HashMap::new(),
            map_types: HashMap::new(),
            tuple_types: HashMap::new(),
        })
    })
}

/// Look up the descriptor registered for `info`.
///
/// A miss is recorded (on purpose) so that a later [`register_type`]
/// for the same identity can report the access-before-registration.
pub fn get_type(info: &TypeInfo) -> Option<Arc<dyn Type>> {
    let mut reg = registry().lock();
    reg.types.entry(info.clone()).or_insert(None).clone()
}

/// Install a descriptor for `info`. The last writer wins; a prior
/// registration or a recorded early access is reported at debug level.
pub fn register_type(info: TypeInfo, ty: Arc<dyn Type>) -> bool {
    let mut reg = registry().lock();
    log::debug!(
        target: TYPE_TARGET,
        "register_type {} kind={:?}",
        info.as_string(),
        ty.kind()
    );
    match reg.types.get(&info) {
        Some(Some(previous)) => log::debug!(
            target: TYPE_TARGET,
            "register_type: previous registration present for {} kind={:?}",
            info.as_string(),
            previous.kind()
        ),
        Some(None) => log::debug!(
            target: TYPE_TARGET,
            "register_type: access to type registry before registration detected for {}",
            info.as_string()
        ),
        None => {}
    }
    reg.types.insert(info, Some(ty));
    true
}

pub(crate) fn memoized_list_type(element: &TypeInfo) -> Option<Arc<dyn Type>> {
    registry().lock().list_types.get(element).cloned()
}

pub(crate) fn intern_list_type(element: TypeInfo, ty: Arc<dyn Type>) -> Arc<dyn Type> {
    registry()
        .lock()
        .list_types
        .entry(element)
        .or_insert(ty)
        .clone()
}

pub(crate) fn memoized_map_type(key: &(TypeInfo, TypeInfo)) -> Option<Arc<dyn Type>> {
    registry().lock().map_types.get(key).cloned()
}

pub(crate) fn intern_map_type(key: (TypeInfo, TypeInfo), ty: Arc<dyn Type>) -> Arc<dyn Type> {
    registry().lock().map_types.entry(key).or_insert(ty).clone()
}

pub(crate) fn memoized_tuple_type(key: &TupleKey) -> Option<Arc<DefaultTupleType>> {
    registry().lock().tuple_types.get(key).cloned()
}

pub(crate) fn intern_tuple_type(
    key: TupleKey,
    ty: Arc<DefaultTupleType>,
) -> Arc<DefaultTupleType> {
    registry().lock().tuple_types.entry(key).or_insert(ty).clone()
}
