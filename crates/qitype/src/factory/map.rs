// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synthesized map type backing values created from signatures.
//!
//! Entries are (key, value) pairs stored through the default tuple
//! machinery, so iteration naturally yields pair values. The entry
//! sequence is kept sorted by the key type's `less`, which is also the
//! iteration order.

use crate::error::{Error, Result};
use crate::factory::tuple::TupleStorage;
use crate::kind::Kind;
use crate::signature::Signature;
use crate::type_info::TypeInfo;
use crate::types::{adopt_storage, type_fail, MapType, Storage, Type};
use crate::value::{GenericIterator, GenericValuePtr};
use std::cmp::Ordering;
use std::sync::Arc;

/// Backing storage of a default map: pair storages sorted by key.
pub(crate) struct MapStorage {
    pub(crate) entries: Vec<Storage>,
}

/// Map descriptor synthesized for a (key, element) type pair. One
/// instance exists per parameterization (see
/// [`make_map_type`](crate::factory::make_map_type)).
pub(crate) struct DefaultMapType {
    key: Arc<dyn Type>,
    element: Arc<dyn Type>,
    /// Tuple descriptor of the (key, value) pairs.
    pair: Arc<dyn Type>,
    info: TypeInfo,
}

impl DefaultMapType {
    pub(crate) fn new(
        key: Arc<dyn Type>,
        element: Arc<dyn Type>,
        pair: Arc<dyn Type>,
    ) -> DefaultMapType {
        let info = TypeInfo::named(format!(
            "DefaultMap<{},{}>",
            key.info().as_string(),
            element.info().as_string()
        ));
        DefaultMapType {
            key,
            element,
            pair,
            info,
        }
    }

    /// Binary-search the sorted entries for `probe`; `Ok` is the match,
    /// `Err` the insertion point.
    fn position(&self, entries: &[Storage], probe: &Storage) -> std::result::Result<usize, usize> {
        entries.binary_search_by(|entry| {
            let pair = match entry.downcast_ref::<TupleStorage>() {
                Some(pair) => pair,
                None => return Ordering::Less,
            };
            let stored = &pair.slots[0];
            if self.key.less(stored, probe) {
                Ordering::Less
            } else if self.key.less(probe, stored) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
    }
}

impl Type for DefaultMapType {
    fn info(&self) -> TypeInfo {
        self.info.clone()
    }

    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn signature(&self) -> Signature {
        Signature::map_of(&self.key.signature(), &self.element.signature())
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<MapStorage>(seed, &self.info),
            None => Ok(Box::new(MapStorage {
                entries: Vec::new(),
            })),
        }
    }

    // Pairs are cloned through the pair tuple, so keys and values of
    // the copy are independent of the source.
    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<MapStorage>() {
            Some(map) => Box::new(MapStorage {
                entries: map
                    .entries
                    .iter()
                    .map(|entry| self.pair.clone_storage(entry))
                    .collect(),
            }),
            None => {
                type_fail(&self.info.as_string(), "clone");
                Box::new(MapStorage {
                    entries: Vec::new(),
                })
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<MapStorage>(), b.downcast_ref::<MapStorage>()) {
            (Some(a), Some(b)) => {
                for (x, y) in a.entries.iter().zip(&b.entries) {
                    if self.pair.less(x, y) {
                        return true;
                    }
                    if self.pair.less(y, x) {
                        return false;
                    }
                }
                a.entries.len() < b.entries.len()
            }
            _ => {
                type_fail(&self.info.as_string(), "less");
                false
            }
        }
    }

    fn as_map(&self) -> Option<&dyn MapType> {
        Some(self)
    }
}

impl MapType for DefaultMapType {
    fn key_type(&self) -> Arc<dyn Type> {
        self.key.clone()
    }

    fn element_type(&self) -> Arc<dyn Type> {
        self.element.clone()
    }

    fn size(&self, storage: &Storage) -> usize {
        storage
            .downcast_ref::<MapStorage>()
            .map(|map| map.entries.len())
            .unwrap_or(0)
    }

    fn iter<'a>(&self, storage: &'a Storage) -> GenericIterator<'a> {
        match storage.downcast_ref::<MapStorage>() {
            Some(map) => {
                let pair = self.pair.clone();
                GenericIterator::new(
                    map.entries
                        .iter()
                        .map(move |entry| GenericValuePtr::new(pair.clone(), entry)),
                )
            }
            None => {
                type_fail(&self.info.as_string(), "iterate");
                GenericIterator::empty()
            }
        }
    }

    fn insert(&self, storage: &mut Storage, key: GenericValuePtr<'_>, value: GenericValuePtr<'_>) {
        let map = match storage.downcast_mut::<MapStorage>() {
            Some(map) => map,
            None => {
                type_fail(&self.info.as_string(), "insert");
                return;
            }
        };
        match self.position(&map.entries, key.storage()) {
            Ok(index) => {
                // replace the value slot; the stored key stays alive
                match map.entries[index].downcast_mut::<TupleStorage>() {
                    Some(pair) => {
                        pair.slots[1] = self.element.clone_storage(value.storage());
                    }
                    None => type_fail(&self.info.as_string(), "insert"),
                }
            }
            Err(index) => {
                let pair = TupleStorage {
                    slots: vec![
                        self.key.clone_storage(key.storage()),
                        self.element.clone_storage(value.storage()),
                    ],
                };
                map.entries.insert(index, Box::new(pair));
            }
        }
    }

    fn element<'a>(
        &self,
        storage: &'a mut Storage,
        key: GenericValuePtr<'_>,
        auto_insert: bool,
    ) -> Result<Option<GenericValuePtr<'a>>> {
        let map = match storage.downcast_mut::<MapStorage>() {
            Some(map) => map,
            None => {
                type_fail(&self.info.as_string(), "element access");
                return Ok(None);
            }
        };
        let index = match self.position(&map.entries, key.storage()) {
            Ok(index) => index,
            Err(index) => {
                if !auto_insert {
                    return Ok(None);
                }
                // auto-insert gets a default-initialized value, not a clone
                let value = self.element.initialize_storage(None)?;
                let pair = TupleStorage {
                    slots: vec![self.key.clone_storage(key.storage()), value],
                };
                map.entries.insert(index, Box::new(pair));
                index
            }
        };
        let pair = map.entries[index]
            .downcast_ref::<TupleStorage>()
            .ok_or_else(|| Error::StorageMismatch {
                type_name: self.info.as_string(),
            })?;
        Ok(Some(GenericValuePtr::new(
            self.element.clone(),
            &pair.slots[1],
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::make_map_type;
    use crate::types::type_of;
    use crate::value::GenericValue;

    fn string_int_map(pairs: &[(&str, i32)]) -> GenericValue {
        let ty = make_map_type(type_of::<String>(), type_of::<i32>());
        let mut map = GenericValue::new(&ty).expect("map value");
        for (k, v) in pairs {
            let key = GenericValue::of((*k).to_string());
            let value = GenericValue::of(*v);
            map.as_mut().insert(key.as_ptr(), value.as_ptr());
        }
        map
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut map = string_int_map(&[("b", 2), ("a", 1)]);
        let probe = GenericValue::of("a".to_string());
        let mut slot = map.as_mut();
        let found = slot
            .map_element(probe.as_ptr(), false)
            .expect("lookup")
            .expect("present");
        assert_eq!(found.downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_insert_replaces_existing_value() {
        let mut map = string_int_map(&[("k", 1)]);
        let key = GenericValue::of("k".to_string());
        let replacement = GenericValue::of(9i32);
        map.as_mut().insert(key.as_ptr(), replacement.as_ptr());

        let ty = map.ty().clone();
        let m = ty.as_map().expect("map capability");
        assert_eq!(m.size(map.storage()), 1);
        let mut slot = map.as_mut();
        let found = slot
            .map_element(key.as_ptr(), false)
            .expect("lookup")
            .expect("present");
        assert_eq!(found.downcast_ref::<i32>(), Some(&9));
    }

    #[test]
    fn test_missing_key_without_auto_insert() {
        let mut map = string_int_map(&[]);
        let probe = GenericValue::of("nope".to_string());
        let mut slot = map.as_mut();
        assert!(slot
            .map_element(probe.as_ptr(), false)
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn test_auto_insert_default_value() {
        let mut map = string_int_map(&[]);
        let probe = GenericValue::of("fresh".to_string());
        {
            let mut slot = map.as_mut();
            let inserted = slot
                .map_element(probe.as_ptr(), true)
                .expect("lookup")
                .expect("inserted");
            assert_eq!(inserted.downcast_ref::<i32>(), Some(&0));
        }
        let ty = map.ty().clone();
        assert_eq!(ty.as_map().expect("map").size(map.storage()), 1);
    }

    #[test]
    fn test_iteration_in_key_order() {
        let map = string_int_map(&[("c", 3), ("a", 1), ("b", 2)]);
        let ty = map.ty().clone();
        let m = ty.as_map().expect("map capability");
        let keys: Vec<String> = m
            .iter(map.storage())
            .map(|pair| {
                pair.member(0)
                    .expect("key slot")
                    .downcast_ref::<String>()
                    .expect("string key")
                    .clone()
            })
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clone_is_independent() {
        let map = string_int_map(&[("k", 5)]);
        let mut copy = map.clone();
        drop(map);

        let key = GenericValue::of("k".to_string());
        let mut slot = copy.as_mut();
        let found = slot
            .map_element(key.as_ptr(), false)
            .expect("lookup")
            .expect("present");
        assert_eq!(found.downcast_ref::<i32>(), Some(&5));
    }
}
