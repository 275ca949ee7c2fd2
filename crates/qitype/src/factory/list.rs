// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synthesized list type backing values created from signatures.

use crate::error::Result;
use crate::kind::Kind;
use crate::signature::Signature;
use crate::type_info::TypeInfo;
use crate::types::{adopt_storage, type_fail, ListType, Storage, Type};
use crate::value::{GenericIterator, GenericValuePtr};
use std::sync::Arc;

/// Backing storage of a default list: one element storage per slot,
/// in insertion order.
pub(crate) struct ListStorage {
    pub(crate) items: Vec<Storage>,
}

/// List descriptor synthesized for an element type. One instance
/// exists per element identity (see
/// [`make_list_type`](crate::factory::make_list_type)).
pub(crate) struct DefaultListType {
    element: Arc<dyn Type>,
    info: TypeInfo,
}

impl DefaultListType {
    pub(crate) fn new(element: Arc<dyn Type>) -> DefaultListType {
        let info = TypeInfo::named(format!("DefaultList<{}>", element.info().as_string()));
        DefaultListType { element, info }
    }
}

impl Type for DefaultListType {
    fn info(&self) -> TypeInfo {
        self.info.clone()
    }

    fn kind(&self) -> Kind {
        Kind::List
    }

    fn signature(&self) -> Signature {
        Signature::list_of(&self.element.signature())
    }

    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => adopt_storage::<ListStorage>(seed, &self.info),
            None => Ok(Box::new(ListStorage { items: Vec::new() })),
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<ListStorage>() {
            Some(list) => Box::new(ListStorage {
                items: list
                    .items
                    .iter()
                    .map(|item| self.element.clone_storage(item))
                    .collect(),
            }),
            None => {
                type_fail(&self.info.as_string(), "clone");
                Box::new(ListStorage { items: Vec::new() })
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<ListStorage>(), b.downcast_ref::<ListStorage>()) {
            (Some(a), Some(b)) => {
                for (x, y) in a.items.iter().zip(&b.items) {
                    if self.element.less(x, y) {
                        return true;
                    }
                    if self.element.less(y, x) {
                        return false;
                    }
                }
                a.items.len() < b.items.len()
            }
            _ => {
                type_fail(&self.info.as_string(), "less");
                false
            }
        }
    }

    fn as_list(&self) -> Option<&dyn ListType> {
        Some(self)
    }
}

impl ListType for DefaultListType {
    fn element_type(&self) -> Arc<dyn Type> {
        self.element.clone()
    }

    fn len(&self, storage: &Storage) -> usize {
        storage
            .downcast_ref::<ListStorage>()
            .map(|list| list.items.len())
            .unwrap_or(0)
    }

    fn iter<'a>(&self, storage: &'a Storage) -> GenericIterator<'a> {
        match storage.downcast_ref::<ListStorage>() {
            Some(list) => {
                let element = self.element.clone();
                GenericIterator::new(
                    list.items
                        .iter()
                        .map(move |item| GenericValuePtr::new(element.clone(), item)),
                )
            }
            None => {
                type_fail(&self.info.as_string(), "iterate");
                GenericIterator::empty()
            }
        }
    }

    // The argument is cloned before appending.
    fn push_back(&self, storage: &mut Storage, value: GenericValuePtr<'_>) {
        match storage.downcast_mut::<ListStorage>() {
            Some(list) => list.items.push(self.element.clone_storage(value.storage())),
            None => type_fail(&self.info.as_string(), "push_back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::factory::make_list_type;
    use crate::types::type_of;
    use crate::value::GenericValue;

    fn int_list(values: &[i32]) -> GenericValue {
        let ty = make_list_type(type_of::<i32>());
        let mut list = GenericValue::new(&ty).expect("list value");
        for v in values {
            let element = GenericValue::of(*v);
            list.as_mut().push_back(element.as_ptr());
        }
        list
    }

    #[test]
    fn test_push_back_clones_elements() {
        let list = int_list(&[1, 2, 3]);
        let ty = list.ty().clone();
        let l = ty.as_list().expect("list capability");
        assert_eq!(l.len(list.storage()), 3);

        let collected: Vec<i64> = l
            .iter(list.storage())
            .map(|e| *e.downcast_ref::<i32>().expect("int element") as i64)
            .collect();
        assert_eq!(collected, vec![1, 2, 3]);
    }

    #[test]
    fn test_element_access_by_iteration() {
        let list = int_list(&[10, 20]);
        let ty = list.ty().clone();
        let l = ty.as_list().expect("list capability");

        let second = l.element(list.storage(), 1).expect("element 1");
        assert_eq!(second.downcast_ref::<i32>(), Some(&20));

        match l.element(list.storage(), 5) {
            Err(Error::OutOfRange { index: 5, len: 2 }) => {}
            other => panic!("expected OutOfRange, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let list = int_list(&[7]);
        let copy = list.clone();
        drop(list);
        let ty = copy.ty().clone();
        let l = ty.as_list().expect("list capability");
        let first = l.element(copy.storage(), 0).expect("element 0");
        assert_eq!(first.downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn test_list_ordering() {
        let ty = make_list_type(type_of::<i32>());
        let a = int_list(&[1, 2]);
        let b = int_list(&[1, 3]);
        let c = int_list(&[1, 2, 0]);
        assert!(ty.less(a.storage(), b.storage()));
        assert!(!ty.less(b.storage(), a.storage()));
        // prefix orders before its extension
        assert!(ty.less(a.storage(), c.storage()));
    }
}
