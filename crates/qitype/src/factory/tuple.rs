// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synthesized tuple type, also the pair machinery of the default map.

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::signature::{tuple_annotation, Signature};
use crate::type_info::TypeInfo;
use crate::types::{type_fail, Storage, TupleType, Type};
use crate::value::GenericValuePtr;
use std::sync::Arc;

/// Backing storage of a default tuple: one storage per member, always
/// exactly the declared arity.
pub(crate) struct TupleStorage {
    pub(crate) slots: Vec<Storage>,
}

/// Tuple descriptor synthesized for an ordered member list, optional
/// record name and optional element names. One instance exists per
/// (members, name, element names) key (see
/// [`make_tuple_type`](crate::factory::make_tuple_type)).
pub struct DefaultTupleType {
    members: Vec<Arc<dyn Type>>,
    class_name: String,
    element_names: Vec<String>,
    info: TypeInfo,
}

impl DefaultTupleType {
    pub(crate) fn new(
        members: Vec<Arc<dyn Type>>,
        class_name: String,
        element_names: Vec<String>,
    ) -> DefaultTupleType {
        let member_names: Vec<String> = members
            .iter()
            .map(|m| m.info().as_string())
            .collect();
        let info = TypeInfo::named(format!(
            "DefaultTuple<{}>({}:{})",
            member_names.join(","),
            class_name,
            element_names.join(",")
        ));
        DefaultTupleType {
            members,
            class_name,
            element_names,
            info,
        }
    }
}

impl Type for DefaultTupleType {
    fn info(&self) -> TypeInfo {
        self.info.clone()
    }

    fn kind(&self) -> Kind {
        Kind::Tuple
    }

    fn signature(&self) -> Signature {
        let member_sigs: Vec<Signature> =
            self.members.iter().map(|m| m.signature()).collect();
        let annotation =
            tuple_annotation(&self.class_name, &self.element_names, self.members.len());
        Signature::tuple_of(&member_sigs, annotation)
    }

    /// A seed must carry exactly one storage per member; it is adopted
    /// as-is. Without a seed every member is default-constructed.
    fn initialize_storage(&self, seed: Option<Storage>) -> Result<Storage> {
        match seed {
            Some(seed) => {
                let slots = match seed.downcast_ref::<TupleStorage>() {
                    Some(tuple) => tuple.slots.len(),
                    None => {
                        return Err(Error::StorageMismatch {
                            type_name: self.info.as_string(),
                        })
                    }
                };
                if slots != self.members.len() {
                    return Err(Error::StorageShapeMismatch {
                        expected: self.members.len(),
                        got: slots,
                    });
                }
                Ok(seed)
            }
            None => {
                let slots = self
                    .members
                    .iter()
                    .map(|m| m.initialize_storage(None))
                    .collect::<Result<Vec<Storage>>>()?;
                Ok(Box::new(TupleStorage { slots }))
            }
        }
    }

    fn clone_storage(&self, storage: &Storage) -> Storage {
        match storage.downcast_ref::<TupleStorage>() {
            Some(tuple) => Box::new(TupleStorage {
                slots: tuple
                    .slots
                    .iter()
                    .zip(&self.members)
                    .map(|(slot, member)| member.clone_storage(slot))
                    .collect(),
            }),
            None => {
                type_fail(&self.info.as_string(), "clone");
                Box::new(TupleStorage { slots: Vec::new() })
            }
        }
    }

    fn less(&self, a: &Storage, b: &Storage) -> bool {
        match (a.downcast_ref::<TupleStorage>(), b.downcast_ref::<TupleStorage>()) {
            (Some(a), Some(b)) => {
                for ((x, y), member) in a.slots.iter().zip(&b.slots).zip(&self.members) {
                    if member.less(x, y) {
                        return true;
                    }
                    if member.less(y, x) {
                        return false;
                    }
                }
                false
            }
            _ => {
                type_fail(&self.info.as_string(), "less");
                false
            }
        }
    }

    fn as_tuple(&self) -> Option<&dyn TupleType> {
        Some(self)
    }
}

impl TupleType for DefaultTupleType {
    fn member_types(&self) -> Vec<Arc<dyn Type>> {
        self.members.clone()
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn element_names(&self) -> &[String] {
        &self.element_names
    }

    fn get<'a>(&self, storage: &'a Storage, index: usize) -> Result<GenericValuePtr<'a>> {
        let tuple = storage.downcast_ref::<TupleStorage>().ok_or_else(|| {
            Error::StorageMismatch {
                type_name: self.info.as_string(),
            }
        })?;
        // Reads past the member count fail; slots are never grown on
        // access.
        match tuple.slots.get(index) {
            Some(slot) => Ok(GenericValuePtr::new(self.members[index].clone(), slot)),
            None => Err(Error::OutOfRange {
                index,
                len: tuple.slots.len(),
            }),
        }
    }

    fn set(&self, storage: &mut Storage, index: usize, value: GenericValuePtr<'_>) -> Result<()> {
        let member = self
            .members
            .get(index)
            .cloned()
            .ok_or(Error::OutOfRange {
                index,
                len: self.members.len(),
            })?;
        let tuple = storage.downcast_mut::<TupleStorage>().ok_or_else(|| {
            Error::StorageMismatch {
                type_name: self.info.as_string(),
            }
        })?;
        // the previous member storage is dropped by the replacement
        tuple.slots[index] = member.clone_storage(value.storage());
        Ok(())
    }
}
