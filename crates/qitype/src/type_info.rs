// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identity tokens for runtime types.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a [`Type`](crate::types::Type).
///
/// Two descriptors describe the same type exactly when their `TypeInfo`
/// compare equal. Identity is either *native* (derived from the host
/// type system via [`std::any::TypeId`]) or *named* (an opaque string,
/// used by synthesized descriptors such as the default containers).
#[derive(Debug, Clone)]
pub enum TypeInfo {
    /// Identity of a compile-time Rust type.
    Native {
        /// Host-provided identity token.
        id: TypeId,
        /// Host-provided type name, kept for diagnostics only.
        name: &'static str,
    },
    /// Identity declared by an opaque string.
    Named(String),
}

impl TypeInfo {
    /// Identity token for the Rust type `T`.
    pub fn of<T: 'static>() -> TypeInfo {
        TypeInfo::Native {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Identity token from an opaque name.
    pub fn named(name: impl Into<String>) -> TypeInfo {
        TypeInfo::Named(name.into())
    }

    /// Readable name of the identity (native type name or custom string).
    pub fn as_string(&self) -> String {
        match self {
            TypeInfo::Native { name, .. } => (*name).to_string(),
            TypeInfo::Named(name) => name.clone(),
        }
    }

    /// True for native (compile-time) identities.
    pub fn is_native(&self) -> bool {
        matches!(self, TypeInfo::Native { .. })
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeInfo::Native { id: a, .. }, TypeInfo::Native { id: b, .. }) => a == b,
            (TypeInfo::Named(a), TypeInfo::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TypeInfo::Native { id, .. } => {
                0u8.hash(state);
                id.hash(state);
            }
            TypeInfo::Named(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl Ord for TypeInfo {
    // Native identities order before named ones; within a variant the
    // host ordering (TypeId) or lexicographic ordering applies.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TypeInfo::Native { id: a, .. }, TypeInfo::Native { id: b, .. }) => a.cmp(b),
            (TypeInfo::Native { .. }, TypeInfo::Named(_)) => Ordering::Less,
            (TypeInfo::Named(_), TypeInfo::Native { .. }) => Ordering::Greater,
            (TypeInfo::Named(a), TypeInfo::Named(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
