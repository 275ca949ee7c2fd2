// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One-shot diagnostic for unsupported capabilities.

use crate::logging::TYPE_TARGET;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::OnceLock;

static FAILED_TYPES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Record that `operation` failed on the type named `type_name` and
/// emit one error diagnostic.
///
/// Only the first failing operation per type name is reported; later
/// calls for the same type are silenced. Default capability
/// implementations use this to refuse with a readable message instead
/// of crashing, returning a default-constructed result.
pub fn type_fail(type_name: &str, operation: &str) {
    let mut reported = FAILED_TYPES.get_or_init(Default::default).lock();
    if !reported.insert(type_name.to_string()) {
        return;
    }
    log::error!(
        target: TYPE_TARGET,
        "The following operation failed on data type {}: {}",
        type_name,
        operation
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_once_per_type() {
        type_fail("tests.OnceType", "clone");
        type_fail("tests.OnceType", "less");
        let reported = FAILED_TYPES.get().expect("initialized").lock();
        assert!(reported.contains("tests.OnceType"));
    }
}
