// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Console logging for the `qitype.*` log targets.
//!
//! The crate logs through the `log` facade with targets of the form
//! `qitype.<component>` (`qitype.type`, `qitype.signature`). Hosts that
//! already install their own logger see these records like any others;
//! standalone processes and tests can call [`init`] to get a minimal
//! stderr logger.
//!
//! The threshold for `qitype.*` is *info* by default. Setting the
//! `QITYPE_DEBUG` environment variable to any non-empty value lowers it
//! to *debug*, which also surfaces the verbose registration and
//! reconciliation notices.

use log::{LevelFilter, Metadata, Record};
use std::sync::OnceLock;

/// Log target for registry and descriptor operations.
pub(crate) const TYPE_TARGET: &str = "qitype.type";
/// Log target for signature parsing and inference.
pub(crate) const SIGNATURE_TARGET: &str = "qitype.signature";

struct ConsoleLogger {
    level: LevelFilter,
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.target().starts_with("qitype") && metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the stderr logger for `qitype.*` targets.
///
/// Idempotent, and a no-op when another logger is already installed
/// (the records then flow through that logger instead).
pub fn init() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let level = if debug_requested() {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        if log::set_boxed_logger(Box::new(ConsoleLogger { level })).is_ok() {
            log::set_max_level(level);
        }
    });
}

fn debug_requested() -> bool {
    std::env::var("QITYPE_DEBUG")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}
