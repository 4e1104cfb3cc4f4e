// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! room-storage: the durable event-log projection.
//!
//! Append-only, sequence-stamped JSONL rows with a bounded newest-first
//! range scan. The restore engine folds the tail of this log back into
//! runtime state after a crash or restart.

mod log;

pub use log::{EventLog, LogError, LogRow, FLUSH_THRESHOLD};
