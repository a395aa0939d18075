// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Transfer agent execution engine: rate/admission control, the reader
//! pipeline, the copy/list/delete/control handlers, the pulse emitter, the
//! task processor, and the wiring that assembles them into a running agent.

mod backoff;
mod error;
mod handlers;
mod identity;
mod pulse;
mod rate_admission;
mod reader_pipeline;
mod stats;
mod task_processor;
mod wiring;

pub use backoff::Backoff;
pub use error::EngineError;
pub use handlers::{ControlHandler, CopyHandler, DeleteHandler, ListHandler, TaskHandler};
pub use identity::{control_subscription_name, fnv1a64, AgentUpdateWriter};
pub use pulse::{PulseEmitter, DEFAULT_PULSE_INTERVAL};
pub use rate_admission::RateAdmission;
pub use stats::Stats;
pub use task_processor::TaskProcessor;
pub use wiring::{
    Agent, Topics, WiringConfig, CONTROL_MAX_OUTSTANDING_MESSAGES, DEFAULT_CHUNK_SIZE,
    DEFAULT_COPY_TASKS_PER_CPU, DEFAULT_MAX_EXTENSION, DEFAULT_MAX_OUTSTANDING_BYTES,
    DELETE_MAX_OUTSTANDING_MESSAGES, LIST_MAX_OUTSTANDING_MESSAGES,
};
