// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use thiserror::Error;

use ta_adapters::{ObjectStoreError, PubSubError};
use ta_core::wire::WireError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),

    #[error(transparent)]
    PubSub(#[from] PubSubError),

    #[error("wire codec error: {0}")]
    Wire(#[from] WireError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task processor invariant violated: response.reqSpec did not echo request.spec")]
    ResponseDidNotEchoRequest,
}
