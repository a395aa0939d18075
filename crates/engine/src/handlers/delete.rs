// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delete Handler: a single generation-checked object deletion. The
//! distilled spec names `delete` as a task type throughout external
//! interfaces but never gives it its own state-machine section (see
//! `ta_core::delete`'s module doc); this mirrors the copy handler's
//! precondition handling without any upload machinery.

use std::sync::Arc;

use ta_adapters::{ObjectStoreAdapter, ObjectStoreError};
use ta_core::{DeleteLog, DeleteSpec, FailureType, TaskLog, TaskResponse, TaskSpec};

pub struct DeleteHandler {
    store: Arc<dyn ObjectStoreAdapter>,
}

impl DeleteHandler {
    pub fn new(store: Arc<dyn ObjectStoreAdapter>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, spec: DeleteSpec) -> TaskResponse {
        let req_spec = TaskSpec::Delete(spec.clone());
        match self.store.delete_object(&spec.bucket, &spec.object, spec.precondition()).await {
            Ok(()) => TaskResponse::success(req_spec, TaskLog::Delete(DeleteLog { deleted: true }), None),
            Err(ObjectStoreError::PreconditionFailed { .. }) => {
                TaskResponse::failure(req_spec, FailureType::PreconditionFailure, "generation precondition rejected", None)
            }
            Err(ObjectStoreError::NotFound { .. }) => {
                TaskResponse::success(req_spec, TaskLog::Delete(DeleteLog { deleted: false }), None)
            }
            Err(e) => TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None),
        }
    }
}

#[cfg(test)]
#[path = "delete_tests.rs"]
mod tests;
