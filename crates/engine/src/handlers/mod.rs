// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-task-type handlers (§4.5-§4.7): copy, list, delete, control.

use async_trait::async_trait;

use ta_core::{FailureType, TaskResponse, TaskSpec};

pub mod control;
pub mod copy;
pub mod delete;
pub mod list;

pub use control::ControlHandler;
pub use copy::CopyHandler;
pub use delete::DeleteHandler;
pub use list::ListHandler;

/// Common entry point the task processor dispatches through, regardless of
/// which concrete handler backs a given subscription (§4.9, §9: "tagged
/// variant with a registry mapping tag → handler capability").
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, task_full_id: &str, spec: TaskSpec) -> TaskResponse;
}

#[async_trait]
impl TaskHandler for CopyHandler {
    async fn handle(&self, _task_full_id: &str, spec: TaskSpec) -> TaskResponse {
        match spec {
            TaskSpec::Copy(copy_spec) => CopyHandler::handle(self, copy_spec).await,
            other => TaskResponse::failure(other, FailureType::Unknown, "copy handler received a non-copy spec", None),
        }
    }
}

#[async_trait]
impl TaskHandler for ListHandler {
    async fn handle(&self, task_full_id: &str, spec: TaskSpec) -> TaskResponse {
        match spec {
            TaskSpec::List(list_spec) => ListHandler::handle(self, task_full_id, list_spec).await,
            other => TaskResponse::failure(other, FailureType::Unknown, "list handler received a non-list spec", None),
        }
    }
}

#[async_trait]
impl TaskHandler for DeleteHandler {
    async fn handle(&self, _task_full_id: &str, spec: TaskSpec) -> TaskResponse {
        match spec {
            TaskSpec::Delete(delete_spec) => DeleteHandler::handle(self, delete_spec).await,
            other => TaskResponse::failure(other, FailureType::Unknown, "delete handler received a non-delete spec", None),
        }
    }
}
