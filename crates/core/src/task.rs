// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskRequest` / `TaskResponse`: the envelope every handler speaks.

use serde::{Deserialize, Serialize};

use crate::copy::{CopyLog, CopySpec};
use crate::delete::{DeleteLog, DeleteSpec};
use crate::failure::FailureType;
use crate::list::{ListLog, ListSpec};

/// The tagged variant of work a `TaskRequest` can carry. Each variant maps
/// 1:1 to a handler capability registered with the task processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskSpec {
    List(ListSpec),
    Copy(CopySpec),
    Delete(DeleteSpec),
}

impl TaskSpec {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskSpec::List(_) => TaskKind::List,
            TaskSpec::Copy(_) => TaskKind::Copy,
            TaskSpec::Delete(_) => TaskKind::Delete,
        }
    }
}

/// Tag-only variant of [`TaskSpec`], used to pick a handler and as the
/// per-task-type key in stats and subscription wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    List,
    Copy,
    Delete,
}

impl TaskKind {
    /// Subscription/topic name fragment (§6: `list`, `copy`, `delete`).
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::List => "list",
            TaskKind::Copy => "copy",
            TaskKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work delivered on a typed subscription. Immutable once decoded;
/// its lifetime is bounded by the message bus lease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub task_rel_resource_name: String,
    pub job_run_rel_resource_name: String,
    pub job_run_version: u64,
    pub spec: TaskSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Success,
    Failed,
}

/// The outcome half of a task, keyed by the same variant as its spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskLog {
    List(ListLog),
    Copy(CopyLog),
    Delete(DeleteLog),
}

/// Response published on the progress topic after a task is handled.
///
/// Invariant (§3, §8-P1): `req_spec` must echo the originating
/// `TaskRequest::spec` bit-for-bit. `resp_spec` is a *separate* field: it
/// carries a spec updated for resumption (e.g. a freshly minted
/// `resumableUploadId`) so a redelivery — possibly to another agent — can
/// pick the copy back up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub req_spec: TaskSpec,
    pub status: TaskStatus,
    pub failure_type: Option<FailureType>,
    pub failure_message: Option<String>,
    pub log: Option<TaskLog>,
    pub resp_spec: Option<TaskSpec>,
}

impl TaskResponse {
    pub fn success(req_spec: TaskSpec, log: TaskLog, resp_spec: Option<TaskSpec>) -> Self {
        Self {
            req_spec,
            status: TaskStatus::Success,
            failure_type: None,
            failure_message: None,
            log: Some(log),
            resp_spec,
        }
    }

    pub fn failure(
        req_spec: TaskSpec,
        failure_type: FailureType,
        message: impl Into<String>,
        resp_spec: Option<TaskSpec>,
    ) -> Self {
        Self {
            req_spec,
            status: TaskStatus::Failed,
            failure_type: Some(failure_type),
            failure_message: Some(message.into()),
            log: None,
            resp_spec,
        }
    }

    /// Synthesize the response for a task whose job run was inactive at
    /// dispatch time (§4.9, §8-S4). The handler is never invoked.
    pub fn not_active_jobrun(req: &TaskRequest) -> Self {
        Self::failure(
            req.spec.clone(),
            FailureType::NotActiveJobrun,
            format!("job run {} is not active", req.job_run_rel_resource_name),
            None,
        )
    }

    /// §8-P1: the invariant the task processor must check before acking.
    pub fn echoes(&self, request: &TaskRequest) -> bool {
        self.req_spec == request.spec
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
