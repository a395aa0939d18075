// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary wire form of the task envelope (`TaskRequest`/`TaskResponse`) and
//! its per-kind specs and logs.
//!
//! Protobuf has no native tagged union; `WireTaskSpec` follows the standard
//! oneof-by-optional-fields shape, one per [`crate::task::TaskKind`]. Exactly
//! one of `copy`/`list`/`delete` is set on the wire; `to_domain` treats more
//! than one set field as a decode error rather than silently picking one.

use prost::Message;

use crate::copy::{CopyLog, CopySpec};
use crate::delete::{DeleteLog, DeleteSpec};
use crate::failure::FailureType;
use crate::list::{ListLog, ListSpec};
use crate::task::{TaskLog, TaskRequest, TaskResponse, TaskSpec, TaskStatus};
use crate::wire::codec::WireError;

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireCopySpec {
    #[prost(string, tag = "1")]
    pub src_file: String,
    #[prost(string, tag = "2")]
    pub dst_bucket: String,
    #[prost(string, tag = "3")]
    pub dst_object: String,
    #[prost(uint64, tag = "4")]
    pub expected_generation_num: u64,
    #[prost(uint64, tag = "5")]
    pub file_bytes: u64,
    #[prost(int64, tag = "6")]
    pub file_mtime: i64,
    #[prost(uint64, tag = "7")]
    pub bytes_copied: u64,
    #[prost(uint32, tag = "8")]
    pub crc32_c: u32,
    #[prost(uint64, tag = "9")]
    pub bytes_to_copy: u64,
    #[prost(string, tag = "10")]
    pub resumable_upload_id: String,
}

impl From<&CopySpec> for WireCopySpec {
    fn from(s: &CopySpec) -> Self {
        Self {
            src_file: s.src_file.clone(),
            dst_bucket: s.dst_bucket.clone(),
            dst_object: s.dst_object.clone(),
            expected_generation_num: s.expected_generation_num,
            file_bytes: s.file_bytes,
            file_mtime: s.file_mtime,
            bytes_copied: s.bytes_copied,
            crc32_c: s.crc32_c,
            bytes_to_copy: s.bytes_to_copy,
            resumable_upload_id: s.resumable_upload_id.clone(),
        }
    }
}

impl From<WireCopySpec> for CopySpec {
    fn from(w: WireCopySpec) -> Self {
        Self {
            src_file: w.src_file,
            dst_bucket: w.dst_bucket,
            dst_object: w.dst_object,
            expected_generation_num: w.expected_generation_num,
            file_bytes: w.file_bytes,
            file_mtime: w.file_mtime,
            bytes_copied: w.bytes_copied,
            crc32_c: w.crc32_c,
            bytes_to_copy: w.bytes_to_copy,
            resumable_upload_id: w.resumable_upload_id,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireListSpec {
    #[prost(string, tag = "1")]
    pub dst_list_result_bucket: String,
    #[prost(string, tag = "2")]
    pub dst_list_result_object: String,
    #[prost(string, repeated, tag = "3")]
    pub src_directories: Vec<String>,
    #[prost(uint64, tag = "4")]
    pub expected_generation_num: u64,
    #[prost(uint32, tag = "5")]
    pub max_depth: u32,
}

impl From<&ListSpec> for WireListSpec {
    fn from(s: &ListSpec) -> Self {
        Self {
            dst_list_result_bucket: s.dst_list_result_bucket.clone(),
            dst_list_result_object: s.dst_list_result_object.clone(),
            src_directories: s.src_directories.clone(),
            expected_generation_num: s.expected_generation_num,
            max_depth: s.max_depth,
        }
    }
}

impl From<WireListSpec> for ListSpec {
    fn from(w: WireListSpec) -> Self {
        Self {
            dst_list_result_bucket: w.dst_list_result_bucket,
            dst_list_result_object: w.dst_list_result_object,
            src_directories: w.src_directories,
            expected_generation_num: w.expected_generation_num,
            max_depth: w.max_depth,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireDeleteSpec {
    #[prost(string, tag = "1")]
    pub bucket: String,
    #[prost(string, tag = "2")]
    pub object: String,
    #[prost(uint64, tag = "3")]
    pub expected_generation_num: u64,
}

impl From<&DeleteSpec> for WireDeleteSpec {
    fn from(s: &DeleteSpec) -> Self {
        Self {
            bucket: s.bucket.clone(),
            object: s.object.clone(),
            expected_generation_num: s.expected_generation_num,
        }
    }
}

impl From<WireDeleteSpec> for DeleteSpec {
    fn from(w: WireDeleteSpec) -> Self {
        Self {
            bucket: w.bucket,
            object: w.object,
            expected_generation_num: w.expected_generation_num,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireTaskSpec {
    #[prost(message, optional, tag = "1")]
    pub copy: Option<WireCopySpec>,
    #[prost(message, optional, tag = "2")]
    pub list: Option<WireListSpec>,
    #[prost(message, optional, tag = "3")]
    pub delete: Option<WireDeleteSpec>,
}

impl From<&TaskSpec> for WireTaskSpec {
    fn from(spec: &TaskSpec) -> Self {
        match spec {
            TaskSpec::Copy(s) => Self {
                copy: Some(s.into()),
                list: None,
                delete: None,
            },
            TaskSpec::List(s) => Self {
                copy: None,
                list: Some(s.into()),
                delete: None,
            },
            TaskSpec::Delete(s) => Self {
                copy: None,
                list: None,
                delete: Some(s.into()),
            },
        }
    }
}

impl TryFrom<WireTaskSpec> for TaskSpec {
    type Error = WireError;

    fn try_from(w: WireTaskSpec) -> Result<Self, Self::Error> {
        match (w.copy, w.list, w.delete) {
            (Some(c), None, None) => Ok(TaskSpec::Copy(c.into())),
            (None, Some(l), None) => Ok(TaskSpec::List(l.into())),
            (None, None, Some(d)) => Ok(TaskSpec::Delete(d.into())),
            _ => Err(WireError::Decode(prost::DecodeError::new(
                "WireTaskSpec must set exactly one of copy/list/delete",
            ))),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireCopyLog {
    #[prost(uint64, tag = "1")]
    pub bytes_copied: u64,
    #[prost(uint32, tag = "2")]
    pub crc32_c: u32,
    #[prost(uint64, tag = "3")]
    pub dst_generation: u64,
}

impl From<&CopyLog> for WireCopyLog {
    fn from(l: &CopyLog) -> Self {
        Self {
            bytes_copied: l.bytes_copied,
            crc32_c: l.crc32_c,
            dst_generation: l.dst_generation,
        }
    }
}

impl From<WireCopyLog> for CopyLog {
    fn from(w: WireCopyLog) -> Self {
        Self {
            bytes_copied: w.bytes_copied,
            crc32_c: w.crc32_c,
            dst_generation: w.dst_generation,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireListLog {
    #[prost(uint64, tag = "1")]
    pub dirs_seen: u64,
    #[prost(uint64, tag = "2")]
    pub dirs_failed: u64,
    #[prost(uint64, tag = "3")]
    pub files_seen: u64,
    #[prost(uint64, tag = "4")]
    pub bytes_found: u64,
}

impl From<&ListLog> for WireListLog {
    fn from(l: &ListLog) -> Self {
        Self {
            dirs_seen: l.dirs_seen,
            dirs_failed: l.dirs_failed,
            files_seen: l.files_seen,
            bytes_found: l.bytes_found,
        }
    }
}

impl From<WireListLog> for ListLog {
    fn from(w: WireListLog) -> Self {
        Self {
            dirs_seen: w.dirs_seen,
            dirs_failed: w.dirs_failed,
            files_seen: w.files_seen,
            bytes_found: w.bytes_found,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireDeleteLog {
    #[prost(bool, tag = "1")]
    pub deleted: bool,
}

impl From<&DeleteLog> for WireDeleteLog {
    fn from(l: &DeleteLog) -> Self {
        Self { deleted: l.deleted }
    }
}

impl From<WireDeleteLog> for DeleteLog {
    fn from(w: WireDeleteLog) -> Self {
        Self { deleted: w.deleted }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireTaskLog {
    #[prost(message, optional, tag = "1")]
    pub copy: Option<WireCopyLog>,
    #[prost(message, optional, tag = "2")]
    pub list: Option<WireListLog>,
    #[prost(message, optional, tag = "3")]
    pub delete: Option<WireDeleteLog>,
}

impl From<&TaskLog> for WireTaskLog {
    fn from(log: &TaskLog) -> Self {
        match log {
            TaskLog::Copy(l) => Self {
                copy: Some(l.into()),
                list: None,
                delete: None,
            },
            TaskLog::List(l) => Self {
                copy: None,
                list: Some(l.into()),
                delete: None,
            },
            TaskLog::Delete(l) => Self {
                copy: None,
                list: None,
                delete: Some(l.into()),
            },
        }
    }
}

impl TryFrom<WireTaskLog> for TaskLog {
    type Error = WireError;

    fn try_from(w: WireTaskLog) -> Result<Self, Self::Error> {
        match (w.copy, w.list, w.delete) {
            (Some(c), None, None) => Ok(TaskLog::Copy(c.into())),
            (None, Some(l), None) => Ok(TaskLog::List(l.into())),
            (None, None, Some(d)) => Ok(TaskLog::Delete(d.into())),
            _ => Err(WireError::Decode(prost::DecodeError::new(
                "WireTaskLog must set exactly one of copy/list/delete",
            ))),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireTaskRequest {
    #[prost(string, tag = "1")]
    pub task_rel_resource_name: String,
    #[prost(string, tag = "2")]
    pub job_run_rel_resource_name: String,
    #[prost(uint64, tag = "3")]
    pub job_run_version: u64,
    #[prost(message, optional, tag = "4")]
    pub spec: Option<WireTaskSpec>,
}

impl From<&TaskRequest> for WireTaskRequest {
    fn from(r: &TaskRequest) -> Self {
        Self {
            task_rel_resource_name: r.task_rel_resource_name.clone(),
            job_run_rel_resource_name: r.job_run_rel_resource_name.clone(),
            job_run_version: r.job_run_version,
            spec: Some((&r.spec).into()),
        }
    }
}

impl TryFrom<WireTaskRequest> for TaskRequest {
    type Error = WireError;

    fn try_from(w: WireTaskRequest) -> Result<Self, Self::Error> {
        let spec = w
            .spec
            .ok_or_else(|| WireError::Decode(prost::DecodeError::new("missing task spec")))?
            .try_into()?;
        Ok(Self {
            task_rel_resource_name: w.task_rel_resource_name,
            job_run_rel_resource_name: w.job_run_rel_resource_name,
            job_run_version: w.job_run_version,
            spec,
        })
    }
}

/// `FailureType` is encoded as its legacy display string rather than a true
/// protobuf enum, to avoid hand-rolling `prost::Enumeration` for a value
/// that is otherwise only ever compared and logged.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireTaskResponse {
    #[prost(message, optional, tag = "1")]
    pub req_spec: Option<WireTaskSpec>,
    #[prost(bool, tag = "2")]
    pub is_success: bool,
    #[prost(string, optional, tag = "3")]
    pub failure_type: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub failure_message: Option<String>,
    #[prost(message, optional, tag = "5")]
    pub log: Option<WireTaskLog>,
    #[prost(message, optional, tag = "6")]
    pub resp_spec: Option<WireTaskSpec>,
}

impl From<&TaskResponse> for WireTaskResponse {
    fn from(r: &TaskResponse) -> Self {
        Self {
            req_spec: Some((&r.req_spec).into()),
            is_success: matches!(r.status, TaskStatus::Success),
            failure_type: r.failure_type.map(|f| f.to_string()),
            failure_message: r.failure_message.clone(),
            log: r.log.as_ref().map(Into::into),
            resp_spec: r.resp_spec.as_ref().map(Into::into),
        }
    }
}

impl TryFrom<WireTaskResponse> for TaskResponse {
    type Error = WireError;

    fn try_from(w: WireTaskResponse) -> Result<Self, Self::Error> {
        let req_spec = w
            .req_spec
            .ok_or_else(|| WireError::Decode(prost::DecodeError::new("missing reqSpec")))?
            .try_into()?;
        let log = w.log.map(TryInto::try_into).transpose()?;
        let resp_spec = w.resp_spec.map(TryInto::try_into).transpose()?;
        Ok(Self {
            req_spec,
            status: if w.is_success {
                TaskStatus::Success
            } else {
                TaskStatus::Failed
            },
            failure_type: w.failure_type.as_deref().map(FailureType::from_legacy_str),
            failure_message: w.failure_message,
            log,
            resp_spec,
        })
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
