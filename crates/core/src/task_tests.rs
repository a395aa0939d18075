// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{TaskKind, TaskRequest, TaskResponse, TaskSpec, TaskStatus};
use crate::failure::FailureType;
use crate::list::ListSpec;

fn list_request() -> TaskRequest {
    TaskRequest {
        task_rel_resource_name: "tasks/1".into(),
        job_run_rel_resource_name: "jobRuns/jr-1".into(),
        job_run_version: 1,
        spec: TaskSpec::List(ListSpec {
            dst_list_result_bucket: "b".into(),
            dst_list_result_object: "listing.txt".into(),
            src_directories: vec!["/data".into()],
            expected_generation_num: 0,
            max_depth: 5,
        }),
    }
}

#[test]
fn task_kind_matches_spec_variant() {
    assert_eq!(list_request().spec.kind(), TaskKind::List);
    assert_eq!(TaskKind::List.as_str(), "list");
    assert_eq!(TaskKind::Copy.as_str(), "copy");
    assert_eq!(TaskKind::Delete.as_str(), "delete");
}

#[test]
fn not_active_jobrun_echoes_request_spec() {
    let req = list_request();
    let resp = TaskResponse::not_active_jobrun(&req);
    assert!(resp.echoes(&req));
    assert_eq!(resp.status, TaskStatus::Failed);
    assert_eq!(resp.failure_type, Some(FailureType::NotActiveJobrun));
}

#[test]
fn echoes_detects_mismatch() {
    let req = list_request();
    let mut other = req.clone();
    other.spec = TaskSpec::List(ListSpec {
        dst_list_result_bucket: "different".into(),
        dst_list_result_object: "listing.txt".into(),
        src_directories: vec!["/data".into()],
        expected_generation_num: 0,
        max_depth: 5,
    });
    let resp = TaskResponse::not_active_jobrun(&other);
    assert!(!resp.echoes(&req));
}
