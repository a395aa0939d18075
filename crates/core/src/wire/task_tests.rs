// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::failure::FailureType;

fn sample_copy_spec() -> CopySpec {
    CopySpec {
        src_file: "data/a.txt".into(),
        dst_bucket: "bucket".into(),
        dst_object: "object".into(),
        expected_generation_num: 7,
        file_bytes: 1024,
        file_mtime: 1_700_000_000,
        bytes_copied: 512,
        crc32_c: 0xdeadbeef,
        bytes_to_copy: 1024,
        resumable_upload_id: "upload-1".into(),
    }
}

#[test]
fn copy_task_request_round_trips_through_wire_form() {
    let req = TaskRequest {
        task_rel_resource_name: "tasks/1".into(),
        job_run_rel_resource_name: "jobRuns/1".into(),
        job_run_version: 3,
        spec: TaskSpec::Copy(sample_copy_spec()),
    };
    let wire = WireTaskRequest::from(&req);
    let bytes = crate::wire::codec::encode(&wire).unwrap();
    let decoded: WireTaskRequest = crate::wire::codec::decode(&bytes).unwrap();
    let back = TaskRequest::try_from(decoded).unwrap();
    assert_eq!(back, req);
}

#[test]
fn list_and_delete_specs_round_trip() {
    let list_req = TaskRequest {
        task_rel_resource_name: "tasks/2".into(),
        job_run_rel_resource_name: "jobRuns/1".into(),
        job_run_version: 1,
        spec: TaskSpec::List(crate::list::ListSpec {
            dst_list_result_bucket: "b".into(),
            dst_list_result_object: "o".into(),
            src_directories: vec!["a".into(), "b".into()],
            expected_generation_num: 0,
            max_depth: 5,
        }),
    };
    let wire = WireTaskRequest::from(&list_req);
    let decoded = TaskRequest::try_from(wire).unwrap();
    assert_eq!(decoded, list_req);

    let delete_req = TaskRequest {
        task_rel_resource_name: "tasks/3".into(),
        job_run_rel_resource_name: "jobRuns/1".into(),
        job_run_version: 1,
        spec: TaskSpec::Delete(crate::delete::DeleteSpec {
            bucket: "b".into(),
            object: "o".into(),
            expected_generation_num: 9,
        }),
    };
    let wire = WireTaskRequest::from(&delete_req);
    let decoded = TaskRequest::try_from(wire).unwrap();
    assert_eq!(decoded, delete_req);
}

#[test]
fn task_spec_with_no_variant_set_fails_to_decode() {
    let empty = WireTaskSpec {
        copy: None,
        list: None,
        delete: None,
    };
    assert!(TaskSpec::try_from(empty).is_err());
}

#[test]
fn task_spec_with_two_variants_set_fails_to_decode() {
    let ambiguous = WireTaskSpec {
        copy: Some((&sample_copy_spec()).into()),
        list: Some(WireListSpec {
            dst_list_result_bucket: "b".into(),
            dst_list_result_object: "o".into(),
            src_directories: vec![],
            expected_generation_num: 0,
            max_depth: 1,
        }),
        delete: None,
    };
    assert!(TaskSpec::try_from(ambiguous).is_err());
}

#[test]
fn successful_response_round_trips_including_echoed_req_spec() {
    let req_spec = TaskSpec::Copy(sample_copy_spec());
    let resp = TaskResponse::success(
        req_spec.clone(),
        TaskLog::Copy(CopyLog {
            bytes_copied: 1024,
            crc32_c: 0xdeadbeef,
            dst_generation: 8,
        }),
        None,
    );
    let wire = WireTaskResponse::from(&resp);
    let bytes = crate::wire::codec::encode(&wire).unwrap();
    let decoded: WireTaskResponse = crate::wire::codec::decode(&bytes).unwrap();
    let back = TaskResponse::try_from(decoded).unwrap();
    assert_eq!(back, resp);
}

#[test]
fn failure_response_round_trips_the_legacy_failure_type_string() {
    let req_spec = TaskSpec::Copy(sample_copy_spec());
    let resp = TaskResponse::failure(
        req_spec,
        FailureType::Md5MismatchFailure,
        "checksum mismatch",
        None,
    );
    let wire = WireTaskResponse::from(&resp);
    assert_eq!(wire.failure_type.as_deref(), Some("MD5_MISMATCH_FAILURE"));
    let back = TaskResponse::try_from(wire).unwrap();
    assert_eq!(back, resp);
}
