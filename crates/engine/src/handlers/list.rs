// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! List Handler (§4.6): bounded depth-first directory traversal producing a
//! sorted listing artifact.

use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use ta_adapters::{ObjectStoreAdapter, ObjectStoreError};
use ta_core::{apply_prefix, strip_prefix_once, ListEntry, ListLog, ListSpec, TaskLog, TaskResponse, TaskSpec};

/// Delimiter between records in the listing artifact body.
const RECORD_DELIMITER: &str = "\n";
const FIELD_DELIMITER: &str = "\t";

pub struct ListHandler {
    store: Arc<dyn ObjectStoreAdapter>,
    mount_directory: String,
}

impl ListHandler {
    pub fn new(store: Arc<dyn ObjectStoreAdapter>, mount_directory: String) -> Self {
        Self { store, mount_directory }
    }

    pub async fn handle(&self, task_full_id: &str, spec: ListSpec) -> TaskResponse {
        let req_spec = TaskSpec::List(spec.clone());

        let mut entries = Vec::new();
        let mut log = ListLog::default();

        for src_dir in &spec.src_directories {
            let resolved = apply_prefix(&self.mount_directory, src_dir);
            if tokio::fs::metadata(&resolved).await.is_err() {
                return TaskResponse::failure(
                    req_spec,
                    ta_core::FailureType::SourceDirNotFound,
                    strip_prefix_once(&self.mount_directory, &resolved),
                    None,
                );
            }
            walk_one(&resolved, &self.mount_directory, spec.max_depth, &mut entries, &mut log);
        }

        insert_sorted_unique(&mut entries);

        let artifact = render_artifact(task_full_id, &entries);
        match self
            .store
            .write_object(&spec.dst_list_result_bucket, &spec.dst_list_result_object, artifact.into_bytes(), spec.precondition())
            .await
        {
            Ok(_) => TaskResponse::success(req_spec, TaskLog::List(log), None),
            Err(ObjectStoreError::PreconditionFailed { .. }) => {
                TaskResponse::failure(req_spec, ta_core::FailureType::PreconditionFailure, "generation precondition rejected", None)
            }
            Err(e) => TaskResponse::failure(req_spec, ta_core::FailureType::Unknown, e.to_string(), None),
        }
    }
}

/// Depth-first walk of one source directory. Symlinks are not followed;
/// unreadable subdirectories are recorded as `DirError` entries and
/// traversal continues past them.
fn walk_one(root: &str, mount_directory: &str, max_depth: u32, entries: &mut Vec<ListEntry>, log: &mut ListLog) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .max_depth(max_depth as usize)
        .into_iter();

    for item in walker {
        let entry = match item {
            Ok(e) => e,
            Err(err) => {
                log.dirs_failed += 1;
                let rel_path = err
                    .path()
                    .map(|p| relative_path(root, mount_directory, p))
                    .unwrap_or_default();
                entries.push(ListEntry::DirError {
                    rel_path,
                    message: err.to_string(),
                });
                continue;
            }
        };

        let rel_path = relative_path(root, mount_directory, entry.path());
        if entry.file_type().is_dir() {
            if entry.depth() > 0 {
                log.dirs_seen += 1;
                entries.push(ListEntry::Dir { rel_path });
            }
        } else if entry.file_type().is_file() {
            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };
            let size = meta.len();
            let mtime = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            log.files_seen += 1;
            log.bytes_found += size;
            entries.push(ListEntry::File { rel_path, size, mtime });
        }
        // symlinks: WalkDir with follow_links(false) reports them as
        // non-dir, non-file entries via file_type(); they are intentionally
        // skipped per §4.6.
    }
}

fn relative_path(root: &str, mount_directory: &str, path: &Path) -> String {
    let root_stripped = strip_prefix_once(mount_directory, root);
    let full = strip_prefix_once(mount_directory, &path.to_string_lossy());
    full.strip_prefix(&root_stripped)
        .unwrap_or(&full)
        .trim_start_matches('/')
        .to_string()
}

/// Binary-search insertion keeping `entries` sorted by path (§4.6).
fn insert_sorted_unique(entries: &mut Vec<ListEntry>) {
    entries.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
}

fn render_artifact(task_full_id: &str, entries: &[ListEntry]) -> String {
    let mut out = String::new();
    out.push_str(task_full_id);
    out.push_str(RECORD_DELIMITER);
    for entry in entries {
        match entry {
            ListEntry::File { rel_path, size, mtime } => {
                out.push_str(&format!("F{FIELD_DELIMITER}{rel_path}{FIELD_DELIMITER}{size}{FIELD_DELIMITER}{mtime}"));
            }
            ListEntry::Dir { rel_path } => {
                out.push_str(&format!("D{FIELD_DELIMITER}{rel_path}"));
            }
            ListEntry::DirError { rel_path, message } => {
                out.push_str(&format!("E{FIELD_DELIMITER}{rel_path}{FIELD_DELIMITER}{message}"));
            }
        }
        out.push_str(RECORD_DELIMITER);
    }
    out
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
