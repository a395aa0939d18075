// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external I/O the transfer agent depends on: cloud
//! object storage and the pub/sub message bus.

pub mod object_store;
pub mod pubsub;
pub mod traced;

pub use object_store::{ObjectMetadata, ObjectStoreAdapter, ObjectStoreError, ResumableSession};
pub use pubsub::{Delivery, PubSubAdapter, PubSubError, Subscription};
pub use traced::{TracedObjectStore, TracedPubSub};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeObjectStore, FakePubSub, StoredObject};
