// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fakes for [`crate::ObjectStoreAdapter`] and
//! [`crate::PubSubAdapter`], used by engine unit tests and the daemon's
//! non-production default wiring.
#![cfg_attr(coverage_nightly, coverage(off))]

mod object_store;
mod pubsub;

pub use object_store::{FakeObjectStore, StoredObject};
pub use pubsub::FakePubSub;
