// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary wire schema: the length-prefixed protobuf encoding every message
//! bus payload uses on the wire (§6). Kept separate from the domain types
//! in the rest of this crate so the domain modules stay free of `prost`
//! derive noise and the wire schema can evolve (new fields, renamed wire
//! structs) without touching handler logic.

pub mod codec;
pub mod control;
pub mod identity;
pub mod pulse;
pub mod task;

pub use codec::{decode, encode, read_message, write_message, WireError, MAX_MESSAGE_SIZE};
