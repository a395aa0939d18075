// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn subscription_not_found_names_the_subscription() {
    let err = PubSubError::SubscriptionNotFound("copy-tasks".into());
    assert!(err.to_string().contains("copy-tasks"));
}
