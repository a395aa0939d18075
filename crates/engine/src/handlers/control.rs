// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control Handler (§4.7): single-reader application of control messages to
//! Rate/Admission and the agent-update hint file.

use std::time::SystemTime;

use parking_lot::Mutex;

use ta_core::{AgentIdentity, ControlMessage};

use crate::identity::AgentUpdateWriter;
use crate::rate_admission::RateAdmission;
use crate::stats::Stats;

pub struct ControlHandler {
    admission: RateAdmission,
    stats: Stats,
    update_writer: AgentUpdateWriter,
    identity: AgentIdentity,
    last_applied_publish_time: Mutex<Option<SystemTime>>,
}

impl ControlHandler {
    pub fn new(admission: RateAdmission, stats: Stats, update_writer: AgentUpdateWriter, identity: AgentIdentity) -> Self {
        Self {
            admission,
            stats,
            update_writer,
            identity,
            last_applied_publish_time: Mutex::new(None),
        }
    }

    /// Returns `true` if the message was applied, `false` if it was dropped
    /// as stale. Decode failures are the caller's concern (§4.7: "decode; on
    /// decode failure, ack and drop" happens before this is invoked).
    pub async fn handle(&self, message: ControlMessage) -> bool {
        {
            let last = self.last_applied_publish_time.lock();
            if let Some(last) = *last {
                if message.publish_time < last {
                    return false;
                }
            }
        }

        self.admission.apply_control(&message);
        if let Err(e) = self.update_writer.apply(&self.identity, &message).await {
            tracing::warn!(error = %e, "failed to apply agent-update hint");
        }

        *self.last_applied_publish_time.lock() = Some(message.publish_time);
        self.stats.record_control_message(message.publish_time);
        true
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
