use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::inventory::{InstanceRecord, Inventory, TagFilter};

/// A tagged instance that outlived the threshold and is still alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RogueCandidate {
    pub record: InstanceRecord,
    pub age: TimeDelta,
}

impl RogueCandidate {
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

pub struct Classifier<'a, I> {
    inventory: &'a I,
    tag_filter: &'a TagFilter,
}

impl<'a, I: Inventory> Classifier<'a, I> {
    pub fn new(inventory: &'a I, tag_filter: &'a TagFilter) -> Self {
        Self {
            inventory,
            tag_filter,
        }
    }

    /// Select tagged instances launched more than `threshold_hours` before
    /// `now` that are not already terminated. Order follows the inventory.
    pub async fn classify(
        &self,
        threshold_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<RogueCandidate>> {
        let records = self
            .inventory
            .list_instances_by_tag(self.tag_filter)
            .await?;
        debug!(
            tag = %self.tag_filter,
            count = records.len(),
            "inventory scan complete"
        );

        let threshold = TimeDelta::hours(i64::from(threshold_hours));
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for record in records {
            if !seen.insert(record.id.clone()) {
                continue;
            }

            let age = now - record.launch_time;
            // A deadline past chrono's range is never reached.
            let past_deadline = record
                .launch_time
                .checked_add_signed(threshold)
                .is_some_and(|deadline| now > deadline);
            if !past_deadline {
                debug!(instance_id = %record.id, age = %format_age(age), "within threshold");
                continue;
            }
            if record.lifecycle_state.is_terminated() {
                debug!(instance_id = %record.id, age = %format_age(age), "already terminated");
                continue;
            }

            info!(
                instance_id = %record.id,
                age = %format_age(age),
                state = %record.lifecycle_state,
                "rogue instance"
            );
            candidates.push(RogueCandidate { record, age });
        }

        Ok(candidates)
    }
}

/// `6h05m`, or `-0h10m` for a launch time in the future (clock skew).
pub fn format_age(age: TimeDelta) -> String {
    let sign = if age < TimeDelta::zero() { "-" } else { "" };
    let minutes = age.num_minutes().abs();
    format!("{}{}h{:02}m", sign, minutes / 60, minutes % 60)
}
