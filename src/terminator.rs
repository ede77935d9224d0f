use futures::stream::{self, StreamExt};
use tracing::{error, info};

use crate::classifier::RogueCandidate;
use crate::error::Result;
use crate::inventory::{Inventory, LifecycleState};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Acknowledgement (or failure) of one terminate request.
#[derive(Debug)]
pub struct TerminationOutcome {
    pub instance_id: String,
    pub result: Result<LifecycleState>,
}

impl TerminationOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

pub struct Terminator<'a, I> {
    inventory: &'a I,
    concurrency: usize,
}

impl<'a, I: Inventory> Terminator<'a, I> {
    pub fn new(inventory: &'a I) -> Self {
        Self {
            inventory,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Maximum number of terminate requests in flight. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Issue one terminate request per candidate. A failed request is
    /// recorded in its outcome and never stops the others. Outcomes are
    /// returned in candidate order.
    pub async fn terminate(&self, candidates: &[RogueCandidate]) -> Vec<TerminationOutcome> {
        stream::iter(candidates)
            .map(|candidate| self.terminate_one(candidate.id()))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn terminate_one(&self, instance_id: &str) -> TerminationOutcome {
        let result = self.inventory.terminate_instance(instance_id).await;
        match &result {
            Ok(state) => info!(instance_id, state = %state, "termination acknowledged"),
            Err(err) => error!(instance_id, error = %err.report(), "termination failed"),
        }
        TerminationOutcome {
            instance_id: instance_id.to_string(),
            result,
        }
    }
}
