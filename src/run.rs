//! One cleanup pass: classify, then report or terminate.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::classifier::{format_age, Classifier, RogueCandidate};
use crate::error::Result;
use crate::inventory::{Inventory, TagFilter};
use crate::terminator::{TerminationOutcome, Terminator, DEFAULT_CONCURRENCY};

pub const DEFAULT_THRESHOLD_HOURS: u32 = 4;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub threshold_hours: u32,
    /// Classify and log only; never terminate.
    pub report_only: bool,
    pub tag_filter: TagFilter,
    pub concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threshold_hours: DEFAULT_THRESHOLD_HOURS,
            report_only: false,
            tag_filter: TagFilter::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunReport {
    NoRogueInstances,
    ReportOnly(Vec<RogueCandidate>),
    Terminated(Vec<TerminationOutcome>),
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        match self {
            RunReport::Terminated(outcomes) => outcomes.iter().filter(|o| o.is_failure()).count(),
            _ => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Run a single pass against `inventory` as of `now`.
///
/// Only a failed inventory scan is an `Err`; termination failures are
/// reported per instance inside [`RunReport::Terminated`].
pub async fn run<I: Inventory>(
    inventory: &I,
    config: &RunConfig,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    let candidates = Classifier::new(inventory, &config.tag_filter)
        .classify(config.threshold_hours, now)
        .await?;

    if candidates.is_empty() {
        info!("no rogue instances");
        return Ok(RunReport::NoRogueInstances);
    }

    if config.report_only {
        info!(count = candidates.len(), "dry run mode, not terminating");
        for candidate in &candidates {
            info!(
                instance_id = candidate.id(),
                age = %format_age(candidate.age),
                state = %candidate.record.lifecycle_state,
                "would terminate"
            );
        }
        return Ok(RunReport::ReportOnly(candidates));
    }

    info!(count = candidates.len(), "terminating instances");
    let outcomes = Terminator::new(inventory)
        .with_concurrency(config.concurrency)
        .terminate(&candidates)
        .await;

    let report = RunReport::Terminated(outcomes);
    info!(
        requested = candidates.len(),
        failed = report.failed_count(),
        "termination pass complete"
    );
    Ok(report)
}
