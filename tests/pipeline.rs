//! End-to-end passes over an in-memory inventory.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use rustcleaner::inventory::{InstanceRecord, Inventory, LifecycleState, TagFilter};
use rustcleaner::run::{run, RunConfig, RunReport};
use rustcleaner::{CleanerError, Result};

struct MemoryInventory {
    instances: Vec<InstanceRecord>,
    terminated: Mutex<Vec<String>>,
    reject: Option<&'static str>,
}

impl MemoryInventory {
    fn new(instances: Vec<InstanceRecord>) -> Self {
        Self {
            instances,
            terminated: Mutex::new(Vec::new()),
            reject: None,
        }
    }

    fn terminated(&self) -> Vec<String> {
        self.terminated.lock().unwrap().clone()
    }
}

impl Inventory for MemoryInventory {
    async fn list_instances_by_tag(&self, filter: &TagFilter) -> Result<Vec<InstanceRecord>> {
        Ok(self
            .instances
            .iter()
            .filter(|r| r.tags.get(&filter.key) == Some(&filter.value))
            .cloned()
            .collect())
    }

    async fn terminate_instance(&self, id: &str) -> Result<LifecycleState> {
        self.terminated.lock().unwrap().push(id.to_string());
        if self.reject == Some(id) {
            return Err(CleanerError::provider("TerminateInstances", "UnauthorizedOperation"));
        }
        Ok(LifecycleState::ShuttingDown)
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
}

fn instance(id: &str, launched: DateTime<Utc>, workload: &str) -> InstanceRecord {
    InstanceRecord {
        id: id.to_string(),
        launch_time: launched,
        lifecycle_state: LifecycleState::Running,
        tags: HashMap::from([("Workload".to_string(), workload.to_string())]),
    }
}

fn ci_fleet() -> MemoryInventory {
    MemoryInventory::new(vec![
        instance("i-aaa", at(6), "CI Runner"),
        instance("i-bbb", at(11), "CI Runner"),
        instance("i-web", at(0), "Web"),
    ])
}

#[tokio::test]
async fn terminates_the_stale_ci_runner_only() {
    let inventory = ci_fleet();

    let report = run(&inventory, &RunConfig::default(), at(12)).await.unwrap();

    assert_eq!(inventory.terminated(), vec!["i-aaa"]);
    match report {
        RunReport::Terminated(outcomes) => {
            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].instance_id, "i-aaa");
            assert_eq!(
                outcomes[0].result.as_ref().unwrap(),
                &LifecycleState::ShuttingDown
            );
        }
        other => panic!("unexpected report: {other:?}"),
    }
}

#[tokio::test]
async fn dry_run_reports_without_terminating() {
    let inventory = ci_fleet();
    let config = RunConfig {
        report_only: true,
        ..Default::default()
    };

    let report = run(&inventory, &config, at(12)).await.unwrap();

    assert!(matches!(report, RunReport::ReportOnly(ref c) if c.len() == 1));
    assert!(inventory.terminated().is_empty());
}

#[tokio::test]
async fn custom_tag_filter_selects_other_workloads() {
    let inventory = ci_fleet();
    let config = RunConfig {
        tag_filter: TagFilter::new("Workload", "Web"),
        ..Default::default()
    };

    run(&inventory, &config, at(12)).await.unwrap();

    assert_eq!(inventory.terminated(), vec!["i-web"]);
}

#[tokio::test]
async fn longer_threshold_spares_everything() {
    let inventory = ci_fleet();
    let config = RunConfig {
        threshold_hours: 24,
        ..Default::default()
    };

    let report = run(&inventory, &config, at(12)).await.unwrap();

    assert!(matches!(report, RunReport::NoRogueInstances));
    assert!(inventory.terminated().is_empty());
}

#[tokio::test]
async fn rejected_termination_fails_the_run_but_not_the_batch() {
    let mut inventory = MemoryInventory::new(vec![
        instance("i-1", at(0), "CI Runner"),
        instance("i-2", at(1), "CI Runner"),
        instance("i-3", at(2), "CI Runner"),
    ]);
    inventory.reject = Some("i-2");

    let report = run(&inventory, &RunConfig::default(), at(12)).await.unwrap();

    assert_eq!(inventory.terminated().len(), 3);
    assert_eq!(report.failed_count(), 1);
    assert!(!report.is_success());
}
