use std::collections::HashMap;

use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::primitives::DateTime as AwsDateTime;
use aws_sdk_ec2::types::{Filter, Instance, InstanceState};
use aws_sdk_ec2::Client as Ec2Client;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{CleanerError, Result};
use crate::inventory::{InstanceRecord, Inventory, LifecycleState, TagFilter};

const DESCRIBE_INSTANCES: &str = "DescribeInstances";
const TERMINATE_INSTANCES: &str = "TerminateInstances";

/// [`Inventory`] backed by the EC2 API.
pub struct Ec2Inventory {
    client: Ec2Client,
}

impl Ec2Inventory {
    pub fn new(client: Ec2Client) -> Self {
        Self { client }
    }
}

impl Inventory for Ec2Inventory {
    async fn list_instances_by_tag(&self, filter: &TagFilter) -> Result<Vec<InstanceRecord>> {
        let mut pages = self
            .client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name(format!("tag:{}", filter.key))
                    .values(&filter.value)
                    .build(),
            )
            .into_paginator()
            .send();

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                CleanerError::provider(DESCRIBE_INSTANCES, DisplayErrorContext(e).to_string())
            })?;
            records.extend(
                page.reservations()
                    .iter()
                    .flat_map(|res| res.instances())
                    .filter_map(to_record),
            );
        }

        debug!(tag = %filter, count = records.len(), "described instances");
        Ok(records)
    }

    async fn terminate_instance(&self, id: &str) -> Result<LifecycleState> {
        let resp = self
            .client
            .terminate_instances()
            .instance_ids(id)
            .send()
            .await
            .map_err(|e| {
                CleanerError::provider(TERMINATE_INSTANCES, DisplayErrorContext(e).to_string())
            })?;

        resp.terminating_instances()
            .first()
            .ok_or(CleanerError::MalformedResponse {
                operation: TERMINATE_INSTANCES,
                field: "TerminatingInstances",
            })
            .map(|change| state_of(change.current_state()))
    }
}

fn to_record(inst: &Instance) -> Option<InstanceRecord> {
    let Some(id) = inst.instance_id() else {
        warn!("skipping instance without an id");
        return None;
    };
    let Some(launch_time) = inst.launch_time().and_then(to_utc) else {
        warn!(instance_id = id, "skipping instance without a usable launch time");
        return None;
    };

    let tags = inst
        .tags()
        .iter()
        .filter_map(|tag| Some((tag.key()?.to_string(), tag.value().unwrap_or_default().to_string())))
        .collect::<HashMap<_, _>>();

    Some(InstanceRecord {
        id: id.to_string(),
        launch_time,
        lifecycle_state: state_of(inst.state()),
        tags,
    })
}

fn state_of(state: Option<&InstanceState>) -> LifecycleState {
    state
        .and_then(|s| s.name())
        .map(|name| LifecycleState::from(name.as_str()))
        .unwrap_or_else(|| LifecycleState::Other("unknown".to_string()))
}

fn to_utc(dt: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}
