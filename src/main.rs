use std::process::ExitCode;

use aws_sdk_ec2::Client as Ec2Client;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use rustcleaner::aws_config::configure_aws;
use rustcleaner::cli::Cli;
use rustcleaner::ec2::Ec2Inventory;
use rustcleaner::logging;
use rustcleaner::run::run;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let config = configure_aws(cli.region.clone()).await;
    info!(
        region = config.region().map(|r| r.as_ref()).unwrap_or("unset"),
        timeout_hours = cli.timeout,
        dry_run = cli.dry_run,
        "scanning for rogue instances"
    );
    let inventory = Ec2Inventory::new(Ec2Client::new(&config));

    match run(&inventory, &cli.run_config(), Utc::now()).await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            error!(failed = report.failed_count(), "some terminations failed");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", err.report());
            error!("Check AWS credentials");
            ExitCode::FAILURE
        }
    }
}
