//! `dnsimple-actions`: run batches of DNSimple resource/operation actions.

mod error;
mod job;
mod logging;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ds_api::{DnsimpleClient, HttpClient};
use ds_engine::{Dispatcher, OutputRecord, Registry};
use serde_json::{json, Value};

use crate::error::Result;
use crate::job::Job;
use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a job file and print the output records as JSON
    Run {
        /// Job file (JSON)
        #[arg(long)]
        job: PathBuf,
        /// Settings file (JSON); DNSIMPLE_* environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print every resource with its operations and fields as JSON
    Catalogue,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::setup_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { job, config } => run(&job, config.as_deref()).await,
        Command::Catalogue => catalogue().and_then(|c| print_json(&c)).map(|_| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(job_path: &std::path::Path, config: Option<&std::path::Path>) -> Result<ExitCode> {
    let settings = Settings::load(config)?;
    let job = Job::from_file(job_path)?;
    let client = DnsimpleClient::with_options(
        settings.api_token()?,
        settings.base_url(),
        settings.timeout(),
    )?;
    tracing::info!(base_url = client.base_url(), items = job.items.len(), "starting run");

    let http: Arc<dyn HttpClient> = Arc::new(client);
    let ctx = job.into_context(http, settings.max_pages());
    let dispatcher = Dispatcher::new(Arc::new(ds_resources::build_registry()?));

    match dispatcher.execute(&ctx).await {
        Ok(records) => {
            print_json(&records_json(&records)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            print_json(&records_json(&failure.completed)?)?;
            eprintln!("{}", serde_json::to_string(&failure.error.payload())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn records_json(records: &[OutputRecord]) -> Result<Value> {
    Ok(serde_json::to_value(records)?)
}

fn catalogue() -> Result<Value> {
    let registry = ds_resources::build_registry()?;
    Ok(describe(&registry))
}

fn describe(registry: &Registry) -> Value {
    let resources: Vec<Value> = registry
        .resource_names()
        .into_iter()
        .filter_map(|name| registry.resource(name))
        .map(|definition| {
            json!({
                "name": definition.name,
                "operations": definition.operations,
                "fields": definition.fields,
            })
        })
        .collect();
    json!({ "resources": resources })
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_and_catalogue() {
        let cli =
            Cli::try_parse_from(["dnsimple-actions", "run", "--job", "job.json"]).expect("run");
        assert!(matches!(
            cli.command,
            Command::Run { ref job, config: None } if job == &PathBuf::from("job.json")
        ));
        let cli = Cli::try_parse_from(["dnsimple-actions", "catalogue"]).expect("catalogue");
        assert!(matches!(cli.command, Command::Catalogue));
        assert!(Cli::try_parse_from(["dnsimple-actions", "run"]).is_err());
    }

    #[test]
    fn catalogue_lists_every_resource_with_operations() {
        let catalogue = catalogue().expect("catalogue");
        let resources = catalogue["resources"].as_array().expect("resources");
        assert_eq!(resources.len(), 8);
        let record = resources
            .iter()
            .find(|r| r["name"] == "record")
            .expect("record resource");
        let operations: Vec<&str> = record["operations"]
            .as_array()
            .expect("operations")
            .iter()
            .filter_map(|op| op["value"].as_str())
            .collect();
        assert_eq!(operations, vec!["list", "get", "create", "update", "delete"]);
    }

    #[test]
    fn output_records_serialise_with_paired_item() {
        let value = records_json(&[OutputRecord::error("boom", 2)]).expect("encode");
        assert_eq!(value, json!([{ "json": { "error": "boom" }, "pairedItem": 2 }]));
        assert_eq!(records_json(&[]).expect("encode"), json!([]));
    }
}
