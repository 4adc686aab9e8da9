//! Taskey CLI.
//!
//! Sends JSON input records to Taskey and prints the output records.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskey::{BatchError, Config, InputRecord, OutputRecord, RecordProcessor, TaskeyClient};

/// Taskey CLI - add leads, purchases, tasks and meetings.
#[derive(Parser)]
#[command(name = "taskey")]
#[command(about = "Send records to the Taskey web API")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Account subdomain
    #[arg(long, global = true, env = "TASKEY_SUBDOMAIN")]
    subdomain: Option<String>,

    /// API key
    #[arg(long, global = true, env = "TASKEY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL override (defaults to https://{subdomain}.taskey.co.il)
    #[arg(long, global = true, env = "TASKEY_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send input records (JSON array or single object)
    Send {
        /// Input file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Emit error records instead of aborting on the first failure
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// Check the configured credentials against the lead endpoint
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for output records
    let filter = if cli.verbose {
        EnvFilter::new("taskey=debug,info")
    } else {
        EnvFilter::from_default_env().add_directive("taskey=info".parse()?)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = Config::default();
    if cli.subdomain.is_some() {
        config.subdomain = cli.subdomain;
    }
    if cli.api_key.is_some() {
        config.api_key = cli.api_key;
    }
    if cli.base_url.is_some() {
        config.base_url = cli.base_url;
    }

    // Credentials are resolved per record from the merged config
    let mut client = TaskeyClient::new(Arc::new(config.clone()));
    if let Some(base_url) = &config.base_url {
        info!(base_url = %base_url, "Using base URL override");
        client = client.with_base_url(base_url.clone());
    }

    match cli.command {
        Commands::Send {
            input,
            continue_on_fail,
        } => {
            let records = read_records(input.as_ref())?;
            let continue_on_fail = continue_on_fail || config.continue_on_fail;
            let processor = RecordProcessor::new(client).continue_on_fail(continue_on_fail);

            let result = processor.process_batch(&records).await;
            println!("{}", render_outputs(batch_outputs(&result))?);

            if let Err(e) = result {
                error!(item = e.item, completed = e.outputs.len(), "Batch aborted");
                return Err(e).context("Failed to send records");
            }
        }

        Commands::Verify => {
            let response = client
                .verify_credentials()
                .await
                .context("Credential check failed")?;
            info!("Taskey credentials are valid");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Outputs produced by a batch, including those before an abort.
fn batch_outputs(result: &Result<Vec<OutputRecord>, BatchError>) -> &[OutputRecord] {
    match result {
        Ok(outputs) => outputs,
        Err(e) => &e.outputs,
    }
}

fn render_outputs(outputs: &[OutputRecord]) -> Result<String> {
    serde_json::to_string_pretty(outputs).context("Failed to encode output records")
}

/// Read input records from a file or stdin.
fn read_records(input: Option<&PathBuf>) -> Result<Vec<InputRecord>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let value: serde_json::Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;
    if value.is_array() {
        serde_json::from_value(value).context("Input does not match the record format")
    } else {
        let record: InputRecord =
            serde_json::from_value(value).context("Input does not match the record format")?;
        Ok(vec![record])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskey::TaskeyError;

    #[test]
    fn test_aborted_batch_keeps_completed_outputs() {
        let result: Result<Vec<OutputRecord>, BatchError> = Err(BatchError {
            item: 1,
            source: TaskeyError::UnknownOperation("addInvoice".to_string()),
            outputs: vec![OutputRecord::success(0, json!({ "ok": true }))],
        });

        let printed: serde_json::Value =
            serde_json::from_str(&render_outputs(batch_outputs(&result)).unwrap()).unwrap();
        assert_eq!(
            printed,
            json!([{
                "json": { "success": true, "response": { "ok": true } },
                "pairedItem": { "item": 0 }
            }])
        );
    }

    #[test]
    fn test_completed_batch_outputs() {
        let result: Result<Vec<OutputRecord>, BatchError> = Ok(vec![
            OutputRecord::success(0, json!("Lead added")),
            OutputRecord::error(1, "boom".to_string()),
        ]);
        assert_eq!(batch_outputs(&result).len(), 2);
    }

    #[test]
    fn test_read_single_record_file() {
        let path = std::env::temp_dir().join(format!("taskey-input-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "operation": "addLead", "name": "Jane" }"#).unwrap();

        let records = read_records(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation, "addLead");
        assert_eq!(records[0].params.name, "Jane");
    }
}
