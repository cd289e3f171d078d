#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use dotenv::dotenv;
use rustls::crypto::ring;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use zkv_artifacts::ProofArtifact;
use zkv_pipeline::{
    keypair_from_secret, CallVariant, Pipeline, PipelineError, RunReport, Settings,
};
use zkv_rpc::{NetworkError, SuiClient};

/// The CLI application that defines all available commands.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
enum Args {
    /// Dry-run the registration of a verifying key. Nothing is submitted.
    RegisterVk(RunArgs),
    /// Dry-run a proof verification and, if it passes, sign and submit it.
    Verify(RunArgs),
    /// Print the fields of an artifact file.
    Inspect(InspectArgs),
    /// Print the address derived from SUI_PRIVATE_KEY.
    Address,
}

/// The arguments shared by `register-vk` and `verify`.
#[derive(Debug, Clone, Parser)]
struct RunArgs {
    /// The artifact file. Defaults to where the proving toolchain writes it.
    #[arg(long)]
    artifact: Option<PathBuf>,
    /// Overrides SUI_RPC_URL.
    #[arg(long)]
    rpc_url: Option<String>,
    /// Overrides SUI_GAS_BUDGET, in MIST.
    #[arg(long)]
    gas_budget: Option<u64>,
}

/// The arguments for the `inspect` command.
#[derive(Debug, Clone, Parser)]
struct InspectArgs {
    /// The artifact file.
    #[arg(long)]
    artifact: PathBuf,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl Row {
    fn new(name: &str, value: impl ToString) -> Self {
        Self { name: name.to_string(), value: value.to_string() }
    }
}

fn print_table(title: &str, rows: Vec<Row>) {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("\n{title}:");
    println!("{table}\n");
}

fn preview(hex: &str) -> String {
    const PREVIEW_CHARS: usize = 64;
    if hex.len() > PREVIEW_CHARS {
        format!("{}...", &hex[..PREVIEW_CHARS])
    } else {
        hex.to_string()
    }
}

fn print_artifact(artifact: &ProofArtifact) {
    let rows = artifact
        .summary()
        .into_iter()
        .map(|field| {
            Row::new(field.field.key(), format!("{} bytes, {}", field.len, preview(&field.hex)))
        })
        .collect();
    print_table("Artifact", rows);
}

fn print_report(report: &RunReport, settings: &Settings) -> Result<()> {
    print_artifact(&report.artifact);

    let gas = report.dry_run.effects.gas_used;
    let mut rows = vec![
        Row::new("Variant", report.variant),
        Row::new("Target", report.descriptor.target()),
        Row::new("Sender", report.address),
        Row::new("Transaction Digest", report.digest),
        Row::new("Computation Cost", format!("{} MIST", gas.computation_cost)),
        Row::new("Storage Cost", format!("{} MIST", gas.storage_cost)),
        Row::new("Storage Rebate", format!("{} MIST", gas.storage_rebate)),
        Row::new("Net Gas Usage", format!("{} MIST", gas.net_gas_usage())),
    ];
    if let Some(execution) = &report.execution {
        rows.push(Row::new("Executed Digest", &execution.digest));
        rows.push(Row::new("Explorer", settings.explorer_link(&execution.digest)));
    }
    print_table("Dry Run", rows);

    println!("Dry run response:");
    println!("{}", serde_json::to_string_pretty(&report.dry_run.raw)?);
    if let Some(execution) = &report.execution {
        println!("\nExecution response:");
        println!("{}", serde_json::to_string_pretty(&execution.raw)?);
    }
    Ok(())
}

/// The main entry point for the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file.
    dotenv().ok();

    // Setup ring.
    ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    // Parse the arguments.
    let cli = Args::parse();

    // Load the settings and initialize logging.
    let mut settings = Settings::new()?;
    zkv_utils::init_logger(settings.log_format);

    // Run the command.
    match cli {
        Args::RegisterVk(args) => run(CallVariant::Registration, args, &mut settings).await?,
        Args::Verify(args) => run(CallVariant::Verification, args, &mut settings).await?,
        Args::Inspect(args) => {
            let artifact = ProofArtifact::load(&args.artifact, &[])?;
            print_artifact(&artifact);
        }
        Args::Address => {
            let keypair = keypair_from_secret(settings.private_key.as_ref())?;
            print_table("Signer", vec![Row::new("Address", keypair.address())]);
        }
    }

    Ok(())
}

async fn run(variant: CallVariant, args: RunArgs, settings: &mut Settings) -> Result<()> {
    if let Some(rpc_url) = args.rpc_url {
        settings.rpc_url = rpc_url;
    }
    if let Some(gas_budget) = args.gas_budget {
        settings.gas_budget = gas_budget;
    }

    // Setup the connection to the network.
    let client = SuiClient::connect(&settings.rpc_url)?;
    let config = settings.pipeline_config(variant, args.artifact)?;

    info!(
        variant = %variant,
        rpc = %settings.rpc_url,
        artifact = %config.artifact_path.display(),
        package = %config.package,
        gas_budget = config.gas_budget,
        "Starting proof submission..."
    );
    let pipeline = Pipeline::new(client, config);
    let report = match pipeline.run(settings.private_key.as_ref()).await {
        Ok(report) => report,
        Err(e) => {
            if let PipelineError::Execute(NetworkError::Broadcast {
                digest,
                result: Some(result),
                ..
            }) = &e
            {
                println!("\nExecution response:");
                println!("{}", serde_json::to_string_pretty(&result.raw)?);
                println!("Explorer: {}", settings.explorer_link(digest));
            }
            return Err(e.into());
        }
    };
    print_report(&report, settings)
}
