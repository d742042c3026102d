use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use fqc_portal_arcgis::ArcgisPortal;
use fqc_report::{dispatch_failure_report, FailureCollector, LogMailer};
use fqc_runtime::{run_qc_pass, RunOptions};

#[derive(Parser)]
#[command(name = "fqc")]
#[command(about = "Survey QC automation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a full QC pass over the configured webmaps
    Run {
        /// Path to the run config YAML
        #[arg(long)]
        config: PathBuf,
    },

    /// Validate a config file and print its fingerprint
    CheckConfig {
        /// Path to the run config YAML
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    // Dev-time .env for portal credentials; silently absent in production.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The automation runs unattended; whatever goes wrong is logged, never
    // propagated as a panic or an unhandled error.
    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn real_main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::CheckConfig { config } => {
            let loaded = fqc_config::load(&config)?;
            println!("config_ok=true");
            println!("fingerprint={}", loaded.fingerprint);
            println!("maps={}", loaded.config.maps.len());
            println!("qc_layer_title={}", loaded.config.qc_layer_title);
            println!("owning_tag={}", loaded.config.owning_tag);
            println!("recipients={}", loaded.config.report.recipients.len());
        }

        Commands::Run { config } => {
            let loaded = fqc_config::load(&config)?;
            let cfg = &loaded.config;
            let creds = fqc_config::resolve_credentials(&cfg.portal.credentials_env)?;

            let run_id = Uuid::new_v4();
            info!(run_id = %run_id, config_fingerprint = %loaded.fingerprint, "qc run starting");

            let portal = ArcgisPortal::connect(&cfg.portal.url, &creds.username, creds.password())
                .context("portal sign-in failed")?;

            let opts = RunOptions {
                run_id,
                portal_user: creds.username.clone(),
                qc_layer_title: cfg.qc_layer_title.clone(),
                owning_tag: cfg.owning_tag.clone(),
                map_ids: cfg.maps.clone(),
            };

            let mut collector = FailureCollector::new();
            let pass = run_qc_pass(&portal, &opts, &mut collector);

            // Whatever the pass did, the failures collected so far still get
            // reported before the error (if any) surfaces.
            let mailer = LogMailer;
            dispatch_failure_report(
                &collector,
                &cfg.report.output_dir,
                run_id,
                Utc::now().date_naive(),
                &mailer,
                &cfg.report.recipients,
            )?;

            let stats = pass?;
            println!("run_id={run_id}");
            println!("config_fingerprint={}", loaded.fingerprint);
            println!("maps={}", stats.maps);
            println!("layers={}", stats.layers);
            println!("features={}", stats.features);
            println!("creates={}", stats.creates);
            println!("updates={}", stats.updates);
            println!("resolves={}", stats.resolves);
            println!("noops={}", stats.noops);
            println!("failures={}", stats.failures);
        }
    }

    Ok(())
}
