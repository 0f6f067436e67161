//! cdc_schema command line tool
//!
//! ## Usage
//!
//! ```bash
//! # Write one schema file per table of `shop` into ./schemas
//! cdc_schema --user cdc --password secret --output-dir schemas shop
//!
//! # Use the databases listed in cdc_schema.toml and print every schema
//! cdc_schema --debug
//! ```

use anyhow::{Context, Result, bail};
use cdc_schema::{
    CdcsConfig, ExportReport, Exporter, FileSystemSchemaStore, MySqlIntrospector, SchemaAssembler,
    TracingSink,
};
use cdcs_telemetry::{LogFormat, TelemetryOptions, init_telemetry};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "cdc_schema")]
#[command(
    author,
    version,
    about = "Generate change-record schema files from MySQL tables"
)]
struct Cli {
    /// Databases to export (default: `databases` from the config file)
    databases: Vec<String>,

    /// Server host [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Server port [default: 3306]
    #[arg(short = 'P', long)]
    port: Option<u16>,

    #[arg(short, long)]
    user: Option<String>,

    #[arg(short, long)]
    password: Option<String>,

    /// Configuration file (default: cdc_schema.toml in this or a parent directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the schema files are written to [default: .]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Replace schema files that already exist
    #[arg(long)]
    overwrite: bool,

    /// Tables exported concurrently per database
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log at debug level and print every generated schema
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn telemetry_options(&self) -> TelemetryOptions {
        TelemetryOptions {
            debug: self.debug,
            format: if self.log_json {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
        }
    }

    /// Apply command-line flags on top of the loaded configuration
    fn apply(&self, config: &mut CdcsConfig) {
        if let Some(host) = &self.host {
            config.connection.host = host.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(user) = &self.user {
            config.connection.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.connection.password = password.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.overwrite {
            config.output.overwrite = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if !self.databases.is_empty() {
            config.databases = self.databases.clone();
        }
    }

    fn config(&self) -> Result<CdcsConfig> {
        let mut config = CdcsConfig::load_from(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;

        if config.databases.is_empty() {
            bail!("no databases given on the command line or in the configuration");
        }
        Ok(config)
    }
}

async fn run(config: CdcsConfig) -> Result<ExportReport> {
    let introspector = MySqlIntrospector::connect(&config.connection)
        .await
        .context("Failed to connect to the source server")?;
    let introspector = Arc::new(introspector);

    let store = FileSystemSchemaStore::new(&config.output.directory)
        .with_overwrite(config.output.overwrite);
    let assembler = SchemaAssembler::from_config(&config.schema, Arc::new(TracingSink));

    let exporter = Exporter::new(introspector.clone(), Arc::new(store), assembler)
        .with_concurrency(config.concurrency);
    let report = exporter.export_all(&config.databases).await;

    introspector.close().await;
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_telemetry(&cli.telemetry_options()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(config).await {
        Ok(report) => {
            tracing::info!(
                written = report.written(),
                skipped = report.skipped(),
                failed = report.failed(),
                unrecognized = report.unrecognized(),
                "Export finished"
            );
            if report.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}
