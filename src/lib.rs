pub mod cli;
pub mod config;
pub mod error;
pub mod importer;
pub mod io_utils;
pub mod loader;
pub mod schema;
pub mod summary;

use std::{env, io, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, LoadArgs, SchemaArgs},
    config::{LoadConfig, SourceFiles},
    loader::Loader,
};

pub use crate::{
    config::ConstraintMode,
    error::LoadError,
    loader::LoadReport,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("university_loader", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Schema(args)) => handle_schema(&args),
        None => handle_load(&cli.load),
    }
}

fn handle_schema(args: &SchemaArgs) -> Result<()> {
    print!("{}", schema::schema_sql(args.mode));
    Ok(())
}

fn handle_load(args: &LoadArgs) -> Result<()> {
    let config = load_config(args)?;
    info!(
        "Loading extracts into {:?} using delimiter '{}'",
        config.database,
        config
            .delimiter
            .map(printable_delimiter)
            .unwrap_or_else(|| "auto".into())
    );
    let loader = Loader::new(config);
    let stdout = io::stdout();
    let report = loader
        .run(&mut stdout.lock())
        .with_context(|| format!("Loading into {:?}", loader.config().database))?;
    let total: u64 = report.imports.iter().map(|import| import.rows).sum();
    info!(
        "Processed {total} row(s) from {} file(s)",
        report.imports.len()
    );
    Ok(())
}

/// Builds the load configuration from command-line arguments.
pub fn load_config(args: &LoadArgs) -> Result<LoadConfig> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let defaults = SourceFiles::in_dir(&args.data_dir);
    let sources = SourceFiles {
        departments: args.departments.clone().unwrap_or(defaults.departments),
        employees: args.employees.clone().unwrap_or(defaults.employees),
        student_counseling: args
            .student_counseling
            .clone()
            .unwrap_or(defaults.student_counseling),
        student_performance: args
            .student_performance
            .clone()
            .unwrap_or(defaults.student_performance),
    };
    Ok(LoadConfig {
        database: args.database.clone(),
        mode: args.mode,
        sources,
        delimiter: args.delimiter,
        encoding,
    })
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
