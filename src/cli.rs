use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConstraintMode, DEFAULT_DATA_DIR, DEFAULT_DATABASE};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Load the university CSV extracts into a SQLite database",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[command(flatten)]
    pub load: LoadArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the table definitions for a constraint mode without touching any database
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// SQLite database file to (re)create
    #[arg(long = "db", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,
    /// Directory holding the four source extracts
    #[arg(long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// Declare primary/foreign keys and upsert on them, or load rows verbatim
    #[arg(long, value_enum, default_value_t = ConstraintMode::Enforced)]
    pub mode: ConstraintMode,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the source files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Departments extract (overrides the file under --data-dir)
    #[arg(long)]
    pub departments: Option<PathBuf>,
    /// Employees extract (overrides the file under --data-dir)
    #[arg(long)]
    pub employees: Option<PathBuf>,
    /// Student counseling extract (overrides the file under --data-dir)
    #[arg(long = "student-counseling")]
    pub student_counseling: Option<PathBuf>,
    /// Student performance extract (overrides the file under --data-dir)
    #[arg(long = "student-performance")]
    pub student_performance: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Constraint mode whose DDL should be printed
    #[arg(long, value_enum, default_value_t = ConstraintMode::Enforced)]
    pub mode: ConstraintMode,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_selects_stock_load() {
        let cli = Cli::try_parse_from(["university-loader"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.load.database, PathBuf::from("university_data.db"));
        assert_eq!(cli.load.data_dir, PathBuf::from("Data"));
        assert_eq!(cli.load.mode, ConstraintMode::Enforced);
        assert!(cli.load.delimiter.is_none());
    }

    #[test]
    fn schema_subcommand_takes_mode() {
        let cli = Cli::try_parse_from(["university-loader", "schema", "--mode", "unconstrained"])
            .expect("parse");
        match cli.command {
            Some(Commands::Schema(args)) => assert_eq!(args.mode, ConstraintMode::Unconstrained),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn delimiter_aliases_resolve() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("pipe"), Ok(b'|'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
