//! oxide-spark CLI
//!
//! Command-line tool for parsing Spark SQL and inspecting the result.

use std::fmt::Debug;
use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_spark_sql::config::DEFAULT_MAX_DEPTH;
use oxide_spark_sql::{
    parse_data_type_with, parse_expression_with, parse_statement_with, parse_table_schema_with,
    tokenize, ParseError, ParserConfig,
};

/// Parse Spark SQL and print the syntax tree.
#[derive(Parser)]
#[command(name = "oxide-spark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Give UNION, EXCEPT, MINUS and INTERSECT the same precedence.
    #[arg(long, env = "OXIDE_SPARK_LEGACY_SETOPS")]
    legacy_setops: bool,

    /// Maximum nesting depth of expressions and queries.
    #[arg(long, env = "OXIDE_SPARK_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Debug)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Pretty-printed JSON.
    Json,
    /// Pretty-printed Rust debug output.
    Debug,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single statement.
    Parse {
        /// SQL text; read from stdin if omitted.
        sql: Option<String>,
    },

    /// Parse a single expression, optionally aliased.
    Expr {
        /// Expression text; read from stdin if omitted.
        sql: Option<String>,
    },

    /// Parse a data type.
    Type {
        /// Type text; read from stdin if omitted.
        sql: Option<String>,
    },

    /// Parse a column list such as `a INT, b STRING`.
    Schema {
        /// Column list text; read from stdin if omitted.
        sql: Option<String>,
    },

    /// Print the token stream.
    Tokens {
        /// SQL text; read from stdin if omitted.
        sql: Option<String>,
    },
}

fn read_input(sql: Option<String>) -> anyhow::Result<String> {
    if let Some(sql) = sql {
        return Ok(sql);
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read SQL from stdin")?;
    Ok(buffer)
}

fn render<T: Serialize + Debug>(value: &T, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(value)?),
        Format::Debug => Ok(format!("{value:#?}")),
    }
}

fn print_result<T: Serialize + Debug>(
    result: Result<T, ParseError>,
    format: Format,
) -> anyhow::Result<ExitCode> {
    match result {
        Ok(value) => {
            println!("{}", render(&value, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ ParseError::UnsupportedStatement { .. }) => {
            error!("statement is recognized but not supported: {err}");
            Ok(ExitCode::from(2))
        }
        Err(err) => {
            error!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ParserConfig::new()
        .with_legacy_setops_precedence(cli.legacy_setops)
        .with_max_depth(cli.max_depth);
    debug!(?config, "parser configuration");

    match cli.command {
        Commands::Parse { sql } => {
            let sql = read_input(sql)?;
            print_result(parse_statement_with(&sql, config), cli.format)
        }
        Commands::Expr { sql } => {
            let sql = read_input(sql)?;
            print_result(parse_expression_with(&sql, config), cli.format)
        }
        Commands::Type { sql } => {
            let sql = read_input(sql)?;
            print_result(parse_data_type_with(&sql, config), cli.format)
        }
        Commands::Schema { sql } => {
            let sql = read_input(sql)?;
            print_result(parse_table_schema_with(&sql, config), cli.format)
        }
        Commands::Tokens { sql } => {
            let sql = read_input(sql)?;
            let tokens = tokenize(&sql);
            println!("{}", render(&tokens, cli.format)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
