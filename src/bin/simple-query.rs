//! simple-query: compile query documents from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compile a JSON or TOML query document
//! simple-query compile query.json
//!
//! # Pick the dialect, print arguments as JSON
//! simple-query compile query.toml --dialect mysql --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use simple_query::operator::OperatorClass;
use simple_query::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-query")]
#[command(version)]
#[command(about = "Compile query documents into parameterized SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    simple-query compile query.json
    simple-query compile query.toml --dialect mysql
    simple-query compile query.json --format json")]
struct Cli {
    /// Configuration file (defaults to simple-query.toml, then the user config dir)
    #[arg(short, long, global = true, env = "SIMPLE_QUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Mysql,
    Postgres,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Mysql => Dialect::MySQL,
            DialectArg::Postgres => Dialect::Postgres,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query document (JSON, or TOML by extension)
    Compile {
        /// The document to compile
        file: PathBuf,

        /// Target dialect (overrides the configuration)
        #[arg(short, long, value_enum)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show placeholder syntax per dialect
    Dialects,
    /// Show the operator reference
    Operators,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Compile { file, dialect, format } => compile(&cli, file, *dialect, *format),
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
        Commands::Operators => {
            show_operators();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "simple_query=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

fn compile(cli: &Cli, file: &Path, dialect: Option<DialectArg>, format: OutputFormat) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let dialect = dialect.map(Dialect::from).unwrap_or(config.dialect);

    let document = Document::from_path(file).with_context(|| format!("failed to read {}", file.display()))?;
    if cli.verbose {
        println!("{} {} ({})", "Input:".dimmed(), file.display().to_string().yellow(), document.kind());
    }

    let statement = document.into_statement()?;
    let (sql, args) = statement.build_sql_with_options(dialect, config.options())?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "dialect": dialect.name(), "sql": sql, "args": args });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("{} {}", "Generated SQL".green().bold(), format!("({})", dialect).dimmed());
            println!("{}", sql.white());

            if !args.is_empty() {
                println!();
                println!("{}", "Arguments:".cyan());
                for (i, arg) in args.iter().enumerate() {
                    let label = match dialect {
                        Dialect::MySQL => format!("#{}", i + 1),
                        Dialect::Postgres => format!("${}", i + 1),
                    };
                    println!("  {} = {}", label, arg.to_string().yellow());
                }
            }
        }
    }

    Ok(())
}

fn show_dialects() {
    println!("{}", "Dialects".cyan().bold());
    println!();
    println!(
        "{:10} {:8} {:16} {}",
        "Dialect".white().bold(),
        "Single".white().bold(),
        "Range".white().bold(),
        "like / not like".white().bold()
    );
    println!("{}", "─".repeat(56).dimmed());

    for dialect in Dialect::ALL {
        println!(
            "{:10} {:8} {:16} {} / {}",
            dialect.name().cyan().bold(),
            dialect.placeholder(1, 1).yellow(),
            dialect.placeholder(1, 3).yellow(),
            dialect.like_operator(false),
            dialect.like_operator(true)
        );
    }
}

fn show_operators() {
    println!("{}", "Operators".cyan().bold());
    println!();
    println!(
        "{:24} {:14} {}",
        "Name".white().bold(),
        "SQL".white().bold(),
        "Value".white().bold()
    );
    println!("{}", "─".repeat(64).dimmed());

    for op in Operator::ALL {
        let value = match op.class() {
            OperatorClass::Comparison => "one scalar",
            OperatorClass::NullCheck => "none",
            OperatorClass::Membership => "non-empty list of scalars",
            OperatorClass::Pattern => "string",
        };
        println!("{:24} {:14} {}", op.name().yellow(), op.symbol(), value.dimmed());
    }
}
