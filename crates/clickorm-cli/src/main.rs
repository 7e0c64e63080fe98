//! clickorm CLI
//!
//! Command-line tool that prints ClickHouse statements compiled from table
//! schemas.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use clickorm_cli::commands::{
    create_command, drop_command, parse_type_command, select_command, SelectOptions,
};
use clickorm_cli::schema_file::load_registry;
use clickorm_core::SchemaRegistry;

/// Safe SQL generation for ClickHouse.
#[derive(Parser)]
#[command(name = "clickorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with table schemas.
    #[arg(short, long, env = "CLICKORM_SCHEMA")]
    schema: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a type declaration.
    ParseType {
        /// Type declaration, e.g. "nullable(array(string))".
        text: String,
    },

    /// Print CREATE TABLE statements.
    Create {
        /// Table to create (all if not specified).
        #[arg(short, long)]
        table: Option<String>,

        /// Omit IF NOT EXISTS.
        #[arg(long)]
        no_if_not_exists: bool,
    },

    /// Print DROP TABLE statements.
    Drop {
        /// Table to drop (all if not specified).
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Print a SELECT statement and its parameters.
    Select {
        /// Table to read from.
        #[arg(short, long)]
        table: String,

        /// Raw WHERE condition, emitted verbatim.
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Ordering column, prefix with '-' for descending. Repeatable.
        #[arg(short, long, allow_hyphen_values = true)]
        order: Vec<String>,

        /// Maximum number of rows.
        #[arg(short, long)]
        limit: Option<u64>,

        /// Number of rows to skip.
        #[arg(long)]
        offset: Option<u64>,

        /// Print the COUNT statement instead.
        #[arg(short, long)]
        count: bool,
    },
}

fn main() -> anyhow::Result<()> {
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

    let schema = cli.schema.as_deref();

    match cli.command {
        Commands::ParseType { text } => {
            println!("{}", parse_type_command(&text));
        }

        Commands::Create {
            table,
            no_if_not_exists,
        } => {
            let registry = load_registry(schema)?;
            for sql in create_command(&registry, table.as_deref(), !no_if_not_exists)? {
                println!("{sql};\n");
            }
        }

        Commands::Drop { table } => {
            // A named table can be dropped without a schema file.
            let registry = match (&table, schema) {
                (Some(_), None) => SchemaRegistry::new(),
                _ => load_registry(schema)?,
            };
            for sql in drop_command(&registry, table.as_deref()) {
                println!("{sql};");
            }
        }

        Commands::Select {
            table,
            filter,
            order,
            limit,
            offset,
            count,
        } => {
            let registry = load_registry(schema)?;
            let options = SelectOptions {
                table,
                filter,
                order,
                limit,
                offset,
                count,
            };
            debug!(?options, "compiling select");
            println!("{}", select_command(&registry, &options)?.render()?);
        }
    }

    Ok(())
}
