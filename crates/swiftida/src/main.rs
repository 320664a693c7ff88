//! swiftida - Swift calling-convention annotations for function types
//!
//! Usage:
//!   swiftida parse <TYPE>                          Show the parsed components
//!   swiftida rewrite <TYPE> <COMMAND>              Print the rewritten type
//!   swiftida commands                              List edit commands
//!   swiftida declare --db <FILE> <ENTITY> <TYPE>   Record a declared type
//!   swiftida apply --db <FILE> <ENTITY> <COMMAND>  Edit a declared type
//!   swiftida show --db <FILE> [ENTITY]             Show declared types

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swiftida_core::{ArchProfile, EntityId};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "swiftida", version)]
#[command(
    about = "Annotate function types with Swift calling-convention registers",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target processor (metapc, x86_64, arm, arm64, aarch64)
    #[arg(long, global = true, env = "SWIFTIDA_ARCH", default_value = "x86_64")]
    arch: String,

    /// The target is 32-bit (no Swift register profile exists for it)
    #[arg(long = "32bit", global = true)]
    bits32: bool,

    /// Log parser and edit details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a type string is decomposed
    Parse {
        /// Function type, e.g. "int __fastcall(char*, int)"
        ty: String,
        /// Print the parsed signature as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply an edit command to a type string and print the result
    Rewrite {
        /// Function type to edit
        ty: String,
        /// Command id or short name, e.g. "add_arg_self"
        command: String,
    },
    /// List the edit commands available for the target
    #[command(name = "commands")]
    List,
    /// Record the declared type of an entity in a type database
    Declare {
        /// Type database (JSON), created if missing
        #[arg(long)]
        db: PathBuf,
        /// Entity address (hex)
        #[arg(value_parser = parse_entity)]
        entity: EntityId,
        /// Declared function type
        ty: String,
    },
    /// Apply an edit command to an entity's declared type
    Apply {
        /// Type database (JSON)
        #[arg(long)]
        db: PathBuf,
        /// Entity address (hex)
        #[arg(value_parser = parse_entity)]
        entity: EntityId,
        /// Command id or short name
        command: String,
        /// The entity is the callee of a selected call operand
        #[arg(long)]
        call_site: bool,
    },
    /// Show declared types and tuple structs
    Show {
        /// Type database (JSON)
        #[arg(long)]
        db: PathBuf,
        /// Only show this entity
        #[arg(value_parser = parse_entity)]
        entity: Option<EntityId>,
    },
}

fn parse_entity(s: &str) -> Result<EntityId, String> {
    s.parse::<EntityId>()
        .map_err(|e| format!("invalid entity address '{}': {}", s, e))
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "swiftida=debug,swiftida_types=debug"
    } else {
        "swiftida=info,swiftida_types=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let profile = ArchProfile::resolve(&cli.arch, !cli.bits32).with_context(|| {
        format!(
            "Unsupported target '{}' ({}-bit). Supported: x86_64, arm64",
            cli.arch,
            if cli.bits32 { 32 } else { 64 }
        )
    })?;

    match cli.command {
        Commands::Parse { ty, json } => commands::handle_parse(&profile, &ty, json),
        Commands::Rewrite { ty, command } => commands::handle_rewrite(&profile, &ty, &command),
        Commands::List => {
            commands::handle_list_commands(&profile);
            Ok(())
        }
        Commands::Declare { db, entity, ty } => commands::handle_declare(&db, entity, &ty),
        Commands::Apply {
            db,
            entity,
            command,
            call_site,
        } => commands::handle_apply(&profile, &db, entity, &command, call_site),
        Commands::Show { db, entity } => commands::handle_show(&db, entity),
    }
}
