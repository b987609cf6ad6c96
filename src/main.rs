use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{grid_docs, migrate, relocate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pkgshift")]
#[command(version = VERSION)]
#[command(about = "Move symbols between packages, rewrite references, and leave compatibility stubs")]
struct Cli {
    /// Config file (default: ./pkgshift.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the JSON envelope instead of a summary line
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite references, then regenerate compatibility stubs
    Migrate(migrate::MigrateArgs),
    /// Materialize moved files from the committed snapshot
    Relocate(relocate::RelocateArgs),
    /// Regenerate the grid mapping document
    GridDocs(grid_docs::GridDocsArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { config: cli.config };

    let exit_code = match cli.command {
        Commands::Migrate(args) => output::emit(migrate::run(args, &global), cli.json),
        Commands::Relocate(args) => output::emit(relocate::run(args, &global), cli.json),
        Commands::GridDocs(args) => output::emit(grid_docs::run(args, &global), cli.json),
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
