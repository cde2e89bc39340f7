//! CLI frontend for the Gaea life simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gaea",
    about = "Gaea: a headless life simulation of creatures and plants",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log state transitions to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Content file to use instead of the bundled content
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Simulation config file (JSON); missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new world and write it to a save file
    New {
        /// Save file to create
        output: PathBuf,

        /// Grid width in tiles
        #[arg(long, default_value = "50")]
        width: u32,

        /// Grid height in tiles
        #[arg(long, default_value = "50")]
        height: u32,

        /// Number of creatures to place
        #[arg(long, default_value = "4")]
        creatures: usize,

        /// Number of plants to place
        #[arg(long, default_value = "6")]
        plants: usize,

        /// RNG seed for world generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Load a save, run it headless, and print a summary
    Simulate {
        /// Save file to load
        save: PathBuf,

        /// Number of ticks (virtual seconds) to run
        #[arg(short, long, default_value = "60")]
        ticks: u64,

        /// Write the resulting world to this save file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full event log
        #[arg(short, long)]
        events: bool,
    },

    /// List the objects in a save file
    Inspect {
        /// Save file to read
        save: PathBuf,

        /// Also list plain tiles
        #[arg(short, long)]
        all: bool,
    },

    /// List the available content
    Content,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let content = cli.content.as_deref();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::New {
            output,
            width,
            height,
            creatures,
            plants,
            seed,
            force,
        } => commands::new::run(
            &output,
            content,
            &commands::new::NewOptions {
                width,
                height,
                creatures,
                plants,
                seed,
                force,
            },
        ),
        Commands::Simulate {
            save,
            ticks,
            output,
            events,
        } => commands::simulate::run(&save, content, config, ticks, output.as_deref(), events),
        Commands::Inspect { save, all } => commands::inspect::run(&save, all),
        Commands::Content => commands::content::run(content),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
