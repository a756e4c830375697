//! NLSL Check
//!
//! Transforms a JSON syntax tree and reports the result.
//!
//! Usage: `nlsl-check <tree.json> [--emit summary|ir] [--output <path>]`

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Emit {
    /// Functions and globals, one per line
    #[default]
    Summary,
    /// The full program as JSON
    Ir,
}

#[derive(Parser, Debug)]
#[command(name = "nlsl-check")]
#[command(about = "Type check an NLSL syntax tree and emit its IR")]
struct Args {
    /// Path to the JSON syntax tree
    input: PathBuf,

    /// What to print on success
    #[arg(long, value_enum, default_value_t = Emit::Summary)]
    emit: Emit,

    /// Write the output to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn run(args: &Args) -> Result<()> {
    info!("Loading syntax tree from: {}", args.input.display());
    let tree = nlsl_tools::load_tree(&args.input)?;

    let program = nlsl_ir::transform(&tree).context("transform failed")?;
    info!(
        "Transformed {} function(s), {} global statement(s)",
        program.user_functions().count(),
        program.globals.len()
    );

    let rendered = match args.emit {
        Emit::Summary => nlsl_tools::summarize(&program),
        Emit::Ir => nlsl_tools::render_ir(&program)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn main() {
    nlsl_tools::init_logging();

    let args = Args::parse();

    if let Err(err) = run(&args) {
        error!("{:#}", err);
        process::exit(1);
    }
}
