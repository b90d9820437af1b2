use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use patience_app::report::CardStyle;
use patience_app::session::{SessionOptions, clock_seed, run_session};

/// Play one game of patience and save it as `win.txt` or `lose.txt`.
#[derive(Debug, Parser)]
#[command(name = "patience", author, version, about)]
struct Cli {
    /// Shuffle seed; defaults to the current Unix time.
    #[arg(value_name = "SEED", value_parser = clap::value_parser!(u64).range(1..))]
    seed: Option<u64>,

    /// Directory the outcome file is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Print cards as A, 2..10, J, Q, K instead of 1..13.
    #[arg(long)]
    faces: bool,

    /// Also save the game as a replayable JSON record.
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();

    let options = SessionOptions {
        seed: cli.seed.unwrap_or_else(clock_seed),
        out_dir: cli.out_dir,
        style: if cli.faces {
            CardStyle::Faces
        } else {
            CardStyle::Numbers
        },
        record: cli.record,
    };

    let stdout = io::stdout();
    let result = run_session(&options, &mut stdout.lock())?;
    tracing::debug!(path = %result.report_path.display(), "saved");
    Ok(())
}
