use std::path::PathBuf;

use clap::Parser;

use arcanum::{Config, run};

#[derive(Parser)]
#[command(name = "arcanum", version, about = "Artifact catalog backend")]
struct Cli {
    /// Path to a TOML config file; defaults to config.toml if present.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(config))
}
