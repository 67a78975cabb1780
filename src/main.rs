// src/main.rs

use tracing::info;

use rewatch::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("rewatch error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.verbose, args.log_format)?;
    let shutdown = run(args).await?;
    info!("{shutdown}");
    Ok(())
}
