// src/main.rs

use watcher_daemon::{cli, load_config, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        // In-flight scans and commands are abandoned.
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("watcher-daemon error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let config = load_config(&args)?;
    logging::init_logging(config.log_level)?;
    run(&args, config).await?;
    Ok(())
}
