use anyhow::Result;
use clap::Parser;
use crtprobe::{config, utils, Args, ScanEngine};
use log::info;

const BANNER: &str = r#"
  ___ _ __| |_ _ __  _ __ ___ | |__   ___
 / __| '__| __| '_ \| '__/ _ \| '_ \ / _ \
| (__| |  | |_| |_) | | | (_) | |_) |  __/
 \___|_|   \__| .__/|_|  \___/|_.__/ \___|
              |_|
   crt.sh subdomain harvesting + liveness probing
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    if !args.silent {
        println!("{}", BANNER);
    }

    let config = config::resolve(&args)?;
    let domains = utils::resolve_targets(args.target.as_deref(), args.target_file.as_deref())?;

    let engine = ScanEngine::new(&config, args.silent)?;
    let stats = engine.run(&domains).await;

    info!(
        "Scan completed: {} alive of {} candidates across {} domains in {:.2}s",
        stats.alive_found,
        stats.candidates_found,
        stats.domains_processed,
        stats.duration.as_secs_f64()
    );

    Ok(())
}
