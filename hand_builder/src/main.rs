//! hand_builder: interactive entry point.
//!
//! ```text
//! hand_builder [--config FILE] [--replay FILE [--loop] [--headless]] [--write-config FILE]
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use hand_builder::app::{run, run_headless, Input};
use hand_builder::config::AppConfig;
use hand_builder::source::ReplayHandSource;
use log::info;

#[derive(Default)]
struct Args {
    config:       Option<PathBuf>,
    replay:       Option<PathBuf>,
    write_config: Option<PathBuf>,
    looping:      bool,
    headless:     bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut path = |flag: &str| {
            it.next().map(PathBuf::from).with_context(|| format!("{} needs a file path", flag))
        };
        match arg.as_str() {
            "--config"       => args.config = Some(path("--config")?),
            "--replay"       => args.replay = Some(path("--replay")?),
            "--write-config" => args.write_config = Some(path("--write-config")?),
            "--loop"         => args.looping = true,
            "--headless"     => args.headless = true,
            other            => bail!("unknown argument '{}'", other),
        }
    }
    if args.headless && args.replay.is_none() {
        bail!("--headless needs --replay");
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;

    let cfg = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(path) = &args.write_config {
        cfg.save(path).with_context(|| format!("failed to write config {}", path.display()))?;
        info!("wrote configuration to {}", path.display());
        return Ok(());
    }

    let replay = match &args.replay {
        Some(path) => Some(
            ReplayHandSource::load(path, args.looping)
                .with_context(|| format!("failed to load replay {}", path.display()))?,
        ),
        None => None,
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Hand Builder — gesture-driven block builder         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    match replay {
        Some(replay) if args.headless => {
            let ctl = run_headless(&cfg, replay)?;
            println!("  {} objects placed", ctl.world().len());
        }
        Some(replay) => run(cfg, Input::Replay(replay))?,
        None => {
            println!("  Mode: window simulation (pointer = fingertip, Space = pinch, Tab = two hands)");
            println!();
            run(cfg, Input::Simulated)?;
        }
    }
    Ok(())
}
