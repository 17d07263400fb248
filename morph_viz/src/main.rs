//! morph_viz: interactive entry point.

use std::path::PathBuf;

use clap::Parser;

use morph_viz::app::{run, run_headless_from, RunOptions};
use morph_viz::{AppError, SessionConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON session config; missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Population seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Play landmark frames from a JSON-lines file instead of live capture
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Restart the replay when it ends
    #[arg(long)]
    loop_replay: bool,

    /// Run without a window for this many simulated seconds
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Morph Viz — Gesture Controlled Particle Morph         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    if let Err(e) = try_main(args) {
        log::error!("{e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn try_main(args: Args) -> Result<(), AppError> {
    let mut cfg = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None       => SessionConfig::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    if let Some(seconds) = args.headless {
        println!("  Mode: headless, {seconds:.1} s");
        let summary = run_headless_from(&cfg, args.replay.as_deref(), seconds, args.loop_replay)?;
        println!();
        println!("  seed         {}", summary.seed);
        println!("  final state  {}", summary.final_state);
        println!("  transitions  {}", summary.transitions);
        println!("  frames fed   {}", summary.frames_fed);
        println!("  scene angle  {:.3} rad", summary.scene_angle);
        for (name, factor) in &summary.factors {
            println!("  {name:<12} {factor:.3}");
        }
        println!();
        return Ok(());
    }

    match &args.replay {
        Some(path) => println!("  Mode: replay {}", path.display()),
        #[cfg(feature = "leap")]
        None => println!("  Mode: LeapMotion hardware"),
        #[cfg(not(feature = "leap"))]
        None => println!("  Mode: Keyboard simulation  (use --features leap for hardware)"),
    }
    println!();
    println!("  Opening visualizer window…");
    println!();

    run(cfg, RunOptions { replay: args.replay, loop_replay: args.loop_replay })
}
