//! Side Scroller headless runner
//!
//! Runs a level without a window: input comes from a simple script, sound
//! cues go to the log, and the outcome is printed at the end.
//!
//! Usage:
//!   cargo run -- --script run-right --frames 5000
//!   RUST_LOG=map=debug cargo run -- --layout levels/underground.json

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use side_scroller::audio::{AudioManager, LogBackend};
use side_scroller::consts::FRAME_DT;
use side_scroller::diagnostics::LogSink;
use side_scroller::renderer::compose;
use side_scroller::sim::{GameEvent, Level, LevelLayout, TickInput};
use side_scroller::{Progress, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// No buttons held
    Idle,
    /// Run right, hopping every half second
    RunRight,
}

impl Script {
    fn input(self, frame: u64) -> TickInput {
        match self {
            Script::Idle => TickInput::default(),
            Script::RunRight => TickInput {
                right: true,
                action: true,
                jump: frame % 30 < 15,
                ..Default::default()
            },
        }
    }
}

#[derive(Parser)]
#[command(name = "side-scroller")]
#[command(about = "Run a side-scroller level headless and report the outcome")]
struct Args {
    /// Level layout JSON (defaults to the built-in level)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Settings file (created with defaults if missing)
    #[arg(long, default_value = "side_scroller_settings.json")]
    settings: PathBuf,

    /// Input script
    #[arg(long, value_enum, default_value_t = Script::RunRight)]
    script: Script,

    /// Stop after this many frames even if the level is still running
    #[arg(long, default_value_t = 60 * 60 * 5)]
    frames: u64,

    /// Print the final world as JSON
    #[arg(long)]
    dump: bool,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(&args.settings)?;
    let layout = match &args.layout {
        Some(path) => LevelLayout::from_json(&fs::read_to_string(path)?)?,
        None => LevelLayout::builtin()?,
    };

    let mut audio = AudioManager::new(LogBackend);
    audio.apply_settings(&settings);

    let mut progress = Progress::default();
    let sink = LogSink::new(settings.diagnostics);
    let mut level = Level::new(&layout, &progress, sink)?;
    log::info!("Running '{}' with {:?} for up to {} frames", level.name, args.script, args.frames);

    for frame in 0..args.frames {
        level.step(&args.script.input(frame), FRAME_DT);
        for event in level.events() {
            if let GameEvent::Sound(effect) = event {
                audio.play(*effect);
            }
        }
        if level.is_finished() {
            break;
        }
    }

    let world = level.world();
    println!("=== {} ===", level.name);
    println!("  Frames:   {}", world.frame);
    println!("  Phase:    {:?}", world.phase);
    println!("  Score:    {}", world.score);
    println!("  Coins:    {}", world.coin_total);
    println!("  Time:     {}", world.time_left);
    println!("  Player x: {}", world.player.body.pos.x);
    println!("  Sprites:  {}", compose(world).len());
    println!("  Collisions logged: {}", level.sink().collision_count());

    match level.finish(&mut progress) {
        Some(next) => println!("  Next:     {:?} (lives {})", next, progress.lives),
        None => println!("  Level still running after {} frames", args.frames),
    }

    if args.dump {
        println!("{}", serde_json::to_string_pretty(world)?);
    }

    settings.save(&args.settings)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Side Scroller (headless) starting...");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
