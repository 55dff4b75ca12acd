use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chip8::frontend::{SdlBeep, SdlDisplay, SdlKeypad};
use chip8::io::{Mute, Poll, Sound};
use chip8::{Chip8, Driver, DriverConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "CHIP-8 interpreter")]
struct Args {
    /// ROM image to run, loaded at 0x200.
    rom: PathBuf,

    /// Instructions executed per second.
    #[arg(long, default_value_t = 500)]
    cycle_hz: u32,

    /// Display refreshes per second.
    #[arg(long, default_value_t = 60)]
    refresh_hz: u32,

    /// Window pixels per CHIP-8 pixel.
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Don't open an audio device.
    #[arg(long)]
    mute: bool,

    /// Seed for the random-number instruction, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read {}", args.rom.display()))?;
    let mut emu = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    emu.load_program(&rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;
    info!(rom = %args.rom.display(), bytes = rom.len(), "loaded");

    let sdl = sdl2::init().map_err(|e| anyhow!("SDL init: {}", e))?;
    let mut display = SdlDisplay::new(&sdl, args.scale).context("opening window")?;
    let mut keypad = SdlKeypad::new(&sdl).context("opening event pump")?;
    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute)
    } else {
        Box::new(SdlBeep::new(&sdl).context("opening audio")?)
    };

    let config = DriverConfig::from_rates(args.cycle_hz, args.refresh_hz);
    let frame = Duration::from_secs(1) / args.refresh_hz.max(1);
    let mut driver = Driver::new(emu, config);

    loop {
        let start = Instant::now();
        if driver.run_frame(&mut display, &mut keypad, &mut sound)? == Poll::Quit {
            break;
        }
        if let Some(rest) = frame.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
    info!("bye");
    Ok(())
}
