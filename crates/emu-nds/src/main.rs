//! Headless host for the dual-CPU handheld core.
//!
//! Selects a backend (native module if one can be bound, synthetic
//! otherwise), optionally loads a program, steps a number of frames and
//! writes screenshots or register dumps.

use std::path::PathBuf;
use std::process;

use emu_nds::{Backend, EmulatorCore, NdsConfig, Session, capture};
use log::{error, info, warn};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    config: NdsConfig,
    frames: u32,
    realtime: bool,
    screenshot_path: Option<PathBuf>,
    record_dir: Option<PathBuf>,
    dump_registers: bool,
}

fn print_usage() {
    eprintln!("Usage: emu-nds [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --program <file>     Program image to load");
    eprintln!("  --backend <file>     Native backend module to try first (repeatable)");
    eprintln!("  --synthetic          Do not bind a native backend");
    eprintln!("  --seed <n>           Seed for synthetic register data");
    eprintln!("  --frames <n>         Number of frames to run [default: 60]");
    eprintln!("  --realtime           Pace frames at ~60 Hz");
    eprintln!("  --screenshot <file>  Save a PNG of both screens after running");
    eprintln!("  --record <dir>       Record every frame as PNG");
    eprintln!("  --registers          Print both register files after running");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config: NdsConfig::default(),
        frames: 60,
        realtime: false,
        screenshot_path: None,
        record_dir: None,
        dump_registers: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--program" => {
                i += 1;
                cli.config.program = args.get(i).map(PathBuf::from);
            }
            "--backend" => {
                i += 1;
                if let Some(path) = args.get(i) {
                    cli.config.backend_paths.push(PathBuf::from(path));
                }
            }
            "--synthetic" => {
                cli.config.force_synthetic = true;
            }
            "--seed" => {
                i += 1;
                cli.config.seed = args.get(i).and_then(|s| s.parse().ok());
            }
            "--frames" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.frames = s.parse().unwrap_or(60);
                }
            }
            "--realtime" => {
                cli.realtime = true;
            }
            "--screenshot" => {
                i += 1;
                cli.screenshot_path = args.get(i).map(PathBuf::from);
            }
            "--record" => {
                i += 1;
                cli.record_dir = args.get(i).map(PathBuf::from);
            }
            "--registers" => {
                cli.dump_registers = true;
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

// ---------------------------------------------------------------------------
// Headless run
// ---------------------------------------------------------------------------

fn run(cli: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Backend::select(&cli.config);
    info!("using {} backend", backend.name());
    let mut session = Session::with_interval(backend, cli.config.frame_interval);

    if let Some(ref path) = cli.config.program {
        if let Err(e) = session.load(path) {
            warn!("failed to load program in backend core: {e}");
        }
    }

    if let Some(ref dir) = cli.record_dir {
        capture::record(&mut session, dir, cli.frames)?;
    } else if session.run() {
        session.run_for(cli.frames, cli.realtime);
        session.stop();
    } else {
        // No program: keep the screens animating so there is something to look at.
        for _ in 0..cli.frames {
            session.step();
        }
    }

    info!(
        "{}: {} frame(s)",
        session.program_name(),
        session.core().frame_counter()
    );

    if let Some(ref path) = cli.screenshot_path {
        capture::save_screenshot(session.core(), path)?;
        info!("screenshot saved to {}", path.display());
    }

    if cli.dump_registers {
        print!("{}", session.register_dump());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = parse_args();
    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(1);
    }
}
