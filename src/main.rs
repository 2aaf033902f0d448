mod control;
mod display;
mod util;

use control::Controller;
use display::{Display, InputEvent, MouseButtonKind, PixelBuffer, RenderTarget};
use env_logger::Env;
use log::{error, info, warn};
use sdl2::keyboard::Keycode;
use skyburst::config::DEFAULT_CONFIG_PATH;
use skyburst::{Command, Config, RandomSource, Result, Simulation};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use util::FpsCounter;

/// Nominal host rate; the simulation advances one tick per frame
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Command line options; anything set here overrides the config file
#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    seed: Option<u64>,
    no_vsync: bool,
}

fn print_usage() {
    println!("Usage: skyburst [OPTIONS]");
    println!();
    println!("Options:");
    println!(
        "  --config PATH, -c PATH    Load settings from JSON (default: {})",
        DEFAULT_CONFIG_PATH
    );
    println!("  --width W, -w W           Set window width");
    println!("  --height H, -h H          Set window height");
    println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1280x720)");
    println!("  --seed N                  Fixed RNG seed for a repeatable show");
    println!("  --no-vsync                Disable VSync; frames are paced at 60 Hz");
    println!("  --help                    Show this help message");
    println!();
    println!("Set RUST_LOG=debug for per-rocket logging.");
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--no-vsync" => parsed.no_vsync = true,
            "--config" | "-c" => {
                parsed.config_path = value.cloned();
                i += 1;
            },
            "--width" | "-w" => {
                parsed.width = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--height" | "-h" => {
                parsed.height = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--resolution" | "-r" => {
                // Parse WxH format (e.g., 1920x1080)
                if let Some((w, h)) = value.and_then(|v| v.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                        parsed.width = Some(w);
                        parsed.height = Some(h);
                    }
                }
                i += 1;
            },
            "--seed" => {
                parsed.seed = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--help" => {
                print_usage();
                std::process::exit(0);
            },
            other => warn!("ignoring unknown argument {:?}", other),
        }
        i += 1;
    }

    parsed
}

fn load_config(args: &Args) -> Result<Config> {
    let path = args.config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut config = Config::load_or_default(path)?;

    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_vsync {
        config.vsync = false;
    }
    config.validate()?;
    Ok(config)
}

fn print_controls() {
    info!("Controls:");
    info!("  Left click - Launch a rocket at the pointer");
    info!("  L          - Launch a rocket at a random position");
    info!("  B          - Burst (staggered volley)");
    info!("  A          - Toggle auto launch");
    info!("  C          - Clear all rockets");
    info!("  Space      - Pause / resume");
    info!("  F          - Toggle FPS logging");
    info!("  Escape     - Quit");
}

fn run() -> Result<()> {
    let args = parse_args();
    let config = load_config(&args)?;

    let (width, height) = (config.width, config.height);
    let rng = config
        .seed
        .map_or_else(RandomSource::from_entropy, RandomSource::seeded);
    let mut sim = Simulation::new(width, height, config.simulation_settings(), rng);

    // The control socket feeds this channel; it is drained between frames
    let (sender, receiver) = mpsc::channel::<Command>();
    let controller = config
        .control_socket
        .as_ref()
        .map(|path| Controller::spawn(path, sender))
        .transpose()?;
    if let Some(controller) = &controller {
        info!("control socket listening on {}", controller.path().display());
    }

    let (mut display, texture_creator) =
        Display::with_options("skyburst", width, height, config.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    let mut fps_counter = FpsCounter::new(60);
    let mut log_fps = false;

    info!("=== skyburst ===");
    info!(
        "Resolution: {}x{}, VSync {}",
        width,
        height,
        if config.vsync { "ON" } else { "OFF" }
    );
    if let Some(seed) = config.seed {
        info!("Seed: {}", seed);
    }
    print_controls();

    'main: loop {
        let frame_start = Instant::now();
        let mut commands = Vec::new();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::A) => commands.push(Command::ToggleAuto),
                InputEvent::KeyDown(Keycode::B) => commands.push(Command::Burst(None)),
                InputEvent::KeyDown(Keycode::C) => commands.push(Command::Clear),
                InputEvent::KeyDown(Keycode::L) => commands.push(Command::Launch),
                InputEvent::KeyDown(Keycode::Space) => commands.push(if sim.is_running() {
                    Command::Pause
                } else {
                    Command::Resume
                }),
                InputEvent::KeyDown(Keycode::F) => log_fps = !log_fps,
                InputEvent::KeyDown(_) => {},
                InputEvent::MouseDown {
                    x,
                    button: MouseButtonKind::Left,
                    ..
                } => commands.push(Command::LaunchAt(x as f32)),
                InputEvent::MouseDown { .. } => {},
                InputEvent::Resized { width, height } => {
                    buffer.resize(width, height);
                    sim.fit_to(&buffer);
                    target = RenderTarget::with_size(&texture_creator, width, height)?;
                },
            }
        }

        // Socket commands land here, never in the middle of a tick
        commands.extend(receiver.try_iter());
        for command in commands {
            if matches!(command, Command::Quit) {
                break 'main;
            }
            sim.apply(command);
        }

        sim.tick();
        sim.render(&mut buffer);
        display.present(&mut target, &buffer)?;

        fps_counter.tick();
        if log_fps && sim.tick_count() % 60 == 0 {
            let (min_fps, max_fps) = fps_counter.min_max_fps();
            info!(
                "FPS {:.0} avg  {:.0} min  {:.0} max  {:.1}ms  rockets {}",
                fps_counter.avg_fps(),
                min_fps,
                max_fps,
                fps_counter.avg_frame_time_ms(),
                sim.rocket_count()
            );
        }

        if !config.vsync {
            if let Some(rest) = FRAME_INTERVAL.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    info!(
        "launched {} rocket(s) over {} ticks",
        sim.launched_total(),
        sim.tick_count()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
