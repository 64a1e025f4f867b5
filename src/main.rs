//! Command-line driver for the prize wheel

use std::cell::RefCell;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use std::thread;

use clap::{ArgAction, Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::Level;

use prize_wheel::app::{AppError, Collaborators, WheelController};
use prize_wheel::config::{ConfigError, WheelConfig};
use prize_wheel::domain::entries::EntryList;
use prize_wheel::platform::{DiskFiles, Renderer, SystemClock, TerminalCue, TerminalNotifier};
use prize_wheel::ui::{PixmapRenderer, RendererError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("render failed: {0}")]
    Render(#[from] RendererError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("failed to read names from {path}: {source}")]
    Names {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Parser, Debug)]
#[command(name = "prize-wheel", version, about = "Spin a prize wheel or split names into random groups")]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "PRIZE_WHEEL_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory that saved lists and groups are written to
    #[arg(long, default_value = ".", global = true)]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct NamesArg {
    /// File with one name per line, or `-` for stdin
    #[arg(long, short)]
    names: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spin the wheel once and print the winner
    Spin {
        #[command(flatten)]
        names: NamesArg,
        /// Keep the winner on the wheel (overrides the config file)
        #[arg(long)]
        keep_winners: Option<bool>,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the final wheel frame as PNG
        #[arg(long)]
        frame: Option<PathBuf>,
        /// Save the entry list after the spin
        #[arg(long)]
        save: bool,
        /// Suppress tick and applause output
        #[arg(long, short)]
        quiet: bool,
    },
    /// Split the names into random groups
    Groups {
        #[command(flatten)]
        names: NamesArg,
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Also write groups.txt
        #[arg(long)]
        save: bool,
    },
    /// Shuffle the names and print them
    Shuffle {
        #[command(flatten)]
        names: NamesArg,
        #[arg(long)]
        seed: Option<u64>,
        /// Also write wheel-entries.txt
        #[arg(long)]
        save: bool,
    },
    /// Draw the wheel to a PNG without spinning
    Render {
        #[command(flatten)]
        names: NamesArg,
        #[arg(long, short)]
        output: PathBuf,
        /// Wheel rotation in radians
        #[arg(long, default_value_t = 0.0)]
        rotation: f64,
    },
}

type Controller = WheelController<SystemClock, StdRng>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported through the notifier
        Err(CliError::App(_)) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => WheelConfig::load(path)?,
        None => WheelConfig::default(),
    };
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Spin {
            names,
            keep_winners,
            seed,
            frame,
            save,
            quiet,
        } => {
            let mut config = config;
            if let Some(keep) = keep_winners {
                config.keep_winners = keep;
            }
            run_spin(config, &cli.output_dir, &names.names, seed, frame.as_deref(), save, quiet)
        }
        Command::Groups {
            names,
            count,
            size,
            seed,
            save,
        } => {
            let renderer = Rc::new(RefCell::new(PixmapRenderer::from_config(&config)?));
            let mut controller = build(config, &cli.output_dir, &names.names, seed, renderer, true)?;
            load_names(&mut controller, &names.names)?;

            print!("{}", controller.generate_groups(count, size)?.to_text());
            if save {
                controller.download_groups()?;
            }
            Ok(())
        }
        Command::Shuffle { names, seed, save } => {
            let renderer = Rc::new(RefCell::new(PixmapRenderer::from_config(&config)?));
            let mut controller = build(config, &cli.output_dir, &names.names, seed, renderer, true)?;
            load_names(&mut controller, &names.names)?;

            controller.shuffle_entries()?;
            println!("{}", controller.entries().to_text());
            if save {
                controller.save_list()?;
            }
            Ok(())
        }
        Command::Render {
            names,
            output,
            rotation,
        } => {
            let raw = read_names(&names.names)?;
            let mut renderer = PixmapRenderer::from_config(&config)?;
            match EntryList::parse(&raw) {
                Ok(entries) => renderer.draw_wheel(entries.as_slice(), rotation),
                Err(e) => {
                    tracing::debug!(error = %e, "no names, drawing placeholder");
                    renderer.draw_placeholder();
                }
            }
            renderer.save_png(&output)?;
            tracing::info!(path = %output.display(), "wheel rendered");
            Ok(())
        }
    }
}

fn run_spin(
    config: WheelConfig,
    output_dir: &Path,
    names: &Path,
    seed: Option<u64>,
    frame: Option<&Path>,
    save: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let interval = config.frame_interval();
    let renderer = Rc::new(RefCell::new(PixmapRenderer::from_config(&config)?));
    let mut controller = build(config, output_dir, names, seed, Rc::clone(&renderer), quiet)?;
    load_names(&mut controller, names)?;

    controller.spin()?;
    while controller.is_spinning() {
        thread::sleep(interval);
        controller.pump();
    }

    let Some(winner) = controller.winner().map(str::to_owned) else {
        return Ok(());
    };
    println!("Winner: {winner}");

    if let Some(path) = frame {
        renderer.borrow().save_png(path)?;
        tracing::info!(path = %path.display(), "final frame written");
    }

    // Waits out the deferred removal when winners are not kept
    controller.run_until_idle(interval, thread::sleep);
    if !controller.entries().contains(&winner) {
        println!("Removed {winner}; {} entries left", controller.entries().len());
    }

    if save && !controller.entries().is_empty() {
        controller.save_list()?;
    }
    Ok(())
}

fn build(
    config: WheelConfig,
    output_dir: &Path,
    names: &Path,
    seed: Option<u64>,
    renderer: Rc<RefCell<PixmapRenderer>>,
    quiet: bool,
) -> Result<Controller, CliError> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut files = DiskFiles::new(output_dir);
    if !is_stdin(names) {
        files = files.with_import(names);
    }

    let controller = WheelController::new(
        config,
        SystemClock::new(),
        rng,
        Collaborators {
            renderer: Box::new(renderer),
            audio: Box::new(TerminalCue::new(quiet)),
            notifier: Box::new(TerminalNotifier::new(false)),
            files: Box::new(files),
        },
    )?;
    Ok(controller)
}

/// Fills the wheel from the names file, or from stdin for `-`
fn load_names(controller: &mut Controller, names: &Path) -> Result<usize, CliError> {
    let count = if is_stdin(names) {
        let raw = read_names(names)?;
        controller.set_entries(&raw)?
    } else {
        controller.load_list()?
    };
    tracing::info!(count, "names loaded");
    Ok(count)
}

fn read_names(names: &Path) -> Result<String, CliError> {
    let names_error = |source| CliError::Names {
        path: names.display().to_string(),
        source,
    };
    if is_stdin(names) {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw).map_err(names_error)?;
        return Ok(raw);
    }
    std::fs::read_to_string(names).map_err(names_error)
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}
