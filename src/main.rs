use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use wavegrid::{
    app::{App, AppOptions, TerminalEvents},
    config::Config,
    logging::{init_logging, LogTarget},
    render::{TerminalGuard, WindowSize},
};

/// Run a colored wave back and forth across a grid in your terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the configuration file.
    #[clap(short, long, env = "WAVEGRID_CONFIG")]
    config: Option<PathBuf>,

    /// The initial speed of the wave, in columns per frame.
    #[clap(long)]
    speed: Option<f32>,

    /// The number of frames drawn per second.
    #[clap(long)]
    fps: Option<u32>,

    /// Exit after drawing this many frames.
    #[clap(long)]
    frames: Option<u64>,

    /// Append logs to this file.
    #[clap(long, env = "WAVEGRID_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// The log level, e.g. `debug`. Overrides `RUST_LOG`.
    #[clap(long)]
    log_level: Option<String>,

    /// Print the effective configuration and exit.
    #[clap(long)]
    print_config: bool,

    /// Print the JSON schema of the configuration file and exit.
    #[cfg(feature = "json-schema")]
    #[clap(long)]
    generate_config_schema: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(speed) = self.speed {
            config.animation.initial_speed = speed;
        }
        if let Some(fps) = self.fps {
            config.animation.frame_rate = fps;
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    #[cfg(feature = "json-schema")]
    if cli.generate_config_schema {
        let schema = schemars::schema_for!(Config);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let log_target = cli.log_file.clone().map(LogTarget::File).unwrap_or(LogTarget::Off);
    init_logging(log_target, cli.log_level.as_deref())?;

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("invalid command line arguments")?;
    if cli.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }
    info!(
        columns = config.grid.columns,
        rows = config.grid.rows,
        speed = config.animation.initial_speed,
        frame_rate = config.animation.frame_rate,
        "starting"
    );

    let window = WindowSize::current().context("reading terminal size")?;
    let mut app = App::new(config, window, AppOptions { max_frames: cli.frames });
    let mut terminal = TerminalGuard::enter()?;
    let summary = app.run(terminal.writer(), &mut TerminalEvents)?;
    drop(terminal);

    info!(frames = summary.frames, bounces = summary.final_state.bounces, "exiting");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
