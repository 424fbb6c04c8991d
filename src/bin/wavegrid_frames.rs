use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::{
    io::{self, Write},
    path::PathBuf,
};
use wavegrid::{
    animation::{Direction, Frame, WaveAnimator, WaveSnapshot},
    config::Config,
    logging::{init_logging, LogTarget},
};

/// Run the wave animation without a terminal and print what every frame looks like.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The number of frames to run.
    #[clap(short = 'n', long, default_value_t = 300)]
    frames: u64,

    /// Only print every nth frame.
    #[clap(long, default_value_t = 1)]
    every: u64,

    /// The path to the configuration file.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// The output format.
    #[clap(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// The log level, e.g. `debug`. Logs are written to stderr.
    #[clap(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct FrameRecord {
    frame: u64,
    position: f32,
    direction: i8,
    speed: f32,
    display_hue: f32,
    target_hue: f32,
    bounces: u64,
    brightness: Vec<f32>,
}

impl FrameRecord {
    fn new(frame_index: u64, frame: &Frame, snapshot: &WaveSnapshot) -> Self {
        Self {
            frame: frame_index,
            position: snapshot.position,
            direction: match snapshot.direction {
                Direction::Forward => 1,
                Direction::Backward => -1,
            },
            speed: snapshot.speed,
            display_hue: snapshot.display_hue,
            target_hue: snapshot.target_hue,
            bounces: snapshot.bounces,
            brightness: (0..frame.columns()).map(|x| frame.column(x).map(|c| c.brightness()).unwrap_or(0.0)).collect(),
        }
    }

    fn strip(&self) -> String {
        self.brightness
            .iter()
            .map(|brightness| match brightness {
                b if *b > 0.75 => '#',
                b if *b > 0.5 => '+',
                b if *b > 0.25 => '-',
                b if *b > 0.0 => '.',
                _ => ' ',
            })
            .collect()
    }
}

fn write_record<W: Write>(out: &mut W, record: &FrameRecord, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => writeln!(
            out,
            "{:>6} |{}| pos {:>6.2} dir {:>2} speed {:.3} hue {:>6.2} -> {:>3} bounces {}",
            record.frame,
            record.strip(),
            record.position,
            record.direction,
            record.speed,
            record.display_hue,
            record.target_hue,
            record.bounces
        )?,
        Format::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    };
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let log_target = if cli.log_level.is_some() { LogTarget::Stderr } else { LogTarget::Off };
    init_logging(log_target, cli.log_level.as_deref())?;

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let mut animator = WaveAnimator::new(config.wave_parameters());
    let every = cli.every.max(1);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for index in 0..cli.frames {
        let tick = animator.tick();
        if index % every != 0 {
            continue;
        }
        // The frame was painted before the wave moved, but the counters already include this frame
        let record = FrameRecord::new(index, &tick.frame, &animator.snapshot());
        write_record(&mut out, &record, cli.format)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavegrid::animation::WaveParameters;

    #[test]
    fn first_frame_strip() {
        let animator = WaveAnimator::new(WaveParameters::default());
        let record = FrameRecord::new(0, &animator.paint(), &animator.snapshot());
        assert_eq!(record.strip(), format!("#{}", " ".repeat(19)));
        assert_eq!(record.direction, 1);
    }

    #[test]
    fn json_lines() {
        let animator = WaveAnimator::new(WaveParameters::default());
        let record = FrameRecord::new(7, &animator.paint(), &animator.snapshot());
        let mut output = Vec::new();
        write_record(&mut output, &record, Format::Json).expect("write failed");
        let line = String::from_utf8(output).expect("invalid utf8");
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).expect("invalid json");
        assert_eq!(value["frame"], 7);
        assert_eq!(value["bounces"], 0);
        assert_eq!(value["brightness"].as_array().map(Vec::len), Some(20));
    }
}
