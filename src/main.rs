use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use lane_pilot::{ControllerConfig, LaneFollower, RawLaneSummary, SystemClock, WriterSink};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Feeds lane summaries through the steering controller in real time and
/// prints the resulting actuator commands.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Controller config (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lane summaries to replay, one JSON object per line.
    /// A synthetic drive is generated when omitted.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Number of synthetic frames.
    #[arg(long, default_value_t = 200)]
    frames: usize,

    /// Frame rate to replay at.
    #[arg(long, default_value_t = 20.0, value_parser = parse_fps)]
    fps: f64,

    /// Seed for the synthetic detector noise.
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ControllerConfig::from_path(path)?,
        None => ControllerConfig::default(),
    };
    let brake_delay = config.brake_delay();

    let frames = match &args.replay {
        Some(path) => read_summaries(path)?,
        None => synthetic_drive(args.frames, args.fps, args.seed)?,
    };

    let period = Duration::from_secs_f64(1.0 / args.fps);
    let mut follower = LaneFollower::new(config, SystemClock::new(), WriterSink::new(io::stdout()));
    for raw in frames {
        let start = Instant::now();
        follower.process_raw(raw);
        if let Some(rest) = period.checked_sub(start.elapsed()) {
            thread::sleep(rest);
        }
    }

    // Let a freshly scheduled brake fire before stopping.
    thread::sleep(brake_delay + Duration::from_millis(50));
    let discarded = follower.shutdown();
    log::info!("done, {} commands discarded", discarded);
    Ok(())
}

/// Accepts only finite, positive frame rates.
fn parse_fps(value: &str) -> Result<f64, String> {
    let fps: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if fps.is_finite() && fps > 0.0 {
        Ok(fps)
    } else {
        Err(format!("frame rate must be positive, got {}", value))
    }
}

fn read_summaries(path: &Path) -> Result<Vec<RawLaneSummary>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let mut frames = vec![];
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        frames.push(serde_json::from_str(&line)?);
    }
    Ok(frames)
}

/// A drive along a winding lane past one stopping zone, losing the lane at the end.
fn synthetic_drive(
    count: usize,
    fps: f64,
    seed: u64,
) -> Result<Vec<RawLaneSummary>, Box<dyn std::error::Error>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 2.0)?;
    let lost_from = count.saturating_sub((1.5 * fps).ceil() as usize);

    let frames = (0..count)
        .map(|i| {
            let t = i as f64 / fps;
            if i >= lost_from {
                return RawLaneSummary {
                    distance_to_stopping_zone: -1.0,
                    distance_to_stopping_zone_end: -1.0,
                    ..Default::default()
                };
            }
            let angle = 25.0 * (0.8 * t).sin() + noise.sample(&mut rng);
            let entrance = 20.0 + (280.0 - 60.0 * t).abs();
            RawLaneSummary {
                angle,
                distance_middle: angle * 0.5,
                distance_left: -40.0 + angle * 0.5,
                distance_right: 40.0 + angle * 0.5,
                distance_to_stopping_zone: entrance,
                distance_to_stopping_zone_end: entrance + 150.0,
            }
        })
        .collect();
    Ok(frames)
}
