use clap::{Parser, ValueEnum};
use force_grid_core::config::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_OUTPUT_DIR};
use force_grid_core::grid::DEFAULT_ACTIVE_THRESHOLD;
use force_grid_core::playback::DEFAULT_FPS;
use force_grid_core::ramp::DEFAULT_MAX_SCALE;
use force_grid_core::{
    ArchLayout, CyclingSource, Dashboard, FullLayout, ImageSequenceRecorder, MaskLayout, Playback,
    ReadingSource, Session, SensorLayout, SimulatedSource, VisualizerConfig, VizError, HW_COLS,
    HW_ROWS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    /// Deterministic ramp, `(tick + 10 * sensor) % 1001`
    Cycling,
    /// Seeded bite pattern with dead sensors and jitter
    Simulated,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutKind {
    /// Every grid position carries a sensor
    Full,
    /// Horseshoe-shaped dental arch
    Arch,
}

/// Headless force grid playback
#[derive(Parser, Debug)]
#[command(name = "force-grid-demo")]
#[command(about = "Play sensor readings through the force grid and optionally export frames", long_about = None)]
struct Args {
    /// Playback duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f64,

    /// Steps per second
    #[arg(short, long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Divisor applied to every reading before color mapping
    #[arg(short, long, default_value_t = 1.0)]
    sensitivity: f64,

    /// Force at the top of the color ramp
    #[arg(long, default_value_t = DEFAULT_MAX_SCALE)]
    max_scale: f64,

    /// Readings above this are drawn opaque
    #[arg(long, default_value_t = DEFAULT_ACTIVE_THRESHOLD)]
    threshold: f64,

    /// Reading source
    #[arg(long, value_enum, default_value_t = SourceKind::Simulated)]
    source: SourceKind,

    /// Seed for the simulated source
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Built-in sensor layout (ignored when --mask is given)
    #[arg(long, value_enum, default_value_t = LayoutKind::Arch)]
    layout: LayoutKind,

    /// Sensor mask file, one line per row, `#` for a sensor
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Write every step as a PPM frame
    #[arg(short, long)]
    record: bool,

    /// Directory for recorded frames
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = CANVAS_WIDTH)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = CANVAS_HEIGHT)]
    height: u32,

    /// Print a line every N steps
    #[arg(long, default_value_t = 10)]
    report_every: usize,
}

impl Args {
    fn config(&self) -> VisualizerConfig {
        VisualizerConfig {
            max_scale: self.max_scale,
            active_threshold: self.threshold,
            sensitivity: self.sensitivity,
            fps: self.fps,
            canvas_width: self.width,
            canvas_height: self.height,
            output_dir: self.output.clone(),
            ..Default::default()
        }
    }

    fn layout(&self) -> Result<Box<dyn SensorLayout>, VizError> {
        if let Some(path) = &self.mask {
            let text = std::fs::read_to_string(path).map_err(|e| VizError::io(path, e))?;
            let mask = MaskLayout::parse(&text)?;
            let (rows, cols) = mask.dimensions();
            if (rows, cols) != (HW_ROWS, HW_COLS) {
                warn!(
                    "Mask is {}x{}, grid is {}x{}; positions outside the mask are empty",
                    rows, cols, HW_ROWS, HW_COLS
                );
            }
            return Ok(Box::new(mask));
        }
        Ok(match self.layout {
            LayoutKind::Full => Box::new(FullLayout),
            LayoutKind::Arch => Box::new(ArchLayout::new(HW_ROWS, HW_COLS)),
        })
    }

    fn source(&self, sensors: usize) -> Box<dyn ReadingSource> {
        match self.source {
            SourceKind::Cycling => Box::new(CyclingSource::new(sensors)),
            SourceKind::Simulated => Box::new(SimulatedSource::new(sensors, self.seed)),
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), VizError> {
    println!("=== Force Grid Demo ===\n");

    let config = args.config();
    let layout = args.layout()?;
    let dashboard = Dashboard::new(config, layout.as_ref())?;
    let sensors = dashboard.sensor_count();
    println!(
        "Grid {}x{} with {} sensors ({:?} source)",
        HW_ROWS, HW_COLS, sensors, args.source
    );

    let playback = Playback::from_duration(args.duration, args.fps);
    let steps = playback.len();
    println!(
        "Playing {:.1}s at {} fps ({} steps)\n",
        args.duration, args.fps, steps
    );

    let mut session = Session::new(dashboard, playback, args.source(sensors));
    if args.record {
        session = session.with_recorder(Box::new(ImageSequenceRecorder::new(&args.output)));
    }

    session.toggle()?;
    if args.record && !session.is_recording() {
        println!("Recording unavailable, continuing without frames\n");
    }

    let report_every = args.report_every.max(1);
    let mut recorded = 0;
    for step in 0..steps {
        let Some(report) = session.tick() else {
            break;
        };
        if report.recorded {
            recorded += 1;
        }
        if step % report_every == 0 || step + 1 == steps {
            println!(
                "T={:6.1}s | total {:>10} | peak {:>7} | active {:>4}",
                report.timestamp, report.sample.total, report.sample.peak, report.sample.active
            );
        }
    }
    session.close();

    let history = session.dashboard().history();
    let timer = session.timer();
    println!("\n=== Summary ===");
    println!("Steps: {}", timer.frames());
    println!("Peak total force: {}", history.max_total());
    println!(
        "Step time: {:.2} ms avg, {:.2} ms last",
        timer.average_ms(),
        timer.last_frame_time_ms()
    );
    if args.record {
        println!("Frames written: {} to {}", recorded, args.output.display());
    }
    info!("Run complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_library_config() {
        let args = Args::parse_from(["demo-headless"]);
        let config = args.config();
        let defaults = VisualizerConfig::default();
        assert_eq!(config.active_threshold, DEFAULT_ACTIVE_THRESHOLD);
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_threshold_flag_overrides_default() {
        let args = Args::parse_from(["demo-headless", "--threshold", "12.5"]);
        assert_eq!(args.config().active_threshold, 12.5);
    }
}
