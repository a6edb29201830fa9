//! Video Motion Detection CLI
//!
//! Command-line interface for testing and demonstrating the motion
//! detection pipeline over mock camera input.

use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use video_motion::{
    capture::{Camera, FileConfig, MockCamera},
    detection::{MotionDetector, TwoFramesDifferenceDetector},
};

#[derive(Debug, Parser)]
#[command(name = "video-motion", version, about = "Two-frame difference motion detection demo")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to process (overrides the config file).
    #[arg(long)]
    frames: Option<u32>,

    /// Difference threshold in [1, 255] (overrides the config file).
    #[arg(long)]
    threshold: Option<i32>,

    /// Keep processing frames until interrupted.
    #[arg(long)]
    continuous: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let frame_count = args.frames.unwrap_or(config.output.frame_count);
    let threshold = args.threshold.unwrap_or(config.detection.difference_threshold);
    let continuous = args.continuous || config.output.continuous;

    info!("Video Motion Detector v{}", video_motion::VERSION);
    info!("This is a demonstration using mock camera input");

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let mut detector: Box<dyn MotionDetector> =
        Box::new(TwoFramesDifferenceDetector::with_threshold(threshold));

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    info!("Processing frames...");

    let mut processed: u64 = 0;
    let mut motion_events: u64 = 0;

    while running.load(Ordering::SeqCst) {
        if !continuous && processed >= u64::from(frame_count) {
            break;
        }

        let frame = match camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                break;
            }
        };

        let sequence = frame.sequence();
        detector.process_frame(&frame);
        processed += 1;

        let level = detector.motion_level();
        if level >= config.detection.alarm_level && level > 0.0 {
            motion_events += 1;
            info!(frame = sequence, level, "Motion detected");
        }
    }

    info!(
        "Processed {} frames ({} skipped), {} motion events",
        processed,
        detector.frames_skipped(),
        motion_events
    );

    println!(
        "frames={} skipped={} motion_events={} last_level={:.4}",
        processed,
        detector.frames_skipped(),
        motion_events,
        detector.motion_level()
    );
}
