//! Poise Replay - run a landmark recording through an analysis session
//!
//! Fast mode replays on the recording's own timeline: summary ticks fire
//! at every interval boundary the frame timestamps cross. Live mode
//! paces frames in real time and lets the scheduler drive the cycles.

mod args;
mod synthetic;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use poise_core::{HolisticFrame, PoiseError, PoiseResult, StateTime};
use poise_runtime::{AnalysisSession, SessionConfig, SharedSession, SummaryScheduler};
use tracing::{info, warn};

use args::{Args, Source, USAGE};
use synthetic::{SyntheticRecording, FRAME_PERIOD};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    poise_runtime::init_logging(args.log_format)?;
    let config = args.session_config()?;

    let frames = match &args.source {
        Source::Recording(path) => read_recording(path)?,
        Source::Synthetic { frames, seed } => {
            SyntheticRecording::new(*frames, StateTime::now(), *seed).collect()
        }
    };
    info!("loaded {} frames", frames.len());

    let shared = AnalysisSession::shared(config.clone());
    let finished_at = if args.live {
        replay_live(&shared, &frames, &config).await
    } else {
        replay_fast(&shared, &frames, &config)
    };

    let session = shared.lock();
    println!();
    print!("{}", session.history().render_table());
    println!();

    let stats = session.stats();
    println!(
        "{} frames processed, {} cycles, {} elapsed",
        stats.frames_processed,
        stats.cycles,
        humantime::format_duration(Duration::from_secs(session.elapsed_secs()))
    );

    let path = session.export_to_dir(&args.out, finished_at)?;
    println!("Export written to {}", path.display());

    Ok(())
}

/// Decode a JSON-lines recording, skipping lines that do not parse
fn read_recording(path: &Path) -> PoiseResult<Vec<HolisticFrame>> {
    let reader = BufReader::new(File::open(path)?);
    let mut frames = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match HolisticFrame::from_json_line(&line) {
            Ok(frame) => frames.push(frame),
            Err(e) => {
                let skipped = PoiseError::InvalidRecordingLine {
                    line: index + 1,
                    reason: e.to_string(),
                };
                warn!("{}, skipping", skipped);
            }
        }
    }

    Ok(frames)
}

/// Replay on the recording's timeline; returns the replay end time
fn replay_fast(shared: &SharedSession, frames: &[HolisticFrame], config: &SessionConfig) -> StateTime {
    let start = frames
        .first()
        .and_then(HolisticFrame::captured_at)
        .unwrap_or_else(StateTime::now);

    let mut session = shared.lock();
    session.start(start);

    let mut next_tick = start + config.summary_interval;
    let mut last = start;

    for (i, frame) in frames.iter().enumerate() {
        let fallback = start + FRAME_PERIOD * i as u32;
        let at = frame.captured_at().unwrap_or(fallback);

        while next_tick <= at {
            session.advance_clock(next_tick);
            if let Some(summary) = session.tick(next_tick) {
                info!(
                    "cycle {}: {} / {} / {}",
                    session.history().len(),
                    summary.expression,
                    summary.posture,
                    summary.eye_contact
                );
            }
            next_tick = next_tick + config.summary_interval;
        }

        session.advance_clock(at);
        session.process_frame(frame, at);
        last = last.max(at);
    }

    if session.pending_frames() > 0 {
        info!(
            "{} frames after the last cycle boundary were not summarized",
            session.pending_frames()
        );
    }
    session.stop();
    last
}

/// Replay in real time with the scheduler running; returns the wall-clock end
async fn replay_live(shared: &SharedSession, frames: &[HolisticFrame], config: &SessionConfig) -> StateTime {
    shared.lock().start(StateTime::now());
    let scheduler = SummaryScheduler::spawn(shared.clone(), config);

    let mut previous: Option<StateTime> = None;
    for frame in frames {
        let gap = match (previous, frame.captured_at()) {
            (Some(prev), Some(at)) => at - prev,
            _ => FRAME_PERIOD,
        };
        tokio::time::sleep(gap).await;
        previous = frame.captured_at();

        // Restamp on the wall clock so frames and cycles share a timeline
        let mut live = frame.clone();
        live.timestamp = None;
        shared.lock().process_frame(&live, StateTime::now());
    }

    scheduler.shutdown().await;
    let mut session = shared.lock();
    session.advance_clock(StateTime::now());
    session.stop();
    StateTime::now()
}
