//! Headless frame loop -- one tick per captured frame, capped at a fixed rate.
//!
//! Runs until the landmark source closes, the user confirms exit, a frame
//! limit is reached (CI) or SIGINT/SIGTERM arrives.  The source is always
//! released before returning.  Activity entries are flushed between frames,
//! at the status interval and on stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::render::Renderer;
use crate::source::{Capture, LandmarkSource};
use crate::state::DashboardState;

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Frame loop configuration.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Tick rate cap in Hz; 0 runs as fast as the source delivers.
    pub frame_rate: u32,
    /// Stop after this many processed frames (for CI).
    pub exit_after_frames: Option<u64>,
    /// Wall-clock interval between status log lines.
    pub status_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            exit_after_frames: None,
            status_interval: Duration::from_secs(60),
        }
    }
}

impl LoopConfig {
    /// Target duration of one tick, if capped.
    pub fn frame_budget(&self) -> Option<Duration> {
        if self.frame_rate == 0 {
            None
        } else {
            Some(Duration::from_secs_f64(1.0 / self.frame_rate as f64))
        }
    }
}

/// Why the frame loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    SourceClosed,
    ExitConfirmed,
    FrameLimit,
    Signal,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceClosed => "source-closed",
            Self::ExitConfirmed => "exit-confirmed",
            Self::FrameLimit => "frame-limit",
            Self::Signal => "signal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub dropped: u64,
    pub reason: ExitReason,
}

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
pub fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Run the frame loop until a stop condition is met.
pub fn run<S, R>(
    state: &mut DashboardState,
    source: &mut S,
    renderer: &mut R,
    config: &LoopConfig,
) -> LoopSummary
where
    S: LandmarkSource + ?Sized,
    R: Renderer + ?Sized,
{
    let frame_budget = config.frame_budget();
    let mut last_status_log = Instant::now();
    let mut frames: u64 = 0;
    let mut dropped: u64 = 0;

    info!(
        "Frame loop starting ({})",
        if config.frame_rate == 0 {
            "uncapped".to_string()
        } else {
            format!("{} Hz", config.frame_rate)
        }
    );
    info!("Config: {}", state.config.config_sexp());

    let reason = loop {
        let frame_start = Instant::now();

        // Check global shutdown flag (set by signal handler)
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            break ExitReason::Signal;
        }

        if config.exit_after_frames.is_some_and(|limit| frames >= limit) {
            info!("Frame limit reached after {} frames", frames);
            break ExitReason::FrameLimit;
        }

        // Periodic status logging
        if last_status_log.elapsed() >= config.status_interval {
            info!(
                "Dashboard status: {} frames, {} dropped, {}",
                frames,
                dropped,
                state.status_sexp()
            );
            state.flush_activity_log();
            last_status_log = Instant::now();
        }

        match source.capture() {
            Capture::Closed => {
                info!("Landmark source closed");
                break ExitReason::SourceClosed;
            }
            Capture::Dropped => {
                // No state is touched; retry on the next iteration
                dropped += 1;
                debug!("Capture dropped ({} so far)", dropped);
            }
            Capture::Frame(hand) => {
                frames += 1;
                let outcome = state.tick(hand.as_ref());
                renderer.render(&state.snapshot());
                if outcome.exit_requested {
                    break ExitReason::ExitConfirmed;
                }
            }
        }

        if let Some(budget) = frame_budget {
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    };

    source.release();
    renderer.finish();
    state.flush_activity_log();

    info!(
        "Frame loop stopped ({}): {} frames, {} dropped",
        reason.as_str(),
        frames,
        dropped,
    );
    LoopSummary {
        frames,
        dropped,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{CsvActivityLog, RecordingActivityLog};
    use crate::config::DashboardConfig;
    use crate::geometry::Point;
    use crate::render::SnapshotWriter;
    use crate::source::ScriptedSource;
    use crate::tracking::{HandLandmark, LandmarkSet, LANDMARK_COUNT};
    use crate::ui::RoomLayout;

    fn state() -> DashboardState {
        let config = DashboardConfig::default();
        let layout = RoomLayout::defaults(config.floorplan());
        DashboardState::new(config, layout, Box::new(RecordingActivityLog::new()))
    }

    fn uncapped() -> LoopConfig {
        LoopConfig {
            frame_rate: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_budget() {
        assert_eq!(uncapped().frame_budget(), None);
        let budget = LoopConfig::default().frame_budget().unwrap();
        assert!(budget > Duration::from_millis(16) && budget < Duration::from_millis(17));
    }

    #[test]
    fn test_runs_until_source_closes() {
        let mut st = state();
        let mut source = ScriptedSource::new(vec![Capture::Dropped]);
        source.push_frames(None, 3);
        source.push(Capture::Dropped);
        let mut renderer = SnapshotWriter::new(Vec::new());

        let summary = run(&mut st, &mut source, &mut renderer, &uncapped());
        assert_eq!(summary.reason, ExitReason::SourceClosed);
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.dropped, 2);
        // Dropped captures never tick the state
        assert_eq!(st.frame(), 3);
        assert_eq!(renderer.written(), 3);
        assert!(source.released());
    }

    #[test]
    fn test_activity_flushed_on_stop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.csv");
        let mut config = DashboardConfig::default();
        config.session.login_confirm_frames = 1;
        let layout = RoomLayout::defaults(config.floorplan());
        let mut st = DashboardState::new(config, layout, Box::new(CsvActivityLog::new(&path)));

        let mut fist = LandmarkSet::new([Point::new(640.0, 600.0); LANDMARK_COUNT]);
        for (tip, base) in HandLandmark::finger_pairs() {
            fist.set(base, Point::new(640.0, 500.0));
            fist.set(tip, Point::new(640.0, 560.0));
        }
        let mut source = ScriptedSource::default();
        source.push_frames(Some(fist), 1);
        let mut renderer = SnapshotWriter::new(Vec::new());

        run(&mut st, &mut source, &mut renderer, &uncapped());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("|User 1|login successful"));
    }

    #[test]
    fn test_frame_limit() {
        let mut st = state();
        let mut source = ScriptedSource::default();
        source.push_frames(None, 10);
        let mut renderer = SnapshotWriter::new(Vec::new());
        let config = LoopConfig {
            exit_after_frames: Some(4),
            ..uncapped()
        };

        let summary = run(&mut st, &mut source, &mut renderer, &config);
        assert_eq!(summary.reason, ExitReason::FrameLimit);
        assert_eq!(summary.frames, 4);
        assert!(source.released());
        assert_eq!(source.remaining(), 6);
    }
}
