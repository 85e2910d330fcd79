//! Landmark source boundary.
//!
//! Camera capture and landmark inference live outside this crate.  The
//! frame loop only sees a `LandmarkSource` that yields zero or one hand per
//! frame.  Two sources are provided: a JSON-lines replay file (recorded
//! detector output) and a scripted in-memory queue for tests.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::tracking::LandmarkSet;

/// Result of one capture attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// A frame was captured; `None` means no hand was detected in it.
    Frame(Option<LandmarkSet>),
    /// The capture failed this time; skip the tick and try again.
    Dropped,
    /// The source is exhausted or released.
    Closed,
}

/// Per-frame provider of hand landmarks.
pub trait LandmarkSource {
    /// Block until the next frame is available.
    fn capture(&mut self) -> Capture;
    /// Release the underlying device.  Later captures return `Closed`.
    fn release(&mut self);
}

// ── Replay file ────────────────────────────────────────────

/// One line of a replay file.
#[derive(Debug, Deserialize)]
struct ReplayLine {
    #[serde(default)]
    hand: Option<Vec<[f32; 2]>>,
    #[serde(default)]
    dropped: bool,
}

/// Replays recorded detector output from a JSON-lines file.
///
/// Each line holds normalized (0..1) coordinates that are scaled to the
/// configured frame size:
///
/// ```text
/// {"hand": [[0.51, 0.62], ... 21 points]}
/// {"hand": null}
/// {"dropped": true}
/// ```
pub struct ReplaySource<R: BufRead = BufReader<File>> {
    reader: Option<R>,
    width: f32,
    height: f32,
    line_no: usize,
    frames: u64,
}

impl ReplaySource<BufReader<File>> {
    /// Open a replay file.  Failure here is fatal for the frame loop.
    pub fn open(path: &Path, width: f32, height: f32) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open landmark replay '{}'", path.display()))?;
        info!("Landmark source: replaying {}", path.display());
        Ok(Self::from_reader(BufReader::new(file), width, height))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R, width: f32, height: f32) -> Self {
        Self {
            reader: Some(reader),
            width,
            height,
            line_no: 0,
            frames: 0,
        }
    }

    /// Frames delivered so far (dropped captures excluded).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn parse_line(&self, line: &str) -> Capture {
        let parsed: ReplayLine = match serde_json::from_str(line) {
            Ok(p) => p,
            Err(e) => {
                warn!("Replay line {}: malformed ({}), dropping frame", self.line_no, e);
                return Capture::Dropped;
            }
        };
        if parsed.dropped {
            return Capture::Dropped;
        }
        let Some(points) = parsed.hand else {
            return Capture::Frame(None);
        };
        match LandmarkSet::from_normalized(&points, self.width, self.height) {
            Some(set) => Capture::Frame(Some(set)),
            None => {
                warn!(
                    "Replay line {}: {} landmarks, dropping frame",
                    self.line_no,
                    points.len(),
                );
                Capture::Dropped
            }
        }
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn capture(&mut self) -> Capture {
        loop {
            let Some(reader) = self.reader.as_mut() else {
                return Capture::Closed;
            };
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {
                    debug!("Replay finished after {} frames", self.frames);
                    return Capture::Closed;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Replay read failed at line {}: {}", self.line_no + 1, e);
                    self.reader = None;
                    return Capture::Closed;
                }
            }
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let capture = self.parse_line(line);
            if matches!(capture, Capture::Frame(_)) {
                self.frames += 1;
            }
            return capture;
        }
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            info!("Landmark source released after {} frames", self.frames);
        }
    }
}

// ── Scripted ───────────────────────────────────────────────

/// A source that delivers captures from a pre-defined queue.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    captures: VecDeque<Capture>,
    released: bool,
}

impl ScriptedSource {
    pub fn new(captures: Vec<Capture>) -> Self {
        Self {
            captures: VecDeque::from(captures),
            released: false,
        }
    }

    /// Queue `count` copies of a frame.
    pub fn push_frames(&mut self, hand: Option<LandmarkSet>, count: usize) {
        for _ in 0..count {
            self.captures.push_back(Capture::Frame(hand.clone()));
        }
    }

    pub fn push(&mut self, capture: Capture) {
        self.captures.push_back(capture);
    }

    pub fn remaining(&self) -> usize {
        self.captures.len()
    }

    pub fn released(&self) -> bool {
        self.released
    }
}

impl LandmarkSource for ScriptedSource {
    fn capture(&mut self) -> Capture {
        if self.released {
            return Capture::Closed;
        }
        self.captures.pop_front().unwrap_or(Capture::Closed)
    }

    fn release(&mut self) {
        self.released = true;
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use std::io::{Cursor, Write};

    fn hand_line(x: f32, y: f32) -> String {
        let points = vec![[x, y]; 21];
        serde_json::json!({ "hand": points }).to_string()
    }

    fn replay(text: &str) -> ReplaySource<Cursor<Vec<u8>>> {
        ReplaySource::from_reader(Cursor::new(text.as_bytes().to_vec()), 1000.0, 500.0)
    }

    #[test]
    fn test_replay_frames() {
        let text = format!(
            "{}\n{{\"hand\": null}}\n{{}}\n\n{{\"dropped\": true}}\n",
            hand_line(0.5, 0.5)
        );
        let mut src = replay(&text);

        match src.capture() {
            Capture::Frame(Some(set)) => assert_eq!(set.thumb_tip(), Point::new(500.0, 250.0)),
            other => panic!("expected hand, got {:?}", other),
        }
        assert_eq!(src.capture(), Capture::Frame(None));
        assert_eq!(src.capture(), Capture::Frame(None));
        // Blank line skipped
        assert_eq!(src.capture(), Capture::Dropped);
        assert_eq!(src.capture(), Capture::Closed);
        assert_eq!(src.frames(), 3);
    }

    #[test]
    fn test_replay_malformed_lines_drop() {
        let mut src = replay("not json\n{\"hand\": [[0.1, 0.1]]}\n{\"hand\": null}\n");
        assert_eq!(src.capture(), Capture::Dropped);
        assert_eq!(src.capture(), Capture::Dropped);
        assert_eq!(src.capture(), Capture::Frame(None));
    }

    #[test]
    fn test_replay_release() {
        let mut src = replay("{\"hand\": null}\n{\"hand\": null}\n");
        src.capture();
        src.release();
        assert_eq!(src.capture(), Capture::Closed);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let err = ReplaySource::open(Path::new("/nonexistent/replay.jsonl"), 1280.0, 720.0)
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("failed to open landmark replay"));
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", hand_line(0.25, 0.5)).unwrap();
        let mut src = ReplaySource::open(file.path(), 1280.0, 720.0).unwrap();
        match src.capture() {
            Capture::Frame(Some(set)) => assert_eq!(set.index_tip(), Point::new(320.0, 360.0)),
            other => panic!("expected hand, got {:?}", other),
        }
        assert_eq!(src.capture(), Capture::Closed);
    }

    #[test]
    fn test_scripted_source() {
        let mut src = ScriptedSource::new(vec![Capture::Dropped]);
        src.push_frames(None, 2);
        assert_eq!(src.remaining(), 3);
        assert_eq!(src.capture(), Capture::Dropped);
        assert_eq!(src.capture(), Capture::Frame(None));
        src.release();
        assert!(src.released());
        assert_eq!(src.capture(), Capture::Closed);
    }
}
