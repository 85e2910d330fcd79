//! Rendering boundary -- snapshot consumers.
//!
//! Pixel drawing lives outside this crate.  The frame loop hands each
//! tick's [`DashboardSnapshot`] to a [`Renderer`]; renderers observe the
//! dashboard and never mutate it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::{trace, warn};

use crate::state::DashboardSnapshot;

/// Consumer of per-tick dashboard snapshots.
pub trait Renderer {
    fn render(&mut self, snapshot: &DashboardSnapshot);

    /// Called once when the frame loop stops.
    fn finish(&mut self) {}
}

/// Logs a one-line summary of each frame at `trace` level.
#[derive(Debug, Default)]
pub struct TraceRenderer;

impl Renderer for TraceRenderer {
    fn render(&mut self, snapshot: &DashboardSnapshot) {
        trace!(
            "render frame {}: {} view={} menu={} cursor={:?} pinch={}",
            snapshot.frame,
            snapshot.session.as_str(),
            snapshot.view.as_str(),
            snapshot.menu_open,
            snapshot.cursor.map(|p| (p.x.round(), p.y.round())),
            snapshot.pinch_active,
        );
    }
}

/// Writes every snapshot as one JSON line.
pub struct SnapshotWriter<W: Write> {
    out: W,
    written: u64,
    failed: bool,
}

impl SnapshotWriter<BufWriter<File>> {
    /// Create (truncate) a snapshot file.
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create snapshot file '{}'", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl SnapshotWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            written: 0,
            failed: false,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_snapshot(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Renderer for SnapshotWriter<W> {
    fn render(&mut self, snapshot: &DashboardSnapshot) {
        if self.failed {
            return;
        }
        match self.write_snapshot(snapshot) {
            Ok(()) => self.written += 1,
            Err(e) => {
                warn!("Snapshot output failed, disabling: {}", e);
                self.failed = true;
            }
        }
    }

    fn finish(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!("Snapshot flush failed: {}", e);
        }
    }
}

/// Fans a snapshot out to several renderers.
#[derive(Default)]
pub struct RendererSet {
    renderers: Vec<Box<dyn Renderer>>,
}

impl RendererSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl Renderer for RendererSet {
    fn render(&mut self, snapshot: &DashboardSnapshot) {
        for r in &mut self.renderers {
            r.render(snapshot);
        }
    }

    fn finish(&mut self) {
        for r in &mut self.renderers {
            r.finish();
        }
    }
}
