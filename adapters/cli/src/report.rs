//! Frame printing and periodic status reports.

use std::{
    sync::mpsc::{Receiver, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Context, Result as AnyResult};
use motion_maze_core::{Event, GameSnapshot};
use motion_maze_engine::{Observer, Submitter};
use motion_maze_rendering::{Frame, RenderingBackend, StatusReport};
use tracing::{info, warn};

/// Observer that presents a frame whenever the snapshot changes.
#[derive(Debug)]
pub(crate) struct FrameObserver<B> {
    backend: B,
    last: Option<GameSnapshot>,
}

impl<B: RenderingBackend> FrameObserver<B> {
    pub(crate) const fn new(backend: B) -> Self {
        Self {
            backend,
            last: None,
        }
    }
}

impl<B: RenderingBackend + Send> Observer for FrameObserver<B> {
    fn on_update(&mut self, snapshot: &GameSnapshot, _events: &[Event]) {
        if self.last.as_ref() == Some(snapshot) {
            return;
        }
        if let Err(error) = self.backend.present(&Frame::from_snapshot(snapshot)) {
            warn!(error = %format!("{error:#}"), "frame_present_failed");
        }
        self.last = Some(snapshot.clone());
    }
}

/// Formats a report as a single line of text or JSON.
pub(crate) fn format_report(report: &StatusReport, json: bool) -> AnyResult<String> {
    if json {
        serde_json::to_string(report).context("failed to encode status report")
    } else {
        Ok(report.to_string())
    }
}

/// Pulls a snapshot every `interval` and logs it until `stop` fires.
pub(crate) fn spawn_reporter(
    submitter: Submitter,
    interval: Duration,
    json: bool,
    stop: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        let Ok(snapshot) = submitter.snapshot() else {
            break;
        };
        match format_report(&StatusReport::from_snapshot(&snapshot), json) {
            Ok(report) => info!(%report, "status_report"),
            Err(error) => warn!(error = %format!("{error:#}"), "status_report_failed"),
        }
    })
}
