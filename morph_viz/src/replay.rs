//! Recorded landmark sessions.
//!
//! A replay file holds one frame per line: a JSON array of
//! `{"x":…,"y":…,"z":…}` points, or `null` when no hand was in view.
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use hand_signal::LandmarkFrame;

use crate::capture::{LandmarkSource, SourceEvent, StopToken};
use crate::error::AppError;

/// Parse replay text into frames.  Errors carry the 1-based line number.
pub fn parse_replay(text: &str) -> Result<Vec<Option<LandmarkFrame>>, AppError> {
    let mut frames = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let frame = serde_json::from_str::<Option<LandmarkFrame>>(line)
            .map_err(|source| AppError::Replay { line: i + 1, source })?;
        frames.push(frame);
    }
    Ok(frames)
}

pub fn load_replay(path: &Path) -> Result<Vec<Option<LandmarkFrame>>, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| AppError::Io { path: path.to_path_buf(), source })?;
    let frames = parse_replay(&text)?;
    log::info!("replay {}: {} frames", path.display(), frames.len());
    Ok(frames)
}

/// Plays recorded frames back at a fixed cadence.
pub struct ReplayLandmarkSource {
    frames:  Vec<Option<LandmarkFrame>>,
    cadence: Duration,
    looping: bool,
}

impl ReplayLandmarkSource {
    pub fn new(frames: Vec<Option<LandmarkFrame>>, cadence: Duration, looping: bool) -> Self {
        ReplayLandmarkSource { frames, cadence, looping }
    }

    pub fn open(path: &Path, cadence: Duration, looping: bool) -> Result<Self, AppError> {
        Ok(Self::new(load_replay(path)?, cadence, looping))
    }
}

impl LandmarkSource for ReplayLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>, stop: StopToken) {
        if self.frames.is_empty() {
            let _ = tx.send(SourceEvent::Finished);
            return;
        }
        loop {
            for frame in &self.frames {
                if stop.is_stopped() {
                    return;
                }
                if tx.send(SourceEvent::Frame(frame.clone())).is_err() {
                    return;
                }
                thread::sleep(self.cadence);
            }
            if !self.looping {
                let _ = tx.send(SourceEvent::Finished);
                return;
            }
        }
    }
}
