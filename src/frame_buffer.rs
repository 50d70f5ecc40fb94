//! Latest-frame buffer for real-time video sources.
//!
//! A media source delivers frames over a channel; a reader task drains
//! them into a single-slot cell. Conversational-turn consumers take the
//! slot's contents (clearing it) to attach the freshest frame to a turn.
//! At most one reader task is alive at a time: attaching a new source
//! tears the old one down first.

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// A single video frame as delivered by the media source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Single-slot cell holding the most recent frame. Writes overwrite,
/// reads clear.
#[derive(Clone, Default)]
pub struct LatestFrame {
    slot: Arc<Mutex<Option<VideoFrame>>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, frame: VideoFrame) {
        let mut slot = self.slot.lock().await;
        *slot = Some(frame);
    }

    /// Return the buffered frame and clear the slot.
    pub async fn take(&self) -> Option<VideoFrame> {
        let mut slot = self.slot.lock().await;
        slot.take()
    }
}

/// Owns the reader task that drains a frame source into the slot.
pub struct FrameBuffer {
    latest: LatestFrame,
    reader: Option<JoinHandle<()>>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            latest: LatestFrame::new(),
            reader: None,
        }
    }

    /// Handle consumers use to take buffered frames.
    pub fn latest(&self) -> LatestFrame {
        self.latest.clone()
    }

    /// Subscribe to a new frame source, replacing any previous one.
    /// The old reader is aborted before the new one starts.
    pub fn attach(&mut self, mut frames: mpsc::Receiver<VideoFrame>) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }

        let latest = self.latest.clone();
        self.reader = Some(tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                latest.store(frame).await;
            }
            println!("[frame-buffer] Frame source closed");
        }));
    }

    /// Stop buffering without attaching a new source.
    pub fn detach(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        self.detach();
    }
}
