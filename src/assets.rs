//! Tile face images.
//!
//! The terminal cannot paint the images themselves, so each reference is
//! loaded once per board to decide whether the face can be shown. A failed
//! image is logged and leaves the face blank; the game is unaffected.

use derive_more::{Display, Error};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Load status of one face image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceImage {
    /// Not checked yet.
    #[default]
    Pending,
    /// Loaded; holds its size in bytes.
    Ready(usize),
    /// Could not be loaded.
    Missing,
}

/// An individual tile image failed to load.
#[derive(Debug, Clone, Display, Error)]
#[display("Image load error for {}: {} at {}:{}", file_name, message, file, line)]
pub struct ImageLoadError {
    /// The image reference that failed.
    pub file_name: String,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ImageLoadError {
    /// Creates a new image error with caller location tracking.
    #[track_caller]
    pub fn new(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            file_name: file_name.into(),
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result of probing one image, tagged with the board generation it
/// was requested for.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Board generation.
    pub generation: u64,
    /// Image reference.
    pub file_name: String,
    /// Load status.
    pub image: FaceImage,
}

/// Loads an image reference: `http(s)://` URLs with a GET, anything else
/// as a local path. Empty images count as failures.
#[instrument(skip(client))]
pub async fn load_image(client: &reqwest::Client, file_name: &str) -> Result<usize, ImageLoadError> {
    let len = if file_name.starts_with("http://") || file_name.starts_with("https://") {
        let response = client
            .get(file_name)
            .send()
            .await
            .map_err(|e| ImageLoadError::new(file_name, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::new(file_name, format!("HTTP {}", status)));
        }
        response
            .bytes()
            .await
            .map_err(|e| ImageLoadError::new(file_name, e.to_string()))?
            .len()
    } else {
        tokio::fs::read(file_name)
            .await
            .map_err(|e| ImageLoadError::new(file_name, e.to_string()))?
            .len()
    };

    if len == 0 {
        return Err(ImageLoadError::new(file_name, "empty image"));
    }
    debug!(bytes = len, "Image loaded");
    Ok(len)
}

/// Tracks face images for the current board and probes new ones in the
/// background.
#[derive(Debug)]
pub struct FaceImages {
    client: reqwest::Client,
    generation: u64,
    images: HashMap<String, FaceImage>,
    tx: mpsc::UnboundedSender<ProbeReport>,
    rx: mpsc::UnboundedReceiver<ProbeReport>,
}

impl FaceImages {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: reqwest::Client::new(),
            generation: 0,
            images: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Starts probing every distinct reference of a newly loaded board.
    /// Calling again for the same generation does nothing.
    #[instrument(skip(self, file_names))]
    pub fn probe_board<'a>(&mut self, generation: u64, file_names: impl IntoIterator<Item = &'a str>) {
        if generation == self.generation {
            return;
        }
        self.generation = generation;
        self.images.clear();

        for file_name in file_names {
            if self.images.contains_key(file_name) {
                continue;
            }
            self.images.insert(file_name.to_string(), FaceImage::Pending);

            let client = self.client.clone();
            let tx = self.tx.clone();
            let file_name = file_name.to_string();
            tokio::spawn(async move {
                let image = match load_image(&client, &file_name).await {
                    Ok(len) => FaceImage::Ready(len),
                    Err(e) => {
                        warn!(error = %e, "Failed to load image");
                        FaceImage::Missing
                    }
                };
                let _ = tx.send(ProbeReport {
                    generation,
                    file_name,
                    image,
                });
            });
        }
    }

    /// Applies finished probes. Reports for an earlier board are dropped.
    /// Returns the number of reports applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(report) = self.rx.try_recv() {
            if report.generation != self.generation {
                continue;
            }
            self.images.insert(report.file_name, report.image);
            applied += 1;
        }
        applied
    }

    /// Status of one reference.
    pub fn get(&self, file_name: &str) -> FaceImage {
        self.images.get(file_name).copied().unwrap_or_default()
    }
}

impl Default for FaceImages {
    fn default() -> Self {
        Self::new()
    }
}
