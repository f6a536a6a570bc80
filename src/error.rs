//! Error types for heightview

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while ingesting heightmaps or bringing up the window and GPU.
///
/// Ingestion failures (`InvalidDimensions`, `MisalignedBuffer`, `MeshTooLarge`,
/// `Decode`, `Io`) only abort the load that produced them. `Graphics` and
/// `EventLoop` are fatal at startup.
#[derive(Error, Debug)]
pub enum HeightviewError {
    #[error(
        "The selected file has a Float32 size of {count}, which does not add up to a square image."
    )]
    InvalidDimensions { count: usize },

    #[error("The selected file is {bytes} bytes long, which is not a whole number of Float32 samples.")]
    MisalignedBuffer { bytes: usize },

    #[error(
        "A {rows}x{cols} heightmap needs a {bytes} byte GPU buffer, above the device limit of {limit} bytes."
    )]
    MeshTooLarge {
        rows: usize,
        cols: usize,
        bytes: u64,
        limit: u64,
    },

    #[error("The selected file could not be loaded as an image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Graphics backend error: {0}")]
    Graphics(String),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type alias for heightview operations
pub type Result<T> = std::result::Result<T, HeightviewError>;
