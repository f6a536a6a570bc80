//! Background heightmap loader.
//!
//! File reads, image decodes and mesh construction run on a dedicated worker
//! thread. Each request produces exactly one [`LoadOutcome`] which the render
//! loop collects with [`Loader::try_recv`] once per iteration, so a new mesh
//! is only ever published between frames.
//!
//! Fields whose mesh would not fit in a single GPU buffer are rejected here,
//! before any geometry is built.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{decode, SourceKind};
use crate::error::{HeightviewError, Result};
use crate::gfx::geometry::{self, Mesh};

/// A heightmap to load.
#[derive(Debug, Clone)]
pub enum LoadRequest {
    /// Read from disk
    Path(PathBuf),
    /// Already in memory; `name` selects the ingestion path
    Bytes { name: String, data: Vec<u8> },
}

impl LoadRequest {
    /// Display name, also used for suffix matching.
    pub fn name(&self) -> String {
        match self {
            LoadRequest::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            LoadRequest::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Mesh built from a successfully ingested field.
#[derive(Debug, Clone)]
pub struct LoadedField {
    pub kind: SourceKind,
    pub mesh: Mesh,
}

/// Result of one [`LoadRequest`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub name: String,
    pub result: Result<LoadedField>,
}

/// Owns the worker thread and both ends of its channels.
pub struct Loader {
    request_sender: Sender<LoadRequest>,
    outcome_receiver: Receiver<LoadOutcome>,
    max_buffer_size: Arc<AtomicU64>,
    _thread_handle: JoinHandle<()>,
}

impl Loader {
    /// Starts the worker. Meshes needing a buffer larger than
    /// `max_buffer_size` bytes are rejected.
    pub fn spawn(max_buffer_size: u64) -> Self {
        let (request_sender, request_receiver) = mpsc::channel::<LoadRequest>();
        let (outcome_sender, outcome_receiver) = mpsc::channel::<LoadOutcome>();
        let max_buffer_size = Arc::new(AtomicU64::new(max_buffer_size));

        let limit = max_buffer_size.clone();
        let thread_handle = thread::spawn(move || {
            run_worker(request_receiver, outcome_sender, limit);
        });

        Self {
            request_sender,
            outcome_receiver,
            max_buffer_size,
            _thread_handle: thread_handle,
        }
    }

    /// Replaces the buffer limit for requests not yet started, once the real
    /// device limit is known.
    pub fn set_max_buffer_size(&self, bytes: u64) {
        self.max_buffer_size.store(bytes, Ordering::Relaxed);
    }

    /// Queues a load. Requests are processed in submission order.
    pub fn request(&self, request: LoadRequest) {
        log::info!("Loading '{}'", request.name());
        if self.request_sender.send(request).is_err() {
            log::error!("Loader thread has stopped; request dropped");
        }
    }

    /// Next finished load, if any. Never blocks.
    pub fn try_recv(&self) -> Option<LoadOutcome> {
        self.outcome_receiver.try_recv().ok()
    }

    #[cfg(test)]
    fn recv_timeout(&self, timeout: std::time::Duration) -> Option<LoadOutcome> {
        self.outcome_receiver.recv_timeout(timeout).ok()
    }
}

fn run_worker(
    requests: Receiver<LoadRequest>,
    outcomes: Sender<LoadOutcome>,
    max_buffer_size: Arc<AtomicU64>,
) {
    for request in requests {
        let name = request.name();
        let result = load(request, &name, max_buffer_size.load(Ordering::Relaxed));
        if outcomes.send(LoadOutcome { name, result }).is_err() {
            // Render side is gone
            break;
        }
    }
}

fn load(request: LoadRequest, name: &str, max_buffer_size: u64) -> Result<LoadedField> {
    let data = match request {
        LoadRequest::Path(path) => {
            std::fs::read(&path).map_err(|source| HeightviewError::Io { path, source })?
        }
        LoadRequest::Bytes { data, .. } => data,
    };

    let kind = SourceKind::from_name(name);
    let field = decode(name, &data)?;
    geometry::ensure_fits(field.rows(), field.cols(), max_buffer_size)?;
    let mesh = geometry::build(&field);

    Ok(LoadedField { kind, mesh })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(10);
    const LIMIT: u64 = 1 << 28;

    fn raw_grid(side: usize) -> Vec<u8> {
        (0..side * side).flat_map(|v| (v as f32).to_le_bytes()).collect()
    }

    #[test]
    fn test_request_name_uses_file_name() {
        let request = LoadRequest::Path(PathBuf::from("/data/maps/Everest.BSQ"));
        assert_eq!(request.name(), "Everest.BSQ");
    }

    #[test]
    fn test_loader_builds_mesh_from_raw_bytes() {
        let loader = Loader::spawn(LIMIT);
        loader.request(LoadRequest::Bytes {
            name: "grid.bsq".into(),
            data: raw_grid(3),
        });

        let outcome = loader.recv_timeout(TIMEOUT).expect("loader produced no outcome");
        assert_eq!(outcome.name, "grid.bsq");
        let loaded = outcome.result.unwrap();
        assert_eq!(loaded.kind, SourceKind::RawFloat);
        assert_eq!(loaded.mesh.vertex_count(), 9);
        assert_eq!(loaded.mesh.triangle_count(), 8);
    }

    #[test]
    fn test_loader_reports_failures_in_order() {
        let loader = Loader::spawn(LIMIT);
        loader.request(LoadRequest::Bytes {
            name: "bad.bsq".into(),
            data: vec![0; 12],
        });
        loader.request(LoadRequest::Path(PathBuf::from(
            "/definitely/not/here/heightmap.png",
        )));

        let first = loader.recv_timeout(TIMEOUT).unwrap();
        assert!(matches!(
            first.result,
            Err(HeightviewError::InvalidDimensions { count: 3 })
        ));

        let second = loader.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(second.name, "heightmap.png");
        assert!(matches!(second.result, Err(HeightviewError::Io { .. })));
    }

    #[test]
    fn test_try_recv_is_empty_without_requests() {
        let loader = Loader::spawn(LIMIT);
        assert!(loader.try_recv().is_none());
    }

    #[test]
    fn test_loader_rejects_mesh_over_buffer_limit() {
        // A 3x3 grid needs 216 bytes of vertices
        let loader = Loader::spawn(128);
        loader.request(LoadRequest::Bytes {
            name: "grid.bsq".into(),
            data: raw_grid(3),
        });
        let outcome = loader.recv_timeout(TIMEOUT).unwrap();
        assert!(matches!(
            outcome.result,
            Err(HeightviewError::MeshTooLarge {
                rows: 3,
                cols: 3,
                bytes: 216,
                limit: 128,
            })
        ));

        loader.set_max_buffer_size(216);
        loader.request(LoadRequest::Bytes {
            name: "grid.bsq".into(),
            data: raw_grid(3),
        });
        let outcome = loader.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(outcome.result.unwrap().mesh.vertex_count(), 9);
    }
}
