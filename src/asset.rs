//! Optional assets loaded off the render thread
//!
//! An asset starts `Pending` and settles once into `Loaded` or `Unavailable`.
//! The renderer polls every frame and never waits.

use crate::error::AssetError;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Upper bound on downloaded asset size (32MB)
const MAX_ASSET_SIZE: u64 = 32 * 1024 * 1024;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum Asset<T> {
    Pending,
    Loaded(T),
    Unavailable,
}

impl<T> Asset<T> {
    #[cfg(test)]
    pub fn get(&self) -> Option<&T> {
        match self {
            Asset::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Asset::Pending)
    }
}

/// Background loader for one asset
pub struct AssetLoader<T> {
    label: String,
    state: Asset<T>,
    receiver: Option<Receiver<Result<T, AssetError>>>,
}

impl<T: Send + 'static> AssetLoader<T> {
    /// Run `load` on a worker thread
    pub fn spawn<F>(label: impl Into<String>, load: F) -> Self
    where
        F: FnOnce() -> Result<T, AssetError> + Send + 'static,
    {
        let label = label.into();
        let (tx, rx) = mpsc::channel();
        let thread_label = label.clone();

        let spawned = thread::Builder::new()
            .name(format!("asset-{thread_label}"))
            .spawn(move || {
                // Receiver may be gone if the page was unmounted
                let _ = tx.send(load());
            });

        match spawned {
            Ok(_) => Self {
                label,
                state: Asset::Pending,
                receiver: Some(rx),
            },
            Err(e) => {
                log::warn!("could not start loader for {label}: {e}");
                Self::unavailable(label)
            }
        }
    }

    #[cfg(test)]
    pub fn ready(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            state: Asset::Loaded(value),
            receiver: None,
        }
    }

    pub fn unavailable(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: Asset::Unavailable,
            receiver: None,
        }
    }

    /// Settle the state if the worker has finished
    pub fn poll(&mut self) -> &Asset<T> {
        if let Some(rx) = &self.receiver {
            let outcome = match rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(AssetError::Disconnected)),
            };
            if let Some(result) = outcome {
                self.receiver = None;
                self.state = match result {
                    Ok(value) => {
                        log::info!("{} loaded", self.label);
                        Asset::Loaded(value)
                    }
                    Err(e) => {
                        log::warn!("{} unavailable, continuing without it: {e}", self.label);
                        Asset::Unavailable
                    }
                };
            }
        }
        &self.state
    }

    pub fn state(&self) -> &Asset<T> {
        &self.state
    }
}

/// Read an asset from a path, a `file://` URL or an `http(s)://` URL
pub fn fetch_bytes(source: &str) -> Result<Vec<u8>, AssetError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = ureq::get(source)
            .timeout(HTTP_TIMEOUT)
            .call()
            .map_err(|e| AssetError::Http {
                url: source.to_string(),
                message: e.to_string(),
            })?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ASSET_SIZE)
            .read_to_end(&mut bytes)
            .map_err(|source_err| AssetError::Io {
                path: source.to_string(),
                source: source_err,
            })?;
        return Ok(bytes);
    }

    let path = match source.strip_prefix("file://") {
        Some(rest) => urlencoding::decode(rest)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| rest.to_string()),
        None => source.to_string(),
    };

    std::fs::read(Path::new(&path)).map_err(|e| AssetError::Io { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_settled<T: Send + 'static>(loader: &mut AssetLoader<T>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while loader.poll().is_pending() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn successful_load_settles_to_loaded() {
        let mut loader = AssetLoader::spawn("answer", || Ok(42u32));
        wait_settled(&mut loader);
        assert_eq!(loader.state().get(), Some(&42));
    }

    #[test]
    fn failed_load_settles_to_unavailable() {
        let mut loader: AssetLoader<u32> =
            AssetLoader::spawn("missing", || fetch_bytes("/definitely/not/here.json").map(|_| 0));
        wait_settled(&mut loader);
        assert!(matches!(loader.state(), Asset::Unavailable));
    }

    #[test]
    fn poll_does_not_block_while_pending() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let mut loader = AssetLoader::spawn("slow", move || {
            let _ = gate_rx.recv();
            Ok("done")
        });
        assert!(loader.poll().is_pending());
        gate_tx.send(()).unwrap();
        wait_settled(&mut loader);
        assert_eq!(loader.state().get(), Some(&"done"));
    }

    #[test]
    fn panicking_loader_is_unavailable() {
        let mut loader: AssetLoader<u8> = AssetLoader::spawn("boom", || panic!("loader failed"));
        wait_settled(&mut loader);
        assert!(matches!(loader.state(), Asset::Unavailable));
    }

    #[test]
    fn fetch_reads_plain_and_file_url_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.bin");
        std::fs::write(&path, b"abc").unwrap();

        let plain = fetch_bytes(path.to_str().unwrap()).unwrap();
        assert_eq!(plain, b"abc");

        let url = format!("file://{}", path.display());
        assert_eq!(fetch_bytes(&url).unwrap(), b"abc");
    }

    #[test]
    fn fetch_missing_file_is_io_error() {
        let err = fetch_bytes("no/such/file.json").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
