#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use crate::assets::fragment::SceneFragment;
use crate::assets::loaders::GltfLoader;
use crate::errors::{KeyportalError, Result};

#[cfg(not(target_arch = "wasm32"))]
use tokio::runtime::Runtime;

/// Outcome of one [`AssetServer::request`], delivered on the main thread by
/// [`AssetServer::poll`].
#[derive(Debug)]
pub enum AssetEvent<T> {
    Loaded { tag: T, fragment: SceneFragment },
    Failed { tag: T, error: KeyportalError },
}

impl<T> AssetEvent<T> {
    #[must_use]
    pub fn tag(&self) -> &T {
        match self {
            AssetEvent::Loaded { tag, .. } | AssetEvent::Failed { tag, .. } => tag,
        }
    }
}

/// Asynchronous model loader.
///
/// Reading and decoding happen off the main thread (a tokio runtime on
/// native, the browser event loop on wasm). Results travel back through a
/// channel and only touch the scene when the owner calls [`poll`](Self::poll),
/// so completions are serialized with input and frame updates no matter in
/// which order they finish.
///
/// `T` tags each request so the owner knows what the fragment is for.
pub struct AssetServer<T> {
    root: String,
    sender: flume::Sender<AssetEvent<T>>,
    receiver: flume::Receiver<AssetEvent<T>>,
    in_flight: usize,

    #[cfg(not(target_arch = "wasm32"))]
    runtime: Arc<Runtime>,
}

impl<T: Send + 'static> AssetServer<T> {
    /// `root` is a directory (native) or a base URL (wasm) that request
    /// paths are resolved against.
    pub fn new(root: impl Into<String>) -> Result<Self> {
        let (sender, receiver) = flume::unbounded();
        Ok(Self {
            root: root.into(),
            sender,
            receiver,
            in_flight: 0,
            #[cfg(not(target_arch = "wasm32"))]
            runtime: Arc::new(
                tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(2)
                    .thread_name("keyportal-assets")
                    .build()?,
            ),
        })
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of requests whose completion has not been polled yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn resolve(&self, path: &str) -> String {
        if self.root.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::path::Path::new(&self.root).join(path).to_string_lossy().into_owned()
        }
        #[cfg(target_arch = "wasm32")]
        {
            format!("{}/{}", self.root.trim_end_matches('/'), path.trim_start_matches('/'))
        }
    }

    /// Starts loading the `.glb` at `path`. The result arrives later through
    /// [`poll`](Self::poll) tagged with `tag`.
    pub fn request(&mut self, tag: T, path: &str) {
        let location = self.resolve(path);
        let name = file_stem(path).to_string();
        let sender = self.sender.clone();
        self.in_flight += 1;

        log::info!("Loading model '{location}'");

        #[cfg(not(target_arch = "wasm32"))]
        self.runtime.spawn(async move {
            let result = load_native(location, name).await;
            // The receiver only disappears when the server is dropped.
            let _ = sender.send(into_event(tag, result));
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = load_web(location, name).await;
            let _ = sender.send(into_event(tag, result));
        });
    }

    /// Drains every completion that arrived since the last call.
    pub fn poll(&mut self) -> Vec<AssetEvent<T>> {
        let events: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(events.len());
        events
    }

    /// Blocks until the next completion or until `timeout` elapses.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn poll_blocking(&mut self, timeout: std::time::Duration) -> Option<AssetEvent<T>> {
        let event = self.receiver.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event)
    }
}

fn into_event<T>(tag: T, result: Result<SceneFragment>) -> AssetEvent<T> {
    match result {
        Ok(fragment) => AssetEvent::Loaded { tag, fragment },
        Err(error) => AssetEvent::Failed { tag, error },
    }
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file.split('.').next().filter(|s| !s.is_empty()).unwrap_or(file)
}

#[cfg(not(target_arch = "wasm32"))]
async fn load_native(location: String, name: String) -> Result<SceneFragment> {
    let bytes = tokio::fs::read(&location).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            KeyportalError::AssetNotFound(location.clone())
        } else {
            KeyportalError::IoError(err)
        }
    })?;
    tokio::task::spawn_blocking(move || GltfLoader::load_glb(&name, &bytes)).await?
}

#[cfg(target_arch = "wasm32")]
async fn load_web(location: String, name: String) -> Result<SceneFragment> {
    let request = ehttp::Request::get(&location);
    let response = ehttp::fetch_async(request)
        .await
        .map_err(KeyportalError::HttpError)?;
    if !response.ok {
        return Err(KeyportalError::HttpResponseError {
            status: response.status,
        });
    }
    GltfLoader::load_glb(&name, &response.bytes)
}

#[cfg(test)]
mod tests {
    use super::file_stem;

    #[test]
    fn stems() {
        assert_eq!(file_stem("models/key_enter.glb"), "key_enter");
        assert_eq!(file_stem("https://host/a/message.glb"), "message");
        assert_eq!(file_stem("plain"), "plain");
    }
}
