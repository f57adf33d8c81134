use std::cell::Cell;
use std::rc::Rc;

use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;

use super::error::LoadError;
use super::model::{ModelAsset, TextureImage};

/// Byte counts seen so far while loading a model.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    pub resource: String,
    pub loaded: u64,
    /// Bytes expected from every resource known at this point.
    pub total: Option<u64>,
}

impl LoadProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some((self.loaded as f64 / total as f64 * 100.0).min(100.0)),
        }
    }
}

#[derive(Default)]
struct ProgressTracker {
    loaded: u64,
    expected: u64,
}

impl ProgressTracker {
    fn expect(&mut self, bytes: u64) {
        self.expected += bytes;
    }

    fn received(&mut self, resource: &str, bytes: u64) -> LoadProgress {
        self.loaded += bytes;
        LoadProgress {
            resource: resource.to_owned(),
            loaded: self.loaded,
            total: Some(self.expected.max(self.loaded)),
        }
    }
}

/// Resolve a URI from inside a glTF document against the document's own path.
pub fn resolve_uri(base: &str, uri: &str) -> String {
    if uri.starts_with("data:") || uri.contains("://") || uri.starts_with('/') {
        return uri.to_owned();
    }
    match base.rfind('/') {
        Some(i) => format!("{}{}", &base[..=i], uri),
        None => uri.to_owned(),
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_err = |source| LoadError::Fetch {
        url: url.to_owned(),
        source,
    };

    let response = Request::get(url).send().await.map_err(fetch_err)?;
    if !response.ok() {
        return Err(LoadError::HttpStatus {
            url: url.to_owned(),
            status: response.status(),
        });
    }
    response.binary().await.map_err(fetch_err)
}

/// Fetch a `.gltf`/`.glb` and everything it references, then flatten it.
///
/// Buffers and images referenced by URI are fetched relative to `path`
/// (`data:` URIs go through fetch as well). Images that fail to decode are
/// logged and left out; anything else that fails aborts the load.
pub async fn load_model<F>(path: &str, mut on_progress: F) -> Result<ModelAsset, LoadError>
where
    F: FnMut(LoadProgress),
{
    let mut progress = ProgressTracker::default();

    let raw = fetch_bytes(path).await?;
    progress.expect(raw.len() as u64);
    on_progress(progress.received(path, raw.len() as u64));

    let gltf::Gltf { document, mut blob } = gltf::Gltf::from_slice(&raw)?;

    let external: u64 = document
        .buffers()
        .filter(|b| matches!(b.source(), gltf::buffer::Source::Uri(_)))
        .map(|b| b.length() as u64)
        .sum();
    progress.expect(external);

    let mut buffers = Vec::with_capacity(document.buffers().len());
    for buffer in document.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.take().ok_or(LoadError::MissingBuffer(buffer.index()))?,
            gltf::buffer::Source::Uri(uri) => {
                let url = resolve_uri(path, uri);
                let bytes = fetch_bytes(&url).await?;
                on_progress(progress.received(&url, bytes.len() as u64));
                bytes
            }
        };

        if data.len() < buffer.length() {
            return Err(LoadError::ShortBuffer {
                index: buffer.index(),
                expected: buffer.length(),
                actual: data.len(),
            });
        }
        buffers.push(data);
    }

    let mut images = Vec::with_capacity(document.images().len());
    for image in document.images() {
        let bytes = match image.source() {
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                buffers
                    .get(view.buffer().index())
                    .and_then(|b| b.get(start..end))
                    .ok_or(LoadError::MissingBuffer(view.buffer().index()))?
                    .to_vec()
            }
            gltf::image::Source::Uri { uri, .. } => {
                let url = resolve_uri(path, uri);
                let bytes = fetch_bytes(&url).await?;
                progress.expect(bytes.len() as u64);
                on_progress(progress.received(&url, bytes.len() as u64));
                bytes
            }
        };

        match TextureImage::decode(image.index(), &bytes) {
            Ok(img) => images.push(Some(img)),
            Err(e) => {
                log::warn!("{e}; rendering without it");
                images.push(None);
            }
        }
    }

    ModelAsset::from_document(&document, &buffers, images)
}

pub enum LoadEvent {
    Progress(LoadProgress),
    Loaded(ModelAsset),
    Failed(LoadError),
}

/// A model load running on the local executor.
///
/// Events arrive in order: any number of `Progress`, then exactly one of
/// `Loaded` or `Failed`. After [`ModelLoad::cancel`] nothing more is delivered.
pub struct ModelLoad {
    cancelled: Rc<Cell<bool>>,
}

impl ModelLoad {
    pub fn spawn<F>(path: impl Into<String>, mut on_event: F) -> Self
    where
        F: FnMut(LoadEvent) + 'static,
    {
        let path = path.into();
        let cancelled = Rc::new(Cell::new(false));
        let flag = cancelled.clone();

        spawn_local(async move {
            log::info!("loading model from {path}");

            let result = load_model(&path, |p| {
                if !flag.get() {
                    on_event(LoadEvent::Progress(p));
                }
            })
            .await;

            if flag.get() {
                log::debug!("load of {path} cancelled, dropping result");
                return;
            }

            on_event(match result {
                Ok(model) => LoadEvent::Loaded(model),
                Err(e) => LoadEvent::Failed(e),
            });
        });

        Self { cancelled }
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }
}
