//! Queued asset loading
//!
//! Requests are queued by [`Loader::image`] and [`Loader::atlas`] and only
//! processed once [`Loader::start`] has been called, one batch per
//! [`Loader::update`]. Each request hands back a [`LoadHandle`], a
//! single-threaded future that resolves when the loader processes it.
//!
//! A failure nobody reads is parked in the loader's unhandled queue for the
//! host to report (see [`Loader::take_unhandled`]). That covers a handle
//! dropped before the request was processed as well as one dropped later
//! with its error still unread. Cancellations are never reported.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use super::source::{AssetSource, FileSource};
use super::{atlas, AssetError, TextureManager};

/// Outcome of a successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// Texture key the file was registered under
    pub key: String,
    /// Resolved path of the image
    pub url: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of atlas frames (0 for plain images)
    pub frames: usize,
}

#[derive(Default)]
struct Slot {
    result: Option<Result<LoadedFile, AssetError>>,
    waker: Option<Waker>,
    cancelled: bool,
}

type SharedSlot = Rc<RefCell<Slot>>;
type Unhandled = Rc<RefCell<Vec<AssetError>>>;

fn report_unhandled(unhandled: &Unhandled, error: AssetError) {
    if !matches!(error, AssetError::Cancelled(_)) {
        unhandled.borrow_mut().push(error);
    }
}

/// Pending result of a load request.
///
/// Polling as a [`Future`] or calling [`try_result`](Self::try_result) takes
/// the result out; it is yielded once. Dropping the handle with an error
/// still unread hands that error to the loader's unhandled queue.
pub struct LoadHandle {
    key: String,
    slot: SharedSlot,
    unhandled: Unhandled,
}

impl LoadHandle {
    /// Key the request registers its texture under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the loader has resolved this request
    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().result.is_some()
    }

    /// Take the result if it has arrived, without blocking
    pub fn try_result(&self) -> Option<Result<LoadedFile, AssetError>> {
        self.slot.borrow_mut().result.take()
    }

    /// Ask the loader to drop this request. The handle then resolves with
    /// [`AssetError::Cancelled`] and no texture is registered. Has no effect
    /// once the request has been processed.
    pub fn cancel(&self) {
        self.slot.borrow_mut().cancelled = true;
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        if let Some(Err(error)) = self.slot.borrow_mut().result.take() {
            log::debug!("Load handle '{}' dropped with an unread error", self.key);
            report_unhandled(&self.unhandled, error);
        }
    }
}

impl fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHandle")
            .field("key", &self.key)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl Future for LoadHandle {
    type Output = Result<LoadedFile, AssetError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[derive(Debug, Clone)]
enum RequestKind {
    Image { url: String },
    Atlas { image_url: String, json_url: String },
}

struct Request {
    key: String,
    kind: RequestKind,
    slot: SharedSlot,
}

/// Queue of image and atlas requests
pub struct Loader {
    source: Box<dyn AssetSource>,
    base_path: String,
    queue: VecDeque<Request>,
    started: bool,
    unhandled: Unhandled,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(FileSource)
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("base_path", &self.base_path)
            .field("pending", &self.queue.len())
            .field("started", &self.started)
            .field("unhandled", &self.unhandled.borrow().len())
            .finish()
    }
}

impl Loader {
    /// Create a loader reading from `source`
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            base_path: String::new(),
            queue: VecDeque::new(),
            started: false,
            unhandled: Unhandled::default(),
        }
    }

    /// Prefix applied to relative urls of requests queued afterwards
    pub fn set_path(&mut self, base: impl Into<String>) {
        self.base_path = base.into();
    }

    /// Current path prefix
    pub fn path(&self) -> &str {
        &self.base_path
    }

    /// Queue an image load registered as texture `key`
    pub fn image(&mut self, key: impl Into<String>, url: &str) -> LoadHandle {
        let url = self.resolve(url);
        self.enqueue(key.into(), RequestKind::Image { url })
    }

    /// Queue an atlas load: an image plus a JSON frame description
    pub fn atlas(&mut self, key: impl Into<String>, image_url: &str, json_url: &str) -> LoadHandle {
        let kind = RequestKind::Atlas {
            image_url: self.resolve(image_url),
            json_url: self.resolve(json_url),
        };
        self.enqueue(key.into(), kind)
    }

    /// Begin processing queued requests on subsequent updates
    pub fn start(&mut self) {
        if !self.started {
            log::debug!("Loader started with {} queued request(s)", self.queue.len());
        }
        self.started = true;
    }

    /// Whether [`start`](Self::start) has been called since the queue last
    /// drained
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of queued requests not yet processed
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether no requests are waiting
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Process every queued request, registering results in `textures`.
    ///
    /// Does nothing until started. Once the queue drains the loader stops
    /// again, so requests queued later need another [`start`](Self::start).
    /// Returns the number of requests resolved.
    pub fn update(&mut self, textures: &mut TextureManager) -> usize {
        if !self.started {
            return 0;
        }

        let mut resolved = 0;
        while let Some(request) = self.queue.pop_front() {
            let cancelled = request.slot.borrow().cancelled;
            let result = if cancelled {
                Err(AssetError::Cancelled(request.key.clone()))
            } else {
                self.process(&request, textures)
            };

            if let Err(e) = &result {
                log::warn!("Failed to load '{}': {}", request.key, e);
            }
            Self::resolve_slot(&request, result, &self.unhandled);
            resolved += 1;
        }

        self.started = false;
        resolved
    }

    /// Drain failures nobody was listening for
    pub fn take_unhandled(&mut self) -> Vec<AssetError> {
        std::mem::take(&mut *self.unhandled.borrow_mut())
    }

    fn enqueue(&mut self, key: String, kind: RequestKind) -> LoadHandle {
        log::trace!("Queued {:?} as '{}'", kind, key);
        let slot = SharedSlot::default();
        self.queue.push_back(Request {
            key: key.clone(),
            kind,
            slot: Rc::clone(&slot),
        });
        LoadHandle {
            key,
            slot,
            unhandled: Rc::clone(&self.unhandled),
        }
    }

    fn resolve(&self, url: &str) -> String {
        let absolute = url.starts_with('/') || url.contains("://");
        if self.base_path.is_empty() || absolute {
            url.to_string()
        } else {
            format!("{}/{}", self.base_path.trim_end_matches('/'), url)
        }
    }

    fn process(
        &self,
        request: &Request,
        textures: &mut TextureManager,
    ) -> Result<LoadedFile, AssetError> {
        if textures.exists(&request.key) {
            return Err(AssetError::DuplicateKey(request.key.clone()));
        }

        match &request.kind {
            RequestKind::Image { url } => {
                let (width, height, pixels) = self.decode_image(url)?;
                textures.add_image(request.key.clone(), width, height, pixels)?;
                Ok(LoadedFile {
                    key: request.key.clone(),
                    url: url.clone(),
                    width,
                    height,
                    frames: 0,
                })
            }
            RequestKind::Atlas {
                image_url,
                json_url,
            } => {
                let frames = atlas::parse_frames(&self.source.read(json_url)?)?;
                let (width, height, pixels) = self.decode_image(image_url)?;
                let frame_count = frames.len();
                textures.add_atlas(request.key.clone(), width, height, pixels, frames)?;
                Ok(LoadedFile {
                    key: request.key.clone(),
                    url: image_url.clone(),
                    width,
                    height,
                    frames: frame_count,
                })
            }
        }
    }

    fn decode_image(&self, url: &str) -> Result<(u32, u32, Vec<u8>), AssetError> {
        let bytes = self.source.read(url)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::Decode(format!("'{}': {}", url, e)))?;

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("Decoded image {}x{} from '{}'", width, height, url);
        Ok((width, height, rgba.into_raw()))
    }

    fn resolve_slot(
        request: &Request,
        result: Result<LoadedFile, AssetError>,
        unhandled: &Unhandled,
    ) {
        // The loader's own reference is the only one left once the handle is gone.
        let orphaned = Rc::strong_count(&request.slot) == 1;
        if orphaned {
            if let Err(e) = result {
                report_unhandled(unhandled, e);
            }
            return;
        }

        let mut slot = request.slot.borrow_mut();
        slot.result = Some(result);
        if let Some(waker) = slot.waker.take() {
            waker.wake();
        }
    }
}
