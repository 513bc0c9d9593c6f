//! In-process platform: synthetic canvas, timer-driven recorder, scripted
//! media devices, an optional mixing graph, an object-URL registry and
//! downloads written to a directory.

pub mod canvas;
pub mod devices;
pub mod mixer;
pub mod recorder;

pub use canvas::SyntheticCanvas;
pub use devices::{SimulatedMediaDevices, SourceBehavior};
pub use mixer::SimulatedAudioGraph;
pub use recorder::{SimulatedRecorder, DEFAULT_MIME_TYPE};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::PlatformError;
use crate::media::{Blob, MediaStream, MediaTrack};
use crate::platform::{AudioGraph, MediaDevices, Platform, RecordDevice};
use crate::recorder::RecordOptions;

pub const DEFAULT_HOST_NAME: &str = "localhost";

pub struct SimulatedPlatform {
    host_name: String,
    download_dir: PathBuf,
    media_devices: Option<SimulatedMediaDevices>,
    mixing: bool,
    objects: Mutex<HashMap<String, Blob>>,
    downloads: Mutex<Vec<PathBuf>>,
    mixed_sources: Arc<Mutex<Vec<MediaTrack>>>,
}

impl SimulatedPlatform {
    pub fn builder() -> SimulatedPlatformBuilder {
        SimulatedPlatformBuilder::default()
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn simulated_media_devices(&self) -> Option<&SimulatedMediaDevices> {
        self.media_devices.as_ref()
    }

    /// Blob behind a live object reference.
    pub fn resolve_object_url(&self, url: &str) -> Option<Blob> {
        self.objects.lock().get(url).cloned()
    }

    pub fn live_object_urls(&self) -> usize {
        self.objects.lock().len()
    }

    /// Files written by [`Platform::download`], oldest first.
    pub fn downloads(&self) -> Vec<PathBuf> {
        self.downloads.lock().clone()
    }

    /// Every audio track fed into a mixing graph so far.
    pub fn mixed_sources(&self) -> Vec<MediaTrack> {
        self.mixed_sources.lock().clone()
    }
}

impl Platform for SimulatedPlatform {
    fn create_recorder(
        &self,
        stream: MediaStream,
        options: &RecordOptions,
    ) -> Result<Arc<dyn RecordDevice>, PlatformError> {
        Ok(Arc::new(SimulatedRecorder::new(stream, options)?))
    }

    fn media_devices(&self) -> Option<&dyn MediaDevices> {
        self.media_devices
            .as_ref()
            .map(|devices| devices as &dyn MediaDevices)
    }

    fn create_audio_graph(&self) -> Option<Box<dyn AudioGraph>> {
        if !self.mixing {
            return None;
        }
        Some(Box::new(SimulatedAudioGraph::new(Arc::clone(
            &self.mixed_sources,
        ))))
    }

    fn create_object_url(&self, blob: &Blob) -> String {
        let url = format!("blob:https://{}/{}", self.host_name, Uuid::new_v4());
        self.objects.lock().insert(url.clone(), blob.clone());
        url
    }

    fn revoke_object_url(&self, url: &str) {
        if self.objects.lock().remove(url).is_some() {
            debug!("Revoked {}", url);
        }
    }

    fn download(&self, url: &str, filename: &str) -> Result<(), PlatformError> {
        // Only a bare name; anything else could land outside the directory.
        if Path::new(filename).file_name() != Some(OsStr::new(filename)) {
            return Err(PlatformError::InvalidFileName(filename.to_string()));
        }

        let blob = self
            .resolve_object_url(url)
            .ok_or_else(|| PlatformError::UnknownObjectUrl(url.to_string()))?;

        std::fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(filename);
        std::fs::write(&path, blob.data())?;

        info!("Saved {} bytes to {:?}", blob.size(), path);
        self.downloads.lock().push(path);
        Ok(())
    }

    fn host_name(&self) -> String {
        self.host_name.clone()
    }
}

pub struct SimulatedPlatformBuilder {
    host_name: String,
    download_dir: Option<PathBuf>,
    media_devices: Option<SimulatedMediaDevices>,
    mixing: bool,
}

impl Default for SimulatedPlatformBuilder {
    fn default() -> Self {
        Self {
            host_name: DEFAULT_HOST_NAME.to_string(),
            download_dir: None,
            media_devices: Some(SimulatedMediaDevices::default()),
            mixing: true,
        }
    }
}

impl SimulatedPlatformBuilder {
    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn media_devices(mut self, devices: SimulatedMediaDevices) -> Self {
        self.media_devices = Some(devices);
        self
    }

    /// Platform without any user/display capture API.
    pub fn without_media_devices(mut self) -> Self {
        self.media_devices = None;
        self
    }

    pub fn mixing(mut self, available: bool) -> Self {
        self.mixing = available;
        self
    }

    pub fn build(self) -> SimulatedPlatform {
        let download_dir = self
            .download_dir
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir);

        SimulatedPlatform {
            host_name: self.host_name,
            download_dir,
            media_devices: self.media_devices,
            mixing: self.mixing,
            objects: Mutex::new(HashMap::new()),
            downloads: Mutex::new(Vec::new()),
            mixed_sources: Arc::new(Mutex::new(Vec::new())),
        }
    }
}
