//! Finished recording handed back to callers.

use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::RecorderError;
use crate::media::Blob;
use crate::platform::Platform;

pub const MOVIE_EXTENSION: &str = "webm";

/// Playable element pointing at a movie's object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoElement {
    pub src: String,
    pub controls: bool,
    pub mime_type: String,
}

struct MovieInner {
    platform: Arc<dyn Platform>,
    url: Mutex<Option<String>>,
    mime_type: String,
    size: usize,
}

impl Drop for MovieInner {
    fn drop(&mut self) {
        if let Some(url) = self.url.get_mut().take() {
            self.platform.revoke_object_url(&url);
        }
    }
}

/// Assembled recording. Clones share one object reference; once any clone
/// releases it, every accessor on every clone fails with
/// [`RecorderError::MovieDestroyed`].
#[derive(Clone)]
pub struct Movie {
    inner: Arc<MovieInner>,
}

impl Movie {
    pub(crate) fn new(platform: Arc<dyn Platform>, blob: &Blob) -> Self {
        let url = platform.create_object_url(blob);
        debug!(
            "Movie assembled: {} bytes of {} at {}",
            blob.size(),
            blob.mime_type(),
            url
        );

        Self {
            inner: Arc::new(MovieInner {
                platform,
                url: Mutex::new(Some(url)),
                mime_type: blob.mime_type().to_string(),
                size: blob.size(),
            }),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.inner.mime_type
    }

    pub fn size(&self) -> usize {
        self.inner.size
    }

    pub fn is_released(&self) -> bool {
        self.inner.url.lock().is_none()
    }

    /// Transient object reference of the movie.
    pub fn object_url(&self) -> Result<String, RecorderError> {
        self.inner
            .url
            .lock()
            .clone()
            .ok_or(RecorderError::MovieDestroyed)
    }

    pub fn create_video_element(&self) -> Result<VideoElement, RecorderError> {
        Ok(VideoElement {
            src: self.object_url()?,
            controls: true,
            mime_type: self.inner.mime_type.clone(),
        })
    }

    /// Downloads the movie as `{filename}.webm`, or under a name built from
    /// the host and the current local time. Returns the file name used.
    pub fn download(&self, filename: Option<&str>) -> Result<String, RecorderError> {
        let url = self.object_url()?;
        let filename = match filename {
            Some(name) => format!("{name}.{MOVIE_EXTENSION}"),
            None => default_file_name(&self.inner.platform.host_name(), Local::now()),
        };

        self.inner.platform.download(&url, &filename)?;
        info!("Movie downloaded as {}", filename);
        Ok(filename)
    }

    /// Revokes the object reference. Calling it again does nothing.
    pub fn release(&self) {
        let url = self.inner.url.lock().take();
        if let Some(url) = url {
            self.inner.platform.revoke_object_url(&url);
            debug!("Movie released: {}", url);
        }
    }
}

impl fmt::Debug for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Movie")
            .field("url", &*self.inner.url.lock())
            .field("mime_type", &self.inner.mime_type)
            .field("size", &self.inner.size)
            .finish()
    }
}

/// `{host}_{timestamp}.webm`, the timestamp being the en-US rendering of
/// `at` with slashes, colons and whitespace turned into dashes.
pub fn default_file_name<Tz>(host: &str, at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let stamp: String = at
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
        .chars()
        .map(|c| {
            if c == '/' || c == ':' || c.is_whitespace() {
                '-'
            } else {
                c
            }
        })
        .collect();

    format!("{host}_{stamp}.{MOVIE_EXTENSION}")
}
