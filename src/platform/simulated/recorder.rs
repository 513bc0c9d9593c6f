//! Timer-driven record device.
//!
//! While recording, one frame record is appended per frame interval. With a
//! time slice the pending frames are handed over as a chunk every slice;
//! `stop` hands over whatever is left, then signals the stop from a separate
//! task.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::errors::PlatformError;
use crate::media::{Blob, MediaStream};
use crate::platform::{DataHandler, RecordDevice, StopHandler};
use crate::recorder::{RecordOptions, RecorderState};

pub const DEFAULT_MIME_TYPE: &str = "video/webm";
const FALLBACK_FRAME_RATE: u32 = 30;

type SharedDataHandler = Arc<dyn Fn(Blob) + Send + Sync>;
type SharedStopHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Session {
    state: RecorderState,
    pending: Vec<u8>,
    frames: u64,
    since_flush: Duration,
    time_slice: Option<Duration>,
    ticker: Option<JoinHandle<()>>,
}

struct Shared {
    stream: MediaStream,
    mime_type: String,
    frame_interval: Duration,
    session: Mutex<Session>,
    // Held while handing data to listeners so chunks and the stop signal
    // arrive in order.
    delivery: Mutex<()>,
    data_handlers: Mutex<Vec<SharedDataHandler>>,
    stop_handlers: Mutex<Vec<SharedStopHandler>>,
}

impl Shared {
    fn capture_frame(&self) -> Option<Blob> {
        let mut session = self.session.lock();
        if session.state != RecorderState::Recording {
            return None;
        }

        let frame = frame_record(session.frames, &self.stream);
        session.pending.extend_from_slice(&frame);
        session.frames += 1;
        session.since_flush += self.frame_interval;

        let slice = session.time_slice?;
        if session.since_flush < slice {
            return None;
        }

        session.since_flush = Duration::ZERO;
        let data = std::mem::take(&mut session.pending);
        Some(Blob::new(data, self.mime_type.clone()))
    }

    fn deliver_data(&self, blob: Blob) {
        trace!("Delivering chunk of {} bytes", blob.size());
        let handlers = self.data_handlers.lock().clone();
        for handler in handlers {
            handler(blob.clone());
        }
    }

    fn deliver_stop(&self) {
        let handlers = self.stop_handlers.lock().clone();
        for handler in handlers {
            handler();
        }
    }
}

fn frame_record(index: u64, stream: &MediaStream) -> Vec<u8> {
    let video = if stream.video_tracks().iter().any(|t| t.is_producing()) {
        "picture"
    } else {
        "black"
    };
    let audio = stream
        .audio_tracks()
        .iter()
        .filter(|t| t.is_producing())
        .count();
    format!("frame {index} {video} audio={audio}\n").into_bytes()
}

async fn run_ticker(shared: Weak<Shared>, frame_interval: Duration) {
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        frames.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };

        let _delivery = shared.delivery.lock();
        if let Some(chunk) = shared.capture_frame() {
            shared.deliver_data(chunk);
        }
    }
}

/// Record device backed by tokio timers. Needs a running tokio runtime to
/// start.
pub struct SimulatedRecorder {
    shared: Arc<Shared>,
}

impl SimulatedRecorder {
    pub fn new(stream: MediaStream, options: &RecordOptions) -> Result<Self, PlatformError> {
        let mime_type = match options.get("mimeType") {
            None => DEFAULT_MIME_TYPE.to_string(),
            Some(value) => value
                .as_str()
                .filter(|mime| mime.starts_with("video/"))
                .map(str::to_string)
                .ok_or_else(|| PlatformError::NotSupported(format!("mimeType {value}")))?,
        };

        let frame_rate = stream
            .video_tracks()
            .first()
            .and_then(|t| t.settings().frame_rate)
            .filter(|rate| *rate > 0)
            .unwrap_or(FALLBACK_FRAME_RATE);

        Ok(Self {
            shared: Arc::new(Shared {
                stream,
                mime_type,
                frame_interval: Duration::from_secs(1) / frame_rate,
                session: Mutex::new(Session::default()),
                delivery: Mutex::new(()),
                data_handlers: Mutex::new(Vec::new()),
                stop_handlers: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Frames captured during the current or last session.
    pub fn frames(&self) -> u64 {
        self.shared.session.lock().frames
    }

    fn expect_state(&self, expected: RecorderState, action: &str) -> Result<(), PlatformError> {
        let state = self.shared.session.lock().state;
        if state != expected {
            return Err(PlatformError::InvalidState(format!(
                "{action} called while {state}"
            )));
        }
        Ok(())
    }
}

impl RecordDevice for SimulatedRecorder {
    fn state(&self) -> RecorderState {
        self.shared.session.lock().state
    }

    fn stream(&self) -> MediaStream {
        self.shared.stream.clone()
    }

    fn mime_type(&self) -> String {
        self.shared.mime_type.clone()
    }

    fn start(&self, time_slice_ms: Option<u32>) -> Result<(), PlatformError> {
        let runtime = Handle::try_current().map_err(|_| {
            PlatformError::NotSupported("recording without a tokio runtime".to_string())
        })?;

        let mut session = self.shared.session.lock();
        if session.state != RecorderState::Idle {
            return Err(PlatformError::InvalidState(format!(
                "start called while {}",
                session.state
            )));
        }

        session.state = RecorderState::Recording;
        session.pending.clear();
        session.frames = 0;
        session.since_flush = Duration::ZERO;
        session.time_slice = time_slice_ms.map(|ms| Duration::from_millis(u64::from(ms)));
        session.ticker = Some(runtime.spawn(run_ticker(
            Arc::downgrade(&self.shared),
            self.shared.frame_interval,
        )));

        debug!(
            "Simulated recorder started at {:?} per frame",
            self.shared.frame_interval
        );
        Ok(())
    }

    fn stop(&self) -> Result<(), PlatformError> {
        let remaining = {
            let mut session = self.shared.session.lock();
            if session.state == RecorderState::Idle {
                return Err(PlatformError::InvalidState(
                    "stop called while idle".to_string(),
                ));
            }

            session.state = RecorderState::Idle;
            if let Some(ticker) = session.ticker.take() {
                ticker.abort();
            }
            debug!("Simulated recorder stopped after {} frame(s)", session.frames);
            Blob::new(
                std::mem::take(&mut session.pending),
                self.shared.mime_type.clone(),
            )
        };

        let shared = Arc::clone(&self.shared);
        let finish = move || {
            let _delivery = shared.delivery.lock();
            shared.deliver_data(remaining);
            shared.deliver_stop();
        };

        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move { finish() });
            }
            Err(_) => finish(),
        }

        Ok(())
    }

    fn pause(&self) -> Result<(), PlatformError> {
        self.expect_state(RecorderState::Recording, "pause")?;
        self.shared.session.lock().state = RecorderState::Paused;
        Ok(())
    }

    fn resume(&self) -> Result<(), PlatformError> {
        self.expect_state(RecorderState::Paused, "resume")?;
        self.shared.session.lock().state = RecorderState::Recording;
        Ok(())
    }

    fn on_data_available(&self, handler: DataHandler) {
        self.shared.data_handlers.lock().push(Arc::from(handler));
    }

    fn on_stop(&self, handler: StopHandler) {
        self.shared.stop_handlers.lock().push(Arc::from(handler));
    }
}

impl Drop for SimulatedRecorder {
    fn drop(&mut self) {
        if let Some(ticker) = self.shared.session.lock().ticker.take() {
            ticker.abort();
        }
    }
}
