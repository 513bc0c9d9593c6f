use tokio::sync::watch;

use super::movie::Movie;
use crate::errors::RecorderError;

pub(crate) type CompletionValue = Option<Result<Movie, RecorderError>>;

/// Resolves once with the movie of one recording session.
///
/// Cloning yields another handle on the same session. There is no way to
/// cancel it; it resolves when the device stops, or with
/// [`RecorderError::Abandoned`] if the recorder goes away first.
#[derive(Clone, Debug)]
pub struct Completion {
    rx: watch::Receiver<CompletionValue>,
}

impl Completion {
    pub(crate) fn channel() -> (watch::Sender<CompletionValue>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self { rx })
    }

    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub async fn wait(mut self) -> Result<Movie, RecorderError> {
        let value = self
            .rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| RecorderError::Abandoned)?
            .clone();

        value.unwrap_or(Err(RecorderError::Abandoned))
    }
}
