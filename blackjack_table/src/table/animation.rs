//! Serialised card-reveal playback.
//!
//! The table hands a batch of [`AnimationEvent`]s to [`AnimationQueue::play`].
//! Each event goes to the renderer as a [`PendingReveal`] and the queue waits
//! for the renderer to call [`PendingReveal::complete`] before sending the
//! next one, so at most one reveal is ever in progress.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::reveal::AnimationEvent;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimationError {
    /// The renderer dropped the feed or a reveal without completing it
    #[error("Renderer closed before the reveal completed")]
    RendererClosed,
}

/// Result type for animation playback
pub type AnimationResult<T> = Result<T, AnimationError>;

/// A reveal waiting for the renderer to finish animating it.
#[derive(Debug)]
pub struct PendingReveal {
    pub event: AnimationEvent,
    completion: oneshot::Sender<()>,
}

impl PendingReveal {
    /// Marks the reveal as finished. A reveal whose playback was abandoned
    /// completes silently.
    pub fn complete(self) {
        let _ = self.completion.send(());
    }
}

/// Producer side, owned by the table.
pub struct AnimationQueue {
    sender: mpsc::Sender<PendingReveal>,
    played: u64,
}

/// Consumer side, owned by the renderer.
pub struct AnimationFeed {
    receiver: mpsc::Receiver<PendingReveal>,
}

impl AnimationQueue {
    pub fn new(capacity: usize) -> (Self, AnimationFeed) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, played: 0 }, AnimationFeed { receiver })
    }

    /// Plays `events` in order, one at a time.
    ///
    /// Dropping the returned future abandons the reveal in progress.
    pub async fn play(&mut self, events: Vec<AnimationEvent>) -> AnimationResult<()> {
        for event in events {
            let (completion, done) = oneshot::channel();
            self.sender
                .send(PendingReveal { event, completion })
                .await
                .map_err(|_| AnimationError::RendererClosed)?;
            done.await.map_err(|_| AnimationError::RendererClosed)?;
            self.played += 1;
        }
        Ok(())
    }

    /// Reveals completed since the queue was created.
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AnimationFeed {
    /// Waits for the next reveal. `None` once the table is gone.
    pub async fn next_reveal(&mut self) -> Option<PendingReveal> {
        self.receiver.recv().await
    }

    /// The next reveal if one is already waiting.
    pub fn try_next_reveal(&mut self) -> Option<PendingReveal> {
        self.receiver.try_recv().ok()
    }
}
