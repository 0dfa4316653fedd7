//! Cancellation scope shared by one listing run.
//!
//! A [`CancelScope`] owns the signal; every traversal task holds a cheap
//! [`CancelToken`] clone and races its work against [`CancelToken::cancelled`].
//! Dropping the scope counts as cancellation, so a run that returns early
//! never leaves a traversal task running.

use tokio::sync::watch;

/// Owner side of the cancellation signal.
#[derive(Debug)]
pub struct CancelScope {
    sender: watch::Sender<bool>,
}

/// Observer side of the cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: watch::Receiver<bool>,
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelScope {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: self.sender.subscribe(),
        }
    }

    /// Trigger cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Resolve once the scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }
}
