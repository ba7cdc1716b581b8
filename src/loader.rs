//! Running lookups off the caller's thread.
//!
//! A UI spawns the load, keeps drawing, and polls `try_take` once per frame.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::error;

pub struct PendingLoad<T> {
    receiver: Receiver<T>,
    handle: Option<JoinHandle<()>>,
}

pub fn spawn_load<T, F>(load: F) -> PendingLoad<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let _ = tx.send(load());
    });
    PendingLoad {
        receiver: rx,
        handle: Some(handle),
    }
}

/// Poll result of a [`PendingLoad`].
#[derive(Debug, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    /// The loading thread died without producing a value.
    Failed,
}

impl<T> PendingLoad<T> {
    pub fn try_take(&mut self) -> LoadState<T> {
        match self.receiver.try_recv() {
            Ok(value) => {
                self.reap();
                LoadState::Ready(value)
            }
            Err(TryRecvError::Empty) => LoadState::Loading,
            Err(TryRecvError::Disconnected) => {
                self.reap();
                LoadState::Failed
            }
        }
    }

    /// Block until the load finishes. `None` if the loading thread panicked.
    pub fn wait(mut self) -> Option<T> {
        let value = self.receiver.recv().ok();
        self.reap();
        value
    }

    fn reap(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("background load panicked");
            }
        }
    }
}
