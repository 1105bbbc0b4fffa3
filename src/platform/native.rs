//! Timer-thread tick source for native hosts
//!
//! The wheel is shared as `Arc<Mutex<Wheel>>`. Each tick holds the lock for
//! the full step plus observer notification, so mutators on other threads
//! never interleave with a tick.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::animation::{IntervalHandle, WheelObserver, step};
use crate::sim::Wheel;

/// A running ticker thread. Cancelling (or dropping) joins the thread, so
/// release the wheel lock first.
pub struct ThreadInterval {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl ThreadInterval {
    /// Tick `wheel` every `period` on a dedicated thread
    pub fn start<O>(period: Duration, wheel: Arc<Mutex<Wheel>>, mut observer: O) -> io::Result<Self>
    where
        O: WheelObserver + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name("wheel-ticker".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            let mut wheel = wheel.lock().unwrap_or_else(PoisonError::into_inner);
                            step(&mut wheel, &mut observer);
                        }
                        // Stop requested, or the handle went away
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("Ticker thread exiting");
            })?;

        Ok(Self {
            stop_tx,
            thread: Some(thread),
        })
    }

    fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        // The thread may already be gone; join either way
        let _ = self.stop_tx.send(());
        if thread.join().is_err() {
            log::error!("Ticker thread panicked");
        }
    }
}

impl IntervalHandle for ThreadInterval {
    /// Blocks until the ticker thread exits. The thread locks the shared
    /// wheel for each tick, so cancelling while holding that lock deadlocks.
    fn cancel(mut self) {
        self.shutdown();
    }
}

impl Drop for ThreadInterval {
    fn drop(&mut self) {
        self.shutdown();
    }
}
