//! Background thread that keeps a shared simulator advancing.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, warn};

use crate::handle::SimulatorHandle;

/// Polls [`SimulatorHandle::advance`] on a fixed interval until stopped.
///
/// The simulator's own cadences decide when a tick or sweep is due; the
/// poll interval only bounds how late one can fire. Dropping the driver
/// stops the thread and waits for it.
pub struct LiveDriver {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LiveDriver {
    pub fn spawn(handle: SimulatorHandle, poll: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::spawn(move || {
            debug!(poll_ms = poll.as_millis() as u64, "live driver started");
            while !flag.load(Ordering::Acquire) {
                if let Err(e) = handle.advance() {
                    warn!(error = %e, "live driver stopping: simulator unavailable");
                    break;
                }
                thread::sleep(poll);
            }
            debug!("live driver stopped");
        });
        Self {
            stop,
            thread: Some(thread),
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the thread to exit and wait for it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("live driver thread panicked");
            }
        }
    }
}

impl Drop for LiveDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
