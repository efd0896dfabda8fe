use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

enum DebounceSignal {
    Schedule(Duration),
    Cancel,
    Shutdown,
}

/// Single resettable timer on a dedicated thread.
///
/// Scheduling while a timer is pending replaces its deadline, so a burst of
/// calls spaced closer than the delay fires `on_fire` once, one delay after
/// the last call.
pub struct Debouncer {
    signals: Sender<DebounceSignal>,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new<F>(on_fire: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (signals, receiver) = unbounded();

        let timer = thread::spawn(move || {
            Self::timer_loop(&receiver, on_fire);
        });

        Self {
            signals,
            timer: Some(timer),
        }
    }

    pub fn schedule(&self, delay: Duration) {
        let _ = self.signals.send(DebounceSignal::Schedule(delay));
    }

    /// Drops the pending timer, if any.
    pub fn cancel(&self) {
        let _ = self.signals.send(DebounceSignal::Cancel);
    }

    pub fn shutdown(&mut self) {
        let _ = self.signals.send(DebounceSignal::Shutdown);

        if let Some(handle) = self.timer.take() {
            let _ = handle.join();
        }
    }

    fn timer_loop<F: Fn()>(receiver: &Receiver<DebounceSignal>, on_fire: F) {
        let mut deadline: Option<Instant> = None;

        loop {
            let signal = match deadline {
                None => match receiver.recv() {
                    Ok(signal) => signal,
                    Err(_) => return,
                },
                Some(at) => match receiver.recv_deadline(at) {
                    Ok(signal) => signal,
                    Err(RecvTimeoutError::Timeout) => {
                        deadline = None;
                        on_fire();
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => return,
                },
            };

            match signal {
                DebounceSignal::Schedule(delay) => deadline = Some(Instant::now() + delay),
                DebounceSignal::Cancel => deadline = None,
                DebounceSignal::Shutdown => return,
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
