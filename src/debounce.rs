use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

enum Signal<T> {
    Value(T),
    Cancel,
}

/// Trailing-edge debouncer. Every pushed value restarts the quiet window;
/// only the last value of a burst comes out the other end.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Signal<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the timer task on the current tokio runtime and returns the
    /// input handle with the settled-value receiver.
    pub fn spawn(wait: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, mut input) = mpsc::unbounded_channel::<Signal<T>>();
        let (settled_tx, settled) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(signal) = input.recv().await {
                let Signal::Value(mut latest) = signal else {
                    continue;
                };
                let mut cancelled = false;
                loop {
                    tokio::select! {
                        next = input.recv() => match next {
                            Some(Signal::Value(value)) => latest = value,
                            Some(Signal::Cancel) => {
                                cancelled = true;
                                break;
                            }
                            None => break,
                        },
                        _ = sleep(wait) => break,
                    }
                }
                if cancelled {
                    continue;
                }
                if settled_tx.send(latest).is_err() {
                    break;
                }
            }
        });

        (Self { tx }, settled)
    }

    pub fn push(&self, value: T) {
        self.send(Signal::Value(value));
    }

    /// Drops the pending value, if any, without emitting it.
    pub fn cancel(&self) {
        self.send(Signal::Cancel);
    }

    fn send(&self, signal: Signal<T>) {
        if self.tx.send(signal).is_err() {
            tracing::debug!("debouncer task has stopped");
        }
    }
}
