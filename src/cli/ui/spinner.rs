//! Progress indicator for commands waiting on the server

use is_terminal::IsTerminal;
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated indicator on stderr, cleared when dropped.
///
/// Nothing is drawn when stderr is not a terminal, so piped output stays
/// clean.
pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        if !io::stderr().is_terminal() {
            return Self { stop_tx: None, handle: None };
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(animate(message.into(), stop_rx));
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    fn halt(&mut self) {
        let Some(handle) = self.handle.take() else { return };
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        handle.abort();
        clear_line();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}

async fn animate(message: String, mut stop_rx: oneshot::Receiver<()>) {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    for frame in FRAMES.iter().cycle() {
        tokio::select! {
            _ = interval.tick() => {
                eprint!("\r{} {}", frame, message);
                let _ = io::stderr().flush();
            }
            _ = &mut stop_rx => break,
        }
    }
}

fn clear_line() {
    eprint!("\r\x1b[K");
    let _ = io::stderr().flush();
}

/// Await `future` while showing a spinner with `message`
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: Future<Output = T>,
{
    let _spinner = Spinner::start(message);
    future.await
}
