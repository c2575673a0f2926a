//! Stop requests while a practice round is running
//!
//! Enter on stdin, Ctrl-C and (on unix) SIGTERM are funnelled into one
//! channel so the app can `select!` on them next to the max-duration timer.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Why the user asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRequest {
    /// Enter pressed
    Enter,
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl StopRequest {
    /// Whether the user wants the whole program to exit
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Interrupt | Self::Terminate)
    }
}

/// Stop request listener
pub struct StopSignals {
    receiver: mpsc::Receiver<StopRequest>,
}

impl StopSignals {
    /// Start listening for OS signals, and for Enter when `stdin` is set.
    ///
    /// Returns the listener and a sender other sources can use.
    pub fn new(stdin: bool) -> Result<(Self, mpsc::Sender<StopRequest>), std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                debug!("received SIGINT");
                if tx_int.send(StopRequest::Interrupt).await.is_err() {
                    break;
                }
            }
        });

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let tx_term = tx.clone();
            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                while sigterm.recv().await.is_some() {
                    debug!("received SIGTERM");
                    if tx_term.send(StopRequest::Terminate).await.is_err() {
                        break;
                    }
                }
            });
        }

        if stdin {
            let tx_enter = tx.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                // EOF ends the task; a closed stdin never stops a recording.
                while let Ok(Some(_)) = lines.next_line().await {
                    if tx_enter.send(StopRequest::Enter).await.is_err() {
                        break;
                    }
                }
            });
        }

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next request
    pub async fn recv(&mut self) -> Option<StopRequest> {
        self.receiver.recv().await
    }

    /// Drop requests that arrived while nobody was listening
    pub fn drain(&mut self) {
        while self.receiver.try_recv().is_ok() {}
    }
}
