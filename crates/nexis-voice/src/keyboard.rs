//! Typed input from stdin.
//!
//! Lines are read on a plain OS thread and forwarded over a channel. A read
//! parked on the terminal then never holds up runtime shutdown: dropping the
//! listener just abandons the thread.

use async_trait::async_trait;
use nexis_core::error::NexisError;
use nexis_core::traits::Listener;
use std::io::{BufRead, Write};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Reads one line per utterance. End of input is reported as `"exit"` so the
/// session ends the same way a spoken farewell would.
pub struct KeyboardListener {
    lines: Mutex<mpsc::Receiver<std::io::Result<String>>>,
    prompt: bool,
}

impl KeyboardListener {
    /// Listener over the process stdin, printing a prompt before each read.
    pub fn stdin() -> Self {
        Self::spawn(std::io::BufReader::new(std::io::stdin()), true)
    }

    /// Listener over any buffered reader, without a prompt.
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self::spawn(reader, false)
    }

    fn spawn<R: BufRead + Send + 'static>(reader: R, prompt: bool) -> Self {
        // One line of read-ahead at most.
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
            debug!("keyboard reader finished");
        });
        Self {
            lines: Mutex::new(rx),
            prompt,
        }
    }
}

#[async_trait]
impl Listener for KeyboardListener {
    fn name(&self) -> &str {
        "keyboard"
    }

    async fn next_utterance(&self) -> Result<String, NexisError> {
        if self.prompt {
            print!("Type your command: ");
            let _ = std::io::stdout().flush();
        }
        let mut lines = self.lines.lock().await;
        match lines.recv().await {
            Some(line) => Ok(line?.trim().to_lowercase()),
            None => Ok("exit".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Read};
    use std::time::{Duration, Instant};

    /// A reader that never produces data, like an idle terminal.
    struct Idle;

    impl Read for Idle {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            loop {
                std::thread::park();
            }
        }
    }

    #[tokio::test]
    async fn test_lines_are_trimmed_and_lowercased() {
        let input: &'static [u8] = b"  What TIME is it  \n\nhello\n";
        let listener = KeyboardListener::from_reader(input);
        assert_eq!(listener.next_utterance().await.unwrap(), "what time is it");
        assert_eq!(listener.next_utterance().await.unwrap(), "");
        assert_eq!(listener.next_utterance().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_eof_means_exit() {
        let input: &'static [u8] = b"";
        let listener = KeyboardListener::from_reader(input);
        assert_eq!(listener.next_utterance().await.unwrap(), "exit");
        assert_eq!(listener.next_utterance().await.unwrap(), "exit");
    }

    #[test]
    fn test_pending_read_does_not_block_runtime_shutdown() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let listener = KeyboardListener::from_reader(BufReader::new(Idle));

        runtime.block_on(async {
            let pending =
                tokio::time::timeout(Duration::from_millis(50), listener.next_utterance()).await;
            assert!(pending.is_err(), "idle reader produced a line");
        });

        let started = Instant::now();
        drop(listener);
        drop(runtime);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
