/// Input bridge: hands one character per round from the input task to
/// the round task.
///
///   - Transport is a bounded channel of capacity 1. The round task blocks
///     on `recv`, the input task blocks on `send`.
///   - Ownership of each character moves through the channel; the input
///     task never sees game state.
///   - Shutdown cancels the token (seen by the source at its blocking
///     point), closes the channel (fails any pending `send`), then joins.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Shared "stop now" flag, cloned into every task that may block.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Producer of raw command characters.
pub trait InputSource: Send + 'static {
    /// Block until one character is available.
    /// Returns `Ok(None)` once `cancel` fires or the source is exhausted.
    fn next_char(&mut self, cancel: &CancelToken) -> io::Result<Option<char>>;
}

pub struct InputBridge {
    rx: Receiver<char>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl InputBridge {
    /// Start the input task on its own thread.
    pub fn spawn<S: InputSource>(mut source: S) -> Self {
        let (tx, rx) = mpsc::sync_channel::<char>(1);
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name("input".into())
            .spawn(move || input_loop(&mut source, &tx, &token))
            .map_err(|e| log::error!("could not start input thread: {e}"))
            .ok();

        InputBridge { rx, cancel, handle }
    }

    /// Next command character. None once the input side has gone away.
    pub fn recv(&self) -> Option<char> {
        self.rx.recv().ok()
    }

    /// Stop the input task and wait for it to exit.
    pub fn shutdown(mut self) {
        let handle = self.handle.take();
        drop(self);
        if let Some(h) = handle {
            if h.join().is_err() {
                log::warn!("input thread panicked");
            }
        }
    }
}

impl Drop for InputBridge {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn input_loop<S: InputSource>(source: &mut S, tx: &SyncSender<char>, cancel: &CancelToken) {
    while !cancel.is_cancelled() {
        match source.next_char(cancel) {
            Ok(Some(ch)) => {
                if tx.send(ch).is_err() {
                    break; // receiver dropped → session over
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("input source failed: {e}");
                break;
            }
        }
    }
    log::debug!("input task finished");
}

/// Fixed sequence of characters, then end of input.
#[cfg(test)]
pub struct ScriptedInput {
    chars: std::collections::VecDeque<char>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(script: &str) -> Self {
        ScriptedInput { chars: script.chars().collect() }
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn next_char(&mut self, cancel: &CancelToken) -> io::Result<Option<char>> {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        Ok(self.chars.pop_front())
    }
}
