//! Text sinks
//!
//! Output and error text go to two injectable writers. [`SharedBuffer`] is an
//! in-memory writer whose contents stay readable after it was handed to a runner.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// A boxed output channel
pub type Sink = Box<dyn Write + Send>;

/// Cloneable in-memory writer
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        SharedBuffer::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Written text split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // poisoning is ignored
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
