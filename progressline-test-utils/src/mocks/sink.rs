//! In-memory output sink that stays readable after being handed to a bar

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Clonable byte buffer implementing [`Write`]
///
/// Every clone shares the same storage, so a test can keep one handle while
/// the bar owns another.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }

    /// Individual redraws: the output split on carriage returns, trailing
    /// newlines removed and empty pieces dropped
    pub fn frames(&self) -> Vec<String> {
        self.contents()
            .split('\r')
            .map(|frame| frame.trim_end_matches('\n').to_string())
            .filter(|frame| !frame.is_empty())
            .collect()
    }

    /// Last redraw, if any
    pub fn last_frame(&self) -> Option<String> {
        self.frames().pop()
    }

    pub fn clear(&self) {
        self.bytes.lock().unwrap().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
