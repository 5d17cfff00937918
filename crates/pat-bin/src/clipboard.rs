//! System clipboard access.
//!
//! Cut and copy move whole lines through the system clipboard so they work
//! across editor instances. `arboard` can fail to initialize in headless or
//! unusual terminal environments; the port keeps that failure per-use so
//! the editor still runs without a clipboard.

use anyhow::{Result, anyhow};
use tracing::warn;

pub trait ClipboardPort {
    fn copy(&mut self, text: String) -> Result<()>;
    fn paste(&mut self) -> Result<String>;
}

pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(error) => {
                warn!(target: "clipboard", %error, "clipboard_init_failed");
                None
            }
        };
        Self { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardPort for SystemClipboard {
    fn copy(&mut self, text: String) -> Result<()> {
        match &mut self.inner {
            Some(clipboard) => clipboard.set_text(text).map_err(Into::into),
            None => Err(anyhow!("no clipboard backend")),
        }
    }

    fn paste(&mut self) -> Result<String> {
        match &mut self.inner {
            Some(clipboard) => clipboard.get_text().map_err(Into::into),
            None => Err(anyhow!("no clipboard backend")),
        }
    }
}
