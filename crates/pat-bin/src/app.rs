//! Application state and key handling.
//!
//! One `App` owns the document, the viewport, the highlight cache, and the
//! interaction mode. Keys come in, mutations go through the document, and
//! damage reports feed the cache. Modes:
//! - `Edit`: keys edit the document or move the cursor;
//! - `Search`: keys build the phrase, Enter runs the wraparound search;
//! - `ConfirmQuit`: y/n/Esc decide what happens to unsaved changes.
//!
//! The notice row shows, in priority order, the active prompt, then the
//! transient status message (three seconds), then the persistent error.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use core_config::Config;
use core_render::{
    ChromeContext, Frame, FrameInputs, HighlightCache, Notice, UiStyles, ViewPort, compose_frame,
};
use core_state::{Damage, Document, search};
use core_syntax::{SyntectTokenizer, Theme};
use core_text::Metrics;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardPort;
use crate::io;

/// How long a transient status message stays on screen.
pub const STATUS_LINGER: Duration = Duration::from_secs(3);

const CONFIRM_PROMPT: &str = "File modified. Save changes? (Y)es (N)o ^C Cancel";

/// Which surface the next key lands on.
enum Mode {
    Edit,
    Search { input: String },
    ConfirmQuit,
}

struct StatusLine {
    text: String,
    expires_at: Instant,
}

pub struct App {
    doc: Document,
    path: PathBuf,
    display_name: String,
    config: Config,
    theme: Theme,
    styles: UiStyles,
    tokenizer: SyntectTokenizer,
    cache: HighlightCache,
    viewport: ViewPort,
    clipboard: Box<dyn ClipboardPort>,
    mode: Mode,
    status: Option<StatusLine>,
    error: Option<String>,
    quit: bool,
}

impl App {
    pub fn new(
        path: PathBuf,
        theme_override: Option<&str>,
        config: Config,
        clipboard: Box<dyn ClipboardPort>,
        size: (usize, usize),
    ) -> Result<Self> {
        let lines = io::load_lines(&path)?;
        let doc = Document::from_lines(lines, Metrics::new(config.tab_width));
        let tokenizer = SyntectTokenizer::for_path(&path);
        let theme = Theme::from_named(theme_override.or(config.theme.as_deref()));
        let viewport = ViewPort::new(size.0, size.1, doc.line_count());
        let display_name = path.to_string_lossy().into_owned();
        Ok(Self {
            doc,
            path,
            display_name,
            config,
            theme,
            styles: UiStyles::default(),
            tokenizer,
            cache: HighlightCache::new(),
            viewport,
            clipboard,
            mode: Mode::Edit,
            status: None,
            error: None,
            quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn grammar_name(&self) -> &str {
        self.tokenizer.grammar_name()
    }

    pub fn theme_name(&self) -> &str {
        self.theme.name()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport.resize(width, height);
    }

    /// Expire the transient status. Returns whether the screen went stale.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(status) = &self.status
            && now >= status.expires_at
        {
            self.status = None;
            return true;
        }
        false
    }

    /// Route one key through the active mode. Returns whether the screen
    /// went stale.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match &self.mode {
            Mode::ConfirmQuit => self.confirm_quit_key(key),
            Mode::Search { .. } => self.search_key(key),
            Mode::Edit => self.edit_key(key),
        }
    }

    /// Reconcile the viewport and compose the full screen.
    pub fn frame(&mut self) -> Frame {
        self.viewport.reconcile(&self.doc);
        let search_prompt;
        let notice = match &self.mode {
            Mode::ConfirmQuit => Notice::Prompt(CONFIRM_PROMPT),
            Mode::Search { input } => {
                search_prompt = format!("Search: {input}");
                Notice::Prompt(&search_prompt)
            }
            Mode::Edit => {
                if let Some(status) = &self.status {
                    Notice::Status(&status.text)
                } else if let Some(error) = &self.error {
                    Notice::Error(error)
                } else {
                    Notice::None
                }
            }
        };
        let inputs = FrameInputs {
            doc: &self.doc,
            viewport: &self.viewport,
            theme: &self.theme,
            styles: &self.styles,
            chrome: ChromeContext {
                file_name: &self.display_name,
                modified: self.doc.is_modified(),
                notice,
            },
        };
        compose_frame(&inputs, &mut self.cache, &self.tokenizer)
    }

    // ------------------------------------------------------------------
    // Per-mode key handling
    // ------------------------------------------------------------------

    fn confirm_quit_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                match self.save() {
                    Ok(()) => self.quit = true,
                    Err(error) => {
                        self.error = Some(format!("{error:#}"));
                        self.mode = Mode::Edit;
                    }
                }
                true
            }
            KeyCode::Char('n' | 'N') => {
                self.quit = true;
                true
            }
            KeyCode::Esc => {
                self.mode = Mode::Edit;
                true
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.mode = Mode::Edit;
                true
            }
            _ => false,
        }
    }

    fn search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                let phrase = self.take_search_input();
                self.mode = Mode::Edit;
                self.run_search(&phrase);
                true
            }
            KeyCode::Esc => {
                self.mode = Mode::Edit;
                true
            }
            KeyCode::Backspace => {
                if let Mode::Search { input } = &mut self.mode {
                    input.pop();
                }
                true
            }
            KeyCode::Char(c) if printable(key.modifiers) => {
                if let Mode::Search { input } = &mut self.mode {
                    input.push(c);
                }
                true
            }
            _ => false,
        }
    }

    fn edit_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.control_key(key.code);
        }
        match key.code {
            KeyCode::Up => {
                self.doc.move_up();
                true
            }
            KeyCode::Down => {
                self.doc.move_down();
                true
            }
            KeyCode::Left => {
                self.doc.move_left();
                true
            }
            KeyCode::Right => {
                self.doc.move_right();
                true
            }
            KeyCode::Home => {
                self.doc.move_home();
                true
            }
            KeyCode::End => {
                self.doc.move_end();
                true
            }
            KeyCode::Backspace => {
                let edit = self.doc.delete_backward();
                self.invalidate(edit);
                true
            }
            KeyCode::Delete => {
                let edit = self.doc.delete_forward();
                self.invalidate(edit);
                true
            }
            KeyCode::Enter => {
                let edit = self.doc.split_line();
                self.invalidate(edit);
                true
            }
            KeyCode::Tab => {
                let edit = self.doc.insert_text("\t");
                self.invalidate(edit);
                true
            }
            KeyCode::Char(c) if printable(key.modifiers) => {
                let mut buf = [0u8; 4];
                let edit = self.doc.insert_text(c.encode_utf8(&mut buf));
                self.invalidate(edit);
                true
            }
            _ => false,
        }
    }

    fn control_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('o') => {
                match self.save() {
                    Ok(()) => {
                        self.error = None;
                        self.set_status("File saved");
                    }
                    Err(error) => self.error = Some(format!("{error:#}")),
                }
                true
            }
            KeyCode::Char('x') => {
                if self.doc.is_modified() {
                    self.mode = Mode::ConfirmQuit;
                } else {
                    self.quit = true;
                }
                true
            }
            KeyCode::Char('c') => {
                let cursor = self.doc.cursor();
                self.set_status(format!(
                    "Line {}/{} Col {}",
                    cursor.line + 1,
                    self.doc.line_count(),
                    cursor.byte + 1
                ));
                true
            }
            KeyCode::Char('z') => {
                if let Some(damage) = self.doc.undo() {
                    self.invalidate(damage);
                }
                true
            }
            KeyCode::Char('y') => {
                if let Some(damage) = self.doc.redo() {
                    self.invalidate(damage);
                }
                true
            }
            KeyCode::Char('w') => {
                self.mode = Mode::Search {
                    input: String::new(),
                };
                true
            }
            KeyCode::Char('k') => {
                self.cut_line();
                true
            }
            KeyCode::Char('p') => {
                self.copy_line();
                true
            }
            KeyCode::Char('u') => {
                self.paste_lines();
                true
            }
            KeyCode::Char('a') => {
                self.doc.move_home();
                true
            }
            KeyCode::Char('e') => {
                self.doc.move_end();
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    fn save(&mut self) -> Result<()> {
        io::save_lines(&self.path, self.doc.lines(), self.config.backup)?;
        self.doc.clear_modified();
        info!(
            target: "io",
            path = %self.path.display(),
            line_count = self.doc.line_count(),
            "file_saved"
        );
        Ok(())
    }

    fn run_search(&mut self, phrase: &str) {
        match search::find_from(&self.doc, phrase) {
            Some(pos) => {
                debug!(target: "search", line = pos.line, byte = pos.byte, "search_hit");
                self.doc.set_cursor(pos);
            }
            None => self.set_status(format!("Not found: {phrase}")),
        }
    }

    /// Copy the cursor line (newline-terminated) and remove it. A clipboard
    /// failure aborts the cut with the line intact.
    fn cut_line(&mut self) {
        let line = self.doc.lines()[self.doc.cursor().line].clone();
        match self.clipboard.copy(format!("{line}\n")) {
            Ok(()) => {
                let (_, damage) = self.doc.remove_current_line();
                self.invalidate(damage);
            }
            Err(error) => self.clipboard_failed("cut", error),
        }
    }

    fn copy_line(&mut self) {
        let line = &self.doc.lines()[self.doc.cursor().line];
        match self.clipboard.copy(format!("{line}\n")) {
            Ok(()) => self.set_status("Line copied"),
            Err(error) => self.clipboard_failed("copy", error),
        }
    }

    /// Insert the clipboard's lines above the cursor line; the cursor keeps
    /// its line, now below the pasted block.
    fn paste_lines(&mut self) {
        match self.clipboard.paste() {
            Ok(text) => {
                let lines: Vec<String> = text
                    .strip_suffix('\n')
                    .unwrap_or(&text)
                    .split('\n')
                    .map(str::to_string)
                    .collect();
                let damage = self.doc.insert_lines_above(lines);
                self.invalidate(damage);
            }
            Err(error) => self.clipboard_failed("paste", error),
        }
    }

    fn clipboard_failed(&mut self, op: &str, error: anyhow::Error) {
        warn!(target: "clipboard", op, error = %error, "clipboard_op_failed");
        self.set_status(format!("Clipboard error: {error:#}"));
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn invalidate(&mut self, damage: Damage) {
        self.cache.apply(damage);
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            expires_at: Instant::now() + STATUS_LINGER,
        });
    }

    fn take_search_input(&mut self) -> String {
        match &mut self.mode {
            Mode::Search { input } => std::mem::take(input),
            _ => String::new(),
        }
    }
}

fn printable(modifiers: KeyModifiers) -> bool {
    !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
