//! Frame composition and terminal output.
//!
//! Rendering is deliberately whole-frame: every pass composes the full
//! screen (title, numbered text body, footer, notice row) from the
//! document and queues it in one batch. Damage reports from the state
//! layer feed the [`HighlightCache`] so tokenization is skipped for
//! untouched rows, not so rows are skipped on screen.
//!
//! - [`ViewPort`] clamps the visible window around the cursor.
//! - [`HighlightCache`] memoizes per-line tokens and absorbs damage.
//! - [`compose_frame`] turns document + chrome into styled rows.
//! - [`Painter`] queues the crossterm commands and flushes once.

pub mod chrome;
pub mod frame;
pub mod highlight;
pub mod paint;
pub mod style;
pub mod viewport;

pub use chrome::{ChromeContext, FOOTER_LINE_1, FOOTER_LINE_2, Notice};
pub use frame::{Frame, FrameInputs, Row, StyledSpan, compose_frame};
pub use highlight::HighlightCache;
pub use paint::Painter;
pub use style::{CellAttrs, SpanStyle, UiStyles};
pub use viewport::{CHROME_ROWS, ViewPort};
