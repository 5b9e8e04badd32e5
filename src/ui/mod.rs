//! User Interface module for the news reader.
//!
//! Contains components for rendering and managing the terminal UI,
//! including event handling, application state, and UI components.
mod app;
mod event;
mod fetch;
mod guard;
pub mod logging;
mod screen;
mod slider;

pub use app::{App, AppMode};
pub use event::{Event, EventHandler, FetchPurpose};
pub use fetch::spawn_fetch;
pub use guard::{TerminalGuard, init_panic_hook, init_tui};
pub use screen::{FeedState, NewsScreen};
pub use slider::SwipeSlider;
