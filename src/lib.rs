//! Swipe News Library
//!
//! A terminal headline reader. One article is shown at a time; dragging the
//! slider handle past the middle of its track fetches the feed again and
//! shows a random article.
//!
//! # Modules
//!
//! - `article`: Feed data model
//! - `client`: HTTP client for the headline feed
//! - `config`: Command line and environment configuration
//! - `ui`: Terminal user interface components and event handling
pub mod article;
pub mod client;
pub mod config;
pub mod ui;

pub use article::Article;
pub use client::{HeadlineSource, NewsClient};
pub use config::Settings;
pub use ui::logging;
pub use ui::{App, AppMode, Event, EventHandler, FetchPurpose, SwipeSlider};
pub use ui::{TerminalGuard, init_panic_hook, init_tui, spawn_fetch};
