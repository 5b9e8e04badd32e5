//! Background headline fetches.
//!
//! Each fetch runs on its own short-lived thread and reports back through the
//! event channel. Fetches are never cancelled or de-duplicated.
use std::sync::{Arc, mpsc};
use std::thread;

use crate::client::HeadlineSource;

use super::event::{Event, FetchPurpose};

/// Spawns a worker that fetches headlines and posts [`Event::Feed`].
///
/// # Arguments
///
/// * `source` - Where to fetch headlines from
/// * `purpose` - Forwarded with the result so the screen can route it
/// * `sender` - Event channel of the main loop
pub fn spawn_fetch(
    source: Arc<dyn HeadlineSource>,
    purpose: FetchPurpose,
    sender: mpsc::Sender<Event>,
)
{
    log::info!("Fetching headlines ({purpose:?})");

    thread::spawn(move || {
        let result = source.fetch_headlines();

        if let Ok(articles) = &result
        {
            log::debug!("Fetched {} articles ({purpose:?})", articles.len());
        }

        // The app may have quit while the request was in flight
        if sender
            .send(Event::Feed(purpose, result))
            .is_err()
        {
            log::debug!("Dropping {purpose:?} fetch result, event loop is gone");
        }
    });
}
