//! Event handling module for the application
//!
//! This module provides a mechanism to handle events
//! from the main application thread. It uses a channel to send and receive
//! events between the main application and a separate event handling thread.
//!
//! Fetch workers post their results into the same channel, so the main loop
//! only ever waits on one receiver.
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

use crate::article::Article;

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPurpose
{
    /// First load when the screen mounts, or a manual reload after an error
    Initial,
    /// Triggered by a completed swipe
    Refresh,
}

/// Events that can be processed by the application
#[derive(Debug)]
pub enum Event
{
    /// Regular time tick for updating UI elements
    Tick,
    /// Keyboard input event
    Key(KeyEvent),
    /// Mouse input event
    Mouse(MouseEvent),
    /// Terminal resize event with new dimensions
    Resize(u16, u16),
    /// A headline fetch finished
    Feed(FetchPurpose, Result<Vec<Article>>),
}

/// Handles terminal events
///
/// Manages event handling in a separate thread and provides
/// a way to receive events through a channel.
pub struct EventHandler
{
    /// Receiver side of the event channel to get events from the handler thread
    event_receiver: mpsc::Receiver<Event>,
    /// Sender handed out to fetch workers
    event_sender: mpsc::Sender<Event>,
    /// Sender for shutdown the thread for graceful shutdown
    // The receiver is moved to the thread
    shutdown_sender: mpsc::Sender<()>,
    /// Handle to keep the thread alive
    // Option is used to move the handle in `drop`
    // since we can't move the handle out of the `&mut self`
    // for calling `join` in `drop`
    thread_handle: Option<JoinHandle<()>>,
}

impl EventHandler
{
    /// Creates a new event handler with the specified tick rate
    ///
    /// # Arguments
    ///
    /// * `tick_rate` - The duration between tick events
    ///
    /// # Returns
    ///
    /// A new `EventHandler` instance with a running background thread
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self
    {
        let (event_sender, event_receiver) = mpsc::channel();
        let (shutdown_sender, shutdown_receiver) = mpsc::channel();

        let thread_sender = event_sender.clone();

        let handle = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop
            {
                if shutdown_receiver.try_recv().is_ok()
                {
                    break;
                }

                // If more time than tick_rate has passed, don't wait at all
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                match poll_terminal(timeout)
                {
                    Ok(Some(event)) =>
                    {
                        // Break the loop if sending fails (receiver dropped)
                        if thread_sender.send(event).is_err()
                        {
                            break;
                        }
                    }
                    Ok(None) =>
                    {}
                    Err(err) =>
                    {
                        log::error!("Terminal event polling failed: {err}");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate
                {
                    if thread_sender.send(Event::Tick).is_err()
                    {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            event_receiver,
            event_sender,
            shutdown_sender,
            thread_handle: Some(handle),
        }
    }

    /// Returns a sender that feeds events into this handler's channel.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<Event>
    {
        self.event_sender.clone()
    }

    /// Gets the next event from the event channel
    ///
    /// This method blocks until an event is available
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is disconnected.
    pub fn next(&self) -> Result<Event>
    {
        self.event_receiver
            .recv()
            .context("Event channel disconnected")
    }
}

/// Waits up to `timeout` for a terminal event the application cares about.
///
/// # Returns
///
/// The translated event, or `None` on timeout or for ignored events.
///
/// # Errors
///
/// Returns an error if crossterm fails to poll or read.
fn poll_terminal(timeout: Duration) -> std::io::Result<Option<Event>>
{
    if !event::poll(timeout)?
    {
        return Ok(None);
    }

    let translated = match event::read()?
    {
        // Key release events are reported on some platforms, only presses count
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    };

    Ok(translated)
}

impl Drop for EventHandler
{
    fn drop(&mut self)
    {
        // Signal shutdown (ignore if already closed)
        let _ = self.shutdown_sender.send(());

        if let Some(handle) = self.thread_handle.take()
        {
            let _ = handle.join();
        }
    }
}
