//! Provides a RAII guard for safe terminal lifecycle management.
//!
//! This module uses the RAII (Resource Acquisition Is Initialization) pattern
//! to manage the terminal state.
//!
//! A guard object is created to initialize the TUI,
//! and its `Drop` implementation automatically restores the terminal when it
//! goes out of scope, either on normal exit or during a panic unwind.
use std::io::{Result as IoResult, Stdout, stdout};
use std::panic::{set_hook, take_hook};

use crossterm::ExecutableCommand;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use log::error;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// RAII wrapper for terminal state.
///
/// Manages the terminal's configuration, ensuring it is always returned
/// to its original state when this struct is dropped.
pub struct TerminalGuard;

impl TerminalGuard
{
    /// Creates a `TerminalGuard` for TUI setup.
    ///
    /// Configures the terminal by entering raw mode, switching to the
    /// alternate screen buffer and capturing the mouse for slider drags.
    ///
    /// # Returns
    ///
    /// The `TerminalGuard`. Holding this instance guarantees terminal
    /// restoration upon its drop.
    ///
    /// # Errors
    ///
    /// On failure to enter raw mode or switch screens.
    pub fn new() -> IoResult<Self>
    {
        // Setup terminal
        enable_raw_mode()?;
        stdout()
            .execute(EnterAlternateScreen)?
            .execute(EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard
{
    /// Restores the terminal state.
    ///
    /// Automatically called on `TerminalGuard` drop.
    ///
    /// Releases the mouse, exits raw mode and
    /// returns to the main screen, ensuring a clean terminal state.
    fn drop(&mut self)
    {
        restore_terminal();
    }
}

/// Undoes everything [`TerminalGuard::new`] set up.
///
/// Failures are logged, there is nothing better to do with a broken terminal.
fn restore_terminal()
{
    if let Err(err) = disable_raw_mode()
    {
        error!("Failed to disable raw mode: {err}");
    }

    if let Err(err) = stdout().execute(DisableMouseCapture)
    {
        error!("Failed to release the mouse: {err}");
    }

    if let Err(err) = stdout().execute(LeaveAlternateScreen)
    {
        error!("Failed to leave alternate screen: {err}");
    }
}

/// Initialize the terminal
///
/// Raw mode and the alternate screen are handled by [`TerminalGuard`], this
/// only wraps stdout in a ratatui terminal.
///
/// # Errors
///
/// Returns an error if the terminal size cannot be queried.
pub fn init_tui() -> IoResult<Terminal<CrosstermBackend<Stdout>>>
{
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Initialize the panic hook to handle panics
///
/// The terminal is restored before the original hook prints the panic, so
/// the message lands on the main screen.
pub fn init_panic_hook()
{
    let original_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        restore_terminal();

        error!("Application panicked: {panic_info}");

        // Call the original panic hook
        original_hook(panic_info);
    }));
}
