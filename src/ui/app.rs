//! Application module for the news reader.
//!
//! This module provides the main application state and logic. It wires the
//! slider's completion callback to the news screen and routes keyboard, mouse
//! and feed events to the component that owns them.
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::Rng;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::article::Article;

use super::event::FetchPurpose;
use super::screen::NewsScreen;
use super::slider::SwipeSlider;

/// Cells the handle moves per arrow key press.
const NUDGE_STEP: f32 = 2.0;

/// Rows taken by the slider track, borders included.
const SLIDER_HEIGHT: u16 = 5;

/// Ticks per spinner frame while loading.
const TICKS_PER_SPINNER_FRAME: usize = 4;

/// Application mode that determines the current UI state.
///
/// Controls what is displayed and how user input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode
{
    /// Normal mode - default state
    Normal,
    /// Help overlay is displayed
    Help,
}

/// Main application state for the news reader.
pub struct App
{
    /// Feed state and article card
    pub screen: NewsScreen,
    /// Swipe-to-fetch control
    pub slider: SwipeSlider,
    /// Current application mode
    pub mode: AppMode,
    /// Flag indicating if the application should exit
    pub should_quit: bool,
    /// Ticks seen so far, drives the loading spinner
    ticks: usize,
}

impl App
{
    /// Creates a new App instance.
    ///
    /// # Arguments
    ///
    /// * `slider` - The slider to show below the article card
    ///
    /// # Returns
    ///
    /// A new `App` waiting for its initial fetch
    #[must_use]
    pub const fn new(slider: SwipeSlider) -> Self
    {
        Self {
            screen: NewsScreen::new(),
            slider,
            mode: AppMode::Normal,
            should_quit: false,
            ticks: 0,
        }
    }

    /// Handles a key press.
    ///
    /// # Returns
    ///
    /// A fetch to issue, if the key asked for one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FetchPurpose>
    {
        match (self.mode, key.code)
        {
            (AppMode::Normal, KeyCode::Char('q')) =>
            {
                self.should_quit = true;
            }
            (AppMode::Normal | AppMode::Help, KeyCode::Char('?')) |
            (AppMode::Help, KeyCode::Esc) =>
            {
                self.toggle_help();
            }
            (AppMode::Normal, KeyCode::Char('r')) =>
            {
                if self.screen.reload()
                {
                    return Some(FetchPurpose::Initial);
                }
            }
            (AppMode::Normal, KeyCode::Char('l') | KeyCode::Right) if self.screen.is_ready() =>
            {
                self.slider.nudge(NUDGE_STEP);
            }
            (AppMode::Normal, KeyCode::Char('h') | KeyCode::Left) if self.screen.is_ready() =>
            {
                self.slider.nudge(-NUDGE_STEP);
            }
            (AppMode::Normal, KeyCode::Enter | KeyCode::Char(' ')) if self.screen.is_ready() =>
            {
                self.release_slider();
            }
            _ =>
            {} // Ignore other key combinations
        }

        self.pending_refresh()
    }

    /// Handles a mouse event: press on the handle, drag, release.
    ///
    /// # Returns
    ///
    /// A fetch to issue, if the release completed a swipe.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<FetchPurpose>
    {
        if self.mode != AppMode::Normal || !self.screen.is_ready()
        {
            return None;
        }

        let pointer_x = f32::from(mouse.column);

        match mouse.kind
        {
            MouseEventKind::Down(MouseButton::Left)
                if self.slider.handle_contains(mouse.column, mouse.row) =>
            {
                self.slider.begin_drag(pointer_x);
            }
            MouseEventKind::Drag(MouseButton::Left) =>
            {
                self.slider.drag_to(pointer_x);
            }
            MouseEventKind::Up(MouseButton::Left) =>
            {
                self.release_slider();
            }
            _ =>
            {}
        }

        self.pending_refresh()
    }

    /// Routes a finished fetch to the screen.
    pub fn handle_feed<R: Rng>(
        &mut self,
        purpose: FetchPurpose,
        result: Result<Vec<Article>>,
        rng: &mut R,
    )
    {
        match purpose
        {
            FetchPurpose::Initial => self.screen.apply_initial(result),
            FetchPurpose::Refresh => self.screen.apply_refresh(result, rng),
        }
    }

    /// Advances animations by one tick.
    pub fn tick(&mut self, elapsed: Duration)
    {
        self.ticks = self.ticks.wrapping_add(1);
        self.slider.tick(elapsed);
        self.screen.tick(elapsed);
    }

    /// Lets go of the slider, asking the screen for a refresh if the swipe
    /// completed.
    fn release_slider(&mut self)
    {
        let screen = &mut self.screen;
        self.slider.release(|| screen.request_refresh());
    }

    /// Turns a refresh requested by the slider callback into a fetch.
    fn pending_refresh(&mut self) -> Option<FetchPurpose>
    {
        self.screen
            .take_refresh_request()
            .then_some(FetchPurpose::Refresh)
    }

    /// Renders the application UI to the provided frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render the UI to
    pub fn render(&mut self, frame: &mut Frame)
    {
        let size = frame.area();
        let spinner_frame = self.ticks / TICKS_PER_SPINNER_FRAME;

        if self.screen.is_ready()
        {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(SLIDER_HEIGHT)])
                .split(size);

            self.screen.render(frame, chunks[0], spinner_frame);
            self.slider.render(frame, chunks[1]);
        }
        else
        {
            self.screen.render(frame, size, spinner_frame);
        }

        if self.mode == AppMode::Help
        {
            Self::render_help(frame);
        }
    }

    /// Renders the help overlay with keyboard shortcuts.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render the help overlay to
    fn render_help(frame: &mut Frame)
    {
        let area = centered_rect(60, 60, frame.area());

        // Clear the area first to make it fully opaque
        frame.render_widget(Clear, area);

        let text = Text::from(vec![
            Line::from("Swipe News Help:"),
            Line::from(""),
            Line::from("Drag the handle past the middle to fetch a random article"),
            Line::from("l/→ and h/←: Move the handle"),
            Line::from("Enter/Space: Let go of the handle"),
            Line::from("r: Reload after an error"),
            Line::from("q: Quit"),
            Line::from("?: Toggle help"),
        ]);

        let help_box = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help")
                    .style(Style::default()),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(help_box, area);
    }

    /// Toggles the help overlay.
    ///
    /// Opening help drops a held handle; the release would never reach the
    /// slider while the overlay is up.
    pub fn toggle_help(&mut self)
    {
        self.mode = if self.mode == AppMode::Help
        {
            AppMode::Normal
        }
        else
        {
            self.slider.cancel();
            AppMode::Help
        };
    }
}

/// Creates a centered rectangle inside the given area.
///
/// # Arguments
///
/// * `percent_x` - Width of the rectangle as a percentage of the parent area
/// * `percent_y` - Height of the rectangle as a percentage of the parent area
/// * `area` - Parent rectangle
///
/// # Returns
///
/// A new rectangle positioned in the center of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect
{
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
