//! Swipe slider
//!
//! A horizontal track with a draggable handle. Dragging the handle past the
//! middle of the track and letting go fires a completion callback; the handle
//! always springs back to the start afterwards.
use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Text drawn along the track, under the handle.
const SLIDER_LABEL: &str = "Swipe To Fetch News";

/// Track border and label colours.
const TRACK_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// Handle at rest or springing back.
const HANDLE_STYLE: Style = Style::new().bg(Color::Rgb(255, 165, 0));

/// Handle while it is held.
const HANDLE_ACTIVE_STYLE: Style = Style::new()
    .bg(Color::Rgb(255, 200, 80))
    .add_modifier(Modifier::BOLD);

/// Spring stiffness, in 1/s².
const SPRING_STIFFNESS: f32 = 40.0;
/// Spring damping, in 1/s.
const SPRING_DAMPING: f32 = 7.0;
/// Below this displacement and velocity the spring is considered at rest.
const REST_THRESHOLD: f32 = 0.01;
/// Largest integration step, longer ticks are split.
const MAX_STEP: Duration = Duration::from_millis(16);

/// Gesture phase of the slider.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase
{
    /// Handle resting at the start of the track
    Idle,
    /// Pointer or keyboard is holding the handle
    Dragging
    {
        /// Pointer position when the drag started, `None` for keyboard drags
        origin: Option<f32>,
    },
    /// Handle is springing back to the start
    Returning
    {
        /// Current velocity in cells per second
        velocity: f32,
    },
}

/// Draggable slider bound to a track.
#[derive(Debug, Clone)]
pub struct SwipeSlider
{
    /// Current handle offset from the start of the track, in cells
    offset: f32,
    /// Width of the track the handle slides in
    track_width: u16,
    /// Width of the handle
    handle_width: u16,
    /// Track width pinned by configuration, capped to the rendered area
    fixed_track_width: Option<u16>,
    /// What the handle is doing right now
    phase: Phase,
    /// Last rendered handle area, used for hit testing
    handle_area: Rect,
}

impl SwipeSlider
{
    /// Creates a slider at rest.
    ///
    /// # Arguments
    ///
    /// * `handle_width` - Width of the handle in cells
    #[must_use]
    pub const fn new(handle_width: u16) -> Self
    {
        Self {
            offset: 0.0,
            track_width: 0,
            handle_width,
            fixed_track_width: None,
            phase: Phase::Idle,
            handle_area: Rect::ZERO,
        }
    }

    /// Pins the track width. Layout changes no longer widen it, though it is
    /// still capped to the area it is rendered in.
    ///
    /// # Arguments
    ///
    /// * `track_width` - Track width in cells
    #[must_use]
    pub fn with_fixed_track_width(mut self, track_width: u16) -> Self
    {
        self.fixed_track_width = Some(track_width);
        self.set_track_width(track_width);
        self
    }

    /// Sets the width of the track.
    ///
    /// A shrinking track pulls the handle back inside the new bound.
    pub fn set_track_width(&mut self, track_width: u16)
    {
        self.track_width = track_width;
        self.offset = self.clamp(self.offset);
    }

    /// Distance the handle may travel: track width minus handle width.
    #[must_use]
    pub fn travel(&self) -> f32
    {
        f32::from(self.track_width.saturating_sub(self.handle_width))
    }

    /// Current handle offset in cells.
    #[must_use]
    pub const fn offset(&self) -> f32
    {
        self.offset
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool
    {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Whether the handle is springing back.
    #[must_use]
    pub const fn is_animating(&self) -> bool
    {
        matches!(self.phase, Phase::Returning { .. })
    }

    /// Starts a drag with the pointer at `pointer_x`.
    ///
    /// Grabbing a returning handle stops it where it is until the pointer
    /// moves.
    pub const fn begin_drag(&mut self, pointer_x: f32)
    {
        self.phase = Phase::Dragging {
            origin: Some(pointer_x),
        };
    }

    /// Moves the handle to follow the pointer.
    ///
    /// The offset is the pointer's travel since the drag started, clamped to
    /// the track. Ignored unless a pointer started the drag.
    pub fn drag_to(&mut self, pointer_x: f32)
    {
        if let Phase::Dragging {
            origin: Some(origin),
        } = self.phase
        {
            self.offset = self.clamp(pointer_x - origin);
        }
    }

    /// Moves the handle by `delta` cells, starting a drag if needed.
    pub fn nudge(&mut self, delta: f32)
    {
        if !self.is_dragging()
        {
            self.phase = Phase::Dragging { origin: None };
        }

        let target = self.offset + delta;
        self.offset = self.clamp(target);
    }

    /// Lets go of the handle.
    ///
    /// Calls `on_complete` once if the handle passed the middle of its travel,
    /// then springs the handle back to the start either way.
    ///
    /// # Returns
    ///
    /// `true` if `on_complete` was called.
    pub fn release<F: FnOnce()>(&mut self, on_complete: F) -> bool
    {
        if !self.is_dragging()
        {
            return false;
        }

        self.phase = Phase::Returning { velocity: 0.0 };

        let travel = self.travel();
        let fired = travel > 0.0 && self.offset >= travel / 2.0;

        if fired
        {
            log::debug!("Slider released past midpoint ({:.1}/{travel})", self.offset);
            on_complete();
        }

        fired
    }

    /// Drops the handle without completing the swipe.
    ///
    /// The handle springs back as after a short release; the completion
    /// callback never runs.
    pub fn cancel(&mut self)
    {
        if self.is_dragging()
        {
            log::debug!("Slider drag cancelled at {:.1}", self.offset);
            self.phase = Phase::Returning { velocity: 0.0 };
        }
    }

    /// Advances the return animation by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration)
    {
        let mut remaining = elapsed;

        while !remaining.is_zero()
        {
            let Phase::Returning { velocity } = self.phase
            else
            {
                break;
            };

            let step = remaining.min(MAX_STEP);
            remaining = remaining.saturating_sub(step);
            self.phase = self.spring_step(velocity, step.as_secs_f32());
        }
    }

    /// One semi-implicit Euler step of the damped spring towards zero.
    fn spring_step(&mut self, velocity: f32, seconds: f32) -> Phase
    {
        let acceleration = -SPRING_STIFFNESS * self.offset - SPRING_DAMPING * velocity;
        let velocity = velocity + acceleration * seconds;
        let next = self.offset + velocity * seconds;

        // The start of the track is a wall, the handle does not bounce past it
        if next <= 0.0
        {
            self.offset = 0.0;
            return Phase::Idle;
        }

        self.offset = self.clamp(next);

        if self.offset.abs() < REST_THRESHOLD && velocity.abs() < REST_THRESHOLD
        {
            self.offset = 0.0;
            Phase::Idle
        }
        else
        {
            Phase::Returning { velocity }
        }
    }

    /// Clamps an offset to `[0, travel]`.
    fn clamp(&self, offset: f32) -> f32
    {
        offset.clamp(0.0, self.travel())
    }

    /// Whether a terminal cell lies on the handle as last rendered.
    #[must_use]
    pub fn handle_contains(&self, column: u16, row: u16) -> bool
    {
        self.handle_area
            .contains(Position::new(column, row))
    }

    /// Renders the track and handle to the specified area.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render to
    /// * `area` - The area within the frame to render the slider
    pub fn render(&mut self, frame: &mut Frame, area: Rect)
    {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(TRACK_STYLE);
        let inner = block.inner(area);

        // A pinned track never extends past what is on screen
        let track_width = self
            .fixed_track_width
            .map_or(inner.width, |fixed| fixed.min(inner.width));
        self.set_track_width(track_width);

        let label = Paragraph::new(SLIDER_LABEL)
            .alignment(Alignment::Center)
            .style(TRACK_STYLE);

        // Center the label row vertically inside the track
        let label_area = Rect {
            y: inner.y + inner.height / 2,
            height: inner.height.min(1),
            ..inner
        };

        frame.render_widget(block, area);
        frame.render_widget(label, label_area);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let handle_x = inner.x + self.offset.round() as u16;
        let handle_width = self
            .handle_width
            .min(inner.right().saturating_sub(handle_x));

        self.handle_area = Rect::new(handle_x, inner.y, handle_width, inner.height);

        let style = if self.is_dragging()
        {
            HANDLE_ACTIVE_STYLE
        }
        else
        {
            HANDLE_STYLE
        };

        frame.render_widget(Block::default().style(style), self.handle_area);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Track 46 cells, handle 6: travel 40, midpoint 20.
    fn slider() -> SwipeSlider
    {
        let mut slider = SwipeSlider::new(6);
        slider.set_track_width(46);
        slider
    }

    fn drag(slider: &mut SwipeSlider, delta: f32)
    {
        slider.begin_drag(10.0);
        slider.drag_to(10.0 + delta);
    }

    fn settle(slider: &mut SwipeSlider)
    {
        for _ in 0..300
        {
            slider.tick(Duration::from_millis(33));
        }
    }

    #[test]
    fn offset_is_clamped_to_travel()
    {
        let mut slider = slider();

        for delta in [-50.0, -1.0, 0.0, 0.5, 12.0, 39.9, 40.0, 41.0, 500.0]
        {
            drag(&mut slider, delta);
            assert!(
                (slider.offset() - f32::clamp(delta, 0.0, 40.0)).abs() < f32::EPSILON,
                "delta {delta} gave {}",
                slider.offset()
            );
        }
    }

    #[test]
    fn drag_without_grab_is_ignored()
    {
        let mut slider = slider();

        slider.drag_to(30.0);

        assert!(slider.offset().abs() < f32::EPSILON);
    }

    #[test]
    fn release_past_midpoint_fires_once()
    {
        let mut slider = slider();
        let mut calls = 0;

        drag(&mut slider, 20.0);
        assert!(slider.release(|| calls += 1));
        // A second release without a new drag does nothing
        assert!(!slider.release(|| calls += 1));

        assert_eq!(calls, 1);
    }

    #[test]
    fn release_before_midpoint_does_not_fire()
    {
        let mut slider = slider();
        let mut calls = 0;

        drag(&mut slider, 19.5);
        assert!(!slider.release(|| calls += 1));

        assert_eq!(calls, 0);
    }

    #[test]
    fn release_returns_handle_to_start()
    {
        for delta in [5.0, 25.0, 40.0]
        {
            let mut slider = slider();
            drag(&mut slider, delta);
            slider.release(|| {});

            assert!(slider.is_animating());
            settle(&mut slider);

            assert!(!slider.is_animating());
            assert!(slider.offset().abs() < f32::EPSILON);
        }
    }

    #[test]
    fn spring_moves_monotonically_towards_start()
    {
        let mut slider = slider();
        drag(&mut slider, 40.0);
        slider.release(|| {});

        let mut previous = slider.offset();
        while slider.is_animating()
        {
            slider.tick(Duration::from_millis(16));
            assert!(slider.offset() <= previous + f32::EPSILON);
            assert!(slider.offset() >= 0.0);
            previous = slider.offset();
        }
    }

    #[test]
    fn grabbing_a_returning_handle_keeps_its_position()
    {
        let mut slider = slider();
        drag(&mut slider, 30.0);
        slider.release(|| {});
        slider.tick(Duration::from_millis(50));
        let caught_at = slider.offset();

        slider.begin_drag(3.0);
        slider.tick(Duration::from_millis(50));

        assert!(slider.is_dragging());
        assert!((slider.offset() - caught_at).abs() < f32::EPSILON);

        slider.drag_to(8.0);
        assert!((slider.offset() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn nudges_use_same_bounds()
    {
        let mut slider = slider();

        slider.nudge(-4.0);
        assert!(slider.offset().abs() < f32::EPSILON);

        for _ in 0..20
        {
            slider.nudge(4.0);
        }
        assert!((slider.offset() - 40.0).abs() < f32::EPSILON);

        let mut fired = false;
        slider.release(|| fired = true);
        assert!(fired);
    }

    #[test]
    fn shrinking_track_reclamps_offset()
    {
        let mut slider = slider();
        drag(&mut slider, 35.0);

        slider.set_track_width(26);

        assert!((slider.offset() - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn track_narrower_than_handle_never_fires()
    {
        let mut slider = SwipeSlider::new(6);
        slider.set_track_width(4);
        let mut fired = false;

        drag(&mut slider, 10.0);
        slider.release(|| fired = true);

        assert!(!fired);
        assert!(slider.travel().abs() < f32::EPSILON);
    }

    #[test]
    fn render_tracks_handle_for_hit_testing()
    {
        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        let mut slider = SwipeSlider::new(4);

        terminal
            .draw(|frame| {
                let area = frame.area();
                slider.render(frame, area);
            })
            .unwrap();

        // Border takes one cell on each side
        assert!((slider.travel() - 24.0).abs() < f32::EPSILON);
        assert!(slider.handle_contains(1, 1));
        assert!(slider.handle_contains(4, 1));
        assert!(!slider.handle_contains(5, 1));

        slider.begin_drag(2.0);
        slider.drag_to(12.0);
        terminal
            .draw(|frame| {
                let area = frame.area();
                slider.render(frame, area);
            })
            .unwrap();

        assert!(!slider.handle_contains(1, 1));
        assert!(slider.handle_contains(11, 1));
    }

    #[test]
    fn fixed_track_wider_than_area_keeps_handle_visible()
    {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        let mut slider = SwipeSlider::new(4).with_fixed_track_width(200);

        terminal
            .draw(|frame| {
                let area = frame.area();
                slider.render(frame, area);
            })
            .unwrap();
        slider.nudge(150.0);
        terminal
            .draw(|frame| {
                let area = frame.area();
                slider.render(frame, area);
            })
            .unwrap();

        // 38 inner cells, handle 4
        assert!((slider.travel() - 34.0).abs() < f32::EPSILON);
        assert!((slider.offset() - 34.0).abs() < f32::EPSILON);
        assert!(slider.handle_contains(35, 1));
        assert!(slider.handle_contains(38, 1));
    }

    #[test]
    fn pointer_drag_after_keyboard_nudge_is_ignored()
    {
        let mut slider = slider();

        slider.nudge(6.0);
        slider.drag_to(30.0);

        assert!((slider.offset() - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn cancel_springs_back_without_firing()
    {
        let mut slider = slider();
        drag(&mut slider, 30.0);

        slider.cancel();
        let mut fired = false;
        assert!(!slider.release(|| fired = true));
        settle(&mut slider);

        assert!(!fired);
        assert!(!slider.is_dragging());
        assert!(slider.offset().abs() < f32::EPSILON);
    }

    #[test]
    fn fixed_track_width_ignores_layout()
    {
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        let mut slider = SwipeSlider::new(4).with_fixed_track_width(20);

        terminal
            .draw(|frame| {
                let area = frame.area();
                slider.render(frame, area);
            })
            .unwrap();

        assert!((slider.travel() - 16.0).abs() < f32::EPSILON);
    }
}
