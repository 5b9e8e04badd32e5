//! News screen
//!
//! Owns the feed state and renders either a loading indicator, the error of
//! the initial load, or a card for the article currently on display.
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use textwrap::wrap;

use crate::article::Article;

/// Frames of the loading spinner.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Card colours once it has faded in.
const CARD_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Rgb(245, 245, 220));

/// Headline and label emphasis.
const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

/// Dimmed text, also used for the card early in its reveal.
const FADED_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Error message of a failed initial load.
const ERROR_STYLE: Style = Style::new().fg(Color::LightRed);

/// Length of the card reveal animation.
const REVEAL_DURATION: Duration = Duration::from_secs(1);

/// Rows the card rises while it is revealed.
const REVEAL_LIFT: u16 = 4;

/// Feed state of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState
{
    /// Waiting for the initial fetch
    Loading,
    /// Articles are available and one of them is on display
    Ready
    {
        /// Articles of the last successful fetch
        articles: Vec<Article>,
        /// Index of the displayed article
        shown: usize,
    },
    /// The initial fetch failed
    Failed(String),
}

/// Progress of the one-time card reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reveal
{
    /// No article has been shown yet
    Pending,
    /// Card is animating in, with time elapsed so far
    Running(Duration),
    /// Animation finished, it never runs again
    Done,
}

/// Screen showing a single headline.
#[derive(Debug)]
pub struct NewsScreen
{
    /// What the feed has delivered so far
    state: FeedState,
    /// One-time card entrance animation
    reveal: Reveal,
    /// Set by the slider callback, drained by the app loop
    refresh_requested: bool,
}

impl Default for NewsScreen
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl NewsScreen
{
    /// Creates a screen waiting for its first fetch.
    #[must_use]
    pub const fn new() -> Self
    {
        Self {
            state: FeedState::Loading,
            reveal: Reveal::Pending,
            refresh_requested: false,
        }
    }

    /// Current feed state.
    #[must_use]
    pub const fn state(&self) -> &FeedState
    {
        &self.state
    }

    /// Whether an article is on display.
    #[must_use]
    pub const fn is_ready(&self) -> bool
    {
        matches!(self.state, FeedState::Ready { .. })
    }

    /// The article on display, if any.
    #[must_use]
    pub fn current_article(&self) -> Option<&Article>
    {
        match &self.state
        {
            FeedState::Ready { articles, shown } => articles.get(*shown),
            FeedState::Loading | FeedState::Failed(_) => None,
        }
    }

    /// Asks for a new random article. Used as the slider's completion
    /// callback.
    pub const fn request_refresh(&mut self)
    {
        self.refresh_requested = true;
    }

    /// Takes a pending refresh request.
    ///
    /// # Returns
    ///
    /// `true` if a refresh was requested since the last call.
    pub const fn take_refresh_request(&mut self) -> bool
    {
        let requested = self.refresh_requested;
        self.refresh_requested = false;
        requested
    }

    /// Goes back to loading after a failed initial fetch.
    ///
    /// # Returns
    ///
    /// `true` if the screen was in the error state and a new initial fetch
    /// should be issued.
    pub fn reload(&mut self) -> bool
    {
        if matches!(self.state, FeedState::Failed(_))
        {
            self.state = FeedState::Loading;
            true
        }
        else
        {
            false
        }
    }

    /// Applies the result of the initial fetch.
    ///
    /// Shows the top headline on success, the error message otherwise.
    pub fn apply_initial(&mut self, result: Result<Vec<Article>>)
    {
        match result
        {
            Ok(articles) if !articles.is_empty() =>
            {
                log::info!("Loaded {} headlines", articles.len());
                self.show(articles, 0);
            }
            Ok(_) =>
            {
                self.fail("Headline feed contained no articles".to_owned());
            }
            Err(err) =>
            {
                self.fail(format!("{err:#}"));
            }
        }
    }

    /// Applies the result of a swipe-triggered fetch.
    ///
    /// Shows a uniformly random article of the new page. On failure the
    /// article on display stays as it is and the error is only logged.
    pub fn apply_refresh<R: Rng>(&mut self, result: Result<Vec<Article>>, rng: &mut R)
    {
        match result
        {
            Ok(articles) if !articles.is_empty() =>
            {
                let index = rng.gen_range(0..articles.len());
                log::info!("Showing headline {index} of {}", articles.len());
                self.show(articles, index);
            }
            Ok(_) =>
            {
                log::error!("Error fetching new news: feed contained no articles");
            }
            Err(err) =>
            {
                log::error!("Error fetching new news: {err:#}");
            }
        }
    }

    /// Displays `articles[shown]`, starting the reveal on first use.
    fn show(&mut self, articles: Vec<Article>, shown: usize)
    {
        self.state = FeedState::Ready { articles, shown };

        if self.reveal == Reveal::Pending
        {
            self.reveal = Reveal::Running(Duration::ZERO);
        }
    }

    /// Enters the error state shown in place of the card.
    fn fail(&mut self, message: String)
    {
        log::error!("Initial headline fetch failed: {message}");
        self.state = FeedState::Failed(message);
    }

    /// Advances the reveal animation.
    pub fn tick(&mut self, elapsed: Duration)
    {
        if let Reveal::Running(progress) = self.reveal
        {
            let progress = progress.saturating_add(elapsed);
            self.reveal = if progress >= REVEAL_DURATION
            {
                Reveal::Done
            }
            else
            {
                Reveal::Running(progress)
            };
        }
    }

    /// Whether the card is still animating in.
    #[must_use]
    pub const fn is_revealing(&self) -> bool
    {
        matches!(self.reveal, Reveal::Running(_))
    }

    /// Fraction of the reveal completed, in `[0, 1]`.
    fn reveal_fraction(&self) -> f32
    {
        match self.reveal
        {
            Reveal::Pending => 0.0,
            Reveal::Running(progress) =>
            {
                (progress.as_secs_f32() / REVEAL_DURATION.as_secs_f32()).min(1.0)
            }
            Reveal::Done => 1.0,
        }
    }

    /// Renders the screen to the specified area.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render to
    /// * `area` - The area within the frame to render the screen
    /// * `spinner_frame` - Animation step for the loading indicator
    pub fn render(&self, frame: &mut Frame, area: Rect, spinner_frame: usize)
    {
        match &self.state
        {
            FeedState::Loading =>
            {
                let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
                let loading = Paragraph::new(format!("{spinner} Loading..."))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(loading, area);
            }
            FeedState::Failed(message) =>
            {
                let text = Text::from(vec![
                    Line::styled(format!("Error: {message}"), ERROR_STYLE),
                    Line::from(""),
                    Line::styled("Press r to reload or q to quit", FADED_STYLE),
                ]);
                let error = Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(error, area);
            }
            FeedState::Ready { articles, shown } =>
            {
                if let Some(article) = articles.get(*shown)
                {
                    self.render_card(frame, area, article);
                }
            }
        }
    }

    /// Renders the article card, sliding and fading it in while the reveal
    /// runs.
    fn render_card(&self, frame: &mut Frame, area: Rect, article: &Article)
    {
        let fraction = self.reveal_fraction();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lift = (f32::from(REVEAL_LIFT) * (1.0 - fraction)).round() as u16;
        let lift = lift.min(area.height);

        let card_area = Rect {
            y: area.y + lift,
            height: area.height - lift,
            ..area
        };

        let style = if fraction < 0.5 { FADED_STYLE } else { CARD_STYLE };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(article.source_name().unwrap_or("Top headline"))
            .style(style);
        let inner = block.inner(card_area);
        frame.render_widget(block, card_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let image = article
            .url_to_image
            .as_deref()
            .unwrap_or("(no image)");
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Image: ", TITLE_STYLE),
                Span::raw(image),
            ])),
            chunks[0],
        );

        let wrap_width = usize::from(chunks[1].width.max(1));
        let mut lines: Vec<Line> = vec![Line::from("")];

        lines.extend(
            wrap(&article.title, wrap_width)
                .into_iter()
                .map(|part| Line::styled(part.into_owned(), TITLE_STYLE)),
        );
        lines.push(Line::from(article.formatted_date()));

        if let Some(description) = &article.description
        {
            lines.push(Line::from(""));
            lines.extend(
                wrap(description, wrap_width)
                    .into_iter()
                    .map(|part| Line::from(part.into_owned())),
            );
        }

        frame.render_widget(Paragraph::new(Text::from(lines)), chunks[1]);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use anyhow::anyhow;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn articles(count: usize) -> Vec<Article>
    {
        (0..count)
            .map(|index| Article {
                title: format!("Headline {index}"),
                url_to_image: Some(format!("https://img.example/{index}.jpg")),
                published_at: "2024-01-10T09:00:00Z".to_owned(),
                ..Article::default()
            })
            .collect()
    }

    /// Renders the screen and returns the buffer as one string.
    fn draw(screen: &NewsScreen) -> String
    {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                screen.render(frame, area, 0);
            })
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn starts_loading()
    {
        let screen = NewsScreen::new();

        assert_eq!(screen.state(), &FeedState::Loading);
        assert!(screen.current_article().is_none());
        assert!(draw(&screen).contains("Loading..."));
    }

    #[test]
    fn initial_load_shows_top_headline()
    {
        let mut screen = NewsScreen::new();

        screen.apply_initial(Ok(articles(5)));

        assert_eq!(
            screen.current_article().map(|article| article.title.as_str()),
            Some("Headline 0")
        );
        assert!(screen.is_revealing());

        screen.tick(REVEAL_DURATION);
        let rendered = draw(&screen);
        assert!(rendered.contains("Headline 0"));
        assert!(rendered.contains("10 Jan 2024"));
        assert!(rendered.contains("https://img.example/0.jpg"));
    }

    #[test]
    fn initial_failure_shows_message_and_no_article()
    {
        let mut screen = NewsScreen::new();

        screen.apply_initial(Err(anyhow!("Failed to fetch data")));

        assert_eq!(
            screen.state(),
            &FeedState::Failed("Failed to fetch data".to_owned())
        );
        assert!(screen.current_article().is_none());

        let rendered = draw(&screen);
        assert!(rendered.contains("Error: Failed to fetch data"));
        assert!(!rendered.contains("Headline"));
    }

    #[test]
    fn empty_initial_page_is_an_error()
    {
        let mut screen = NewsScreen::new();

        screen.apply_initial(Ok(Vec::new()));

        assert!(matches!(screen.state(), FeedState::Failed(_)));
    }

    #[test]
    fn refresh_picks_index_within_page()
    {
        let mut screen = NewsScreen::new();
        let mut rng = StdRng::seed_from_u64(7);
        screen.apply_initial(Ok(articles(1)));

        for count in 1..=12
        {
            screen.apply_refresh(Ok(articles(count)), &mut rng);

            match screen.state()
            {
                FeedState::Ready { articles, shown } =>
                {
                    assert_eq!(articles.len(), count);
                    assert!(*shown < count);
                }
                other => panic!("unexpected state {other:?}"),
            }
        }
    }

    #[test]
    fn refresh_eventually_visits_every_index()
    {
        let mut screen = NewsScreen::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        screen.apply_initial(Ok(articles(4)));

        for _ in 0..200
        {
            screen.apply_refresh(Ok(articles(4)), &mut rng);
            if let FeedState::Ready { shown, .. } = screen.state()
            {
                seen[*shown] = true;
            }
        }

        assert!(seen.iter().all(|visited| *visited));
    }

    #[test]
    fn refresh_failure_keeps_current_article()
    {
        let mut screen = NewsScreen::new();
        let mut rng = StdRng::seed_from_u64(1);
        screen.apply_initial(Ok(articles(3)));
        let before = screen.state().clone();

        screen.apply_refresh(Err(anyhow!("network down")), &mut rng);
        assert_eq!(screen.state(), &before);

        screen.apply_refresh(Ok(Vec::new()), &mut rng);
        assert_eq!(screen.state(), &before);
    }

    #[test]
    fn reveal_runs_once()
    {
        let mut screen = NewsScreen::new();
        let mut rng = StdRng::seed_from_u64(3);
        screen.apply_initial(Ok(articles(2)));

        screen.tick(Duration::from_millis(600));
        assert!(screen.is_revealing());
        screen.tick(Duration::from_millis(600));
        assert!(!screen.is_revealing());

        screen.apply_refresh(Ok(articles(2)), &mut rng);
        assert!(!screen.is_revealing());
    }

    #[test]
    fn refresh_requests_are_drained()
    {
        let mut screen = NewsScreen::new();

        assert!(!screen.take_refresh_request());
        screen.request_refresh();
        assert!(screen.take_refresh_request());
        assert!(!screen.take_refresh_request());
    }

    #[test]
    fn reload_only_from_error()
    {
        let mut screen = NewsScreen::new();
        assert!(!screen.reload());

        screen.apply_initial(Err(anyhow!("boom")));
        assert!(screen.reload());
        assert_eq!(screen.state(), &FeedState::Loading);
    }
}
