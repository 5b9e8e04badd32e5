use anyhow::Result;
use log::info;
use ratatui::Terminal;
use ratatui::backend::Backend as RatatuiBackend;
use std::sync::Arc;
use std::time::Duration;
use swipe_news::config::{self, Settings};
use swipe_news::logging::{clear_log_file, init_logging, log_file_path};
use swipe_news::{App, Event, EventHandler, HeadlineSource, NewsClient, SwipeSlider};
use swipe_news::{FetchPurpose, TerminalGuard, init_panic_hook, init_tui, spawn_fetch};

fn main() -> Result<()>
{
    init_panic_hook();

    let log_path = log_file_path()?;

    let matches = config::command()
        // Inform about the log file
        .after_help(format!(
            "Logs are written to {}\nThe API key can also be given through the {} \
             environment variable.",
            log_path.display(),
            config::API_KEY_ENV
        ))
        .get_matches();

    if matches.get_flag("clear-log")
    {
        let removed = clear_log_file(&log_path)?;
        println!("Removed {removed} log file(s)");
        return Ok(());
    }

    init_logging(&log_path)?;

    // Configuration errors are reported before the terminal is taken over
    let settings = Settings::from_matches(&matches)?;

    info!(
        "Starting with feed {} (country {})",
        settings.feed.endpoint, settings.feed.country
    );

    let source: Arc<dyn HeadlineSource> = Arc::new(NewsClient::new(settings.feed.clone()));

    let slider = match settings.track_width
    {
        Some(width) => SwipeSlider::new(settings.handle_width).with_fixed_track_width(width),
        None => SwipeSlider::new(settings.handle_width),
    };

    // Use RAII to ensure terminal cleanup happens
    let _terminal_guard = TerminalGuard::new()?;

    let mut terminal = init_tui()?;

    let event_handler = EventHandler::new(settings.tick_rate);

    // Mount: the screen starts loading right away
    spawn_fetch(
        Arc::clone(&source),
        FetchPurpose::Initial,
        event_handler.sender(),
    );

    run_app(
        &mut terminal,
        App::new(slider),
        &event_handler,
        &source,
        settings.tick_rate,
    )
}

/// Run the main loop
///
/// # Arguments
///
/// * `terminal` - The terminal to draw to
/// * `app` - The app to run
/// * `event_handler` - The event handler to handle events
/// * `source` - Headline source for swipe-triggered fetches
/// * `tick_rate` - Time advanced by each tick event
///
/// # Errors
///
/// Returns an error if the terminal fails to draw to the screen.
fn run_app<T: RatatuiBackend>(
    terminal: &mut Terminal<T>,
    mut app: App,
    event_handler: &EventHandler,
    source: &Arc<dyn HeadlineSource>,
    tick_rate: Duration,
) -> Result<()>
where
    T::Error: Send + Sync + 'static,
{
    let mut rng = rand::thread_rng();

    loop
    {
        terminal.draw(|frame| app.render(frame))?;

        let fetch = match event_handler.next()?
        {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Feed(purpose, result) =>
            {
                app.handle_feed(purpose, result, &mut rng);
                None
            }
            Event::Tick =>
            {
                app.tick(tick_rate);
                None
            }
            // The next draw picks up the new size
            Event::Resize(..) => None,
        };

        if let Some(purpose) = fetch
        {
            spawn_fetch(Arc::clone(source), purpose, event_handler.sender());
        }

        if app.should_quit
        {
            info!("Quitting");
            break;
        }
    }

    Ok(())
}
