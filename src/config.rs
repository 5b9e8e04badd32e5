//! Runtime configuration.
//!
//! Everything is injected from the command line or the environment, the
//! feed credential in particular is never compiled in.
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

/// Default headline endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
/// Default country filter passed to the feed.
pub const DEFAULT_COUNTRY: &str = "us";
/// Environment variable holding the feed API key.
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Where and how to fetch headlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig
{
    /// Base URL of the headline endpoint, without query
    pub endpoint: String,
    /// Two-letter country code
    pub country: String,
    /// Feed credential
    pub api_key: String,
}

impl FeedConfig
{
    /// Query parameters sent with every headline request.
    ///
    /// # Returns
    ///
    /// `(name, value)` pairs in request order.
    #[must_use]
    pub fn query_pairs(&self) -> [(&str, &str); 2]
    {
        [
            ("country", self.country.as_str()),
            ("apiKey", self.api_key.as_str()),
        ]
    }
}

/// Complete application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings
{
    /// Feed location and credential
    pub feed: FeedConfig,
    /// Fixed slider track width in cells, derived from the layout when unset
    pub track_width: Option<u16>,
    /// Slider handle width in cells
    pub handle_width: u16,
    /// Interval between animation ticks
    pub tick_rate: Duration,
}

/// Builds the command line interface.
///
/// # Returns
///
/// The `clap` command describing every supported argument.
#[must_use]
pub fn command() -> Command
{
    Command::new("swipe_news")
        .about("A terminal headline reader: swipe the slider to fetch a random article")
        .version(clap::crate_version!())
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .env(API_KEY_ENV)
                .hide_env_values(true)
                .value_name("KEY")
                .help("API key for the headline feed"),
        )
        .arg(
            Arg::new("country")
                .long("country")
                .short('c')
                .value_name("CODE")
                .default_value(DEFAULT_COUNTRY)
                .help("Country code for top headlines"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .default_value(DEFAULT_ENDPOINT)
                .help("Headline feed endpoint"),
        )
        .arg(
            Arg::new("track-width")
                .long("track-width")
                .value_name("CELLS")
                .value_parser(value_parser!(u16))
                .help("Fixed slider track width (defaults to the terminal width)"),
        )
        .arg(
            Arg::new("handle-width")
                .long("handle-width")
                .value_name("CELLS")
                .value_parser(value_parser!(u16).range(1..))
                .default_value("6")
                .help("Slider handle width"),
        )
        .arg(
            Arg::new("tick-rate")
                .long("tick-rate")
                .value_name("MS")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("33")
                .help("Animation tick interval in milliseconds"),
        )
        .arg(
            Arg::new("clear-log")
                .long("clear-log")
                .help("Remove the log file and exit")
                .action(ArgAction::SetTrue),
        )
}

impl Settings
{
    /// Extracts settings from parsed arguments.
    ///
    /// # Arguments
    ///
    /// * `matches` - Matches produced by [`command`]
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or blank, or if the track
    /// is too narrow to hold the handle.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self>
    {
        let api_key = matches
            .get_one::<String>("api-key")
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .with_context(|| {
                format!("No API key provided, pass --api-key or set {API_KEY_ENV}")
            })?;

        let country = matches
            .get_one::<String>("country")
            .map_or(DEFAULT_COUNTRY, String::as_str)
            .trim()
            .to_lowercase();

        if country.is_empty()
        {
            bail!("Country code must not be empty");
        }

        let endpoint = matches
            .get_one::<String>("endpoint")
            .map_or(DEFAULT_ENDPOINT, String::as_str)
            .trim_end_matches('?')
            .to_owned();

        let handle_width = matches
            .get_one::<u16>("handle-width")
            .copied()
            .unwrap_or(6);

        let track_width = matches.get_one::<u16>("track-width").copied();

        if let Some(width) = track_width.filter(|width| *width <= handle_width)
        {
            bail!("Track width {width} must be larger than the handle width {handle_width}");
        }

        let tick_rate = Duration::from_millis(
            matches
                .get_one::<u64>("tick-rate")
                .copied()
                .unwrap_or(33),
        );

        Ok(Self {
            feed: FeedConfig {
                endpoint,
                country,
                api_key,
            },
            track_width,
            handle_width,
            tick_rate,
        })
    }
}
