//! Client module for fetching the headline feed.
//!
//! Handles network requests for the news reader application.
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{TlsConfig, TlsProvider};

use crate::article::{Article, HeadlineFeed};
use crate::config::FeedConfig;

/// Anything that can produce a page of headlines.
///
/// Implemented by [`NewsClient`] for the real feed and by test doubles.
pub trait HeadlineSource: Send + Sync
{
    /// Fetches one page of headlines.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed is unreachable, answers with a non-OK
    /// status, or carries no articles.
    fn fetch_headlines(&self) -> Result<Vec<Article>>;
}

/// Error body returned by the feed on non-OK responses.
#[derive(Debug, Deserialize)]
struct FeedError
{
    /// Human readable reason
    message: Option<String>,
}

/// Client for fetching headlines.
///
/// Issues a single GET against the configured endpoint per fetch.
pub struct NewsClient
{
    /// HTTP agent, shared by every fetch
    client: Agent,
    /// Endpoint, country and credential
    feed: FeedConfig,
}

impl NewsClient
{
    /// Create a new news client.
    ///
    /// # Arguments
    ///
    /// * `feed` - Endpoint, country and credential to use.
    ///
    /// # Returns
    ///
    /// A new news client.
    #[must_use]
    pub fn new(feed: FeedConfig) -> Self
    {
        // Status codes are inspected by hand so the feed's error message
        // survives.
        let client = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .tls_config(
                TlsConfig::builder()
                    .provider(TlsProvider::NativeTls)
                    .build(),
            )
            .build();

        Self {
            client: client.into(),
            feed,
        }
    }
}

impl HeadlineSource for NewsClient
{
    fn fetch_headlines(&self) -> Result<Vec<Article>>
    {
        log::debug!(
            "Requesting headlines from {} (country {})",
            self.feed.endpoint,
            self.feed.country
        );

        let mut request = self.client.get(&self.feed.endpoint);
        for (name, value) in self.feed.query_pairs()
        {
            request = request.query(name, value);
        }

        let response = request
            .call()
            .context("Failed to fetch headlines")?;

        let status = response.status();

        let mut response_body = String::new();
        response
            .into_body()
            .into_reader()
            .read_to_string(&mut response_body)
            .context("Failed to read headline feed content")?;

        if !status.is_success()
        {
            return Err(status_error(status.as_u16(), &response_body));
        }

        parse_feed(&response_body)
    }
}

/// Builds the error for a non-OK feed response.
///
/// # Arguments
///
/// * `status` - HTTP status code
/// * `body` - Response body, possibly a JSON error object
fn status_error(status: u16, body: &str) -> anyhow::Error
{
    match serde_json::from_str::<FeedError>(body)
        .ok()
        .and_then(|error| error.message)
    {
        Some(message) => anyhow!("Failed to fetch data (HTTP {status}): {message}"),
        None => anyhow!("Failed to fetch data (HTTP {status})"),
    }
}

/// Parses a feed body into its articles.
///
/// # Arguments
///
/// * `body` - JSON text of the feed response
///
/// # Returns
///
/// The articles, top headline first.
///
/// # Errors
///
/// Returns an error if the body is not a feed or the feed has no articles.
pub fn parse_feed(body: &str) -> Result<Vec<Article>>
{
    let feed: HeadlineFeed =
        serde_json::from_str(body).context("Failed to parse headline feed")?;

    if feed.articles.is_empty()
    {
        bail!("Headline feed contained no articles");
    }

    Ok(feed.articles)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn parses_articles_in_order()
    {
        let body = r#"{"articles":[
            {"title":"Top","urlToImage":null,"publishedAt":"2024-01-10T00:00:00Z"},
            {"title":"Next","urlToImage":"https://img/1","publishedAt":"2024-01-09T00:00:00Z"}
        ]}"#;

        let articles = parse_feed(body).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Top");
        assert_eq!(articles[1].title, "Next");
    }

    #[test]
    fn empty_feed_is_an_error()
    {
        let err = parse_feed(r#"{"status":"ok","articles":[]}"#).unwrap_err();

        assert!(err.to_string().contains("no articles"));
    }

    #[test]
    fn garbage_is_an_error()
    {
        assert!(parse_feed("<html>").is_err());
    }

    #[test]
    fn status_error_keeps_feed_message()
    {
        let err = status_error(
            401,
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#,
        );

        assert_eq!(
            err.to_string(),
            "Failed to fetch data (HTTP 401): Your API key is invalid."
        );
    }

    /// Serves one canned HTTP response on a loopback port.
    ///
    /// # Returns
    ///
    /// The base URL to request and a receiver for the raw request head.
    fn serve_once(status_line: &str, body: &str) -> (String, mpsc::Receiver<String>)
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: \
             {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut chunk = [0_u8; 1024];

            while !head.windows(4).any(|window| window == b"\r\n\r\n")
            {
                let read = stream.read(&mut chunk).unwrap();
                if read == 0
                {
                    break;
                }
                head.extend_from_slice(&chunk[..read]);
            }

            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            sender
                .send(String::from_utf8_lossy(&head).into_owned())
                .unwrap();
        });

        (format!("http://{address}/v2/top-headlines"), receiver)
    }

    fn client_for(endpoint: String) -> NewsClient
    {
        NewsClient::new(FeedConfig {
            endpoint,
            country: "us".to_owned(),
            api_key: "test-key".to_owned(),
        })
    }

    #[test]
    fn fetch_sends_query_and_parses_body()
    {
        let (endpoint, request) = serve_once(
            "200 OK",
            r#"{"status":"ok","articles":[{"title":"Local","urlToImage":null,"publishedAt":"2024-01-10T00:00:00Z"}]}"#,
        );

        let articles = client_for(endpoint).fetch_headlines().unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Local");

        let head = request
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        let request_line = head.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /v2/top-headlines?"));
        assert!(request_line.contains("country=us"));
        assert!(request_line.contains("apiKey=test-key"));
    }

    #[test]
    fn fetch_reports_feed_error_message()
    {
        let (endpoint, _request) = serve_once(
            "401 Unauthorized",
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#,
        );

        let err = client_for(endpoint)
            .fetch_headlines()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to fetch data (HTTP 401): Your API key is invalid."
        );
    }

    #[test]
    fn fetch_rejects_empty_page()
    {
        let (endpoint, _request) = serve_once("200 OK", r#"{"status":"ok","articles":[]}"#);

        let err = client_for(endpoint)
            .fetch_headlines()
            .unwrap_err();

        assert!(err.to_string().contains("no articles"));
    }

    #[test]
    fn status_error_without_body()
    {
        assert_eq!(
            status_error(503, "").to_string(),
            "Failed to fetch data (HTTP 503)"
        );
    }
}
