//! Article model for the headline feed.
//!
//! Mirrors the subset of the feed's JSON the reader actually displays.
use chrono::DateTime;
use serde::Deserialize;

/// Display format for publication dates, e.g. `10 Jan 2024`.
const DATE_FORMAT: &str = "%d %b %Y";

/// Response envelope of the headline feed.
///
/// Fields such as `status` and `totalResults` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadlineFeed
{
    /// Articles in feed order, top headline first
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleSource
{
    /// Human readable publisher name
    #[serde(default)]
    pub name: Option<String>,
}

/// A single headline as delivered by the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article
{
    /// Headline text
    #[serde(default)]
    pub title: String,
    /// Lead image, the feed sends `null` for some articles
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// Publication timestamp, RFC 3339 in practice
    #[serde(default)]
    pub published_at: String,
    /// Short summary
    #[serde(default)]
    pub description: Option<String>,
    /// Publisher
    #[serde(default)]
    pub source: Option<ArticleSource>,
}

impl Article
{
    /// Formats the publication date as `DD Mon YYYY`.
    ///
    /// # Returns
    ///
    /// The formatted date, or the raw timestamp when it cannot be parsed.
    #[must_use]
    pub fn formatted_date(&self) -> String
    {
        DateTime::parse_from_rfc3339(self.published_at.trim()).map_or_else(
            |_| self.published_at.clone(),
            |date| date.format(DATE_FORMAT).to_string(),
        )
    }

    /// Returns the publisher name if the feed provided one.
    #[must_use]
    pub fn source_name(&self) -> Option<&str>
    {
        self.source
            .as_ref()
            .and_then(|source| source.name.as_deref())
    }
}
