//! Feed-path parser
//!
//! Decodes the trending RSS document into [`TrendRecord`] values. The
//! feed uses a vendor namespace (`ht:`) for the trend-specific elements;
//! quick-xml's deserializer strips the namespace prefix, so the serde
//! names below are the local element names. One bad item never fails the
//! document: it is logged and skipped.

use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use crate::parser::ParseError;
use crate::{NewsArticle, TrendImage, TrendRecord};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    approx_traffic: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    picture: Option<String>,
    picture_source: Option<String>,
    #[serde(rename = "news_item", default)]
    news_items: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(rename = "news_item_title")]
    title: Option<String>,
    #[serde(rename = "news_item_source")]
    source: Option<String>,
    #[serde(rename = "news_item_url")]
    url: Option<String>,
}

/// Parser for the trending RSS feed.
pub struct FeedParser;

impl FeedParser {
    /// Parse a feed document into trend records.
    ///
    /// Fails only if the document itself is not valid XML; individual
    /// items missing a title or a parseable timestamp are skipped with a
    /// warning.
    pub fn parse(raw: &str) -> Result<Vec<TrendRecord>, ParseError> {
        let rss: Rss =
            quick_xml::de::from_str(raw).map_err(|e| ParseError::Feed(e.to_string()))?;

        let mut records = Vec::with_capacity(rss.channel.items.len());
        for item in rss.channel.items {
            match Self::convert_item(item) {
                Ok(record) => records.push(record),
                Err(reason) => warn!(reason = %reason, "skipping malformed feed item"),
            }
        }

        Ok(records)
    }

    fn convert_item(item: Item) -> Result<TrendRecord, String> {
        let trend = match item.title {
            Some(title) if !title.trim().is_empty() => title.trim().to_string(),
            _ => return Err("item has no title".to_string()),
        };

        let published = match item.pub_date.as_deref() {
            Some(raw) => DateTime::parse_from_rfc2822(raw.trim())
                .map_err(|e| format!("bad pubDate '{raw}': {e}"))?,
            None => return Err(format!("item '{trend}' has no pubDate")),
        };

        let news_articles = item
            .news_items
            .into_iter()
            .filter_map(|news| {
                let headline = news.title?;
                if headline.trim().is_empty() {
                    return None;
                }
                Some(NewsArticle {
                    headline: headline.trim().to_string(),
                    source: news.source.unwrap_or_default().trim().to_string(),
                    url: news.url.unwrap_or_default().trim().to_string(),
                })
            })
            .collect();

        let image = match item.picture {
            Some(url) if !url.trim().is_empty() => Some(TrendImage {
                url: url.trim().to_string(),
                source: item.picture_source.unwrap_or_default().trim().to_string(),
            }),
            _ => None,
        };

        Ok(TrendRecord {
            trend,
            traffic: item.approx_traffic.unwrap_or_default().trim().to_string(),
            published,
            news_articles,
            image,
        })
    }
}
