//! Best-effort extraction of RSS `<item>` entries.
//!
//! Feeds are matched with a handful of regexes instead of an XML parser, so
//! broken markup in one item never affects the others. Only the tags needed
//! for an article are read.

use lazy_static::lazy_static;
use regex::Regex;

use super::utils::{decode_entities, strip_html};

lazy_static! {
    static ref ITEM_RE: Regex = Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").unwrap();
    static ref TITLE_RE: Regex = tag_regex("title");
    static ref LINK_RE: Regex = tag_regex("link");
    static ref LINK_HREF_RE: Regex = Regex::new(r#"(?is)<link\b[^>]*\bhref\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref DESCRIPTION_RE: Regex = tag_regex("description");
    static ref PUB_DATE_RE: Regex = tag_regex("pubDate");
    static ref SOURCE_RE: Regex = tag_regex("source");
}

fn tag_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}>")).unwrap()
}

/// Raw fields of one feed item. Missing tags come back empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: Option<String>,
    pub source: Option<String>,
}

/// Extracts up to `limit` entries in document order.
pub fn extract_entries(xml: &str, limit: usize) -> Vec<FeedEntry> {
    ITEM_RE
        .captures_iter(xml)
        .take(limit)
        .filter_map(|caps| caps.get(1))
        .map(|block| parse_entry(block.as_str()))
        .collect()
}

fn parse_entry(block: &str) -> FeedEntry {
    let link = tag_text(&LINK_RE, block)
        .filter(|l| !l.is_empty())
        .or_else(|| {
            LINK_HREF_RE
                .captures(block)
                .and_then(|caps| caps.get(1))
                .map(|m| decode_entities(m.as_str().trim()))
        })
        .unwrap_or_default();

    FeedEntry {
        title: tag_text(&TITLE_RE, block).map(|t| strip_html(&t)).unwrap_or_default(),
        link,
        description: tag_text(&DESCRIPTION_RE, block)
            .map(|d| strip_html(&d))
            .unwrap_or_default(),
        pub_date: tag_text(&PUB_DATE_RE, block).filter(|d| !d.is_empty()),
        source: tag_text(&SOURCE_RE, block)
            .map(|s| strip_html(&s))
            .filter(|s| !s.is_empty()),
    }
}

fn tag_text(re: &Regex, block: &str) -> Option<String> {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(unwrap_cdata(m.as_str())).trim().to_string())
}

fn unwrap_cdata(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .unwrap_or(trimmed)
}
