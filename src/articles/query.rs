//! Filtering and sorting of the article collection for display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::Article;

/// Ordering applied to the canonical collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Newest first.
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// By the first badge label.
    Tag,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [Self::DateDesc, Self::DateAsc, Self::Tag];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::Tag => "tag",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DateDesc => "Newest first",
            Self::DateAsc => "Oldest first",
            Self::Tag => "By tag",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "tag" => Ok(Self::Tag),
            _ => Err(format!("unknown sort mode '{s}'")),
        }
    }
}

/// Articles carrying a badge labeled `tag`, in collection order.
///
/// With no tag the whole collection is returned unchanged.
#[must_use]
pub fn filter<'a>(articles: &'a [Article], tag: Option<&str>) -> Vec<&'a Article> {
    match tag {
        None => articles.iter().collect(),
        Some(tag) => articles.iter().filter(|a| a.has_badge(tag)).collect(),
    }
}

/// Reorder the collection in place.
///
/// Unparseable dates sort after all valid ones in both date modes. The sort
/// is stable, so equal keys keep their previous relative order.
pub fn sort(articles: &mut [Article], mode: SortMode) {
    match mode {
        SortMode::DateDesc => {
            articles.sort_by(|a, b| by_date(a, b, |x, y| y.cmp(x)));
        }
        SortMode::DateAsc => {
            articles.sort_by(|a, b| by_date(a, b, |x, y| x.cmp(y)));
        }
        SortMode::Tag => articles.sort_by(by_first_badge),
    }
}

fn by_date(
    a: &Article,
    b: &Article,
    order: impl Fn(&NaiveDateTime, &NaiveDateTime) -> Ordering,
) -> Ordering {
    match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(x), Some(y)) => order(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_first_badge(a: &Article, b: &Article) -> Ordering {
    match (a.badges.first(), b.badges.first()) {
        (Some(x), Some(y)) => x
            .text
            .to_lowercase()
            .cmp(&y.text.to_lowercase())
            .then_with(|| x.text.cmp(&y.text)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse an article date into a comparable timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // Bare year
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }

    // Year-month only
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// The currently selected tag filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    current: Option<String>,
}

impl TagFilter {
    #[must_use]
    pub fn new(current: Option<String>) -> Self {
        Self { current }
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Select `tag`, or clear the filter if `tag` is already selected.
    pub fn toggle(&mut self, tag: &str) {
        if self.current.as_deref() == Some(tag) {
            self.current = None;
        } else {
            self.current = Some(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The filter value that clicking `tag` would produce.
    #[must_use]
    pub fn toggled(&self, tag: &str) -> Option<String> {
        let mut next = self.clone();
        next.toggle(tag);
        next.current
    }
}

/// A selectable filter chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub text: String,
    pub color: String,
    pub active: bool,
}

/// Distinct badge labels across the whole collection, in first-seen order.
///
/// Each chip takes the color of the first badge with that label.
#[must_use]
pub fn tag_chips(articles: &[Article], current: Option<&str>) -> Vec<TagChip> {
    let mut chips: Vec<TagChip> = Vec::new();
    for badge in articles.iter().flat_map(|a| a.badges.iter()) {
        if chips.iter().any(|c| c.text == badge.text) {
            continue;
        }
        chips.push(TagChip {
            text: badge.text.clone(),
            color: badge.color.clone(),
            active: current == Some(badge.text.as_str()),
        });
    }
    chips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::Badge;

    fn article(id: i64, date: &str, tags: &[&str]) -> Article {
        Article {
            id,
            title: format!("Article {id}"),
            date: date.to_string(),
            badges: tags.iter().map(|t| Badge::new(*t, "#fff")).collect(),
            summary: String::new(),
            content: String::new(),
        }
    }

    fn ids(articles: &[Article]) -> Vec<i64> {
        articles.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_filter_none_returns_everything_in_order() {
        let articles = vec![article(1, "2024-01-01", &["x"]), article(2, "2023-01-01", &[])];
        let out = filter(&articles, None);
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_filter_single_article_scenario() {
        let articles = vec![article(1, "2024-01-01", &["x"])];
        assert_eq!(filter(&articles, Some("x")).len(), 1);
        assert!(filter(&articles, Some("y")).is_empty());
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let articles = vec![
            article(1, "2024-01-01", &["a", "b"]),
            article(2, "2024-01-02", &["b"]),
            article(3, "2024-01-03", &["a"]),
            article(4, "2024-01-04", &["c", "a"]),
        ];
        let out: Vec<i64> = filter(&articles, Some("a")).iter().map(|a| a.id).collect();
        assert_eq!(out, vec![1, 3, 4]);
        assert_eq!(ids(&articles), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_desc_then_asc_reverses() {
        let mut articles = vec![
            article(1, "2024-03-01", &[]),
            article(2, "2022-01-15", &[]),
            article(3, "2023-07-30", &[]),
        ];
        sort(&mut articles, SortMode::DateDesc);
        let desc = ids(&articles);
        assert_eq!(desc, vec![1, 3, 2]);
        sort(&mut articles, SortMode::DateAsc);
        let mut reversed = desc.clone();
        reversed.reverse();
        assert_eq!(ids(&articles), reversed);
    }

    #[test]
    fn test_invalid_dates_sort_last_both_ways() {
        let mut articles = vec![
            article(1, "garbage", &[]),
            article(2, "2024-01-01", &[]),
            article(3, "", &[]),
            article(4, "2020-01-01", &[]),
        ];
        sort(&mut articles, SortMode::DateDesc);
        assert_eq!(ids(&articles), vec![2, 4, 1, 3]);
        sort(&mut articles, SortMode::DateAsc);
        assert_eq!(ids(&articles), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_sort_by_tag() {
        let mut articles = vec![
            article(1, "", &["zeta"]),
            article(2, "", &[]),
            article(3, "", &["Alpha"]),
            article(4, "", &["beta", "aaa"]),
        ];
        sort(&mut articles, SortMode::Tag);
        assert_eq!(ids(&articles), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-01").is_some());
        assert!(parse_date("2024/01/01").is_some());
        assert!(parse_date("2024-01").is_some());
        assert!(parse_date("2024-01-01T10:30").is_some());
        assert!(parse_date("2024-01-01T10:30:00Z").is_some());
        assert!(parse_date("first of may").is_none());
        assert!(parse_date("2024-13-01").is_none());
    }

    #[test]
    fn test_bare_year_and_minute_precision_dates() {
        assert_eq!(
            parse_date("2024"),
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(
            parse_date("2024-03-05 14:30"),
            NaiveDate::from_ymd_opt(2024, 3, 5).and_then(|d| d.and_hms_opt(14, 30, 0))
        );
        assert!(parse_date("20245").is_none());

        let mut articles = vec![
            article(1, "2024", &[]),
            article(2, "2025-01-01", &[]),
            article(3, "2020-01-01", &[]),
        ];
        sort(&mut articles, SortMode::DateAsc);
        assert_eq!(ids(&articles), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_mode_round_trip_names() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert!("newest".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_toggle_twice_clears() {
        let mut f = TagFilter::default();
        f.toggle("x");
        assert_eq!(f.current(), Some("x"));
        f.toggle("x");
        assert_eq!(f.current(), None);

        let mut g = TagFilter::new(Some("y".to_string()));
        let before = g.clone();
        g.toggle("x");
        g.toggle("x");
        assert_eq!(g, TagFilter::default());
        assert_ne!(g, before);
    }

    #[test]
    fn test_toggle_switches_between_tags() {
        let mut f = TagFilter::new(Some("x".to_string()));
        f.toggle("y");
        assert_eq!(f.current(), Some("y"));
        assert_eq!(f.toggled("y"), None);
        assert_eq!(f.toggled("z"), Some("z".to_string()));
    }

    #[test]
    fn test_tag_chips_distinct_and_active() {
        let articles = vec![
            article(1, "", &["x", "y"]),
            article(2, "", &["y", "z", "x"]),
        ];
        let chips = tag_chips(&articles, Some("y"));
        let texts: Vec<&str> = chips.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "y", "z"]);
        assert!(chips[1].active);
        assert!(!chips[0].active && !chips[2].active);
    }
}
