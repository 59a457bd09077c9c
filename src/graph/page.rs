//! Page representation as returned by the Logseq API

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A journal date, stored by Logseq as a `yyyymmdd` integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JournalDay(NaiveDate);

impl JournalDay {
    /// Decode a `yyyymmdd` key. Returns `None` for anything that is not a real date.
    pub fn from_key(key: i64) -> Option<Self> {
        if !(10_101..=99_991_231).contains(&key) {
            return None;
        }
        let year = (key / 10_000) as i32;
        let month = ((key / 100) % 100) as u32;
        let day = (key % 100) as u32;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The `yyyymmdd` integer form.
    pub fn key(&self) -> i64 {
        i64::from(self.0.year()) * 10_000 + i64::from(self.0.month()) * 100 + i64::from(self.0.day())
    }

    /// `yyyy-mm` bucket used for monthly rollups.
    pub fn month_key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }

    /// Page title in Logseq's default journal format, e.g. `Oct 18th, 2026`.
    pub fn page_title(&self) -> String {
        format_journal_title(self.0)
    }
}

impl fmt::Display for JournalDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Format a date as `MMM do, yyyy`.
pub fn format_journal_title(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%b"), day, suffix, date.year())
}

/// A named page in the knowledge graph
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Canonical (lowercased) page name
    pub name: String,
    /// Display form of the name
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(rename = "journal?", default)]
    pub is_journal: bool,
    /// Present only for journal pages; `None` when absent or invalid
    #[serde(default, deserialize_with = "lenient_journal_day")]
    pub journal_day: Option<JournalDay>,
    /// `None` means unknown, never epoch zero
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        let original: String = name.into();
        Self {
            name: original.to_lowercase(),
            original_name: Some(original),
            is_journal: false,
            journal_day: None,
            updated_at: None,
            created_at: None,
            uuid: None,
            id: None,
        }
    }

    /// A journal page for the given date, titled the way Logseq titles it.
    pub fn journal(date: NaiveDate) -> Self {
        let day = JournalDay::from_date(date);
        let mut page = Self::new(day.page_title());
        page.is_journal = true;
        page.journal_day = Some(day);
        page
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Name as the user wrote it
    pub fn display_name(&self) -> &str {
        self.original_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Case-insensitive identity used to resolve references to this page
    pub fn canonical_name(&self) -> String {
        super::links::canonical(&self.name)
    }
}

fn lenient_journal_day<'de, D>(deserializer: D) -> Result<Option<JournalDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(json_integer).and_then(JournalDay::from_key))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

fn json_integer(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Epoch milliseconds or an RFC 3339 string. Non-positive millis are invalid.
fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let serde_json::Value::String(s) = value {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    json_integer(value)
        .filter(|ms| *ms > 0)
        .and_then(DateTime::from_timestamp_millis)
}
