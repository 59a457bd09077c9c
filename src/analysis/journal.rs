//! Journal pattern analysis
//!
//! Buckets journal entries in a timeframe into topic frequencies and their
//! month-by-month evolution, mood mentions, checkbox habits with streaks,
//! and tagged project status logs.

use super::dates::{parse_timeframe, DateRange};
use super::{fetch_contents, PageContent};
use crate::graph::{links, walk, Page};
use crate::provider::{GraphProvider, ProviderResult};
use crate::report::{page_ref, percent, Markdown};
use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::info;

static HABIT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*-\s+\[([ xX])\]\s+(.+?)\s*$").expect("habit line pattern")
});

/// Substrings that mark a block as a mood mention, matched case-insensitively.
pub const MOOD_INDICATORS: &[&str] = &[
    "😊", "😀", "😄", "🙂", "😢", "😞", "😠", "😴", "😰", "🎉", "❤️",
    "mood:", "feeling:", "happy", "sad", "excited", "anxious", "tired", "grateful",
    "stressed", "calm", "frustrated",
];

const TOP_TOPICS: usize = 10;
const DEFAULT_PROJECT: &str = "general";

#[derive(Debug, Clone, PartialEq)]
pub struct MoodMention {
    pub date: NaiveDate,
    pub indicator: String,
    /// The whole block the indicator was found in
    pub context: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitEntry {
    pub date: NaiveDate,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitStats {
    pub label: String,
    pub entries: Vec<HabitEntry>,
    pub completed: usize,
    pub current_streak: usize,
    pub longest_streak: usize,
}

impl HabitStats {
    fn new(label: String, entries: Vec<HabitEntry>) -> Self {
        let done: Vec<bool> = entries.iter().map(|e| e.done).collect();
        let (current_streak, longest_streak) = streaks(&done);
        Self {
            label,
            completed: done.iter().filter(|d| **d).count(),
            entries,
            current_streak,
            longest_streak,
        }
    }

    pub fn completion_rate(&self) -> f64 {
        if self.entries.is_empty() {
            0.0
        } else {
            self.completed as f64 / self.entries.len() as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalPatterns {
    pub range: DateRange,
    pub entries: usize,
    /// Top topics by mention count; empty when topics were not requested
    pub topics: Vec<(String, usize)>,
    /// Distinct topics per `yyyy-mm`
    pub topic_evolution: BTreeMap<String, BTreeSet<String>>,
    /// Mood mentions per `yyyy-mm`, in date order
    pub moods: BTreeMap<String, Vec<MoodMention>>,
    pub habits: Vec<HabitStats>,
    /// Chronological status log per project
    pub projects: BTreeMap<String, Vec<StatusEntry>>,
    include_mood: bool,
    include_topics: bool,
}

/// `(current, longest)` streaks of `true` in a chronological sequence.
///
/// The current streak is the run ending at the last entry.
pub fn streaks(done: &[bool]) -> (usize, usize) {
    let mut running = 0;
    let mut longest = 0;
    for &d in done {
        running = if d { running + 1 } else { 0 };
        longest = longest.max(running);
    }
    (running, longest)
}

/// Journal analysis parameters
#[derive(Debug, Clone)]
pub struct JournalAnalysis {
    pub timeframe: String,
    pub include_mood: bool,
    pub include_topics: bool,
}

impl Default for JournalAnalysis {
    fn default() -> Self {
        Self {
            timeframe: "last 30 days".to_string(),
            include_mood: true,
            include_topics: true,
        }
    }
}

impl JournalAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    pub fn include_mood(mut self, include: bool) -> Self {
        self.include_mood = include;
        self
    }

    pub fn include_topics(mut self, include: bool) -> Self {
        self.include_topics = include;
        self
    }

    pub async fn run(
        &self,
        provider: &dyn GraphProvider,
        now: DateTime<Local>,
    ) -> ProviderResult<JournalPatterns> {
        let range = parse_timeframe(&self.timeframe, now);
        let pages = provider.fetch_all_pages().await?;
        let journals = journal_pages_in(&pages, &range);
        let contents = fetch_contents(provider, journals).await;
        let patterns = self.analyze(range, &contents);
        info!(
            timeframe = %patterns.range.title,
            entries = patterns.entries,
            habits = patterns.habits.len(),
            "journal analysis complete"
        );
        Ok(patterns)
    }

    /// Analyze journal entries, which must already be in ascending date order.
    pub fn analyze(&self, range: DateRange, entries: &[PageContent]) -> JournalPatterns {
        let mut topic_counts: HashMap<String, usize> = HashMap::new();
        let mut topic_evolution: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut moods: BTreeMap<String, Vec<MoodMention>> = BTreeMap::new();
        let mut habits: BTreeMap<String, Vec<HabitEntry>> = BTreeMap::new();
        let mut projects: BTreeMap<String, Vec<StatusEntry>> = BTreeMap::new();

        for entry in entries {
            let Some(day) = entry.page.journal_day else {
                continue;
            };
            let date = day.date();
            let month = day.month_key();

            for text in walk::contents(&entry.blocks) {
                if self.include_topics {
                    for topic in links::extract_topics(text) {
                        *topic_counts.entry(topic.clone()).or_insert(0) += 1;
                        topic_evolution.entry(month.clone()).or_default().insert(topic);
                    }
                }
                if self.include_mood {
                    if let Some(indicator) = mood_indicator(text) {
                        moods.entry(month.clone()).or_default().push(MoodMention {
                            date,
                            indicator: indicator.to_string(),
                            context: text.trim().to_string(),
                        });
                    }
                }
                if let Some((project, status)) = project_status(text) {
                    projects
                        .entry(project)
                        .or_default()
                        .push(StatusEntry { date, status });
                }
            }

            for cap in HABIT_LINE.captures_iter(&entry.text) {
                let label = normalize_habit(&cap[2]);
                if label.is_empty() {
                    continue;
                }
                habits.entry(label).or_default().push(HabitEntry {
                    date,
                    done: !cap[1].trim().is_empty(),
                });
            }
        }

        let mut topics: Vec<(String, usize)> = topic_counts.into_iter().collect();
        topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        topics.truncate(TOP_TOPICS);

        JournalPatterns {
            range,
            entries: entries.len(),
            topics,
            topic_evolution,
            moods,
            habits: habits
                .into_iter()
                .map(|(label, entries)| HabitStats::new(label, entries))
                .collect(),
            projects,
            include_mood: self.include_mood,
            include_topics: self.include_topics,
        }
    }
}

/// Journal pages whose day falls in `range`, ascending by day.
pub fn journal_pages_in<'a>(pages: &'a [Page], range: &DateRange) -> Vec<&'a Page> {
    let mut journals: Vec<&Page> = pages
        .iter()
        .filter(|p| p.is_journal)
        .filter(|p| p.journal_day.is_some_and(|d| range.contains_day(d.date())))
        .collect();
    journals.sort_by_key(|p| p.journal_day);
    journals
}

fn mood_indicator(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    MOOD_INDICATORS.iter().copied().find(|m| lowered.contains(m))
}

/// Habit labels compare case-insensitively with references unwrapped.
fn normalize_habit(label: &str) -> String {
    label
        .replace("[[", "")
        .replace("]]", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!', ','])
        .to_lowercase()
}

/// `(project, status)` for a `#project/<name>` or `#status` line.
fn project_status(text: &str) -> Option<(String, String)> {
    let tags = links::extract_tags(text);
    let project = tags
        .iter()
        .find_map(|t| t.strip_prefix("project/").filter(|p| !p.is_empty()))
        .map(str::to_string)
        .or_else(|| {
            tags.iter().any(|t| t == "status").then(|| {
                links::extract_references(text)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| DEFAULT_PROJECT.to_string())
            })
        })?;
    Some((project, text.trim().to_string()))
}

impl JournalPatterns {
    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1(format!("Journal Patterns: {}", self.range.title));

        if self.entries == 0 {
            md.para(format!("No journal entries found for {}.", self.range.title));
            return md.finish();
        }

        md.h2("Overview");
        md.bullet(format!("Entries analyzed: {}", self.entries));
        md.bullet(format!(
            "Period: {} to {}",
            self.range.start_date(),
            self.range.end_date()
        ));

        if self.include_topics {
            md.h2("Top Topics");
            if self.topics.is_empty() {
                md.para("No topics referenced.");
            }
            for (topic, count) in &self.topics {
                md.bullet(format!("{} ({} mentions)", page_ref(topic), count));
            }

            if !self.topic_evolution.is_empty() {
                md.h2("Topic Evolution");
                for (month, topics) in &self.topic_evolution {
                    md.h3(month);
                    let refs: Vec<String> = topics.iter().map(|t| page_ref(t)).collect();
                    md.bullet(refs.join(", "));
                }
            }
        }

        if self.include_mood {
            md.h2("Mood Patterns");
            if self.moods.is_empty() {
                md.para("No mood indicators found.");
            }
            for (month, mentions) in &self.moods {
                md.h3(month);
                for mention in mentions {
                    md.bullet(format!(
                        "{} ({}): {}",
                        mention.date, mention.indicator, mention.context
                    ));
                }
            }
        }

        md.h2("Habits");
        if self.habits.is_empty() {
            md.para("No habit checkboxes found.");
        }
        for habit in &self.habits {
            md.bullet(format!(
                "{}: {}/{} completed ({}), current streak {}, longest streak {}",
                habit.label,
                habit.completed,
                habit.entries.len(),
                percent(habit.completion_rate()),
                habit.current_streak,
                habit.longest_streak
            ));
        }

        if !self.projects.is_empty() {
            md.h2("Projects");
            for (project, log) in &self.projects {
                md.h3(project);
                for status in log {
                    md.bullet(format!("{}: {}", status.date, status.status));
                }
            }
        }

        md.finish()
    }
}
