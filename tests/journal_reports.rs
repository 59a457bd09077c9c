//! Journal summaries and journal pattern reports end to end

mod common;

use common::{day, fixed_now, TestGraph};
use pagegraph::{JournalAnalysis, JournalSummary};

fn habit_graph() -> TestGraph {
    TestGraph::new()
        .journal(day(2026, 10, 10), &["[x] exercise", "feeling happy about [[Garden]]"])
        .journal(day(2026, 10, 12), &["[x] Exercise", "planted bulbs in the [[Garden]]"])
        .journal(day(2026, 10, 14), &["[ ] exercise", "tired, read about [[Compost]]"])
        .journal(
            day(2026, 10, 16),
            &["[x] exercise", "#project/greenhouse frame is up", "[[Garden]] #status watering fixed"],
        )
        // Outside the default 30-day window
        .journal(day(2026, 8, 1), &["[x] exercise", "[[Old Topic]]"])
        .page("Garden", &["a page, not a journal"])
}

#[tokio::test]
async fn summary_with_no_entries_echoes_the_requested_range() {
    let api = TestGraph::new()
        .journal(day(2026, 10, 1), &["earlier this month"])
        .page("Notes", &["not a journal"])
        .api();

    let report = api.get_journal_summary("today").await.unwrap();

    assert!(report.starts_with("# Journal Summary: Today"));
    assert!(report.contains("No journal entries found for today."));
}

#[tokio::test]
async fn summary_lists_entries_in_date_order_with_mentions() {
    let provider = habit_graph()
        .journal(day(2026, 10, 18), &["morning notes on [[Garden]] and [[Compost]]"])
        .build();

    let summary = JournalSummary::build(&provider, "last month", fixed_now())
        .await
        .unwrap();
    assert!(summary.entries.is_empty());
    assert_eq!(summary.range.title, "September 2026");

    let summary = JournalSummary::build(&provider, "this month", fixed_now())
        .await
        .unwrap();
    let days: Vec<String> = summary.entries.iter().map(|e| e.day.to_string()).collect();
    assert_eq!(
        days,
        vec!["2026-10-10", "2026-10-12", "2026-10-14", "2026-10-16", "2026-10-18"]
    );
    assert_eq!(summary.mentions[0], ("Garden".to_string(), 4));

    let report = summary.to_markdown();
    assert!(report.contains("## 2026-10-10"));
    assert!(report.contains("## Frequently Mentioned"));
    assert!(report.contains("- [[Garden]] (4)"));
}

#[tokio::test]
async fn habit_streaks_follow_the_entry_order() {
    let provider = habit_graph().build();

    let patterns = JournalAnalysis::new()
        .run(&provider, fixed_now())
        .await
        .unwrap();

    assert_eq!(patterns.entries, 4);
    assert_eq!(patterns.habits.len(), 1);
    let exercise = &patterns.habits[0];
    assert_eq!(exercise.label, "exercise");
    assert_eq!(exercise.entries.len(), 4);
    assert_eq!(exercise.completed, 3);
    assert_eq!(exercise.longest_streak, 2);
    assert_eq!(exercise.current_streak, 1);
}

#[tokio::test]
async fn patterns_cover_topics_moods_and_projects() {
    let provider = habit_graph().build();

    let patterns = JournalAnalysis::new()
        .run(&provider, fixed_now())
        .await
        .unwrap();

    assert_eq!(patterns.topics[0].0, "Garden");
    assert!(patterns.topics.iter().all(|(t, _)| t != "Old Topic"));
    assert!(patterns.topic_evolution["2026-10"].contains("Compost"));

    let october = &patterns.moods["2026-10"];
    let indicators: Vec<&str> = october.iter().map(|m| m.indicator.as_str()).collect();
    assert!(indicators.contains(&"happy"));
    assert!(indicators.contains(&"tired"));

    assert_eq!(patterns.projects["greenhouse"].len(), 1);
    assert_eq!(
        patterns.projects["Garden"][0].status,
        "[[Garden]] #status watering fixed"
    );

    let report = patterns.to_markdown();
    assert!(report.starts_with("# Journal Patterns: last 30 days"));
    for section in ["## Overview", "## Top Topics", "## Mood Patterns", "## Habits", "## Projects"] {
        assert!(report.contains(section), "missing {section}");
    }
}

#[tokio::test]
async fn disabled_sections_are_left_out() {
    let api = habit_graph().api();

    let report = api
        .analyze_journal_patterns("last 2 weeks", false, false)
        .await
        .unwrap();

    assert!(report.starts_with("# Journal Patterns: last 2 weeks"));
    assert!(!report.contains("## Mood Patterns"));
    assert!(!report.contains("## Top Topics"));
    assert!(report.contains("## Habits"));
}

#[tokio::test]
async fn empty_timeframe_reports_no_entries() {
    let api = TestGraph::new()
        .journal(day(2025, 1, 1), &["long ago"])
        .api();

    let report = api.analyze_journal_patterns("last 3 days", true, true).await.unwrap();

    assert!(report.contains("No journal entries found for last 3 days."));
}
