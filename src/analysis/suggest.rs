//! Connection suggestions
//!
//! Scores page pairs by shared topics and name mentions, and proposes links
//! between unlinked similar pages, synthesis pages for widely discussed
//! topics that have no page, and older pages related to recent work.

use super::{fetch_contents, PageContent};
use crate::graph::{canonical, links, walk, Page};
use crate::provider::{GraphProvider, ProviderResult};
use crate::report::{page_ref, Markdown};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

const SHARED_TOPIC_WEIGHT: f64 = 0.6;
const NAME_MENTION_BONUS: f64 = 0.2;
const SYNTHESIS_MIN_PAGES: usize = 3;
const RECENT_PAGES: usize = 10;
const EXPLORATION_MIN_SHARED: usize = 2;
const REASON_TOPICS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    PotentialConnection,
    SynthesisOpportunity,
    ExplorationSuggestion,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PotentialConnection => "potential_connection",
            Self::SynthesisOpportunity => "synthesis_opportunity",
            Self::ExplorationSuggestion => "exploration_suggestion",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Self::PotentialConnection => "Potential Connections",
            Self::SynthesisOpportunity => "Synthesis Opportunities",
            Self::ExplorationSuggestion => "Exploration Suggestions",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub pages: Vec<String>,
    pub reason: String,
    /// Not clamped; synthesis and strong connections can exceed 1.0
    pub confidence: f64,
    pub topics: Vec<String>,
}

impl Suggestion {
    fn matches_focus(&self, focus: &str) -> bool {
        self.topics.iter().any(|t| canonical(t) == focus)
            || self.pages.iter().any(|p| canonical(p).contains(focus))
    }
}

/// Topic and link profile of one page
#[derive(Debug)]
struct Profile<'a> {
    page: &'a Page,
    key: String,
    text: String,
    /// Canonical references and tags
    topics: BTreeSet<String>,
    /// Canonical references only
    links: HashSet<String>,
}

impl<'a> Profile<'a> {
    fn new(content: &'a PageContent, display: &mut HashMap<String, String>) -> Self {
        let mut topics = BTreeSet::new();
        let mut direct = HashSet::new();
        for text in walk::contents(&content.blocks) {
            for reference in links::extract_references(text) {
                direct.insert(canonical(&reference));
            }
            for topic in links::extract_topics(text) {
                let key = canonical(&topic);
                display.entry(key.clone()).or_insert(topic);
                topics.insert(key);
            }
        }
        Self {
            page: &content.page,
            key: content.page.canonical_name(),
            text: content.text.to_lowercase(),
            topics,
            links: direct,
        }
    }

    fn name(&self) -> &str {
        self.page.display_name()
    }

    fn mentions(&self, other: &Profile<'_>) -> bool {
        let name = canonical(other.name());
        !name.is_empty() && self.text.contains(&name)
    }

    fn links_to(&self, other: &Profile<'_>) -> bool {
        self.links.contains(&other.key)
    }
}

/// `0.6 × shared topics + 0.2` for each page whose content names the other.
fn similarity(a: &Profile<'_>, b: &Profile<'_>) -> (f64, Vec<String>) {
    let shared: Vec<String> = a.topics.intersection(&b.topics).cloned().collect();
    let mut score = SHARED_TOPIC_WEIGHT * shared.len() as f64;
    if a.mentions(b) {
        score += NAME_MENTION_BONUS;
    }
    if b.mentions(a) {
        score += NAME_MENTION_BONUS;
    }
    (score, shared)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionReport {
    pub focus_area: Option<String>,
    pub pages_analyzed: usize,
    pub suggestions: Vec<Suggestion>,
}

/// Connection suggestion parameters
#[derive(Debug, Clone)]
pub struct ConnectionSuggester {
    pub min_confidence: f64,
    pub max_suggestions: usize,
    pub focus_area: Option<String>,
}

impl Default for ConnectionSuggester {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            max_suggestions: 10,
            focus_area: None,
        }
    }
}

impl ConnectionSuggester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_confidence(mut self, min: f64) -> Self {
        self.min_confidence = min;
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn focus_area(mut self, focus: Option<String>) -> Self {
        self.focus_area = focus.filter(|f| !f.trim().is_empty());
        self
    }

    pub async fn run(&self, provider: &dyn GraphProvider) -> ProviderResult<SuggestionReport> {
        let pages = provider.fetch_all_pages().await?;
        let contents = fetch_contents(provider, &pages).await;
        let report = self.analyze(&pages, &contents);
        info!(
            pages = report.pages_analyzed,
            suggestions = report.suggestions.len(),
            "connection suggestions complete"
        );
        Ok(report)
    }

    pub fn analyze(&self, pages: &[Page], contents: &[PageContent]) -> SuggestionReport {
        let mut display: HashMap<String, String> = pages
            .iter()
            .map(|p| (p.canonical_name(), p.display_name().to_string()))
            .collect();
        let profiles: Vec<Profile<'_>> = contents
            .iter()
            .map(|c| Profile::new(c, &mut display))
            .collect();
        let shown = |key: &String| display.get(key).cloned().unwrap_or_else(|| key.clone());

        let mut suggestions = Vec::new();
        self.potential_connections(&profiles, &shown, &mut suggestions);
        synthesis_opportunities(pages, &profiles, &shown, &mut suggestions);
        exploration_suggestions(pages, &profiles, &shown, &mut suggestions);
        debug!(candidates = suggestions.len(), "suggestion candidates scored");

        suggestions.retain(|s| s.confidence >= self.min_confidence);
        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        if let Some(focus) = &self.focus_area {
            let focus = canonical(focus);
            // Stable: confidence order is kept within each group
            suggestions.sort_by_key(|s| !s.matches_focus(&focus));
        }
        suggestions.truncate(self.max_suggestions);

        SuggestionReport {
            focus_area: self.focus_area.clone(),
            pages_analyzed: profiles.len(),
            suggestions,
        }
    }

    fn potential_connections(
        &self,
        profiles: &[Profile<'_>],
        shown: &impl Fn(&String) -> String,
        out: &mut Vec<Suggestion>,
    ) {
        for (i, a) in profiles.iter().enumerate() {
            for b in &profiles[i + 1..] {
                if a.key == b.key || a.links_to(b) || b.links_to(a) {
                    continue;
                }
                let (score, shared) = similarity(a, b);
                if score < self.min_confidence {
                    continue;
                }
                let topics: Vec<String> = shared.iter().map(shown).collect();
                let reason = if topics.is_empty() {
                    "Each page mentions the other by name".to_string()
                } else {
                    let listed: Vec<String> =
                        topics.iter().take(REASON_TOPICS).map(|t| page_ref(t)).collect();
                    format!("Shared topics: {}", listed.join(", "))
                };
                out.push(Suggestion {
                    kind: SuggestionKind::PotentialConnection,
                    pages: vec![a.name().to_string(), b.name().to_string()],
                    reason,
                    confidence: score,
                    topics,
                });
            }
        }
    }
}

fn synthesis_opportunities(
    pages: &[Page],
    profiles: &[Profile<'_>],
    shown: &impl Fn(&String) -> String,
    out: &mut Vec<Suggestion>,
) {
    let existing: HashSet<String> = pages.iter().map(Page::canonical_name).collect();
    let mut by_topic: Vec<(&String, Vec<&str>)> = Vec::new();
    let mut index: HashMap<&String, usize> = HashMap::new();
    for profile in profiles {
        for topic in &profile.topics {
            let slot = *index.entry(topic).or_insert_with(|| {
                by_topic.push((topic, Vec::new()));
                by_topic.len() - 1
            });
            by_topic[slot].1.push(profile.name());
        }
    }

    for (topic, related) in by_topic {
        if related.len() < SYNTHESIS_MIN_PAGES || existing.contains(topic) {
            continue;
        }
        let name = shown(topic);
        out.push(Suggestion {
            kind: SuggestionKind::SynthesisOpportunity,
            reason: format!(
                "{} pages discuss {} but it has no page of its own",
                related.len(),
                page_ref(&name)
            ),
            confidence: 0.8 + 0.05 * related.len() as f64,
            pages: related.into_iter().map(str::to_string).collect(),
            topics: vec![name],
        });
    }
}

fn exploration_suggestions(
    pages: &[Page],
    profiles: &[Profile<'_>],
    shown: &impl Fn(&String) -> String,
    out: &mut Vec<Suggestion>,
) {
    // Empty pages take a recency slot but contribute no topics
    let mut dated: Vec<&Page> = pages.iter().filter(|p| p.updated_at.is_some()).collect();
    dated.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let recent_keys: HashSet<String> = dated
        .into_iter()
        .take(RECENT_PAGES)
        .map(Page::canonical_name)
        .collect();
    let recent_topics: BTreeSet<&String> = profiles
        .iter()
        .filter(|p| recent_keys.contains(&p.key))
        .flat_map(|p| p.topics.iter())
        .collect();

    for profile in profiles.iter().filter(|p| !recent_keys.contains(&p.key)) {
        let shared: Vec<String> = profile
            .topics
            .iter()
            .filter(|t| recent_topics.contains(t))
            .map(shown)
            .collect();
        if shared.len() < EXPLORATION_MIN_SHARED {
            continue;
        }
        let listed: Vec<String> = shared.iter().take(REASON_TOPICS).map(|t| page_ref(t)).collect();
        out.push(Suggestion {
            kind: SuggestionKind::ExplorationSuggestion,
            pages: vec![profile.name().to_string()],
            reason: format!(
                "Shares {} topics with recent work: {}",
                shared.len(),
                listed.join(", ")
            ),
            confidence: 0.6 + 0.1 * shared.len() as f64,
            topics: shared,
        });
    }
}

impl SuggestionReport {
    pub fn count(&self, kind: SuggestionKind) -> usize {
        self.suggestions.iter().filter(|s| s.kind == kind).count()
    }

    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1("Connection Suggestions");
        if let Some(focus) = &self.focus_area {
            md.para(format!("Focus area: {focus}"));
        }
        md.para(format!("Pages analyzed: {}", self.pages_analyzed));

        if self.suggestions.is_empty() {
            md.para("No suggestions met the confidence threshold.");
            return md.finish();
        }

        for kind in [
            SuggestionKind::PotentialConnection,
            SuggestionKind::SynthesisOpportunity,
            SuggestionKind::ExplorationSuggestion,
        ] {
            let group: Vec<&Suggestion> = self.suggestions.iter().filter(|s| s.kind == kind).collect();
            if group.is_empty() {
                continue;
            }
            md.h2(kind.heading());
            for s in group {
                let pages: Vec<String> = s.pages.iter().map(|p| page_ref(p)).collect();
                let subject = match kind {
                    SuggestionKind::SynthesisOpportunity => {
                        format!("Create {}", page_ref(s.topics.first().map_or("", String::as_str)))
                    }
                    _ => pages.join(" and "),
                };
                md.bullet(format!(
                    "{} (confidence {:.2}): {}",
                    subject, s.confidence, s.reason
                ));
                if kind == SuggestionKind::SynthesisOpportunity {
                    md.raw(format!("  - Related: {}", pages.join(", ")));
                }
            }
        }
        md.finish()
    }
}
