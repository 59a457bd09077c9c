//! Parameterized datalog queries against the Logseq database

use std::fmt;

/// Markers Logseq uses for open tasks
pub const OPEN_MARKERS: [&str; 4] = ["TODO", "DOING", "LATER", "NOW"];

/// A structured query with its parameters bound
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTemplate {
    /// `[from, to]` for every reference between two distinct pages
    Connections,
    /// Same rows as `Connections`, grouped into components
    Clusters,
    /// `[page, content, marker]` for open tasks
    OpenTasks,
    /// `[journal-day, page, content]` for blocks referencing a topic
    ConceptEvolution { topic: String },
    /// `[journal-day, page, content]` for tasks marked done on journal days
    /// between two `yyyymmdd` keys, inclusive
    CompletedBetween { start: i64, end: i64, title: String },
    /// `[name, updated-at]` for pages updated after an epoch-millisecond instant
    RecentlyUpdated { since_ms: i64 },
    /// `[name, count]` of referencing blocks per page
    ReferenceCounts,
}

impl QueryTemplate {
    pub fn to_datalog(&self) -> String {
        match self {
            Self::Connections | Self::Clusters => concat!(
                "[:find ?from ?to :where ",
                "[?b :block/page ?p] [?p :block/original-name ?from] ",
                "[?b :block/refs ?r] [?r :block/original-name ?to] ",
                "[(not= ?p ?r)]]"
            )
            .to_string(),
            Self::OpenTasks => {
                let markers: Vec<String> = OPEN_MARKERS.iter().map(|m| format!("\"{m}\"")).collect();
                format!(
                    "[:find ?page ?content ?marker :where \
                     [?b :block/marker ?marker] [(contains? #{{{}}} ?marker)] \
                     [?b :block/page ?p] [?p :block/original-name ?page] \
                     [?b :block/content ?content]]",
                    markers.join(" ")
                )
            }
            Self::ConceptEvolution { topic } => format!(
                "[:find ?day ?page ?content :where \
                 [?t :block/name {}] [?b :block/refs ?t] \
                 [?b :block/page ?p] [?p :block/journal-day ?day] \
                 [?p :block/original-name ?page] [?b :block/content ?content]]",
                quote(&topic.to_lowercase())
            ),
            Self::CompletedBetween { start, end, .. } => format!(
                "[:find ?day ?page ?content :where \
                 [?b :block/marker \"DONE\"] [?b :block/page ?p] \
                 [?p :block/journal-day ?day] [(>= ?day {start})] [(<= ?day {end})] \
                 [?p :block/original-name ?page] [?b :block/content ?content]]"
            ),
            Self::RecentlyUpdated { since_ms } => format!(
                "[:find ?name ?updated :where \
                 [?p :block/original-name ?name] [?p :block/updated-at ?updated] \
                 [(> ?updated {since_ms})]]"
            ),
            Self::ReferenceCounts => concat!(
                "[:find ?name (count ?b) :where ",
                "[?b :block/refs ?p] [?p :block/original-name ?name]]"
            )
            .to_string(),
        }
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connections => f.write_str("page connections"),
            Self::Clusters => f.write_str("page clusters"),
            Self::OpenTasks => f.write_str("open tasks"),
            Self::ConceptEvolution { topic } => write!(f, "evolution of {topic}"),
            Self::CompletedBetween { title, .. } => write!(f, "tasks completed {title}"),
            Self::RecentlyUpdated { .. } => f.write_str("recently updated pages"),
            Self::ReferenceCounts => f.write_str("most referenced pages"),
        }
    }
}

/// EDN string literal
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
