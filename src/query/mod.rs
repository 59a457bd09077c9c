//! Structured queries routed from free-text requests
//!
//! A request is matched against an ordered intent table, the chosen
//! template runs as a datalog query, and the rows are summarized as an
//! insight. A request that matches no intent runs no query.

pub mod insights;
pub mod intent;
pub mod templates;

pub use insights::{interpret, Insight};
pub use intent::IntentTable;
pub use templates::QueryTemplate;

use crate::provider::{GraphProvider, ProviderResult};
use crate::report::Markdown;
use chrono::{DateTime, Local};
use tracing::info;

/// Outcome of a routed query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReport {
    pub request: String,
    /// Matched intent and its template; `None` when nothing matched
    pub routed: Option<(&'static str, QueryTemplate)>,
    pub rows: usize,
    pub insight: Insight,
}

/// Route `request`, run the matching query, and interpret its rows.
pub async fn smart_query(
    provider: &dyn GraphProvider,
    request: &str,
    now: DateTime<Local>,
) -> ProviderResult<QueryReport> {
    let request = request.trim();
    let Some((intent, template)) = IntentTable::standard().route(request, now) else {
        info!(request, "no query intent matched");
        return Ok(QueryReport {
            request: request.to_string(),
            routed: None,
            rows: 0,
            insight: Insight::Empty,
        });
    };

    let rows = provider.run_query(&template.to_datalog()).await?;
    let insight = interpret(&template, &rows);
    info!(request, intent, rows = rows.len(), "query complete");
    Ok(QueryReport {
        request: request.to_string(),
        routed: Some((intent, template)),
        rows: rows.len(),
        insight,
    })
}

impl QueryReport {
    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1(format!("Query Results: {}", self.request));
        match &self.routed {
            None => {
                let intents: Vec<&str> = IntentTable::standard().names().collect();
                md.para("No results found.");
                md.para(format!(
                    "The request did not match a known query. Try asking about: {}.",
                    intents.join(", ")
                ));
            }
            Some((_, template)) => {
                md.para(format!("Query: {} ({} rows)", template, self.rows));
                if self.insight.is_empty() {
                    md.para("No results found.");
                } else {
                    self.insight.render(&mut md);
                }
            }
        }
        md.finish()
    }
}
