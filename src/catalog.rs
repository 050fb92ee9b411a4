//! Industry catalog: display name to backend identifier, in server order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Industries the backend ships with, used when the catalog endpoint is
/// unreachable.
const BUILTIN_INDUSTRIES: &[&str] = &[
    "Healthcare",
    "Banking, Financial Services, and Insurance",
    "Aerospace",
    "Aeronautics",
    "Biotech",
    "Defence",
    "Pharmaceutical",
    "Telecommunications",
    "Energy",
    "Oil & Gas",
    "Manufacturing",
    "Automotive",
    "Retail & E-commerce",
    "Logistics",
    "Education",
    "Legal",
    "Hospitality",
    "Construction",
    "Agricultural Tech",
    "Cybersecurity",
    "Media & Entertainment",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("industry list request failed: {0}")]
    Request(String),
    #[error("industry list responded with status {0}")]
    Status(u16),
    #[error("industry list is malformed: {0}")]
    Decode(String),
    #[error("No matching industry agent available for '{0}'. Please try a different keyword.")]
    NoMatch(String),
}

/// Wire shape of the industry list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndustriesResponse {
    industries: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndustryCatalog {
    entries: IndexMap<String, String>,
}

impl IndustryCatalog {
    pub fn new(entries: IndexMap<String, String>) -> Self {
        Self { entries }
    }

    /// The list the backend serves by default. Display names are the last
    /// word of each agent description, matching the server's own keys.
    pub fn builtin() -> Self {
        let entries = BUILTIN_INDUSTRIES
            .iter()
            .map(|industry| {
                let id = format!("AI Sales Strategist for {industry}");
                let label = id.split_whitespace().last().unwrap_or(industry).to_string();
                (label, id)
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(display name, identifier)` pairs in server order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Identifier of the first entry.
    pub fn default_selection(&self) -> Option<&str> {
        self.entries.first().map(|(_, id)| id.as_str())
    }

    /// Resolve user input to an identifier.
    ///
    /// Tries an exact display name, then an exact identifier (both
    /// case-insensitive), then the first identifier containing the query.
    pub fn resolve(&self, query: &str) -> Result<&str, CatalogError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CatalogError::NoMatch(query.to_string()));
        }
        let by_label = self
            .entries
            .iter()
            .find(|(label, _)| label.to_lowercase() == needle);
        let by_id = || {
            self.entries
                .values()
                .find(|id| id.to_lowercase() == needle)
        };
        let by_substring = || {
            self.entries
                .values()
                .find(|id| id.to_lowercase().contains(&needle))
        };
        by_label
            .map(|(_, id)| id)
            .or_else(by_id)
            .or_else(by_substring)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::NoMatch(query.to_string()))
    }
}

/// `GET` the industry list.
pub(crate) async fn fetch(
    client: &reqwest::Client,
    url: &str,
) -> Result<IndustryCatalog, CatalogError> {
    debug!(%url, "fetching industry catalog");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CatalogError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status.as_u16()));
    }
    let body = response
        .text()
        .await
        .map_err(|e| CatalogError::Request(e.to_string()))?;
    parse(&body)
}

fn parse(body: &str) -> Result<IndustryCatalog, CatalogError> {
    let response: IndustriesResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(IndustryCatalog::new(response.industries))
}
