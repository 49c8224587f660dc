//! Match results and admin analytics payloads, rendered as list items.

use serde::Deserialize;

use crate::ports::ListItem;

pub const MATCHES_LIST_ID: &str = "matches-list";
pub const TOTAL_SCANS_ID: &str = "totalScans";
pub const TOP_USERS_ID: &str = "topUsers";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentMatch {
    pub filename: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub is_similar: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<DocumentMatch>,
}

impl DocumentMatch {
    pub fn to_list_item(&self) -> ListItem {
        let (class_name, status) = if self.is_similar {
            ("match-card similar", "Similar")
        } else {
            ("match-card unique", "Not Similar")
        };
        ListItem {
            class_name: Some(class_name.to_string()),
            title: Some(self.filename.clone()),
            lines: vec![
                format!("Similarity: {}%", format_percentage(self.similarity)),
                format!("Status: {status}"),
            ],
        }
    }
}

/// Similarity ratio in `[0, 1]` as a percentage with at most two decimals.
pub fn format_percentage(ratio: f64) -> String {
    if !ratio.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.2}", ratio * 100.0);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopUser(pub String, pub u64);

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub top_users: Vec<TopUser>,
}

impl AnalyticsResponse {
    pub fn top_user_items(&self) -> Vec<ListItem> {
        self.top_users
            .iter()
            .map(|TopUser(user, scans)| ListItem::line(format!("{user} - {scans} scans")))
            .collect()
    }
}
