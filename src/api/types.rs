use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Department id (string key) → analysts, in the order the server ranks them.
pub type AnalystMap = HashMap<String, Vec<Analyst>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analyst {
    pub id: i64,
    #[serde(alias = "full_name")]
    pub name: String,
}

/// Body of `POST /app/ai/suggest`.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestRequest<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub priority_id: Option<i64>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One file part of the create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: std::path::PathBuf,
    pub name: String,
}

/// Everything `POST /app/create` carries, already flattened to wire values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSubmission {
    pub subject: String,
    pub details: String,
    pub category_id: String,
    pub department_id: String,
    pub priority_id: String,
    pub assignee_id: String,
    pub files: Vec<UploadFile>,
}

/// Where the server redirected after creating a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTicket {
    pub location: String,
    pub ticket_id: Option<i64>,
}

impl CreatedTicket {
    pub fn from_location(location: &str) -> Self {
        let ticket_id = location
            .split('?')
            .next()
            .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
            .and_then(|last| last.parse().ok());
        Self {
            location: location.to_string(),
            ticket_id,
        }
    }
}

/// The two detail-page forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailForm {
    State,
    Assign,
}

impl DetailForm {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::State => "status",
            Self::Assign => "assign",
        }
    }

    pub fn value_field(&self) -> &'static str {
        match self {
            Self::State => "to_status_id",
            Self::Assign => "assignee_id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyst_map_accepts_full_name_alias() {
        let json = r#"{"2": [{"id": 42, "full_name": "Analista Test", "load": 3}], "3": [{"id": 7, "name": "Ana"}]}"#;
        let map: AnalystMap = serde_json::from_str(json).unwrap();
        assert_eq!(map["2"][0], Analyst { id: 42, name: "Analista Test".into() });
        assert_eq!(map["3"][0].name, "Ana");
    }

    #[test]
    fn test_suggestion_fields_are_optional() {
        let s: Suggestion = serde_json::from_str(r#"{"category_id": 2, "reason": "Parece de red"}"#).unwrap();
        assert_eq!(s.category_id, Some(2));
        assert_eq!(s.priority_id, None);
        assert_eq!(s.reason.as_deref(), Some("Parece de red"));
        assert!(s.error.is_none());
    }

    #[test]
    fn test_created_ticket_parses_id_from_location() {
        let created = CreatedTicket::from_location("/app/detail/123");
        assert_eq!(created.ticket_id, Some(123));

        let absolute = CreatedTicket::from_location("http://localhost:5000/app/detail/9/?tab=log");
        assert_eq!(absolute.ticket_id, Some(9));

        let other = CreatedTicket::from_location("/app/dashboard");
        assert_eq!(other.ticket_id, None);
    }
}
