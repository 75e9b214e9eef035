use serde::{Deserialize, Serialize};

use crate::scene::schema::Point2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Suggestion,
}

/// A single finding, flattened from the layout annotations for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,        // Deterministic: "<rule_id>:<object>:<object>"
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub objects: Vec<String>,
    pub location: Option<Point2>,
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(rule_id: &str, severity: Severity, message: String, objects: &[&str]) -> Self {
        let mut id = rule_id.to_string();
        for obj in objects {
            id.push(':');
            id.push_str(obj);
        }
        Self {
            id,
            rule_id: rule_id.to_string(),
            severity,
            message,
            objects: objects.iter().map(|o| o.to_string()).collect(),
            location: None,
            suggestion: None,
        }
    }

    pub fn at(mut self, location: Point2) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_id_is_deterministic() {
        let a = Issue::new("container_spacing", Severity::Error, "x".to_string(), &["c1", "c2"]);
        let b = Issue::new("container_spacing", Severity::Error, "y".to_string(), &["c1", "c2"]);
        assert_eq!(a.id, "container_spacing:c1:c2");
        assert_eq!(a.id, b.id);
        assert_eq!(a.objects, vec!["c1", "c2"]);
    }
}
