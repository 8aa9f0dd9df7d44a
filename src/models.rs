use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One indexed prompt submission discovered in the batch form. Built
/// transiently per request, never persisted.
#[derive(Debug, Clone)]
pub struct PromptSubmission {
    pub index: usize,
    pub instruction_text: String,
    /// Field identifiers exactly as submitted: duplicates and unknown
    /// identifiers are preserved here and echoed back in the result.
    pub selected_fields: Vec<String>,
    pub labels: Vec<String>,
}

/// Label -> image path pairs in insertion order. A plain map type would
/// reorder the keys; the JSON object must list pairs in the order labels
/// were paired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMapping(Vec<(String, String)>);

impl LabelMapping {
    pub fn insert(&mut self, label: String, path: String) {
        self.0.push((label, path));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, p)| (l.as_str(), p.as_str()))
    }
}

impl Serialize for LabelMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, path) in &self.0 {
            map.serialize_entry(label, path)?;
        }
        map.end()
    }
}

/// Outcome of one prompt: immutable once appended to the batch result.
#[derive(Debug, Clone, Serialize)]
pub struct PromptResult {
    pub input_prompt: String,
    pub fields: Vec<String>,
    pub response: String,
    pub images: LabelMapping,
    pub full_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<PromptResult>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Snapshot of the extracted content, served as JSON for the review UI.
#[derive(Debug, Serialize)]
pub struct ContentOverview {
    pub editors_notes: Option<String>,
    pub size_fit: Option<String>,
    pub model_measurements: Option<String>,
    pub details_care: Option<String>,
    pub size_guide: serde_json::Map<String, serde_json::Value>,
    pub size_headers: Vec<String>,
    pub images: Vec<String>,
}
