use std::io;
use std::path::PathBuf;

use serde_json::Value;

pub const SIZE_GUIDE_FILE: &str = "Size_guide.json";

/// The closed set of selectable content fields. Adding a field means adding
/// a variant here and a compiler-checked arm in `from_id` and `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Marker only: signals that the prompt carries an image mapping. It
    /// contributes no text of its own.
    IncludesImages,
    EditorsNotes,
    DetailsCare,
    SizeFit,
    ModelMeasurements,
    SizingGuide,
}

impl FieldKind {
    /// Parse a form identifier. Unknown identifiers yield `None` and are
    /// skipped silently by the assembler.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "includes_images" => Some(Self::IncludesImages),
            "editors_notes" => Some(Self::EditorsNotes),
            "details_care" => Some(Self::DetailsCare),
            "size_fit" => Some(Self::SizeFit),
            "model_measurements" => Some(Self::ModelMeasurements),
            "sizing_guide" => Some(Self::SizingGuide),
            _ => None,
        }
    }
}

/// True when the image-inclusion marker is among the selected identifiers.
pub fn includes_images(selected: &[String]) -> bool {
    selected
        .iter()
        .any(|id| FieldKind::from_id(id) == Some(FieldKind::IncludesImages))
}

/// Read-only view over the directory the scraper populates. Artifacts are
/// re-read on every call; nothing is cached across requests.
#[derive(Clone)]
pub struct ContentStore {
    data_dir: PathBuf,
}

impl ContentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Read a named text artifact. A missing file is a valid, silent state
    /// (`None`); any other I/O failure propagates.
    pub fn read_text(&self, name: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.data_dir.join(name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve one field to its textual contribution to a prompt. Missing
    /// artifacts resolve to the empty string, never an error.
    pub fn resolve(&self, field: FieldKind) -> io::Result<String> {
        let name = match field {
            FieldKind::IncludesImages => return Ok(String::new()),
            FieldKind::SizingGuide => return self.sizing_guide_text(),
            FieldKind::EditorsNotes => "editors_notes.txt",
            FieldKind::DetailsCare => "details_care.txt",
            FieldKind::SizeFit => "size_fit.txt",
            FieldKind::ModelMeasurements => "model_measurements.txt",
        };
        Ok(self.read_text(name)?.unwrap_or_default())
    }

    /// The sizing guide re-serialized as indented, human-readable JSON.
    /// Missing or malformed input resolves to the empty string rather than
    /// raising past this boundary.
    fn sizing_guide_text(&self) -> io::Result<String> {
        let Some(raw) = self.read_text(SIZE_GUIDE_FILE)? else {
            return Ok(String::new());
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(guide) => Ok(serde_json::to_string_pretty(&guide).unwrap_or_default()),
            Err(_) => Ok(String::new()),
        }
    }
}
