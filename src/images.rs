use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::models::LabelMapping;

/// Extensions the labeler recognizes when listing the served directory. The
/// scraper only mirrors jpeg files into it.
const IMAGE_EXTENSIONS: &[&str] = &["jpeg"];

/// View over the request-servable image directory. The listing is re-read on
/// every call: the scraper may rewrite the directory between batches, and a
/// batch racing a concurrent re-scrape can observe a partially updated
/// listing. That race is accepted under the single-operator usage model.
#[derive(Clone)]
pub struct ImageCatalog {
    image_dir: PathBuf,
}

impl ImageCatalog {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self { image_dir: image_dir.into() }
    }

    /// Current image filenames in ascending lexicographic order. This
    /// ordering is the sole mechanism pairing a label with a specific image,
    /// so two calls against an unchanged directory must agree.
    pub fn list_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(&self.image_dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| has_image_extension(name))
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Forward-slash path under which a listed file is served, regardless of
    /// the platform separator.
    pub fn served_path(&self, name: &str) -> String {
        let dir = self.image_dir.to_string_lossy().replace('\\', "/");
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Scan `image_label_<prompt>_<j>` entries for j = 0.. until the first
/// missing position. A present-but-blank value is dropped from the label
/// list, but the scan keeps going: presence, not content, terminates it.
pub fn scan_labels(form: &HashMap<String, String>, prompt_index: usize) -> Vec<String> {
    let mut labels = Vec::new();
    let mut position = 0usize;
    loop {
        let key = format!("image_label_{}_{}", prompt_index, position);
        let Some(value) = form.get(&key) else { break };
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            labels.push(trimmed.to_string());
        }
        position += 1;
    }
    labels
}

/// Pair labels to assets strictly by position: the i-th surviving label maps
/// to the i-th sorted asset. Excess labels are dropped silently; excess
/// assets stay unmapped.
pub fn build_label_mapping(labels: &[String], catalog: &ImageCatalog) -> LabelMapping {
    let files = catalog.list_sorted();
    let mut mapping = LabelMapping::default();
    for (i, label) in labels.iter().enumerate() {
        if let Some(name) = files.get(i) {
            mapping.insert(label.clone(), catalog.served_path(name));
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn catalog_with(names: &[&str]) -> (tempfile::TempDir, ImageCatalog) {
        let dir = tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"fake").unwrap();
        }
        let catalog = ImageCatalog::new(dir.path());
        (dir, catalog)
    }

    fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn listing_is_sorted_and_filtered() {
        let (_dir, catalog) = catalog_with(&["b.jpeg", "a.jpeg", "notes.txt", "c.jpeg"]);
        assert_eq!(catalog.list_sorted(), vec!["a.jpeg", "b.jpeg", "c.jpeg"]);
    }

    #[test]
    fn listing_of_missing_directory_is_empty() {
        let catalog = ImageCatalog::new("does/not/exist");
        assert_eq!(catalog.list_sorted(), Vec::<String>::new());
    }

    #[test]
    fn scan_stops_at_first_missing_position() {
        let form = form(&[
            ("image_label_0_0", "front"),
            ("image_label_0_1", "back"),
            // position 2 missing: position 3 is never reached
            ("image_label_0_3", "detail"),
        ]);
        assert_eq!(scan_labels(&form, 0), vec!["front", "back"]);
    }

    #[test]
    fn blank_label_is_skipped_but_scan_continues() {
        let form = form(&[
            ("image_label_0_0", "front"),
            ("image_label_0_1", "   "),
            ("image_label_0_2", "back"),
        ]);
        assert_eq!(scan_labels(&form, 0), vec!["front", "back"]);
    }

    #[test]
    fn labels_are_scanned_per_prompt_index() {
        let form = form(&[
            ("image_label_0_0", "front"),
            ("image_label_1_0", "sleeve"),
        ]);
        assert_eq!(scan_labels(&form, 1), vec!["sleeve"]);
    }

    #[test]
    fn positional_pairing_with_blank_label() {
        let (_dir, catalog) = catalog_with(&["a.jpeg", "b.jpeg", "c.jpeg"]);
        let form = form(&[
            ("image_label_0_0", "front"),
            ("image_label_0_1", ""),
            ("image_label_0_2", "back"),
        ]);
        let labels = scan_labels(&form, 0);
        let mapping = build_label_mapping(&labels, &catalog);

        assert_eq!(mapping.len(), 2);
        assert!(mapping.get("front").unwrap().ends_with("/a.jpeg"));
        assert!(mapping.get("back").unwrap().ends_with("/b.jpeg"));
    }

    #[test]
    fn excess_labels_are_dropped() {
        let (_dir, catalog) = catalog_with(&["a.jpeg"]);
        let labels = vec!["front".to_string(), "back".to_string()];
        let mapping = build_label_mapping(&labels, &catalog);

        assert_eq!(mapping.len(), 1);
        assert!(mapping.get("front").is_some());
        assert_eq!(mapping.get("back"), None);
    }

    #[test]
    fn excess_assets_stay_unmapped() {
        let (_dir, catalog) = catalog_with(&["a.jpeg", "b.jpeg", "c.jpeg"]);
        let labels = vec!["front".to_string()];
        let mapping = build_label_mapping(&labels, &catalog);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn served_path_uses_forward_slashes() {
        let catalog = ImageCatalog::new("static/images");
        assert_eq!(catalog.served_path("a.jpeg"), "static/images/a.jpeg");
    }
}
