use std::io;

use crate::fields::{self, ContentStore, FieldKind};
use crate::images::{self, ImageCatalog};
use crate::models::{LabelMapping, PromptSubmission};

/// Fixed instruction appended after a non-empty image mapping block.
const IMAGE_MAPPING_INSTRUCTION: &str =
    "Use the mapping above to associate the correct image with each label.";

/// Render a field identifier as a human-readable heading: underscores become
/// spaces and each word is title-cased, so `editors_notes` reads
/// `Editors Notes`.
fn humanize(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Build the exact text sent to the model for one submission, plus the label
/// mapping referenced by it. Output is byte-identical across calls for a
/// fixed content store, image listing, and submission.
///
/// Unknown field identifiers contribute nothing. The image mapping block is
/// only appended when the image marker is selected *and* the computed mapping
/// is non-empty; an empty mapping degrades softly to no image text at all.
pub fn assemble(
    submission: &PromptSubmission,
    store: &ContentStore,
    catalog: &ImageCatalog,
) -> io::Result<(String, LabelMapping)> {
    let mut blocks = Vec::new();
    for id in &submission.selected_fields {
        let Some(field) = FieldKind::from_id(id) else { continue };
        let content = store.resolve(field)?;
        blocks.push(format!("{}:\n{}", humanize(id), content));
    }

    let mut full_prompt = format!(
        "{}\n\nUser Prompt:\n{}",
        blocks.join("\n\n"),
        submission.instruction_text
    );

    let mut mapping = LabelMapping::default();
    if fields::includes_images(&submission.selected_fields) {
        mapping = images::build_label_mapping(&submission.labels, catalog);
        if !mapping.is_empty() {
            let lines: Vec<String> = mapping
                .iter()
                .map(|(label, path)| format!("{} => {}", label, path))
                .collect();
            full_prompt.push_str(&format!(
                "\n\nImage Mapping:\n{}\n\n{}",
                lines.join("\n"),
                IMAGE_MAPPING_INSTRUCTION
            ));
        }
    }

    Ok((full_prompt, mapping))
}
