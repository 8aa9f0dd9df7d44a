use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::assemble;
use crate::fields::{self, ContentStore};
use crate::images::{self, ImageCatalog};
use crate::models::{PromptResult, PromptSubmission};
use crate::openai::{ChatModel, LlmError};

/// A batch-level failure. Any variant discards every result in the batch:
/// the response is either the full ordered result list or a single error.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid fields payload for prompt {index}: {source}")]
    InvalidFields {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read content artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Discover the indexed submissions present in the form. The walk starts at
/// index 0 and stops at the first index missing either `prompt_<i>` or
/// `fields_<i>`; higher indices are excluded even when present in the form.
///
/// `fields_<i>` carries a JSON array of field identifiers. Unlike a missing
/// content artifact, a malformed payload here is not swallowed: it fails the
/// whole batch.
pub fn discover_submissions(
    form: &HashMap<String, String>,
) -> Result<Vec<PromptSubmission>, BatchError> {
    let mut submissions = Vec::new();
    let mut index = 0usize;
    loop {
        let prompt_key = format!("prompt_{}", index);
        let fields_key = format!("fields_{}", index);
        let (Some(prompt), Some(fields_raw)) = (form.get(&prompt_key), form.get(&fields_key))
        else {
            break;
        };

        let selected_fields: Vec<String> = serde_json::from_str(fields_raw)
            .map_err(|source| BatchError::InvalidFields { index, source })?;

        let labels = if fields::includes_images(&selected_fields) {
            images::scan_labels(form, index)
        } else {
            Vec::new()
        };

        submissions.push(PromptSubmission {
            index,
            instruction_text: prompt.trim().to_string(),
            selected_fields,
            labels,
        });
        index += 1;
    }
    Ok(submissions)
}

/// Run every discovered prompt strictly in index order. Prompt k+1 is not
/// assembled until prompt k's model call has returned; there is no batching
/// of prompts into one call and no parallel dispatch. A failure anywhere
/// discards all results, including those already completed.
pub async fn run_batch(
    form: &HashMap<String, String>,
    store: &ContentStore,
    catalog: &ImageCatalog,
    llm: &dyn ChatModel,
) -> Result<Vec<PromptResult>, BatchError> {
    let submissions = discover_submissions(form)?;
    info!("🚀 Running batch of {} prompts", submissions.len());

    let mut results = Vec::with_capacity(submissions.len());
    for submission in &submissions {
        let (full_prompt, mapping) = assemble::assemble(submission, store, catalog)?;
        // Two-message exchange: empty system message, assembled text as user.
        let response = llm.complete("", &full_prompt).await?;
        info!("✅ Prompt {} answered ({} chars)", submission.index, response.len());

        results.push(PromptResult {
            input_prompt: submission.instruction_text.clone(),
            fields: submission.selected_fields.clone(),
            response,
            images: mapping,
            full_prompt,
        });
    }
    Ok(results)
}
