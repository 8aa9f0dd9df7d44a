use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::{collections::HashMap, sync::Arc};
use tracing::error;

use crate::batch;
use crate::fields::{ContentStore, SIZE_GUIDE_FILE};
use crate::images::ImageCatalog;
use crate::models::{BatchResponse, ContentOverview, ErrorResponse};
use crate::openai::ChatModel;

#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub catalog: ImageCatalog,
    pub llm: Arc<dyn ChatModel>,
}

/// Run every prompt discovered in the submitted batch form. All-or-nothing:
/// success returns the full ordered result list, any batch-level failure
/// returns a single error object and discards all completed work.
pub async fn run_prompts(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    match batch::run_batch(&form, &state.store, &state.catalog, state.llm.as_ref()).await {
        Ok(results) => Json(BatchResponse { results }).into_response(),
        Err(e) => {
            error!("❌ Batch failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            )
                .into_response()
        }
    }
}

/// Current extracted content as JSON: the raw text fields (null when absent),
/// the parsed sizing guide with its column headers, and the sorted image
/// listing.
pub async fn content_overview(State(state): State<AppState>) -> Response {
    match build_overview(&state.store, &state.catalog) {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => {
            error!("❌ Content overview failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            )
                .into_response()
        }
    }
}

fn build_overview(store: &ContentStore, catalog: &ImageCatalog) -> std::io::Result<ContentOverview> {
    let size_guide = store
        .read_text(SIZE_GUIDE_FILE)?
        .and_then(|raw| serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw).ok())
        .unwrap_or_default();
    let size_headers = size_guide
        .values()
        .next()
        .and_then(|row| row.as_object())
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    Ok(ContentOverview {
        editors_notes: store.read_text("editors_notes.txt")?,
        size_fit: store.read_text("size_fit.txt")?,
        model_measurements: store.read_text("model_measurements.txt")?,
        details_care: store.read_text("details_care.txt")?,
        size_guide,
        size_headers,
        images: catalog.list_sorted(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn overview_reports_headers_from_first_row() {
        let data = tempdir().unwrap();
        std::fs::write(
            data.path().join(SIZE_GUIDE_FILE),
            r#"{"S":{"Bust":"84","Waist":"66"},"M":{"Bust":"88","Waist":"70"}}"#,
        )
        .unwrap();
        let images = tempdir().unwrap();
        std::fs::write(images.path().join("a.jpeg"), b"fake").unwrap();

        let overview = build_overview(
            &ContentStore::new(data.path()),
            &ImageCatalog::new(images.path()),
        )
        .unwrap();

        assert_eq!(overview.size_headers, vec!["Bust", "Waist"]);
        assert_eq!(overview.size_guide.len(), 2);
        assert_eq!(overview.images, vec!["a.jpeg"]);
        assert_eq!(overview.editors_notes, None);
    }

    #[test]
    fn overview_tolerates_empty_store() {
        let data = tempdir().unwrap();
        let overview = build_overview(
            &ContentStore::new(data.path()),
            &ImageCatalog::new("does/not/exist"),
        )
        .unwrap();

        assert!(overview.size_guide.is_empty());
        assert!(overview.size_headers.is_empty());
        assert!(overview.images.is_empty());
    }
}
