use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::export::export_resume;
use crate::models::Document;
use crate::render::html::{render_page, PageChrome};
use crate::render::{render_current, Layout};
use crate::state::AppState;

/// GET /api/preview
pub async fn handle_preview_layout(State(state): State<AppState>) -> Json<Layout> {
    let doc = state.session.lock().await.document().clone();
    Json(render_current(&doc))
}

/// GET /preview
pub async fn handle_preview_page(State(state): State<AppState>) -> Html<String> {
    let doc = state.session.lock().await.document().clone();
    Html(preview_page(&doc))
}

/// GET /p/:slug
/// Opens a published resume in the preview. When the slug cannot be loaded
/// the current Document and tab are kept and its preview is served instead.
pub async fn handle_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Html<String> {
    let loaded = state.remote.load_remote(&slug).await;

    let mut session = state.session.lock().await;
    if let Some(doc) = loaded {
        session.open_public(&slug, doc);
    }
    Html(preview_page(session.document()))
}

/// GET /api/export
/// Streams the current Document as a paginated PDF download.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let doc = state.session.lock().await.document().clone();
    let artifact = export_resume(doc, state.rasterizer.clone()).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&artifact.filename))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("bad Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

fn preview_page(doc: &Document) -> String {
    let layout = render_current(doc);
    render_page(
        &layout,
        &PageChrome {
            title: doc.publish_title(),
            dark: doc.meta.dark,
        },
    )
}

/// `attachment` with an ASCII fallback name and the exact UTF-8 name (RFC 6266).
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_plain_name() {
        assert_eq!(
            content_disposition("Your_Name_Resume.pdf"),
            "attachment; filename=\"Your_Name_Resume.pdf\"; filename*=UTF-8''Your_Name_Resume.pdf"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        let value = content_disposition("José_\"J\"_Resume.pdf");
        assert!(value.starts_with("attachment; filename=\"Jos__"));
        assert!(value.ends_with("filename*=UTF-8''Jos%C3%A9_%22J%22_Resume.pdf"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }
}
