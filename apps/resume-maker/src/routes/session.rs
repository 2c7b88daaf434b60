use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::persistence::SaveStatus;
use crate::session::{Session, Tab};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionView {
    pub tab: Tab,
    pub status: SaveStatus,
    /// `/p/{slug}` once the Document has a published copy.
    pub public_link: Option<String>,
}

impl SessionView {
    fn of(session: &Session) -> Self {
        Self {
            tab: session.tab(),
            status: session.status().clone(),
            public_link: session.status().saved().map(|s| public_link(&s.slug)),
        }
    }
}

#[derive(Deserialize)]
pub struct TabRequest {
    pub tab: Tab,
}

#[derive(Serialize)]
pub struct PublishResponse {
    pub id: String,
    pub slug: String,
    pub link: String,
}

pub fn public_link(slug: &str) -> String {
    format!("/p/{slug}")
}

/// GET /api/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(SessionView::of(&*state.session.lock().await))
}

/// PUT /api/session/tab
pub async fn handle_set_tab(
    State(state): State<AppState>,
    Json(req): Json<TabRequest>,
) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.set_tab(req.tab);
    Json(SessionView::of(&session))
}

/// POST /api/publish
/// Saves the current Document remotely. The session lock is released while
/// the request is in flight; a second publish in that window gets a 409.
/// The save runs as its own task and always settles the status, even if this
/// request is dropped before the remote answers.
pub async fn handle_publish(
    State(state): State<AppState>,
) -> Result<Json<PublishResponse>, AppError> {
    let job = state.session.lock().await.begin_save()?;

    let session = state.session.clone();
    let remote = state.remote.clone();
    let save = tokio::spawn(async move {
        let outcome = remote
            .save_remote(job.existing_id.as_deref(), &job.document, &job.title)
            .await;
        session.lock().await.finish_save(&outcome);
        outcome
    });

    let receipt = match save.await {
        Ok(outcome) => outcome?,
        Err(e) => {
            state.session.lock().await.abandon_save();
            return Err(AppError::Internal(anyhow::anyhow!("publish task failed: {e}")));
        }
    };
    Ok(Json(PublishResponse {
        link: public_link(&receipt.slug),
        id: receipt.id,
        slug: receipt.slug,
    }))
}
