//! `GET /feedback` and `POST /feedback`.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;

use crate::feedback::{self, FeedbackForm, Outcome};
use crate::web::error::AppError;
use crate::web::pages::{feedback_page, FlashKind};
use crate::web::state::SharedState;

pub async fn feedback_form_handler() -> Html<String> {
    Html(feedback_page(None, &FeedbackForm::default()))
}

/// Handle a submission. The body is read as raw pairs so a repeated field
/// keeps its first value instead of failing the whole form. A body that isn't
/// a readable form is treated as an empty one, which fails validation like
/// any other incomplete submission.
pub async fn submit_feedback_handler(
    State(state): State<SharedState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let form = match form {
        Ok(Form(pairs)) => FeedbackForm::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!("unreadable feedback body: {rejection}");
            FeedbackForm::default()
        }
    };

    let db_path = state.db_path.clone();
    let notifier = Arc::clone(&state.notifier);
    let submitted = form.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        feedback::submit(&db_path, notifier.as_ref(), &submitted)
    })
    .await??;

    let page = match &outcome {
        Outcome::Invalid(_) => feedback_page(Some((FlashKind::Error, outcome.user_message())), &form),
        Outcome::Saved { .. } => feedback_page(
            Some((FlashKind::Success, outcome.user_message())),
            &FeedbackForm::default(),
        ),
    };
    Ok(Html(page))
}
