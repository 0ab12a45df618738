use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use log::{debug, error};

use crate::schema::RawSubmission;

use super::{
    context::Context,
    pages::{self, Page},
};

/// Build the router: one route, GET for the empty form and POST for a
/// classification
pub fn router(context: Arc<Context>) -> Router {
    Router::new()
        .route("/", get(show_form).post(classify))
        .with_state(context)
}

/// GET /: an empty form with every dropdown populated
async fn show_form(State(context): State<Arc<Context>>) -> Result<Html<String>, RenderError> {
    let page = Page::form(&context.classifier);

    Ok(Html(pages::render(&context.template, &page)?))
}

/// POST /: classify the submission, rendering either the prediction or the
/// validation error back into the same form
async fn classify(
    State(context): State<Arc<Context>>,
    Form(submission): Form<RawSubmission>,
) -> Result<Html<String>, RenderError> {
    let page = match context.classifier.classify(&submission) {
        Ok(prediction) => Page::with_prediction(&context.classifier, &submission, &prediction),
        Err(failure) => {
            debug!("Rejected submission: {failure}");

            Page::with_error(&context.classifier, &submission, &failure)
        }
    };

    Ok(Html(pages::render(&context.template, &page)?))
}

/// A template failure; pipeline failures render into the page instead
struct RenderError(liquid::Error);

impl From<liquid::Error> for RenderError {
    fn from(inner: liquid::Error) -> Self {
        Self(inner)
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("Failed to render the page: {}", self.0);

        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}
