use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::{Outcome, SubmissionState};
use crate::routes::render_landing_page;
use crate::startup::BasePath;
use crate::waitlist::WaitlistHandler;

#[derive(Deserialize)]
pub struct FormData {
    email: String,
}

#[tracing::instrument(
    name = "Joining the waitlist",
    skip(form, handler, base_path),
    fields(waitlist_email = %form.email)
)]
pub async fn join_waitlist(
    form: web::Form<FormData>,
    handler: web::Data<WaitlistHandler>,
    base_path: web::Data<BasePath>,
) -> HttpResponse {
    let mut state = SubmissionState::with_email(form.0.email);
    let outcome = handler.submit(&mut state).await;
    HttpResponse::build(status_for(outcome))
        .content_type(ContentType::html())
        .body(render_landing_page(&base_path.0, &state))
}

fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Joined => StatusCode::OK,
        Outcome::AlreadyJoined => StatusCode::CONFLICT,
        Outcome::Rejected => StatusCode::BAD_REQUEST,
        Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
