//! src/routes/home/mod.rs

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

use crate::domain::SubmissionState;
use crate::startup::BasePath;

pub async fn home(base_path: web::Data<BasePath>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_landing_page(&base_path.0, &SubmissionState::new()))
}

/// Landing page with the waitlist form showing `state`.
pub fn render_landing_page(base_path: &str, state: &SubmissionState) -> String {
    let message = if state.message().is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="waitlist-message" role="status">{}</div>"#,
            html_escape(state.message())
        )
    };
    let disabled = if state.is_loading() { " disabled" } else { "" };

    // the email goes in last so nothing typed into the field is substituted again
    include_str!("home.html")
        .replace("{{base_path}}", &html_escape(base_path))
        .replace("{{disabled}}", disabled)
        .replace("{{submit_label}}", state.submit_label())
        .replace("{{message}}", &message)
        .replace("{{email}}", &html_escape(state.email()))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
