//! Static informational pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::web::pages::{render, Page};

pub async fn home_handler() -> Html<String> {
    Html(render(Page::Home))
}

pub async fn about_handler() -> Html<String> {
    Html(render(Page::About))
}

pub async fn services_handler() -> Html<String> {
    Html(render(Page::Services))
}

pub async fn members_handler() -> Html<String> {
    Html(render(Page::Members))
}

pub async fn contactus_handler() -> Html<String> {
    Html(render(Page::ContactUs))
}

pub async fn education_handler() -> Html<String> {
    Html(render(Page::Education))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(render(Page::NotFound)))
}
