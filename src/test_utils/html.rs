use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

use crate::flash::FlashKind;

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The kind and text of the flash banner on a page.
#[track_caller]
pub(crate) fn must_get_flash(html: &Html) -> (FlashKind, String) {
    let alert = html
        .select(&Selector::parse("#flash [role=alert]").unwrap())
        .next()
        .expect("No flash message found");

    let kind = match alert.value().attr("data-alert-kind") {
        Some("success") => FlashKind::Success,
        Some("error") => FlashKind::Error,
        other => panic!("unexpected alert kind {other:?}"),
    };
    let message = alert
        .select(&Selector::parse("p").unwrap())
        .next()
        .expect("Flash message has no text")
        .text()
        .collect::<String>()
        .trim()
        .to_owned();

    (kind, message)
}

/// The trimmed text of each cell, header cells included, for each body row of
/// the first table.
#[track_caller]
pub(crate) fn must_get_table_rows(html: &Html) -> Vec<Vec<String>> {
    let table = html
        .select(&Selector::parse("table").unwrap())
        .next()
        .expect("Could not find table in HTML");
    let cell_selector = Selector::parse("th, td").unwrap();

    table
        .select(&Selector::parse("tbody tr").unwrap())
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_owned())
                .collect()
        })
        .collect()
}
