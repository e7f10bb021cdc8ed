//! Server-rendered search page.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

use super::{AppState, SearchQuery};
use crate::models::{ProductRecord, ReviewRecord};
use crate::services::{ResultSource, SearchOutcome};

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}\
th,td{border:1px solid #ccc;padding:.4rem;text-align:left;vertical-align:top}\
.muted{color:#777}.error{color:#b00}";

/// `GET /`
pub async fn index() -> Html<String> {
    Html(render(None, None, ""))
}

/// `POST /` with form field `query`.
pub async fn search_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchQuery>,
) -> Response {
    if form.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Html(render(None, Some("Please enter a product to search for."), "")),
        )
            .into_response();
    }

    let outcome = state.search_service().search(&form.query).await;
    info!(
        term = %outcome.term,
        source = ?outcome.source,
        products = outcome.total_products,
        "Form search completed"
    );

    Html(render(Some(&outcome), None, &form.query)).into_response()
}

fn render(outcome: Option<&SearchOutcome>, message: Option<&str>, query: &str) -> String {
    let mut page = String::with_capacity(4096);

    let _ = write!(
        page,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>revkart</title>\
         <style>{STYLE}</style></head><body><h1>Product review search</h1>\
         <form method=\"post\" action=\"/\">\
         <input type=\"text\" name=\"query\" value=\"{}\" placeholder=\"Search for products\">\
         <button type=\"submit\">Search</button></form>",
        encode_double_quoted_attribute(query)
    );

    if let Some(message) = message {
        let _ = write!(page, "<p class=\"error\">{}</p>", encode_text(message));
    }

    if let Some(outcome) = outcome {
        render_outcome(&mut page, outcome);
    }

    page.push_str("</body></html>");
    page
}

fn render_outcome(page: &mut String, outcome: &SearchOutcome) {
    // Only fresh scrapes report a total.
    if outcome.source == ResultSource::Scrape {
        let _ = write!(
            page,
            "<p>Total products: {}</p>",
            outcome.total_products
        );
    }

    if outcome.products.is_empty() {
        let _ = write!(
            page,
            "<p class=\"muted\">No products found for {}.</p>",
            encode_text(&outcome.term)
        );
        return;
    }

    for product in &outcome.products {
        render_product(page, product);
    }
}

fn render_product(page: &mut String, product: &ProductRecord) {
    let _ = write!(page, "<h2>{}</h2>", encode_text(product.display_name()));

    if product.reviews.is_empty() {
        page.push_str("<p class=\"muted\">No reviews.</p>");
        return;
    }

    page.push_str(
        "<table><tr><th>Name</th><th>Rating</th><th>In short</th><th>Description</th></tr>",
    );
    for review in &product.reviews {
        render_review(page, review);
    }
    page.push_str("</table>");
}

fn render_review(page: &mut String, review: &ReviewRecord) {
    let cell = |value: &Option<String>| -> String {
        value.as_deref().map_or_else(
            || "<span class=\"muted\">-</span>".to_string(),
            |v| encode_text(v).into_owned(),
        )
    };

    let _ = write!(
        page,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        cell(&review.name),
        cell(&review.rating),
        cell(&review.short_summary),
        cell(&review.description)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes_scraped_text() {
        let outcome = SearchOutcome {
            term: "tv".to_string(),
            source: ResultSource::Cache,
            total_products: 1,
            products: vec![ProductRecord {
                name: Some("<script>alert(1)</script>".to_string()),
                reviews: vec![ReviewRecord {
                    name: Some("Tom & Jerry".to_string()),
                    ..Default::default()
                }],
            }],
        };

        let page = render(Some(&outcome), None, "tv");
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("Tom &amp; Jerry"));
        assert!(!page.contains("<script>"));
        assert!(!page.contains("Total products"));
    }

    #[test]
    fn test_render_fresh_scrape_shows_total() {
        let outcome = SearchOutcome {
            term: "kettle".to_string(),
            source: ResultSource::Scrape,
            total_products: 0,
            products: Vec::new(),
        };

        let page = render(Some(&outcome), None, "kettle");
        assert!(page.contains("Total products: 0"));
        assert!(page.contains("No products found for kettle."));
    }
}
