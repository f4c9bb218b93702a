//! Public card serving
//!
//! `/c/{slug}` is the link people share: crawlers get an HTML document
//! carrying Open Graph and Twitter meta tags, everyone else gets a
//! redirect to the destination URL and a view-count tick.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::card::{Card, CardType, Slug};
use crate::domain::crawler::is_crawler;
use crate::domain::media::{MediaStore, ServingMode};

/// Serve a card: meta tags for crawlers, a redirect for humans
///
/// GET /c/{slug}
pub async fn serve_card(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let card = state
        .cards
        .get_by_slug(&Slug::new(slug))
        .await?
        .ok_or_else(|| ApiError::not_found("Card not found"))?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if is_crawler(user_agent) {
        return Ok(Html(render_meta_document(&state, &card)).into_response());
    }

    // Count the visit, then send the human on their way
    state.cards.record_view(card.id()).await?;

    Ok(Redirect::temporary(card.destination_url()).into_response())
}

/// Serve the processed card image
///
/// GET /i/{slug}.png
///
/// Object-store backends redirect to the public URL; local media is
/// streamed with a day of cache.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let slug = filename
        .strip_suffix(".png")
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    let card = state
        .cards
        .get_by_slug(&Slug::new(slug))
        .await?
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    let media = state.cards.media();

    if media.serving_mode() == ServingMode::PublicUrl {
        let url = media.url(card.image_processed_key());
        return Ok(Redirect::temporary(&url).into_response());
    }

    let data = media
        .get(card.image_processed_key())
        .await
        .map_err(|_| ApiError::not_found("Image not found"))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename={}.png", card.slug()),
            ),
        ],
        data,
    )
        .into_response())
}

/// Serve raw uploads when the local media backend is active
///
/// GET /uploads/{*path}
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let media = state.cards.media();

    if media.serving_mode() != ServingMode::Proxied {
        return Err(ApiError::not_found("Not found"));
    }

    let data = media
        .get(&path)
        .await
        .map_err(|_| ApiError::not_found("Not found"))?;

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        data,
    )
        .into_response())
}

/// Render the crawler-facing HTML document for a card
fn render_meta_document(state: &AppState, card: &Card) -> String {
    let title = escape_html(card.title());
    let description = escape_html(card.description().unwrap_or_default());
    let image_url = escape_html(&state.image_url(card.slug().as_str()));
    let card_url = escape_html(&state.card_url(card.slug().as_str()));
    let destination = escape_html(card.destination_url());

    let twitter_card = match card.card_type() {
        CardType::Summary => "summary",
        CardType::SummaryLargeImage => "summary_large_image",
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="twitter:card" content="{twitter_card}">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{image_url}">

    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:image" content="{image_url}">
    <meta property="og:url" content="{card_url}">
    <meta property="og:type" content="website">

    <meta http-equiv="refresh" content="0;url={destination}">
    <title>{title}</title>
</head>
<body>
    <p>Redirecting to <a href="{destination}">{destination}</a>...</p>
    <script>
        window.location.href = "{destination}";
    </script>
</body>
</html>"#
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A & B"</b>"#),
            "&lt;b&gt;&quot;A &amp; B&quot;&lt;/b&gt;"
        );
    }
}
