use axum::response::Html;

use crate::views::render_index;

/// Landing page.
pub async fn index() -> Html<String> {
    Html(render_index())
}
