//! API route configuration.
//!
//! Every API endpoint acts on behalf of the owner named in the `X-Owner-Id`
//! header (see [`crate::api::middleware::owner`]).

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    stats_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /urls`              - Create a short link
/// - `GET    /urls`              - List the caller's links (paginated)
/// - `GET    /urls/{code}`       - Fetch a link
/// - `PUT    /urls/{code}`       - Change a link's destination
/// - `DELETE /urls/{code}`       - Delete a link
/// - `GET    /urls/{code}/stats` - Click statistics
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_links_handler).post(create_link_handler))
        .route(
            "/urls/{code}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/urls/{code}/stats", get(stats_handler))
}
