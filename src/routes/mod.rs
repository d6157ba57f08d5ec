pub mod comments;
pub mod images;
pub mod posts;

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .merge(posts::router())
        .merge(comments::router())
        .merge(images::router())
}

async fn home() -> Html<&'static str> {
    Html("<h1>Hello, world!</h1>")
}
