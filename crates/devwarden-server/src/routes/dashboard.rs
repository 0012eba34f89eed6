use axum::response::Html;

const DASHBOARD_HTML: &str = include_str!("assets/dashboard.html");

/// `GET /`: admin dashboard. The page keeps its token in `localStorage`;
/// logging out only forgets it client-side.
pub async fn page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
