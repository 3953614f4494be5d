use crate::errors::AppError;
use crate::models::ChartSpec;
use crate::page::QueryPage;
use crate::renderer::{Canvas, DashboardError, RenderTarget, TextElement, render_dashboard};
use crate::state::AppState;
use crate::stats::Summary;
use crate::ui::HtmlTarget;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub code: String,
    pub total_clicks: u64,
    pub country_chart: ChartSpec,
    pub referrer_chart: ChartSpec,
    pub summary: Summary,
}

/// Server-rendered dashboard. Failures still render the page, with the status banner set.
pub async fn dashboard(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let page = QueryPage::parse(query.as_deref().unwrap_or_default());
    let mut target = HtmlTarget::new();

    let status = match render_dashboard(&page, state.source.as_ref(), &mut target).await {
        Ok(rendered) => {
            target.add_details(&rendered.analytics);
            StatusCode::OK
        }
        Err(err) => AppError::from(err).status,
    };

    (status, Html(target.render_page())).into_response()
}

pub async fn dashboard_data(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<DashboardView>, AppError> {
    let page = QueryPage::parse(query.as_deref().unwrap_or_default());
    let rendered = render_dashboard(&page, state.source.as_ref(), &mut Discard).await?;

    Ok(Json(DashboardView {
        summary: Summary::from_response(&rendered.analytics),
        code: rendered.code.to_string(),
        total_clicks: rendered.analytics.total_clicks,
        country_chart: rendered.country_chart,
        referrer_chart: rendered.referrer_chart,
    }))
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// The JSON endpoint returns what was rendered instead of drawing it.
struct Discard;

impl RenderTarget for Discard {
    fn set_text(&mut self, _element: TextElement, _text: &str) {}

    fn draw_chart(&mut self, _canvas: Canvas, _chart: ChartSpec) {}

    fn show_error(&mut self, _error: &DashboardError) {}
}
