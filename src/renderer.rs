//! The dashboard renderer: read the short code, fetch its analytics once, then
//! fill the counter and both charts of a [`RenderTarget`].

use crate::models::{
    AnalyticsResponse, Background, ChartKind, ChartSpec, CodeError, Dataset, ShortCode,
};
use crate::page::PageState;
use crate::source::{AnalyticsSource, FetchError};
use crate::stats::Series;
use thiserror::Error;
use tracing::{info, warn};

pub const CODE_PARAM: &str = "code";

const COUNTRY_PALETTE: &[&str] = &["#ff6384", "#36a2eb", "#cc65fe"];
const REFERRER_COLOR: &str = "#4bc0c0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextElement {
    Code,
    Clicks,
}

impl TextElement {
    pub fn id(self) -> &'static str {
        match self {
            TextElement::Code => "code",
            TextElement::Clicks => "clicks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canvas {
    CountryChart,
    ReferrerChart,
}

impl Canvas {
    pub fn id(self) -> &'static str {
        match self {
            Canvas::CountryChart => "countryChart",
            Canvas::ReferrerChart => "referrerChart",
        }
    }
}

/// The set of page elements the renderer writes into.
pub trait RenderTarget {
    fn set_text(&mut self, element: TextElement, text: &str);
    fn draw_chart(&mut self, canvas: Canvas, chart: ChartSpec);
    fn show_error(&mut self, error: &DashboardError);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("no short code given")]
    MissingCode,
    #[error("invalid short code: {0}")]
    InvalidCode(String),
    #[error("no analytics for {0}")]
    NotFound(ShortCode),
    #[error(transparent)]
    Fetch(FetchError),
}

impl From<CodeError> for DashboardError {
    fn from(err: CodeError) -> Self {
        match err {
            CodeError::Missing => DashboardError::MissingCode,
            CodeError::Invalid(reason) => DashboardError::InvalidCode(reason),
        }
    }
}

/// What was drawn for a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub code: ShortCode,
    pub analytics: AnalyticsResponse,
    pub country_chart: ChartSpec,
    pub referrer_chart: ChartSpec,
}

pub async fn render_dashboard<P, T>(
    page: &P,
    source: &dyn AnalyticsSource,
    target: &mut T,
) -> Result<Rendered, DashboardError>
where
    P: PageState + ?Sized,
    T: RenderTarget + ?Sized,
{
    let result = run(page, source, target).await;
    if let Err(err) = &result {
        warn!("dashboard render failed: {err}");
        target.show_error(err);
    }
    result
}

async fn run<P, T>(
    page: &P,
    source: &dyn AnalyticsSource,
    target: &mut T,
) -> Result<Rendered, DashboardError>
where
    P: PageState + ?Sized,
    T: RenderTarget + ?Sized,
{
    let raw = page.query_param(CODE_PARAM);
    let code = ShortCode::parse(raw.as_deref())?;
    target.set_text(TextElement::Code, code.as_str());

    let analytics = source.fetch(&code).await.map_err(|err| match err {
        FetchError::NotFound => DashboardError::NotFound(code.clone()),
        other => DashboardError::Fetch(other),
    })?;

    target.set_text(TextElement::Clicks, &analytics.total_clicks.to_string());

    let country_chart = country_chart(&analytics);
    let referrer_chart = referrer_chart(&analytics);
    target.draw_chart(Canvas::CountryChart, country_chart.clone());
    target.draw_chart(Canvas::ReferrerChart, referrer_chart.clone());

    info!(
        code = %code,
        total_clicks = analytics.total_clicks,
        "dashboard rendered"
    );

    Ok(Rendered {
        code,
        analytics,
        country_chart,
        referrer_chart,
    })
}

pub fn country_chart(data: &AnalyticsResponse) -> ChartSpec {
    let series = Series::countries(data);
    ChartSpec {
        kind: ChartKind::Pie,
        labels: series.labels,
        datasets: vec![Dataset {
            label: "Clicks by Country",
            data: series.values,
            background: Background::Palette(COUNTRY_PALETTE),
        }],
    }
}

pub fn referrer_chart(data: &AnalyticsResponse) -> ChartSpec {
    let series = Series::referrers(data);
    ChartSpec {
        kind: ChartKind::Bar,
        labels: series.labels,
        datasets: vec![Dataset {
            label: "Clicks by Referrer",
            data: series.values,
            background: Background::Single(REFERRER_COLOR),
        }],
    }
}
