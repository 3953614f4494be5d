use crate::charts::{render_chart, render_placeholder};
use crate::models::{AnalyticsResponse, ChartSpec};
use crate::renderer::{Canvas, DashboardError, RenderTarget, TextElement};
use crate::stats::{Series, Summary, TopEntry};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Render target that collects everything the renderer draws and turns it into a page.
#[derive(Debug, Default)]
pub struct HtmlTarget {
    code: Option<String>,
    clicks: Option<String>,
    country_chart: Option<ChartSpec>,
    referrer_chart: Option<ChartSpec>,
    error: Option<String>,
    summary: Option<Summary>,
    user_agents: Series,
}

impl HtmlTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the summary panel and user-agent table for a loaded response.
    pub fn add_details(&mut self, data: &AnalyticsResponse) {
        self.summary = Some(Summary::from_response(data));
        self.user_agents = Series::user_agents(data);
    }

    pub fn render_page(&self) -> String {
        self.render_page_at(Local::now())
    }

    pub fn render_page_at(&self, now: DateTime<Local>) -> String {
        let (status_type, status) = match &self.error {
            Some(message) => ("error", message.as_str()),
            None => ("", ""),
        };

        let rendered_at = now.format("%Y-%m-%d %H:%M").to_string();
        fill_template(INDEX_HTML, |key| match key {
            "COUNTRY_CHART" => Some(self.chart_html(Canvas::CountryChart)),
            "REFERRER_CHART" => Some(self.chart_html(Canvas::ReferrerChart)),
            "SUMMARY" => Some(self.summary_html()),
            "USER_AGENTS" => Some(self.user_agents_html()),
            "STATUS_TYPE" => Some(status_type.to_string()),
            "STATUS" => Some(escape_html(status)),
            "RENDERED_AT" => Some(rendered_at.clone()),
            "CLICKS" => Some(escape_html(self.clicks.as_deref().unwrap_or("--"))),
            "CODE" => Some(escape_html(self.code.as_deref().unwrap_or_default())),
            _ => None,
        })
    }

    fn chart_html(&self, canvas: Canvas) -> String {
        let chart = match canvas {
            Canvas::CountryChart => &self.country_chart,
            Canvas::ReferrerChart => &self.referrer_chart,
        };
        match chart {
            Some(chart) => render_chart(canvas.id(), chart),
            None => render_placeholder(canvas.id(), "Nothing to show"),
        }
    }

    fn summary_html(&self) -> String {
        let Some(summary) = &self.summary else {
            return String::new();
        };
        let mut out = String::from(r#"<section class="panel">"#);
        stat(&mut out, "Countries", &summary.countries.to_string());
        stat(&mut out, "Referrers", &summary.referrers.to_string());
        stat(&mut out, "Top country", &top_label(summary.top_country.as_ref()));
        stat(&mut out, "Top referrer", &top_label(summary.top_referrer.as_ref()));
        out.push_str("</section>");
        out
    }

    fn user_agents_html(&self) -> String {
        if self.user_agents.is_empty() {
            return String::new();
        }
        let mut out = String::from(
            r#"<section class="chart-card"><h2>Clicks by User Agent</h2><table class="agents"><tbody>"#,
        );
        for (agent, clicks) in self.user_agents.labels.iter().zip(&self.user_agents.values) {
            let _ = write!(
                out,
                "<tr><td>{}</td><td class=\"num\">{clicks}</td></tr>",
                escape_html(agent)
            );
        }
        out.push_str("</tbody></table></section>");
        out
    }
}

impl RenderTarget for HtmlTarget {
    fn set_text(&mut self, element: TextElement, text: &str) {
        match element {
            TextElement::Code => self.code = Some(text.to_string()),
            TextElement::Clicks => self.clicks = Some(text.to_string()),
        }
    }

    fn draw_chart(&mut self, canvas: Canvas, chart: ChartSpec) {
        match canvas {
            Canvas::CountryChart => self.country_chart = Some(chart),
            Canvas::ReferrerChart => self.referrer_chart = Some(chart),
        }
    }

    fn show_error(&mut self, error: &DashboardError) {
        self.error = Some(error.to_string());
    }
}

fn stat(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        r#"<div class="stat"><span class="label">{label}</span><span class="value">{}</span></div>"#,
        escape_html(value)
    );
}

fn top_label(entry: Option<&TopEntry>) -> String {
    match entry {
        Some(TopEntry { label, share: Some(share), .. }) => format!("{label} ({share:.0}%)"),
        Some(TopEntry { label, clicks, .. }) => format!("{label} ({clicks})"),
        None => "--".to_string(),
    }
}

/// Replaces each `{{KEY}}` of `template` in a single pass; inserted values are never rescanned.
/// Unknown keys are kept as written.
fn fill_template(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match value(key) {
                    Some(text) => out.push_str(&text),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Link Analytics</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat,
    .chart-card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      display: block;
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
      word-break: break-all;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
    }

    .chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .agents {
      width: 100%;
      border-collapse: collapse;
    }

    .agents td {
      padding: 6px 4px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .agents .num {
      text-align: right;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Link Analytics</h1>
    </header>

    <div class="status" id="status" data-type="{{STATUS_TYPE}}">{{STATUS}}</div>

    <section class="panel">
      <div class="stat">
        <span class="label">Short code</span>
        <span id="code" class="value">{{CODE}}</span>
      </div>
      <div class="stat">
        <span class="label">Total clicks</span>
        <span id="clicks" class="value">{{CLICKS}}</span>
      </div>
    </section>

    {{SUMMARY}}

    <section class="charts">
      <div class="chart-card">
        <h2>Clicks by Country</h2>
        {{COUNTRY_CHART}}
      </div>
      <div class="chart-card">
        <h2>Clicks by Referrer</h2>
        {{REFERRER_CHART}}
      </div>
    </section>

    {{USER_AGENTS}}

    <p class="hint">Rendered {{RENDERED_AT}}.</p>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CountryClicks, ReferrerClicks, UserAgentClicks};
    use crate::renderer::{country_chart, referrer_chart};

    fn data() -> AnalyticsResponse {
        AnalyticsResponse {
            short_code: None,
            total_clicks: 42,
            by_country: vec![CountryClicks { country: "US".into(), clicks: 10 }],
            by_referrer: vec![ReferrerClicks { referrer: "google".into(), clicks: 8 }],
            by_user_agent: vec![UserAgentClicks { user_agent: "curl/8".into(), clicks: 2 }],
        }
    }

    #[test]
    fn page_carries_dom_contract_ids() {
        let data = data();
        let mut target = HtmlTarget::new();
        target.set_text(TextElement::Code, "abc123");
        target.set_text(TextElement::Clicks, "42");
        target.draw_chart(Canvas::CountryChart, country_chart(&data));
        target.draw_chart(Canvas::ReferrerChart, referrer_chart(&data));
        target.add_details(&data);

        let html = target.render_page();
        assert!(html.contains(r#"<span id="code" class="value">abc123</span>"#));
        assert!(html.contains(r#"<span id="clicks" class="value">42</span>"#));
        assert!(html.contains(r#"<svg id="countryChart""#));
        assert!(html.contains(r#"<svg id="referrerChart""#));
        assert!(html.contains("curl/8"));
        assert!(html.contains("Top referrer"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn code_is_escaped() {
        let mut target = HtmlTarget::new();
        target.set_text(TextElement::Code, "<b>x</b>");
        let html = target.render_page();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn error_state_is_visible() {
        let mut target = HtmlTarget::new();
        target.show_error(&DashboardError::MissingCode);
        let html = target.render_page();
        assert!(html.contains(r#"data-type="error">no short code given<"#));
        assert!(html.contains(r#"<svg id="countryChart""#));
        assert!(html.contains(r#"<span id="clicks" class="value">--</span>"#));
    }

    #[test]
    fn placeholder_like_text_is_kept_literally() {
        let mut data = data();
        data.by_referrer[0].referrer = "{{CODE}}".into();
        data.by_user_agent[0].user_agent = "{{CLICKS}}".into();
        let mut target = HtmlTarget::new();
        target.set_text(TextElement::Code, "abc123");
        target.set_text(TextElement::Clicks, "42");
        target.draw_chart(Canvas::ReferrerChart, referrer_chart(&data));
        target.add_details(&data);

        let html = target.render_page();
        assert!(html.contains(r#"text-anchor="middle">{{CODE}}</text>"#));
        assert!(html.contains("<td>{{CLICKS}}</td>"));
        assert!(html.contains(r#"<span id="code" class="value">abc123</span>"#));
    }

    #[test]
    fn template_fill_does_not_rescan_values() {
        let filled = fill_template("{{A}}-{{B}}-{{C}}-{{", |key| match key {
            "A" => Some("{{B}}".to_string()),
            "B" => Some("b".to_string()),
            _ => None,
        });
        assert_eq!(filled, "{{B}}-b-{{C}}-{{");
    }

    #[test]
    fn escape_covers_quotes() {
        assert_eq!(escape_html(r#"a"b'c&"#), "a&quot;b&#39;c&amp;");
    }
}
