use crate::models::{ChartKind, ChartSpec};
use crate::ui::escape_html;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 44.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;
const TICKS: u32 = 4;

/// Renders a chart spec as an inline `<svg>` carrying the given element id.
pub fn render_chart(id: &str, chart: &ChartSpec) -> String {
    let title = chart.first_dataset().map(|d| d.label).unwrap_or_default();
    let body = match chart.kind {
        ChartKind::Pie => pie_body(chart),
        ChartKind::Bar => bar_body(chart),
    };
    format!(
        r#"<svg id="{id}" class="chart chart-{kind}" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{title}">{body}</svg>"#,
        id = escape_html(id),
        kind = kind_name(chart.kind),
        title = escape_html(title),
    )
}

/// Empty chart shell used when nothing was drawn for a canvas.
pub fn render_placeholder(id: &str, message: &str) -> String {
    format!(
        r#"<svg id="{id}" class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img">{body}</svg>"#,
        id = escape_html(id),
        body = placeholder(message),
    )
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Pie => "pie",
        ChartKind::Bar => "bar",
    }
}

fn placeholder(message: &str) -> String {
    format!(
        r#"<text class="chart-label" x="50%" y="50%" text-anchor="middle">{}</text>"#,
        escape_html(message)
    )
}

fn pie_body(chart: &ChartSpec) -> String {
    let Some(dataset) = chart.first_dataset() else {
        return placeholder("No data yet");
    };
    let total: f64 = dataset.data.iter().map(|&v| v as f64).sum();
    if total == 0.0 {
        return placeholder("No data yet");
    }

    let (cx, cy, r) = (130.0, HEIGHT / 2.0, 100.0);
    let visible: Vec<usize> = (0..dataset.data.len())
        .filter(|&i| dataset.data[i] > 0)
        .collect();

    let mut out = String::new();
    if let [only] = visible.as_slice() {
        let _ = write!(
            out,
            r#"<circle class="chart-slice" cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{}" />"#,
            dataset.background.color_at(*only)
        );
    } else {
        let mut angle = -FRAC_PI_2;
        for &i in &visible {
            let sweep = dataset.data[i] as f64 / total * TAU;
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            angle += sweep;
            let (x2, y2) = (cx + r * angle.cos(), cy + r * angle.sin());
            let large = u8::from(sweep > std::f64::consts::PI);
            let _ = write!(
                out,
                r#"<path class="chart-slice" d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large} 1 {x2:.2} {y2:.2} Z" fill="{}" />"#,
                dataset.background.color_at(i)
            );
        }
    }

    let legend_x = 270.0;
    for (i, (label, value)) in chart.labels.iter().zip(&dataset.data).enumerate() {
        let y = TOP + 8.0 + i as f64 * 22.0;
        if y > HEIGHT - 8.0 {
            break;
        }
        let _ = write!(
            out,
            r#"<rect x="{legend_x:.2}" y="{:.2}" width="12" height="12" rx="3" fill="{}" /><text class="chart-label" x="{:.2}" y="{y:.2}">{} ({value})</text>"#,
            y - 10.0,
            dataset.background.color_at(i),
            legend_x + 20.0,
            escape_html(label),
        );
    }
    out
}

fn bar_body(chart: &ChartSpec) -> String {
    let Some(dataset) = chart.first_dataset() else {
        return placeholder("No data yet");
    };
    if dataset.data.is_empty() {
        return placeholder("No data yet");
    }

    let max = dataset.data.iter().copied().max().unwrap_or(0).max(1) as f64;
    let plot_height = HEIGHT - TOP - PADDING_Y;
    let y = |value: f64| HEIGHT - PADDING_Y - value / max * plot_height;

    let mut out = String::new();
    for i in 0..=TICKS {
        let value = max * f64::from(i) / f64::from(TICKS);
        let y_pos = y(value);
        let _ = write!(
            out,
            r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y_pos:.2}" x2="{:.2}" y2="{y_pos:.2}" /><text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            WIDTH - PADDING_X,
            PADDING_X - 10.0,
            y_pos + 4.0,
            format_axis_value(value),
        );
    }

    let count = dataset.data.len();
    let slot = (WIDTH - PADDING_X * 2.0) / count as f64;
    let bar_width = slot * 0.6;
    let label_every = if count > 8 { 2 } else { 1 };

    for (i, &value) in dataset.data.iter().enumerate() {
        let x = PADDING_X + slot * i as f64 + (slot - bar_width) / 2.0;
        let top = y(value as f64);
        let _ = write!(
            out,
            r#"<rect class="chart-bar" x="{x:.2}" y="{top:.2}" width="{bar_width:.2}" height="{:.2}" fill="{}"><title>{value}</title></rect>"#,
            HEIGHT - PADDING_Y - top,
            dataset.background.color_at(i),
        );
        if i % label_every == 0 {
            let label = chart.labels.get(i).map(String::as_str).unwrap_or_default();
            let _ = write!(
                out,
                r#"<text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                x + bar_width / 2.0,
                HEIGHT - PADDING_Y + 18.0,
                escape_html(label),
            );
        }
    }
    out
}

fn format_axis_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
