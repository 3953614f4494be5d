use crate::models::AnalyticsResponse;
use serde::Serialize;

/// Parallel label/value arrays derived from one breakdown, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl Series {
    pub fn countries(data: &AnalyticsResponse) -> Self {
        data.by_country
            .iter()
            .map(|entry| (entry.country.clone(), entry.clicks))
            .collect()
    }

    pub fn referrers(data: &AnalyticsResponse) -> Self {
        data.by_referrer
            .iter()
            .map(|entry| (entry.referrer.clone(), entry.clicks))
            .collect()
    }

    pub fn user_agents(data: &AnalyticsResponse) -> Self {
        data.by_user_agent
            .iter()
            .map(|entry| (entry.user_agent.clone(), entry.clicks))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label with the most clicks; the earliest wins a tie.
    pub fn top(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (label, &value) in self.labels.iter().zip(&self.values) {
            if best.is_none_or(|(_, current)| value > current) {
                best = Some((label.as_str(), value));
            }
        }
        best
    }
}

impl FromIterator<(String, u64)> for Series {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let (labels, values) = iter.into_iter().unzip();
        Self { labels, values }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    pub label: String,
    pub clicks: u64,
    /// Percentage of `total_clicks`; absent when the total is zero.
    pub share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_clicks: u64,
    pub countries: usize,
    pub referrers: usize,
    pub top_country: Option<TopEntry>,
    pub top_referrer: Option<TopEntry>,
}

impl Summary {
    pub fn from_response(data: &AnalyticsResponse) -> Self {
        let countries = Series::countries(data);
        let referrers = Series::referrers(data);
        let total = data.total_clicks;

        let top_entry = |series: &Series| {
            series.top().map(|(label, clicks)| TopEntry {
                label: label.to_string(),
                clicks,
                share: (total > 0).then(|| clicks as f64 * 100.0 / total as f64),
            })
        };

        Self {
            total_clicks: total,
            countries: countries.labels.len(),
            referrers: referrers.labels.len(),
            top_country: top_entry(&countries),
            top_referrer: top_entry(&referrers),
        }
    }
}
