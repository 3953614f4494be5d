use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_CODE_LEN: usize = 128;

/// Identifier of a shortened link, as read from the `code` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    Missing,
    Invalid(String),
}

impl ShortCode {
    /// Trims the raw value and rejects blank, oversized or control-character codes.
    pub fn parse(raw: Option<&str>) -> Result<Self, CodeError> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(CodeError::Missing);
        }
        if value.chars().count() > MAX_CODE_LEN {
            return Err(CodeError::Invalid(format!(
                "code is longer than {MAX_CODE_LEN} characters"
            )));
        }
        if value.chars().any(char::is_control) {
            return Err(CodeError::Invalid(
                "code contains control characters".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryClicks {
    pub country: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerClicks {
    pub referrer: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentClicks {
    pub user_agent: String,
    pub clicks: u64,
}

/// Body of `GET /analytics/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    pub total_clicks: u64,
    pub by_country: Vec<CountryClicks>,
    pub by_referrer: Vec<ReferrerClicks>,
    #[serde(default)]
    pub by_user_agent: Vec<UserAgentClicks>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Background {
    Single(&'static str),
    Palette(&'static [&'static str]),
}

impl Background {
    /// Colour for the item at `index`; palettes repeat.
    pub fn color_at(&self, index: usize) -> &'static str {
        match self {
            Background::Single(color) => *color,
            Background::Palette(colors) if colors.is_empty() => "#999999",
            Background::Palette(colors) => colors[index % colors.len()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<u64>,
    pub background: Background,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSpec {
    pub fn first_dataset(&self) -> Option<&Dataset> {
        self.datasets.first()
    }
}
