use std::collections::HashMap;

/// Read access to the state of the page being rendered.
pub trait PageState {
    fn query_param(&self, name: &str) -> Option<String>;
}

/// Page state backed by a decoded query string.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    params: HashMap<String, String>,
}

impl QueryPage {
    /// Parses `a=1&b=2`, with or without a leading `?`. The first occurrence of a key wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { params }
    }
}

impl PageState for QueryPage {
    fn query_param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }
}
