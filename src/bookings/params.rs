use url::form_urlencoded;

use super::status::BookingStatus;

/// Ordered query-string pairs, kept as received so links can be rebuilt from them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Replace every value of `key` with a single one, keeping its first position
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = false;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// The list-page parameters after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct ParamsValues {
    pub page: u32,
    pub per_page_param: Option<u32>,
    pub search: Option<String>,
    pub status: Option<BookingStatus>,
}

pub fn params_values(params: &SearchParams) -> ParamsValues {
    let page = params
        .get("page")
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let per_page_param = params
        .get("per_page")
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1);

    let search = params
        .get("s")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let status = params.get("status").and_then(|raw| {
        let status = BookingStatus::parse_filter(raw);
        if status.is_none() && !raw.trim().is_empty() && !raw.trim().eq_ignore_ascii_case("all") {
            tracing::debug!("Ignoring unknown booking status filter '{}'", raw);
        }
        status
    });

    ParamsValues { page, per_page_param, search, status }
}
