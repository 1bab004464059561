//! Turns filter and pagination state into request descriptors.

use crate::filters::FilterState;
use crate::mapper::PokemonId;
use crate::pagination::PaginationState;

/// A GET request against the catalog API: a path plus ordered query pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor {
    path: String,
    params: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value of the first parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Form-urlencoded query string, in parameter order.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// Full URL against `api_base` (which may or may not end in '/').
    pub fn url(&self, api_base: &str) -> String {
        let base = api_base.trim_end_matches('/');
        if self.params.is_empty() {
            format!("{}{}", base, self.path)
        } else {
            format!("{}{}?{}", base, self.path, self.query_string())
        }
    }
}

/// Builds the list/search request.
///
/// Keys always appear in the same order (`search`, `types`, `match`, stat
/// bounds in stat order, `limit`, `offset`) so equal inputs produce
/// byte-identical queries.
pub fn build_list_request(filters: &FilterState, pagination: &PaginationState) -> RequestDescriptor {
    let mut request = RequestDescriptor::new("/pokemon");

    if let Some(term) = filters.search_term() {
        request = request.with_param("search", term);
    }

    if !filters.types().is_empty() {
        request = request
            .with_param("types", filters.types().join(","))
            .with_param("match", filters.match_mode().as_str());
    }

    for (stat, range) in filters.stats() {
        request = request
            .with_param(format!("{}_min", stat), range.min().to_string())
            .with_param(format!("{}_max", stat), range.max().to_string());
    }

    request
        .with_param("limit", pagination.limit().to_string())
        .with_param("offset", pagination.offset().to_string())
}

pub fn types_request() -> RequestDescriptor {
    RequestDescriptor::new("/pokemon/types")
}

pub fn detail_request(id: PokemonId) -> RequestDescriptor {
    RequestDescriptor::new(format!("/pokemon/{}", id))
}

pub fn health_request() -> RequestDescriptor {
    RequestDescriptor::new("/health")
}
