//! Typed calls against the catalog API, mapping HTTP outcomes onto
//! [`FetchError`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{FetchError, FetchResult};
use crate::mapper::{self, ListPage, PokemonDetail, PokemonId};
use crate::query::{self, RequestDescriptor};
use crate::transport::{HttpResponse, Transport};
use pokedex_schema::ErrorPayload;

#[derive(Debug, Clone)]
pub struct PokedexClient<T> {
    transport: T,
    api_base: String,
}

impl<T: Transport> PokedexClient<T> {
    pub fn new(transport: T, api_base: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub async fn fetch_types(&self) -> FetchResult<Vec<String>> {
        let body = self.get_json(&query::types_request(), None).await?;
        Ok(mapper::map_type_names(&body))
    }

    pub async fn fetch_list(&self, request: &RequestDescriptor) -> FetchResult<ListPage> {
        let body = self.get_json(request, None).await?;
        Ok(mapper::map_list_payload(&body))
    }

    pub async fn fetch_detail(&self, id: PokemonId) -> FetchResult<PokemonDetail> {
        let body = self.get_json(&query::detail_request(id), Some(id)).await?;
        mapper::map_detail_payload(body)
    }

    /// `Ok(())` when the backend answers `/health` with a 2xx.
    pub async fn check_health(&self) -> FetchResult<()> {
        let response = self.send(&query::health_request()).await?;
        check_status(&response, None)
    }

    async fn send(&self, request: &RequestDescriptor) -> FetchResult<HttpResponse> {
        let url = request.url(&self.api_base);
        self.transport.get(&url).await.map_err(|e| {
            warn!("request to {} failed: {}", url, e);
            FetchError::Network(e.0)
        })
    }

    /// `detail_id` marks detail lookups, where a 404 means "no such Pokemon"
    /// rather than a broken endpoint.
    async fn get_json(
        &self,
        request: &RequestDescriptor,
        detail_id: Option<PokemonId>,
    ) -> FetchResult<Value> {
        let response = self.send(request).await?;
        check_status(&response, detail_id)?;
        serde_json::from_str(&response.body).map_err(|e| {
            warn!("undecodable body from {}: {}", request.path(), e);
            FetchError::Decode(e.to_string())
        })
    }
}

fn check_status(response: &HttpResponse, detail_id: Option<PokemonId>) -> FetchResult<()> {
    if response.is_success() {
        return Ok(());
    }

    if let Ok(ErrorPayload {
        detail: Some(detail),
    }) = serde_json::from_str::<ErrorPayload>(&response.body)
    {
        debug!("server said: {}", detail);
    }

    match (response.status, detail_id) {
        (404, Some(id)) => Err(FetchError::NotFound { id }),
        (status, _) => Err(FetchError::Http { status }),
    }
}
