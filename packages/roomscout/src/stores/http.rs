//! HTTP client for the external listing-storage service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::{PipelineError, Result, StorageError, StorageResult};
use crate::traits::ListingStore;
use crate::types::record::{ListingRecord, NewListing, SearchFilters};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Listing store backed by the storage service's HTTP API.
pub struct HttpListingStore {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    listings: Vec<ListingRecord>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: String,
}

impl HttpListingStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PipelineError::Config(format!("invalid storage base url: {e}")))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::Config(format!("http client build failed: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> StorageResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::MalformedResponse(format!("bad endpoint path: {e}")))
    }
}

#[async_trait]
impl ListingStore for HttpListingStore {
    async fn search(&self, filters: &SearchFilters) -> StorageResult<Vec<ListingRecord>> {
        let url = self.endpoint("listings/search")?;
        let response = self
            .client
            .post(url)
            .json(filters)
            .send()
            .await
            .map_err(|e| StorageError::Transport(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                code: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;
        Ok(body.listings)
    }

    async fn create(&self, listing: &NewListing) -> StorageResult<String> {
        let url = self.endpoint("listings")?;
        let response = self
            .client
            .post(url)
            .json(listing)
            .send()
            .await
            .map_err(|e| StorageError::Transport(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                code: status.as_u16(),
            });
        }

        let body: CreateResponse = response
            .json()
            .await
            .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;
        Ok(body.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_an_invalid_base_url() {
        assert!(HttpListingStore::new("not a url").is_err());
        assert!(HttpListingStore::new("http://localhost:4000/").is_ok());
    }
}
