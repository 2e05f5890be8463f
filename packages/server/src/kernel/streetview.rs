//! Google Maps street-imagery and place-search client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::traits::{BaseStreetImagery, ImageryLookup, PlaceLookup};

const STREET_VIEW_URL: &str = "https://maps.googleapis.com/maps/api/streetview";
const PLACE_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

pub struct StreetViewClient {
    client: reqwest::Client,
    api_key: String,
}

impl StreetViewClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl BaseStreetImagery for StreetViewClient {
    async fn street_view(&self, address: &str) -> Result<ImageryLookup> {
        let url = format!(
            "{}?size=600x400&location={}&key={}",
            STREET_VIEW_URL,
            urlencoding::encode(address),
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("street view request failed")?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .context("failed to read street view body")?;

        debug!(address = %address, status, bytes = body.len(), "street view lookup");

        Ok(ImageryLookup {
            status,
            content_length: body.len(),
        })
    }

    async fn place_types(&self, address: &str) -> Result<PlaceLookup> {
        let url = format!(
            "{}?query={}&key={}",
            PLACE_SEARCH_URL,
            urlencoding::encode(address),
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("place search request failed")?;

        let status = response.status().as_u16();
        let body: serde_json::Value = response
            .json()
            .await
            .context("failed to parse place search response")?;

        let types = body["results"]
            .get(0)
            .and_then(|r| r["types"].as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        debug!(address = %address, status, ?types, "place search lookup");

        Ok(PlaceLookup { status, types })
    }
}
