//! Update query client.

use std::sync::Arc;

use tracing::{debug, info};

use super::request::{AvailableUpdateRequest, Vin};
use super::response::UpdateQueryResult;
use crate::config::ServiceConfig;
use crate::error::{UpdateError, UpdateResult};
use crate::http::HttpClient;
use crate::report::pretty_json;

/// Parsed query result together with the raw exchange, kept for operators
/// who want to see what went over the wire.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub result: UpdateQueryResult,
    pub request_payload: String,
    pub raw_body: String,
}

/// Client for the update discovery endpoint.
pub struct UpdateQueryClient {
    http: Arc<dyn HttpClient>,
    config: ServiceConfig,
}

impl UpdateQueryClient {
    pub fn new(http: Arc<dyn HttpClient>, config: ServiceConfig) -> Self {
        Self { http, config }
    }

    /// Ask the service which updates are available for a vehicle.
    pub fn query(&self, vin: &Vin) -> UpdateResult<QueryOutcome> {
        let request = AvailableUpdateRequest::new(vin, &self.config.software_types)?;
        let payload = request.to_payload()?;
        let request_payload = String::from_utf8_lossy(&payload).into_owned();
        let url = self.config.query_url()?;

        info!(vin = %vin, endpoint = %self.config.endpoint, "Querying available updates");
        debug!(payload = %request_payload, "Update request payload");

        let response = self.http.post_json(&url, payload)?;
        if !(200..300).contains(&response.status) {
            return Err(UpdateError::Server {
                url: self.config.endpoint.clone(),
                status: response.status,
            });
        }

        let raw_body = String::from_utf8_lossy(&response.body).into_owned();
        let result: UpdateQueryResult =
            serde_json::from_slice(&response.body).map_err(|e| UpdateError::Decode {
                url: self.config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        debug!(body = %pretty_json(&raw_body), "Update response body");
        info!(
            request_result = %result.request_result,
            categories = result.software.len(),
            "Received update response"
        );

        Ok(QueryOutcome {
            result,
            request_payload,
            raw_body,
        })
    }
}
