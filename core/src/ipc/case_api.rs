use reqwest::Client;
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::types::AlertPayload;

const ALERT_TITLE: &str = "Security Alert";
const ALERT_TYPE: &str = "external";
const ALERT_SOURCE: &str = "Elasticsearch";
const ALERT_SOURCE_REF: &str = "es_alert_001";

// One alert per call, fixed shape.
pub struct CaseApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CaseApi {
    pub fn new(config: &PipelineConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| format!("failed to build case client: {}", error))?;

        Ok(CaseApi {
            client,
            base_url: config.case_url.clone(),
            api_key: config.case_api_key.clone(),
        })
    }

    pub async fn create_alert(&self, description: &str) -> Result<Value, String> {
        let url = format!("{}/api/alert", self.base_url.trim_end_matches('/'));
        let payload = alert_payload(description);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|error| error.to_string())?;

        if !response.status().is_success() {
            return Err(format!("case response {}", response.status()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|error| error.to_string())
    }
}

fn alert_payload(description: &str) -> AlertPayload<'_> {
    AlertPayload {
        title: ALERT_TITLE,
        description,
        alert_type: ALERT_TYPE,
        source: ALERT_SOURCE,
        source_ref: ALERT_SOURCE_REF,
    }
}
