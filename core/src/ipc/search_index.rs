use reqwest::Client;
use serde_json::Value;

use crate::config::PipelineConfig;

pub struct EventFetcher {
    client: Client,
    base_url: String,
    index: String,
    api_key: String,
}

impl EventFetcher {
    pub fn new(config: &PipelineConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| format!("failed to build search client: {}", error))?;

        Ok(EventFetcher {
            client,
            base_url: config.search_url.clone(),
            index: config.search_index.clone(),
            api_key: config.search_api_key.clone(),
        })
    }

    // One authenticated search, raw JSON body back. No pagination, no retry.
    pub async fn fetch_events(&self) -> Result<Value, String> {
        let url = search_url(&self.base_url, &self.index);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .send()
            .await
            .map_err(|error| error.to_string())?;

        if !response.status().is_success() {
            return Err(format!("search response {}", response.status()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|error| error.to_string())
    }
}

fn search_url(base_url: &str, index: &str) -> String {
    format!("{}/{}/_search", base_url.trim_end_matches('/'), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::path::PathBuf;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Serves one canned HTTP response on a loopback socket and returns the
    // base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });

        format!("http://{}", addr)
    }

    fn config(base_url: &str) -> PipelineConfig {
        PipelineConfig {
            search_url: base_url.to_string(),
            search_index: "security_events".to_string(),
            search_api_key: String::new(),
            case_url: base_url.to_string(),
            case_api_key: String::new(),
            playbook_program: "ansible-playbook".to_string(),
            playbook_path: PathBuf::from("ansible_playbook.yml"),
            http_timeout: Duration::from_secs(5),
            chart_path: PathBuf::from("trend.html"),
            open_chart: false,
        }
    }

    #[tokio::test]
    async fn non_success_status_aborts_the_fetch() {
        let base = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let fetcher = EventFetcher::new(&config(&base)).unwrap();

        let error = fetcher.fetch_events().await.unwrap_err();
        assert!(error.contains("500"), "{}", error);
    }

    #[tokio::test]
    async fn success_status_returns_the_raw_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"hits":{"hits":[]}}"#).await;
        let fetcher = EventFetcher::new(&config(&base)).unwrap();

        let raw = fetcher.fetch_events().await.unwrap();
        assert!(raw["hits"]["hits"].as_array().unwrap().is_empty());
    }

    #[test]
    fn search_url_joins_base_and_index() {
        assert_eq!(
            search_url("http://localhost:9200", "security_events"),
            "http://localhost:9200/security_events/_search"
        );
    }

    #[test]
    fn search_url_strips_trailing_slash() {
        assert_eq!(
            search_url("http://localhost:9200/", "security_events"),
            "http://localhost:9200/security_events/_search"
        );
    }
}
