use plagicheck_core::{DeferredSearchProvider, Error, Result, SearchOperation};
use serde::Deserialize;
use std::time::Duration;

/// Per-request HTTP timeout. The poll loop's wall-clock deadline lives in
/// the gateway; this only bounds a single round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

fn api_key_from_env() -> Option<String> {
    std::env::var("PLAGICHECK_SEARCH_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn folder_id_from_env() -> Option<String> {
    std::env::var("PLAGICHECK_SEARCH_FOLDER_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn search_endpoint_from_env() -> Option<String> {
    std::env::var("PLAGICHECK_SEARCH_ENDPOINT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn operation_endpoint_from_env() -> Option<String> {
    std::env::var("PLAGICHECK_OPERATION_ENDPOINT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// True when provider credentials are present. The sole gate deciding
/// whether a check runs the evidence pipeline or the fallback heuristic.
pub fn cloud_enabled() -> bool {
    api_key_from_env().is_some() && folder_id_from_env().is_some()
}

/// Client for a deferred ("submit, then poll the operation") web-search API.
#[derive(Debug, Clone)]
pub struct CloudSearchProvider {
    client: reqwest::Client,
    api_key: String,
    folder_id: String,
}

impl CloudSearchProvider {
    pub fn from_env(client: reqwest::Client) -> Result<Self> {
        let api_key = api_key_from_env().ok_or_else(|| {
            Error::NotConfigured("missing PLAGICHECK_SEARCH_API_KEY".to_string())
        })?;
        let folder_id = folder_id_from_env().ok_or_else(|| {
            Error::NotConfigured("missing PLAGICHECK_SEARCH_FOLDER_ID".to_string())
        })?;
        Ok(Self {
            client,
            api_key,
            folder_id,
        })
    }

    fn search_endpoint() -> String {
        // Overridable for tests / enterprise proxies.
        search_endpoint_from_env().unwrap_or_else(|| {
            "https://searchapi.api.cloud.yandex.net/v2/web/searchAsync".to_string()
        })
    }

    fn operation_endpoint() -> String {
        operation_endpoint_from_env()
            .unwrap_or_else(|| "https://operation.api.cloud.yandex.net/operations".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    done: bool,
    response: Option<OperationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationPayload {
    raw_data: Option<String>,
}

#[async_trait::async_trait]
impl DeferredSearchProvider for CloudSearchProvider {
    fn name(&self) -> &'static str {
        "cloud"
    }

    async fn submit(&self, query: &str) -> Result<String> {
        let body = serde_json::json!({
            "query": { "searchType": "SEARCH_TYPE_RU", "queryText": query },
            "folderId": self.folder_id,
            "responseFormat": "FORMAT_HTML",
        });

        let resp = self
            .client
            .post(Self::search_endpoint())
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("submit HTTP {status}")));
        }

        let parsed: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        parsed
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Search("submit response had no operation id".to_string()))
    }

    async fn operation(&self, id: &str) -> Result<SearchOperation> {
        let url = format!("{}/{id}", Self::operation_endpoint().trim_end_matches('/'));
        let resp = self
            .client
            .get(url)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Search(format!("operation HTTP {status}")));
        }

        let parsed: OperationResponse = resp
            .json()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        Ok(SearchOperation {
            id: id.to_string(),
            done: parsed.done,
            raw_data: parsed.response.and_then(|r| r.raw_data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvGuard {
        k: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(k: &'static str, v: &str) -> Self {
            let prev = std::env::var(k).ok();
            std::env::set_var(k, v);
            Self { k, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(v) = self.prev.take() {
                std::env::set_var(self.k, v);
            } else {
                std::env::remove_var(self.k);
            }
        }
    }

    // One test owns both credential keys: parallel tests must not race on
    // the same env vars.
    #[test]
    fn credential_gating() {
        let g1 = EnvGuard::set("PLAGICHECK_SEARCH_API_KEY", "   ");
        let g2 = EnvGuard::set("PLAGICHECK_SEARCH_FOLDER_ID", "");
        // Blank values behave the same as unset.
        assert!(!cloud_enabled());
        assert!(CloudSearchProvider::from_env(reqwest::Client::new()).is_err());
        drop(g2);
        drop(g1);

        let _g1 = EnvGuard::set("PLAGICHECK_SEARCH_API_KEY", "k");
        let _g2 = EnvGuard::set("PLAGICHECK_SEARCH_FOLDER_ID", "f");
        assert!(cloud_enabled());
        assert!(CloudSearchProvider::from_env(reqwest::Client::new()).is_ok());
    }

    #[test]
    fn parses_minimal_submit_shape() {
        let js = r#"{ "id": "op-123" }"#;
        let parsed: SubmitResponse = serde_json::from_str(js).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("op-123"));
    }

    #[test]
    fn parses_pending_operation_shape() {
        let js = r#"{ "id": "op-123", "done": false }"#;
        let parsed: OperationResponse = serde_json::from_str(js).unwrap();
        assert!(!parsed.done);
        assert!(parsed.response.is_none());
    }

    #[test]
    fn parses_done_operation_shape() {
        let js = r#"
        { "done": true, "response": { "rawData": "PGh0bWw+" } }
        "#;
        let parsed: OperationResponse = serde_json::from_str(js).unwrap();
        assert!(parsed.done);
        assert_eq!(
            parsed.response.unwrap().raw_data.as_deref(),
            Some("PGh0bWw+")
        );
    }
}
