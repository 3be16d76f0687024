//! Gemini geocoding provider
//!
//! Asks a Gemini model to resolve a place reference inside China and return
//! GCJ-02 candidates as structured JSON.
//! API documentation: https://ai.google.dev/api/generate-content

use crate::config::Config;
use crate::constants::api::{API_KEY_ENV_VARS, GEMINI_BASE_URL, GEMINI_MODEL};
use crate::error::{Error, Result};
use crate::geo::{GeocodeProvider, SearchResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("smartloc/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gemini-backed geocoding provider
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

/// generateContent response, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client against the public endpoint with the default model
    pub fn new() -> Result<Self> {
        Self::with_endpoint(GEMINI_BASE_URL, GEMINI_MODEL, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client for a specific base URL and model
    pub fn with_endpoint(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Geocoding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
        })
    }

    /// Create a client from the `[search]` and `[api_keys]` config sections
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::with_endpoint(
            &config.search.base_url,
            &config.search.model,
            config.search.timeout_secs,
        )?;
        if !config.api_keys.gemini.is_empty() {
            client.api_key = Some(config.api_keys.gemini.clone());
        }
        Ok(client)
    }

    /// Set the configured API key (environment variables still take priority)
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Model used for requests
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full generateContent URL for a key
    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            urlencoding::encode(&self.model),
            urlencoding::encode(api_key)
        )
    }

    /// Send the prompt and return the concatenated response text
    async fn generate(&self, query: &str) -> Result<String> {
        let api_key = resolve_api_key(self.api_key.as_deref(), |name| std::env::var(name).ok())
            .ok_or_else(|| Error::Geocoding("No Gemini API key configured".to_string()))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(query) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        let response = self.client
            .post(self.endpoint(&api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Gemini returned status: {}",
                response.status()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Gemini response: {}", e)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Geocoding("Gemini returned empty content".to_string()));
        }

        Ok(text)
    }
}

impl GeocodeProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn geocode(&self, query: &str) -> Result<Vec<SearchResult>> {
        let text = self.generate(query).await?;
        parse_candidates(&text)
    }
}

/// Pick the API key: environment variables first, then the configured key
pub fn resolve_api_key(configured: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .chain(configured.map(str::to_string))
        .find(|key| !key.trim().is_empty())
}

/// Instruction sent to the model
pub fn build_prompt(query: &str) -> String {
    format!(
        "你是一个专业的地理位置专家和地图助手。\n\
         用户搜索请求: \"{}\"\n\n\
         请根据该请求返回 1-3 个匹配的中国境内地点。\n\
         要求：\n\
         1. 坐标系：必须使用 GCJ-02 (火星坐标系)，这是高德地图 (AMap) 正常显示所必须的。\n\
         2. 格式：严格按照指定的 JSON 格式返回。\n\
         3. 精确度：经纬度请精确到小数点后 6 位。\n\
         4. 语言：所有返回内容必须使用简体中文。",
        query
    )
}

/// Structured-output schema: an array of candidate objects
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING", "description": "地点的名称，例如：天安门、上海东方明珠" },
                "address": { "type": "STRING", "description": "详细的街道或区域地址" },
                "lat": { "type": "NUMBER", "description": "纬度 (GCJ-02)" },
                "lng": { "type": "NUMBER", "description": "经度 (GCJ-02)" },
                "description": { "type": "STRING", "description": "该地点的简短介绍，20字以内" }
            },
            "required": ["name", "address", "lat", "lng", "description"]
        }
    })
}

/// Parse model output into candidates
///
/// The text must be a JSON array, optionally wrapped in a Markdown code
/// fence. Elements that do not match the schema are skipped.
pub fn parse_candidates(text: &str) -> Result<Vec<SearchResult>> {
    let body = strip_code_fence(text.trim());
    let items: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| Error::Geocoding(format!("Model output is not a JSON array: {}", e)))?;

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<SearchResult>(item) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("Skipping malformed candidate: {}", e);
                None
            }
        })
        .collect())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

    fn gemini_body(text: &str) -> String {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] }
            }]
        })
        .to_string()
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = build_prompt("天安门");
        assert!(prompt.contains("\"天安门\""));
        assert!(prompt.contains("GCJ-02"));
        assert!(prompt.contains("1-3"));
        assert!(prompt.contains("6 位"));
        assert!(prompt.contains("简体中文"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
        assert_eq!(schema["items"]["properties"]["lat"]["type"], "NUMBER");
    }

    #[test]
    fn test_parse_candidates() {
        let text = r#" [{"name":"天安门","address":"北京市东城区","lat":39.908692,"lng":116.397477,"description":"北京地标"}] "#;
        let results = parse_candidates(text).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "天安门");
    }

    #[test]
    fn test_parse_candidates_code_fence() {
        let text = "```json\n[{\"name\":\"外滩\",\"address\":\"上海市黄浦区\",\"lat\":31.2397,\"lng\":121.4998,\"description\":\"江边步道\"}]\n```";
        let results = parse_candidates(text).unwrap();
        assert_eq!(results[0].name, "外滩");
    }

    #[test]
    fn test_parse_candidates_skips_bad_elements() {
        let text = r#"[{"name":"A","address":"B","lat":"north","lng":1.0,"description":"x"},
                       {"name":"C","address":"D","lat":30.0,"lng":120.0,"description":"y"}]"#;
        let results = parse_candidates(text).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "C");
    }

    #[test]
    fn test_parse_candidates_rejects_non_array() {
        assert!(parse_candidates(r#"{"name":"天安门"}"#).is_err());
        assert!(parse_candidates("not json").is_err());
    }

    #[test]
    fn test_resolve_api_key_order() {
        let env = |name: &str| match name {
            "API_KEY" => Some("from-env".to_string()),
            _ => None,
        };
        assert_eq!(resolve_api_key(Some("from-config"), env), Some("from-env".to_string()));

        let empty_env = |_: &str| None;
        assert_eq!(resolve_api_key(Some("from-config"), empty_env), Some("from-config".to_string()));
        assert_eq!(resolve_api_key(Some("  "), empty_env), None);
        assert_eq!(resolve_api_key(None, empty_env), None);
    }

    #[tokio::test]
    async fn test_geocode_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let text = r#"[{"name":"天安门","address":"北京市东城区","lat":39.908692,"lng":116.397477,"description":"北京地标"}]"#;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_body(text))
            .create_async()
            .await;

        let client = GeminiClient::with_endpoint(server.url(), GEMINI_MODEL, 5)
            .unwrap()
            .with_api_key("test-key");
        let results = client.geocode("天安门").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].address, "北京市东城区");
    }

    #[tokio::test]
    async fn test_geocode_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = GeminiClient::with_endpoint(server.url(), GEMINI_MODEL, 5)
            .unwrap()
            .with_api_key("test-key");
        assert!(client.geocode("天安门").await.is_err());
    }

    #[tokio::test]
    async fn test_geocode_empty_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::with_endpoint(server.url(), GEMINI_MODEL, 5)
            .unwrap()
            .with_api_key("test-key");
        assert!(client.geocode("天安门").await.is_err());
    }

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::with_endpoint("http://localhost:1234/", "gemini-test", 5).unwrap();
        assert_eq!(client.model(), "gemini-test");
        assert_eq!(
            client.endpoint("k y"),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent?key=k%20y"
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.search.model = "gemini-2.5-flash".to_string();
        config.search.base_url = "http://localhost:1234".to_string();
        config.api_keys.gemini = "configured-key".to_string();

        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(client.api_key.as_deref(), Some("configured-key"));
    }
}
