//! Gemini recommendation client
//!
//! One-shot `generateContent` call asking the model for two id lists as
//! JSON. The call is not streamed and not retried; any failure surfaces as
//! [`Error::Upstream`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use roster_common::config::RecommenderConfig;
use roster_common::recommend::{RecommendationInput, RecommendationOutput, Recommender};
use roster_common::{Error, Result};

const USER_AGENT: &str = concat!("fleet-roster/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Build the prompt sent to the model
pub fn build_prompt(input: &RecommendationInput) -> Result<String> {
    Ok(format!(
        "You recommend fleet vehicles and assignments based on a user's favorites.\n\
         \n\
         Favorited vehicle ids: {}\n\
         Favorited assignment ids: {}\n\
         Candidate vehicle ids: {}\n\
         Candidate assignment ids: {}\n\
         \n\
         Pick the candidates this user is most likely to be interested in. \
         Only use ids from the candidate lists. Respond with a JSON object of the form \
         {{\"recommendedVehicles\": [\"id\", ...], \"recommendedAssignments\": [\"id\", ...]}}.",
        serde_json::to_string(&input.favorite_vehicle_ids)?,
        serde_json::to_string(&input.favorite_assignment_ids)?,
        serde_json::to_string(&input.all_vehicle_ids)?,
        serde_json::to_string(&input.all_assignment_ids)?,
    ))
}

/// Parse the model's text reply, tolerating a Markdown code fence
pub fn parse_reply(text: &str) -> Result<RecommendationOutput> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body)
        .map_err(|e| Error::Upstream(format!("Unparseable recommendation reply: {}", e)))
}

/// Recommender backed by the Gemini REST API
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        })
    }

    /// Client from config, `None` when no API key is configured
    pub fn from_config(config: &RecommenderConfig) -> Result<Option<Self>> {
        match config.api_key.as_deref().filter(|_| config.is_configured()) {
            Some(key) => Ok(Some(Self::new(
                key.trim().to_string(),
                config.model().to_string(),
                config.base_url().to_string(),
            )?)),
            None => Ok(None),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl Recommender for GeminiClient {
    async fn recommend(&self, input: &RecommendationInput) -> Result<RecommendationOutput> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(input)? }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
            },
        });

        tracing::debug!(
            model = %self.model,
            candidates = input.all_vehicle_ids.len() + input.all_assignment_ids.len(),
            "Requesting recommendations"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                Error::Upstream(format!("Recommendation request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Recommendation API returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Recommendation response parse error: {}", e)))?;

        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .ok_or_else(|| Error::Upstream("Recommendation reply had no candidates".to_string()))?;

        parse_reply(&text)
    }
}
