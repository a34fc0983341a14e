//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AiError, AiResult};
use crate::prompts::{
    format_message_prompt, format_query_prompt, CLASSIFICATION_PROMPT, EXTRACTION_PROMPT,
    QUERY_ROUTING_PROMPT, SEARCH_RESPONSE_PROMPT,
};
use crate::security::AiCredentials;
use crate::traits::AI;
use crate::types::listing::ExtractedListing;
use crate::types::query::{RoutedQuery, SearchCriteria};
use crate::types::record::ListingRecord;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI-backed [`AI`] implementation.
pub struct OpenAI {
    client: Client,
    credentials: AiCredentials,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAI {
    pub fn new(credentials: AiCredentials) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build");
        Self {
            client,
            credentials,
        }
    }

    /// Build from `OPENAI_API_KEY` (and optionally `OPENAI_MODEL`).
    pub fn from_env() -> AiResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| AiError::NotConfigured)?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(AiCredentials::new(api_key, model)))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.credentials.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.credentials.base_url = Some(url.into());
        self
    }

    async fn complete(&self, prompt: &str) -> AiResult<String> {
        let base = self
            .credentials
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL);
        let url = format!("{}/chat/completions", base.trim_end_matches('/'));

        let request = ChatRequest {
            model: &self.credentials.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.1,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credentials.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Request(Box::new(e)))?
            .error_for_status()
            .map_err(|e| AiError::Request(Box::new(e)))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::MalformedResponse("no choices in response".to_string()))
    }
}

/// Pull the first JSON object out of model text, tolerating code fences and
/// surrounding prose.
fn json_object(text: &str) -> AiResult<&str> {
    let start = text
        .find('{')
        .ok_or_else(|| AiError::MalformedResponse("no JSON object in response".to_string()))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| AiError::MalformedResponse("unterminated JSON object".to_string()))?;
    if end < start {
        return Err(AiError::MalformedResponse(
            "unterminated JSON object".to_string(),
        ));
    }
    Ok(&text[start..=end])
}

#[async_trait]
impl AI for OpenAI {
    async fn classify_housing(&self, text: &str) -> AiResult<String> {
        self.complete(&format_message_prompt(CLASSIFICATION_PROMPT, text))
            .await
    }

    async fn extract_listing(&self, text: &str) -> AiResult<ExtractedListing> {
        let response = self
            .complete(&format_message_prompt(EXTRACTION_PROMPT, text))
            .await?;
        serde_json::from_str(json_object(&response)?)
            .map_err(|e| AiError::MalformedResponse(e.to_string()))
    }

    async fn route_query(&self, query: &str) -> AiResult<RoutedQuery> {
        let response = self
            .complete(&format_query_prompt(QUERY_ROUTING_PROMPT, query))
            .await?;
        serde_json::from_str(json_object(&response)?)
            .map_err(|e| AiError::MalformedResponse(e.to_string()))
    }

    async fn summarize_results(
        &self,
        query: &str,
        criteria: &SearchCriteria,
        listings: &[ListingRecord],
    ) -> AiResult<String> {
        let criteria_json =
            serde_json::to_string(criteria).map_err(|e| AiError::MalformedResponse(e.to_string()))?;
        let listings_json =
            serde_json::to_string(listings).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        let prompt = SEARCH_RESPONSE_PROMPT
            .replace("{query}", query)
            .replace("{criteria}", &criteria_json)
            .replace("{listings}", &listings_json);

        self.complete(&prompt).await
    }

    async fn converse(&self, query: &str) -> AiResult<String> {
        let prompt = format!(
            "You are a friendly student housing assistant. Keep replies short, warm, and \
             focused on housing near campus.\n\nUser: {query}\n\nAssistant:"
        );
        self.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_tolerates_fences_and_prose() {
        let fenced = "```json\n{\"is_housing_related\": true}\n```";
        assert_eq!(json_object(fenced).unwrap(), "{\"is_housing_related\": true}");

        let prose = "Here you go: {\"intent\": \"CONVERSATION\", \"confidence\": 0.9} hope that helps";
        assert!(json_object(prose).unwrap().starts_with('{'));

        assert!(json_object("no json here").is_err());
    }

    #[test]
    fn routed_query_decodes_from_the_wire_shape() {
        let routed: RoutedQuery = serde_json::from_str(
            r#"{"intent": "HOUSING_SEARCH", "confidence": 0.95,
                "criteria": {"budget": {"max": 2000, "range_type": "below"}}}"#,
        )
        .unwrap();
        assert_eq!(routed.intent, crate::types::query::QueryIntent::HousingSearch);
        assert_eq!(routed.criteria.unwrap().budget.max, Some(2000));
    }
}
