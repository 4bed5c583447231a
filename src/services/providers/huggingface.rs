/// Hugging Face Inference API text generation
///
/// POSTs the composed prompt to `{api_url}/models/{model}` with the fixed
/// sampling parameters and returns the first generated text.
use crate::{
    error::{AppError, AppResult},
    services::providers::TextGenerator,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            temperature: 0.7,
            top_p: 0.95,
            repetition_penalty: 1.15,
            do_sample: true,
        }
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Clone)]
pub struct HuggingFaceGenerator {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    params: GenerationParams,
}

impl HuggingFaceGenerator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
            params: GenerationParams::default(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/models/{}", self.api_url, self.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequest {
                inputs: prompt,
                parameters: &self.params,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Text generation API returned status {}: {}",
                status, body
            )));
        }

        let generations: Vec<GeneratedText> = response.json().await?;

        let text = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| {
                AppError::ExternalApi("Text generation API returned no candidates".to_string())
            })?;

        tracing::info!(
            model = %self.model,
            chars = text.len(),
            provider = "huggingface",
            "Narrative generated"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_fixed_sampling() {
        let params = GenerationParams::default();
        assert_eq!(params.max_new_tokens, 150);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.95);
        assert_eq!(params.repetition_penalty, 1.15);
        assert!(params.do_sample);
    }

    #[test]
    fn test_request_serialization() {
        let params = GenerationParams::default();
        let request = GenerationRequest {
            inputs: "hello",
            parameters: &params,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "hello");
        assert_eq!(json["parameters"]["max_new_tokens"], 150);
        assert_eq!(json["parameters"]["do_sample"], true);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"[{ "generated_text": "Here are some picks!" }]"#;
        let generations: Vec<GeneratedText> = serde_json::from_str(json).unwrap();
        assert_eq!(generations[0].generated_text, "Here are some picks!");
    }
}
