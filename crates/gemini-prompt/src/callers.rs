use crate::data_model::{
    ApiErrorBody, Content, FinishReason, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, UsageMetadata,
};
use crate::{CallErr, ModelRef};
use reqwest::Client;
use std::env;
use std::time::Duration;

/// Public endpoint of the Gemini REST API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Parameters of a single-turn model call.
#[derive(Debug, Clone, Default)]
pub struct CallBase {
    /// System instruction; omitted from the request when empty.
    pub system: String,
    /// The user prompt.
    pub instructions: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

/// The outcome of a successful model call.
#[derive(Debug, Clone)]
pub struct CallResp {
    pub text: String,
    pub finish_reason: FinishReason,
    pub model: String,
    pub usage: Option<UsageMetadata>,
}

/// A type which is able to make model calls.
pub trait ModelCaller: Send + Sync {
    /// Returns the model this caller is wired to.
    fn get_model(&self) -> &ModelRef;

    /// Implements one model call. The workhorse of this trait.
    fn call(
        &self,
        params: CallBase,
    ) -> impl std::future::Future<Output = Result<CallResp, CallErr>> + Send;

    /// Convenience method to prompt a model and get the response as a string.
    fn simple_call<S: Into<String> + Send>(
        &self,
        prompt: S,
    ) -> impl std::future::Future<Output = Result<String, CallErr>> + Send {
        let base_params = CallBase {
            instructions: prompt.into(),
            ..Default::default()
        };
        async move {
            let res = self.call(base_params).await?;
            Ok(res.text)
        }
    }
}

/// A [ModelCaller] that talks to a model via Google's Gemini API.
///
/// Use [Gemini::from_env] to read the API key from `GEMINI_API_KEY`.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub model: ModelRef,
    api_key: String,
    api_base: String,
    http: Client,
}

impl Gemini {
    pub fn new<S: Into<String>>(model: ModelRef, api_key: S) -> Self {
        Self {
            model,
            api_key: api_key.into(),
            api_base: GEMINI_API_BASE.into(),
            http: Client::new(),
        }
    }

    /// Constructs a caller using the key in the `GEMINI_API_KEY` environment variable.
    pub fn from_env(model: ModelRef) -> Result<Self, CallErr> {
        match env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(model, key.trim())),
            _ => Err("GEMINI_API_KEY is not set".into()),
        }
    }

    /// Points the caller at a different API root, such as a proxy.
    pub fn with_api_base<S: Into<String>>(self, api_base: S) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            ..self
        }
    }

    /// Replaces the HTTP client with one that enforces the given per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, CallErr> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, ..self })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base,
            self.model.model_str()
        )
    }

    fn build_request(params: CallBase) -> GenerateContentRequest {
        let generation_config = GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
            ..Default::default()
        };

        GenerateContentRequest {
            contents: vec![Content::user(params.instructions)],
            system_instruction: if params.system.is_empty() {
                None
            } else {
                Some(Content::system(params.system))
            },
            generation_config: if generation_config.is_empty() {
                None
            } else {
                Some(generation_config)
            },
        }
    }
}

impl ModelCaller for Gemini {
    fn get_model(&self) -> &ModelRef {
        &self.model
    }

    async fn call(&self, params: CallBase) -> Result<CallResp, CallErr> {
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(params))
            .send()
            .await?;

        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let body = resp.text().await?;
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(b) if !b.error.message.is_empty() => b.error.message,
                _ => body,
            };
            return Err(CallErr::Status { code, message });
        }

        let res = resp.json::<GenerateContentResponse>().await?;

        if let Some(reason) = res
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(CallErr::Blocked(reason));
        }
        if res.candidates.is_empty() {
            return Err(CallErr::NoCompletions);
        }

        let finish_reason = res.finish_reason().unwrap_or(FinishReason::Stop);
        match finish_reason {
            FinishReason::Stop | FinishReason::MaxTokens => {}
            _ => return Err(format!("unexpected finish reason: {:?}", finish_reason).into()),
        }

        let text = res.text().ok_or(CallErr::NoCompletions)?;
        Ok(CallResp {
            text,
            finish_reason,
            model: res
                .model_version
                .clone()
                .unwrap_or_else(|| self.model.model_str().to_string()),
            usage: res.usage_metadata,
        })
    }
}
