// BaseModelInvoker implementation backed by the llm-client crate.
//
// Temperature is pinned to 0.0: every caller in this system wants
// deterministic extraction, not creative writing.

use anyhow::Result;
use async_trait::async_trait;
use llm_client::{ChatRequest, LlmClient, Message};

use super::traits::BaseModelInvoker;

/// Chat-completions model invoker with a fixed model identifier.
pub struct ChatModelInvoker {
    client: LlmClient,
    model: String,
}

impl ChatModelInvoker {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseModelInvoker for ChatModelInvoker {
    async fn invoke(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .messages(messages.to_vec())
            .temperature(0.0);

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(response.content)
    }
}
