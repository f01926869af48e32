#![allow(dead_code)]

use gemini_prompt::data_model::FinishReason;
use gemini_prompt::{CallBase, CallErr, CallResp, ModelCaller, ModelRef};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const STRUCTURED_ANSWER: &str = "OPERATION: derivative
EXPRESSION: x^2 + 3x + 2
RESULT: 2x + 3
STEPS:
1. Apply the power rule to $x^2$: $2x$
2. Differentiate $3x$: $3$
3. The constant 2 vanishes: $0$";

pub const EXPLANATION: &str =
    "The derivative measures how fast the function changes. Each term is handled on its own.";

/// A [ModelCaller] that replays canned replies in order and records every prompt.
/// Once the script runs out every call fails with [CallErr::NoCompletions].
#[derive(Clone, Default)]
pub struct ScriptedCaller {
    model: ModelRef,
    replies: Arc<Mutex<VecDeque<Result<String, CallErr>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedCaller {
    pub fn new<I: IntoIterator<Item = Result<String, CallErr>>>(replies: I) -> Self {
        Self {
            model: ModelRef::default(),
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ModelCaller for ScriptedCaller {
    fn get_model(&self) -> &ModelRef {
        &self.model
    }

    fn call(
        &self,
        params: CallBase,
    ) -> impl std::future::Future<Output = Result<CallResp, CallErr>> + Send {
        self.prompts.lock().unwrap().push(params.instructions);
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CallErr::NoCompletions));
        let model = self.model.model_str().to_string();
        async move {
            next.map(|text| CallResp {
                text,
                finish_reason: FinishReason::Stop,
                model,
                usage: None,
            })
        }
    }
}
