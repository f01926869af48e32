pub mod data_model;

pub mod parse;

pub mod models;
pub use models::ModelRef;

pub mod callers;
pub use callers::{CallBase, CallResp, Gemini, ModelCaller};

/// Describes an error which occurred during a model call.
pub enum CallErr {
    /// The response lacked any candidates or text. Always anomalous for the
    /// single-turn calls this crate makes.
    NoCompletions,
    /// A network or basic deserialization error occurred.
    API(reqwest::Error),
    /// The provider answered with a non-success HTTP status.
    Status { code: u16, message: String },
    /// The provider refused the prompt.
    Blocked(String),
    /// Any other error.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Debug for CallErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallErr::NoCompletions => write!(f, "NoCompletions"),
            CallErr::API(err) => f.debug_tuple("API").field(err).finish(),
            CallErr::Status { code, message } => f
                .debug_struct("Status")
                .field("code", code)
                .field("message", message)
                .finish(),
            CallErr::Blocked(reason) => f.debug_tuple("Blocked").field(reason).finish(),
            CallErr::Other(err) => f.debug_tuple("Other").field(err).finish(),
        }
    }
}

impl std::fmt::Display for CallErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallErr::NoCompletions => write!(f, "model returned no completions"),
            CallErr::API(err) => write!(f, "request failed: {}", err),
            CallErr::Status { code, message } => write!(f, "HTTP {}: {}", code, message),
            CallErr::Blocked(reason) => write!(f, "prompt blocked: {}", reason),
            CallErr::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CallErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallErr::API(err) => Some(err),
            _ => None,
        }
    }
}

impl From<&str> for CallErr {
    fn from(inp: &str) -> Self {
        CallErr::Other(inp.into())
    }
}

impl From<String> for CallErr {
    fn from(inp: String) -> Self {
        CallErr::Other(inp.into())
    }
}

impl From<reqwest::Error> for CallErr {
    fn from(inp: reqwest::Error) -> Self {
        CallErr::API(inp)
    }
}
