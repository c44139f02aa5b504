// Thu Oct 15 2026 - Alex

use crate::catalog::invocable::Invocable;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("invocation of {0} is not supported")]
    Unsupported(String),
    #[error("invalid arguments for {name}: {message}")]
    InvalidArguments { name: String, message: String },
    #[error("invocation of {name} failed: {message}")]
    Failed { name: String, message: String },
}

/// Front ends that can actually call a catalog entry implement this. The
/// catalog itself never executes anything.
pub trait InvokeHook {
    fn invoke(&self, entry: &Invocable, args: &Map<String, Value>) -> Result<Value, InvokeError>;

    fn supports(&self, _entry: &Invocable) -> bool {
        true
    }
}
