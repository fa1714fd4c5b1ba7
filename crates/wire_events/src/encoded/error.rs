use serde::{Deserialize, Serialize};
use test_model::CapturedError;

use super::EncodeContext;

/// Wire form of a captured error: display text plus a coarse classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedError {
    pub description: String,
    pub domain: String,
    pub code: i64,
}

impl EncodedError {
    pub fn encode(error: &CapturedError, _ctx: &EncodeContext) -> Self {
        Self {
            description: error.description.clone(),
            domain: error.domain.clone(),
            code: error.code,
        }
    }

    pub fn to_native(&self) -> CapturedError {
        CapturedError {
            description: self.description.clone(),
            domain: self.domain.clone(),
            code: self.code,
        }
    }
}
