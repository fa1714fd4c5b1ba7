use serde::{Deserialize, Serialize};
use test_model::Backtrace;

use super::EncodeContext;

/// Wire form of a backtrace: raw return addresses.
///
/// Addresses belong to the producing process's address space; consumers can
/// display them but never symbolicate them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedBacktrace {
    pub addresses: Vec<u64>,
}

impl EncodedBacktrace {
    pub fn encode(backtrace: &Backtrace, _ctx: &EncodeContext) -> Self {
        Self {
            addresses: backtrace.addresses.clone(),
        }
    }
}
