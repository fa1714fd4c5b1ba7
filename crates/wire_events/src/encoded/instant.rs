use serde::{Deserialize, Serialize};
use test_model::TestInstant;

use super::EncodeContext;

/// Wire form of a [`TestInstant`]: seconds on both clocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedInstant {
    /// Seconds since the producing process's monotonic anchor.
    pub absolute: f64,
    /// Wall-clock seconds since the Unix epoch.
    pub since1970: f64,
}

impl EncodedInstant {
    pub fn encode(instant: &TestInstant, _ctx: &EncodeContext) -> Self {
        Self {
            absolute: instant.absolute.as_secs_f64(),
            since1970: instant.since_1970.as_secs_f64(),
        }
    }
}
