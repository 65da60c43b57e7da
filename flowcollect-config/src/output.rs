//! Record output settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// JSON output configuration.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct OutputConfig {
    /// Pretty-print each record instead of one JSON object per line.
    #[serde(default)]
    pub pretty: bool,
}
