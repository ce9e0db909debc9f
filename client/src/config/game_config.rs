use std::time::Duration;

use serde::{Deserialize, Serialize};
use ttt_common::config::Validate;

const MAX_THINK_DELAY_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    /// Pause before the computer's move is shown. Does not affect the move.
    pub think_delay_ms: u64,
}

impl GameConfig {
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.think_delay_ms > MAX_THINK_DELAY_MS {
            return Err(format!(
                "think_delay_ms must not exceed {} (got {})",
                MAX_THINK_DELAY_MS, self.think_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { think_delay_ms: 800 }
    }
}
