//! Events emitted by the games for the host page
//!
//! Simulations never call back into the host directly. They push events
//! which the arcade session drains once per frame and routes to listeners.

use serde::{Deserialize, Serialize};

/// Payload for the host's score/message display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub msg: Vec<String>,
}

impl Output {
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: vec![msg.into()],
            ..Default::default()
        }
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.score = Some(score);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play was paused
    Paused,
    /// Play resumed
    Resumed,
    /// Score changed
    Score(u64),
    /// A hazard or status report (terminal or not)
    Collision(Output),
    /// Plain message/score update
    Output(Output),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_json_skips_empty() {
        let out = Output::message("Level 1");
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"msg":["Level 1"]}"#);

        let out = Output::default().with_score(30);
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"score":30}"#);
    }
}
