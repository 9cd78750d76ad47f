//! Chat-platform skill webhook.
//!
//! The platform posts the user's message as `userRequest.utterance` and
//! expects a version 2.0 skill response with one simple-text output.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::extractors::AppJson;
use super::AppState;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    pub user_request: UserRequest,
    /// Bot metadata from the platform. Not used.
    #[serde(default)]
    pub bot: Option<serde_json::Value>,
    /// Matched action metadata from the platform. Not used.
    #[serde(default)]
    pub action: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub utterance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillResponse {
    pub version: String,
    pub template: SkillTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillTemplate {
    pub outputs: Vec<SkillOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillOutput {
    pub simple_text: SimpleText,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimpleText {
    pub text: String,
}

impl SkillResponse {
    pub fn simple_text(text: impl Into<String>) -> Self {
        Self {
            version: "2.0".to_string(),
            template: SkillTemplate {
                outputs: vec![SkillOutput {
                    simple_text: SimpleText { text: text.into() },
                }],
            },
        }
    }
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<SkillRequest>,
) -> Result<Json<SkillResponse>> {
    let consultation = state
        .consultation
        .answer(&req.user_request.utterance)
        .await?;

    tracing::debug!(origin = %consultation.origin, "Webhook answered");
    Ok(Json(SkillResponse::simple_text(consultation.answer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_accepts_platform_envelope() {
        let req: SkillRequest = serde_json::from_value(json!({
            "intent": { "id": "abc" },
            "userRequest": { "utterance": "두통이 있어요", "lang": "ko" },
            "bot": { "id": "bot-1" },
            "action": { "name": "consult", "params": {} }
        }))
        .unwrap();

        assert_eq!(req.user_request.utterance, "두통이 있어요");
        assert!(req.bot.is_some());
    }

    #[test]
    fn bot_and_action_are_optional() {
        let req: SkillRequest =
            serde_json::from_value(json!({ "userRequest": { "utterance": "hi" } })).unwrap();
        assert!(req.bot.is_none());
        assert!(req.action.is_none());
    }

    #[test]
    fn response_matches_skill_format() {
        let body = serde_json::to_value(SkillResponse::simple_text("쉬세요")).unwrap();
        assert_eq!(
            body,
            json!({
                "version": "2.0",
                "template": { "outputs": [ { "simpleText": { "text": "쉬세요" } } ] }
            })
        );
    }
}
