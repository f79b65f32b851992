//! Construction schedules and chat replies from an external text generator
//!
//! The generator is injected by the caller. When none is configured, or when
//! a call fails in any way, a fixed fallback is returned instead, so a
//! project report always completes.

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::EstimateError;
use crate::estimate::{EstimateRequest, Estimator};
use crate::models::{ProjectReport, ScheduleEntry};

const SCHEDULE_SYSTEM_PROMPT: &str = "You are a JSON generator. Output only raw JSON.";
const CHAT_SYSTEM_PROMPT: &str =
    "You are 'BuildAI Bot', an expert Civil Engineer. Use **Double Asterisks** for headings.";

const SCHEDULE_TEMPERATURE: f32 = 0.1;
const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_MAX_TOKENS: u32 = 300;

/// Reply given to chat requests when no generator is configured
pub const NO_GENERATOR_REPLY: &str = "API Key missing.";

// ── Generator contract ────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerateError {
    #[error("request timed out")]
    Timeout,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl GenerateError {
    /// Short name of the failure, for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Timeout => "timeout",
            GenerateError::Auth(_) => "auth",
            GenerateError::MalformedResponse(_) => "malformed_response",
            GenerateError::Transport(_) => "transport",
        }
    }
}

/// One request to a text generator
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Anything that turns a prompt into text, typically a hosted chat model
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &Prompt) -> Result<String, GenerateError>;
}

// ── Schedules ─────────────────────────────────────────────────────────────────

/// Schedule used whenever no generated schedule is available
pub fn fallback_schedule() -> Vec<ScheduleEntry> {
    vec![ScheduleEntry {
        week: "1-2".to_string(),
        phase: "Site Prep".to_string(),
        activities: vec!["Site Cleaning".to_string(), "Marking".to_string()],
    }]
}

fn schedule_prompt(built_up_area: f64, floors: &str) -> Prompt {
    Prompt {
        system: SCHEDULE_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Create a detailed construction schedule for a {} sq yard, {} building. \
             Return ONLY a JSON array. Format: \
             [{{\"week\": \"1-2\", \"phase\": \"Excavation\", \"activities\": [\"Digging\"]}}]",
            built_up_area, floors
        ),
        temperature: SCHEDULE_TEMPERATURE,
        max_tokens: None,
    }
}

/// Pull the JSON array out of free text and parse it as schedule entries
///
/// The array runs from the first `[` to the last `]`, which tolerates prose
/// or code fences around it.
pub fn extract_schedule(text: &str) -> Result<Vec<ScheduleEntry>, GenerateError> {
    let start = text
        .find('[')
        .ok_or_else(|| GenerateError::MalformedResponse("no JSON array in reply".into()))?;
    let end = text
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or_else(|| {
            GenerateError::MalformedResponse("unterminated JSON array in reply".into())
        })?;

    serde_json::from_str(&text[start..=end])
        .map_err(|e| GenerateError::MalformedResponse(e.to_string()))
}

/// Ask the generator for a schedule, surfacing every failure
pub fn request_schedule(
    generator: &dyn TextGenerator,
    built_up_area: f64,
    floors: &str,
) -> Result<Vec<ScheduleEntry>, GenerateError> {
    let reply = generator.generate(&schedule_prompt(built_up_area, floors))?;
    debug!(reply_len = reply.len(), "received schedule reply");
    extract_schedule(&reply)
}

/// Construction schedule for a building, or the fallback schedule
pub fn schedule_for(
    generator: Option<&dyn TextGenerator>,
    built_up_area: f64,
    floors: &str,
) -> Vec<ScheduleEntry> {
    let Some(generator) = generator else {
        debug!("no text generator configured, using fallback schedule");
        return fallback_schedule();
    };

    match request_schedule(generator, built_up_area, floors) {
        Ok(schedule) => schedule,
        Err(e) => {
            warn!(
                kind = e.kind(),
                error = %e,
                "schedule generation failed, using fallback schedule"
            );
            fallback_schedule()
        }
    }
}

// ── Chat ──────────────────────────────────────────────────────────────────────

/// Outcome of a chat request
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Answer(String),
    /// No generator configured
    Unavailable,
    Failed(GenerateError),
}

impl ChatReply {
    /// Text shown to the user
    pub fn text(&self) -> String {
        match self {
            ChatReply::Answer(text) => text.clone(),
            ChatReply::Unavailable => NO_GENERATOR_REPLY.to_string(),
            ChatReply::Failed(e) => format!("Error: {}", e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChatReply::Failed(_))
    }
}

/// Answer a free-form question about the construction project
pub fn chat_reply(generator: Option<&dyn TextGenerator>, message: &str) -> ChatReply {
    let Some(generator) = generator else {
        return ChatReply::Unavailable;
    };

    let prompt = Prompt {
        system: CHAT_SYSTEM_PROMPT.to_string(),
        user: message.to_string(),
        temperature: CHAT_TEMPERATURE,
        max_tokens: Some(CHAT_MAX_TOKENS),
    };

    match generator.generate(&prompt) {
        Ok(text) => ChatReply::Answer(text),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "chat generation failed");
            ChatReply::Failed(e)
        }
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

/// Estimate a project and attach a construction schedule
///
/// Only an invalid request fails; generator trouble falls back to
/// [`fallback_schedule`].
pub fn plan_project(
    request: &EstimateRequest,
    generator: Option<&dyn TextGenerator>,
) -> Result<ProjectReport, EstimateError> {
    let estimator = Estimator::from_request(request)?;
    let estimate = estimator.estimate();
    let schedule = schedule_for(generator, estimator.built_up_area, &request.floors.to_string());

    Ok(ProjectReport { estimate, schedule })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Canned(Result<String, GenerateError>);

    impl TextGenerator for Canned {
        fn generate(&self, _prompt: &Prompt) -> Result<String, GenerateError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<Prompt>>);

    impl TextGenerator for Recording {
        fn generate(&self, prompt: &Prompt) -> Result<String, GenerateError> {
            self.0.lock().unwrap().push(prompt.clone());
            Ok("[]".to_string())
        }
    }

    fn canned(text: &str) -> Canned {
        Canned(Ok(text.to_string()))
    }

    #[test]
    fn no_generator_gives_fallback_schedule() {
        assert_eq!(schedule_for(None, 1000.0, "G+2"), fallback_schedule());
    }

    #[test]
    fn fallback_schedule_is_site_prep() {
        let s = fallback_schedule();
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].week, "1-2");
        assert_eq!(s[0].phase, "Site Prep");
        assert_eq!(s[0].activities, ["Site Cleaning", "Marking"]);
    }

    #[test]
    fn schedule_is_extracted_from_surrounding_text() {
        let stub = canned(
            "Sure! Here it is:\n```json\n\
             [{\"week\": \"1-3\", \"phase\": \"Excavation\",\
             \"activities\": [\"Digging\", \"Shoring\"]},\
             {\"week\": \"4\", \"phase\": \"Foundation\", \"activities\": []}]\n```",
        );
        let s = schedule_for(Some(&stub), 1000.0, "G+1");
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].phase, "Excavation");
        assert_eq!(s[0].activities, ["Digging", "Shoring"]);
        assert_eq!(s[1].week, "4");
    }

    #[test]
    fn reply_without_array_falls_back() {
        let stub = canned("I cannot help with that.");
        assert_eq!(schedule_for(Some(&stub), 1000.0, "G+1"), fallback_schedule());
        for text in ["no brackets", "] backwards ["] {
            assert!(matches!(extract_schedule(text), Err(GenerateError::MalformedResponse(_))));
        }
    }

    #[test]
    fn invalid_json_falls_back() {
        let stub = canned("[{'week': '1-2', 'phase': 'Excavation', 'activities': ['Digging']}]");
        assert_eq!(schedule_for(Some(&stub), 1000.0, "G+1"), fallback_schedule());
    }

    #[test]
    fn every_generator_error_falls_back() {
        let errors = [
            GenerateError::Timeout,
            GenerateError::Auth("bad key".into()),
            GenerateError::MalformedResponse("no choices".into()),
            GenerateError::Transport("connection refused".into()),
        ];
        for e in errors {
            let stub = Canned(Err(e));
            assert_eq!(schedule_for(Some(&stub), 1000.0, "3"), fallback_schedule());
        }
    }

    #[test]
    fn request_schedule_surfaces_error_kind() {
        let stub = Canned(Err(GenerateError::Timeout));
        let err = request_schedule(&stub, 1000.0, "3").unwrap_err();
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn schedule_prompt_mentions_building() {
        let stub = Recording::default();
        let s = schedule_for(Some(&stub), 1250.5, "G+2");
        assert!(s.is_empty());

        let prompts = stub.0.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user.contains("1250.5 sq yard"));
        assert!(prompts[0].user.contains("G+2 building"));
        assert_eq!(prompts[0].temperature, SCHEDULE_TEMPERATURE);
        assert_eq!(prompts[0].max_tokens, None);
    }

    #[test]
    fn chat_without_generator_reports_missing_key() {
        let reply = chat_reply(None, "How deep should footings be?");
        assert_eq!(reply, ChatReply::Unavailable);
        assert_eq!(reply.text(), "API Key missing.");
        assert!(!reply.is_error());
    }

    #[test]
    fn chat_returns_generated_text() {
        let stub = canned("**Footings** depend on soil.");
        let reply = chat_reply(Some(&stub), "How deep should footings be?");
        assert_eq!(reply.text(), "**Footings** depend on soil.");
    }

    #[test]
    fn chat_failure_becomes_error_text() {
        let stub = Canned(Err(GenerateError::Auth("invalid api key".into())));
        let reply = chat_reply(Some(&stub), "hello");
        assert!(reply.is_error());
        assert_eq!(reply.text(), "Error: authentication failed: invalid api key");
    }

    #[test]
    fn chat_prompt_limits_tokens() {
        let stub = Recording::default();
        chat_reply(Some(&stub), "hello");
        let prompts = stub.0.lock().unwrap();
        assert_eq!(prompts[0].user, "hello");
        assert_eq!(prompts[0].max_tokens, Some(CHAT_MAX_TOKENS));
        assert_eq!(prompts[0].temperature, CHAT_TEMPERATURE);
    }

    #[test]
    fn project_report_completes_when_generator_fails() {
        let stub = Canned(Err(GenerateError::Transport("dns".into())));
        let request = EstimateRequest::new(1000.0, "G+2", 1500.0);
        let report = plan_project(&request, Some(&stub)).unwrap();
        assert_eq!(report.estimate.blueprint.len(), 3);
        assert_eq!(report.schedule, fallback_schedule());
    }

    #[test]
    fn project_report_rejects_non_numeric_area() {
        assert!(plan_project(&EstimateRequest::new("big", "G+2", 1500.0), None).is_err());
    }

    #[test]
    fn project_report_serializes_flat() {
        let report = plan_project(&EstimateRequest::default(), None).unwrap();
        let v = serde_json::to_value(&report).unwrap();
        assert!(v.get("materials").is_some());
        assert!(v.get("costs").is_some());
        assert!(v.get("blueprint").is_some());
        assert_eq!(v["schedule"][0]["phase"], "Site Prep");
    }
}
