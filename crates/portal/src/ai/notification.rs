//! Drafting parent notifications with Claude.
//!
//! Both sides are checked: the input must name the event, its type, the
//! course and the school; the answer must be a JSON object with a
//! non-blank `notificationText`.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::client::ClaudeClient;
use super::error::GenerationError;
use super::types::Message;

const SYSTEM_PROMPT: &str = "You are an AI assistant specialized in generating notification text for school events. \
Answer with a single JSON object of the form {\"notificationText\": \"...\"} and nothing else.";

/// What the compose form knows about the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTextInput {
    pub event_title: String,
    pub event_description: String,
    pub event_type: String,
    pub course_name: String,
    pub school_name: String,
}

impl NotificationTextInput {
    /// Every field but the description must be non-blank.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::MissingInput` naming the first blank field.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let required = [
            ("eventTitle", &self.event_title),
            ("eventType", &self.event_type),
            ("courseName", &self.course_name),
            ("schoolName", &self.school_name),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(GenerationError::MissingInput(*name)),
            None => Ok(()),
        }
    }

    /// The user turn sent to the model.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Given the following event details, generate a concise and informative notification \
text suitable for sending to parents.\n\
The notification should include essential information about the event, such as its type, \
title, and any relevant details. Make it as short as possible. Always include the course name \
and school name.\n\n\
Event Title: {}\n\
Event Description: {}\n\
Event Type: {}\n\
Course Name: {}\n\
School Name: {}\n",
            self.event_title.trim(),
            self.event_description.trim(),
            self.event_type.trim(),
            self.course_name.trim(),
            self.school_name.trim(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTextOutput {
    pub notification_text: String,
}

impl NotificationTextOutput {
    /// Parse the model's answer, tolerating a code fence or prose around the object.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidOutput` when no object with a
    /// non-blank `notificationText` can be read.
    pub fn parse(text: &str) -> Result<Self, GenerationError> {
        let object = text
            .find('{')
            .zip(text.rfind('}'))
            .and_then(|(start, end)| text.get(start..=end))
            .ok_or_else(|| GenerationError::InvalidOutput("no JSON object in answer".to_string()))?;

        let output: Self = serde_json::from_str(object)
            .map_err(|e| GenerationError::InvalidOutput(e.to_string()))?;
        if output.notification_text.trim().is_empty() {
            return Err(GenerationError::InvalidOutput(
                "notificationText is blank".to_string(),
            ));
        }
        Ok(Self {
            notification_text: output.notification_text.trim().to_string(),
        })
    }
}

/// Ask Claude for a notification draft.
///
/// `client` is `None` when no API key is configured.
///
/// # Errors
///
/// Returns `GenerationError` for invalid input, a disabled helper, a failed
/// request or an unusable answer.
#[instrument(skip_all, fields(event_type = %input.event_type, course = %input.course_name))]
pub async fn generate_notification_text(
    client: Option<&ClaudeClient>,
    input: &NotificationTextInput,
) -> Result<NotificationTextOutput, GenerationError> {
    input.validate()?;
    let client = client.ok_or(GenerationError::Disabled)?;

    let response = client
        .chat(vec![Message::user(input.prompt())], Some(SYSTEM_PROMPT.to_string()))
        .await?;
    let output = NotificationTextOutput::parse(&response.text());
    match &output {
        Ok(_) => tracing::info!("notification draft generated"),
        Err(e) => tracing::warn!(error = %e, "model answer rejected"),
    }
    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> NotificationTextInput {
        NotificationTextInput {
            event_title: "Algebra Test".to_string(),
            event_description: String::new(),
            event_type: "exam".to_string(),
            course_name: "Algebra I".to_string(),
            school_name: "Greenwood High".to_string(),
        }
    }

    #[test]
    fn test_input_uses_camel_case() {
        let json = serde_json::to_value(input()).unwrap();
        assert_eq!(json["eventTitle"], "Algebra Test");
        assert_eq!(json["schoolName"], "Greenwood High");
    }

    #[test]
    fn test_blank_required_fields_are_rejected() {
        assert!(input().validate().is_ok());
        let mut missing = input();
        missing.course_name = "  ".to_string();
        assert!(matches!(
            missing.validate(),
            Err(GenerationError::MissingInput("courseName"))
        ));
    }

    #[test]
    fn test_prompt_names_course_and_school() {
        let prompt = input().prompt();
        assert!(prompt.contains("Course Name: Algebra I"));
        assert!(prompt.contains("School Name: Greenwood High"));
        assert!(prompt.contains("Event Description: \n"));
    }

    #[test]
    fn test_parse_output() {
        let fenced = "```json\n{\"notificationText\": \" Exam on Friday. \"}\n```";
        assert_eq!(
            NotificationTextOutput::parse(fenced).unwrap().notification_text,
            "Exam on Friday."
        );
        assert!(matches!(
            NotificationTextOutput::parse("{\"notificationText\": \"\"}"),
            Err(GenerationError::InvalidOutput(_))
        ));
        assert!(matches!(
            NotificationTextOutput::parse("Sure! Here you go."),
            Err(GenerationError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_without_client() {
        let result = generate_notification_text(None, &input()).await;
        assert!(matches!(result, Err(GenerationError::Disabled)));

        let result = generate_notification_text(None, &NotificationTextInput::default()).await;
        assert!(matches!(result, Err(GenerationError::MissingInput("eventTitle"))));
    }
}
