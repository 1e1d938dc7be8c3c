//! Run the notification drafting helper from the terminal.

use schoolcom_portal::ai::{
    ClaudeClient, ClaudeError, GenerationError, NotificationTextInput, generate_notification_text,
};
use schoolcom_portal::config::{ConfigError, PortalConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CLAUDE_API_KEY is not set")]
    MissingApiKey,

    #[error("Claude client error: {0}")]
    Client(#[from] ClaudeError),

    #[error("Drafting failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Draft a parent notification and print its text.
///
/// The school name comes from `PORTAL_SCHOOL_NAME`.
///
/// # Errors
///
/// Returns `DraftError` if no API key is configured, the input is
/// incomplete or the model's answer is unusable.
#[allow(clippy::print_stdout)]
pub async fn draft(
    title: String,
    event_type: String,
    course: String,
    description: String,
) -> Result<(), DraftError> {
    let config = PortalConfig::from_env()?;
    let claude = config.claude().ok_or(DraftError::MissingApiKey)?;
    let client = ClaudeClient::new(claude)?;

    let input = NotificationTextInput {
        event_title: title,
        event_description: description,
        event_type,
        course_name: course,
        school_name: config.school_name.clone(),
    };
    tracing::info!(model = client.model(), "requesting draft");
    let output = generate_notification_text(Some(&client), &input).await?;
    println!("{}", output.notification_text);
    Ok(())
}
