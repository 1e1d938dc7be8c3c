//! SchoolCom CLI - locale, identity and AI drafting tools.
//!
//! # Usage
//!
//! ```bash
//! # Keys present in English but missing in Spanish
//! schoolcom i18n missing --lang es
//!
//! # Look up a translation with replacements
//! schoolcom i18n get loginPage.welcome --lang es --set name=Ana
//!
//! # Which role would this identifier sign in as?
//! schoolcom whoami teacher.emily
//!
//! # Draft a parent notification (needs CLAUDE_API_KEY)
//! schoolcom draft --title "Field trip" --type announcement --course "Biology"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use schoolcom_core::Language;

mod commands;

#[derive(Parser)]
#[command(name = "schoolcom")]
#[command(author, version, about = "SchoolCom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the interface translations
    I18n {
        #[command(subcommand)]
        action: I18nAction,
    },
    /// Resolve a sign-in identifier to its role and landing page
    Whoami {
        identifier: String,

        /// Secret for directory accounts that configure one
        #[arg(long)]
        secret: Option<String>,
    },
    /// Draft a parent notification with the AI helper
    Draft {
        #[arg(long)]
        title: String,

        /// Event type, e.g. `exam` or `announcement`
        #[arg(long = "type")]
        event_type: String,

        #[arg(long)]
        course: String,

        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
enum I18nAction {
    /// List keys present in English but missing in a language
    Missing {
        #[arg(long, default_value = "es")]
        lang: Language,
    },
    /// Print one translated string
    Get {
        key: String,

        #[arg(long, default_value = "en")]
        lang: Language,

        /// Placeholder replacement, `name=value`; repeatable
        #[arg(long = "set", value_parser = commands::i18n::parse_replacement)]
        replacements: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() {
    // Before the subscriber so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolcom_cli=info,schoolcom_portal=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::I18n { action } => match action {
            I18nAction::Missing { lang } => commands::i18n::missing(lang)?,
            I18nAction::Get {
                key,
                lang,
                replacements,
            } => commands::i18n::get(&key, lang, &replacements)?,
        },
        Commands::Whoami { identifier, secret } => {
            commands::whoami::whoami(&identifier, secret.as_deref())?;
        }
        Commands::Draft {
            title,
            event_type,
            course,
            description,
        } => commands::draft::draft(title, event_type, course, description).await?,
    }
    Ok(())
}
