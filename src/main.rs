//! CaniScan triage - terminal interview for canine skin complaints.
//!
//! Runs one diagnostic interview against a local Ollama model (or any
//! OpenAI-compatible server), then optionally offers care advice.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use caniscan_triage::adapters::ai::{OllamaConfig, OllamaProvider, OpenAIConfig, OpenAIProvider};
use caniscan_triage::adapters::oracle::LlmOracle;
use caniscan_triage::adapters::user_io::ConsoleUserIo;
use caniscan_triage::application::{
    CareAdvisor, InterviewSettings, RunInterviewCommand, RunInterviewHandler,
};
use caniscan_triage::config::{AiConfig, AiProvider, AppConfig};
use caniscan_triage::ports::{AIProvider, UserIo, UserIoError};

const COMPLAINT_PROMPT: &str = "Describe your dog's skin problem:";
const FOLLOW_UP_PROMPT: &str = "Any questions about care? (leave blank to finish)";

#[derive(Parser)]
#[command(name = "caniscan-triage")]
#[command(about = "Interactive triage interview for canine skin conditions", long_about = None)]
#[command(version)]
struct Cli {
    /// Initial complaint; asked interactively when omitted
    #[arg(long)]
    complaint: Option<String>,

    /// Override the turn budget
    #[arg(long)]
    max_turns: Option<u32>,

    /// Override the model name
    #[arg(long)]
    model: Option<String>,

    /// Offer care advice after a diagnosis
    #[arg(long)]
    advice: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the interview.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(max_turns) = cli.max_turns {
        config.interview.max_turns = max_turns;
    }
    if let Some(model) = cli.model {
        config.ai.model = Some(model);
    }
    config.validate().context("invalid configuration")?;

    info!(
        provider = ?config.ai.provider,
        model = config.ai.model(),
        max_turns = config.interview.max_turns,
        "caniscan-triage v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let provider = build_provider(&config.ai)?;
    let user_io = Arc::new(ConsoleUserIo::new());

    let complaint = match cli.complaint {
        Some(complaint) => complaint,
        None => user_io
            .ask(COMPLAINT_PROMPT)
            .await
            .context("no complaint provided")?,
    };

    let oracle = LlmOracle::new(Arc::clone(&provider)).with_temperature(config.ai.temperature);
    let handler = RunInterviewHandler::new(
        Arc::new(oracle),
        Arc::clone(&user_io),
        InterviewSettings::from(&config.interview),
    );

    let outcome = handler
        .handle(RunInterviewCommand::new(complaint))
        .await
        .context("interview failed")?;

    if !outcome.notified {
        warn!(summary = %outcome.result.summary(), "result was not shown to the owner");
    }

    if cli.advice {
        if let Some(diagnosis) = outcome.result.diagnosis() {
            let advisor = CareAdvisor::new(Arc::new(provider));
            advise(&advisor, user_io.as_ref(), &diagnosis.diagnosis, diagnosis.confidence * 100.0)
                .await?;
        }
    }

    Ok(())
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>> {
    let provider: Arc<dyn AIProvider> = match ai.provider {
        AiProvider::Ollama => Arc::new(OllamaProvider::new(
            OllamaConfig::default()
                .with_model(ai.model())
                .with_base_url(ai.base_url())
                .with_timeout(ai.timeout()),
        )?),
        AiProvider::OpenAI => Arc::new(OpenAIProvider::new(
            OpenAIConfig::new(ai.api_key.clone().unwrap_or_default())
                .with_model(ai.model())
                .with_base_url(ai.base_url())
                .with_timeout(ai.timeout()),
        )?),
    };
    Ok(provider)
}

async fn advise<P: AIProvider>(
    advisor: &CareAdvisor<P>,
    user_io: &ConsoleUserIo,
    diagnosis: &str,
    confidence_pct: f64,
) -> Result<()> {
    let initial = advisor.initial_recommendation(diagnosis, confidence_pct).await;
    user_io.notify(&initial.recommendation).await?;

    loop {
        let question = match user_io.ask(FOLLOW_UP_PROMPT).await {
            Ok(question) if !question.trim().is_empty() => question,
            Ok(_) | Err(UserIoError::Closed) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        let advice = advisor.recommend(diagnosis, confidence_pct, &question).await;
        if advice.is_fallback() {
            warn!("care advice unavailable, showing fallback");
        }
        user_io.notify(&advice.recommendation).await?;
    }
}
