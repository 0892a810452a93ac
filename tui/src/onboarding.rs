//! First-run onboarding.
//!
//! Before the first generation the user is asked for whatever the config is
//! missing: the API key, the report language and the model. A chosen model
//! is checked with a tiny request and asked for again until it works.

use anyhow::{bail, Context};
use reviewer_core::agent::{self, Agent, DEFAULT_LANGUAGE, DEFAULT_MODEL};
use reviewer_core::{ConfigKey, GeminiBackend, LlmBackend, ReviewerConfig};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Line-oriented question/answer over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Prompter reading answers from `input` and writing questions to `output`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask `question` and return the trimmed answer
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or when input is closed before an answer.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        self.output.write_all(question.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .context("failed to read input")?;
        if read == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }

    /// Print one informational line
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    pub async fn say(&mut self, message: &str) -> std::io::Result<()> {
        self.output.write_all(format!("{message}\n").as_bytes()).await?;
        self.output.flush().await
    }
}

/// Ask for the API key and output language if they are missing.
///
/// Returns whether anything changed. An empty language answer picks
/// [`DEFAULT_LANGUAGE`].
///
/// # Errors
///
/// Fails if the API key answer is empty or input is unavailable.
pub async fn ensure_settings<R, W>(
    config: &mut ReviewerConfig,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut changed = false;

    if config.google_ai_api_key.is_none() {
        let key = prompter
            .ask("Google AI API Key not found. Please enter your Google AI API Key: ")
            .await
            .context("Failed to get API key")?;
        if key.is_empty() {
            bail!("API key cannot be empty");
        }
        config.set(ConfigKey::GoogleAiApiKey, key)?;
        changed = true;
    }

    if config.output_language.is_none() {
        let language = prompter
            .ask(&format!(
                "Output language not set. Please enter the language for reports (default: {DEFAULT_LANGUAGE}): "
            ))
            .await
            .context("Failed to get output language")?;
        let language = if language.is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language
        };
        config.set(ConfigKey::OutputLanguage, language)?;
        changed = true;
    }

    Ok(changed)
}

/// Ask for a model until one validates, if none is configured.
///
/// Returns whether the model changed. An empty answer picks
/// [`DEFAULT_MODEL`].
///
/// # Errors
///
/// Fails only when input is unavailable; an invalid model is asked again.
pub async fn ensure_model<B, R, W>(
    config: &mut ReviewerConfig,
    backend: &B,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<bool>
where
    B: LlmBackend + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if config.ai_model.is_some() {
        return Ok(false);
    }

    loop {
        let model = prompter
            .ask(&format!(
                "AI model not set. Please enter the Gemini model to use (default: {DEFAULT_MODEL}): "
            ))
            .await
            .context("Failed to get AI model")?;
        let model = if model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model
        };

        prompter
            .say(&format!("Validating model '{model}'..."))
            .await?;
        match agent::validate_model(backend, &model).await {
            Ok(()) => {
                prompter.say("Model validated successfully!").await?;
                config.set(ConfigKey::AiModel, model)?;
                return Ok(true);
            }
            Err(err) => {
                tracing::debug!(model = %model, error = %err, "model rejected");
                prompter
                    .say(&format!(
                        "Validation failed: {err}. Please check the model name and try again."
                    ))
                    .await?;
            }
        }
    }
}

/// Complete the configuration interactively and build the agent.
///
/// Answers are saved; a failed save is reported but does not stop the run.
///
/// # Errors
///
/// Fails if onboarding cannot complete or the backend cannot be created.
pub async fn prepare_agent(mut config: ReviewerConfig) -> anyhow::Result<Agent<GeminiBackend>> {
    let mut prompter = Prompter::new(BufReader::new(io::stdin()), io::stdout());

    let mut changed = ensure_settings(&mut config, &mut prompter).await?;
    let backend = GeminiBackend::from_config(&config)?;
    changed |= ensure_model(&mut config, &backend, &mut prompter).await?;

    if changed {
        if let Err(err) = config.save() {
            tracing::warn!(error = %err, "failed to save configuration");
            eprintln!("Warning: Failed to save config: {err}");
        }
    }

    let model = config.ai_model.clone().context("AI model is not configured")?;
    let language = config
        .output_language
        .clone()
        .context("Output language is not configured")?;
    Ok(Agent::new(backend, model, language))
}
