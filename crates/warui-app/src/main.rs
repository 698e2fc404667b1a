use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use warui_config::Config;
use warui_core::{
    AdaptiveInterlocutor, CoreError, InterlocutorSettings, TrimPolicy, WeightOptions,
    gather_focus_terms,
};
use warui_llm::{ChatModel, ClaudeChat};
use warui_renshuu::{RenshuuClient, TermQuery, fetch_proficiency};
use warui_types::{Level, Term};

mod session;

#[derive(Parser)]
#[command(
    name = "warui",
    about = "Japanese conversation practice built around your Renshuu schedules"
)]
struct Args {
    /// JSON config file, environment variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,
    /// Conversation level (n5-n1), estimated from the Renshuu profile if omitted
    #[arg(long)]
    level: Option<Level>,
    /// Number of focus terms
    #[arg(long)]
    terms: Option<usize>,
    /// Seed for a reproducible focus term draw
    #[arg(long)]
    seed: Option<u64>,
    /// Also pick terms that were never studied
    #[arg(long)]
    include_unstudied: bool,
    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(level) = self.level {
            config.chat.level = Some(level);
        }
        if let Some(n_terms) = self.terms {
            config.focus.n_terms = n_terms;
        }
        if self.seed.is_some() {
            config.focus.seed = self.seed;
        }
        if self.include_unstudied {
            config.focus.include_unstudied = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine, the environment may already be set
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::new(),
    };
    args.apply(&mut config);

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = run(config) => result,
        _ = shutdown => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout belongs to the conversation
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let renshuu = RenshuuClient::new(
        config.renshuu.api_key.clone(),
        Duration::from_secs(config.renshuu.timeout_seconds),
    )?
    .with_base_url(&config.renshuu.api_url);

    let level = match config.chat.level {
        Some(level) => level,
        None => {
            let proficiency = fetch_proficiency(&renshuu, config.renshuu.proficiency_threshold)
                .await
                .context("Failed to estimate level from Renshuu profile")?;
            for (level, value) in &proficiency.level_proficiencies {
                tracing::info!("{}: {:.0}%", level.label(), value * 100.0);
            }
            proficiency.estimated_level
        }
    };
    tracing::info!("Conversation level: {}", level.label());

    let focus_terms = select_focus(&renshuu, &config, level).await?;

    let timeout = Duration::from_secs(config.llm.timeout_seconds);
    let chat_model = ClaudeChat::new(
        config.llm.api_key.clone(),
        config.llm.chat_model.clone(),
        timeout,
    )?
    .with_base_url(&config.llm.api_url)
    .with_max_tokens(config.llm.max_tokens)
    .with_temperature(config.llm.temperature);

    let summarizer = ClaudeChat::new(
        config.llm.api_key.clone(),
        config.llm.summary_model.clone(),
        timeout,
    )?
    .with_base_url(&config.llm.api_url)
    .with_max_tokens(config.llm.max_tokens)
    .with_temperature(config.llm.temperature);

    let models = [
        ("chat", chat_model.metadata()),
        ("summary", summarizer.metadata()),
    ];
    for (purpose, metadata) in models {
        tracing::info!("Using {} model {} ({})", purpose, metadata.model, metadata.provider);
    }

    let settings = InterlocutorSettings {
        level,
        focus_terms,
        trim_policy: TrimPolicy::new(config.chat.chat_log_threshold, config.chat.chat_log_trim_to),
    };
    let mut interlocutor =
        AdaptiveInterlocutor::new(settings, Arc::new(chat_model), Arc::new(summarizer));

    session::chat_loop(&mut interlocutor, session::stdin_lines(), tokio::io::stdout()).await
}

/// Draw focus terms for the level. Too few studied terms is not fatal,
/// the conversation just runs without them.
async fn select_focus(
    renshuu: &RenshuuClient,
    config: &Config,
    level: Level,
) -> anyhow::Result<Vec<Term>> {
    if config.focus.n_terms == 0 {
        return Ok(Vec::new());
    }

    let query = TermQuery {
        levels: vec![level],
        types: config.focus.types.clone(),
        include_unstudied: config.focus.include_unstudied,
    };
    let options = WeightOptions {
        min_raw_weight: config.focus.min_raw_weight,
        normalize: true,
    };

    match gather_focus_terms(renshuu, &query, config.focus.n_terms, options, config.focus.seed).await
    {
        Ok(terms) => {
            for term in &terms {
                tracing::info!(
                    "Focus term {} ({}, mastery {}%)",
                    term.id,
                    term.term_type,
                    term.mastery
                );
            }
            Ok(terms)
        }
        Err(CoreError::Selection(e)) => {
            tracing::warn!("{e}, continuing without focus terms");
            Ok(Vec::new())
        }
        Err(e) => Err(e).context("Failed to fetch study terms"),
    }
}
