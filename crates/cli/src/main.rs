use std::{sync::Arc, time::Duration};

use {
    anyhow::Context as _,
    clap::{Parser, Subcommand},
    secrecy::ExposeSecret,
    tracing::{debug, info},
    tracing_subscriber::EnvFilter,
};

use {
    yumi_chat::{ChatEngine, EngineSettings, WeatherChain},
    yumi_config::YumiConfig,
    yumi_discord::YumiHandler,
    yumi_providers::{LlmProvider, ProviderRegistry},
    yumi_sessions::SessionStore,
    yumi_weather::WeatherClient,
};

#[derive(Parser)]
#[command(name = "yumi", about = "Yumi — Discord LLM chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Discord bot (default when no subcommand is provided).
    Run,
    /// One-shot conversation turn without Discord, for local testing.
    Chat {
        #[arg(short, long)]
        message: String,
    },
    /// List available models.
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let config = yumi_config::discover_and_load();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(config).await,
        Commands::Chat { message } => run_chat(config, &message).await,
        Commands::Models => list_models(&config),
    }
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},serenity=warn,hyper=warn")));

    if json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build the engine (providers, session store, summarizer) from config.
fn build_engine(config: &YumiConfig) -> anyhow::Result<(Arc<ChatEngine>, Arc<dyn LlmProvider>)> {
    let registry = ProviderRegistry::from_config(&config.providers);
    if registry.is_empty() {
        anyhow::bail!(
            "no LLM providers configured — set OPENAI_API_KEY, GEMINI_API_KEY, \
             or MISTRAL_API_KEY (or a [providers.*] config section)"
        );
    }
    info!(summary = %registry.provider_summary(), "providers discovered");

    let provider = registry
        .get(&config.chat.model)
        .or_else(|| registry.first())
        .context("no usable chat model")?;
    if provider.id() != config.chat.model {
        debug!(
            configured = %config.chat.model,
            using = %provider.id(),
            "configured chat model unavailable, using first registered model"
        );
    }
    let summary_provider = registry
        .get(&config.chat.summary_model)
        .unwrap_or_else(|| provider.clone());

    let store = Arc::new(SessionStore::new(config.chat.max_sessions));
    let settings = EngineSettings {
        token_budget: config.chat.token_budget,
        summarize_watermark: config.chat.summarize_watermark,
        ..EngineSettings::default()
    };

    let engine = Arc::new(ChatEngine::new(
        provider.clone(),
        summary_provider,
        store,
        settings,
    ));
    Ok((engine, provider))
}

async fn run_bot(config: YumiConfig) -> anyhow::Result<()> {
    let (engine, provider) = build_engine(&config)?;

    let weather = config.weather.api_key.as_ref().map(|key| {
        Arc::new(WeatherChain::new(
            provider.clone(),
            WeatherClient::new(key.clone()),
        ))
    });
    if weather.is_none() {
        info!("no weather API key configured, !weather disabled");
    }

    // Periodic idle-session sweep.
    let store = engine.store().clone();
    let max_idle = Duration::from_secs(config.chat.session_max_idle_secs);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(300));
        loop {
            tick.tick().await;
            let evicted = store.evict_idle(max_idle);
            if evicted > 0 {
                debug!(evicted, "idle sessions evicted");
            }
        }
    });

    let token = config
        .discord
        .token
        .as_ref()
        .context("no Discord bot token configured (set DISCORD_BOT_TOKEN)")?;

    let handler = YumiHandler {
        engine,
        weather,
        max_message_len: config.discord.max_message_len,
    };

    let mut client = serenity::Client::builder(token.expose_secret(), YumiHandler::intents())
        .event_handler(handler)
        .await
        .context("failed to build Discord client")?;

    info!(model = %provider.id(), "starting Discord gateway");
    client.start().await.context("Discord client error")?;
    Ok(())
}

async fn run_chat(config: YumiConfig, message: &str) -> anyhow::Result<()> {
    let (engine, _) = build_engine(&config)?;
    let reply = engine.respond("cli", message).await?;
    println!("{reply}");
    Ok(())
}

fn list_models(config: &YumiConfig) -> anyhow::Result<()> {
    let registry = ProviderRegistry::from_config(&config.providers);
    if registry.is_empty() {
        println!("no LLM providers configured");
        return Ok(());
    }
    for model in registry.list_models() {
        println!("{:<28} {} ({})", model.id, model.display_name, model.provider);
    }
    println!("{}", registry.provider_summary());
    Ok(())
}
