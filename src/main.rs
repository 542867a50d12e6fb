use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use howbot::config::BotConfig;
use howbot::consts::{DEFAULT_CHAT_URL, DEFAULT_PORT, DEFAULT_WIKI_URL};
use howbot::dice::ThreadDice;
use howbot::gateway::{self, AppState};
use howbot::instructions::InstructionFetcher;
use howbot::scrape::{STEP_SELECTOR, WikiHowScraper};
use howbot::slack::api::SlackClient;
use howbot::wiki::wikihow::WikiHow;

#[derive(Parser)]
#[command(name = "howbot", version, about = "Ask it how to do anything.")]
struct Cli {
    /// Slack bot OAuth token, used to post replies
    #[arg(long, env = "TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Slack signing secret, used to authenticate incoming events
    #[arg(long, env = "SECRET", default_value = "", hide_env_values = true)]
    secret: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Base URL of the wiki (search API and article pages)
    #[arg(long, env = "WIKI_URL", default_value = DEFAULT_WIKI_URL)]
    wiki_url: String,

    /// Endpoint replies are posted to
    #[arg(long, env = "CHAT_URL", default_value = DEFAULT_CHAT_URL)]
    chat_url: String,

    /// CSS selector for the step headlines on an article page
    #[arg(long, default_value = STEP_SELECTOR)]
    step_selector: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("howbot=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = BotConfig::new(cli.token, cli.secret)?;

    let fetcher = InstructionFetcher::new(
        Arc::new(WikiHow::new(Some(cli.wiki_url))),
        Box::new(WikiHowScraper::with_selector(&cli.step_selector)?),
        Box::new(ThreadDice),
    );
    let poster = Arc::new(SlackClient::new(config.token.clone(), Some(cli.chat_url)));
    let state = Arc::new(AppState::new(&config, fetcher, poster));

    let app = gateway::router(state).layer(
        tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            },
        ),
    );

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}
