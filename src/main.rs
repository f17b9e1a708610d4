use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tally::analytics::{aggregate, ConversationSummary, Fetcher};
use tally::client::{Endpoints, PlatformClient, QueryClient};
use tally::config::{self, Config};
use tally::models::{Interval, QueryRequest, StatField};
use tally::{presets, report};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Contact-center analytics queries and bot intent totals", long_about = None)]
struct Cli {
    /// IANA time zone for aggregate queries (overrides TALLY_TIME_ZONE)
    #[arg(long, global = true)]
    time_zone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversation details, fetching every page
    Details {
        /// Days to look back from now
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Records per page (overrides TALLY_PAGE_SIZE)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        page_size: Option<u32>,
    },
    /// Bot intent totals per conversation
    Intents {
        /// Statistic to total: count or sum
        #[arg(long, default_value = "sum")]
        stat: StatField,
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Only sessions handled by this bot provider (e.g. GOOGLE)
        #[arg(long)]
        provider: Option<String>,
        /// Only sessions of this media type (e.g. MESSAGING)
        #[arg(long)]
        media_type: Option<String>,
        /// Print the totals as JSON
        #[arg(long)]
        json: bool,
    },
    /// Bot intent sums for a single conversation
    Conversation {
        /// Conversation ID (UUID)
        #[arg(value_parser = parse_conversation_id)]
        conversation_id: String,
        #[arg(long, default_value_t = 90)]
        days: u32,
        #[arg(long)]
        json: bool,
    },
    /// Bot session metrics per intent, printed as raw JSON
    BotSummary {
        #[arg(long, default_value_t = 10)]
        days: u32,
        /// ISO-8601 bucket size
        #[arg(long, default_value = "P1D")]
        granularity: String,
        #[arg(long, default_value = "GOOGLE")]
        provider: String,
        #[arg(long, default_value = "MESSAGING")]
        media_type: String,
    },
}

fn parse_conversation_id(value: &str) -> Result<String, String> {
    if config::is_uuid(value) {
        Ok(value.to_string())
    } else {
        Err(format!("\"{value}\" is an invalid conversation ID"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("invalid configuration")?;
    info!("Loaded configuration for region {}", config.credentials.region);

    let time_zone = cli
        .time_zone
        .unwrap_or_else(|| config.query.time_zone.clone());

    let http = PlatformClient::http_client(config.http.timeout)
        .context("failed to build HTTP client")?;
    let client = PlatformClient::connect(
        http,
        Endpoints::for_region(config.credentials.region),
        &config.credentials,
    )
    .await
    .context("an error occurred while authenticating")?;

    let fetcher = Fetcher::new(&client);
    let now = Utc::now();

    match cli.command {
        Commands::Details { days, page_size } => {
            let page_size = page_size.unwrap_or(config.query.page_size);
            let request =
                presets::conversation_details(Interval::trailing_days(days, now)?, page_size);
            let outcome = fetcher.fetch_conversation_details(&request).await?;

            for record in &outcome.records {
                let summary = ConversationSummary::from_record(record);
                println!("{}", report::render_conversation(&summary));
            }
            println!("Number of conversations: {}", outcome.records.len());
        }
        Commands::Intents {
            stat,
            days,
            provider,
            media_type,
            json,
        } => {
            let filter = presets::provider_media_filter(provider.as_deref(), media_type.as_deref());
            let request = presets::intents_by_conversation(
                Interval::trailing_days(days, now)?,
                &time_zone,
                filter,
            );
            let conversations = print_intent_totals(&fetcher, &request, stat, json).await?;
            if !json {
                println!("Number of conversations with bot intents: {conversations}");
            }
        }
        Commands::Conversation {
            conversation_id,
            days,
            json,
        } => {
            let request = presets::intents_for_conversation(
                Interval::trailing_days(days, now)?,
                &time_zone,
                &conversation_id,
            );
            print_intent_totals(&fetcher, &request, StatField::Sum, json).await?;
        }
        Commands::BotSummary {
            days,
            granularity,
            provider,
            media_type,
        } => {
            let filter =
                presets::provider_media_filter(Some(provider.as_str()), Some(media_type.as_str()));
            let request = presets::bot_summary(
                Interval::trailing_days(days, now)?,
                &time_zone,
                &granularity,
                filter,
            );
            debug!("Bot summary query body: {}", serde_json::to_string(&request)?);

            let outcome = fetcher.fetch_bot_aggregates(&request).await?;
            println!("{}", serde_json::to_string_pretty(&outcome.records)?);
            println!("Number of returned results: {}", outcome.records.len());
        }
    }

    Ok(())
}

/// Runs an intents query and prints the per-conversation totals.
async fn print_intent_totals<C: QueryClient>(
    fetcher: &Fetcher<'_, C>,
    request: &QueryRequest,
    stat: StatField,
    json: bool,
) -> Result<usize> {
    debug!("Bot aggregates query body: {}", serde_json::to_string(request)?);

    let outcome = fetcher.fetch_bot_aggregates(request).await?;
    let totals = aggregate(
        &outcome.records,
        stat,
        presets::CONVERSATION_ID,
        presets::BOT_INTENT,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print!(
            "{}",
            report::render_totals(&totals, "Conversation ID", "intent", stat.as_str())
        );
    }

    Ok(totals.len())
}
