use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use content_forge::{
    AppState, ContentRequest, FileOutputWriter, OutputWriter, PlannedContent, Researcher,
    ServiceConfig,
};

/// Content-Forge CLI: research topics, plan content calendars and generate articles
#[derive(Parser, Debug)]
#[command(name = "content-forge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    #[command(name = "serve")]
    Serve {
        /// Address to bind (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Suggest blog topics for a niche
    #[command(name = "research")]
    Research {
        /// Topic area to research
        #[arg(short, long)]
        niche: String,

        /// Number of topics (defaults to research.default_topic_count)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Plan four weeks of content for a niche and write it as markdown
    #[command(name = "plan")]
    Plan {
        /// Topic area to research
        #[arg(short, long)]
        niche: String,

        /// Posts to schedule per week
        #[arg(long, default_value = "2")]
        posts_per_week: u32,

        /// Output directory for markdown plans
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a single article and print it
    #[command(name = "generate")]
    Generate {
        /// What the article is about
        #[arg(short, long)]
        topic: String,

        /// Keyword to include (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        #[arg(long, default_value = "professional")]
        tone: String,

        /// short, medium or long
        #[arg(short, long, default_value = "medium")]
        length: String,

        #[arg(long, default_value = "blog_post")]
        content_type: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        eprintln!("Example: content-forge plan --niche \"personal finance\"");
        std::process::exit(1);
    };

    init_logging(cli.verbose);

    let mut config = ServiceConfig::load_or_default(cli.config.as_ref())
        .context("Failed to load configuration")?;
    config
        .apply_env()
        .context("Failed to apply environment overrides")?;

    if config.llm.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; model calls will fail");
    }

    match command {
        Command::Serve { host, port } => handle_serve(config, host, port).await,
        Command::Research { niche, count } => handle_research(config, niche, count).await,
        Command::Plan {
            niche,
            posts_per_week,
            output,
        } => handle_plan(config, niche, posts_per_week, output).await,
        Command::Generate {
            topic,
            keywords,
            tone,
            length,
            content_type,
        } => {
            let request = ContentRequest {
                topic,
                keywords,
                tone,
                length,
                content_type,
            };
            handle_generate(config, request).await
        }
    }
}

async fn handle_serve(
    mut config: ServiceConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = AppState::from_config(&config).context("Failed to initialize services")?;
    content_forge::serve(Arc::new(state))
        .await
        .context("Server failed")
}

async fn handle_research(config: ServiceConfig, niche: String, count: Option<usize>) -> Result<()> {
    let count = count.unwrap_or(config.research.default_topic_count);
    let state = AppState::from_config(&config).context("Failed to initialize services")?;

    let topics = state
        .strategy
        .researcher()
        .research_topics(&niche, count)
        .await
        .context("Topic research failed")?;

    println!("Topics for '{}':", niche);
    for (i, topic) in topics.iter().enumerate() {
        println!("{:>3}. {}", i + 1, topic.title);
        println!("     keywords: {}", topic.keyword_list());
        if let Some(volume) = &topic.search_volume {
            println!("     search volume: {}", volume);
        }
        if let Some(competition) = topic.competition {
            println!("     competition: {:.2}", competition);
        }
    }
    Ok(())
}

async fn handle_plan(
    mut config: ServiceConfig,
    niche: String,
    posts_per_week: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(dir) = output {
        config.output.dir = dir;
    }

    info!("Planning content for niche: {}", niche);
    let state = AppState::from_config(&config).context("Failed to initialize services")?;

    let planned = state
        .strategy
        .plan_content_calendar(&niche, posts_per_week)
        .await
        .context("Content planning failed")?;

    let writer = FileOutputWriter::new(config.output.clone());
    for item in &planned {
        writer
            .write_planned(item)
            .await
            .context(format!("Failed to write plan for '{}'", item.plan.title()))?;
    }

    let entries = state.strategy.calendar().lock().await.entries().to_vec();
    let calendar_path = writer
        .write_calendar(&niche, &entries)
        .await
        .context("Failed to write calendar")?;

    print_plan_summary(&planned);
    println!("\nCalendar written to {}", calendar_path.display());
    Ok(())
}

async fn handle_generate(config: ServiceConfig, request: ContentRequest) -> Result<()> {
    let state = AppState::from_config(&config).context("Failed to initialize services")?;

    let response = state
        .generator
        .generate(&request)
        .await
        .context("Content generation failed")?;

    println!("{}", response.content);
    eprintln!(
        "\nModel: {} | tokens: {} prompt + {} completion = {}",
        response.model,
        response.usage.prompt_tokens,
        response.usage.completion_tokens,
        response.usage.total_tokens
    );
    Ok(())
}

fn print_plan_summary(planned: &[PlannedContent]) {
    println!("\n========================================");
    println!("Content Calendar Planned");
    println!("========================================");
    println!("Posts scheduled: {}", planned.len());
    for item in planned {
        println!(
            "  {}  {} ({} words)",
            item.scheduled_date.format("%Y-%m-%d"),
            item.plan.title(),
            item.plan.target_word_count
        );
    }
}
