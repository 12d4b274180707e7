use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tweet_analyzer::{
    Config, Streamer, TweetAnalyzer, TweetTable, TwitterClient, TwitterListener, UserRef,
};

#[derive(Parser)]
#[command(name = "tweet-analyzer")]
#[command(about = "Fetch, stream and tabulate tweets", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/tweet-analyzer/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tabulate a user's recent tweets and print the tail of one column
    Timeline {
        /// Screen name or numeric user id
        #[arg(default_value = "gucci")]
        user: String,

        #[arg(short = 'n', long, default_value_t = 200)]
        count: usize,

        #[arg(long, default_value = "name")]
        column: String,

        #[arg(long, default_value_t = 10)]
        tail: usize,

        /// Print the whole table as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Tabulate the authenticated account's home timeline
    Home {
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,

        #[arg(long, default_value = "tweets")]
        column: String,

        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// List accounts a user follows
    Friends {
        user: String,

        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
    },
    /// Append live tweets matching keywords to a file
    Stream {
        /// Keyword or hashtag to track (repeatable)
        #[arg(short, long = "track", required = true)]
        track: Vec<String>,

        /// Output file (overrides stream.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only write payloads to the output file, not to stdout
        #[arg(short, long)]
        quiet: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Commands::Timeline {
        user: "gucci".to_string(),
        count: 200,
        column: "name".to_string(),
        tail: 10,
        json: false,
    });

    match command {
        Commands::Timeline {
            user,
            count,
            column,
            tail,
            json,
        } => {
            let client = TwitterClient::new(&config, Some(UserRef::parse(&user)))?;
            let tweets = client
                .get_user_timeline_tweets(count)
                .await
                .with_context(|| format!("Failed to fetch timeline for {}", user))?;
            let table = TweetAnalyzer::new().tweets_to_table(&tweets);

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print_tail(&table, &column, tail)?;
            }
        }
        Commands::Home {
            count,
            column,
            tail,
        } => {
            let client = TwitterClient::new(&config, None)?;
            let tweets = client
                .get_home_timeline_tweets(count)
                .await
                .context("Failed to fetch home timeline")?;
            let table = TweetAnalyzer::new().tweets_to_table(&tweets);
            print_tail(&table, &column, tail)?;
        }
        Commands::Friends { user, count } => {
            let client = TwitterClient::new(&config, Some(UserRef::parse(&user)))?;
            let friends = client
                .get_friend_list(count)
                .await
                .with_context(|| format!("Failed to fetch friends of {}", user))?;
            for friend in friends {
                println!("@{}\t{}", friend.screen_name, friend.name);
            }
        }
        Commands::Stream {
            track,
            output,
            quiet,
        } => {
            if let Some(output) = output {
                config.stream.output_path = output;
            }
            config.stream.echo &= !quiet;

            let mut listener = TwitterListener::from_config(&config.stream);
            let streamer = Streamer::new(&config)?;
            let outcome = streamer.stream(&track, &mut listener).await?;

            eprintln!(
                "Stream ended ({:?}): {} written, {} failed writes to {}",
                outcome,
                listener.written(),
                listener.write_failures(),
                listener.path().display()
            );
        }
    }

    Ok(())
}

fn print_tail(table: &TweetTable, column: &str, tail: usize) -> Result<()> {
    let rendered = table.render_tail(column, tail).with_context(|| {
        format!(
            "Unknown column '{}' (expected one of: {})",
            column,
            TweetTable::COLUMNS.join(", ")
        )
    })?;
    println!("{}", rendered);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tweet_analyzer={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
