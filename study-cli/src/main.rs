//! Study CLI
//!
//! Terminal client for the study service. Talks to the HTTP API for
//! anything authoritative and keeps a local cache for the session
//! token, theme and per-topic progress.

mod cache;
mod client;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use study_core::Level;

use cache::{completion_percent, Cache};
use client::{ApiClient, ClientError};

const DEFAULT_API_URL: &str = "http://127.0.0.1:4000";

#[derive(Parser)]
#[command(name = "study")]
#[command(about = "Terminal client for the study service")]
#[command(version)]
struct Cli {
    /// API base URL [env: STUDY_API_URL] [default: http://127.0.0.1:4000]
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        name: String,
        email: String,
        password: String,
    },

    /// Log in and store the session token
    Login { email: String, password: String },

    /// Drop the stored session
    Logout,

    /// Browse and manage topics
    Topics {
        #[command(subcommand)]
        command: TopicCommands,
    },

    /// Track learning progress
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },

    /// Switch the display theme
    Theme {
        /// light or dark
        mode: String,
    },

    /// Retry queued topic deletions
    Sync,
}

#[derive(Subcommand)]
enum TopicCommands {
    /// List all topics
    List,

    /// Show one topic with its learning points
    Show { slug: String },

    /// Create a topic (content is generated server-side)
    Create {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Beginner, Intermediate or Advanced
        #[arg(short, long, default_value = "Beginner")]
        level: String,
    },

    /// Delete a topic you own
    Delete { slug: String },
}

#[derive(Subcommand)]
enum ProgressCommands {
    /// Mark a learning point done (or undone)
    Toggle {
        slug: String,

        /// Beginner, Intermediate or Advanced
        level: String,

        /// Zero-based position within the level
        index: usize,
    },

    /// Show completion for a topic
    Show { slug: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let api_url = cli
        .api_url
        .or_else(|| std::env::var("STUDY_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let client = ApiClient::new(&api_url);

    let cache_path = Cache::default_path();
    let mut cache = Cache::load(&cache_path);

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => cmd_register(&client, &name, &email, &password),
        Commands::Login { email, password } => {
            cmd_login(&client, &mut cache, &cache_path, &email, &password)
        }
        Commands::Logout => cmd_logout(&mut cache, &cache_path),
        Commands::Topics { command } => match command {
            TopicCommands::List => cmd_topics_list(&client, &cache),
            TopicCommands::Show { slug } => cmd_topics_show(&client, &cache, &slug),
            TopicCommands::Create {
                title,
                description,
                level,
            } => cmd_topics_create(&client, &cache, &title, description.as_deref(), &level),
            TopicCommands::Delete { slug } => {
                cmd_topics_delete(&client, &mut cache, &cache_path, &slug)
            }
        },
        Commands::Progress { command } => match command {
            ProgressCommands::Toggle { slug, level, index } => {
                cmd_progress_toggle(&client, &mut cache, &cache_path, &slug, &level, index)
            }
            ProgressCommands::Show { slug } => cmd_progress_show(&client, &cache, &slug),
        },
        Commands::Theme { mode } => cmd_theme(&mut cache, &cache_path, &mode),
        Commands::Sync => cmd_sync(&client, &mut cache, &cache_path),
    }
}

fn require_token(cache: &Cache) -> Result<&str> {
    match cache.token.as_deref() {
        Some(token) => Ok(token),
        None => bail!("not logged in (run: study login <email> <password>)"),
    }
}

fn cmd_register(client: &ApiClient, name: &str, email: &str, password: &str) -> Result<()> {
    let response = client.register(name, email, password)?;
    println!("{}", response.msg);
    println!("Log in with: study login {} <password>", response.user.email);
    Ok(())
}

fn cmd_login(
    client: &ApiClient,
    cache: &mut Cache,
    cache_path: &std::path::Path,
    email: &str,
    password: &str,
) -> Result<()> {
    let response = client.login(email, password)?;

    let Some(token) = response.token else {
        bail!("server did not return a token");
    };

    println!("{}", response.msg);
    println!("Logged in as {} <{}>", response.user.name, response.user.email);

    cache.token = Some(token);
    cache.user = Some(response.user);
    cache.save(cache_path)?;
    Ok(())
}

fn cmd_logout(cache: &mut Cache, cache_path: &std::path::Path) -> Result<()> {
    if cache.token.is_none() {
        println!("Not logged in.");
        return Ok(());
    }

    cache.token = None;
    cache.user = None;
    cache.save(cache_path)?;
    println!("Logged out. Progress and theme are kept locally.");
    Ok(())
}

fn cmd_topics_list(client: &ApiClient, cache: &Cache) -> Result<()> {
    let topics = client.list_topics()?;

    if topics.is_empty() {
        println!("No topics yet. Create one with: study topics create <title>");
        return Ok(());
    }

    println!("{:<28} {:<14} {:>9}  Title", "Slug", "Level", "Done");
    for topic in &topics {
        let percent = completion_percent(
            cache.progress.get(&topic.slug),
            topic.content.total_items(),
        );
        println!(
            "{:<28} {:<14} {:>8}%  {}",
            topic.slug,
            topic.level.as_str(),
            percent,
            topic.title
        );
    }
    Ok(())
}

fn cmd_topics_show(client: &ApiClient, cache: &Cache, slug: &str) -> Result<()> {
    let topic = client.get_topic(slug)?;
    let progress = cache.progress.get(&topic.slug);

    println!("{} ({})", topic.title, topic.level.as_str());
    if let Some(description) = &topic.description {
        println!("{}", description);
    }
    println!();

    for level in Level::ALL {
        let items = topic.content.for_level(level);
        if items.is_empty() {
            continue;
        }

        println!("{}:", level.as_str());
        for (index, item) in items.iter().enumerate() {
            let key = progress_key(level, index);
            let done = progress
                .and_then(|map| map.get(&key))
                .copied()
                .unwrap_or(false);
            let marker = if done { "x" } else { " " };
            println!("  [{}] {}. {}", marker, index, item);
        }
        println!();
    }

    let percent = completion_percent(progress, topic.content.total_items());
    println!("Completion: {}%", percent);
    Ok(())
}

fn cmd_topics_create(
    client: &ApiClient,
    cache: &Cache,
    title: &str,
    description: Option<&str>,
    level: &str,
) -> Result<()> {
    let token = require_token(cache)?;

    // Parse locally so a typo fails before the network call.
    let level: Level = level.parse()?;

    println!("Creating topic (content generation can take a moment)...");
    let topic = client.create_topic(token, title, description, level.as_str())?;

    println!("Created \"{}\" as {}", topic.title, topic.slug);
    println!("View it with: study topics show {}", topic.slug);
    Ok(())
}

fn cmd_topics_delete(
    client: &ApiClient,
    cache: &mut Cache,
    cache_path: &std::path::Path,
    slug: &str,
) -> Result<()> {
    let token = require_token(cache)?;

    match client.delete_topic(token, slug) {
        Ok(response) => {
            cache.drop_topic(slug);
            cache.save(cache_path)?;
            println!("{}", response.msg);
            Ok(())
        }
        // The server never saw the request, so the delete can be
        // replayed safely later.
        Err(ClientError::Network(e)) => {
            cache.queue_deletion(slug);
            cache.save(cache_path)?;
            println!("Could not reach the server ({}).", e);
            println!("Deletion of \"{}\" is queued; run `study sync` when back online.", slug);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_progress_toggle(
    client: &ApiClient,
    cache: &mut Cache,
    cache_path: &std::path::Path,
    slug: &str,
    level: &str,
    index: usize,
) -> Result<()> {
    let level: Level = level.parse()?;
    let topic = client.get_topic(slug)?;

    let items = topic.content.for_level(level);
    if index >= items.len() {
        bail!(
            "{} has {} {} item(s); index {} is out of range",
            topic.slug,
            items.len(),
            level.as_str(),
            index
        );
    }

    let key = progress_key(level, index);
    let done = cache.toggle_progress(&topic.slug, &key);
    cache.save(cache_path)?;

    let state = if done { "done" } else { "not done" };
    println!("Marked {} {} as {}: {}", level.as_str(), index, state, items[index]);

    let percent = completion_percent(
        cache.progress.get(&topic.slug),
        topic.content.total_items(),
    );
    println!("Completion: {}%", percent);
    Ok(())
}

fn cmd_progress_show(client: &ApiClient, cache: &Cache, slug: &str) -> Result<()> {
    let topic = client.get_topic(slug)?;
    let progress = cache.progress.get(&topic.slug);

    let total = topic.content.total_items();
    let done = progress
        .map(|map| map.values().filter(|done| **done).count())
        .unwrap_or(0)
        .min(total);

    println!("{}: {}/{} learning points done", topic.title, done, total);
    println!("Completion: {}%", completion_percent(progress, total));
    Ok(())
}

fn cmd_theme(cache: &mut Cache, cache_path: &std::path::Path, mode: &str) -> Result<()> {
    if mode != "light" && mode != "dark" {
        bail!("unknown theme \"{}\" (expected light or dark)", mode);
    }

    cache.theme = mode.to_string();
    cache.save(cache_path)?;
    println!("Theme set to {}", mode);
    Ok(())
}

fn cmd_sync(client: &ApiClient, cache: &mut Cache, cache_path: &std::path::Path) -> Result<()> {
    if cache.pending_deletes.is_empty() {
        println!("Nothing to sync.");
        return Ok(());
    }

    let token = require_token(cache)?.to_string();
    let pending = cache.pending_deletes.clone();
    println!("Retrying {} queued deletion(s)...", pending.len());

    let mut unreachable = 0;
    for slug in &pending {
        match client.delete_topic(&token, slug) {
            Ok(response) => {
                cache.drop_topic(slug);
                println!("  {}: {}", slug, response.msg);
            }
            // Any answer from the server settles the entry, even a
            // refusal; only silence keeps it queued.
            Err(ClientError::Server { msg, .. }) => {
                cache.drop_topic(slug);
                println!("  {}: dropped ({})", slug, msg);
            }
            Err(ClientError::Network(e)) => {
                unreachable += 1;
                println!("  {}: still unreachable ({})", slug, e);
            }
        }
    }

    cache.save(cache_path)?;
    if unreachable > 0 {
        println!("{} deletion(s) remain queued.", unreachable);
    } else {
        println!("Sync complete.");
    }
    Ok(())
}

fn progress_key(level: Level, index: usize) -> String {
    format!("{}-{}", level.as_str(), index)
}
