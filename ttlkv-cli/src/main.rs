//! ttlkv CLI
//!
//! Command-line interface for exercising the ttlkv TTL cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ttlkv_cache::TtlCache;
use ttlkv_core::{CacheConfig, ManualClock};
use ttlkv_session::{SessionConfig, SessionStore};

/// ttlkv - concurrent in-memory TTL cache
#[derive(Parser)]
#[command(name = "ttlkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through set/get/expiry/count/clear on a simulated clock
    Demo,

    /// Hammer one cache from many threads
    Bench {
        /// Worker threads
        #[arg(short, long, default_value = "8")]
        threads: usize,
        /// Operations per thread
        #[arg(short, long, default_value = "100000")]
        ops: usize,
        /// TTL in milliseconds for written entries (omit for no expiry)
        #[arg(long)]
        ttl_ms: Option<u64>,
        /// Distinct keys shared by all threads
        #[arg(short, long, default_value = "1024")]
        keys: usize,
    },

    /// Create, read, refresh, and end a session
    Session {
        /// User id to bind to the session
        #[arg(short, long)]
        user: String,
        /// Session lifetime in seconds
        #[arg(long, default_value = "3600", env = "TTLKV_SESSION_TTL_SECS")]
        ttl: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ttlkv=debug,info"
    } else {
        "ttlkv=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Demo => cmd_demo(),
        Commands::Bench {
            threads,
            ops,
            ttl_ms,
            keys,
        } => cmd_bench(threads, ops, ttl_ms, keys).await,
        Commands::Session { user, ttl } => cmd_session(user, ttl),
    }
}

/// Replay the classic cache walkthrough without real sleeps
fn cmd_demo() -> Result<()> {
    println!("{}", "🧪 ttlkv demo (simulated clock)".cyan().bold());

    let clock = ManualClock::new();
    let cache: TtlCache<String, serde_json::Value> = TtlCache::with_clock(Arc::new(clock.clone()));

    cache
        .set_with_ttl("username".into(), "john_doe".into(), Duration::from_secs(5))
        .context("Failed to store username")?;
    println!("   {} {}", "get(username):".dimmed(), show(cache.get("username")));

    clock.advance(Duration::from_secs(6));
    println!("   {} +6s", "clock:".dimmed());
    println!("   {} {}", "get(username):".dimmed(), show(cache.get("username")));

    cache.set("key1".into(), "value1".into());
    cache
        .set_with_ttl("key2".into(), "value2".into(), Duration::from_secs(10))
        .context("Failed to store key2")?;
    println!("   {} {}", "count():".dimmed(), cache.count());

    clock.advance(Duration::from_secs(10));
    println!("   {} +10s", "clock:".dimmed());
    println!("   {} {}", "count():".dimmed(), cache.count());

    cache
        .set_with_ttl(
            "session_1".into(),
            serde_json::json!({ "user_id": 123 }),
            Duration::from_secs(3600),
        )
        .context("Failed to store session_1")?;
    println!("   {} {}", "get(session_1):".dimmed(), show(cache.get("session_1")));

    match cache.set_with_ttl("oops".into(), "x".into(), -1i64) {
        Ok(()) => println!("   {} negative TTL accepted", "❌".red()),
        Err(e) => println!("   {} {}", "set(oops, ttl=-1):".dimmed(), e.to_string().yellow()),
    }

    cache.clear();
    println!("   {} {}", "count() after clear():".dimmed(), cache.count());

    println!("\n{}", "📈 Stats:".green().bold());
    println!("{}", serde_json::to_string_pretty(&cache.stats())?);

    Ok(())
}

fn show(value: Option<serde_json::Value>) -> ColoredString {
    match value {
        Some(v) => v.to_string().green(),
        None => "<absent>".yellow(),
    }
}

/// Concurrent load against a single cache
async fn cmd_bench(threads: usize, ops: usize, ttl_ms: Option<u64>, keys: usize) -> Result<()> {
    anyhow::ensure!(threads > 0, "--threads must be at least 1");
    anyhow::ensure!(keys > 0, "--keys must be at least 1");

    let config = CacheConfig::from_env().context("Invalid cache configuration")?;
    info!(?config, "Loaded cache configuration");

    let cache: TtlCache<usize, usize> =
        TtlCache::with_config(config).context("Failed to create cache")?;
    let ttl = ttl_ms.map(Duration::from_millis);

    println!(
        "{} {} threads × {} ops over {} keys",
        "📊 Benchmarking".cyan().bold(),
        threads,
        ops,
        keys
    );

    let total = (threads * ops) as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let worker_cache = cache.clone();
    let worker_pb = pb.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let cache = worker_cache.clone();
                    let pb = worker_pb.clone();
                    scope.spawn(move || -> Result<()> {
                        for i in 0..ops {
                            let key = (t * ops + i) % keys;
                            if i % 4 == 0 {
                                match ttl {
                                    Some(ttl) => cache.set_with_ttl(key, i, ttl)?,
                                    None => cache.set(key, i),
                                }
                            } else {
                                std::hint::black_box(cache.get(&key));
                            }
                            if i % 1024 == 0 {
                                pb.inc(1024.min((ops - i) as u64));
                            }
                        }
                        Ok(())
                    })
                })
                .collect();

            for handle in handles {
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("Worker thread panicked"))??;
            }
            Ok(())
        })
    })
    .await
    .context("Benchmark task failed")??;
    pb.finish();

    let elapsed = start.elapsed();
    let rate = total as f64 / elapsed.as_secs_f64();

    println!("\n{}", "📈 Results:".green().bold());
    println!("   Elapsed: {:?}", elapsed);
    println!("   Throughput: {:.0} ops/sec", rate);
    println!("   Live entries: {}", cache.count());
    println!("{}", serde_json::to_string_pretty(&cache.stats())?);

    cache.shutdown().await;
    Ok(())
}

/// Session lifecycle on a fresh store
fn cmd_session(user: String, ttl_secs: u64) -> Result<()> {
    let config = SessionConfig::default().with_ttl(Duration::from_secs(ttl_secs));
    let sessions: SessionStore<String> =
        SessionStore::with_config(config).context("Invalid session configuration")?;

    let id = sessions.create_session(user);
    println!("{} {}", "🔑 Created session:".cyan().bold(), id);
    println!("   {} {:?}", "Lifetime:".dimmed(), sessions.ttl());

    let owner = sessions
        .get_user(&id)
        .context("Session vanished right after creation")?;
    println!("   {} {}", "User:".green(), owner);

    println!("   {} {}", "Refreshed:".dimmed(), sessions.refresh(&id));
    println!("   {} {}", "Active sessions:".dimmed(), sessions.active_sessions());

    sessions.delete_session(&id);
    println!("   {} {}", "After delete:".dimmed(), show_user(sessions.get_user(&id)));

    Ok(())
}

fn show_user(user: Option<String>) -> ColoredString {
    match user {
        Some(u) => u.green(),
        None => "<absent>".yellow(),
    }
}
