mod banner;
mod gateway;
mod router;

use clap::{Parser, Subcommand};
use nexis_control::Launcher;
use nexis_core::{config, shellexpand};
use nexis_knowledge::WebKnowledge;
use nexis_memory::Store;
use router::Router;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "nexis", version, about = "NEXIS: local voice assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Mirror logs to stderr as well as the log file.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session.
    Start,
    /// Route a single utterance and print the reply.
    Ask {
        /// What you would say.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Show configuration, stored notes and pending reminders.
    Status,
    /// List the voices the configured speech engine offers.
    Voices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = config::read(&cli.config)?;
    let from_file = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    let _log_guard = init_logging(&cfg.assistant, cli.verbose)?;
    if !from_file {
        info!("config file not found at {}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Start => {
            banner::print_banner(&cfg.assistant.name);

            let store = Store::new(&cfg.memory).await?;
            let router = Arc::new(build_router(&cfg, store.clone())?);
            let listener = nexis_voice::build_listener(&cfg.voice);
            let speaker = nexis_voice::build_speaker(&cfg.assistant.name, &cfg.voice);

            let scheduler = cfg.scheduler.enabled.then(|| {
                gateway::scheduler::ReminderScheduler::start(
                    store.clone(),
                    speaker.clone(),
                    Duration::from_secs(cfg.scheduler.poll_interval_secs.max(1)),
                )
            });

            let session = gateway::Session::new(&cfg, listener, speaker, router);
            let result = session.run().await;

            if let Some(scheduler) = scheduler {
                scheduler.stop().await;
            }
            println!("\n{} shut down. Goodbye!\n", cfg.assistant.name);
            result?;
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: nexis ask <message>");
            }
            let store = Store::new(&cfg.memory).await?;
            let router = build_router(&cfg, store)?;
            let reply = router.route(&message.join(" ")).await;
            info!("ask: intent {}", reply.intent);
            println!("{}", reply.text);
        }
        Commands::Status => {
            let store = Store::new(&cfg.memory).await?;
            let notes = store.list_notes().await?;
            let pending = store.list_pending_reminders().await?;

            println!("{} status\n", cfg.assistant.name);
            println!("Config: {}", cli.config);
            println!("User: {}", cfg.assistant.user_name);
            println!(
                "Wake word: {}",
                cfg.assistant.wake_word().as_deref().unwrap_or("(none)")
            );
            println!(
                "Input: {}",
                match cfg.voice.stt_command.as_deref() {
                    Some(cmd) if !cmd.trim().is_empty() => cmd,
                    _ => "keyboard",
                }
            );
            println!(
                "Speech: {}",
                cfg.voice.tts_command.as_deref().unwrap_or("console only")
            );
            println!();
            println!("  database: {}", shellexpand(&cfg.memory.db_path));
            println!("  size: {} bytes", store.db_size().await?);
            println!("  notes: {}", notes.len());
            println!("  pending reminders: {}", pending.len());
            if let Some(next) = pending.first() {
                println!(
                    "  next: {} at {}",
                    next.task,
                    next.remind_at.format("%Y-%m-%d %H:%M")
                );
            }
            println!(
                "  scheduler: {}",
                if cfg.scheduler.enabled {
                    format!("every {}s", cfg.scheduler.poll_interval_secs)
                } else {
                    "disabled".to_string()
                }
            );
            println!(
                "  knowledge: {}",
                if cfg.knowledge.enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!(
                "  launcher: {} apps, {} folders, {} processes",
                cfg.launcher.apps.len(),
                cfg.launcher.folders.len(),
                cfg.launcher.processes.len()
            );
        }
        Commands::Voices => {
            let speaker = nexis_voice::build_speaker(&cfg.assistant.name, &cfg.voice);
            let voices = speaker.voices().await?;
            if voices.is_empty() {
                println!(
                    "No voices reported. Set voice.tts_voices_command in {} \
                     (e.g. \"espeak --voices\" or \"say -v '?'\").",
                    cli.config
                );
            } else {
                for (i, voice) in voices.iter().enumerate() {
                    println!("[{i}] {voice}");
                }
            }
        }
    }

    Ok(())
}

/// Wire the router to the real host controls and web lookups.
fn build_router(cfg: &config::Config, store: Store) -> anyhow::Result<Router> {
    let control = Arc::new(Launcher::new(cfg.launcher.clone()));
    let knowledge = Arc::new(WebKnowledge::new(cfg.knowledge.clone())?);
    Ok(Router::new(cfg, store, control, knowledge))
}

/// File logging under `<data_dir>/logs/`, optionally mirrored to stderr.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// file writer on drop and must be held for the life of the process.
fn init_logging(
    assistant: &config::AssistantConfig,
    verbose: bool,
) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = PathBuf::from(shellexpand(&assistant.data_dir)).join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    let appender = tracing_appender::rolling::never(&logs_dir, "nexis.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&assistant.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(verbose.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    Ok(guard)
}
