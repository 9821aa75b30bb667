//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG, JSON_LINES_INPUT_NAME};
use crate::core::shutdown::ShutdownService;
use crate::domain::stats::{Stat, StatAccumInput, StatFilter};
use crate::pipeline::{InputRegistry, JsonLinesInput, PackPool};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub registry: InputRegistry,
    pub pool: PackPool,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;

        match command {
            Some(Commands::Check) => {
                Self::print_templates(&config);
                return Ok(());
            }
            Some(Commands::Run) | None => {}
        }

        Self::init(config).start().await
    }

    fn init(config: AppConfig) -> Self {
        let pool = PackPool::new(config.pipeline.pool_size);
        Self {
            shutdown: ShutdownService::new(),
            config,
            registry: InputRegistry::new(),
            pool,
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries the stats, logs go to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn print_templates(config: &AppConfig) {
        let metrics = &config.stat_filter.metrics;
        let mut ids: Vec<&String> = metrics.keys().collect();
        ids.sort();

        println!(
            "{} metric template(s), delivering to '{}'",
            ids.len(),
            config.stat_filter.stat_accum_name
        );
        for id in ids {
            let template = &metrics[id];
            println!(
                "  {}: {} name={:?} value={:?}",
                id, template.kind, template.name, template.value
            );
        }
    }

    async fn start(self) -> Result<()> {
        self.shutdown.install_signal_handlers();

        let (stat_accum, stats_rx) = StatAccumInput::new(
            self.config.stat_accum.name.clone(),
            self.config.stat_accum.channel_capacity,
        );
        self.registry
            .register(Arc::new(stat_accum))
            .context("Failed to register stat accumulator")?;

        let input = Arc::new(JsonLinesInput::new(JSON_LINES_INPUT_NAME));
        self.registry
            .register(input.clone())
            .context("Failed to register input")?;

        let sink = tokio::spawn(write_stats(stats_rx, tokio::io::stdout()));

        let (work_tx, work_rx) = mpsc::channel(self.config.pipeline.channel_capacity);
        let stage = StatFilter::new(self.config.stat_filter.clone())
            .start(&self.registry, work_rx)
            .context("Failed to start stat filter")?;
        self.shutdown.register(stage).await;

        tracing::info!(
            inputs = ?self.registry.names(),
            metrics = self.config.stat_filter.metrics.len(),
            "Stat filter running, reading messages from stdin"
        );

        let stdin = BufReader::new(tokio::io::stdin());
        let result = input
            .run(stdin, &self.pool, work_tx, self.shutdown.wait())
            .await;

        // Input is closed; the stage drains what is queued and stops
        self.shutdown.shutdown().await;

        // Dropping the registry releases the last accumulator sender
        let Self { registry, pool, .. } = self;
        drop(registry);
        sink.await.context("Stat writer task failed")?;

        let input_stats = result.context("Input failed")?;
        tracing::info!(
            delivered = input_stats.delivered,
            skipped = input_stats.skipped,
            recycled = pool.recycled(),
            "Stat filter finished"
        );
        Ok(())
    }
}

/// Write every accepted stat as a statsd line until the accumulator closes
async fn write_stats<W>(mut stats_rx: mpsc::Receiver<Stat>, mut out: W)
where
    W: AsyncWrite + Unpin,
{
    while let Some(stat) = stats_rx.recv().await {
        let line = format!("{}\n", stat);
        if let Err(e) = out.write_all(line.as_bytes()).await {
            tracing::error!(error = %e, "Failed to write stat, closing accumulator");
            break;
        }
    }

    if let Err(e) = out.flush().await {
        tracing::warn!(error = %e, "Failed to flush stats");
    }
}
