// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bundle_parallel::backends::TokioBackend;
use bundle_parallel::config::{load_and_validate_config, Config, RuntimeBuilder};
use bundle_parallel::context::{BundleScope, CollectingSink, Combiner, ProcessContext};
use bundle_parallel::errors::ProcessError;
use bundle_parallel::traits::Processor;

const DEFAULT_LATENCY_MS: u64 = 25;

/// Simulates a remote lookup per element, then emits the enriched word.
struct EnrichProcessor;

#[async_trait]
impl Processor<String, String> for EnrichProcessor {
    async fn process_element(
        &self,
        ctx: &dyn ProcessContext<String, String>,
    ) -> Result<(), ProcessError> {
        let latency = ctx
            .pipeline_options()
            .get_u64("latency_ms")
            .unwrap_or(DEFAULT_LATENCY_MS);
        tokio::time::sleep(Duration::from_millis(latency)).await;

        let word = ctx.element();
        ctx.create_aggregator("characters", Combiner::Sum)
            .add_value(word.len() as i64);
        ctx.output(format!("{} ({} chars)", word.to_uppercase(), word.len()))
            .await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "enrich"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::default(),
    };

    let (transform, options) = RuntimeBuilder::from_config::<String, String, _>(&config, EnrichProcessor)?;
    let sink = Arc::new(CollectingSink::<String>::new());
    let scope: Arc<BundleScope<String>> = Arc::new(BundleScope::new(options, sink.clone()));
    let backend = Arc::new(TokioBackend::try_current().map_err(anyhow::Error::msg)?);

    let words: Vec<String> = "the quick brown fox jumps over the lazy dog"
        .split_whitespace()
        .map(str::to_string)
        .collect();

    println!("🚀 Intra-bundle parallel processing demo");
    println!("═══════════════════════════════════════");
    println!("Processor: {}", transform.processor_name());
    println!("Max parallelism: {}", transform.max_parallelism());
    println!("Elements: {}", words.len());
    println!();

    let start = Instant::now();
    transform
        .run_bundle(backend, scope.clone(), words)
        .await
        .context("Bundle failed")?;
    let elapsed = start.elapsed();

    // Arrival order depends on which worker reached the sink first
    for (i, output) in sink.main_values().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, output);
    }

    let characters = scope
        .aggregators()
        .get("characters")
        .map(|a| a.value())
        .unwrap_or_default();
    println!();
    println!("📊 {} outputs, {} characters, {:?}", sink.len(), characters, elapsed);
    Ok(())
}
