//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::error::Result;
use crate::loader::{build_paginator, client_for, load_definition};
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                definition,
                max_items,
            } => self.fetch(definition, *max_items).await,
            Commands::Validate { definition } => self.validate(definition),
        }
    }

    /// Stream items to stdout until the source is exhausted
    ///
    /// Ctrl-C cancels the traversal; the cancellation is reported as an error.
    async fn fetch(&self, definition: &Path, max_items: Option<usize>) -> Result<()> {
        let def = load_definition(definition)?;
        let paginator = build_paginator(&def, client_for(&def)?)?;

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling traversal");
                interrupt.cancel();
            }
        });

        let started = Instant::now();
        let mut items = paginator.items(cancel);
        let mut count = 0usize;
        let result = loop {
            if max_items.is_some_and(|max| count >= max) {
                break Ok(());
            }
            match items.next().await {
                Some(Ok(item)) => {
                    self.output(&item)?;
                    count += 1;
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            }
        };
        watcher.abort();

        info!(
            "{}: {} items in {:.2}s",
            def.name,
            count,
            started.elapsed().as_secs_f64()
        );
        result
    }

    /// Validate a definition, including assembling its paginator
    fn validate(&self, definition: &Path) -> Result<()> {
        let def = load_definition(definition)?;
        build_paginator(&def, client_for(&def)?)?;

        self.output(&json!({
            "status": "valid",
            "name": def.name,
            "pagination": def.pagination.kind(),
        }))
    }

    /// Write one value to stdout
    fn output(&self, value: &impl Serialize) -> Result<()> {
        let mut out = std::io::stdout().lock();
        match self.cli.format {
            OutputFormat::Json => serde_json::to_writer(&mut out, value)?,
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut out, value)?,
        }
        writeln!(out)?;
        Ok(())
    }
}
