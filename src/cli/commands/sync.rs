use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use super::super::{args::SyncArgs, report};
use super::{CommandResult, CommandSummary, context::CommandContext};
use crate::core::{Backend, NotifySource, PassReport, Synchronizer, WatchLoop};

pub fn sync(args: SyncArgs) -> Result<CommandResult> {
    let CommandContext {
        config, settings, ..
    } = CommandContext::new(&args.common)?;
    let prune = args.prune || config.prune_unused;
    let mut synchronizer = Synchronizer::new(settings)?;

    if !args.watch {
        return Ok(pass_result(synchronizer.full_pass(prune)));
    }

    let backend = if args.poll {
        Backend::Poll(Duration::from_millis(config.poll_interval_ms))
    } else {
        Backend::Native
    };
    let mut watch = WatchLoop::new(NotifySource::new(backend));
    let pass = watch.initial_pass(&mut synchronizer, prune);
    report::print(&pass_result(pass));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let summary = runtime.block_on(watch.run(&mut synchronizer, interrupted()))?;

    // Stopping on Ctrl+C is the normal way out of watch mode.
    Ok(CommandResult::new(CommandSummary::Watch(summary), false))
}

fn pass_result(pass: PassReport) -> CommandResult {
    let has_failures = pass.has_failures();
    CommandResult::new(CommandSummary::Sync(pass), has_failures)
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
