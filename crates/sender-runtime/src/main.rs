//! # Pending Sender
//!
//! Console front end: every stdin line is one inbound event for the
//! configured operator identity. `@value` lines pick a menu option.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`PS_LOG_LEVEL`, `PS_JSON_LOGS`, ...)
//! 2. Load and validate `PS_*` configuration
//! 3. Open the credential vault and pending-set store under `PS_DATA_DIR`
//! 4. Start the reconcile loop
//! 5. Serve stdin until EOF or Ctrl+C
//! 6. Wait for running cancellations (a second Ctrl+C skips the wait)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use ps_01_conversation::{InboundEvent, MessageSink, OutboundMessage};
use ps_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use sender_runtime::adapters::{parse_line, ConsoleSink, RpcChainFactory};
use sender_runtime::{load_config, CancellationTasks, Dispatch, SenderContainer};
use shared_types::{Identity, SystemTimeSource};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())?;

    let config = load_config().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    let identity = Identity::new(config.console.identity.clone());
    let interval = Duration::from_secs(config.tracker.reconcile_interval_secs);
    let chains = Arc::new(RpcChainFactory::new(config.chain.clone()));

    let container = SenderContainer::open(
        config,
        Arc::new(ConsoleSink::stdout()),
        chains,
        Arc::new(SystemTimeSource),
    )?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let reconciler = tokio::spawn(container.reconciler().run(interval, shutdown_rx));

    let dispatcher = container.dispatcher();
    dispatcher
        .dispatch(InboundEvent::text(identity.clone(), "/start"))
        .await;

    info!(identity = %identity, "Console ready. Press Ctrl+C to stop.");
    let mut cancellations = CancellationTasks::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Failed to read console input");
                        break;
                    }
                };
                let Some(event) = parse_line(&identity, &line) else {
                    continue;
                };
                match dispatcher.dispatch(event).await {
                    Dispatch::Conversation(Err(e)) => debug!(error = %e, "Event rejected"),
                    Dispatch::Cancelling(handle) => {
                        debug!("Cancellation running in background");
                        cancellations.push(handle);
                    }
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                break;
            }
        }
    }

    info!("Initiating graceful shutdown...");
    let outstanding = cancellations.outstanding();
    if outstanding > 0 {
        container
            .sink
            .emit(OutboundMessage::new(
                identity.clone(),
                CancellationTasks::shutdown_notice(outstanding),
            ))
            .await;
        tokio::select! {
            _ = cancellations.wait() => info!("Cancellations finished"),
            _ = tokio::signal::ctrl_c() => {
                warn!(outstanding, "Exiting with cancellations still awaiting confirmation");
            }
        }
    }
    if shutdown_tx.send(true).is_err() {
        warn!("Reconcile loop already stopped");
    }
    if let Err(e) = reconciler.await {
        warn!(error = %e, "Reconcile loop ended abnormally");
    }
    match encode_metrics() {
        Ok(text) => debug!(metrics = %text, "Final metrics snapshot"),
        Err(e) => warn!(error = %e, "Metrics unavailable"),
    }
    info!("Shutdown complete");
    Ok(())
}
