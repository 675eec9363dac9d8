use std::sync::Arc;
use std::time::Duration;

use lightning_agent::gateway::{Gateway, RealtimeClient, load_config, load_default_config};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const REPORT_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("lightning_agent=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };
    let credentials = config.credentials.clone().with_env_overrides();
    tracing::info!(
        product = %config.product_code,
        ws_url = %config.endpoints.ws_url,
        authenticated = credentials.is_configured(),
        "Starting Lightning agent..."
    );

    let gateway = Gateway::new(config.gateway_config());

    match gateway.rest().get_ticker(config.product_code.as_str()).await {
        Ok(ticker) => tracing::info!(
            ltp = %ticker.ltp,
            best_bid = %ticker.best_bid,
            best_ask = %ticker.best_ask,
            timestamp = %ticker.timestamp,
            "Ticker"
        ),
        Err(e) => tracing::warn!(error = %e, "Failed to fetch ticker"),
    }

    if let Some(creds) = credentials.to_credentials() {
        let private = gateway.private(creds, config.product_code.clone());
        match private.get_positions().await {
            Ok(positions) => tracing::info!(count = positions.len(), "Open positions"),
            Err(e) => tracing::warn!(error = %e, "Failed to fetch positions"),
        }
    }

    let client = Arc::new(gateway.connect_realtime(config.realtime_config()?).await?);

    client.on_execution(|executions| {
        if let Some(last) = executions.last() {
            tracing::debug!(count = executions.len(), price = %last.price, "Executions");
        }
    });

    let cancel = CancellationToken::new();

    let reporter = {
        let client = Arc::clone(&client);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(REPORT_INTERVAL);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => report(&client),
                }
            }
        })
    };

    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, shutting down");
            }
            cancel.cancel();
        })
    };

    let result = client.subscribe(cancel.clone()).await;
    cancel.cancel();
    ctrl_c.abort();
    let _ = reporter.await;
    client.close().await?;

    result?;
    Ok(())
}

fn report(client: &RealtimeClient) {
    let board = client.board();
    let recent = client.executions(REPORT_INTERVAL);
    tracing::info!(
        mid_price = %board.mid_price,
        best_bid = ?board.best_bid().map(|l| l.price),
        best_ask = ?board.best_ask().map(|l| l.price),
        bid_levels = board.bids.len(),
        ask_levels = board.asks.len(),
        recent_executions = recent.len(),
        total_executions = client.execution_count(),
        "Top of book"
    );
}
