// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root: loads configuration, wires the store and scheduler,
//! spawns the background sweep, and serves the HTTP boundary (§6, §9).

use qg_api::AppState;
use qg_core::{OrchestratorConfig, SystemClock};
use qg_scheduler::{Scheduler, SchedulerConfig};
use qg_store::local::LocalStore;
use qg_store::remote::RedisStore;
use qg_store::Store;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qg_api=debug,qg_scheduler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = OrchestratorConfig::from_env()?;
    tracing::info!(environment = %config.environment, use_redis = config.use_redis, "starting qgjobd");

    let (store, storage_label): (Arc<dyn Store>, &'static str) = if config.use_redis {
        match build_redis_store(&config.redis_url).await {
            Ok(store) => (store, "redis"),
            Err(error) => {
                tracing::warn!(%error, "redis unavailable at startup, falling back to local store");
                (Arc::new(LocalStore::new()), "local")
            }
        }
    } else {
        (Arc::new(LocalStore::new()), "local")
    };

    let clock = SystemClock;
    let scheduler_config = SchedulerConfig::from_orchestrator_config(&config);
    let scheduler = Scheduler::new(store.clone(), clock, scheduler_config);

    let shutdown = CancellationToken::new();
    let sweep_handle = {
        let store = store.clone();
        let scheduler_config = SchedulerConfig::from_orchestrator_config(&config);
        let token = shutdown.clone();
        tokio::spawn(async move {
            let sweep_scheduler = Scheduler::new(store, SystemClock, scheduler_config);
            sweep_scheduler.run(token).await;
        })
    };

    let state = Arc::new(AppState {
        store,
        scheduler,
        clock: SystemClock,
        storage_label,
    });

    let app = qg_api::router(state);
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    shutdown.cancel();
    let _ = sweep_handle.await;
    Ok(())
}

async fn build_redis_store(redis_url: &str) -> anyhow::Result<Arc<dyn Store>> {
    let cfg = deadpool_redis::Config::from_url(redis_url);
    let pool = cfg.create_pool(Some(deadpool_redis::Runtime::Tokio1))?;

    // `create_pool` only validates the URL; it never opens a connection, so
    // probe liveness here rather than discovering it on the first request.
    let mut conn = pool.get().await?;
    redis::cmd("PING").query_async::<_, String>(&mut *conn).await?;

    Ok(Arc::new(RedisStore::new(pool)))
}
