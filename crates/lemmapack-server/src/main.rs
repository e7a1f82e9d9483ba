use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lemmapack_db::Dictionary;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lemmapack_server::{AppState, ServerArgs, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = ServerArgs::parse();

    let dict = Dictionary::load_with_mode(&args.dict_dir, args.dict_mode.into())
        .with_context(|| format!("loading dictionary from {}", args.dict_dir.display()))?;
    let state = AppState {
        dict: Arc::new(dict),
        disable_cache: args.no_cache,
    };
    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("serving {} on {addr}", args.dict_dir.display());
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
