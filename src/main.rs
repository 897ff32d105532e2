#![allow(non_snake_case)]

mod components;
mod config;
mod donation;
mod erc20;
mod frame;
mod provider;
mod state;

use std::sync::{Arc, Mutex};

use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use frame::{FrameContext, FramePreview, HostBridge};
use provider::ChainSession;
use state::{AppState, SharedHost};

const STYLE: &str = include_str!("../assets/style.css");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // `--frame-meta` prints the preview embed for the hosting page and exits.
    if std::env::args().any(|a| a == "--frame-meta") {
        let preview = FramePreview::from_config(&AppConfig::from_env());
        let embed = preview
            .embed_json()
            .and_then(|v| serde_json::to_string_pretty(&v));
        match embed {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize frame metadata"),
        }
        return;
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Provide shared state to all components
    let config = use_context_provider(AppConfig::from_env);
    use_context_provider(|| Signal::new(AppState::default()));
    use_context_provider(|| ChainSession::new(config.wallet_rpc_url.clone()));
    use_context_provider::<SharedHost>(|| Arc::new(Mutex::new(None)));
    let mut frame_ctx = use_context_provider(|| Signal::new(FrameContext::default()));

    // Fetch the host launch context once, for safe-area padding.
    let host = use_context::<SharedHost>();
    let host_url = config.frame_host_url.clone();
    use_future(move || {
        let host = host.clone();
        let host_url = host_url.clone();
        async move {
            let fetched = tokio::task::spawn_blocking(move || {
                let mut guard = host.lock().unwrap();
                if guard.is_none() {
                    *guard = Some(HostBridge::new(&host_url)?);
                }
                guard.as_ref().unwrap().context()
            })
            .await
            .unwrap();

            match fetched {
                Ok(ctx) => frame_ctx.set(ctx),
                Err(e) => tracing::warn!(error = %e, "frame host context unavailable"),
            }
        }
    });

    rsx! {
        document::Style { {STYLE} }
        components::layout::AppShell {}
    }
}
