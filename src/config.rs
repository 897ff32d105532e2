//! Environment-driven configuration, mirroring the host page's settings.

use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Public URL the frame is served from; preview image and splash assets
    /// are resolved relative to this.
    pub app_url: String,
    pub frame_name: String,
    pub frame_button_text: String,
    pub frame_description: String,
    /// Wallet bridge endpoint supplied by the frame host.
    pub wallet_rpc_url: String,
    /// Frame host endpoint for context and actions.
    pub frame_host_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            app_url: var_or("FRAME_APP_URL", "http://localhost:3000"),
            frame_name: var_or("FRAME_NAME", "Myanmar Relief"),
            frame_button_text: var_or("FRAME_BUTTON_TEXT", "\u{1F680} Start"),
            frame_description: var_or(
                "FRAME_DESCRIPTION",
                "Support Myanmar with a USDC donation on Base",
            ),
            wallet_rpc_url: var_or("WALLET_RPC_URL", "http://127.0.0.1:9333/wallet"),
            frame_host_url: var_or("FRAME_HOST_URL", "http://127.0.0.1:9333/host"),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
