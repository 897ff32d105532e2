//! Frame host environment: preview card metadata, safe-area layout context,
//! and the host action bridge.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AppConfig;
use crate::provider::ChainError;

// ---------------------------------------------------------------------------
// Preview card metadata
// ---------------------------------------------------------------------------

/// The `fc:frame` embed a hosting page inlines so the widget gets a preview
/// card when shared.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePreview {
    pub version: String,
    pub image_url: String,
    pub button: FrameButton,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameButton {
    pub title: String,
    pub action: FrameAction,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    pub splash_image_url: String,
    pub icon_url: String,
    pub splash_background_color: String,
}

impl FramePreview {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            version: "next".to_string(),
            image_url: format!("{}/images/frame-preview.png", cfg.app_url),
            button: FrameButton {
                title: cfg.frame_button_text.clone(),
                action: FrameAction {
                    kind: "launch_frame".to_string(),
                    name: cfg.frame_name.clone(),
                    url: cfg.app_url.clone(),
                    splash_image_url: format!("{}/splash.png", cfg.app_url),
                    icon_url: format!("{}/icon.png", cfg.app_url),
                    splash_background_color: "#f7f7f7".to_string(),
                },
            },
        }
    }

    /// The meta tag payload, keyed the way the host page embeds it.
    pub fn embed_json(&self) -> serde_json::Result<serde_json::Value> {
        Ok(json!({ "fc:frame": serde_json::to_string(self)? }))
    }
}

// ---------------------------------------------------------------------------
// Layout context
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct SafeAreaInsets {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

/// Host-supplied launch context. Defaults to zero insets when the host
/// supplies none.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameContext {
    #[serde(default)]
    pub safe_area_insets: SafeAreaInsets,
}

// ---------------------------------------------------------------------------
// Host bridge
// ---------------------------------------------------------------------------

/// JSON-RPC client for the frame host: launch context plus the one
/// side-effecting action the widget uses (open an external URL).
pub struct HostBridge {
    http: reqwest::blocking::Client,
    url: String,
}

impl HostBridge {
    pub fn new(url: &str) -> Result<Self, ChainError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::Http(e.to_string()))?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| ChainError::Http(e.to_string()))?;
        let v: serde_json::Value = resp.json().map_err(|e| ChainError::Json(e.to_string()))?;
        v.get("result")
            .cloned()
            .ok_or_else(|| ChainError::InvalidResponse("missing result".into()))
    }

    pub fn context(&self) -> Result<FrameContext, ChainError> {
        let result = self.call("frame_context", json!([]))?;
        serde_json::from_value(result).map_err(|e| ChainError::Json(e.to_string()))
    }

    pub fn open_url(&self, url: &str) -> Result<(), ChainError> {
        self.call("frame_openUrl", json!([url])).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_serializes_with_camel_case_keys() {
        let cfg = AppConfig {
            app_url: "https://relief.example".into(),
            frame_name: "Myanmar Relief".into(),
            frame_button_text: "Donate".into(),
            frame_description: "desc".into(),
            wallet_rpc_url: String::new(),
            frame_host_url: String::new(),
        };
        let preview = FramePreview::from_config(&cfg);
        let v = serde_json::to_value(&preview).unwrap();

        assert_eq!(v["version"], "next");
        assert_eq!(v["imageUrl"], "https://relief.example/images/frame-preview.png");
        assert_eq!(v["button"]["title"], "Donate");
        assert_eq!(v["button"]["action"]["type"], "launch_frame");
        assert_eq!(
            v["button"]["action"]["splashImageUrl"],
            "https://relief.example/splash.png"
        );
        assert_eq!(v["button"]["action"]["splashBackgroundColor"], "#f7f7f7");
    }

    #[test]
    fn embed_is_keyed_for_the_host_page() {
        let cfg = AppConfig::from_env();
        let embed = FramePreview::from_config(&cfg).embed_json().unwrap();
        assert!(embed.get("fc:frame").is_some_and(|v| v.is_string()));
    }

    #[test]
    fn context_defaults_to_zero_insets() {
        let ctx: FrameContext = serde_json::from_value(json!({})).unwrap();
        assert_eq!(ctx.safe_area_insets, SafeAreaInsets::default());

        let ctx: FrameContext = serde_json::from_value(json!({
            "safeAreaInsets": { "top": 24.0, "bottom": 12.0 }
        }))
        .unwrap();
        assert_eq!(ctx.safe_area_insets.top, 24.0);
        assert_eq!(ctx.safe_area_insets.left, 0.0);
    }
}
