use dioxus::prelude::*;

use crate::provider::ChainSession;
use crate::state::{AppState, ConnectionStatus};

#[component]
pub fn ConnectionIndicator() -> Element {
    let mut app = use_context::<Signal<AppState>>();
    let session = use_context::<ChainSession>();

    let status = app.read().connection_status.clone();
    let address = app.read().address;

    let (dot_class, label) = match &status {
        ConnectionStatus::Disconnected => ("dot disconnected", "Disconnected".to_string()),
        ConnectionStatus::Connecting => ("dot connecting", "Connecting".to_string()),
        ConnectionStatus::Connected => (
            "dot connected",
            address.map_or_else(|| "Connected".to_string(), |a| truncate_address(&a.to_string())),
        ),
        ConnectionStatus::Error(_) => ("dot error", "Error".to_string()),
    };

    let is_connected = matches!(status, ConnectionStatus::Connected);

    let connect = move |_| {
        let session = session.clone();
        spawn(async move {
            app.write().connection_status = ConnectionStatus::Connecting;

            let result = tokio::task::spawn_blocking({
                let session = session.clone();
                move || session.connect()
            })
            .await
            .unwrap();

            match result {
                Ok(addr) => {
                    app.write().connection_status = ConnectionStatus::Connected;
                    app.write().address = Some(addr);
                    app.write().chain_id = session.active_chain_id();
                }
                Err(e) => {
                    app.write().connection_status = ConnectionStatus::Error(e.to_string());
                }
            }
        });
    };

    rsx! {
        div { class: "conn-indicator",
            span { class: dot_class }
            span { class: if is_connected { "conn-label mono" } else { "conn-label" }, "{label}" }
            if !is_connected {
                button {
                    class: "conn-btn conn-btn-connect",
                    disabled: matches!(status, ConnectionStatus::Connecting),
                    onclick: connect,
                    "Connect"
                }
            }
        }
    }
}

pub fn truncate_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_prefix_and_suffix() {
        assert_eq!(
            truncate_address("0xa52820d251b38d6e3bd5739f4fd6fa32e7d125f3"),
            "0xa528...25f3"
        );
        assert_eq!(truncate_address("0xabc"), "0xabc");
    }
}
