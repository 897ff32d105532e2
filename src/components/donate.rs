use std::time::Duration;

use dioxus::prelude::*;

use super::connection::truncate_address;
use crate::config::AppConfig;
use crate::donation::{DonationController, ReceiptStatus, SubmitOutcome};
use crate::erc20::{BASE_CHAIN_ID, DONATION_AMOUNTS, LEARN_MORE_URL};
use crate::frame::HostBridge;
use crate::provider::{ChainError, ChainSession};
use crate::state::{AppState, ConnectionStatus, SharedHost};

#[component]
pub fn DonatePage() -> Element {
    let mut app = use_context::<Signal<AppState>>();
    let session = use_context::<ChainSession>();
    let config = use_context::<AppConfig>();
    let host = use_context::<SharedHost>();

    let mut controller = use_signal({
        let session = session.clone();
        move || DonationController::new(session)
    });
    let mut submitting = use_signal(|| false);
    let mut confirming = use_signal(|| false);
    let mut receipt = use_signal(|| None::<ReceiptStatus>);

    let connected = matches!(app.read().connection_status, ConnectionStatus::Connected);
    let wrong_network = connected && app.read().chain_id != Some(BASE_CHAIN_ID);
    let in_flight = *submitting.read() || *confirming.read();

    let ctl_now = (*controller.read()).clone();
    let error_text = ctl_now.last_error.as_ref().map(error_line);
    let receipt_now = *receipt.read();
    let heading_class = match receipt_now {
        Some(ReceiptStatus::Confirmed) => "success-text",
        Some(ReceiptStatus::Reverted) => "error-text",
        _ => "",
    };
    let hash_label = if receipt_now == Some(ReceiptStatus::Confirmed) {
        "Transaction"
    } else {
        "Hash"
    };
    let donate_label = if wrong_network {
        "Switch to Base".to_string()
    } else {
        format!("Donate ${} USDC", ctl_now.display_amount())
    };

    let on_donate = {
        let session = session.clone();
        move |_| {
            if *submitting.read() || *confirming.read() {
                return;
            }
            submitting.set(true);
            let session = session.clone();
            let ctl = (*controller.read()).clone();

            spawn(async move {
                let (ctl, outcome) = tokio::task::spawn_blocking(move || {
                    let mut ctl = ctl;
                    let outcome = ctl.submit();
                    (ctl, outcome)
                })
                .await
                .unwrap();
                controller.set(ctl);
                submitting.set(false);

                match outcome {
                    SubmitOutcome::ConnectRequested => {
                        // The wallet approved the connection inside submit;
                        // reflect it so the next click reaches the transfer.
                        app.write().connection_status = ConnectionStatus::Connected;
                        app.write().address = session.account();
                        app.write().chain_id = session.active_chain_id();
                    }
                    SubmitOutcome::SwitchRequested => {
                        app.write().chain_id = Some(BASE_CHAIN_ID);
                    }
                    SubmitOutcome::Submitted(hash) => {
                        receipt.set(None);
                        confirming.set(true);
                        let receipts = controller.read().receipts();

                        // The chain never guarantees finality within any
                        // window, so the poll has no deadline; the panel stays
                        // on "in progress" until a receipt shows up.
                        loop {
                            tokio::time::sleep(Duration::from_secs(2)).await;

                            let status = tokio::task::spawn_blocking({
                                let receipts = receipts.clone();
                                let hash = hash.clone();
                                move || receipts.receipt_status(&hash)
                            })
                            .await
                            .unwrap();

                            match status {
                                Ok(ReceiptStatus::Pending) => {}
                                Ok(ReceiptStatus::Confirmed) => {
                                    receipt.set(Some(ReceiptStatus::Confirmed));
                                    break;
                                }
                                Ok(ReceiptStatus::Reverted) => {
                                    receipt.set(Some(ReceiptStatus::Reverted));
                                    controller.write().last_error =
                                        Some(ChainError::Rpc("transaction reverted".into()));
                                    break;
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "receipt poll failed");
                                }
                            }
                        }
                        confirming.set(false);
                    }
                    SubmitOutcome::Ignored | SubmitOutcome::Failed => {}
                }
            });
        }
    };

    let on_learn_more = {
        let host_url = config.frame_host_url.clone();
        move |_| {
            let host = host.clone();
            let host_url = host_url.clone();
            spawn(async move {
                let result = tokio::task::spawn_blocking(move || {
                    let mut guard = host.lock().unwrap();
                    if guard.is_none() {
                        *guard = Some(HostBridge::new(&host_url)?);
                    }
                    guard.as_ref().unwrap().open_url(LEARN_MORE_URL)
                })
                .await
                .unwrap();

                if let Err(e) = result {
                    tracing::warn!(error = %e, "open url failed");
                }
            });
        }
    };

    rsx! {
        div { class: "page",
            h1 { "{config.frame_name}" }
            p { class: "subtitle", "{config.frame_description}" }

            div { class: "amount-grid",
                for amount in DONATION_AMOUNTS {
                    button {
                        key: "{amount}",
                        class: if !ctl_now.is_custom && ctl_now.selected_amount == amount {
                            "amount-btn amount-btn-active"
                        } else {
                            "amount-btn"
                        },
                        onclick: move |_| controller.write().select_preset(amount),
                        "${amount}"
                    }
                }
            }

            div { class: "form-group",
                label { "Custom Amount (USDC)" }
                input {
                    class: "input",
                    r#type: "number",
                    min: "0.01",
                    step: "0.01",
                    placeholder: "Enter amount",
                    value: "{ctl_now.custom_amount}",
                    oninput: move |e| controller.write().set_custom(e.value()),
                }
            }

            if wrong_network {
                p { class: "warning-text", "Please switch to Base network" }
            }

            button {
                class: "btn btn-primary",
                disabled: in_flight,
                onclick: on_donate,
                if in_flight { "Processing..." } else { "{donate_label}" }
            }

            div { class: "learn-more",
                button { class: "link-btn", onclick: on_learn_more,
                    "Learn more about this relief effort"
                }
            }

            if let Some(msg) = error_text {
                p { class: "error-text", "{msg}" }
            }

            if let Some(hash) = ctl_now.tx_hash.as_ref() {
                div { class: "tx-panel",
                    p { class: heading_class, "{tx_panel_heading(receipt_now)}" }
                    p { class: "hint mono", "{hash_label}: {truncate_address(hash)}" }
                }
            }
        }
    }
}

/// Error line under the donate button. A user rejection gets the fixed short
/// message; anything else shows the underlying error text as-is.
fn error_line(err: &ChainError) -> String {
    match err {
        ChainError::UserRejected => "Rejected by user.".to_string(),
        other => other.to_string(),
    }
}

fn tx_panel_heading(receipt: Option<ReceiptStatus>) -> &'static str {
    match receipt {
        Some(ReceiptStatus::Confirmed) => "Thank you for your donation!",
        Some(ReceiptStatus::Reverted) => "Transaction failed.",
        _ => "Transaction in progress...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_rejection_renders_fixed_message() {
        assert_eq!(error_line(&ChainError::UserRejected), "Rejected by user.");
    }

    #[test]
    fn other_errors_render_their_message_unfiltered() {
        let err = ChainError::Rpc("insufficient funds for gas".into());
        assert_eq!(error_line(&err), "insufficient funds for gas");
    }

    #[test]
    fn reverted_receipt_is_not_shown_as_in_progress() {
        assert_eq!(
            tx_panel_heading(Some(ReceiptStatus::Reverted)),
            "Transaction failed."
        );
        assert_eq!(
            tx_panel_heading(Some(ReceiptStatus::Confirmed)),
            "Thank you for your donation!"
        );
        assert_eq!(tx_panel_heading(None), "Transaction in progress...");
    }
}
