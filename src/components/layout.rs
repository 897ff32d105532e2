use dioxus::prelude::*;

use super::connection::ConnectionIndicator;
use super::donate::DonatePage;
use crate::config::AppConfig;
use crate::frame::FrameContext;

// ---------------------------------------------------------------------------
// App shell — host safe-area padding + top bar + widget
// ---------------------------------------------------------------------------

#[component]
pub fn AppShell() -> Element {
    let frame_ctx = use_context::<Signal<FrameContext>>();
    let insets = frame_ctx.read().safe_area_insets;
    let padding = format!(
        "padding: {}px {}px {}px {}px;",
        insets.top, insets.right, insets.bottom, insets.left
    );

    rsx! {
        div { class: "app-container", style: "{padding}",
            TopBar {}
            div { class: "main-content",
                DonatePage {}
            }
        }
    }
}

#[component]
pub fn TopBar() -> Element {
    let config = use_context::<AppConfig>();

    rsx! {
        header { class: "topbar",
            div { class: "topbar-left",
                span { class: "brand-icon", "\u{25C8}" }
                span { class: "brand-text", "{config.frame_name}" }
            }
            div { class: "topbar-right",
                ConnectionIndicator {}
            }
        }
    }
}
