use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryEntryVm, map_history_entries};

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.questionnaire();

    let mut resource = use_resource(move || {
        let service = service.clone();
        async move {
            let records = service.list_results().await?;
            Ok::<_, ViewError>(map_history_entries(&records))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "My results" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(entries) => rsx! {
                    if entries.is_empty() {
                        p { "You have not completed the questionnaire yet." }
                    } else {
                        ul { class: "history",
                            for entry in entries {
                                HistoryCard { entry }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button { onclick: move |_| resource.restart(), "Retry" }
                },
            }
        }
    }
}

#[component]
fn HistoryCard(entry: HistoryEntryVm) -> Element {
    rsx! {
        li {
            Link { class: "history-link", to: Route::ResultDetail { result_id: entry.id },
                span { class: "history-date", "{entry.taken_on}" }
                span { class: "history-major", "{entry.major}" }
                span { class: "history-score", "{entry.score_label}" }
            }
        }
    }
}
