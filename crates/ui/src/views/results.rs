use dioxus::prelude::*;
use dioxus_router::Link;
use futurepath_core::model::ResultId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::ResultVm;

/// Recommended majors for one finished questionnaire.
#[component]
pub fn ResultsView(result: ResultVm) -> Element {
    rsx! {
        section { class: "results",
            h3 { "Your recommended majors" }
            if result.is_empty() {
                p {
                    {result.detail.clone().unwrap_or_else(|| "No recommendation is available yet.".to_string())}
                }
            } else {
                ol { class: "majors",
                    for major in result.majors.clone() {
                        li {
                            span { class: "major-name", "{major.name}" }
                            span { class: "major-confidence", "{major.confidence_label}" }
                        }
                    }
                }
            }
            if !result.answers.is_empty() {
                h4 { "Your answers" }
                ul { class: "answers",
                    for answer in result.answers.clone() {
                        li {
                            p { class: "muted", "{answer.question}" }
                            p { "{answer.choice}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ResultDetailView(result_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.questionnaire();

    let resource = use_resource(move || {
        let service = service.clone();
        async move {
            let details = service.result_details(ResultId::new(result_id)).await?;
            Ok::<_, ViewError>(ResultVm::from(&details))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            Link { to: Route::History {}, "Back to my results" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(result) => rsx! {
                    ResultsView { result }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}
