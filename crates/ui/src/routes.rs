use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{HistoryView, QuestionnaireView, ResultDetailView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuestionnaireView)] Questionnaire {},
        #[route("/history", HistoryView)] History {},
        #[route("/history/:result_id", ResultDetailView)] ResultDetail { result_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let greeting = ctx.student_name().map(|name| format!("Signed in as {name}"));

    rsx! {
        nav { class: "sidebar",
            h1 { "FuturePath" }
            if let Some(greeting) = greeting {
                p { class: "sidebar-user", "{greeting}" }
            }
            ul {
                li { Link { to: Route::Questionnaire {}, "Questionnaire" } }
                li { Link { to: Route::History {}, "My results" } }
            }
        }
    }
}
