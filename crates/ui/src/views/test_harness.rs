use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use futurepath_core::{CompletionPolicy, QuestionnaireSession};
use services::{QuestionnaireApi, QuestionnaireService};

use crate::context::{UiApp, build_app_context};
use crate::views::questionnaire::QuestionnaireTestHandles;
use crate::views::{HistoryView, QuestionnaireView, ResultDetailView};
use crate::vm::QuestionnaireIntent;

struct TestApp {
    questionnaire: Arc<QuestionnaireService>,
}

impl UiApp for TestApp {
    fn questionnaire(&self) -> Arc<QuestionnaireService> {
        Arc::clone(&self.questionnaire)
    }

    fn student_name(&self) -> Option<String> {
        Some("Test Student".to_string())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Questionnaire,
    History,
    ResultDetail(u64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: QuestionnaireTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Questionnaire => rsx! { QuestionnaireView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::ResultDetail(result_id) => rsx! { ResultDetailView { result_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    handles: QuestionnaireTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let pending fetches and submissions resolve.
    pub async fn settle(&mut self) {
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    /// Runs the intent synchronously; spawned work waits for the next drive.
    pub fn dispatch(&mut self, intent: QuestionnaireIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }

    pub fn inspect_session<T>(&self, read: impl FnOnce(&QuestionnaireSession) -> T) -> T {
        let session = self.handles.session();
        self.dom.in_runtime(|| {
            let guard = session.read();
            read(guard.as_ref().expect("session started"))
        })
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(
    view: ViewKind,
    api: Arc<dyn QuestionnaireApi>,
    policy: CompletionPolicy,
) -> ViewHarness {
    let questionnaire = Arc::new(QuestionnaireService::new(api).with_policy(policy));
    let handles = QuestionnaireTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { questionnaire }),
            view,
            handles: handles.clone(),
        },
    );

    ViewHarness { dom, handles }
}
