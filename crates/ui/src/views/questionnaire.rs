use std::sync::Arc;

use dioxus::prelude::*;
use futurepath_core::model::QuestionId;
use futurepath_core::{Advance, QuestionnaireSession, SubmissionPayload};
use services::QuestionnaireService;

use crate::context::AppContext;
use crate::views::ResultsView;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ChoiceVm, QuestionnaireIntent, QuestionnaireStage, QuestionnaireVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Owns one questionnaire session for as long as it is mounted.
#[component]
pub fn QuestionnaireView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.questionnaire();
    let session = use_signal(|| None::<QuestionnaireSession>);

    let service_for_resource = Arc::clone(&service);
    let resource = use_resource(move || {
        let service = Arc::clone(&service_for_resource);
        let mut session = session;
        async move {
            let started = service.start_session().await.map_err(|err| {
                tracing::error!(error = %err, "questionnaire could not start");
                ViewError::Unknown
            })?;
            session.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch = use_callback(move |intent: QuestionnaireIntent| {
        let mut session = session;
        let payload = {
            let mut guard = session.write();
            let Some(current) = guard.as_mut() else {
                return;
            };
            match intent {
                QuestionnaireIntent::Select(raw) => {
                    if let Err(err) = current.answer_current(&raw) {
                        tracing::warn!(error = %err, "ignoring invalid choice");
                    }
                    None
                }
                QuestionnaireIntent::Previous => {
                    current.retreat();
                    None
                }
                QuestionnaireIntent::Next => match current.advance() {
                    Advance::Submit(payload) => Some(payload),
                    Advance::Blocked | Advance::Moved { .. } => None,
                },
                QuestionnaireIntent::Retry => current.retry_submission(),
            }
        };
        // Component-scoped: the task is dropped with the view, along with its session.
        if let Some(payload) = payload {
            spawn(submit_answers(Arc::clone(&service), session, payload));
        }
    });

    let on_restart = {
        let mut resource = resource;
        let mut session = session;
        use_callback(move |()| {
            session.set(None);
            resource.restart();
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuestionnaireTestHandles>() {
                handles.register(dispatch, session);
            }
        }
    }

    let vm = session.read().as_ref().map(QuestionnaireVm::from_session);
    let body = match (state, vm) {
        (ViewState::Ready(()), Some(vm)) => rsx! {
            QuestionnaireBody { vm, dispatch, on_restart }
        },
        (ViewState::Error(err), _) => rsx! {
            div { class: "status error",
                p { "{err.message()}" }
                button { onclick: move |_| on_restart.call(()), "Retry" }
            }
        },
        (ViewState::Idle, _) => rsx! {
            p { "Idle" }
        },
        (ViewState::Loading | ViewState::Ready(()), _) => rsx! {
            p { "Loading questions..." }
        },
    };

    rsx! {
        div { class: "page questionnaire",
            h2 { "Career Questionnaire" }
            {body}
        }
    }
}

async fn submit_answers(
    service: Arc<QuestionnaireService>,
    mut session: Signal<Option<QuestionnaireSession>>,
    payload: SubmissionPayload,
) {
    let outcome = service.submit(&payload).await.map_err(|err| {
        tracing::warn!(error = %err, "questionnaire submission failed");
        err.user_message()
    });
    let mut guard = session.write();
    let Some(current) = guard.as_mut() else {
        return;
    };
    if let Err(err) = current.finish_submission(outcome) {
        tracing::warn!(error = %err, "discarding submission result");
    }
}

#[component]
fn QuestionnaireBody(
    vm: QuestionnaireVm,
    dispatch: Callback<QuestionnaireIntent>,
    on_restart: Callback<()>,
) -> Element {
    if let QuestionnaireStage::Completed(result) = vm.stage.clone() {
        return rsx! {
            ResultsView { result }
            button { class: "primary", onclick: move |_| on_restart.call(()),
                "Take the questionnaire again"
            }
        };
    }

    let percent = vm.progress_percent;
    let status = match vm.stage.clone() {
        QuestionnaireStage::Answering | QuestionnaireStage::Completed(_) => rsx! {},
        QuestionnaireStage::Submitting => rsx! {
            p { class: "status", "Submitting your answers..." }
        },
        QuestionnaireStage::Failed { message, can_retry } => rsx! {
            div { class: "status error",
                p { "{message}" }
                if can_retry {
                    button { onclick: move |_| dispatch.call(QuestionnaireIntent::Retry),
                        "Retry submission"
                    }
                } else {
                    button { onclick: move |_| on_restart.call(()), "Start over" }
                }
            }
        },
    };

    rsx! {
        if vm.using_fallback {
            p { class: "notice", "Showing the standard question set." }
        }
        div { class: "progress-header",
            span { "{vm.progress_label}" }
            span { class: "muted", "{vm.answered_label}" }
        }
        div { class: "progress",
            div { class: "progress-fill", style: "width: {percent}%" }
        }
        section { class: "question-card",
            h3 { "{vm.question_text}" }
            div { class: "choices",
                for choice in vm.choices.clone() {
                    ChoiceOption {
                        choice,
                        question_id: vm.question_id,
                        disabled: !vm.can_select,
                        dispatch,
                    }
                }
            }
        }
        div { class: "nav-buttons",
            button {
                disabled: !vm.can_go_back,
                onclick: move |_| dispatch.call(QuestionnaireIntent::Previous),
                "Previous"
            }
            button { class: "primary",
                disabled: !vm.can_go_next,
                onclick: move |_| dispatch.call(QuestionnaireIntent::Next),
                "{vm.next_label}"
            }
        }
        {status}
    }
}

#[component]
fn ChoiceOption(
    choice: ChoiceVm,
    question_id: QuestionId,
    disabled: bool,
    dispatch: Callback<QuestionnaireIntent>,
) -> Element {
    let raw = choice.index.value().to_string();
    let class = if choice.selected { "choice selected" } else { "choice" };
    let value = raw.clone();

    rsx! {
        label { class,
            input {
                r#type: "radio",
                name: "question-{question_id}",
                value,
                checked: choice.selected,
                disabled,
                onchange: move |_| dispatch.call(QuestionnaireIntent::Select(raw.clone())),
            }
            span { "{choice.text}" }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuestionnaireTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuestionnaireIntent>>>>,
    session: Rc<RefCell<Option<Signal<Option<QuestionnaireSession>>>>>,
}

#[cfg(test)]
impl QuestionnaireTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuestionnaireIntent>,
        session: Signal<Option<QuestionnaireSession>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuestionnaireIntent> {
        (*self.dispatch.borrow()).expect("questionnaire dispatch registered")
    }

    pub(crate) fn session(&self) -> Signal<Option<QuestionnaireSession>> {
        (*self.session.borrow()).expect("questionnaire session registered")
    }
}
