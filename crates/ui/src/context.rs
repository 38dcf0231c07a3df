use std::sync::Arc;

use services::QuestionnaireService;

pub trait UiApp: Send + Sync {
    fn questionnaire(&self) -> Arc<QuestionnaireService>;

    /// Display name of the signed-in student, when known.
    fn student_name(&self) -> Option<String>;
}

#[derive(Clone)]
pub struct AppContext {
    questionnaire: Arc<QuestionnaireService>,
    student_name: Option<String>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            questionnaire: app.questionnaire(),
            student_name: app.student_name(),
        }
    }

    #[must_use]
    pub fn questionnaire(&self) -> Arc<QuestionnaireService> {
        Arc::clone(&self.questionnaire)
    }

    #[must_use]
    pub fn student_name(&self) -> Option<&str> {
        self.student_name.as_deref()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
