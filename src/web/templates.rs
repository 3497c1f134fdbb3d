//! Page templates compiled into the binary.

use minijinja::Environment;
use serde::Serialize;

use super::WebError;

/// Template rendering a status partition list.
pub const TASK_LIST: &str = "task_list.html";
/// Template rendering the task create and edit form.
pub const TASK_FORM: &str = "task_form.html";
/// Template rendering the category form.
pub const CATEGORY_FORM: &str = "category_form.html";
/// Template rendering the monthly calendar.
pub const CALENDAR: &str = "calendar.html";

const SOURCES: [(&str, &str); 5] = [
    ("base.html", include_str!("../../templates/base.html")),
    (TASK_LIST, include_str!("../../templates/task_list.html")),
    (TASK_FORM, include_str!("../../templates/task_form.html")),
    (
        CATEGORY_FORM,
        include_str!("../../templates/category_form.html"),
    ),
    (CALENDAR, include_str!("../../templates/calendar.html")),
];

/// Loaded template environment.
#[derive(Debug)]
pub struct Templates {
    environment: Environment<'static>,
}

impl Templates {
    /// Parses every page template.
    ///
    /// # Errors
    ///
    /// Returns [`minijinja::Error`] when a template has a syntax error.
    pub fn load() -> Result<Self, minijinja::Error> {
        let mut environment = Environment::new();
        for (name, source) in SOURCES {
            environment.add_template(name, source)?;
        }
        Ok(Self { environment })
    }

    /// Renders the named template with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::Render`] when the template is unknown or fails.
    pub fn render(&self, name: &str, context: impl Serialize) -> Result<String, WebError> {
        Ok(self.environment.get_template(name)?.render(context)?)
    }
}
