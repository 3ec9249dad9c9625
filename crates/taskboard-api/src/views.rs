use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Tera};

use taskboard_types::models::User;

use crate::error::ApiError;

/// Templates compiled into the binary so rendering never depends on the working directory.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("add-task.html", include_str!("../templates/add-task.html")),
    ("login-form.html", include_str!("../templates/login-form.html")),
    ("signup-form.html", include_str!("../templates/signup-form.html")),
    ("completed_tasks.html", include_str!("../templates/completed_tasks.html")),
    ("about.html", include_str!("../templates/about.html")),
];

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<Html<String>, ApiError> {
        Ok(Html(self.tera.render(template, context)?))
    }

    /// Render a form page, optionally carrying a message for the user.
    pub fn form(
        &self,
        template: &str,
        user: Option<&User>,
        message: Option<&str>,
        status: StatusCode,
    ) -> Result<Response, ApiError> {
        let mut context = page_context(user);
        context.insert("message", &message);
        Ok((status, self.render(template, &context)?).into_response())
    }
}

/// Every page gets `user` for the navigation bar and a `message` slot, both `null` when unset.
pub fn page_context(user: Option<&User>) -> Context {
    let mut context = Context::new();
    context.insert("user", &user);
    context.insert("message", &None::<&str>);
    context
}
