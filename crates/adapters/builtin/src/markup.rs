//! HTML fragments for configuration forms and descriptions.
//!
//! Rendered with askama so every user-supplied value is escaped.

use askama::Template;

use triggerhub_domain::error::HandlerError;
use triggerhub_domain::id::TriggerUid;
use triggerhub_domain::markup::Markup;

#[derive(Template)]
#[template(
    source = r#"<div class="trigger-config" id="{{ id }}">
{%- for field in fields %}
{{ field|safe }}
{%- endfor %}
</div>"#,
    ext = "html"
)]
struct FormTemplate<'a> {
    id: &'a str,
    fields: &'a [String],
}

#[derive(Template)]
#[template(
    source = r#"<label for="{{ form_id }}-{{ name }}">{{ label }}</label><input type="text" id="{{ form_id }}-{{ name }}" name="{{ name }}" value="{{ value }}" placeholder="{{ placeholder }}">"#,
    ext = "html"
)]
struct TextInputTemplate<'a> {
    form_id: &'a str,
    name: &'a str,
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"{% for part in parts %}{% if part.value %}<span class="trigger-value">{{ part.text }}</span>{% else %}{{ part.text }}{% endif %}{% endfor %}"#,
    ext = "html"
)]
struct SentenceTemplate<'a> {
    parts: &'a [Part],
}

struct Part {
    text: String,
    value: bool,
}

fn render_error(err: askama::Error) -> HandlerError {
    HandlerError::Other(anyhow::Error::new(err).context("failed to render trigger markup"))
}

/// A configuration form with text inputs.
pub(crate) struct Form {
    id: String,
    fields: Vec<String>,
    error: Option<askama::Error>,
}

impl Form {
    pub(crate) fn new(uid: TriggerUid) -> Self {
        Self {
            id: format!("trigger-{uid}"),
            fields: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn text(mut self, name: &str, label: &str, value: &str, placeholder: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let input = TextInputTemplate {
            form_id: &self.id,
            name,
            label,
            value,
            placeholder,
        };
        match input.render() {
            Ok(html) => self.fields.push(html),
            Err(err) => self.error = Some(err),
        }
        self
    }

    pub(crate) fn render(self) -> Result<Markup, HandlerError> {
        if let Some(err) = self.error {
            return Err(render_error(err));
        }
        FormTemplate {
            id: &self.id,
            fields: &self.fields,
        }
        .render()
        .map(Markup::from)
        .map_err(render_error)
    }
}

/// Prose with highlighted configuration values.
#[derive(Default)]
pub(crate) struct Sentence {
    parts: Vec<Part>,
}

impl Sentence {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part {
            text: text.into(),
            value: false,
        });
        self
    }

    pub(crate) fn value(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part {
            text: text.into(),
            value: true,
        });
        self
    }

    pub(crate) fn render(self) -> Result<Markup, HandlerError> {
        SentenceTemplate { parts: &self.parts }
            .render()
            .map(Markup::from)
            .map_err(render_error)
    }
}
