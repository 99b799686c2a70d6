use std::fmt::Write;
use std::fs;
use std::path::Path;

use axum::response::{Html, IntoResponse, Response};
use log::{debug, error};

use crate::errors::{StartupError, WikiError};
use crate::types::Page;
use crate::utils::escape_html;

const BUILTIN_VIEW: &str = include_str!("../../templates/view.html");
const BUILTIN_EDIT: &str = include_str!("../../templates/edit.html");

/// The views a handler can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    View,
    Edit,
}

impl TemplateName {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateName::View => "view",
            TemplateName::Edit => "edit",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            TemplateName::View => "view.html",
            TemplateName::Edit => "edit.html",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Title,
    Body,
}

/// A parsed template: literal HTML interleaved with `{{TITLE}}` and `{{BODY}}`
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source, rejecting unknown or unterminated placeholders
    pub fn parse(name: &str, source: &str) -> Result<Self, StartupError> {
        let syntax_error = |reason: String| StartupError::TemplateSyntax {
            name: name.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let end = after_open
                .find("}}")
                .ok_or_else(|| syntax_error("unterminated placeholder".to_string()))?;
            let segment = match after_open[..end].trim() {
                "TITLE" => Segment::Title,
                "BODY" => Segment::Body,
                other => return Err(syntax_error(format!("unknown placeholder {{{{{other}}}}}"))),
            };
            segments.push(segment);
            rest = &after_open[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        debug!("Parsed template '{}' into {} segments", name, segments.len());
        Ok(Self { name: name.to_string(), segments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute against a page, writing into `out`. Title and body are HTML-escaped.
    pub fn render<W: Write>(&self, out: &mut W, page: &Page) -> Result<(), WikiError> {
        for segment in &self.segments {
            let written = match segment {
                Segment::Literal(text) => out.write_str(text),
                Segment::Title => out.write_str(&escape_html(page.title.as_str())),
                Segment::Body => out.write_str(&escape_html(&page.body_text())),
            };
            written.map_err(|_| {
                WikiError::TemplateError(format!("failed writing output of template {}", self.name))
            })?;
        }
        Ok(())
    }
}

/// The `view` and `edit` templates, parsed once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct TemplateSet {
    view: Template,
    edit: Template,
}

impl TemplateSet {
    pub fn parse(view_source: &str, edit_source: &str) -> Result<Self, StartupError> {
        Ok(Self {
            view: Template::parse(TemplateName::View.as_str(), view_source)?,
            edit: Template::parse(TemplateName::Edit.as_str(), edit_source)?,
        })
    }

    /// Templates compiled into the binary
    pub fn builtin() -> Result<Self, StartupError> {
        Self::parse(BUILTIN_VIEW, BUILTIN_EDIT)
    }

    /// Read `view.html` and `edit.html` from a directory
    pub fn load(dir: &Path) -> Result<Self, StartupError> {
        let read = |name: TemplateName| {
            let path = dir.join(name.file_name());
            debug!("Reading template '{}' from {:?}", name.as_str(), path);
            fs::read_to_string(&path).map_err(|source| StartupError::TemplateSource {
                name: name.as_str(),
                path,
                source,
            })
        };
        Self::parse(&read(TemplateName::View)?, &read(TemplateName::Edit)?)
    }

    pub fn get(&self, name: TemplateName) -> &Template {
        match name {
            TemplateName::View => &self.view,
            TemplateName::Edit => &self.edit,
        }
    }

    /// Render a template into an HTML response, or a 500 if execution fails
    pub fn render(&self, name: TemplateName, page: &Page) -> Response {
        let mut html = String::new();
        let rendered = self.get(name).render(&mut html, page).map(|()| html);
        html_or_error(name, page, rendered)
    }
}

fn html_or_error(name: TemplateName, page: &Page, rendered: Result<String, WikiError>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Rendering template '{}' for '{}' failed: {}", name.as_str(), page.title, e);
            e.into_response()
        }
    }
}
