use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::components::TemplateSet;
use crate::errors::WikiError;
use crate::services::PageStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PageStore>,
    pub templates: Arc<TemplateSet>,
    pub front_page: Option<Title>,
}

/// Page identifier, restricted to ASCII letters and digits.
///
/// The title doubles as the stem of the page's file name, so a `Title` can
/// never contain `.`, `/` or anything else that would escape the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Validate a bare title
    pub fn parse(raw: &str) -> Result<Self, WikiError> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(WikiError::InvalidPath(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the file backing this page
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A titled unit of content stored as one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self { title, body: body.into() }
    }

    /// Stub for a page that has not been written yet
    pub fn empty(title: Title) -> Self {
        Self { title, body: Vec::new() }
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accepts_letters_and_digits() {
        for raw in ["a", "FrontPage", "Page42", "0"] {
            assert_eq!(Title::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_title_rejects_everything_else() {
        for raw in ["", "bad.title", "../etc", "a/b", "ab c", "dash-ed", "ünï"] {
            assert!(Title::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_file_name_appends_txt() {
        assert_eq!(Title::parse("Foo").unwrap().file_name(), "Foo.txt");
    }

    #[test]
    fn test_empty_page_has_no_body() {
        let page = Page::empty(Title::parse("NewPage").unwrap());
        assert!(page.body.is_empty());
        assert_eq!(page.body_text(), "");
    }
}
