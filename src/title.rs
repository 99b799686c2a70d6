use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::errors::WikiError;
use crate::types::Title;

// Titles become file names, so this pattern is the only guard against path traversal.
static VALID_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(save|edit|view)/([a-zA-Z0-9]+)$").unwrap());

/// Extract the page title from a `/<verb>/<title>` request path
pub fn extract_title(req_path: &str) -> Result<Title, WikiError> {
    let Some(caps) = VALID_PATH.captures(req_path) else {
        warn!("Rejected page path: '{}'", req_path);
        return Err(WikiError::InvalidPath(req_path.to_string()));
    };
    debug!("Matched page path: verb '{}', title '{}'", &caps[1], &caps[2]);
    Title::parse(&caps[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_for_each_verb() {
        for verb in ["view", "edit", "save"] {
            for title in ["a", "Foo", "FrontPage", "Page2", "123"] {
                let path = format!("/{verb}/{title}");
                assert_eq!(extract_title(&path).unwrap().as_str(), title);
            }
        }
    }

    #[test]
    fn test_rejects_paths_outside_grammar() {
        let rejected = [
            "/view/../etc",
            "/view/",
            "/view",
            "/delete/abc",
            "/view/ab c",
            "/view/bad.title",
            "/view/a/b",
            "/view/a-b",
            "/View/Foo",
            "view/Foo",
            "/view/Foo/",
            "//view/Foo",
            "/view/%2e%2e",
            "",
        ];
        for path in rejected {
            assert!(
                matches!(extract_title(path), Err(WikiError::InvalidPath(_))),
                "accepted {path:?}"
            );
        }
    }

    #[test]
    fn test_rejects_trailing_newline() {
        assert!(extract_title("/view/Foo\n").is_err());
    }
}
