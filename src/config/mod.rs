use std::path::PathBuf;

use crate::errors::StartupError;
use crate::types::Title;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the `<title>.txt` page files
    pub data_dir: PathBuf,
    /// Directory with `view.html` and `edit.html`; built-in templates when unset
    pub template_dir: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Page that `/` redirects to; `/` is a 404 when unset
    pub front_page: Option<Title>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            template_dir: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            front_page: None,
        }
    }

    /// Defaults overridden by `WIKI_*` environment variables
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `WIKI_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(dir) = lookup("WIKI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("WIKI_TEMPLATE_DIR") {
            config.template_dir = Some(PathBuf::from(dir));
        }
        if let Some(host) = lookup("WIKI_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("WIKI_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| StartupError::Config(format!("WIKI_PORT is not a port number: {port:?}")))?;
        }
        if let Some(page) = lookup("WIKI_FRONT_PAGE") {
            let title = Title::parse(&page)
                .map_err(|_| StartupError::Config(format!("WIKI_FRONT_PAGE is not a valid title: {page:?}")))?;
            config.front_page = Some(title);
        }
        Ok(config)
    }

    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "localhost:8080");
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("WIKI_DATA_DIR", "/srv/wiki"),
            ("WIKI_TEMPLATE_DIR", "/srv/templates"),
            ("WIKI_HOST", "0.0.0.0"),
            ("WIKI_PORT", "9000"),
            ("WIKI_FRONT_PAGE", "FrontPage"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/wiki"));
        assert_eq!(config.template_dir, Some(PathBuf::from("/srv/templates")));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.front_page.unwrap().as_str(), "FrontPage");
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("WIKI_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[test]
    fn test_bad_front_page_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("WIKI_FRONT_PAGE", "../etc")])).unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }
}
