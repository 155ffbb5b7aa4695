//! Input resolution for address bar
//!
//! 1. `http://` / `https://` → navigate as typed
//! 2. `www.` or anything with a dot → navigate with `http://` prepended
//! 3. Everything else → search

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::error::NavigationError;
use crate::Result;

pub const DEFAULT_SEARCH_ENGINE: &str = "https://www.google.com/search?q=%s";

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationTarget {
    /// Navigate straight to this URL
    DirectUrl(String),
    /// Hand the text to the search engine
    SearchQuery(String),
}

impl NavigationTarget {
    pub fn is_search(&self) -> bool {
        matches!(self, NavigationTarget::SearchQuery(_))
    }

    /// Empty searches carry nothing to navigate to
    pub fn is_empty(&self) -> bool {
        match self {
            NavigationTarget::DirectUrl(url) => url.is_empty(),
            NavigationTarget::SearchQuery(query) => query.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Result<Self> {
        check_template(&template)?;
        Ok(Self {
            search_template: template,
        })
    }

    pub fn set_search_engine(&mut self, template: String) -> Result<()> {
        check_template(&template)?;
        self.search_template = template;
        Ok(())
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    /// Classify user input. Well-formedness is left to the engine.
    pub fn resolve(&self, input: &str) -> NavigationTarget {
        let input = input.trim();

        if input.starts_with("http://") || input.starts_with("https://") {
            return NavigationTarget::DirectUrl(input.to_string());
        }

        // `www.` gets a scheme too, so the engine never sees a scheme-less address
        if input.starts_with("www.") || input.contains('.') {
            return NavigationTarget::DirectUrl(format!("http://{}", input));
        }

        NavigationTarget::SearchQuery(input.to_string())
    }

    /// URL the engine should load for a resolved target
    pub fn destination(&self, target: &NavigationTarget) -> String {
        match target {
            NavigationTarget::DirectUrl(url) => url.clone(),
            NavigationTarget::SearchQuery(query) => fill_template(&self.search_template, query),
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Substitute the form-encoded query for `%s`
pub(crate) fn fill_template(template: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    template.replace("%s", &encoded)
}

pub(crate) fn check_template(template: &str) -> Result<()> {
    if !template.contains("%s") {
        return Err(NavigationError::InvalidTemplate(format!(
            "{} (missing %s placeholder)",
            template
        )));
    }

    Url::parse(&fill_template(template, "probe"))
        .map_err(|e| NavigationError::InvalidTemplate(format!("{}: {}", template, e)))?;

    Ok(())
}
