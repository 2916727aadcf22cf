use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::external::DEFAULT_TARGET;

/// Default prefix of collapsible section class names (`class-<anchor>`).
pub const DEFAULT_DETAILS_TAG: &str = "class";

/// Per-page settings, deserialized from the page's JS config object or JSON.
///
/// Every field is optional; accessors supply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Prefix of `<details>` class names the anchor and `1` key act on.
    #[serde(default, alias = "detailsTag")]
    pub details_tag: Option<String>,
    /// Browsing context name for external links.
    #[serde(default, alias = "externalTarget")]
    pub external_target: Option<String>,
    /// Session storage key of the open list; anchors reveal directly when unset.
    #[serde(default, alias = "openList")]
    pub open_list: Option<String>,
    /// Lower-case the captured fragment before storing it.
    #[serde(default, alias = "lowercaseAnchor")]
    pub lowercase_anchor: Option<bool>,
    /// Set `target` on external links once the page has loaded.
    #[serde(default, alias = "rewriteExternalLinks")]
    pub rewrite_external_links: Option<bool>,
}

impl PageConfig {
    /// Parses a JSON config object; `null` and empty input yield the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<PageConfig> =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that could never match anything on a page.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tag) = &self.details_tag
            && (tag.is_empty() || tag.contains(char::is_whitespace))
        {
            return Err(ConfigError::invalid(
                "detailsTag",
                "must be a single non-empty class prefix",
            ));
        }
        if let Some(list) = &self.open_list
            && list.is_empty()
        {
            return Err(ConfigError::invalid("openList", "must not be empty"));
        }
        Ok(())
    }

    /// Section class prefix, `class` by default.
    pub fn details_tag(&self) -> &str {
        self.details_tag.as_deref().unwrap_or(DEFAULT_DETAILS_TAG)
    }

    /// External link context, `new` by default.
    pub fn external_target(&self) -> &str {
        match self.external_target.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_TARGET,
        }
    }

    /// Open list key, if any.
    pub fn open_list(&self) -> Option<&str> {
        self.open_list.as_deref()
    }

    /// Whether the captured fragment is lower-cased (default true).
    pub fn lowercase_anchor(&self) -> bool {
        self.lowercase_anchor.unwrap_or(true)
    }

    /// Whether external links get a target (default true).
    pub fn rewrite_external_links(&self) -> bool {
        self.rewrite_external_links.unwrap_or(true)
    }
}
