use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

use crate::error::SettingsError;
use crate::modules::match_pattern::MatchPattern;
use crate::modules::selector::ClassSelector;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Element whose text becomes the tab title.
    pub title_selector: String,
    /// Which tabs the popup lists.
    pub tab_url_pattern: String,
    /// Where the "new chat" row opens a tab.
    pub new_tab_url: String,
    pub new_tab_label: String,
    pub empty_label: String,
    /// Row label for a tab that has no title yet.
    pub fallback_title: String,
    pub list_container_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title_selector: ".conversation-title.gds-title-m".to_string(),
            tab_url_pattern: "https://gemini.google.com/*".to_string(),
            new_tab_url: "https://gemini.google.com/".to_string(),
            new_tab_label: "+ New Chat".to_string(),
            empty_label: "No matching tabs open".to_string(),
            fallback_title: "Gemini".to_string(),
            list_container_id: "tabList".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from disk. A missing file means defaults; a file that
    /// cannot be read or parsed is logged and also falls back to defaults.
    /// Individual invalid fields revert to their default, the rest is kept.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(settings) => settings.repaired(),
                Err(e) => {
                    log::warn!("[Settings] Failed to parse {:?}: {}, returning defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("[Settings] Failed to read {:?}: {}, returning defaults", path, e);
                Self::default()
            }
        }
    }

    /// Replace each invalid field with its default, keeping everything else.
    pub fn repaired(mut self) -> Self {
        let defaults = Self::default();

        if let Err(e) = self.selector() {
            log::warn!("[Settings] {}, using default selector {}", e, defaults.title_selector);
            self.title_selector = defaults.title_selector;
        }
        if let Err(e) = self.url_pattern() {
            log::warn!("[Settings] {}, using default pattern {}", e, defaults.tab_url_pattern);
            self.tab_url_pattern = defaults.tab_url_pattern;
        }
        if Url::parse(&self.new_tab_url).is_err() {
            log::warn!(
                "[Settings] Invalid new tab url '{}', using {}",
                self.new_tab_url,
                defaults.new_tab_url
            );
            self.new_tab_url = defaults.new_tab_url;
        }

        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.selector()?;
        self.url_pattern()?;
        Url::parse(&self.new_tab_url)
            .map_err(|_| SettingsError::InvalidUrl(self.new_tab_url.clone()))?;
        Ok(())
    }

    pub fn selector(&self) -> Result<ClassSelector, SettingsError> {
        Ok(ClassSelector::parse(&self.title_selector)?)
    }

    pub fn url_pattern(&self) -> Result<MatchPattern, SettingsError> {
        Ok(MatchPattern::parse(&self.tab_url_pattern)?)
    }
}
