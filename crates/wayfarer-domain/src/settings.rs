//! User-configurable settings and partial updates to them

use serde::{Deserialize, Serialize};

/// User settings shared by every UI surface
///
/// Stored settings are always merged over [`Settings::default`], so a key
/// missing from storage falls back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Show visited markers on the map
    /// Default: true
    pub show_visited: bool,

    /// Prompt automatically when a todo place is opened
    /// Default: true
    pub auto_prompt: bool,

    /// Delay before the prompt appears, in milliseconds
    /// Default: 2000
    #[serde(alias = "promptDelay")]
    pub prompt_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_visited: true,
            auto_prompt: true,
            prompt_delay_ms: 2000,
        }
    }
}

impl Settings {
    /// Shallow-merge `patch` over these settings; unset keys keep their value.
    ///
    /// ```
    /// use wayfarer_domain::{Settings, SettingsPatch};
    ///
    /// let mut settings = Settings::default();
    /// settings.apply(&SettingsPatch { auto_prompt: Some(false), ..Default::default() });
    ///
    /// assert!(!settings.auto_prompt);
    /// assert!(settings.show_visited);
    /// assert_eq!(settings.prompt_delay_ms, 2000);
    /// ```
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(show_visited) = patch.show_visited {
            self.show_visited = show_visited;
        }
        if let Some(auto_prompt) = patch.auto_prompt {
            self.auto_prompt = auto_prompt;
        }
        if let Some(prompt_delay_ms) = patch.prompt_delay_ms {
            self.prompt_delay_ms = prompt_delay_ms;
        }
    }

    /// Defaults with `patch` applied
    pub fn from_patch(patch: &SettingsPatch) -> Self {
        let mut settings = Self::default();
        settings.apply(patch);
        settings
    }
}

/// A partial settings update
///
/// Unknown keys are ignored. A negative `promptDelayMs` is rejected when
/// parsing because the field is unsigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    /// New `show_visited`, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_visited: Option<bool>,

    /// New `auto_prompt`, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_prompt: Option<bool>,

    /// New `prompt_delay_ms`, if changing
    #[serde(default, alias = "promptDelay", skip_serializing_if = "Option::is_none")]
    pub prompt_delay_ms: Option<u64>,
}

impl SettingsPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.show_visited.is_none() && self.auto_prompt.is_none() && self.prompt_delay_ms.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.show_visited);
        assert!(settings.auto_prompt);
        assert_eq!(settings.prompt_delay_ms, 2000);
    }

    #[test]
    fn test_merge_leaves_unset_keys() {
        let mut settings = Settings {
            show_visited: false,
            auto_prompt: true,
            prompt_delay_ms: 500,
        };
        settings.apply(&SettingsPatch {
            auto_prompt: Some(false),
            ..Default::default()
        });

        assert!(!settings.show_visited);
        assert!(!settings.auto_prompt);
        assert_eq!(settings.prompt_delay_ms, 500);
    }

    #[test]
    fn test_patch_accepts_legacy_delay_key() {
        let patch: SettingsPatch = serde_json::from_str(r#"{"promptDelay": 3000}"#).unwrap();
        assert_eq!(patch.prompt_delay_ms, Some(3000));
        assert!(patch.auto_prompt.is_none());
    }

    #[test]
    fn test_patch_rejects_negative_delay() {
        assert!(serde_json::from_str::<SettingsPatch>(r#"{"promptDelayMs": -1}"#).is_err());
    }

    #[test]
    fn test_partial_stored_settings_fill_defaults() {
        let patch: SettingsPatch = serde_json::from_str(r#"{"showVisited": false}"#).unwrap();
        let settings = Settings::from_patch(&patch);
        assert!(!settings.show_visited);
        assert!(settings.auto_prompt);
        assert_eq!(settings.prompt_delay_ms, 2000);
    }

    #[test]
    fn test_settings_wire_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["showVisited"], true);
        assert_eq!(json["promptDelayMs"], 2000);
        assert!(SettingsPatch::default().is_empty());
    }
}
