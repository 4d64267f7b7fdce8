//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use fb_core::UserGoals;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default session export to read when `--input` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_path: Option<PathBuf>,

    /// Daily focus target in minutes.
    pub daily_goal_minutes: u64,

    /// Weekly target of completed focus sessions.
    pub weekly_goal_sessions: u64,

    /// Rows in the activity heat-map.
    pub heatmap_weeks: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("records_path", &self.records_path)
            .field("daily_goal_minutes", &self.daily_goal_minutes)
            .field("weekly_goal_sessions", &self.weekly_goal_sessions)
            .field("heatmap_weeks", &self.heatmap_weeks)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_path: None,
            daily_goal_minutes: 120,
            weekly_goal_sessions: 20,
            heatmap_weeks: 12,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FB_*)
        figment = figment.merge(Env::prefixed("FB_"));

        figment.extract()
    }

    /// Goal targets as the engine expects them.
    pub const fn user_goals(&self) -> UserGoals {
        UserGoals {
            daily_goal_minutes: self.daily_goal_minutes,
            weekly_goal_sessions: self.weekly_goal_sessions,
        }
    }
}

/// Returns the platform-specific config directory for focusboard.
///
/// On Linux: `~/.config/focusboard`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("focusboard"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_focusboard() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "focusboard");
    }

    #[test]
    fn test_default_goals() {
        let config = Config::default();
        assert_eq!(config.records_path, None);
        assert_eq!(
            config.user_goals(),
            UserGoals {
                daily_goal_minutes: 120,
                weekly_goal_sessions: 20,
            }
        );
        assert_eq!(config.heatmap_weeks, 12);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fb.toml");
        std::fs::write(
            &path,
            "daily_goal_minutes = 90\nrecords_path = \"/tmp/sessions.json\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.daily_goal_minutes, 90);
        assert_eq!(config.weekly_goal_sessions, 20);
        assert_eq!(
            config.records_path,
            Some(PathBuf::from("/tmp/sessions.json"))
        );
    }
}
