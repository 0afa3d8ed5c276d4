use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Raw YAML of the config file, or the effective defaults when no file exists.
    pub fn render(path: &Path, cfg: &Config) -> AppResult<String> {
        if path.exists() {
            fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))
        } else {
            Ok(serde_yaml::to_string(cfg)?)
        }
    }

    /// Keys missing from the config file; an absent file is an error.
    pub fn check(path: &Path) -> AppResult<Vec<&'static str>> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} not found, run `kinematic init` first",
                path.display()
            )));
        }
        Config::missing_keys(path)
    }

    /// Open `path` in `requested`, falling back to `$EDITOR`/`$VISUAL` or the
    /// platform default. Returns the editor that succeeded.
    pub fn edit(path: &Path, requested: Option<&str>) -> AppResult<String> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let first = requested.map(str::to_string).unwrap_or_else(|| default_editor.clone());
        if matches!(Command::new(&first).arg(path).status(), Ok(s) if s.success()) {
            return Ok(first);
        }
        if first != default_editor
            && matches!(Command::new(&default_editor).arg(path).status(), Ok(s) if s.success())
        {
            return Ok(default_editor);
        }
        Err(AppError::Config(format!(
            "failed to edit {} with '{}'",
            path.display(),
            first
        )))
    }
}
