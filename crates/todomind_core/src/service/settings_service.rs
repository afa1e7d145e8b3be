//! Typed access to the key-value settings store.
//!
//! # Invariants
//! - Missing keys read as `AppSettings::default()` values.
//! - Unparsable stored values read as defaults and are logged, never fatal.
//! - `default_mind_map_scale` is only written when finite and positive.

use crate::model::settings::{is_valid_scale, AppSettings};
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const KEY_SHOW_OGP_PREVIEW: &str = "show_ogp_preview";
pub const KEY_REMIND_TASK_DEADLINE: &str = "remind_task_deadline";
pub const KEY_DEFAULT_MIND_MAP_SCALE: &str = "default_mind_map_scale";

#[derive(Debug)]
pub enum SettingsError {
    InvalidScale(f32),
    Repo(RepoError),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScale(value) => {
                write!(f, "mind map scale must be finite and positive, got {value}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidScale(_) => None,
        }
    }
}

impl From<RepoError> for SettingsError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct SettingsService<S: SettingsRepository> {
    repo: S,
}

impl<S: SettingsRepository> SettingsService<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    pub fn load(&self) -> Result<AppSettings, SettingsError> {
        let defaults = AppSettings::default();
        let mut scale = self.read(KEY_DEFAULT_MIND_MAP_SCALE, defaults.default_mind_map_scale)?;
        if !is_valid_scale(scale) {
            warn!(
                "event=settings_load module=settings status=fallback key={KEY_DEFAULT_MIND_MAP_SCALE}"
            );
            scale = defaults.default_mind_map_scale;
        }
        Ok(AppSettings {
            show_ogp_preview: self.read(KEY_SHOW_OGP_PREVIEW, defaults.show_ogp_preview)?,
            remind_task_deadline: self
                .read(KEY_REMIND_TASK_DEADLINE, defaults.remind_task_deadline)?,
            default_mind_map_scale: scale,
        })
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        self.set_default_mind_map_scale(settings.default_mind_map_scale)?;
        self.set_show_ogp_preview(settings.show_ogp_preview)?;
        self.set_remind_task_deadline(settings.remind_task_deadline)
    }

    pub fn set_show_ogp_preview(&self, enabled: bool) -> Result<(), SettingsError> {
        self.write(KEY_SHOW_OGP_PREVIEW, enabled)
    }

    pub fn set_remind_task_deadline(&self, enabled: bool) -> Result<(), SettingsError> {
        self.write(KEY_REMIND_TASK_DEADLINE, enabled)
    }

    pub fn set_default_mind_map_scale(&self, scale: f32) -> Result<(), SettingsError> {
        if !is_valid_scale(scale) {
            return Err(SettingsError::InvalidScale(scale));
        }
        self.write(KEY_DEFAULT_MIND_MAP_SCALE, scale)
    }

    /// Drops every stored override so `load` returns defaults again.
    pub fn reset(&self) -> Result<(), SettingsError> {
        for key in [
            KEY_SHOW_OGP_PREVIEW,
            KEY_REMIND_TASK_DEADLINE,
            KEY_DEFAULT_MIND_MAP_SCALE,
        ] {
            self.repo.remove_value(key)?;
        }
        Ok(())
    }

    fn read<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, SettingsError> {
        let Some(raw) = self.repo.get_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!("event=settings_load module=settings status=fallback key={key}");
                Ok(default)
            }
        }
    }

    fn write(&self, key: &'static str, value: impl ToString) -> Result<(), SettingsError> {
        self.repo.set_value(key, &value.to_string())?;
        Ok(())
    }
}
