//! Where the local server configuration file lives.
//!
//! The file sits in the same directory as the host application's own settings
//! file, under a platform-dependent name:
//! - Windows:  `server.ini`
//! - Others:   `server.conf`
//!
//! The host application's settings file is found by a [`SettingsLocator`].
//! [`PlatformSettingsLocator`] puts it where desktop settings APIs do:
//! - Windows:  `%APPDATA%\<Org>\<App>.ini`
//! - Linux:    `$XDG_CONFIG_HOME/<Org>/<App>.conf` (or `~/.config/...`)
//! - macOS:    `~/Library/Preferences/com.<org>.<App>.plist` (organization
//!   lowercased, application as given)

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Organization name used when none is configured.
pub const DEFAULT_ORGANIZATION: &str = "serverconf";
/// Application name used when none is configured.
pub const DEFAULT_APPLICATION: &str = "serverconf";

/// Error type for path resolution.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,
}

/// Supplies the path of the host application's settings file.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsLocator {
    fn settings_file(&self) -> Result<PathBuf, LocateError>;
}

/// Name of the configuration file on this platform.
pub fn config_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "server.ini"
    } else {
        "server.conf"
    }
}

/// Resolves the configuration file path: the settings file's directory joined
/// with [`config_file_name`].
///
/// # Errors
///
/// Propagates the locator's [`LocateError`].
pub fn config_file_path(locator: &dyn SettingsLocator) -> Result<PathBuf, LocateError> {
    let settings_file = locator.settings_file()?;
    let dir = settings_file.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(config_file_name()))
}

/// A locator that always returns the same path.
#[derive(Debug, Clone)]
pub struct FixedSettingsLocator(pub PathBuf);

impl SettingsLocator for FixedSettingsLocator {
    fn settings_file(&self) -> Result<PathBuf, LocateError> {
        Ok(self.0.clone())
    }
}

/// Locates the settings file from the environment of the current platform.
#[derive(Debug, Clone)]
pub struct PlatformSettingsLocator {
    pub organization: String,
    pub application: String,
}

impl PlatformSettingsLocator {
    pub fn new(organization: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            application: application.into(),
        }
    }
}

impl Default for PlatformSettingsLocator {
    fn default() -> Self {
        Self::new(DEFAULT_ORGANIZATION, DEFAULT_APPLICATION)
    }
}

impl SettingsLocator for PlatformSettingsLocator {
    fn settings_file(&self) -> Result<PathBuf, LocateError> {
        platform_settings_file(&self.organization, &self.application)
            .ok_or(LocateError::NoPlatformConfigDir)
    }
}

/// Resolves the platform settings file for `organization` / `application`.
fn platform_settings_file(organization: &str, application: &str) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| {
            PathBuf::from(p)
                .join(organization)
                .join(format!("{application}.ini"))
        })
    }

    #[cfg(target_os = "macos")]
    {
        // Reverse-domain name: only the organization part is lowercased.
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Preferences")
                .join(format!(
                    "com.{}.{application}.plist",
                    organization.to_lowercase()
                ))
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join(organization).join(format!("{application}.conf")))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
