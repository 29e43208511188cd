//! Theme preference persistence.
//!
//! Two layers mirror each other: a storage backend (the durable copy) and a
//! cookie (so server-rendered markup can match the eventual client theme).
//! Both are best-effort; a host with storage disabled keeps a working,
//! in-memory-only theme for the session.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::theme::preference::ThemePreference;

/// Storage key and cookie name for the persisted preference.
pub const THEME_KEY: &str = "theme";

/// Cookie lifetime when a preference is explicitly set: one year.
pub const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Error from a persistence backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage disabled")]
    Disabled,
}

/// A durable home for the theme preference.
pub trait PreferenceStore {
    /// Read the persisted preference, if any. Unreadable or unparseable
    /// state reads as absent.
    fn load(&self) -> Option<ThemePreference>;

    fn save(&mut self, preference: ThemePreference) -> Result<(), PersistError>;

    fn clear(&mut self) -> Result<(), PersistError>;
}

/// In-memory store. The degraded mode the store falls back to, and the
/// default for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<ThemePreference>,
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Option<ThemePreference> {
        self.value
    }

    fn save(&mut self, preference: ThemePreference) -> Result<(), PersistError> {
        self.value = Some(preference);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.value = None;
        Ok(())
    }
}

/// File-backed store: one file holding `system`, `light`, or `dark`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Option<ThemePreference> {
        fs::read_to_string(&self.path).ok()?.trim().parse().ok()
    }

    fn save(&mut self, preference: ThemePreference) -> Result<(), PersistError> {
        fs::write(&self.path, preference.as_str())?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The cookie half of the mirror.
///
/// Owns the preference parsed from the request's `Cookie` header and stages
/// the `Set-Cookie` value the host must apply. The attributes are fixed:
/// path `/`, `SameSite=Lax`, one-year max-age on set, immediate expiry on
/// clear.
#[derive(Debug)]
pub struct CookieMirror {
    name: String,
    value: Option<ThemePreference>,
    pending: Option<String>,
}

impl CookieMirror {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            pending: None,
        }
    }

    /// Seed the mirror from a request's `Cookie` header, if one was sent.
    pub fn from_request_cookies(name: impl Into<String>, header: Option<&str>) -> Self {
        let name = name.into();
        let value = header.and_then(|h| preference_from_cookie_header(h, &name));
        Self {
            name,
            value,
            pending: None,
        }
    }

    /// The `Set-Cookie` value staged by the last save or clear, consumed by
    /// the host when it flushes headers.
    pub fn take_set_cookie(&mut self) -> Option<String> {
        self.pending.take()
    }
}

impl PreferenceStore for CookieMirror {
    fn load(&self) -> Option<ThemePreference> {
        self.value
    }

    fn save(&mut self, preference: ThemePreference) -> Result<(), PersistError> {
        self.value = Some(preference);
        self.pending = Some(set_cookie_value(&self.name, preference));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.value = None;
        self.pending = Some(clear_cookie_value(&self.name));
        Ok(())
    }
}

/// Format the `Set-Cookie` value persisting a preference.
pub fn set_cookie_value(name: &str, preference: ThemePreference) -> String {
    format!(
        "{name}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax",
        preference.as_str()
    )
}

/// Format the `Set-Cookie` value expiring the preference cookie now.
pub fn clear_cookie_value(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; SameSite=Lax")
}

/// Extract the theme preference from a `Cookie` request header.
pub fn preference_from_cookie_header(header: &str, name: &str) -> Option<ThemePreference> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
