//! Theme preference and resolution model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The visitor's stored intent. `System` defers to the OS color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::System => "system",
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// The next preference in the fixed cycling order
    /// system → dark → light → system.
    pub fn next(self) -> Self {
        match self {
            ThemePreference::System => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::System,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized theme preference: {0}")]
pub struct ParsePreferenceError(String);

impl FromStr for ThemePreference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(ThemePreference::System),
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(ParsePreferenceError(other.to_string())),
        }
    }
}

/// The OS-reported color scheme. Browsers default to light when they
/// advertise nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// The binary theme actually applied to the UI. Never persisted; always
/// recomputed via [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }

    /// The root-level attribute style rules key off.
    pub fn root_attribute(self) -> String {
        format!("data-theme=\"{}\"", self.as_str())
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the active theme. Pure: no input other than the preference and
/// the OS scheme may affect the result.
pub fn resolve(preference: ThemePreference, os_scheme: ColorScheme) -> ResolvedTheme {
    match preference {
        ThemePreference::Light => ResolvedTheme::Light,
        ThemePreference::Dark => ResolvedTheme::Dark,
        ThemePreference::System => match os_scheme {
            ColorScheme::Light => ResolvedTheme::Light,
            ColorScheme::Dark => ResolvedTheme::Dark,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_matrix() {
        assert_eq!(
            resolve(ThemePreference::System, ColorScheme::Dark),
            ResolvedTheme::Dark
        );
        assert_eq!(
            resolve(ThemePreference::System, ColorScheme::Light),
            ResolvedTheme::Light
        );
        // Manual preference overrides the OS signal.
        assert_eq!(
            resolve(ThemePreference::Dark, ColorScheme::Light),
            ResolvedTheme::Dark
        );
        assert_eq!(
            resolve(ThemePreference::Light, ColorScheme::Dark),
            ResolvedTheme::Light
        );
    }

    #[test]
    fn test_cycle_returns_to_start_after_three_steps() {
        let start = ThemePreference::System;
        assert_eq!(start.next(), ThemePreference::Dark);
        assert_eq!(start.next().next(), ThemePreference::Light);
        assert_eq!(start.next().next().next(), ThemePreference::System);
    }

    #[test]
    fn test_parse_round_trip() {
        for pref in [
            ThemePreference::System,
            ThemePreference::Light,
            ThemePreference::Dark,
        ] {
            assert_eq!(pref.as_str().parse::<ThemePreference>().unwrap(), pref);
        }
        assert!("auto".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn test_root_attribute() {
        assert_eq!(ResolvedTheme::Dark.root_attribute(), "data-theme=\"dark\"");
    }
}
