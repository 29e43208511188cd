//! The theme store: single source of truth for the active theme.
//!
//! One store per hosting document/session. Subscribers are notified
//! synchronously when observable state changes; persistence is best-effort
//! and never fails the caller.

use crate::theme::persistence::{CookieMirror, PreferenceStore};
use crate::theme::preference::{resolve, ColorScheme, ResolvedTheme, ThemePreference};

/// Observable state snapshot delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChange {
    pub preference: ThemePreference,
    pub resolved: ResolvedTheme,
}

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(ThemeChange)>;

/// Owner of the current preference and resolved theme.
pub struct ThemeStore {
    preference: ThemePreference,
    os_scheme: ColorScheme,
    storage: Box<dyn PreferenceStore>,
    cookie: CookieMirror,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: u64,
}

impl ThemeStore {
    /// Initialize from persisted state: storage first, then the cookie
    /// mirror (which keeps pre-render markup consistent), then `system`.
    pub fn new(
        storage: Box<dyn PreferenceStore>,
        cookie: CookieMirror,
        os_scheme: ColorScheme,
    ) -> Self {
        let preference = storage
            .load()
            .or_else(|| cookie.load())
            .unwrap_or_default();

        Self {
            preference,
            os_scheme,
            storage,
            cookie,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn resolved(&self) -> ResolvedTheme {
        resolve(self.preference, self.os_scheme)
    }

    /// The root-level attribute the host writes so style rules can key off
    /// the resolved theme.
    pub fn root_attribute(&self) -> String {
        self.resolved().root_attribute()
    }

    fn snapshot(&self) -> ThemeChange {
        ThemeChange {
            preference: self.preference,
            resolved: self.resolved(),
        }
    }

    /// Set the preference to exactly `value`, persist it to both layers,
    /// and recompute the resolved theme immediately.
    pub fn set_preference(&mut self, value: ThemePreference) {
        let before = self.snapshot();
        self.preference = value;

        if let Err(e) = self.storage.save(value) {
            tracing::warn!(error = %e, "theme storage write failed, continuing in memory");
        }
        if let Err(e) = self.cookie.save(value) {
            tracing::warn!(error = %e, "theme cookie write failed, continuing in memory");
        }

        self.notify_if_changed(before);
    }

    /// Advance along the fixed order system → dark → light → system.
    pub fn cycle(&mut self) -> ThemePreference {
        let next = self.preference.next();
        self.set_preference(next);
        next
    }

    /// Apply an OS color scheme change. Only observable while the
    /// preference is `system`; re-applying the same value is a no-op.
    pub fn os_scheme_changed(&mut self, scheme: ColorScheme) {
        let before = self.snapshot();
        self.os_scheme = scheme;
        self.notify_if_changed(before);
    }

    /// Drop the persisted preference and return to OS-driven resolution.
    pub fn clear_preference(&mut self) {
        let before = self.snapshot();
        self.preference = ThemePreference::System;

        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "theme storage clear failed, continuing in memory");
        }
        if let Err(e) = self.cookie.clear() {
            tracing::warn!(error = %e, "theme cookie clear failed, continuing in memory");
        }

        self.notify_if_changed(before);
    }

    /// Register a change listener, called synchronously on every observable
    /// state change. Lives until unsubscribed or the store is dropped.
    pub fn subscribe(&mut self, listener: impl FnMut(ThemeChange) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// The `Set-Cookie` value staged by the last mutation, for the host to
    /// flush.
    pub fn take_set_cookie(&mut self) -> Option<String> {
        self.cookie.take_set_cookie()
    }

    fn notify_if_changed(&mut self, before: ThemeChange) {
        let after = self.snapshot();
        if after == before {
            return;
        }
        for (_, listener) in &mut self.subscribers {
            listener(after);
        }
    }
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("preference", &self.preference)
            .field("os_scheme", &self.os_scheme)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
