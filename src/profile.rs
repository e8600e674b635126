//! Profile gate: intro splash, "Who's watching?" and the main app
//!
//! The chosen profile is remembered across sessions. It is cosmetic only and
//! never scopes catalog or watch-list data.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::storage::{KeyValueStore, PROFILE_KEY};

/// How long the intro splash plays before the profile picker
pub const INTRO_DURATION: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: &'static str,
    pub name: &'static str,
}

/// Profiles offered on the picker
pub const PROFILES: &[Profile] = &[
    Profile { id: "1", name: "Alex" },
    Profile { id: "2", name: "Sam" },
    Profile { id: "3", name: "Jordan" },
    Profile { id: "4", name: "Kids" },
];

pub fn find_profile(id: &str) -> Option<&'static Profile> {
    PROFILES.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Intro animation
    Loading,
    ProfileSelection,
    MainApp { profile: &'static Profile },
}

pub struct ProfileGate {
    state: GateState,
    store: Arc<dyn KeyValueStore>,
}

impl ProfileGate {
    /// Skip straight to the app when a known profile was saved
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let saved = match store.get(PROFILE_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Could not read selected profile");
                None
            }
        };

        let state = match saved.as_deref().map(str::trim).and_then(find_profile) {
            Some(profile) => GateState::MainApp { profile },
            None => GateState::Loading,
        };

        Self { state, store }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn profile(&self) -> Option<&'static Profile> {
        match self.state {
            GateState::MainApp { profile } => Some(profile),
            _ => None,
        }
    }

    /// Loading -> ProfileSelection; ignored in any other state
    pub fn finish_intro(&mut self) {
        if self.state == GateState::Loading {
            self.state = GateState::ProfileSelection;
        }
    }

    /// Choose a profile and enter the app. Unknown ids are rejected.
    pub fn select(&mut self, id: &str) -> Option<&'static Profile> {
        let profile = find_profile(id)?;
        if let Err(e) = self.store.set(PROFILE_KEY, profile.id) {
            warn!(error = %e, "Could not persist selected profile");
        }
        info!(profile = profile.name, "Profile selected");
        self.state = GateState::MainApp { profile };
        Some(profile)
    }

    /// Forget the saved profile and return to the picker
    pub fn switch_profile(&mut self) {
        if let Err(e) = self.store.remove(PROFILE_KEY) {
            warn!(error = %e, "Could not clear selected profile");
        }
        self.state = GateState::ProfileSelection;
    }
}
