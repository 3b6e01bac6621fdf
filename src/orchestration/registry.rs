//! # Component Registry
//!
//! Holds the monitored components keyed by id. The registry is a plain data holder: it
//! validates registrations and hands out copies, while the scheduler owns every mutation of
//! component health.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use sentinel_core::config::DuplicatePolicy;
//! use sentinel_core::constants::ComponentKind;
//! use sentinel_core::models::Component;
//! use sentinel_core::orchestration::{probe::FnProbe, registry::ComponentRegistry};
//!
//! let registry = ComponentRegistry::new(DuplicatePolicy::Reject);
//! let probe = Arc::new(FnProbe::new("database", || true));
//!
//! registry
//!     .register(Component::new("db", "Database", ComponentKind::Core, probe))
//!     .unwrap();
//! assert!(registry.get("db").is_some());
//! ```

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::config::DuplicatePolicy;
use crate::error::{Result, SentinelError};
use crate::models::{Component, ComponentHealth};

#[derive(Debug)]
struct RegistryEntry {
    /// Bumped on every (re-)registration so stale probe results can be discarded
    generation: u64,
    component: Component,
}

/// Thread-safe registry of monitored components
#[derive(Debug)]
pub struct ComponentRegistry {
    components: DashMap<String, RegistryEntry>,
    duplicate_policy: DuplicatePolicy,
    next_generation: AtomicU64,
}

impl ComponentRegistry {
    pub fn new(duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            components: DashMap::new(),
            duplicate_policy,
            next_generation: AtomicU64::new(1),
        }
    }

    /// Register a component keyed by its id
    pub fn register(&self, component: Component) -> Result<()> {
        Self::validate(&component)?;

        let id = component.id().to_string();
        for dependency in component.dependencies() {
            if !self.components.contains_key(dependency) {
                debug!(
                    component_id = %id,
                    dependency = %dependency,
                    "Dependency not (yet) registered"
                );
            }
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        match self.components.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => match self.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(SentinelError::DuplicateComponent { id });
                }
                DuplicatePolicy::Replace => {
                    warn!(component_id = %id, "Component already registered, replacing");
                    occupied.insert(RegistryEntry {
                        generation,
                        component,
                    });
                }
            },
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                info!(
                    component_id = %id,
                    kind = %component.kind(),
                    essential = component.is_essential(),
                    "Registered component"
                );
                vacant.insert(RegistryEntry {
                    generation,
                    component,
                });
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Component> {
        self.components
            .get(id)
            .map(|entry| entry.component.clone())
    }

    /// Copy of every registered component, in no particular order.
    ///
    /// Each call re-reads the registry, so components registered since the last call appear.
    pub fn all(&self) -> Vec<Component> {
        self.components
            .iter()
            .map(|entry| entry.component.clone())
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.components.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Ids of the components that declare a dependency on `id`
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        let mut dependents: Vec<String> = self
            .components
            .iter()
            .filter(|entry| entry.component.dependencies().contains(id))
            .map(|entry| entry.key().clone())
            .collect();
        dependents.sort();
        dependents
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components paired with their registration generation, for an evaluation cycle
    pub(crate) fn checkout(&self) -> Vec<(u64, Component)> {
        self.components
            .iter()
            .map(|entry| (entry.generation, entry.component.clone()))
            .collect()
    }

    /// Write back the health computed during a cycle.
    ///
    /// Ignored when the component was removed or re-registered after checkout.
    pub(crate) fn apply_health(&self, id: &str, generation: u64, health: ComponentHealth) -> bool {
        match self.components.get_mut(id) {
            Some(mut entry) if entry.generation == generation => {
                entry.component.set_health(health);
                true
            }
            Some(_) => {
                debug!(component_id = %id, "Discarding probe result for replaced component");
                false
            }
            None => false,
        }
    }

    fn validate(component: &Component) -> Result<()> {
        if component.id().trim().is_empty() {
            return Err(SentinelError::InvalidRegistration(
                "component id must not be empty".to_string(),
            ));
        }
        if component.name().trim().is_empty() {
            return Err(SentinelError::InvalidRegistration(format!(
                "component {} must have a name",
                component.id()
            )));
        }
        if component.dependencies().contains(component.id()) {
            return Err(SentinelError::InvalidRegistration(format!(
                "component {} cannot depend on itself",
                component.id()
            )));
        }
        Ok(())
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}
