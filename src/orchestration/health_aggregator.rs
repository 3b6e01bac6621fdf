//! # Health Aggregator
//!
//! Pure functions deriving the system-wide operating mode and overall health from the
//! current component statuses. Order of the input never matters and an empty input yields
//! `Complete` / `Optimal`.
//!
//! Mode precedence, first match wins:
//!
//! | Rule | Condition                               | Mode        |
//! |------|-----------------------------------------|-------------|
//! | 1    | any `Core` offline                      | `Emergency` |
//! | 2    | any `Core` critical                     | `Critical`  |
//! | 3    | any essential `Hemisphere` offline      | `Essential` |
//! | 4    | any `Ramification` offline              | `Essential` |
//! | 5    | otherwise                               | `Complete`  |
//!
//! Declared dependencies are not consulted: a failing dependency does not cascade to its
//! dependents.

use crate::constants::ComponentKind;
use crate::models::Component;
use crate::state_machine::{HealthStatus, OperationMode};

pub fn compute_mode<'a, I>(components: I) -> OperationMode
where
    I: IntoIterator<Item = &'a Component>,
{
    let mut core_offline = false;
    let mut core_critical = false;
    let mut reduced = false;

    for component in components {
        match (component.kind(), component.status()) {
            (ComponentKind::Core, HealthStatus::Offline) => core_offline = true,
            (ComponentKind::Core, HealthStatus::Critical) => core_critical = true,
            (ComponentKind::Hemisphere, HealthStatus::Offline) if component.is_essential() => {
                reduced = true
            }
            (ComponentKind::Ramification, HealthStatus::Offline) => reduced = true,
            _ => {}
        }
    }

    if core_offline {
        OperationMode::Emergency
    } else if core_critical {
        OperationMode::Critical
    } else if reduced {
        OperationMode::Essential
    } else {
        OperationMode::Complete
    }
}

/// Census over every component regardless of kind
pub fn compute_overall_health<'a, I>(components: I) -> HealthStatus
where
    I: IntoIterator<Item = &'a Component>,
{
    let worst = components
        .into_iter()
        .map(Component::status)
        .max()
        .unwrap_or(HealthStatus::Optimal);

    match worst {
        HealthStatus::Offline => HealthStatus::Critical,
        HealthStatus::Critical | HealthStatus::Degraded => HealthStatus::Degraded,
        HealthStatus::Optimal => HealthStatus::Optimal,
    }
}

/// Hemisphere ids that are not offline, sorted
pub fn active_hemispheres<'a, I>(components: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Component>,
{
    collect_ids(components, |c| {
        c.kind() == ComponentKind::Hemisphere && !c.status().is_offline()
    })
}

/// Extremity ids that are offline, sorted
pub fn offline_extremities<'a, I>(components: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Component>,
{
    collect_ids(components, |c| {
        c.kind() == ComponentKind::Extremity && c.status().is_offline()
    })
}

fn collect_ids<'a, I, P>(components: I, predicate: P) -> Vec<String>
where
    I: IntoIterator<Item = &'a Component>,
    P: Fn(&Component) -> bool,
{
    let mut ids: Vec<String> = components
        .into_iter()
        .filter(|c| predicate(*c))
        .map(|c| c.id().to_string())
        .collect();
    ids.sort();
    ids
}
