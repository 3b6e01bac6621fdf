use proptest::prelude::*;
use sentinel_core::constants::ComponentKind;

/// Shape of a generated component: kind, essential flag and failures to inflict
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    pub essential: bool,
    pub failures: u32,
}

/// Strategy for generating component kinds
pub fn component_kind_strategy() -> impl Strategy<Value = ComponentKind> {
    prop_oneof![
        Just(ComponentKind::Core),
        Just(ComponentKind::Hemisphere),
        Just(ComponentKind::Extremity),
        Just(ComponentKind::Ramification),
    ]
}

/// Failure counts around and beyond the offline threshold
pub fn failure_count_strategy() -> impl Strategy<Value = u32> {
    0u32..6
}

pub fn component_spec_strategy() -> impl Strategy<Value = ComponentSpec> {
    (
        component_kind_strategy(),
        any::<bool>(),
        failure_count_strategy(),
    )
        .prop_map(|(kind, essential, failures)| ComponentSpec {
            kind,
            essential,
            failures,
        })
}

/// Up to a dozen components with arbitrary kinds and failure counts
pub fn component_set_strategy() -> impl Strategy<Value = Vec<ComponentSpec>> {
    prop::collection::vec(component_spec_strategy(), 0..12)
}
