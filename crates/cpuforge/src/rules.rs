//! Connection rules.
//!
//! The single place that decides whether two pins may be wired together.
//! [`crate::diagram::Diagram::add_connection`] consults [`check`] before it
//! stores anything; UI collaborators can call [`can_connect`] to preview a
//! connection while the pointer hovers over a candidate pin.

use thiserror::Error;

use cpuforge_core::{
    catalog::{Pin, PinDirection},
    identifier::Id,
};

/// Why a candidate connection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectionRejection {
    #[error("both pins belong to the same component")]
    SameComponent,

    #[error("both pins are {0} pins")]
    SameDirection(PinDirection),
}

/// One side of a candidate connection: a component and one of its pins.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    component: Id,
    pin: &'a Pin,
}

impl<'a> Endpoint<'a> {
    pub fn new(component: Id, pin: &'a Pin) -> Self {
        Self { component, pin }
    }

    pub fn component(&self) -> Id {
        self.component
    }

    pub fn pin(&self) -> &'a Pin {
        self.pin
    }
}

/// Checks whether two endpoints may be connected.
///
/// The endpoints must sit on different components and have opposite
/// directions. Argument order does not matter.
pub fn check(a: Endpoint<'_>, b: Endpoint<'_>) -> Result<(), ConnectionRejection> {
    if a.component == b.component {
        return Err(ConnectionRejection::SameComponent);
    }
    if a.pin.direction() == b.pin.direction() {
        return Err(ConnectionRejection::SameDirection(a.pin.direction()));
    }
    Ok(())
}

/// Returns `true` if [`check`] accepts the pair.
pub fn can_connect(a: Endpoint<'_>, b: Endpoint<'_>) -> bool {
    check(a, b).is_ok()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use cpuforge_core::{catalog::ComponentType, identifier::Id};

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn endpoint_strategy() -> impl Strategy<Value = (usize, ComponentType, usize)> {
        (0usize..3, 0usize..ComponentType::ALL.len()).prop_flat_map(|(owner, ty_idx)| {
            let ty = ComponentType::ALL[ty_idx];
            (Just(owner), Just(ty), 0..ty.pins().len())
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Argument order never changes the verdict.
    fn check_symmetric(
        (owner_a, ty_a, pin_a): (usize, ComponentType, usize),
        (owner_b, ty_b, pin_b): (usize, ComponentType, usize),
    ) -> Result<(), TestCaseError> {
        let a = Endpoint::new(Id::new(&format!("c{owner_a}")), &ty_a.pins()[pin_a]);
        let b = Endpoint::new(Id::new(&format!("c{owner_b}")), &ty_b.pins()[pin_b]);

        prop_assert_eq!(can_connect(a, b), can_connect(b, a));
        Ok(())
    }

    /// Accepted pairs always join distinct components with opposite directions.
    fn check_accepted_pairs_are_well_formed(
        (owner_a, ty_a, pin_a): (usize, ComponentType, usize),
        (owner_b, ty_b, pin_b): (usize, ComponentType, usize),
    ) -> Result<(), TestCaseError> {
        let a = Endpoint::new(Id::new(&format!("c{owner_a}")), &ty_a.pins()[pin_a]);
        let b = Endpoint::new(Id::new(&format!("c{owner_b}")), &ty_b.pins()[pin_b]);

        if can_connect(a, b) {
            prop_assert_ne!(a.component(), b.component());
            prop_assert_eq!(a.pin().direction().opposite(), b.pin().direction());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn can_connect_is_symmetric(a in endpoint_strategy(), b in endpoint_strategy()) {
            check_symmetric(a, b)?;
        }

        #[test]
        fn accepted_pairs_are_well_formed(a in endpoint_strategy(), b in endpoint_strategy()) {
            check_accepted_pairs_are_well_formed(a, b)?;
        }
    }
}
