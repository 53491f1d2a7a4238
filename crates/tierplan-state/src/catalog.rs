//! The flavor catalog: one resource template per platform role.

use serde::{Deserialize, Serialize};
use tierplan_core::{FlavorRole, Resources};

use crate::error::{StateError, StateResult};
use crate::types::Flavor;

/// A validated set of flavors holding every [`FlavorRole`].
///
/// Construction fails if any role is missing, so lookups by role are total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorCatalog {
    /// Indexed by `FlavorRole as usize`.
    required: [Resources; 8],
    /// Flavors present in the catalog that no role claims.
    extra: Vec<Flavor>,
}

impl FlavorCatalog {
    pub fn from_flavors(flavors: impl IntoIterator<Item = Flavor>) -> StateResult<Self> {
        let mut found: [Option<Resources>; 8] = [None; 8];
        let mut extra = Vec::new();

        for flavor in flavors {
            match FlavorRole::ALL.iter().find(|r| r.flavor_name() == flavor.name) {
                Some(role) => found[*role as usize] = Some(flavor.resources),
                None => extra.push(flavor),
            }
        }

        let mut required = [Resources::ZERO; 8];
        for role in FlavorRole::ALL {
            required[role as usize] =
                found[role as usize].ok_or(StateError::MissingFlavor(role.flavor_name()))?;
        }

        Ok(Self { required, extra })
    }

    pub fn resources(&self, role: FlavorRole) -> Resources {
        self.required[role as usize]
    }

    /// Every flavor in the catalog, required roles first.
    pub fn flavors(&self) -> Vec<Flavor> {
        FlavorRole::ALL
            .iter()
            .map(|r| Flavor::new(r.flavor_name(), self.resources(*r)))
            .chain(self.extra.iter().cloned())
            .collect()
    }
}
