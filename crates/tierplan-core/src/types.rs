//! Shared types used across tierplan crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not name any known variant of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ── Tier ──────────────────────────────────────────────────────────

/// Node class; each tier has its own network and placement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    DataCentre,
    Edge,
    FarEdge,
    Mist,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::DataCentre, Tier::Edge, Tier::FarEdge, Tier::Mist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::DataCentre => "data_centre",
            Tier::Edge => "edge",
            Tier::FarEdge => "far_edge",
            Tier::Mist => "mist",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "tier", value: s.to_string() })
    }
}

// ── Network category ──────────────────────────────────────────────

/// Category a network (or subnet, or security group) is attached under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NetworkCategory {
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "wan")]
    Wan,
    #[serde(rename = "sdnctrl")]
    SdnCtrl,
    #[serde(rename = "mgmt")]
    Mgmt,
    #[serde(rename = "msp")]
    Msp,
    #[serde(rename = "ps")]
    Ps,
    #[serde(rename = "clmc-sfemc")]
    ClmcSfemc,
    #[serde(rename = "sia")]
    Sia,
    #[serde(rename = "cluster")]
    Cluster,
    #[serde(rename = "access")]
    Access,
}

impl NetworkCategory {
    pub const ALL: [NetworkCategory; 10] = [
        NetworkCategory::Data,
        NetworkCategory::Wan,
        NetworkCategory::SdnCtrl,
        NetworkCategory::Mgmt,
        NetworkCategory::Msp,
        NetworkCategory::Ps,
        NetworkCategory::ClmcSfemc,
        NetworkCategory::Sia,
        NetworkCategory::Cluster,
        NetworkCategory::Access,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkCategory::Data => "data",
            NetworkCategory::Wan => "wan",
            NetworkCategory::SdnCtrl => "sdnctrl",
            NetworkCategory::Mgmt => "mgmt",
            NetworkCategory::Msp => "msp",
            NetworkCategory::Ps => "ps",
            NetworkCategory::ClmcSfemc => "clmc-sfemc",
            NetworkCategory::Sia => "sia",
            NetworkCategory::Cluster => "cluster",
            NetworkCategory::Access => "access",
        }
    }
}

impl fmt::Display for NetworkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "network category", value: s.to_string() })
    }
}

// ── Flavor roles ──────────────────────────────────────────────────

/// Platform function roles; the flavor catalog must hold one flavor per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlavorRole {
    /// Control-plane proxy.
    Pce,
    /// Name manager.
    Nm,
    /// Service router.
    Sr,
    /// Policy store.
    Ps,
    Frontend,
    /// Management console.
    Moose,
    /// Cluster monitor.
    Clmc,
    /// Service-function-emulator controller.
    Sfemc,
}

impl FlavorRole {
    pub const ALL: [FlavorRole; 8] = [
        FlavorRole::Clmc,
        FlavorRole::Frontend,
        FlavorRole::Moose,
        FlavorRole::Pce,
        FlavorRole::Ps,
        FlavorRole::Sfemc,
        FlavorRole::Sr,
        FlavorRole::Nm,
    ];

    /// Flavor name as it appears in the catalog and in the descriptor.
    pub fn flavor_name(&self) -> &'static str {
        match self {
            FlavorRole::Pce => "pce",
            FlavorRole::Nm => "nm",
            FlavorRole::Sr => "sr",
            FlavorRole::Ps => "ps",
            FlavorRole::Frontend => "frontend",
            FlavorRole::Moose => "moose",
            FlavorRole::Clmc => "clmc",
            FlavorRole::Sfemc => "sfemc",
        }
    }
}

impl fmt::Display for FlavorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flavor_name())
    }
}
