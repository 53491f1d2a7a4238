//! Advisory findings: problems worth surfacing that do not abort a run.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvisoryCategory {
    ComputeNode,
    Networks,
    Quotas,
}

impl AdvisoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::ComputeNode => "compute-node",
            AdvisoryCategory::Networks => "networks",
            AdvisoryCategory::Quotas => "quotas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub category: AdvisoryCategory,
    pub description: String,
}

impl Advisory {
    pub fn new(category: AdvisoryCategory, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category.as_str(), self.description)
    }
}
