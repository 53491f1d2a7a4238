//! The node password shared by every block of one descriptor.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::{DescriptorError, DescriptorResult};

#[derive(Clone, PartialEq, Eq)]
pub struct NodePassword(String);

impl NodePassword {
    /// Length of generated passwords.
    pub const LEN: usize = 12;

    /// Draw a fresh password from `[a-zA-Z0-9]`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value = (0..Self::LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        Self(value)
    }

    /// Wrap a caller-supplied password: a single non-empty token. The
    /// template quotes it whenever YAML would read it as anything but this
    /// exact string.
    pub fn new(value: impl Into<String>) -> DescriptorResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DescriptorError::InvalidPassword("empty"));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DescriptorError::InvalidPassword("contains whitespace"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodePassword(***)")
    }
}
