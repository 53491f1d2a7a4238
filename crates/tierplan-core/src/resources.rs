//! Capacity arithmetic over `{vcpus, ram, disk}` triples.
//!
//! Every operation returns a new value; nothing here mutates a caller's
//! record in place. Dimensions are signed because intermediate results
//! (a relaxed requirement, an over-committed node) may dip below zero.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Floor size below which a cluster flavor is not considered viable.
pub const MIN_CLUSTER: Resources = Resources::new(2, 2048, 2);

/// Upper bound accepted for any node capacity or flavor. Keeps every sum
/// and per-access-network multiple the planner forms well inside `i64`.
pub const MAX_RESOURCES: Resources = Resources::new(1 << 20, 1 << 40, 1 << 40);

/// A resource triple. RAM is in MB, disk in GB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resources {
    pub vcpus: i64,
    pub ram: i64,
    pub disk: i64,
}

impl Resources {
    pub const ZERO: Resources = Resources::new(0, 0, 0);

    pub const fn new(vcpus: i64, ram: i64, disk: i64) -> Self {
        Self { vcpus, ram, disk }
    }

    /// Multiply every dimension by `factor`.
    pub fn scaled(self, factor: i64) -> Self {
        Self::new(self.vcpus * factor, self.ram * factor, self.disk * factor)
    }

    /// Integer-divide every dimension by `factor`. A zero factor yields zero.
    pub fn scaled_down(self, factor: i64) -> Self {
        Self::new(
            self.vcpus.checked_div(factor).unwrap_or(0),
            self.ram.checked_div(factor).unwrap_or(0),
            self.disk.checked_div(factor).unwrap_or(0),
        )
    }

    /// What remains of `capacity` once `consumed` has been paid for.
    pub fn available(capacity: Resources, consumed: Resources) -> Self {
        capacity - consumed
    }

    /// True when every dimension of `self` is covered by `capacity`.
    pub fn fits_within(&self, capacity: &Resources) -> bool {
        self.vcpus <= capacity.vcpus && self.ram <= capacity.ram && self.disk <= capacity.disk
    }

    pub fn is_non_negative(&self) -> bool {
        self.vcpus >= 0 && self.ram >= 0 && self.disk >= 0
    }

    /// A sane declared size: positive vcpus and ram, non-negative disk,
    /// nothing above [`MAX_RESOURCES`].
    pub fn is_plausible(&self) -> bool {
        self.vcpus > 0 && self.ram > 0 && self.disk >= 0 && self.fits_within(&MAX_RESOURCES)
    }

    /// True when no dimension is zero.
    pub fn is_fully_populated(&self) -> bool {
        self.vcpus != 0 && self.ram != 0 && self.disk != 0
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(self, rhs: Resources) -> Resources {
        Resources::new(self.vcpus + rhs.vcpus, self.ram + rhs.ram, self.disk + rhs.disk)
    }
}

impl Sub for Resources {
    type Output = Resources;

    fn sub(self, rhs: Resources) -> Resources {
        Resources::new(self.vcpus - rhs.vcpus, self.ram - rhs.ram, self.disk - rhs.disk)
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        *self = *self + rhs;
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Resources) {
        *self = *self - rhs;
    }
}

impl Sum for Resources {
    fn sum<I: Iterator<Item = Resources>>(iter: I) -> Resources {
        iter.fold(Resources::ZERO, Add::add)
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vCPU / {} MB RAM / {} GB disk", self.vcpus, self.ram, self.disk)
    }
}
