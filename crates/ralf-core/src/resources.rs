//! Four-dimensional resource vectors.
//!
//! A [`ResourceProfile`] is used both as a node's capacity and as a
//! component's demand. Every dimension is finite and non-negative; the
//! only fallible entry points are [`ResourceProfile::new`] and
//! deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One resource dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Cpu,
    MemoryGb,
    StorageGb,
    NetworkGbps,
}

impl Resource {
    /// All dimensions, in reporting order.
    pub const ALL: [Resource; 4] = [
        Resource::Cpu,
        Resource::MemoryGb,
        Resource::StorageGb,
        Resource::NetworkGbps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Cpu => "cpu",
            Resource::MemoryGb => "memory_gb",
            Resource::StorageGb => "storage_gb",
            Resource::NetworkGbps => "network_gbps",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU cores, memory, storage and network bandwidth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct ResourceProfile {
    cpu: f64,
    memory_gb: f64,
    storage_gb: f64,
    network_gbps: f64,
}

/// Unchecked wire form; every field defaults to zero.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawProfile {
    cpu: f64,
    memory_gb: f64,
    storage_gb: f64,
    network_gbps: f64,
}

impl TryFrom<RawProfile> for ResourceProfile {
    type Error = CoreError;

    fn try_from(raw: RawProfile) -> CoreResult<Self> {
        ResourceProfile::new(raw.cpu, raw.memory_gb, raw.storage_gb, raw.network_gbps)
    }
}

impl ResourceProfile {
    /// Build a profile, rejecting negative or non-finite values.
    pub fn new(cpu: f64, memory_gb: f64, storage_gb: f64, network_gbps: f64) -> CoreResult<Self> {
        let profile = Self {
            cpu,
            memory_gb,
            storage_gb,
            network_gbps,
        };
        for resource in Resource::ALL {
            let value = profile.get(resource);
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidResource { resource, value });
            }
        }
        Ok(profile)
    }

    /// The all-zero profile.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn memory_gb(&self) -> f64 {
        self.memory_gb
    }

    pub fn storage_gb(&self) -> f64 {
        self.storage_gb
    }

    pub fn network_gbps(&self) -> f64 {
        self.network_gbps
    }

    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Cpu => self.cpu,
            Resource::MemoryGb => self.memory_gb,
            Resource::StorageGb => self.storage_gb,
            Resource::NetworkGbps => self.network_gbps,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut f64 {
        match resource {
            Resource::Cpu => &mut self.cpu,
            Resource::MemoryGb => &mut self.memory_gb,
            Resource::StorageGb => &mut self.storage_gb,
            Resource::NetworkGbps => &mut self.network_gbps,
        }
    }

    /// Component-wise sum, in place.
    pub fn add_inplace(&mut self, other: &ResourceProfile) {
        for resource in Resource::ALL {
            *self.slot(resource) += other.get(resource);
        }
    }

    /// Component-wise subtraction, in place. Each dimension saturates at
    /// zero; callers check [`can_host`](Self::can_host) first.
    pub fn consume(&mut self, other: &ResourceProfile) {
        for resource in Resource::ALL {
            let slot = self.slot(resource);
            *slot = (*slot - other.get(resource)).max(0.0);
        }
    }

    /// Component-wise multiply. Negative and NaN factors count as zero.
    pub fn scaled(&self, factor: f64) -> ResourceProfile {
        let factor = if factor.is_nan() { 0.0 } else { factor.max(0.0) };
        Self {
            cpu: self.cpu * factor,
            memory_gb: self.memory_gb * factor,
            storage_gb: self.storage_gb * factor,
            network_gbps: self.network_gbps * factor,
        }
    }

    /// True iff every dimension of `self` covers the same dimension of `demand`.
    pub fn can_host(&self, demand: &ResourceProfile) -> bool {
        Resource::ALL
            .iter()
            .all(|&r| self.get(r) >= demand.get(r))
    }

    /// Copy with every dimension rounded to `digits` decimal places.
    pub fn rounded(&self, digits: i32) -> ResourceProfile {
        Self {
            cpu: round_to(self.cpu, digits),
            memory_gb: round_to(self.memory_gb, digits),
            storage_gb: round_to(self.storage_gb, digits),
            network_gbps: round_to(self.network_gbps, digits),
        }
    }
}

/// Round half away from zero to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}
