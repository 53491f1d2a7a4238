//! Per-run compiler state.
//!
//! One [`GenerationContext`] lives for exactly one compile. It owns the
//! router counter and the previous block id, so two compiles never see
//! each other's state.

use ipnet::Ipv4Net;
use tierplan_core::MAX_DHCP_AGENTS;

use crate::error::{DescriptorError, DescriptorResult};
use crate::password::NodePassword;

/// Router `/24`s run from third octet 3 to 254; 1 and 2 belong to the
/// control bundle and 255 to the MSP subnet.
pub const MAX_ROUTERS: u32 = 252;

/// Last-octet offsets derived from the DHCP agent count `D`.
///
/// The OSK range ends at `D + 11`. MSP addresses start at `D + 2`, then the
/// emulator controller sits `D` further on and the other services follow
/// one apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddresses {
    pub osk_max: u32,
    pub msp_min: u32,
    pub msp_sfemc: u32,
    pub msp_clmc: u32,
    pub msp_moose: u32,
    pub msp_frontend: u32,
    pub msp_nm: u32,
}

impl DerivedAddresses {
    /// `None` when the count would push an address past the last octet.
    pub fn from_dhcp_agents(dhcp_agents: u32) -> Option<Self> {
        if dhcp_agents > MAX_DHCP_AGENTS {
            return None;
        }
        let msp_min = dhcp_agents + 2;
        let msp_sfemc = msp_min + dhcp_agents;
        Some(Self {
            osk_max: dhcp_agents + 11,
            msp_min,
            msp_sfemc,
            msp_clmc: msp_sfemc + 1,
            msp_moose: msp_sfemc + 2,
            msp_frontend: msp_sfemc + 3,
            msp_nm: msp_sfemc + 4,
        })
    }
}

#[derive(Debug)]
pub struct GenerationContext {
    /// First two octets of the configured CIDR, with trailing dot: `"10.20."`.
    pub lan_prefix: String,
    pub addresses: DerivedAddresses,
    pub password: NodePassword,
    sr_count: u32,
    prev_block: Option<String>,
}

impl GenerationContext {
    pub fn new(cidr: &Ipv4Net, dhcp_agents: u32, password: NodePassword) -> DescriptorResult<Self> {
        let addresses = DerivedAddresses::from_dhcp_agents(dhcp_agents).ok_or(
            DescriptorError::DhcpAgentsOutOfRange {
                value: dhcp_agents,
                max: MAX_DHCP_AGENTS,
            },
        )?;
        let [a, b, _, _] = cidr.addr().octets();
        Ok(Self {
            lan_prefix: format!("{a}.{b}."),
            addresses,
            password,
            sr_count: 0,
            prev_block: None,
        })
    }

    /// Claim the next router `/24`; returns its third octet. Callers check
    /// the total against [`MAX_ROUTERS`] up front.
    pub fn next_sr_octet(&mut self) -> u32 {
        self.sr_count += 1;
        self.sr_count + 2
    }

    pub fn sr_count(&self) -> u32 {
        self.sr_count
    }

    /// Record `id` as the latest block and return the one before it.
    pub fn chain(&mut self, id: &str) -> Option<String> {
        self.prev_block.replace(id.to_string())
    }

    /// `{prefix}{suffix}`, e.g. `lan("1.1")` → `"10.20.1.1"`.
    pub fn lan(&self, suffix: impl std::fmt::Display) -> String {
        format!("{}{suffix}", self.lan_prefix)
    }

    /// An address in the MSP subnet: `{prefix}255.{octet}`.
    pub fn msp(&self, octet: u32) -> String {
        self.lan(format_args!("255.{octet}"))
    }
}
