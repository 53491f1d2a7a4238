//! Descriptor compiler: placed topology → HEAT template text.
//!
//! A single pass over the nodes in store order. Each node contributes
//! blocks according to its tier and placement role; every block depends on
//! the one emitted before it, so the whole document is one linear chain.

use tierplan_core::{FlavorRole, NetworkCategory, TemplateSettings, Tier};
use tierplan_placement::has_multiple_data_centres;
use tierplan_state::{ComputeInfo, TopologyStore};
use tracing::debug;

use crate::block::ResourceBlock;
use crate::context::{GenerationContext, MAX_ROUTERS};
use crate::error::{DescriptorError, DescriptorResult};
use crate::flavors::cluster_flavor_name;
use crate::password::NodePassword;

pub const HEAT_TEMPLATE_VERSION: &str = "2017-02-24";

const LAN_MASK: &str = "255.255.0.0";
const SR_MASK: &str = "255.255.255.0";

/// A compiled template and the blocks it was rendered from.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub text: String,
    pub blocks: Vec<ResourceBlock>,
}

impl Descriptor {
    pub fn block_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.id.as_str())
    }

    pub fn block(&self, id: &str) -> Option<&ResourceBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

/// Compile a placed store into a template.
///
/// Expects placement to have run: the control bundle goes to the node with
/// `is_ctrl_host` set. Output is fully determined by the store, the settings
/// and the password.
///
/// Fails before emitting anything when the DHCP agent count or the number of
/// routers would overflow the address plan.
pub fn compile(
    store: &TopologyStore,
    settings: &TemplateSettings,
    password: NodePassword,
) -> DescriptorResult<Descriptor> {
    let single_dc = !has_multiple_data_centres(store);
    let routers = router_count(store, single_dc);
    if routers > MAX_ROUTERS as usize {
        return Err(DescriptorError::TooManyRouters {
            routers,
            max: MAX_ROUTERS,
        });
    }

    let mut compiler = Compiler {
        store,
        settings,
        ctx: GenerationContext::new(&store.metadata.cidr, store.metadata.dhcp_agents, password)?,
        single_dc,
        blocks: Vec::new(),
    };
    for info in &store.computes {
        compiler.node(info);
    }

    let mut text = format!(
        "heat_template_version: {HEAT_TEMPLATE_VERSION}\n\ndescription: {}\n\nresources:\n",
        settings.description
    );
    for block in &compiler.blocks {
        block.render(&settings.template_dir, &mut text);
    }
    debug!(
        blocks = compiler.blocks.len(),
        routers = compiler.ctx.sr_count(),
        "descriptor compiled"
    );
    Ok(Descriptor {
        text,
        blocks: compiler.blocks,
    })
}

/// Router blocks the tier walk below will emit, each taking one `/24`.
fn router_count(store: &TopologyStore, single_dc: bool) -> usize {
    store
        .computes
        .iter()
        .map(|info| match info.tier() {
            Tier::DataCentre if info.is_ctrl_host && !single_dc => 0,
            Tier::DataCentre | Tier::Edge => 1,
            Tier::FarEdge => 2 * info.access_count(),
            Tier::Mist => info.access_count(),
        })
        .sum()
}

struct Compiler<'a> {
    store: &'a TopologyStore,
    settings: &'a TemplateSettings,
    ctx: GenerationContext,
    single_dc: bool,
    blocks: Vec<ResourceBlock>,
}

impl Compiler<'_> {
    fn node(&mut self, info: &ComputeInfo) {
        match info.tier() {
            Tier::DataCentre if info.is_ctrl_host => {
                self.control_bundle(info);
                if self.single_dc {
                    self.sr_cluster(info, 1);
                }
            }
            Tier::DataCentre | Tier::Edge => self.sr_cluster(info, 1),
            Tier::FarEdge => {
                let n = info.access_count();
                for seq in 1..=n {
                    self.sr_poa(info, seq);
                }
                for seq in 1..=n {
                    self.sr_cluster(info, seq);
                }
            }
            Tier::Mist => {
                for seq in 1..=info.access_count() {
                    self.sr_poa(info, seq);
                }
            }
        }
    }

    fn emit(&mut self, mut block: ResourceBlock) {
        block.depends_on = self.ctx.chain(&block.id);
        self.blocks.push(block);
    }

    // ── Shared property groups ─────────────────────────────────────

    fn security_group(&self, category: NetworkCategory) -> Option<&str> {
        self.store.security_group(category)
    }

    fn sdn_controller(&self) -> Option<&str> {
        self.store.infra_services.sdn_controller.as_deref()
    }

    /// The `/24` properties of one router subnet.
    fn sr_subnet(&self, block: ResourceBlock, octet: u32) -> ResourceBlock {
        let ctx = &self.ctx;
        block
            .prop("lan-sr-ip-prefix", ctx.lan(format_args!("{octet}.")))
            .prop("lan-sr-ip-base", ctx.lan(format_args!("{octet}.0")))
            .prop("lan-sr-ip-mask", SR_MASK)
            .prop("lan-sr-ip-osk-min", ctx.lan(format_args!("{octet}.2")))
            .prop("lan-sr-ip-osk-max", ctx.lan(format_args!("{octet}.{}", ctx.addresses.osk_max)))
    }

    // ── Control bundle ─────────────────────────────────────────────

    fn control_bundle(&mut self, info: &ComputeInfo) {
        let base = block_base(info);
        let zone = zone(info);
        let nets = &info.networks;
        let (store, settings) = (self.store, self.settings);
        let meta = &store.metadata;
        let keypair = settings.key_pair.as_str();
        let password = self.ctx.password.as_str().to_string();
        let addr = self.ctx.addresses;

        let id = format!("{base}-pce1-nm1-sr1-ps1");
        let block = ResourceBlock::new(&id, "stack-pce-nm-sr-ps.yaml")
            .opt("security-group-mgmt", self.security_group(NetworkCategory::Mgmt))
            .opt("security-group-sdnctrl", self.security_group(NetworkCategory::SdnCtrl))
            .opt("security-group-msp", self.security_group(NetworkCategory::Msp))
            .opt("security-group-wan", self.security_group(NetworkCategory::Wan))
            .prop("tmpl-name", &id)
            .prop("zone", &zone)
            .prop("pce-flavor", FlavorRole::Pce)
            .prop("nm-flavor", FlavorRole::Nm)
            .prop("sr-flavor", FlavorRole::Sr)
            .prop("ps-flavor", FlavorRole::Ps)
            .prop("base-key", keypair)
            .prop("node-passwd", &password)
            .literal("enable-ipv4-rules", self.store.metadata.enable_ipv4_rules)
            .opt("network-data", nets.first(NetworkCategory::Data))
            .opt("network-wan", nets.first(NetworkCategory::Wan))
            .opt("network-sdnctrl", nets.first(NetworkCategory::SdnCtrl))
            .opt("network-mgmt", nets.first(NetworkCategory::Mgmt))
            .opt("network-msp", nets.first(NetworkCategory::Msp))
            .opt("network-lan", nets.first(NetworkCategory::Ps))
            .prop("subnet-msp", &settings.msp_subnet)
            .literal("mtu", meta.mtu)
            .prop("lan-cidr", meta.cidr)
            .prop("lan-prefix", &self.ctx.lan_prefix)
            .prop("lan-dns-ip", self.ctx.lan("1.1"))
            .prop("lan-gw-ip", self.ctx.lan("1.1"))
            .opt("infra-sdn-controller-ip", self.sdn_controller())
            .opt("infra-dns-ip", store.infra_services.dns.as_deref())
            .prop("lan-dhcp-ip", self.ctx.lan("1.1"))
            .prop("lan-mask", LAN_MASK);
        let block = self
            .sr_subnet(block, 1)
            .prop("msp-ip-cidr", self.ctx.lan("255.0/24"))
            .prop("msp-ip-min", self.ctx.msp(addr.msp_min))
            .prop("msp-ip-max", self.ctx.lan("255.99"))
            .prop("msp-ip-nm", self.ctx.msp(addr.msp_nm))
            .prop("sfid-parent-domain", &meta.parent_domain);
        self.emit(block);

        let id = format!("{base}-sr2-clmc1-sfemc1");
        let block = ResourceBlock::new(&id, "stack-sr-clmc-sfemc.yaml")
            .opt("security-group-mgmt", self.security_group(NetworkCategory::Mgmt))
            .opt("security-group-sdnctrl", self.security_group(NetworkCategory::SdnCtrl))
            .opt("security-group-msp", self.security_group(NetworkCategory::Msp))
            .prop("tmpl-name", &id)
            .prop("zone", &zone)
            .prop("sr-flavor", FlavorRole::Sr)
            .prop("clmc-flavor", FlavorRole::Clmc)
            .prop("sfemc-flavor", FlavorRole::Sfemc)
            .prop("base-key", keypair)
            .prop("node-passwd", &password)
            .opt("network-data", nets.first(NetworkCategory::Data))
            .opt("network-sdnctrl", nets.first(NetworkCategory::SdnCtrl))
            .opt("network-mgmt", nets.first(NetworkCategory::Mgmt))
            .opt("network-msp", nets.first(NetworkCategory::Msp))
            .opt("network-lan", nets.first(NetworkCategory::ClmcSfemc))
            .literal("mtu", meta.mtu)
            .prop("lan-cidr", meta.cidr)
            .prop("lan-dns-ip", self.ctx.lan("1.1"))
            .prop("lan-gw-ip", self.ctx.lan("1.1"))
            .opt("infra-sdn-controller-ip", self.sdn_controller())
            .literal("enable-ipv4-rules", self.store.metadata.enable_ipv4_rules)
            .prop("lan-dhcp-ip", self.ctx.lan("1.1"));
        let block = self
            .sr_subnet(block, 2)
            .prop("msp-ip-sfemc", self.ctx.msp(addr.msp_sfemc))
            .prop("msp-ip-clmc", self.ctx.msp(addr.msp_clmc))
            .prop("sfid-parent-domain", &meta.parent_domain);
        self.emit(block);

        let id = format!("{base}-frontend1");
        let block = ResourceBlock::new(&id, "stack-frontend.yaml")
            .opt("security-group-sia", self.security_group(NetworkCategory::Sia))
            .opt("security-group-msp", self.security_group(NetworkCategory::Msp))
            .prop("name", &id)
            .prop("zone", &zone)
            .prop("flavor", FlavorRole::Frontend)
            .prop("base-key", keypair)
            .prop("node-passwd", &password)
            .opt("network-sia", nets.first(NetworkCategory::Sia))
            .opt("network-msp", nets.first(NetworkCategory::Msp))
            .opt("subnet-sia", store.subnet(NetworkCategory::Sia))
            .prop("subnet-msp", &settings.msp_subnet)
            .opt("sia-ip-frontend", meta.sia_ip_frontend.as_deref())
            .prop("msp-ip-sfemc", self.ctx.msp(addr.msp_sfemc))
            .prop("msp-ip-clmc", self.ctx.msp(addr.msp_clmc))
            .prop("msp-ip-moose", self.ctx.msp(addr.msp_moose))
            .prop("msp-ip-frontend", self.ctx.msp(addr.msp_frontend))
            .prop("msp-ip-nm", self.ctx.msp(addr.msp_nm));
        self.emit(block);

        let id = format!("{base}-moose1");
        let block = ResourceBlock::new(&id, "stack-moose.yaml")
            .opt("security-group-mgmt", self.security_group(NetworkCategory::Mgmt))
            .opt("security-group-sdnctrl", self.security_group(NetworkCategory::SdnCtrl))
            .opt("security-group-msp", self.security_group(NetworkCategory::Msp))
            .prop("name", &id)
            .prop("zone", &zone)
            .prop("flavor", FlavorRole::Moose)
            .prop("base-key", keypair)
            .prop("node-passwd", &password)
            .opt("infra-sdn-controller-ip", self.sdn_controller())
            .literal("enable-ipv4-rules", self.store.metadata.enable_ipv4_rules)
            .opt("network-data", nets.first(NetworkCategory::Data))
            .opt("network-sdnctrl", nets.first(NetworkCategory::SdnCtrl))
            .opt("network-mgmt", nets.first(NetworkCategory::Mgmt))
            .opt("network-msp", nets.first(NetworkCategory::Msp))
            .prop("msp-ip-moose", self.ctx.msp(addr.msp_moose))
            .literal("mtu", meta.mtu);
        self.emit(block);
    }

    // ── Routers ────────────────────────────────────────────────────

    fn sr_cluster(&mut self, info: &ComputeInfo, seq: usize) {
        let octet = self.ctx.next_sr_octet();
        let id = format!("{}-sr{seq}-cluster{seq}", block_base(info));
        let nets = &info.networks;
        let meta = &self.store.metadata;

        let block = ResourceBlock::new(&id, "stack-sr-cluster.yaml")
            .opt("security-group-mgmt", self.security_group(NetworkCategory::Mgmt))
            .opt("security-group-sdnctrl", self.security_group(NetworkCategory::SdnCtrl))
            .prop("tmpl-name", &id)
            .prop("zone", zone(info))
            .prop("sr-flavor", FlavorRole::Sr)
            .prop("cluster-flavor", cluster_flavor_name(&self.settings.cluster_flavor_prefix, info))
            .prop("base-key", &self.settings.key_pair)
            .prop("node-passwd", self.ctx.password.as_str())
            .opt("network-data", nets.first(NetworkCategory::Data))
            .opt("network-sdnctrl", nets.first(NetworkCategory::SdnCtrl))
            .opt("network-mgmt", nets.first(NetworkCategory::Mgmt))
            .opt("network-lan", nets.first(NetworkCategory::Cluster))
            .literal("mtu", meta.mtu)
            .prop("lan-cidr", meta.cidr)
            .prop("lan-dns-ip", self.ctx.lan("1.1"))
            .prop("lan-gw-ip", self.ctx.lan("1.1"))
            .opt("infra-sdn-controller-ip", self.sdn_controller())
            .literal("enable-ipv4-rules", self.store.metadata.enable_ipv4_rules)
            .prop("lan-dhcp-ip", self.ctx.lan("1.1"));
        let block = self
            .sr_subnet(block, octet)
            .prop("sfid-parent-domain", &meta.parent_domain);
        self.emit(block);
    }

    fn sr_poa(&mut self, info: &ComputeInfo, seq: usize) {
        let octet = self.ctx.next_sr_octet();
        let id = format!("{}-srpoa{seq}", block_base(info));
        let nets = &info.networks;
        let meta = &self.store.metadata;

        let block = ResourceBlock::new(&id, "stack-sr.yaml")
            .opt("security-group-mgmt", self.security_group(NetworkCategory::Mgmt))
            .opt("security-group-sdnctrl", self.security_group(NetworkCategory::SdnCtrl))
            .prop("tmpl-name", &id)
            .prop("zone", zone(info))
            .prop("sr-flavor", FlavorRole::Sr)
            .prop("base-key", &self.settings.key_pair)
            .prop("node-passwd", self.ctx.password.as_str())
            .opt("network-data", nets.first(NetworkCategory::Data))
            .opt("network-sdnctrl", nets.first(NetworkCategory::SdnCtrl))
            .opt("network-mgmt", nets.first(NetworkCategory::Mgmt))
            .opt("network-access", nets.access().get(seq - 1).map(String::as_str))
            .literal("mtu", meta.mtu)
            .prop("lan-cidr", meta.cidr)
            .prop("lan-dns-ip", self.ctx.lan("1.1"))
            .prop("lan-gw-ip", self.ctx.lan("1.1"))
            .opt("infra-sdn-controller-ip", self.sdn_controller())
            .prop("lan-dhcp-ip", self.ctx.lan("1.1"));
        let block = self
            .sr_subnet(block, octet)
            .prop("sfid-parent-domain", &meta.parent_domain)
            .literal("enable-ipv4-rules", self.store.metadata.enable_ipv4_rules);
        self.emit(block);
    }
}

/// `{name}-{availability_zone}`, the prefix of every block id on a node.
fn block_base(info: &ComputeInfo) -> String {
    format!("{}-{}", info.node.name, info.node.availability_zone)
}

fn zone(info: &ComputeInfo) -> String {
    format!("{}:{}", info.node.availability_zone, info.node.name)
}
