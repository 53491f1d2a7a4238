use tierplan_core::Tier;
use tierplan_placement::{Placement, QuotaRequirement, platform_resource_requirement};
use tierplan_state::{ComputeInfo, TopologyStore};

pub fn plan(input: &str, format: &str) -> anyhow::Result<()> {
    let (mut store, _) = super::load(input)?;
    let placement = tierplan_placement::plan(&mut store)?;
    let requirement = platform_resource_requirement(&store);

    match format {
        "json" => {
            let report = serde_json::json!({
                "placement": placement,
                "requirement": requirement,
                "compute_nodes": store.computes,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print!("{}", format_plan(&store, &placement, &requirement)),
    }
    Ok(())
}

/// What placement puts on a node, in template-block terms.
fn role(info: &ComputeInfo, single_dc: bool) -> String {
    match info.tier() {
        Tier::DataCentre if info.is_ctrl_host && single_dc => "control + sr + cluster".to_string(),
        Tier::DataCentre if info.is_ctrl_host => "control".to_string(),
        Tier::DataCentre | Tier::Edge => "sr + cluster".to_string(),
        Tier::FarEdge => format!("{} x (srpoa + sr + cluster)", info.access_count()),
        Tier::Mist => format!("{} x srpoa", info.access_count()),
    }
}

pub fn format_plan(
    store: &TopologyStore,
    placement: &Placement,
    requirement: &QuotaRequirement,
) -> String {
    let mut out = String::new();

    match placement.control_host.index() {
        Some(i) => {
            let host = &store.computes[i].node;
            out.push_str(&format!(
                "Control host: {} ({})\n",
                host.name, host.availability_zone
            ));
        }
        None => {
            let reason = placement
                .control_host
                .miss()
                .map(|m| m.to_string())
                .unwrap_or_default();
            out.push_str(&format!("Control host: none ({reason})\n"));
        }
    }
    out.push_str(&format!(
        "Data centres: {}\n\n",
        if placement.single_data_centre { "single" } else { "multiple" }
    ));

    out.push_str(&format!(
        "{:<16} {:<10} {:<12} {:<28} {}\n",
        "NODE", "ZONE", "TIER", "ROLE", "CLUSTER"
    ));
    for info in &store.computes {
        let cluster = if info.cluster_res.is_fully_populated() {
            info.cluster_res.to_string()
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "{:<16} {:<10} {:<12} {:<28} {}\n",
            info.name(),
            info.node.availability_zone,
            info.tier().as_str(),
            role(info, placement.single_data_centre),
            cluster,
        ));
    }

    out.push_str("\nPlatform requirement:\n");
    out.push_str(&format!("  cores:     {}\n", requirement.cores));
    out.push_str(&format!("  ram:       {} MB\n", requirement.ram));
    out.push_str(&format!("  instances: {}\n", requirement.instances));
    out.push_str(&format!("  ports:     {}\n", requirement.ports));
    out.push_str(&format!("  subnets:   {}\n", requirement.subnets));
    out
}
