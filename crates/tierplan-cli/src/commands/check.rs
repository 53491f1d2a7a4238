use std::path::Path;

use anyhow::Context;
use tierplan_core::QuotaLimits;
use tierplan_placement::{Assessment, assess};

pub fn check(input: &str, quotas: Option<&str>, format: &str) -> anyhow::Result<()> {
    let (mut store, _) = super::load(input)?;
    let limits = quotas
        .map(|p| {
            QuotaLimits::from_file(Path::new(p))
                .with_context(|| format!("failed to read quota limits {p}"))
        })
        .transpose()?;
    let assessment = assess(&mut store, limits.as_ref());

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&assessment)?),
        _ => print!("{}", format_assessment(&assessment, limits.is_some())),
    }

    if !assessment.is_clean() {
        anyhow::bail!("{} advisories found", assessment.advisories.len());
    }
    Ok(())
}

pub fn format_assessment(assessment: &Assessment, quotas_checked: bool) -> String {
    let mut out = String::new();
    if assessment.is_clean() {
        out.push_str("✓ No advisories\n");
    } else {
        out.push_str(&format!("Advisories ({}):\n", assessment.advisories.len()));
        for advisory in &assessment.advisories {
            out.push_str(&format!("  ✗ {advisory}\n"));
        }
    }
    if !quotas_checked {
        out.push_str("  (quotas not checked: no --quotas file given)\n");
    }
    out
}
