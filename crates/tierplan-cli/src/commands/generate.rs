use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tierplan_descriptor::NodePassword;
use tierplan_placement::assess;
use tierplan_state::ArtifactStore;
use tracing::{info, warn};

pub struct GenerateArgs<'a> {
    pub input: &'a str,
    pub output: &'a str,
    pub state: Option<&'a str>,
    pub password: Option<String>,
    pub force: bool,
}

pub fn generate(args: GenerateArgs<'_>) -> anyhow::Result<()> {
    let (mut store, settings) = super::load(args.input)?;

    let assessment = assess(&mut store.clone(), None);
    if !assessment.is_clean() {
        for advisory in &assessment.advisories {
            eprintln!("  ✗ {advisory}");
        }
        if !args.force {
            anyhow::bail!(
                "{} advisories found; fix the topology or rerun with --force",
                assessment.advisories.len()
            );
        }
        warn!(count = assessment.advisories.len(), "generating despite advisories");
    }

    let password = match args.password {
        Some(p) => NodePassword::new(p)?,
        None => NodePassword::generate(&mut rand::thread_rng()),
    };

    let output = Path::new(args.output);
    let lock = OutputLock::acquire(output)?;
    let generated = tierplan_descriptor::generate(&mut store, &settings, password.clone())?;
    lock.commit(generated.descriptor.text.as_bytes())?;

    if let Some(state) = args.state {
        let artifacts = ArtifactStore::open(Path::new(state))
            .with_context(|| format!("failed to open artifact store {state}"))?;
        artifacts.replace_cluster_flavors(&generated.cluster_flavors)?;
        artifacts.put_node_password(password.as_str())?;
        info!(state, flavors = generated.cluster_flavors.len(), "artifacts recorded");
    }

    println!("✓ Wrote {}", output.display());
    println!("  Resources: {}", generated.descriptor.blocks.len());
    for flavor in &generated.cluster_flavors {
        println!("  Cluster flavor: {} ({})", flavor.name, flavor.resources);
    }
    Ok(())
}

/// Guards an output path against concurrent generation.
///
/// A `<output>-temp` file is created exclusively; its existence means a
/// request is in flight. The template is written there and renamed over
/// the output on commit. Dropping an uncommitted lock removes the temp file.
struct OutputLock {
    temp: PathBuf,
    target: PathBuf,
    file: Option<File>,
    committed: bool,
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push("-temp");
    PathBuf::from(name)
}

impl OutputLock {
    fn acquire(target: &Path) -> anyhow::Result<Self> {
        let temp = temp_path(target);
        let file = match OpenOptions::new().write(true).create_new(true).open(&temp) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                anyhow::bail!("request already in progress ({} exists)", temp.display())
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to create {}", temp.display()));
            }
        };
        Ok(Self {
            temp,
            target: target.to_path_buf(),
            file: Some(file),
            committed: false,
        })
    }

    fn commit(mut self, contents: &[u8]) -> anyhow::Result<()> {
        let Some(mut file) = self.file.take() else {
            anyhow::bail!("output lock already released");
        };
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&self.temp, &self.target)
            .with_context(|| format!("failed to move template to {}", self.target.display()))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}
