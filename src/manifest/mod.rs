//! Rendered product manifests
//!
//! A [`Manifest`] is the YAML text Ops Manager renders for a staged product,
//! together with the runner that produced it. Instance group jobs are
//! located in the parsed YAML. Queries by path go through `bosh interpolate`,
//! the same tool operators use to inspect manifests, so path syntax
//! (`/instance_groups/name=redis/jobs/name=redis-server`) matches what they
//! already know.

use std::fmt;
use std::io::Write;

use crate::core::{HarnessError, Result};
use crate::runner::SharedRunner;

/// Program name of the BOSH CLI.
pub const BOSH_COMMAND: &str = "bosh";

/// Rendered manifest of a staged product.
#[derive(Clone)]
pub struct Manifest {
    content: String,
    runner: SharedRunner,
}

impl fmt::Debug for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manifest")
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

impl Manifest {
    /// Wraps YAML text and the runner used for later queries.
    pub fn new(content: impl Into<String>, runner: SharedRunner) -> Self {
        Self {
            content: content.into(),
            runner,
        }
    }

    /// The manifest as YAML text.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Parses the manifest into a YAML value tree.
    pub fn to_value(&self) -> Result<serde_yaml::Value> {
        serde_yaml::from_str(&self.content)
            .map_err(|e| HarnessError::protocol("Unable to parse manifest", e))
    }

    /// Returns the named job of the named instance group as its own manifest.
    ///
    /// Only the first group and the first job with a matching `name` are
    /// considered.
    pub fn find_instance_group_job(&self, instance_group: &str, job: &str) -> Result<Manifest> {
        let value = self.to_value()?;
        let group = find_named(&value["instance_groups"], instance_group).ok_or_else(|| {
            HarnessError::ManifestEntryNotFound {
                entry: format!("Instance group {instance_group:?}"),
            }
        })?;
        let job_value = find_named(&group["jobs"], job).ok_or_else(|| {
            HarnessError::ManifestEntryNotFound {
                entry: format!("Job {job:?} in instance group {instance_group:?}"),
            }
        })?;

        let content = serde_yaml::to_string(job_value)
            .map_err(|e| HarnessError::protocol("Unable to render manifest job", e))?;
        Ok(Self::new(content, self.runner.clone()))
    }

    /// Looks up `path` under the manifest's `properties` block.
    pub fn property(&self, path: &str) -> Result<serde_yaml::Value> {
        self.path(&format!("/properties/{}", path.trim_start_matches('/')))
    }

    /// Looks up an absolute `bosh interpolate` path.
    pub fn path(&self, path: &str) -> Result<serde_yaml::Value> {
        let output = self.interpolate(path)?;
        serde_yaml::from_str(&output).map_err(|e| {
            HarnessError::protocol(format!("Unable to parse manifest path {path:?}"), e)
        })
    }

    /// Runs `bosh interpolate` on a temporary copy of the manifest.
    fn interpolate(&self, path: &str) -> Result<String> {
        let context = format!("Unable to interpolate manifest path {path:?}");

        // Removed when `file` drops, on every return path.
        let mut file = tempfile::Builder::new()
            .prefix("manifest-")
            .suffix(".yml")
            .tempfile()
            .map_err(|e| HarnessError::io(&context, e))?;
        file.write_all(self.content.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| HarnessError::io(&context, e))?;

        let args = vec![
            "interpolate".to_string(),
            file.path().display().to_string(),
            "--path".to_string(),
            path.to_string(),
        ];
        let output = self
            .runner
            .run(BOSH_COMMAND, &args)
            .map_err(|e| HarnessError::external_tool(&context, e))?;
        Ok(output.stdout)
    }
}

fn find_named<'a>(items: &'a serde_yaml::Value, name: &str) -> Option<&'a serde_yaml::Value> {
    items
        .as_sequence()?
        .iter()
        .find(|item| item["name"].as_str() == Some(name))
}
