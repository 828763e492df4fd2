//! Dependency-aware deployment plans.
//!
//! A plan is an ordered list of upload and instantiate steps. Steps name the
//! earlier steps whose artifacts they need; instantiate messages are built
//! from those resolved artifacts, so one contract's address can feed
//! another's init message.

use std::{collections::BTreeMap, path::PathBuf};

use chain_common::artifacts::Artifact;
use itertools::Itertools;
use serde_json::Value;

use crate::errors::ScriptError;

/// Artifacts resolved for a step's dependencies, keyed by step name
pub type ResolvedDeps = BTreeMap<String, Artifact>;

/// Builds a step's message from its resolved dependencies
pub type MessageBuilder = Box<dyn Fn(&ResolvedDeps) -> Result<Value, ScriptError> + Send + Sync>;

/// What a deployment step does when it runs
pub enum StepKind {
    /// Upload a wasm blob, producing a code id artifact
    Upload {
        /// Path to the contract's wasm binary
        wasm_path: PathBuf,
    },
    /// Instantiate an uploaded code, producing an address artifact
    Instantiate {
        /// Name of the upload step whose code id to instantiate
        code_id_from: String,
        /// Builds the init message from resolved dependencies
        init_msg: MessageBuilder,
    },
}

/// A single step of a deployment plan
pub struct DeploymentStep {
    /// The step's name; doubles as the artifact's logical name in the store
    pub name: String,
    /// What the step does
    pub kind: StepKind,
    /// Names of the steps whose artifacts this step needs
    pub depends_on: Vec<String>,
}

impl DeploymentStep {
    /// Creates an upload step for the wasm binary at the given path
    pub fn upload(name: &str, wasm_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            kind: StepKind::Upload { wasm_path: wasm_path.into() },
            depends_on: Vec::new(),
        }
    }

    /// Creates an instantiate step for the code uploaded by `code_id_from`.
    ///
    /// The upload step is always a dependency; `also_depends_on` lists any
    /// further steps whose artifacts the init message needs.
    pub fn instantiate(
        name: &str,
        code_id_from: &str,
        also_depends_on: &[&str],
        init_msg: impl Fn(&ResolvedDeps) -> Result<Value, ScriptError> + Send + Sync + 'static,
    ) -> Self {
        let mut depends_on = vec![code_id_from.to_string()];
        depends_on.extend(also_depends_on.iter().map(|dep| dep.to_string()));

        Self {
            name: name.to_string(),
            kind: StepKind::Instantiate {
                code_id_from: code_id_from.to_string(),
                init_msg: Box::new(init_msg),
            },
            depends_on,
        }
    }
}

/// An ordered, dependency-aware list of deployment steps
pub struct DeploymentPlan {
    /// The plan's steps, in declaration order
    steps: Vec<DeploymentStep>,
}

impl DeploymentPlan {
    /// Creates a plan from the given steps
    pub fn new(steps: Vec<DeploymentStep>) -> Self {
        Self { steps }
    }

    /// Returns the plan's steps in a topological order of their
    /// dependencies, breaking ties by declaration order.
    ///
    /// Fails with [`ScriptError::UnresolvedDependency`] if a step names an
    /// unknown or duplicate dependency, or if the plan contains a cycle.
    pub fn topological_order(&self) -> Result<Vec<&DeploymentStep>, ScriptError> {
        let index_by_name: BTreeMap<&str, usize> = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| (step.name.as_str(), i))
            .collect();
        if index_by_name.len() != self.steps.len() {
            return Err(ScriptError::UnresolvedDependency(
                "plan contains duplicate step names".to_string(),
            ));
        }

        let mut indegree = vec![0usize; self.steps.len()];
        let mut dependents = vec![Vec::new(); self.steps.len()];
        for (i, step) in self.steps.iter().enumerate() {
            for dep in &step.depends_on {
                let j = *index_by_name.get(dep.as_str()).ok_or_else(|| {
                    ScriptError::UnresolvedDependency(format!(
                        "step '{}' depends on unknown step '{}'",
                        step.name, dep
                    ))
                })?;
                indegree[i] += 1;
                dependents[j].push(i);
            }
        }

        // Kahn's algorithm, always taking the lowest-index ready step so
        // ties fall back to declaration order
        let mut ready: std::collections::BTreeSet<usize> = indegree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(i, _)| i)
            .collect();
        let mut order = Vec::with_capacity(self.steps.len());
        while let Some(&i) = ready.iter().next() {
            ready.remove(&i);
            order.push(i);
            for &dependent in &dependents[i] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < self.steps.len() {
            let stuck = self
                .steps
                .iter()
                .enumerate()
                .filter(|(i, _)| !order.contains(i))
                .map(|(_, step)| step.name.as_str())
                .join(", ");
            return Err(ScriptError::UnresolvedDependency(format!(
                "plan contains a dependency cycle involving: {}",
                stuck
            )));
        }

        Ok(order.into_iter().map(|i| &self.steps[i]).collect())
    }
}
