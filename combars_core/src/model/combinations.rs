//! Enumeration of valid hypothesis combinations
//!
//! A [`Combinations`] engine owns a model definition, collects its registered
//! extension hypotheses, and enumerates every subset of them that respects
//! the configured mutual-exclusivity constraints. Each subset is a
//! "topology", identified by its position in enumeration order: subsets are
//! generated by increasing size and, within a size, in ascending index-tuple
//! order, so topology 0 is always the core-only model. The engine is pure:
//! selecting and rendering a topology never mutates shared state.

use std::fmt::{Display, Formatter};
use std::ops::Index;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::assembly::{self, AssemblyError};
use crate::model::definition::ModelDefinition;
use crate::model::extension::HypothesisExtension;
use crate::model::parameters::{self, ParameterValue};
use crate::utils::text;

/// One combination of active extension hypotheses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Ascending indices into the registration list
    members: Vec<usize>,
}

impl Topology {
    fn new(members: Vec<usize>) -> Self {
        Topology { members }
    }

    /// Extension indices active in this topology, ascending
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Whether the extension at `index` is active
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// The core-only topology with no active extensions
    pub fn is_core_only(&self) -> bool {
        self.members.is_empty()
    }
}

/// Materialized snapshot of every topology, independent of the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopologyCatalog {
    pub entries: Vec<TopologyEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopologyEntry {
    /// Position in enumeration order
    pub index: usize,
    /// `Null` for the core-only topology, otherwise the hypothesis names
    /// joined with `__`
    pub label: String,
    /// Ascending extension indices active in this topology
    pub members: Vec<usize>,
}

/// Enumerates and renders every valid extension combination of a model
pub struct Combinations<D: ModelDefinition> {
    definition: D,
    extensions: IndexMap<usize, HypothesisExtension>,
    hypothesis_names: IndexMap<usize, String>,
    topologies: Vec<Topology>,
}

impl<D: ModelDefinition> Combinations<D> {
    /// Build the engine with no mutual-exclusivity constraints
    pub fn new(definition: D) -> Result<Self, CombinationsError> {
        Self::with_exclusions(definition, &[])
    }

    /// Build the engine, excluding every combination in which both members
    /// of any pair are active
    ///
    /// Each pair entry names two registered extensions; a name matches the
    /// extension whose rendered reaction line starts with it. Construction
    /// fails when a name matches no extension or several, when both names of
    /// a pair resolve to the same extension, or when a `replace` extension
    /// targets a reaction absent from the core reaction block.
    pub fn with_exclusions(
        definition: D,
        mutually_exclusive: &[(&str, &str)],
    ) -> Result<Self, CombinationsError> {
        let mut extensions = IndexMap::new();
        let mut hypothesis_names = IndexMap::new();
        for (index, registration) in definition.hypotheses().into_iter().enumerate() {
            extensions.insert(index, registration.extension);
            hypothesis_names.insert(index, registration.hypothesis);
        }

        let reaction_names = text::block_identifiers(&definition.reactions());
        for extension in extensions.values() {
            if let Some(target) = extension.to_replace.as_deref() {
                if !reaction_names.iter().any(|name| name == target) {
                    return Err(CombinationsError::UnknownReplaceTarget {
                        extension: extension.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        let exclusive_indices = resolve_exclusions(&extensions, mutually_exclusive)?;
        let topologies = enumerate_topologies(extensions.len(), &exclusive_indices);
        debug!(
            extensions = extensions.len(),
            exclusions = exclusive_indices.len(),
            topologies = topologies.len(),
            "enumerated hypothesis combinations"
        );

        Ok(Combinations {
            definition,
            extensions,
            hypothesis_names,
            topologies,
        })
    }

    /// Number of valid topologies; at least 1 (the core-only model)
    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    /// Registered extensions, keyed by registration index
    pub fn extensions(&self) -> &IndexMap<usize, HypothesisExtension> {
        &self.extensions
    }

    pub fn get(&self, index: usize) -> Option<&Topology> {
        self.topologies.get(index)
    }

    /// Topologies in enumeration order, paired with their indices
    pub fn topologies(&self) -> impl Iterator<Item = (usize, &Topology)> {
        self.topologies.iter().enumerate()
    }

    /// Names of the hypotheses active in topology `index`, in index order
    pub fn hypothesis_names(&self, index: usize) -> Result<Vec<String>, CombinationsError> {
        let topology = self.checked(index)?;
        Ok(topology
            .members()
            .iter()
            .filter_map(|member| self.hypothesis_names.get(member).cloned())
            .collect())
    }

    /// Human readable label of topology `index`
    ///
    /// The core-only topology is labelled `Null`; every other topology joins
    /// its hypothesis names with `__`.
    pub fn label(&self, index: usize) -> Result<String, CombinationsError> {
        let names = self.hypothesis_names(index)?;
        if names.is_empty() {
            Ok("Null".to_string())
        } else {
            Ok(names.join("__"))
        }
    }

    /// Render the complete Antimony model for topology `index`
    pub fn model(&self, index: usize) -> Result<String, CombinationsError> {
        let topology = self.checked(index)?;
        let active = self.active_extensions(topology);
        Ok(assembly::render_model(&self.definition, index, &active)?)
    }

    /// Render topology `index` with a caller-supplied parameter block, e.g.
    /// a fitted parameter set
    pub fn model_with_parameters(
        &self,
        index: usize,
        parameter_block: &str,
    ) -> Result<String, CombinationsError> {
        let topology = self.checked(index)?;
        let active = self.active_extensions(topology);
        Ok(assembly::render_model_with(
            &self.definition,
            index,
            &active,
            parameter_block,
        )?)
    }

    /// Reaction names of the core reaction block, in declaration order
    pub fn reaction_names(&self) -> Vec<String> {
        text::block_identifiers(&self.definition.reactions())
    }

    /// Parameter names declared in the parameter block, in declaration order
    pub fn parameter_names(&self) -> Vec<String> {
        text::block_identifiers(&self.definition.parameters())
    }

    /// The definition's default parameter set as an ordered map
    pub fn default_parameters(&self) -> IndexMap<String, ParameterValue> {
        parameters::parse_parameter_block(&self.definition.parameters())
    }

    /// Materialize every topology into an independent catalog
    pub fn catalog(&self) -> TopologyCatalog {
        let entries = self
            .topologies
            .iter()
            .enumerate()
            .map(|(index, topology)| TopologyEntry {
                index,
                // Index is always in range here
                label: self.label(index).unwrap_or_else(|_| "Null".to_string()),
                members: topology.members().to_vec(),
            })
            .collect();
        TopologyCatalog { entries }
    }

    fn checked(&self, index: usize) -> Result<&Topology, CombinationsError> {
        self.topologies
            .get(index)
            .ok_or(CombinationsError::TopologyOutOfRange {
                index,
                len: self.topologies.len(),
            })
    }

    fn active_extensions(&self, topology: &Topology) -> Vec<&HypothesisExtension> {
        self.extensions
            .iter()
            .filter(|(index, _)| topology.contains(**index))
            .map(|(_, extension)| extension)
            .collect()
    }
}

impl<D: ModelDefinition> Index<usize> for Combinations<D> {
    type Output = Topology;

    fn index(&self, index: usize) -> &Topology {
        &self.topologies[index]
    }
}

impl<D: ModelDefinition> Display for Combinations<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({} topologies)",
            self.definition.name(),
            self.topologies.len()
        )
    }
}

/// Resolve each exclusivity name pair to a pair of extension indices
fn resolve_exclusions(
    extensions: &IndexMap<usize, HypothesisExtension>,
    pairs: &[(&str, &str)],
) -> Result<Vec<(usize, usize)>, CombinationsError> {
    let mut resolved = Vec::with_capacity(pairs.len());
    for (first, second) in pairs {
        let first_index = resolve_exclusion_name(extensions, first)?;
        let second_index = resolve_exclusion_name(extensions, second)?;
        if first_index == second_index {
            return Err(CombinationsError::DegenerateExclusivity {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
        resolved.push((first_index, second_index));
    }
    Ok(resolved)
}

fn resolve_exclusion_name(
    extensions: &IndexMap<usize, HypothesisExtension>,
    name: &str,
) -> Result<usize, CombinationsError> {
    let matches: Vec<usize> = extensions
        .iter()
        .filter(|(_, extension)| extension.to_string().starts_with(name))
        .map(|(index, _)| *index)
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(CombinationsError::UnresolvedExclusivity {
            name: name.to_string(),
        }),
        _ => Err(CombinationsError::AmbiguousExclusivity {
            name: name.to_string(),
        }),
    }
}

/// All subsets of `0..count`, by increasing size then ascending index tuple,
/// retaining only subsets in which no exclusivity pair is fully contained
fn enumerate_topologies(count: usize, exclusive: &[(usize, usize)]) -> Vec<Topology> {
    let mut subsets: Vec<Vec<usize>> = Vec::new();
    for size in 0..=count {
        let mut current = Vec::with_capacity(size);
        push_subsets_of_size(count, size, 0, &mut current, &mut subsets);
    }
    subsets
        .into_iter()
        .filter(|subset| {
            exclusive
                .iter()
                .all(|(first, second)| !(subset.contains(first) && subset.contains(second)))
        })
        .map(Topology::new)
        .collect()
}

fn push_subsets_of_size(
    count: usize,
    size: usize,
    start: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if current.len() == size {
        out.push(current.clone());
        return;
    }
    for index in start..count {
        current.push(index);
        push_subsets_of_size(count, size, index + 1, current, out);
        current.pop();
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CombinationsError {
    #[error("mutually exclusive reaction \"{name}\" does not match any registered extension")]
    UnresolvedExclusivity { name: String },
    #[error("mutually exclusive reaction \"{name}\" matches more than one registered extension")]
    AmbiguousExclusivity { name: String },
    #[error("mutually exclusive pair (\"{first}\", \"{second}\") resolves to a single extension")]
    DegenerateExclusivity { first: String, second: String },
    #[error("extension \"{extension}\" replaces \"{target}\", which is not a core reaction")]
    UnknownReplaceTarget { extension: String, target: String },
    #[error("topology index {index} is out of range for {len} topologies")]
    TopologyOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
