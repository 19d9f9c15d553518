//! Merging extension reactions into the core reaction block and rendering
//! complete Antimony documents
//!
//! Two merge mechanisms exist. An `additive` extension is appended after the
//! core reactions. A `replace` extension substitutes the core reaction named
//! by its `to_replace` target. After the reaction block is assembled, global
//! parameters that no reaction references are pruned from the parameter
//! block so each topology carries a minimal parameter set.

use thiserror::Error;
use tracing::{debug, trace};

use crate::configuration::CONFIGURATION;
use crate::model::definition::ModelDefinition;
use crate::model::extension::{ExtensionMode, HypothesisExtension};
use crate::utils::text;

/// Merge the active extensions into the core reaction block
///
/// Core lines whose reaction name matches an active `replace` target are
/// substituted by the extension's rendered reaction; comment and blank lines
/// pass through unchanged. Active `additive` extensions are appended after
/// all core lines, in enumeration-index order.
pub fn assemble_reactions(
    core_reactions: &str,
    active: &[&HypothesisExtension],
) -> Result<String, AssemblyError> {
    let mut targets: Vec<&str> = Vec::new();
    for extension in active {
        if let Some(target) = extension.to_replace.as_deref() {
            if targets.contains(&target) {
                return Err(AssemblyError::AmbiguousReplacement {
                    target: target.to_string(),
                });
            }
            targets.push(target);
        }
    }

    let indent = CONFIGURATION.read().unwrap().reaction_indent.clone();
    let mut assembled = String::new();
    for line in core_reactions.lines() {
        let line = line.trim();
        if line.is_empty() {
            assembled.push('\n');
            continue;
        }
        match text::leading_identifier(line) {
            // Comments and other lines with no reaction name
            None => {
                assembled.push_str(&indent);
                assembled.push_str(line);
                assembled.push('\n');
            }
            Some(name) => {
                let replacement = active
                    .iter()
                    .find(|extension| extension.to_replace.as_deref() == Some(name));
                assembled.push_str(&indent);
                match replacement {
                    Some(extension) => assembled.push_str(&extension.to_string()),
                    None => assembled.push_str(line),
                }
                assembled.push('\n');
            }
        }
    }

    for extension in active {
        if extension.mode == ExtensionMode::Additive {
            assembled.push_str(&indent);
            assembled.push_str(&extension.to_string());
            assembled.push('\n');
        }
    }
    Ok(assembled)
}

/// Render the complete Antimony document for one topology
pub fn render_model<D: ModelDefinition>(
    definition: &D,
    topology_index: usize,
    active: &[&HypothesisExtension],
) -> Result<String, AssemblyError> {
    render_model_with(definition, topology_index, active, &definition.parameters())
}

/// Render with a caller-supplied parameter block in place of the definition's
/// defaults, e.g. a fitted parameter set
pub fn render_model_with<D: ModelDefinition>(
    definition: &D,
    topology_index: usize,
    active: &[&HypothesisExtension],
    parameter_block: &str,
) -> Result<String, AssemblyError> {
    let reactions = assemble_reactions(&definition.reactions(), active)?;
    debug!(
        model = definition.name(),
        topology = topology_index,
        active = active.len(),
        "rendering model"
    );

    let mut document = String::new();
    if let Some(functions) = definition.functions() {
        push_block(&mut document, &functions);
    }
    push_block(
        &mut document,
        &format!("model {}Topology{}", definition.name(), topology_index),
    );
    push_block(&mut document, &definition.variables());
    push_block(&mut document, &reactions);
    push_block(&mut document, &prune_parameters(parameter_block, &reactions));
    if let Some(events) = definition.events() {
        push_block(&mut document, &events);
    }
    if let Some(units) = definition.units() {
        push_block(&mut document, &units);
    }
    document.push_str("end\n");
    Ok(document)
}

/// Drop parameter declarations that no assembled reaction references
///
/// A declaration survives when its name occurs in the reaction block as a
/// whole word, or when it is on the configured retained allowlist. Lines
/// without a leading identifier pass through unchanged.
fn prune_parameters(parameter_block: &str, reaction_block: &str) -> String {
    let retained = CONFIGURATION.read().unwrap().retained_parameters.clone();
    let mut kept = String::new();
    for line in parameter_block.lines() {
        if let Some(name) = text::leading_identifier(line) {
            let on_allowlist = retained.iter().any(|keep| keep == name);
            if !on_allowlist && !text::contains_word(reaction_block, name) {
                trace!(parameter = name, "pruning parameter unused by this topology");
                continue;
            }
        }
        kept.push_str(line);
        kept.push('\n');
    }
    kept
}

fn push_block(document: &mut String, block: &str) {
    document.push_str(block);
    if !block.ends_with('\n') {
        document.push('\n');
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum AssemblyError {
    /// Two active extensions both replace the same core reaction
    #[error("more than one active extension replaces core reaction \"{target}\"")]
    AmbiguousReplacement { target: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::extension::HypothesisExtensionBuilder;
    use pretty_assertions::assert_eq;

    /// Linear three step pathway with one replaceable step
    struct SimplePathway;

    impl ModelDefinition for SimplePathway {
        fn name(&self) -> &str {
            "SimplePathway"
        }

        fn variables(&self) -> String {
            "compartment Cell = 1.0\nvar A in Cell\nvar B in Cell\nvar C in Cell\nvar D in Cell"
                .to_string()
        }

        fn reactions(&self) -> String {
            "R1: A => B; k1*A;\nR2: B => C; k2*B;\nR3: C => D; k3*C;".to_string()
        }

        fn parameters(&self) -> String {
            "k1 = 1;\nk2 = 1;\nk3 = 1;\nk4 = 1;".to_string()
        }
    }

    fn replacement_extension() -> HypothesisExtension {
        HypothesisExtensionBuilder::default()
            .name("Ext1".to_string())
            .reaction("C => D".to_string())
            .rate_law("k4*C".to_string())
            .mode(ExtensionMode::Replace)
            .to_replace(Some("R3".to_string()))
            .build()
            .unwrap()
    }

    fn additive_extension(name: &str, rate_law: &str) -> HypothesisExtension {
        HypothesisExtensionBuilder::default()
            .name(name.to_string())
            .reaction("A => B".to_string())
            .rate_law(rate_law.to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn replacement_substitutes_target_line() {
        let extension = replacement_extension();
        let assembled =
            assemble_reactions(&SimplePathway.reactions(), &[&extension]).unwrap();
        assert!(assembled.contains("Ext1: C => D; k4*C"));
        assert!(!assembled.contains("k3*C"));
        // Untouched core reactions pass through
        assert!(assembled.contains("R1: A => B; k1*A;"));
        assert!(assembled.contains("R2: B => C; k2*B;"));
    }

    #[test]
    fn additive_extensions_appended_in_index_order() {
        let first = additive_extension("ExtA", "k4*A");
        let second = additive_extension("ExtB", "k5*A");
        let assembled =
            assemble_reactions(&SimplePathway.reactions(), &[&first, &second]).unwrap();
        let lines: Vec<&str> = assembled.lines().collect();
        assert_eq!(lines[lines.len() - 2].trim(), "ExtA: A => B; k4*A");
        assert_eq!(lines[lines.len() - 1].trim(), "ExtB: A => B; k5*A");
    }

    #[test]
    fn comments_and_blank_lines_pass_through() {
        let core = "//TGFb module\nR1: A => B; k1*A;\n\nR2: B => C; k2*B;";
        let assembled = assemble_reactions(core, &[]).unwrap();
        assert!(assembled.contains("//TGFb module"));
        assert_eq!(assembled.lines().count(), 4);
    }

    #[test]
    fn duplicate_replacement_target_rejected() {
        let first = replacement_extension();
        let mut second = replacement_extension();
        second.name = "Ext2".to_string();
        let result = assemble_reactions(&SimplePathway.reactions(), &[&first, &second]);
        assert_eq!(
            result,
            Err(AssemblyError::AmbiguousReplacement {
                target: "R3".to_string()
            })
        );
    }

    #[test]
    fn unused_parameters_pruned_from_rendered_model() {
        // Core-only model never references k4
        let core_only = render_model(&SimplePathway, 0, &[]).unwrap();
        assert!(core_only.contains("k3 = 1;"));
        assert!(!core_only.contains("k4 = 1;"));

        // With the replacement active, k4 is used and k3 is not
        let extension = replacement_extension();
        let replaced = render_model(&SimplePathway, 1, &[&extension]).unwrap();
        assert!(replaced.contains("k4 = 1;"));
        assert!(!replaced.contains("k3 = 1;"));
    }

    #[test]
    fn pruning_matches_whole_words_only() {
        struct Boundary;
        impl ModelDefinition for Boundary {
            fn name(&self) -> &str {
                "Boundary"
            }
            fn variables(&self) -> String {
                "var A in Cell".to_string()
            }
            fn reactions(&self) -> String {
                "R1: A => ; k10*A;".to_string()
            }
            fn parameters(&self) -> String {
                "k1 = 1;\nk10 = 2;".to_string()
            }
        }
        let rendered = render_model(&Boundary, 0, &[]).unwrap();
        assert!(rendered.contains("k10 = 2;"));
        assert!(!rendered.contains("k1 = 1;"));
    }

    #[test]
    fn allowlisted_parameters_survive_pruning() {
        struct WithIndicator;
        impl ModelDefinition for WithIndicator {
            fn name(&self) -> &str {
                "WithIndicator"
            }
            fn variables(&self) -> String {
                "compartment Cell = 1.0\nvar A in Cell".to_string()
            }
            fn reactions(&self) -> String {
                "R1: A => ; k1*A;".to_string()
            }
            fn parameters(&self) -> String {
                "k1 = 1;\nCell = 1.0;\nExperimentIndicator = 0;".to_string()
            }
        }
        let rendered = render_model(&WithIndicator, 0, &[]).unwrap();
        assert!(rendered.contains("Cell = 1.0;"));
        assert!(rendered.contains("ExperimentIndicator = 0;"));
    }

    #[test]
    fn document_sections_render_in_fixed_order() {
        struct Full;
        impl ModelDefinition for Full {
            fn name(&self) -> &str {
                "Full"
            }
            fn variables(&self) -> String {
                "var A in Cell".to_string()
            }
            fn reactions(&self) -> String {
                "R1: A => ; k1*A;".to_string()
            }
            fn parameters(&self) -> String {
                "k1 = 1;".to_string()
            }
            fn functions(&self) -> Option<String> {
                Some("function MA1(k, S)\n    k * S\nend".to_string())
            }
            fn events(&self) -> Option<String> {
                Some("E1: at (time>10): A=0;".to_string())
            }
            fn units(&self) -> Option<String> {
                Some("unit volume = 1 litre;".to_string())
            }
        }
        let rendered = render_model(&Full, 0, &[]).unwrap();
        let function_at = rendered.find("function MA1").unwrap();
        let header_at = rendered.find("model FullTopology0").unwrap();
        let variables_at = rendered.find("var A in Cell").unwrap();
        let reactions_at = rendered.find("R1: A =>").unwrap();
        let parameters_at = rendered.find("k1 = 1;").unwrap();
        let events_at = rendered.find("E1: at").unwrap();
        let units_at = rendered.find("unit volume").unwrap();
        assert!(function_at < header_at);
        assert!(header_at < variables_at);
        assert!(variables_at < reactions_at);
        assert!(reactions_at < parameters_at);
        assert!(parameters_at < events_at);
        assert!(events_at < units_at);
        assert!(rendered.ends_with("end\n"));
    }

    #[test]
    fn caller_supplied_parameters_replace_defaults() {
        let rendered =
            render_model_with(&SimplePathway, 0, &[], "k1 = 9.5;\nk2 = 0.25;\nk3 = 4;")
                .unwrap();
        assert!(rendered.contains("k1 = 9.5;"));
        assert!(!rendered.contains("k1 = 1;"));
    }
}
