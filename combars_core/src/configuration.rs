use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Parameter names that are never pruned from a rendered model, even when
    /// no reaction references them (the compartment and the experiment
    /// indicator variable)
    pub retained_parameters: Vec<String>,
    /// Indentation prefix for lines emitted into the reaction block
    pub reaction_indent: String,
    /// Name of the directory holding all model selection output
    pub model_selection_dirname: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            retained_parameters: vec!["Cell".to_string(), "ExperimentIndicator".to_string()],
            reaction_indent: "\t\t".to_string(),
            model_selection_dirname: "ModelSelection".to_string(),
        }
    }
}
