use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use combars_core::model::extension::{ExtensionMode, HypothesisExtensionBuilder};

#[pyclass]
struct PyHypothesisExtension {
    inner: combars_core::model::extension::HypothesisExtension,
}

#[pymethods]
impl PyHypothesisExtension {
    #[new]
    #[pyo3(signature = (name, reaction, rate_law, mode = "additive", to_replace = None))]
    fn new(
        name: String,
        reaction: String,
        rate_law: String,
        mode: &str,
        to_replace: Option<String>,
    ) -> PyResult<Self> {
        let mode: ExtensionMode = mode
            .parse()
            .map_err(|err| PyValueError::new_err(format!("{}", err)))?;
        let inner = HypothesisExtensionBuilder::default()
            .name(name)
            .reaction(reaction)
            .rate_law(rate_law)
            .mode(mode)
            .to_replace(to_replace)
            .build()
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(PyHypothesisExtension { inner })
    }

    fn get_name(&self) -> String {
        self.inner.name.clone()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyHypothesisExtension>()?;
    Ok(())
}
