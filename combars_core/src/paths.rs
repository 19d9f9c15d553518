//! Deterministic output directory layout for model selection runs
//!
//! Every topology gets its own directory under `ModelSelection/`, each fit
//! attempt a directory below that, and plot categories below the fit. Paths
//! are a pure function of (base directory, topology index, fit index);
//! directories are created on first access and creation is idempotent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::configuration::CONFIGURATION;

/// Directory layout rooted at a caller-supplied base directory
#[derive(Clone, Debug)]
pub struct OutputLayout {
    base: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(base: P) -> io::Result<Self> {
        let base = base.as_ref().to_path_buf();
        ensure_dir(&base)?;
        Ok(OutputLayout { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn model_selection_dir(&self) -> io::Result<PathBuf> {
        let dirname = CONFIGURATION.read().unwrap().model_selection_dirname.clone();
        let dir = self.base.join(dirname);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn topology_dir(&self, topology: usize) -> io::Result<PathBuf> {
        let dir = self
            .model_selection_dir()?
            .join(format!("Topology{}", topology));
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn fit_dir(&self, topology: usize, fit: usize) -> io::Result<PathBuf> {
        let dir = self.topology_dir(topology)?.join(format!("Fit{}", fit));
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn graphs_dir(&self, topology: usize, fit: usize) -> io::Result<PathBuf> {
        let dir = self.fit_dir(topology, fit)?.join("Graphs");
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn time_course_dir(&self, topology: usize, fit: usize) -> io::Result<PathBuf> {
        let dir = self.graphs_dir(topology, fit)?.join("TimeCourseSimulations");
        ensure_dir(&dir)?;
        Ok(dir)
    }

    /// Path of the rendered model file for one fit of one topology
    pub fn model_file(&self, topology: usize, fit: usize) -> io::Result<PathBuf> {
        Ok(self
            .fit_dir(topology, fit)?
            .join(format!("topology{}.ant", topology)))
    }
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        debug!(directory = %dir.display(), "creating output directory");
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
