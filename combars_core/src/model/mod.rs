//! Module providing the model definition surface and the combination engine.

pub mod assembly;
pub mod combinations;
pub mod definition;
pub mod extension;
pub mod parameters;
