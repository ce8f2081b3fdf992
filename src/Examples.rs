//! examples of usage of RustedSolids
/// exact and approximate volumes, pictures and task documents
pub mod revolution_examples;
