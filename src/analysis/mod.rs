/// Heuristic content analysis
///
/// Pure, deterministic functions over text. Everything in this module
/// runs without models or network access; the engine composes these
/// with the model-backed providers.

pub mod classify;
pub mod gate;
pub mod patterns;
pub mod signals;
pub mod tags;
