//! stacklogic (workspace facade crate).
//!
//! Re-exports the member crates under one name so binaries, integration
//! tests and benchmarks can use `stacklogic::{core,scores,input,term,types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use stacklogic_core as core;
pub use stacklogic_input as input;
pub use stacklogic_scores as scores;
pub use stacklogic_term as term;
pub use stacklogic_types as types;
