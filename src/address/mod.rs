//! Address decomposition and query candidate generation.
//!
//! Both stages are pure: the same input always yields the same fragments
//! and the same candidate list.

pub mod candidates;
pub mod decompose;
pub mod tables;
pub mod types;

pub use candidates::{generate, MAX_CANDIDATES};
pub use decompose::decompose;
pub use types::{AddressFragments, FragmentKind};

/// Decompose `raw` and generate its candidate queries in one step.
pub fn candidates_for(raw: &str) -> (AddressFragments, Vec<String>) {
    let fragments = decompose(raw);
    let candidates = generate(raw, &fragments);
    (fragments, candidates)
}
