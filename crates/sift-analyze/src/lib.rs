//! Static analysis passes for sift.
//!
//! Every pass parses the source on its own, so each can be called without a
//! prior successful run of another:
//! - [`structure`]: declarations, cyclomatic complexity, and quality issues
//! - [`integrity`]: security anti-patterns, duplicate definitions, and
//!   best-practice violations
//! - [`profile`]: nested loops and append-in-loop shapes, with a derived score
//! - [`scaffold`]: unittest source generated from a structural analysis

pub mod integrity;
pub mod profile;
pub mod scaffold;
pub mod structure;
pub mod types;

pub use integrity::check_integrity;
pub use profile::profile;
pub use scaffold::{build_scaffold, generate_tests};
pub use structure::{analyze, analyze_with};
