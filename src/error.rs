//! Error types for query compilation and graph validation.
//!
//! Only build-time problems are errors. A search that finds nothing or runs
//! out of budget reports that through [`SearchStatus`](crate::SearchStatus).

use thiserror::Error;

/// A molecule graph violates the basic graph invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGraphError {
    /// A bond names an atom index past the end of the atom list.
    #[error("bond {bond} references atom {atom}, but the graph has only {atom_count} atoms")]
    AtomOutOfRange {
        bond: usize,
        atom: usize,
        atom_count: usize,
    },

    /// A bond joins an atom to itself.
    #[error("bond {bond} joins atom {atom} to itself")]
    SelfLoop { bond: usize, atom: usize },

    /// Two bonds join the same pair of atoms.
    #[error("atoms {begin} and {end} are joined by more than one bond")]
    DuplicateBond { begin: usize, end: usize },
}

/// A query cannot be compiled into a matcher graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A bond's kind is inconsistent with its endpoints: a plain bond between
    /// two pattern atoms, or a pattern bond between two plain atoms.
    #[error("{bond_kind} bond {bond} ({begin}-{end}) joins two {atom_kind} atoms")]
    MixedBond {
        bond: usize,
        begin: usize,
        end: usize,
        bond_kind: &'static str,
        atom_kind: &'static str,
    },
}

/// Any error that stops a matching session before the search starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid molecule graph: {0}")]
    InvalidGraph(#[from] InvalidGraphError),

    #[error("invalid query: {0}")]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, Error>;
