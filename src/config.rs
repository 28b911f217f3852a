use serde::{Deserialize, Serialize};

use crate::budget::SearchBudget;
use crate::filter::ChemFilters;

/// Which search an [`Isomorphism`](crate::Isomorphism) session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Complete embeddings of the query only.
    #[default]
    Substructure,
    /// Largest common substructure: VF seeds grown by McGregor extension.
    Mcs,
    /// Substructure first; MCS when no embedding exists.
    #[serde(alias = "default")]
    Auto,
}

/// Options for a matching session. Every field has a default, so partial
/// JSON or TOML documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub algorithm: Algorithm,
    /// Compare bond orders. When `false` only connectivity is required.
    pub match_bonds: bool,
    /// Cap on mappings (or MCS seeds). `None` means all.
    pub max_mappings: Option<usize>,
    pub budget: SearchBudget,
    pub chem_filters: ChemFilters,
    /// Strip explicit hydrogens from both molecules before matching.
    pub remove_hydrogens: bool,
    /// Keep only the best mapping for each set of target atoms.
    pub unique_mappings: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            match_bonds: true,
            max_mappings: None,
            budget: SearchBudget::default(),
            chem_filters: ChemFilters::default(),
            remove_hydrogens: false,
            unique_mappings: false,
        }
    }
}

impl MatchOptions {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_match_bonds(mut self, match_bonds: bool) -> Self {
        self.match_bonds = match_bonds;
        self
    }

    pub fn with_max_mappings(mut self, max_mappings: Option<usize>) -> Self {
        self.max_mappings = max_mappings;
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_chem_filters(mut self, chem_filters: ChemFilters) -> Self {
        self.chem_filters = chem_filters;
        self
    }

    pub fn with_remove_hydrogens(mut self, remove_hydrogens: bool) -> Self {
        self.remove_hydrogens = remove_hydrogens;
        self
    }

    pub fn with_unique_mappings(mut self, unique_mappings: bool) -> Self {
        self.unique_mappings = unique_mappings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = MatchOptions::default();
        assert_eq!(options.algorithm, Algorithm::Substructure);
        assert!(options.match_bonds);
        assert_eq!(options.max_mappings, None);
        assert_eq!(options.budget, SearchBudget::unlimited());
        assert!(!options.remove_hydrogens);
    }

    #[test]
    fn builders_chain() {
        let options = MatchOptions::default()
            .with_algorithm(Algorithm::Auto)
            .with_match_bonds(false)
            .with_unique_mappings(true);
        assert_eq!(options.algorithm, Algorithm::Auto);
        assert!(!options.match_bonds);
        assert!(options.unique_mappings);
    }
}
