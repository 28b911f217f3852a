//! Session facade tying compilation, search, extension and ranking together.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::compiler::{MatchQuery, QueryCompiler};
use crate::config::{Algorithm, MatchOptions};
use crate::error::{InvalidGraphError, Result};
use crate::filter::{euclidean_distance, ChemicalFilter};
use crate::hydrogen::remove_hs;
use crate::mapping::{AtomMapping, MappingResult};
use crate::mcgregor::McGregorExtension;
use crate::mol::Mol;
use crate::target::TargetProperties;
use crate::traits::{AtomQuery, BondQuery, HydrogenSuppress};
use crate::vf::{SearchOutcome, SearchStatus, VfEngine};

/// Matching session against one target molecule.
///
/// The target's [`TargetProperties`] are built on the first
/// [`search`](Self::search) and reused by later ones. With
/// `remove_hydrogens` set, atom indices in the results refer to the
/// molecules as returned by [`remove_hs`], which keeps the relative order of
/// the remaining atoms.
#[derive(Debug)]
pub struct Isomorphism {
    target: Option<Mol<Atom, Bond>>,
    properties: OnceLock<Arc<TargetProperties>>,
    options: MatchOptions,
}

impl Isomorphism {
    pub fn new(target: &Mol<Atom, Bond>, options: MatchOptions) -> Self {
        Self {
            target: Some(target.clone()),
            properties: OnceLock::new(),
            options,
        }
    }

    /// Shares target properties built elsewhere. They are used as given;
    /// `remove_hydrogens` then only applies to queries.
    pub fn with_properties(properties: Arc<TargetProperties>, options: MatchOptions) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(properties);
        Self {
            target: None,
            properties: cell,
            options,
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn set_chem_filters(&mut self, stereo: bool, fragment: bool, energy: bool) {
        self.options.chem_filters.stereo = stereo;
        self.options.chem_filters.fragment = fragment;
        self.options.chem_filters.energy = energy;
    }

    /// The cached target view, building it on first use.
    pub fn target_properties(
        &self,
    ) -> std::result::Result<&Arc<TargetProperties>, InvalidGraphError> {
        if let Some(properties) = self.properties.get() {
            return Ok(properties);
        }
        let mol = match &self.target {
            Some(mol) if self.options.remove_hydrogens => Cow::Owned(remove_hs(mol)),
            Some(mol) => Cow::Borrowed(mol),
            None => Cow::Owned(Mol::new()),
        };
        let built = TargetProperties::from_mol(mol.into_owned())?;
        Ok(self.properties.get_or_init(|| Arc::new(built)))
    }

    pub fn search<A, B>(&self, query: &Mol<A, B>) -> Result<MatchOutcome>
    where
        A: AtomQuery + HydrogenSuppress + Clone,
        B: BondQuery + Clone,
    {
        let target: &TargetProperties = self.target_properties()?;
        let query: Cow<'_, Mol<A, B>> = if self.options.remove_hydrogens {
            Cow::Owned(remove_hs(query))
        } else {
            Cow::Borrowed(query)
        };

        tracing::debug!(
            query_atoms = query.atom_count(),
            target_atoms = target.atom_count(),
            algorithm = ?self.options.algorithm,
            "starting matching session"
        );

        let outcome = match self.options.algorithm {
            Algorithm::Substructure => self.substructure(&query, target)?,
            Algorithm::Mcs => self.mcs(&query, target)?,
            Algorithm::Auto => {
                let exact = self.substructure(&query, target)?;
                if exact.status == SearchStatus::Exhausted {
                    tracing::debug!("no embedding, falling back to MCS");
                    let mut fallback = self.mcs(&query, target)?;
                    fallback.steps += exact.steps;
                    fallback
                } else {
                    exact
                }
            }
        };

        tracing::debug!(
            status = ?outcome.status,
            mappings = outcome.mappings.len(),
            steps = outcome.steps,
            "matching session finished"
        );
        Ok(outcome)
    }

    fn substructure<A, B>(
        &self,
        query: &Mol<A, B>,
        target: &TargetProperties,
    ) -> Result<MatchOutcome>
    where
        A: AtomQuery,
        B: BondQuery,
    {
        let compiled = QueryCompiler::substructure().compile(query)?;
        if !fits(&compiled, target) {
            tracing::debug!("query cannot fit in target");
            let raw = SearchOutcome {
                mappings: Vec::new(),
                status: SearchStatus::Exhausted,
                steps: 0,
            };
            return Ok(self.finish(&compiled, target, raw, Algorithm::Substructure));
        }
        if compiled.uses_rings() {
            target.rings();
        }

        let raw = VfEngine::new(&compiled, target)
            .with_match_bonds(self.options.match_bonds)
            .with_max_mappings(self.options.max_mappings)
            .with_budget(self.options.budget)
            .find_all();
        Ok(self.finish(&compiled, target, raw, Algorithm::Substructure))
    }

    fn mcs<A, B>(&self, query: &Mol<A, B>, target: &TargetProperties) -> Result<MatchOutcome>
    where
        A: AtomQuery,
        B: BondQuery,
    {
        let started = Instant::now();
        let compiled = QueryCompiler::mcs().compile(query)?;
        if compiled.uses_rings() {
            target.rings();
        }

        let seeds = VfEngine::new(&compiled, target)
            .with_match_bonds(self.options.match_bonds)
            .with_max_mappings(self.options.max_mappings)
            .with_budget(self.options.budget)
            .find_seeds();

        let remaining = self.options.budget.remaining(seeds.steps, started.elapsed());
        let extended = McGregorExtension::new(&compiled, target)
            .with_match_bonds(self.options.match_bonds)
            .with_budget(remaining)
            .extend_all(&seeds.mappings);

        let mut seen = HashSet::new();
        let mappings: Vec<AtomMapping> = extended
            .mappings
            .into_iter()
            .filter(|m| seen.insert(m.clone()))
            .collect();

        let status = if seeds.status == SearchStatus::Aborted {
            SearchStatus::Aborted
        } else {
            extended.status
        };
        let raw = SearchOutcome {
            mappings,
            status,
            steps: seeds.steps + extended.steps,
        };
        Ok(self.finish(&compiled, target, raw, Algorithm::Mcs))
    }

    fn finish(
        &self,
        compiled: &MatchQuery,
        target: &TargetProperties,
        raw: SearchOutcome,
        algorithm: Algorithm,
    ) -> MatchOutcome {
        let filter = ChemicalFilter::new(compiled, target)
            .with_match_bonds(self.options.match_bonds)
            .with_filters(self.options.chem_filters);
        let mut mappings = filter.rank(raw.mappings);

        if self.options.unique_mappings {
            let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();
            mappings.retain(|m| seen.insert(m.target_atoms()));
        }

        MatchOutcome {
            status: raw.status,
            algorithm,
            mappings,
            steps: raw.steps,
            query_atoms: compiled.atom_count(),
            query_bonds: compiled.bond_count(),
            target_bonds: target.bond_count(),
        }
    }
}

// Cheap rejection before a substructure search.
fn fits(query: &MatchQuery, target: &TargetProperties) -> bool {
    if query.atom_count() > target.atom_count() || query.bond_count() > target.bond_count() {
        return false;
    }
    query
        .plain_symbol_counts()
        .iter()
        .all(|(symbol, &count)| target.symbol_count(symbol) >= count)
}

/// Ranked result of [`Isomorphism::search`].
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    status: SearchStatus,
    algorithm: Algorithm,
    mappings: Vec<MappingResult>,
    steps: u64,
    query_atoms: usize,
    query_bonds: usize,
    target_bonds: usize,
}

impl MatchOutcome {
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// The search that produced the mappings: `Substructure` or `Mcs`.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether some mapping embeds every query atom and bond.
    pub fn is_subgraph(&self) -> bool {
        self.mappings
            .iter()
            .any(|m| m.len() == self.query_atoms && m.bond_pairs().len() == self.query_bonds)
    }

    /// The best-ranked mapping.
    pub fn first_mapping(&self) -> Option<&MappingResult> {
        self.mappings.first()
    }

    pub fn mappings(&self) -> &[MappingResult] {
        &self.mappings
    }

    pub fn into_mappings(self) -> Vec<MappingResult> {
        self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Tanimoto score of the best mapping, 0 when there is none.
    pub fn tanimoto_similarity(&self) -> f64 {
        self.first_mapping().map_or(0.0, MappingResult::tanimoto)
    }

    /// Euclidean distance of the best mapping; with no mapping, the distance
    /// as if nothing were shared.
    pub fn euclidean_distance(&self) -> f64 {
        self.first_mapping().map_or_else(
            || euclidean_distance(self.query_bonds, self.target_bonds, 0),
            MappingResult::euclidean_distance,
        )
    }

    /// Engine and extension steps spent.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
