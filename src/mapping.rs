use std::collections::BTreeMap;

use petgraph::graph::{EdgeIndex, NodeIndex};

/// `(query, target)` atom pairs, sorted by query index.
pub type AtomMapping = Vec<(NodeIndex, NodeIndex)>;

/// Injective query-to-target mapping under construction.
///
/// Both directions live in arrays sized once to the atom counts. Every
/// [`push`](Self::push) is recorded on a trail and undone by exactly one
/// [`pop`](Self::pop), so a backtracking frame rolls back only what it added.
#[derive(Debug, Clone)]
pub struct PartialMapping {
    query_to_target: Vec<Option<NodeIndex>>,
    target_to_query: Vec<Option<NodeIndex>>,
    trail: Vec<NodeIndex>,
}

impl PartialMapping {
    pub fn new(query_atoms: usize, target_atoms: usize) -> Self {
        Self {
            query_to_target: vec![None; query_atoms],
            target_to_query: vec![None; target_atoms],
            trail: Vec::with_capacity(query_atoms),
        }
    }

    /// Starts from an existing set of pairs. Pairs that would break
    /// injectivity are ignored.
    pub fn from_pairs(
        query_atoms: usize,
        target_atoms: usize,
        pairs: &[(NodeIndex, NodeIndex)],
    ) -> Self {
        let mut mapping = Self::new(query_atoms, target_atoms);
        for &(q, t) in pairs {
            if mapping.can_map(q, t) {
                mapping.push(q, t);
            }
        }
        mapping
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    pub fn query_atom_count(&self) -> usize {
        self.query_to_target.len()
    }

    pub fn target_atom_count(&self) -> usize {
        self.target_to_query.len()
    }

    pub fn is_complete(&self) -> bool {
        self.len() == self.query_to_target.len()
    }

    pub fn target_of(&self, query: NodeIndex) -> Option<NodeIndex> {
        self.query_to_target.get(query.index()).copied().flatten()
    }

    pub fn query_of(&self, target: NodeIndex) -> Option<NodeIndex> {
        self.target_to_query.get(target.index()).copied().flatten()
    }

    pub fn is_query_mapped(&self, query: NodeIndex) -> bool {
        self.target_of(query).is_some()
    }

    pub fn is_target_mapped(&self, target: NodeIndex) -> bool {
        self.query_of(target).is_some()
    }

    /// Both atoms exist and are still free.
    pub fn can_map(&self, query: NodeIndex, target: NodeIndex) -> bool {
        matches!(self.query_to_target.get(query.index()), Some(None))
            && matches!(self.target_to_query.get(target.index()), Some(None))
    }

    /// # Panics
    ///
    /// Panics in debug builds if either atom is already mapped.
    pub fn push(&mut self, query: NodeIndex, target: NodeIndex) {
        debug_assert!(self.can_map(query, target));
        self.query_to_target[query.index()] = Some(target);
        self.target_to_query[target.index()] = Some(query);
        self.trail.push(query);
    }

    /// Undoes the most recent [`push`](Self::push).
    pub fn pop(&mut self) -> Option<(NodeIndex, NodeIndex)> {
        let query = self.trail.pop()?;
        let target = self.query_to_target[query.index()].take()?;
        self.target_to_query[target.index()] = None;
        Some((query, target))
    }

    /// Current pairs sorted by query index.
    pub fn pairs(&self) -> AtomMapping {
        self.query_to_target
            .iter()
            .enumerate()
            .filter_map(|(q, t)| t.map(|t| (NodeIndex::new(q), t)))
            .collect()
    }
}

/// A finished mapping with its filter scores. Read-only once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingResult {
    pairs: AtomMapping,
    reverse: AtomMapping,
    bond_pairs: Vec<(EdgeIndex, EdgeIndex)>,
    pub(crate) tanimoto: f64,
    pub(crate) euclidean: f64,
    pub(crate) stereo_consistent: bool,
    pub(crate) fragment_count: usize,
    pub(crate) energy: Option<f64>,
    discovery_index: usize,
}

impl MappingResult {
    pub(crate) fn new(
        mut pairs: AtomMapping,
        mut bond_pairs: Vec<(EdgeIndex, EdgeIndex)>,
        discovery_index: usize,
    ) -> Self {
        pairs.sort_unstable_by_key(|&(q, _)| q);
        let mut reverse: AtomMapping = pairs.iter().map(|&(q, t)| (t, q)).collect();
        reverse.sort_unstable_by_key(|&(t, _)| t);
        bond_pairs.sort_unstable_by_key(|&(q, _)| q);
        Self {
            pairs,
            reverse,
            bond_pairs,
            tanimoto: 0.0,
            euclidean: 0.0,
            stereo_consistent: true,
            fragment_count: 0,
            energy: None,
            discovery_index,
        }
    }

    /// `(query, target)` pairs sorted by query index.
    pub fn pairs(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.pairs
    }

    /// `(target, query)` pairs sorted by target index.
    pub fn reverse_pairs(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.reverse
    }

    /// `(query bond, target bond)` pairs whose endpoints are both mapped and
    /// whose bonds agree.
    pub fn bond_pairs(&self) -> &[(EdgeIndex, EdgeIndex)] {
        &self.bond_pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn target_of(&self, query: NodeIndex) -> Option<NodeIndex> {
        self.pairs
            .binary_search_by_key(&query, |&(q, _)| q)
            .ok()
            .map(|i| self.pairs[i].1)
    }

    pub fn query_of(&self, target: NodeIndex) -> Option<NodeIndex> {
        self.reverse
            .binary_search_by_key(&target, |&(t, _)| t)
            .ok()
            .map(|i| self.reverse[i].1)
    }

    /// Mapped target atoms in ascending order.
    pub fn target_atoms(&self) -> Vec<NodeIndex> {
        self.reverse.iter().map(|&(t, _)| t).collect()
    }

    /// The mapping as plain indices.
    pub fn to_index_map(&self) -> BTreeMap<usize, usize> {
        self.pairs
            .iter()
            .map(|&(q, t)| (q.index(), t.index()))
            .collect()
    }

    pub fn tanimoto(&self) -> f64 {
        self.tanimoto
    }

    pub fn euclidean_distance(&self) -> f64 {
        self.euclidean
    }

    pub fn is_stereo_consistent(&self) -> bool {
        self.stereo_consistent
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Bond energy of the unmapped bonds, in kJ/mol. Only computed when the
    /// energy filter is enabled.
    pub fn energy(&self) -> Option<f64> {
        self.energy
    }

    /// Position in which the search found this mapping.
    pub fn discovery_index(&self) -> usize {
        self.discovery_index
    }
}
