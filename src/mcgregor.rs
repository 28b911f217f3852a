use petgraph::graph::NodeIndex;

use crate::budget::SearchBudget;
use crate::compiler::{MatchQuery, MatcherEdge};
use crate::mapping::{AtomMapping, PartialMapping};
use crate::target::TargetProperties;
use crate::vf::{SearchOutcome, SearchStatus};

/// One state of a greedy extension. Each step produces a new snapshot;
/// earlier snapshots are never modified.
#[derive(Debug, Clone)]
pub struct Extension {
    mapping: PartialMapping,
    consistent_bonds: usize,
}

impl Extension {
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// `(query, target)` pairs sorted by query index.
    pub fn pairs(&self) -> AtomMapping {
        self.mapping.pairs()
    }

    /// Mapped query bonds whose target counterpart exists and agrees.
    pub fn consistent_bonds(&self) -> usize {
        self.consistent_bonds
    }

    fn with_pair(&self, query: NodeIndex, target: NodeIndex, gain: usize) -> Self {
        let mut mapping = self.mapping.clone();
        mapping.push(query, target);
        Self {
            mapping,
            consistent_bonds: self.consistent_bonds + gain,
        }
    }
}

/// Greedy completion of a seed mapping towards a common subgraph.
///
/// Each step adds the single admissible pair that makes the most new bonds
/// consistent, preferring the lowest target index and then the lowest query
/// index on ties. The result is a local optimum, not a maximum common
/// subgraph.
#[derive(Debug, Clone, Copy)]
pub struct McGregorExtension<'a> {
    query: &'a MatchQuery,
    target: &'a TargetProperties,
    match_bonds: bool,
    budget: SearchBudget,
}

impl<'a> McGregorExtension<'a> {
    pub fn new(query: &'a MatchQuery, target: &'a TargetProperties) -> Self {
        Self {
            query,
            target,
            match_bonds: true,
            budget: SearchBudget::default(),
        }
    }

    pub fn with_match_bonds(self, match_bonds: bool) -> Self {
        Self {
            match_bonds,
            ..self
        }
    }

    /// Budget shared by all seeds of one [`extend_all`](Self::extend_all)
    /// call; one step per added pair.
    pub fn with_budget(self, budget: SearchBudget) -> Self {
        Self { budget, ..self }
    }

    /// Snapshot for a seed. Conflicting pairs are dropped.
    pub fn seed(&self, pairs: &[(NodeIndex, NodeIndex)]) -> Extension {
        let mapping = PartialMapping::from_pairs(
            self.query.atom_count(),
            self.target.atom_count(),
            pairs,
        );
        let consistent_bonds = self
            .query
            .edges()
            .iter()
            .filter(|edge| self.bond_agrees(&mapping, edge))
            .count();
        Extension {
            mapping,
            consistent_bonds,
        }
    }

    /// The next snapshot, or `None` when no pair adds a consistent bond.
    pub fn step(&self, current: &Extension) -> Option<Extension> {
        let mut best: Option<(usize, NodeIndex, NodeIndex)> = None;
        for t in self.target.atoms() {
            if current.mapping.is_target_mapped(t) {
                continue;
            }
            for q in (0..self.query.atom_count()).map(NodeIndex::new) {
                if current.mapping.is_query_mapped(q) {
                    continue;
                }
                let Some(gain) = self.gain(&current.mapping, q, t) else {
                    continue;
                };
                if gain > 0 && best.is_none_or(|(g, _, _)| gain > g) {
                    best = Some((gain, q, t));
                }
            }
        }
        let (gain, q, t) = best?;
        tracing::trace!(
            query_atom = q.index(),
            target_atom = t.index(),
            gain,
            "extended mapping"
        );
        Some(current.with_pair(q, t, gain))
    }

    /// Runs [`step`](Self::step) until it stops improving.
    pub fn extend(&self, seed: &[(NodeIndex, NodeIndex)]) -> Extension {
        let mut current = self.seed(seed);
        while let Some(next) = self.step(&current) {
            current = next;
        }
        current
    }

    /// Extends every seed within the budget. Mappings are returned in seed
    /// order; when the budget runs out, the seed being extended is returned
    /// as far as it got and later seeds are returned unextended.
    pub fn extend_all(&self, seeds: &[AtomMapping]) -> SearchOutcome {
        let mut tracker = self.budget.start();
        let mut mappings = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let mut current = self.seed(seed);
            while tracker.tick() {
                match self.step(&current) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            mappings.push(current.pairs());
        }

        let status = if tracker.exceeded() {
            tracing::warn!(steps = tracker.steps(), "extension budget exhausted");
            SearchStatus::Aborted
        } else if mappings.is_empty() {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Matched
        };
        SearchOutcome {
            mappings,
            status,
            steps: tracker.steps(),
        }
    }

    // Number of mapped query neighbours of `q` whose bond to `q` would be
    // matched by a target bond at `t`. `None` if the pair is inadmissible.
    fn gain(&self, mapping: &PartialMapping, q: NodeIndex, t: NodeIndex) -> Option<usize> {
        if !self.query.node(q).matcher.matches(self.target, t) {
            return None;
        }
        let mut gain = 0;
        for &(qn, slot) in self.query.neighbors(q) {
            let Some(tn) = mapping.target_of(qn) else {
                continue;
            };
            let Some(edge) = self.target.bond_between(t, tn) else {
                continue;
            };
            if self.match_bonds && !self.query.edge(slot).matcher.matches(self.target, edge) {
                return None;
            }
            gain += 1;
        }
        Some(gain)
    }

    fn bond_agrees(&self, mapping: &PartialMapping, edge: &MatcherEdge) -> bool {
        let (Some(ta), Some(tb)) = (mapping.target_of(edge.begin), mapping.target_of(edge.end))
        else {
            return false;
        };
        match self.target.bond_between(ta, tb) {
            Some(e) => !self.match_bonds || edge.matcher.matches(self.target, e),
            None => false,
        }
    }
}
