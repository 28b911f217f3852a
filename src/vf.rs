//! Backtracking VF2-style search over a compiled query.
//!
//! The engine walks the query in its precomputed visit order and extends an
//! injective [`PartialMapping`] one atom at a time. Candidates for a query
//! atom that already has a mapped neighbour are restricted to the unmapped
//! target neighbours of that neighbour's image; only the first atom of each
//! query component sees the whole target.
//!
//! Two modes share the recursion:
//!
//! * exact mode enumerates complete embeddings, with a neighbour-count
//!   look-ahead;
//! * seed mode skips query atoms that cannot be placed and keeps the largest
//!   partial mappings, which the McGregor extension then grows.

use std::ops::ControlFlow;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::budget::{BudgetTracker, SearchBudget};
use crate::compiler::MatchQuery;
use crate::mapping::{AtomMapping, PartialMapping};
use crate::target::TargetProperties;

/// Seeds kept when no mapping cap is given.
pub const DEFAULT_SEED_LIMIT: usize = 64;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// At least one mapping was found and the search finished or reached its
    /// mapping cap.
    Matched,
    /// The search finished without finding a mapping.
    Exhausted,
    /// The budget ran out. Mappings found before that are still reported.
    Aborted,
}

/// Raw engine output, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub mappings: Vec<AtomMapping>,
    pub status: SearchStatus,
    pub steps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exact,
    Seed,
}

enum Frame {
    Unvisited(NodeIndex),
    AllMapped,
}

/// Search driver. Holds only borrowed, read-only inputs; each `find_*` call
/// allocates its own mapping state.
#[derive(Debug, Clone, Copy)]
pub struct VfEngine<'a> {
    query: &'a MatchQuery,
    target: &'a TargetProperties,
    match_bonds: bool,
    max_mappings: Option<usize>,
    budget: SearchBudget,
}

impl<'a> VfEngine<'a> {
    pub fn new(query: &'a MatchQuery, target: &'a TargetProperties) -> Self {
        Self {
            query,
            target,
            match_bonds: true,
            max_mappings: None,
            budget: SearchBudget::default(),
        }
    }

    /// When `false`, only connectivity is checked for bonds.
    pub fn with_match_bonds(self, match_bonds: bool) -> Self {
        Self {
            match_bonds,
            ..self
        }
    }

    /// Stop after this many mappings. `None` enumerates everything.
    pub fn with_max_mappings(self, max_mappings: Option<usize>) -> Self {
        Self {
            max_mappings,
            ..self
        }
    }

    pub fn with_budget(self, budget: SearchBudget) -> Self {
        Self { budget, ..self }
    }

    /// First complete embedding in candidate order.
    pub fn find_first(&self) -> SearchOutcome {
        self.run(Mode::Exact, 1)
    }

    /// Complete embeddings, up to the mapping cap.
    pub fn find_all(&self) -> SearchOutcome {
        self.run(Mode::Exact, self.cap(usize::MAX))
    }

    /// Largest partial embeddings found by skipping query atoms that cannot
    /// be placed. Every seed has the same, maximal, size; empty seeds are
    /// never returned.
    pub fn find_seeds(&self) -> SearchOutcome {
        self.run(Mode::Seed, self.cap(DEFAULT_SEED_LIMIT))
    }

    fn cap(&self, default: usize) -> usize {
        self.max_mappings.unwrap_or(default).max(1)
    }

    fn run(&self, mode: Mode, cap: usize) -> SearchOutcome {
        tracing::debug!(
            query_atoms = self.query.atom_count(),
            target_atoms = self.target.atom_count(),
            ?mode,
            cap,
            "starting search"
        );

        let mut session = Session {
            query: self.query,
            target: self.target,
            match_bonds: self.match_bonds,
            mode,
            cap,
            mapping: PartialMapping::new(self.query.atom_count(), self.target.atom_count()),
            tracker: self.budget.start(),
            results: Vec::new(),
            best: 0,
        };
        let _ = session.extend(0);

        if mode == Mode::Seed && session.best == 0 {
            session.results.clear();
        }

        let status = if session.tracker.exceeded() {
            tracing::warn!(
                steps = session.tracker.steps(),
                found = session.results.len(),
                "search budget exhausted"
            );
            SearchStatus::Aborted
        } else if session.results.is_empty() {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Matched
        };

        tracing::debug!(
            ?status,
            mappings = session.results.len(),
            steps = session.tracker.steps(),
            "search finished"
        );

        SearchOutcome {
            mappings: session.results,
            status,
            steps: session.tracker.steps(),
        }
    }
}

struct Session<'a> {
    query: &'a MatchQuery,
    target: &'a TargetProperties,
    match_bonds: bool,
    mode: Mode,
    cap: usize,
    mapping: PartialMapping,
    tracker: BudgetTracker,
    results: Vec<AtomMapping>,
    best: usize,
}

impl Session<'_> {
    fn frame(&self, depth: usize) -> Frame {
        match self.query.order().get(depth) {
            Some(&q) => Frame::Unvisited(q),
            None => Frame::AllMapped,
        }
    }

    fn extend(&mut self, depth: usize) -> ControlFlow<()> {
        if !self.tracker.tick() {
            return ControlFlow::Break(());
        }
        if self.mode == Mode::Seed && self.cannot_beat_best(depth) {
            return ControlFlow::Continue(());
        }

        let q = match self.frame(depth) {
            Frame::AllMapped => return self.record(),
            Frame::Unvisited(q) => q,
        };

        let target = self.target;
        let mut placed = false;
        match self.anchor(q) {
            Some(anchor) => {
                for &t in target.neighbors(anchor) {
                    if self.feasible(q, t) {
                        placed = true;
                        self.try_pair(q, t, depth)?;
                    }
                }
            }
            None => {
                for t in target.atoms() {
                    if self.feasible(q, t) {
                        placed = true;
                        self.try_pair(q, t, depth)?;
                    }
                }
            }
        }

        if !placed {
            tracing::trace!(query_atom = q.index(), depth, "dead end");
            if self.mode == Mode::Seed {
                return self.extend(depth + 1);
            }
        }
        ControlFlow::Continue(())
    }

    fn try_pair(&mut self, q: NodeIndex, t: NodeIndex, depth: usize) -> ControlFlow<()> {
        self.mapping.push(q, t);
        let flow = self.extend(depth + 1);
        self.mapping.pop();
        flow
    }

    fn record(&mut self) -> ControlFlow<()> {
        match self.mode {
            Mode::Exact => {
                self.results.push(self.mapping.pairs());
                if self.results.len() >= self.cap {
                    return ControlFlow::Break(());
                }
            }
            Mode::Seed => {
                let size = self.mapping.len();
                if size > self.best {
                    self.best = size;
                    self.results.clear();
                    self.results.push(self.mapping.pairs());
                } else if size == self.best && size > 0 && self.results.len() < self.cap {
                    self.results.push(self.mapping.pairs());
                }
                if self.best == self.query.atom_count() && self.results.len() >= self.cap {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    // Upper bound on the final size of any leaf below this frame.
    fn cannot_beat_best(&self, depth: usize) -> bool {
        let placed = self.mapping.len();
        let remaining = (self.query.atom_count() - depth)
            .min(self.target.atom_count().saturating_sub(placed));
        let bound = placed + remaining;
        let pool_full = self.results.len() >= self.cap;
        bound < self.best || (pool_full && bound <= self.best)
    }

    // Image of a mapped query neighbour with the fewest target neighbours.
    fn anchor(&self, q: NodeIndex) -> Option<NodeIndex> {
        self.query
            .neighbors(q)
            .iter()
            .filter_map(|&(qn, _)| self.mapping.target_of(qn))
            .min_by_key(|&t| (self.target.count_neighbors(t), t))
    }

    fn feasible(&self, q: NodeIndex, t: NodeIndex) -> bool {
        if self.mapping.is_target_mapped(t) {
            return false;
        }
        if !self.query.node(q).matcher.matches(self.target, t) {
            return false;
        }

        let mut unmapped_query_neighbors = 0usize;
        for &(qn, slot) in self.query.neighbors(q) {
            let Some(tn) = self.mapping.target_of(qn) else {
                unmapped_query_neighbors += 1;
                continue;
            };
            let Some(edge) = self.target.bond_between(t, tn) else {
                return false;
            };
            if self.match_bonds && !self.query.edge(slot).matcher.matches(self.target, edge) {
                return false;
            }
        }

        if self.mode == Mode::Exact {
            let unmapped_target_neighbors = self
                .target
                .neighbors(t)
                .iter()
                .filter(|&&tn| !self.mapping.is_target_mapped(tn))
                .count();
            if unmapped_target_neighbors < unmapped_query_neighbors {
                return false;
            }
        }

        true
    }
}
