use std::cmp::Reverse;
use std::collections::BTreeMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::canon::{invariant_hash, symmetry_classes};
use crate::error::{ConfigurationError, Result};
use crate::matcher::{AtomMatcher, BondMatcher};
use crate::mol::{EZStereo, Mol, TetrahedralStereo};
use crate::traits::{AtomQuery, BondQuery};

/// What the compiled query will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileMode {
    /// Every query atom and bond must be embedded.
    #[default]
    Substructure,
    /// Partial embeddings are wanted; plain atoms get no degree bound.
    Mcs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherNode {
    pub atom: NodeIndex,
    pub degree: usize,
    pub matcher: AtomMatcher,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherEdge {
    pub bond: EdgeIndex,
    pub begin: NodeIndex,
    pub end: NodeIndex,
    pub matcher: BondMatcher,
}

impl MatcherEdge {
    pub fn other(&self, atom: NodeIndex) -> NodeIndex {
        if atom == self.begin {
            self.end
        } else {
            self.begin
        }
    }
}

/// Compiled matcher graph for one query molecule. Immutable and shareable.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    nodes: Vec<MatcherNode>,
    edges: Vec<MatcherEdge>,
    adjacency: Vec<Vec<(NodeIndex, usize)>>,
    order: Vec<NodeIndex>,
    tetrahedral_stereo: Vec<TetrahedralStereo>,
    ez_stereo: Vec<EZStereo>,
    mode: CompileMode,
    uses_rings: bool,
    plain_symbol_counts: BTreeMap<String, usize>,
}

impl MatchQuery {
    pub fn atom_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn bond_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[MatcherNode] {
        &self.nodes
    }

    pub fn node(&self, atom: NodeIndex) -> &MatcherNode {
        &self.nodes[atom.index()]
    }

    pub fn edges(&self) -> &[MatcherEdge] {
        &self.edges
    }

    pub fn edge(&self, slot: usize) -> &MatcherEdge {
        &self.edges[slot]
    }

    /// `(neighbour, edge slot)` pairs of a query atom.
    pub fn neighbors(&self, atom: NodeIndex) -> &[(NodeIndex, usize)] {
        &self.adjacency[atom.index()]
    }

    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&MatcherEdge> {
        self.adjacency
            .get(a.index())?
            .iter()
            .find(|&&(nb, _)| nb == b)
            .map(|&(_, slot)| &self.edges[slot])
    }

    /// Visit order used by the search engine.
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub fn mode(&self) -> CompileMode {
        self.mode
    }

    pub fn tetrahedral_stereo(&self) -> &[TetrahedralStereo] {
        &self.tetrahedral_stereo
    }

    pub fn ez_stereo(&self) -> &[EZStereo] {
        &self.ez_stereo
    }

    /// Whether any predicate needs ring perception on the target.
    pub fn uses_rings(&self) -> bool {
        self.uses_rings
    }

    /// How many plain query atoms carry each element symbol.
    pub fn plain_symbol_counts(&self) -> &BTreeMap<String, usize> {
        &self.plain_symbol_counts
    }
}

/// Turns query molecules into [`MatchQuery`] graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryCompiler {
    mode: CompileMode,
}

impl QueryCompiler {
    pub fn new(mode: CompileMode) -> Self {
        Self { mode }
    }

    pub fn substructure() -> Self {
        Self::new(CompileMode::Substructure)
    }

    pub fn mcs() -> Self {
        Self::new(CompileMode::Mcs)
    }

    pub fn compile<A, B>(&self, query: &Mol<A, B>) -> Result<MatchQuery>
    where
        A: AtomQuery,
        B: BondQuery,
    {
        query.validate()?;

        let nodes: Vec<MatcherNode> = query
            .atoms()
            .map(|idx| {
                let degree = query.degree(idx);
                let bound = match self.mode {
                    CompileMode::Substructure => Some(degree),
                    CompileMode::Mcs => None,
                };
                MatcherNode {
                    atom: idx,
                    degree,
                    matcher: query.atom(idx).atom_matcher(bound),
                }
            })
            .collect();

        let mut edges = Vec::with_capacity(query.bond_count());
        let mut adjacency = vec![Vec::new(); query.atom_count()];
        for e in query.bonds() {
            let Some((begin, end)) = query.bond_endpoints(e) else {
                continue;
            };
            let bond = query.bond(e);
            let begin_pattern = query.atom(begin).is_pattern();
            let end_pattern = query.atom(end).is_pattern();
            let kinds = match (bond.is_pattern(), begin_pattern, end_pattern) {
                (false, true, true) => Some(("plain", "pattern")),
                (true, false, false) => Some(("pattern", "plain")),
                _ => None,
            };
            if let Some((bond_kind, atom_kind)) = kinds {
                return Err(ConfigurationError::MixedBond {
                    bond: e.index(),
                    begin: begin.index(),
                    end: end.index(),
                    bond_kind,
                    atom_kind,
                }
                .into());
            }

            let slot = edges.len();
            adjacency[begin.index()].push((end, slot));
            adjacency[end.index()].push((begin, slot));
            edges.push(MatcherEdge {
                bond: e,
                begin,
                end,
                matcher: bond.bond_matcher(),
            });
        }
        for list in &mut adjacency {
            list.sort_unstable_by_key(|&(nb, _)| nb);
        }

        let uses_rings = nodes.iter().any(|n| n.matcher.uses_rings())
            || edges.iter().any(|e| e.matcher.uses_rings());

        let mut plain_symbol_counts = BTreeMap::new();
        for idx in query.atoms() {
            if let Some(symbol) = query.atom(idx).plain_symbol() {
                *plain_symbol_counts.entry(symbol.to_owned()).or_insert(0) += 1;
            }
        }

        let order = visit_order(query, &nodes, &adjacency);

        tracing::trace!(
            atoms = nodes.len(),
            bonds = edges.len(),
            mode = ?self.mode,
            "compiled query"
        );

        Ok(MatchQuery {
            nodes,
            edges,
            adjacency,
            order,
            tetrahedral_stereo: query.tetrahedral_stereo().to_vec(),
            ez_stereo: query.ez_stereo().to_vec(),
            mode: self.mode,
            uses_rings,
            plain_symbol_counts,
        })
    }
}

// Greedy connected order: most already-visited neighbours first, then higher
// degree, then the rarer symmetry class, then lower index. With no visited
// neighbour anywhere this picks the start of the next component.
fn visit_order<A, B>(
    query: &Mol<A, B>,
    nodes: &[MatcherNode],
    adjacency: &[Vec<(NodeIndex, usize)>],
) -> Vec<NodeIndex>
where
    A: AtomQuery,
{
    let n = nodes.len();
    let invariants: Vec<u64> = query
        .atoms()
        .map(|idx| invariant_hash(&(query.atom(idx).plain_symbol(), query.degree(idx))))
        .collect();
    let classes = symmetry_classes(query, &invariants);

    let mut visited = vec![false; n];
    let mut visited_neighbors = vec![0usize; n];
    let mut order = Vec::with_capacity(n);

    while order.len() < n {
        let next = (0..n).filter(|&i| !visited[i]).max_by_key(|&i| {
            (
                visited_neighbors[i],
                nodes[i].degree,
                Reverse(classes[i]),
                Reverse(i),
            )
        });
        let Some(next) = next else {
            break;
        };
        visited[next] = true;
        for &(nb, _) in &adjacency[next] {
            visited_neighbors[nb.index()] += 1;
        }
        order.push(NodeIndex::new(next));
    }

    order
}
