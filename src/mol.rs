use std::collections::HashSet;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::error::InvalidGraphError;

/// A stereo neighbour: either a real atom or one of the implicit hydrogens
/// of the given atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomId {
    Node(NodeIndex),
    VirtualH(NodeIndex, u8),
}

/// Tetrahedral centre. Looking from `above[0]`, the remaining three
/// neighbours run counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TetrahedralStereo {
    pub center: NodeIndex,
    pub above: [AtomId; 4],
}

/// Double-bond geometry. `bond` is stored low index first; `refs[0]` is a
/// neighbour of `bond.0`, `refs[1]` a neighbour of `bond.1`, and the two refs
/// lie on the same side of the bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EZStereo {
    pub bond: (NodeIndex, NodeIndex),
    pub refs: [AtomId; 2],
}

/// Labelled undirected molecule graph. Atom index is atom identity.
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
    tetrahedral_stereo: Vec<TetrahedralStereo>,
    ez_stereo: Vec<EZStereo>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            tetrahedral_stereo: Vec::new(),
            ez_stereo: Vec::new(),
        }
    }

    /// Builds a molecule from plain atom and bond lists, rejecting bonds that
    /// point past the atom list, self-loops and duplicate bonds.
    pub fn from_parts(
        atoms: Vec<A>,
        bonds: Vec<(usize, usize, B)>,
    ) -> Result<Self, InvalidGraphError> {
        let atom_count = atoms.len();
        let mut mol = Self::new();
        for atom in atoms {
            mol.add_atom(atom);
        }
        let mut seen = HashSet::with_capacity(bonds.len());
        for (bond, (begin, end, data)) in bonds.into_iter().enumerate() {
            for atom in [begin, end] {
                if atom >= atom_count {
                    return Err(InvalidGraphError::AtomOutOfRange {
                        bond,
                        atom,
                        atom_count,
                    });
                }
            }
            if begin == end {
                return Err(InvalidGraphError::SelfLoop { bond, atom: begin });
            }
            if !seen.insert((begin.min(end), begin.max(end))) {
                return Err(InvalidGraphError::DuplicateBond {
                    begin: begin.min(end),
                    end: begin.max(end),
                });
            }
            mol.add_bond(NodeIndex::new(begin), NodeIndex::new(end), data);
        }
        Ok(mol)
    }

    /// Re-checks the invariants `add_bond` does not enforce: no self-loops
    /// and at most one bond per atom pair.
    pub fn validate(&self) -> Result<(), InvalidGraphError> {
        let mut seen = HashSet::with_capacity(self.bond_count());
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a == b {
                return Err(InvalidGraphError::SelfLoop {
                    bond: edge.id().index(),
                    atom: a,
                });
            }
            if !seen.insert((a.min(b), a.max(b))) {
                return Err(InvalidGraphError::DuplicateBond {
                    begin: a.min(b),
                    end: a.max(b),
                });
            }
        }
        Ok(())
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    /// Adds a bond without checking for duplicates.
    ///
    /// # Panics
    ///
    /// Panics if either index is not an atom of this molecule.
    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    pub fn tetrahedral_stereo(&self) -> &[TetrahedralStereo] {
        &self.tetrahedral_stereo
    }

    pub fn set_tetrahedral_stereo(&mut self, stereo: Vec<TetrahedralStereo>) {
        self.tetrahedral_stereo = stereo;
    }

    pub fn tetrahedral_stereo_for(&self, center: NodeIndex) -> Option<&TetrahedralStereo> {
        self.tetrahedral_stereo.iter().find(|s| s.center == center)
    }

    pub fn add_tetrahedral_stereo(&mut self, stereo: TetrahedralStereo) {
        self.tetrahedral_stereo.push(stereo);
    }

    pub fn ez_stereo(&self) -> &[EZStereo] {
        &self.ez_stereo
    }

    pub fn set_ez_stereo(&mut self, stereo: Vec<EZStereo>) {
        self.ez_stereo = stereo;
    }

    pub fn ez_stereo_for(&self, a: NodeIndex, b: NodeIndex) -> Option<&EZStereo> {
        let key = ordered_pair(a, b);
        self.ez_stereo.iter().find(|s| s.bond == key)
    }

    /// Adds a double-bond descriptor, normalizing the bond to low index
    /// first and swapping `refs` to follow.
    pub fn add_ez_stereo(&mut self, stereo: EZStereo) {
        let (a, b) = stereo.bond;
        let stereo = if a.index() <= b.index() {
            stereo
        } else {
            EZStereo {
                bond: (b, a),
                refs: [stereo.refs[1], stereo.refs[0]],
            }
        };
        self.ez_stereo.push(stereo);
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            tetrahedral_stereo: self.tetrahedral_stereo.clone(),
            ez_stereo: self.ez_stereo.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("tetrahedral_stereo", &self.tetrahedral_stereo)
            .field("ez_stereo", &self.ez_stereo)
            .finish()
    }
}

pub(crate) fn ordered_pair(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Parity of the permutation taking `from` to `to`: `Some(true)` for even,
/// `Some(false)` for odd, `None` when the slices are not permutations of each
/// other.
pub(crate) fn permutation_parity<T: Eq>(from: &[T], to: &[T]) -> Option<bool> {
    let n = from.len();
    if n != to.len() {
        return None;
    }
    let mut perm = Vec::with_capacity(n);
    for f in from {
        perm.push(to.iter().position(|t| t == f)?);
    }
    let mut visited = vec![false; n];
    let mut swaps = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut cycle_len = 0;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        swaps += cycle_len - 1;
    }
    Some(swaps.is_multiple_of(2))
}
