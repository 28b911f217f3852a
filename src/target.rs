use std::collections::HashMap;
use std::sync::OnceLock;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::error::InvalidGraphError;
use crate::mol::Mol;
use crate::ring_search::RingSearch;

/// Read-only cache over a target molecule.
///
/// Holds sorted neighbour lists and a dense `V x V` bond table so the search
/// engine can answer adjacency questions in constant time. The cache owns a
/// copy of the target; if the molecule changes, build a new one.
///
/// `TargetProperties` is `Send + Sync` and can be shared between concurrent
/// sessions behind an [`Arc`](std::sync::Arc).
#[derive(Debug)]
pub struct TargetProperties {
    mol: Mol<Atom, Bond>,
    neighbors: Vec<Vec<NodeIndex>>,
    bond_table: Vec<Option<EdgeIndex>>,
    symbol_counts: HashMap<String, usize>,
    rings: OnceLock<RingSearch>,
}

impl TargetProperties {
    pub fn build(mol: &Mol<Atom, Bond>) -> Result<Self, InvalidGraphError> {
        Self::from_mol(mol.clone())
    }

    /// Like [`build`](Self::build), taking ownership of the molecule.
    pub fn from_mol(mol: Mol<Atom, Bond>) -> Result<Self, InvalidGraphError> {
        mol.validate()?;

        let n = mol.atom_count();
        let mut neighbors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut bond_table = vec![None; n * n];

        for edge in mol.bonds() {
            let Some((a, b)) = mol.bond_endpoints(edge) else {
                continue;
            };
            neighbors[a.index()].push(b);
            neighbors[b.index()].push(a);
            bond_table[a.index() * n + b.index()] = Some(edge);
            bond_table[b.index() * n + a.index()] = Some(edge);
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        let mut symbol_counts = HashMap::new();
        for idx in mol.atoms() {
            *symbol_counts
                .entry(mol.atom(idx).symbol.clone())
                .or_insert(0) += 1;
        }

        tracing::trace!(atoms = n, bonds = mol.bond_count(), "built target properties");

        Ok(Self {
            mol,
            neighbors,
            bond_table,
            symbol_counts,
            rings: OnceLock::new(),
        })
    }

    pub fn mol(&self) -> &Mol<Atom, Bond> {
        &self.mol
    }

    pub fn atom_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn bond_count(&self) -> usize {
        self.mol.bond_count()
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.mol.atoms()
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        self.mol.atom(idx)
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        self.mol.bond(idx)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.mol.bond_endpoints(idx)
    }

    pub fn count_neighbors(&self, idx: NodeIndex) -> usize {
        self.neighbors[idx.index()].len()
    }

    /// Neighbours in ascending index order.
    pub fn neighbors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.neighbors[idx.index()]
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        let n = self.atom_count();
        if a.index() >= n || b.index() >= n {
            return None;
        }
        self.bond_table[a.index() * n + b.index()]
    }

    /// Number of atoms carrying `symbol`.
    pub fn symbol_count(&self, symbol: &str) -> usize {
        self.symbol_counts.get(symbol).copied().unwrap_or(0)
    }

    /// Ring perception, computed on first use.
    pub fn rings(&self) -> &RingSearch {
        self.rings.get_or_init(|| RingSearch::new(&self.mol))
    }
}
