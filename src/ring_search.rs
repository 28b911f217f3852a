use std::collections::VecDeque;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// Ring membership of atoms and bonds.
///
/// A bond is cyclic exactly when it is not a bridge of the graph, so
/// membership comes from one depth-first lowlink pass. Smallest ring sizes
/// are found by a breadth-first search over cyclic bonds only.
#[derive(Debug, Clone)]
pub struct RingSearch {
    cyclic_atoms: Vec<bool>,
    cyclic_bonds: Vec<bool>,
    ring_bond_counts: Vec<usize>,
    smallest_ring: Vec<Option<usize>>,
}

impl RingSearch {
    pub fn new<A, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let adjacency: Vec<Vec<(NodeIndex, EdgeIndex)>> = mol
            .atoms()
            .map(|a| {
                mol.bonds_of(a)
                    .filter_map(|e| {
                        let (u, v) = mol.bond_endpoints(e)?;
                        Some((if u == a { v } else { u }, e))
                    })
                    .collect()
            })
            .collect();

        let bridges = find_bridges(&adjacency, mol.bond_count());
        let cyclic_bonds: Vec<bool> = bridges.iter().map(|&b| !b).collect();

        let ring_bond_counts: Vec<usize> = adjacency
            .iter()
            .map(|edges| edges.iter().filter(|(_, e)| cyclic_bonds[e.index()]).count())
            .collect();
        let cyclic_atoms: Vec<bool> = ring_bond_counts.iter().map(|&c| c > 0).collect();

        let smallest_ring = (0..n)
            .map(|i| {
                if cyclic_atoms[i] {
                    smallest_cycle_through(&adjacency, &cyclic_bonds, NodeIndex::new(i))
                } else {
                    None
                }
            })
            .collect();

        Self {
            cyclic_atoms,
            cyclic_bonds,
            ring_bond_counts,
            smallest_ring,
        }
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.cyclic_atoms.get(atom.index()).copied().unwrap_or(false)
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.cyclic_bonds.get(bond.index()).copied().unwrap_or(false)
    }

    pub fn ring_bond_count(&self, atom: NodeIndex) -> usize {
        self.ring_bond_counts.get(atom.index()).copied().unwrap_or(0)
    }

    pub fn smallest_ring_size(&self, atom: NodeIndex) -> Option<usize> {
        self.smallest_ring.get(atom.index()).copied().flatten()
    }

    pub fn cyclic_atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.cyclic_atoms
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(|(i, _)| NodeIndex::new(i))
    }
}

fn find_bridges(adjacency: &[Vec<(NodeIndex, EdgeIndex)>], bond_count: usize) -> Vec<bool> {
    let n = adjacency.len();
    let mut disc = vec![usize::MAX; n];
    let mut low = vec![0usize; n];
    let mut bridge = vec![false; bond_count];
    let mut timer = 0usize;
    // (atom, edge used to reach it, next adjacency slot)
    let mut stack: Vec<(usize, Option<EdgeIndex>, usize)> = Vec::new();

    for root in 0..n {
        if disc[root] != usize::MAX {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        stack.push((root, None, 0));

        while let Some(frame) = stack.last_mut() {
            let v = frame.0;
            if frame.2 < adjacency[v].len() {
                let (w, e) = adjacency[v][frame.2];
                frame.2 += 1;
                if frame.1 == Some(e) {
                    continue;
                }
                let w = w.index();
                if disc[w] == usize::MAX {
                    disc[w] = timer;
                    low[w] = timer;
                    timer += 1;
                    stack.push((w, Some(e), 0));
                } else {
                    low[v] = low[v].min(disc[w]);
                }
            } else {
                let parent_edge = frame.1;
                stack.pop();
                if let (Some(e), Some(parent)) = (parent_edge, stack.last()) {
                    let u = parent.0;
                    low[u] = low[u].min(low[v]);
                    if low[v] > disc[u] {
                        bridge[e.index()] = true;
                    }
                }
            }
        }
    }

    bridge
}

fn smallest_cycle_through(
    adjacency: &[Vec<(NodeIndex, EdgeIndex)>],
    cyclic_bonds: &[bool],
    atom: NodeIndex,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut dist = vec![usize::MAX; adjacency.len()];
    let mut queue = VecDeque::new();

    for &(start, skipped) in &adjacency[atom.index()] {
        if !cyclic_bonds[skipped.index()] {
            continue;
        }
        dist.iter_mut().for_each(|d| *d = usize::MAX);
        queue.clear();
        dist[start.index()] = 0;
        queue.push_back(start);

        while let Some(cur) = queue.pop_front() {
            let d = dist[cur.index()];
            if best.is_some_and(|b| d + 1 >= b) {
                break;
            }
            if cur == atom {
                best = Some(d + 1);
                break;
            }
            for &(nb, e) in &adjacency[cur.index()] {
                if e == skipped || !cyclic_bonds[e.index()] || dist[nb.index()] != usize::MAX {
                    continue;
                }
                dist[nb.index()] = d + 1;
                queue.push_back(nb);
            }
        }
    }

    best
}
