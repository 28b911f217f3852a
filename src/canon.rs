use std::hash::{Hash, Hasher};

use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::traits::{
    HasAromaticity, HasBondOrder, HasFormalCharge, HasHydrogenCount, HasIsotope, HasSymbol,
};

struct Fnv1aHasher(u64);

impl Fnv1aHasher {
    fn new() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }
}

/// Hashes any invariant with the crate's fixed FNV-1a hasher, so partitions
/// are reproducible across runs.
pub fn invariant_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut h = Fnv1aHasher::new();
    value.hash(&mut h);
    h.finish()
}

#[derive(Hash)]
struct AtomInvariant<'a> {
    symbol: &'a str,
    degree: usize,
    hydrogen_count: u8,
    formal_charge: i8,
    is_aromatic: bool,
    isotope: Option<u16>,
    bond_orders: [u8; 4],
}

/// Initial per-atom invariants for plain molecules: element, degree,
/// hydrogens, charge, aromaticity, isotope and the bond-order profile.
pub fn atom_invariants<A, B>(mol: &Mol<A, B>) -> Vec<u64>
where
    A: HasSymbol + HasHydrogenCount + HasFormalCharge + HasAromaticity + HasIsotope,
    B: HasBondOrder,
{
    mol.atoms()
        .map(|idx| {
            let atom = mol.atom(idx);
            let mut bond_orders = [0u8; 4];
            for edge in mol.bonds_of(idx) {
                let slot = match mol.bond(edge).bond_order() {
                    BondOrder::Single => 0,
                    BondOrder::Double => 1,
                    BondOrder::Triple => 2,
                    BondOrder::Aromatic => 3,
                };
                bond_orders[slot] = bond_orders[slot].saturating_add(1);
            }
            invariant_hash(&AtomInvariant {
                symbol: atom.symbol(),
                degree: mol.degree(idx),
                hydrogen_count: atom.hydrogen_count(),
                formal_charge: atom.formal_charge(),
                is_aromatic: atom.is_aromatic(),
                isotope: atom.isotope(),
                bond_orders,
            })
        })
        .collect()
}

fn ranks_by_key<K: Ord>(keys: &[K]) -> Vec<usize> {
    let n = keys.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut ranks = vec![0usize; n];
    for i in 1..n {
        ranks[indices[i]] = if keys[indices[i]] == keys[indices[i - 1]] {
            ranks[indices[i - 1]]
        } else {
            i
        };
    }
    ranks
}

fn count_distinct(ranks: &[usize]) -> usize {
    let mut sorted: Vec<usize> = ranks.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

// Keys are (own rank, sorted neighbour ranks), so refinement only ever
// splits classes and keeps the relative order of existing ones.
fn refine<A, B>(mol: &Mol<A, B>, ranks: &mut Vec<usize>) {
    let mut prev_distinct = count_distinct(ranks);

    loop {
        let keys: Vec<(usize, Vec<usize>)> = mol
            .atoms()
            .map(|node| {
                let mut neighbor_ranks: Vec<usize> =
                    mol.neighbors(node).map(|nb| ranks[nb.index()]).collect();
                neighbor_ranks.sort_unstable();
                (ranks[node.index()], neighbor_ranks)
            })
            .collect();
        let new_ranks = ranks_by_key(&keys);
        let distinct = count_distinct(&new_ranks);
        if distinct <= prev_distinct {
            return;
        }
        *ranks = new_ranks;
        prev_distinct = distinct;
    }
}

/// Equitable partition of the atoms: two atoms share a class when iterative
/// neighbourhood refinement cannot tell them apart. Symmetry-equivalent
/// atoms always share a class.
///
/// # Panics
///
/// Panics if `invariants` is shorter than the atom count.
pub fn symmetry_classes<A, B>(mol: &Mol<A, B>, invariants: &[u64]) -> Vec<usize> {
    let mut ranks = ranks_by_key(&invariants[..mol.atom_count()]);
    refine(mol, &mut ranks);
    ranks
}

/// Refines [`symmetry_classes`] to a discrete partition by repeatedly
/// splitting the lowest-index atom out of the first tied class and refining
/// again. Returns a distinct label per atom.
///
/// # Panics
///
/// Panics if `invariants` is shorter than the atom count.
pub fn discrete_labels<A, B>(mol: &Mol<A, B>, invariants: &[u64]) -> Vec<usize> {
    let n = mol.atom_count();
    let mut ranks = symmetry_classes(mol, invariants);

    while count_distinct(&ranks) < n {
        let tied_rank = (0..n)
            .filter(|&i| ranks.iter().filter(|&&r| r == ranks[i]).count() > 1)
            .map(|i| ranks[i])
            .min();
        let Some(tied_rank) = tied_rank else {
            break;
        };
        let chosen = (0..n).find(|&i| ranks[i] == tied_rank).unwrap_or(0);
        let values: Vec<u64> = (0..n)
            .map(|i| 2 * ranks[i] as u64 + u64::from(i != chosen))
            .collect();
        ranks = ranks_by_key(&values);
        refine(mol, &mut ranks);
    }

    ranks
}
