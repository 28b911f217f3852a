use petgraph::graph::NodeIndex;

use crate::mol::{AtomId, EZStereo, Mol, TetrahedralStereo};
use crate::traits::HydrogenSuppress;

/// Folds explicit hydrogens into their heavy-atom neighbour.
///
/// A hydrogen is removed when the atom reports itself as an explicit
/// hydrogen and has exactly one neighbour; that neighbour's implicit
/// hydrogen count goes up by one. Stereo descriptors that named a removed
/// hydrogen refer to a virtual hydrogen of its neighbour instead.
pub fn remove_hs<A, B>(mol: &Mol<A, B>) -> Mol<A, B>
where
    A: HydrogenSuppress + Clone,
    B: Clone,
{
    let node_count = mol.atom_count();
    let mut parent_of: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut extra_h = vec![0u8; node_count];

    for idx in mol.atoms() {
        if !mol.atom(idx).is_explicit_hydrogen() || mol.degree(idx) != 1 {
            continue;
        }
        let Some(parent) = mol.neighbors(idx).next() else {
            continue;
        };
        // H-H: keep the pair rather than emptying both
        if mol.atom(parent).is_explicit_hydrogen() && mol.degree(parent) == 1 {
            continue;
        }
        parent_of[idx.index()] = Some(parent);
        extra_h[parent.index()] = extra_h[parent.index()].saturating_add(1);
    }

    let mut result = Mol::new();
    let mut index_map: Vec<Option<NodeIndex>> = vec![None; node_count];
    for idx in mol.atoms() {
        if parent_of[idx.index()].is_some() {
            continue;
        }
        let mut atom = mol.atom(idx).clone();
        if extra_h[idx.index()] > 0 {
            atom.add_implicit_hydrogens(extra_h[idx.index()]);
        }
        index_map[idx.index()] = Some(result.add_atom(atom));
    }

    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        if let (Some(new_a), Some(new_b)) = (index_map[a.index()], index_map[b.index()]) {
            result.add_bond(new_a, new_b, mol.bond(edge).clone());
        }
    }

    let remap = |id: AtomId| -> Option<AtomId> {
        match id {
            AtomId::Node(idx) => match parent_of.get(idx.index()).copied().flatten() {
                Some(parent) => Some(AtomId::VirtualH(index_map[parent.index()]?, 0)),
                None => Some(AtomId::Node(index_map.get(idx.index()).copied().flatten()?)),
            },
            AtomId::VirtualH(owner, k) => {
                Some(AtomId::VirtualH(index_map.get(owner.index()).copied().flatten()?, k))
            }
        }
    };

    let tetrahedral: Vec<TetrahedralStereo> = mol
        .tetrahedral_stereo()
        .iter()
        .filter_map(|s| {
            let center = index_map.get(s.center.index()).copied().flatten()?;
            let mut above = s.above;
            for id in &mut above {
                *id = remap(*id)?;
            }
            Some(TetrahedralStereo { center, above })
        })
        .collect();
    result.set_tetrahedral_stereo(tetrahedral);

    let remap_ez = |s: &EZStereo| -> Option<EZStereo> {
        Some(EZStereo {
            bond: (
                index_map.get(s.bond.0.index()).copied().flatten()?,
                index_map.get(s.bond.1.index()).copied().flatten()?,
            ),
            refs: [remap(s.refs[0])?, remap(s.refs[1])?],
        })
    };
    for stereo in mol.ez_stereo().iter().filter_map(remap_ez) {
        result.add_ez_stereo(stereo);
    }

    let removed = parent_of.iter().filter(|p| p.is_some()).count();
    if removed > 0 {
        tracing::trace!(removed, "removed explicit hydrogens");
    }

    result
}
