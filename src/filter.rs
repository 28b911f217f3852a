//! Scoring and ranking of finished mappings.

use std::cmp::Ordering;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::bond::BondOrder;
use crate::compiler::MatchQuery;
use crate::energy::bond_energy;
use crate::mapping::{AtomMapping, MappingResult, PartialMapping};
use crate::matcher::BondMatcher;
use crate::mol::{permutation_parity, AtomId};
use crate::target::TargetProperties;
use crate::traits::HasAromaticity;

/// Which criteria take part in ranking. Tanimoto and discovery order always
/// do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemFilters {
    pub stereo: bool,
    pub fragment: bool,
    pub energy: bool,
}

impl ChemFilters {
    pub fn new(stereo: bool, fragment: bool, energy: bool) -> Self {
        Self {
            stereo,
            fragment,
            energy,
        }
    }

    pub fn all() -> Self {
        Self::new(true, true, true)
    }
}

/// Tanimoto over bonds: `mapped / (query + target - mapped)`.
///
/// When neither molecule has bonds the score is 1 if every atom on both
/// sides is mapped and 0 otherwise.
pub fn tanimoto(
    query_bonds: usize,
    target_bonds: usize,
    mapped_bonds: usize,
    fully_mapped: bool,
) -> f64 {
    let union = (query_bonds + target_bonds).saturating_sub(mapped_bonds);
    if union == 0 {
        return if fully_mapped { 1.0 } else { 0.0 };
    }
    mapped_bonds as f64 / union as f64
}

/// `sqrt(query + target - 2 * mapped)` over bond counts.
pub fn euclidean_distance(query_bonds: usize, target_bonds: usize, mapped_bonds: usize) -> f64 {
    ((query_bonds + target_bonds).saturating_sub(2 * mapped_bonds) as f64).sqrt()
}

/// Scores mappings between one compiled query and one target, and orders
/// them.
#[derive(Debug, Clone)]
pub struct ChemicalFilter<'a> {
    query: &'a MatchQuery,
    target: &'a TargetProperties,
    match_bonds: bool,
    filters: ChemFilters,
}

impl<'a> ChemicalFilter<'a> {
    pub fn new(query: &'a MatchQuery, target: &'a TargetProperties) -> Self {
        Self {
            query,
            target,
            match_bonds: true,
            filters: ChemFilters::default(),
        }
    }

    pub fn with_match_bonds(self, match_bonds: bool) -> Self {
        Self {
            match_bonds,
            ..self
        }
    }

    pub fn with_filters(self, filters: ChemFilters) -> Self {
        Self { filters, ..self }
    }

    pub fn set_chem_filters(&mut self, stereo: bool, fragment: bool, energy: bool) {
        self.filters = ChemFilters::new(stereo, fragment, energy);
    }

    pub fn filters(&self) -> ChemFilters {
        self.filters
    }

    /// Freezes a raw mapping and computes its scores. Energy is only
    /// computed when the energy filter is on.
    pub fn score(&self, pairs: AtomMapping, discovery_index: usize) -> MappingResult {
        let mapping = PartialMapping::from_pairs(
            self.query.atom_count(),
            self.target.atom_count(),
            &pairs,
        );
        let bond_pairs = self.bond_pairs(&mapping);
        let mapped = bond_pairs.len();
        let query_bonds = self.query.bond_count();
        let target_bonds = self.target.bond_count();
        let fully_mapped = mapping.len() == self.query.atom_count()
            && mapping.len() == self.target.atom_count();

        let fragment_count = self.fragment_count(&mapping);
        let stereo_consistent = self.stereo_consistent(&mapping);
        let energy = self
            .filters
            .energy
            .then(|| self.unmapped_energy(&bond_pairs));

        let mut result = MappingResult::new(mapping.pairs(), bond_pairs, discovery_index);
        result.tanimoto = tanimoto(query_bonds, target_bonds, mapped, fully_mapped);
        result.euclidean = euclidean_distance(query_bonds, target_bonds, mapped);
        result.fragment_count = fragment_count;
        result.stereo_consistent = stereo_consistent;
        result.energy = energy;
        result
    }

    /// Scores every mapping, numbering them in the given order, and sorts.
    pub fn rank(&self, mappings: Vec<AtomMapping>) -> Vec<MappingResult> {
        let mut results: Vec<MappingResult> = mappings
            .into_iter()
            .enumerate()
            .map(|(i, pairs)| self.score(pairs, i))
            .collect();
        self.sort(&mut results);
        results
    }

    /// Stable sort: stereo-consistent first, fewer fragments, lower energy
    /// (each only when enabled), then higher Tanimoto, then discovery order.
    pub fn sort(&self, results: &mut [MappingResult]) {
        let filters = self.filters;
        results.sort_by(|a, b| {
            let mut ord = Ordering::Equal;
            if filters.stereo {
                ord = ord.then(b.stereo_consistent.cmp(&a.stereo_consistent));
            }
            if filters.fragment {
                ord = ord.then(a.fragment_count.cmp(&b.fragment_count));
            }
            if filters.energy {
                let ea = a.energy.unwrap_or(0.0);
                let eb = b.energy.unwrap_or(0.0);
                ord = ord.then(ea.total_cmp(&eb));
            }
            ord.then(b.tanimoto.total_cmp(&a.tanimoto))
                .then(a.discovery_index().cmp(&b.discovery_index()))
        });
    }

    fn bond_pairs(&self, mapping: &PartialMapping) -> Vec<(EdgeIndex, EdgeIndex)> {
        self.query
            .edges()
            .iter()
            .filter_map(|edge| {
                let ta = mapping.target_of(edge.begin)?;
                let tb = mapping.target_of(edge.end)?;
                let t_edge = self.target.bond_between(ta, tb)?;
                if self.match_bonds && !edge.matcher.matches(self.target, t_edge) {
                    return None;
                }
                Some((edge.bond, t_edge))
            })
            .collect()
    }

    // Connected pieces left over on both sides once mapped atoms are removed.
    fn fragment_count(&self, mapping: &PartialMapping) -> usize {
        let nq = self.query.atom_count();
        let nt = self.target.atom_count();
        let mut uf = UnionFind::<usize>::new(nq + nt);

        for edge in self.query.edges() {
            if !mapping.is_query_mapped(edge.begin) && !mapping.is_query_mapped(edge.end) {
                uf.union(edge.begin.index(), edge.end.index());
            }
        }
        for e in self.target.mol().bonds() {
            let Some((a, b)) = self.target.bond_endpoints(e) else {
                continue;
            };
            if !mapping.is_target_mapped(a) && !mapping.is_target_mapped(b) {
                uf.union(nq + a.index(), nq + b.index());
            }
        }

        let unmapped_query = (0..nq).filter(|&q| !mapping.is_query_mapped(NodeIndex::new(q)));
        let unmapped_target = (0..nt)
            .filter(|&t| !mapping.is_target_mapped(NodeIndex::new(t)))
            .map(|t| nq + t);
        let mut roots: Vec<usize> = unmapped_query
            .chain(unmapped_target)
            .map(|i| uf.find(i))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }

    fn stereo_consistent(&self, mapping: &PartialMapping) -> bool {
        self.tetrahedral_consistent(mapping) && self.double_bonds_consistent(mapping)
    }

    fn tetrahedral_consistent(&self, mapping: &PartialMapping) -> bool {
        let target_mol = self.target.mol();
        for stereo in self.query.tetrahedral_stereo() {
            let Some(center) = mapping.target_of(stereo.center) else {
                continue;
            };
            let Some(target_stereo) = target_mol.tetrahedral_stereo_for(center) else {
                continue;
            };
            let Some(mapped) = stereo
                .above
                .iter()
                .map(|&id| self.map_ref(id, mapping, center))
                .collect::<Option<Vec<AtomId>>>()
            else {
                continue;
            };
            let expected: Vec<AtomId> = target_stereo
                .above
                .iter()
                .map(|&id| normalize_virtual(id, center))
                .collect();
            if permutation_parity(&mapped, &expected) == Some(false) {
                return false;
            }
        }
        true
    }

    fn double_bonds_consistent(&self, mapping: &PartialMapping) -> bool {
        let target_mol = self.target.mol();
        for stereo in self.query.ez_stereo() {
            let (Some(ta), Some(tb)) = (
                mapping.target_of(stereo.bond.0),
                mapping.target_of(stereo.bond.1),
            ) else {
                continue;
            };
            let Some(target_stereo) = target_mol.ez_stereo_for(ta, tb) else {
                continue;
            };
            let (Some(r0), Some(r1)) = (
                self.map_ref(stereo.refs[0], mapping, ta),
                self.map_ref(stereo.refs[1], mapping, tb),
            ) else {
                continue;
            };
            // put the mapped refs on the same ends as the target's refs
            let (r0, r1) = if ta == target_stereo.bond.0 {
                (r0, r1)
            } else {
                (r1, r0)
            };
            let (lo, hi) = target_stereo.bond;
            let same0 = r0 == normalize_virtual(target_stereo.refs[0], lo);
            let same1 = r1 == normalize_virtual(target_stereo.refs[1], hi);
            if same0 != same1 {
                return false;
            }
        }
        true
    }

    // Image of a query stereo reference around `owner_image`. A hydrogen the
    // query leaves implicit, or an unmapped explicit query hydrogen, stands
    // for whichever hydrogen the target puts on the image.
    fn map_ref(
        &self,
        id: AtomId,
        mapping: &PartialMapping,
        owner_image: NodeIndex,
    ) -> Option<AtomId> {
        match id {
            AtomId::Node(q) => match mapping.target_of(q) {
                Some(t) => Some(AtomId::Node(t)),
                None if self.query.node(q).matcher.symbol() == Some("H") => {
                    self.hydrogen_image(mapping, owner_image)
                }
                None => None,
            },
            AtomId::VirtualH(..) => self.hydrogen_image(mapping, owner_image),
        }
    }

    // `None` when the target hydrogen on `owner` cannot be told apart.
    fn hydrogen_image(&self, mapping: &PartialMapping, owner: NodeIndex) -> Option<AtomId> {
        let mut spare = self
            .target
            .neighbors(owner)
            .iter()
            .filter(|&&t| !mapping.is_target_mapped(t) && self.target.atom(t).is_hydrogen());
        let first = spare.next().copied();
        let more = spare.next().is_some();
        let implicit = self.target.atom(owner).hydrogen_count > 0;
        match first {
            None => Some(AtomId::VirtualH(owner, 0)),
            Some(h) if !more && !implicit => Some(AtomId::Node(h)),
            Some(_) => None,
        }
    }

    fn unmapped_energy(&self, bond_pairs: &[(EdgeIndex, EdgeIndex)]) -> f64 {
        let mut query_mapped = vec![false; self.query.bond_count()];
        let mut target_mapped = vec![false; self.target.bond_count()];
        for &(q, t) in bond_pairs {
            if let Some(slot) = query_mapped.get_mut(q.index()) {
                *slot = true;
            }
            if let Some(slot) = target_mapped.get_mut(t.index()) {
                *slot = true;
            }
        }

        let mut total = 0.0;
        for (slot, edge) in self.query.edges().iter().enumerate() {
            if query_mapped[slot] {
                continue;
            }
            let a = self.query.node(edge.begin).matcher.symbol().unwrap_or("*");
            let b = self.query.node(edge.end).matcher.symbol().unwrap_or("*");
            let (order, aromatic) = match &edge.matcher {
                BondMatcher::Order { order, aromatic } => (*order, *aromatic),
                BondMatcher::Pattern(_) => (BondOrder::Single, false),
            };
            total += bond_energy(a, b, order, aromatic);
        }
        for e in self.target.mol().bonds() {
            if target_mapped[e.index()] {
                continue;
            }
            let Some((a, b)) = self.target.bond_endpoints(e) else {
                continue;
            };
            let bond = self.target.bond(e);
            total += bond_energy(
                &self.target.atom(a).symbol,
                &self.target.atom(b).symbol,
                bond.order,
                bond.is_aromatic(),
            );
        }
        total
    }
}

// Implicit hydrogens are interchangeable, so all of them compare equal.
fn normalize_virtual(id: AtomId, owner: NodeIndex) -> AtomId {
    match id {
        AtomId::Node(_) => id,
        AtomId::VirtualH(..) => AtomId::VirtualH(owner, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::QueryCompiler;
    use crate::mol::{EZStereo, Mol, TetrahedralStereo};
    use crate::vf::VfEngine;
    use crate::{Atom, Bond};

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn chain(symbols: &[&str]) -> Mol<Atom, Bond> {
        Mol::from_parts(
            symbols.iter().map(|s| Atom::new(*s)).collect(),
            (1..symbols.len()).map(|i| (i - 1, i, Bond::single())).collect(),
        )
        .unwrap()
    }

    #[test]
    fn tanimoto_edge_cases() {
        assert_eq!(tanimoto(2, 2, 2, false), 1.0);
        assert_eq!(tanimoto(1, 3, 1, false), 1.0 / 3.0);
        assert_eq!(tanimoto(0, 0, 0, true), 1.0);
        assert_eq!(tanimoto(0, 0, 0, false), 0.0);
        assert_eq!(euclidean_distance(1, 3, 1), 2.0_f64.sqrt());
    }

    #[test]
    fn score_counts_bonds_and_fragments() {
        // C-C inside C-C-C-O, mapped on the first bond: the remainder C-O
        // is one fragment
        let query = QueryCompiler::substructure().compile(&chain(&["C", "C"])).unwrap();
        let target = TargetProperties::build(&chain(&["C", "C", "C", "O"])).unwrap();
        let filter = ChemicalFilter::new(&query, &target);
        let result = filter.score(vec![(n(0), n(0)), (n(1), n(1))], 0);
        assert_eq!(result.bond_pairs().len(), 1);
        assert_eq!(result.tanimoto(), 1.0 / 3.0);
        assert_eq!(result.fragment_count(), 1);
        assert_eq!(result.energy(), None);

        let middle = filter.score(vec![(n(0), n(1)), (n(1), n(2))], 1);
        assert_eq!(middle.fragment_count(), 2);
    }

    #[test]
    fn fragment_filter_prefers_fewer_pieces() {
        let query = QueryCompiler::substructure().compile(&chain(&["C", "C"])).unwrap();
        let target = TargetProperties::build(&chain(&["C", "C", "C", "O"])).unwrap();
        let mappings = VfEngine::new(&query, &target).find_all().mappings;
        let mut filter = ChemicalFilter::new(&query, &target);

        let plain = filter.rank(mappings.clone());
        assert_eq!(plain[0].discovery_index(), 0);
        assert!(plain.windows(2).all(|w| w[0].discovery_index() < w[1].discovery_index()));

        filter.set_chem_filters(false, true, false);
        let ranked = filter.rank(mappings);
        assert!(ranked.windows(2).all(|w| w[0].fragment_count() <= w[1].fragment_count()));
        assert_eq!(ranked[0].fragment_count(), 1);
    }

    #[test]
    fn energy_filter_prefers_cheaper_remainder() {
        // C-C against C=C-C without bond orders: leaving the C=C unmapped
        // costs more than leaving the C-C
        let target_mol = Mol::from_parts(
            vec![Atom::new("C"), Atom::new("C"), Atom::new("C")],
            vec![(0, 1, Bond::double()), (1, 2, Bond::single())],
        )
        .unwrap();
        let query = QueryCompiler::substructure().compile(&chain(&["C", "C"])).unwrap();
        let target = TargetProperties::build(&target_mol).unwrap();
        let mut filter = ChemicalFilter::new(&query, &target).with_match_bonds(false);
        filter.set_chem_filters(false, false, true);
        let ranked = filter.rank(vec![
            vec![(n(0), n(1)), (n(1), n(2))],
            vec![(n(0), n(0)), (n(1), n(1))],
        ]);
        assert_eq!(ranked[0].discovery_index(), 1);
        assert_eq!(ranked[0].energy(), Some(346.0));
        assert_eq!(ranked[1].energy(), Some(614.0));
    }

    fn chiral(above: [usize; 4]) -> Mol<Atom, Bond> {
        // C(F)(Cl)(Br)I
        let mut mol = Mol::from_parts(
            vec![
                Atom::new("C"),
                Atom::new("F"),
                Atom::new("Cl"),
                Atom::new("Br"),
                Atom::new("I"),
            ],
            (1..5).map(|i| (0, i, Bond::single())).collect(),
        )
        .unwrap();
        mol.add_tetrahedral_stereo(TetrahedralStereo {
            center: n(0),
            above: above.map(|i| AtomId::Node(n(i))),
        });
        mol
    }

    #[test]
    fn tetrahedral_parity() {
        let target = TargetProperties::build(&chiral([1, 2, 3, 4])).unwrap();
        let identity: AtomMapping = (0..5).map(|i| (n(i), n(i))).collect();

        let same = QueryCompiler::substructure().compile(&chiral([2, 3, 1, 4])).unwrap();
        let filter = ChemicalFilter::new(&same, &target);
        assert!(filter.score(identity.clone(), 0).is_stereo_consistent());

        let mirror = QueryCompiler::substructure().compile(&chiral([2, 1, 3, 4])).unwrap();
        let filter = ChemicalFilter::new(&mirror, &target);
        assert!(!filter.score(identity, 0).is_stereo_consistent());
    }

    fn but2ene(cis: bool) -> Mol<Atom, Bond> {
        // C-C=C-C with an explicit H on each alkene carbon
        let mut mol = Mol::from_parts(
            vec![
                Atom::new("C"),
                Atom::new("C"),
                Atom::new("C"),
                Atom::new("C"),
                Atom::new("H"),
                Atom::new("H"),
            ],
            vec![
                (0, 1, Bond::single()),
                (1, 2, Bond::double()),
                (2, 3, Bond::single()),
                (1, 4, Bond::single()),
                (2, 5, Bond::single()),
            ],
        )
        .unwrap();
        let far = if cis { 3 } else { 5 };
        mol.add_ez_stereo(EZStereo {
            bond: (n(1), n(2)),
            refs: [AtomId::Node(n(0)), AtomId::Node(n(far))],
        });
        mol
    }

    #[test]
    fn double_bond_geometry() {
        let target = TargetProperties::build(&but2ene(true)).unwrap();
        let identity: AtomMapping = (0..6).map(|i| (n(i), n(i))).collect();

        let cis = QueryCompiler::substructure().compile(&but2ene(true)).unwrap();
        assert!(ChemicalFilter::new(&cis, &target)
            .score(identity.clone(), 0)
            .is_stereo_consistent());

        let trans = QueryCompiler::substructure().compile(&but2ene(false)).unwrap();
        assert!(!ChemicalFilter::new(&trans, &target)
            .score(identity, 0)
            .is_stereo_consistent());
    }

    // C(F)(Cl)Br with the fourth neighbour an implicit hydrogen
    fn chiral_implicit_h(above: [usize; 3]) -> Mol<Atom, Bond> {
        let mut mol = Mol::from_parts(
            vec![
                Atom::new("C").with_hydrogens(1),
                Atom::new("F"),
                Atom::new("Cl"),
                Atom::new("Br"),
            ],
            (1..4).map(|i| (0, i, Bond::single())).collect(),
        )
        .unwrap();
        let [a, b, c] = above.map(|i| AtomId::Node(n(i)));
        mol.add_tetrahedral_stereo(TetrahedralStereo {
            center: n(0),
            above: [a, b, c, AtomId::VirtualH(n(0), 0)],
        });
        mol
    }

    // the same centre with the hydrogen written out as atom 4
    fn chiral_explicit_h(above: [usize; 3]) -> Mol<Atom, Bond> {
        let mut mol = Mol::from_parts(
            vec![
                Atom::new("C"),
                Atom::new("F"),
                Atom::new("Cl"),
                Atom::new("Br"),
                Atom::new("H"),
            ],
            (1..5).map(|i| (0, i, Bond::single())).collect(),
        )
        .unwrap();
        let [a, b, c] = above.map(|i| AtomId::Node(n(i)));
        mol.add_tetrahedral_stereo(TetrahedralStereo {
            center: n(0),
            above: [a, b, c, AtomId::Node(n(4))],
        });
        mol
    }

    #[test]
    fn tetrahedral_parity_implicit_query_explicit_target() {
        let identity: AtomMapping = (0..4).map(|i| (n(i), n(i))).collect();

        let target = TargetProperties::build(&chiral_explicit_h([1, 2, 3])).unwrap();
        let same = QueryCompiler::substructure().compile(&chiral_implicit_h([1, 2, 3])).unwrap();
        assert!(ChemicalFilter::new(&same, &target)
            .score(identity.clone(), 0)
            .is_stereo_consistent());

        let mirror = QueryCompiler::substructure().compile(&chiral_implicit_h([2, 1, 3])).unwrap();
        assert!(!ChemicalFilter::new(&mirror, &target)
            .score(identity, 0)
            .is_stereo_consistent());
    }

    #[test]
    fn tetrahedral_parity_explicit_query_implicit_target() {
        // the query hydrogen has no atom to map to
        let identity: AtomMapping = (0..4).map(|i| (n(i), n(i))).collect();

        let target = TargetProperties::build(&chiral_implicit_h([1, 2, 3])).unwrap();
        let same = QueryCompiler::mcs().compile(&chiral_explicit_h([1, 2, 3])).unwrap();
        assert!(ChemicalFilter::new(&same, &target)
            .score(identity.clone(), 0)
            .is_stereo_consistent());

        let mirror = QueryCompiler::mcs().compile(&chiral_explicit_h([1, 3, 2])).unwrap();
        assert!(!ChemicalFilter::new(&mirror, &target)
            .score(identity, 0)
            .is_stereo_consistent());
    }

    #[test]
    fn double_bond_geometry_with_implicit_query_hydrogen() {
        // trans-but-2-ene written with an implicit H on C1: that H sits on
        // the same side as C3
        let mut query_mol = Mol::from_parts(
            vec![
                Atom::new("C"),
                Atom::new("C").with_hydrogens(1),
                Atom::new("C").with_hydrogens(1),
                Atom::new("C"),
            ],
            vec![
                (0, 1, Bond::single()),
                (1, 2, Bond::double()),
                (2, 3, Bond::single()),
            ],
        )
        .unwrap();
        query_mol.add_ez_stereo(EZStereo {
            bond: (n(1), n(2)),
            refs: [AtomId::VirtualH(n(1), 0), AtomId::Node(n(3))],
        });
        let query = QueryCompiler::substructure().compile(&query_mol).unwrap();
        let identity: AtomMapping = (0..4).map(|i| (n(i), n(i))).collect();

        let trans = TargetProperties::build(&but2ene(false)).unwrap();
        assert!(ChemicalFilter::new(&query, &trans)
            .score(identity.clone(), 0)
            .is_stereo_consistent());

        let cis = TargetProperties::build(&but2ene(true)).unwrap();
        assert!(!ChemicalFilter::new(&query, &cis)
            .score(identity, 0)
            .is_stereo_consistent());
    }

    #[test]
    fn ambiguous_hydrogen_is_not_compared() {
        // two spare explicit hydrogens on the centre image
        let mut target_mol = chiral_explicit_h([1, 2, 3]);
        let extra = target_mol.add_atom(Atom::new("H"));
        target_mol.add_bond(n(0), extra, Bond::single());
        let target = TargetProperties::build(&target_mol).unwrap();
        let mirror = QueryCompiler::substructure().compile(&chiral_implicit_h([2, 1, 3])).unwrap();
        let identity: AtomMapping = (0..4).map(|i| (n(i), n(i))).collect();
        assert!(ChemicalFilter::new(&mirror, &target)
            .score(identity, 0)
            .is_stereo_consistent());
    }

    #[test]
    fn stereo_filter_ranks_consistent_first() {
        let query = QueryCompiler::substructure().compile(&chiral([1, 2, 3, 4])).unwrap();
        let target = TargetProperties::build(&chiral([1, 2, 3, 4])).unwrap();
        let swapped: AtomMapping = vec![
            (n(0), n(0)),
            (n(1), n(2)),
            (n(2), n(1)),
            (n(3), n(3)),
            (n(4), n(4)),
        ];
        let identity: AtomMapping = (0..5).map(|i| (n(i), n(i))).collect();
        let mut filter = ChemicalFilter::new(&query, &target);

        let unfiltered = filter.rank(vec![swapped.clone(), identity.clone()]);
        assert_eq!(unfiltered[0].discovery_index(), 0);

        filter.set_chem_filters(true, false, false);
        let ranked = filter.rank(vec![swapped, identity]);
        assert!(ranked[0].is_stereo_consistent());
        assert_eq!(ranked[0].discovery_index(), 1);
        assert!(!ranked[1].is_stereo_consistent());
    }
}
