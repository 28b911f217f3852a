use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::pattern::{AtomExpr, BondExpr};
use crate::target::TargetProperties;
use crate::traits::{AtomQuery, BondQuery, HasAromaticity, HydrogenSuppress};

/// Compiled per-atom match criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomMatcher {
    /// Element symbol equality.
    ExactSymbol { symbol: String },
    /// Element symbol equality and at least `min_neighbors` target
    /// neighbours. Only sound when every query bond must be embedded.
    NeighborBound { symbol: String, min_neighbors: usize },
    /// Delegated predicate from an annotated query atom.
    Pattern(AtomExpr),
}

impl AtomMatcher {
    pub fn matches(&self, target: &TargetProperties, candidate: NodeIndex) -> bool {
        match self {
            AtomMatcher::ExactSymbol { symbol } => target.atom(candidate).symbol == *symbol,
            AtomMatcher::NeighborBound {
                symbol,
                min_neighbors,
            } => {
                target.atom(candidate).symbol == *symbol
                    && target.count_neighbors(candidate) >= *min_neighbors
            }
            AtomMatcher::Pattern(expr) => expr.matches(target, candidate),
        }
    }

    /// Element symbol for the plain variants.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            AtomMatcher::ExactSymbol { symbol } | AtomMatcher::NeighborBound { symbol, .. } => {
                Some(symbol)
            }
            AtomMatcher::Pattern(_) => None,
        }
    }

    pub(crate) fn uses_rings(&self) -> bool {
        match self {
            AtomMatcher::Pattern(expr) => expr.uses_rings(),
            _ => false,
        }
    }
}

/// Compiled per-bond match criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BondMatcher {
    /// An aromatic query bond matches any aromatic target bond. A
    /// non-aromatic one needs a non-aromatic target bond of the same order,
    /// however the target encodes its aromatic bonds.
    Order { order: BondOrder, aromatic: bool },
    /// Delegated predicate from an annotated query bond.
    Pattern(BondExpr),
}

impl BondMatcher {
    pub fn matches(&self, target: &TargetProperties, edge: EdgeIndex) -> bool {
        match self {
            BondMatcher::Order { order, aromatic } => {
                let bond = target.bond(edge);
                if *aromatic {
                    bond.is_aromatic()
                } else {
                    !bond.is_aromatic() && bond.order == *order
                }
            }
            BondMatcher::Pattern(expr) => expr.matches(target, edge),
        }
    }

    /// Bond order for the plain variant.
    pub fn order(&self) -> Option<BondOrder> {
        match self {
            BondMatcher::Order { order, .. } => Some(*order),
            BondMatcher::Pattern(_) => None,
        }
    }

    pub(crate) fn uses_rings(&self) -> bool {
        match self {
            BondMatcher::Pattern(expr) => expr.uses_rings(),
            BondMatcher::Order { .. } => false,
        }
    }
}

impl AtomQuery for Atom {
    fn atom_matcher(&self, min_neighbors: Option<usize>) -> AtomMatcher {
        match min_neighbors {
            Some(min_neighbors) => AtomMatcher::NeighborBound {
                symbol: self.symbol.clone(),
                min_neighbors,
            },
            None => AtomMatcher::ExactSymbol {
                symbol: self.symbol.clone(),
            },
        }
    }

    fn is_pattern(&self) -> bool {
        false
    }

    fn plain_symbol(&self) -> Option<&str> {
        Some(&self.symbol)
    }
}

impl BondQuery for Bond {
    fn bond_matcher(&self) -> BondMatcher {
        BondMatcher::Order {
            order: self.order,
            aromatic: self.is_aromatic(),
        }
    }

    fn is_pattern(&self) -> bool {
        false
    }
}

impl HydrogenSuppress for Atom {
    fn is_explicit_hydrogen(&self) -> bool {
        self.is_hydrogen() && self.isotope.is_none() && self.formal_charge == 0
    }

    fn add_implicit_hydrogens(&mut self, count: u8) {
        self.hydrogen_count = self.hydrogen_count.saturating_add(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol::Mol;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    // C(=O)C with aromatic-flagged kekule bond C=C elsewhere
    fn target() -> TargetProperties {
        let mol = Mol::from_parts(
            vec![Atom::new("C"), Atom::new("O"), Atom::new("C"), Atom::new("C")],
            vec![
                (0, 1, Bond::double()),
                (0, 2, Bond::single()),
                (2, 3, Bond::kekule_aromatic(BondOrder::Double)),
            ],
        )
        .unwrap();
        TargetProperties::build(&mol).unwrap()
    }

    #[test]
    fn exact_symbol_ignores_degree() {
        let t = target();
        let m = Atom::new("C").atom_matcher(None);
        assert!(m.matches(&t, n(3)));
        assert!(!m.matches(&t, n(1)));
    }

    #[test]
    fn neighbor_bound_requires_enough_neighbours() {
        let t = target();
        let m = Atom::new("C").atom_matcher(Some(2));
        assert!(m.matches(&t, n(0)));
        assert!(m.matches(&t, n(2)));
        assert!(!m.matches(&t, n(3)));
    }

    #[test]
    fn order_matcher_compares_orders() {
        let t = target();
        let double = Bond::double().bond_matcher();
        let single = Bond::single().bond_matcher();
        let co = t.bond_between(n(0), n(1)).unwrap();
        assert!(double.matches(&t, co));
        assert!(!single.matches(&t, co));
    }

    #[test]
    fn aromatic_bonds_match_regardless_of_kekule_order() {
        let t = target();
        let aromatic = Bond::aromatic().bond_matcher();
        let cc = t.bond_between(n(2), n(3)).unwrap();
        assert!(aromatic.matches(&t, cc));
        assert!(Bond::kekule_aromatic(BondOrder::Single).bond_matcher().matches(&t, cc));
        assert!(!aromatic.matches(&t, t.bond_between(n(0), n(2)).unwrap()));
    }

    #[test]
    fn plain_bonds_never_match_aromatic_ones() {
        // the same ring bond stored two ways
        let kekule = target();
        let flagged = kekule.bond_between(n(2), n(3)).unwrap();
        let explicit = TargetProperties::build(
            &Mol::from_parts(
                vec![Atom::new("C"), Atom::new("C")],
                vec![(0, 1, Bond::aromatic())],
            )
            .unwrap(),
        )
        .unwrap();
        let aromatic_order = explicit.bond_between(n(0), n(1)).unwrap();

        for plain in [Bond::single(), Bond::double()] {
            let matcher = plain.bond_matcher();
            assert!(!matcher.matches(&kekule, flagged));
            assert!(!matcher.matches(&explicit, aromatic_order));
        }
    }

    #[test]
    fn labelled_hydrogen_is_not_suppressed() {
        assert!(Atom::new("H").is_explicit_hydrogen());
        assert!(!Atom::new("H").with_isotope(2).is_explicit_hydrogen());
        assert!(!Atom::new("H").with_charge(1).is_explicit_hydrogen());
        assert!(!Atom::new("C").is_explicit_hydrogen());
    }
}
