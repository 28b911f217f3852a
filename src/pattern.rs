//! Pattern predicates for annotated query atoms and bonds.
//!
//! A SMARTS parser (not part of this crate) produces [`AtomExpr`] and
//! [`BondExpr`] trees. The compiler wraps them in
//! [`AtomMatcher::Pattern`](crate::AtomMatcher::Pattern) and
//! [`BondMatcher::Pattern`](crate::BondMatcher::Pattern), and the engine
//! evaluates them against a [`TargetProperties`].

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::matcher::{AtomMatcher, BondMatcher};
use crate::target::TargetProperties;
use crate::traits::{AtomQuery, BondQuery, HasAromaticity, HydrogenSuppress};

/// Atom predicate tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomExpr {
    /// Matches any atom (`*`).
    True,
    /// Matches by element. `aromatic` is `None` when either form is allowed,
    /// `Some(true)` for the lowercase form and `Some(false)` for uppercase.
    Symbol {
        symbol: String,
        aromatic: Option<bool>,
    },
    /// Any aromatic atom (`a`).
    Aromatic,
    /// Any aliphatic atom (`A`).
    Aliphatic,
    /// Exact mass number.
    Isotope(u16),
    /// Formal charge.
    Charge(i8),
    /// Number of explicit neighbours (`D`).
    Degree(u8),
    /// Implicit plus explicit hydrogens (`H`).
    TotalHCount(u8),
    /// Implicit hydrogens only (`h`).
    ImplicitHCount(u8),
    /// Explicit neighbours plus implicit hydrogens (`X`).
    Connectivity(u8),
    /// Atom lies on at least one ring (`R`).
    InRing,
    /// Atom lies on no ring (`R0`).
    NotInRing,
    /// Size of the smallest ring through the atom (`r`). `0` means acyclic.
    SmallestRingSize(u8),
    /// Number of ring bonds on the atom (`x`).
    RingBondCount(u8),
    And(Vec<AtomExpr>),
    Or(Vec<AtomExpr>),
    Not(Box<AtomExpr>),
}

/// Bond predicate tree.
///
/// Unlike a plain [`Bond`], the default pattern bond is
/// [`BondExpr::SingleOrAromatic`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BondExpr {
    /// Matches any bond (`~`).
    True,
    /// Non-aromatic single bond (`-`).
    Single,
    /// Non-aromatic double bond (`=`).
    Double,
    /// Triple bond (`#`).
    Triple,
    /// Aromatic bond (`:`).
    Aromatic,
    /// Single or aromatic, the implicit pattern bond.
    SingleOrAromatic,
    /// Ring bond (`@`).
    Ring,
    And(Vec<BondExpr>),
    Or(Vec<BondExpr>),
    Not(Box<BondExpr>),
}

fn explicit_h_count(target: &TargetProperties, idx: NodeIndex) -> u8 {
    target
        .neighbors(idx)
        .iter()
        .filter(|&&nb| target.atom(nb).is_hydrogen())
        .count() as u8
}

impl AtomExpr {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        AtomExpr::Symbol {
            symbol: symbol.into(),
            aromatic: None,
        }
    }

    pub fn matches(&self, target: &TargetProperties, idx: NodeIndex) -> bool {
        let atom: &Atom = target.atom(idx);
        match self {
            AtomExpr::True => true,
            AtomExpr::Symbol { symbol, aromatic } => {
                atom.symbol == *symbol && aromatic.is_none_or(|a| atom.is_aromatic == a)
            }
            AtomExpr::Aromatic => atom.is_aromatic,
            AtomExpr::Aliphatic => !atom.is_aromatic,
            AtomExpr::Isotope(mass) => atom.isotope == Some(*mass),
            AtomExpr::Charge(c) => atom.formal_charge == *c,
            AtomExpr::Degree(d) => target.count_neighbors(idx) == *d as usize,
            AtomExpr::TotalHCount(h) => {
                atom.hydrogen_count.saturating_add(explicit_h_count(target, idx)) == *h
            }
            AtomExpr::ImplicitHCount(h) => atom.hydrogen_count == *h,
            AtomExpr::Connectivity(x) => {
                target.count_neighbors(idx) + atom.hydrogen_count as usize == *x as usize
            }
            AtomExpr::InRing => target.rings().is_ring_atom(idx),
            AtomExpr::NotInRing => !target.rings().is_ring_atom(idx),
            AtomExpr::SmallestRingSize(r) => match target.rings().smallest_ring_size(idx) {
                Some(size) => size == *r as usize,
                None => *r == 0,
            },
            AtomExpr::RingBondCount(x) => target.rings().ring_bond_count(idx) == *x as usize,
            AtomExpr::And(exprs) => exprs.iter().all(|e| e.matches(target, idx)),
            AtomExpr::Or(exprs) => exprs.iter().any(|e| e.matches(target, idx)),
            AtomExpr::Not(expr) => !expr.matches(target, idx),
        }
    }

    pub(crate) fn uses_rings(&self) -> bool {
        match self {
            AtomExpr::InRing
            | AtomExpr::NotInRing
            | AtomExpr::SmallestRingSize(_)
            | AtomExpr::RingBondCount(_) => true,
            AtomExpr::And(exprs) | AtomExpr::Or(exprs) => exprs.iter().any(AtomExpr::uses_rings),
            AtomExpr::Not(expr) => expr.uses_rings(),
            _ => false,
        }
    }
}

impl BondExpr {
    pub fn matches(&self, target: &TargetProperties, edge: EdgeIndex) -> bool {
        let bond: &Bond = target.bond(edge);
        let aromatic = bond.is_aromatic();
        match self {
            BondExpr::True => true,
            BondExpr::Single => bond.order == BondOrder::Single && !aromatic,
            BondExpr::Double => bond.order == BondOrder::Double && !aromatic,
            BondExpr::Triple => bond.order == BondOrder::Triple,
            BondExpr::Aromatic => aromatic,
            BondExpr::SingleOrAromatic => bond.order == BondOrder::Single || aromatic,
            BondExpr::Ring => target.rings().is_ring_bond(edge),
            BondExpr::And(exprs) => exprs.iter().all(|e| e.matches(target, edge)),
            BondExpr::Or(exprs) => exprs.iter().any(|e| e.matches(target, edge)),
            BondExpr::Not(expr) => !expr.matches(target, edge),
        }
    }

    pub(crate) fn uses_rings(&self) -> bool {
        match self {
            BondExpr::Ring => true,
            BondExpr::And(exprs) | BondExpr::Or(exprs) => exprs.iter().any(BondExpr::uses_rings),
            BondExpr::Not(expr) => expr.uses_rings(),
            _ => false,
        }
    }
}

/// A query atom that is either a concrete atom or a pattern predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryAtom {
    Plain(Atom),
    Pattern(AtomExpr),
}

/// A query bond that is either a concrete bond or a pattern predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryBond {
    Plain(Bond),
    Pattern(BondExpr),
}

impl From<Atom> for QueryAtom {
    fn from(atom: Atom) -> Self {
        QueryAtom::Plain(atom)
    }
}

impl From<AtomExpr> for QueryAtom {
    fn from(expr: AtomExpr) -> Self {
        QueryAtom::Pattern(expr)
    }
}

impl From<Bond> for QueryBond {
    fn from(bond: Bond) -> Self {
        QueryBond::Plain(bond)
    }
}

impl From<BondExpr> for QueryBond {
    fn from(expr: BondExpr) -> Self {
        QueryBond::Pattern(expr)
    }
}

impl AtomQuery for AtomExpr {
    fn atom_matcher(&self, _min_neighbors: Option<usize>) -> AtomMatcher {
        AtomMatcher::Pattern(self.clone())
    }

    fn is_pattern(&self) -> bool {
        true
    }
}

impl AtomQuery for QueryAtom {
    fn atom_matcher(&self, min_neighbors: Option<usize>) -> AtomMatcher {
        match self {
            QueryAtom::Plain(atom) => atom.atom_matcher(min_neighbors),
            QueryAtom::Pattern(expr) => expr.atom_matcher(min_neighbors),
        }
    }

    fn is_pattern(&self) -> bool {
        matches!(self, QueryAtom::Pattern(_))
    }

    fn plain_symbol(&self) -> Option<&str> {
        match self {
            QueryAtom::Plain(atom) => atom.plain_symbol(),
            QueryAtom::Pattern(_) => None,
        }
    }
}

impl BondQuery for BondExpr {
    fn bond_matcher(&self) -> BondMatcher {
        BondMatcher::Pattern(self.clone())
    }

    fn is_pattern(&self) -> bool {
        true
    }
}

impl BondQuery for QueryBond {
    fn bond_matcher(&self) -> BondMatcher {
        match self {
            QueryBond::Plain(bond) => bond.bond_matcher(),
            QueryBond::Pattern(expr) => expr.bond_matcher(),
        }
    }

    fn is_pattern(&self) -> bool {
        matches!(self, QueryBond::Pattern(_))
    }
}

impl HydrogenSuppress for AtomExpr {
    fn is_explicit_hydrogen(&self) -> bool {
        false
    }

    fn add_implicit_hydrogens(&mut self, _count: u8) {}
}

impl HydrogenSuppress for QueryAtom {
    fn is_explicit_hydrogen(&self) -> bool {
        match self {
            QueryAtom::Plain(atom) => atom.is_explicit_hydrogen(),
            QueryAtom::Pattern(_) => false,
        }
    }

    fn add_implicit_hydrogens(&mut self, count: u8) {
        if let QueryAtom::Plain(atom) = self {
            atom.add_implicit_hydrogens(count);
        }
    }
}
