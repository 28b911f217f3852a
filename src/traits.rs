use crate::bond::BondOrder;
use crate::matcher::{AtomMatcher, BondMatcher};

pub trait HasSymbol {
    fn symbol(&self) -> &str;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasIsotope {
    fn isotope(&self) -> Option<u16>;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

pub trait HasAromaticity {
    fn is_aromatic(&self) -> bool;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

/// Query-side atom: anything the [`QueryCompiler`](crate::QueryCompiler) can
/// turn into an [`AtomMatcher`].
pub trait AtomQuery {
    /// Builds the matcher for this atom. `min_neighbors` is `Some(degree)`
    /// when the compiler wants a neighbour-count bound on plain atoms.
    fn atom_matcher(&self, min_neighbors: Option<usize>) -> AtomMatcher;

    /// `true` for pattern (SMARTS-like) atoms, `false` for plain atoms.
    fn is_pattern(&self) -> bool;

    /// Element symbol for plain atoms, used by cheap pre-checks.
    fn plain_symbol(&self) -> Option<&str> {
        None
    }
}

/// Query-side bond counterpart of [`AtomQuery`].
pub trait BondQuery {
    fn bond_matcher(&self) -> BondMatcher;

    fn is_pattern(&self) -> bool;
}

/// Atoms that can take part in explicit-hydrogen removal.
pub trait HydrogenSuppress {
    fn is_explicit_hydrogen(&self) -> bool;

    fn add_implicit_hydrogens(&mut self, count: u8);
}
