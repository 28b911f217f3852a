//! Average bond dissociation energies used by the energy filter.
//!
//! Values are in kJ/mol. Pairs missing from the table fall back to a
//! per-order default.

use crate::bond::BondOrder;

const SINGLE_DEFAULT: f64 = 300.0;
const DOUBLE_DEFAULT: f64 = 600.0;
const TRIPLE_DEFAULT: f64 = 800.0;
const AROMATIC_DEFAULT: f64 = 500.0;

/// Energy of a bond between elements `a` and `b`. Aromatic bonds are looked
/// up as aromatic whatever their Kekulé order.
pub fn bond_energy(a: &str, b: &str, order: BondOrder, aromatic: bool) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let order = if aromatic { BondOrder::Aromatic } else { order };
    let known = match (a, b, order) {
        ("C", "C", BondOrder::Single) => Some(346.0),
        ("C", "C", BondOrder::Double) => Some(614.0),
        ("C", "C", BondOrder::Triple) => Some(839.0),
        ("C", "C", BondOrder::Aromatic) => Some(518.0),
        ("C", "H", BondOrder::Single) => Some(411.0),
        ("C", "O", BondOrder::Single) => Some(358.0),
        ("C", "O", BondOrder::Double) => Some(799.0),
        ("C", "N", BondOrder::Single) => Some(305.0),
        ("C", "N", BondOrder::Double) => Some(615.0),
        ("C", "N", BondOrder::Triple) => Some(891.0),
        ("N", "N", BondOrder::Single) => Some(163.0),
        ("N", "N", BondOrder::Double) => Some(418.0),
        ("O", "O", BondOrder::Single) => Some(146.0),
        ("H", "O", BondOrder::Single) => Some(459.0),
        ("H", "N", BondOrder::Single) => Some(386.0),
        ("C", "S", BondOrder::Single) => Some(272.0),
        ("C", "Cl", BondOrder::Single) => Some(327.0),
        ("C", "F", BondOrder::Single) => Some(485.0),
        ("Br", "C", BondOrder::Single) => Some(285.0),
        ("C", "I", BondOrder::Single) => Some(213.0),
        _ => None,
    };
    known.unwrap_or(match order {
        BondOrder::Single => SINGLE_DEFAULT,
        BondOrder::Double => DOUBLE_DEFAULT,
        BondOrder::Triple => TRIPLE_DEFAULT,
        BondOrder::Aromatic => AROMATIC_DEFAULT,
    })
}
