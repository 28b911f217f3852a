#![allow(dead_code)]

use std::sync::OnceLock;

use molmatch::{Atom, Bond, Mol};

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Unbranched carbon chain with single bonds.
pub fn chain(len: usize) -> Mol<Atom, Bond> {
    Mol::from_parts(
        (0..len).map(|_| Atom::new("C")).collect(),
        (1..len).map(|i| (i - 1, i, Bond::single())).collect(),
    )
    .unwrap()
}

/// Saturated carbocycle.
pub fn ring(len: usize) -> Mol<Atom, Bond> {
    Mol::from_parts(
        (0..len).map(|_| Atom::new("C").with_hydrogens(2)).collect(),
        (0..len).map(|i| (i, (i + 1) % len, Bond::single())).collect(),
    )
    .unwrap()
}

pub fn benzene() -> Mol<Atom, Bond> {
    Mol::from_parts(
        (0..6).map(|_| Atom::aromatic("C").with_hydrogens(1)).collect(),
        (0..6).map(|i| (i, (i + 1) % 6, Bond::aromatic())).collect(),
    )
    .unwrap()
}

/// c1ccc2ccccc2c1, fused at atoms 4 and 5.
pub fn naphthalene() -> Mol<Atom, Bond> {
    let atoms = (0..10)
        .map(|i| {
            let h = if i == 4 || i == 5 { 0 } else { 1 };
            Atom::aromatic("C").with_hydrogens(h)
        })
        .collect();
    let bonds = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 0),
        (5, 6),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 4),
    ]
    .into_iter()
    .map(|(a, b)| (a, b, Bond::aromatic()))
    .collect();
    Mol::from_parts(atoms, bonds).unwrap()
}

/// CC(=O)OC(=O)C
pub fn acetic_anhydride() -> Mol<Atom, Bond> {
    Mol::from_parts(
        vec![
            Atom::new("C").with_hydrogens(3),
            Atom::new("C"),
            Atom::new("O"),
            Atom::new("O"),
            Atom::new("C"),
            Atom::new("O"),
            Atom::new("C").with_hydrogens(3),
        ],
        vec![
            (0, 1, Bond::single()),
            (1, 2, Bond::double()),
            (1, 3, Bond::single()),
            (3, 4, Bond::single()),
            (4, 5, Bond::double()),
            (4, 6, Bond::single()),
        ],
    )
    .unwrap()
}
