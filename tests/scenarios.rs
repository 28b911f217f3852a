mod common;

use std::collections::HashSet;
use std::time::Duration;

use molmatch::{
    Algorithm, Atom, Bond, BondExpr, Error, InvalidGraphError, Isomorphism, MatchOptions, Mol,
    QueryAtom, QueryBond, SearchBudget, SearchStatus,
};
use petgraph::graph::NodeIndex;
use rstest::rstest;

use common::{acetic_anhydride, benzene, chain, init_test_logger, naphthalene, ring};

fn n(i: usize) -> NodeIndex {
    NodeIndex::new(i)
}

#[rstest]
fn benzene_in_naphthalene() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let iso = Isomorphism::new(&naphthalene(), MatchOptions::default());
    let outcome = iso.search(&benzene())?;

    assert_eq!(outcome.status(), SearchStatus::Matched);
    assert!(outcome.is_subgraph());
    assert_eq!(outcome.len(), 24);
    let rings: HashSet<Vec<NodeIndex>> =
        outcome.mappings().iter().map(|m| m.target_atoms()).collect();
    assert_eq!(rings.len(), 2);

    let mappings = outcome.into_mappings();
    assert_eq!(mappings.len(), 24);
    for mapping in &mappings {
        let reverse = mapping.reverse_pairs();
        assert_eq!(reverse.len(), 6);
        assert!(reverse.windows(2).all(|w| w[0].0 < w[1].0));
        for &(t, q) in reverse {
            assert_eq!(mapping.target_of(q), Some(t));
            assert_eq!(mapping.query_of(t), Some(q));
        }
    }
    Ok(())
}

#[rstest]
fn unique_mappings_keep_one_per_atom_set() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let options = MatchOptions::default().with_unique_mappings(true);
    let outcome = Isomorphism::new(&naphthalene(), options).search(&benzene())?;
    assert_eq!(outcome.len(), 2);
    Ok(())
}

#[rstest]
fn seven_ring_does_not_fit_benzene() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let query: Mol<Atom, Bond> = Mol::from_parts(
        (0..7).map(|_| Atom::aromatic("C")).collect(),
        (0..7).map(|i| (i, (i + 1) % 7, Bond::aromatic())).collect(),
    )?;
    let outcome = Isomorphism::new(&benzene(), MatchOptions::default()).search(&query)?;
    assert_eq!(outcome.status(), SearchStatus::Exhausted);
    assert!(outcome.is_empty());
    assert!(!outcome.is_subgraph());
    assert_eq!(outcome.tanimoto_similarity(), 0.0);
    Ok(())
}

#[rstest]
#[case(Bond::single(), 4)]
#[case(Bond::double(), 0)]
fn carbon_pair_in_acetic_anhydride(
    #[case] bond: Bond,
    #[case] expected: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let target = acetic_anhydride();
    let order = bond.order;
    let query = Mol::from_parts(
        vec![Atom::new("C"), Atom::new("C")],
        vec![(0, 1, bond)],
    )?;
    let iso = Isomorphism::new(&target, MatchOptions::default());
    let outcome = iso.search(&query)?;
    assert_eq!(outcome.len(), expected);

    for mapping in outcome.mappings() {
        let (a, b) = (mapping.target_of(n(0)), mapping.target_of(n(1)));
        let edge = target.bond_between(a.unwrap(), b.unwrap()).unwrap();
        assert_eq!(target.bond(edge).order, order);
    }
    Ok(())
}

#[rstest]
fn carbonyls_in_acetic_anhydride() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let query = Mol::from_parts(
        vec![Atom::new("C"), Atom::new("O")],
        vec![(0, 1, Bond::double())],
    )?;
    let outcome = Isomorphism::new(&acetic_anhydride(), MatchOptions::default()).search(&query)?;
    let pairs: HashSet<(usize, usize)> = outcome
        .mappings()
        .iter()
        .map(|m| (m.target_of(n(0)).unwrap().index(), m.target_of(n(1)).unwrap().index()))
        .collect();
    assert_eq!(pairs, HashSet::from([(1, 2), (4, 5)]));
    Ok(())
}

#[rstest]
fn connectivity_only_ignores_bond_orders() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let query = Mol::from_parts(
        vec![Atom::new("C"), Atom::new("O")],
        vec![(0, 1, Bond::triple())],
    )?;
    let options = MatchOptions::default().with_match_bonds(false);
    let outcome = Isomorphism::new(&acetic_anhydride(), options).search(&query)?;
    // two carbonyls plus two ester oxygens
    assert_eq!(outcome.len(), 4);
    Ok(())
}

#[rstest]
#[case(Algorithm::Substructure)]
#[case(Algorithm::Mcs)]
fn tiny_budget_aborts(#[case] algorithm: Algorithm) -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let options = MatchOptions::default()
        .with_algorithm(algorithm)
        .with_budget(SearchBudget::default().with_max_steps(10));
    let outcome = Isomorphism::new(&ring(20), options).search(&chain(8))?;
    assert_eq!(outcome.status(), SearchStatus::Aborted);
    assert!(outcome.steps() <= 10);
    Ok(())
}

#[rstest]
#[case(Algorithm::Substructure)]
#[case(Algorithm::Mcs)]
#[case(Algorithm::Auto)]
fn elapsed_deadline_aborts(#[case] algorithm: Algorithm) -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let options = MatchOptions::default()
        .with_algorithm(algorithm)
        .with_budget(SearchBudget::default().with_timeout(Duration::ZERO));
    let outcome = Isomorphism::new(&ring(20), options).search(&chain(8))?;
    assert_eq!(outcome.status(), SearchStatus::Aborted);
    assert_eq!(outcome.steps(), 1);
    Ok(())
}

#[rstest]
fn mcs_of_six_and_five_rings() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let options = MatchOptions::default().with_algorithm(Algorithm::Mcs);
    let outcome = Isomorphism::new(&ring(5), options).search(&ring(6))?;

    assert_eq!(outcome.status(), SearchStatus::Matched);
    assert_eq!(outcome.algorithm(), Algorithm::Mcs);
    assert!(!outcome.is_subgraph());
    let best = outcome.first_mapping().unwrap();
    assert_eq!(best.len(), 5);
    assert_eq!(best.bond_pairs().len(), 4);
    assert!((outcome.tanimoto_similarity() - 4.0 / 7.0).abs() < 1e-12);
    Ok(())
}

#[rstest]
fn auto_falls_back_for_oversized_query() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    let options = MatchOptions::default().with_algorithm(Algorithm::Auto);
    let outcome = Isomorphism::new(&benzene(), options).search(&naphthalene())?;

    assert_eq!(outcome.algorithm(), Algorithm::Mcs);
    assert_eq!(outcome.status(), SearchStatus::Matched);
    assert!(!outcome.is_subgraph());
    assert_eq!(outcome.first_mapping().unwrap().len(), 6);
    Ok(())
}

#[rstest]
fn explicit_hydrogens_are_stripped_on_request() -> Result<(), Box<dyn std::error::Error>> {
    init_test_logger();

    // methanol with every hydrogen explicit
    let target = Mol::from_parts(
        vec![
            Atom::new("C"),
            Atom::new("O"),
            Atom::new("H"),
            Atom::new("H"),
            Atom::new("H"),
            Atom::new("H"),
        ],
        vec![
            (0, 1, Bond::single()),
            (0, 2, Bond::single()),
            (0, 3, Bond::single()),
            (0, 4, Bond::single()),
            (1, 5, Bond::single()),
        ],
    )?;
    let query = Mol::from_parts(
        vec![Atom::new("C"), Atom::new("O"), Atom::new("H")],
        vec![(0, 1, Bond::single()), (1, 2, Bond::single())],
    )?;

    let iso = Isomorphism::new(&target, MatchOptions::default().with_remove_hydrogens(true));
    let outcome = iso.search(&query)?;
    assert!(outcome.is_subgraph());
    assert_eq!(outcome.first_mapping().unwrap().len(), 2);

    let properties = iso.target_properties()?;
    assert_eq!(properties.atom_count(), 2);
    assert_eq!(properties.atom(n(0)).hydrogen_count, 3);
    assert_eq!(properties.atom(n(1)).hydrogen_count, 1);
    Ok(())
}

#[rstest]
fn mixed_bond_is_a_configuration_error() {
    init_test_logger();

    let query: Mol<QueryAtom, QueryBond> = Mol::from_parts(
        vec![Atom::new("C").into(), Atom::new("C").into()],
        vec![(0, 1, BondExpr::SingleOrAromatic.into())],
    )
    .unwrap();
    let result = Isomorphism::new(&benzene(), MatchOptions::default()).search(&query);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[rstest]
fn out_of_range_bond_is_rejected() {
    let result = Mol::<Atom, Bond>::from_parts(vec![Atom::new("C")], vec![(0, 3, Bond::single())]);
    assert_eq!(
        result.unwrap_err(),
        InvalidGraphError::AtomOutOfRange {
            bond: 0,
            atom: 3,
            atom_count: 1,
        }
    );
}
