pub mod atom;
pub mod bond;
pub mod budget;
pub mod canon;
pub mod compiler;
pub mod config;
pub mod energy;
pub mod error;
pub mod filter;
pub mod hydrogen;
pub mod isomorphism;
pub mod mapping;
pub mod matcher;
pub mod mcgregor;
pub mod mol;
pub mod pattern;
pub mod ring_search;
pub mod target;
pub mod traits;
pub mod vf;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use budget::SearchBudget;
pub use compiler::{CompileMode, MatchQuery, MatcherEdge, MatcherNode, QueryCompiler};
pub use config::{Algorithm, MatchOptions};
pub use error::{ConfigurationError, Error, InvalidGraphError, Result};
pub use filter::{ChemFilters, ChemicalFilter};
pub use hydrogen::remove_hs;
pub use isomorphism::{Isomorphism, MatchOutcome};
pub use mapping::{AtomMapping, MappingResult, PartialMapping};
pub use matcher::{AtomMatcher, BondMatcher};
pub use mcgregor::{Extension, McGregorExtension};
pub use mol::{AtomId, EZStereo, Mol, TetrahedralStereo};
pub use pattern::{AtomExpr, BondExpr, QueryAtom, QueryBond};
pub use ring_search::RingSearch;
pub use target::TargetProperties;
pub use traits::{
    AtomQuery, BondQuery, HasAromaticity, HasBondOrder, HasFormalCharge, HasHydrogenCount,
    HasIsotope, HasSymbol, HydrogenSuppress,
};
pub use vf::{SearchOutcome, SearchStatus, VfEngine};
