/// Default atom type for a molecular graph node.
///
/// `Atom` stores the intrinsic properties a matcher needs. It carries no
/// coordinates and no perceived properties such as ring membership; those
/// are computed on the target side by [`TargetProperties`](crate::TargetProperties).
///
/// # Examples
///
/// ```
/// use molmatch::Atom;
///
/// let oxygen = Atom::new("O").with_charge(-1);
/// assert_eq!(oxygen.symbol, "O");
/// assert_eq!(oxygen.formal_charge, -1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Atom {
    /// Element symbol (`"C"`, `"N"`, `"Cl"`, …).
    pub symbol: String,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Whether this atom belongs to an aromatic system.
    pub is_aromatic: bool,
    /// Number of implicit hydrogens. These are not graph nodes.
    pub hydrogen_count: u8,
    /// Mass number, `None` for natural isotopic abundance.
    pub isotope: Option<u16>,
}

impl Atom {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn aromatic(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            is_aromatic: true,
            ..Self::default()
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.hydrogen_count = count;
        self
    }

    pub fn with_isotope(mut self, mass: u16) -> Self {
        self.isotope = Some(mass);
        self
    }

    pub fn is_hydrogen(&self) -> bool {
        self.symbol == "H"
    }
}

impl crate::traits::HasSymbol for Atom {
    fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasIsotope for Atom {
    fn isotope(&self) -> Option<u16> {
        self.isotope
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}
