//! Atoms and literals of the SAT core.

/// An atom, the propositional variable of a literal.
pub type Atom = u32;

/// An atom paired with a polarity.
///
/// The literal is true on a valuation which assigns the atom the polarity of the literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    atom: Atom,
    polarity: bool,
}

impl Literal {
    pub fn new(atom: Atom, polarity: bool) -> Self {
        Literal { atom, polarity }
    }

    pub fn atom(&self) -> Atom {
        self.atom
    }

    pub fn polarity(&self) -> bool {
        self.polarity
    }

    /// The literal with the same atom and opposite polarity.
    pub fn negate(&self) -> Self {
        Literal {
            atom: self.atom,
            polarity: !self.polarity,
        }
    }

    /// A dense index over literals, with the negative literal of an atom preceding the positive literal.
    pub fn index(&self) -> usize {
        2 * self.atom as usize + self.polarity as usize
    }
}

impl std::ops::Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.polarity {
            true => write!(f, "{}", self.atom),
            false => write!(f, "-{}", self.atom),
        }
    }
}
