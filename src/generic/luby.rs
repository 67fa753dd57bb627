/*!
An iterator over the luby sequence, used to schedule restarts of the SAT core.

See <https://oeis.org/A182105> for details on the luby sequence.

The iterator uses the 'reluctant doubling' formulation from Knuth, which keeps a pair `(u, v)` and emits `v` before each update:
- If `u & -u == v` then `u` is incremented and `v` returns to 1.
- Otherwise, `v` is doubled.
*/

/// Representation used for numbers in a luby sequence.
pub type LubyRepresentation = u32;

/// The state of the iterator.
pub struct Luby {
    u: LubyRepresentation,
    v: LubyRepresentation,
}

impl Default for Luby {
    fn default() -> Self {
        Luby { u: 1, v: 1 }
    }
}

impl Iterator for Luby {
    type Item = LubyRepresentation;

    fn next(&mut self) -> Option<Self::Item> {
        let emitted = self.v;

        if self.u & self.u.wrapping_neg() == self.v {
            self.u = self.u.checked_add(1)?;
            self.v = 1;
        } else {
            self.v = self.v.checked_mul(2)?;
        }

        Some(emitted)
    }
}

impl Luby {
    /// The element which will be emitted next.
    pub fn peek(&self) -> LubyRepresentation {
        self.v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix() {
        let expected: [LubyRepresentation; 31] = [
            1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4,
            8, 16,
        ];
        let luby = Luby::default();
        assert!(luby.take(31).eq(expected));
    }

    #[test]
    fn peek_matches_next() {
        let mut luby = Luby::default();
        for _ in 0..100 {
            let peeked = luby.peek();
            assert_eq!(luby.next(), Some(peeked));
        }
    }
}
