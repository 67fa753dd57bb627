use num::Signed;

use super::{Node, Op, Sort, Term, TermStore};
use crate::types::err::ErrorKind;

impl TermStore {
    /// `term` written in SMT-LIB syntax.
    pub fn display(&self, term: Term) -> Result<String, ErrorKind> {
        let mut out = String::default();
        self.write_term(term, &mut out)?;
        Ok(out)
    }

    fn write_term(&self, term: Term, out: &mut String) -> Result<(), ErrorKind> {
        let Node { op, args, sort } = self.node(term)?;
        match op {
            Op::Symbol(name) => {
                if name.chars().all(|c| c.is_alphanumeric() || "_.-~!@$%^&*+=<>?/".contains(c)) {
                    out.push_str(&name)
                } else {
                    out.push_str(&format!("|{name}|"))
                }
            }

            Op::True => out.push_str("true"),

            Op::False => out.push_str("false"),

            Op::Numeral(value) => {
                let magnitude = value.abs();
                let body = match (magnitude.is_integer(), sort) {
                    (true, Sort::Int) => magnitude.numer().to_string(),
                    (true, _) => format!("{}.0", magnitude.numer()),
                    (false, _) => format!("(/ {} {})", magnitude.numer(), magnitude.denom()),
                };
                match value.is_negative() {
                    true => out.push_str(&format!("(- {body})")),
                    false => out.push_str(&body),
                }
            }

            Op::BvConst(bits) => {
                let width = sort.width().unwrap_or(1) as usize;
                out.push_str(&format!("#b{:0>width$}", bits.to_str_radix(2)));
            }

            Op::FpConst(bits) => {
                out.push_str(&format!("((_ to_fp_bits) #x{})", bits.to_str_radix(16)));
            }

            _ => {
                out.push('(');
                out.push_str(op.name());
                for arg in args {
                    out.push(' ');
                    self.write_term(arg, out)?;
                }
                out.push(')');
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{numeric, terms::TermStore};

    #[test]
    fn smtlib() {
        let store = TermStore::default();
        let x = store.int_var("x").unwrap();
        let b = store.bv_var("b", 4).unwrap();
        let sum = store.add(&[x, store.int(-3).unwrap()]).unwrap();
        let half = store.rational(numeric::ratio(1, 2)).unwrap();

        assert_eq!(store.display(store.le(sum, half).unwrap()).unwrap(), "(<= (+ x (- 3)) (/ 1 2))");
        assert_eq!(
            store.display(store.bv_uge(b, store.bv(3, 4).unwrap()).unwrap()).unwrap(),
            "(bvule #b0011 b)"
        );
    }
}
