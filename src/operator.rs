/// How operators of equal priority group when chained.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    // Binary
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,

    // Unary prefix
    Neg,
    Pos,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Rem,
        Operator::Pow,
        Operator::Neg,
        Operator::Pos,
    ];

    /// Looks up the operator for `symbol`. `+` and `-` resolve to their prefix forms when `unary`
    /// is set; every other symbol only has a binary form.
    pub fn from_symbol(symbol: char, unary: bool) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol && op.is_unary() == unary)
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add | Operator::Pos => '+',
            Operator::Sub | Operator::Neg => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Rem => '%',
            Operator::Pow => '^',
        }
    }

    /// Binding strength, higher binds tighter. Prefix `-`/`+` sit between multiplication and
    /// exponentiation, so `-3^2` is `-(3^2)` while `-3*2` is `(-3)*2`.
    pub fn priority(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div | Operator::Rem => 2,
            Operator::Neg | Operator::Pos => 3,
            Operator::Pow => 4,
        }
    }

    pub fn arity(&self) -> usize {
        if self.is_unary() {
            1
        } else {
            2
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Operator::Pow | Operator::Neg | Operator::Pos => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Neg | Operator::Pos)
    }

    /// Whether an operator already waiting on the stack must be reduced before `incoming` is
    /// pushed.
    pub(crate) fn yields_to(&self, incoming: &Operator) -> bool {
        match incoming.associativity() {
            Associativity::Left => self.priority() >= incoming.priority(),
            Associativity::Right => self.priority() > incoming.priority(),
        }
    }

    /// Applies the operator to its operands, or returns `None` if their number does not match
    /// the operator's arity.
    pub(crate) fn apply(&self, operands: &[f64]) -> Option<f64> {
        let value = match (self, operands) {
            (Operator::Neg, &[x]) => -x,
            (Operator::Pos, &[x]) => x,
            (Operator::Add, &[lhs, rhs]) => lhs + rhs,
            (Operator::Sub, &[lhs, rhs]) => lhs - rhs,
            (Operator::Mul, &[lhs, rhs]) => lhs * rhs,
            (Operator::Div, &[lhs, rhs]) => lhs / rhs,
            (Operator::Rem, &[lhs, rhs]) => lhs % rhs,
            (Operator::Pow, &[lhs, rhs]) => lhs.powf(rhs),
            _ => return None,
        };

        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_symbol() {
        assert_eq!(Operator::from_symbol('-', false), Some(Operator::Sub));
        assert_eq!(Operator::from_symbol('-', true), Some(Operator::Neg));
        assert_eq!(Operator::from_symbol('+', true), Some(Operator::Pos));
        assert_eq!(Operator::from_symbol('^', false), Some(Operator::Pow));
        assert_eq!(Operator::from_symbol('*', true), None);
        assert_eq!(Operator::from_symbol('&', false), None);
    }

    #[test]
    fn every_operator_round_trips_through_its_symbol() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_symbol(op.symbol(), op.is_unary()), Some(op));
            assert_eq!(op.arity(), if op.is_unary() { 1 } else { 2 });
        }
    }

    #[test]
    fn apply_checks_operand_count() {
        assert_eq!(Operator::Sub.apply(&[5.0, 3.0]), Some(2.0));
        assert_eq!(Operator::Neg.apply(&[5.0]), Some(-5.0));
        assert_eq!(Operator::Pow.apply(&[2.0, 10.0]), Some(1024.0));
        assert_eq!(Operator::Add.apply(&[1.0]), None);
        assert_eq!(Operator::Neg.apply(&[1.0, 2.0]), None);
    }

    #[test]
    fn reduction_order() {
        // Left associative: equal priority reduces first
        assert!(Operator::Sub.yields_to(&Operator::Add));
        assert!(Operator::Mul.yields_to(&Operator::Add));
        assert!(!Operator::Add.yields_to(&Operator::Mul));

        // Right associative: equal priority waits
        assert!(!Operator::Pow.yields_to(&Operator::Pow));
        assert!(Operator::Neg.yields_to(&Operator::Mul));
        assert!(!Operator::Neg.yields_to(&Operator::Pow));
    }
}
