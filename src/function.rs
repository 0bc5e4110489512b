/// A built-in mathematical function which may be called from an expression, e.g. `sin(x)` or
/// `max(a, b)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log,
    Log2,
    Sqrt,
    Cbrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,

    Min,
    Max,
    Atan2,
    Hypot,
    Root,
}

impl Function {
    pub const ALL: [Function; 25] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Exp,
        Function::Ln,
        Function::Log,
        Function::Log2,
        Function::Sqrt,
        Function::Cbrt,
        Function::Abs,
        Function::Floor,
        Function::Ceil,
        Function::Round,
        Function::Sign,
        Function::Min,
        Function::Max,
        Function::Atan2,
        Function::Hypot,
        Function::Root,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Log2 => "log2",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::Sign => "sign",
            Function::Min => "min",
            Function::Max => "max",
            Function::Atan2 => "atan2",
            Function::Hypot => "hypot",
            Function::Root => "root",
        }
    }

    /// The number of arguments for this function.
    pub fn arity(&self) -> usize {
        match self {
            Function::Min | Function::Max | Function::Atan2 | Function::Hypot | Function::Root => 2,
            _ => 1,
        }
    }

    /// Evaluates this function with already evaluated arguments. Returns `None` if the number of
    /// arguments does not equal the arity.
    pub fn apply(&self, args: &[f64]) -> Option<f64> {
        if args.len() != self.arity() {
            return None;
        }

        let x = args[0];
        let value = match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => x.asin(),
            Function::Acos => x.acos(),
            Function::Atan => x.atan(),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
            Function::Exp => x.exp(),
            Function::Ln => x.ln(),
            Function::Log => x.log10(),
            Function::Log2 => x.log2(),
            Function::Sqrt => x.sqrt(),
            Function::Cbrt => x.cbrt(),
            Function::Abs => x.abs(),
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            Function::Round => x.round(),
            Function::Sign => {
                if x == 0.0 || x.is_nan() {
                    x
                } else {
                    x.signum()
                }
            }
            Function::Min => x.min(args[1]),
            Function::Max => x.max(args[1]),
            Function::Atan2 => x.atan2(args[1]),
            Function::Hypot => x.hypot(args[1]),
            Function::Root => nth_root(x, args[1]),
        };

        Some(value)
    }
}

/// Odd integer roots of negative numbers are real, which `powf` alone does not know about.
fn nth_root(x: f64, n: f64) -> f64 {
    if x < 0.0 && n.fract() == 0.0 && n % 2.0 != 0.0 {
        -(-x).powf(n.recip())
    } else {
        x.powf(n.recip())
    }
}

/// Named constants, substituted by the lexer.
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_resolvable() {
        for function in Function::ALL {
            assert_eq!(Function::from_name(function.name()), Some(function));
        }
        assert_eq!(Function::from_name("sine"), None);
    }

    #[test]
    fn apply() {
        assert_eq!(Function::Sqrt.apply(&[16.0]), Some(4.0));
        assert_eq!(Function::Max.apply(&[2.0, 7.0]), Some(7.0));
        assert_eq!(Function::Min.apply(&[2.0, 7.0]), Some(2.0));
        assert_eq!(Function::Hypot.apply(&[3.0, 4.0]), Some(5.0));
        assert_eq!(Function::Log.apply(&[1000.0]), Some(3.0));
        assert_eq!(Function::Sign.apply(&[-4.5]), Some(-1.0));
        assert_eq!(Function::Sign.apply(&[0.0]), Some(0.0));

        let root = Function::Root.apply(&[-27.0, 3.0]).unwrap();
        assert!((root + 3.0).abs() < 1e-12);
        assert!(Function::Root.apply(&[-16.0, 2.0]).unwrap().is_nan());
    }

    #[test]
    fn apply_with_wrong_argument_count() {
        assert_eq!(Function::Max.apply(&[1.0]), None);
        assert_eq!(Function::Max.apply(&[]), None);
        assert_eq!(Function::Sin.apply(&[1.0, 2.0]), None);
    }

    #[test]
    fn constants() {
        assert_eq!(constant("pi"), Some(std::f64::consts::PI));
        assert_eq!(constant("e"), Some(std::f64::consts::E));
        assert_eq!(constant("x"), None);
    }
}
