//! Binary and unary operators.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical (short-circuit)
    And,
    Or,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Returns the precedence level of this operator.
    ///
    /// Higher number = lower precedence (binds less tightly):
    /// - 3: `*` `/` `%`
    /// - 4: `+` `-`
    /// - 7: `<` `>` `<=` `>=`
    /// - 8: `==` `!=`
    /// - 12: `and`
    /// - 13: `or`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 3,
            Self::Add | Self::Sub => 4,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 7,
            Self::Eq | Self::NotEq => 8,
            Self::And => 12,
            Self::Or => 13,
        }
    }

    /// Lowest binary precedence, the entry point for precedence climbing.
    pub const MAX_PRECEDENCE: u8 = 13;
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_operators() {
        assert!(BinaryOp::Mul.precedence() < BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() < BinaryOp::Lt.precedence());
        assert!(BinaryOp::Lt.precedence() < BinaryOp::Eq.precedence());
        assert!(BinaryOp::Eq.precedence() < BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() < BinaryOp::Or.precedence());
        assert_eq!(BinaryOp::Or.precedence(), BinaryOp::MAX_PRECEDENCE);
    }

    #[test]
    fn symbols_match_source() {
        assert_eq!(BinaryOp::Mod.as_symbol(), "%");
        assert_eq!(BinaryOp::And.as_symbol(), "and");
        assert_eq!(UnaryOp::Not.as_symbol(), "not");
        assert_eq!(UnaryOp::Neg.as_symbol(), "-");
    }
}
