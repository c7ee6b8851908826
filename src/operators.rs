//! Binary operator precedence and associativity.
//!
//! The parser climbs this table and the GLSL emitter consults it to decide
//! where parentheses are needed, so both sides agree on grouping.

use std::collections::HashMap;

use crate::ast::BinOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    /// Chaining requires parentheses: `a < b < c` is rejected
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpInfo {
    /// Higher binds tighter
    pub precedence: u8,
    pub assoc: Associativity,
}

/// Precedence of unary operators, tighter than every binary operator
pub const UNARY_PRECEDENCE: u8 = 7;

impl BinOp {
    pub fn info(self) -> OpInfo {
        use Associativity::*;

        // Level 1: ||
        // Level 2: &&
        // Level 3: == !=
        // Level 4: < > <= >=
        // Level 5: + -
        // Level 6: * / %
        let (precedence, assoc) = match self {
            BinOp::Or => (1, Left),
            BinOp::And => (2, Left),
            BinOp::Eq | BinOp::Neq => (3, None),
            BinOp::Lt | BinOp::Gt | BinOp::Lte | BinOp::Gte => (4, None),
            BinOp::Add | BinOp::Sub => (5, Left),
            BinOp::Mul | BinOp::Div | BinOp::Mod => (6, Left),
        };
        OpInfo { precedence, assoc }
    }
}

/// Lookup from operator spelling to operator
#[derive(Debug, Clone)]
pub struct OperatorTable {
    operators: HashMap<&'static str, BinOp>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorTable {
    pub fn new() -> Self {
        use BinOp::*;

        let operators = [Or, And, Eq, Neq, Lt, Gt, Lte, Gte, Add, Sub, Mul, Div, Mod]
            .into_iter()
            .map(|op| (op.symbol(), op))
            .collect();
        Self { operators }
    }

    pub fn get(&self, symbol: &str) -> Option<(BinOp, OpInfo)> {
        self.operators.get(symbol).map(|&op| (op, op.info()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_operators() {
        let table = OperatorTable::new();

        let (add, add_info) = table.get("+").unwrap();
        let (_, mul_info) = table.get("*").unwrap();
        assert_eq!(add, BinOp::Add);
        assert!(add_info.precedence < mul_info.precedence);
        assert!(table.get("||").unwrap().1.precedence < table.get("&&").unwrap().1.precedence);
        assert_eq!(table.get("<=").unwrap().1.assoc, Associativity::None);
        assert!(table.get("<<").is_none());
    }

    #[test]
    fn test_unary_binds_tightest() {
        let table = OperatorTable::new();
        for symbol in ["||", "&&", "==", "<", "+", "*", "%"] {
            assert!(table.get(symbol).unwrap().1.precedence < UNARY_PRECEDENCE);
        }
    }
}
