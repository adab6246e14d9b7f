//! Shunting-yard parser and disjunctive normal form.
//!
//! Tokens are folded into a binary [`Expr`] tree in one pass, with implicit
//! AND between adjacent operands and AND binding tighter than OR. The tree is
//! then flattened into a list of clauses.

use crate::clause::{Clause, Term};
use crate::error::{QueryError, Result};
use crate::lexer::Token;

/// Boolean expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Term(Term),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
    /// An open `(`, holding the output height when it was pushed.
    Group(usize),
}

impl Operator {
    fn precedence(self) -> u8 {
        match self {
            Operator::And => 2,
            Operator::Or => 1,
            Operator::Group(_) => 0,
        }
    }
}

#[derive(Default)]
struct Parser {
    output: Vec<Expr>,
    operators: Vec<Operator>,
}

impl Parser {
    /// Pops the top operator and combines the top two operands with it.
    ///
    /// Missing operands are tolerated so that half-typed input such as
    /// `a OR` or `OR b` still parses. Operands below the innermost open
    /// group belong outside it and are never taken.
    fn reduce(&mut self) {
        let combine: fn(Box<Expr>, Box<Expr>) -> Expr = match self.operators.pop() {
            Some(Operator::And) => Expr::And,
            Some(Operator::Or) => Expr::Or,
            Some(Operator::Group(_)) | None => return,
        };
        let floor = self.group_floor();
        let right = self.pop_operand(floor);
        let left = self.pop_operand(floor);
        match (left, right) {
            (Some(l), Some(r)) => self.output.push(combine(Box::new(l), Box::new(r))),
            (None, Some(only)) | (Some(only), None) => self.output.push(only),
            (None, None) => {}
        }
    }

    fn group_floor(&self) -> usize {
        self.operators
            .iter()
            .rev()
            .find_map(|op| match op {
                Operator::Group(height) => Some(*height),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn pop_operand(&mut self, floor: usize) -> Option<Expr> {
        if self.output.len() > floor {
            self.output.pop()
        } else {
            None
        }
    }

    fn open_group(&mut self) {
        self.operators.push(Operator::Group(self.output.len()));
    }

    fn push_operator(&mut self, op: Operator) {
        while let Some(&top) = self.operators.last() {
            if matches!(top, Operator::Group(_)) || top.precedence() < op.precedence() {
                break;
            }
            self.reduce();
        }
        self.operators.push(op);
    }

    fn close_group(&mut self) {
        while let Some(&top) = self.operators.last() {
            if matches!(top, Operator::Group(_)) {
                self.operators.pop();
                return;
            }
            self.reduce();
        }
    }

    fn finish(mut self) -> Option<Expr> {
        while let Some(&top) = self.operators.last() {
            if matches!(top, Operator::Group(_)) {
                // Unmatched `(`.
                self.operators.pop();
            } else {
                self.reduce();
            }
        }
        let mut rest = self.output.into_iter();
        let first = rest.next()?;
        Some(rest.fold(first, |acc, next| Expr::And(Box::new(acc), Box::new(next))))
    }
}

/// Builds an expression tree from tokens. Returns `None` for empty input.
pub fn parse_tokens(tokens: Vec<Token>) -> Option<Expr> {
    let mut parser = Parser::default();
    let mut after_operand = false;

    for token in tokens {
        match token {
            Token::Term(term) => {
                if after_operand {
                    parser.push_operator(Operator::And);
                }
                parser.output.push(Expr::Term(term));
                after_operand = true;
            }
            Token::LParen => {
                if after_operand {
                    parser.push_operator(Operator::And);
                }
                parser.open_group();
                after_operand = false;
            }
            Token::RParen => {
                parser.close_group();
                after_operand = true;
            }
            Token::Or => {
                parser.push_operator(Operator::Or);
                after_operand = false;
            }
        }
    }

    parser.finish()
}

/// Flattens an expression into disjunctive normal form.
///
/// An absent expression yields a single empty clause, which matches
/// everything.
///
/// # Errors
///
/// Returns [`QueryError::TooComplex`] if distributing AND over OR would
/// produce more than `max_clauses` clauses.
pub fn to_dnf(expr: Option<&Expr>, max_clauses: usize) -> Result<Vec<Clause>> {
    match expr {
        None => Ok(vec![Vec::new()]),
        Some(expr) => dnf(expr, max_clauses),
    }
}

fn dnf(expr: &Expr, limit: usize) -> Result<Vec<Clause>> {
    match expr {
        Expr::Term(term) => Ok(vec![vec![term.clone()]]),
        Expr::Or(left, right) => {
            let mut clauses = dnf(left, limit)?;
            clauses.extend(dnf(right, limit)?);
            if clauses.len() > limit {
                return Err(QueryError::TooComplex { limit });
            }
            Ok(clauses)
        }
        Expr::And(left, right) => {
            let left = dnf(left, limit)?;
            let right = dnf(right, limit)?;
            match left.len().checked_mul(right.len()) {
                Some(n) if n <= limit => {}
                _ => return Err(QueryError::TooComplex { limit }),
            }
            let mut clauses = Vec::with_capacity(left.len() * right.len());
            for l in &left {
                for r in &right {
                    let mut clause = Vec::with_capacity(l.len() + r.len());
                    clause.extend(l.iter().cloned());
                    clause.extend(r.iter().cloned());
                    clauses.push(clause);
                }
            }
            Ok(clauses)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn tree(input: &str) -> Option<Expr> {
        parse_tokens(tokenize(input).unwrap())
    }

    fn term(value: &str) -> Expr {
        Expr::Term(Term::bare(value))
    }

    fn and(l: Expr, r: Expr) -> Expr {
        Expr::And(Box::new(l), Box::new(r))
    }

    fn or(l: Expr, r: Expr) -> Expr {
        Expr::Or(Box::new(l), Box::new(r))
    }

    fn values(clauses: &[Clause]) -> Vec<Vec<&str>> {
        clauses
            .iter()
            .map(|c| c.iter().map(|t| t.value.as_str()).collect())
            .collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(tree(""), None);
        assert_eq!(to_dnf(None, 16).unwrap(), vec![Vec::<Term>::new()]);
    }

    #[test]
    fn juxtaposition_is_and() {
        assert_eq!(tree("a b c"), Some(and(and(term("a"), term("b")), term("c"))));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            tree("a b OR c"),
            Some(or(and(term("a"), term("b")), term("c")))
        );
        assert_eq!(
            tree("a OR b c"),
            Some(or(term("a"), and(term("b"), term("c"))))
        );
    }

    #[test]
    fn or_is_left_associative() {
        assert_eq!(
            tree("a OR b OR c"),
            Some(or(or(term("a"), term("b")), term("c")))
        );
    }

    #[test]
    fn groups_override_precedence() {
        assert_eq!(
            tree("a (b OR c)"),
            Some(and(term("a"), or(term("b"), term("c"))))
        );
        assert_eq!(
            tree("(a OR b) c"),
            Some(and(or(term("a"), term("b")), term("c")))
        );
    }

    #[test]
    fn permissive_with_partial_input() {
        assert_eq!(tree("a OR"), Some(term("a")));
        assert_eq!(tree("OR a"), Some(term("a")));
        assert_eq!(tree("(a b"), Some(and(term("a"), term("b"))));
        assert_eq!(tree("a) b"), Some(and(term("a"), term("b"))));
        assert_eq!(tree("a () b"), Some(and(term("a"), term("b"))));
        assert_eq!(tree("()"), None);
    }

    #[test]
    fn dangling_operator_stays_inside_its_group() {
        let clauses = |input: &str| to_dnf(tree(input).as_ref(), 16).unwrap();
        assert_eq!(values(&clauses("a (b OR) c")), vec![vec!["a", "b", "c"]]);
        assert_eq!(values(&clauses("a (OR b)")), vec![vec!["a", "b"]]);
        assert_eq!(values(&clauses("a (b OR")), vec![vec!["a", "b"]]);
        assert_eq!(
            values(&clauses("a ((b OR) c OR d)")),
            vec![vec!["a", "b", "c"], vec!["a", "d"]]
        );
    }

    #[test]
    fn dnf_distributes_and_over_or() {
        let clauses = to_dnf(tree("alpha (beta OR gamma)").as_ref(), 16).unwrap();
        assert_eq!(
            values(&clauses),
            vec![vec!["alpha", "beta"], vec!["alpha", "gamma"]]
        );
    }

    #[test]
    fn dnf_cartesian_product_order() {
        let clauses = to_dnf(tree("(a OR b) (c OR d)").as_ref(), 16).unwrap();
        assert_eq!(
            values(&clauses),
            vec![
                vec!["a", "c"],
                vec!["a", "d"],
                vec!["b", "c"],
                vec!["b", "d"],
            ]
        );
    }

    #[test]
    fn dnf_clause_cap() {
        let input = "(a OR b) (c OR d) (e OR f)";
        assert_eq!(to_dnf(tree(input).as_ref(), 8).unwrap().len(), 8);
        assert_eq!(
            to_dnf(tree(input).as_ref(), 7),
            Err(QueryError::TooComplex { limit: 7 })
        );
        assert_eq!(
            to_dnf(tree("a OR b OR c").as_ref(), 2),
            Err(QueryError::TooComplex { limit: 2 })
        );
    }
}
