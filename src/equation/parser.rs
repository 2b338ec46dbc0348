use std::fmt;

use crate::equation::token::{Lexeme, Token};
use crate::error::SyntaxError;
use crate::limits::Limits;
use crate::network::{BinaryOp, Value};
use crate::sim::Assignment;

/// Expression tree of a boolean equation
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expr {
    /// Input variable
    Variable(char),
    /// Negation
    Not(Box<Expr>),
    /// Binary operator, left and right operands
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Create a variable
    pub fn var(c: char) -> Expr {
        Expr::Variable(c.to_ascii_uppercase())
    }

    /// Create a negation
    pub fn not(e: Expr) -> Expr {
        Expr::Not(Box::new(e))
    }

    /// Create a binary operation
    pub fn binary(op: BinaryOp, a: Expr, b: Expr) -> Expr {
        Expr::Binary(op, Box::new(a), Box::new(b))
    }

    /// Number of nodes on the longest path from the root to a variable
    pub fn height(&self) -> usize {
        match self {
            Expr::Variable(_) => 1,
            Expr::Not(e) => e.height() + 1,
            Expr::Binary(_, a, b) => a.height().max(b.height()) + 1,
        }
    }

    /// Number of nodes, which is the number of gates after lowering
    pub fn nb_nodes(&self) -> usize {
        match self {
            Expr::Variable(_) => 1,
            Expr::Not(e) => e.nb_nodes() + 1,
            Expr::Binary(_, a, b) => a.nb_nodes() + b.nb_nodes() + 1,
        }
    }

    /// Distinct variables, in order of first appearance from left to right
    pub fn letters(&self) -> Vec<char> {
        let mut ret = Vec::new();
        self.collect_letters(&mut ret);
        ret
    }

    fn collect_letters(&self, ret: &mut Vec<char>) {
        match self {
            Expr::Variable(c) => {
                if !ret.contains(c) {
                    ret.push(*c);
                }
            }
            Expr::Not(e) => e.collect_letters(ret),
            Expr::Binary(_, a, b) => {
                a.collect_letters(ret);
                b.collect_letters(ret);
            }
        }
    }

    /// Evaluate the expression directly; unassigned variables are unset
    pub fn eval(&self, assignment: &Assignment) -> Value {
        match self {
            Expr::Variable(c) => Value::from(assignment.get(*c)),
            Expr::Not(e) => !e.eval(assignment),
            Expr::Binary(op, a, b) => op.eval(a.eval(assignment), b.eval(assignment)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Variable(c) => write!(f, "{c}"),
            Expr::Not(e) => write!(f, "!{e}"),
            Expr::Binary(op, a, b) => write!(f, "({a} {op} {b})"),
        }
    }
}

/// Recursive descent parser over a token sequence
///
/// Grammar, from the loosest to the tightest binding:
/// ```text
///     or_expr  := and_expr ((OR | NOR | XOR | XNOR) and_expr)*
///     and_expr := unary ((AND | NAND) unary)*
///     unary    := '!' unary | primary
///     primary  := VARIABLE | '(' or_expr ')'
/// ```
/// Binary operators associate to the left. The nesting of parentheses and negations, and
/// the height of the resulting tree, are both bounded by the maximum depth.
struct Parser<'a> {
    lexemes: &'a [Lexeme],
    next: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Lexeme> {
        self.lexemes.get(self.next).copied()
    }

    fn bump(&mut self) {
        self.next += 1;
    }

    /// Enter a nested construct
    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::ExpressionTooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    /// Check the height of a newly created node
    fn check_height(&self, h: usize) -> Result<usize, SyntaxError> {
        if h > self.max_depth {
            Err(SyntaxError::ExpressionTooDeep {
                limit: self.max_depth,
            })
        } else {
            Ok(h)
        }
    }

    /// Parse a left-associative chain of operators of one tier
    fn binary_chain(
        &mut self,
        in_tier: fn(&BinaryOp) -> bool,
        operand: fn(&mut Self) -> Result<(Expr, usize), SyntaxError>,
    ) -> Result<(Expr, usize), SyntaxError> {
        let (mut lhs, mut h) = operand(self)?;
        while let Some(Lexeme {
            token: Token::Op(op),
            ..
        }) = self.peek()
        {
            if !in_tier(&op) {
                break;
            }
            self.bump();
            let (rhs, hr) = operand(self)?;
            h = self.check_height(h.max(hr) + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, h))
    }

    fn or_expr(&mut self) -> Result<(Expr, usize), SyntaxError> {
        self.binary_chain(|op| !op.is_and_tier(), Self::and_expr)
    }

    fn and_expr(&mut self) -> Result<(Expr, usize), SyntaxError> {
        self.binary_chain(BinaryOp::is_and_tier, Self::unary)
    }

    fn unary(&mut self) -> Result<(Expr, usize), SyntaxError> {
        match self.peek() {
            Some(Lexeme {
                token: Token::Not, ..
            }) => {
                self.bump();
                self.enter()?;
                let (e, h) = self.unary()?;
                self.exit();
                let h = self.check_height(h + 1)?;
                Ok((Expr::not(e), h))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<(Expr, usize), SyntaxError> {
        let Some(Lexeme { token, pos }) = self.peek() else {
            return Err(SyntaxError::IncompleteExpression);
        };
        match token {
            Token::Var(c) => {
                self.bump();
                Ok((Expr::var(c), 1))
            }
            Token::LParen => {
                self.bump();
                self.enter()?;
                let ret = self.or_expr()?;
                self.exit();
                match self.peek() {
                    Some(Lexeme {
                        token: Token::RParen,
                        ..
                    }) => {
                        self.bump();
                        Ok(ret)
                    }
                    _ => Err(SyntaxError::UnclosedParen { pos }),
                }
            }
            Token::Op(_) | Token::RParen | Token::Not => {
                Err(SyntaxError::UnexpectedToken { token, pos })
            }
        }
    }
}

/// Parse a token sequence into an expression tree
///
/// The whole sequence must form a single expression. An empty sequence is an incomplete
/// expression.
pub fn parse(lexemes: &[Lexeme], limits: &Limits) -> Result<Expr, SyntaxError> {
    let mut parser = Parser {
        lexemes,
        next: 0,
        depth: 0,
        max_depth: limits.max_depth,
    };
    let (e, _) = parser.or_expr()?;
    if let Some(Lexeme { token, pos }) = parser.peek() {
        return Err(SyntaxError::TrailingTokens { token, pos });
    }
    Ok(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::tokenize;

    fn parse_str(s: &str) -> Result<Expr, SyntaxError> {
        parse(&tokenize(s)?, &Limits::default())
    }

    fn parsed(s: &str) -> String {
        parse_str(s).unwrap().to_string()
    }

    #[test]
    fn test_single() {
        assert_eq!(parse_str("a"), Ok(Expr::var('A')));
        assert_eq!(parsed("!A"), "!A");
        assert_eq!(parsed("((A))"), "A");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parsed("A + B . C"), "(A OR (B AND C))");
        assert_eq!(parsed("A . B + C"), "((A AND B) OR C)");
        assert_eq!(parsed("!A . B"), "(!A AND B)");
        assert_eq!(parsed("!(A . B)"), "!(A AND B)");
        assert_eq!(parsed("A NAND B XOR C"), "((A NAND B) XOR C)");
        assert_eq!(parsed("A XNOR B NAND C"), "(A XNOR (B NAND C))");
        assert_eq!(parsed("(A + B)'"), "!(A OR B)");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(parsed("A + B + C"), "((A OR B) OR C)");
        assert_eq!(parsed("A . B . C"), "((A AND B) AND C)");
        // All operators of the Or tier share the same precedence
        assert_eq!(parsed("A XOR B OR C"), "((A XOR B) OR C)");
        assert_eq!(parsed("A OR B XOR C"), "((A OR B) XOR C)");
        assert_eq!(parsed("A NOR B XNOR C NOR D"), "(((A NOR B) XNOR C) NOR D)");
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(parse_str(""), Err(SyntaxError::IncompleteExpression));
        assert_eq!(parse_str("   "), Err(SyntaxError::IncompleteExpression));
        assert_eq!(parse_str("A AND"), Err(SyntaxError::IncompleteExpression));
        assert_eq!(parse_str("!"), Err(SyntaxError::IncompleteExpression));
        assert_eq!(parse_str("(A +"), Err(SyntaxError::IncompleteExpression));
    }

    #[test]
    fn test_unclosed() {
        assert_eq!(parse_str("(A"), Err(SyntaxError::UnclosedParen { pos: 0 }));
        assert_eq!(
            parse_str("A . ((B + C)"),
            Err(SyntaxError::UnclosedParen { pos: 4 })
        );
        assert_eq!(parse_str("(A B)"), Err(SyntaxError::UnclosedParen { pos: 0 }));
    }

    #[test]
    fn test_unexpected() {
        assert_eq!(
            parse_str("+A"),
            Err(SyntaxError::UnexpectedToken {
                token: Token::Op(BinaryOp::Or),
                pos: 0
            })
        );
        assert_eq!(
            parse_str("A . )"),
            Err(SyntaxError::UnexpectedToken {
                token: Token::RParen,
                pos: 4
            })
        );
        assert_eq!(
            parse_str("()"),
            Err(SyntaxError::UnexpectedToken {
                token: Token::RParen,
                pos: 1
            })
        );
    }

    #[test]
    fn test_trailing() {
        assert_eq!(
            parse_str("A B"),
            Err(SyntaxError::TrailingTokens {
                token: Token::Var('B'),
                pos: 2
            })
        );
        assert_eq!(
            parse_str("A)"),
            Err(SyntaxError::TrailingTokens {
                token: Token::RParen,
                pos: 1
            })
        );
    }

    #[test]
    fn test_depth_limit() {
        let limits = Limits::new(8, 16);
        let nested = format!("{}A{}", "(".repeat(9), ")".repeat(9));
        assert_eq!(
            parse(&tokenize(&nested).unwrap(), &limits),
            Err(SyntaxError::ExpressionTooDeep { limit: 8 })
        );
        let nots = "!".repeat(9) + "A";
        assert_eq!(
            parse(&tokenize(&nots).unwrap(), &limits),
            Err(SyntaxError::ExpressionTooDeep { limit: 8 })
        );
        // A long chain has no nesting, but a tall tree
        let chain = vec!["A"; 9].join(" + ");
        assert_eq!(
            parse(&tokenize(&chain).unwrap(), &limits),
            Err(SyntaxError::ExpressionTooDeep { limit: 8 })
        );
        let chain = vec!["A"; 8].join(" + ");
        assert_eq!(parse(&tokenize(&chain).unwrap(), &limits).unwrap().height(), 8);

        // Default limits accept deep but reasonable equations
        let nested = format!("{}A{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(parse_str(&nested), Ok(Expr::var('A')));
    }

    #[test]
    fn test_letters() {
        let e = parse_str("C . (A + C) + !B . A").unwrap();
        assert_eq!(e.letters(), vec!['C', 'A', 'B']);
        assert_eq!(e.nb_nodes(), 10);
    }

    #[test]
    fn test_eval() {
        let e = parse_str("A XOR !B").unwrap();
        let mut a = Assignment::new();
        assert_eq!(e.eval(&a), Value::Unset);
        a.set('A', true);
        assert_eq!(e.eval(&a), Value::Unset);
        a.set('B', true);
        assert_eq!(e.eval(&a), Value::One);
        a.set('A', false);
        assert_eq!(e.eval(&a), Value::Zero);
    }
}
