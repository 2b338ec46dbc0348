use std::fmt;

use crate::equation::normalize::{normalize, POSTFIX_NOT};
use crate::error::SyntaxError;
use crate::network::BinaryOp;

/// Token of an equation
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Token {
    /// Binary operator keyword
    Op(BinaryOp),
    /// Prefix negation mark
    Not,
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Single uppercase letter
    Var(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Op(op) => write!(f, "{op}"),
            Token::Not => write!(f, "!"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Var(c) => write!(f, "{c}"),
        }
    }
}

/// Token with its position in the original equation
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Lexeme {
    /// The token
    pub token: Token,
    /// Position in characters in the original equation
    pub pos: usize,
}

/// Operator keywords, longest first: shorter keywords appear inside longer ones
const KEYWORDS: [(&str, BinaryOp); 6] = [
    ("NAND", BinaryOp::Nand),
    ("XNOR", BinaryOp::Xnor),
    ("AND", BinaryOp::And),
    ("NOR", BinaryOp::Nor),
    ("XOR", BinaryOp::Xor),
    ("OR", BinaryOp::Or),
];

/// Returns whether the keyword is found at this position
fn keyword_at(symbols: &[(char, usize)], i: usize, kw: &str) -> bool {
    let n = kw.len();
    i + n <= symbols.len() && symbols[i..i + n].iter().map(|(c, _)| *c).eq(kw.chars())
}

/// Move a postfix negation before the operand it follows
///
/// The operand is the preceding letter, or the parenthesized group ending just before.
/// Without a preceding operand, the mark stays in place as a prefix negation.
fn insert_postfix_not(tokens: &mut Vec<Lexeme>, pos: usize) {
    let not = Lexeme {
        token: Token::Not,
        pos,
    };
    match tokens.last().map(|l| l.token) {
        Some(Token::Var(_)) => {
            let i = tokens.len() - 1;
            tokens.insert(i, not);
        }
        Some(Token::RParen) => {
            let mut depth = 0usize;
            for i in (0..tokens.len()).rev() {
                match tokens[i].token {
                    Token::RParen => depth += 1,
                    Token::LParen => {
                        depth -= 1;
                        if depth == 0 {
                            tokens.insert(i, not);
                            return;
                        }
                    }
                    _ => (),
                }
            }
            // Unbalanced: let the parser report the stray parenthesis
            tokens.push(not);
        }
        _ => tokens.push(not),
    }
}

/// Split an equation into tokens
///
/// Symbols are first normalized. Keywords are then matched longest first, so that `NAND`
/// is not read as `N` followed by `AND`. Keywords are recognized even when glued to
/// letters: `AORB` is `A OR B`.
pub fn tokenize(text: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let symbols = normalize(text);
    let mut ret = Vec::new();
    let mut i = 0;
    'outer: while i < symbols.len() {
        let (c, pos) = symbols[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        for (kw, op) in KEYWORDS {
            if keyword_at(&symbols, i, kw) {
                ret.push(Lexeme {
                    token: Token::Op(op),
                    pos,
                });
                i += kw.len();
                continue 'outer;
            }
        }
        let token = match c {
            'A'..='Z' => Token::Var(c),
            '(' => Token::LParen,
            ')' => Token::RParen,
            '!' => Token::Not,
            POSTFIX_NOT => {
                insert_postfix_not(&mut ret, pos);
                i += 1;
                continue;
            }
            _ => return Err(SyntaxError::InvalidCharacter { ch: c, pos }),
        };
        ret.push(Lexeme { token, pos });
        i += 1;
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOp::*;
    use Token::*;

    fn tokens(s: &str) -> Vec<Token> {
        tokenize(s).unwrap().into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokens("A NAND B XNOR C AND D NOR E XOR F OR G"),
            vec![
                Var('A'),
                Op(Nand),
                Var('B'),
                Op(Xnor),
                Var('C'),
                Op(And),
                Var('D'),
                Op(Nor),
                Var('E'),
                Op(Xor),
                Var('F'),
                Op(Or),
                Var('G')
            ]
        );
        assert_eq!(tokens("a nand b"), vec![Var('A'), Op(Nand), Var('B')]);
    }

    #[test]
    fn test_longest_match() {
        // Or must not be split out of Nor or Xor
        assert_eq!(tokens("ANORB"), vec![Var('A'), Op(Nor), Var('B')]);
        assert_eq!(tokens("ANANDB"), vec![Var('A'), Op(Nand), Var('B')]);
        assert_eq!(tokens("A NOR B"), vec![Var('A'), Op(Nor), Var('B')]);
        assert_eq!(tokens("AXORB"), vec![Var('A'), Op(Xor), Var('B')]);
        assert_eq!(tokens("AORB"), vec![Var('A'), Op(Or), Var('B')]);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            tokens("!(a+b).c"),
            vec![
                Not,
                LParen,
                Var('A'),
                Op(Or),
                Var('B'),
                RParen,
                Op(And),
                Var('C')
            ]
        );
        assert_eq!(tokens("A⊕B"), vec![Var('A'), Op(Xor), Var('B')]);
        assert_eq!(tokens("A⊙B"), vec![Var('A'), Op(Xnor), Var('B')]);
        assert_eq!(tokens("~A"), vec![Not, Var('A')]);
        assert!(tokens("  \t ").is_empty());
    }

    #[test]
    fn test_postfix_not() {
        assert_eq!(tokens("A'"), vec![Not, Var('A')]);
        assert_eq!(tokens("A''"), vec![Not, Not, Var('A')]);
        assert_eq!(tokens("A+B'"), vec![Var('A'), Op(Or), Not, Var('B')]);
        assert_eq!(
            tokens("(A+B)'"),
            vec![Not, LParen, Var('A'), Op(Or), Var('B'), RParen]
        );
        assert_eq!(
            tokens("((A)+B)'.C"),
            vec![
                Not,
                LParen,
                LParen,
                Var('A'),
                RParen,
                Op(Or),
                Var('B'),
                RParen,
                Op(And),
                Var('C')
            ]
        );
        assert_eq!(tokens("A\u{0305}"), vec![Not, Var('A')]);
        // Without an operand before, the mark is a prefix negation
        assert_eq!(tokens("'A"), vec![Not, Var('A')]);
        assert_eq!(tokens("A+'B"), vec![Var('A'), Op(Or), Not, Var('B')]);
    }

    #[test]
    fn test_positions() {
        let l = tokenize("A + b").unwrap();
        assert_eq!(l.iter().map(|l| l.pos).collect::<Vec<_>>(), vec![0, 2, 4]);
        let l = tokenize("A'").unwrap();
        assert_eq!(l[0].pos, 1);
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            tokenize("A & B"),
            Err(SyntaxError::InvalidCharacter { ch: '&', pos: 2 })
        );
        assert_eq!(
            tokenize("A⊕1"),
            Err(SyntaxError::InvalidCharacter { ch: '1', pos: 2 })
        );
        assert_eq!(
            tokenize("é"),
            Err(SyntaxError::InvalidCharacter { ch: 'é', pos: 0 })
        );
    }
}
