//! Rewriting of boolean-algebra notations into the canonical equation syntax
//!
//! Equations may be typed with the symbols of boolean algebra or with their ASCII fallbacks:
//! ```text
//!     A ⊕ B       A XOR B
//!     A ⊙ B       A XNOR B
//!     A · B       A . B       A * B       A ∧ B       A AND B
//!     A + B       A ∨ B       A OR B
//!     ¬A          ~A          !A          A'          Ā
//! ```
//! The canonical syntax only uses keywords, single letters, parentheses and `!`.

/// Canonical mark for a negation written after its operand (prime or overline)
pub(crate) const POSTFIX_NOT: char = '\'';

/// Rewrite an equation into canonical symbols
///
/// Each output character carries the position, in characters, of the input character it
/// comes from. Letters are uppercased. Operator glyphs are expanded into space-separated
/// keywords. Prefix negations become `!`, while postfix ones (prime, combining overline)
/// become a `'` mark that the tokenizer moves before its operand.
/// Unknown characters are kept as is, so that the tokenizer can report them.
pub fn normalize(text: &str) -> Vec<(char, usize)> {
    let mut ret = Vec::with_capacity(text.len());
    for (pos, c) in text.chars().enumerate() {
        match c {
            '⊕' | '⊖' | '⊗' => push_keyword(&mut ret, "XOR", pos),
            '⊙' => push_keyword(&mut ret, "XNOR", pos),
            '⋅' | '·' | '*' | '.' | '∧' => push_keyword(&mut ret, "AND", pos),
            '+' | '∨' => push_keyword(&mut ret, "OR", pos),
            '¬' | '~' | '!' => ret.push(('!', pos)),
            '\'' | '′' | '’' | '\u{0304}' | '\u{0305}' => ret.push((POSTFIX_NOT, pos)),
            _ => ret.push((c.to_ascii_uppercase(), pos)),
        }
    }
    ret
}

/// Expand an operator glyph into a keyword surrounded by spaces
fn push_keyword(ret: &mut Vec<(char, usize)>, kw: &str, pos: usize) {
    ret.push((' ', pos));
    ret.extend(kw.chars().map(|c| (c, pos)));
    ret.push((' ', pos));
}

/// Rewrite an equation into canonical symbols, as a string
pub fn normalize_to_string(text: &str) -> String {
    normalize(text).into_iter().map(|(c, _)| c).collect()
}
