//! Calculator-notation glyph rewriting.
//!
//! Button labels use typographic glyphs (`×`, `÷`, `−`, `π`). This pass maps
//! them onto the ASCII operators the tokenizer understands. It never touches
//! identifiers: `Ans`, `pi` and `e` are resolved later, as whole tokens.

/// Glyphs and their canonical replacements.
const GLYPHS: &[(char, &str)] = &[
    ('×', "*"),
    ('·', "*"),
    ('÷', "/"),
    ('−', "-"),
    ('π', "pi"),
];

/// Rewrite calculator glyphs into canonical operators.
pub fn canonicalize(input: &str) -> String {
    let mut result = String::with_capacity(input.len());

    for c in input.chars() {
        match GLYPHS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(c),
        }
    }

    result
}

/// Check if a key label is a binary or postfix operator.
///
/// After a successful result, pressing one of these continues from `Ans`.
pub fn is_operator_label(label: &str) -> bool {
    matches!(
        label,
        "+" | "-" | "*" | "/" | "^" | "!" | "×" | "÷" | "−" | "**"
    )
}
