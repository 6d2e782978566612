//! Property test for spec §8: "re-lexing the concatenation of token
//! lexemes with single spaces reproduces the same token-kind sequence."

use axon_lex::{Lexer, TokenKind};
use proptest::prelude::*;

fn kind_sequence(src: &str) -> Vec<TokenKind> {
    Lexer::tokenize(src)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// Renders a token back to text that will re-lex to the same kind.
/// Strings need their quotes and escapes put back since `Token::lexeme`
/// stores the decoded form.
fn render(kind: TokenKind, lexeme: &str) -> String {
    match kind {
        TokenKind::Str => format!("\"{}\"", lexeme.replace('\\', "\\\\").replace('"', "\\\"")),
        _ => lexeme.to_string(),
    }
}

proptest! {
    #[test]
    fn relexing_rendered_tokens_preserves_kind_sequence(
        program in "(let [a-z]{1,4} = [0-9]{1,3};\\s*){1,5}"
    ) {
        let tokens = Lexer::tokenize(&program).unwrap();
        let rendered: Vec<String> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| render(t.kind, &t.lexeme))
            .collect();
        let rebuilt = rendered.join(" ");
        prop_assert_eq!(kind_sequence(&program), kind_sequence(&rebuilt));
    }
}

#[test]
fn fixed_program_round_trips() {
    let program = "let x = 5; print(x + 1);";
    let tokens = Lexer::tokenize(program).unwrap();
    let rendered: Vec<String> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| render(t.kind, &t.lexeme))
        .collect();
    let rebuilt = rendered.join(" ");
    assert_eq!(kind_sequence(program), kind_sequence(&rebuilt));
}
