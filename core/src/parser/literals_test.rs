use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::Expr;
use super::parser::parse;

fn literal<'a>(arena: &'a Bump, source: &'a str) -> Expr<'a> {
    parse(arena, source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
        .expr
        .clone()
}

#[test]
fn test_number_literals_keep_raw_text() {
    let arena = Bump::new();
    assert_eq!(literal(&arena, "123"), Expr::Number("123"));
    assert_eq!(literal(&arena, "1.25e-3"), Expr::Number("1.25e-3"));
    assert_eq!(literal(&arena, "9007199254740993n"), Expr::Number("9007199254740993n"));
}

#[test]
fn test_keywords() {
    let arena = Bump::new();
    assert_eq!(literal(&arena, "true"), Expr::Boolean(true));
    assert_eq!(literal(&arena, "false"), Expr::Boolean(false));
    assert_eq!(literal(&arena, "null"), Expr::Null);
    assert_eq!(literal(&arena, "nullish"), Expr::Identifier("nullish"));
}

#[test]
fn test_string_literals() {
    let arena = Bump::new();
    assert_eq!(literal(&arena, "\"hello\""), Expr::String("hello"));
    assert_eq!(literal(&arena, "'hello'"), Expr::String("hello"));
    assert_eq!(literal(&arena, r#""a\nb""#), Expr::String("a\nb"));
    assert_eq!(literal(&arena, r"'it\'s'"), Expr::String("it's"));
    assert_eq!(literal(&arena, r#""A\u{1F600}""#), Expr::String("A😀"));
    assert_eq!(literal(&arena, "''"), Expr::String(""));
}

#[test]
fn test_template_literals_are_plain_strings() {
    let arena = Bump::new();
    assert_eq!(literal(&arena, "`a ${b} c`"), Expr::String("a ${b} c"));
    assert_eq!(literal(&arena, r"`tick \` tock`"), Expr::String("tick ` tock"));
}

#[test]
fn test_blob_literals_strip_delimiters() {
    let arena = Bump::new();
    assert_eq!(literal(&arena, "b16'deadbeef'"), Expr::Blob16("deadbeef"));
    assert_eq!(literal(&arena, "b64'3q2+7w=='"), Expr::Blob64("3q2+7w=="));
    assert_eq!(literal(&arena, "b16''"), Expr::Blob16(""));
}

#[test]
fn test_collections() {
    let arena = Bump::new();
    assert_eq!(literal(&arena, "[]"), Expr::Array(&[]));
    assert_eq!(literal(&arena, "{}"), Expr::Object(&[]));
    assert_eq!(
        literal(&arena, "[1, 'x']"),
        Expr::Array(&[&Expr::Number("1"), &Expr::String("x")])
    );
}
