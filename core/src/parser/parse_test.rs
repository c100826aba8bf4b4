use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::error::ParseErrorKind;
use super::parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};
use super::{BinaryOp, Expr, Member, Span, UnaryOp};

fn ast<'a>(arena: &'a Bump, source: &'a str) -> &'a Expr<'a> {
    parse(arena, source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
        .expr
}

fn error_kind(source: &str) -> ParseErrorKind {
    let arena = Bump::new();
    match parse(&arena, source) {
        Ok(parsed) => panic!("Expected an error for {:?}, got {:?}", source, parsed.expr),
        Err(e) => e.kind,
    }
}

fn unexpected(expected: &str, found: &str) -> ParseErrorKind {
    ParseErrorKind::UnexpectedToken {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

#[test]
fn test_binary_expression_shape() {
    let arena = Bump::new();
    let one = Expr::Number("1");
    let two = Expr::Number("2");
    let three = Expr::Number("3");
    let product = Expr::Binary {
        op: BinaryOp::Mul,
        left: &two,
        right: &three,
    };
    assert_eq!(
        *ast(&arena, "1+2*3"),
        Expr::Binary {
            op: BinaryOp::Add,
            left: &one,
            right: &product,
        }
    );
}

#[test]
fn test_object_with_include_member() {
    let arena = Bump::new();
    let Expr::Object(members) = ast(&arena, r#"{ a:1, include("b.jx"), c:"hi" }"#) else {
        panic!("expected an object");
    };
    assert_eq!(members.len(), 3);
    assert_eq!(
        members[0],
        Member::Property {
            key: "a",
            value: &Expr::Number("1")
        }
    );
    let Member::Spread(call) = members[1] else {
        panic!("expected a spread member, got {:?}", members[1]);
    };
    assert_eq!(call.callee_name(), Some("include"));
    let Expr::Call { args, .. } = call else {
        unreachable!()
    };
    assert_eq!(args.len(), 1);
    assert_eq!(*args[0], Expr::String("b.jx"));
    assert_eq!(
        members[2],
        Member::Property {
            key: "c",
            value: &Expr::String("hi")
        }
    );
}

#[test]
fn test_quoted_keys() {
    let arena = Bump::new();
    let Expr::Object(members) = ast(&arena, r#"{ "with space": 1, 'x\ty': 2 }"#) else {
        panic!("expected an object");
    };
    assert!(matches!(members[0], Member::Property { key: "with space", .. }));
    assert!(matches!(members[1], Member::Property { key: "x\ty", .. }));
}

#[test]
fn test_lambda() {
    let arena = Bump::new();
    let x = Expr::Identifier("x");
    let y = Expr::Identifier("y");
    let sum = Expr::Binary {
        op: BinaryOp::Add,
        left: &x,
        right: &y,
    };
    assert_eq!(
        *ast(&arena, "(x,y)=>x+y"),
        Expr::Lambda {
            params: &["x", "y"],
            body: &sum,
        }
    );
    assert_eq!(
        *ast(&arena, "() => 1"),
        Expr::Lambda {
            params: &[],
            body: &Expr::Number("1"),
        }
    );
    assert_eq!(
        *ast(&arena, "(a,) => a"),
        Expr::Lambda {
            params: &["a"],
            body: &Expr::Identifier("a"),
        }
    );
}

#[test]
fn test_grouping_backtracks_from_lambda() {
    let arena = Bump::new();
    assert_eq!(*ast(&arena, "(x)"), Expr::Identifier("x"));
    assert_eq!(*ast(&arena, "((1))"), Expr::Number("1"));
    // A parameter list without `=>` is neither a lambda nor a grouping.
    assert_eq!(error_kind("(x, y)"), unexpected("')'", "','"));
    assert_eq!(error_kind("(x) + 1 =>"), unexpected("end of input", "'=>'"));
}

#[test]
fn test_comments_and_trailing_commas() {
    let arena = Bump::new();
    let source = "{
        // line comment
        a: [1, 2, 3,], /* block */
        b: f(1, 2,),
    }";
    let Expr::Object(members) = ast(&arena, source) else {
        panic!("expected an object");
    };
    assert_eq!(members.len(), 2);
    let Member::Property { value: array, .. } = members[0] else {
        panic!("expected a property");
    };
    assert!(matches!(array, Expr::Array(items) if items.len() == 3));
    let Member::Property { value: call, .. } = members[1] else {
        panic!("expected a property");
    };
    assert!(matches!(call, Expr::Call { args, .. } if args.len() == 2));
}

#[test]
fn test_relative_refs() {
    let arena = Bump::new();
    assert_eq!(
        *ast(&arena, ".a"),
        Expr::RelativeRef { level: 0, name: "a" }
    );
    assert_eq!(
        *ast(&arena, "...b"),
        Expr::RelativeRef { level: 2, name: "b" }
    );
    assert_eq!(error_kind(". 1"), unexpected("identifier after '.'", "'1'"));
}

#[test]
fn test_chained_calls() {
    let arena = Bump::new();
    let f = Expr::Identifier("f");
    let inner = Expr::Call {
        callee: &f,
        args: &[&Expr::Number("1")],
    };
    assert_eq!(
        *ast(&arena, "f(1)(2)"),
        Expr::Call {
            callee: &inner,
            args: &[&Expr::Number("2")],
        }
    );
}

#[test]
fn test_unary() {
    let arena = Bump::new();
    assert_eq!(
        *ast(&arena, "!true"),
        Expr::Unary {
            op: UnaryOp::Not,
            operand: &Expr::Boolean(true),
        }
    );
}

#[test]
fn test_spans_are_recorded() {
    let arena = Bump::new();
    let source = "  foo(1) + bar ";
    let parsed = parse(&arena, source).unwrap();
    assert_eq!(parsed.ann.span_of(parsed.expr), Some(Span(2..14)));
    let Expr::Binary { left, right, .. } = parsed.expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(parsed.ann.snippet(parsed.ann.span_of(left).unwrap()), "foo(1)");
    assert_eq!(parsed.ann.snippet(parsed.ann.span_of(right).unwrap()), "bar");
}

#[test]
fn test_syntax_errors() {
    assert_eq!(error_kind(""), unexpected("expression", "end of input"));
    assert_eq!(error_kind("1 2"), unexpected("end of input", "'2'"));
    assert_eq!(error_kind("[1, 2"), unexpected("']'", "end of input"));
    assert_eq!(error_kind("{ a 1 }"), unexpected("':'", "'1'"));
    assert_eq!(error_kind("{ 1: 2 }"), unexpected("property name", "'1'"));
    assert_eq!(error_kind("(1, 2)"), unexpected("')'", "','"));
    assert_eq!(error_kind("1 +"), unexpected("expression", "end of input"));
}

#[test]
fn test_invalid_escape() {
    assert!(matches!(
        error_kind(r#""\q""#),
        ParseErrorKind::InvalidString(_)
    ));
}

#[test]
fn test_lexical_errors_surface_from_parse() {
    assert_eq!(
        error_kind("1 + /* never closed"),
        ParseErrorKind::UnterminatedComment
    );
    assert!(error_kind("a ~ b").is_lexical());
}

#[test]
fn test_max_depth() {
    let arena = Bump::new();
    let nested = format!("{}1{}", "[".repeat(40), "]".repeat(40));
    assert!(parse_with_max_depth(&arena, nested.as_str(), 200).is_ok());

    let err = parse_with_max_depth(&arena, nested.as_str(), 20).unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::MaxDepthExceeded { max_depth: 20, .. }
    ));

}

#[test]
fn test_default_max_depth_reports_before_the_stack_runs_out() {
    let arena = Bump::new();
    let limit = DEFAULT_MAX_DEPTH;

    let at_limit = format!("{}1{}", "[".repeat(limit), "]".repeat(limit));
    assert!(parse(&arena, at_limit.as_str()).is_ok());

    for (open, close) in [("[", "]"), ("(", ")"), ("{a:", "}"), ("f(", ")")] {
        let deep = format!("{}1{}", open.repeat(2000), close.repeat(2000));
        let err = parse(&arena, deep.as_str()).unwrap_err();
        assert!(
            matches!(
                err.kind,
                ParseErrorKind::MaxDepthExceeded { depth, max_depth }
                    if depth == limit + 1 && max_depth == limit
            ),
            "{}: {:?}",
            open,
            err.kind
        );
    }

    let negations = format!("{}1", "-".repeat(2000));
    let err = parse(&arena, negations.as_str()).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::MaxDepthExceeded { .. }));
}
