//! Full pipeline tests: source text -> tokens -> AST
//!
//! Exercises lexer and parser together on realistic multi-line programs.

use core_types::{DrakeError, ErrorKind, LexErrorKind, SourcePosition};
use drake_parser::{
    parse, tokenize, AssignmentOperator, BinaryOperator, KeywordParamKind, ListLiteral, NodeKind,
    Parser, Program, TargetModifier, Token,
};

const SHAPES: &str = r#"// Shapes and colours
module {
    <float> pi = 3.14159

    const area = (<float> r) -> pi * r ** 2

    Shape = object {
        <str> name = 'shape'
        describe = () -> 'a ' + name
    }

    Color = enum { RED = 0xff0000, GREEN = 0x00ff00, BLUE }

    classify = (<int> n, <str> fallback: 'other') -> case n % 3 in {
        0: 'fizz'
        1: 'one'
    } else fallback

    InvalidShape = exception {
        message = 'invalid'
    }

    safe_area = (<float> r) -> try area(r)
    catch InvalidShape as e { print(e.message), 0 }
    finally log('done')
}

/* totals */
for (i, <int> n) in enumerate(values) {
    if n > limit then break
    else if n is not none then total += n
}

evens = iter [0..100, 2]
squares = [x ** 2, -x, not done]
counts = mutable {}
gen = () -> yield from range(10)
const <List[str]> names
nonlocal depth -= 1
"#;

fn parse_ok(source: &str) -> Program {
    parse(source).unwrap_or_else(|e| panic!("parse failed: {}", e))
}

#[test]
fn test_shapes_program_top_level() {
    let program = parse_ok(SHAPES);
    let kinds: Vec<&str> = program
        .body
        .iter()
        .map(|node| match &node.kind {
            NodeKind::Module(_) => "module",
            NodeKind::For { .. } => "for",
            NodeKind::Assignment { .. } => "assignment",
            NodeKind::Declaration(_) => "declaration",
            other => panic!("unexpected top-level node {:?}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "module",
            "for",
            "assignment",
            "assignment",
            "assignment",
            "assignment",
            "declaration",
            "assignment",
        ]
    );
}

#[test]
fn test_shapes_module_members() {
    let program = parse_ok(SHAPES);
    let NodeKind::Module(members) = &program.body[0].kind else {
        panic!("expected module");
    };
    assert_eq!(members.len(), 7);

    let NodeKind::Assignment { targets, value, .. } = &members[1].kind else {
        panic!("expected const assignment");
    };
    assert_eq!(targets[0].modifier, Some(TargetModifier::Const));
    assert!(matches!(value.kind, NodeKind::Lambda(_)));

    let NodeKind::Assignment { value, .. } = &members[4].kind else {
        panic!("expected classify assignment");
    };
    let NodeKind::Lambda(lambda) = &value.kind else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.positional.len(), 1);
    assert!(matches!(lambda.keyword[0].kind, KeywordParamKind::Default(_)));
    assert!(matches!(
        lambda.body.kind,
        NodeKind::Case { ref branches, otherwise: Some(_), .. } if branches.len() == 2
    ));

    let NodeKind::Assignment { value, .. } = &members[6].kind else {
        panic!("expected safe_area assignment");
    };
    let NodeKind::Lambda(lambda) = &value.kind else {
        panic!("expected lambda");
    };
    match &lambda.body.kind {
        NodeKind::Try {
            handlers, finally, ..
        } => {
            assert_eq!(handlers.len(), 1);
            assert_eq!(handlers[0].binding.as_deref(), Some("e"));
            assert!(matches!(handlers[0].handler.kind, NodeKind::Block(ref items) if items.len() == 2));
            assert!(finally.is_some());
        }
        other => panic!("expected try, got {:?}", other),
    }
}

#[test]
fn test_shapes_loop_body() {
    let program = parse_ok(SHAPES);
    let NodeKind::For { targets, body, .. } = &program.body[1].kind else {
        panic!("expected for loop");
    };
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[1].type_hint.as_ref().map(|h| h.name.as_str()), Some("int"));

    let NodeKind::Block(items) = &body.kind else {
        panic!("expected block body");
    };
    let NodeKind::If { then, otherwise, .. } = &items[0].kind else {
        panic!("expected if");
    };
    assert!(matches!(then.kind, NodeKind::Break));
    let nested = otherwise.as_ref().map(|n| &n.kind);
    assert!(matches!(
        nested,
        Some(NodeKind::If { condition, then, .. })
            if matches!(condition.kind, NodeKind::BinaryOp { operator: BinaryOperator::IsNot, .. })
            && matches!(then.kind, NodeKind::Assignment { operator: AssignmentOperator::AddAssign, .. })
    ));
}

#[test]
fn test_shapes_trailing_assignments() {
    let program = parse_ok(SHAPES);
    let values: Vec<&NodeKind> = program
        .body
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Assignment { value, .. } => Some(&value.kind),
            _ => None,
        })
        .collect();

    assert!(matches!(
        values[0],
        NodeKind::Iter(inner) if matches!(inner.kind, NodeKind::List(ListLiteral::Range { .. }))
    ));
    assert!(matches!(values[1], NodeKind::List(ListLiteral::Items(items)) if items.len() == 3));
    assert!(matches!(
        values[2],
        NodeKind::Mutable(inner) if matches!(inner.kind, NodeKind::Mapping(ref pairs) if pairs.is_empty())
    ));
    assert!(matches!(
        values[3],
        NodeKind::Lambda(lambda) if matches!(lambda.body.kind, NodeKind::YieldFrom(_))
    ));
    assert!(matches!(values[4], NodeKind::Literal(_)));
}

#[test]
fn test_tokens_feed_parser() {
    let tokens = tokenize(SHAPES).unwrap();
    assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::EOF));
    let program = Parser::from_tokens(tokens).parse_program().unwrap();
    assert_eq!(program, parse_ok(SHAPES));
}

#[test]
fn test_program_separators_are_interchangeable() {
    let by_newline = parse_ok("a = 1\nb = [1, 2]\nf(a, b)");
    let by_comma = parse_ok("a = 1, b = [1, 2], f(a, b)");
    assert_eq!(by_newline, by_comma);
}

#[test]
fn test_program_json_shape() {
    let program = parse_ok("x = 0x1F");
    let value = serde_json::to_value(&program).unwrap();
    let literal = &value["body"][0]["kind"]["Assignment"]["value"]["kind"]["Literal"]["Number"];
    assert_eq!(literal["text"], "1F");
    assert_eq!(literal["base"], "Hexadecimal");
    assert_eq!(value["body"][0]["position"]["line"], 1);
}

#[test]
fn test_error_positions() {
    let cases: &[(&str, ErrorKind, SourcePosition)] = &[
        ("if a b", ErrorKind::ParseError, SourcePosition::new(1, 6, 5)),
        ("{a: 1\n b}", ErrorKind::ParseError, SourcePosition::new(2, 3, 8)),
        ("x = 'open", ErrorKind::LexError, SourcePosition::new(1, 5, 4)),
        ("x = 1\n/* never closed", ErrorKind::LexError, SourcePosition::new(2, 1, 6)),
    ];
    for (source, kind, position) in cases {
        let err = parse(source).unwrap_err();
        assert_eq!(err.kind(), *kind, "{:?}", source);
        assert_eq!(err.position(), *position, "{:?}", source);
    }
}

#[test]
fn test_lex_error_kinds() {
    match parse("0b102").unwrap_err() {
        DrakeError::Lex(e) => assert!(matches!(e.kind, LexErrorKind::InvalidDigit { digit: '2', .. })),
        other => panic!("expected lex error, got {:?}", other),
    }
    match parse("x = @").unwrap_err() {
        DrakeError::Lex(e) => assert_eq!(e.kind, LexErrorKind::UnexpectedCharacter('@')),
        other => panic!("expected lex error, got {:?}", other),
    }
}

#[test]
fn test_structural_errors() {
    let messages = [
        ("(a, b) += 1", "multiple assignment cannot be augmented"),
        ("const x += 1", "const assignment cannot be augmented"),
        ("try x\ny", "try requires catch or finally"),
        ("case x in {a, b}", "case requires a mapping of branches"),
        ("[1, 2\n3]", "cannot mix comma and newline separators"),
    ];
    for (source, message) in messages {
        let err = parse(source).unwrap_err();
        assert_eq!(err.summary(), message, "{:?}", source);
    }
}
