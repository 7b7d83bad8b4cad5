use std::fs;

use csspp_expr::{
    Options, evaluate, evaluate_with,
    interpreter::{
        evaluator::core::Expression,
        node::core::{NodeKind, Position, Tree},
        session::Session,
    },
};
use walkdir::WalkDir;

fn assert_value(src: &str, expected: &str) {
    let mut session = Session::new();
    match evaluate(src, &mut session) {
        Ok(Some(value)) => assert_eq!(value, expected, "for {src}"),
        Ok(None) => panic!("{src} failed: {:?}", session.diagnostics()),
        Err(e) => panic!("{src} failed: {e}"),
    }
    assert_eq!(session.error_count(), 0, "for {src}");
}

fn assert_error(src: &str, message: &str) {
    let mut session = Session::new();
    match evaluate(src, &mut session) {
        Ok(None) => {},
        Ok(Some(value)) => panic!("{src} succeeded with {value} but was expected to fail"),
        Err(e) => panic!("{src} failed to parse: {e}"),
    }
    assert_eq!(session.error_count(), 1, "for {src}: {:?}", session.diagnostics());
    assert_eq!(session.diagnostics()[0].message, message, "for {src}");
}

#[test]
fn expression_fixtures() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/expressions").into_iter()
                                         .filter_map(Result::ok)
                                         .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            count += 1;
            if let Some((src, expected)) = line.split_once(" => ") {
                assert_value(src.trim(), expected.trim());
            } else if let Some((src, message)) = line.split_once(" !> ") {
                assert_error(src.trim(), message.trim());
            } else {
                panic!("Malformed line in {path:?}: {line}");
            }
        }
    }

    assert!(count > 0, "No expressions found in tests/expressions");
}

#[test]
fn arithmetic_with_units() {
    assert_value("1 + 2", "3");
    assert_value("3px * 2 + 1px", "7px");
    assert_value("10px / 4", "2px");
    assert_value("10.0px / 4", "2.5px");
    assert_value("7 % 3", "1");
    assert_value("2 ** 10", "1024");
    assert_value("-(3px + 1px)", "-4px");
    assert_value("15% + 10%", "25%");
}

#[test]
fn dimension_errors() {
    assert_error("1px + 1em",
                 "incompatible dimensions: \"px\" and \"em\" cannot be used as is with operator '+'.");
    assert_error("1 / 0", "division by zero.");
    assert_error("3px ** 2.5",
                 "a number with a dimension only supports integers as their power (i.e. 3px ** 2 is fine, 3px ** 2.1 is not supported).");
}

#[test]
fn strings() {
    assert_value("\"con\" + \"cat\"", "\"concat\"");
    assert_value("\"ab\" * 3", "\"ababab\"");
    assert_value("str_length(\"abc\" * 2)", "6");
    assert_error("\"abc\" * 1000000000000",
                 "string * integer would create a string of more than 1048576 bytes.");
}

#[test]
fn comparisons_and_conditionals() {
    assert_value("1 < 2", "true");
    assert_value("3px = 3.0px", "true");
    assert_value("#ff0000 = red", "true");
    assert_value("2 >= 3 || 1 != 1", "false");
    assert_value("true ? 1px : 2px", "1px");
    assert_value("false ? 1 : 2", "2");
    assert_value("false ? 1px + \"a\" : 3", "3");
    assert_error("1 ? 2", "a mandatory ':' was expected after a '?' first expression.");
}

#[test]
fn skipped_branches_report_nothing() {
    let mut session = Session::new();
    let value = evaluate("false ? darken(3px, 10%) : 1", &mut session).unwrap();
    assert_eq!(value.as_deref(), Some("1"));
    assert!(session.diagnostics().is_empty(), "{:?}", session.diagnostics());
    assert!(!session.is_muted());

    assert_value("if(true, 1, 2)", "1");
    assert_value("if(false, 1, 2)", "2");
    assert_value("if(true, 1, 1px + red)", "1");
}

#[test]
fn arrays_maps_and_locals() {
    assert_value("(1, 2, 3)[2]", "2");
    assert_value("(1, 2, 3)[-1]", "3");
    assert_value("(a: 1px, b: 2px).b", "2px");
    assert_value("(a: 1px, b: 2px)[\"a\"]", "1px");
    assert_value("(x := 5px, x * 2)[2]", "10px");
    assert_value("(v := 10px, v * 2)[-1]", "20px");
    assert_error("(1, 2)[5]", "index 5 is out of range. The allowed range is 1 to 2.");
    assert_error("(1, 2, 3)[0]", "index 0 is out of range. The allowed range is 1 to 3.");
    assert_error("(1, 2, 3)[4]", "index 4 is out of range. The allowed range is 1 to 3.");
}

#[test]
fn map_entries_by_number_name_and_field() {
    let map = "(a: 1, b: 2, c: 3)";
    for access in ["[1]", ".a", "['a']"] {
        assert_value(&format!("{map}{access}"), "1");
    }
    for access in ["[-1]", ".c", "[\"c\"]"] {
        assert_value(&format!("{map}{access}"), "3");
    }
    assert_error(&format!("{map}['unknown']"), "'map[\"unknown\"]' is not set.");
}

#[test]
fn compiling_a_lone_value_keeps_it() {
    let mut tree = Tree::new();
    let mut session = Session::new();
    let position = Position::new("<input>", 1);
    let list = tree.add(NodeKind::List, position.clone());
    let number = tree.add(NodeKind::integer(42), position);
    tree.push_child(list, number);

    let result = Expression::new(&mut tree, &mut session, list).compile().unwrap();
    assert_eq!(result, Some(number));
    assert_eq!(session.error_count(), 0);
}

#[test]
fn functions() {
    assert_value("max(1px, 3px) - min(2px, 4px)", "1px");
    assert_value("rgba(lighten(red, 25%), 0.5)", "rgba(255,128,128,.5)");
    assert_value("translate(1px + 1px, 3em)", "translate(2px,3em)");
    assert_value("red(complement(#56af9b))", "175");
    assert_error("abs(1, 2)", "abs() expects exactly 1 parameter.");
}

#[test]
fn variables() {
    assert_value("$_csspp_pi_rad * 2", "6.283rad");
    assert_error("$nope + 1", "variable named \"nope\" is not set.");
    assert_error("$darken", "variable named \"darken\" is a function and it can only be referenced with a function ($darken() or @include darken;).");
}

#[test]
fn leftover_tokens_are_an_error() {
    assert_error("1 2", "unexpected INTEGER after the end of the expression.");
}

#[test]
fn declarations() {
    let mut session = Session::new();
    let options = Options { declaration: true,
                            ..Options::default() };
    let value = evaluate_with("1px + 1px solid red !important", &mut session, options).unwrap();
    assert_eq!(value.as_deref(), Some("2px solid red !important"));

    let options = Options { declaration: true,
                            divide_font_metrics: true,
                            ..Options::default() };
    let value = evaluate_with("12px/1.5 serif", &mut session, options).unwrap();
    assert_eq!(value.as_deref(), Some("12px/1.5 serif"));
    assert_eq!(session.error_count(), 0);
}

#[test]
fn without_system_definitions() {
    let mut session = Session::new();
    let options = Options { system_definitions: false,
                            ..Options::default() };
    let value = evaluate_with("darken(red, 10%)", &mut session, options).unwrap();
    assert_eq!(value.as_deref(), Some("darken(red,10%)"));
}

#[test]
fn parse_errors_are_returned() {
    let mut session = Session::new();
    assert!(evaluate("(1 + 2", &mut session).is_err());
    assert_eq!(session.error_count(), 0);
}

#[test]
fn precision_comes_from_the_session() {
    let mut session = Session::new();
    session.set_precision(5);
    assert_eq!(evaluate("$_csspp_pi", &mut session).unwrap().as_deref(), Some("3.14159"));
}
