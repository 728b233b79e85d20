// Sandbox behavior of the snippet evaluator

use std::rc::Rc;

use proptest::prelude::*;
use themelab::interpreter::{Capabilities, Evaluator, FailureKind};
use themelab::value::{Object, Value};

fn evaluator() -> Evaluator {
    Evaluator::new(Capabilities::standard())
}

fn eval_ok(source: &str) -> Value {
    evaluator()
        .evaluate(source)
        .unwrap_or_else(|failure| panic!("{source:?} failed: {}", failure.summary()))
}

fn eval_err(source: &str) -> (FailureKind, String) {
    match evaluator().evaluate(source) {
        Ok(value) => panic!("{source:?} should fail, got {value:?}"),
        Err(failure) => (failure.kind, failure.message),
    }
}

#[test]
fn test_undeclared_identifier_fails() {
    let (kind, message) = eval_err("{ color: window.location }");
    assert_eq!(kind, FailureKind::Runtime);
    assert_eq!(message, "window is not defined");
}

#[test]
fn test_capabilities_are_read_only() {
    let (kind, message) = eval_err("(() => { ui = 1; return ui })()");
    assert_eq!(kind, FailureKind::Runtime);
    assert!(message.contains("read-only"), "{message}");
}

#[test]
fn test_member_assignment_is_rejected() {
    let (kind, _) = eval_err("(() => { const o = {}; o.x = 1; return o })()");
    assert_eq!(kind, FailureKind::Parse);
}

#[test]
fn test_recursion_is_bounded() {
    let (kind, message) = eval_err("(() => { const f = (n) => f(n + 1); return f(0) })()");
    assert_eq!(kind, FailureKind::Runtime);
    assert!(message.contains("Maximum call stack size exceeded"), "{message}");
}

#[test]
fn test_deep_nesting_fails_without_crashing() {
    for open in ["[", "(", "{ a: ", "!", "x => ", "`${"] {
        let source = open.repeat(100_000);
        assert!(evaluator().evaluate(&source).is_err(), "{open}");
    }
    let closed = format!("{}1{}", "[".repeat(100_000), "]".repeat(100_000));
    let (kind, message) = eval_err(&closed);
    assert_eq!(kind, FailureKind::Parse);
    assert!(message.contains("Nesting exceeds"), "{message}");
}

#[test]
fn test_nesting_across_calls_is_bounded() {
    let nested = format!("{}f(n + 1){}", "[".repeat(20), "]".repeat(20));
    let source = format!("(() => {{ const f = (n) => {nested}; return f(0) }})()");
    let (kind, message) = eval_err(&source);
    assert_eq!(kind, FailureKind::Runtime);
    assert!(message.contains("Maximum call stack size exceeded"), "{message}");
}

#[test]
fn test_string_growth_is_bounded() {
    let (kind, message) = eval_err("'x'.padStart(1e10)");
    assert_eq!(kind, FailureKind::Runtime);
    assert!(message.contains("Invalid string length"), "{message}");

    let (_, message) =
        eval_err("(() => { const f = (s, n) => n ? f(s + s, n - 1) : s.length; return f('x', 60) })()");
    assert!(message.contains("Invalid string length"), "{message}");

    let (_, message) =
        eval_err("(() => { const f = (a, n) => n ? f([...a, ...a], n - 1) : a.length; return f([0], 60) })()");
    assert!(message.contains("Invalid array length"), "{message}");

    assert_eq!(eval_ok("'7'.padStart(3, '0')"), Value::from("007"));
}

#[test]
fn test_calls_release_their_scopes() {
    let eval = evaluator();
    let function = eval
        .evaluate("(o) => { const helper = () => o.x; if (o.x) { const again = () => helper(); return again() } return 0 }")
        .unwrap();
    let arg = Rc::new(Object::from_iter([("x".to_string(), Value::Number(1.0))]));

    for _ in 0..10 {
        let result = eval.call(&function, &[Value::Object(arg.clone())]).unwrap();
        assert_eq!(result, Value::Number(1.0));
    }
    assert_eq!(Rc::strong_count(&arg), 1);
}

#[test]
fn test_escaping_closures_keep_their_scope() {
    let returned = eval_ok("(() => { const make = (n) => { const get = () => n; return get }; return make(7)() })()");
    assert_eq!(returned, Value::Number(7.0));

    let assigned = eval_ok(
        r#"(() => {
            let saved;
            const keep = (f) => { saved = f; return 0 };
            const make = (n) => { const get = () => n; keep(get); return 0 };
            make(3);
            return saved();
        })()"#,
    );
    assert_eq!(assigned, Value::Number(3.0));
}

#[test]
fn test_helpers_compute_values() {
    let value = eval_ok(
        r#"(() => {
            const sizes = ["sm", "md", "lg"];
            const scale = { sm: 1, md: 2, lg: 4 };
            const entries = sizes.map((s) => [s, { px: scale[s] * 2 }]);
            return {
                count: entries.length,
                names: sizes.join("/"),
                first: entries[0][1],
                label: `${sizes[1].toUpperCase()}-${Math.max(...[1, 7, 3])}`,
            };
        })()"#,
    );
    assert_eq!(value.get_path("count"), Some(&Value::Number(3.0)));
    assert_eq!(value.get_path("names"), Some(&Value::from("sm/md/lg")));
    assert_eq!(value.get_path("first.px"), Some(&Value::Number(2.0)));
    assert_eq!(value.get_path("label"), Some(&Value::from("MD-7")));
}

#[test]
fn test_destructuring_defaults_and_optional_chaining() {
    let value = eval_ok(
        r#"(({ size = "md", variant, ...rest }) => ({
            size,
            variant: variant ?? "solid",
            extra: rest.extra?.deep,
            missing: rest.nothing?.deeper.still,
        }))({ extra: { deep: 1 } })"#,
    );
    assert_eq!(value.get_path("size"), Some(&Value::from("md")));
    assert_eq!(value.get_path("variant"), Some(&Value::from("solid")));
    assert_eq!(value.get_path("extra"), Some(&Value::Number(1.0)));
    assert_eq!(value.get_path("missing"), Some(&Value::Undefined));
}

#[test]
fn test_spread_merges_objects_in_order() {
    let value = eval_ok("(() => { const a = { x: 1, y: 1 }; return { ...a, y: 2, z: 3 } })()");
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["x", "y", "z"]);
    assert_eq!(value.get_path("y"), Some(&Value::Number(2.0)));
}

#[test]
fn test_thrown_errors_carry_their_message() {
    let (kind, message) = eval_err("(() => { throw new Error('nope') })()");
    assert_eq!(kind, FailureKind::Runtime);
    assert_eq!(message, "nope");
}

#[test]
fn test_elements_are_built_from_ui() {
    let value = eval_ok("ui.Stack({ spacing: 2 }, ui.Text(null, 'a'), [ui.Text(null, 'b'), false])");
    let element = value.as_element().expect("element");
    assert_eq!(element.tag, "Stack");
    assert_eq!(element.children.len(), 2);
    assert_eq!(element.text_content(), "ab");
}

fn json_literal() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        (-4000i32..4000).prop_map(|n| serde_json::json!(f64::from(n) / 4.0)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-zA-Z_][a-zA-Z0-9_]{0,8}", inner, 0..6).prop_map(
                |map| serde_json::Value::Object(map.into_iter().collect())
            ),
        ]
    })
}

proptest! {
    #[test]
    fn prop_data_literals_evaluate_to_themselves(
        fields in prop::collection::btree_map("[a-z]{1,6}", json_literal(), 0..6)
    ) {
        let json = serde_json::Value::Object(fields.into_iter().collect());
        let source = serde_json::to_string_pretty(&json).unwrap();
        let value = evaluator().evaluate(&source).unwrap();
        prop_assert_eq!(value, Value::from_json(&json));
    }

    #[test]
    fn prop_garbage_never_panics(source in "[ -~]{0,40}") {
        let _ = evaluator().evaluate(&source);
    }

    #[test]
    fn prop_unbalanced_nesting_fails(
        open in prop::sample::select(vec!["[", "(", "{ a: ", "-", "!(", "x => ", "`${", "a.b("]),
        depth in 150usize..3000,
    ) {
        prop_assert!(evaluator().evaluate(&open.repeat(depth)).is_err());
    }
}
