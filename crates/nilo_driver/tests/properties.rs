//! 端到端行为：`??`、`??=`、`?.`、`?[`

use nilo_driver::{check, run_with, Interpreter, NiloError, Value};
use nilo_eval::RuntimeErrorKind;
use nilo_syntax::SyntaxErrorKind;
use std::cell::Cell;
use std::rc::Rc;

/// 注册一个计数函数，每次调用返回 `result`
fn counter(interp: &mut Interpreter, name: &str, result: Value) -> Rc<Cell<usize>> {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    interp.define_fn(name, move |_| {
        seen.set(seen.get() + 1);
        Ok(result.clone())
    });
    calls
}

fn run(interp: &mut Interpreter, source: &str) -> Value {
    run_with(interp, source)
        .unwrap_or_else(|e| panic!("{} failed: {}", source, e))
        .expect("last statement should be an expression")
}

#[test]
fn coalesce_keeps_present_values_without_touching_fallback() {
    let present = vec![
        Value::Int(0),
        Value::Float(0.0),
        Value::Bool(false),
        Value::str(""),
        Value::list(vec![]),
        Value::object(),
    ];
    for value in present {
        let mut interp = Interpreter::default();
        let fallback = counter(&mut interp, "fallback", Value::Int(1));
        interp.define("x", value.clone());
        let result = run(&mut interp, "x ?? fallback()");
        assert!(result.is_identical(&value), "{:?} was replaced", value);
        assert_eq!(fallback.get(), 0);
    }
}

#[test]
fn coalesce_on_none_returns_fallback() {
    let mut interp = Interpreter::default();
    let fallback = counter(&mut interp, "fallback", Value::str("y"));
    assert_eq!(run(&mut interp, "None ?? fallback()"), Value::str("y"));
    assert_eq!(fallback.get(), 1);
}

#[test]
fn coalesce_binds_tighter_than_arithmetic_but_looser_than_power() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "a = None; b = None").unwrap();
    assert_eq!(run(&mut interp, "(a ?? 2 ** b ?? 3)"), Value::Int(8));
    assert_eq!(run(&mut interp, "a ?? (2 ** (b ?? 3))"), Value::Int(8));
    assert_eq!(
        run(&mut interp, "(a ?? 2 ** b ?? 3) == a ?? (2 ** (b ?? 3))"),
        Value::Bool(true)
    );
}

#[test]
fn coalesce_chain_calls_left_operands_in_order() {
    let mut interp = Interpreter::default();
    let c = counter(&mut interp, "c", Value::None);
    let ex = counter(&mut interp, "ex", Value::Int(1));

    assert_eq!(run(&mut interp, "(c() ?? c() ?? True) == True"), Value::Bool(true));
    assert_eq!(c.get(), 2);

    assert_eq!(run(&mut interp, "(True ?? ex())"), Value::Bool(true));
    assert_eq!(ex.get(), 0);
}

#[test]
fn suppressed_chain_skips_every_later_step() {
    let mut interp = Interpreter::default();
    let c = counter(&mut interp, "c", Value::Int(1));
    let e = counter(&mut interp, "e", Value::Int(0));
    run_with(&mut interp, "a = None").unwrap();

    {

        let v = run(&mut interp, "a?.b(c()).d?[e()]");

        assert!(interp.is_absent(&v));

    }
    assert_eq!(c.get(), 0);
    assert_eq!(e.get(), 0);

    // 未定义的名字也不会被求值
    {
        let v = run(&mut interp, "a?.b(undefined_c).d?[undefined_e]");
        assert!(interp.is_absent(&v));
    }
}

#[test]
fn short_circuit_after_a_present_prefix() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "o = object(); o.inner = None; o.items = [None]").unwrap();
    {
        let v = run(&mut interp, "o.inner?.deep.deeper");
        assert!(interp.is_absent(&v));
    }
    {
        let v = run(&mut interp, "o.items[0]?[1][2]");
        assert!(interp.is_absent(&v));
    }
    assert_eq!(run(&mut interp, "o?.items?[0] ?? 'empty'"), Value::str("empty"));
}

#[test]
fn parentheses_reset_short_circuiting() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "a = None; c = 5").unwrap();
    let err = run_with(&mut interp, "(a?.b ?? c).d?.e").unwrap_err();
    match err {
        NiloError::Runtime(err) => {
            assert_eq!(
                err.kind,
                RuntimeErrorKind::Attribute {
                    type_name: "int".into(),
                    attr: "d".into()
                }
            );
        }
        other => panic!("expected runtime error, got {:?}", other),
    }
}

#[test]
fn plain_access_on_none_raises() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "a = None").unwrap();
    let err = run_with(&mut interp, "a.b").unwrap_err();
    assert_eq!(
        err.to_string(),
        "AttributeError: 'NoneType' object has no attribute 'b'"
    );
    let err = run_with(&mut interp, "a[0]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "TypeError: 'NoneType' object is not subscriptable"
    );
}

#[test]
fn errors_on_present_values_still_propagate() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "items = [1]").unwrap();
    let err = run_with(&mut interp, "items?[5]").unwrap_err();
    assert_eq!(err.to_string(), "IndexError: list index out of range");
}

#[test]
fn coalesce_assign_only_fills_none() {
    let mut interp = Interpreter::default();
    let f = counter(&mut interp, "f", Value::str("side effect"));

    run_with(&mut interp, "a = None\na ??= 'value'").unwrap();
    assert_eq!(interp.get("a"), Some(&Value::str("value")));

    run_with(&mut interp, "b = ''\nb ??= f()").unwrap();
    assert_eq!(interp.get("b"), Some(&Value::str("")));
    assert_eq!(f.get(), 0);
}

#[test]
fn coalesce_assign_evaluates_target_operands_once() {
    let mut interp = Interpreter::default();
    let holder = Value::object();
    let get = {
        let holder = holder.clone();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        interp.define_fn("get", move |_| {
            seen.set(seen.get() + 1);
            Ok(holder.clone())
        });
        calls
    };
    run_with(&mut interp, "get().slot = None\nget().slot ??= 7").unwrap();
    assert_eq!(get.get(), 2);
    assert_eq!(run(&mut interp, "get().slot"), Value::Int(7));
}

#[test]
fn short_circuiting_targets_are_rejected() {
    for source in ["a?.b = 1", "a?[b] = 1", "a?.b ??= 1"] {
        let err = check(source).unwrap_err();
        match err {
            NiloError::Syntax(errors) => {
                assert!(matches!(
                    errors[0].kind,
                    SyntaxErrorKind::ShortCircuitTarget(_)
                ));
            }
            other => panic!("{}: expected syntax error, got {:?}", source, other),
        }
    }
}

#[test]
fn parenthesized_and_inner_short_circuit_targets_parse() {
    assert!(check("(a?.b ?? d).c = 1").is_ok());
    assert!(check("a?.b.c = 1").is_ok());
    assert!(check("a?[0][1] = 1").is_ok());
}

#[test]
fn suppressed_target_object_skips_the_store() {
    let mut interp = Interpreter::default();
    let f = counter(&mut interp, "f", Value::Int(0));
    let g = counter(&mut interp, "g", Value::Int(1));
    run_with(&mut interp, "a = None").unwrap();

    run_with(&mut interp, "a?.b[f()] = 1").unwrap();
    run_with(&mut interp, "a?.b.c = 1").unwrap();
    run_with(&mut interp, "a?.b.c ??= g()").unwrap();
    run_with(&mut interp, "a?[0].c += g()").unwrap();

    assert_eq!(f.get(), 0);
    assert_eq!(g.get(), 0);
    assert_eq!(interp.get("a"), Some(&Value::None));
}

#[test]
fn present_target_object_still_stores() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "a = object(); a.b = object(); a.b.c = None").unwrap();

    run_with(&mut interp, "a?.b.c ??= 3").unwrap();
    assert_eq!(run(&mut interp, "a.b.c"), Value::Int(3));

    run_with(&mut interp, "a?.b.d = [0]; a?.b.d[0] = 9").unwrap();
    assert_eq!(run(&mut interp, "a.b.d[0]"), Value::Int(9));
}

#[test]
fn plain_target_on_none_still_raises() {
    let mut interp = Interpreter::default();
    run_with(&mut interp, "a = None").unwrap();
    let err = run_with(&mut interp, "a.b.c = 1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "AttributeError: 'NoneType' object has no attribute 'b'"
    );
}

#[test]
fn missing_operands_are_syntax_errors() {
    for source in ["a ??", "?? b", "a ?? ?? b", "a?.", "a?[]"] {
        assert!(
            matches!(check(source), Err(NiloError::Syntax(_))),
            "{} should not parse",
            source
        );
    }
}
