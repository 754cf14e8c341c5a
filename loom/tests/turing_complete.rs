//! End-to-end scenarios exercising recursion, iteration, and first-class
//! functions together, richer than a single-feature unit test.

use loom::{Engine, Environment, Value};

fn run(source: &str) -> Environment {
    let engine = Engine::new();
    let env = Environment::root();
    engine.eval_with_scope(source, &env).unwrap();
    env
}

#[test]
fn fibonacci_of_seven() {
    let env = run(
        r#"
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
result = fib(7)
"#,
    );
    assert_eq!(env.lookup("result"), Some(Value::Int(13)));
}

#[test]
fn exponentiation_by_recursion() {
    let env = run(
        r#"
def power(a, b):
    if b == 0:
        return 1
    return a * power(a, b - 1)
result = power(2, 8)
"#,
    );
    assert_eq!(env.lookup("result"), Some(Value::Int(256)));
}

#[test]
fn ackermann_multiple_cases() {
    let env = run(
        r#"
def ack(m, n):
    if m == 0:
        return n + 1
    if n == 0:
        return ack(m - 1, 1)
    return ack(m - 1, ack(m, n - 1))
a0 = ack(0, 3)
a1 = ack(1, 3)
a2 = ack(2, 1)
a3 = ack(2, 2)
result = a0 * 1000 + a1 * 100 + a2 * 10 + a3
"#,
    );
    assert_eq!(env.lookup("a0"), Some(Value::Int(4)));
    assert_eq!(env.lookup("a1"), Some(Value::Int(5)));
    assert_eq!(env.lookup("a2"), Some(Value::Int(5)));
    assert_eq!(env.lookup("a3"), Some(Value::Int(7)));
    assert_eq!(env.lookup("result"), Some(Value::Int(4557)));
}

#[test]
fn higher_order_function_application() {
    let env = run(
        r#"
def apply_twice(fn, x):
    return fn(fn(x))
def increment(n):
    return n + 1
result = apply_twice(increment, 3)
"#,
    );
    assert_eq!(env.lookup("result"), Some(Value::Int(5)));
}
