//! Interpreter - 树遍历求值器
//!
//! 每个解释器持有自己的全局变量、输出和 None 标记。
//! `None` 关键字求值为配置中的标记，[`Interpreter::is_absent`] 是唯一的"没有值"判断。

mod access;
mod assign;
mod chain;
mod ops;

use crate::builtins::{self, Output};
use crate::config::InterpreterConfig;
use crate::error::{RuntimeError, RuntimeErrorKind, RuntimeResult};
use crate::value::{Dict, Value};
use nilo_syntax::ast::{BoolOp, Expr, ExprKind, Literal, Program, Stmt};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct Interpreter {
    config: InterpreterConfig,
    globals: HashMap<String, Value>,
    output: Rc<RefCell<Output>>,
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Interpreter {
    /// 创建解释器并注册内置函数
    pub fn new(config: InterpreterConfig) -> Self {
        let mut interp = Self {
            config,
            globals: HashMap::new(),
            output: Rc::new(RefCell::new(Output::default())),
            depth: 0,
        };
        builtins::install(&mut interp);
        interp
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// 当前的 None 标记
    pub fn marker(&self) -> &Value {
        &self.config.marker
    }

    /// 值是否是 None 标记（身份比较）
    pub fn is_absent(&self, value: &Value) -> bool {
        value.is_identical(&self.config.marker)
    }

    /// 定义（或覆盖）一个全局变量
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    /// 定义一个原生函数
    pub fn define_fn(
        &mut self,
        name: &str,
        func: impl Fn(&[Value]) -> RuntimeResult<Value> + 'static,
    ) {
        self.define(name, Value::function(name, func));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// 之后的 print 输出写入缓冲区而不是标准输出
    pub fn capture_output(&mut self) {
        self.output.borrow_mut().capture();
    }

    /// 取出已缓冲的输出
    pub fn take_output(&mut self) -> String {
        self.output.borrow_mut().take()
    }

    pub(crate) fn output_handle(&self) -> Rc<RefCell<Output>> {
        Rc::clone(&self.output)
    }

    /// 执行整个程序，返回最后一个表达式语句的值
    pub fn run(&mut self, program: &Program) -> RuntimeResult<Option<Value>> {
        let mut last = None;
        for stmt in &program.stmts {
            last = self.exec(stmt)?;
        }
        Ok(last)
    }

    /// 执行一条语句；表达式语句返回它的值
    pub fn exec(&mut self, stmt: &Stmt) -> RuntimeResult<Option<Value>> {
        match stmt {
            Stmt::Expression(expr) => self.eval(expr).map(Some),
            Stmt::Assign { target, value, .. } => {
                self.exec_assign(target, value)?;
                Ok(None)
            }
            Stmt::AugAssign {
                span,
                target,
                op,
                value,
            } => {
                self.exec_aug_assign(target, *op, value, span)?;
                Ok(None)
            }
        }
    }

    /// 求值表达式，带深度限制
    pub fn eval(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::new(RuntimeErrorKind::RecursionLimit(
                self.config.max_depth,
            ))
            .at(&expr.span));
        }
        self.depth += 1;
        let result = self.eval_kind(expr);
        self.depth -= 1;
        result
    }

    fn eval_kind(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(self.literal(lit)),
            ExprKind::Variable(name) => self
                .globals
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::name_error(name).at(&expr.span)),
            ExprKind::Paren(inner) => self.eval(inner),
            ExprKind::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                Ok(Value::list(values))
            }
            ExprKind::Dict(entries) => {
                let mut dict = Dict::new();
                for (key, value) in entries {
                    let k = self.eval(key)?;
                    let v = self.eval(value)?;
                    dict.insert(k, v).map_err(|e| e.at(&key.span))?;
                }
                Ok(Value::Dict(Rc::new(RefCell::new(dict))))
            }
            ExprKind::Attribute { .. } | ExprKind::Index { .. } | ExprKind::Call { .. } => {
                self.eval_chain(expr)
            }
            ExprKind::Coalesce { left, right } => self.eval_coalesce(left, right),
            ExprKind::Power { base, exponent } => {
                let b = self.eval(base)?;
                let e = self.eval(exponent)?;
                ops::power(&b, &e).map_err(|err| err.at(&expr.span))
            }
            ExprKind::Unary(op, operand) => {
                let v = self.eval(operand)?;
                ops::unary(*op, &v).map_err(|err| err.at(&expr.span))
            }
            ExprKind::Binary(lhs, op, rhs) => {
                let l = self.eval(lhs)?;
                let r = self.eval(rhs)?;
                ops::binary(*op, &l, &r).map_err(|err| err.at(&expr.span))
            }
            ExprKind::Compare(lhs, op, rhs) => {
                let l = self.eval(lhs)?;
                let r = self.eval(rhs)?;
                ops::compare(*op, &l, &r).map_err(|err| err.at(&expr.span))
            }
            ExprKind::BoolOp(lhs, op, rhs) => {
                let l = self.eval(lhs)?;
                match (op, l.truthy()) {
                    (BoolOp::And, false) | (BoolOp::Or, true) => Ok(l),
                    _ => self.eval(rhs),
                }
            }
        }
    }

    fn literal(&self, lit: &Literal) -> Value {
        match lit {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(s) => Value::str(s),
            Literal::None => self.config.marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nilo_syntax::parse_program;
    use std::cell::Cell;

    fn run(interp: &mut Interpreter, source: &str) -> RuntimeResult<Option<Value>> {
        let program = parse_program(source).unwrap();
        interp.run(&program)
    }

    fn eval(source: &str) -> Value {
        run(&mut Interpreter::default(), source).unwrap().unwrap()
    }

    #[test]
    fn test_arithmetic_and_precedence() {
        assert_eq!(eval("1 + 2 * 3"), Value::Int(7));
        assert_eq!(eval("-2 ** 2"), Value::Int(-4));
        assert_eq!(eval("2 ** 3 ** 2"), Value::Int(512));
        assert_eq!(eval("7 / 2"), Value::Float(3.5));
        assert_eq!(eval("1 < 2 and 'x' or 'y'"), Value::str("x"));
    }

    #[test]
    fn test_coalesce() {
        assert_eq!(eval("None ?? 3"), Value::Int(3));
        assert_eq!(eval("0 ?? 3"), Value::Int(0));
        assert_eq!(eval("'' ?? 3"), Value::str(""));
        assert_eq!(eval("None ?? None ?? 'z'"), Value::str("z"));
        assert_eq!(eval("a = None; b = None; a ?? 2 ** b ?? 3"), Value::Int(8));
        assert_eq!(eval("a = 2; b = None; c = 3; d = 2; a * b ?? c // d"), Value::Int(3));
    }

    #[test]
    fn test_short_circuit_attribute_and_index() {
        assert_eq!(eval("a = None; a?.b"), Value::None);
        assert_eq!(eval("a = None; a?[0]"), Value::None);
        assert_eq!(eval("a = object(); a.b = [1, 2]; a?.b?[1]"), Value::Int(2));
        assert_eq!(eval("d = {'k': None}; d['k']?.x.y.z"), Value::None);
    }

    #[test]
    fn test_plain_access_on_none_still_raises() {
        let err = run(&mut Interpreter::default(), "a = None\na.b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "AttributeError: 'NoneType' object has no attribute 'b'"
        );
        assert_eq!(err.span, Some(9..12));
    }

    #[test]
    fn test_parentheses_end_the_chain() {
        let err = run(&mut Interpreter::default(), "a = None; (a?.b).c").unwrap_err();
        assert_eq!(
            err.to_string(),
            "AttributeError: 'NoneType' object has no attribute 'c'"
        );
    }

    #[test]
    fn test_suppressed_chain_skips_arguments() {
        let calls = Rc::new(Cell::new(0));
        let mut interp = Interpreter::default();
        let counter = Rc::clone(&calls);
        interp.define_fn("tick", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Int(0))
        });
        let result = run(&mut interp, "a = None; a?.b(tick())[tick()].c(tick())").unwrap();
        assert_eq!(result, Some(Value::None));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_coalesce_assign() {
        let mut interp = Interpreter::default();
        run(&mut interp, "a = None; a ??= 'value'; b = 0; b ??= 5").unwrap();
        assert_eq!(interp.get("a"), Some(&Value::str("value")));
        assert_eq!(interp.get("b"), Some(&Value::Int(0)));

        run(&mut interp, "o = object(); o.x = None; o.x ??= [1]; o.x ??= [2]").unwrap();
        assert_eq!(run(&mut interp, "o.x").unwrap(), Some(Value::list(vec![Value::Int(1)])));

        let err = run(&mut interp, "missing ??= 1").unwrap_err();
        assert_eq!(err.to_string(), "NameError: name 'missing' is not defined");
    }

    #[test]
    fn test_aug_assign_arithmetic() {
        let mut interp = Interpreter::default();
        run(&mut interp, "x = 2; x += 3; x **= 2; items = [1]; items[0] -= 4").unwrap();
        assert_eq!(interp.get("x"), Some(&Value::Int(25)));
        assert_eq!(run(&mut interp, "items[0]").unwrap(), Some(Value::Int(-3)));
    }

    #[test]
    fn test_custom_marker() {
        let marker = Value::object();
        let mut interp = Interpreter::new(InterpreterConfig::default().with_marker(marker.clone()));
        interp.define("missing", marker.clone());
        let result = run(&mut interp, "missing ?? 1").unwrap().unwrap();
        assert_eq!(result, Value::Int(1));
        // 普通的 None 值不再被视为"没有值"
        assert!(!interp.is_absent(&Value::None));
        let result = run(&mut interp, "None is missing").unwrap().unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn test_recursion_limit() {
        let mut interp = Interpreter::new(InterpreterConfig::default().with_max_depth(8));
        let source = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        let err = run(&mut interp, &source).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::RecursionLimit(8));
        // 深度在出错后被恢复
        assert_eq!(run(&mut interp, "1 + 1").unwrap(), Some(Value::Int(2)));
    }
}
