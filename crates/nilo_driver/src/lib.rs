//! Nilo Driver
//!
//! 串联解析和求值两个阶段

pub mod error;

pub use error::{NiloError, NiloResult};
pub use nilo_eval::{Interpreter, InterpreterConfig, Value, DEFAULT_MAX_DEPTH};

use nilo_diagnostics::Diagnostic;
use nilo_syntax::ast::{Expr, Program};
use nilo_syntax::lint::{lint_program, Lint};

/// 检查结果
#[derive(Debug)]
pub struct CheckOutput {
    /// 语句数
    pub statements: usize,
    /// `??` / `?.` / `?[` 的静态警告
    pub warnings: Vec<Diagnostic>,
}

/// 解析源代码
pub fn parse_source(source: &str) -> NiloResult<Program> {
    log::debug!("parsing {} bytes", source.len());
    nilo_syntax::parse_program(source).map_err(NiloError::Syntax)
}

/// 语法检查加静态警告，不执行
pub fn check(source: &str) -> NiloResult<CheckOutput> {
    let program = parse_source(source)?;
    let warnings: Vec<Diagnostic> = lint_program(&program)
        .iter()
        .map(Lint::to_diagnostic)
        .collect();
    log::debug!("check found {} warnings", warnings.len());
    Ok(CheckOutput {
        statements: program.stmts.len(),
        warnings,
    })
}

/// 打印完全加括号的 AST，用于查看优先级
pub fn dump_ast(source: &str) -> NiloResult<String> {
    Ok(parse_source(source)?.to_string())
}

/// 在已有的解释器上运行源代码，返回最后一个表达式语句的值
pub fn run_with(interp: &mut Interpreter, source: &str) -> NiloResult<Option<Value>> {
    let program = parse_source(source)?;
    log::debug!("evaluating {} statements", program.stmts.len());
    Ok(interp.run(&program)?)
}

/// 用新的解释器运行源代码
///
/// # Example
/// ```
/// use nilo_driver::{run_source, InterpreterConfig, Value};
///
/// let value = run_source("a = None\na?.b ?? 42", InterpreterConfig::default()).unwrap();
/// assert_eq!(value, Some(Value::Int(42)));
/// ```
pub fn run_source(source: &str, config: InterpreterConfig) -> NiloResult<Option<Value>> {
    run_with(&mut Interpreter::new(config), source)
}

/// 从文件运行
pub fn run_file(path: &str, config: InterpreterConfig) -> NiloResult<Option<Value>> {
    let source = std::fs::read_to_string(path)?;
    run_source(&source, config)
}

/// 解析单个表达式
pub fn parse_expression(source: &str) -> NiloResult<Expr> {
    nilo_syntax::parse_expression(source).map_err(NiloError::Syntax)
}

/// 求值单个表达式
pub fn eval_expression(source: &str, config: InterpreterConfig) -> NiloResult<Value> {
    let expr = parse_expression(source)?;
    let mut interp = Interpreter::new(config);
    Ok(interp.eval(&expr)?)
}
