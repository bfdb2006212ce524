//! Nilo Eval
//!
//! 树遍历求值器。`??`、`??=`、`?.`、`?[` 的短路语义在 `interpreter` 中实现：
//! 访问链由一个 Active / Suppressed / Done 状态机从左到右执行，
//! 遇到 None 的短路访问会跳过链上剩余的所有步骤。

pub mod builtins;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod value;

pub use config::{InterpreterConfig, DEFAULT_MAX_DEPTH};
pub use error::{RuntimeError, RuntimeErrorKind, RuntimeResult};
pub use interpreter::Interpreter;
pub use value::{Dict, NativeFunction, Object, Value};
