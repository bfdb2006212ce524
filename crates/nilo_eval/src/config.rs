//! Interpreter configuration

use crate::value::Value;

/// 默认的最大求值深度
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// 解释器配置
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// 表示"没有值"的唯一标记。`None` 关键字求值为它，
    /// `??` / `?.` / `?[` 通过身份比较识别它。
    pub marker: Value,
    /// 表达式嵌套求值的最大深度，超出时报 RecursionError 而不是栈溢出
    pub max_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            marker: Value::None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InterpreterConfig {
    pub fn with_marker(mut self, marker: Value) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
