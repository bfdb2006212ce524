//! Span - 源码位置信息
//!
//! 表示源代码中的字节范围

/// 源码位置范围 (字节偏移)
pub type Span = std::ops::Range<usize>;

/// Span 辅助函数
pub trait SpanExt {
    /// 覆盖 self 与 other 的最小范围
    fn join(&self, other: &Self) -> Self;

    /// 计算起始位置的 (行, 列)，均从 1 开始
    fn line_col(&self, source: &str) -> (usize, usize);
}

impl SpanExt for Span {
    fn join(&self, other: &Self) -> Self {
        self.start.min(other.start)..self.end.max(other.end)
    }

    fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = self.start.min(source.len());
        let prefix = &source[..offset];
        let line = prefix.matches('\n').count() + 1;
        let col = match prefix.rfind('\n') {
            Some(nl) => prefix[nl + 1..].chars().count() + 1,
            None => prefix.chars().count() + 1,
        };
        (line, col)
    }
}
