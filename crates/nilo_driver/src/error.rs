//! Driver Errors
//!
//! 驱动层的错误类型，集成统一诊断系统

use nilo_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
use nilo_eval::RuntimeError;
use nilo_syntax::SyntaxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NiloError {
    /// 语法错误（可能有多个）
    #[error("Syntax errors:\n{}", format_syntax_errors(.0))]
    Syntax(Vec<SyntaxError>),

    /// 运行时错误
    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NiloError {
    /// 转换为诊断列表并收集到 DiagnosticSink
    pub fn collect_to_sink(&self, sink: &mut DiagnosticSink, file_path: Option<&str>) {
        let mut add_diag = |diag: Diagnostic| match file_path {
            Some(path) => sink.add(diag.with_file(path)),
            None => sink.add(diag),
        };

        match self {
            NiloError::Syntax(errors) => {
                for err in errors {
                    add_diag(err.to_diagnostic());
                }
            }
            NiloError::Runtime(err) => add_diag(err.to_diagnostic()),
            NiloError::Io(err) => add_diag(Diagnostic::error(format!("IO error: {}", err))),
        }
    }

    /// 渲染为字符串，有源码时附带片段
    pub fn render(&self, emitter: &Emitter, file_path: Option<&str>, source: Option<&str>) -> String {
        let mut sink = DiagnosticSink::new();
        self.collect_to_sink(&mut sink, file_path);
        sink.render_all(emitter, source)
    }

    /// 使用统一诊断系统输出到 stderr
    pub fn emit(&self, emitter: &Emitter, file_path: Option<&str>, source: Option<&str>) {
        let mut sink = DiagnosticSink::new();
        self.collect_to_sink(&mut sink, file_path);
        for diag in sink.diagnostics() {
            match source {
                Some(src) => emitter.emit_with_source(diag, src),
                None => emitter.emit(diag),
            }
        }
    }
}

fn format_syntax_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type NiloResult<T> = Result<T, NiloError>;

#[cfg(test)]
mod tests {
    use super::*;
    use nilo_syntax::SyntaxErrorKind;

    #[test]
    fn test_syntax_errors_are_numbered() {
        let err = NiloError::Syntax(vec![
            SyntaxError::new(SyntaxErrorKind::ShortCircuitTarget("?."), 0..4),
            SyntaxError::new(SyntaxErrorKind::InvalidTarget("literal".into()), 10..11),
        ]);
        assert_eq!(
            err.to_string(),
            "Syntax errors:\n  1. cannot assign to a short-circuiting access ending in '?.'\n  2. cannot assign to literal"
        );
    }

    #[test]
    fn test_collect_attaches_file() {
        let err = NiloError::Runtime(RuntimeError::name_error("x").at(&(0..1)));
        let mut sink = DiagnosticSink::new();
        err.collect_to_sink(&mut sink, Some("main.nl"));
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.diagnostics()[0].file.as_deref(), Some("main.nl"));
    }

    #[test]
    fn test_render_with_source_mentions_message() {
        let err = NiloError::Runtime(RuntimeError::name_error("x").at(&(0..1)));
        let text = err.render(&Emitter::without_colors(), None, Some("x"));
        assert!(text.contains("NameError: name 'x' is not defined"));
    }
}
