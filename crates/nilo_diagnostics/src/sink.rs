//! DiagnosticSink - 诊断收集器

use crate::diagnostic::Diagnostic;
use crate::emitter::Emitter;
use crate::level::DiagnosticLevel;

/// 按报告顺序收集诊断
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level.is_error())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticLevel::Warning)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 渲染全部诊断；有源码时附带源码片段
    pub fn render_all(&self, emitter: &Emitter, source: Option<&str>) -> String {
        self.diagnostics
            .iter()
            .map(|diag| match source {
                Some(src) => emitter.render_with_source(diag, src),
                None => emitter.render(diag),
            })
            .collect()
    }
}
