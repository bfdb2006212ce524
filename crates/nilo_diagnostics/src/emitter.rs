//! Emitter - 诊断输出器
//!
//! 负责将诊断信息格式化输出。有源码时通过 ariadne 渲染带下划线的片段，
//! 否则退回到单行的纯文本/彩色格式。

use crate::diagnostic::Diagnostic;
use crate::level::DiagnosticLevel;
use crate::span::{Span, SpanExt};
use ariadne::{sources, Color, Config, IndexType, Label, Report};
use colored::*;

/// ariadne 报告中使用的默认文件名
const ANONYMOUS_SOURCE: &str = "<input>";

/// 诊断输出器
pub struct Emitter {
    use_colors: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// 创建无颜色的输出器
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    /// 输出单个诊断到 stderr
    pub fn emit(&self, diagnostic: &Diagnostic) {
        eprint!("{}", self.render(diagnostic));
    }

    /// 带源码片段输出
    pub fn emit_with_source(&self, diagnostic: &Diagnostic, source: &str) {
        eprint!("{}", self.render_with_source(diagnostic, source));
    }

    /// 渲染为字符串（不含源码片段）
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        if self.use_colors {
            self.render_colored(diagnostic, None)
        } else {
            self.render_plain(diagnostic, None)
        }
    }

    /// 渲染为字符串，span 落在源码内时使用 ariadne
    pub fn render_with_source(&self, diagnostic: &Diagnostic, source: &str) -> String {
        match &diagnostic.span {
            Some(span) if span.end <= source.len() => self
                .render_report(diagnostic, span, source)
                .unwrap_or_else(|| self.render_fallback(diagnostic, source)),
            _ => self.render_fallback(diagnostic, source),
        }
    }

    fn render_fallback(&self, diagnostic: &Diagnostic, source: &str) -> String {
        if self.use_colors {
            self.render_colored(diagnostic, Some(source))
        } else {
            self.render_plain(diagnostic, Some(source))
        }
    }

    fn render_report(&self, diagnostic: &Diagnostic, span: &Span, source: &str) -> Option<String> {
        let file = diagnostic
            .file
            .clone()
            .unwrap_or_else(|| ANONYMOUS_SOURCE.to_string());

        let mut label = Label::new((file.clone(), span.clone()))
            .with_color(label_color(diagnostic.level));
        if let Some(text) = &diagnostic.label {
            label = label.with_message(text);
        }

        let mut builder = Report::build(diagnostic.level.report_kind(), file.clone(), span.start)
            .with_config(
                Config::default()
                    .with_color(self.use_colors)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(&diagnostic.message)
            .with_label(label);

        // ariadne 每个报告只有一条 note / help
        if !diagnostic.notes.is_empty() {
            builder = builder.with_note(diagnostic.notes.join("\n"));
        }
        if !diagnostic.suggestions.is_empty() {
            let help = diagnostic
                .suggestions
                .iter()
                .map(|s| match &s.replacement {
                    Some(r) => format!("{} (try: {})", s.message, r),
                    None => s.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("\n");
            builder = builder.with_help(help);
        }

        let mut buf = Vec::new();
        builder
            .finish()
            .write(sources(vec![(file, source)]), &mut buf)
            .ok()?;
        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    fn location(diagnostic: &Diagnostic, source: Option<&str>) -> Option<String> {
        let span = diagnostic.span.as_ref()?;
        let file = diagnostic.file.as_deref().unwrap_or(ANONYMOUS_SOURCE);
        Some(match source {
            Some(src) => {
                let (line, col) = span.line_col(src);
                format!("{}:{}:{}", file, line, col)
            }
            None => format!("{}:{:?}", file, span),
        })
    }

    fn render_colored(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut out = format!(
            "{}: {}\n",
            diagnostic.level.colored_name(),
            diagnostic.message.bold()
        );

        if let Some(loc) = Self::location(diagnostic, source) {
            out.push_str(&format!("  {} {}\n", "-->".blue().bold(), loc));
        }

        for note in &diagnostic.notes {
            out.push_str(&format!(
                "  {} {}\n",
                "=".blue().bold(),
                format!("note: {}", note).bright_black()
            ));
        }

        for suggestion in &diagnostic.suggestions {
            out.push_str(&format!(
                "  {} {}\n",
                "=".green().bold(),
                format!("help: {}", suggestion.message).green()
            ));
            if let Some(replacement) = &suggestion.replacement {
                out.push_str(&format!("        try: {}\n", replacement.green().italic()));
            }
        }
        out
    }

    fn render_plain(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut out = format!("{}: {}\n", diagnostic.level, diagnostic.message);

        if let Some(loc) = Self::location(diagnostic, source) {
            out.push_str(&format!("  --> {}\n", loc));
        }

        for note in &diagnostic.notes {
            out.push_str(&format!("  = note: {}\n", note));
        }

        for suggestion in &diagnostic.suggestions {
            out.push_str(&format!("  = help: {}\n", suggestion.message));
            if let Some(replacement) = &suggestion.replacement {
                out.push_str(&format!("        try: {}\n", replacement));
            }
        }
        out
    }
}

fn label_color(level: DiagnosticLevel) -> Color {
    match level {
        DiagnosticLevel::Error => Color::Red,
        DiagnosticLevel::Warning => Color::Yellow,
        DiagnosticLevel::Note => Color::Blue,
    }
}
