//! Nilo Diagnostics
//!
//! 统一的诊断系统，为 Nilo 的解析器和求值器提供清晰的错误报告。
//!
//! # 核心类型
//!
//! - [`Diagnostic`] - 诊断信息主体
//! - [`DiagnosticLevel`] - 诊断级别（Error/Warning/Note）
//! - [`DiagnosticSink`] - 诊断收集器
//! - [`Emitter`] - 诊断输出器（纯文本、彩色、或基于 ariadne 的源码片段）
//! - [`Span`] - 源码位置信息
//!
//! # 示例
//!
//! ```rust
//! use nilo_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
//!
//! let source = "a?.b = 1";
//! let mut sink = DiagnosticSink::new();
//!
//! sink.add(
//!     Diagnostic::error("cannot assign to a short-circuiting access")
//!         .span(0..4)
//!         .label("assignment target ends in '?.'")
//!         .suggest("use a plain '.' for the last access"),
//! );
//!
//! if sink.has_errors() {
//!     let emitter = Emitter::without_colors();
//!     let rendered = emitter.render_with_source(&sink.diagnostics()[0], source);
//!     assert!(rendered.contains("short-circuiting"));
//! }
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod level;
pub mod sink;
pub mod span;

// 重新导出核心类型
pub use diagnostic::{Diagnostic, Suggestion};
pub use emitter::Emitter;
pub use level::DiagnosticLevel;
pub use sink::DiagnosticSink;
pub use span::{Span, SpanExt};
