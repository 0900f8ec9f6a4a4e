//! This crate provides an [ASCII renderer] for printing formatted [diagnostics]
//! like error messages and warnings on some source code.
//!
//! These diagnostics contain annotations that are shown directly on the lines
//! in the source they refer to, as well as notes shown after the source.
//!
//! # Example
//! ```
//! use codeframe::diagnostic::{Annotation, AnnotationStyle, Diagnostic, Severity};
//! use codeframe::file::SimpleFile;
//! use codeframe::render::{DiagnosticRenderer, RenderConfig};
//! use codeframe::render::color::DisabledColorConfig;
//! use termcolor::Buffer;
//!
//! let file = SimpleFile::new("example.lang", "const main = 23;");
//! let diagnostic = Diagnostic::error()
//!     .with_name("example/expect")
//!     .with_message("Example diagnostic message")
//!     .with_annotation(Annotation::new(AnnotationStyle::Primary, (), 6..10)
//!         .with_label("expected something here"));
//!
//! let mut buf = Buffer::no_color();
//! let mut renderer = DiagnosticRenderer::new(&mut buf, DisabledColorConfig,
//!     file, RenderConfig::default());
//! renderer.render(vec![diagnostic]).unwrap();
//! ```
//!
//! [ASCII renderer]: render::DiagnosticRenderer
//! [diagnostics]: diagnostic::Diagnostic

pub mod file;
pub mod diagnostic;
pub mod render;
