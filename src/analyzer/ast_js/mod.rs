//! JavaScript/TypeScript syntax extraction using the OXC AST parser.
//!
//! Recognizes:
//! - Static imports: default, namespace, named, aliased, type-only
//! - Dynamic imports: `import('./module')`
//! - Lazy-loading calls: `lazy(() => import('./module'))`
//! - Default and named exports, including re-exported specifiers
//! - A `"use server"` directive at the top of the file
//!
//! # Module Structure
//!
//! - `visitor`: the collecting visitor and shared helpers
//! - `imports`: import declaration handling
//! - `exports`: export declaration handling
//! - `calls`: dynamic-import and lazy-call handling

mod calls;
mod exports;
mod imports;
mod visitor;

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::types::{ExportInfo, ImportInfo};

use visitor::SyntaxVisitor;

/// Everything the extractor pulls from one file.
#[derive(Clone, Debug, Default)]
pub struct FileSyntax {
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<ExportInfo>,
    pub has_server_directive: bool,
}

/// Parse one file and extract its imports and exports.
///
/// Returns `None` when the parser gives up entirely (panicked). OXC is
/// error-tolerant, so recoverable syntax errors still yield a usable
/// program; only an irrecoverable parse skips the file. This is the one
/// non-fatal failure the rest of the engine depends on: a malformed file
/// becomes "no node", never an aborted run.
pub fn extract_syntax(content: &str, path: &Path) -> Option<FileSyntax> {
    let allocator = Allocator::default();

    // Only enable JSX for .tsx/.jsx files to avoid conflicts with
    // TypeScript generics (`const fn = <T>(...) =>` parses as a JSX tag
    // with JSX enabled).
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let is_jsx_file = ext == "tsx" || ext == "jsx";

    let source_type = SourceType::from_path(path)
        .unwrap_or_default()
        .with_typescript(true)
        .with_jsx(is_jsx_file);

    let ret = Parser::new(&allocator, content, source_type).parse();
    if ret.panicked {
        return None;
    }

    let mut visitor = SyntaxVisitor::default();
    visitor.visit_program(&ret.program);

    let mut syntax = visitor.into_syntax();
    syntax.has_server_directive = has_server_directive(content);
    Some(syntax)
}

/// A `"use server"` directive must be the first statement of the file;
/// checking the leading text is enough and sidesteps directive
/// representation differences across parser versions.
fn has_server_directive(content: &str) -> bool {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        return trimmed.starts_with("\"use server\"") || trimmed.starts_with("'use server'");
    }
    false
}
