//! The collecting visitor and shared helpers for AST traversal.

use std::collections::HashSet;

use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};

use super::FileSyntax;

/// Walks one parsed program and collects imports/exports into `syntax`.
#[derive(Default)]
pub(super) struct SyntaxVisitor {
    pub syntax: FileSyntax,
    /// Specifiers seen inside a `lazy(() => import(...))` argument; when
    /// the walk reaches the inner import expression, it is tagged lazy.
    pub lazy_sources: HashSet<String>,
}

impl SyntaxVisitor {
    pub(super) fn into_syntax(self) -> FileSyntax {
        self.syntax
    }

    pub(super) fn module_export_name(name: &ModuleExportName<'_>) -> String {
        match name {
            ModuleExportName::IdentifierName(id) => id.name.to_string(),
            ModuleExportName::IdentifierReference(id) => id.name.to_string(),
            ModuleExportName::StringLiteral(s) => s.value.to_string(),
        }
    }
}

impl<'a> Visit<'a> for SyntaxVisitor {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        self.handle_import_declaration(decl);
        walk::walk_import_declaration(self, decl);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        self.handle_export_named_declaration(decl);
        // Keep walking: exported function bodies may contain dynamic imports.
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        self.handle_export_default_declaration(decl);
        walk::walk_export_default_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.handle_export_all_declaration(decl);
        walk::walk_export_all_declaration(self, decl);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        self.handle_import_expression(expr);
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        // Mark lazy sources before walking the arguments so the inner
        // import expression sees the flag.
        self.mark_lazy_sources(call);
        walk::walk_call_expression(self, call);
    }
}
