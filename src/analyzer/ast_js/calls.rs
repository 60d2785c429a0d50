//! Dynamic-import and lazy-call handling.
//!
//! Covers `import('./module')` call expressions and the lazy-loading
//! pattern `lazy(() => import('./module'))` (also `React.lazy`,
//! `dynamic(...)` from next/dynamic) whose single argument is an arrow
//! function returning a dynamic import.

use oxc_ast::ast::*;

use crate::types::{ImportInfo, ImportedName};

use super::visitor::SyntaxVisitor;

/// Callee names treated as lazy-loading wrappers.
const LAZY_CALLEES: [&str; 2] = ["lazy", "dynamic"];

impl SyntaxVisitor {
    /// `import('./module')` — one whole-module binding, dynamic (and lazy
    /// when it sits inside a lazy-wrapper argument).
    pub(super) fn handle_import_expression(&mut self, expr: &ImportExpression<'_>) {
        let Expression::StringLiteral(s) = &expr.source else {
            // Computed specifier: statically unresolvable, no entry, no edge.
            return;
        };
        let source = s.value.to_string();
        let mut entry = ImportInfo::new(source.clone());
        entry.names.push(ImportedName {
            name: "*".to_string(),
            alias: None,
            type_only: false,
        });
        entry.is_dynamic = true;
        entry.is_lazy = self.lazy_sources.contains(&source);
        self.syntax.imports.push(entry);
    }

    /// Record the dynamic-import specifiers found inside a lazy wrapper's
    /// arrow argument, before the walk descends into it.
    pub(super) fn mark_lazy_sources(&mut self, call: &CallExpression<'_>) {
        let callee_name = match &call.callee {
            Expression::Identifier(ident) => Some(ident.name.to_string()),
            Expression::StaticMemberExpression(member) => {
                Some(member.property.name.to_string())
            }
            _ => None,
        };
        let Some(name) = callee_name else { return };
        if !LAZY_CALLEES.contains(&name.as_str()) {
            return;
        }

        if let Some(Argument::ArrowFunctionExpression(arrow)) = call.arguments.first() {
            for stmt in &arrow.body.statements {
                let expr = match stmt {
                    Statement::ExpressionStatement(es) => Some(&es.expression),
                    Statement::ReturnStatement(rs) => rs.argument.as_ref(),
                    _ => None,
                };
                if let Some(Expression::ImportExpression(imp)) = expr {
                    if let Expression::StringLiteral(s) = &imp.source {
                        self.lazy_sources.insert(s.value.to_string());
                    }
                }
            }
        }
    }
}
