//! Export declaration handling.
//!
//! Covers named exports of declarations (`export const x`, `export
//! function f`, TS interfaces/types/enums), specifier exports
//! (`export { a as b }`), default exports, and re-exports — which also
//! register as imports so barrel files keep their targets reachable.

use oxc_ast::ast::*;

use crate::types::{ExportInfo, ExportKind, ImportInfo, ImportedName};

use super::visitor::SyntaxVisitor;

impl SyntaxVisitor {
    pub(super) fn handle_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'_>) {
        let whole_type_only = matches!(decl.export_kind, ImportOrExportKind::Type);

        if let Some(src) = &decl.source {
            // Re-export: `export { a, b as c } from './other'`.
            let mut entry = ImportInfo::new(src.value.to_string());
            for spec in &decl.specifiers {
                let local = Self::module_export_name(&spec.local);
                let exported = Self::module_export_name(&spec.exported);
                let alias = if exported != local {
                    Some(exported.clone())
                } else {
                    None
                };
                entry.names.push(ImportedName {
                    name: local,
                    alias,
                    type_only: whole_type_only,
                });
                self.syntax.exports.push(ExportInfo {
                    name: exported,
                    kind: ExportKind::Named,
                    type_only: whole_type_only,
                });
            }
            self.syntax.imports.push(entry);
            return;
        }

        if let Some(declaration) = &decl.declaration {
            match declaration {
                Declaration::VariableDeclaration(var) => {
                    for d in &var.declarations {
                        if let BindingPattern::BindingIdentifier(id) = &d.id {
                            self.syntax.exports.push(ExportInfo::named(id.name.as_str()));
                        }
                    }
                }
                Declaration::FunctionDeclaration(f) => {
                    if let Some(id) = &f.id {
                        self.syntax.exports.push(ExportInfo::named(id.name.as_str()));
                    }
                }
                Declaration::ClassDeclaration(c) => {
                    if let Some(id) = &c.id {
                        self.syntax.exports.push(ExportInfo::named(id.name.as_str()));
                    }
                }
                Declaration::TSInterfaceDeclaration(i) => {
                    self.syntax.exports.push(ExportInfo {
                        name: i.id.name.to_string(),
                        kind: ExportKind::Named,
                        type_only: true,
                    });
                }
                Declaration::TSTypeAliasDeclaration(t) => {
                    self.syntax.exports.push(ExportInfo {
                        name: t.id.name.to_string(),
                        kind: ExportKind::Named,
                        type_only: true,
                    });
                }
                Declaration::TSEnumDeclaration(e) => {
                    self.syntax.exports.push(ExportInfo::named(e.id.name.as_str()));
                }
                _ => {}
            }
        }

        // `export { foo, bar as baz };`
        for spec in &decl.specifiers {
            let exported = Self::module_export_name(&spec.exported);
            self.syntax.exports.push(ExportInfo {
                name: exported,
                kind: ExportKind::Named,
                type_only: whole_type_only,
            });
        }
    }

    /// Default exports are always recorded under the name `default` so
    /// they match `import X from './file'` on the consuming side.
    pub(super) fn handle_export_default_declaration(
        &mut self,
        _decl: &ExportDefaultDeclaration<'_>,
    ) {
        self.syntax.exports.push(ExportInfo::default_export());
    }

    /// `export * from './module'` — unknown names, so only the import
    /// side is recorded, as a whole-module binding.
    pub(super) fn handle_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'_>) {
        let mut entry = ImportInfo::new(decl.source.value.to_string());
        entry.names.push(ImportedName {
            name: "*".to_string(),
            alias: None,
            type_only: matches!(decl.export_kind, ImportOrExportKind::Type),
        });
        self.syntax.imports.push(entry);
    }
}
