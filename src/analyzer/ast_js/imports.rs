//! Import declaration handling.
//!
//! Covers static imports: `import X from './a'`, `import * as NS from
//! './b'`, `import { x, y as z } from './c'`, `import type { T } from
//! './d'`, and side-effect imports `import './styles.css'`.

use oxc_ast::ast::*;

use crate::types::{ImportInfo, ImportedName};

use super::visitor::SyntaxVisitor;

impl SyntaxVisitor {
    pub(super) fn handle_import_declaration(&mut self, decl: &ImportDeclaration<'_>) {
        let mut entry = ImportInfo::new(decl.source.value.to_string());
        let whole_type_only = matches!(decl.import_kind, ImportOrExportKind::Type);

        if let Some(specifiers) = &decl.specifiers {
            for spec in specifiers {
                match spec {
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                        // A default import binds the exporter's "default".
                        entry.names.push(ImportedName {
                            name: "default".to_string(),
                            alias: Some(s.local.name.to_string()),
                            type_only: whole_type_only,
                        });
                    }
                    ImportDeclarationSpecifier::ImportSpecifier(s) => {
                        let name = Self::module_export_name(&s.imported);
                        let alias = if s.local.name.as_str() != name {
                            Some(s.local.name.to_string())
                        } else {
                            None
                        };
                        let type_only = whole_type_only
                            || matches!(s.import_kind, ImportOrExportKind::Type);
                        entry.names.push(ImportedName {
                            name,
                            alias,
                            type_only,
                        });
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                        entry.names.push(ImportedName {
                            name: "*".to_string(),
                            alias: Some(s.local.name.to_string()),
                            type_only: whole_type_only,
                        });
                    }
                }
            }
        }
        // Side-effect imports carry no names; the edge still matters.
        self.syntax.imports.push(entry);
    }
}
