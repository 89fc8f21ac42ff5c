//! Import/export collection over an oxc AST
//!
//! The visitor dispatches on statement and declaration kind. Static imports,
//! re-exports and export declarations are only legal at the top level, while
//! `require()` and `import()` calls are picked up wherever the walk reaches:
//! nested blocks, function and arrow bodies, class members, and the common
//! expression forms that wrap a call.

use crate::models::file_record::{ExportedSymbol, ImportedModule, ModuleSyntax, SymbolKind};
use oxc_ast::ast::*;
use oxc_span::Span;

pub struct ModuleVisitor {
    line_starts: Vec<u32>,
    imports: Vec<ImportedModule>,
    exports: Vec<ExportedSymbol>,
}

impl ModuleVisitor {
    /// Collect the imports and exports of a parsed program
    pub fn collect(program: &Program<'_>, source_text: &str) -> ModuleSyntax {
        let mut visitor = Self {
            line_starts: line_starts(source_text),
            imports: Vec::new(),
            exports: Vec::new(),
        };

        for stmt in &program.body {
            visitor.visit_statement(stmt);
        }

        ModuleSyntax {
            imports: visitor.imports,
            exports: visitor.exports,
        }
    }

    fn line_of(&self, span: Span) -> usize {
        self.line_starts.partition_point(|&start| start <= span.start)
    }

    fn visit_statement(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::ImportDeclaration(decl) => self.visit_import_declaration(decl),
            Statement::ExportNamedDeclaration(decl) => self.visit_export_named_declaration(decl),
            Statement::ExportDefaultDeclaration(decl) => {
                self.visit_export_default_declaration(decl)
            }
            Statement::ExportAllDeclaration(decl) => self.visit_export_all_declaration(decl),
            Statement::ExpressionStatement(expr_stmt) => {
                self.visit_expression(&expr_stmt.expression)
            }
            Statement::VariableDeclaration(var_decl) => self.visit_variable_declaration(var_decl),
            Statement::FunctionDeclaration(func) => self.visit_function(func),
            Statement::ClassDeclaration(class) => self.visit_class(class),
            Statement::BlockStatement(block) => self.visit_statements(&block.body),
            Statement::IfStatement(if_stmt) => {
                self.visit_expression(&if_stmt.test);
                self.visit_statement(&if_stmt.consequent);
                if let Some(alternate) = &if_stmt.alternate {
                    self.visit_statement(alternate);
                }
            }
            Statement::ReturnStatement(ret) => {
                if let Some(argument) = &ret.argument {
                    self.visit_expression(argument);
                }
            }
            Statement::TryStatement(try_stmt) => {
                self.visit_statements(&try_stmt.block.body);
                if let Some(handler) = &try_stmt.handler {
                    self.visit_statements(&handler.body.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_statements(&finalizer.body);
                }
            }
            Statement::ForStatement(for_stmt) => self.visit_statement(&for_stmt.body),
            Statement::ForOfStatement(for_of) => {
                self.visit_expression(&for_of.right);
                self.visit_statement(&for_of.body);
            }
            Statement::ForInStatement(for_in) => self.visit_statement(&for_in.body),
            Statement::WhileStatement(while_stmt) => self.visit_statement(&while_stmt.body),
            Statement::DoWhileStatement(do_while) => self.visit_statement(&do_while.body),
            Statement::SwitchStatement(switch) => {
                for case in &switch.cases {
                    self.visit_statements(&case.consequent);
                }
            }
            _ => {}
        }
    }

    fn visit_statements(&mut self, stmts: &[Statement<'_>]) {
        for stmt in stmts {
            self.visit_statement(stmt);
        }
    }

    fn visit_variable_declaration(&mut self, var_decl: &VariableDeclaration<'_>) {
        for declarator in &var_decl.declarations {
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    fn visit_function(&mut self, func: &Function<'_>) {
        if let Some(body) = &func.body {
            self.visit_statements(&body.statements);
        }
    }

    fn visit_class(&mut self, class: &Class<'_>) {
        for element in &class.body.body {
            match element {
                ClassElement::MethodDefinition(method) => self.visit_function(&method.value),
                ClassElement::PropertyDefinition(prop) => {
                    if let Some(value) = &prop.value {
                        self.visit_expression(value);
                    }
                }
                ClassElement::StaticBlock(block) => self.visit_statements(&block.body),
                _ => {}
            }
        }
    }

    fn visit_expression(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::CallExpression(call) => self.visit_call_expression(call),
            Expression::ImportExpression(import_expr) => {
                if let Expression::StringLiteral(lit) = &import_expr.source {
                    let mut module = ImportedModule::side_effect(
                        lit.value.as_str(),
                        self.line_of(import_expr.span),
                    );
                    module.is_dynamic = true;
                    self.imports.push(module);
                }
            }
            Expression::AwaitExpression(await_expr) => self.visit_expression(&await_expr.argument),
            Expression::ParenthesizedExpression(paren) => self.visit_expression(&paren.expression),
            Expression::ArrowFunctionExpression(arrow) => {
                self.visit_statements(&arrow.body.statements)
            }
            Expression::FunctionExpression(func) => self.visit_function(func),
            Expression::ClassExpression(class) => self.visit_class(class),
            Expression::StaticMemberExpression(member) => self.visit_expression(&member.object),
            Expression::ComputedMemberExpression(member) => self.visit_expression(&member.object),
            Expression::ConditionalExpression(cond) => {
                self.visit_expression(&cond.test);
                self.visit_expression(&cond.consequent);
                self.visit_expression(&cond.alternate);
            }
            Expression::LogicalExpression(logical) => {
                self.visit_expression(&logical.left);
                self.visit_expression(&logical.right);
            }
            Expression::SequenceExpression(seq) => {
                for inner in &seq.expressions {
                    self.visit_expression(inner);
                }
            }
            Expression::AssignmentExpression(assign) => self.visit_expression(&assign.right),
            Expression::ObjectExpression(object) => {
                for property in &object.properties {
                    if let ObjectPropertyKind::ObjectProperty(prop) = property {
                        self.visit_expression(&prop.value);
                    }
                }
            }
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    if let Some(inner) = element.as_expression() {
                        self.visit_expression(inner);
                    }
                }
            }
            Expression::NewExpression(new_expr) => {
                for argument in &new_expr.arguments {
                    if let Some(inner) = argument.as_expression() {
                        self.visit_expression(inner);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'_>) {
        if let Expression::Identifier(ident) = &call.callee {
            if ident.name == "require" {
                if let Some(Argument::StringLiteral(lit)) = call.arguments.first() {
                    self.imports.push(ImportedModule::side_effect(
                        lit.value.as_str(),
                        self.line_of(call.span),
                    ));
                }
            }
        }

        self.visit_expression(&call.callee);
        for argument in &call.arguments {
            if let Some(inner) = argument.as_expression() {
                self.visit_expression(inner);
            }
        }
    }
}

impl ModuleVisitor {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'_>) {
        let mut module = ImportedModule::side_effect(decl.source.value.as_str(), self.line_of(decl.span));
        module.is_type_only = decl.import_kind.is_type();

        if let Some(specifiers) = &decl.specifiers {
            for specifier in specifiers {
                match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                        module.bound_names.push(spec.local.name.to_string());
                    }
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                        module.bound_names.push(spec.local.name.to_string());
                        module.is_default_binding = true;
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                        module.bound_names.push(spec.local.name.to_string());
                        module.is_namespace_binding = true;
                    }
                }
            }
        }

        self.imports.push(module);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'_>) {
        let line = self.line_of(decl.span);

        for specifier in &decl.specifiers {
            let name = specifier.exported.name().to_string();
            self.exports.push(ExportedSymbol {
                is_default: name == "default",
                name,
                kind: SymbolKind::Unknown,
                line,
            });
        }

        if let Some(source) = &decl.source {
            let mut module = ImportedModule::side_effect(source.value.as_str(), line);
            module.is_type_only = decl.export_kind.is_type();
            self.imports.push(module);
        }

        if let Some(declaration) = &decl.declaration {
            self.visit_exported_declaration(declaration, line);
        }
    }

    fn visit_exported_declaration(&mut self, declaration: &Declaration<'_>, line: usize) {
        match declaration {
            Declaration::VariableDeclaration(var_decl) => {
                for declarator in &var_decl.declarations {
                    if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                        self.push_export(id.name.as_str(), SymbolKind::Variable, line);
                    }
                }
                self.visit_variable_declaration(var_decl);
            }
            Declaration::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    self.push_export(id.name.as_str(), SymbolKind::Function, line);
                }
                self.visit_function(func);
            }
            Declaration::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    self.push_export(id.name.as_str(), SymbolKind::Class, line);
                }
                self.visit_class(class);
            }
            Declaration::TSInterfaceDeclaration(iface) => {
                self.push_export(iface.id.name.as_str(), SymbolKind::Interface, line);
            }
            Declaration::TSTypeAliasDeclaration(alias) => {
                self.push_export(alias.id.name.as_str(), SymbolKind::Type, line);
            }
            Declaration::TSEnumDeclaration(enum_decl) => {
                self.push_export(enum_decl.id.name.as_str(), SymbolKind::Enum, line);
            }
            _ => {}
        }
    }

    fn push_export(&mut self, name: &str, kind: SymbolKind, line: usize) {
        self.exports.push(ExportedSymbol {
            name: name.to_string(),
            kind,
            is_default: false,
            line,
        });
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'_>) {
        let kind = match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                self.visit_function(func);
                SymbolKind::Function
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                self.visit_class(class);
                SymbolKind::Class
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => SymbolKind::Interface,
            other => {
                if let Some(expr) = other.as_expression() {
                    self.visit_expression(expr);
                }
                SymbolKind::Variable
            }
        };

        self.exports.push(ExportedSymbol {
            name: "default".to_string(),
            kind,
            is_default: true,
            line: self.line_of(decl.span),
        });
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'_>) {
        let line = self.line_of(decl.span);

        if let Some(exported) = &decl.exported {
            self.push_export(exported.name().as_str(), SymbolKind::Unknown, line);
        }

        let mut module = ImportedModule::side_effect(decl.source.value.as_str(), line);
        module.is_type_only = decl.export_kind.is_type();
        self.imports.push(module);
    }
}

/// Byte offsets at which each line starts
fn line_starts(source_text: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (idx, byte) in source_text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx as u32 + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_starts() {
        assert_eq!(line_starts("a\nbc\n"), vec![0, 2, 5]);
        assert_eq!(line_starts(""), vec![0]);
    }
}
