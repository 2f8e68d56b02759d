//! Type checking of declarations and their bodies.
//!
//! Checking happens in two passes: `VerifyDeclarations` validates the
//! signatures stored in the type database (structural well-formedness and
//! override compatibility), after which `expressions::CheckBodies` types the
//! bodies against those signatures.
pub mod expressions;

use crate::hir;
use crate::state::State;
use location::Span;
use std::path::PathBuf;
use types::check::TypeChecker;
use types::format::format_type;
use types::verify::is_well_formed;
use types::{ClassId, MethodId, TypeRef};

/// A pass that verifies the structure of all declarations in a module.
pub struct VerifyDeclarations<'a> {
    state: &'a mut State,
    file: PathBuf,
}

impl<'a> VerifyDeclarations<'a> {
    pub fn run_all(state: &'a mut State, module: &hir::Module) {
        let file = module.file.clone();
        let mut pass = VerifyDeclarations { state, file };

        for &class in &module.classes {
            pass.verify_class(class);
        }

        for method in &module.methods {
            pass.verify_method(method.id);
        }
    }

    fn verify_class(&mut self, class: ClassId) {
        for field in class.fields(&self.state.db) {
            let typ = field.value_type(&self.state.db);
            let location = field.location(&self.state.db);

            self.verify_type(typ, location);
        }

        self.verify_overrides(class);
    }

    /// Verifies that no generic function type occurs inside the method's
    /// signature.
    ///
    /// The method itself being generic is fine; that's the one position the
    /// language allows a quantifier in.
    fn verify_method(&mut self, method: MethodId) {
        let db = &self.state.db;
        let location = method.location(db);
        let mut types: Vec<_> = method
            .arguments(db)
            .into_iter()
            .chain(method.optional_arguments(db))
            .chain(method.named_arguments(db))
            .map(|arg| arg.value_type)
            .collect();

        types.push(method.return_type(db));

        for param in method.type_parameters(db) {
            types.push(param.bound(db));
        }

        for typ in types {
            self.verify_type(typ, location);
        }
    }

    fn verify_type(&mut self, typ: TypeRef, location: Span) {
        if is_well_formed(&self.state.db, typ) {
            return;
        }

        let name = format_type(&self.state.db, typ);

        self.state.diagnostics.malformed_type(
            name,
            self.file.clone(),
            location,
        );
    }

    fn verify_overrides(&mut self, class: ClassId) {
        let parent = match class.superclass(&self.state.db) {
            Some(id) => id,
            None => return,
        };

        for method in class.methods(&self.state.db) {
            if !method.is_instance_method(&self.state.db) {
                continue;
            }

            let name = method.name(&self.state.db).clone();
            let overridden = match parent.method(&self.state.db, &name) {
                Some(id) if id.is_instance_method(&self.state.db) => id,
                _ => continue,
            };

            let checker = TypeChecker::new(&mut self.state.db);

            if checker.check_override(method, overridden) {
                continue;
            }

            let class_name = class.name(&self.state.db).clone();
            let location = method.location(&self.state.db);

            self.state.diagnostics.invalid_override(
                &name,
                &class_name,
                self.file.clone(),
                location,
            );
        }
    }
}
