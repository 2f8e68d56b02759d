//! Type checking of method bodies.
use crate::hir;
use crate::state::State;
use location::Span;
use std::path::PathBuf;
use types::check::TypeChecker;
use types::format::format_type;
use types::instantiate::{instantiate, InstantiationError};
use types::{FunctionTypeId, MethodId, TypeRef, CALL_METHOD};

/// A pass that type checks all method bodies in a module.
pub struct CheckBodies;

impl CheckBodies {
    pub fn run_all(state: &mut State, module: &mut hir::Module) {
        for method in module.methods.iter_mut() {
            CheckMethodBody::new(state, module.file.clone(), method.id)
                .run(method);
        }
    }
}

/// A type that checks a single method body against the method's signature.
///
/// The surrounding declaration's type parameters stay in scope throughout:
/// type arguments written in the body may reference them, which is all it
/// takes to express polymorphic recursion. A recursive call instantiates the
/// full generic signature of the callee, never a specialized copy, so it's
/// free to pick different type arguments than the frame it occurs in.
pub struct CheckMethodBody<'a> {
    state: &'a mut State,
    file: PathBuf,
    method: MethodId,
}

impl<'a> CheckMethodBody<'a> {
    pub fn new(
        state: &'a mut State,
        file: PathBuf,
        method: MethodId,
    ) -> Self {
        Self { state, file, method }
    }

    pub fn run(mut self, method: &mut hir::Method) {
        let returns = self.method.return_type(&self.state.db);
        let typ = self.expression(&mut method.body);

        if !TypeChecker::check(&mut self.state.db, typ, returns) {
            self.type_error(typ, returns, method.body.location());
        }
    }

    fn expression(&mut self, node: &mut hir::Expression) -> TypeRef {
        match node {
            hir::Expression::Int(n) => {
                n.resolved_type = TypeRef::int();
                n.resolved_type
            }
            hir::Expression::Float(n) => {
                n.resolved_type = TypeRef::float();
                n.resolved_type
            }
            hir::Expression::String(n) => {
                n.resolved_type = TypeRef::string();
                n.resolved_type
            }
            hir::Expression::Bool(n) => {
                n.resolved_type = TypeRef::boolean();
                n.resolved_type
            }
            hir::Expression::Null(n) => {
                n.resolved_type = TypeRef::null();
                n.resolved_type
            }
            hir::Expression::Argument(n) => {
                n.resolved_type = self.argument_type(n.index);
                n.resolved_type
            }
            hir::Expression::SelfObject(n) => {
                n.resolved_type = self.self_type(n.location);
                n.resolved_type
            }
            hir::Expression::Field(n) => {
                // Name resolution only resolves fields against the
                // surrounding instance method's receiver, so the receiver
                // check is the same as for `self`.
                n.resolved_type = match self.self_type(n.location) {
                    TypeRef::Error => TypeRef::Error,
                    _ => n.field.value_type(&self.state.db),
                };
                n.resolved_type
            }
            hir::Expression::Call(n) => self.call(n),
            hir::Expression::MethodRef(n) => self.method_ref(n),
            hir::Expression::CallValue(n) => self.call_value(n),
            hir::Expression::New(n) => self.new_instance(n),
        }
    }

    fn call(&mut self, node: &mut hir::Call) -> TypeRef {
        self.check_receiver(
            node.receiver.as_mut(),
            node.method,
            node.location,
        );

        let result =
            instantiate(&mut self.state.db, node.method, &node.type_arguments);

        self.report_instantiation_errors(&result.errors, node.location);
        self.check_call_arguments(
            result.function_type,
            &mut node.arguments,
            node.location,
        );

        node.resolved_type = result.function_type.return_type(&self.state.db);
        node.resolved_type
    }

    fn method_ref(&mut self, node: &mut hir::MethodRef) -> TypeRef {
        self.check_receiver(
            node.receiver.as_mut(),
            node.method,
            node.location,
        );

        let result =
            instantiate(&mut self.state.db, node.method, &node.type_arguments);

        self.report_instantiation_errors(&result.errors, node.location);

        node.resolved_type = TypeRef::Function(result.function_type);
        node.resolved_type
    }

    fn call_value(&mut self, node: &mut hir::CallValue) -> TypeRef {
        let callee = self.expression(&mut node.callee);
        let typ = match callee {
            TypeRef::Function(id) => {
                self.check_call_arguments(id, &mut node.arguments, node.location);
                id.return_type(&self.state.db)
            }
            TypeRef::Dynamic | TypeRef::Error => {
                // The arguments are still checked so their nodes get typed,
                // but against nothing.
                for expr in node.arguments.iter_mut() {
                    self.expression(expr);
                }

                callee
            }
            TypeRef::Named(class) => {
                let method = match class.method(&self.state.db, CALL_METHOD) {
                    Some(id) if id.is_instance_method(&self.state.db) => id,
                    _ => return self.not_callable(callee, node),
                };

                // Calling the object goes through an implicit instantiation
                // of its `call` method, warnings and all.
                let result = instantiate(&mut self.state.db, method, &[]);

                self.report_instantiation_errors(&result.errors, node.location);
                self.check_call_arguments(
                    result.function_type,
                    &mut node.arguments,
                    node.location,
                );
                result.function_type.return_type(&self.state.db)
            }
            _ => return self.not_callable(callee, node),
        };

        node.resolved_type = typ;
        node.resolved_type
    }

    fn new_instance(&mut self, node: &mut hir::NewInstance) -> TypeRef {
        let fields = node.class.fields(&self.state.db);

        if node.arguments.len() != fields.len() {
            self.state.diagnostics.incorrect_number_of_arguments(
                node.arguments.len(),
                fields.len().to_string(),
                self.file.clone(),
                node.location,
            );
        }

        for (expr, field) in node.arguments.iter_mut().zip(fields) {
            let expected = field.value_type(&self.state.db);
            let found = self.expression(expr);

            if !TypeChecker::check(&mut self.state.db, found, expected) {
                self.type_error(found, expected, expr.location());
            }
        }

        node.resolved_type = TypeRef::Named(node.class);
        node.resolved_type
    }

    fn check_receiver(
        &mut self,
        receiver: Option<&mut hir::Expression>,
        method: MethodId,
        location: Span,
    ) {
        let expected = method.receiver(&self.state.db);

        match (receiver, expected) {
            (Some(expr), Some(class)) => {
                let found = self.expression(expr);
                let wanted = TypeRef::Named(class);

                if !TypeChecker::check(&mut self.state.db, found, wanted) {
                    self.type_error(found, wanted, expr.location());
                }
            }
            (Some(expr), None) => {
                // Function declarations don't take receivers; the resolver
                // shouldn't produce this, but we type the expression anyway.
                self.expression(expr);
            }
            (None, Some(_)) => {
                // An instance method called without an explicit receiver is
                // a call on `self`.
                self.self_type(location);
            }
            (None, None) => {}
        }
    }

    fn check_call_arguments(
        &mut self,
        function: FunctionTypeId,
        arguments: &mut [hir::Expression],
        location: Span,
    ) {
        let db = &self.state.db;
        let required = function.number_of_arguments(db);
        let expected: Vec<_> = function
            .arguments(db)
            .into_iter()
            .chain(function.optional_arguments(db))
            .chain(function.named_arguments(db))
            .map(|arg| arg.value_type)
            .collect();

        if arguments.len() < required || arguments.len() > expected.len() {
            let range = if required == expected.len() {
                required.to_string()
            } else {
                format!("between {} and {}", required, expected.len())
            };

            self.state.diagnostics.incorrect_number_of_arguments(
                arguments.len(),
                range,
                self.file.clone(),
                location,
            );
        }

        for (index, expr) in arguments.iter_mut().enumerate() {
            let found = self.expression(expr);

            // Surplus arguments are still typed so their nodes don't stay
            // unresolved; there's just nothing to check them against.
            let expected = match expected.get(index) {
                Some(&typ) => typ,
                None => continue,
            };

            if !TypeChecker::check(&mut self.state.db, found, expected) {
                self.type_error(found, expected, expr.location());
            }
        }
    }

    fn report_instantiation_errors(
        &mut self,
        errors: &[InstantiationError],
        location: Span,
    ) {
        for error in errors {
            match *error {
                InstantiationError::ArityMismatch { expected, supplied } => {
                    self.state.diagnostics.arity_mismatch(
                        expected,
                        supplied,
                        self.file.clone(),
                        location,
                    );
                }
                InstantiationError::BoundViolation { parameter, argument } => {
                    let argument = format_type(&self.state.db, argument);
                    let bound = format_type(
                        &self.state.db,
                        parameter.bound(&self.state.db),
                    );

                    self.state.diagnostics.bound_violation(
                        argument,
                        bound,
                        self.file.clone(),
                        location,
                    );
                }
            }
        }
    }

    fn argument_type(&mut self, index: usize) -> TypeRef {
        let db = &self.state.db;

        self.method
            .arguments(db)
            .into_iter()
            .chain(self.method.optional_arguments(db))
            .chain(self.method.named_arguments(db))
            .nth(index)
            .map_or(TypeRef::Error, |arg| arg.value_type)
    }

    fn self_type(&mut self, location: Span) -> TypeRef {
        match self.method.receiver(&self.state.db) {
            Some(class) if self.method.is_instance_method(&self.state.db) => {
                TypeRef::Named(class)
            }
            _ => {
                self.state.diagnostics.self_outside_instance_method(
                    self.file.clone(),
                    location,
                );
                TypeRef::Error
            }
        }
    }

    fn not_callable(
        &mut self,
        callee: TypeRef,
        node: &mut hir::CallValue,
    ) -> TypeRef {
        let name = format_type(&self.state.db, callee);

        self.state.diagnostics.not_callable(
            name,
            self.file.clone(),
            node.location,
        );

        node.resolved_type = TypeRef::Error;
        node.resolved_type
    }

    fn type_error(&mut self, found: TypeRef, expected: TypeRef, location: Span) {
        let found = format_type(&self.state.db, found);
        let expected = format_type(&self.state.db, expected);

        self.state.diagnostics.type_error(
            found,
            expected,
            self.file.clone(),
            location,
        );
    }
}
