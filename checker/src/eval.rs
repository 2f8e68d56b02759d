//! Evaluating method bodies.
//!
//! The evaluator is a small tree-walker over `hir` bodies. Instantiation is
//! where the execution mode matters: in checked mode a type argument outside
//! its parameter's bound aborts with a `RuntimeError` at the instantiation
//! point (a call or a closurization), while unchecked mode carries on with
//! the exact same substitution.
use crate::config::ExecutionMode;
use crate::hir;
use crate::state::State;
use fnv::FnvHashMap;
use std::rc::Rc;
use types::format::format_type;
use types::instantiate::{instantiate, Instantiation, InstantiationError};
use types::resolve::TypeResolver;
use types::{
    ClassId, Database, MethodId, TypeArguments, TypeRef, CALL_METHOD,
};

/// An error raised while evaluating a program.
///
/// Most of these can only occur when values flow through `dynamic`, as the
/// static checks catch them everywhere else.
#[derive(Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// A type argument fell outside its parameter's bound, in checked mode.
    BoundViolation(String),

    /// A member (argument, field, `self`, or method body) wasn't defined.
    UndefinedMember(String),

    /// A value that isn't a closure or callable object was called.
    NotCallable(String),
    WrongNumberOfArguments { expected: usize, supplied: usize },
}

/// The identity of an instance on the evaluator's heap.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct InstanceId(pub usize);

/// An instance of a class, with one value per field in definition order.
pub struct Instance {
    pub class: ClassId,
    pub fields: Vec<Value>,
}

/// A method closurized together with its receiver and type arguments.
///
/// Equality is structural: closurizing the same declaration on the same
/// receiver with equal type arguments yields equal closures, no matter how
/// many times it happens. There's deliberately no closure identity beyond
/// these three fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub method: MethodId,
    pub receiver: Option<InstanceId>,

    /// The captured type arguments, in declaration order.
    ///
    /// Always exactly one entry per type parameter of the method, since
    /// closurization goes through arity recovery like any instantiation.
    pub type_arguments: Vec<TypeRef>,
}

impl Closure {
    /// Returns true if both closures would behave identically.
    ///
    /// The derived `PartialEq` compares function-typed arguments by database
    /// id; this comparison looks through the ids and compares them
    /// structurally.
    pub fn same_as(&self, db: &Database, other: &Closure) -> bool {
        self.method == other.method
            && self.receiver == other.receiver
            && self.type_arguments.len() == other.type_arguments.len()
            && self
                .type_arguments
                .iter()
                .zip(other.type_arguments.iter())
                .all(|(&ours, &theirs)| ours.equals(db, theirs))
    }
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    Instance(InstanceId),
    Closure(Closure),
}

/// A single call frame.
struct Frame {
    receiver: Option<InstanceId>,
    arguments: Vec<Value>,

    /// The type arguments the frame's method was instantiated with.
    ///
    /// Type arguments written in the body are resolved through this mapping,
    /// which is what binds a captured or forwarded type parameter lexically.
    type_arguments: TypeArguments,
}

/// The evaluator for method bodies.
pub struct Evaluator<'a> {
    state: &'a mut State,
    bodies: FnvHashMap<MethodId, Rc<hir::Expression>>,
    instances: Vec<Instance>,
}

impl<'a> Evaluator<'a> {
    pub fn new(state: &'a mut State) -> Self {
        Self { state, bodies: FnvHashMap::default(), instances: Vec::new() }
    }

    /// Registers the bodies of a module's methods, consuming the module.
    pub fn register(&mut self, module: hir::Module) {
        for method in module.methods {
            self.bodies.insert(method.id, Rc::new(method.body));
        }
    }

    pub fn allocate(
        &mut self,
        class: ClassId,
        fields: Vec<Value>,
    ) -> InstanceId {
        let id = InstanceId(self.instances.len());

        self.instances.push(Instance { class, fields });
        id
    }

    pub fn instance(&self, id: InstanceId) -> &Instance {
        &self.instances[id.0]
    }

    /// Calls a method with the given type arguments and value arguments.
    pub fn call(
        &mut self,
        method: MethodId,
        type_arguments: &[TypeRef],
        receiver: Option<InstanceId>,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let result = self.instantiate(method, type_arguments)?;

        self.invoke(method, receiver, result.mapping, arguments)
    }

    /// Calls a closure with the given value arguments.
    ///
    /// The captured type arguments are rebound to the method's type
    /// parameters, so type arguments written in the body resolve to whatever
    /// the closurization captured.
    pub fn call_closure(
        &mut self,
        closure: &Closure,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let parameters = closure.method.type_parameters(&self.state.db);
        let mut mapping = TypeArguments::new();

        for (&param, &arg) in
            parameters.iter().zip(closure.type_arguments.iter())
        {
            mapping.assign(param, arg);
        }

        self.invoke(closure.method, closure.receiver, mapping, arguments)
    }

    fn instantiate(
        &mut self,
        method: MethodId,
        type_arguments: &[TypeRef],
    ) -> Result<Instantiation, RuntimeError> {
        let result = instantiate(&mut self.state.db, method, type_arguments);

        if self.state.config.mode == ExecutionMode::Checked {
            for error in &result.errors {
                let (parameter, argument) = match *error {
                    InstantiationError::BoundViolation {
                        parameter,
                        argument,
                    } => (parameter, argument),

                    // Arity recovery already happened inside instantiate();
                    // it's not an execution error in either mode.
                    InstantiationError::ArityMismatch { .. } => continue,
                };

                let db = &self.state.db;

                return Err(RuntimeError::BoundViolation(format!(
                    "can't instantiate '{}': the type argument '{}' falls \
                    outside the bound '{}'",
                    method.name(db),
                    format_type(db, argument),
                    format_type(db, parameter.bound(db)),
                )));
            }
        }

        Ok(result)
    }

    fn invoke(
        &mut self,
        method: MethodId,
        receiver: Option<InstanceId>,
        type_arguments: TypeArguments,
        mut arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let db = &self.state.db;
        let required = method.number_of_arguments(db);
        let total = required
            + method.optional_arguments(db).len()
            + method.named_arguments(db).len();

        if arguments.len() < required || arguments.len() > total {
            return Err(RuntimeError::WrongNumberOfArguments {
                expected: required,
                supplied: arguments.len(),
            });
        }

        // Optional and named arguments that weren't supplied are null.
        arguments.resize(total, Value::Null);

        let body = match self.bodies.get(&method) {
            Some(body) => body.clone(),
            None => {
                return Err(RuntimeError::UndefinedMember(format!(
                    "the method '{}' doesn't have a body",
                    method.name(&self.state.db)
                )));
            }
        };
        let frame = Frame { receiver, arguments, type_arguments };

        self.expression(&body, &frame)
    }

    fn expression(
        &mut self,
        node: &hir::Expression,
        frame: &Frame,
    ) -> Result<Value, RuntimeError> {
        match node {
            hir::Expression::Int(n) => Ok(Value::Int(n.value)),
            hir::Expression::Float(n) => Ok(Value::Float(n.value)),
            hir::Expression::String(n) => Ok(Value::String(n.value.clone())),
            hir::Expression::Bool(n) => Ok(Value::Bool(n.value)),
            hir::Expression::Null(_) => Ok(Value::Null),
            hir::Expression::Argument(n) => frame
                .arguments
                .get(n.index)
                .cloned()
                .ok_or_else(|| {
                    RuntimeError::UndefinedMember(format!(
                        "no argument at index {}",
                        n.index
                    ))
                }),
            hir::Expression::SelfObject(_) => frame
                .receiver
                .map(Value::Instance)
                .ok_or_else(undefined_self),
            hir::Expression::Field(n) => {
                let receiver = frame.receiver.ok_or_else(undefined_self)?;
                let class = self.instances[receiver.0].class;
                let index = class
                    .fields(&self.state.db)
                    .iter()
                    .position(|&field| field == n.field)
                    .ok_or_else(|| {
                        RuntimeError::UndefinedMember(format!(
                            "the field '{}' isn't defined for '{}'",
                            n.field.name(&self.state.db),
                            class.name(&self.state.db)
                        ))
                    })?;

                Ok(self.instances[receiver.0].fields[index].clone())
            }
            hir::Expression::Call(n) => self.call_node(n, frame),
            hir::Expression::MethodRef(n) => self.closurize(n, frame),
            hir::Expression::CallValue(n) => self.call_value(n, frame),
            hir::Expression::New(n) => {
                let mut fields = Vec::with_capacity(n.arguments.len());

                for expr in &n.arguments {
                    fields.push(self.expression(expr, frame)?);
                }

                let id = self.allocate(n.class, fields);

                Ok(Value::Instance(id))
            }
        }
    }

    fn call_node(
        &mut self,
        node: &hir::Call,
        frame: &Frame,
    ) -> Result<Value, RuntimeError> {
        let type_arguments =
            self.resolve_type_arguments(&node.type_arguments, frame);
        let result = self.instantiate(node.method, &type_arguments)?;
        let receiver = self.evaluate_receiver(
            node.receiver.as_ref(),
            node.method,
            frame,
        )?;
        let mut arguments = Vec::with_capacity(node.arguments.len());

        for expr in &node.arguments {
            arguments.push(self.expression(expr, frame)?);
        }

        self.invoke(node.method, receiver, result.mapping, arguments)
    }

    /// Closurizes a method reference into a closure value.
    ///
    /// Bound checking happens here, not when the closure is later called:
    /// the type arguments are captured once, and calling the closure reuses
    /// them without re-checking.
    fn closurize(
        &mut self,
        node: &hir::MethodRef,
        frame: &Frame,
    ) -> Result<Value, RuntimeError> {
        let type_arguments =
            self.resolve_type_arguments(&node.type_arguments, frame);
        let result = self.instantiate(node.method, &type_arguments)?;
        let receiver = self.evaluate_receiver(
            node.receiver.as_ref(),
            node.method,
            frame,
        )?;

        Ok(Value::Closure(Closure {
            method: node.method,
            receiver,
            type_arguments: result.arguments,
        }))
    }

    fn call_value(
        &mut self,
        node: &hir::CallValue,
        frame: &Frame,
    ) -> Result<Value, RuntimeError> {
        let callee = self.expression(&node.callee, frame)?;
        let mut arguments = Vec::with_capacity(node.arguments.len());

        for expr in &node.arguments {
            arguments.push(self.expression(expr, frame)?);
        }

        match callee {
            Value::Closure(closure) => self.call_closure(&closure, arguments),
            Value::Instance(id) => {
                let class = self.instances[id.0].class;
                let method = match class.method(&self.state.db, CALL_METHOD) {
                    Some(m) if m.is_instance_method(&self.state.db) => m,
                    _ => {
                        return Err(RuntimeError::NotCallable(
                            class.name(&self.state.db).clone(),
                        ));
                    }
                };

                // An object called as a function goes through an implicit
                // instantiation of its `call` method.
                let result = self.instantiate(method, &[])?;

                self.invoke(method, Some(id), result.mapping, arguments)
            }
            value => Err(RuntimeError::NotCallable(self.describe(&value))),
        }
    }

    fn evaluate_receiver(
        &mut self,
        receiver: Option<&hir::Expression>,
        method: MethodId,
        frame: &Frame,
    ) -> Result<Option<InstanceId>, RuntimeError> {
        let expr = match receiver {
            Some(expr) => expr,
            None => {
                // An instance method without an explicit receiver runs on
                // the current frame's receiver.
                return Ok(if method.receiver(&self.state.db).is_some() {
                    frame.receiver
                } else {
                    None
                });
            }
        };

        match self.expression(expr, frame)? {
            Value::Instance(id) => Ok(Some(id)),
            value => Err(RuntimeError::UndefinedMember(format!(
                "the method '{}' isn't defined for '{}'",
                method.name(&self.state.db),
                self.describe(&value)
            ))),
        }
    }

    fn resolve_type_arguments(
        &mut self,
        raw: &[TypeRef],
        frame: &Frame,
    ) -> Vec<TypeRef> {
        let mut resolver =
            TypeResolver::new(&mut self.state.db, &frame.type_arguments);

        raw.iter().map(|&typ| resolver.resolve(typ)).collect()
    }

    fn describe(&self, value: &Value) -> String {
        match value {
            Value::Int(_) => "Int".to_string(),
            Value::Float(_) => "Float".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::Null => "Null".to_string(),
            Value::Instance(id) => {
                self.instances[id.0].class.name(&self.state.db).clone()
            }
            Value::Closure(closure) => {
                format!("fn {}", closure.method.name(&self.state.db))
            }
        }
    }
}

fn undefined_self() -> RuntimeError {
    RuntimeError::UndefinedMember(
        "'self' isn't defined in this context".to_string(),
    )
}
