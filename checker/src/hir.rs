//! Opal's high-level intermediate representation.
//!
//! The external parser and name resolver hand over modules in this form:
//! every reference to a class, method, field or type parameter is already a
//! database id, and every call carries an explicit (possibly empty) list of
//! type arguments. The angle-bracket ambiguity is therefore settled long
//! before this crate sees the program.
use location::Span;
use std::path::PathBuf;
use types::{ClassId, FieldId, MethodId, TypeRef};

/// A compilation unit of declarations and their bodies.
pub struct Module {
    pub file: PathBuf,
    pub classes: Vec<ClassId>,
    pub methods: Vec<Method>,
}

/// The body of a function or method declaration.
///
/// The signature lives in the type database; this node only pairs the
/// declaration with its body expression.
pub struct Method {
    pub id: MethodId,
    pub body: Expression,
    pub location: Span,
}

pub struct IntLiteral {
    pub value: i64,
    pub resolved_type: TypeRef,
    pub location: Span,
}

pub struct FloatLiteral {
    pub value: f64,
    pub resolved_type: TypeRef,
    pub location: Span,
}

pub struct StringLiteral {
    pub value: String,
    pub resolved_type: TypeRef,
    pub location: Span,
}

pub struct BoolLiteral {
    pub value: bool,
    pub resolved_type: TypeRef,
    pub location: Span,
}

pub struct NullLiteral {
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// A reference to one of the surrounding declaration's value arguments.
///
/// The index counts across the required, optional and named argument lists
/// in declaration order.
pub struct ArgumentRef {
    pub index: usize,
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// A reference to the receiver of the surrounding instance method.
pub struct SelfObject {
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// A reference to a field of the surrounding instance method's receiver.
pub struct FieldRef {
    pub field: FieldId,
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// A direct call of a function or method declaration.
///
/// The type-argument list is what was written at the call site. An empty
/// list against a generic declaration is an implicit instantiation. The
/// arguments may mention type parameters of the surrounding declaration,
/// which is how polymorphic recursion is expressed.
pub struct Call {
    pub receiver: Option<Expression>,
    pub method: MethodId,
    pub type_arguments: Vec<TypeRef>,
    pub arguments: Vec<Expression>,
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// A reference to a function or method declaration without calling it.
///
/// This closurizes the declaration: at run time it produces a closure value
/// capturing the receiver (if any) and the supplied type arguments.
pub struct MethodRef {
    pub receiver: Option<Expression>,
    pub method: MethodId,
    pub type_arguments: Vec<TypeRef>,
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// A call of a function-typed value, such as a closure or an object with a
/// `call` method.
pub struct CallValue {
    pub callee: Expression,
    pub arguments: Vec<Expression>,
    pub resolved_type: TypeRef,
    pub location: Span,
}

/// Creating an instance of a class, with one value per field in definition
/// order.
pub struct NewInstance {
    pub class: ClassId,
    pub arguments: Vec<Expression>,
    pub resolved_type: TypeRef,
    pub location: Span,
}

pub enum Expression {
    Int(Box<IntLiteral>),
    Float(Box<FloatLiteral>),
    String(Box<StringLiteral>),
    Bool(Box<BoolLiteral>),
    Null(Box<NullLiteral>),
    Argument(Box<ArgumentRef>),
    SelfObject(Box<SelfObject>),
    Field(Box<FieldRef>),
    Call(Box<Call>),
    MethodRef(Box<MethodRef>),
    CallValue(Box<CallValue>),
    New(Box<NewInstance>),
}

impl Expression {
    pub fn location(&self) -> Span {
        match self {
            Expression::Int(n) => n.location,
            Expression::Float(n) => n.location,
            Expression::String(n) => n.location,
            Expression::Bool(n) => n.location,
            Expression::Null(n) => n.location,
            Expression::Argument(n) => n.location,
            Expression::SelfObject(n) => n.location,
            Expression::Field(n) => n.location,
            Expression::Call(n) => n.location,
            Expression::MethodRef(n) => n.location,
            Expression::CallValue(n) => n.location,
            Expression::New(n) => n.location,
        }
    }

    pub fn resolved_type(&self) -> TypeRef {
        match self {
            Expression::Int(n) => n.resolved_type,
            Expression::Float(n) => n.resolved_type,
            Expression::String(n) => n.resolved_type,
            Expression::Bool(n) => n.resolved_type,
            Expression::Null(n) => n.resolved_type,
            Expression::Argument(n) => n.resolved_type,
            Expression::SelfObject(n) => n.resolved_type,
            Expression::Field(n) => n.resolved_type,
            Expression::Call(n) => n.resolved_type,
            Expression::MethodRef(n) => n.resolved_type,
            Expression::CallValue(n) => n.resolved_type,
            Expression::New(n) => n.resolved_type,
        }
    }
}
