//! Structures for the various Opal types.
//!
//! Opal is a class-based, optionally-checked object language. This crate
//! contains its type database along with the pure parts of the generic-method
//! engine: subtyping (`check`), substitution (`resolve`), instantiation
//! (`instantiate`), structural well-formedness (`verify`), and type
//! formatting (`format`).
pub mod check;
pub mod format;
pub mod instantiate;
pub mod resolve;
pub mod verify;

use crate::resolve::TypeResolver;
use indexmap::IndexMap;
use location::Span;

// The IDs of the built-in classes, matching the order in which Database::new()
// defines them.
pub const OBJECT_ID: u32 = 0;
pub const NUM_ID: u32 = 1;
pub const INT_ID: u32 = 2;
pub const FLOAT_ID: u32 = 3;
pub const STRING_ID: u32 = 4;
pub const BOOLEAN_ID: u32 = 5;
pub const NULL_ID: u32 = 6;

pub const FIRST_USER_CLASS_ID: u32 = NULL_ID + 1;

const OBJECT_NAME: &str = "Object";
const NUM_NAME: &str = "Num";
const INT_NAME: &str = "Int";
const FLOAT_NAME: &str = "Float";
const STRING_NAME: &str = "String";
const BOOLEAN_NAME: &str = "Bool";
const NULL_NAME: &str = "Null";

/// The name of the method that makes instances of a class callable.
pub const CALL_METHOD: &str = "call";

/// A type parameter of a generic function or method.
///
/// Every declaration site gets its own `TypeParameter` rows, so the IDs are
/// globally unique. Substitution relies on this: mapping IDs to types can
/// never capture a parameter belonging to a different declaration.
#[derive(Clone)]
pub struct TypeParameter {
    /// The name of the type parameter.
    name: String,

    /// The upper bound a type argument must stay within.
    ///
    /// Parameters without an explicit bound use `dynamic`, the universal
    /// unchecked type.
    bound: TypeRef,
}

impl TypeParameter {
    pub fn alloc(db: &mut Database, name: String) -> TypeParameterId {
        let id = db.type_parameters.len();

        db.type_parameters.push(TypeParameter::new(name));
        TypeParameterId(id)
    }

    fn new(name: String) -> Self {
        Self { name, bound: TypeRef::Dynamic }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TypeParameterId(pub usize);

impl TypeParameterId {
    pub fn name(self, db: &Database) -> &String {
        &self.get(db).name
    }

    pub fn bound(self, db: &Database) -> TypeRef {
        self.get(db).bound
    }

    pub fn set_bound(self, db: &mut Database, bound: TypeRef) {
        self.get_mut(db).bound = bound;
    }

    fn get(self, db: &Database) -> &TypeParameter {
        &db.type_parameters[self.0]
    }

    fn get_mut(self, db: &mut Database) -> &mut TypeParameter {
        &mut db.type_parameters[self.0]
    }
}

/// Type parameters and the types assigned to them.
#[derive(Clone, Debug)]
pub struct TypeArguments {
    /// We use a HashMap as parameters can be assigned in any order, and some
    /// may not be assigned at all.
    mapping: std::collections::HashMap<TypeParameterId, TypeRef>,
}

impl TypeArguments {
    pub fn new() -> Self {
        Self { mapping: std::collections::HashMap::new() }
    }

    pub fn assign(&mut self, parameter: TypeParameterId, value: TypeRef) {
        self.mapping.insert(parameter, value);
    }

    pub fn get(&self, parameter: TypeParameterId) -> Option<TypeRef> {
        self.mapping.get(&parameter).cloned()
    }

    pub fn pairs(&self) -> Vec<(TypeParameterId, TypeRef)> {
        self.mapping.iter().map(|(&a, &b)| (a, b)).collect()
    }

    pub fn copy_into(&self, other: &mut Self) {
        for (&key, &value) in &self.mapping {
            other.assign(key, value);
        }
    }
}

/// A collection of value arguments.
#[derive(Clone)]
pub struct Arguments {
    mapping: IndexMap<String, Argument>,
}

impl Arguments {
    fn new() -> Self {
        Self { mapping: IndexMap::new() }
    }

    fn new_argument(&mut self, name: String, value_type: TypeRef) {
        let index = self.mapping.len();
        let arg = Argument { index, name: name.clone(), value_type };

        self.mapping.insert(name, arg);
    }

    fn get_index(&self, index: usize) -> Option<&Argument> {
        self.mapping.get_index(index).map(|(_, arg)| arg)
    }

    fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.mapping.values()
    }

    fn len(&self) -> usize {
        self.mapping.len()
    }
}

/// An argument defined in a function type or method.
#[derive(Clone)]
pub struct Argument {
    pub index: usize,
    pub name: String,
    pub value_type: TypeRef,
}

/// The type of a function, method, or closurized method reference.
///
/// A function type with a non-empty type parameter list is a "generic
/// function type". Such types may only occur as the top-level type of a
/// declaration; the `verify` module rejects them everywhere else.
#[derive(Clone)]
pub struct FunctionType {
    type_parameters: IndexMap<String, TypeParameterId>,

    /// The required positional arguments.
    arguments: Arguments,

    /// The trailing optional positional arguments, if any.
    optional_arguments: Arguments,

    /// The trailing named arguments, if any.
    named_arguments: Arguments,
    return_type: TypeRef,
}

impl FunctionType {
    pub fn alloc(db: &mut Database, return_type: TypeRef) -> FunctionTypeId {
        FunctionType::add(db, FunctionType::new(return_type))
    }

    pub(crate) fn add(db: &mut Database, typ: FunctionType) -> FunctionTypeId {
        let id = db.function_types.len();

        db.function_types.push(typ);
        FunctionTypeId(id)
    }

    fn new(return_type: TypeRef) -> Self {
        Self {
            type_parameters: IndexMap::new(),
            arguments: Arguments::new(),
            optional_arguments: Arguments::new(),
            named_arguments: Arguments::new(),
            return_type,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct FunctionTypeId(pub usize);

impl FunctionTypeId {
    pub fn is_generic(self, db: &Database) -> bool {
        self.get(db).type_parameters.len() > 0
    }

    pub fn type_parameters(self, db: &Database) -> Vec<TypeParameterId> {
        self.get(db).type_parameters.values().cloned().collect()
    }

    pub fn new_type_parameter(
        self,
        db: &mut Database,
        name: String,
    ) -> TypeParameterId {
        let param = TypeParameter::alloc(db, name.clone());

        self.get_mut(db).type_parameters.insert(name, param);
        param
    }

    /// Adds an existing type parameter to this function type.
    ///
    /// This is used when deriving the type of a generic method, such that the
    /// derived type binds the exact same parameters as the method itself.
    pub fn attach_type_parameter(
        self,
        db: &mut Database,
        parameter: TypeParameterId,
    ) {
        let name = parameter.name(db).clone();

        self.get_mut(db).type_parameters.insert(name, parameter);
    }

    pub fn new_argument(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
    ) {
        self.get_mut(db).arguments.new_argument(name, value_type);
    }

    pub fn new_optional_argument(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
    ) {
        self.get_mut(db).optional_arguments.new_argument(name, value_type);
    }

    pub fn new_named_argument(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
    ) {
        self.get_mut(db).named_arguments.new_argument(name, value_type);
    }

    pub fn arguments(self, db: &Database) -> Vec<Argument> {
        self.get(db).arguments.iter().cloned().collect()
    }

    pub fn optional_arguments(self, db: &Database) -> Vec<Argument> {
        self.get(db).optional_arguments.iter().cloned().collect()
    }

    pub fn named_arguments(self, db: &Database) -> Vec<Argument> {
        self.get(db).named_arguments.iter().cloned().collect()
    }

    pub fn number_of_arguments(self, db: &Database) -> usize {
        self.get(db).arguments.len()
    }

    pub fn return_type(self, db: &Database) -> TypeRef {
        self.get(db).return_type
    }

    pub fn set_return_type(self, db: &mut Database, typ: TypeRef) {
        self.get_mut(db).return_type = typ;
    }

    /// Produces a copy of this function type with `arguments` substituted
    /// throughout, and with an empty type parameter list.
    ///
    /// This is the type an instantiation expression evaluates to: the
    /// quantifier is discharged, and every bound occurrence of a parameter is
    /// replaced by its assigned type.
    pub fn instantiated(
        self,
        db: &mut Database,
        arguments: &TypeArguments,
    ) -> FunctionTypeId {
        let source = self.get(db).clone();
        let new = FunctionType::alloc(db, TypeRef::Unknown);
        let mut resolver = TypeResolver::new(db, arguments);

        let args: Vec<_> = source
            .arguments
            .iter()
            .map(|a| (a.name.clone(), resolver.resolve(a.value_type)))
            .collect();
        let optional: Vec<_> = source
            .optional_arguments
            .iter()
            .map(|a| (a.name.clone(), resolver.resolve(a.value_type)))
            .collect();
        let named: Vec<_> = source
            .named_arguments
            .iter()
            .map(|a| (a.name.clone(), resolver.resolve(a.value_type)))
            .collect();
        let returns = resolver.resolve(source.return_type);

        for (name, typ) in args {
            new.new_argument(db, name, typ);
        }

        for (name, typ) in optional {
            new.new_optional_argument(db, name, typ);
        }

        for (name, typ) in named {
            new.new_named_argument(db, name, typ);
        }

        new.set_return_type(db, returns);
        new
    }

    pub(crate) fn get(self, db: &Database) -> &FunctionType {
        &db.function_types[self.0]
    }

    fn get_mut(self, db: &mut Database) -> &mut FunctionType {
        &mut db.function_types[self.0]
    }
}

/// The kind of a function or method declaration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MethodKind {
    /// A function defined outside of any class.
    Function,

    /// A method that doesn't take a receiver.
    Static,

    /// A method called on an instance of a class.
    Instance,
}

/// A named function or method declaration.
///
/// Declarations are created when a program is defined and are immutable from
/// the checker's point of view: passes only ever read them. Non-generic
/// declarations are simply those with an empty type parameter list.
#[derive(Clone)]
pub struct Method {
    name: String,
    kind: MethodKind,

    /// The class this method is defined on, if any.
    receiver: Option<ClassId>,
    type_parameters: IndexMap<String, TypeParameterId>,
    arguments: Arguments,
    optional_arguments: Arguments,
    named_arguments: Arguments,
    return_type: TypeRef,
    location: Span,
}

impl Method {
    pub fn alloc(
        db: &mut Database,
        name: String,
        kind: MethodKind,
        location: Span,
    ) -> MethodId {
        let id = db.methods.len();

        db.methods.push(Method::new(name, kind, location));
        MethodId(id)
    }

    fn new(name: String, kind: MethodKind, location: Span) -> Self {
        Self {
            name,
            kind,
            receiver: None,
            type_parameters: IndexMap::new(),
            arguments: Arguments::new(),
            optional_arguments: Arguments::new(),
            named_arguments: Arguments::new(),
            return_type: TypeRef::Unknown,
            location,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct MethodId(pub usize);

impl MethodId {
    pub fn name(self, db: &Database) -> &String {
        &self.get(db).name
    }

    pub fn kind(self, db: &Database) -> MethodKind {
        self.get(db).kind
    }

    pub fn is_instance_method(self, db: &Database) -> bool {
        self.get(db).kind == MethodKind::Instance
    }

    pub fn location(self, db: &Database) -> Span {
        self.get(db).location
    }

    pub fn receiver(self, db: &Database) -> Option<ClassId> {
        self.get(db).receiver
    }

    pub fn set_receiver(self, db: &mut Database, class: ClassId) {
        self.get_mut(db).receiver = Some(class);
    }

    pub fn is_generic(self, db: &Database) -> bool {
        self.get(db).type_parameters.len() > 0
    }

    pub fn type_parameters(self, db: &Database) -> Vec<TypeParameterId> {
        self.get(db).type_parameters.values().cloned().collect()
    }

    pub fn new_type_parameter(
        self,
        db: &mut Database,
        name: String,
    ) -> TypeParameterId {
        let param = TypeParameter::alloc(db, name.clone());

        self.get_mut(db).type_parameters.insert(name, param);
        param
    }

    /// Looks up a type parameter of this method by name.
    ///
    /// An inner declaration's parameter of the same name shadows an outer
    /// one; resolving names in lexical order is the name resolver's job, and
    /// it uses this method innermost-first.
    pub fn named_type_parameter(
        self,
        db: &Database,
        name: &str,
    ) -> Option<TypeParameterId> {
        self.get(db).type_parameters.get(name).cloned()
    }

    pub fn new_argument(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
    ) {
        self.get_mut(db).arguments.new_argument(name, value_type);
    }

    pub fn new_optional_argument(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
    ) {
        self.get_mut(db).optional_arguments.new_argument(name, value_type);
    }

    pub fn new_named_argument(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
    ) {
        self.get_mut(db).named_arguments.new_argument(name, value_type);
    }

    pub fn arguments(self, db: &Database) -> Vec<Argument> {
        self.get(db).arguments.iter().cloned().collect()
    }

    pub fn optional_arguments(self, db: &Database) -> Vec<Argument> {
        self.get(db).optional_arguments.iter().cloned().collect()
    }

    pub fn named_arguments(self, db: &Database) -> Vec<Argument> {
        self.get(db).named_arguments.iter().cloned().collect()
    }

    pub fn positional_argument_input_type(
        self,
        db: &Database,
        index: usize,
    ) -> Option<TypeRef> {
        self.get(db).arguments.get_index(index).map(|a| a.value_type)
    }

    pub fn number_of_arguments(self, db: &Database) -> usize {
        self.get(db).arguments.len()
    }

    pub fn return_type(self, db: &Database) -> TypeRef {
        self.get(db).return_type
    }

    pub fn set_return_type(self, db: &mut Database, typ: TypeRef) {
        self.get_mut(db).return_type = typ;
    }

    /// Derives the (possibly generic) function type of this method.
    ///
    /// The derived type binds the method's own type parameters, so
    /// substituting them affects the derived type the same way it affects the
    /// method's signature.
    pub fn as_function_type(self, db: &mut Database) -> FunctionTypeId {
        let source = self.get(db).clone();
        let new = FunctionType::alloc(db, source.return_type);

        for param in source.type_parameters.values() {
            new.attach_type_parameter(db, *param);
        }

        for arg in source.arguments.iter() {
            new.new_argument(db, arg.name.clone(), arg.value_type);
        }

        for arg in source.optional_arguments.iter() {
            new.new_optional_argument(db, arg.name.clone(), arg.value_type);
        }

        for arg in source.named_arguments.iter() {
            new.new_named_argument(db, arg.name.clone(), arg.value_type);
        }

        new
    }

    fn get(self, db: &Database) -> &Method {
        &db.methods[self.0]
    }

    fn get_mut(self, db: &mut Database) -> &mut Method {
        &mut db.methods[self.0]
    }
}

/// A field defined on a class.
#[derive(Clone)]
pub struct Field {
    name: String,
    value_type: TypeRef,
    location: Span,
}

impl Field {
    fn alloc(
        db: &mut Database,
        name: String,
        value_type: TypeRef,
        location: Span,
    ) -> FieldId {
        let id = db.fields.len();

        db.fields.push(Field { name, value_type, location });
        FieldId(id)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct FieldId(pub usize);

impl FieldId {
    pub fn name(self, db: &Database) -> &String {
        &self.get(db).name
    }

    pub fn value_type(self, db: &Database) -> TypeRef {
        self.get(db).value_type
    }

    pub fn location(self, db: &Database) -> Span {
        self.get(db).location
    }

    fn get(self, db: &Database) -> &Field {
        &db.fields[self.0]
    }
}

/// An Opal class.
#[derive(Clone)]
pub struct Class {
    name: String,
    superclass: Option<ClassId>,
    fields: IndexMap<String, FieldId>,
    methods: IndexMap<String, MethodId>,
    location: Span,
}

impl Class {
    pub fn alloc(db: &mut Database, name: String, location: Span) -> ClassId {
        let id = db.classes.len();
        let mut class = Class::new(name, location);

        class.superclass = Some(ClassId::object());
        db.classes.push(class);
        ClassId(id as u32)
    }

    fn new(name: String, location: Span) -> Self {
        Self {
            name,
            superclass: None,
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            location,
        }
    }

    fn builtin(name: &str, superclass: Option<ClassId>) -> Self {
        let mut class = Class::new(name.to_string(), Span::default());

        class.superclass = superclass;
        class
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ClassId(pub u32);

impl ClassId {
    pub fn object() -> ClassId {
        ClassId(OBJECT_ID)
    }

    pub fn num() -> ClassId {
        ClassId(NUM_ID)
    }

    pub fn int() -> ClassId {
        ClassId(INT_ID)
    }

    pub fn float() -> ClassId {
        ClassId(FLOAT_ID)
    }

    pub fn string() -> ClassId {
        ClassId(STRING_ID)
    }

    pub fn boolean() -> ClassId {
        ClassId(BOOLEAN_ID)
    }

    pub fn null() -> ClassId {
        ClassId(NULL_ID)
    }

    pub fn name(self, db: &Database) -> &String {
        &self.get(db).name
    }

    pub fn location(self, db: &Database) -> Span {
        self.get(db).location
    }

    pub fn superclass(self, db: &Database) -> Option<ClassId> {
        self.get(db).superclass
    }

    pub fn set_superclass(self, db: &mut Database, class: ClassId) {
        self.get_mut(db).superclass = Some(class);
    }

    /// Returns true if `self` is `other` or a (transitive) subclass of it.
    pub fn is_subclass_of(self, db: &Database, other: ClassId) -> bool {
        let mut current = Some(self);

        while let Some(class) = current {
            if class == other {
                return true;
            }

            current = class.superclass(db);
        }

        false
    }

    pub fn add_method(self, db: &mut Database, name: String, method: MethodId) {
        method.get_mut(db).receiver = Some(self);
        self.get_mut(db).methods.insert(name, method);
    }

    /// Looks up a method, including those inherited from superclasses.
    pub fn method(self, db: &Database, name: &str) -> Option<MethodId> {
        let mut current = Some(self);

        while let Some(class) = current {
            if let Some(&id) = class.get(db).methods.get(name) {
                return Some(id);
            }

            current = class.superclass(db);
        }

        None
    }

    /// Looks up a method defined directly on this class.
    pub fn own_method(self, db: &Database, name: &str) -> Option<MethodId> {
        self.get(db).methods.get(name).cloned()
    }

    pub fn methods(self, db: &Database) -> Vec<MethodId> {
        self.get(db).methods.values().cloned().collect()
    }

    pub fn new_field(
        self,
        db: &mut Database,
        name: String,
        value_type: TypeRef,
        location: Span,
    ) -> FieldId {
        let field = Field::alloc(db, name.clone(), value_type, location);

        self.get_mut(db).fields.insert(name, field);
        field
    }

    pub fn field(self, db: &Database, name: &str) -> Option<FieldId> {
        self.get(db).fields.get(name).cloned()
    }

    pub fn fields(self, db: &Database) -> Vec<FieldId> {
        self.get(db).fields.values().cloned().collect()
    }

    pub fn number_of_fields(self, db: &Database) -> usize {
        self.get(db).fields.len()
    }

    fn get(self, db: &Database) -> &Class {
        &db.classes[self.0 as usize]
    }

    fn get_mut(self, db: &mut Database) -> &mut Class {
        &mut db.classes[self.0 as usize]
    }
}

/// A reference to a type.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TypeRef {
    /// An instance of a named class.
    Named(ClassId),

    /// A reference to a type parameter of the surrounding declaration.
    Parameter(TypeParameterId),

    /// A function type.
    Function(FunctionTypeId),

    /// The universal unchecked type.
    ///
    /// `dynamic` is compatible with every type in both directions. This is
    /// the language's documented escape hatch, not an oversight: implicit
    /// instantiation and arity recovery both rely on it.
    Dynamic,

    /// A value indicating a typing error.
    ///
    /// This type is compatible with everything to prevent a cascade of type
    /// errors.
    Error,

    /// The type is not yet known.
    ///
    /// This is the default state for a type.
    Unknown,
}

impl TypeRef {
    pub fn object() -> TypeRef {
        TypeRef::Named(ClassId::object())
    }

    pub fn num() -> TypeRef {
        TypeRef::Named(ClassId::num())
    }

    pub fn int() -> TypeRef {
        TypeRef::Named(ClassId::int())
    }

    pub fn float() -> TypeRef {
        TypeRef::Named(ClassId::float())
    }

    pub fn string() -> TypeRef {
        TypeRef::Named(ClassId::string())
    }

    pub fn boolean() -> TypeRef {
        TypeRef::Named(ClassId::boolean())
    }

    pub fn null() -> TypeRef {
        TypeRef::Named(ClassId::null())
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, TypeRef::Dynamic)
    }

    pub fn is_error(self) -> bool {
        matches!(self, TypeRef::Error)
    }

    pub fn as_class(self) -> Option<ClassId> {
        if let TypeRef::Named(id) = self {
            Some(id)
        } else {
            None
        }
    }

    pub fn as_function(self) -> Option<FunctionTypeId> {
        if let TypeRef::Function(id) = self {
            Some(id)
        } else {
            None
        }
    }

    pub fn as_type_parameter(self) -> Option<TypeParameterId> {
        if let TypeRef::Parameter(id) = self {
            Some(id)
        } else {
            None
        }
    }

    pub fn is_generic_function(self, db: &Database) -> bool {
        self.as_function().map_or(false, |id| id.is_generic(db))
    }

    /// Returns true if `self` and `other` are the same type.
    ///
    /// Function types are stored as database rows, so two structurally equal
    /// function types may have different IDs. This comparison looks through
    /// the IDs, which matters for the closurization equality law: equal type
    /// arguments must produce equal closures, not merely identical ones.
    pub fn equals(self, db: &Database, other: TypeRef) -> bool {
        match (self, other) {
            (TypeRef::Function(lhs), TypeRef::Function(rhs)) => {
                if lhs == rhs {
                    return true;
                }

                let lhs_params = lhs.type_parameters(db);
                let rhs_params = rhs.type_parameters(db);

                // Generic function types are compared by parameter identity.
                // Alpha-equivalence is deliberately not implemented: type
                // arguments at instantiation sites are never generic, per the
                // nesting invariant.
                if lhs_params != rhs_params {
                    return false;
                }

                self::arguments_equal(db, &lhs.get(db).arguments, &rhs.get(db).arguments)
                    && self::arguments_equal(
                        db,
                        &lhs.get(db).optional_arguments,
                        &rhs.get(db).optional_arguments,
                    )
                    && self::arguments_equal(
                        db,
                        &lhs.get(db).named_arguments,
                        &rhs.get(db).named_arguments,
                    )
                    && lhs
                        .return_type(db)
                        .equals(db, rhs.return_type(db))
            }
            _ => self == other,
        }
    }
}

fn arguments_equal(db: &Database, lhs: &Arguments, rhs: &Arguments) -> bool {
    lhs.len() == rhs.len()
        && lhs.iter().zip(rhs.iter()).all(|(ours, theirs)| {
            ours.name == theirs.name
                && ours.value_type.equals(db, theirs.value_type)
        })
}

/// A database of all Opal types.
pub struct Database {
    classes: Vec<Class>,
    fields: Vec<Field>,
    methods: Vec<Method>,
    type_parameters: Vec<TypeParameter>,
    function_types: Vec<FunctionType>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            classes: vec![
                Class::builtin(OBJECT_NAME, None),
                Class::builtin(NUM_NAME, Some(ClassId::object())),
                Class::builtin(INT_NAME, Some(ClassId::num())),
                Class::builtin(FLOAT_NAME, Some(ClassId::num())),
                Class::builtin(STRING_NAME, Some(ClassId::object())),
                Class::builtin(BOOLEAN_NAME, Some(ClassId::object())),
                Class::builtin(NULL_NAME, Some(ClassId::object())),
            ],
            fields: Vec::new(),
            methods: Vec::new(),
            type_parameters: Vec::new(),
            function_types: Vec::new(),
        }
    }

    pub fn builtin_class(&self, name: &str) -> Option<ClassId> {
        match name {
            OBJECT_NAME => Some(ClassId::object()),
            NUM_NAME => Some(ClassId::num()),
            INT_NAME => Some(ClassId::int()),
            FLOAT_NAME => Some(ClassId::float()),
            STRING_NAME => Some(ClassId::string()),
            BOOLEAN_NAME => Some(ClassId::boolean()),
            NULL_NAME => Some(ClassId::null()),
            _ => None,
        }
    }

    pub fn number_of_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn number_of_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn number_of_function_types(&self) -> usize {
        self.function_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{function_type, named, new_class, parameter};

    #[test]
    fn test_type_parameter_alloc() {
        let mut db = Database::new();
        let id = TypeParameter::alloc(&mut db, "T".to_string());

        assert_eq!(id.0, 0);
        assert_eq!(id.name(&db), &"T".to_string());
        assert_eq!(id.bound(&db), TypeRef::Dynamic);
    }

    #[test]
    fn test_type_parameter_id_set_bound() {
        let mut db = Database::new();
        let id = TypeParameter::alloc(&mut db, "T".to_string());

        id.set_bound(&mut db, TypeRef::num());

        assert_eq!(id.bound(&db), TypeRef::num());
    }

    #[test]
    fn test_type_arguments_assign() {
        let mut db = Database::new();
        let param1 = TypeParameter::alloc(&mut db, "T".to_string());
        let param2 = TypeParameter::alloc(&mut db, "U".to_string());
        let mut args = TypeArguments::new();

        args.assign(param1, TypeRef::int());

        assert_eq!(args.get(param1), Some(TypeRef::int()));
        assert_eq!(args.get(param2), None);
    }

    #[test]
    fn test_class_alloc() {
        let mut db = Database::new();
        let id = Class::alloc(&mut db, "List".to_string(), Span::default());

        assert_eq!(id.0, FIRST_USER_CLASS_ID);
        assert_eq!(id.name(&db), &"List".to_string());
        assert_eq!(id.superclass(&db), Some(ClassId::object()));
    }

    #[test]
    fn test_class_id_is_subclass_of() {
        let db = Database::new();

        assert!(ClassId::int().is_subclass_of(&db, ClassId::num()));
        assert!(ClassId::int().is_subclass_of(&db, ClassId::object()));
        assert!(ClassId::int().is_subclass_of(&db, ClassId::int()));
        assert!(!ClassId::num().is_subclass_of(&db, ClassId::int()));
        assert!(!ClassId::string().is_subclass_of(&db, ClassId::num()));
    }

    #[test]
    fn test_class_id_method_lookup_uses_superclasses() {
        let mut db = Database::new();
        let parent = new_class(&mut db, "Animal");
        let child = new_class(&mut db, "Cat");
        let method = Method::alloc(
            &mut db,
            "speak".to_string(),
            MethodKind::Instance,
            Span::default(),
        );

        child.set_superclass(&mut db, parent);
        parent.add_method(&mut db, "speak".to_string(), method);

        assert_eq!(child.method(&db, "speak"), Some(method));
        assert_eq!(child.own_method(&db, "speak"), None);
        assert_eq!(parent.own_method(&db, "speak"), Some(method));
    }

    #[test]
    fn test_method_id_as_function_type() {
        let mut db = Database::new();
        let method = Method::alloc(
            &mut db,
            "id".to_string(),
            MethodKind::Function,
            Span::default(),
        );
        let param = method.new_type_parameter(&mut db, "T".to_string());

        method.new_argument(&mut db, "x".to_string(), parameter(param));
        method.set_return_type(&mut db, parameter(param));

        let typ = method.as_function_type(&mut db);

        assert!(typ.is_generic(&db));
        assert_eq!(typ.type_parameters(&db), vec![param]);
        assert_eq!(typ.return_type(&db), parameter(param));
        assert_eq!(typ.arguments(&db)[0].value_type, parameter(param));
    }

    #[test]
    fn test_function_type_id_instantiated() {
        let mut db = Database::new();
        let method = Method::alloc(
            &mut db,
            "id".to_string(),
            MethodKind::Function,
            Span::default(),
        );
        let param = method.new_type_parameter(&mut db, "T".to_string());

        method.new_argument(&mut db, "x".to_string(), parameter(param));
        method.set_return_type(&mut db, parameter(param));

        let generic = method.as_function_type(&mut db);
        let mut args = TypeArguments::new();

        args.assign(param, TypeRef::int());

        let concrete = generic.instantiated(&mut db, &args);

        assert!(!concrete.is_generic(&db));
        assert_eq!(concrete.return_type(&db), TypeRef::int());
        assert_eq!(concrete.arguments(&db)[0].value_type, TypeRef::int());
    }

    #[test]
    fn test_type_ref_equals_structurally() {
        let mut db = Database::new();
        let int = TypeRef::int();
        let fun1 = function_type(&mut db, vec![int], int);
        let fun2 = function_type(&mut db, vec![int], int);
        let fun3 = function_type(&mut db, vec![TypeRef::string()], int);

        assert!(fun1.equals(&db, fun1));
        assert!(fun1.equals(&db, fun2));
        assert!(!fun1.equals(&db, fun3));
        assert!(TypeRef::int().equals(&db, TypeRef::int()));
        assert!(!TypeRef::int().equals(&db, TypeRef::Dynamic));
    }

    #[test]
    fn test_database_builtin_class() {
        let db = Database::new();

        assert_eq!(db.builtin_class("Int"), Some(ClassId::int()));
        assert_eq!(db.builtin_class("Num"), Some(ClassId::num()));
        assert_eq!(db.builtin_class("List"), None);
        assert_eq!(ClassId::int().name(&db), &"Int".to_string());
    }

    #[test]
    fn test_class_id_new_field() {
        let mut db = Database::new();
        let class = new_class(&mut db, "Point");
        let field = class.new_field(
            &mut db,
            "x".to_string(),
            named(ClassId::int()),
            Span::default(),
        );

        assert_eq!(class.field(&db, "x"), Some(field));
        assert_eq!(field.value_type(&db), TypeRef::int());
        assert_eq!(class.number_of_fields(&db), 1);
    }
}
