//! Type checking of types.
use crate::resolve::TypeResolver;
use crate::{
    ClassId, Database, FunctionTypeId, MethodId, TypeArguments, TypeRef,
    CALL_METHOD,
};
use std::collections::HashSet;

/// The `TypeChecker` struct provides methods for checking if a type is a
/// subtype of another type.
pub struct TypeChecker<'a> {
    db: &'a mut Database,

    /// The pairs of types we've already checked.
    ///
    /// When a pair is encountered again the check is treated as having
    /// passed. Without this, self-referential parameter bounds (`K` bounded
    /// by a function type mentioning `K`) would recurse forever.
    checked: HashSet<(TypeRef, TypeRef)>,
}

impl<'a> TypeChecker<'a> {
    /// Checks if `left` is a subtype of `right`.
    pub fn check(db: &mut Database, left: TypeRef, right: TypeRef) -> bool {
        TypeChecker::new(db).run(left, right)
    }

    pub fn new(db: &'a mut Database) -> TypeChecker<'a> {
        TypeChecker { db, checked: HashSet::new() }
    }

    pub fn run(mut self, left: TypeRef, right: TypeRef) -> bool {
        self.check_type_ref(left, right)
    }

    /// Checks if a method signature is compatible with the signature it
    /// overrides.
    ///
    /// This is ordinary function subtyping applied to the derived types, so
    /// generic methods go through the generic rules: an override may e.g.
    /// loosen a type parameter bound, but not tighten it.
    pub fn check_override(
        mut self,
        method: MethodId,
        overridden: MethodId,
    ) -> bool {
        let ours = method.as_function_type(self.db);
        let theirs = overridden.as_function_type(self.db);

        self.check_type_ref(TypeRef::Function(ours), TypeRef::Function(theirs))
    }

    fn check_type_ref(&mut self, left: TypeRef, right: TypeRef) -> bool {
        if left == right {
            return true;
        }

        if !self.checked.insert((left, right)) {
            return true;
        }

        match (left, right) {
            // `dynamic` is compatible in both directions. This is the
            // documented escape hatch of the language, and what makes
            // recovery with `dynamic` type arguments silent downstream.
            (TypeRef::Dynamic, _) | (_, TypeRef::Dynamic) => true,

            // Error types are compatible with everything, such that a single
            // mistake doesn't produce a cascade of errors.
            (TypeRef::Error, _) | (_, TypeRef::Error) => true,
            (TypeRef::Parameter(ours), TypeRef::Parameter(theirs)) => {
                ours == theirs
                    || self.check_type_ref(ours.bound(self.db), right)
            }
            (TypeRef::Parameter(ours), _) => {
                self.check_type_ref(ours.bound(self.db), right)
            }
            (TypeRef::Named(ours), TypeRef::Named(theirs)) => {
                ours.is_subclass_of(self.db, theirs)
            }
            (TypeRef::Named(ours), TypeRef::Function(_)) => {
                self.check_callable(ours, right)
            }
            (TypeRef::Function(ours), TypeRef::Function(theirs)) => {
                self.check_function_types(ours, theirs)
            }
            _ => false,
        }
    }

    /// Checks if instances of a class can be used where a function type is
    /// expected, by virtue of the class defining a compatible instance method
    /// named `call`.
    fn check_callable(&mut self, class: ClassId, right: TypeRef) -> bool {
        let method = match class.method(self.db, CALL_METHOD) {
            Some(id) if id.is_instance_method(self.db) => id,
            _ => return false,
        };
        let typ = method.as_function_type(self.db);

        self.check_type_ref(TypeRef::Function(typ), right)
    }

    fn check_function_types(
        &mut self,
        left: FunctionTypeId,
        right: FunctionTypeId,
    ) -> bool {
        match (left.is_generic(self.db), right.is_generic(self.db)) {
            (false, false) => self.check_signatures(left, right),

            // A generic function type is a subtype of a non-generic one if
            // the instantiation with `dynamic` for every parameter is. This
            // mirrors what actually happens at runtime when such a value
            // flows into a non-generic context: an implicit instantiation.
            (true, false) => {
                let mut arguments = TypeArguments::new();

                for param in left.type_parameters(self.db) {
                    arguments.assign(param, TypeRef::Dynamic);
                }

                let instance = left.instantiated(self.db, &arguments);

                self.check_signatures(instance, right)
            }
            (true, true) => self.check_generic_function_types(left, right),
            (false, true) => false,
        }
    }

    fn check_generic_function_types(
        &mut self,
        left: FunctionTypeId,
        right: FunctionTypeId,
    ) -> bool {
        let ours = left.type_parameters(self.db);
        let theirs = right.type_parameters(self.db);

        if ours.len() != theirs.len() {
            return false;
        }

        // The subtype's parameters are renamed to the supertype's, so both
        // signatures speak about the same parameters from here on.
        let mut renames = TypeArguments::new();

        for (&l, &r) in ours.iter().zip(theirs.iter()) {
            renames.assign(l, TypeRef::Parameter(r));
        }

        // Bounds are contravariant: every type argument the supertype
        // accepts must be accepted by the subtype as well.
        for (&l, &r) in ours.iter().zip(theirs.iter()) {
            let our_bound = {
                let bound = l.bound(self.db);

                TypeResolver::new(self.db, &renames).resolve(bound)
            };

            if !self.check_type_ref(r.bound(self.db), our_bound) {
                return false;
            }
        }

        let renamed = left.instantiated(self.db, &renames);

        self.check_signatures(renamed, right)
    }

    fn check_signatures(
        &mut self,
        left: FunctionTypeId,
        right: FunctionTypeId,
    ) -> bool {
        let mut ours: Vec<_> = left
            .arguments(self.db)
            .into_iter()
            .map(|a| a.value_type)
            .collect();
        let mut theirs: Vec<_> = right
            .arguments(self.db)
            .into_iter()
            .map(|a| a.value_type)
            .collect();

        // The subtype can't require more arguments than the supertype does.
        if ours.len() > theirs.len() {
            return false;
        }

        ours.extend(
            left.optional_arguments(self.db).into_iter().map(|a| a.value_type),
        );
        theirs.extend(
            right
                .optional_arguments(self.db)
                .into_iter()
                .map(|a| a.value_type),
        );

        // The subtype must accept every positional argument the supertype
        // accepts, including the optional ones.
        if ours.len() < theirs.len() {
            return false;
        }

        for (index, &their_type) in theirs.iter().enumerate() {
            if !self.check_type_ref(their_type, ours[index]) {
                return false;
            }
        }

        // The subtype's named arguments must be a superset of the
        // supertype's.
        for theirs in right.named_arguments(self.db) {
            let our_type = match left
                .named_arguments(self.db)
                .into_iter()
                .find(|ours| ours.name == theirs.name)
            {
                Some(arg) => arg.value_type,
                None => return false,
            };

            if !self.check_type_ref(theirs.value_type, our_type) {
                return false;
            }
        }

        let our_returns = left.return_type(self.db);
        let their_returns = right.return_type(self.db);

        self.check_type_ref(our_returns, their_returns)
    }
}
