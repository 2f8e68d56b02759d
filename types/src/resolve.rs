//! Resolving abstract types into concrete types.
use crate::{Database, FunctionType, FunctionTypeId, TypeArguments, TypeRef};
use std::collections::HashMap;

/// A type that takes a type possibly containing type parameters and resolves
/// it into a concrete type, using a set of type arguments.
///
/// Resolving never mutates existing types: function types containing a
/// parameter to substitute are rebuilt as new rows. Parameters without an
/// assignment are left as-is, which is what keeps substitution
/// capture-avoiding: every declaration site binds parameters with globally
/// unique ids, so an unrelated parameter of the same name can never be
/// assigned through this mapping.
pub struct TypeResolver<'a> {
    db: &'a mut Database,

    /// A cache of types we've already resolved.
    ///
    /// Besides avoiding redundant work, the cache keeps resolving recursive
    /// assignments (a parameter assigned to itself) from looping.
    cached: HashMap<TypeRef, TypeRef>,

    /// The type arguments to use when resolving type parameters.
    type_arguments: &'a TypeArguments,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        db: &'a mut Database,
        type_arguments: &'a TypeArguments,
    ) -> TypeResolver<'a> {
        TypeResolver { db, cached: HashMap::new(), type_arguments }
    }

    pub fn resolve(&mut self, value: TypeRef) -> TypeRef {
        if let Some(&cached) = self.cached.get(&value) {
            return cached;
        }

        let resolved = match value {
            TypeRef::Parameter(id) => match self.type_arguments.get(id) {
                Some(TypeRef::Parameter(other)) if other == id => value,
                Some(assigned) => {
                    // Assignments may themselves contain parameters, such as
                    // when a generic function forwards its own parameters to
                    // a callee.
                    self.cached.insert(value, assigned);
                    self.resolve(assigned)
                }
                None => value,
            },
            TypeRef::Function(id) => {
                // Seed the cache before recursing so a function type that
                // mentions itself through a parameter assignment doesn't
                // recurse forever.
                self.cached.insert(value, value);

                let resolved = self.resolve_function_type(id);

                self.cached.insert(value, resolved);
                resolved
            }
            _ => value,
        };

        self.cached.insert(value, resolved);
        resolved
    }

    fn resolve_function_type(&mut self, id: FunctionTypeId) -> TypeRef {
        let params = id.type_parameters(self.db);
        let args = id.arguments(self.db);
        let optional = id.optional_arguments(self.db);
        let named = id.named_arguments(self.db);
        let returns = id.return_type(self.db);

        let new_args: Vec<_> = args
            .into_iter()
            .map(|a| (a.name, self.resolve(a.value_type)))
            .collect();
        let new_optional: Vec<_> = optional
            .into_iter()
            .map(|a| (a.name, self.resolve(a.value_type)))
            .collect();
        let new_named: Vec<_> = named
            .into_iter()
            .map(|a| (a.name, self.resolve(a.value_type)))
            .collect();
        let new_returns = self.resolve(returns);
        let new = FunctionType::alloc(self.db, new_returns);

        // A generic function type keeps binding its own parameters; only the
        // free parameters (those of the surrounding declaration) are
        // substituted. The mapping can't touch the bound ones as their ids
        // are unique to this type.
        for param in params {
            new.attach_type_parameter(self.db, param);
        }

        for (name, typ) in new_args {
            new.new_argument(self.db, name, typ);
        }

        for (name, typ) in new_optional {
            new.new_optional_argument(self.db, name, typ);
        }

        for (name, typ) in new_named {
            new.new_named_argument(self.db, name, typ);
        }

        TypeRef::Function(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{function_type, parameter};
    use crate::TypeParameter;

    fn resolve(
        db: &mut Database,
        arguments: &TypeArguments,
        value: TypeRef,
    ) -> TypeRef {
        TypeResolver::new(db, arguments).resolve(value)
    }

    #[test]
    fn test_resolve_parameter() {
        let mut db = Database::new();
        let param = TypeParameter::alloc(&mut db, "T".to_string());
        let mut args = TypeArguments::new();

        args.assign(param, TypeRef::int());

        assert_eq!(
            resolve(&mut db, &args, parameter(param)),
            TypeRef::int()
        );
    }

    #[test]
    fn test_resolve_unassigned_parameter() {
        let mut db = Database::new();
        let param = TypeParameter::alloc(&mut db, "T".to_string());
        let args = TypeArguments::new();

        assert_eq!(
            resolve(&mut db, &args, parameter(param)),
            parameter(param)
        );
    }

    #[test]
    fn test_resolve_parameter_chain() {
        let mut db = Database::new();
        let param1 = TypeParameter::alloc(&mut db, "T".to_string());
        let param2 = TypeParameter::alloc(&mut db, "U".to_string());
        let mut args = TypeArguments::new();

        args.assign(param1, parameter(param2));
        args.assign(param2, TypeRef::string());

        assert_eq!(
            resolve(&mut db, &args, parameter(param1)),
            TypeRef::string()
        );
    }

    #[test]
    fn test_resolve_self_assigned_parameter() {
        let mut db = Database::new();
        let param = TypeParameter::alloc(&mut db, "T".to_string());
        let mut args = TypeArguments::new();

        args.assign(param, parameter(param));

        assert_eq!(
            resolve(&mut db, &args, parameter(param)),
            parameter(param)
        );
    }

    #[test]
    fn test_resolve_function_type() {
        let mut db = Database::new();
        let param = TypeParameter::alloc(&mut db, "T".to_string());
        let fun = function_type(
            &mut db,
            vec![parameter(param)],
            parameter(param),
        );
        let mut args = TypeArguments::new();

        args.assign(param, TypeRef::int());

        let resolved = resolve(&mut db, &args, fun);
        let id = resolved.as_function().unwrap();

        assert_eq!(id.arguments(&db)[0].value_type, TypeRef::int());
        assert_eq!(id.return_type(&db), TypeRef::int());
    }

    #[test]
    fn test_resolve_concrete_types_unchanged() {
        let mut db = Database::new();
        let args = TypeArguments::new();

        assert_eq!(resolve(&mut db, &args, TypeRef::int()), TypeRef::int());
        assert_eq!(resolve(&mut db, &args, TypeRef::Dynamic), TypeRef::Dynamic);
        assert_eq!(resolve(&mut db, &args, TypeRef::Error), TypeRef::Error);
    }
}
