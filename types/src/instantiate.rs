//! Instantiating generic declarations with type arguments.
use crate::check::TypeChecker;
use crate::resolve::TypeResolver;
use crate::{
    Database, FunctionTypeId, MethodId, TypeArguments, TypeParameterId,
    TypeRef,
};

/// An error produced while instantiating a declaration.
///
/// These are returned as data rather than reported directly: the compile-time
/// checker turns them into warnings, while a checked-mode runtime escalates
/// bound violations into hard errors.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum InstantiationError {
    /// The number of supplied type arguments differs from the number of
    /// declared type parameters.
    ArityMismatch { expected: usize, supplied: usize },

    /// A type argument isn't a subtype of its parameter's declared bound.
    BoundViolation { parameter: TypeParameterId, argument: TypeRef },
}

/// The result of instantiating a (possibly generic) method.
///
/// The ordered type-argument tuple is what closurization captures; two
/// instantiations of the same method with equal tuples are interchangeable.
pub struct Instantiation {
    pub method: MethodId,

    /// The type arguments actually used, in declaration order.
    ///
    /// After arity recovery this always has exactly one entry per declared
    /// type parameter.
    pub arguments: Vec<TypeRef>,

    /// The substitution from the method's type parameters to `arguments`.
    pub mapping: TypeArguments,

    /// The non-generic function type of this instance of the method.
    pub function_type: FunctionTypeId,
    pub errors: Vec<InstantiationError>,
}

/// Instantiates `method` with the supplied type arguments.
///
/// An arity mismatch never aborts the instantiation: the supplied arguments
/// are discarded and every parameter is assigned `dynamic` instead, after
/// which checking proceeds as usual. A call with zero type arguments against
/// a generic method (implicit instantiation) takes the same path, so the two
/// recoveries can't drift apart.
pub fn instantiate(
    db: &mut Database,
    method: MethodId,
    supplied: &[TypeRef],
) -> Instantiation {
    let parameters = method.type_parameters(db);
    let mut errors = Vec::new();
    let arguments = if supplied.len() == parameters.len() {
        supplied.to_vec()
    } else {
        errors.push(InstantiationError::ArityMismatch {
            expected: parameters.len(),
            supplied: supplied.len(),
        });

        vec![TypeRef::Dynamic; parameters.len()]
    };

    let mut mapping = TypeArguments::new();

    for (&param, &arg) in parameters.iter().zip(arguments.iter()) {
        mapping.assign(param, arg);
    }

    // Bounds may mention the parameters being assigned (`K` bounded by a
    // function type over `K`), so they're substituted before checking.
    for (&param, &arg) in parameters.iter().zip(arguments.iter()) {
        let bound = {
            let raw = param.bound(db);

            TypeResolver::new(db, &mapping).resolve(raw)
        };

        if !TypeChecker::check(db, arg, bound) {
            errors.push(InstantiationError::BoundViolation {
                parameter: param,
                argument: arg,
            });
        }
    }

    let generic = method.as_function_type(db);
    let function_type = generic.instantiated(db, &mapping);

    Instantiation { method, arguments, mapping, function_type, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{new_function, parameter};

    fn identity(db: &mut Database) -> (MethodId, TypeParameterId) {
        let method = new_function(db, "identity");
        let param = method.new_type_parameter(db, "T".to_string());

        method.new_argument(db, "x".to_string(), parameter(param));
        method.set_return_type(db, parameter(param));
        (method, param)
    }

    #[test]
    fn test_instantiate() {
        let mut db = Database::new();
        let (method, _) = identity(&mut db);
        let result = instantiate(&mut db, method, &[TypeRef::int()]);

        assert!(result.errors.is_empty());
        assert_eq!(result.arguments, vec![TypeRef::int()]);
        assert!(!result.function_type.is_generic(&db));
        assert_eq!(result.function_type.return_type(&db), TypeRef::int());
        assert_eq!(
            result.function_type.arguments(&db)[0].value_type,
            TypeRef::int()
        );
    }

    #[test]
    fn test_instantiate_implicitly() {
        let mut db = Database::new();
        let (method, _) = identity(&mut db);
        let result = instantiate(&mut db, method, &[]);

        assert_eq!(
            result.errors,
            vec![InstantiationError::ArityMismatch {
                expected: 1,
                supplied: 0
            }]
        );
        assert_eq!(result.arguments, vec![TypeRef::Dynamic]);
        assert_eq!(result.function_type.return_type(&db), TypeRef::Dynamic);
    }

    #[test]
    fn test_instantiate_with_too_many_arguments() {
        let mut db = Database::new();
        let (method, _) = identity(&mut db);
        let result = instantiate(
            &mut db,
            method,
            &[TypeRef::int(), TypeRef::string()],
        );

        // The supplied arguments are discarded entirely, rather than e.g.
        // keeping the first one.
        assert_eq!(
            result.errors,
            vec![InstantiationError::ArityMismatch {
                expected: 1,
                supplied: 2
            }]
        );
        assert_eq!(result.arguments, vec![TypeRef::Dynamic]);
    }

    #[test]
    fn test_instantiate_with_bound_violation() {
        let mut db = Database::new();
        let (method, param) = identity(&mut db);

        param.set_bound(&mut db, TypeRef::num());

        let ok = instantiate(&mut db, method, &[TypeRef::int()]);
        let err = instantiate(&mut db, method, &[TypeRef::string()]);

        assert!(ok.errors.is_empty());
        assert_eq!(
            err.errors,
            vec![InstantiationError::BoundViolation {
                parameter: param,
                argument: TypeRef::string()
            }]
        );

        // Recovery produced a usable function type regardless.
        assert_eq!(err.function_type.return_type(&db), TypeRef::string());
    }

    #[test]
    fn test_instantiate_with_recursive_bound() {
        let mut db = Database::new();
        let method = new_function(&mut db, "max");
        let param = method.new_type_parameter(&mut db, "K".to_string());
        let bound = crate::test::function_type(
            &mut db,
            vec![parameter(param)],
            TypeRef::boolean(),
        );

        param.set_bound(&mut db, bound);
        method.new_argument(&mut db, "x".to_string(), parameter(param));
        method.set_return_type(&mut db, parameter(param));

        // `dynamic` satisfies any bound, recursive or not.
        let result = instantiate(&mut db, method, &[TypeRef::Dynamic]);

        assert!(result.errors.is_empty());

        // Int defines no `call` method, so it fails the substituted bound
        // `fn (Int) -> Bool`.
        let result = instantiate(&mut db, method, &[TypeRef::int()]);

        assert_eq!(
            result.errors,
            vec![InstantiationError::BoundViolation {
                parameter: param,
                argument: TypeRef::int()
            }]
        );
    }

    #[test]
    fn test_instantiate_non_generic_method() {
        let mut db = Database::new();
        let method = new_function(&mut db, "double");

        method.new_argument(&mut db, "x".to_string(), TypeRef::int());
        method.set_return_type(&mut db, TypeRef::int());

        let result = instantiate(&mut db, method, &[]);

        assert!(result.errors.is_empty());
        assert!(result.arguments.is_empty());
        assert_eq!(result.function_type.return_type(&db), TypeRef::int());

        let result = instantiate(&mut db, method, &[TypeRef::int()]);

        assert_eq!(
            result.errors,
            vec![InstantiationError::ArityMismatch {
                expected: 0,
                supplied: 1
            }]
        );
    }
}
