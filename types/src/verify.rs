//! Verifying the structure of types.
use crate::{Database, TypeRef};

/// Returns true if `typ` is valid for a value position, such as an argument,
/// a field, a return type, or a type parameter bound.
///
/// Generic function types may only occur as the top-level type of a
/// declaration. In every other position they're malformed, so values of a
/// generic function type can only be produced by referencing such a
/// declaration, and consumed by instantiating them. This is what keeps
/// instantiation a matter of looking up a declaration's signature instead of
/// a general operation over arbitrary types.
pub fn is_well_formed(db: &Database, typ: TypeRef) -> bool {
    match typ {
        TypeRef::Function(id) => {
            if id.is_generic(db) {
                return false;
            }

            id.arguments(db)
                .into_iter()
                .chain(id.optional_arguments(db))
                .chain(id.named_arguments(db))
                .all(|arg| is_well_formed(db, arg.value_type))
                && is_well_formed(db, id.return_type(db))
        }
        _ => true,
    }
}
