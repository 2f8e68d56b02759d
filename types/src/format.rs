//! Formatting of types.
use crate::{
    Arguments, Database, FunctionTypeId, MethodId, TypeParameterId, TypeRef,
};

const MAX_FORMATTING_DEPTH: usize = 8;

pub fn format_type<T: FormatType>(db: &Database, typ: T) -> String {
    TypeFormatter::new(db).format(typ)
}

/// A buffer for formatting type names.
///
/// We use a simple wrapper around a String so we can more easily change the
/// implementation in the future if necessary.
pub struct TypeFormatter<'a> {
    db: &'a Database,
    buffer: String,
    depth: usize,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db, buffer: String::new(), depth: 0 }
    }

    pub fn format<T: FormatType>(mut self, typ: T) -> String {
        typ.format_type(&mut self);
        self.buffer
    }

    fn descend<F: FnOnce(&mut TypeFormatter)>(&mut self, block: F) {
        if self.depth == MAX_FORMATTING_DEPTH {
            self.write("...");
        } else {
            self.depth += 1;

            block(self);

            self.depth -= 1;
        }
    }

    fn write(&mut self, thing: &str) {
        self.buffer.push_str(thing);
    }

    fn type_parameters(&mut self, parameters: &[TypeParameterId]) {
        if parameters.is_empty() {
            return;
        }

        self.write("<");

        for (index, &param) in parameters.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }

            param.format_type(self);

            // The bound is only rendered at the parameter's introduction,
            // not at its use sites.
            let bound = param.bound(self.db);

            if !bound.is_dynamic() {
                self.write(": ");
                self.descend(|buffer| bound.format_type(buffer));
            }
        }

        self.write("> ");
    }

    fn signature(
        &mut self,
        arguments: &Arguments,
        optional: &Arguments,
        named: &Arguments,
        returns: TypeRef,
        include_names: bool,
    ) {
        self.write("(");

        let mut comma = false;

        for arg in arguments.iter() {
            if comma {
                self.write(", ");
            }

            if include_names {
                self.write(&arg.name);
                self.write(": ");
            }

            arg.value_type.format_type(self);
            comma = true;
        }

        if optional.len() > 0 {
            if comma {
                self.write(", ");
            }

            self.write("[");

            for (index, arg) in optional.iter().enumerate() {
                if index > 0 {
                    self.write(", ");
                }

                if include_names {
                    self.write(&arg.name);
                    self.write(": ");
                }

                arg.value_type.format_type(self);
            }

            self.write("]");
            comma = true;
        }

        if named.len() > 0 {
            if comma {
                self.write(", ");
            }

            self.write("{");

            for (index, arg) in named.iter().enumerate() {
                if index > 0 {
                    self.write(", ");
                }

                self.write(&arg.name);
                self.write(": ");
                arg.value_type.format_type(self);
            }

            self.write("}");
        }

        self.write(") -> ");
        returns.format_type(self);
    }
}

/// A type of which the name can be formatted into something human-readable.
pub trait FormatType {
    fn format_type(&self, buffer: &mut TypeFormatter);
}

impl FormatType for TypeRef {
    fn format_type(&self, buffer: &mut TypeFormatter) {
        match *self {
            TypeRef::Named(id) => {
                let name = id.name(buffer.db).clone();

                buffer.write(&name);
            }
            TypeRef::Parameter(id) => id.format_type(buffer),
            TypeRef::Function(id) => id.format_type(buffer),
            TypeRef::Dynamic => buffer.write("dynamic"),
            TypeRef::Error => buffer.write("<error>"),
            TypeRef::Unknown => buffer.write("<unknown>"),
        }
    }
}

impl FormatType for TypeParameterId {
    fn format_type(&self, buffer: &mut TypeFormatter) {
        let name = self.name(buffer.db).clone();

        buffer.write(&name);
    }
}

impl FormatType for FunctionTypeId {
    fn format_type(&self, buffer: &mut TypeFormatter) {
        buffer.descend(|buffer| {
            let fun = self.get(buffer.db).clone();

            buffer.write("fn ");
            buffer.type_parameters(&self.type_parameters(buffer.db));
            buffer.signature(
                &fun.arguments,
                &fun.optional_arguments,
                &fun.named_arguments,
                fun.return_type,
                false,
            );
        });
    }
}

impl FormatType for MethodId {
    fn format_type(&self, buffer: &mut TypeFormatter) {
        buffer.descend(|buffer| {
            let name = self.name(buffer.db).clone();

            buffer.write("fn ");
            buffer.write(&name);
            buffer.write(" ");
            buffer.type_parameters(&self.type_parameters(buffer.db));

            let method = self.get(buffer.db).clone();

            buffer.signature(
                &method.arguments,
                &method.optional_arguments,
                &method.named_arguments,
                method.return_type,
                true,
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{function_type, new_function, parameter};
    use crate::{FunctionType, TypeParameter};

    #[test]
    fn test_named_types() {
        let db = Database::new();

        assert_eq!(format_type(&db, TypeRef::int()), "Int".to_string());
        assert_eq!(format_type(&db, TypeRef::Dynamic), "dynamic".to_string());
        assert_eq!(format_type(&db, TypeRef::Error), "<error>".to_string());
    }

    #[test]
    fn test_type_parameters() {
        let mut db = Database::new();
        let plain = TypeParameter::alloc(&mut db, "T".to_string());
        let bounded = TypeParameter::alloc(&mut db, "K".to_string());

        bounded.set_bound(&mut db, TypeRef::num());

        assert_eq!(format_type(&db, parameter(plain)), "T".to_string());
        assert_eq!(format_type(&db, parameter(bounded)), "K".to_string());
    }

    #[test]
    fn test_function_types() {
        let mut db = Database::new();
        let simple = function_type(
            &mut db,
            vec![TypeRef::int(), TypeRef::string()],
            TypeRef::boolean(),
        );

        assert_eq!(
            format_type(&db, simple),
            "fn (Int, String) -> Bool".to_string()
        );

        let extras = {
            let id = FunctionType::alloc(&mut db, TypeRef::null());

            id.new_argument(&mut db, "a".to_string(), TypeRef::int());
            id.new_optional_argument(
                &mut db,
                "b".to_string(),
                TypeRef::int(),
            );
            id.new_named_argument(&mut db, "c".to_string(), TypeRef::int());
            TypeRef::Function(id)
        };

        assert_eq!(
            format_type(&db, extras),
            "fn (Int, [Int], {c: Int}) -> Null".to_string()
        );
    }

    #[test]
    fn test_generic_function_types() {
        let mut db = Database::new();
        let generic = {
            let id = FunctionType::alloc(&mut db, TypeRef::Unknown);
            let param = id.new_type_parameter(&mut db, "T".to_string());

            param.set_bound(&mut db, TypeRef::num());
            id.new_argument(&mut db, "x".to_string(), parameter(param));
            id.set_return_type(&mut db, parameter(param));
            TypeRef::Function(id)
        };

        assert_eq!(
            format_type(&db, generic),
            "fn <T: Num> (T) -> T".to_string()
        );
    }

    #[test]
    fn test_methods() {
        let mut db = Database::new();
        let method = new_function(&mut db, "identity");
        let param = method.new_type_parameter(&mut db, "T".to_string());

        method.new_argument(&mut db, "x".to_string(), parameter(param));
        method.set_return_type(&mut db, parameter(param));

        assert_eq!(
            format_type(&db, method),
            "fn identity <T> (x: T) -> T".to_string()
        );
    }
}
