//! Types for producing compile-time diagnostics.
use location::Span;
use std::fmt;
use std::path::PathBuf;

/// A unique ID assigned to each diagnostic.
///
/// The IDs give users something stable to search for or suppress, without
/// having to match on message text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DiagnosticId {
    ArityMismatch,
    BoundViolation,
    InvalidCall,
    InvalidOverride,
    InvalidSelf,
    InvalidType,
    Malformed,
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let id = match self {
            DiagnosticId::ArityMismatch => "arity-mismatch",
            DiagnosticId::BoundViolation => "bound-violation",
            DiagnosticId::InvalidCall => "invalid-call",
            DiagnosticId::InvalidOverride => "invalid-override",
            DiagnosticId::InvalidSelf => "invalid-self",
            DiagnosticId::InvalidType => "invalid-type",
            DiagnosticId::Malformed => "malformed",
        };

        id.fmt(f)
    }
}

/// The severity of a diagnostic.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    Warning,
    Error,
}

/// A single warning or error produced while checking a program.
#[derive(Debug)]
pub struct Diagnostic {
    id: DiagnosticId,
    severity: Severity,
    message: String,
    file: PathBuf,
    location: Span,
}

impl Diagnostic {
    pub fn id(&self) -> DiagnosticId {
        self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &String {
        &self.message
    }

    pub fn file(&self) -> &PathBuf {
        &self.file
    }

    pub fn location(&self) -> Span {
        self.location
    }
}

/// A collection of diagnostics produced while checking a compilation unit.
///
/// Checking never bails on the first problem: passes keep going so a single
/// mistake in one declaration doesn't hide problems in the others.
pub struct Diagnostics {
    values: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.values.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.values.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn error<M: Into<String>>(
        &mut self,
        id: DiagnosticId,
        message: M,
        file: PathBuf,
        location: Span,
    ) {
        self.values.push(Diagnostic {
            id,
            severity: Severity::Error,
            message: message.into(),
            file,
            location,
        });
    }

    pub fn warn<M: Into<String>>(
        &mut self,
        id: DiagnosticId,
        message: M,
        file: PathBuf,
        location: Span,
    ) {
        self.values.push(Diagnostic {
            id,
            severity: Severity::Warning,
            message: message.into(),
            file,
            location,
        });
    }

    pub fn arity_mismatch(
        &mut self,
        expected: usize,
        supplied: usize,
        file: PathBuf,
        location: Span,
    ) {
        // Supplying zero arguments to a generic declaration is how implicit
        // instantiation is spelled, so this stays a warning even though it
        // replaces every type argument with `dynamic`.
        self.warn(
            DiagnosticId::ArityMismatch,
            format!(
                "this declaration takes {} type arguments, but {} were \
                supplied; using 'dynamic' for all of them",
                expected, supplied
            ),
            file,
            location,
        );
    }

    pub fn bound_violation(
        &mut self,
        argument: String,
        bound: String,
        file: PathBuf,
        location: Span,
    ) {
        self.warn(
            DiagnosticId::BoundViolation,
            format!(
                "the type argument '{}' falls outside the bound '{}'",
                argument, bound
            ),
            file,
            location,
        );
    }

    pub fn malformed_type(
        &mut self,
        name: String,
        file: PathBuf,
        location: Span,
    ) {
        self.error(
            DiagnosticId::Malformed,
            format!(
                "the type '{}' is malformed: a generic function type can \
                only be the type of a declaration",
                name
            ),
            file,
            location,
        );
    }

    pub fn type_error(
        &mut self,
        found: String,
        expected: String,
        file: PathBuf,
        location: Span,
    ) {
        self.error(
            DiagnosticId::InvalidType,
            format!("expected a value of type '{}', found '{}'", expected, found),
            file,
            location,
        );
    }

    pub fn incorrect_number_of_arguments(
        &mut self,
        supplied: usize,
        expected: String,
        file: PathBuf,
        location: Span,
    ) {
        self.error(
            DiagnosticId::InvalidCall,
            format!("this call takes {} arguments, but {} were supplied", expected, supplied),
            file,
            location,
        );
    }

    pub fn not_callable(
        &mut self,
        name: String,
        file: PathBuf,
        location: Span,
    ) {
        self.error(
            DiagnosticId::InvalidCall,
            format!("values of type '{}' can't be called", name),
            file,
            location,
        );
    }

    pub fn invalid_override(
        &mut self,
        name: &str,
        class: &str,
        file: PathBuf,
        location: Span,
    ) {
        self.error(
            DiagnosticId::InvalidOverride,
            format!(
                "the method '{}' isn't compatible with the method it \
                overrides in a superclass of '{}'",
                name, class
            ),
            file,
            location,
        );
    }

    pub fn self_outside_instance_method(
        &mut self,
        file: PathBuf,
        location: Span,
    ) {
        self.error(
            DiagnosticId::InvalidSelf,
            "'self' can only be used inside an instance method",
            file,
            location,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_id_display() {
        assert_eq!(DiagnosticId::ArityMismatch.to_string(), "arity-mismatch");
        assert_eq!(DiagnosticId::BoundViolation.to_string(), "bound-violation");
        assert_eq!(DiagnosticId::Malformed.to_string(), "malformed");
    }

    #[test]
    fn test_diagnostics_has_errors() {
        let mut diags = Diagnostics::new();

        diags.arity_mismatch(1, 0, PathBuf::from("a.opal"), Span::default());

        assert_eq!(diags.len(), 1);
        assert!(!diags.has_errors());

        diags.malformed_type(
            "fn <T> (T) -> T".to_string(),
            PathBuf::from("a.opal"),
            Span::default(),
        );

        assert!(diags.has_errors());
    }

    #[test]
    fn test_diagnostics_warn() {
        let mut diags = Diagnostics::new();

        diags.bound_violation(
            "String".to_string(),
            "Num".to_string(),
            PathBuf::from("a.opal"),
            Span::new(4, 10),
        );

        let diag = diags.iter().next().unwrap();

        assert_eq!(diag.id(), DiagnosticId::BoundViolation);
        assert_eq!(diag.severity(), Severity::Warning);
        assert_eq!(diag.location(), Span::new(4, 10));
    }
}
