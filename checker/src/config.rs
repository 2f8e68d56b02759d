//! Configuration for the checker and evaluator.

/// How strictly a program is executed.
///
/// Static checking always runs in full; the mode only decides what happens
/// when a generic declaration is instantiated at run time with a type
/// argument outside its bound.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExecutionMode {
    /// Bound violations at instantiation points abort execution.
    Checked,

    /// Bound violations are ignored, matching production deployments.
    Unchecked,
}

/// A type for storing the checker's configuration.
#[derive(Clone)]
pub struct Config {
    pub mode: ExecutionMode,
}

impl Config {
    pub fn checked() -> Self {
        Self { mode: ExecutionMode::Checked }
    }

    pub fn unchecked() -> Self {
        Self { mode: ExecutionMode::Unchecked }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::unchecked()
    }
}
