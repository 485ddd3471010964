//! Code generation for nsdgen
//!
//! This module provides the shared generator framework and the target
//! notations built on it.

pub mod bash;
mod emitter;
mod framework;
pub mod oberon;
mod syntax;

pub use bash::Bash;
pub use emitter::Emitter;
pub use framework::{map_operators, Backend, ForFacets, Generator, RoutineContext};
pub use oberon::Oberon;
pub use syntax::{fill, fill_operand, RepeatStyle, Syntax};

use std::fmt;
use std::str::FromStr;

use crate::config::GeneratorConfig;
use crate::diagram::Root;
use crate::errors::{NsdError, NsdResult};

/// Trait for code generators
pub trait CodeGenerator {
    /// Generate code for one routine
    fn generate(&mut self, root: &Root) -> NsdResult<String>;

    /// Get the file extension for the target language
    fn file_extension(&self) -> &'static str;

    /// Get the name of the target language
    fn language_name(&self) -> &'static str;

    /// Get a description of the generated files
    fn description(&self) -> &'static str;
}

/// Available target notations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Bash,
    Oberon,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Bash, Target::Oberon];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Target::Bash => "bash",
            Target::Oberon => "oberon",
        }
    }

    pub fn syntax(self) -> &'static Syntax {
        match self {
            Target::Bash => &bash::BASH_SYNTAX,
            Target::Oberon => &oberon::OBERON_SYNTAX,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = NsdError;

    fn from_str(name: &str) -> NsdResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bash" | "sh" => Ok(Target::Bash),
            "oberon" | "mod" => Ok(Target::Oberon),
            _ => Err(NsdError::UnknownTarget(name.to_string())),
        }
    }
}

/// Create the generator for `target`
pub fn generator_for(target: Target, config: GeneratorConfig) -> Box<dyn CodeGenerator> {
    match target {
        Target::Bash => Box::new(Generator::new(Bash, config)),
        Target::Oberon => Box::new(Generator::new(Oberon, config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names() {
        assert_eq!("sh".parse::<Target>().unwrap(), Target::Bash);
        assert_eq!("Oberon".parse::<Target>().unwrap(), Target::Oberon);
        assert!(matches!(
            "cobol".parse::<Target>(),
            Err(NsdError::UnknownTarget(name)) if name == "cobol"
        ));
    }

    #[test]
    fn test_generator_metadata() {
        let bash = generator_for(Target::Bash, GeneratorConfig::default());
        assert_eq!(bash.language_name(), "BASH");
        assert_eq!(bash.description(), "BASH Source Code");
        assert_eq!(bash.file_extension(), "sh");

        let oberon = generator_for(Target::Oberon, GeneratorConfig::default());
        assert_eq!(oberon.language_name(), "Oberon");
        assert_eq!(oberon.file_extension(), "Mod");
        assert_eq!(Target::Oberon.syntax().description, "Oberon Source Code");
    }
}
