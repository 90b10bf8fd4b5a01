//! The instruction/argument data model.
//!
//! Instruction names are flexible in the script ("begin_safe_mode",
//! "beginSafeMode" and "begin-safe-mode" are the same operation); the
//! canonical form used for dispatch is produced by [`to_id`].

use phf::{phf_set, Set};

use crate::error::ParseError;
use crate::position::Position;

/// Truthy literals accepted by [`Instruction::get_bool`]. Anything else
/// parses as false.
static TRUE_WORDS: Set<&'static str> = phf_set! {
    "1", "on", "t", "true", "y", "yes",
};

/// Normalize an instruction name to its canonical id: strip every run of
/// whitespace, `_`, `-` and `.`, then lowercase.
///
/// Total, deterministic, and idempotent; used identically for registry
/// population, dispatch lookup, `call` resolution, and `def` naming.
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse a boolean using the fixed truthy vocabulary.
pub fn parse_bool(text: &str) -> bool {
    TRUE_WORDS.contains(text.trim().to_lowercase().as_str())
}

/// One resolved argument token, with quote/heredoc processing already
/// applied. Carries the position of its first source character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub pos: Position,
    pub value: String,
}

impl Arg {
    pub fn new(pos: Position, value: impl Into<String>) -> Self {
        Self {
            pos,
            value: value.into(),
        }
    }
}

/// One parsed instruction line: the raw name, its normalized id, and the
/// argument tokens in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub pos: Position,
    pub name: String,
    pub id: String,
    pub args: Vec<Arg>,
}

impl Instruction {
    pub fn new(pos: Position, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = to_id(&name);
        Self {
            pos,
            name,
            id,
            args: Vec::new(),
        }
    }

    /// Build a diagnostic at this instruction's position, carrying its
    /// raw name for context.
    pub fn parse_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::named(self.pos, message, &self.name)
    }

    /// The argument at `index`, or a positioned "Not enough args" error.
    pub fn get_arg(&self, index: usize) -> Result<&Arg, ParseError> {
        self.args
            .get(index)
            .ok_or_else(|| self.parse_error("Not enough args"))
    }

    pub fn get_str(&self, index: usize) -> Result<&str, ParseError> {
        Ok(&self.get_arg(index)?.value)
    }

    /// The argument at `index` parsed as an integer. Failure reports the
    /// *argument's* position, not the instruction's.
    pub fn get_int(&self, index: usize) -> Result<i32, ParseError> {
        let arg = self.get_arg(index)?;
        arg.value.parse().map_err(|_| {
            ParseError::named(
                arg.pos,
                format!("Arg '{}' must be an int", arg.value),
                &self.name,
            )
        })
    }

    /// Non-failing integer probe, for instructions whose signature is
    /// ambiguous between an int and a string at the same arity.
    pub fn try_int(&self, index: usize) -> Option<i32> {
        self.args.get(index)?.value.parse().ok()
    }

    pub fn get_bool(&self, index: usize) -> Result<bool, ParseError> {
        Ok(parse_bool(self.get_str(index)?))
    }

    /// All arguments parsed as integers; at least one is required.
    pub fn get_ints(&self) -> Result<Vec<i32>, ParseError> {
        self.get_ints_min(1)
    }

    /// All arguments parsed as integers, requiring at least `min` args.
    pub fn get_ints_min(&self, min: usize) -> Result<Vec<i32>, ParseError> {
        for index in 0..min {
            self.get_arg(index)?;
        }
        (0..self.args.len()).map(|index| self.get_int(index)).collect()
    }
}

/// A named, recorded list of instructions defined with `def ... end` and
/// invoked with `call`. Takes no arguments of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMethod {
    pub pos: Position,
    pub name: String,
    pub id: String,
    pub body: Vec<Instruction>,
}

impl UserMethod {
    pub fn new(pos: Position, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = to_id(&name);
        Self {
            pos,
            name,
            id,
            body: Vec::new(),
        }
    }
}
