//! A line-oriented scripting language for desktop GUI automation.
//!
//! Scripts are sequences of instruction lines: a name followed by
//! arguments, with single/double quotes, `%X...X` special quotes, and
//! heredocs for multi-line text. Instruction names are normalized
//! ("get_coords", "getCoords" and "Get Coords" are the same operation)
//! and dispatched through a [`Registry`] of executors driving an
//! [`Actuator`] backend. `def`/`end`/`call` record and replay named
//! instruction lists.
//!
//! # Example
//!
//! ```rust
//! use botbuddy::{Interpreter, NullActuator, ReadSource, Registry};
//!
//! let script = "\
//! def do-click
//!   click 100 200
//! end
//! call do-click
//! call missing";
//!
//! let mut interp = Interpreter::new(NullActuator::new(), Registry::base());
//! let mut source = ReadSource::from_str(script);
//!
//! // A dry run parses everything and reports what would resolve,
//! // without performing any action.
//! let trace = interp.interpret_dry_run(&mut source).unwrap();
//!
//! assert!(trace.contains("[doclick:do-click]:(1:1):user"));
//! assert!(trace.contains("[doclick:do-click]:exists"));
//! assert!(trace.contains("[missing:missing]:none"));
//! ```

mod actuator;
mod error;
mod instruction;
mod interpreter;
mod lexer;
mod os;
mod position;
mod registry;
mod source;
pub mod testing;

pub use actuator::{
    Actuator, ActuatorError, NullActuator, Point, Region, Rgb, Size, DEFAULT_AUTO_DELAY,
    DEFAULT_FAST_DELAY, DEFAULT_LONG_DELAY, DEFAULT_SHORT_DELAY,
};
pub use error::{Error, ParseError};
pub use instruction::{parse_bool, to_id, Arg, Instruction, UserMethod};
pub use interpreter::{Config, Interpreter, CALL_ID};
pub use lexer::Lexer;
pub use os::OsFamily;
pub use position::Position;
pub use registry::{Executor, Registry, BASE_COUNT};
pub use source::{LineSupplier, ReadSource, StringListSource};
