//! The interpreter loop.
//!
//! Reads instruction lines from a [`LineSupplier`], lexes their
//! arguments, intercepts the structural keywords `def`, `end`, and
//! `call`, and dispatches everything else through the [`Registry`]. Two
//! modes share one pass: `Execute` drives the actuator, `DryRun`
//! performs the full parse and produces a resolution trace without
//! touching the actuator.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::actuator::Actuator;
use crate::error::{Error, ParseError};
use crate::instruction::{to_id, Arg, Instruction, UserMethod};
use crate::lexer::Lexer;
use crate::registry::Registry;
use crate::source::LineSupplier;

/// The id reserved for invoking user methods; it is intercepted before
/// registry lookup and cannot be overridden.
pub const CALL_ID: &str = "call";

/// Interpreter tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Starts a comment running to end-of-line, outside quoted text.
    pub comment_char: char,
    /// The escape character inside quoted text.
    pub escape_char: char,
    /// When set, an unterminated quote or heredoc at end of input is an
    /// error instead of yielding the partial value.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comment_char: '#',
            escape_char: '\\',
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Execute,
    DryRun,
}

/// A script interpreter bound to one actuator and one registry.
///
/// User methods persist across passes, so a host can interpret a
/// prelude defining methods and then interpret further scripts that
/// call them.
pub struct Interpreter<A: Actuator> {
    actuator: A,
    registry: Registry,
    config: Config,
    user_methods: HashMap<String, UserMethod>,
}

impl<A: Actuator> Interpreter<A> {
    pub fn new(actuator: A, registry: Registry) -> Self {
        Self::with_config(actuator, registry, Config::default())
    }

    pub fn with_config(actuator: A, registry: Registry, config: Config) -> Self {
        Self {
            actuator,
            registry,
            config,
            user_methods: HashMap::new(),
        }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Consume the interpreter, returning the actuator.
    pub fn into_actuator(self) -> A {
        self.actuator
    }

    /// Interpret a script, driving the actuator.
    pub fn interpret(&mut self, input: &mut dyn LineSupplier) -> Result<(), Error> {
        self.run(input, Mode::Execute).map(|_| ())
    }

    /// Parse a script fully and return the resolution trace, without
    /// driving the actuator.
    ///
    /// Each instruction renders as `[id:name]:(line:col):status` where
    /// the status is `exists`, `none`, or (for a method definition)
    /// `user`; each argument renders as `- [i]:(line:col): 'value'`.
    /// `call` arguments render as `[methodid:value]:exists|none`
    /// instead. Method-body lines carry a `  > ` prefix, repeated after
    /// every embedded newline in their argument values.
    pub fn interpret_dry_run(&mut self, input: &mut dyn LineSupplier) -> Result<String, Error> {
        self.run(input, Mode::DryRun)
    }

    fn run(&mut self, input: &mut dyn LineSupplier, mode: Mode) -> Result<String, Error> {
        let mut lexer = Lexer::new(input, &self.config);
        let mut output = String::new();
        // The id of the method currently being recorded, if any.
        let mut recording: Option<String> = None;

        while lexer.next_line()? {
            if !lexer.seek_to_non_whitespace() {
                continue;
            }

            let pos = lexer.pos();
            let name = lexer.read_to_whitespace();
            let mut instruction = Instruction::new(pos, name);

            // 'end' closes a method before any argument lexing; the rest
            // of its line is discarded.
            if instruction.id == "end" {
                if recording.take().is_none() {
                    return Err(instruction
                        .parse_error("Invalid instruction; a method can only have one 'end'")
                        .into());
                }
                continue;
            }

            while lexer.has_line_char() {
                let checkpoint = lexer.checkpoint();

                if !lexer.seek_to_non_whitespace() {
                    break;
                }

                let arg_pos = lexer.pos();
                let value = match lexer.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        lexer.bump();
                        lexer.read_quote(quote)
                    }
                    Some('%') => {
                        lexer.bump();
                        lexer.read_special_quote()
                    }
                    Some('<') => {
                        lexer.bump();
                        lexer.read_heredoc()
                    }
                    _ => Ok(lexer.read_to_whitespace()),
                }
                .map_err(|err| err.with_name(&instruction.name))?;

                // Did the reads above consume anything? Guards against a
                // lexer bug parsing the same character forever.
                if lexer.checkpoint() == checkpoint {
                    return Err(lexer
                        .parse_error("Internal code is broken causing an infinite loop")
                        .with_name(&instruction.name)
                        .into());
                }

                instruction.args.push(Arg::new(arg_pos, value));

                // A heredoc or multi-line quote may have hit end of input.
                if lexer.at_end_of_input() {
                    break;
                }
            }

            if instruction.id == "def" {
                if recording.is_some() {
                    return Err(instruction
                        .parse_error("Methods cannot be defined within methods")
                        .into());
                }

                let method_id = self.add_user_method(&instruction)?;
                if mode == Mode::DryRun {
                    if let Some(method) = self.user_methods.get(&method_id) {
                        let _ =
                            writeln!(output, "[{}:{}]:{}:user", method.id, method.name, method.pos);
                    }
                }
                recording = Some(method_id);
                continue;
            }

            match &recording {
                None => match mode {
                    Mode::Execute => self.execute(&instruction)?,
                    Mode::DryRun => self.write_trace(&mut output, &instruction, ""),
                },
                Some(method_id) => {
                    if mode == Mode::DryRun {
                        self.write_trace(&mut output, &instruction, "  > ");
                    }
                    if let Some(method) = self.user_methods.get_mut(method_id) {
                        method.body.push(instruction);
                    }
                }
            }
        }

        Ok(output)
    }

    /// Execute one instruction: `call` is intercepted, everything else
    /// dispatches through the registry by id.
    pub fn execute(&mut self, instruction: &Instruction) -> Result<(), Error> {
        if instruction.id == CALL_ID {
            return self.call_user_method(instruction);
        }

        let executor = self.registry.get(&instruction.id).ok_or_else(|| {
            instruction.parse_error(format!(
                "Instruction '{}' from '{}' does not exist",
                instruction.id, instruction.name
            ))
        })?;

        executor(&mut self.actuator, instruction)
    }

    /// Run the named user methods, in argument order.
    fn call_user_method(&mut self, instruction: &Instruction) -> Result<(), Error> {
        instruction.get_arg(0)?;

        for arg in &instruction.args {
            let method_id = to_id(&arg.value);

            // The body is cloned so a method may `call` others while we
            // iterate.
            let body = match self.user_methods.get(&method_id) {
                Some(method) => method.body.clone(),
                None => {
                    return Err(ParseError::named(
                        arg.pos,
                        format!("Method '{}' from '{}' does not exist", method_id, arg.value),
                        &instruction.name,
                    )
                    .into());
                }
            };

            for inst in &body {
                self.execute(inst)?;
            }
        }

        Ok(())
    }

    /// Register the method a `def` instruction names; its body starts
    /// empty and fills as subsequent lines are recorded.
    fn add_user_method(&mut self, instruction: &Instruction) -> Result<String, Error> {
        if instruction.args.is_empty() {
            return Err(instruction.parse_error("Method has no name").into());
        }

        let name_arg = &instruction.args[0];
        if instruction.args.len() > 1 {
            return Err(ParseError::named(
                instruction.args[1].pos,
                "Methods cannot currently define params",
                &name_arg.value,
            )
            .into());
        }

        let method = UserMethod::new(instruction.pos, &name_arg.value);
        if self.user_methods.contains_key(&method.id) {
            return Err(ParseError::named(
                name_arg.pos,
                format!("Method name is already defined as '{}'", method.id),
                &name_arg.value,
            )
            .into());
        }

        let method_id = method.id.clone();
        self.user_methods.insert(method_id.clone(), method);
        Ok(method_id)
    }

    fn write_trace(&self, out: &mut String, instruction: &Instruction, prefix: &str) {
        let is_call = instruction.id == CALL_ID;
        let status = if is_call || self.registry.contains_id(&instruction.id) {
            "exists"
        } else {
            "none"
        };

        let _ = writeln!(
            out,
            "{prefix}[{}:{}]:{}:{status}",
            instruction.id, instruction.name, instruction.pos
        );

        for (i, arg) in instruction.args.iter().enumerate() {
            let _ = write!(out, "{prefix}- [{i}]:{}: ", arg.pos);
            if is_call {
                let method_id = to_id(&arg.value);
                let found = if self.user_methods.contains_key(&method_id) {
                    "exists"
                } else {
                    "none"
                };
                let _ = write!(out, "[{method_id}:{}]:{found}", arg.value);
            } else if prefix.is_empty() {
                let _ = write!(out, "'{}'", arg.value);
            } else {
                let _ = write!(out, "'{}'", arg.value.replace('\n', &format!("\n{prefix}")));
            }
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReadSource;
    use crate::testing::RecordingActuator;

    fn interpreter() -> Interpreter<RecordingActuator> {
        Interpreter::new(RecordingActuator::new(), Registry::base())
    }

    fn run_script(text: &str) -> Vec<String> {
        let mut interp = interpreter();
        let mut src = ReadSource::from_str(text);
        interp.interpret(&mut src).unwrap();
        interp.into_actuator().calls
    }

    fn run_err(text: &str) -> Error {
        let mut interp = interpreter();
        let mut src = ReadSource::from_str(text);
        interp.interpret(&mut src).unwrap_err()
    }

    #[test]
    fn test_click_dispatch_by_arity() {
        assert_eq!(run_script("click"), vec!["click(1)"]);
        assert_eq!(run_script("click 3"), vec!["click(3)"]);
        assert_eq!(run_script("click 10 20"), vec!["move_to(10,20)", "click(1)"]);
        assert_eq!(
            run_script("click 10 20 2"),
            vec!["move_to(10,20)", "click(2)"]
        );
    }

    #[test]
    fn test_name_normalization_reaches_same_executor() {
        assert_eq!(run_script("Begin_Safe-Mode"), vec!["begin_safe_mode()"]);
        assert_eq!(run_script("beginSafeMode"), vec!["begin_safe_mode()"]);
    }

    #[test]
    fn test_unknown_instruction_reports_id_and_name() {
        let err = run_err("clikc 10");
        assert_eq!(
            err.to_string(),
            "clikc:(1:1): Instruction 'clikc' from 'clikc' does not exist"
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        assert!(run_script("\n   \n# only a comment\n").is_empty());
    }

    #[test]
    fn test_def_call_records_and_replays() {
        let calls = run_script("def greet\n  copy \"hi\"\nend\ncall greet greet");
        assert_eq!(calls, vec!["copy(\"hi\")", "copy(\"hi\")"]);
    }

    #[test]
    fn test_method_body_is_not_executed_at_definition() {
        assert!(run_script("def greet\n  copy \"hi\"\nend").is_empty());
    }

    #[test]
    fn test_methods_can_call_other_methods() {
        let calls = run_script(
            "def inner\n  beep\nend\ndef outer\n  call inner\n  enter\nend\ncall outer",
        );
        assert_eq!(calls, vec!["beep()", "enter()"]);
    }

    #[test]
    fn test_end_without_def_is_an_error() {
        let err = run_err("end");
        assert_eq!(
            err.to_string(),
            "end:(1:1): Invalid instruction; a method can only have one 'end'"
        );
    }

    #[test]
    fn test_nested_def_is_an_error() {
        let err = run_err("def a\ndef b\nend\nend");
        assert_eq!(err.to_string(), "def:(2:1): Methods cannot be defined within methods");
    }

    #[test]
    fn test_def_without_name_is_an_error() {
        let err = run_err("def");
        assert_eq!(err.to_string(), "def:(1:1): Method has no name");
    }

    #[test]
    fn test_def_with_params_is_an_error() {
        let err = run_err("def greet x");
        assert_eq!(
            err.to_string(),
            "greet:(1:11): Methods cannot currently define params"
        );
    }

    #[test]
    fn test_duplicate_def_is_an_error() {
        let err = run_err("def greet\nend\ndef GREET\nend");
        assert_eq!(
            err.to_string(),
            "GREET:(3:5): Method name is already defined as 'greet'"
        );
    }

    #[test]
    fn test_call_of_missing_method_is_an_error() {
        let err = run_err("call nope");
        assert_eq!(
            err.to_string(),
            "call:(1:6): Method 'nope' from 'nope' does not exist"
        );
    }

    #[test]
    fn test_call_without_args_is_an_error() {
        let err = run_err("call");
        assert_eq!(err.to_string(), "call:(1:1): Not enough args");
    }

    #[test]
    fn test_user_methods_persist_across_passes() {
        let mut interp = interpreter();
        let mut first = ReadSource::from_str("def greet\n  beep\nend");
        interp.interpret(&mut first).unwrap();

        let mut second = ReadSource::from_str("call greet");
        interp.interpret(&mut second).unwrap();
        assert_eq!(interp.actuator().calls, vec!["beep()"]);
    }

    #[test]
    fn test_heredoc_value_reaches_executor() {
        let calls = run_script("copy <<-EOS\n    line one\n      line two\n    EOS");
        assert_eq!(calls, vec!["copy(\"line one\\n  line two\")"]);
    }

    #[test]
    fn test_unterminated_quote_is_permissive_by_default() {
        assert_eq!(run_script("copy \"abc"), vec!["copy(\"abc\")"]);
    }

    #[test]
    fn test_strict_mode_rejects_unterminated_quote() {
        let config = Config {
            strict: true,
            ..Config::default()
        };
        let mut interp =
            Interpreter::with_config(RecordingActuator::new(), Registry::base(), config);
        let mut src = ReadSource::from_str("copy \"abc");
        let err = interp.interpret(&mut src).unwrap_err();
        assert!(err.to_string().contains("No end quote found before end of input"));
        assert!(err.to_string().starts_with("copy:"));
    }

    #[test]
    fn test_dry_run_does_not_touch_the_actuator() {
        let mut interp = interpreter();
        let mut src = ReadSource::from_str("click 10 20\ndelay 500");
        interp.interpret_dry_run(&mut src).unwrap();
        assert!(interp.actuator().calls.is_empty());
    }

    #[test]
    fn test_dry_run_trace_format() {
        let script = "puts \"Hello\"\n\
                      def greet\n  \
                        puts <<-EOS\n    \
                          Hi there\n    \
                          EOS\n\
                      end\n\
                      call greet greet";
        let mut interp = interpreter();
        let mut src = ReadSource::from_str(script);
        let trace = interp.interpret_dry_run(&mut src).unwrap();
        assert_eq!(
            trace,
            "[puts:puts]:(1:1):exists\n\
             - [0]:(1:6): 'Hello'\n\
             [greet:greet]:(2:1):user\n\
             \x20 > [puts:puts]:(3:3):exists\n\
             \x20 > - [0]:(3:8): 'Hi there'\n\
             [call:call]:(7:1):exists\n\
             - [0]:(7:6): [greet:greet]:exists\n\
             - [1]:(7:12): [greet:greet]:exists\n"
        );
    }

    #[test]
    fn test_dry_run_marks_unknown_instructions() {
        let mut interp = interpreter();
        let mut src = ReadSource::from_str("clikc 1");
        let trace = interp.interpret_dry_run(&mut src).unwrap();
        assert_eq!(trace, "[clikc:clikc]:(1:1):none\n- [0]:(1:7): '1'\n");
    }

    #[test]
    fn test_dry_run_marks_missing_call_targets() {
        let mut interp = interpreter();
        let mut src = ReadSource::from_str("call nope");
        let trace = interp.interpret_dry_run(&mut src).unwrap();
        assert_eq!(trace, "[call:call]:(1:1):exists\n- [0]:(1:6): [nope:nope]:none\n");
    }

    #[test]
    fn test_trace_argument_values_survive_re_lexing() {
        let script = "copy \"Hello\nWorld\"\n\
                      copy <<-EOS\n    \
                      line one\n      \
                      line two\n    \
                      EOS";
        let mut interp = interpreter();
        let mut src = ReadSource::from_str(script);
        let trace = interp.interpret_dry_run(&mut src).unwrap();

        // Pull each quoted literal back out of the trace. Top-level arg
        // lines render as "- [i]:(l:c): 'value'" with embedded newlines
        // kept verbatim, and none of these values contains a quote.
        let mut values = Vec::new();
        let mut rest = trace.as_str();
        while let Some(start) = rest.find("): '") {
            let tail = &rest[start + 4..];
            let end = tail.find("'\n").unwrap();
            values.push(tail[..end].to_string());
            rest = &tail[end..];
        }
        assert_eq!(values, vec!["Hello\nWorld", "line one\n  line two"]);

        // Re-quoting each value and lexing it again reproduces the
        // original exactly, newlines included.
        for value in &values {
            let mut interp = interpreter();
            let mut src = ReadSource::from_str(&format!("copy '{value}'"));
            interp.interpret(&mut src).unwrap();
            assert_eq!(
                interp.into_actuator().calls,
                vec![format!("copy({value:?})")]
            );
        }
    }

    #[test]
    fn test_dry_run_prefixes_multiline_body_values() {
        let script = "def show\n  copy \"a\nb\"\nend";
        let mut interp = interpreter();
        let mut src = ReadSource::from_str(script);
        let trace = interp.interpret_dry_run(&mut src).unwrap();
        assert_eq!(
            trace,
            "[show:show]:(1:1):user\n\
             \x20 > [copy:copy]:(2:3):exists\n\
             \x20 > - [0]:(2:8): 'a\n\
             \x20 > b'\n"
        );
    }

    #[test]
    fn test_unclosed_def_keeps_recorded_body() {
        let mut interp = interpreter();
        let mut src = ReadSource::from_str("def greet\n  beep");
        interp.interpret(&mut src).unwrap();

        let mut second = ReadSource::from_str("call greet");
        interp.interpret(&mut second).unwrap();
        assert_eq!(interp.actuator().calls, vec!["beep()"]);
    }
}
