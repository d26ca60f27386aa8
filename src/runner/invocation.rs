//! Invocation engine
//!
//! One [`Invocation`] handles a single run: it picks the mode from the reserved
//! tokens, then shows help, completes a line, prints a completion script, or
//! resolves and calls an operation.

use crate::binding::{SlotSet, POSITIONAL_ONLY};
use crate::catalog::{Call, CommandGroup, Operation, Returned, Value};
use crate::config::Settings;
use crate::error::{BindError, DefinitionError, DefinitionResult, InvocationError, Result};
use crate::resolve::{suggest, Arguments, Candidate, Comparison, Suggestion};
use crate::runner::complete::{Completer, CompletionRequest};
use crate::runner::help::write_help;
use crate::runner::script::{self, Shell};
use crate::runner::{InstanceProvider, InvocationResult, InvocationStatus};
use futures::executor::block_on;
use std::any::Any;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

pub const HELP_FLAG: &str = "--help";
pub const COMPLETE_FLAG: &str = "--complete";

/// What a run was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Invoke,
    Help,
    Complete,
    CompletionScript(Shell),
}

impl Mode {
    /// Find the first reserved token.
    ///
    /// Returns the mode and, unless it is a plain invocation, the index of the
    /// token that selected it. A `--` seen first means a plain invocation.
    pub fn select(args: &Arguments) -> (Mode, Option<usize>) {
        for (index, token) in args.iter().enumerate() {
            let mode = match token.value.as_str() {
                POSITIONAL_ONLY => return (Mode::Invoke, None),
                HELP_FLAG => Mode::Help,
                COMPLETE_FLAG => Mode::Complete,
                other => match Shell::from_flag(other) {
                    Some(shell) => Mode::CompletionScript(shell),
                    None => continue,
                },
            };
            return (mode, Some(index));
        }

        (Mode::Invoke, None)
    }
}

/// State of a single run
pub struct Invocation<'r> {
    settings: &'r Settings,
    instances: Option<&'r InstanceProvider>,
    stdout: &'r mut dyn Write,
    stderr: &'r mut dyn Write,
    candidates: Vec<Candidate>,
    cmp: Comparison,
}

impl<'r> Invocation<'r> {
    pub fn new(
        groups: &[Arc<CommandGroup>],
        settings: &'r Settings,
        instances: Option<&'r InstanceProvider>,
        stdout: &'r mut dyn Write,
        stderr: &'r mut dyn Write,
    ) -> Self {
        Invocation {
            settings,
            instances,
            stdout,
            stderr,
            candidates: Candidate::build(groups),
            cmp: settings.comparison(),
        }
    }

    /// Run with the already tokenized arguments
    pub fn run(&mut self, mut args: Arguments) -> Result<InvocationResult> {
        let (mode, index) = Mode::select(&args);
        debug!(?mode, args = ?args.values(), "mode selected");

        let result = match (mode, index) {
            (Mode::Help, Some(_)) => {
                args.remove(HELP_FLAG);
                self.help(&args)?
            }
            (Mode::Complete, Some(_)) => {
                args.remove(COMPLETE_FLAG);
                self.complete(&args)?
            }
            (Mode::CompletionScript(shell), Some(index)) => {
                let alias = args.get(index + 1).map(|t| t.value.clone());
                self.completion_script(shell, alias.as_deref())?
            }
            _ => self.invoke(&args)?,
        };

        self.stdout.flush()?;
        self.stderr.flush()?;
        Ok(result)
    }

    /// Describe everything matching the first token, or the whole catalog
    pub fn help(&mut self, args: &Arguments) -> Result<InvocationResult> {
        let input = args.first().map(|t| t.value.as_str()).unwrap_or_default();
        let suggestions = suggest(input, &self.candidates, self.cmp);

        if !input.is_empty() && suggestions.is_empty() {
            writeln!(self.stdout, "{}", InvocationError::NoMethodFound(input.to_string()))?;
        }
        write_help(&mut *self.stdout, &suggestions, self.settings)?;
        Ok(InvocationResult::new(InvocationStatus::Help))
    }

    /// Print completions for a `--complete` request
    pub fn complete(&mut self, args: &Arguments) -> Result<InvocationResult> {
        let request = match CompletionRequest::parse(args.as_slice()) {
            Ok(request) => request,
            Err(e) => {
                writeln!(self.stderr, "{}", e)?;
                return Ok(InvocationResult::failed(InvocationStatus::ConversionFailed, e));
            }
        };

        let completer = Completer::new(
            &self.candidates,
            self.cmp,
            &self.settings.sigils,
            self.settings.default_sigil(),
        );
        for completion in completer.complete(&request.line, request.position) {
            writeln!(self.stdout, "{}", completion)?;
        }

        Ok(InvocationResult::new(InvocationStatus::Complete))
    }

    pub fn completion_script(&mut self, shell: Shell, alias: Option<&str>) -> Result<InvocationResult> {
        let Some(alias) = alias.filter(|a| !a.trim().is_empty()) else {
            let error = InvocationError::Usage("Missing required parameter command name.".to_string());
            writeln!(self.stderr, "{}", error)?;
            return Ok(InvocationResult::failed(InvocationStatus::ConversionFailed, error));
        };

        let run = script::program_command(self.settings.program.as_deref());
        script::write_script(&mut *self.stdout, shell, alias, &run)?;
        Ok(InvocationResult::new(InvocationStatus::CompletionScript))
    }

    /// Resolve the first token to exactly one operation, bind the rest and call it
    pub fn invoke(&mut self, args: &Arguments) -> Result<InvocationResult> {
        let input = args.first().map(|t| t.value.as_str()).unwrap_or_default();
        let suggestions = suggest(input, &self.candidates, self.cmp);

        // an operation named in full wins over longer siblings it prefixes
        let cmp = self.cmp;
        let mut exact = suggestions
            .iter()
            .filter(|s| s.operation.is_some() && s.text.len() == input.len() && cmp.eq(&s.text, input));
        let resolved = match (exact.next(), exact.next()) {
            (Some(only), None) => only.clone(),
            _ => return self.unresolved(input, &suggestions),
        };
        let Some(operation) = resolved.operation.clone() else {
            return self.unresolved(input, &suggestions);
        };
        let group = resolved.group.clone();
        debug!(operation = %resolved.text, "invoking");

        let mut instance = if operation.is_static {
            None
        } else {
            Some(self.instance_for(&group)?)
        };

        let values = match self.bind(&operation, args) {
            Ok(values) => values,
            Err(BindError::Definition(e)) => return Err(e.into()),
            Err(e) => return self.binding_failed(e, resolved),
        };

        let call = Call::new(instance.as_deref_mut(), values);
        let value = match operation.invoke(call).and_then(resolve_returned) {
            Ok(value) => value,
            Err(e) => {
                let error = InvocationError::Fault(e);
                writeln!(self.stderr, "{}", error)?;
                return Ok(InvocationResult::failed(InvocationStatus::Faulted, error)
                    .with_operation(group, operation));
            }
        };

        Ok(InvocationResult::new(InvocationStatus::Invoked)
            .with_operation(group, operation)
            .with_value(value))
    }

    fn bind(&self, operation: &Operation, args: &Arguments) -> std::result::Result<Vec<Value>, BindError> {
        let mut slots = SlotSet::create(&operation.parameters, self.cmp, &self.settings.sigils);
        slots.bind(args.iter().skip(1))?;
        slots.finish()
    }

    fn instance_for(&self, group: &CommandGroup) -> DefinitionResult<Box<dyn Any + Send>> {
        if let Some(instance) = self.instances.and_then(|provider| provider(group)) {
            return Ok(instance);
        }

        group
            .create_instance()
            .ok_or_else(|| DefinitionError::NoInstance(group.identity.clone()))
    }

    fn unresolved(&mut self, input: &str, suggestions: &[Suggestion]) -> Result<InvocationResult> {
        let exact = suggestions
            .iter()
            .filter(|s| s.operation.is_some() && self.cmp.eq(&s.text, input))
            .count();

        let error = if input.is_empty() {
            InvocationError::NoMethodSpecified
        } else if exact > 1 {
            InvocationError::AmbiguousMethod(input.to_string())
        } else {
            InvocationError::NoMethodFound(input.to_string())
        };
        debug!(input, %error, "resolution failed");

        let matches_first = suggestions
            .first()
            .is_some_and(|s| self.cmp.eq(&s.text, input));
        if !input.is_empty() && (!matches_first || exact > 1) {
            writeln!(self.stderr, "{}", error)?;
        }
        write_help(&mut *self.stderr, suggestions, self.settings)?;

        let status = match error {
            InvocationError::NoMethodSpecified => InvocationStatus::NoMethodSpecified,
            _ => InvocationStatus::NoMethodFound,
        };
        Ok(InvocationResult::failed(status, error))
    }

    fn binding_failed(&mut self, error: BindError, resolved: Suggestion) -> Result<InvocationResult> {
        let status = match &error {
            BindError::MissingArgument(_) => InvocationStatus::ArgumentMissing,
            BindError::Conversion { .. } => InvocationStatus::ConversionFailed,
            BindError::FileExists { .. } => InvocationStatus::FileExists,
            _ => InvocationStatus::ArgumentInvalid,
        };
        debug!(%error, %status, "binding failed");

        writeln!(self.stderr, "{}", error)?;
        write_help(&mut *self.stderr, std::slice::from_ref(&resolved), self.settings)?;

        let result = match resolved.operation {
            Some(operation) => InvocationResult::failed(status, error.into())
                .with_operation(resolved.group, operation),
            None => InvocationResult::failed(status, error.into()),
        };
        Ok(result)
    }
}

/// Wait for a deferred value; `Unit` becomes no value
fn resolve_returned(returned: Returned) -> anyhow::Result<Option<Value>> {
    match returned {
        Returned::Unit => Ok(None),
        Returned::Value(value) => Ok(Some(value)),
        Returned::Deferred(future) => block_on(future).map(Some),
    }
}
