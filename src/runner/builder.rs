//! Runner configuration
//!
//! A [`Runner`] owns the catalog, the settings and both text sinks, and can be
//! run any number of times.

use crate::catalog::CommandGroup;
use crate::config::Settings;
use crate::error::Result;
use crate::resolve::Arguments;
use crate::runner::invocation::Invocation;
use crate::runner::sink::Sink;
use crate::runner::InvocationResult;
use std::any::Any;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

/// Supplies the instance a non-static operation runs on
pub type InstanceProvider = Arc<dyn Fn(&CommandGroup) -> Option<Box<dyn Any + Send>> + Send + Sync>;

/// A configured command engine
pub struct Runner {
    groups: Vec<Arc<CommandGroup>>,
    settings: Settings,
    instances: Option<InstanceProvider>,
    stdout: Sink,
    stderr: Sink,
}

impl Runner {
    /// Start configuring a runner
    pub fn configure() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn groups(&self) -> &[Arc<CommandGroup>] {
        &self.groups
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run with pre-split arguments, as found in `std::env::args()`.
    ///
    /// User mistakes are reported on the returned result; only catalog
    /// definition problems and sink failures come back as `Err`.
    pub fn run<I, S>(&mut self, args: I) -> Result<InvocationResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let skip = usize::from(self.settings.skip_initial);
        let args = Arguments::from_args(args.into_iter().skip(skip).map(Into::into));
        debug!(groups = self.groups.len(), "running");

        let mut invocation = Invocation::new(
            &self.groups,
            &self.settings,
            self.instances.as_ref(),
            self.stdout.as_mut(),
            self.stderr.as_mut(),
        );
        invocation.run(args)
    }
}

/// Fluent builder for [`Runner`]
pub struct RunnerBuilder {
    groups: Vec<Arc<CommandGroup>>,
    settings: Settings,
    instances: Option<InstanceProvider>,
    stdout: Option<Sink>,
    stderr: Option<Sink>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        RunnerBuilder {
            groups: Vec::new(),
            settings: Settings::default(),
            instances: None,
            stdout: None,
            stderr: None,
        }
    }

    pub fn with_group(mut self, group: Arc<CommandGroup>) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = Arc<CommandGroup>>,
    {
        self.groups.extend(groups);
        self
    }

    /// Provide instances for non-static operations, ahead of group factories
    pub fn with_instance_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&CommandGroup) -> Option<Box<dyn Any + Send>> + Send + Sync + 'static,
    {
        self.instances = Some(Arc::new(provider));
        self
    }

    pub fn with_stdout<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.stdout = Some(Box::new(writer));
        self
    }

    pub fn with_stderr<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.stderr = Some(Box::new(writer));
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Runner {
        Runner {
            groups: self.groups,
            settings: self.settings,
            instances: self.instances,
            stdout: self.stdout.unwrap_or_else(|| Box::new(io::stdout())),
            stderr: self.stderr.unwrap_or_else(|| Box::new(io::stderr())),
        }
    }

    /// Build and run once
    pub fn run<I, S>(self, args: I) -> Result<InvocationResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build().run(args)
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
