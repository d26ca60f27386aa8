//! Command groups and their operations

use crate::catalog::{Call, ParameterSpec, Returned};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Operation implementation
pub type Handler = Arc<dyn Fn(Call<'_>) -> anyhow::Result<Returned> + Send + Sync>;

/// Builds the instance a non-static operation runs on
pub type Factory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Declared return shape of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKind {
    #[default]
    None,
    Value,
    Deferred,
}

/// A single invokable unit
#[derive(Clone)]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<ParameterSpec>,
    pub is_static: bool,
    pub returns: ReturnKind,
    /// Overridable operations may be redefined by an extending group
    pub overridable: bool,
    pub description: Option<String>,
    handler: Handler,
}

impl Operation {
    /// An operation that runs on an instance of its group
    pub fn instance<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Call<'_>) -> anyhow::Result<Returned> + Send + Sync + 'static,
    {
        Operation {
            name: name.into(),
            parameters: Vec::new(),
            is_static: false,
            returns: ReturnKind::None,
            overridable: false,
            description: None,
            handler: Arc::new(handler),
        }
    }

    /// An operation that needs no instance
    pub fn associated<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Call<'_>) -> anyhow::Result<Returned> + Send + Sync + 'static,
    {
        Operation {
            is_static: true,
            ..Operation::instance(name, handler)
        }
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn returns(mut self, kind: ReturnKind) -> Self {
        self.returns = kind;
        self
    }

    pub fn overridable(mut self) -> Self {
        self.overridable = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn invoke(&self, call: Call<'_>) -> anyhow::Result<Returned> {
        (self.handler)(call)
    }

    /// Same name and same parameter types
    pub fn same_signature(&self, other: &Operation) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty.display_name() == b.ty.display_name())
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("is_static", &self.is_static)
            .field("returns", &self.returns)
            .finish()
    }
}

/// A bundle of related operations
///
/// Groups are compared by identity (`Arc::ptr_eq`), never by name: two groups
/// may share a display name until the candidate index compresses them.
#[derive(Clone)]
pub struct CommandGroup {
    /// Dotted, fully-qualified identity
    pub identity: String,
    pub description: Option<String>,
    pub operations: Vec<Arc<Operation>>,
    pub base: Option<Arc<CommandGroup>>,
    pub universal_root: bool,
    pub documentation: Option<PathBuf>,
    factory: Option<Factory>,
}

impl CommandGroup {
    pub fn new(identity: impl Into<String>) -> Self {
        CommandGroup {
            identity: identity.into(),
            description: None,
            operations: Vec::new(),
            base: None,
            universal_root: false,
            documentation: None,
            factory: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(Arc::new(operation));
        self
    }

    /// Inherit the operations of `base`
    pub fn extends(mut self, base: Arc<CommandGroup>) -> Self {
        self.base = Some(base);
        self
    }

    /// Mark this group as the root every other group implicitly derives from.
    /// Operations that resolve to it are never offered.
    pub fn universal(mut self) -> Self {
        self.universal_root = true;
        self
    }

    pub fn documented_by(mut self, path: impl Into<PathBuf>) -> Self {
        self.documentation = Some(path.into());
        self
    }

    pub fn factory<T, F>(mut self, f: F) -> Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(move || Box::new(f()) as Box<dyn Any + Send>));
        self
    }

    pub fn build(self) -> Arc<CommandGroup> {
        Arc::new(self)
    }

    pub fn create_instance(&self) -> Option<Box<dyn Any + Send>> {
        self.factory.as_ref().map(|f| f())
    }

    /// All operations offered by this group, own ones first, then inherited ones.
    ///
    /// An inherited operation that an extending group redefines appears once.
    /// Operations whose effective declaring level is the universal root are left out.
    pub fn invokable_operations(&self) -> Vec<Arc<Operation>> {
        let mut seen: Vec<Arc<Operation>> = Vec::new();
        let mut result = Vec::new();
        let mut level = Some(self);

        while let Some(group) = level {
            for op in &group.operations {
                if seen.iter().any(|s| s.same_signature(op)) {
                    continue;
                }
                seen.push(op.clone());

                if !group.declaring_level(op).universal_root {
                    result.push(op.clone());
                }
            }
            level = group.base.as_deref();
        }

        result
    }

    /// Walk up through the bases while `op` keeps resolving to an override
    fn declaring_level<'a>(&'a self, op: &Operation) -> &'a CommandGroup {
        let mut level = self;
        if !op.overridable {
            return level;
        }

        while let Some(base) = level.base.as_deref() {
            if !base.operations.iter().any(|b| b.same_signature(op)) {
                break;
            }
            level = base;
        }
        level
    }
}

impl fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandGroup")
            .field("identity", &self.identity)
            .field("operations", &self.operations.len())
            .field("base", &self.base.as_ref().map(|b| b.identity.clone()))
            .finish()
    }
}
