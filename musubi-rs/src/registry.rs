//! Command registration: descriptors, the builder, and the registry.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use crate::command::{Arity, BoxedHandler, Command, CommandFuture, DispatchContext, FnCommand};
use crate::param::{ParamSpec, TypeTag};
use crate::value::Value;
use crate::CliResult;

/// Immutable record of one registered command: name, about text,
/// declared parameters, and the handler. Owned by the registry.
pub struct CommandDescriptor {
    name: String,
    about: Option<String>,
    params: Vec<ParamSpec>,
    command: Arc<dyn Command>,
}

impl CommandDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub(crate) fn command(&self) -> &Arc<dyn Command> {
        &self.command
    }
}

enum HandlerSlot {
    Fn(BoxedHandler),
    Raw(BoxedHandler),
    Custom(Arc<dyn Command>),
}

/// Builder for one command registration.
///
/// Parameters are declared explicitly, in the order the handler reads
/// them back out of the context. Registration mistakes (no handler, or
/// metadata applied before any parameter exists) are programming
/// errors and panic.
///
/// ```rust,ignore
/// registry.register(
///     CommandSpec::new("deploy")
///         .about("Deploy an application")
///         .positional("app", TypeTag::Str)
///         .named("replicas", TypeTag::Int).default(1)
///         .flag("force").help("Skip the confirmation prompt")
///         .handler(|ctx| async move {
///             // app = ctx.string(0)?, replicas = ctx.integer(1)?, ...
///             Ok(())
///         }),
/// );
/// ```
pub struct CommandSpec {
    name: String,
    about: Option<String>,
    params: Vec<ParamSpec>,
    handler: Option<HandlerSlot>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            params: Vec::new(),
            handler: None,
        }
    }

    /// Short description shown in the listing.
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = Some(text.into());
        self
    }

    /// Append a fully built parameter spec.
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn positional(self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.param(ParamSpec::positional(name, tag))
    }

    pub fn named(self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.param(ParamSpec::named(name, tag))
    }

    pub fn flag(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::flag(name))
    }

    pub fn injected<T: Any + Send + Sync>(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::injected::<T>(name))
    }

    fn map_last(mut self, what: &str, f: impl FnOnce(ParamSpec) -> ParamSpec) -> Self {
        match self.params.pop() {
            Some(last) => {
                self.params.push(f(last));
                self
            }
            None => panic!(
                "command '{}': {what} applies to a parameter, but none was declared yet",
                self.name
            ),
        }
    }

    /// Alias override for the most recently declared parameter.
    pub fn alias(self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.map_last("alias", move |p| p.alias(alias))
    }

    /// Help text for the most recently declared parameter.
    pub fn help(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.map_last("help", move |p| p.help(text))
    }

    /// Default value for the most recently declared parameter.
    pub fn default(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.map_last("default", move |p| p.default(value))
    }

    /// Register the handler closure. It consumes one slot per declared
    /// parameter; the dispatcher verifies the count before invoking.
    pub fn handler<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(DispatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CliResult<()>> + Send + 'static,
    {
        let f: BoxedHandler = Arc::new(move |ctx: DispatchContext| -> CommandFuture {
            Box::pin(f(ctx))
        });
        self.handler = Some(HandlerSlot::Fn(f));
        self
    }

    /// Register a raw handler: takes the resolver plus the full vector
    /// through the context, skipping the declared-count check.
    pub fn handler_raw<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(DispatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CliResult<()>> + Send + 'static,
    {
        let f: BoxedHandler = Arc::new(move |ctx: DispatchContext| -> CommandFuture {
            Box::pin(f(ctx))
        });
        self.handler = Some(HandlerSlot::Raw(f));
        self
    }

    /// Register a hand-written [`Command`] implementation.
    pub fn command(mut self, command: impl Command + 'static) -> Self {
        self.handler = Some(HandlerSlot::Custom(Arc::new(command)));
        self
    }

    pub(crate) fn build(self) -> CommandDescriptor {
        let command: Arc<dyn Command> = match self.handler {
            Some(HandlerSlot::Fn(f)) => {
                Arc::new(FnCommand::new(Arity::Exact(self.params.len()), f))
            }
            Some(HandlerSlot::Raw(f)) => Arc::new(FnCommand::new(Arity::Raw, f)),
            Some(HandlerSlot::Custom(command)) => command,
            None => panic!("command '{}' registered without a handler", self.name),
        };
        CommandDescriptor {
            name: self.name,
            about: self.about,
            params: self.params,
            command,
        }
    }
}

/// Explicit command enumeration: a type that knows how to register a
/// batch of related commands. Handlers that need the declaring service
/// resolve it through the injector at invocation time.
pub trait CommandSet {
    fn commands(self) -> Vec<CommandSpec>;
}

/// Append-only, ordered command collection. Lookup is case-sensitive
/// and takes the first match, so duplicate names are tolerated but
/// only the earliest registration is reachable.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one command.
    pub fn register(&mut self, spec: CommandSpec) -> &mut Self {
        let descriptor = spec.build();
        if self.find(descriptor.name()).is_some() {
            tracing::warn!(
                command = %descriptor.name(),
                "Duplicate command name; first registration wins"
            );
        }
        tracing::debug!(
            command = %descriptor.name(),
            params = descriptor.params().len(),
            "Command registered"
        );
        self.commands.push(descriptor);
        self
    }

    /// Register every command a set enumerates, in order.
    pub fn install(&mut self, set: impl CommandSet) -> &mut Self {
        for spec in set.commands() {
            self.register(spec);
        }
        self
    }

    /// Case-sensitive exact lookup; first match wins.
    pub fn find(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> CommandSpec {
        CommandSpec::new(name).handler(|_ctx| async { Ok(()) })
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("status"));

        assert_eq!(registry.len(), 1);
        assert!(registry.find("status").is_some());
        assert!(registry.find("Status").is_none());
    }

    #[test]
    fn test_duplicate_names_first_match_wins() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("status").about("first"));
        registry.register(noop("status").about("second"));

        assert_eq!(registry.len(), 2);
        let found = registry.find("status").expect("should find");
        assert_eq!(found.about(), Some("first"));
    }

    #[test]
    fn test_install_registers_in_order() {
        struct Ops;
        impl CommandSet for Ops {
            fn commands(self) -> Vec<CommandSpec> {
                vec![noop("start"), noop("stop")]
            }
        }

        let mut registry = CommandRegistry::new();
        registry.install(Ops);

        let names: Vec<&str> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["start", "stop"]);
    }

    #[test]
    fn test_closure_arity_matches_declared_parameters() {
        let descriptor = CommandSpec::new("sum")
            .positional("a", TypeTag::Int)
            .positional("b", TypeTag::Int)
            .handler(|_ctx| async { Ok(()) })
            .build();
        assert_eq!(descriptor.command().arity(), Arity::Exact(2));
    }

    #[test]
    fn test_raw_handler_arity() {
        let descriptor = CommandSpec::new("inspect")
            .positional("a", TypeTag::Str)
            .handler_raw(|_ctx| async { Ok(()) })
            .build();
        assert_eq!(descriptor.command().arity(), Arity::Raw);
    }

    #[test]
    #[should_panic(expected = "registered without a handler")]
    fn test_missing_handler_panics() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandSpec::new("broken"));
    }

    #[test]
    #[should_panic(expected = "none was declared yet")]
    fn test_metadata_before_any_parameter_panics() {
        let _ = CommandSpec::new("broken").help("dangling");
    }
}
