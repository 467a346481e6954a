//! The command capability: invocation contract and dispatch context.
//!
//! A registered command is anything implementing [`Command`]. Most
//! commands come from registration closures wrapped by the builder;
//! hand-written implementations are the escape hatch for hosts that
//! generate commands some other way.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::inject::Injector;
use crate::value::Value;
use crate::{CliError, CliResult};

/// Boxed future returned by [`Command::invoke`].
pub type CommandFuture = Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'static>>;

/// How many argument slots a handler consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// One slot per declared parameter; checked against the descriptor
    /// before invocation. A mismatch is a fatal configuration error.
    Exact(usize),
    /// The handler takes the resolver and the raw vector through the
    /// context; the declared-count check is skipped.
    Raw,
}

/// A dispatchable command handler.
pub trait Command: Send + Sync {
    fn arity(&self) -> Arity;

    fn invoke(&self, ctx: DispatchContext) -> CommandFuture;
}

/// Everything a handler invocation receives: the fully assembled
/// argument vector (one slot per declared parameter, in declaration
/// order) and the injection resolver.
pub struct DispatchContext {
    args: Vec<Value>,
    injector: Injector,
}

impl DispatchContext {
    pub(crate) fn new(args: Vec<Value>, injector: Injector) -> Self {
        Self { args, injector }
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    fn slot(&self, index: usize) -> CliResult<&Value> {
        self.args.get(index).ok_or_else(|| {
            CliError::system(format!(
                "argument slot {index} out of range ({} declared)",
                self.args.len()
            ))
        })
    }

    fn mismatch(index: usize, expected: &str, got: &Value) -> CliError {
        CliError::system(format!(
            "argument slot {index} holds a {} (expected {expected})",
            got.type_label()
        ))
    }

    pub fn string(&self, index: usize) -> CliResult<&str> {
        match self.slot(index)? {
            Value::Str(s) => Ok(s),
            other => Err(Self::mismatch(index, "string", other)),
        }
    }

    pub fn boolean(&self, index: usize) -> CliResult<bool> {
        match self.slot(index)? {
            Value::Bool(b) => Ok(*b),
            other => Err(Self::mismatch(index, "boolean", other)),
        }
    }

    pub fn integer(&self, index: usize) -> CliResult<i64> {
        match self.slot(index)? {
            Value::Int(n) => Ok(*n),
            other => Err(Self::mismatch(index, "integer", other)),
        }
    }

    pub fn float(&self, index: usize) -> CliResult<f64> {
        match self.slot(index)? {
            Value::Float(x) => Ok(*x),
            other => Err(Self::mismatch(index, "float", other)),
        }
    }

    /// The service bound to an injected slot. `Ok(None)` means the
    /// container had no provider for the type; the handler sees the
    /// absence as-is.
    pub fn service<T: Any + Send + Sync>(&self, index: usize) -> CliResult<Option<Arc<T>>> {
        match self.slot(index)? {
            Value::Service(None) => Ok(None),
            Value::Service(Some(handle)) => {
                handle.clone().downcast::<T>().map(Some).map_err(|_| {
                    CliError::system(format!(
                        "argument slot {index} holds a service of a different type"
                    ))
                })
            }
            other => Err(Self::mismatch(index, "service", other)),
        }
    }
}

pub(crate) type BoxedHandler = Arc<dyn Fn(DispatchContext) -> CommandFuture + Send + Sync>;

/// Closure-backed command produced by the registration builder.
pub(crate) struct FnCommand {
    arity: Arity,
    f: BoxedHandler,
}

impl FnCommand {
    pub fn new(arity: Arity, f: BoxedHandler) -> Self {
        Self { arity, f }
    }
}

impl Command for FnCommand {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn invoke(&self, ctx: DispatchContext) -> CommandFuture {
        (self.f)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(args: Vec<Value>) -> DispatchContext {
        DispatchContext::new(args, Injector::new())
    }

    #[test]
    fn test_typed_accessors() {
        let ctx = ctx(vec![
            Value::Str("hello".into()),
            Value::Bool(true),
            Value::Int(-3),
            Value::Float(1.5),
        ]);
        assert_eq!(ctx.string(0).expect("string"), "hello");
        assert!(ctx.boolean(1).expect("boolean"));
        assert_eq!(ctx.integer(2).expect("integer"), -3);
        assert_eq!(ctx.float(3).expect("float"), 1.5);
    }

    #[test]
    fn test_out_of_range_is_system_error() {
        let ctx = ctx(vec![]);
        let err = ctx.string(0).expect_err("should fail");
        assert_eq!(err.exit_code(), 101);
    }

    #[test]
    fn test_type_mismatch_is_system_error() {
        let ctx = ctx(vec![Value::Int(1)]);
        let err = ctx.string(0).expect_err("should fail");
        assert_eq!(err.exit_code(), 101);
    }

    #[test]
    fn test_absent_service_is_ok_none() {
        let ctx = ctx(vec![Value::Service(None)]);
        assert!(ctx.service::<u32>(0).expect("service").is_none());
    }

    #[test]
    fn test_service_downcast() {
        let handle: crate::value::ServiceHandle = Arc::new(41_u32);
        let ctx = ctx(vec![Value::Service(Some(handle))]);
        assert_eq!(ctx.service::<u32>(0).expect("service").as_deref(), Some(&41));
        let err = ctx.service::<String>(0).expect_err("wrong type");
        assert_eq!(err.exit_code(), 101);
    }
}
