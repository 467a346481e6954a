//! Dispatch: argv in, handler invocation, exit status out.

use crate::bind;
use crate::command::{Arity, DispatchContext};
use crate::help;
use crate::inject::Injector;
use crate::param::BindingPlan;
use crate::parse;
use crate::registry::CommandRegistry;
use crate::{Response, UserError};

/// Binds argv against the registry and runs the matched handler.
///
/// One command is resolved and run per invocation. The registry and
/// the injector are read-only from here on; the only suspension point
/// is the handler's own future, which the dispatcher awaits before
/// reporting the exit status.
pub struct Dispatcher {
    registry: CommandRegistry,
    injector: Injector,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            injector: Injector::new(),
        }
    }

    pub fn with_injector(registry: CommandRegistry, injector: Injector) -> Self {
        Self { registry, injector }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// Dispatch one raw argument list, command name first.
    ///
    /// No command yields the listing with exit 0; an unknown command
    /// yields a diagnostic plus the listing with exit 1; a missing
    /// required value yields its message alone with exit 1 and the
    /// handler is never invoked.
    pub async fn dispatch(&self, argv: &[String]) -> Response {
        let Some(name) = argv.first() else {
            return Response::text(help::render(&self.registry));
        };
        let Some(descriptor) = self.registry.find(name) else {
            tracing::debug!(command = %name, "Unknown command");
            return Response::error(
                1,
                format!(
                    "{}\n\n{}",
                    UserError::UnknownCommand(name.clone()),
                    help::render(&self.registry)
                ),
            );
        };
        tracing::debug!(command = %name, "Dispatching");

        let params = descriptor.params();
        let plan = BindingPlan::build(params);
        let mut slots = parse::fill(plan, params, &argv[1..]);

        if let Err(err) = bind::apply_defaults(&mut slots, params) {
            tracing::debug!(command = %name, error = %err, "Binding rejected");
            return Response::error(1, err.to_string());
        }
        let vector = match bind::finalize(slots, params, &self.injector) {
            Ok(vector) => vector,
            Err(err) => return Response::error(err.exit_code(), err.to_string()),
        };

        // Fatal configuration error, deliberately uncaught: a handler
        // that consumes a fixed number of slots must agree with its
        // descriptor.
        if let Arity::Exact(count) = descriptor.command().arity() {
            if count != params.len() {
                panic!(
                    "command '{name}': handler consumes {count} argument slots \
                     but {} parameters are declared",
                    params.len()
                );
            }
        }

        let ctx = DispatchContext::new(vector, self.injector.clone());
        match descriptor.command().invoke(ctx).await {
            Ok(()) => Response::silent(),
            Err(err) => {
                tracing::debug!(command = %name, error = %err, "Handler failed");
                Response::error(err.exit_code(), err.to_string())
            }
        }
    }

    /// Read `std::env::args`, dispatch, emit the response, and return
    /// the exit code for `std::process::exit`.
    pub async fn run(&self) -> i32 {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        let response = self.dispatch(&argv).await;
        response.emit();
        response.exit_code
    }
}
