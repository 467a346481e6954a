//! Defaulting, requiredness validation, and injection fill.
//!
//! Runs after the token parser, in declared parameter order. The first
//! missing-required condition aborts the whole dispatch; the handler is
//! never invoked on a partial vector.

use crate::inject::Injector;
use crate::param::{ParamKind, ParamSpec, TypeTag};
use crate::value::Value;
use crate::{CliError, CliResult, UserError};

/// Resolve every still-unset bindable slot.
///
/// An unset boolean option becomes its declared default, else `false`.
/// Any other unset slot takes its declared default or fails with the
/// matching missing-required error. Injected slots are not touched.
pub(crate) fn apply_defaults(
    slots: &mut [Option<Value>],
    params: &[ParamSpec],
) -> Result<(), UserError> {
    for (idx, param) in params.iter().enumerate() {
        if slots[idx].is_some() {
            continue;
        }
        match param.kind() {
            ParamKind::Injected { .. } => {}
            ParamKind::Named { tag: TypeTag::Bool, .. } => {
                slots[idx] = param
                    .default_value()
                    .cloned()
                    .or(Some(Value::Bool(false)));
            }
            ParamKind::Named { .. } => match param.default_value() {
                Some(value) => slots[idx] = Some(value.clone()),
                None => {
                    let alias = param
                        .option_alias()
                        .unwrap_or_else(|| param.name().to_string());
                    return Err(UserError::MissingOption(alias));
                }
            },
            ParamKind::Positional { .. } => match param.default_value() {
                Some(value) => slots[idx] = Some(value.clone()),
                None => return Err(UserError::MissingArgument(param.name().to_string())),
            },
        }
    }
    Ok(())
}

/// Fill injected slots from the container and assemble the final
/// argument vector, one value per declared parameter.
pub(crate) fn finalize(
    slots: Vec<Option<Value>>,
    params: &[ParamSpec],
    injector: &Injector,
) -> CliResult<Vec<Value>> {
    let mut vector = Vec::with_capacity(slots.len());
    for (slot, param) in slots.into_iter().zip(params) {
        match (slot, param.kind()) {
            (_, ParamKind::Injected { type_id, type_name }) => {
                let resolved = injector.resolve_raw(*type_id);
                if resolved.is_none() {
                    tracing::debug!(
                        service = type_name,
                        "Injection miss; handler receives an absent service"
                    );
                }
                vector.push(Value::Service(resolved));
            }
            (Some(value), _) => vector.push(value),
            (None, _) => {
                return Err(CliError::system(format!(
                    "parameter '{}' left unset after defaulting",
                    param.name()
                )))
            }
        }
    }
    Ok(vector)
}
