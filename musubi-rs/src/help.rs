//! Usage listing: the human and machine renderings of the registry.

use serde::Serialize;

use crate::param::{ParamKind, ParamSpec, TypeTag};
use crate::registry::{CommandDescriptor, CommandRegistry};

/// Render the command listing, sorted by name.
///
/// Positional parameters appear as bare names, named options as
/// `[--alias : help]` (alias alone when there is no help text).
/// Injected parameters are not part of the command line and are not
/// listed.
pub fn render(registry: &CommandRegistry) -> String {
    let mut commands: Vec<&CommandDescriptor> = registry.iter().collect();
    commands.sort_by(|a, b| a.name().cmp(b.name()));

    let mut out = String::from("Commands:\n");
    if commands.is_empty() {
        out.push_str("  (none registered)\n");
        return out;
    }
    for descriptor in commands {
        out.push_str("  ");
        out.push_str(descriptor.name());
        for param in descriptor.params() {
            if let Some(rendered) = render_param(param) {
                out.push(' ');
                out.push_str(&rendered);
            }
        }
        out.push('\n');
        if let Some(about) = descriptor.about() {
            out.push_str("      ");
            out.push_str(about);
            out.push('\n');
        }
    }
    out
}

fn render_param(param: &ParamSpec) -> Option<String> {
    match param.kind() {
        ParamKind::Positional { .. } => Some(param.name().to_string()),
        ParamKind::Named { .. } => {
            let alias = param.option_alias()?;
            Some(match param.help_text() {
                Some(help) => format!("[{alias} : {help}]"),
                None => format!("[{alias}]"),
            })
        }
        ParamKind::Injected { .. } => None,
    }
}

#[derive(Serialize)]
struct ParamSummary<'a> {
    name: &'a str,
    kind: &'static str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_tag: Option<TypeTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
    required: bool,
}

#[derive(Serialize)]
struct CommandSummary<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    about: Option<&'a str>,
    params: Vec<ParamSummary<'a>>,
}

/// Machine-readable listing for tooling hosts, sorted like [`render`].
pub fn render_json(registry: &CommandRegistry) -> String {
    let mut commands: Vec<&CommandDescriptor> = registry.iter().collect();
    commands.sort_by(|a, b| a.name().cmp(b.name()));

    let summaries: Vec<CommandSummary<'_>> = commands
        .iter()
        .map(|descriptor| CommandSummary {
            name: descriptor.name(),
            about: descriptor.about(),
            params: descriptor.params().iter().map(summarize_param).collect(),
        })
        .collect();

    serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string())
}

fn summarize_param(param: &ParamSpec) -> ParamSummary<'_> {
    let (kind, required) = match param.kind() {
        ParamKind::Positional { .. } => ("positional", param.default_value().is_none()),
        ParamKind::Named { tag: TypeTag::Bool, .. } => ("option", false),
        ParamKind::Named { .. } => ("option", param.default_value().is_none()),
        ParamKind::Injected { .. } => ("injected", false),
    };
    ParamSummary {
        name: param.name(),
        kind,
        type_tag: param.tag(),
        alias: param.option_alias(),
        help: param.help_text(),
        required,
    }
}
