//! Parameter descriptors, classification, and the per-dispatch binding plan.
//!
//! A command declares its parameters once, at registration time, as a
//! list of [`ParamSpec`]. Each spec states its role outright: bound
//! from tokens positionally, bound through a `--name` option, or
//! resolved from the injector. Classification into the three binding
//! partitions is therefore pure bookkeeping; no runtime introspection
//! is involved and no errors are possible.

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::value::Value;

/// Bindable primitive types. Anything else a handler wants is a
/// service and comes from the injector, never from tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Str,
    Bool,
    Int,
    Float,
}

/// Classification of a declared parameter.
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// Fills the next unfilled positional slot, in declaration order.
    Positional { tag: TypeTag },
    /// Addressed from the command line by a `--` alias.
    Named {
        tag: TypeTag,
        alias: Option<String>,
        help: Option<String>,
    },
    /// Resolved from the injector; never bound from tokens.
    Injected {
        type_id: TypeId,
        type_name: &'static str,
    },
}

/// One declared handler parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
}

impl ParamSpec {
    /// A positional parameter of the given type.
    pub fn positional(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Positional { tag },
            default: None,
        }
    }

    /// A named option of the given type, addressed as `--name`
    /// (kebab-cased) unless an alias override is set.
    pub fn named(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Named {
                tag,
                alias: None,
                help: None,
            },
            default: None,
        }
    }

    /// A boolean named option. Present without a value means `true`;
    /// unset means `false` unless a default says otherwise.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::named(name, TypeTag::Bool)
    }

    /// A parameter resolved from the injector by type.
    pub fn injected<T: Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Injected {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
            },
            default: None,
        }
    }

    /// Override the option alias (used verbatim, without kebab-casing).
    /// Ignored unless the parameter is a named option.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        if let ParamKind::Named { alias: slot, .. } = &mut self.kind {
            *slot = Some(alias.into());
        }
        self
    }

    /// Help text shown in the listing. Ignored unless the parameter is
    /// a named option.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        if let ParamKind::Named { help, .. } = &mut self.kind {
            *help = Some(text.into());
        }
        self
    }

    /// Declared default, used when no token bound the slot. Ignored
    /// for injected parameters, which the defaulting pass never touches.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        if !matches!(self.kind, ParamKind::Injected { .. }) {
            self.default = Some(value.into());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn help_text(&self) -> Option<&str> {
        match &self.kind {
            ParamKind::Named { help, .. } => help.as_deref(),
            _ => None,
        }
    }

    /// The full `--` alias addressing this parameter, if it is a named
    /// option: the explicit non-empty override verbatim, otherwise the
    /// parameter name kebab-cased.
    pub fn option_alias(&self) -> Option<String> {
        match &self.kind {
            ParamKind::Named { alias, .. } => {
                let body = match alias {
                    Some(a) if !a.is_empty() => a.clone(),
                    _ => kebab_case(&self.name),
                };
                Some(format!("--{body}"))
            }
            _ => None,
        }
    }

    pub(crate) fn tag(&self) -> Option<TypeTag> {
        match &self.kind {
            ParamKind::Positional { tag } | ParamKind::Named { tag, .. } => Some(*tag),
            ParamKind::Injected { .. } => None,
        }
    }
}

/// Insert `-` before an interior uppercase letter that is preceded or
/// followed by a lowercase letter, then lowercase everything.
fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && (prev_lower || next_lower) {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Per-dispatch partition of a command's parameters.
///
/// Built fresh for every dispatch; every declared parameter lands in
/// exactly one partition. The positional queue is consumed by the
/// token parser, in declaration order.
pub(crate) struct BindingPlan {
    pub positional: VecDeque<usize>,
    pub named: HashMap<String, usize>,
    pub external: Vec<usize>,
}

impl BindingPlan {
    pub fn build(params: &[ParamSpec]) -> Self {
        let mut plan = BindingPlan {
            positional: VecDeque::new(),
            named: HashMap::new(),
            external: Vec::new(),
        };
        for (idx, param) in params.iter().enumerate() {
            match &param.kind {
                ParamKind::Positional { .. } => plan.positional.push_back(idx),
                ParamKind::Named { .. } => {
                    if let Some(alias) = param.option_alias() {
                        // first declaration of an alias wins, matching
                        // registry lookup semantics
                        plan.named.entry(alias).or_insert(idx);
                    }
                }
                ParamKind::Injected { .. } => plan.external.push(idx),
            }
        }
        plan
    }
}
