//! Token parsing: the left-to-right walk over argv after the command name.
//!
//! Each token is consumed at most once and there is no backtracking: a
//! failed conversion leaves its slot unset rather than retrying the
//! token against another slot. `--` tokens route through the plan's
//! alias map; everything else feeds the positional queue. Unknown
//! options are skipped without a report and without swallowing the
//! token after them.

use crate::param::{BindingPlan, ParamSpec, TypeTag};
use crate::value::{parse_bool_literal, try_convert, Value};

/// Walk `tokens` against the plan, partially filling one slot per
/// declared parameter. Unset slots are resolved (or rejected) by the
/// defaulting pass afterwards.
pub(crate) fn fill(
    mut plan: BindingPlan,
    params: &[ParamSpec],
    tokens: &[String],
) -> Vec<Option<Value>> {
    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token.starts_with("--") {
            let Some(&idx) = plan.named.get(token.as_str()) else {
                tracing::debug!(token = %token, "Ignoring unknown option");
                i += 1;
                continue;
            };
            let Some(tag) = params[idx].tag() else {
                i += 1;
                continue;
            };
            if tag == TypeTag::Bool {
                // A flag consumes a following token only when it is a
                // boolean literal and not itself option-shaped; any
                // other neighbor is left for the positional queue.
                if let Some(next) = tokens.get(i + 1) {
                    if !next.starts_with("--") {
                        if let Some(flag) = parse_bool_literal(next) {
                            slots[idx] = Some(Value::Bool(flag));
                            i += 2;
                            continue;
                        }
                    }
                }
                slots[idx] = Some(Value::Bool(true));
                i += 1;
            } else {
                match tokens.get(i + 1) {
                    Some(next) if !next.starts_with("--") => {
                        // a failed conversion leaves the slot unset
                        if let Some(value) = try_convert(next, tag) {
                            slots[idx] = Some(value);
                        }
                        i += 2;
                    }
                    // value token absent or option-shaped: slot stays
                    // unset and surfaces later if no default exists
                    _ => i += 1,
                }
            }
        } else {
            match plan.positional.pop_front() {
                Some(idx) => {
                    if let Some(tag) = params[idx].tag() {
                        if let Some(value) = try_convert(token, tag) {
                            slots[idx] = Some(value);
                        }
                    }
                }
                None => {
                    tracing::debug!(token = %token, "Dropping excess positional token");
                }
            }
            i += 1;
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn run(params: &[ParamSpec], argv: &[&str]) -> Vec<Option<Value>> {
        fill(BindingPlan::build(params), params, &tokens(argv))
    }

    #[test]
    fn test_positionals_fill_in_declared_order() {
        let params = vec![
            ParamSpec::positional("src", TypeTag::Str),
            ParamSpec::positional("count", TypeTag::Int),
        ];
        let slots = run(&params, &["input.txt", "3"]);
        assert_eq!(slots[0], Some(Value::Str("input.txt".into())));
        assert_eq!(slots[1], Some(Value::Int(3)));
    }

    #[test]
    fn test_excess_positional_tokens_dropped() {
        let params = vec![ParamSpec::positional("only", TypeTag::Str)];
        let slots = run(&params, &["a", "b", "c"]);
        assert_eq!(slots[0], Some(Value::Str("a".into())));
    }

    #[test]
    fn test_failed_positional_conversion_advances_the_queue() {
        let params = vec![
            ParamSpec::positional("count", TypeTag::Int),
            ParamSpec::positional("name", TypeTag::Str),
        ];
        // "abc" is spent on the count slot and fails; it is not retried
        // against the string slot
        let slots = run(&params, &["abc", "ok"]);
        assert_eq!(slots[0], None);
        assert_eq!(slots[1], Some(Value::Str("ok".into())));
    }

    #[test]
    fn test_named_option_binds_following_token() {
        let params = vec![ParamSpec::named("level", TypeTag::Int)];
        let slots = run(&params, &["--level", "7"]);
        assert_eq!(slots[0], Some(Value::Int(7)));
    }

    #[test]
    fn test_named_option_without_value_stays_unset() {
        let params = vec![ParamSpec::named("level", TypeTag::Int)];
        assert_eq!(run(&params, &["--level"])[0], None);
    }

    #[test]
    fn test_named_option_never_consumes_option_shaped_value() {
        let params = vec![
            ParamSpec::named("name", TypeTag::Str),
            ParamSpec::flag("force"),
        ];
        let slots = run(&params, &["--name", "--force"]);
        assert_eq!(slots[0], None);
        assert_eq!(slots[1], Some(Value::Bool(true)));
    }

    #[test]
    fn test_flag_alone_binds_true() {
        let params = vec![ParamSpec::flag("force")];
        assert_eq!(run(&params, &["--force"])[0], Some(Value::Bool(true)));
    }

    #[test]
    fn test_flag_with_explicit_literal() {
        let params = vec![ParamSpec::flag("force")];
        assert_eq!(run(&params, &["--force", "false"])[0], Some(Value::Bool(false)));
        assert_eq!(run(&params, &["--force", "TRUE"])[0], Some(Value::Bool(true)));
    }

    #[test]
    fn test_flag_leaves_non_literal_token_for_positionals() {
        let params = vec![
            ParamSpec::positional("name", TypeTag::Str),
            ParamSpec::flag("shout"),
        ];
        let slots = run(&params, &["--shout", "alice"]);
        assert_eq!(slots[0], Some(Value::Str("alice".into())));
        assert_eq!(slots[1], Some(Value::Bool(true)));
    }

    #[test]
    fn test_flag_never_misreads_option_shaped_neighbor() {
        let params = vec![
            ParamSpec::flag("verbose"),
            ParamSpec::named("level", TypeTag::Int),
        ];
        let slots = run(&params, &["--verbose", "--level", "2"]);
        assert_eq!(slots[0], Some(Value::Bool(true)));
        assert_eq!(slots[1], Some(Value::Int(2)));
    }

    #[test]
    fn test_unknown_option_skipped_without_eating_value() {
        let params = vec![ParamSpec::positional("name", TypeTag::Str)];
        let slots = run(&params, &["--bogus", "alice"]);
        assert_eq!(slots[0], Some(Value::Str("alice".into())));
    }

    #[test]
    fn test_malformed_option_value_is_consumed_but_unset() {
        let params = vec![
            ParamSpec::named("count", TypeTag::Int),
            ParamSpec::positional("name", TypeTag::Str),
        ];
        // "abc" is consumed as the option's value even though it fails
        // to convert; it never reaches the positional queue
        let slots = run(&params, &["--count", "abc", "bob"]);
        assert_eq!(slots[0], None);
        assert_eq!(slots[1], Some(Value::Str("bob".into())));
    }
}
