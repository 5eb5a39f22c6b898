// Command Builder
//
// Walks an operation's argument template and renders validated parameters
// into the argument string for the external program.

use crate::domain::{ArgSpec, CommandLine, OperationDescriptor, ParamValue, Params};

/// Build the argument string for one call.
///
/// Absent optional parameters vanish together with their flag. Strings are
/// double-quoted and escaped; numbers and enum variants go in bare.
pub fn build_command(descriptor: &OperationDescriptor, params: &Params) -> CommandLine {
    let mut line = CommandLine::new("");

    for spec in &descriptor.template {
        match *spec {
            ArgSpec::Literal(token) => line.push_bare(token),
            ArgSpec::Positional(name) => {
                if let Some(value) = params.get(name) {
                    push_value(&mut line, value);
                }
            }
            ArgSpec::Flag(flag, name) => {
                if let Some(value) = params.get(name) {
                    line.push_bare(flag);
                    push_value(&mut line, value);
                }
            }
            ArgSpec::Switch(flag, name) => {
                if let Some(ParamValue::Bool(true)) = params.get(name) {
                    line.push_bare(flag);
                }
            }
            ArgSpec::Repeated(flag, name) => match params.get(name) {
                Some(ParamValue::List(items)) => {
                    for item in items {
                        line.push_bare(flag);
                        line.push_quoted(item);
                    }
                }
                Some(value) => {
                    line.push_bare(flag);
                    push_value(&mut line, value);
                }
                None => {}
            },
        }
    }

    line
}

fn push_value(line: &mut CommandLine, value: &ParamValue) {
    match value {
        ParamValue::Text(text) => line.push_quoted(text),
        ParamValue::Number(n) => line.push_bare(&n.to_string()),
        ParamValue::Bool(b) => line.push_bare(if *b { "true" } else { "false" }),
        ParamValue::Choice(variant) => line.push_bare(variant),
        ParamValue::List(items) => {
            for item in items {
                line.push_quoted(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::validation::validate;
    use crate::domain::{ParamKind, ParamSpec};
    use serde_json::json;

    fn contacts_edit() -> OperationDescriptor {
        OperationDescriptor::new("atxp_contacts_edit", "Edit", "contacts edit")
            .param(ParamSpec::required("id", ParamKind::String, "Contact ID"))
            .param(ParamSpec::optional("name", ParamKind::String, "Name"))
            .param(ParamSpec::optional("phone", ParamKind::StringList, "Phones"))
            .param(ParamSpec::optional("email", ParamKind::StringList, "Emails"))
            .arg(ArgSpec::Positional("id"))
            .arg(ArgSpec::Flag("--name", "name"))
            .arg(ArgSpec::Repeated("--phone", "phone"))
            .arg(ArgSpec::Repeated("--email", "email"))
    }

    fn fund() -> OperationDescriptor {
        OperationDescriptor::new("atxp_fund", "Fund", "fund")
            .param(ParamSpec::optional("amount", ParamKind::Number, "Amount"))
            .param(ParamSpec::optional("open", ParamKind::Boolean, "Open"))
            .arg(ArgSpec::Flag("--amount", "amount"))
            .arg(ArgSpec::Switch("--open", "open"))
    }

    fn render(op: &OperationDescriptor, args: serde_json::Value) -> String {
        build_command(op, &validate(op, &args).unwrap()).into_string()
    }

    #[test]
    fn test_literal_only() {
        let op = OperationDescriptor::new("atxp_balance", "Balance", "balance");
        assert_eq!(render(&op, json!({})), "balance");
    }

    #[test]
    fn test_optional_list_omitted() {
        let line = render(&contacts_edit(), json!({ "id": "c1" }));
        assert_eq!(line, r#"contacts edit "c1""#);
        assert!(!line.contains("--phone"));
        assert!(!line.contains("--email"));
    }

    #[test]
    fn test_list_expands_in_order() {
        let line = render(
            &contacts_edit(),
            json!({ "id": "c1", "phone": ["+1 555 0100", "+1 555 0199"] }),
        );
        assert_eq!(
            line,
            r#"contacts edit "c1" --phone "+1 555 0100" --phone "+1 555 0199""#
        );
        assert_eq!(line.matches("--phone").count(), 2);
    }

    #[test]
    fn test_quotes_in_values_escaped() {
        let line = render(
            &contacts_edit(),
            json!({ "id": "c1", "name": "Ada \"Countess\" Lovelace", "email": ["a\"@b.c"] }),
        );
        assert_eq!(
            line,
            r#"contacts edit "c1" --name "Ada \"Countess\" Lovelace" --email "a\"@b.c""#
        );
    }

    #[test]
    fn test_numbers_bare_and_switch() {
        assert_eq!(render(&fund(), json!({})), "fund");
        assert_eq!(
            render(&fund(), json!({ "amount": 25, "open": true })),
            "fund --amount 25 --open"
        );
        assert_eq!(render(&fund(), json!({ "amount": 2.5, "open": false })), "fund --amount 2.5");
    }

    #[test]
    fn test_enum_bare() {
        let op = OperationDescriptor::new("atxp_phone_calls", "Calls", "phone calls")
            .param(ParamSpec::optional(
                "direction",
                ParamKind::Enum(&["incoming", "sent"]),
                "Direction",
            ))
            .arg(ArgSpec::Flag("--direction", "direction"));
        assert_eq!(
            render(&op, json!({ "direction": "incoming" })),
            "phone calls --direction incoming"
        );
    }

    /// Every unescaped `"` must be a segment boundary, so the count stays even.
    fn unescaped_quotes(line: &str) -> usize {
        let mut count = 0;
        let mut escaped = false;
        for c in line.chars() {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => count += 1,
                _ => escaped = false,
            }
        }
        count
    }

    #[test]
    fn test_quote_balance_for_hostile_values() {
        let hostile = [
            "\"",
            "\"\"\"",
            "end\\",
            "a\\\"b",
            "\"; rm -rf ~; echo \"",
            "mixed 'single' and \"double\"",
        ];
        for value in hostile {
            let line = render(&contacts_edit(), json!({ "id": value, "name": value }));
            assert_eq!(unescaped_quotes(&line), 4, "unbalanced for {:?}: {}", value, line);
        }
    }
}
