//! Single-pass template substitution

use std::collections::HashMap;

/// Substitute `{{token}}` placeholders in a single left-to-right scan.
///
/// Substituted values are emitted directly to the output and never
/// rescanned, so clause text containing literal `{{...}}` sequences
/// cannot trigger a second substitution. Tokens with no entry in the
/// value map are left in place untouched.
pub fn substitute(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) if is_token(&after_open[..end]) => {
                let token = &after_open[..end];
                match values.get(token) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(token);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            _ => {
                // Not a well-formed placeholder; emit the braces literally
                // and continue scanning after them.
                out.push_str("{{");
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_token(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
