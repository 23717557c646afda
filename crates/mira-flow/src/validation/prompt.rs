use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;

use crate::models::Input;
use crate::validation::{error_codes, ValidationError};

/// Extract candidate variable names from a prompt template.
///
/// Every fragment after a `{` that contains a `}` yields the text up to the
/// first `}`. Nested or escaped braces are not understood, and a fragment
/// without a closing brace is not a variable.
///
/// - `"about {character} in {genre}"` -> `{"character", "genre"}`
/// - `"broken {oops"` -> `{}`
pub fn extract_prompt_variables(prompt: &str) -> HashSet<&str> {
    prompt
        .split('{')
        .skip(1)
        .filter_map(|fragment| fragment.find('}').map(|end| &fragment[..end]))
        .collect()
}

/// Check that every required input appears as a placeholder in the prompt
pub fn validate_prompt_variables(
    prompt: &str,
    inputs: &IndexMap<String, Input>,
) -> Result<(), ValidationError> {
    let prompt_vars = extract_prompt_variables(prompt);

    let missing: BTreeSet<&str> = inputs
        .iter()
        .filter(|(name, input)| input.required && !prompt_vars.contains(name.as_str()))
        .map(|(name, _)| name.as_str())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(ValidationError::new(
        error_codes::UNUSED_REQUIRED_INPUT,
        format!(
            "Required input variables {} are not used in the prompt template",
            format_names(&missing)
        ),
    )
    .with_variables(missing))
}

/// Substitute `{name}` placeholders with the supplied values.
///
/// `{{` and `}}` produce literal braces. Anything after `:` or `!` inside a
/// placeholder is ignored and the field name before it is looked up.
pub fn render_template(
    template: &str,
    values: &HashMap<String, String>,
) -> Result<String, ValidationError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        rendered.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            rendered.push('{');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix("}}") {
            rendered.push('}');
            rest = after;
            continue;
        }
        if tail.starts_with('}') {
            return Err(malformed("Single '}' encountered in prompt template"));
        }

        let close = tail
            .find('}')
            .ok_or_else(|| malformed("Single '{' encountered in prompt template"))?;
        let field = &tail[1..close];
        if field.contains('{') {
            return Err(malformed("Unexpected '{' in prompt template field"));
        }

        let name = field.split([':', '!']).next().unwrap_or_default();
        match values.get(name) {
            Some(value) => rendered.push_str(value),
            None => {
                return Err(ValidationError::new(
                    error_codes::UNKNOWN_VARIABLE,
                    format!("Invalid variable in prompt template: '{}'", name),
                )
                .with_variables([name]))
            }
        }

        rest = &tail[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}

/// Render a set of names as `{'a', 'b'}`
pub(crate) fn format_names<S: AsRef<str>>(names: &BTreeSet<S>) -> String {
    let quoted: Vec<String> = names
        .iter()
        .map(|name| format!("'{}'", name.as_ref()))
        .collect();
    format!("{{{}}}", quoted.join(", "))
}

fn malformed(message: &str) -> ValidationError {
    ValidationError::new(error_codes::MALFORMED_TEMPLATE, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(specs: &[(&str, bool)]) -> IndexMap<String, Input> {
        specs
            .iter()
            .map(|(name, required)| {
                let input = Input::new("string", *name);
                let input = if *required { input } else { input.optional() };
                (name.to_string(), input)
            })
            .collect()
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_prompt_variables("Write a story about {character} in {genre}");
        assert_eq!(vars, HashSet::from(["character", "genre"]));
    }

    #[test]
    fn test_extract_ignores_unclosed_fragment() {
        let vars = extract_prompt_variables("Start {open and {closed} then {dangling");
        assert_eq!(vars, HashSet::from(["closed"]));
    }

    #[test]
    fn test_extract_takes_text_up_to_first_brace() {
        let vars = extract_prompt_variables("{a}} {b:>10}");
        assert_eq!(vars, HashSet::from(["a", "b:>10"]));
    }

    #[test]
    fn test_validate_passes_when_required_used() {
        let result = validate_prompt_variables(
            "Write about {character}",
            &inputs(&[("character", true), ("genre", false)]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_reports_unused_required() {
        let err = validate_prompt_variables(
            "Nothing here",
            &inputs(&[("character", true), ("setting", true), ("genre", false)]),
        )
        .unwrap_err();

        assert_eq!(err.code, error_codes::UNUSED_REQUIRED_INPUT);
        assert_eq!(
            err.variables,
            BTreeSet::from(["character".to_string(), "setting".to_string()])
        );
        assert!(err.message.contains("'character'"));
    }

    #[test]
    fn test_render_substitutes_values() {
        let rendered = render_template(
            "Write a story about {character} in {genre}",
            &values(&[("character", "a robot"), ("genre", "noir")]),
        )
        .unwrap();
        assert_eq!(rendered, "Write a story about a robot in noir");
    }

    #[test]
    fn test_render_handles_escaped_braces() {
        let rendered = render_template("{{literal}} {x}", &values(&[("x", "1")])).unwrap();
        assert_eq!(rendered, "{literal} 1");
    }

    #[test]
    fn test_render_ignores_format_spec() {
        let rendered = render_template("[{x:>5}] [{y!r}]", &values(&[("x", "a"), ("y", "b")])).unwrap();
        assert_eq!(rendered, "[a] [b]");
    }

    #[test]
    fn test_render_unknown_variable() {
        let err = render_template("Hi {name}", &HashMap::new()).unwrap_err();
        assert_eq!(err.code, error_codes::UNKNOWN_VARIABLE);
        assert_eq!(err.variables, BTreeSet::from(["name".to_string()]));
    }

    #[test]
    fn test_render_malformed() {
        assert_eq!(
            render_template("Hi {name", &values(&[("name", "x")])).unwrap_err().code,
            error_codes::MALFORMED_TEMPLATE
        );
        assert_eq!(
            render_template("Hi }", &HashMap::new()).unwrap_err().code,
            error_codes::MALFORMED_TEMPLATE
        );
    }

    #[test]
    fn test_format_names() {
        let names = BTreeSet::from(["b", "a"]);
        assert_eq!(format_names(&names), "{'a', 'b'}");
    }
}
