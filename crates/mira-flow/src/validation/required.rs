use crate::flow::Flow;
use crate::validation::{error_codes, ValidationError, Validator};

/// Validates that the fields a deployable flow cannot do without are set
pub(super) struct RequiredFieldValidator;

impl Validator for RequiredFieldValidator {
    fn validate(&self, flow: &Flow) -> Result<(), ValidationError> {
        if flow.metadata.name.is_empty() {
            return Err(ValidationError::new(
                error_codes::MISSING_NAME,
                "Flow name is required",
            ));
        }

        if flow.prompt.is_empty() {
            return Err(ValidationError::new(
                error_codes::MISSING_PROMPT,
                "Prompt template is required",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name() {
        let mut flow = Flow::new("x");
        flow.metadata.name.clear();
        flow.set_prompt("hello");

        let err = RequiredFieldValidator.validate(&flow).unwrap_err();
        assert_eq!(err.code, error_codes::MISSING_NAME);
    }

    #[test]
    fn test_empty_prompt() {
        let flow = Flow::new("x");

        let err = RequiredFieldValidator.validate(&flow).unwrap_err();
        assert_eq!(err.code, error_codes::MISSING_PROMPT);
        assert_eq!(err.message, "Prompt template is required");
    }
}
