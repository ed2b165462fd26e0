pub mod order;
pub mod payment;

use validator::{ValidationErrors, ValidationErrorsKind};

pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages("", errors, &mut messages);
    if messages.is_empty() {
        messages.push("Validation failed".to_string());
    }
    messages
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| match error.code.as_ref() {
                            "length" => "Invalid length".to_string(),
                            "range" => "Value out of range".to_string(),
                            "custom" => "Custom validation failed".to_string(),
                            _ => format!("Invalid {field}"),
                        });
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requests::payment::CreatePaymentIntentRequest;
    use serde_json::json;
    use uuid::Uuid;
    use validator::Validate;

    #[test]
    fn test_nested_line_errors_carry_their_path() {
        let request: CreatePaymentIntentRequest = serde_json::from_value(json!({
            "lines": [
                { "productId": Uuid::new_v4(), "qty": 1 },
                { "productId": Uuid::new_v4(), "qty": 0 }
            ]
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();

        assert_eq!(
            validation_messages(&errors),
            vec!["lines[1].qty: Value out of range".to_string()]
        );
    }
}
