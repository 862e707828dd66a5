// Client record validation.
//
// Two independent rule sets, applied at different layers:
//   - validate_form: the UI-level check that gates form submission and feeds
//     inline error messages.
//   - SchemaValidator: the gateway-level schema constraints enforced before
//     a write reaches the store.
// The two are intentionally NOT unified; passing one does not imply passing
// the other (the form only requires phone presence, the schema requires a
// minimum length).

use crate::types::{ClientInput, ClientPatch};
use std::collections::HashMap;

// ============================================================================
// SHARED PREDICATES
// ============================================================================

/// Simple `local@domain.tld` shape check: non-empty local part, a domain
/// containing a dot with non-empty segments, no whitespace anywhere.
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// ============================================================================
// FORM VALIDATOR (UI LEVEL)
// ============================================================================

/// Validate a candidate client the way the form does: one message per
/// offending field, first violation wins. An empty map means accepted.
pub fn validate_form(input: &ClientInput) -> HashMap<&'static str, &'static str> {
    let mut errors = HashMap::new();

    if input.name.trim().len() < 2 {
        errors.insert("name", "Name is required");
    }

    if input.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(input.email.trim()) {
        errors.insert("email", "Email is invalid");
    }

    if input.phone.trim().is_empty() {
        errors.insert("phone", "Phone is required");
    }

    if input.document.trim().is_empty() {
        errors.insert("document", "Document is required");
    }

    if input.address.trim().is_empty() {
        errors.insert("address", "Address is required");
    }

    errors
}

// ============================================================================
// SCHEMA VALIDATOR (GATEWAY LEVEL)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Schema constraints applied at the persistence gateway before a write.
/// Minimum lengths are counted on the raw value; unlike the form validator,
/// no trimming happens here.
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        SchemaValidator
    }

    pub fn validate(&self, input: &ClientInput) -> ValidationResult {
        let mut errors = Vec::new();

        if input.name.len() < 2 {
            errors.push(ValidationError {
                field: "name".to_string(),
                message: "Must be at least 2 characters".to_string(),
            });
        }

        if !is_valid_email(&input.email) {
            errors.push(ValidationError {
                field: "email".to_string(),
                message: "Must be a valid email address".to_string(),
            });
        }

        if input.phone.len() < 10 {
            errors.push(ValidationError {
                field: "phone".to_string(),
                message: "Must be at least 10 characters".to_string(),
            });
        }

        if input.document.len() < 5 {
            errors.push(ValidationError {
                field: "document".to_string(),
                message: "Must be at least 5 characters".to_string(),
            });
        }

        if input.address.len() < 5 {
            errors.push(ValidationError {
                field: "address".to_string(),
                message: "Must be at least 5 characters".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Same constraints applied to a partial update: only the fields the
    /// patch names are checked.
    pub fn validate_patch(&self, patch: &ClientPatch) -> ValidationResult {
        let mut errors = Vec::new();

        if let Some(ref name) = patch.name {
            if name.len() < 2 {
                errors.push(ValidationError {
                    field: "name".to_string(),
                    message: "Must be at least 2 characters".to_string(),
                });
            }
        }

        if let Some(ref email) = patch.email {
            if !is_valid_email(email) {
                errors.push(ValidationError {
                    field: "email".to_string(),
                    message: "Must be a valid email address".to_string(),
                });
            }
        }

        if let Some(ref phone) = patch.phone {
            if phone.len() < 10 {
                errors.push(ValidationError {
                    field: "phone".to_string(),
                    message: "Must be at least 10 characters".to_string(),
                });
            }
        }

        if let Some(ref document) = patch.document {
            if document.len() < 5 {
                errors.push(ValidationError {
                    field: "document".to_string(),
                    message: "Must be at least 5 characters".to_string(),
                });
            }
        }

        if let Some(ref address) = patch.address {
            if address.len() < 5 {
                errors.push(ValidationError {
                    field: "address".to_string(),
                    message: "Must be at least 5 characters".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ClientInput {
        ClientInput {
            name: "Ana Silva".to_string(),
            email: "ana@x.com".to_string(),
            phone: "5551234567".to_string(),
            document: "12345".to_string(),
            address: "Rua A, 10".to_string(),
        }
    }

    #[test]
    fn test_form_accepts_valid_input() {
        assert!(validate_form(&valid_input()).is_empty());
    }

    #[test]
    fn test_form_rejects_each_missing_field() {
        let cases: [(&str, fn(&mut ClientInput)); 5] = [
            ("name", |i| i.name = "  ".to_string()),
            ("email", |i| i.email = String::new()),
            ("phone", |i| i.phone = " ".to_string()),
            ("document", |i| i.document = String::new()),
            ("address", |i| i.address = "   ".to_string()),
        ];

        for (field, blank) in cases {
            let mut input = valid_input();
            blank(&mut input);
            let errors = validate_form(&input);
            assert!(errors.contains_key(field), "expected error for {}", field);
            assert!(errors[field].ends_with("is required"));
        }
    }

    #[test]
    fn test_form_single_char_name_is_rejected() {
        let mut input = valid_input();
        input.name = "A".to_string();
        assert_eq!(validate_form(&input).get("name"), Some(&"Name is required"));
    }

    #[test]
    fn test_form_distinguishes_missing_and_malformed_email() {
        let mut input = valid_input();
        input.email = String::new();
        assert_eq!(
            validate_form(&input).get("email"),
            Some(&"Email is required")
        );

        input.email = "not-an-email".to_string();
        assert_eq!(
            validate_form(&input).get("email"),
            Some(&"Email is invalid")
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("bob@ana.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ana@xcom"));
        assert!(!is_valid_email("ana@x."));
        assert!(!is_valid_email("ana silva@x.com"));
        assert!(!is_valid_email("ana@x@y.com"));
    }

    #[test]
    fn test_schema_accepts_valid_input() {
        assert!(SchemaValidator::new().validate(&valid_input()).is_ok());
    }

    #[test]
    fn test_schema_minimum_lengths() {
        let validator = SchemaValidator::new();

        let mut input = valid_input();
        input.phone = "555123".to_string(); // present but too short
        let errors = validator.validate(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "phone");

        let mut input = valid_input();
        input.document = "1234".to_string();
        input.address = "Rua".to_string();
        let errors = validator.validate(&input).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["document", "address"]);
    }

    #[test]
    fn test_schema_patch_checks_only_named_fields() {
        let validator = SchemaValidator::new();

        let empty = ClientPatch::default();
        assert!(validator.validate_patch(&empty).is_ok());

        let patch = ClientPatch {
            phone: Some("123".to_string()),
            ..ClientPatch::default()
        };
        let errors = validator.validate_patch(&patch).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "phone");

        let patch = ClientPatch {
            email: Some("ana@x.com".to_string()),
            ..ClientPatch::default()
        };
        assert!(validator.validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_layers_disagree_on_short_phone() {
        // The form only requires presence; the schema wants 10+ characters.
        // A record can pass the UI check and still be rejected at the gateway.
        let mut input = valid_input();
        input.phone = "12345".to_string();

        assert!(validate_form(&input).is_empty());
        assert!(SchemaValidator::new().validate(&input).is_err());
    }
}
