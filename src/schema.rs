// 📐 Shape Layer - Credit Request Schema Validation
// Applies the field registry's rules to a request; failures are data, never panics

use crate::currency::parse_amount;
use crate::fields::{FieldDefinition, FieldId, FieldRegistry, FieldRule};
use crate::identifier::is_valid_identifier;
use crate::mask::digit_count;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    /// Two-letter UF
    #[serde(default)]
    pub state: String,
    /// Raw CEP digits
    #[serde(default)]
    pub postal_code: String,
}

/// A credit request as captured by the form. Masked fields hold raw digits
/// and `requested_amount` holds cents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditRequest {
    #[serde(default)]
    pub full_name: String,
    /// CPF or CNPJ digits
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub requested_amount: String,
    #[serde(default)]
    pub reason: String,
}

impl CreditRequest {
    /// Current value of a field; a missing complement reads as empty
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::FullName => &self.full_name,
            FieldId::Identifier => &self.identifier,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::Street => &self.address.street,
            FieldId::Number => &self.address.number,
            FieldId::Complement => self.address.complement.as_deref().unwrap_or(""),
            FieldId::Neighborhood => &self.address.neighborhood,
            FieldId::City => &self.address.city,
            FieldId::State => &self.address.state,
            FieldId::PostalCode => &self.address.postal_code,
            FieldId::RequestedAmount => &self.requested_amount,
            FieldId::Reason => &self.reason,
        }
    }

    pub fn set_value(&mut self, field: FieldId, value: String) {
        match field {
            FieldId::FullName => self.full_name = value,
            FieldId::Identifier => self.identifier = value,
            FieldId::Email => self.email = value,
            FieldId::Phone => self.phone = value,
            FieldId::Street => self.address.street = value,
            FieldId::Number => self.address.number = value,
            FieldId::Complement => {
                self.address.complement = if value.is_empty() { None } else { Some(value) }
            }
            FieldId::Neighborhood => self.address.neighborhood = value,
            FieldId::City => self.address.city = value,
            FieldId::State => self.address.state = value,
            FieldId::PostalCode => self.address.postal_code = value,
            FieldId::RequestedAmount => self.requested_amount = value,
            FieldId::Reason => self.reason = value,
        }
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted field path, e.g. `address.state`
    pub field: String,
    pub message: String,
    /// Name of the rule that failed
    pub rule: String,
}

impl ValidationError {
    fn from_rule(field: FieldId, rule: &FieldRule) -> Self {
        ValidationError {
            field: field.path().to_string(),
            message: rule.message().to_string(),
            rule: rule.name().to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// RULE EVALUATION
// ============================================================================

// Leading dot and ".." are rejected separately (no lookaround in `regex`)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_REGEX.is_match(value)
}

fn rule_passes(rule: &FieldRule, value: &str) -> bool {
    match rule {
        FieldRule::MinLength { min, .. } => value.chars().count() >= *min,
        FieldRule::MaxLength { max, .. } => value.chars().count() <= *max,
        FieldRule::MinDigits { min, .. } => digit_count(value).is_some_and(|n| n >= *min),
        FieldRule::MaxDigits { max, .. } => digit_count(value).is_some_and(|n| n <= *max),
        FieldRule::Email { .. } => is_email(value),
        FieldRule::Identifier { .. } => is_valid_identifier(value),
        FieldRule::Amount { .. } => parse_amount(value).is_some(),
    }
}

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

pub struct SchemaValidator {
    registry: FieldRegistry,
}

impl SchemaValidator {
    pub fn new() -> Self {
        SchemaValidator {
            registry: FieldRegistry::new(),
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Validate one field value; the first failing rule wins
    pub fn validate_field(&self, field: FieldId, value: &str) -> Result<(), ValidationError> {
        match self.registry.get(field) {
            Some(definition) => check_definition(definition, value),
            None => Ok(()),
        }
    }

    /// Validate every field of a request, one error per failing field
    pub fn validate(&self, request: &CreditRequest) -> ValidationResult {
        let errors: Vec<ValidationError> = self
            .registry
            .all()
            .into_iter()
            .filter_map(|definition| check_definition(definition, request.value(definition.id)).err())
            .collect();

        if errors.is_empty() {
            tracing::debug!("credit request passed validation");
            Ok(())
        } else {
            tracing::debug!(
                failed = errors.len(),
                fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "credit request failed validation"
            );
            Err(errors)
        }
    }
}

fn check_definition(definition: &FieldDefinition, value: &str) -> Result<(), ValidationError> {
    if definition.optional {
        return Ok(());
    }

    match definition.rules.iter().find(|rule| !rule_passes(rule, value)) {
        Some(rule) => Err(ValidationError::from_rule(definition.id, rule)),
        None => Ok(()),
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
