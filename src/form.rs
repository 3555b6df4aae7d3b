// 📝 Form Session - live state of one credit request being filled in
//
// Every keystroke is normalised into the stored raw value and the whole
// request is revalidated. Display strings are recomputed from raw values on
// demand, so deleting through punctuation never needs special handling.

use crate::currency::format_cents;
use crate::fields::{FieldDefinition, FieldId};
use crate::mask::{self, MaskKind};
use crate::schema::{CreditRequest, SchemaValidator, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

const STATE_LEN: usize = 2;

// ============================================================================
// SUBMISSION
// ============================================================================

/// Toast-style message shown after a submission attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn submitted() -> Self {
        Notice {
            title: "Solicitação enviada com sucesso!".to_string(),
            description: "Em breve entraremos em contato.".to_string(),
        }
    }
}

/// An accepted request. Nothing is sent anywhere; this is the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    /// SHA-256 of the request's JSON, hex encoded
    pub digest: String,
    pub request: CreditRequest,
    pub notice: Notice,
}

/// Hex SHA-256 of the request's JSON form
pub fn request_digest(request: &CreditRequest) -> String {
    // Field order is fixed by the struct, so the JSON is stable
    let payload = serde_json::to_vec(request).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// FORM SESSION
// ============================================================================

pub struct FormSession {
    request: CreditRequest,
    validator: SchemaValidator,
    errors: HashMap<FieldId, ValidationError>,
}

impl FormSession {
    /// Empty form, already validated (every required field reports)
    pub fn new() -> Self {
        let mut session = FormSession {
            request: CreditRequest::default(),
            validator: SchemaValidator::new(),
            errors: HashMap::new(),
        };
        session.revalidate();
        session
    }

    /// Start from an existing request. Mask decoration is stripped and the
    /// state uppercased, but nothing is truncated: an overlong value stays
    /// overlong and fails validation.
    pub fn from_request(request: &CreditRequest) -> Self {
        let mut session = FormSession::new();
        for field in FieldId::ALL {
            let value = session.import(field, request.value(field));
            session.request.set_value(field, value);
        }
        session.revalidate();
        session
    }

    pub fn request(&self) -> &CreditRequest {
        &self.request
    }

    pub fn definition(&self, field: FieldId) -> Option<&FieldDefinition> {
        self.validator.registry().get(field)
    }

    fn mask_of(&self, field: FieldId) -> Option<MaskKind> {
        self.definition(field).and_then(|d| d.mask)
    }

    /// Stored form of `input` for `field`
    fn normalize(&self, field: FieldId, input: &str) -> String {
        if let Some(kind) = self.mask_of(field) {
            return mask::to_raw(input, kind);
        }

        match field {
            FieldId::State => input.to_uppercase().chars().take(STATE_LEN).collect(),
            FieldId::RequestedAmount => mask::unformat(input),
            _ => input.to_string(),
        }
    }

    /// Stored form of a value that arrived whole rather than typed
    fn import(&self, field: FieldId, value: &str) -> String {
        if self.mask_of(field).is_some() {
            return mask::strip_decoration(value);
        }

        match field {
            FieldId::State => value.to_uppercase(),
            FieldId::RequestedAmount => mask::unformat(value),
            _ => value.to_string(),
        }
    }

    fn revalidate(&mut self) {
        self.errors = match self.validator.validate(&self.request) {
            Ok(()) => HashMap::new(),
            Err(errors) => errors
                .into_iter()
                .filter_map(|e| FieldId::from_path(&e.field).map(|id| (id, e)))
                .collect(),
        };
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Replace a field with the full text of its input box.
    ///
    /// `text` may be a display string (masked or formatted); it is reduced to
    /// the stored raw value. Returns the new display string.
    pub fn input(&mut self, field: FieldId, text: &str) -> String {
        let value = self.normalize(field, text);
        self.request.set_value(field, value);
        self.revalidate();
        self.display(field)
    }

    /// Type one character at the end of a field
    pub fn push_char(&mut self, field: FieldId, c: char) -> String {
        let mut text = self.request.value(field).to_string();
        text.push(c);
        self.input(field, &text)
    }

    /// Delete the last stored character. On masked and amount fields that is
    /// the last digit, whatever punctuation is displayed after it.
    pub fn backspace(&mut self, field: FieldId) -> String {
        let mut text = self.request.value(field).to_string();
        text.pop();
        self.input(field, &text)
    }

    pub fn clear(&mut self, field: FieldId) {
        self.input(field, "");
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    pub fn raw(&self, field: FieldId) -> &str {
        self.request.value(field)
    }

    /// What the input box shows for `field`
    pub fn display(&self, field: FieldId) -> String {
        let raw = self.request.value(field);

        if let Some(kind) = self.mask_of(field) {
            return mask::format(raw, kind);
        }

        match field {
            FieldId::RequestedAmount => format_cents(raw),
            _ => raw.to_string(),
        }
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(|e| e.message.as_str())
    }

    /// Current errors in form order
    pub fn errors(&self) -> Vec<&ValidationError> {
        FieldId::ALL.iter().filter_map(|f| self.errors.get(f)).collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    // ========================================================================
    // SUBMIT
    // ========================================================================

    /// Accept the request and reset the form, or return every field error
    /// and leave the form as it is.
    pub fn submit(&mut self) -> Result<Submission, Vec<ValidationError>> {
        self.validator.validate(&self.request)?;

        let request = std::mem::take(&mut self.request);
        let submission = Submission {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            digest: request_digest(&request),
            request,
            notice: Notice::submitted(),
        };

        tracing::info!(
            id = %submission.id,
            digest = %submission.digest,
            "credit request submitted"
        );

        self.revalidate();
        Ok(submission)
    }

    pub fn reset(&mut self) {
        self.request = CreditRequest::default();
        self.revalidate();
    }
}

impl Default for FormSession {
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

    fn fill_valid(session: &mut FormSession) {
        session.input(FieldId::FullName, "Maria da Silva");
        session.input(FieldId::Identifier, "111.444.777-35");
        session.input(FieldId::Email, "maria@exemplo.com");
        session.input(FieldId::Phone, "(11) 98765-4321");
        session.input(FieldId::Street, "Avenida Paulista");
        session.input(FieldId::Number, "1578");
        session.input(FieldId::Neighborhood, "Bela Vista");
        session.input(FieldId::City, "São Paulo");
        session.input(FieldId::State, "sp");
        session.input(FieldId::PostalCode, "01310-200");
        session.input(FieldId::RequestedAmount, "15.000,00");
        session.input(FieldId::Reason, "Capital de giro para o negócio");
    }

    #[test]
    fn test_new_form_reports_required_fields() {
        let session = FormSession::new();
        assert!(!session.is_valid());
        assert_eq!(session.errors().len(), 12);
        assert_eq!(session.error(FieldId::Complement), None);
        assert_eq!(session.errors()[0].field, "full_name");
    }

    #[test]
    fn test_masked_input_stores_digits() {
        let mut session = FormSession::new();

        let shown = session.input(FieldId::Identifier, "111.444.777-35");
        assert_eq!(shown, "111.444.777-35");
        assert_eq!(session.raw(FieldId::Identifier), "11144477735");
        assert_eq!(session.error(FieldId::Identifier), None);
    }

    #[test]
    fn test_typing_identifier_switches_to_corporate_mask() {
        let mut session = FormSession::new();
        let mut shown = String::new();
        for c in "11222333000181".chars() {
            shown = session.push_char(FieldId::Identifier, c);
            if session.raw(FieldId::Identifier).len() == 11 {
                assert_eq!(shown, "112.223.330-00");
            }
        }
        assert_eq!(shown, "11.222.333/0001-81");

        // further digits are discarded
        let shown = session.push_char(FieldId::Identifier, '9');
        assert_eq!(shown, "11.222.333/0001-81");
    }

    #[test]
    fn test_backspace_removes_digit_not_punctuation() {
        let mut session = FormSession::new();
        session.input(FieldId::Identifier, "1234");
        assert_eq!(session.display(FieldId::Identifier), "123.4");

        let shown = session.backspace(FieldId::Identifier);
        assert_eq!(shown, "123");
        assert_eq!(session.raw(FieldId::Identifier), "123");
    }

    #[test]
    fn test_phone_and_postal_code_truncate() {
        let mut session = FormSession::new();
        assert_eq!(
            session.input(FieldId::Phone, "119876543219999"),
            "(11) 98765-4321"
        );
        assert_eq!(session.input(FieldId::PostalCode, "013102009"), "01310-200");
    }

    #[test]
    fn test_state_is_uppercased_and_capped() {
        let mut session = FormSession::new();
        assert_eq!(session.input(FieldId::State, "rj"), "RJ");
        assert_eq!(session.push_char(FieldId::State, 'x'), "RJ");
        assert_eq!(session.error(FieldId::State), None);
    }

    #[test]
    fn test_amount_is_typed_as_cents() {
        let mut session = FormSession::new();
        let mut shown = String::new();
        for c in "150000".chars() {
            shown = session.push_char(FieldId::RequestedAmount, c);
        }
        assert_eq!(shown, "1.500,00");
        assert_eq!(session.raw(FieldId::RequestedAmount), "150000");

        // typing over the formatted text keeps working
        let shown = session.input(FieldId::RequestedAmount, "1.500,005");
        assert_eq!(shown, "15.000,05");

        let shown = session.backspace(FieldId::RequestedAmount);
        assert_eq!(shown, "1.500,00");
    }

    #[test]
    fn test_errors_update_eagerly() {
        let mut session = FormSession::new();
        session.input(FieldId::FullName, "Ma");
        assert!(session.error(FieldId::FullName).is_some());

        session.push_char(FieldId::FullName, 'r');
        assert_eq!(session.error(FieldId::FullName), None);
    }

    #[test]
    fn test_submit_rejects_invalid_form_and_keeps_values() {
        let mut session = FormSession::new();
        fill_valid(&mut session);
        session.input(FieldId::Identifier, "11144477736");

        let errors = session.submit().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "identifier");
        assert_eq!(session.raw(FieldId::FullName), "Maria da Silva");
    }

    #[test]
    fn test_submit_accepts_and_resets() {
        let mut session = FormSession::new();
        fill_valid(&mut session);
        assert!(session.is_valid());

        let submission = session.submit().unwrap();
        assert_eq!(submission.request.identifier, "11144477735");
        assert_eq!(submission.request.address.state, "SP");
        assert_eq!(submission.request.requested_amount, "1500000");
        assert_eq!(submission.notice, Notice::submitted());
        assert_eq!(submission.digest, request_digest(&submission.request));
        assert_eq!(submission.digest.len(), 64);

        assert_eq!(session.raw(FieldId::FullName), "");
        assert!(!session.is_valid());
    }

    #[test]
    fn test_from_request_normalises_values() {
        let mut request = CreditRequest::default();
        request.identifier = "11.222.333/0001-81".to_string();
        request.address.state = "mg".to_string();

        let session = FormSession::from_request(&request);
        assert_eq!(session.raw(FieldId::Identifier), "11222333000181");
        assert_eq!(session.raw(FieldId::State), "MG");
        assert_eq!(session.error(FieldId::Identifier), None);
    }

    #[test]
    fn test_from_request_keeps_overlong_values() {
        let mut request = CreditRequest::default();
        request.phone = "(11) 98765-432199".to_string();
        request.address.state = "Minas Gerais".to_string();
        request.address.postal_code = "01310-2009999".to_string();

        let session = FormSession::from_request(&request);
        assert_eq!(session.raw(FieldId::Phone), "1198765432199");
        assert_eq!(session.raw(FieldId::State), "MINAS GERAIS");
        assert_eq!(session.raw(FieldId::PostalCode), "013102009999");

        assert!(session.error(FieldId::Phone).is_some());
        assert!(session.error(FieldId::State).is_some());
        assert!(session.error(FieldId::PostalCode).is_some());
    }

    #[test]
    fn test_digest_changes_with_content() {
        let a = CreditRequest::default();
        let mut b = CreditRequest::default();
        b.full_name = "Maria".to_string();
        assert_ne!(request_digest(&a), request_digest(&b));
        assert_eq!(request_digest(&a), request_digest(&CreditRequest::default()));
    }
}
