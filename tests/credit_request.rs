// End-to-end checks through the public API

use credit_request::{
    format, format_cents, is_valid_identifier, unformat, Address, CreditRequest, FieldId,
    FormSession, MaskKind, SchemaValidator,
};

fn valid_request() -> CreditRequest {
    CreditRequest {
        full_name: "João Pereira".to_string(),
        identifier: "52998224725".to_string(),
        email: "joao.pereira@exemplo.com".to_string(),
        phone: "2133334444".to_string(),
        address: Address {
            street: "Rua das Laranjeiras".to_string(),
            number: "100".to_string(),
            complement: Some("Apto 301".to_string()),
            neighborhood: "Laranjeiras".to_string(),
            city: "Rio de Janeiro".to_string(),
            state: "RJ".to_string(),
            postal_code: "22240003".to_string(),
        },
        requested_amount: "2500000".to_string(),
        reason: "Compra de equipamentos para a oficina".to_string(),
    }
}

#[test]
fn known_identifiers() {
    assert!(is_valid_identifier(&unformat("111.444.777-35")));
    assert!(!is_valid_identifier(&unformat("111.111.111-11")));
    assert!(is_valid_identifier(&unformat("11.222.333/0001-81")));
    assert!(!is_valid_identifier(&unformat("11.222.333/0001-82")));
}

#[test]
fn known_amounts() {
    assert_eq!(format_cents("0"), "0,00");
    assert_eq!(format_cents("100000"), "1.000,00");
    assert_eq!(format_cents(""), "");
}

#[test]
fn masks_round_trip_through_display() {
    let cases = [
        ("11144477735", MaskKind::Identifier, "111.444.777-35"),
        ("11222333000181", MaskKind::Identifier, "11.222.333/0001-81"),
        ("11987654321", MaskKind::Phone, "(11) 98765-4321"),
        ("01310200", MaskKind::PostalCode, "01310-200"),
    ];

    for (raw, kind, shown) in cases {
        assert_eq!(format(raw, kind), shown);
        assert_eq!(unformat(shown), raw);
    }
}

#[test]
fn checksum_failure_is_isolated_to_identifier() {
    let validator = SchemaValidator::new();
    let mut request = valid_request();
    assert!(validator.validate(&request).is_ok());

    request.identifier = "52998224726".to_string();
    let errors = validator.validate(&request).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "identifier");
}

#[test]
fn empty_name_fails_with_min_length_message() {
    let validator = SchemaValidator::new();
    let mut request = valid_request();
    request.full_name.clear();

    let errors = validator.validate(&request).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "full_name");
    assert!(errors[0].message.contains("pelo menos 3 caracteres"));
}

#[test]
fn form_session_submits_a_request_loaded_from_json() {
    let json = serde_json::to_string(&valid_request()).unwrap();
    let request: CreditRequest = serde_json::from_str(&json).unwrap();

    let mut session = FormSession::from_request(&request);
    assert_eq!(session.display(FieldId::Identifier), "529.982.247-25");
    assert_eq!(session.display(FieldId::Phone), "(21) 33334-444");
    assert_eq!(session.display(FieldId::RequestedAmount), "25.000,00");

    let submission = session.submit().unwrap();
    assert_eq!(submission.request, request);
}
