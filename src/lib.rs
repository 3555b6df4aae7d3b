// Credit Request - Core Library
// Masking, CPF/CNPJ validation and the request schema, shared by the CLI,
// the terminal form, the API server and the tests

pub mod mask;       // Mask Engine
pub mod identifier; // CPF / CNPJ check digits
pub mod currency;   // pt-BR cent formatting
pub mod fields;     // Field registry (labels, masks, rules)
pub mod schema;     // Request record + validation
pub mod form;       // Live form session
pub mod loader;     // Batch JSON / CSV input
pub mod config;     // Environment settings + logging

// Re-export commonly used types
pub use mask::{format, unformat, MaskKind};
pub use identifier::{
    is_valid_corporate, is_valid_identifier, is_valid_individual, IdentifierKind,
    corporate_check_digits, individual_check_digits,
};
pub use currency::{format_cents, parse_amount};
pub use fields::{FieldDefinition, FieldId, FieldRegistry, FieldRule, Section};
pub use schema::{Address, CreditRequest, SchemaValidator, ValidationError, ValidationResult};
pub use form::{FormSession, Notice, Submission};
pub use loader::{load_requests, validate_batch, BatchReport, RowOutcome};
pub use config::{init_logging, Settings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
