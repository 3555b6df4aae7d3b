// 🏛️ Field Registry - the credit request form, described as data
// Every field knows its label, section, mask and ordered validation rules

use crate::mask::MaskKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// FIELD IDS & SECTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    Identifier,
    Email,
    Phone,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    PostalCode,
    RequestedAmount,
    Reason,
}

impl FieldId {
    /// Form order
    pub const ALL: [FieldId; 13] = [
        FieldId::FullName,
        FieldId::Identifier,
        FieldId::Phone,
        FieldId::Email,
        FieldId::Street,
        FieldId::Number,
        FieldId::Complement,
        FieldId::Neighborhood,
        FieldId::City,
        FieldId::State,
        FieldId::PostalCode,
        FieldId::RequestedAmount,
        FieldId::Reason,
    ];

    /// Dotted path used in error reports, e.g. `address.postal_code`
    pub fn path(&self) -> &'static str {
        match self {
            FieldId::FullName => "full_name",
            FieldId::Identifier => "identifier",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::Street => "address.street",
            FieldId::Number => "address.number",
            FieldId::Complement => "address.complement",
            FieldId::Neighborhood => "address.neighborhood",
            FieldId::City => "address.city",
            FieldId::State => "address.state",
            FieldId::PostalCode => "address.postal_code",
            FieldId::RequestedAmount => "requested_amount",
            FieldId::Reason => "reason",
        }
    }

    pub fn from_path(path: &str) -> Option<FieldId> {
        FieldId::ALL.iter().copied().find(|f| f.path() == path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    PersonalData,
    Address,
    CreditInformation,
}

impl Section {
    pub fn title(&self) -> &str {
        match self {
            Section::PersonalData => "Dados Pessoais",
            Section::Address => "Endereço",
            Section::CreditInformation => "Informações do Crédito",
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// One check on a field value. Rules run in order and the first failure
/// supplies the field's message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    /// Counts digits; fails on anything other than digits and mask decoration
    MinDigits { min: usize, message: String },
    MaxDigits { max: usize, message: String },
    Email { message: String },
    Identifier { message: String },
    Amount { message: String },
}

impl FieldRule {
    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        FieldRule::MinLength { min, message: message.into() }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        FieldRule::MaxLength { max, message: message.into() }
    }

    pub fn min_digits(min: usize, message: impl Into<String>) -> Self {
        FieldRule::MinDigits { min, message: message.into() }
    }

    pub fn max_digits(max: usize, message: impl Into<String>) -> Self {
        FieldRule::MaxDigits { max, message: message.into() }
    }

    pub fn email(message: impl Into<String>) -> Self {
        FieldRule::Email { message: message.into() }
    }

    pub fn identifier(message: impl Into<String>) -> Self {
        FieldRule::Identifier { message: message.into() }
    }

    pub fn amount(message: impl Into<String>) -> Self {
        FieldRule::Amount { message: message.into() }
    }

    /// Short constraint name carried on validation errors
    pub fn name(&self) -> &str {
        match self {
            FieldRule::MinLength { .. } => "min_length",
            FieldRule::MaxLength { .. } => "max_length",
            FieldRule::MinDigits { .. } => "min_digits",
            FieldRule::MaxDigits { .. } => "max_digits",
            FieldRule::Email { .. } => "email",
            FieldRule::Identifier { .. } => "identifier",
            FieldRule::Amount { .. } => "amount",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FieldRule::MinLength { message, .. }
            | FieldRule::MaxLength { message, .. }
            | FieldRule::MinDigits { message, .. }
            | FieldRule::MaxDigits { message, .. }
            | FieldRule::Email { message }
            | FieldRule::Identifier { message }
            | FieldRule::Amount { message } => message.as_str(),
        }
    }
}

// ============================================================================
// FIELD DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: String,
    pub placeholder: String,
    pub section: Section,

    /// Display mask for digit-only fields
    pub mask: Option<MaskKind>,

    /// Optional fields skip every rule
    pub optional: bool,

    pub rules: Vec<FieldRule>,
}

impl FieldDefinition {
    pub fn new(id: FieldId, label: impl Into<String>, section: Section) -> Self {
        FieldDefinition {
            id,
            label: label.into(),
            placeholder: String::new(),
            section,
            mask: None,
            optional: false,
            rules: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_mask(mut self, mask: MaskKind) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_required(&self) -> bool {
        !self.optional
    }
}

// ============================================================================
// FIELD REGISTRY
// ============================================================================

pub struct FieldRegistry {
    fields: HashMap<FieldId, FieldDefinition>,
}

impl FieldRegistry {
    /// Registry holding the credit request form
    pub fn new() -> Self {
        let mut registry = FieldRegistry {
            fields: HashMap::new(),
        };

        registry.register_personal_data();
        registry.register_address();
        registry.register_credit_information();
        registry
    }

    fn register_personal_data(&mut self) {
        self.register(
            FieldDefinition::new(FieldId::FullName, "Nome completo", Section::PersonalData)
                .with_placeholder("Digite seu nome completo")
                .with_rule(FieldRule::min_length(
                    3,
                    "O nome completo é obrigatório e deve ter pelo menos 3 caracteres",
                )),
        );

        self.register(
            FieldDefinition::new(FieldId::Identifier, "CPF ou CNPJ", Section::PersonalData)
                .with_placeholder("Digite seu CPF ou CNPJ")
                .with_mask(MaskKind::Identifier)
                .with_rule(FieldRule::min_length(1, "CPF ou CNPJ é obrigatório"))
                .with_rule(FieldRule::identifier("CPF ou CNPJ inválido")),
        );

        self.register(
            FieldDefinition::new(FieldId::Phone, "Telefone", Section::PersonalData)
                .with_placeholder("(00) 00000-0000")
                .with_mask(MaskKind::Phone)
                .with_rule(FieldRule::min_digits(10, "Telefone deve ter pelo menos 10 dígitos"))
                .with_rule(FieldRule::max_digits(11, "Telefone não pode ter mais de 11 dígitos")),
        );

        // Shape is checked before emptiness, so a blank email reports the format message
        self.register(
            FieldDefinition::new(FieldId::Email, "E-mail", Section::PersonalData)
                .with_placeholder("seu.email@exemplo.com")
                .with_rule(FieldRule::email("Formato de e-mail inválido"))
                .with_rule(FieldRule::min_length(1, "E-mail é obrigatório")),
        );
    }

    fn register_address(&mut self) {
        self.register(
            FieldDefinition::new(FieldId::Street, "Rua", Section::Address)
                .with_placeholder("Nome da rua")
                .with_rule(FieldRule::min_length(1, "Rua é obrigatória")),
        );

        self.register(
            FieldDefinition::new(FieldId::Number, "Número", Section::Address)
                .with_placeholder("Número")
                .with_rule(FieldRule::min_length(1, "Número é obrigatório")),
        );

        self.register(
            FieldDefinition::new(FieldId::Complement, "Complemento", Section::Address)
                .with_placeholder("Apartamento, bloco, etc. (opcional)")
                .optional(),
        );

        self.register(
            FieldDefinition::new(FieldId::Neighborhood, "Bairro", Section::Address)
                .with_placeholder("Bairro")
                .with_rule(FieldRule::min_length(1, "Bairro é obrigatório")),
        );

        self.register(
            FieldDefinition::new(FieldId::City, "Cidade", Section::Address)
                .with_placeholder("Cidade")
                .with_rule(FieldRule::min_length(1, "Cidade é obrigatória")),
        );

        self.register(
            FieldDefinition::new(FieldId::State, "Estado", Section::Address)
                .with_placeholder("UF")
                .with_rule(FieldRule::min_length(2, "Estado é obrigatório"))
                .with_rule(FieldRule::max_length(2, "Use a sigla do estado (2 letras)")),
        );

        self.register(
            FieldDefinition::new(FieldId::PostalCode, "CEP", Section::Address)
                .with_placeholder("00000-000")
                .with_mask(MaskKind::PostalCode)
                .with_rule(FieldRule::min_digits(8, "CEP deve ter 8 dígitos"))
                .with_rule(FieldRule::max_digits(8, "CEP deve ter 8 dígitos")),
        );
    }

    fn register_credit_information(&mut self) {
        self.register(
            FieldDefinition::new(
                FieldId::RequestedAmount,
                "Valor solicitado (R$)",
                Section::CreditInformation,
            )
            .with_placeholder("0,00")
            .with_rule(FieldRule::min_length(1, "Valor solicitado é obrigatório"))
            .with_rule(FieldRule::amount("Valor inválido")),
        );

        self.register(
            FieldDefinition::new(FieldId::Reason, "Motivo da solicitação", Section::CreditInformation)
                .with_placeholder("Descreva o motivo para a sua solicitação de crédito")
                .with_rule(FieldRule::min_length(
                    10,
                    "Por favor, forneça um motivo com pelo menos 10 caracteres",
                )),
        );
    }

    pub fn register(&mut self, field: FieldDefinition) {
        self.fields.insert(field.id, field);
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldDefinition> {
        self.fields.get(&id)
    }

    /// Fields in form order
    pub fn all(&self) -> Vec<&FieldDefinition> {
        FieldId::ALL.iter().filter_map(|id| self.fields.get(id)).collect()
    }

    pub fn by_section(&self, section: Section) -> Vec<&FieldDefinition> {
        self.all().into_iter().filter(|f| f.section == section).collect()
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
