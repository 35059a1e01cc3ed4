use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the Lander system. Each kind maps to a stable error code that
/// administrative callers can map onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    /// Malformed or out-of-range input (weights, axes, status, section types, slugs)
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Selection
    /// Weighted selection found no active variants
    NoActiveVariants,

    // Write path
    /// A multi-row replacement was attempted outside a transaction
    TransactionRequired,

    // Configuration
    /// Fallback document or settings could not be parsed
    ConfigParse,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NoActiveVariants => "ERR_NO_ACTIVE_VARIANTS",
            ExErrorKind::TransactionRequired => "ERR_TRANSACTION_REQUIRED",
            ExErrorKind::ConfigParse => "ERR_CONFIG_PARSE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (variant slug, variant id or section id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the offending input field or section type
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the offending field, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// True for errors that indicate a caller mistake rather than a system fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ExErrorKind::InvalidInput | ExErrorKind::NotFound | ExErrorKind::AlreadyExists
        )
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain rule violations raised by the pure validation layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleViolation {
    /// Weight outside the inclusive [0, 100] range
    #[error("Weight must be between 0 and 100, got {weight}")]
    WeightOutOfRange { weight: i64 },

    /// Variant carries no axis selections
    #[error("Variant must select a value for at least one axis")]
    EmptyAxes,

    /// Axis identifier is not in the catalog
    #[error("Unknown axis: {axis}")]
    UnknownAxis { axis: String },

    /// Axis value is not allowed for its axis
    #[error("Unknown value '{value}' for axis {axis}")]
    UnknownAxisValue { axis: String, value: String },

    /// Status string is not one of active/archived/deleted
    #[error("Unknown variant status: {status}")]
    UnknownStatus { status: String },

    /// Slug is empty or contains characters outside [a-z0-9-]
    #[error("Invalid slug: '{slug}'")]
    InvalidSlug { slug: String },

    /// Variant name is empty after trimming
    #[error("Variant name must not be empty")]
    EmptyName,

    /// Route slug and payload slug disagree
    #[error("Snapshot slug '{payload}' does not match target slug '{route}'")]
    SlugMismatch { route: String, payload: String },

    /// Section type is empty after trimming
    #[error("Section {index} has an empty section_type")]
    EmptySectionType { index: usize },

    /// Section type is outside the allowed vocabulary
    #[error("Section {index} has unsupported section_type '{section_type}'")]
    UnsupportedSectionType { index: usize, section_type: String },

    /// Section content is null or missing
    #[error("Section {index} ({section_type}) is missing content")]
    MissingSectionContent { index: usize, section_type: String },
}

impl From<RuleViolation> for ExError {
    fn from(err: RuleViolation) -> Self {
        let message = err.to_string();
        let base = ExError::new(ExErrorKind::InvalidInput).with_message(message);
        match err {
            RuleViolation::WeightOutOfRange { .. } => base.with_field("weight"),
            RuleViolation::EmptyAxes => base.with_field("axes"),
            RuleViolation::UnknownAxis { axis } => base.with_field(format!("axes.{}", axis)),
            RuleViolation::UnknownAxisValue { axis, .. } => {
                base.with_field(format!("axes.{}", axis))
            }
            RuleViolation::UnknownStatus { .. } => base.with_field("status"),
            RuleViolation::InvalidSlug { slug } => base.with_field("slug").with_entity_id(slug),
            RuleViolation::EmptyName => base.with_field("name"),
            RuleViolation::SlugMismatch { route, .. } => {
                base.with_field("variant.slug").with_entity_id(route)
            }
            RuleViolation::EmptySectionType { index } => {
                base.with_field(format!("sections[{}].section_type", index))
            }
            RuleViolation::UnsupportedSectionType { section_type, .. } => {
                base.with_field(section_type)
            }
            RuleViolation::MissingSectionContent { index, .. } => {
                base.with_field(format!("sections[{}].content", index))
            }
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
