use crate::config::model::{AppConfig, LocalizationEntry};

/// App Store character limits, counted in Unicode scalar values.
pub const CHAR_LIMITS: [(LimitedField, usize); 4] = [
    (LimitedField::Name, 30),
    (LimitedField::Subtitle, 30),
    (LimitedField::Keywords, 100),
    (LimitedField::Description, 4000),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitedField {
    Name,
    Subtitle,
    Keywords,
    Description,
}

impl LimitedField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Subtitle => "subtitle",
            Self::Keywords => "keywords",
            Self::Description => "description",
        }
    }

    fn value(self, entry: &LocalizationEntry) -> &str {
        match self {
            Self::Name => &entry.name,
            Self::Subtitle => &entry.subtitle,
            Self::Keywords => &entry.keywords,
            Self::Description => &entry.description,
        }
    }
}

impl std::fmt::Display for LimitedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field over its limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitViolation {
    pub language: String,
    pub field: LimitedField,
    pub current: usize,
    pub limit: usize,
}

impl LimitViolation {
    pub fn excess(&self) -> usize {
        self.current - self.limit
    }
}

/// Check every language's limited fields; violations in declaration order.
pub fn check_limits(config: &AppConfig) -> Vec<LimitViolation> {
    let mut violations = Vec::new();
    for (language, entry) in &config.localization {
        for (field, limit) in CHAR_LIMITS {
            let current = field.value(entry).chars().count();
            tracing::debug!(language = %language, %field, current, limit, "field length");
            if current > limit {
                violations.push(LimitViolation {
                    language: language.clone(),
                    field,
                    current,
                    limit,
                });
            }
        }
    }
    violations
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/limits.rs"]
mod tests;
