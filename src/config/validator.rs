use crate::config::settings::TilingSettings;

#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub name: String,
    pub description: String,
    pub severity: ValidationSeverity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub rule: ValidationRule,
    pub message: String,
    pub field: String,
}

impl ValidationResult {
    pub fn is_error(&self) -> bool {
        self.rule.severity == ValidationSeverity::Error
    }
}

pub struct SettingsValidator {
    rules: Vec<ValidationRule>,
}

impl Default for SettingsValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsValidator {
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }

    pub fn validate(&self, settings: &TilingSettings) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        for (field, value) in [
            ("window_gap", settings.window_gap),
            ("ignore_margin", settings.ignore_margin),
            ("approx_margin", settings.approx_margin),
        ] {
            if value < 0 {
                results.push(self.result(
                    "negative_length",
                    field,
                    format!("{} must not be negative (got {})", field, value),
                ));
            }
        }

        if settings.window_gap > 0 && settings.window_gap >= settings.ignore_margin {
            results.push(self.result(
                "gap_exceeds_ignore_margin",
                "window_gap",
                format!(
                    "window_gap {} is not smaller than ignore_margin {}; thin free areas will be kept inconsistently",
                    settings.window_gap, settings.ignore_margin
                ),
            ));
        }

        if !settings.use_animation {
            results.push(self.result(
                "animation_disabled",
                "use_animation",
                "Window moves are applied without transitions".to_string(),
            ));
        }

        results
    }

    pub fn has_errors(results: &[ValidationResult]) -> bool {
        results.iter().any(ValidationResult::is_error)
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    fn result(&self, rule_name: &str, field: &str, message: String) -> ValidationResult {
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.name == rule_name)
            .cloned()
            .unwrap_or_else(|| ValidationRule {
                name: rule_name.to_string(),
                description: String::new(),
                severity: ValidationSeverity::Error,
            });

        ValidationResult {
            rule,
            message,
            field: field.to_string(),
        }
    }

    fn default_rules() -> Vec<ValidationRule> {
        vec![
            ValidationRule {
                name: "negative_length".to_string(),
                description: "Gaps and margins are pixel lengths".to_string(),
                severity: ValidationSeverity::Error,
            },
            ValidationRule {
                name: "gap_exceeds_ignore_margin".to_string(),
                description: "The gap should stay below the free-space ignore margin".to_string(),
                severity: ValidationSeverity::Warning,
            },
            ValidationRule {
                name: "animation_disabled".to_string(),
                description: "Transitions are turned off".to_string(),
                severity: ValidationSeverity::Info,
            },
        ]
    }
}
