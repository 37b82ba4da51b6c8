//! Request validation from declarative field rules.
//!
//! Bodies are checked as raw JSON before they are deserialized, so every field error is reported at
//! once with the message attached to the failing rule.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    Text,
    /// Whole number. Numeric strings are coerced and empty strings count as absent.
    Integer,
    /// Array of strings.
    TextList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    /// Lowercase, uppercase, digit and a non-word character.
    StrongPassword,
}

/// Constraint set for one field. Each constraint carries the message reported when it fails.
#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    pub kind: FieldKind,
    pub required: Option<&'static str>,
    /// Alternative key accepted in the body and moved to the canonical one.
    pub alias: Option<&'static str>,
    pub min_length: Option<(usize, &'static str)>,
    pub max_length: Option<(usize, &'static str)>,
    pub pattern: Option<(&'static str, &'static str)>,
    pub format: Option<(Format, &'static str)>,
    pub minimum: Option<(i64, &'static str)>,
    pub maximum: Option<(i64, &'static str)>,
}

impl ValidationRule {
    pub fn text() -> Self {
        Self::default()
    }

    pub fn integer() -> Self {
        ValidationRule {
            kind: FieldKind::Integer,
            ..Self::default()
        }
    }

    pub fn text_list() -> Self {
        ValidationRule {
            kind: FieldKind::TextList,
            ..Self::default()
        }
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn alias(mut self, key: &'static str) -> Self {
        self.alias = Some(key);
        self
    }

    pub fn min_len(mut self, n: usize, message: &'static str) -> Self {
        self.min_length = Some((n, message));
        self
    }

    pub fn max_len(mut self, n: usize, message: &'static str) -> Self {
        self.max_length = Some((n, message));
        self
    }

    pub fn pattern(mut self, re: &'static str, message: &'static str) -> Self {
        self.pattern = Some((re, message));
        self
    }

    pub fn format(mut self, format: Format, message: &'static str) -> Self {
        self.format = Some((format, message));
        self
    }

    pub fn min(mut self, n: i64, message: &'static str) -> Self {
        self.minimum = Some((n, message));
        self
    }

    pub fn max(mut self, n: i64, message: &'static str) -> Self {
        self.maximum = Some((n, message));
        self
    }
}

pub type Rules = Vec<(&'static str, ValidationRule)>;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against per-field rules. All required fields must be present.
    /// Integer fields given as strings are rewritten in place so the body deserializes afterwards.
    pub fn validate(body: &mut Value, rules: &[(&'static str, ValidationRule)]) -> Result<(), AppError> {
        Self::run(body, rules, false)
    }

    /// Validate only the fields present in body (for PATCH). Required is not enforced for missing fields.
    pub fn validate_partial(body: &mut Value, rules: &[(&'static str, ValidationRule)]) -> Result<(), AppError> {
        Self::run(body, rules, true)
    }

    fn run(body: &mut Value, rules: &[(&'static str, ValidationRule)], partial: bool) -> Result<(), AppError> {
        let Some(obj) = body.as_object_mut() else {
            return Err(AppError::Validation {
                message: "request body must be a JSON object".into(),
                fields: BTreeMap::new(),
            });
        };
        let mut errors = BTreeMap::new();
        for (field, rule) in rules {
            if let Some(alias) = rule.alias {
                if !obj.contains_key(*field) {
                    if let Some(v) = obj.remove(alias) {
                        obj.insert(field.to_string(), v);
                    }
                }
            }
            if rule.kind == FieldKind::Integer {
                if let Err(message) = coerce_integer(obj, field) {
                    errors.insert(field.to_string(), message);
                    continue;
                }
            }
            match obj.get(*field) {
                None | Some(Value::Null) => {
                    if let (Some(message), false) = (rule.required, partial) {
                        errors.insert(field.to_string(), message.to_string());
                    }
                }
                Some(v) => {
                    if let Err(message) = validate_field(field, v, rule) {
                        errors.insert(field.to_string(), message);
                    }
                }
            }
        }
        if errors.is_empty() {
            return Ok(());
        }
        let message = if errors.len() == 1 {
            errors.values().next().cloned().unwrap_or_default()
        } else {
            "Validation error".to_string()
        };
        Err(AppError::Validation { message, fields: errors })
    }
}

fn coerce_integer(obj: &mut Map<String, Value>, field: &str) -> Result<(), String> {
    let Some(Value::String(s)) = obj.get(field) else {
        return Ok(());
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        obj.remove(field);
        return Ok(());
    }
    let n: i64 = trimmed
        .parse()
        .map_err(|_| format!("{} must be a whole number", field))?;
    obj.insert(field.to_string(), Value::from(n));
    Ok(())
}

fn validate_field(field: &str, v: &Value, rule: &ValidationRule) -> Result<(), String> {
    match rule.kind {
        FieldKind::Text => {
            let s = v.as_str().ok_or_else(|| format!("{} must be a string", field))?;
            validate_text(s, rule)
        }
        FieldKind::Integer => {
            let n = v.as_i64().ok_or_else(|| format!("{} must be a whole number", field))?;
            if let Some((min, message)) = rule.minimum {
                if n < min {
                    return Err(message.to_string());
                }
            }
            if let Some((max, message)) = rule.maximum {
                if n > max {
                    return Err(message.to_string());
                }
            }
            Ok(())
        }
        FieldKind::TextList => {
            let items = v.as_array().ok_or_else(|| format!("{} must be a list of strings", field))?;
            for item in items {
                let s = item.as_str().ok_or_else(|| format!("{} must be a list of strings", field))?;
                validate_text(s, rule)?;
            }
            Ok(())
        }
    }
}

fn validate_text(s: &str, rule: &ValidationRule) -> Result<(), String> {
    let len = s.chars().count();
    if let Some((min, message)) = rule.min_length {
        if len < min {
            return Err(message.to_string());
        }
    }
    if let Some((max, message)) = rule.max_length {
        if len > max {
            return Err(message.to_string());
        }
    }
    if let Some((pattern, message)) = rule.pattern {
        let re = Regex::new(pattern).map_err(|_| format!("invalid pattern {}", pattern))?;
        if !re.is_match(s) {
            return Err(message.to_string());
        }
    }
    if let Some((format, message)) = rule.format {
        let ok = match format {
            Format::Email => is_email(s),
            Format::StrongPassword => is_strong_password(s),
        };
        if !ok {
            return Err(message.to_string());
        }
    }
    Ok(())
}

fn is_email(s: &str) -> bool {
    match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
        Ok(re) => re.is_match(s),
        Err(_) => false,
    }
}

/// At least one lowercase letter, uppercase letter, digit and non-word character (not `[A-Za-z0-9_]`).
pub fn is_strong_password(s: &str) -> bool {
    let lower = s.chars().any(|c| c.is_ascii_lowercase());
    let upper = s.chars().any(|c| c.is_ascii_uppercase());
    let digit = s.chars().any(|c| c.is_ascii_digit());
    let symbol = s.chars().any(|c| !c.is_ascii_alphanumeric() && c != '_');
    lower && upper && digit && symbol
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> Rules {
        vec![
            (
                "name",
                ValidationRule::text()
                    .required("Product name is required")
                    .min_len(1, "Product name is required"),
            ),
            (
                "categoryId",
                ValidationRule::integer()
                    .alias("category_id")
                    .required("Category is required")
                    .min(1, "Category is required"),
            ),
            ("imageKeys", ValidationRule::text_list()),
        ]
    }

    #[test]
    fn reports_every_failing_field() {
        let mut body = json!({ "name": "", "categoryId": 0 });
        match RequestValidator::validate(&mut body, &rules()) {
            Err(AppError::Validation { message, fields }) => {
                assert_eq!(message, "Validation error");
                assert_eq!(fields["name"], "Product name is required");
                assert_eq!(fields["categoryId"], "Category is required");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn single_error_becomes_message() {
        let mut body = json!({ "name": "Kopi" });
        match RequestValidator::validate(&mut body, &rules()) {
            Err(AppError::Validation { message, .. }) => assert_eq!(message, "Category is required"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn coerces_numeric_strings_and_aliases() {
        let mut body = json!({ "name": "Kopi", "category_id": " 12 " });
        RequestValidator::validate(&mut body, &rules()).unwrap();
        assert_eq!(body["categoryId"], 12);
        assert!(body.get("category_id").is_none());
    }

    #[test]
    fn empty_string_integer_is_absent() {
        let mut body = json!({ "categoryId": "" });
        RequestValidator::validate_partial(&mut body, &rules()).unwrap();
        assert!(body.get("categoryId").is_none());
    }

    #[test]
    fn partial_skips_missing_required() {
        let mut body = json!({ "imageKeys": ["1/a.jpeg"] });
        assert!(RequestValidator::validate_partial(&mut body, &rules()).is_ok());
        let mut body = json!({ "imageKeys": [1] });
        assert!(RequestValidator::validate_partial(&mut body, &rules()).is_err());
    }

    #[test]
    fn non_object_body_rejected() {
        let mut body = json!([1, 2]);
        assert!(matches!(
            RequestValidator::validate(&mut body, &rules()),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn password_strength() {
        assert!(is_strong_password("Rahasia#1"));
        assert!(!is_strong_password("rahasia#1"));
        assert!(!is_strong_password("RAHASIA#1"));
        assert!(!is_strong_password("Rahasia_1"));
        assert!(!is_strong_password("Rahasia!!"));
    }

    #[test]
    fn email_shape() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.d"));
    }
}
