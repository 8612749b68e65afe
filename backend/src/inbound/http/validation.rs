//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` error whose `details`
//! carry the offending field and a machine-readable code.

use serde_json::json;

use crate::domain::{Error, PersonName, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
    InvalidObjectId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::InvalidObjectId => "invalid_object_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be empty"))
        .with_code(ErrorCode::EmptyField)
}

pub(crate) fn invalid_object_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be a 24 character hexadecimal object id"),
    )
    .with_value(ErrorCode::InvalidObjectId, value)
}

/// Parse a path identifier, failing with `invalid_object_id`.
pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_object_id_error(field, value))
}

/// Validate a required name field.
pub(crate) fn parse_required_name(
    value: Option<String>,
    field: FieldName,
) -> Result<PersonName, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    PersonName::new(raw).map_err(|_| empty_field_error(field))
}

/// Validate a name field that may be left out.
pub(crate) fn parse_optional_name(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<PersonName>, Error> {
    value
        .map(|raw| PersonName::new(raw).map_err(|_| empty_field_error(field)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    const NAME: FieldName = FieldName::new("name");
    const ID: FieldName = FieldName::new("id");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn missing_required_name_reports_missing_field() {
        let error = parse_required_name(None, NAME).expect_err("missing name");
        assert_eq!(error.message(), "missing required field: name");
        assert_eq!(detail(&error, "field"), Some("name"));
        assert_eq!(detail(&error, "code"), Some("missing_field"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_report_empty_field(#[case] raw: &str) {
        let error = parse_required_name(Some(raw.to_owned()), NAME).expect_err("blank name");
        assert_eq!(detail(&error, "code"), Some("empty_field"));

        let error = parse_optional_name(Some(raw.to_owned()), NAME).expect_err("blank name");
        assert_eq!(detail(&error, "code"), Some("empty_field"));
    }

    #[rstest]
    fn omitted_optional_name_is_none() {
        assert_eq!(parse_optional_name(None, NAME).expect("omitted"), None);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("655ba3d28d4531f9e785989z")]
    fn malformed_ids_report_invalid_object_id(#[case] raw: &str) {
        let error = parse_user_id(raw, ID).expect_err("invalid id");
        assert_eq!(detail(&error, "code"), Some("invalid_object_id"));
        assert_eq!(detail(&error, "value"), Some(raw));
    }

    #[rstest]
    fn well_formed_id_parses() {
        let id = parse_user_id("655ba3d28d4531f9e785989d", ID).expect("valid id");
        assert_eq!(id.as_ref(), "655ba3d28d4531f9e785989d");
    }
}
