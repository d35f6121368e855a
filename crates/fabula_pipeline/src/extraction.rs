//! Contract extraction from model responses.
//!
//! Generative models wrap their JSON payloads in prose, markdown fences,
//! or both. [`extract_contract`] slices the candidate object out of the
//! surrounding text and [`parse_contract`] deserializes it into a typed
//! contract, preserving the raw text on failure for diagnostics.

use fabula_error::{ContractError, ContractErrorKind, FabulaResult};
use serde::de::DeserializeOwned;

/// Extracts the JSON object embedded in a model response.
///
/// Slices from the first `{` to the last `}` in the response. The span
/// is not brace-balanced, so a stray `}` in trailing prose widens the
/// candidate and fails the subsequent parse rather than silently
/// accepting a truncated object.
///
/// # Errors
///
/// Returns [`ContractErrorKind::NotFound`] when the response contains no
/// `{`/`}` pair in order.
///
/// # Examples
///
/// ```
/// use fabula_pipeline::extract_contract;
///
/// let response = "Here is the story:\n```json\n{\"storyline\": \"...\"}\n```";
/// let candidate = extract_contract(response).unwrap();
/// assert_eq!(candidate, "{\"storyline\": \"...\"}");
/// ```
pub fn extract_contract(response: &str) -> FabulaResult<&str> {
    let start = response.find('{');
    let end = response.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start <= end => Ok(&response[start..=end]),
        _ => Err(ContractError::new(ContractErrorKind::NotFound {
            response: response.to_string(),
        })
        .into()),
    }
}

/// Extracts and deserializes a typed contract from a model response.
///
/// # Errors
///
/// Returns [`ContractErrorKind::NotFound`] when no JSON object is present
/// and [`ContractErrorKind::Malformed`] when the candidate span does not
/// deserialize into `T`. Both variants carry the raw text so callers can
/// log what the model actually said.
///
/// # Examples
///
/// ```
/// use fabula_pipeline::parse_contract;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Story {
///     storyline: String,
/// }
///
/// let story: Story = parse_contract("{\"storyline\": \"a quiet heist\"}").unwrap();
/// assert_eq!(story.storyline, "a quiet heist");
/// ```
pub fn parse_contract<T: DeserializeOwned>(response: &str) -> FabulaResult<T> {
    let candidate = extract_contract(response)?;
    serde_json::from_str(candidate).map_err(|error| {
        ContractError::new(ContractErrorKind::Malformed {
            message: error.to_string(),
            response: candidate.to_string(),
        })
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_error::FabulaErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn extracts_fenced_object() {
        let response = "Sure! Here you go:\n```json\n{\"value\": 7}\n```\nHope that helps.";
        assert_eq!(extract_contract(response).unwrap(), "{\"value\": 7}");
    }

    #[test]
    fn extracts_bare_object() {
        assert_eq!(extract_contract("{\"value\": 1}").unwrap(), "{\"value\": 1}");
    }

    #[test]
    fn missing_object_is_not_found() {
        let error = extract_contract("no json here").unwrap_err();
        let FabulaErrorKind::Contract(contract) = error.kind() else {
            panic!("expected contract error, got {error}");
        };
        assert!(matches!(
            contract.kind,
            ContractErrorKind::NotFound { .. }
        ));
    }

    #[test]
    fn reversed_braces_are_not_found() {
        // A `}` before any `{` yields no valid span.
        let error = extract_contract("} oops {").unwrap_err();
        let FabulaErrorKind::Contract(contract) = error.kind() else {
            panic!("expected contract error, got {error}");
        };
        assert!(matches!(
            contract.kind,
            ContractErrorKind::NotFound { .. }
        ));
    }

    #[test]
    fn parses_typed_contract() {
        let probe: Probe = parse_contract("prefix {\"value\": 42} suffix").unwrap();
        assert_eq!(probe, Probe { value: 42 });
    }

    #[test]
    fn trailing_brace_in_prose_fails_closed() {
        // The widened span includes the stray brace and fails the parse
        // instead of returning a truncated object.
        let response = "{\"value\": 3} and one spare }";
        let error = parse_contract::<Probe>(response).unwrap_err();
        let FabulaErrorKind::Contract(contract) = error.kind() else {
            panic!("expected contract error, got {error}");
        };
        assert!(matches!(
            contract.kind,
            ContractErrorKind::Malformed { .. }
        ));
    }

    #[test]
    fn malformed_preserves_raw_candidate() {
        let error = parse_contract::<Probe>("{\"value\": \"not a number\"}").unwrap_err();
        let FabulaErrorKind::Contract(contract) = error.kind() else {
            panic!("expected contract error, got {error}");
        };
        assert_eq!(
            contract.raw_response(),
            Some("{\"value\": \"not a number\"}")
        );
    }
}
