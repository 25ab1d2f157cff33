use super::WebError;
use crate::domain::MembershipId;

const FILM_ORDER_FIELD: &str = "film_order";

/// Reads every `film_order` value from a urlencoded body, keeping submission
/// order. Blank values (an empty list still posts the field name) are skipped.
pub fn parse_film_order(body: &[u8]) -> Result<Vec<MembershipId>, WebError> {
    url::form_urlencoded::parse(body)
        .filter(|(key, _)| key == FILM_ORDER_FIELD)
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(_, value)| validate_membership_id(value.trim()))
        .collect()
}

pub fn validate_membership_id(raw: &str) -> Result<MembershipId, WebError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(MembershipId::new(id)),
        _ => Err(WebError::validation(format!(
            "Invalid film list entry id: {raw}"
        ))),
    }
}

/// Accepts only same-site absolute paths as a post-login target.
#[must_use]
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.chars().any(char::is_control);
    local.then_some(next)
}
