//! Utility functions for the supplier sync repository.

use crate::errors::IndexError;

/// Longest item id accepted by an external connection.
pub const MAX_ITEM_ID_LEN: usize = 128;

/// Validate an external item id before it is placed in a request path.
///
/// Item ids must be non-empty, at most [`MAX_ITEM_ID_LEN`] characters and
/// contain only alphanumeric characters, `-`, `_` or `.`.
///
/// # Example
///
/// ```
/// use supplier_sync_repository::validate_item_id;
///
/// assert!(validate_item_id("300000047507499").is_ok());
/// assert!(validate_item_id("a/b").is_err());
/// ```
pub fn validate_item_id(item_id: &str) -> Result<(), IndexError> {
    if item_id.is_empty() {
        return Err(IndexError::validation("Item id cannot be empty"));
    }

    if item_id.chars().count() > MAX_ITEM_ID_LEN {
        return Err(IndexError::validation(format!(
            "Item id '{}' is longer than {} characters",
            item_id, MAX_ITEM_ID_LEN
        )));
    }

    if !item_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(IndexError::validation(format!(
            "Item id '{}' contains invalid characters. Only alphanumeric characters, '-', '_' and '.' are allowed",
            item_id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("300000047507499").is_ok());
        assert!(validate_item_id("supplier_1-a.b").is_ok());
    }

    #[test]
    fn test_validate_item_id_empty() {
        assert!(matches!(
            validate_item_id(""),
            Err(IndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_item_id_invalid_characters() {
        for id in ["a/b", "a b", "a?b", "a#b", "a%2F"] {
            assert!(validate_item_id(id).is_err(), "{} should be rejected", id);
        }
    }

    #[test]
    fn test_validate_item_id_too_long() {
        let id = "x".repeat(MAX_ITEM_ID_LEN + 1);
        assert!(validate_item_id(&id).is_err());
        assert!(validate_item_id(&id[..MAX_ITEM_ID_LEN]).is_ok());
    }
}
