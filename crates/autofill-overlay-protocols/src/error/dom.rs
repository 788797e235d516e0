//! Host DOM errors.

use thiserror::Error;

use crate::types::ElementId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element {0} cannot have children")]
    InvalidParent(ElementId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_error() {
        let err = DomError::ElementNotFound(ElementId(7));
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_invalid_parent_error() {
        let err = DomError::InvalidParent(ElementId(3));
        assert!(err.to_string().contains("cannot have children"));
    }
}
