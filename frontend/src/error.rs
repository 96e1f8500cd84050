use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Element not found: {0}")]
    MissingElement(String),
    #[error("No global window")]
    NoWindow,
    #[error("No document on window")]
    NoDocument,
    #[error("Canvas has no 2d context")]
    NoCanvasContext,
    #[error("DOM call failed: {0}")]
    Js(String),
    #[error("Invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}

impl EnhanceError {
    pub fn missing(selector: &str) -> Self {
        EnhanceError::MissingElement(selector.to_string())
    }

    /// Absent markup. The entry point logs these at debug and skips the component.
    pub fn is_missing_element(&self) -> bool {
        matches!(self, EnhanceError::MissingElement(_))
    }
}

impl From<JsValue> for EnhanceError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        EnhanceError::Js(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_element_is_flagged() {
        let err = EnhanceError::missing("#btn-menu");
        assert!(err.is_missing_element());
        assert_eq!(err.to_string(), "Element not found: #btn-menu");
    }

    #[test]
    fn config_errors_are_not_missing_elements() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = EnhanceError::from(parse);
        assert!(!err.is_missing_element());
        assert!(err.to_string().starts_with("Invalid page config"));
    }
}
