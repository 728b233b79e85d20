//! Theme export text

use thiserror::Error;

use crate::value::json::ToJsonError;
use crate::value::Value;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Unrepresentable(#[from] ToJsonError),
    #[error("theme is not plain data")]
    NotData,
    #[error("failed to format theme: {0}")]
    Format(#[from] serde_json::Error),
}

/// Render `export const theme = { ... }` for a composed theme.
/// Functions and elements are left out.
pub fn export_theme(theme: &Value) -> Result<String, ExportError> {
    let json = theme.to_json()?.ok_or(ExportError::NotData)?;
    let body = serde_json::to_string_pretty(&json)?;
    Ok(format!("export const theme = {}\n", body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_export_shape() {
        let mut map = Object::new();
        map.insert("radius".to_string(), Value::from("4px"));
        map.insert("render".to_string(), Value::native("render", |_, _, _| Ok(Value::Null)));
        let text = export_theme(&Value::object(map)).unwrap();
        assert!(text.starts_with("export const theme = {"));
        assert!(text.contains("\"radius\": \"4px\""));
        assert!(!text.contains("render"));
    }

    #[test]
    fn test_non_finite_numbers_fail() {
        let mut map = Object::new();
        map.insert("huge".to_string(), Value::Number(f64::INFINITY));
        assert!(matches!(
            export_theme(&Value::object(map)),
            Err(ExportError::Unrepresentable(_))
        ));
    }
}
