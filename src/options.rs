use serde::{Deserialize, Serialize};

/// A selectable option as it arrives from a form definition.
///
/// Either a bare display string or a `{value, label}` pair. Only the label is
/// ever translated; `value` is what gets submitted and stays untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionItem {
    Plain(String),
    Labeled { value: String, label: String },
}

impl OptionItem {
    pub fn plain(text: impl Into<String>) -> Self {
        OptionItem::Plain(text.into())
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        OptionItem::Labeled {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The text shown to the user.
    pub fn label(&self) -> &str {
        match self {
            OptionItem::Plain(text) => text,
            OptionItem::Labeled { label, .. } => label,
        }
    }

    /// Same option with its display text replaced, preserving the variant.
    pub fn with_label(self, label: String) -> Self {
        match self {
            OptionItem::Plain(_) => OptionItem::Plain(label),
            OptionItem::Labeled { value, .. } => OptionItem::Labeled { value, label },
        }
    }
}

impl From<&str> for OptionItem {
    fn from(text: &str) -> Self {
        OptionItem::plain(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_mixed_options() {
        let options: Vec<OptionItem> = serde_json::from_value(json!([
            "Cardiology",
            { "value": "neuro", "label": "Neurology" }
        ]))
        .unwrap();

        assert_eq!(
            options,
            vec![
                OptionItem::plain("Cardiology"),
                OptionItem::labeled("neuro", "Neurology"),
            ]
        );
    }

    #[test]
    fn test_serialize_keeps_shape() {
        let value = serde_json::to_value(vec![
            OptionItem::plain("Yes"),
            OptionItem::labeled("n", "No"),
        ])
        .unwrap();

        assert_eq!(value, json!(["Yes", { "value": "n", "label": "No" }]));
    }

    #[test]
    fn test_with_label_preserves_value() {
        let option = OptionItem::labeled("neuro", "Neurology").with_label("Neurología".to_string());

        assert_eq!(option.label(), "Neurología");
        assert_eq!(option, OptionItem::labeled("neuro", "Neurología"));
        assert_eq!(
            OptionItem::from("Yes").with_label("Sí".to_string()),
            OptionItem::plain("Sí")
        );
    }
}
