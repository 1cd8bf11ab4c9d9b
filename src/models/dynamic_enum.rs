//! Config-authored enumerations with paired internal/friendly forms.

use serde::{Deserialize, Serialize};

pub const NONE_VALUE: &str = "None";
pub const CUSTOM_VALUE: &str = "Custom";

/// A closed, ordered set of values for a card field that is not a
/// program-level enum (border art, text box layout, expansion icon, ...).
///
/// Each entry exists twice at the same index: the internal value (no
/// spaces, used as a key fragment) and the friendly value shown to users.
///
/// # Clamp-on-miss
///
/// [`value_for`](Self::value_for) and [`friendly_for`](Self::friendly_for)
/// never fail. Unknown input maps to the first entry, and the index is
/// bounded by the last entry, so stale or hand-edited card values normalize
/// to an edge value instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicEnum {
    id: String,
    friendly_id: String,
    values: Vec<String>,
    friendly_values: Vec<String>,
}

impl DynamicEnum {
    /// Build an enum from friendly values.
    ///
    /// `add_none` prepends the synthetic `None` entry, `add_custom` appends
    /// the synthetic `Custom` entry.
    pub fn new<I, S>(friendly_id: &str, friendly_values: I, add_none: bool, add_custom: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut friendly: Vec<String> = Vec::new();
        if add_none {
            friendly.push(NONE_VALUE.to_string());
        }
        friendly.extend(friendly_values.into_iter().map(Into::into));
        if add_custom {
            friendly.push(CUSTOM_VALUE.to_string());
        }

        let values = friendly.iter().map(|f| internal_value(f)).collect();

        Self {
            id: internal_value(friendly_id),
            friendly_id: friendly_id.to_string(),
            values,
            friendly_values: friendly,
        }
    }

    /// Build an enum from internal values (`ThreeLoreThreeGametext`), deriving
    /// the friendly forms.
    pub fn from_values<I, S>(id: &str, values: I, add_none: bool, add_custom: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let friendly: Vec<String> = values
            .into_iter()
            .map(|v| friendly_value(v.as_ref()))
            .collect();
        Self::new(id, friendly, add_none, add_custom)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn friendly_id(&self) -> &str {
        &self.friendly_id
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn friendly_values(&self) -> &[String] {
        &self.friendly_values
    }

    /// The first internal value (`None` when the enum is optional).
    pub fn default_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }

    pub fn default_friendly_value(&self) -> &str {
        self.friendly_values.first().map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Internal value for a friendly value, clamping on miss.
    pub fn value_for(&self, friendly: &str) -> &str {
        let index = clamp_index(
            self.friendly_values.iter().position(|f| f == friendly),
            self.values.len(),
        );
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Friendly value for an internal value, clamping on miss.
    pub fn friendly_for(&self, value: &str) -> &str {
        let index = clamp_index(
            self.values.iter().position(|v| v == value),
            self.friendly_values.len(),
        );
        self.friendly_values
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Normalize any string to a declared internal value.
    pub fn normalize(&self, value: &str) -> &str {
        self.value_for(self.friendly_for(value))
    }
}

fn clamp_index(found: Option<usize>, len: usize) -> usize {
    found.unwrap_or(0).min(len.saturating_sub(1))
}

/// True when a resolved value selects the card's embedded payload.
pub fn is_custom(value: &str) -> bool {
    value.ends_with(CUSTOM_VALUE)
}

/// Insert spaces for display: before an uppercase letter that follows a
/// letter or digit, and before a digit that follows a lowercase letter.
///
/// `ThreeLoreThreeGametext` becomes `Three Lore Three Gametext`,
/// `Premiere2` becomes `Premiere 2`.
pub fn friendly_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut prev: Option<char> = None;
    for c in value.chars() {
        if let Some(p) = prev {
            if (p.is_alphanumeric() && c.is_uppercase()) || (p.is_lowercase() && c.is_ascii_digit()) {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Strip spaces to get the internal form back.
pub fn internal_value(friendly: &str) -> String {
    friendly.replace(' ', "")
}
