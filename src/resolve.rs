//! Override chains: ordered candidate IDs, most specific first.
//!
//! Candidate order depends only on the inputs, never on config contents.
//! Callers try each candidate against a config map and use the first hit;
//! an exhausted chain means "skip this element".

/// `[{enum_id}.{value}, {enum_id}]`.
///
/// A `None` value (the enum or field is absent) yields just the bare id.
pub fn single_axis(enum_id: &str, value: Option<&str>) -> Vec<String> {
    match value {
        Some(value) => vec![format!("{enum_id}.{value}"), enum_id.to_string()],
        None => vec![enum_id.to_string()],
    }
}

/// Six candidates for an element that depends on two enum fields.
///
/// ```
/// use card_composer::resolve::dual_axis;
///
/// let ids = dual_axis(("TypedTextBox", Some("Large")), ("ExpansionIcon", Some("Premiere")));
/// assert_eq!(ids[0], "TypedTextBox.Large.ExpansionIcon.Premiere");
/// assert_eq!(ids[5], "ExpansionIcon");
/// ```
///
/// Candidates that need a missing value are left out; the bare second
/// axis id is always last.
pub fn dual_axis(first: (&str, Option<&str>), second: (&str, Option<&str>)) -> Vec<String> {
    let (e1, v1) = first;
    let (e2, v2) = second;
    let mut out = Vec::with_capacity(6);

    if let Some(v1) = v1 {
        if let Some(v2) = v2 {
            out.push(format!("{e1}.{v1}.{e2}.{v2}"));
        }
        out.push(format!("{e1}.{v1}.{e2}"));
    }
    if let Some(v2) = v2 {
        out.push(format!("{e1}.{e2}.{v2}"));
    }
    out.push(format!("{e1}.{e2}"));
    if let Some(v2) = v2 {
        out.push(format!("{e2}.{v2}"));
    }
    out.push(e2.to_string());
    out
}

/// Successively strip leading dotted segments: `A.B.C`, `B.C`, `C`.
pub fn suffixes(id: &str) -> Vec<String> {
    let mut out = vec![id.to_string()];
    let mut rest = id;
    while let Some(pos) = rest.find('.') {
        rest = &rest[pos + 1..];
        if rest.is_empty() {
            break;
        }
        out.push(rest.to_string());
    }
    out
}

/// Return the first candidate accepted by `lookup`, with its value.
pub fn first_match<'a, T, F>(candidates: &'a [String], mut lookup: F) -> Option<(&'a str, T)>
where
    F: FnMut(&str) -> Option<T>,
{
    candidates
        .iter()
        .find_map(|id| lookup(id).map(|hit| (id.as_str(), hit)))
}
