use crate::objects::Labels;

/// Whether `labels` carries every key/value pair of `selector`.
/// An empty selector selects nothing.
pub fn selector_match(selector: &Labels, labels: &Labels) -> bool {
    !selector.is_empty()
        && selector
            .iter()
            .all(|(key, value)| labels.get(key.as_str()) == Some(value))
}

/// Renders labels as `k1=v1,k2=v2`.
pub fn fmt_labels(labels: &Labels) -> String {
    labels
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}
