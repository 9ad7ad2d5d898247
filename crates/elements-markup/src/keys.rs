//! Attribute name to prop key normalization.

/// Convert an attribute-like name into a lower camel case prop key.
///
/// The name is split on runs of hyphens, underscores and whitespace. The first
/// character of the first segment is lower-cased, the first character of every
/// following segment is upper-cased, and everything else is kept as written.
///
/// ```
/// use elements_markup::prop_key;
///
/// assert_eq!(prop_key("test-slot"), "testSlot");
/// assert_eq!(prop_key("TestSlot"), "testSlot");
/// ```
pub fn prop_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());

    let segments = value
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty());

    for (index, segment) in segments.enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                key.extend(first.to_lowercase());
            } else {
                key.extend(first.to_uppercase());
            }
            key.push_str(chars.as_str());
        }
    }

    key
}
