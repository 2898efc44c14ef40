// Output formatting — terminal display and label strings.

pub mod terminal;

use crate::topics::salience::{Granularity, LabelEntry};

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Render a ranked label list as one display string.
///
/// Unigrams read as a run of words ("gun control violence"); bigrams and
/// phrases need commas to stay legible ("gun control, assault weapon").
pub fn format_labels(labels: &[LabelEntry], granularity: Granularity) -> String {
    labels
        .iter()
        .map(|l| l.term.as_str())
        .collect::<Vec<_>>()
        .join(granularity.separator())
}
