//! Splicing a prompt template into the composer buffer.

/// Insert `template` into `content` at the char offset `cursor`, keeping the
/// template on its own line(s).
///
/// A newline goes before the template unless the text before the cursor is
/// empty or already ends with one, and after it unless the text after the
/// cursor is empty or already starts with one. Offsets past the end of the
/// buffer are clamped to the end.
pub fn insert_at_cursor(content: &str, cursor: usize, template: &str) -> String {
    let split = byte_offset(content, cursor);
    let (before, after) = content.split_at(split);

    let lead = if !before.is_empty() && !before.ends_with('\n') { "\n" } else { "" };
    let trail = if !after.is_empty() && !after.starts_with('\n') { "\n" } else { "" };

    let mut out = String::with_capacity(content.len() + template.len() + 2);
    out.push_str(before);
    out.push_str(lead);
    out.push_str(template);
    out.push_str(trail);
    out.push_str(after);
    out
}

/// Byte index of the `cursor`-th char, clamped to the end of `s`
fn byte_offset(s: &str, cursor: usize) -> usize {
    s.char_indices().nth(cursor).map(|(i, _)| i).unwrap_or(s.len())
}

/// A pending insertion handed from the picker to whoever owns the buffer.
///
/// The picker never touches the buffer; the owner runs [`Insertion::apply`]
/// against its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub cursor: usize,
    pub template: String,
}

impl Insertion {
    pub fn new(cursor: usize, template: impl Into<String>) -> Self {
        Self {
            cursor,
            template: template.into(),
        }
    }

    pub fn apply(&self, current: &str) -> String {
        insert_at_cursor(current, self.cursor, &self.template)
    }

    /// Char offset just past the inserted template (and its leading newline)
    /// within the buffer produced by [`Insertion::apply`].
    pub fn end_cursor(&self, current: &str) -> usize {
        let len = current.chars().count();
        let cursor = self.cursor.min(len);
        let needs_lead = cursor > 0
            && current.chars().nth(cursor - 1).is_some_and(|c| c != '\n');
        cursor + usize::from(needs_lead) + self.template.chars().count()
    }
}
