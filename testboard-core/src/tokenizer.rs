//! Quote-aware CSV tokenizer for spreadsheet exports.

/// One tokenized CSV line.
pub type RawRow = Vec<String>;

/// Split CSV text into rows of trimmed field values.
///
/// Lines are split on `\n` first; within a line a `"` toggles quoted mode and
/// commas inside quotes stay part of the field. An unterminated quote swallows
/// the rest of its line instead of failing.
pub fn tokenize(text: &str) -> Vec<RawRow> {
    text.trim().split('\n').map(tokenize_line).collect()
}

fn tokenize_line(line: &str) -> RawRow {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(close_field(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(close_field(&mut current));
    fields
}

fn close_field(current: &mut String) -> String {
    let value = std::mem::take(current);
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}
