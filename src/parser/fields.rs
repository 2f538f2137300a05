//! Tokenizer for comma separated client config lines
//!
//! `name = wireguard, private-key = "a=", peers = [{endpoint = 1.2.3.4:51820}]`
//! splits into three fields. Commas inside double quotes, `[...]` and `{...}`
//! do not split.

/// Splits on top-level commas and trims each field
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '[' | '{' if !in_quotes => depth += 1,
            ']' | '}' if !in_quotes => depth = depth.saturating_sub(1),
            ',' if !in_quotes && depth == 0 => {
                fields.push(line[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(line[start..].trim());
    fields
}

/// Splits a field at its first `=` into a trimmed key and value
pub fn key_value(field: &str) -> Option<(&str, &str)> {
    field
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Strips one pair of surrounding double quotes
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Strips a surrounding pair of delimiters, e.g. `[` and `]`
pub fn strip_delimiters(value: &str, open: char, close: char) -> Option<&str> {
    value
        .trim()
        .strip_prefix(open)
        .and_then(|v| v.strip_suffix(close))
        .map(str::trim)
}

/// Unquoted value of the first field whose key matches, ignoring case
pub fn find_value<'a>(fields: &[&'a str], key: &str) -> Option<&'a str> {
    find_values(fields, key).into_iter().next()
}

/// Unquoted values of every field whose key matches, in order
pub fn find_values<'a>(fields: &[&'a str], key: &str) -> Vec<&'a str> {
    fields
        .iter()
        .filter_map(|field| key_value(field))
        .filter(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| unquote(v))
        .collect()
}

/// `name = type, ...` → (`name`, lowercased `type`)
pub fn type_token(line: &str) -> Option<(&str, String)> {
    let first = line.split(',').next()?;
    let (name, kind) = key_value(first)?;
    if name.is_empty() {
        return None;
    }
    Some((name, kind.to_ascii_lowercase()))
}
