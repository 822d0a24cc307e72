//! Fixed route arguments: `Static.Serve("public", "index.html")`.
//!
//! The text between the parentheses is one CSV record. Fields may be quoted
//! with `"` (a doubled `""` is a literal quote) and leading whitespace before
//! each field is dropped.

/// Parse the argument list of a route declaration.
///
/// Blank input yields no arguments.
pub fn parse_fixed_args(input: &str) -> Result<Vec<String>, String> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start();
        if let Some(quoted) = rest.strip_prefix('"') {
            let (field, after) = read_quoted(quoted)?;
            fields.push(field);
            match after.strip_prefix(',') {
                Some(next) => rest = next,
                None if after.is_empty() => break,
                None => return Err(format!("extraneous or missing \" in quoted field {after:?}")),
            }
        } else {
            let (field, next) = match rest.split_once(',') {
                Some((field, next)) => (field, Some(next)),
                None => (rest, None),
            };
            if field.contains('"') {
                return Err(format!("bare \" in non-quoted field {field:?}"));
            }
            fields.push(field.to_string());
            match next {
                Some(next) => rest = next,
                None => break,
            }
        }
    }
    Ok(fields)
}

/// Read a quoted field whose opening quote was already consumed. Returns the
/// unescaped field and the text after the closing quote.
fn read_quoted(input: &str) -> Result<(String, &str), String> {
    let mut field = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            field.push(c);
            continue;
        }
        if input[i + 1..].starts_with('"') {
            field.push('"');
            chars.next();
            continue;
        }
        return Ok((field, &input[i + 1..]));
    }
    Err("unterminated quoted field".to_string())
}
