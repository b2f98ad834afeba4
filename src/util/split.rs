/// Splits `text` on every occurrence of `separator` that sits at nesting
/// depth zero and outside a quoted literal.
///
/// Parentheses, brackets and braces open nesting levels; double quotes open
/// a literal in which a backslash escapes the next character. Pieces are
/// returned trimmed. Empty input yields an empty vector.
///
/// # Parameters
/// - `text`: The text to split.
/// - `separator`: A non-empty separator, e.g. `","`, `"."`, `":="` or `"|"`.
///
/// # Returns
/// The top-level pieces in order.
///
/// # Example
/// ```
/// use nepa::util::split::split_top_level;
///
/// let parts = split_top_level(r#"1, [2, 3], "a,b", f(4, 5)"#, ",");
/// assert_eq!(parts, vec!["1", "[2, 3]", r#""a,b""#, "f(4, 5)"]);
///
/// let path = split_top_level(r#"d["x.y"].campo[0]"#, ".");
/// assert_eq!(path, vec![r#"d["x.y"]"#, "campo[0]"]);
/// ```
#[must_use]
pub fn split_top_level<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if text.trim().is_empty() || separator.is_empty() {
        return if text.trim().is_empty() { Vec::new() } else { vec![text.trim()] };
    }

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    let mut skip_until = 0;

    for (i, ch) in text.char_indices() {
        if i < skip_until {
            continue;
        }
        if in_quotes {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {},
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[i..].starts_with(separator) => {
                pieces.push(text[start..i].trim());
                start = i + separator.len();
                skip_until = start;
            },
            _ => {},
        }
    }
    pieces.push(text[start..].trim());
    pieces
}

/// Reports whether the delimiters and quotes of `text` are balanced.
///
/// # Example
/// ```
/// use nepa::util::split::is_balanced;
///
/// assert!(is_balanced(r#"[1, {"a": (2)}]"#));
/// assert!(!is_balanced("[1, 2"));
/// assert!(!is_balanced(r#""abierto"#));
/// ```
#[must_use]
pub fn is_balanced(text: &str) -> bool {
    let mut stack = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_quotes {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {},
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.pop() != Some(ch) {
                    return false;
                }
            },
            _ => {},
        }
    }
    stack.is_empty() && !in_quotes
}
