//! Line-level helpers shared by text-mode detectors and fix generators.

const TAB_WIDTH: usize = 8;

/// Visual indentation width. Tabs advance to the next multiple of 8.
pub fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH - (width % TAB_WIDTH),
            _ => break,
        }
    }
    width
}

/// The leading whitespace of a line, verbatim.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..end]
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Neither blank nor a comment-only line.
pub fn is_code(line: &str) -> bool {
    !is_blank(line) && !is_comment(line)
}

/// Index of the last line of the block opened by the header at `header_idx`:
/// the furthest following line before the next statement at the header's
/// indentation or shallower. Continuation lines count as part of the block.
/// Returns `header_idx` when the block is empty or inline.
pub fn block_end(lines: &[String], header_idx: usize) -> usize {
    let header_indent = match lines.get(header_idx) {
        Some(line) => indent_width(line),
        None => return header_idx,
    };
    let starts = statement_starts(lines);
    let mut end = header_idx;
    for (idx, line) in lines.iter().enumerate().skip(header_idx + 1) {
        if !starts[idx] {
            end = idx;
            continue;
        }
        if !is_code(line) {
            continue;
        }
        if indent_width(line) > header_indent {
            end = idx;
        } else {
            break;
        }
    }
    end
}

/// Text after the first top-level `:` of a compound-statement header, if any
/// (the inline body of `else: pass`). Colons inside brackets or strings are
/// ignored.
pub fn inline_body(header: &str) -> Option<&str> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (pos, ch) in header.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                '#' => return None,
                ':' if depth == 0 => {
                    let rest = header[pos + 1..].trim();
                    let rest = rest.split('#').next().unwrap_or("").trim();
                    return (!rest.is_empty()).then_some(rest);
                }
                _ => {}
            },
        }
    }
    None
}

/// Indentation unit inferred from a header and its first body line, falling
/// back to four spaces.
pub fn indent_unit(header: &str, body: Option<&str>) -> String {
    let outer = leading_whitespace(header);
    match body.map(leading_whitespace) {
        Some(inner) if inner.len() > outer.len() && inner.starts_with(outer) => {
            inner[outer.len()..].to_string()
        }
        _ => "    ".to_string(),
    }
}

/// For each line, whether it begins a new logical statement: not inside a
/// triple-quoted string, an open bracket, or a backslash continuation.
pub fn statement_starts(lines: &[String]) -> Vec<bool> {
    let mut starts = Vec::with_capacity(lines.len());
    let mut depth = 0i32;
    let mut triple: Option<u8> = None;
    let mut continued = false;

    for line in lines {
        starts.push(depth <= 0 && triple.is_none() && !continued);
        continued = false;

        let bytes = line.as_bytes();
        let mut quote: Option<u8> = None;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if let Some(delim) = triple {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == delim && bytes[i..].starts_with(&[delim, delim, delim]) {
                    triple = None;
                    i += 3;
                    continue;
                }
            } else if let Some(q) = quote {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
            } else {
                match b {
                    b'"' | b'\'' if bytes[i..].starts_with(&[b, b, b]) => {
                        triple = Some(b);
                        i += 3;
                        continue;
                    }
                    b'"' | b'\'' => quote = Some(b),
                    b'(' | b'[' | b'{' => depth += 1,
                    b')' | b']' | b'}' => depth -= 1,
                    b'#' => break,
                    _ => {}
                }
            }
            i += 1;
        }

        if triple.is_none() && line.trim_end().ends_with('\\') && !is_comment(line) {
            continued = true;
        }
        if depth < 0 {
            depth = 0;
        }
    }
    starts
}
