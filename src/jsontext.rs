//! Format-preserving edits to JSONC text
//!
//! The sync engine never rewrites a whole descriptor: it locates the byte
//! span of one value (the `references` array, or `compilerOptions.paths`)
//! in the raw text and splices a re-rendered value into that span. Comments,
//! key order, unrelated fields and the trailing newline all survive.
//!
//! The scanner tolerates the JSONC dialect tsconfig files use: `//` and
//! `/* */` comments plus trailing commas.

/// Byte span of a value inside the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Locate the value for `key_path` (e.g. `["compilerOptions", "paths"]`)
/// in the root object of `text`. Returns `None` when any segment of the
/// path is missing or the text is not an object.
pub fn find_value_span(text: &str, key_path: &[&str]) -> Option<Span> {
    let mut scanner = Scanner::new(text.as_bytes());
    scanner.skip_trivia();
    find_in_object(&mut scanner, key_path)
}

fn find_in_object(scanner: &mut Scanner, key_path: &[&str]) -> Option<Span> {
    if scanner.peek()? != b'{' {
        return None;
    }
    scanner.advance();

    loop {
        scanner.skip_trivia();
        match scanner.peek()? {
            b'}' => return None,
            b',' => {
                scanner.advance();
                continue;
            }
            b'"' => {}
            _ => return None,
        }

        let key = scanner.read_string()?;
        scanner.skip_trivia();
        if scanner.peek()? != b':' {
            return None;
        }
        scanner.advance();
        scanner.skip_trivia();

        if key == key_path[0] {
            if key_path.len() == 1 {
                return scanner.value_span();
            }
            return find_in_object(scanner, &key_path[1..]);
        }

        // Not on the path: skip the whole value
        scanner.value_span()?;
    }
}

/// Replace `span` with `replacement`
pub fn splice(text: &str, span: Span, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..span.start]);
    out.push_str(replacement);
    out.push_str(&text[span.end..]);
    out
}

/// Insert `"key": value` as the last member of the root object.
///
/// Used when a descriptor has no `references` key yet.
pub fn insert_root_key(text: &str, key: &str, rendered_value: &str, indent: &str) -> Option<String> {
    let mut scanner = Scanner::new(text.as_bytes());
    scanner.skip_trivia();
    if scanner.peek()? != b'{' {
        return None;
    }
    let root = scanner.value_span()?;
    let close = root.end - 1;
    let close_indent = line_indent(text, close);

    // Whether the object already has members decides the separator
    let before = text[..close].trim_end();
    let needs_comma = !before.ends_with('{') && !before.ends_with(',');

    let mut insertion = String::new();
    if needs_comma {
        insertion.push(',');
    }
    insertion.push('\n');
    insertion.push_str(indent);
    insertion.push('"');
    insertion.push_str(key);
    insertion.push_str("\": ");
    insertion.push_str(rendered_value);
    insertion.push('\n');
    insertion.push_str(&close_indent);

    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(text[..close].trim_end_matches([' ', '\t', '\n', '\r']));
    out.push_str(&insertion);
    out.push_str(&text[close..]);
    Some(out)
}

/// Indentation unit used by the file (first indented line wins, two
/// spaces otherwise)
pub fn detect_indent(text: &str) -> String {
    for line in text.lines() {
        let ws: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        if !ws.is_empty() && ws.len() < line.len() {
            return ws;
        }
    }
    "  ".to_string()
}

/// Leading whitespace of the line containing byte `pos`
pub fn line_indent(text: &str, pos: usize) -> String {
    let line_start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    text[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Skip whitespace and both comment forms
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.advance(),
                Some(b'/') => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        while let Some(c) = self.peek() {
                            self.advance();
                            if c == b'\n' {
                                break;
                            }
                        }
                    }
                    Some(b'*') => {
                        self.pos += 2;
                        while self.pos < self.bytes.len() {
                            if self.bytes[self.pos] == b'*'
                                && self.bytes.get(self.pos + 1) == Some(&b'/')
                            {
                                self.pos += 2;
                                break;
                            }
                            self.advance();
                        }
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    /// Read a JSON string literal, returning its unescaped-enough content
    /// (escapes other than `\"` and `\\` are kept verbatim - keys refsync
    /// matches never contain them)
    fn read_string(&mut self) -> Option<String> {
        if self.peek()? != b'"' {
            return None;
        }
        self.advance();
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.advance();
            match c {
                b'"' => return Some(out),
                b'\\' => {
                    let next = self.peek()?;
                    self.advance();
                    match next {
                        b'"' => out.push('"'),
                        b'\\' => out.push('\\'),
                        other => {
                            out.push('\\');
                            out.push(other as char);
                        }
                    }
                }
                other => out.push(other as char),
            }
        }
        None
    }

    /// Consume one JSON value and return its span
    fn value_span(&mut self) -> Option<Span> {
        self.skip_trivia();
        let start = self.pos;
        match self.peek()? {
            b'{' | b'[' => {
                let mut depth = 0usize;
                while let Some(c) = self.peek() {
                    match c {
                        b'{' | b'[' => {
                            depth += 1;
                            self.advance();
                        }
                        b'}' | b']' => {
                            depth -= 1;
                            self.advance();
                            if depth == 0 {
                                return Some(Span {
                                    start,
                                    end: self.pos,
                                });
                            }
                        }
                        b'"' => {
                            self.read_string()?;
                        }
                        b'/' => {
                            let before = self.pos;
                            self.skip_trivia();
                            if self.pos == before {
                                self.advance();
                            }
                        }
                        _ => self.advance(),
                    }
                }
                None
            }
            b'"' => {
                self.read_string()?;
                Some(Span {
                    start,
                    end: self.pos,
                })
            }
            _ => {
                while let Some(c) = self.peek() {
                    if matches!(c, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r') {
                        break;
                    }
                    self.advance();
                }
                if self.pos == start {
                    return None;
                }
                Some(Span {
                    start,
                    end: self.pos,
                })
            }
        }
    }
}
