//! Splitting a SQL batch into individual statements.
//!
//! libSQL prepares one statement at a time, so a multi-statement batch is cut
//! on semicolons first. Semicolons inside string literals, quoted identifiers,
//! comments and `CREATE TRIGGER ... BEGIN ... END` bodies do not split.

/// Split `sql` into trimmed statements, dropping empty and comment-only ones.
pub fn split_statements(sql: &str) -> Vec<&str> {
    scan(sql).statements
}

/// Whether `sql` ends on a statement boundary.
///
/// True when there is at least one statement, every quote and block comment
/// is closed, and the last statement has its terminating semicolon. Used to
/// decide when multi-line input is ready to run.
pub fn is_complete(sql: &str) -> bool {
    let scan = scan(sql);
    !scan.unterminated && !scan.pending && !scan.statements.is_empty()
}

/// Leading keyword of one statement and, for `PRAGMA`, the pragma name.
///
/// Both are lowercased. Comments are skipped, quoted identifiers are
/// unquoted and a schema qualifier (`main.`) is dropped.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StatementHead {
    pub keyword: String,
    pub pragma: Option<String>,
}

pub(crate) fn statement_head(statement: &str) -> StatementHead {
    let mut tokens = Tokens {
        sql: statement,
        pos: 0,
    };
    let Some(Token::Word(keyword)) = tokens.next() else {
        return StatementHead::default();
    };
    if keyword != "pragma" {
        return StatementHead {
            keyword,
            pragma: None,
        };
    }

    let first = match tokens.next() {
        Some(Token::Word(word)) => Some(word),
        _ => None,
    };
    let pragma = match (first, tokens.next()) {
        (Some(_), Some(Token::Punct(b'.'))) => match tokens.next() {
            Some(Token::Word(name)) => Some(name),
            _ => None,
        },
        (first, _) => first,
    };
    StatementHead { keyword, pragma }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Word(String),
    Literal,
    Punct(u8),
}

struct Tokens<'a> {
    sql: &'a str,
    pos: usize,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let bytes = self.sql.as_bytes();
        loop {
            let i = self.pos;
            let byte = *bytes.get(i)?;
            let (token, end) = match byte {
                b if b.is_ascii_whitespace() => (None, i + 1),
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    (None, skip_past(bytes, i + 2, b'\n').unwrap_or(bytes.len()))
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    (None, skip_block_comment(bytes, i + 2).unwrap_or(bytes.len()))
                }
                quote @ (b'"' | b'`') => {
                    let close = skip_quoted(bytes, i + 1, quote);
                    let inner = &self.sql[i + 1..close.map_or(bytes.len(), |end| end - 1)];
                    let quote = char::from(quote);
                    let inner = inner.replace(&format!("{quote}{quote}"), &quote.to_string());
                    (Some(Token::Word(inner.to_ascii_lowercase())), close.unwrap_or(bytes.len()))
                }
                b'[' => {
                    let close = skip_past(bytes, i + 1, b']');
                    let inner = &self.sql[i + 1..close.map_or(bytes.len(), |end| end - 1)];
                    (Some(Token::Word(inner.to_ascii_lowercase())), close.unwrap_or(bytes.len()))
                }
                b'\'' => (
                    Some(Token::Literal),
                    skip_quoted(bytes, i + 1, b'\'').unwrap_or(bytes.len()),
                ),
                b if is_word_byte(b) => {
                    let end = word_end(bytes, i);
                    (Some(Token::Word(self.sql[i..end].to_ascii_lowercase())), end)
                }
                b => (Some(Token::Punct(b)), i + 1),
            };
            self.pos = end;
            if token.is_some() {
                return token;
            }
        }
    }
}

struct Scan<'a> {
    statements: Vec<&'a str>,
    /// Code after the last terminating semicolon.
    pending: bool,
    /// Input ended inside a quote or block comment.
    unterminated: bool,
}

fn scan(sql: &str) -> Scan<'_> {
    let bytes = sql.as_bytes();
    let mut statements = Vec::new();
    let mut state = StatementState::default();
    let mut unterminated = false;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let skipped = match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                state.has_code = true;
                skip_quoted(bytes, i + 1, quote)
            }
            b'[' => {
                state.has_code = true;
                skip_past(bytes, i + 1, b']')
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                // A line comment may run to the end of input.
                Some(skip_past(bytes, i + 2, b'\n').unwrap_or(bytes.len()))
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => skip_block_comment(bytes, i + 2),
            b';' => {
                if state.is_complete() {
                    if state.has_code {
                        statements.push(sql[start..i].trim());
                    }
                    state = StatementState::default();
                    start = i + 1;
                }
                Some(i + 1)
            }
            byte if is_word_byte(byte) => {
                let end = word_end(bytes, i);
                state.observe_word(&sql[i..end]);
                Some(end)
            }
            byte => {
                if !byte.is_ascii_whitespace() {
                    state.has_code = true;
                }
                Some(i + 1)
            }
        };

        i = skipped.unwrap_or_else(|| {
            unterminated = true;
            bytes.len()
        });
    }

    let pending = state.has_code;
    if pending {
        statements.push(sql[start..].trim());
    }

    Scan {
        statements,
        pending,
        unterminated,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Leading {
    #[default]
    Start,
    AfterCreate,
    Done,
}

#[derive(Debug, Default)]
struct StatementState {
    has_code: bool,
    leading: Leading,
    is_trigger: bool,
    depth: i32,
}

impl StatementState {
    fn observe_word(&mut self, word: &str) {
        self.has_code = true;

        self.leading = match self.leading {
            Leading::Start if word.eq_ignore_ascii_case("CREATE") => Leading::AfterCreate,
            Leading::AfterCreate
                if word.eq_ignore_ascii_case("TEMP") || word.eq_ignore_ascii_case("TEMPORARY") =>
            {
                Leading::AfterCreate
            }
            Leading::AfterCreate if word.eq_ignore_ascii_case("TRIGGER") => {
                self.is_trigger = true;
                Leading::Done
            }
            _ => Leading::Done,
        };

        if self.is_trigger {
            if word.eq_ignore_ascii_case("BEGIN") || word.eq_ignore_ascii_case("CASE") {
                self.depth += 1;
            } else if word.eq_ignore_ascii_case("END") {
                self.depth -= 1;
            }
        }
    }

    /// Whether a semicolon at the current position ends the statement.
    const fn is_complete(&self) -> bool {
        !self.is_trigger || self.depth <= 0
    }
}

const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

fn word_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_word_byte(bytes[i]) {
        i += 1;
    }
    i
}

/// Index just past the closing `quote`, honouring doubled-quote escapes.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        if bytes[i] == quote {
            i += 1;
            if i < bytes.len() && bytes[i] == quote {
                i += 1;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn skip_past(bytes: &[u8], i: usize, terminator: u8) -> Option<usize> {
    bytes[i.min(bytes.len())..]
        .iter()
        .position(|&b| b == terminator)
        .map(|offset| i + offset + 1)
}

fn skip_block_comment(bytes: &[u8], mut i: usize) -> Option<usize> {
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}
