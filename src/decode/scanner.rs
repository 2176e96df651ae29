//! Tokenizer for the strict YAML subset.
//!
//! The scanner walks the raw bytes and produces one token per call:
//! newlines, carets (`- `), comments, and scalars. Scalars are the hard
//! part: the first non-space character selects one of five styles (plain,
//! single-quoted, double-quoted, literal block `|`, folded block `>`), each
//! with its own multi-line continuation and termination rules. Scalar bytes
//! are assembled line by line in a reusable scratch buffer and committed to
//! the document arena in one session.

use memchr::memchr2;

use crate::arena::StrRef;
use crate::context::Context;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Scalar terminated by `:` + space/newline/end; payload is the key name.
    Key,
    /// Any other scalar.
    Scalar,
    Newline,
    /// `-` at the start of line content, followed by space, newline, or end.
    Caret,
    /// `#` through end of line; payload excludes the `#`, untrimmed.
    Comment,
    Eos,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Column of the first character of the token.
    pub column: i32,
    pub text: StrRef,
}

impl Token {
    fn bare(kind: TokenKind, column: i32) -> Self {
        Self {
            kind,
            column,
            text: StrRef::EMPTY,
        }
    }
}

/// Reusable buffer assembling a scalar from per-line pieces.
///
/// Bytes accumulate in `bytes`; completed lines are recorded as ranges in
/// `chunks`. `end_line` closes the range opened at `line_start`, while
/// `add_line` pushes its text as a chunk of its own, abandoning any pending
/// bytes (this is how a join space written just before a blank line gets
/// dropped). Only bytes covered by chunks reach the committed scalar.
#[derive(Debug, Default)]
struct ScratchBuffer {
    bytes: Vec<u8>,
    chunks: Vec<(u32, u32)>,
    line_start: u32,
}

impl ScratchBuffer {
    fn start(&mut self) {
        self.bytes.clear();
        self.chunks.clear();
        self.line_start = 0;
    }

    /// True while no line has been completed: the current line is the first.
    fn is_first_line(&self) -> bool {
        self.chunks.is_empty()
    }

    fn last_byte(&self) -> Option<u8> {
        self.bytes.last().copied()
    }

    fn add_char(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    fn add_chunk(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Add a chunk with trailing spaces and tabs stripped.
    fn add_chunk_trimmed(&mut self, chunk: &[u8]) {
        let mut len = chunk.len();
        while len > 0 && (chunk[len - 1] == b' ' || chunk[len - 1] == b'\t') {
            len -= 1;
        }
        self.bytes.extend_from_slice(&chunk[..len]);
    }

    fn add_line(&mut self, text: &[u8]) {
        let start = self.bytes.len() as u32;
        self.bytes.extend_from_slice(text);
        self.chunks.push((start, text.len() as u32));
        self.line_start = self.bytes.len() as u32;
    }

    fn end_line(&mut self) {
        let len = self.bytes.len() as u32;
        self.chunks.push((self.line_start, len - self.line_start));
        self.line_start = len;
    }

    /// Drop trailing chunks holding only blanks (or nothing).
    fn trim_trailing_blank_lines(&mut self) {
        while let Some(&(start, len)) = self.chunks.last() {
            let chunk = &self.bytes[start as usize..(start + len) as usize];
            if chunk
                .iter()
                .any(|&b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            {
                break;
            }
            self.chunks.pop();
        }
    }
}

pub(crate) struct Scanner<'a> {
    text: &'a [u8],
    pos: usize,
    col: i32,
    line: u32,
    scratch: ScratchBuffer,
}

const TAB_INDENT_MSG: &str = "using tabulation is not accepted for indentation";

impl<'a> Scanner<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            pos: 0,
            col: 0,
            line: 1,
            scratch: ScratchBuffer::default(),
        }
    }

    /// True when nothing has been consumed yet on the current line.
    pub fn at_line_start(&self) -> bool {
        self.col == 0
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Line snippet starting at `pos`, for error reporting.
    pub fn line_text_at(&self, pos: usize) -> &[u8] {
        &self.text[pos.min(self.text.len())..]
    }

    fn error(&self, line: u32, from: usize, message: impl std::fmt::Display) -> Error {
        Error::parse(line, self.line_text_at(from), message)
    }

    /// Byte offset of the end of line starting the search at `from`.
    fn find_eol(&self, from: usize) -> usize {
        match memchr2(b'\n', b'\r', &self.text[from..]) {
            Some(offset) => from + offset,
            None => self.text.len(),
        }
    }

    /// Width of the newline at `pos` (2 for `\r\n`), for stepping over it.
    fn newline_width(&self, pos: usize) -> usize {
        if pos + 1 < self.text.len() && self.text[pos] == b'\r' && self.text[pos + 1] == b'\n' {
            2
        } else {
            1
        }
    }

    /// Produce the next token. `parent_indent` is the reference column for
    /// block scalars and plain-scalar continuation, maintained by the parser.
    pub fn next_token(&mut self, parent_indent: i32, ctx: &mut Context) -> Result<Token> {
        let text = self.text;
        let end = text.len();
        let mut is_new_line = self.col == 0;
        let init_pos = self.pos;

        // Measure indentation (line start) or skip inline blanks.
        let mut i = self.pos;
        if is_new_line {
            while i < end && text[i] == b' ' {
                i += 1;
            }
            if i < end && text[i] == b'\t' {
                return Err(self.error(self.line, self.pos, TAB_INDENT_MSG));
            }
        } else {
            while i < end && (text[i] == b' ' || text[i] == b'\t') {
                i += 1;
            }
        }
        self.col += (i - self.pos) as i32;
        self.pos = i;
        let start_col = self.col;

        if self.pos >= end {
            return Ok(Token::bare(TokenKind::Eos, start_col));
        }
        let first = text[self.pos];

        if first == b'\n' || first == b'\r' {
            self.pos += self.newline_width(self.pos);
            self.line += 1;
            self.col = 0;
            return Ok(Token::bare(TokenKind::Newline, start_col));
        }

        if first == b'-'
            && (self.pos + 1 == end || matches!(text[self.pos + 1], b' ' | b'\r' | b'\n'))
        {
            self.pos += 1;
            self.col += 1;
            return Ok(Token::bare(TokenKind::Caret, start_col));
        }

        if first == b'#' {
            // Consume through end of line; the newline is a separate token.
            let content_start = self.pos + 1;
            let eol = self.find_eol(self.pos);
            self.col += (eol - self.pos) as i32;
            self.pos = eol;
            let sref = ctx.add_string(&text[content_start..eol]);
            return Ok(Token {
                kind: TokenKind::Comment,
                column: start_col,
                text: sref,
            });
        }

        // Scalar. Style is selected by the first character.
        self.scratch.start();
        let mut ml_type = b' ';
        let mut chomp = b' ';
        let mut delta_indent: i32 = -1;
        let mut target_indent: i32;

        match first {
            b'\'' | b'"' => {
                ml_type = first;
                self.pos += 1;
                self.col += 1;
                // Termination is quote-based, not indent-based.
                target_indent = 0;
                // Spaces right after the opening quote are part of the value.
                while self.pos < end && text[self.pos] == b' ' {
                    self.scratch.add_char(b' ');
                    self.pos += 1;
                    self.col += 1;
                }
            }
            b'|' | b'>' => {
                ml_type = first;
                self.pos += 1;
                self.col += 1;
                // Chomp and explicit-indent indicators, each at most once,
                // in either order.
                for _ in 0..2 {
                    if self.pos >= end {
                        break;
                    }
                    match text[self.pos] {
                        b'+' | b'-' => {
                            if chomp != b' ' {
                                return Err(self.error(
                                    self.line,
                                    init_pos,
                                    "chomp cannot be provided more than once",
                                ));
                            }
                            chomp = text[self.pos];
                            self.pos += 1;
                            self.col += 1;
                        }
                        b'1'..=b'9' => {
                            if delta_indent >= 0 {
                                return Err(self.error(
                                    self.line,
                                    init_pos,
                                    "explicit indentation cannot be provided more than once",
                                ));
                            }
                            delta_indent = i32::from(text[self.pos] - b'0');
                            self.pos += 1;
                            self.col += 1;
                        }
                        _ => {}
                    }
                }
                // The rest of the opener line is ignored.
                let eol = self.find_eol(self.pos);
                self.pos = if eol < end {
                    eol + self.newline_width(eol)
                } else {
                    end + 1
                };
                self.line += 1;
                self.col = 0;
                is_new_line = true;
                target_indent = if delta_indent >= 0 {
                    parent_indent + delta_indent
                } else {
                    -1
                };
            }
            _ => {
                // Plain: content is stripped, only the parent indent gates
                // continuation lines.
                target_indent = if self.col > parent_indent {
                    parent_indent + 1
                } else {
                    self.col
                };
            }
        }

        let mut is_key = false;
        let mut indented_folded_line = false;

        // Analyze the scalar line by line.
        while self.pos < end {
            let mut non_space = self.pos;
            while non_space < end && text[non_space] == b' ' {
                non_space += 1;
            }
            self.col += (non_space - self.pos) as i32;
            if is_new_line && non_space < end && text[non_space] == b'\t' {
                return Err(self.error(self.line, init_pos, TAB_INDENT_MSG));
            }
            let effective_indent = non_space - self.pos;

            if target_indent < 0 {
                // Block scalar without explicit indent: blank lines before
                // the first content line are kept, the first content line
                // fixes the indent.
                if non_space < end && (text[non_space] == b'\n' || text[non_space] == b'\r') {
                    if self.scratch.is_first_line() {
                        self.scratch.add_line(b"");
                    } else {
                        self.scratch.add_line(b"\n");
                    }
                    self.pos = non_space + self.newline_width(non_space);
                    indented_folded_line = true;
                    self.line += 1;
                    self.col = 0;
                    continue;
                }
                target_indent = self.col;
            }

            let mut line_end = non_space;
            let mut end_reached = false;

            match ml_type {
                b'\'' => {
                    let mut pending_join = !self.scratch.is_first_line();
                    let mut chunk_start = line_end;
                    while line_end < end && text[line_end] != b'\n' && text[line_end] != b'\r' {
                        if text[line_end] != b'\'' {
                            line_end += 1;
                            continue;
                        }
                        // Doubled quote escapes to a literal quote.
                        if line_end + 1 < end && text[line_end + 1] == b'\'' {
                            if pending_join {
                                if self.scratch.last_byte() != Some(b'\n') {
                                    self.scratch.add_char(b' ');
                                }
                                pending_join = false;
                            }
                            self.scratch.add_chunk(&text[chunk_start..=line_end]);
                            line_end += 2;
                            chunk_start = line_end;
                            continue;
                        }
                        end_reached = true;
                        break;
                    }
                    if pending_join && self.scratch.last_byte() != Some(b'\n') {
                        self.scratch.add_char(b' ');
                    }
                    if line_end > chunk_start {
                        self.scratch.add_chunk(&text[chunk_start..line_end]);
                    }
                    if line_end >= end {
                        return Err(self.error(
                            self.line,
                            init_pos,
                            "unfinished single-quote string",
                        ));
                    }
                    if text[line_end] == b'\'' {
                        end_reached = true;
                        line_end += 1;
                        while line_end < end
                            && (text[line_end] == b' ' || text[line_end] == b'\t')
                        {
                            line_end += 1;
                        }
                    }
                    if !end_reached && non_space == line_end {
                        self.scratch.add_line(b"\n");
                    }
                }

                b'"' => {
                    let mut pending_join = !self.scratch.is_first_line();
                    let mut chunk_start = line_end;
                    while line_end < end
                        && text[line_end] != b'\n'
                        && text[line_end] != b'\r'
                        && text[line_end] != b'"'
                    {
                        if text[line_end] != b'\\' {
                            line_end += 1;
                            continue;
                        }
                        if pending_join && self.scratch.last_byte() != Some(b'\n') {
                            self.scratch.add_char(b' ');
                        }
                        pending_join = false;
                        if line_end > chunk_start {
                            self.scratch.add_chunk(&text[chunk_start..line_end]);
                        }
                        line_end += 1;
                        if line_end < end {
                            match text[line_end] {
                                b'n' => self.scratch.add_char(b'\n'),
                                b'r' => self.scratch.add_char(b'\r'),
                                b't' => self.scratch.add_char(b'\t'),
                                b'"' => self.scratch.add_char(b'"'),
                                b'\\' => self.scratch.add_char(b'\\'),
                                b'\r' | b'\n' => {
                                    // Escaped line break: join with the next
                                    // line, dropping its leading spaces.
                                    if line_end < end && text[line_end] == b'\r' {
                                        line_end += 1;
                                    }
                                    if line_end < end && text[line_end] == b'\n' {
                                        line_end += 1;
                                    }
                                    while line_end < end && text[line_end] == b' ' {
                                        line_end += 1;
                                    }
                                    line_end -= 1;
                                }
                                // Unknown escape, kept verbatim. \x, \u and
                                // \U sequences pass through unexpanded.
                                other => {
                                    self.scratch.add_char(b'\\');
                                    self.scratch.add_char(other);
                                }
                            }
                            line_end += 1;
                        }
                        chunk_start = line_end;
                    }
                    if pending_join && self.scratch.last_byte() != Some(b'\n') {
                        self.scratch.add_char(b' ');
                    }
                    if line_end > chunk_start {
                        self.scratch.add_chunk(&text[chunk_start..line_end]);
                    }
                    if line_end >= end {
                        return Err(self.error(
                            self.line,
                            init_pos,
                            "unfinished double-quote string",
                        ));
                    }
                    if text[line_end] == b'"' {
                        end_reached = true;
                        line_end += 1;
                        while line_end < end
                            && (text[line_end] == b' ' || text[line_end] == b'\t')
                        {
                            line_end += 1;
                        }
                    }
                    if !end_reached && non_space == line_end {
                        self.scratch.add_line(b"\n");
                    }
                }

                b'|' => {
                    line_end = self.find_eol(line_end);
                    if line_end != non_space && self.col < target_indent {
                        end_reached = true;
                        line_end = non_space;
                    } else {
                        if !self.scratch.is_first_line() {
                            self.scratch.add_char(b'\n');
                        }
                        let content = self.pos + target_indent as usize;
                        if line_end >= content {
                            self.scratch.add_chunk(&text[content..line_end]);
                        }
                    }
                }

                b'>' => {
                    line_end = self.find_eol(line_end);
                    if line_end != non_space && self.col < target_indent {
                        end_reached = true;
                        line_end = non_space;
                    } else {
                        let content = self.pos + target_indent as usize;
                        // More-indented lines keep their newlines; others
                        // fold onto the previous line with a space.
                        let is_indented = line_end <= content
                            || (!self.scratch.is_first_line() && text[content] == b' ');
                        if is_indented || indented_folded_line {
                            self.scratch.add_char(b'\n');
                        } else if line_end > content
                            && !self.scratch.is_first_line()
                            && self.scratch.last_byte() != Some(b'\n')
                        {
                            self.scratch.add_char(b' ');
                        }
                        indented_folded_line = line_end > content && text[content] == b' ';
                        if line_end > content {
                            self.scratch.add_chunk(&text[content..line_end]);
                        }
                    }
                }

                _ => {
                    // Plain: stop at end of line, at `:` followed by
                    // space/newline/end (key), or at ` #` (comment).
                    while line_end < end {
                        let c = text[line_end];
                        if c == b'\n' || c == b'\r' {
                            break;
                        }
                        if c == b'#' && line_end != self.pos && text[line_end - 1] == b' ' {
                            break;
                        }
                        if c == b':'
                            && (line_end + 1 == end
                                || matches!(text[line_end + 1], b' ' | b'\n' | b'\r'))
                        {
                            break;
                        }
                        line_end += 1;
                    }
                    end_reached =
                        line_end < end && text[line_end] != b'\n' && text[line_end] != b'\r';
                    if line_end != non_space && self.col < target_indent {
                        end_reached = true;
                        line_end = non_space;
                    } else {
                        if !self.scratch.is_first_line()
                            && self.scratch.last_byte() != Some(b'\n')
                        {
                            self.scratch.add_char(b' ');
                        }
                        self.scratch
                            .add_chunk_trimmed(&text[self.pos + effective_indent..line_end]);
                    }
                    if !end_reached && non_space == line_end {
                        self.scratch.add_line(b"\n");
                    }
                }
            }

            let next_line_start = if line_end < end {
                line_end + self.newline_width(line_end)
            } else {
                end + 1
            };
            self.scratch.end_line();

            if end_reached
                && line_end < end
                && text[line_end] == b':'
                && (line_end + 1 == end || matches!(text[line_end + 1], b' ' | b'\n' | b'\r'))
            {
                is_key = true;
                line_end += 1;
            }

            if end_reached {
                self.col += (line_end - non_space) as i32;
                self.pos = line_end;
                break;
            }

            self.pos = next_line_start;
            self.col = 0;
            self.line += 1;

            if self.pos >= end {
                if ml_type == b'"' {
                    return Err(self.error(
                        self.line,
                        init_pos,
                        "unfinished double-quote string",
                    ));
                }
                if ml_type == b'\'' {
                    return Err(self.error(
                        self.line,
                        init_pos,
                        "unfinished single-quote string",
                    ));
                }
            }
        }

        // Chomp: strip (`-`) and the default drop trailing blank lines; `+`
        // keeps everything. The default then re-adds exactly one newline for
        // block styles below.
        if ml_type != b'\'' && ml_type != b'"' && (chomp == b'-' || chomp == b' ') {
            self.scratch.trim_trailing_blank_lines();
        }

        ctx.arena.start_session();
        for &(start, len) in &self.scratch.chunks {
            let chunk = &self.scratch.bytes[start as usize..(start + len) as usize];
            ctx.arena.push_session(chunk);
        }
        if (ml_type == b'|' || ml_type == b'>') && (chomp == b' ' || chomp == b'+') {
            ctx.arena.push_session(b"\n");
        }
        let sref = ctx.arena.commit_session();

        Ok(Token {
            kind: if is_key { TokenKind::Key } else { TokenKind::Scalar },
            column: start_col,
            text: sref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(input: &str) -> Vec<(TokenKind, i32, String)> {
        let mut ctx = Context::with_arena_capacity(input.len());
        let mut scanner = Scanner::new(input.as_bytes());
        let mut parent_indent = -1;
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token(parent_indent, &mut ctx).unwrap();
            let text = ctx.get_str(token.text).to_string();
            let kind = token.kind;
            if matches!(kind, TokenKind::Key | TokenKind::Caret) {
                parent_indent = token.column;
            }
            tokens.push((kind, token.column, text));
            if kind == TokenKind::Eos {
                return tokens;
            }
        }
    }

    fn scan_err(input: &str) -> Error {
        let mut ctx = Context::with_arena_capacity(input.len());
        let mut scanner = Scanner::new(input.as_bytes());
        loop {
            match scanner.next_token(0, &mut ctx) {
                Err(err) => return err,
                Ok(token) if token.kind == TokenKind::Eos => {
                    panic!("expected a scan error for {input:?}")
                }
                Ok(_) => {}
            }
        }
    }

    fn scalar(input: &str) -> String {
        let tokens = scan_all(input);
        let (kind, _, text) = &tokens[0];
        assert_eq!(*kind, TokenKind::Scalar, "first token of {input:?}");
        text.clone()
    }

    #[rstest::rstest]
    fn test_key_and_value_tokens() {
        let tokens = scan_all("foo: bar\n");
        assert_eq!(tokens[0], (TokenKind::Key, 0, "foo".to_string()));
        assert_eq!(tokens[1], (TokenKind::Scalar, 5, "bar".to_string()));
        assert_eq!(tokens[2].0, TokenKind::Eos);
    }

    #[rstest::rstest]
    fn test_caret_requires_space_or_eol() {
        let tokens = scan_all("- x\n");
        assert_eq!(tokens[0].0, TokenKind::Caret);
        assert_eq!(tokens[1], (TokenKind::Scalar, 2, "x".to_string()));

        // A dash glued to text is a plain scalar.
        let tokens = scan_all("-x\n");
        assert_eq!(tokens[0], (TokenKind::Scalar, 0, "-x".to_string()));
    }

    #[rstest::rstest]
    fn test_comment_token_keeps_raw_text() {
        let tokens = scan_all("#  raw comment \n");
        assert_eq!(
            tokens[0],
            (TokenKind::Comment, 0, "  raw comment ".to_string())
        );
        assert_eq!(tokens[1].0, TokenKind::Newline);
    }

    #[rstest::rstest]
    fn test_plain_scalar_strips_trailing_blanks() {
        assert_eq!(scalar("value  \t\n"), "value");
    }

    #[rstest::rstest]
    fn test_plain_scalar_stops_before_comment() {
        let tokens = scan_all("value # note\n");
        assert_eq!(tokens[0], (TokenKind::Scalar, 0, "value".to_string()));
        assert_eq!(tokens[1], (TokenKind::Comment, 6, " note".to_string()));
    }

    #[rstest::rstest]
    fn test_plain_scalar_keeps_inner_colon() {
        assert_eq!(scalar("a:b\n"), "a:b");
        assert_eq!(scalar("http://host/path\n"), "http://host/path");
    }

    #[rstest::rstest]
    fn test_single_quoted_escapes_and_folding() {
        assert_eq!(scalar("'it''s'\n"), "it's");
        assert_eq!(scalar("'a\n   b'\n"), "a b");
        assert_eq!(scalar("'a\n\n   b'\n"), "a\nb");
    }

    #[rstest::rstest]
    fn test_double_quoted_escapes() {
        assert_eq!(scalar("\"a\\nb\\tc\"\n"), "a\nb\tc");
        assert_eq!(scalar("\"say \\\"hi\\\"\"\n"), "say \"hi\"");
        assert_eq!(scalar("\"back\\\\slash\"\n"), "back\\slash");
        // Unknown escapes are preserved verbatim.
        assert_eq!(scalar("\"\\q\"\n"), "\\q");
        assert_eq!(scalar("\"\\u0041\"\n"), "\\u0041");
    }

    #[rstest::rstest]
    fn test_double_quoted_escaped_line_break() {
        assert_eq!(scalar("\"one\\\n   two\"\n"), "onetwo");
    }

    #[rstest::rstest]
    fn test_literal_block_chomp_variants() {
        assert_eq!(scalar("|\n  a\n  b\n"), "a\nb\n");
        assert_eq!(scalar("|-\n  a\n  b\n\n"), "a\nb");
        assert_eq!(scalar("|+\n  a\n\n"), "a\n\n");
    }

    #[rstest::rstest]
    fn test_literal_block_preserves_extra_indent() {
        assert_eq!(scalar("|\n  a\n    b\n"), "a\n  b\n");
    }

    #[rstest::rstest]
    fn test_folded_block_joins_lines() {
        assert_eq!(scalar(">\n  a\n  b\n"), "a b\n");
        assert_eq!(scalar(">\n  a\n\n  b\n"), "a\nb\n");
    }

    #[rstest::rstest]
    fn test_explicit_indent_digit() {
        // |2 pins the block indent at parent + 2 columns.
        let tokens = scan_all("k:\n  |2\n    kept\n");
        let scalar_token = tokens
            .iter()
            .find(|(kind, _, _)| *kind == TokenKind::Scalar)
            .unwrap();
        assert_eq!(scalar_token.2, "  kept\n");
    }

    #[rstest::rstest]
    fn test_tab_indentation_rejected() {
        let err = scan_err("\tkey: value\n");
        assert!(err.message.contains(TAB_INDENT_MSG));

        let err = scan_err("|+\n\tb\n");
        assert!(err.message.contains(TAB_INDENT_MSG));
    }

    #[rstest::rstest]
    fn test_duplicate_block_indicators_rejected() {
        let err = scan_err("|++\nx\n");
        assert!(err
            .message
            .contains("chomp cannot be provided more than once"));

        let err = scan_err("|25\n  abc\n");
        assert!(err
            .message
            .contains("explicit indentation cannot be provided more than once"));
    }

    #[rstest::rstest]
    fn test_unfinished_quotes_rejected() {
        let err = scan_err("'never closed\n");
        assert!(err.message.contains("unfinished single-quote string"));

        let err = scan_err("\"never closed\n");
        assert!(err.message.contains("unfinished double-quote string"));
    }

    #[rstest::rstest]
    fn test_quoted_key() {
        let tokens = scan_all("\"a key\": v\n");
        assert_eq!(tokens[0], (TokenKind::Key, 0, "a key".to_string()));
        assert_eq!(tokens[1].2, "v");
    }

    #[rstest::rstest]
    fn test_crlf_line_endings() {
        let tokens = scan_all("foo: bar\r\nbaz: qux\r\n");
        assert_eq!(tokens[0].2, "foo");
        assert_eq!(tokens[1].2, "bar");
        assert_eq!(tokens[2].2, "baz");
        assert_eq!(tokens[3].2, "qux");
    }
}
