use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

/// 1-based source location of a lexeme or construct. `width` is measured
/// in characters on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub width: usize,
}

impl Span {
    pub fn new(line: usize, column: usize, width: usize) -> Self {
        Self {
            line,
            column,
            width,
        }
    }

    /// Combines this span with a later one on the same line into a single
    /// span covering both. Spans on different lines keep the starting span.
    pub fn to(self, end: Span) -> Span {
        if self.line == end.line && end.column + end.width > self.column {
            Span::new(self.line, self.column, end.column + end.width - self.column)
        } else {
            self
        }
    }

    fn byte_range(&self, source: &str) -> std::ops::Range<usize> {
        let mut start_of_line = 0;
        for (index, text) in source.lines().enumerate() {
            if index + 1 == self.line {
                let mut start = start_of_line;
                let mut chars = text.chars();
                for _ in 1..self.column {
                    match chars.next() {
                        Some(c) => start += c.len_utf8(),
                        None => break,
                    }
                }
                let mut end = start;
                for _ in 0..self.width {
                    match chars.next() {
                        Some(c) => end += c.len_utf8(),
                        None => break,
                    }
                }
                if end == start {
                    end = (start + 1).min(source.len()).max(start);
                }
                return start..end;
            }
            start_of_line += text.len() + 1;
        }
        source.len()..source.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Scanning
    UnmatchedLexeme,
    // Parsing
    UnexpectedToken,
    MismatchedParenthesis,
    InvalidStatement,
    InvalidAssignment,
    InvalidLoop,
    InvalidIfStatement,
    // Interpretation
    UndefinedVariable,
    IllegalOperator,
    DivisionByZero,
}

impl ErrorKind {
    fn stage(&self) -> (&'static str, Color) {
        match self {
            ErrorKind::UnmatchedLexeme => ("Lexical Error", Color::Red),
            ErrorKind::UnexpectedToken
            | ErrorKind::MismatchedParenthesis
            | ErrorKind::InvalidStatement
            | ErrorKind::InvalidAssignment
            | ErrorKind::InvalidLoop
            | ErrorKind::InvalidIfStatement => ("Parse Error", Color::Yellow),
            ErrorKind::UndefinedVariable
            | ErrorKind::IllegalOperator
            | ErrorKind::DivisionByZero => ("Runtime Error", Color::Magenta),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasicError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl BasicError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<stdin>");
        let (kind_str, color) = self.kind.stage();
        let range = self.span.byte_range(source);

        let mut builder = Report::build(ReportKind::Error, filename, range.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, range))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            builder = builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for BasicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} Ln:{} Col:{}",
            self.message, self.span.line, self.span.column
        )
    }
}

impl std::error::Error for BasicError {}
