use crate::error::{BasicError, ErrorKind, Span};
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

/// Identifiers and keyword-shaped words are capped at 31 characters; a
/// 32nd character starts a new token rather than failing the scan.
const MAX_WORD_LEN: usize = 31;

pub struct Scanner {
    source: String,
    tokens: Vec<Token>,
    keywords: HashMap<&'static str, TokenKind>,
}

impl Scanner {
    pub fn new(source: String) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("PRINT", TokenKind::Print);
        keywords.insert("IF", TokenKind::If);
        keywords.insert("THEN", TokenKind::Then);
        keywords.insert("LET", TokenKind::Let);
        keywords.insert("END", TokenKind::End);
        keywords.insert("DO", TokenKind::Do);
        keywords.insert("WHILE", TokenKind::While);
        keywords.insert("LOOP", TokenKind::Loop);

        Self {
            source,
            tokens: Vec::new(),
            keywords,
        }
    }

    /// Tokenizes the whole source, line by line. Every line yields an Eol
    /// token (empty lines included) and the stream ends with a single Eof.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, BasicError> {
        let source = std::mem::take(&mut self.source);
        let mut line = 0;
        let mut column = 1;

        for (index, text) in source.lines().enumerate() {
            line = index + 1;
            column = self.scan_line(line, text)?;
            self.tokens.push(Token::new(
                TokenKind::Eol,
                "\n".to_string(),
                Span::new(line, column, 1),
            ));
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            "".to_string(),
            Span::new(line.max(1), column, 1),
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_line(&mut self, line: usize, text: &str) -> Result<usize, BasicError> {
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0;

        while pos < chars.len() {
            if chars[pos].is_whitespace() {
                pos += 1;
            } else if chars[pos].is_alphabetic() {
                pos = self.word(line, &chars, pos);
            } else {
                pos = self.symbol(line, &chars, pos)?;
            }
        }

        Ok(chars.len() + 1)
    }

    /// Scans a keyword or identifier. The keyword table is consulted first,
    /// case-insensitively; only a whole word identical to a reserved word
    /// becomes a keyword token. The original-case lexeme is preserved.
    fn word(&mut self, line: usize, chars: &[char], start: usize) -> usize {
        let mut end = start;
        while end < chars.len()
            && end - start < MAX_WORD_LEN
            && (chars[end].is_alphanumeric() || chars[end] == '_')
        {
            end += 1;
        }

        let lexeme: String = chars[start..end].iter().collect();
        let kind = self
            .keywords
            .get(lexeme.to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(TokenKind::Ident);

        self.push(kind, lexeme, line, start);
        end
    }

    fn symbol(&mut self, line: usize, chars: &[char], start: usize) -> Result<usize, BasicError> {
        let c = chars[start];

        if c.is_ascii_digit() {
            return Ok(self.number(line, chars, start));
        }
        // Identifier fallback for words that do not start with a letter.
        if c == '_' || c.is_alphanumeric() {
            return Ok(self.word(line, chars, start));
        }

        let (kind, len) = match c {
            '(' => (TokenKind::LeftParen, 1),
            ')' => (TokenKind::RightParen, 1),
            '+' => (TokenKind::Add, 1),
            '-' => (TokenKind::Sub, 1),
            '*' => (TokenKind::Mult, 1),
            '/' => (TokenKind::Div, 1),
            '=' => (TokenKind::Equal, 1),
            '<' if chars.get(start + 1) == Some(&'=') => (TokenKind::NotGreater, 2),
            '<' => (TokenKind::LessThan, 1),
            '>' if chars.get(start + 1) == Some(&'=') => (TokenKind::NotLess, 2),
            '>' => (TokenKind::GreaterThan, 1),
            _ => {
                return Err(BasicError::new(
                    ErrorKind::UnmatchedLexeme,
                    Span::new(line, start + 1, 1),
                    format!("Unknown lexeme '{}'", c),
                ));
            }
        };

        let lexeme: String = chars[start..start + len].iter().collect();
        self.push(kind, lexeme, line, start);
        Ok(start + len)
    }

    /// Scans a numeric literal. A decimal point is only consumed when a
    /// digit follows it, so `42.` scans as the integer `42` and a bare dot.
    fn number(&mut self, line: usize, chars: &[char], start: usize) -> usize {
        let mut end = start;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
        }

        let mut kind = TokenKind::IntLit;
        if end < chars.len()
            && chars[end] == '.'
            && chars.get(end + 1).is_some_and(|c| c.is_ascii_digit())
        {
            kind = TokenKind::FloatLit;
            end += 1;
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
        }

        let lexeme: String = chars[start..end].iter().collect();
        self.push(kind, lexeme, line, start);
        end
    }

    fn push(&mut self, kind: TokenKind, lexeme: String, line: usize, start: usize) {
        let width = lexeme.chars().count();
        self.tokens
            .push(Token::new(kind, lexeme, Span::new(line, start + 1, width)));
    }
}
