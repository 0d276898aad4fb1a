use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{BasicError, ErrorKind, Span};
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Recursive-descent parser with single-token lookahead. Each grammar
/// nonterminal is one method; every decision point commits on the kind of
/// the current token, with no backtracking.
///
/// Statements are line-oriented: one statement per line, separated by Eol
/// tokens, with blank lines skipped. Block statements close with their
/// keyword form (`LOOP` for DO WHILE, `END IF` for IF) on a line of its own.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Program, BasicError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.match_kind(TokenKind::Eol) {
                continue;
            }
            statements.push(self.statement()?);
            self.end_of_line()?;
        }

        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Stmt, BasicError> {
        if self.match_kind(TokenKind::Let) {
            self.assignment()
        } else if self.match_kind(TokenKind::Print) {
            self.print_statement()
        } else if self.match_kind(TokenKind::Do) {
            self.do_while()
        } else if self.match_kind(TokenKind::If) {
            self.if_statement()
        } else if self.match_kind(TokenKind::End) {
            Ok(Stmt::End {
                span: self.previous().span,
            })
        } else {
            let token = self.peek();
            Err(BasicError::with_help(
                ErrorKind::InvalidStatement,
                token.span,
                format!("Invalid type of statement: {}", describe(token)),
                "Statements start with LET, PRINT, DO, IF, or END.".to_string(),
            ))
        }
    }

    fn assignment(&mut self) -> Result<Stmt, BasicError> {
        let keyword = self.previous().span;
        let name = self
            .consume_with_help(
                TokenKind::Ident,
                ErrorKind::InvalidAssignment,
                "Expected identifier after LET",
                "Assignments have the form: LET X = <expression>".to_string(),
            )?
            .lexeme
            .clone();
        self.consume_with_help(
            TokenKind::Equal,
            ErrorKind::InvalidAssignment,
            "Expected '=' after identifier in assignment",
            "Assignments have the form: LET X = <expression>".to_string(),
        )?;
        let expr = self.expression()?;
        let span = keyword.to(*expr.span());

        Ok(Stmt::Let { name, expr, span })
    }

    fn print_statement(&mut self) -> Result<Stmt, BasicError> {
        let keyword = self.previous().span;
        let expr = self.expression()?;
        let span = keyword.to(*expr.span());

        Ok(Stmt::Print { expr, span })
    }

    fn do_while(&mut self) -> Result<Stmt, BasicError> {
        let keyword = self.previous().span;

        self.consume_with_help(
            TokenKind::While,
            ErrorKind::InvalidLoop,
            "Expected WHILE after DO",
            "Loops have the form: DO WHILE <condition> ... LOOP".to_string(),
        )?;
        let condition = self.expression()?;
        self.consume(
            TokenKind::Eol,
            ErrorKind::InvalidLoop,
            "Expected end of line after loop condition",
        )?;

        let body = self.body(
            TokenKind::Loop,
            ErrorKind::InvalidLoop,
            "Unterminated DO WHILE loop",
        )?;
        self.consume(
            TokenKind::Loop,
            ErrorKind::InvalidLoop,
            "Expected LOOP to close DO WHILE",
        )?;

        Ok(Stmt::DoWhile {
            condition,
            body,
            span: keyword,
        })
    }

    fn if_statement(&mut self) -> Result<Stmt, BasicError> {
        let keyword = self.previous().span;

        let condition = self.expression()?;
        self.consume_with_help(
            TokenKind::Then,
            ErrorKind::InvalidIfStatement,
            "Expected THEN after IF condition",
            "Conditionals have the form: IF <condition> THEN ... END IF".to_string(),
        )?;
        self.consume(
            TokenKind::Eol,
            ErrorKind::InvalidIfStatement,
            "Expected end of line after THEN",
        )?;

        let body = self.body(
            TokenKind::End,
            ErrorKind::InvalidIfStatement,
            "Unterminated IF statement",
        )?;
        self.consume(
            TokenKind::End,
            ErrorKind::InvalidIfStatement,
            "Expected END IF to close the conditional",
        )?;
        self.consume(
            TokenKind::If,
            ErrorKind::InvalidIfStatement,
            "Expected IF after END to close the conditional",
        )?;

        Ok(Stmt::If {
            condition,
            body,
            span: keyword,
        })
    }

    /// Parses statements up to the block's closing keyword. The closer is
    /// left unconsumed for the caller.
    fn body(
        &mut self,
        closer: TokenKind,
        kind: ErrorKind,
        unterminated: &str,
    ) -> Result<Vec<Stmt>, BasicError> {
        let mut statements = Vec::new();

        loop {
            if self.match_kind(TokenKind::Eol) {
                continue;
            }
            if self.check(closer) {
                break;
            }
            if self.is_at_end() {
                return Err(BasicError::new(
                    kind,
                    self.error_span(),
                    unterminated.to_string(),
                ));
            }
            statements.push(self.statement()?);
            self.end_of_line()?;
        }

        Ok(statements)
    }

    fn end_of_line(&mut self) -> Result<(), BasicError> {
        if self.is_at_end() || self.match_kind(TokenKind::Eol) {
            Ok(())
        } else {
            let token = self.peek();
            Err(BasicError::new(
                ErrorKind::UnexpectedToken,
                token.span,
                format!(
                    "Expected end of line after statement, found {}",
                    describe(token)
                ),
            ))
        }
    }

    /// expr := term ((= | < | > | <= | >=) term)*
    ///
    /// Relational operators sit at the lowest precedence and left-fold like
    /// the arithmetic levels below.
    fn expression(&mut self) -> Result<Expr, BasicError> {
        let mut expr = self.term()?;

        while self.match_kinds(&[
            TokenKind::Equal,
            TokenKind::LessThan,
            TokenKind::GreaterThan,
            TokenKind::NotGreater,
            TokenKind::NotLess,
        ]) {
            let operator = match self.previous().kind {
                TokenKind::Equal => BinaryOp::Equal,
                TokenKind::LessThan => BinaryOp::Less,
                TokenKind::GreaterThan => BinaryOp::Greater,
                TokenKind::NotGreater => BinaryOp::NotGreater,
                TokenKind::NotLess => BinaryOp::NotLess,
                _ => unreachable!(),
            };
            let right = self.term()?;
            let span = expr.span().to(*right.span());

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    /// term := factor ((+ | -) factor)*
    fn term(&mut self) -> Result<Expr, BasicError> {
        let mut expr = self.factor()?;

        while self.match_kinds(&[TokenKind::Add, TokenKind::Sub]) {
            let operator = match self.previous().kind {
                TokenKind::Add => BinaryOp::Add,
                TokenKind::Sub => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            let right = self.factor()?;
            let span = expr.span().to(*right.span());

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    /// factor := unary ((* | /) unary)*
    fn factor(&mut self) -> Result<Expr, BasicError> {
        let mut expr = self.unary()?;

        while self.match_kinds(&[TokenKind::Mult, TokenKind::Div]) {
            let operator = match self.previous().kind {
                TokenKind::Mult => BinaryOp::Multiply,
                TokenKind::Div => BinaryOp::Divide,
                _ => unreachable!(),
            };
            let right = self.unary()?;
            let span = expr.span().to(*right.span());

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    /// unary := (+ | -) unary | primary
    fn unary(&mut self) -> Result<Expr, BasicError> {
        if self.match_kinds(&[TokenKind::Add, TokenKind::Sub]) {
            let token = self.previous().clone();
            let operator = match token.kind {
                TokenKind::Add => UnaryOp::Plus,
                TokenKind::Sub => UnaryOp::Negate,
                _ => unreachable!(),
            };
            let operand = self.unary()?;
            let span = token.span.to(*operand.span());

            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
                span,
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, BasicError> {
        if self.is_at_end() {
            return Err(BasicError::with_help(
                ErrorKind::UnexpectedToken,
                self.error_span(),
                "Expected expression, found end of input".to_string(),
                "Check for an unfinished expression at the end of the program.".to_string(),
            ));
        }

        let token = self.advance().clone();

        match token.kind {
            TokenKind::IntLit => {
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    BasicError::new(
                        ErrorKind::UnexpectedToken,
                        token.span,
                        format!("Integer literal out of range: {}", token.lexeme),
                    )
                })?;
                Ok(Expr::Literal {
                    value: Value::Int(value),
                    span: token.span,
                })
            }
            TokenKind::FloatLit => {
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    BasicError::new(
                        ErrorKind::UnexpectedToken,
                        token.span,
                        format!("Invalid float literal: {}", token.lexeme),
                    )
                })?;
                Ok(Expr::Literal {
                    value: Value::Float(value),
                    span: token.span,
                })
            }
            TokenKind::Ident => Ok(Expr::Variable {
                name: token.lexeme,
                span: token.span,
            }),
            TokenKind::LeftParen => {
                let expr = self.expression()?;
                let close = self.consume_with_help(
                    TokenKind::RightParen,
                    ErrorKind::MismatchedParenthesis,
                    "Mismatched parenthesis",
                    "Every '(' needs a matching ')'.".to_string(),
                )?;
                let span = token.span.to(close.span);

                Ok(Expr::Grouping {
                    expr: Box::new(expr),
                    span,
                })
            }
            _ => Err(BasicError::with_help(
                ErrorKind::UnexpectedToken,
                token.span,
                format!("Expected expression, found {}", describe(&token)),
                "Expected a number, a variable, or a parenthesized expression.".to_string(),
            )),
        }
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_kinds(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume(
        &mut self,
        kind: TokenKind,
        error_kind: ErrorKind,
        message: &str,
    ) -> Result<&Token, BasicError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(BasicError::new(
                error_kind,
                self.error_span(),
                message.to_string(),
            ))
        }
    }

    fn consume_with_help(
        &mut self,
        kind: TokenKind,
        error_kind: ErrorKind,
        message: &str,
        help: String,
    ) -> Result<&Token, BasicError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(BasicError::with_help(
                error_kind,
                self.error_span(),
                message.to_string(),
                help,
            ))
        }
    }

    /// Span to attach to an error at the current position. At end of input
    /// this points just past the last real token instead of at Eof.
    fn error_span(&self) -> Span {
        if self.is_at_end() && self.current > 0 {
            let last = &self.tokens[self.current - 1];
            Span::new(last.span.line, last.span.column + last.span.width, 1)
        } else {
            self.peek().span
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eol => "end of line".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}
