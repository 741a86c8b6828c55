//! Recursive descent parser producing a flattened AST.
//!
//! Statements are newline- or `;`-terminated; binary expressions use
//! precedence climbing; all nodes land in an [`AstArena`]. Errors are
//! reported as [`Diagnostic`]s and recovery resumes at the next statement
//! boundary, so one bad line does not hide the rest of the file.
//!
//! The statement binding form `(expr as name)` is recognized only inside
//! its own parentheses. An `as` left dangling after an expression anywhere
//! else is reported with a fix-it and then parsed as if parenthesized, which
//! keeps later diagnostics sensible.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{
    AstArena, BinaryOp, Expr, ExprId, ExprKind, ExprRange, IfArm, Module, Name, Span, Stmt,
    StmtId, StmtKind, StmtRange, Token, TokenKind, UnaryOp,
};
use tern_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

/// Parser state.
pub struct Parser<'src> {
    /// Token stream from the lexer, EOF-terminated.
    tokens: &'src [Token],
    /// Arena receiving all parsed nodes.
    arena: AstArena,
    /// Current token index.
    pos: usize,
    /// Collected diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Nesting depth of `{ ... }` blocks, for the top-level-only rules.
    block_depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a new parser over a token stream.
    pub fn new(tokens: &'src [Token]) -> Self {
        Parser {
            tokens,
            arena: AstArena::new(),
            pos: 0,
            diagnostics: Vec::new(),
            block_depth: 0,
        }
    }

    /// Parse a complete module.
    pub fn parse_module(mut self) -> ParseResult {
        debug!(tokens = self.tokens.len(), "parse_module");

        let mut stmts = Vec::new();
        self.skip_newlines();

        while !self.at_end() {
            match self.parse_stmt() {
                Ok(id) => stmts.push(id),
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_stmt_boundary();
                }
            }
            self.skip_newlines();
        }

        debug!(
            statements = stmts.len(),
            diagnostics = self.diagnostics.len(),
            "module parsed"
        );

        let stmts = self.arena.alloc_stmt_list(&stmts);
        ParseResult {
            module: Module::new(stmts),
            arena: self.arena,
            diagnostics: self.diagnostics,
        }
    }

    // ===== Token access =====

    fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn peek(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current_kind()) == std::mem::discriminant(&kind)
    }

    fn skip_newlines(&mut self) {
        while matches!(self.current_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    /// Build an error diagnostic labeled at the current token.
    fn error_at(&self, code: ErrorCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(code).with_message(message).with_label(
            self.current_span(),
            format!("found {}", self.current_kind().display_name()),
        )
    }

    fn expect(&mut self, kind: TokenKind, code: ErrorCode, msg: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at(code, msg))
        }
    }

    /// Expect a closing delimiter, pointing back at the opener on failure.
    fn expect_closing(
        &mut self,
        kind: TokenKind,
        open_span: Span,
        what: &str,
    ) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(Diagnostic::error(ErrorCode::E1003)
                .with_message(format!("unclosed {what}"))
                .with_label(
                    self.current_span(),
                    format!(
                        "expected `{}`, found {}",
                        kind.display_name(),
                        self.current_kind().display_name()
                    ),
                )
                .with_secondary_label(open_span, format!("{what} opened here")))
        }
    }

    fn expect_ident(&mut self, msg: &str) -> Result<(Name, Span), Diagnostic> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.current_span();
            self.advance();
            Ok((name, span))
        } else {
            Err(self.error_at(ErrorCode::E1004, msg))
        }
    }

    /// Consume a statement terminator: newline, `;`, or an implicit one
    /// before `}` / end of file.
    fn expect_terminator(&mut self) -> Result<(), Diagnostic> {
        match self.current_kind() {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RBrace => Ok(()),
            _ => Err(self.error_at(ErrorCode::E1001, "expected end of statement")),
        }
    }

    /// Skip forward to the next statement boundary after an error.
    fn recover_to_stmt_boundary(&mut self) {
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Newline | TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                // Leave block closers for the enclosing block parser.
                TokenKind::RBrace => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ===== Statement parsing =====

    fn parse_stmt(&mut self) -> Result<StmtId, Diagnostic> {
        trace!(
            pos = self.pos,
            kind = self.current_kind().display_name(),
            "parse_stmt"
        );

        match self.current_kind() {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Fn => self.parse_fn_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_jump_stmt(StmtKind::Break),
            TokenKind::Continue => self.parse_jump_stmt(StmtKind::Continue),
            TokenKind::Ident(_) if matches!(self.peek(1), TokenKind::Eq) => self.parse_assign(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_assign(&mut self) -> Result<StmtId, Diagnostic> {
        let (name, name_span) = self.expect_ident("expected assignment target")?;
        self.expect(TokenKind::Eq, ErrorCode::E1001, "expected `=`")?;
        self.skip_newlines();

        let value = self.stmt_value_expr()?;
        self.expect_terminator()?;

        let span = name_span.merge(self.arena.expr(value).span);
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::Assign { name, value }, span)))
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtId, Diagnostic> {
        let expr = self.stmt_value_expr()?;

        if self.check(TokenKind::Eq) {
            let expr_span = self.arena.expr(expr).span;
            return Err(Diagnostic::error(ErrorCode::E1006)
                .with_message("invalid assignment target")
                .with_label(expr_span, "cannot assign to this expression")
                .with_note("assignment targets must be simple names"));
        }

        self.expect_terminator()?;
        let span = self.arena.expr(expr).span;
        Ok(self.arena.alloc_stmt(Stmt::new(StmtKind::Expr(expr), span)))
    }

    fn parse_if_stmt(&mut self) -> Result<StmtId, Diagnostic> {
        let start = self.current_span();
        self.advance(); // `if`

        let mut arms = Vec::new();
        let mut else_body = StmtRange::EMPTY;
        let mut end_span;

        loop {
            let cond = self.stmt_value_expr()?;
            let (body, body_span) = self.parse_block()?;
            arms.push(IfArm { cond, body });
            end_span = body_span;

            // Allow `else` on the line after the closing brace.
            let saved = self.pos;
            self.skip_newlines();
            if !self.check(TokenKind::Else) {
                self.pos = saved;
                break;
            }
            self.advance(); // `else`

            if self.check(TokenKind::If) {
                self.advance();
                continue;
            }

            let (body, body_span) = self.parse_block()?;
            else_body = body;
            end_span = body_span;
            break;
        }

        let arms = self.arena.alloc_arms(&arms);
        Ok(self.arena.alloc_stmt(Stmt::new(
            StmtKind::If { arms, else_body },
            start.merge(end_span),
        )))
    }

    fn parse_while_stmt(&mut self) -> Result<StmtId, Diagnostic> {
        let start = self.current_span();
        self.advance(); // `while`

        let cond = self.stmt_value_expr()?;
        let (body, body_span) = self.parse_block()?;

        Ok(self.arena.alloc_stmt(Stmt::new(
            StmtKind::While { cond, body },
            start.merge(body_span),
        )))
    }

    fn parse_fn_stmt(&mut self) -> Result<StmtId, Diagnostic> {
        let start = self.current_span();
        if self.block_depth > 0 {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E1007)
                    .with_message("function definitions are only allowed at top level")
                    .with_label(start, "nested function definition")
                    .with_note("move this definition to the top level of the program"),
            );
        }
        self.advance(); // `fn`

        let (name, _) = self.expect_ident("expected function name after `fn`")?;
        let open = self.expect(
            TokenKind::LParen,
            ErrorCode::E1001,
            "expected `(` after function name",
        )?;

        let mut params = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::RParen) && !self.at_end() {
            let (param, _) = self.expect_ident("expected parameter name")?;
            params.push(param);
            self.skip_newlines();
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
            self.skip_newlines();
        }
        self.expect_closing(TokenKind::RParen, open.span, "parameter list")?;

        let (body, body_span) = self.parse_block()?;
        let params = self.arena.alloc_params(&params);

        Ok(self.arena.alloc_stmt(Stmt::new(
            StmtKind::FnDef { name, params, body },
            start.merge(body_span),
        )))
    }

    fn parse_return_stmt(&mut self) -> Result<StmtId, Diagnostic> {
        let kw = self.advance(); // `return`

        let value = if self.current_kind().can_start_expr() {
            self.stmt_value_expr()?
        } else {
            ExprId::INVALID
        };
        self.expect_terminator()?;

        let span = if value.is_present() {
            kw.span.merge(self.arena.expr(value).span)
        } else {
            kw.span
        };
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::Return { value }, span)))
    }

    fn parse_jump_stmt(&mut self, kind: StmtKind) -> Result<StmtId, Diagnostic> {
        let kw = self.advance(); // `break` / `continue`
        self.expect_terminator()?;
        Ok(self.arena.alloc_stmt(Stmt::new(kind, kw.span)))
    }

    /// Parse a `{ ... }` block, returning its statements and full span.
    fn parse_block(&mut self) -> Result<(StmtRange, Span), Diagnostic> {
        let open = self.expect(
            TokenKind::LBrace,
            ErrorCode::E1001,
            "expected `{` to open a block",
        )?;

        self.block_depth += 1;
        let mut stmts = Vec::new();
        self.skip_newlines();

        while !self.check(TokenKind::RBrace) && !self.at_end() {
            match self.parse_stmt() {
                Ok(id) => stmts.push(id),
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_stmt_boundary();
                }
            }
            self.skip_newlines();
        }
        self.block_depth -= 1;

        let close = self.expect_closing(TokenKind::RBrace, open.span, "block")?;
        let range = self.arena.alloc_stmt_list(&stmts);
        Ok((range, open.span.merge(close.span)))
    }

    // ===== Expression parsing =====

    /// Parse an expression in statement position, recovering from a bare
    /// `expr as name` outside parentheses.
    fn stmt_value_expr(&mut self) -> Result<ExprId, Diagnostic> {
        let expr = self.expression()?;
        Ok(self.recover_stray_binding(expr))
    }

    /// Report a binding form missing its parentheses and parse it anyway.
    fn recover_stray_binding(&mut self, expr: ExprId) -> ExprId {
        if !self.check(TokenKind::As) {
            return expr;
        }

        let as_span = self.current_span();
        self.advance();

        self.diagnostics.push(
            Diagnostic::error(ErrorCode::E1005)
                .with_message("statement binding must be parenthesized")
                .with_label(as_span, "`as` binding outside parentheses")
                .with_suggestion("wrap the binding in parentheses: `(expr as name)`"),
        );

        if let TokenKind::Ident(name) = self.current_kind() {
            let name_span = self.current_span();
            self.advance();
            let span = self.arena.expr(expr).span.merge(name_span);
            return self.arena.alloc_expr(Expr::new(
                ExprKind::Binding {
                    expr,
                    name,
                    name_span,
                },
                span,
            ));
        }
        expr
    }

    fn expression(&mut self) -> Result<ExprId, Diagnostic> {
        ensure_sufficient_stack(|| self.parse_precedence(BinaryOp::MAX_PRECEDENCE))
    }

    fn parse_precedence(&mut self, max_prec: u8) -> Result<ExprId, Diagnostic> {
        let mut left = self.unary()?;

        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec > max_prec {
                break;
            }

            self.advance();
            self.skip_newlines();

            // All tern binary operators are left-associative.
            let right = self.parse_precedence(prec - 1)?;

            let span = self.arena.expr(left).span.merge(self.arena.expr(right).span);
            left = self.arena.alloc_expr(Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: left,
                    rhs: right,
                },
                span,
            ));
        }

        Ok(left)
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    fn unary(&mut self) -> Result<ExprId, Diagnostic> {
        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        let Some(op) = op else {
            return self.postfix();
        };

        let op_token = self.advance();
        let operand = self.unary()?;
        let span = op_token.span.merge(self.arena.expr(operand).span);
        Ok(self
            .arena
            .alloc_expr(Expr::new(ExprKind::Unary { op, expr: operand }, span)))
    }

    fn postfix(&mut self) -> Result<ExprId, Diagnostic> {
        let mut expr = self.primary()?;

        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    let open = self.advance();
                    let args = self.parse_call_args()?;
                    self.skip_newlines();
                    let close = self.expect_closing(TokenKind::RParen, open.span, "argument list")?;
                    let span = self.arena.expr(expr).span.merge(close.span);
                    expr = self.arena.alloc_expr(Expr::new(
                        ExprKind::Call { callee: expr, args },
                        span,
                    ));
                }
                TokenKind::LBracket => {
                    let open = self.advance();
                    self.skip_newlines();
                    let index = self.expression()?;
                    let index = self.recover_stray_binding(index);
                    self.skip_newlines();
                    let close =
                        self.expect_closing(TokenKind::RBracket, open.span, "index expression")?;
                    let span = self.arena.expr(expr).span.merge(close.span);
                    expr = self.arena.alloc_expr(Expr::new(
                        ExprKind::Index { target: expr, index },
                        span,
                    ));
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_call_args(&mut self) -> Result<ExprRange, Diagnostic> {
        self.skip_newlines();
        let mut args = Vec::new();

        while !self.check(TokenKind::RParen) && !self.at_end() {
            let arg = self.expression()?;
            let arg = self.recover_stray_binding(arg);
            args.push(arg);

            self.skip_newlines();
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
            self.skip_newlines();
        }

        Ok(self.arena.alloc_expr_list(&args))
    }

    fn primary(&mut self) -> Result<ExprId, Diagnostic> {
        let span = self.current_span();

        match self.current_kind() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(self.arena.alloc_expr(Expr::new(ExprKind::Int(n), span)))
            }
            TokenKind::Float(bits) => {
                self.advance();
                Ok(self.arena.alloc_expr(Expr::new(ExprKind::Float(bits), span)))
            }
            TokenKind::Str(name) => {
                self.advance();
                Ok(self.arena.alloc_expr(Expr::new(ExprKind::Str(name), span)))
            }
            TokenKind::True => {
                self.advance();
                Ok(self
                    .arena
                    .alloc_expr(Expr::new(ExprKind::Bool(true), span)))
            }
            TokenKind::False => {
                self.advance();
                Ok(self
                    .arena
                    .alloc_expr(Expr::new(ExprKind::Bool(false), span)))
            }
            TokenKind::None => {
                self.advance();
                Ok(self.arena.alloc_expr(Expr::new(ExprKind::None, span)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.arena.alloc_expr(Expr::new(ExprKind::Ident(name), span)))
            }
            TokenKind::LParen => self.parse_paren_group(),
            TokenKind::LBracket => self.parse_list(),
            // The lexer already reported this region; keep quiet and move on.
            TokenKind::Error => {
                self.advance();
                Ok(self.arena.alloc_expr(Expr::new(ExprKind::Error, span)))
            }
            _ => Err(self.error_at(ErrorCode::E1002, "expected expression")),
        }
    }

    /// Parse `( expr )` grouping or the binding form `( expr as name )`.
    fn parse_paren_group(&mut self) -> Result<ExprId, Diagnostic> {
        let open = self.advance(); // `(`
        self.skip_newlines();

        let inner = self.expression()?;
        self.skip_newlines();

        if self.check(TokenKind::As) {
            self.advance();
            let (name, name_span) = self.expect_ident("expected binding name after `as`")?;
            self.skip_newlines();
            let close = self.expect_closing(TokenKind::RParen, open.span, "parenthesis")?;

            trace!(name = ?name, "parsed statement binding");
            return Ok(self.arena.alloc_expr(Expr::new(
                ExprKind::Binding {
                    expr: inner,
                    name,
                    name_span,
                },
                open.span.merge(close.span),
            )));
        }

        self.expect_closing(TokenKind::RParen, open.span, "parenthesis")?;
        Ok(inner)
    }

    fn parse_list(&mut self) -> Result<ExprId, Diagnostic> {
        let open = self.advance(); // `[`
        self.skip_newlines();

        let mut elems = Vec::new();
        while !self.check(TokenKind::RBracket) && !self.at_end() {
            let elem = self.expression()?;
            let elem = self.recover_stray_binding(elem);
            elems.push(elem);

            self.skip_newlines();
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
            self.skip_newlines();
        }

        let close = self.expect_closing(TokenKind::RBracket, open.span, "list")?;
        let elems = self.arena.alloc_expr_list(&elems);
        Ok(self.arena.alloc_expr(Expr::new(
            ExprKind::List { elems },
            open.span.merge(close.span),
        )))
    }
}

/// Result of parsing a module.
pub struct ParseResult {
    /// The parsed module.
    pub module: Module,
    /// Arena holding every node of the module.
    pub arena: AstArena,
    /// Errors and warnings, in source order per phase.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Whether any diagnostic is an error (warnings alone stay runnable).
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_error()).count()
    }
}
