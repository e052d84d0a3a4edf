//! Statement grammar.

use std::rc::Rc;

use crate::ast::{Expr, Statement};
use crate::interpreter::{Class, Method};
use crate::lexer::Token;

use super::{ParseError, ParseResult, Parser};

impl Parser<'_> {
    /// statement := class_def | if_stmt | print_stmt | return_stmt
    ///            | simple_stmt NEWLINE
    pub(super) fn statement(&mut self) -> ParseResult<Statement> {
        match self.lexer.current() {
            Token::Class => self.class_definition(),
            Token::If => self.if_statement(),
            Token::Print => self.print_statement(),
            Token::Return => self.return_statement(),
            _ => {
                let statement = self.simple_statement()?;
                self.consume(&Token::Newline)?;
                Ok(statement)
            }
        }
    }

    /// class_def := "class" ID [ "(" ID ")" ] ":" NEWLINE INDENT method_def+ DEDENT
    fn class_definition(&mut self) -> ParseResult<Statement> {
        let name = self.lexer.expect_next_id()?.to_string();
        self.lexer.next();

        let parent = if *self.lexer.current() == Token::Char('(') {
            let parent_name = self.lexer.expect_next_id()?.to_string();
            let parent = self
                .classes
                .get(&parent_name)
                .cloned()
                .ok_or(ParseError::UnknownClass(parent_name))?;
            self.lexer.next();
            self.consume(&Token::Char(')'))?;
            Some(parent)
        } else {
            None
        };

        self.consume(&Token::Char(':'))?;
        self.consume(&Token::Newline)?;
        self.consume(&Token::Indent)?;
        let mut methods = Vec::new();
        while *self.lexer.current() == Token::Def {
            methods.push(self.method_definition()?);
        }
        self.consume(&Token::Dedent)?;

        let class = Rc::new(Class::new(name.clone(), methods, parent));
        self.classes.insert(name, class.clone());
        Ok(Statement::ClassDefinition(class))
    }

    /// method_def := "def" ID "(" "self" [ "," ID ]* ")" ":" suite
    ///
    /// The receiver parameter is spelled out in the source but never part
    /// of the formal parameters: the runtime binds `self` on every call.
    fn method_definition(&mut self) -> ParseResult<Method> {
        let name = self.lexer.expect_next_id()?.to_string();
        self.lexer.next();
        self.consume(&Token::Char('('))?;

        if *self.lexer.current() == Token::Char(')') {
            return Err(ParseError::MissingSelf(name));
        }
        if self.lexer.expect_id()? != "self" {
            return Err(ParseError::MissingSelf(name));
        }
        self.lexer.next();

        let mut formal_params = Vec::new();
        while *self.lexer.current() == Token::Char(',') {
            formal_params.push(self.lexer.expect_next_id()?.to_string());
            self.lexer.next();
        }
        self.consume(&Token::Char(')'))?;
        self.consume(&Token::Char(':'))?;

        let body = self.suite(true)?;
        Ok(Method {
            name,
            formal_params,
            body: Statement::MethodBody(Box::new(body)),
        })
    }

    /// suite := NEWLINE INDENT statement+ DEDENT
    fn suite(&mut self, starts_method: bool) -> ParseResult<Statement> {
        self.consume(&Token::Newline)?;
        self.consume(&Token::Indent)?;

        let enclosing = self.in_method;
        self.in_method = enclosing || starts_method;
        let mut statements = Vec::new();
        while *self.lexer.current() != Token::Dedent {
            statements.push(self.statement()?);
        }
        self.in_method = enclosing;

        self.consume(&Token::Dedent)?;
        Ok(Statement::Compound(statements))
    }

    /// if_stmt := "if" expr ":" suite [ "else" ":" suite ]
    fn if_statement(&mut self) -> ParseResult<Statement> {
        self.lexer.next();
        let condition = self.expression()?;
        self.consume(&Token::Char(':'))?;
        let if_body = Box::new(self.suite(false)?);
        let else_body = if *self.lexer.current() == Token::Else {
            self.lexer.next();
            self.consume(&Token::Char(':'))?;
            Some(Box::new(self.suite(false)?))
        } else {
            None
        };
        Ok(Statement::IfElse {
            condition,
            if_body,
            else_body,
        })
    }

    /// print_stmt := "print" [ expr ("," expr)* ] NEWLINE
    fn print_statement(&mut self) -> ParseResult<Statement> {
        self.lexer.next();
        let mut args = Vec::new();
        if *self.lexer.current() != Token::Newline {
            args.push(self.expression()?);
            while *self.lexer.current() == Token::Char(',') {
                self.lexer.next();
                args.push(self.expression()?);
            }
        }
        self.consume(&Token::Newline)?;
        Ok(Statement::Print(args))
    }

    /// return_stmt := "return" expr NEWLINE
    fn return_statement(&mut self) -> ParseResult<Statement> {
        if !self.in_method {
            return Err(ParseError::ReturnOutsideMethod);
        }
        self.lexer.next();
        let value = self.expression()?;
        self.consume(&Token::Newline)?;
        Ok(Statement::Return(value))
    }

    /// simple_stmt := target "=" expr | expr
    ///
    /// Parsed as an expression first; when an `=` follows, the expression
    /// must turn out to be a plain or dotted name.
    fn simple_statement(&mut self) -> ParseResult<Statement> {
        let expr = self.expression()?;
        if *self.lexer.current() != Token::Char('=') {
            return Ok(Statement::Expression(expr));
        }
        self.lexer.next();
        let value = Box::new(self.expression()?);

        let Expr::Variable(mut variable) = expr else {
            return Err(ParseError::InvalidAssignmentTarget);
        };
        let Some(field) = variable.dotted_ids.pop() else {
            return Err(ParseError::InvalidAssignmentTarget);
        };
        if variable.dotted_ids.is_empty() {
            Ok(Statement::Assignment { var: field, value })
        } else {
            Ok(Statement::FieldAssignment {
                object: variable,
                field_name: field,
                value,
            })
        }
    }
}
