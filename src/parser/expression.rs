//! Expression grammar, highest precedence innermost.

use crate::ast::{Comparator, Expr, MethodCall, NewInstance, VariableValue};
use crate::lexer::Token;

use super::{ParseError, ParseResult, Parser};

impl Parser<'_> {
    /// expr := or_test
    pub(super) fn expression(&mut self) -> ParseResult<Expr> {
        self.or_test()
    }

    /// or_test := and_test ("or" and_test)*
    fn or_test(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and_test()?;
        while *self.lexer.current() == Token::Or {
            self.lexer.next();
            let rhs = self.and_test()?;
            expr = Expr::Or(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// and_test := not_test ("and" not_test)*
    fn and_test(&mut self) -> ParseResult<Expr> {
        let mut expr = self.not_test()?;
        while *self.lexer.current() == Token::And {
            self.lexer.next();
            let rhs = self.not_test()?;
            expr = Expr::And(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    /// not_test := "not" not_test | comparison
    fn not_test(&mut self) -> ParseResult<Expr> {
        if *self.lexer.current() == Token::Not {
            self.lexer.next();
            let argument = self.not_test()?;
            Ok(Expr::Not(Box::new(argument)))
        } else {
            self.comparison()
        }
    }

    /// comparison := sum [ ("==" | "!=" | "<" | ">" | "<=" | ">=") sum ]
    fn comparison(&mut self) -> ParseResult<Expr> {
        let expr = self.sum()?;
        let comparator = match self.lexer.current() {
            Token::Eq => Comparator::Equal,
            Token::NotEq => Comparator::NotEqual,
            Token::Char('<') => Comparator::Less,
            Token::Char('>') => Comparator::Greater,
            Token::LessOrEq => Comparator::LessOrEqual,
            Token::GreaterOrEq => Comparator::GreaterOrEqual,
            _ => return Ok(expr),
        };
        self.lexer.next();
        let rhs = self.sum()?;
        Ok(Expr::Comparison(comparator, Box::new(expr), Box::new(rhs)))
    }

    /// sum := term (("+" | "-") term)*
    fn sum(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        loop {
            match self.lexer.current() {
                Token::Char('+') => {
                    self.lexer.next();
                    let rhs = self.term()?;
                    expr = Expr::Add(Box::new(expr), Box::new(rhs));
                }
                Token::Char('-') => {
                    self.lexer.next();
                    let rhs = self.term()?;
                    expr = Expr::Sub(Box::new(expr), Box::new(rhs));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// term := factor (("*" | "/") factor)*
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        loop {
            match self.lexer.current() {
                Token::Char('*') => {
                    self.lexer.next();
                    let rhs = self.factor()?;
                    expr = Expr::Mult(Box::new(expr), Box::new(rhs));
                }
                Token::Char('/') => {
                    self.lexer.next();
                    let rhs = self.factor()?;
                    expr = Expr::Div(Box::new(expr), Box::new(rhs));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// factor := "-" factor | postfix
    fn factor(&mut self) -> ParseResult<Expr> {
        if *self.lexer.current() == Token::Char('-') {
            self.lexer.next();
            let argument = self.factor()?;
            Ok(Expr::Sub(Box::new(Expr::Number(0)), Box::new(argument)))
        } else {
            self.postfix()
        }
    }

    /// postfix := primary ("." ID [ "(" args ")" ])*
    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        while *self.lexer.current() == Token::Char('.') {
            let name = self.lexer.expect_next_id()?.to_string();
            self.lexer.next();
            if *self.lexer.current() == Token::Char('(') {
                let args = self.call_args()?;
                expr = Expr::MethodCall(MethodCall {
                    object: Box::new(expr),
                    method: name,
                    args,
                });
            } else {
                match &mut expr {
                    Expr::Variable(variable) => variable.dotted_ids.push(name),
                    _ => return Err(ParseError::FieldOnExpression),
                }
            }
        }
        Ok(expr)
    }

    /// primary := NUMBER | STRING | "True" | "False" | "None"
    ///          | "(" expr ")" | "str" "(" expr ")" | ID [ "(" args ")" ]
    fn primary(&mut self) -> ParseResult<Expr> {
        match self.lexer.current().clone() {
            Token::Number(value) => {
                self.lexer.next();
                Ok(Expr::Number(value))
            }
            Token::String(value) => {
                self.lexer.next();
                Ok(Expr::String(value))
            }
            Token::True => {
                self.lexer.next();
                Ok(Expr::Bool(true))
            }
            Token::False => {
                self.lexer.next();
                Ok(Expr::Bool(false))
            }
            Token::None => {
                self.lexer.next();
                Ok(Expr::None)
            }
            Token::Char('(') => {
                self.lexer.next();
                let inner = self.expression()?;
                self.consume(&Token::Char(')'))?;
                Ok(inner)
            }
            Token::Id(name) => {
                self.lexer.next();
                if *self.lexer.current() != Token::Char('(') {
                    return Ok(Expr::Variable(VariableValue::new(vec![name])));
                }
                if name == "str" {
                    self.lexer.next();
                    let argument = self.expression()?;
                    self.consume(&Token::Char(')'))?;
                    return Ok(Expr::Stringify(Box::new(argument)));
                }
                let class = self
                    .classes
                    .get(&name)
                    .cloned()
                    .ok_or(ParseError::UnknownClass(name))?;
                let args = self.call_args()?;
                Ok(Expr::NewInstance(NewInstance { class, args }))
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "an expression".to_string(),
                found: other.describe(),
            }),
        }
    }

    /// args := "(" [ expr ("," expr)* ] ")"
    fn call_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.consume(&Token::Char('('))?;
        let mut args = Vec::new();
        if *self.lexer.current() != Token::Char(')') {
            args.push(self.expression()?);
            while *self.lexer.current() == Token::Char(',') {
                self.lexer.next();
                args.push(self.expression()?);
            }
        }
        self.consume(&Token::Char(')'))?;
        Ok(args)
    }
}
