use mython::lexer::{Lexer, LexerError, Token};

/// Drain a lexer into the full token stream, terminal `Eof` included.
fn lex(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input).unwrap();
    let mut tokens = vec![lexer.current().clone()];
    while *lexer.current() != Token::Eof {
        tokens.push(lexer.next().clone());
    }
    tokens
}

fn id(name: &str) -> Token {
    Token::Id(name.to_string())
}

#[test]
fn lex_assignment() {
    assert_eq!(
        lex("x = 42"),
        vec![
            id("x"),
            Token::Char('='),
            Token::Number(42),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn lex_keywords_and_comparisons() {
    assert_eq!(
        lex("if a >= b and c != None:"),
        vec![
            Token::If,
            id("a"),
            Token::GreaterOrEq,
            id("b"),
            Token::And,
            id("c"),
            Token::NotEq,
            Token::None,
            Token::Char(':'),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn keyword_must_end_at_a_boundary() {
    // `None_` and `printer` are identifiers, not keyword prefixes.
    assert_eq!(
        lex("None_ = printer"),
        vec![
            id("None_"),
            Token::Char('='),
            id("printer"),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn keyword_followed_by_paren_is_an_identifier() {
    assert_eq!(
        lex("print(1)"),
        vec![
            id("print"),
            Token::Char('('),
            Token::Number(1),
            Token::Char(')'),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn indent_and_dedent_are_synthesized() {
    let source = "class A:\n  def f(self):\n    return 1\nx = 2\n";
    assert_eq!(
        lex(source),
        vec![
            Token::Class,
            id("A"),
            Token::Char(':'),
            Token::Newline,
            Token::Indent,
            Token::Def,
            id("f"),
            Token::Char('('),
            id("self"),
            Token::Char(')'),
            Token::Char(':'),
            Token::Newline,
            Token::Indent,
            Token::Return,
            Token::Number(1),
            Token::Newline,
            Token::Dedent,
            Token::Dedent,
            id("x"),
            Token::Char('='),
            Token::Number(2),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn remaining_dedents_are_emitted_at_eof() {
    let tokens = lex("if a:\n  if b:\n    print c\n");
    let trailing: Vec<_> = tokens[tokens.len() - 3..].to_vec();
    assert_eq!(trailing, vec![Token::Dedent, Token::Dedent, Token::Eof]);
}

#[test]
fn shallower_line_emits_one_dedent_per_level() {
    let source = "if a:\n  if b:\n    print c\nprint d\n";
    let tokens = lex(source);
    let dedents = tokens.iter().filter(|t| **t == Token::Dedent).count();
    assert_eq!(dedents, 2);
}

#[test]
fn blank_and_comment_lines_produce_no_tokens() {
    let plain = lex("x = 1\ny = 2\n");
    let noisy = lex("x = 1\n\n   \n# a comment\n      # deeply indented comment\ny = 2\n");
    assert_eq!(plain, noisy);
}

#[test]
fn inline_comment_consumes_the_rest_of_the_line() {
    assert_eq!(
        lex("x = 1 # the rest: is, ignored"),
        vec![
            id("x"),
            Token::Char('='),
            Token::Number(1),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        lex(r#"print "a\nb\tc\"d\\e""#),
        vec![
            Token::Print,
            Token::String("a\nb\tc\"d\\e".to_string()),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn unknown_escape_keeps_the_escaped_character() {
    assert_eq!(
        lex(r#"x = "a\qb""#),
        vec![
            id("x"),
            Token::Char('='),
            Token::String("aqb".to_string()),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn single_and_double_quotes_both_delimit_strings() {
    assert_eq!(
        lex(r#"x = 'it is' + "quoted""#),
        vec![
            id("x"),
            Token::Char('='),
            Token::String("it is".to_string()),
            Token::Char('+'),
            Token::String("quoted".to_string()),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn next_is_sticky_at_eof() {
    let mut lexer = Lexer::new("x").unwrap();
    while *lexer.current() != Token::Eof {
        lexer.next();
    }
    assert_eq!(*lexer.next(), Token::Eof);
    assert_eq!(*lexer.next(), Token::Eof);
    assert_eq!(*lexer.current(), Token::Eof);
}

#[test]
fn expect_checks_tag_and_payload() {
    let mut lexer = Lexer::new("x = 1").unwrap();
    assert!(lexer.expect(&Token::Id("x".to_string())).is_ok());
    assert!(lexer.expect(&Token::Id("y".to_string())).is_err());
    assert_eq!(lexer.expect_id().unwrap(), "x");

    assert!(lexer.expect_next(&Token::Char('=')).is_ok());
    assert!(lexer.expect_next(&Token::Number(2)).is_err());
    assert!(lexer.expect_id().is_err());
}

#[test]
fn odd_indentation_is_an_error() {
    assert_eq!(
        Lexer::new("if a:\n   print b\n").unwrap_err(),
        LexerError::OddIndent { line: 2 }
    );
}

#[test]
fn unterminated_string_is_an_error() {
    assert_eq!(
        Lexer::new("x = \"oops").unwrap_err(),
        LexerError::UnterminatedString { line: 1 }
    );
    // A trailing backslash never closes the literal either.
    assert!(Lexer::new("x = \"oops\\").is_err());
}

#[test]
fn unrecognizable_character_is_an_error() {
    assert_eq!(
        Lexer::new("x = @").unwrap_err(),
        LexerError::UnexpectedCharacter {
            found: '@',
            line: 1
        }
    );
}

#[test]
fn oversized_number_is_an_error() {
    assert_eq!(
        Lexer::new("x = 99999999999999999999").unwrap_err(),
        LexerError::NumberOutOfRange { line: 1 }
    );
}
