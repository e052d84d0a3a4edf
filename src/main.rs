use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::Context;

use mython::interpreter;
use mython::lexer::Lexer;
use mython::parser;

fn main() -> anyhow::Result<()> {
    let source = match env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("cannot read `{path}`"))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read program from stdin")?;
            buffer
        }
    };

    let mut lexer = Lexer::new(&source)?;
    let program = parser::parse(&mut lexer)?;

    let stdout = io::stdout();
    let mut output = stdout.lock();
    interpreter::run(&program, &mut output)?;

    Ok(())
}
