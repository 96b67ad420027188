//! Demo expression compiler.
//!
//! Stand-in for the editor's real evaluator: a recursive-descent parser
//! for plain arithmetic in `x` (numbers, `+ - * / ^`, parentheses, unary
//! minus, implicit multiplication like `2x`, and a handful of unary
//! functions). The core makes no assumption about this grammar; it only
//! sees the `ExprCompiler` capability.

use graphfill::prelude::{CurveFn, ExprCompiler};

/// Parsed expression tree, evaluated per sample.
#[derive(Debug, Clone)]
enum Expr {
    Num(f64),
    X,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

#[derive(Debug, Clone, Copy)]
enum Func {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Exp,
    Ln,
    Abs,
}

impl Expr {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Num(v) => *v,
            Expr::X => x,
            Expr::Neg(e) => -e.eval(x),
            Expr::Add(a, b) => a.eval(x) + b.eval(x),
            Expr::Sub(a, b) => a.eval(x) - b.eval(x),
            Expr::Mul(a, b) => a.eval(x) * b.eval(x),
            Expr::Div(a, b) => a.eval(x) / b.eval(x),
            Expr::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Expr::Call(f, e) => {
                let v = e.eval(x);
                match f {
                    Func::Sin => v.sin(),
                    Func::Cos => v.cos(),
                    Func::Tan => v.tan(),
                    Func::Sqrt => v.sqrt(),
                    Func::Exp => v.exp(),
                    Func::Ln => v.ln(),
                    Func::Abs => v.abs(),
                }
            }
        }
    }
}

/// The capability handed to the core.
pub struct DemoCompiler;

impl ExprCompiler for DemoCompiler {
    fn compile(&self, expression: &str) -> Option<CurveFn<'_>> {
        let ast = parse(expression)?;
        Some(Box::new(move |x| ast.eval(x)))
    }
}

fn parse(input: &str) -> Option<Expr> {
    let mut p = Parser {
        chars: input.as_bytes(),
        pos: 0,
    };
    let e = p.expr()?;
    p.skip_ws();
    if p.pos == p.chars.len() {
        Some(e)
    } else {
        None
    }
}

struct Parser<'a> {
    chars: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Option<Expr> {
        let mut lhs = self.term()?;
        loop {
            if self.eat(b'+') {
                lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
            } else if self.eat(b'-') {
                lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
            } else {
                return Some(lhs);
            }
        }
    }

    // term := factor (('*' | '/') factor | factor)*   -- juxtaposition multiplies
    fn term(&mut self) -> Option<Expr> {
        let mut lhs = self.factor()?;
        loop {
            if self.eat(b'*') {
                lhs = Expr::Mul(Box::new(lhs), Box::new(self.factor()?));
            } else if self.eat(b'/') {
                lhs = Expr::Div(Box::new(lhs), Box::new(self.factor()?));
            } else {
                self.skip_ws();
                match self.peek() {
                    Some(c) if c == b'(' || c == b'x' || c.is_ascii_alphabetic() => {
                        lhs = Expr::Mul(Box::new(lhs), Box::new(self.factor()?));
                    }
                    _ => return Some(lhs),
                }
            }
        }
    }

    // factor := atom ('^' factor)?   -- right associative
    fn factor(&mut self) -> Option<Expr> {
        let base = self.atom()?;
        if self.eat(b'^') {
            let exp = self.factor()?;
            return Some(Expr::Pow(Box::new(base), Box::new(exp)));
        }
        Some(base)
    }

    fn atom(&mut self) -> Option<Expr> {
        self.skip_ws();
        match self.peek()? {
            b'-' => {
                self.pos += 1;
                Some(Expr::Neg(Box::new(self.factor()?)))
            }
            b'(' => {
                self.pos += 1;
                let e = self.expr()?;
                if self.eat(b')') {
                    Some(e)
                } else {
                    None
                }
            }
            c if c.is_ascii_digit() || c == b'.' => self.number(),
            c if c.is_ascii_alphabetic() => self.ident(),
            _ => None,
        }
    }

    fn number(&mut self) -> Option<Expr> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == b'.')
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.chars[start..self.pos]).ok()?;
        text.parse::<f64>().ok().map(Expr::Num)
    }

    fn ident(&mut self) -> Option<Expr> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let name = std::str::from_utf8(&self.chars[start..self.pos]).ok()?;
        if name == "x" {
            return Some(Expr::X);
        }
        let f = match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "sqrt" => Func::Sqrt,
            "exp" => Func::Exp,
            "ln" => Func::Ln,
            "abs" => Func::Abs,
            _ => return None,
        };
        if !self.eat(b'(') {
            return None;
        }
        let arg = self.expr()?;
        if self.eat(b')') {
            Some(Expr::Call(f, Box::new(arg)))
        } else {
            None
        }
    }
}
