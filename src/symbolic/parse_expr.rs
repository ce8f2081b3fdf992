use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::{E, PI};
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedSolids::symbolic::symbolic_engine::Expr;
/// let input = "x^3 + abs(x - 1)*exp(-x)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.eval_at("x", 1.0).unwrap(), 1.0);
/// ```
//                  precedence diagram
//                "x^2 + 3*sin(x)/2 - abs(x)"
//                |   expr  :  term (+|-) term ...     |
//                |____________________________________|
//                |   term  :  unary (*|/) unary ...   |
//                |____________________________________|
//                |   unary :  (-|+) unary | power     |
//                |____________________________________|
//                |   power :  atom ^ unary (right)    |
//                |____________________________________|
//                |   atom  :  number | name | f(expr) |
//                |            (expr) | |expr|         |
//                  etc...

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Op(char),
    LParen,
    RParen,
    Pipe,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation: 1e-6, 2.5E3
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number `{}`", literal))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Name(chars[start..i].iter().collect()));
            }
            '*' if i + 1 < chars.len() && chars[i + 1] == '*' => {
                tokens.push(Token::Op('^'));
                i += 2;
            }
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' | '[' | '{' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' | ']' | '}' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            other => return Err(format!("unexpected character `{}` at {}", other, i)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            Some(ref token) if *token == expected => Ok(()),
            Some(token) => Err(format!("expected {:?}, found {:?}", expected, token)),
            None => Err(format!("expected {:?}, found end of input", expected)),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_term()?;
        while let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            if op != '+' && op != '-' {
                break;
            }
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = if op == '+' {
                Expr::Add(lhs.boxed(), rhs.boxed())
            } else {
                Expr::Sub(lhs.boxed(), rhs.boxed())
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        while let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            if op != '*' && op != '/' {
                break;
            }
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = if op == '*' {
                Expr::Mul(lhs.boxed(), rhs.boxed())
            } else {
                Expr::Div(lhs.boxed(), rhs.boxed())
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                let operand = self.parse_unary()?;
                Ok(match operand {
                    Expr::Const(val) => Expr::Const(-val),
                    other => Expr::Mul(Expr::Const(-1.0).boxed(), other.boxed()),
                })
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_atom()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            // right associative: x^2^3 = x^(2^3), and x^-1 is allowed
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Number(val)) => Ok(Expr::Const(val)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Pipe) => {
                let inner = self.parse_expr()?;
                self.expect(Token::Pipe)?;
                Ok(Expr::Abs(inner.boxed()))
            }
            Some(Token::Name(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.pos += 1;
                    let arg = self.parse_expr()?;
                    self.expect(Token::RParen)?;
                    apply_function(&name, arg)
                } else {
                    Ok(match name.as_str() {
                        "pi" | "PI" => Expr::Const(PI),
                        "e" => Expr::Const(E),
                        _ => Expr::Var(name),
                    })
                }
            }
            Some(token) => Err(format!("unexpected token {:?}", token)),
            None => Err("unexpected end of input".to_string()),
        }
    }
}

fn apply_function(name: &str, arg: Expr) -> Result<Expr, String> {
    let boxed = arg.boxed();
    let expr = match name {
        "exp" => Expr::Exp(boxed),
        "ln" | "log" => Expr::Ln(boxed),
        "sin" => Expr::sin(boxed),
        "cos" => Expr::cos(boxed),
        "tg" | "tan" => Expr::tg(boxed),
        "abs" | "Abs" => Expr::Abs(boxed),
        "sqrt" => Expr::Pow(boxed, Expr::Const(0.5).boxed()),
        _ => return Err(format!("unknown function `{}`", name)),
    };
    Ok(expr)
}

/// Parses `input` into an `Expr`.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let tokens = tokenize(input.trim())?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!(
            "unexpected trailing input starting at {:?} in `{}`",
            parser.tokens[parser.pos], input
        ));
    }
    Ok(expr)
}
