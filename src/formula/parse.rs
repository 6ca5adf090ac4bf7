use crate::formula::Formula;
use std::fmt::{self, Display, Formatter};
use std::io::Read;
use std::str::FromStr;

/// Deepest run of negations and parentheses accepted before parsing gives up.
const MAX_DEPTH: usize = 500;

pub fn parse<R: Read>(mut reader: R) -> Result<Formula, ParseError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_str(&input)
}

pub fn parse_str(input: &str) -> Result<Formula, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        end: input.len(),
        depth: 0,
    };
    let formula = parser.equivalence()?;
    match parser.peek() {
        None => Ok(formula),
        Some((offset, token)) => Err(ParseError::Format(format!(
            "unexpected {} at offset {}",
            token, offset
        ))),
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    Format(String),
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "io error: {}", e),
            ParseError::Format(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    Implies,
    Iff,
    Open,
    Close,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Not => f.write_str("'¬'"),
            Token::And => f.write_str("'∧'"),
            Token::Or => f.write_str("'∨'"),
            Token::Implies => f.write_str("'=>'"),
            Token::Iff => f.write_str("'<=>'"),
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = vec![];
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '#' => {
                // comment runs to the end of the line
                while let Some((_, c)) = chars.next() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            '(' => Token::Open,
            ')' => Token::Close,
            '!' | '~' | '¬' => Token::Not,
            '&' | '∧' => Token::And,
            '|' | '∨' => Token::Or,
            '⇒' => Token::Implies,
            '⇔' => Token::Iff,
            '=' | '-' => match chars.next() {
                Some((_, '>')) => Token::Implies,
                _ => return Err(ParseError::Format(format!("expected '>' after '{}' at offset {}", c, offset))),
            },
            '<' => {
                let arrow = (chars.next().map(|(_, c)| c), chars.next().map(|(_, c)| c));
                match arrow {
                    (Some('='), Some('>')) | (Some('-'), Some('>')) => Token::Iff,
                    _ => return Err(ParseError::Format(format!("malformed '<=>' at offset {}", offset))),
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = c.to_string();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(name)
            }
            c => return Err(ParseError::Format(format!("unexpected character '{}' at offset {}", c, offset))),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    position: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.position)
    }

    fn eat(&mut self, token: &Token) -> bool {
        match self.peek() {
            Some((_, t)) if t == token => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    fn descend(&mut self, offset: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::Format(format!("nesting too deep at offset {}", offset)));
        }
        Ok(())
    }

    // equivalence := implication ('<=>' implication)*
    fn equivalence(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.implication()?;
        while self.eat(&Token::Iff) {
            let rhs = self.implication()?;
            lhs = Formula::eq(lhs, rhs);
        }
        Ok(lhs)
    }

    // implication := disjunction ('=>' disjunction)*, grouped to the right
    fn implication(&mut self) -> Result<Formula, ParseError> {
        let mut operands = vec![self.disjunction()?];
        while self.eat(&Token::Implies) {
            operands.push(self.disjunction()?);
        }
        let mut rhs = operands.pop().ok_or_else(|| ParseError::Format("empty implication".into()))?;
        while let Some(lhs) = operands.pop() {
            rhs = Formula::implies(lhs, rhs);
        }
        Ok(rhs)
    }

    fn disjunction(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.conjunction()?;
        while self.eat(&Token::Or) {
            let rhs = self.conjunction()?;
            lhs = Formula::or(lhs, rhs);
        }
        Ok(lhs)
    }

    fn conjunction(&mut self) -> Result<Formula, ParseError> {
        let mut lhs = self.unary()?;
        while self.eat(&Token::And) {
            let rhs = self.unary()?;
            lhs = Formula::and(lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Formula, ParseError> {
        let (offset, token) = match self.peek() {
            Some(next) => next.clone(),
            None => {
                return Err(ParseError::Format(format!(
                    "unexpected end of input at offset {}",
                    self.end
                )))
            }
        };
        self.position += 1;

        match token {
            Token::Ident(name) => Ok(Formula::Var(name)),
            Token::Not => {
                self.descend(offset)?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(Formula::not(operand))
            }
            Token::Open => {
                self.descend(offset)?;
                let inner = self.equivalence()?;
                if !self.eat(&Token::Close) {
                    let at = self.peek().map(|(offset, _)| *offset).unwrap_or(self.end);
                    return Err(ParseError::Format(format!("missing ')' at offset {}", at)));
                }
                self.depth -= 1;
                Ok(inner)
            }
            token => Err(ParseError::Format(format!("unexpected {} at offset {}", token, offset))),
        }
    }
}
