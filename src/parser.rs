//! PEG interpreter over the [`grammar`] table. The output is a concrete
//! syntax tree; [`crate::document`] turns that into plain data.
//!
//! On failure the parser reports the furthest position any terminal failed
//! at, with the set of tokens that were expected there.

use crate::grammar::{self, RuleId, Term};
use crate::lexer::{LexError, Lexer, Token, TokenKind};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token {found} at {line}:{column}, expected {expected}")]
    Syntax {
        line: u32,
        column: u32,
        found: String,
        expected: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CstChild {
    Node(CstNode),
    Tok(Token),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CstNode {
    pub rule: RuleId,
    pub children: Vec<CstChild>,
}

impl CstNode {
    pub fn nodes(&self, rule: RuleId) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter_map(move |c| match c {
            CstChild::Node(n) if n.rule == rule => Some(n),
            _ => None,
        })
    }

    pub fn first_node(&self, rule: RuleId) -> Option<&CstNode> {
        self.nodes(rule).next()
    }

    /// Direct token children; tokens inside sub-nodes are not included.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|c| match c {
            CstChild::Tok(t) => Some(t),
            _ => None,
        })
    }

    pub fn token(&self, kind: TokenKind) -> Option<&Token> {
        self.tokens().find(|t| t.kind == kind)
    }

    pub fn has_token(&self, kind: TokenKind) -> bool {
        self.token(kind).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tokens()
            .filter(|t| t.kind == TokenKind::Name)
            .map(|t| t.text.as_str())
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    furthest: usize,
    expected: Vec<&'static str>,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            furthest: 0,
            expected: Vec::new(),
        })
    }

    pub fn parse(mut self) -> Result<CstNode, ParseError> {
        let root = self.match_rule(RuleId::Prog);
        match root {
            Some(node) if self.current().kind == TokenKind::Eof => Ok(node),
            _ => Err(self.syntax_error()),
        }
    }

    // The token vector always ends with Eof and Eof matches no terminal,
    // so pos never runs past the end.
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn record_failure(&mut self, what: &'static str) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest && !self.expected.contains(&what) {
            self.expected.push(what);
        }
    }

    fn syntax_error(&self) -> ParseError {
        let at = self.furthest.min(self.tokens.len() - 1);
        let tok = &self.tokens[at];
        let found = match tok.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Str => "string".to_string(),
            TokenKind::Regex => "regex literal".to_string(),
            TokenKind::Javadoc => "documentation comment".to_string(),
            _ => format!("'{}'", tok.text),
        };
        ParseError::Syntax {
            line: tok.line,
            column: tok.column,
            found,
            expected: self.expected.join(" or "),
        }
    }

    fn match_rule(&mut self, id: RuleId) -> Option<CstNode> {
        let start = self.pos;
        let mut children = Vec::new();
        if self.match_term(&grammar::rule(id).def, &mut children) {
            Some(CstNode { rule: id, children })
        } else {
            self.pos = start;
            None
        }
    }

    fn match_term(&mut self, term: &Term, out: &mut Vec<CstChild>) -> bool {
        match term {
            Term::Tok(kind) => {
                if self.current().kind == *kind {
                    out.push(CstChild::Tok(self.tokens[self.pos].clone()));
                    self.pos += 1;
                    true
                } else {
                    self.record_failure(kind.describe());
                    false
                }
            }
            Term::Word => {
                if self.current().kind.is_word() {
                    out.push(CstChild::Tok(self.tokens[self.pos].clone()));
                    self.pos += 1;
                    true
                } else {
                    self.record_failure("identifier");
                    false
                }
            }
            Term::Ref(id) => match self.match_rule(*id) {
                Some(node) => {
                    out.push(CstChild::Node(node));
                    true
                }
                None => false,
            },
            Term::Seq(terms) => {
                let start = self.pos;
                let mark = out.len();
                for t in *terms {
                    if !self.match_term(t, out) {
                        self.pos = start;
                        out.truncate(mark);
                        return false;
                    }
                }
                true
            }
            Term::Alt(terms) => {
                for t in *terms {
                    let start = self.pos;
                    let mark = out.len();
                    if self.match_term(t, out) {
                        return true;
                    }
                    self.pos = start;
                    out.truncate(mark);
                }
                false
            }
            Term::Opt(inner) => {
                let start = self.pos;
                let mark = out.len();
                if !self.match_term(inner, out) {
                    self.pos = start;
                    out.truncate(mark);
                }
                true
            }
            Term::Star(inner) => {
                loop {
                    let start = self.pos;
                    let mark = out.len();
                    // A successful zero-width match would loop forever.
                    if !self.match_term(inner, out) || self.pos == start {
                        self.pos = start;
                        out.truncate(mark);
                        break;
                    }
                }
                true
            }
            Term::SameLine(inner) => {
                if self.pos == 0 || self.tokens[self.pos].line != self.tokens[self.pos - 1].line {
                    return false;
                }
                self.match_term(inner, out)
            }
        }
    }
}
