use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Integer,
    Decimal,
    Str,
    Regex,
    Javadoc,

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Equals,   // =
    At,       // @
    Wildcard, // *

    // Declaration keywords
    Entity,
    Enum,
    Relationship,
    Application,
    Deployment,
    Config,
    Entities,
    To,
    With,
    For,
    Except,
    All,
    True,
    False,

    // Cardinalities
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,

    // Validations
    Required,
    Unique,
    Min,
    Max,
    Minlength,
    Maxlength,
    Minbytes,
    Maxbytes,
    Pattern,

    // Unary options
    SkipClient,
    SkipServer,
    SkipUserManagement,
    NoFluentMethod,
    Filter,

    // Binary options
    Dto,
    Paginate,
    Service,
    Search,
    Microservice,
    AngularSuffix,
    ClientRootFolder,

    Eof,
}

/// Identifier-shaped lexemes become keywords only on an exact match, so
/// `entityName` stays a NAME while `entity` does not.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("all", TokenKind::All),
    ("angularSuffix", TokenKind::AngularSuffix),
    ("application", TokenKind::Application),
    ("clientRootFolder", TokenKind::ClientRootFolder),
    ("config", TokenKind::Config),
    ("deployment", TokenKind::Deployment),
    ("dto", TokenKind::Dto),
    ("entities", TokenKind::Entities),
    ("entity", TokenKind::Entity),
    ("enum", TokenKind::Enum),
    ("enums", TokenKind::Enum),
    ("except", TokenKind::Except),
    ("false", TokenKind::False),
    ("filter", TokenKind::Filter),
    ("for", TokenKind::For),
    ("ManyToMany", TokenKind::ManyToMany),
    ("ManyToOne", TokenKind::ManyToOne),
    ("max", TokenKind::Max),
    ("maxbytes", TokenKind::Maxbytes),
    ("maxlength", TokenKind::Maxlength),
    ("microservice", TokenKind::Microservice),
    ("min", TokenKind::Min),
    ("minbytes", TokenKind::Minbytes),
    ("minlength", TokenKind::Minlength),
    ("noFluentMethod", TokenKind::NoFluentMethod),
    ("OneToMany", TokenKind::OneToMany),
    ("OneToOne", TokenKind::OneToOne),
    ("paginate", TokenKind::Paginate),
    ("pattern", TokenKind::Pattern),
    ("relationship", TokenKind::Relationship),
    ("required", TokenKind::Required),
    ("search", TokenKind::Search),
    ("service", TokenKind::Service),
    ("skipClient", TokenKind::SkipClient),
    ("skipServer", TokenKind::SkipServer),
    ("skipUserManagement", TokenKind::SkipUserManagement),
    ("to", TokenKind::To),
    ("true", TokenKind::True),
    ("unique", TokenKind::Unique),
    ("with", TokenKind::With),
];

impl TokenKind {
    /// NAME or any keyword. Grammar slots that accept arbitrary words
    /// (annotation names, config keys and values) match on this, since
    /// words like `microservice` or `skipClient` lex as keywords.
    pub fn is_word(self) -> bool {
        !matches!(
            self,
            TokenKind::Integer
                | TokenKind::Decimal
                | TokenKind::Str
                | TokenKind::Regex
                | TokenKind::Javadoc
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::Equals
                | TokenKind::At
                | TokenKind::Wildcard
                | TokenKind::Eof
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Name => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Str => "string",
            TokenKind::Regex => "regex literal",
            TokenKind::Javadoc => "documentation comment",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Equals => "'='",
            TokenKind::At => "'@'",
            TokenKind::Wildcard => "'*'",
            TokenKind::Eof => "end of input",
            keyword => KEYWORDS
                .iter()
                .find(|(_, kind)| *kind == keyword)
                .map(|(text, _)| *text)
                .unwrap_or("keyword"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{0}' at {1}:{2}")]
    UnexpectedChar(char, u32, u32),
    #[error("Unterminated string at {0}:{1}")]
    UnterminatedString(u32, u32),
    #[error("Unterminated regex literal at {0}:{1}")]
    UnterminatedRegex(u32, u32),
    #[error("Unterminated comment at {0}:{1}")]
    UnterminatedComment(u32, u32),
    #[error("Invalid number '{0}' at {1}:{2}")]
    InvalidNumber(String, u32, u32),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    // '/**' doc comments and '/regex/' literals are real
                    // tokens; only '//' and plain '/* */' get skipped.
                    let mut probe = self.chars.clone();
                    probe.next();
                    match probe.next() {
                        Some('/') => {
                            while let Some(&c) = self.chars.peek() {
                                self.bump();
                                if c == '\n' {
                                    break;
                                }
                            }
                        }
                        Some('*') => {
                            let javadoc = probe.next() == Some('*') && probe.peek() != Some(&'/');
                            if javadoc {
                                break;
                            }
                            self.skip_block_comment()?;
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        self.bump(); // '/'
        self.bump(); // '*'
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(LexError::UnterminatedComment(line, column)),
            }
        }
    }

    fn read_javadoc(&mut self) -> Result<String, LexError> {
        let (line, column) = (self.line, self.column);
        self.bump(); // '/'
        self.bump(); // '*'
        self.bump(); // '*'
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    return Ok(s);
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedComment(line, column)),
            }
        }
    }

    fn read_word(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let (line, column) = (self.line, self.column);
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.bump() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString(line, column)),
            }
        }
    }

    fn read_regex(&mut self) -> Result<String, LexError> {
        let (line, column) = (self.line, self.column);
        self.bump(); // '/'
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('/') => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('/') => s.push('/'),
                    Some(c) => {
                        s.push('\\');
                        s.push(c);
                    }
                    None => return Err(LexError::UnterminatedRegex(line, column)),
                },
                Some('\n') | None => return Err(LexError::UnterminatedRegex(line, column)),
                Some(c) => s.push(c),
            }
        }
    }

    fn read_number(&mut self, first: char) -> Result<(TokenKind, String), LexError> {
        let (line, column) = (self.line, self.column);
        let mut s = String::from(first);
        let mut kind = TokenKind::Integer;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.bump();
            } else if c == '.' && kind == TokenKind::Integer {
                s.push(c);
                self.bump();
                kind = TokenKind::Decimal;
            } else {
                break;
            }
        }
        let valid = match kind {
            TokenKind::Integer => s.parse::<i64>().is_ok(),
            _ => s.parse::<f64>().is_ok(),
        };
        if !valid {
            return Err(LexError::InvalidNumber(s, line, column));
        }
        Ok((kind, s))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let (line, column) = (self.line, self.column);
        let token = |kind: TokenKind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let c = match self.chars.peek().copied() {
            Some(c) => c,
            None => return Ok(token(TokenKind::Eof, String::new())),
        };

        let tok = match c {
            '{' => {
                self.bump();
                token(TokenKind::LBrace, c.to_string())
            }
            '}' => {
                self.bump();
                token(TokenKind::RBrace, c.to_string())
            }
            '(' => {
                self.bump();
                token(TokenKind::LParen, c.to_string())
            }
            ')' => {
                self.bump();
                token(TokenKind::RParen, c.to_string())
            }
            '[' => {
                self.bump();
                token(TokenKind::LBracket, c.to_string())
            }
            ']' => {
                self.bump();
                token(TokenKind::RBracket, c.to_string())
            }
            ',' => {
                self.bump();
                token(TokenKind::Comma, c.to_string())
            }
            '=' => {
                self.bump();
                token(TokenKind::Equals, c.to_string())
            }
            '@' => {
                self.bump();
                token(TokenKind::At, c.to_string())
            }
            '*' => {
                self.bump();
                token(TokenKind::Wildcard, c.to_string())
            }
            '"' => {
                self.bump();
                token(TokenKind::Str, self.read_string()?)
            }
            '/' => {
                // skip_whitespace_and_comments only stops on '/' for a doc
                // comment or a regex literal.
                let mut probe = self.chars.clone();
                probe.next();
                if probe.peek() == Some(&'*') {
                    token(TokenKind::Javadoc, self.read_javadoc()?)
                } else {
                    token(TokenKind::Regex, self.read_regex()?)
                }
            }
            '-' => {
                self.bump();
                match self.chars.peek() {
                    Some(d) if d.is_ascii_digit() => {
                        let (kind, text) = self.read_number(c)?;
                        token(kind, text)
                    }
                    _ => return Err(LexError::UnexpectedChar(c, line, column)),
                }
            }
            c if c.is_ascii_digit() => {
                self.bump();
                let (kind, text) = self.read_number(c)?;
                token(kind, text)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
                let text = self.read_word(c);
                let kind = KEYWORDS
                    .iter()
                    .find(|(word, _)| *word == text)
                    .map(|(_, kind)| *kind)
                    .unwrap_or(TokenKind::Name);
                token(kind, text)
            }
            _ => return Err(LexError::UnexpectedChar(c, line, column)),
        };

        Ok(tok)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("entity Foo { }"),
            vec![
                TokenKind::Entity,
                TokenKind::Name,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_needs_exact_match() {
        let tokens = Lexer::new("entityName entity enums").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[1].kind, TokenKind::Entity);
        assert_eq!(tokens[2].kind, TokenKind::Enum);
    }

    #[test]
    fn test_name_allows_dash() {
        let tokens = Lexer::new("infinite-scroll").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[0].text, "infinite-scroll");
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("42 -7 3.14").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Integer);
        assert_eq!(tokens[1].text, "-7");
        assert_eq!(tokens[2].kind, TokenKind::Decimal);
        assert_eq!(tokens[2].text, "3.14");
    }

    #[test]
    fn test_comments_skipped_javadoc_kept() {
        let input = "// line\n/* block */ /** doc */ entity";
        let tokens = Lexer::new(input).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Javadoc);
        assert_eq!(tokens[0].text, " doc ");
        assert_eq!(tokens[1].kind, TokenKind::Entity);
    }

    #[test]
    fn test_empty_block_comment_is_not_javadoc() {
        let tokens = Lexer::new("/**/ entity").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Entity);
    }

    #[test]
    fn test_multiline_javadoc() {
        let input = "/**\n * Customer entity.\n */ entity";
        let tokens = Lexer::new(input).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Javadoc);
        assert!(tokens[0].text.contains("Customer entity."));
    }

    #[test]
    fn test_regex_literal() {
        let tokens = Lexer::new(r"pattern(/^[a-z]+\/?$/)").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Pattern);
        assert_eq!(tokens[2].kind, TokenKind::Regex);
        assert_eq!(tokens[2].text, "^[a-z]+/?$");
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""a \"b\" c""#).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text, "a \"b\" c");
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("entity Foo {\n  name String\n}")
            .tokenize()
            .unwrap();
        let name = tokens.iter().find(|t| t.text == "name").unwrap();
        assert_eq!((name.line, name.column), (2, 3));
        let brace = tokens.iter().find(|t| t.kind == TokenKind::RBrace).unwrap();
        assert_eq!(brace.line, 3);
    }

    #[test]
    fn test_unterminated_regex() {
        let err = Lexer::new("pattern(/abc").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedRegex(..)));
    }

    #[test]
    fn test_unexpected_char() {
        let err = Lexer::new("entity Foo ; {").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar(';', ..)));
    }
}
