//! Argument tokenizer
//!
//! Splits a raw command line the way an interactive shell would, as far as
//! whitespace and quoting go. Each token remembers the byte offset it started at
//! so completion can line tokens up with the cursor.

use std::slice;

const SPACE: u8 = b' ';
const DELIMITERS: [u8; 3] = [SPACE, b'"', b'\''];

/// One token with its byte offset in the source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub offset: usize,
}

impl Token {
    pub fn new(value: impl Into<String>, offset: usize) -> Self {
        Token {
            value: value.into(),
            offset,
        }
    }

    /// Offset just past the token's value
    pub fn end(&self) -> usize {
        self.offset + self.value.len()
    }
}

/// Ordered token chain for a single invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    tokens: Vec<Token>,
}

impl Arguments {
    /// Tokenize a raw line.
    ///
    /// A quote character becomes the only active delimiter until its partner shows
    /// up; an unterminated quote runs to the end of the line. An empty pair of quotes
    /// still yields an empty token, while runs of spaces never do.
    pub fn parse(line: &str) -> Self {
        let bytes = line.as_bytes();

        let Some(mut ix) = find_any(bytes, 0) else {
            return Arguments {
                tokens: vec![Token::new(line, 0)],
            };
        };

        let mut tokens = Vec::new();
        let mut quote = (bytes[ix] != SPACE).then_some(bytes[ix]);
        let mut closing = false;
        let mut last = 0;

        loop {
            if ix > last || closing {
                tokens.push(Token::new(&line[last..ix], last));
            }
            last = ix + 1;

            let next = match quote {
                Some(q) => find(bytes, q, last),
                None => find_any(bytes, last),
            };

            let Some(n) = next else {
                if last < line.len() {
                    tokens.push(Token::new(&line[last..], last));
                }
                break;
            };

            ix = n;
            if quote.take().is_some() {
                closing = true;
            } else {
                closing = false;
                if bytes[n] != SPACE {
                    quote = Some(bytes[n]);
                }
            }
        }

        Arguments { tokens }
    }

    /// Build a chain from arguments the host already split.
    ///
    /// Offsets assume the arguments were joined with single spaces.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<Token> = Vec::new();
        for arg in args {
            let offset = tokens.last().map(|t| t.end() + 1).unwrap_or(0);
            tokens.push(Token::new(arg, offset));
        }
        Arguments { tokens }
    }

    /// Cut the chain as if the source line ended at byte `position`.
    ///
    /// Tokens at or after `position` are dropped and a token straddling it is
    /// shortened. When the cursor sits in whitespace past the last token, an empty
    /// token is appended at `position` to stand for the word being typed.
    pub fn trim(&mut self, position: usize) {
        let keep = self
            .tokens
            .iter()
            .take_while(|t| t.end() <= position)
            .count();

        let straddles = self
            .tokens
            .get(keep)
            .is_some_and(|t| t.offset < position);

        if straddles {
            let token = &mut self.tokens[keep];
            let mut cut = position - token.offset;
            while !token.value.is_char_boundary(cut) {
                cut -= 1;
            }
            token.value.truncate(cut);
            self.tokens.truncate(keep + 1);
            return;
        }

        self.tokens.truncate(keep);
        let at_end = self.tokens.last().is_some_and(|t| t.end() == position);
        if !at_end {
            self.tokens.push(Token::new("", position));
        }
    }

    /// Remove the first token with exactly this value
    pub fn remove(&mut self, value: &str) -> bool {
        match self.tokens.iter().position(|t| t.value == value) {
            Some(ix) => {
                self.tokens.remove(ix);
                true
            }
            None => false,
        }
    }

    /// Drop the first `n` tokens
    pub fn skip(&mut self, n: usize) {
        let n = n.min(self.tokens.len());
        self.tokens.drain(..n);
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Token;
    type IntoIter = slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

fn find_any(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|b| DELIMITERS.contains(b))
        .map(|i| i + from)
}

fn find(bytes: &[u8], delimiter: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|b| *b == delimiter)
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Vec<(usize, String)> {
        Arguments::parse(line)
            .iter()
            .map(|t| (t.offset, t.value.clone()))
            .collect()
    }

    #[test]
    fn test_single_word() {
        assert_eq!(parsed("foo"), vec![(0, "foo".to_string())]);
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(
            parsed("  foo  bar   bop "),
            vec![
                (2, "foo".to_string()),
                (7, "bar".to_string()),
                (13, "bop".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_line_is_one_empty_token() {
        assert_eq!(parsed(""), vec![(0, String::new())]);
    }

    #[test]
    fn test_all_whitespace_is_empty() {
        assert!(Arguments::parse("   ").is_empty());
    }

    #[test]
    fn test_rejoin_without_quotes() {
        let line = "alpha  beta gamma   delta";
        let args = Arguments::parse(line);
        assert_eq!(args.len(), line.split_whitespace().count());
        assert_eq!(
            args.values().join(" "),
            line.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(
            parsed("\"a b\" c"),
            vec![(1, "a b".to_string()), (6, "c".to_string())]
        );
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(
            parsed("'a' 'b c'"),
            vec![(1, "a".to_string()), (5, "b c".to_string())]
        );
    }

    #[test]
    fn test_nested_quotes_are_literal() {
        assert_eq!(parsed("\"it's\""), vec![(1, "it's".to_string())]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(
            parsed("foo \"\" bar"),
            vec![
                (0, "foo".to_string()),
                (5, String::new()),
                (7, "bar".to_string())
            ]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            parsed("foo 'bar"),
            vec![(0, "foo".to_string()), (5, "bar".to_string())]
        );
    }

    #[test]
    fn test_from_args_offsets() {
        let args = Arguments::from_args(["E1", "O5", "", "x"]);
        let offsets: Vec<usize> = args.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 3, 6, 7]);
    }

    #[test]
    fn test_trim_mid_token() {
        let mut args = Arguments::parse("foo C3.M3 -d szz");
        args.trim(14);
        assert_eq!(args.values(), vec!["foo", "C3.M3", "-d", "s"]);
    }

    #[test]
    fn test_trim_at_token_start_gives_empty_word() {
        let mut args = Arguments::parse("foo C3.M3 -d szz");
        args.trim(13);
        assert_eq!(args.values(), vec!["foo", "C3.M3", "-d", ""]);
        assert_eq!(args.get(3).unwrap().offset, 13);
    }

    #[test]
    fn test_trim_at_token_end() {
        let mut args = Arguments::parse("foo bar baz");
        args.trim(7);
        assert_eq!(args.values(), vec!["foo", "bar"]);
    }

    #[test]
    fn test_trim_trailing_space() {
        let mut args = Arguments::parse("foo ");
        args.trim(4);
        assert_eq!(args.values(), vec!["foo", ""]);
    }

    #[test]
    fn test_remove() {
        let mut args = Arguments::parse("foo --help bar --help");
        assert!(args.remove("--help"));
        assert_eq!(args.values(), vec!["foo", "bar", "--help"]);
        assert_eq!(args.get(1).map(|t| t.offset), Some(11));
        assert!(!args.remove("--nope"));
    }
}
