// WHY: each alternative is compiled as its own anchored regex so that the scanner can
// pick the longest match at a position instead of the first alternative that fits

use anyhow::{Context, Result};
use regex_automata::{meta::Regex, Anchored, Input};

/// Grammar alternative that produced a token, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// `https://lang.org.ua/uk/`
    Url,
    /// `info@lang.org.ua`
    Email,
    /// `20-річний`
    NumericCompound,
    /// `+15,5`, `12.5`, `100-200`
    Number,
    /// `м’яко`, `науково-реферативного`, `Геогра́фія`
    Word,
    /// `В.І.`, `т.д.`, `В.І.Перебийніс`
    Initials,
    /// A single quote, bracket, dash or other symbol
    Symbol,
    /// `.`, `...`, `?!`
    SentenceEnd,
    /// `-`, `--`
    Dash,
}

impl TokenKind {
    pub const ALL: [TokenKind; 9] = [
        TokenKind::Url,
        TokenKind::Email,
        TokenKind::NumericCompound,
        TokenKind::Number,
        TokenKind::Word,
        TokenKind::Initials,
        TokenKind::Symbol,
        TokenKind::SentenceEnd,
        TokenKind::Dash,
    ];

    /// Pattern source for this alternative; `\w` already includes combining marks
    pub fn pattern(self) -> &'static str {
        match self {
            TokenKind::Url => r"[\w\p{M}]+://[a-zA-Z0-9$-_@.&+]+",
            TokenKind::Email => r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+",
            TokenKind::NumericCompound => r"[0-9]+-[а-яА-ЯіїєґІЇЄҐ'’`\p{M}]+",
            TokenKind::Number => r"[+\-]?[0-9](?:[0-9,.\-]*[0-9])?",
            TokenKind::Word => r"[\w\p{M}](?:[\w\p{M}'’`\-]?[\w\p{M}]+)*",
            TokenKind::Initials => r"[\w\p{M}]\.(?:[\w\p{M}]\.)+[\w\p{M}]*",
            TokenKind::Symbol => {
                r#"["'«»“”‘’„‚‹›()\[\]{}⟨⟩#$%&*+,/:;<=>@^`~…|№‒–—―]"#
            }
            TokenKind::SentenceEnd => r"[.!?]+",
            TokenKind::Dash => r"-+",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Url => "url",
            TokenKind::Email => "email",
            TokenKind::NumericCompound => "numeric_compound",
            TokenKind::Number => "number",
            TokenKind::Word => "word",
            TokenKind::Initials => "initials",
            TokenKind::Symbol => "symbol",
            TokenKind::SentenceEnd => "sentence_end",
            TokenKind::Dash => "dash",
        }
    }
}

/// One compiled grammar alternative
#[derive(Debug)]
pub struct Rule {
    pub kind: TokenKind,
    regex: Regex,
}

impl Rule {
    pub fn compile(kind: TokenKind) -> Result<Self> {
        let regex = Regex::new(kind.pattern())
            .with_context(|| format!("Failed to compile {} rule", kind.name()))?;
        Ok(Self { kind, regex })
    }

    /// Length in bytes of the match anchored at `pos`, if any
    pub fn match_len_at(&self, haystack: &str, pos: usize) -> Option<usize> {
        let input = Input::new(haystack)
            .range(pos..)
            .anchored(Anchored::Yes);
        self.regex
            .search(&input)
            .map(|m| m.len())
            .filter(|&len| len > 0)
    }
}

/// The full ordered grammar
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    pub fn compile() -> Result<Self> {
        let rules = TokenKind::ALL
            .iter()
            .map(|&kind| Rule::compile(kind))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Longest match at `pos`; ties go to the earlier alternative
    pub fn longest_match_at(&self, haystack: &str, pos: usize) -> Option<(TokenKind, usize)> {
        let mut best: Option<(TokenKind, usize)> = None;
        for rule in &self.rules {
            if let Some(len) = rule.match_len_at(haystack, pos) {
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((rule.kind, len));
                }
            }
        }
        best
    }
}
