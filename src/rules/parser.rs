use std::collections::HashMap;

use super::error::{ParseError, ParseErrorKind};
use super::scanner::Scanner;
use super::set::{CharClass, resolve_property};
use super::{RuleList, RuleOptions};
use crate::segmenter::RuleStatus;

/// Deepest nesting of groups and sets the parser accepts.
const MAX_DEPTH: usize = 256;

type Result<T> = std::result::Result<T, ParseError>;

/// A rule expression after variables have been substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Node {
    Class(CharClass),
    Concat(Vec<Node>),
    Alt(Vec<Node>),
    Star(Box<Node>),
    Plus(Box<Node>),
    Optional(Box<Node>),
    /// `/`, where the boundary goes when the rule matches.
    Mark,
}

impl Node {
    fn sequence(mut items: Vec<Node>) -> Self {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Self::Concat(items)
        }
    }
}

#[derive(Debug)]
pub(super) struct ParsedRule {
    pub node: Node,
    pub tag: RuleStatus,
    /// The rule started with `^` and so never continues a chain.
    pub no_chain_in: bool,
}

#[derive(Debug, Default)]
pub(super) struct ParsedRules {
    pub forward: Vec<ParsedRule>,
    pub reverse: Vec<ParsedRule>,
    pub safe_forward: Vec<ParsedRule>,
    pub safe_reverse: Vec<ParsedRule>,
    pub options: RuleOptions,
}

pub(super) struct Parser {
    scanner: Scanner,
    variables: HashMap<String, Node>,
    rules: ParsedRules,
    target: RuleList,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            variables: HashMap::new(),
            rules: ParsedRules::default(),
            target: RuleList::Forward,
        }
    }

    pub fn parse(mut self) -> Result<ParsedRules> {
        loop {
            self.scanner.skip_trivia();
            match (self.scanner.peek(), self.scanner.peek_nth(1)) {
                (None, _) => return Ok(self.rules),
                (Some('!'), Some('!')) => self.option()?,
                (Some('$'), _) if self.at_assignment() => self.assignment()?,
                (Some('!'), _) => {
                    self.scanner.bump();
                    let rule = self.rule()?;
                    self.rules.reverse.push(rule);
                }
                _ => {
                    let rule = self.rule()?;
                    let list = match self.target {
                        RuleList::Forward => &mut self.rules.forward,
                        RuleList::Reverse => &mut self.rules.reverse,
                        RuleList::SafeForward => &mut self.rules.safe_forward,
                        RuleList::SafeReverse => &mut self.rules.safe_reverse,
                    };
                    list.push(rule);
                }
            }
        }
    }

    fn error(&self, kind: ParseErrorKind, at: usize) -> ParseError {
        self.scanner.error(kind, at)
    }

    fn expect_semicolon(&mut self) -> Result<()> {
        self.scanner.skip_trivia();
        if self.scanner.eat(';') {
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::SemicolonExpected, self.scanner.pos()))
        }
    }

    fn option(&mut self) -> Result<()> {
        self.scanner.bump();
        self.scanner.bump();
        self.scanner.skip_whitespace();
        let at = self.scanner.pos();
        let name = self.scanner.consume_while(is_name_char);
        let options = &mut self.rules.options;
        match name.as_str() {
            "" => return Err(self.error(ParseErrorKind::RuleSyntax, at)),
            "chain" => options.chain = true,
            "lookAheadHardBreak" => options.lookahead_hard_break = true,
            "LBCMNoChain" => options.lb_cm_no_chain = true,
            "quoted_literals_only" => options.quoted_literals_only = true,
            "forward" => self.target = RuleList::Forward,
            "reverse" => self.target = RuleList::Reverse,
            "safe_forward" => self.target = RuleList::SafeForward,
            "safe_reverse" => self.target = RuleList::SafeReverse,
            _ => return Err(self.error(ParseErrorKind::UnrecognizedOption, at)),
        }
        self.expect_semicolon()
    }

    /// Peeks past `$name` for the `=` that makes a statement an assignment.
    fn at_assignment(&mut self) -> bool {
        let start = self.scanner.pos();
        self.scanner.bump();
        self.scanner.consume_while(is_name_char);
        self.scanner.skip_trivia();
        let assignment = self.scanner.peek() == Some('=');
        self.scanner.reset(start);
        assignment
    }

    fn assignment(&mut self) -> Result<()> {
        let at = self.scanner.pos();
        self.scanner.bump();
        let name = self.scanner.consume_while(is_name_char);
        self.scanner.skip_trivia();
        self.scanner.bump();
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::AssignError, at));
        }
        if self.variables.contains_key(&name) {
            return Err(self.error(ParseErrorKind::VariableRedefinition, at));
        }

        self.scanner.skip_trivia();
        let body_at = self.scanner.pos();
        let body = self.alternation(0)?;
        self.scanner.skip_trivia();
        match self.scanner.peek() {
            Some(')') => {
                return Err(self.error(ParseErrorKind::MismatchedParentheses, self.scanner.pos()));
            }
            Some('{') => return Err(self.error(ParseErrorKind::AssignError, self.scanner.pos())),
            _ => {}
        }
        let Some(body) = body else {
            return Err(self.error(ParseErrorKind::AssignError, body_at));
        };
        self.expect_semicolon()?;
        self.variables.insert(name, body);
        Ok(())
    }

    fn rule(&mut self) -> Result<ParsedRule> {
        self.scanner.skip_trivia();
        let start = self.scanner.pos();
        let no_chain_in = self.scanner.eat('^');
        let node = self.alternation(0)?;
        self.scanner.skip_trivia();
        if self.scanner.peek() == Some(')') {
            return Err(self.error(ParseErrorKind::MismatchedParentheses, self.scanner.pos()));
        }
        let Some(node) = node else {
            return Err(self.error(ParseErrorKind::RuleSyntax, start));
        };
        let tag = match self.scanner.peek() {
            Some('{') => self.tag()?,
            _ => 0,
        };
        self.expect_semicolon()?;
        Ok(ParsedRule {
            node,
            tag,
            no_chain_in,
        })
    }

    fn tag(&mut self) -> Result<RuleStatus> {
        let at = self.scanner.pos();
        self.scanner.bump();
        self.scanner.skip_whitespace();
        let digits = self.scanner.consume_while(|c| c.is_ascii_digit());
        self.scanner.skip_whitespace();
        if digits.is_empty() || !self.scanner.eat('}') {
            return Err(self.error(ParseErrorKind::MalformedRuleTag, at));
        }
        digits
            .parse()
            .map_err(|_| self.error(ParseErrorKind::MalformedRuleTag, at))
    }

    /// Parses `a | b | ...`. Returns `None` when there is nothing at all
    /// before the end of the expression.
    fn alternation(&mut self, depth: usize) -> Result<Option<Node>> {
        let mut branches = Vec::new();
        loop {
            let items = self.sequence(depth)?;
            self.scanner.skip_trivia();
            let bar = self.scanner.pos();
            let more = self.scanner.eat('|');
            if items.is_empty() && (more || !branches.is_empty()) {
                return Err(self.error(ParseErrorKind::RuleSyntax, bar));
            }
            branches.push(items);
            if !more {
                break;
            }
        }
        if branches.len() == 1 {
            let items = branches.remove(0);
            return Ok((!items.is_empty()).then(|| Node::sequence(items)));
        }
        Ok(Some(Node::Alt(branches.into_iter().map(Node::sequence).collect())))
    }

    fn sequence(&mut self, depth: usize) -> Result<Vec<Node>> {
        let mut items: Vec<Node> = Vec::new();
        loop {
            self.scanner.skip_trivia();
            let at = self.scanner.pos();
            let Some(c) = self.scanner.peek() else {
                break;
            };
            match c {
                ';' | '{' | '|' | ')' => break,
                '(' => {
                    if depth >= MAX_DEPTH {
                        return Err(self.error(ParseErrorKind::InternalError, at));
                    }
                    self.scanner.bump();
                    let inner = self.alternation(depth + 1)?;
                    self.scanner.skip_trivia();
                    if !self.scanner.eat(')') {
                        return Err(self.error(ParseErrorKind::MismatchedParentheses, at));
                    }
                    let Some(inner) = inner else {
                        return Err(self.error(ParseErrorKind::RuleSyntax, at));
                    };
                    items.push(inner);
                }
                '*' | '+' | '?' => {
                    self.scanner.bump();
                    let operand = match items.pop() {
                        Some(Node::Mark) | None => {
                            return Err(self.error(ParseErrorKind::RuleSyntax, at));
                        }
                        Some(node) => Box::new(node),
                    };
                    items.push(match c {
                        '*' => Node::Star(operand),
                        '+' => Node::Plus(operand),
                        _ => Node::Optional(operand),
                    });
                }
                '/' => {
                    self.scanner.bump();
                    items.push(Node::Mark);
                }
                '.' => {
                    self.scanner.bump();
                    items.push(Node::Class(CharClass::Any));
                }
                '[' => items.push(Node::Class(self.set(depth)?)),
                '\\' if matches!(self.scanner.peek_nth(1), Some('p' | 'P')) => {
                    items.push(Node::Class(self.property()?));
                }
                '\\' => items.push(Node::Class(CharClass::literal(self.escape()?))),
                '\'' => {
                    let literal = self.quoted()?;
                    items.push(Node::sequence(
                        literal
                            .into_iter()
                            .map(|c| Node::Class(CharClass::literal(c)))
                            .collect(),
                    ));
                }
                '$' => items.push(self.variable()?),
                '=' => return Err(self.error(ParseErrorKind::AssignError, at)),
                '^' | '}' | ']' => return Err(self.error(ParseErrorKind::RuleSyntax, at)),
                _ => {
                    if self.rules.options.quoted_literals_only {
                        return Err(self.error(ParseErrorKind::RuleSyntax, at));
                    }
                    self.scanner.bump();
                    items.push(Node::Class(CharClass::literal(c)));
                }
            }
        }
        Ok(items)
    }

    fn variable(&mut self) -> Result<Node> {
        let at = self.scanner.pos();
        self.scanner.bump();
        let name = self.scanner.consume_while(is_name_char);
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::RuleSyntax, at));
        }
        self.variables
            .get(&name)
            .cloned()
            .ok_or_else(|| self.error(ParseErrorKind::UndefinedVariable, at))
    }

    /// `'...'`, with `''` standing for a single quote both inside and
    /// outside a quoted run.
    fn quoted(&mut self) -> Result<Vec<char>> {
        let at = self.scanner.pos();
        self.scanner.bump();
        if self.scanner.eat('\'') {
            return Ok(vec!['\'']);
        }
        let mut literal = Vec::new();
        loop {
            let here = self.scanner.pos();
            match self.scanner.bump() {
                None => return Err(self.error(ParseErrorKind::RuleSyntax, at)),
                Some('\n' | '\r') => {
                    return Err(self.error(ParseErrorKind::NewLineInQuotedString, here));
                }
                Some('\'') if self.scanner.eat('\'') => literal.push('\''),
                Some('\'') => return Ok(literal),
                Some(c) => literal.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char> {
        let at = self.scanner.pos();
        self.scanner.bump();
        let Some(c) = self.scanner.bump() else {
            return Err(self.error(ParseErrorKind::RuleSyntax, at));
        };
        Ok(match c {
            'u' => self.hex(at, 4, 4)?,
            'U' => self.hex(at, 8, 8)?,
            'x' if self.scanner.eat('{') => {
                let c = self.hex(at, 1, 6)?;
                if !self.scanner.eat('}') {
                    return Err(self.error(ParseErrorKind::HexDigitsExpected, at));
                }
                c
            }
            'x' => self.hex(at, 2, 2)?,
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'f' => '\u{c}',
            other => other,
        })
    }

    fn hex(&mut self, at: usize, min: usize, max: usize) -> Result<char> {
        let mut digits = String::new();
        while digits.len() < max {
            match self.scanner.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.scanner.bump();
                    digits.push(c);
                }
                _ => break,
            }
        }
        if digits.len() < min {
            return Err(self.error(ParseErrorKind::HexDigitsExpected, at));
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(ParseErrorKind::HexDigitsExpected, at))
    }

    /// `\p{...}`, `\P{...}`, or the single-letter forms `\pL` and `\PL`.
    fn property(&mut self) -> Result<CharClass> {
        let at = self.scanner.pos();
        self.scanner.bump();
        let negated = self.scanner.bump() == Some('P');
        let name = if self.scanner.eat('{') {
            let name = self.scanner.consume_while(|c| c != '}');
            if !self.scanner.eat('}') {
                return Err(self.error(ParseErrorKind::UnclosedSet, at));
            }
            name
        } else {
            match self.scanner.bump() {
                Some(c) => c.to_string(),
                None => return Err(self.error(ParseErrorKind::RuleSyntax, at)),
            }
        };
        let class = resolve_property(name.trim())
            .ok_or_else(|| self.error(ParseErrorKind::RuleSyntax, at))?;
        Ok(if negated {
            CharClass::Not(Box::new(class))
        } else {
            class
        })
    }

    fn set(&mut self, depth: usize) -> Result<CharClass> {
        let open = self.scanner.pos();
        if depth >= MAX_DEPTH {
            return Err(self.error(ParseErrorKind::InternalError, open));
        }
        if self.scanner.peek_nth(1) == Some(':') {
            return self.posix_set();
        }
        self.scanner.bump();
        let negated = self.scanner.eat('^');
        let mut members = Vec::new();
        let mut after_set = false;
        loop {
            self.scanner.skip_whitespace();
            let Some(c) = self.scanner.peek() else {
                return Err(self.error(ParseErrorKind::UnclosedSet, open));
            };
            match c {
                ']' => {
                    self.scanner.bump();
                    break;
                }
                '[' | '$' => {
                    members.push(self.set_operand(depth)?);
                    after_set = true;
                }
                '\\' if matches!(self.scanner.peek_nth(1), Some('p' | 'P')) => {
                    members.push(self.property()?);
                    after_set = true;
                }
                '-' | '&' if after_set && self.operand_follows() => {
                    self.scanner.bump();
                    self.scanner.skip_whitespace();
                    let rhs = Box::new(self.set_operand(depth)?);
                    let lhs = Box::new(CharClass::union(std::mem::take(&mut members)));
                    members.push(match c {
                        '-' => CharClass::Difference(lhs, rhs),
                        _ => CharClass::Intersection(lhs, rhs),
                    });
                }
                _ => {
                    let lo = self.set_char(open)?;
                    self.scanner.skip_whitespace();
                    let range = self.scanner.peek() == Some('-')
                        && !matches!(self.scanner.peek_nth(1), Some(']' | '[') | None);
                    if range {
                        self.scanner.bump();
                        self.scanner.skip_whitespace();
                        let hi_at = self.scanner.pos();
                        let hi = self.set_char(open)?;
                        if hi < lo {
                            return Err(self.error(ParseErrorKind::RuleSyntax, hi_at));
                        }
                        members.push(CharClass::range(lo, hi));
                    } else {
                        members.push(CharClass::literal(lo));
                    }
                    after_set = false;
                }
            }
        }
        if members.is_empty() {
            return Err(self.error(ParseErrorKind::RuleEmptySet, open));
        }
        let class = CharClass::union(members);
        Ok(if negated {
            CharClass::Not(Box::new(class))
        } else {
            class
        })
    }

    fn operand_follows(&self) -> bool {
        match self.scanner.peek_nth(1) {
            Some('[' | '$') => true,
            Some('\\') => matches!(self.scanner.peek_nth(2), Some('p' | 'P')),
            _ => false,
        }
    }

    /// A nested set, a property, or a set-valued variable.
    fn set_operand(&mut self, depth: usize) -> Result<CharClass> {
        let at = self.scanner.pos();
        match self.scanner.peek() {
            Some('[') => self.set(depth + 1),
            Some('\\') => self.property(),
            Some('$') => match self.variable()? {
                Node::Class(class) => Ok(class),
                _ => Err(self.error(ParseErrorKind::RuleSyntax, at)),
            },
            _ => Err(self.error(ParseErrorKind::RuleSyntax, at)),
        }
    }

    fn set_char(&mut self, open: usize) -> Result<char> {
        let at = self.scanner.pos();
        match self.scanner.peek() {
            None => Err(self.error(ParseErrorKind::UnclosedSet, open)),
            Some('\\') if matches!(self.scanner.peek_nth(1), Some('p' | 'P')) => {
                Err(self.error(ParseErrorKind::RuleSyntax, at))
            }
            Some('\\') => self.escape(),
            Some(c) => {
                self.scanner.bump();
                Ok(c)
            }
        }
    }

    /// `[:name:]` or `[:^name:]`.
    fn posix_set(&mut self) -> Result<CharClass> {
        let open = self.scanner.pos();
        self.scanner.bump();
        self.scanner.bump();
        let negated = self.scanner.eat('^');
        let mut name = String::new();
        loop {
            match self.scanner.bump() {
                None => return Err(self.error(ParseErrorKind::UnclosedSet, open)),
                Some(':') if self.scanner.eat(']') => break,
                Some(c) => name.push(c),
            }
        }
        let class = resolve_property(name.trim())
            .ok_or_else(|| self.error(ParseErrorKind::RuleSyntax, open))?;
        Ok(if negated {
            CharClass::Not(Box::new(class))
        } else {
            class
        })
    }
}
