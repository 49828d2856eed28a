use std::fmt;

/// The kinds of tokens RBF source lexes into.
///
/// Keyword kinds carry no value; `IntLiteral` and `Address` carry the parsed
/// integer. `Separator` is inert and exists only because the source had a
/// `;` or newline there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `SET`: write a value into the current cell.
    SetCell,
    /// `CLS`: zero the current or an addressed cell.
    ResetCell,
    /// `PRNT`: print a cell's value as a code point.
    PrintChar,
    /// `PRNTN`: print a cell's value as a decimal integer.
    PrintNumber,
    /// `EXIT`: stop the run; also appended implicitly by the lexer.
    Exit,
    /// `MOVR`: move the pointer right, wrapping at the tape edge.
    MoveRight,
    /// `MOVL`: move the pointer left, wrapping at the tape edge.
    MoveLeft,
    /// `GOTO`: move the pointer to an absolute cell.
    Goto,
    /// `INPUT`: read one character into a cell.
    Input,
    /// `WHILE`: loop entry; skips to the matching `END` when the cell is 0.
    LoopOpen,
    /// `END`: loop exit; jumps back to the matching `WHILE` when non-zero.
    LoopClose,
    /// `ADD`: increment a cell by one.
    PlusOne,
    /// `SUB`: decrement a cell by one.
    MinusOne,
    /// A bare integer, operand to the keyword before it.
    IntLiteral,
    /// `!N`: names tape cell N directly instead of the pointer.
    Address,
    /// `;` or newline.
    Separator,
}

impl TokenKind {
    /// Whether this kind reads one token ahead as an operand when dispatched.
    ///
    /// The arity is 0 or 1 for every kind; there are no multi-operand forms.
    pub fn takes_operand(self) -> bool {
        matches!(
            self,
            TokenKind::SetCell
                | TokenKind::ResetCell
                | TokenKind::PrintChar
                | TokenKind::PrintNumber
                | TokenKind::Goto
                | TokenKind::Input
                | TokenKind::PlusOne
                | TokenKind::MinusOne
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::SetCell => "SET",
            TokenKind::ResetCell => "CLS",
            TokenKind::PrintChar => "PRNT",
            TokenKind::PrintNumber => "PRNTN",
            TokenKind::Exit => "EXIT",
            TokenKind::MoveRight => "MOVR",
            TokenKind::MoveLeft => "MOVL",
            TokenKind::Goto => "GOTO",
            TokenKind::Input => "INPUT",
            TokenKind::LoopOpen => "WHILE",
            TokenKind::LoopClose => "END",
            TokenKind::PlusOne => "ADD",
            TokenKind::MinusOne => "SUB",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::Address => "'!' address",
            TokenKind::Separator => "separator",
        };
        write!(f, "{name}")
    }
}

/// Look up the token kind for a keyword, case-insensitively.
///
/// Words that are not keywords have no kind; the lexer drops them without a
/// diagnostic.
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    match word.to_ascii_uppercase().as_str() {
        "SET" => Some(TokenKind::SetCell),
        "CLS" => Some(TokenKind::ResetCell),
        "PRNT" => Some(TokenKind::PrintChar),
        "PRNTN" => Some(TokenKind::PrintNumber),
        "EXIT" => Some(TokenKind::Exit),
        "MOVR" => Some(TokenKind::MoveRight),
        "MOVL" => Some(TokenKind::MoveLeft),
        "GOTO" => Some(TokenKind::Goto),
        "INPUT" => Some(TokenKind::Input),
        "WHILE" => Some(TokenKind::LoopOpen),
        "END" => Some(TokenKind::LoopClose),
        "ADD" => Some(TokenKind::PlusOne),
        "SUB" => Some(TokenKind::MinusOne),
        _ => None,
    }
}

/// A single program element. Immutable once produced; both back ends consume
/// the token sequence as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<i64>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, value: None }
    }

    pub fn with_value(kind: TokenKind, value: i64) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }
}

/// A token that peeks one ahead sits at the very end of the sequence.
#[derive(Debug, thiserror::Error)]
#[error("{kind} at token {index} expects an operand but the program ends there")]
pub struct MissingOperand {
    pub index: usize,
    pub kind: TokenKind,
}

/// Validate operand arity for the whole sequence up front, so dispatch can
/// index `tokens[i + 1]` without a runtime lookahead error path.
///
/// Sequences produced by [`tokenize`](crate::tokenize) always pass: the lexer
/// appends an EXIT token, so every lookahead lands on something. Hand-built
/// sequences can fail.
pub fn check_operands(tokens: &[Token]) -> Result<(), MissingOperand> {
    for (index, token) in tokens.iter().enumerate() {
        if token.kind.takes_operand() && index + 1 == tokens.len() {
            return Err(MissingOperand {
                index,
                kind: token.kind,
            });
        }
    }
    Ok(())
}
