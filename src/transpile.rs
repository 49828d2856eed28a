use crate::token::{check_operands, MissingOperand, Token, TokenKind};

/// Cell count of the classic Brainfuck tape the emitted code targets.
pub const TARGET_TAPE_LEN: usize = 30000;

/// Errors that abort a lowering.
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    /// A unary token sat at the end of the sequence; caught before lowering.
    #[error(transparent)]
    MissingOperand(#[from] MissingOperand),

    /// The simulated pointer left the target tape on the right.
    #[error(
        "tape overrun at token {index}: cell {offset} is past the {len}-cell target tape",
        len = TARGET_TAPE_LEN
    )]
    TapeOverrun { index: usize, offset: i64 },

    /// The simulated pointer left the target tape on the left.
    #[error("tape underrun at token {index}: cell {offset} is before cell 0")]
    TapeUnderrun { index: usize, offset: i64 },
}

/// Lowers a token sequence to classic 8-symbol Brainfuck.
///
/// The transpiler runs nothing; it tracks one piece of state, the simulated
/// pointer offset, and checks it against the 30,000-cell target tape after
/// every token. RBF forms with no Brainfuck equivalent (addressed operands,
/// PRNTN) are skipped with a non-fatal note, readable afterwards through
/// [`diagnostics`](Transpiler::diagnostics).
pub struct Transpiler {
    tokens: Vec<Token>,
    offset: i64,
    diagnostics: Vec<String>,
}

impl Transpiler {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            offset: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Lower the whole sequence, or fail on the first tape-bound violation.
    pub fn lower(&mut self) -> Result<String, TranspileError> {
        check_operands(&self.tokens)?;

        let mut output = String::new();
        let mut index = 0;

        while index < self.tokens.len() {
            let token = self.tokens[index];

            match token.kind {
                TokenKind::SetCell => {
                    let operand = self.tokens[index + 1];
                    match operand.kind {
                        TokenKind::IntLiteral => {
                            // Clear, then count up to the value modulo the
                            // target's 8-bit cells. SET 0 still emits the
                            // clear; the interpreter's skip does not apply
                            // here.
                            output.push_str("[-]");
                            let increments = operand.value.unwrap_or(0).rem_euclid(256) as usize;
                            output.push_str(&"+".repeat(increments));
                        }
                        TokenKind::Address => self.skip_note(index, "SET with a '!' address"),
                        _ => {}
                    }
                }
                TokenKind::MoveRight => {
                    output.push('>');
                    self.offset += 1;
                }
                TokenKind::MoveLeft => {
                    output.push('<');
                    self.offset -= 1;
                }
                TokenKind::ResetCell => {
                    if self.tokens[index + 1].kind == TokenKind::Address {
                        self.skip_note(index, "CLS with a '!' address");
                    } else {
                        output.push_str("[-]");
                    }
                }
                TokenKind::PrintChar => {
                    if self.tokens[index + 1].kind == TokenKind::Address {
                        self.skip_note(index, "PRNT with a '!' address");
                    } else {
                        output.push('.');
                    }
                }
                TokenKind::PrintNumber => {
                    self.skip_note(index, "PRNTN");
                }
                TokenKind::Goto => {
                    let operand = self.tokens[index + 1];
                    match operand.kind {
                        TokenKind::IntLiteral => {
                            let target = operand.value.unwrap_or(0);
                            // Bounds before emission; a wild target must not
                            // materialize its move run first.
                            if target < 0 {
                                return Err(TranspileError::TapeUnderrun {
                                    index,
                                    offset: target,
                                });
                            }
                            if target >= TARGET_TAPE_LEN as i64 {
                                return Err(TranspileError::TapeOverrun {
                                    index,
                                    offset: target,
                                });
                            }
                            if target >= self.offset {
                                output.push_str(&">".repeat((target - self.offset) as usize));
                            } else {
                                output.push_str(&"<".repeat((self.offset - target) as usize));
                            }
                            self.offset = target;
                        }
                        TokenKind::Address => self.skip_note(index, "GOTO with a '!' address"),
                        _ => {}
                    }
                }
                TokenKind::Input => {
                    if self.tokens[index + 1].kind == TokenKind::Address {
                        self.skip_note(index, "INPUT with a '!' address");
                    } else {
                        output.push(',');
                    }
                }
                TokenKind::PlusOne => {
                    if self.tokens[index + 1].kind == TokenKind::Address {
                        self.skip_note(index, "ADD with a '!' address");
                    } else {
                        output.push('+');
                    }
                }
                TokenKind::MinusOne => {
                    if self.tokens[index + 1].kind == TokenKind::Address {
                        self.skip_note(index, "SUB with a '!' address");
                    } else {
                        output.push('-');
                    }
                }
                TokenKind::LoopOpen => output.push('['),
                TokenKind::LoopClose => output.push(']'),
                // EXIT has no Brainfuck form; the lowered program simply
                // runs to its end.
                TokenKind::Exit
                | TokenKind::IntLiteral
                | TokenKind::Address
                | TokenKind::Separator => {}
            }

            if self.offset < 0 {
                return Err(TranspileError::TapeUnderrun {
                    index,
                    offset: self.offset,
                });
            }
            if self.offset >= TARGET_TAPE_LEN as i64 {
                return Err(TranspileError::TapeOverrun {
                    index,
                    offset: self.offset,
                });
            }

            index += 1;
        }

        Ok(output)
    }

    /// Non-fatal notes accumulated by [`lower`](Transpiler::lower).
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    fn skip_note(&mut self, index: usize, what: &str) {
        self.diagnostics
            .push(format!("{what} has no Brainfuck equivalent; skipped (token {index})"));
    }
}
