use std::io::{self, IsTerminal, Read, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::cli_util;
use crate::jump::build_jump_table;
use crate::token::{check_operands, MissingOperand, Token, TokenKind};

/// Number of cells on the tape; the pointer wraps at both edges.
pub const TAPE_LEN: usize = 65536;

/// Most instructions one run may dispatch. Hitting the limit stops the
/// machine with [`Halt::StepLimit`], which callers report as a warning, not
/// an error.
pub const STEP_LIMIT: usize = 65536;

/// Errors that can occur while running a token sequence.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// A unary token sat at the end of the sequence; caught before dispatch.
    #[error(transparent)]
    MissingOperand(#[from] MissingOperand),

    /// An underlying I/O error occurred while reading an INPUT character.
    #[error("I/O error while reading input: {source}")]
    Input {
        #[source]
        source: std::io::Error,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// An EXIT token was dispatched.
    Exited,
    /// The cursor ran past the end of the token sequence.
    EndOfProgram,
    /// [`STEP_LIMIT`] instructions were dispatched.
    StepLimit,
}

/// The RBF interpreter: a 65,536-cell integer tape, one pointer into it,
/// and a cursor over the token sequence.
///
/// The machine owns its tape; nothing is shared or static, so every run is
/// independent and cheap to construct in tests. PRNT/PRNTN output goes to
/// stdout unless an output sink is installed; INPUT reads from the input
/// provider when one is set, otherwise from stdin (a raw single-keystroke
/// read on a terminal, one buffered character on a pipe).
pub struct TapeMachine {
    tokens: Vec<Token>,
    jump_table: Vec<Option<usize>>,
    tape: Vec<i64>,
    pointer: usize,
    cursor: usize,
    steps_executed: usize,
    // Optional hooks:
    output_sink: Option<Box<dyn Fn(&str) + Send + Sync>>,
    input_provider: Option<Box<dyn Fn() -> Option<char> + Send + Sync>>,
    warned_piped_input: bool,
}

impl TapeMachine {
    /// Create a machine for `tokens`. The jump table is built here, once.
    pub fn new(tokens: Vec<Token>) -> Self {
        let jump_table = build_jump_table(&tokens);
        Self {
            tokens,
            jump_table,
            tape: vec![0; TAPE_LEN],
            pointer: 0,
            cursor: 0,
            steps_executed: 0,
            output_sink: None,
            input_provider: None,
            warned_piped_input: false,
        }
    }

    /// Provide an output sink. When set, PRNT and PRNTN send their text to
    /// this sink instead of stdout.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.output_sink = Some(Box::new(sink));
    }

    /// Provide an input provider. When set, INPUT takes characters from it
    /// instead of stdin. Returning None indicates end of input (the cell is
    /// set to 0).
    pub fn set_input_provider<F>(&mut self, provider: F)
    where
        F: Fn() -> Option<char> + Send + Sync + 'static,
    {
        self.input_provider = Some(Box::new(provider));
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Instructions dispatched so far; EXIT itself is not counted.
    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    /// Value of the cell at `index`, wrapped to the tape length.
    pub fn cell(&self, index: usize) -> i64 {
        self.tape[index % TAPE_LEN]
    }

    /// Value of the cell under the pointer.
    pub fn current_cell(&self) -> i64 {
        self.tape[self.pointer]
    }

    /// Run the token sequence until EXIT, the end of the program, or the
    /// step limit.
    pub fn run(&mut self) -> Result<Halt, MachineError> {
        // Operand arity is validated once here; dispatch below can index
        // `tokens[cursor + 1]` without a lookahead error path.
        check_operands(&self.tokens)?;

        while self.cursor < self.tokens.len() {
            let token = self.tokens[self.cursor];

            match token.kind {
                TokenKind::SetCell => {
                    let operand = self.tokens[self.cursor + 1];
                    // The gate is on the raw operand: SET 0 and SET !0 both
                    // skip the write, while SET !5 of an empty cell 5 writes
                    // a 0.
                    if let Some(raw) = operand.value {
                        if raw != 0 {
                            self.tape[self.pointer] = match operand.kind {
                                TokenKind::Address => self.tape[wrap(raw)],
                                _ => raw,
                            };
                        }
                    }
                }
                TokenKind::MoveRight => {
                    self.pointer = (self.pointer + 1) % TAPE_LEN;
                }
                TokenKind::MoveLeft => {
                    self.pointer = (self.pointer + TAPE_LEN - 1) % TAPE_LEN;
                }
                TokenKind::ResetCell => {
                    let target = self.operand_cell(self.tokens[self.cursor + 1]);
                    self.tape[target] = 0;
                }
                TokenKind::PrintChar => {
                    let value = self.operand_value(self.tokens[self.cursor + 1]);
                    let ch = char::from_u32(value.rem_euclid(0x10FFFF) as u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    let mut buf = [0u8; 4];
                    self.emit(ch.encode_utf8(&mut buf));
                }
                TokenKind::PrintNumber => {
                    let value = self.operand_value(self.tokens[self.cursor + 1]);
                    self.emit(&value.to_string());
                }
                TokenKind::Goto => {
                    let target = self.goto_target(self.tokens[self.cursor + 1]);
                    self.pointer = wrap(target);
                }
                TokenKind::Input => {
                    let target = self.operand_cell(self.tokens[self.cursor + 1]);
                    let ch = self.read_input_char()?;
                    self.tape[target] = match ch {
                        Some(c) => c as i64,
                        None => 0, // end of input
                    };
                }
                TokenKind::PlusOne => {
                    let target = self.operand_cell(self.tokens[self.cursor + 1]);
                    self.tape[target] = self.tape[target].wrapping_add(1);
                }
                TokenKind::MinusOne => {
                    let target = self.operand_cell(self.tokens[self.cursor + 1]);
                    self.tape[target] = self.tape[target].wrapping_sub(1);
                }
                TokenKind::LoopOpen => {
                    if self.tape[self.pointer] == 0 {
                        // An unmatched WHILE has no table entry; execution
                        // falls into the body regardless of the cell value.
                        if let Some(close_index) = self.jump_table[self.cursor] {
                            self.cursor = close_index;
                        }
                    }
                }
                TokenKind::LoopClose => {
                    if self.tape[self.pointer] != 0 {
                        if let Some(open_index) = self.jump_table[self.cursor] {
                            self.cursor = open_index;
                        }
                    }
                }
                TokenKind::Exit => return Ok(Halt::Exited),
                TokenKind::IntLiteral | TokenKind::Address | TokenKind::Separator => {}
            }

            self.steps_executed += 1;
            if self.steps_executed == STEP_LIMIT {
                return Ok(Halt::StepLimit);
            }
            self.cursor += 1;
        }

        Ok(Halt::EndOfProgram)
    }

    /// Cell index a write-style operand addresses. Only a `!N` marker with
    /// non-zero N redirects; everything else targets the pointer's cell.
    fn operand_cell(&self, operand: Token) -> usize {
        match (operand.kind, operand.value) {
            (TokenKind::Address, Some(addr)) if addr != 0 => wrap(addr),
            _ => self.pointer,
        }
    }

    /// Cell value a read-style operand resolves to. PRNT and PRNTN follow
    /// any `!N`, including `!0`; the non-zero gate applies to writes only.
    fn operand_value(&self, operand: Token) -> i64 {
        match (operand.kind, operand.value) {
            (TokenKind::Address, Some(addr)) => self.tape[wrap(addr)],
            _ => self.tape[self.pointer],
        }
    }

    /// Resolve a GOTO operand to a target cell index. Pure: a malformed
    /// operand resolves to 0 and the token stream is left untouched.
    fn goto_target(&self, operand: Token) -> i64 {
        match (operand.kind, operand.value) {
            (TokenKind::IntLiteral, Some(value)) => value,
            (TokenKind::Address, Some(addr)) => self.tape[wrap(addr)],
            _ => 0,
        }
    }

    fn emit(&self, text: &str) {
        if let Some(sink) = self.output_sink.as_ref() {
            (sink)(text);
        } else {
            print!("{text}");
            let _ = io::stdout().flush();
        }
    }

    /// Read one character for INPUT. Provider first; otherwise a raw
    /// single-keystroke read when stdin is a terminal, or one buffered
    /// character when it is not. None means end of input.
    fn read_input_char(&mut self) -> Result<Option<char>, MachineError> {
        if let Some(provider) = self.input_provider.as_ref() {
            return Ok((provider)());
        }

        if io::stdin().is_terminal() {
            return read_key_raw().map(Some);
        }

        if !self.warned_piped_input {
            self.warned_piped_input = true;
            cli_util::warn("stdin is not a terminal; INPUT reads buffered characters");
        }
        read_char_buffered()
    }
}

/// One key press in raw mode, the terminal equivalent of a single-character
/// read. Control keys map to the characters a raw terminal would deliver
/// (Ctrl+C arrives as U+0003, Enter as '\n', Tab as '\t').
fn read_key_raw() -> Result<char, MachineError> {
    enable_raw_mode().map_err(|source| MachineError::Input { source })?;
    let key = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char(ch)
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && ch.is_ascii_alphabetic() =>
                {
                    break Ok((ch.to_ascii_lowercase() as u8 - b'a' + 1) as char);
                }
                KeyCode::Char(ch) => break Ok(ch),
                KeyCode::Enter => break Ok('\n'),
                KeyCode::Tab => break Ok('\t'),
                KeyCode::Backspace => break Ok('\u{8}'),
                KeyCode::Esc => break Ok('\u{1b}'),
                _ => continue,
            },
            Ok(_) => continue,
            Err(source) => break Err(MachineError::Input { source }),
        }
    };
    let _ = disable_raw_mode();
    key
}

/// One character from a non-terminal stdin. Multi-byte UTF-8 sequences are
/// assembled from their leading byte; malformed input decodes to U+FFFD.
fn read_char_buffered() -> Result<Option<char>, MachineError> {
    let mut first = [0u8; 1];
    let n = io::stdin()
        .read(&mut first)
        .map_err(|source| MachineError::Input { source })?;
    if n == 0 {
        return Ok(None);
    }

    let width = utf8_width(first[0]);
    let mut buf = [0u8; 4];
    buf[0] = first[0];
    let mut filled = 1;
    while filled < width {
        let n = io::stdin()
            .read(&mut buf[filled..width])
            .map_err(|source| MachineError::Input { source })?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    match std::str::from_utf8(&buf[..filled]) {
        Ok(text) => Ok(text.chars().next()),
        Err(_) => Ok(Some(char::REPLACEMENT_CHARACTER)),
    }
}

fn utf8_width(byte: u8) -> usize {
    match byte {
        b if b & 0x80 == 0 => 1,
        b if b & 0xE0 == 0xC0 => 2,
        b if b & 0xF0 == 0xE0 => 3,
        b if b & 0xF8 == 0xF0 => 4,
        _ => 1,
    }
}

fn wrap(value: i64) -> usize {
    value.rem_euclid(TAPE_LEN as i64) as usize
}
