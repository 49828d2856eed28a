//! A readable-Brainfuck (RBF) interpreter and transpiler library.
//!
//! RBF swaps Brainfuck's eight symbols for a small keyword language
//! (`SET`, `ADD`, `MOVR`, `WHILE`, ...) over the same kind of machine: a
//! zero-initialized memory tape with a single data pointer.
//!
//! Features and behaviors:
//! - 65,536 signed 64-bit cells; the pointer wraps at both edges.
//! - Statements separated by `;` or newlines; `#` opens a comment.
//! - `!N` markers address cell N directly from anywhere on the tape.
//! - `INPUT` reads one character; on end of input the cell is set to 0.
//! - `WHILE`/`END` loops nest; an unmatched `END` falls through silently.
//! - Runs stop after 65,536 instructions, reported as [`Halt::StepLimit`].
//! - [`Transpiler`] lowers a token sequence to classic 8-symbol Brainfuck,
//!   with pointer bound checks against the 30,000-cell target tape.
//!
//! Quick start:
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use rbf::{tokenize, Halt, TapeMachine};
//!
//! let tokens = tokenize("SET 72;PRNT;SET 105;PRNT");
//! let mut machine = TapeMachine::new(tokens);
//!
//! // Capture output instead of writing to stdout.
//! let output = Arc::new(Mutex::new(String::new()));
//! let sink = Arc::clone(&output);
//! machine.set_output_sink(move |text| sink.lock().unwrap().push_str(text));
//!
//! let halt = machine.run().unwrap();
//! assert_eq!(halt, Halt::Exited);
//! assert_eq!(*output.lock().unwrap(), "Hi");
//! ```

pub mod cli_util;
mod jump;
mod lexer;
mod machine;
mod token;
mod transpile;

pub use jump::build_jump_table;
pub use lexer::tokenize;
pub use machine::{Halt, MachineError, TapeMachine, STEP_LIMIT, TAPE_LEN};
pub use token::{check_operands, keyword_kind, MissingOperand, Token, TokenKind};
pub use transpile::{TranspileError, Transpiler, TARGET_TAPE_LEN};
