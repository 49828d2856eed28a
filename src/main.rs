use clap::Parser;
use rbf::cli_util;
use rbf::{tokenize, Halt, TapeMachine, Token, Transpiler, STEP_LIMIT};
use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} <FILE>             # Run an RBF program from FILE
  {0} --compile <FILE>   # Lower an RBF program to classic Brainfuck
  {0} < program.rbf      # Run an RBF program piped on stdin

Options:
  --compile     Print the Brainfuck lowering of the program instead of running it
  --help, -h    Show this help

Notes:
- Statements are separated by ';' or newlines; '#' opens a comment.
- Keywords: SET CLS PRNT PRNTN EXIT MOVR MOVL GOTO INPUT WHILE END ADD SUB.
- '!N' addresses cell N directly, e.g. 'ADD !5' increments cell 5.
- INPUT reads one character; at end of input the cell is set to 0.
- Runs stop with a warning after 65536 instructions.

Examples:
- Run a program from a file:
    {0} demos/countdown.rbf
- Lower a program to Brainfuck:
    {0} --compile demos/hello.rbf
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "rbf", disable_help_flag = true)]
struct Cli {
    /// Print the Brainfuck lowering of the program instead of running it
    #[arg(long = "compile")]
    compile: bool,

    /// Path to an RBF program; read from stdin when omitted
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn run_program(program: &str, tokens: Vec<Token>) -> i32 {
    let mut machine = TapeMachine::new(tokens);
    match machine.run() {
        Ok(halt) => {
            // For readability, ensure output ends with a newline
            println!();
            let _ = io::stdout().flush();
            if halt == Halt::StepLimit {
                cli_util::warn(&format!("stopped after {STEP_LIMIT} instructions"));
            }
            0
        }
        Err(err) => {
            cli_util::report(program, &err.to_string());
            1
        }
    }
}

fn run_compile(program: &str, tokens: Vec<Token>) -> i32 {
    let mut transpiler = Transpiler::new(tokens);
    let result = transpiler.lower();
    for note in transpiler.diagnostics() {
        cli_util::warn(note);
    }
    match result {
        Ok(code) => {
            println!("Compiled BF: {code}");
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            cli_util::report(program, &err.to_string());
            1
        }
    }
}

fn main() {
    // Program name as invoked, for help and error prefixes.
    let program = env::args().next().unwrap_or_else(|| String::from("rbf"));

    let cli = Cli::parse();

    if cli.help {
        usage_and_exit(&program, 0);
    }

    // Install SIGINT (ctrl+c) handler to flush and exit(0) immediately;
    // INPUT may have put the terminal into raw mode.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        std::process::exit(1);
    }

    let source = match cli.file {
        Some(path) => match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                cli_util::report(&program, &format!("failed to read {path}: {e}"));
                std::process::exit(1);
            }
        },
        None => {
            // Nothing piped in and no file named: show the usage hint.
            if io::stdin().is_terminal() {
                usage_and_exit(&program, 0);
            }
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                cli_util::report(&program, &format!("failed reading program from stdin: {e}"));
                std::process::exit(1);
            }
            buffer
        }
    };

    if source.trim().is_empty() {
        usage_and_exit(&program, 0);
    }

    let tokens = tokenize(&source);
    let code = if cli.compile {
        run_compile(&program, tokens)
    } else {
        run_program(&program, tokens)
    };

    std::process::exit(code);
}
