//! Interactive REPL loop: read stdin, run the query, print the answer, repeat until EOF or quit.
//!
//! Each query starts from an empty history; nothing carries over between queries.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use react_loop::ReactRunner;

use crate::display::{separator, welcome_banner};
use crate::interrupt::Interrupts;
use crate::{print_outcome, run_query, OutputMode};

/// What to do with one line of input.
#[derive(Debug, PartialEq, Eq)]
enum LineAction<'a> {
    Quit,
    Empty,
    Query(&'a str),
}

fn classify(line: &str) -> LineAction<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineAction::Empty
    } else if is_quit_command(trimmed) {
        LineAction::Quit
    } else {
        LineAction::Query(trimmed)
    }
}

fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit" | "/quit")
}

/// Runs the REPL loop: prompt, read line, run query, print, repeat.
///
/// Exits on EOF (Ctrl+D) or `quit`/`exit`/`/quit`. Empty lines re-prompt. Ctrl-C at
/// the prompt exits through [`Interrupts`].
pub async fn run_repl_loop(
    runner: &ReactRunner,
    mode: OutputMode,
    interrupts: &Interrupts,
) -> Result<(), Box<dyn std::error::Error>> {
    if !mode.json {
        print!("{}", welcome_banner(&runner.tools().names()));
    }
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nYour query: ");
        std::io::stdout().flush()?;

        let Some(line) = reader.next_line().await? else {
            break;
        };
        let query = match classify(&line) {
            LineAction::Quit => break,
            LineAction::Empty => {
                println!("Please type something!");
                continue;
            }
            LineAction::Query(q) => q,
        };

        if !mode.json {
            eprint!("{}", separator("NEW QUERY", '-'));
        }
        let outcome = run_query(runner, query, mode, interrupts).await;
        if !mode.json {
            print!("{}", separator("RESPONSE", '-'));
        }
        print_outcome(&outcome, mode)?;
    }

    if !mode.json {
        print!("{}", separator("GOODBYE!", '='));
        println!("Thanks for trying the ReAct agent!");
    }
    Ok(())
}
