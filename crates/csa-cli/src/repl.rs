//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Drives one [`Session`] through upload, extract, review and generate.
//! A failed action prints its error and leaves the session as it was.

use crate::commands::extract::{build_extractor, extract_and_review, print_reply, print_review};
use crate::config::{csa_dir, Config};
use crate::error::{CliError, Result};
use crate::generator::Generator;
use crate::output::Formatter;
use crate::session::Session;
use csa_extractor::Extractor;
use csa_llm::GeminiProvider;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl(config: &Config, api_key: Option<&str>, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("CSA Generator - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    // Initialize readline editor
    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut state = ReplState {
        config,
        api_key,
        session: Session::new(),
        extractor: None,
        generator: Generator::from_config(config, None),
    };

    loop {
        let prompt = format!("csa ({})> ", state.session.stage());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, &mut state, formatter).await {
                            eprintln!("{}", formatter.error_report(&e));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Everything one REPL run holds between commands.
struct ReplState<'a> {
    config: &'a Config,
    api_key: Option<&'a str>,
    session: Session,
    /// Built on first `extract`, so the API key is only needed then
    extractor: Option<Extractor<GeminiProvider>>,
    generator: Generator,
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Upload(PathBuf),
    Extract,
    Show,
    Generate(Option<PathBuf>),
    Status,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "upload" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: upload <path>".to_string()));
            }
            Ok(ReplCommand::Upload(path_argument(rest)))
        }
        "extract" => Ok(ReplCommand::Extract),
        "show" | "review" => Ok(ReplCommand::Show),
        "generate" => Ok(ReplCommand::Generate(
            (!rest.is_empty()).then(|| path_argument(rest)),
        )),
        "status" => Ok(ReplCommand::Status),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            command
        ))),
    }
}

/// Paths may contain spaces; surrounding quotes are optional.
fn path_argument(rest: &str) -> PathBuf {
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| rest.strip_prefix(*q).and_then(|r| r.strip_suffix(*q)))
        .unwrap_or(rest);
    PathBuf::from(unquoted)
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    state: &mut ReplState<'_>,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Upload(path) => {
            let document = state.session.upload_path(&path)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Uploaded {} ({} bytes)",
                    document.name(),
                    document.size()
                ))
            );
        }
        ReplCommand::Extract => {
            let extractor = match state.extractor.take() {
                Some(extractor) => extractor,
                None => build_extractor(state.config, state.api_key)?,
            };
            let result = extract_and_review(
                &mut state.session,
                &extractor,
                &state.generator,
                formatter,
            )
            .await
            .map(|_| ());
            state.extractor = Some(extractor);
            result?;
        }
        ReplCommand::Show => {
            let outcome = state.session.outcome().ok_or(CliError::NoMapping)?;
            print_reply(&outcome.raw_response, formatter);
            print_review(&outcome.mapping, &state.generator, formatter)?;
        }
        ReplCommand::Generate(output) => {
            let form = state.session.generate(&state.generator, output.as_deref())?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Generated {} ({})",
                    form.path.display(),
                    form.mime_type
                ))
            );
        }
        ReplCommand::Status => {
            println!("{}", formatter.format_status(&state.session));
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn get_history_path() -> Result<PathBuf> {
    let dir = csa_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  upload <path>       - Load a contract (.pdf or .docx)");
    println!("  extract             - Extract fields from the uploaded contract");
    println!("  show, review        - Show the model reply and extracted fields");
    println!("  generate [path]     - Fill the template (default: CSA_Filled.docx)");
    println!("  status              - Show session state");
    println!("  help, ?             - Show this help");
    println!("  exit, quit, q       - Exit REPL");
    println!();
}
