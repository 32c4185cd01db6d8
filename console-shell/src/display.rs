use std::io::{BufRead, Write};

use core_types::{ConfirmationInput, DeletionOutcome, ScriptCatalog, ScriptDescriptor};
use flume::Sender;

use crate::controller::ShellMsg;

/// Boundary to the interaction layer.
///
/// The controller is the only component that talks to a display; everything
/// behind this trait (layout, colors, widget toolkit) is replaceable.
pub trait DisplayPort: Send + Sync {
    fn show_catalog(&self, catalog: &ScriptCatalog);
    fn show_preview(&self, descriptor: &ScriptDescriptor, contents: &str);
    fn show_message(&self, text: &str);
    fn show_error(&self, text: &str);
    fn show_outcome(&self, outcome: &DeletionOutcome);
}

/// Plain line-oriented console display.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayPort for ConsoleDisplay {
    fn show_catalog(&self, catalog: &ScriptCatalog) {
        if catalog.is_empty() {
            println!("No assignments found.");
            return;
        }
        println!("Assignments:");
        for (index, descriptor) in catalog.iter().enumerate() {
            println!("  [{}] {}", index, descriptor.display_name);
        }
    }

    fn show_preview(&self, descriptor: &ScriptDescriptor, contents: &str) {
        println!("--- {} ---", descriptor.path.display());
        println!("{}", contents);
        println!("--- end ---");
    }

    fn show_message(&self, text: &str) {
        println!("{}", text);
    }

    fn show_error(&self, text: &str) {
        eprintln!("error: {}", text);
    }

    fn show_outcome(&self, outcome: &DeletionOutcome) {
        match outcome {
            DeletionOutcome::MovedToTrash { mechanism } => {
                println!(
                    "Project folder moved to trash via {}. Restore it from there if needed.",
                    mechanism
                );
            }
            DeletionOutcome::RenamedFallback { new_path } => {
                println!(
                    "Trash was not available. Nothing was permanently removed; the folder was renamed to {}. Delete it manually when ready.",
                    new_path.display()
                );
            }
            DeletionOutcome::Aborted { reason } => {
                println!("Uninstall aborted: {}", reason);
            }
            DeletionOutcome::Failed { reason } => {
                eprintln!("Uninstall failed: {}", reason);
            }
        }
    }
}

/// Reads commands from stdin and feeds them to the event loop.
///
/// Runs on its own thread because stdin is blocking; everything it does is
/// translated into [`ShellMsg`] values, never direct component calls. The
/// two-step uninstall confirmation is collected here in full before a single
/// request message is sent.
pub fn run_input_loop(tx: Sender<ShellMsg>, project_folder_name: String) {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    print_help();
    prompt();
    loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let trimmed = line.trim();
        let mut parts = trimmed.splitn(2, ' ');
        let command = parts.next().unwrap_or("");
        let argument = parts.next().map(str::trim);

        let message = match (command, argument) {
            ("", _) => None,
            ("help", _) => {
                print_help();
                None
            }
            ("list", _) | ("refresh", _) => Some(ShellMsg::CatalogRequested),
            ("preview", Some(index)) => index.parse::<usize>().ok().map(ShellMsg::PreviewRequested),
            ("run", Some(index)) => index.parse::<usize>().ok().map(ShellMsg::RunRequested),
            ("uninstall", _) => Some(ShellMsg::UninstallRequested {
                inputs: collect_uninstall_confirmation(&mut input, &project_folder_name),
            }),
            ("quit", _) | ("exit", _) => Some(ShellMsg::Quit),
            _ => {
                println!("Unknown command: {}", trimmed);
                None
            }
        };
        let quitting = matches!(message, Some(ShellMsg::Quit));
        if let Some(message) = message {
            if tx.send(message).is_err() {
                break;
            }
        }
        if quitting {
            break;
        }
        prompt();
    }
    // stdin closed; let the loop wind down.
    let _ = tx.send(ShellMsg::Quit);
}

/// Two-step confirmation: an explicit warning the user must accept, then the
/// exact project folder name typed back.
fn collect_uninstall_confirmation(
    input: &mut impl BufRead,
    project_folder_name: &str,
) -> Vec<ConfirmationInput> {
    println!("WARNING: the entire project folder will move to the trash.");
    println!("If trash is unavailable the folder will be renamed (DELETE_ME_).");
    println!("System tools are never modified.");
    print!("Type 'ok' to continue: ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() || answer.trim() != "ok" {
        return vec![ConfirmationInput::Cancel];
    }

    print!(
        "Type the project folder name to confirm: {} ",
        project_folder_name
    );
    let _ = std::io::stdout().flush();
    let mut typed = String::new();
    if input.read_line(&mut typed).is_err() {
        return vec![ConfirmationInput::Proceed, ConfirmationInput::Cancel];
    }
    vec![
        ConfirmationInput::Proceed,
        ConfirmationInput::TypedText(typed.trim_end_matches(['\r', '\n']).to_string()),
    ]
}

fn print_help() {
    println!("Commands: list | preview <n> | run <n> | uninstall | quit");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
