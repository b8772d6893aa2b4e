use std::io::{self, BufRead};

use rustyline::{error::ReadlineError, history::DefaultHistory, Cmd, Editor, KeyEvent};

use super::completion::CommandHelper;
use super::context::{CliError, CliMode, LoopControl, ShellContext, SCRIPT_ENV};
use super::output;

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Type `help` to list commands. Tab completes periods and categories.");
    while context.running {
        if let Some(helper) = editor.helper_mut() {
            helper.set_categories(context.controller.categories().selectable());
        }

        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                execute(context, line)?;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                if context.confirm_exit()? {
                    output::info("Exiting shell.");
                    context.running = false;
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Reads one command per stdin line; nothing prompts.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        execute(context, &line?)?;
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Runs one shell line. Command failures are reported and the shell keeps going.
fn execute(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not read `{}`: {err}", line.trim()));
            return Ok(());
        }
    };
    let Some((raw, args)) = tokens.split_first() else {
        return Ok(());
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match context.dispatch(&raw.to_lowercase(), raw, &args) {
        Ok(LoopControl::Continue) => Ok(()),
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(())
        }
        Err(err) => context.report_error(err),
    }
}
