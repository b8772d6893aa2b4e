//! Command table and handlers.

use std::{collections::HashMap, path::Path};

use nubage_core::{CategoryChoice, SaveOutcome, TransactionDraft};
use nubage_domain::Direction;

use super::context::{CommandError, CommandResult, ShellContext};
use super::{help, output, render};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandEntry>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("new", "Start an empty ledger", "new", cmd_new),
        CommandEntry::new(
            "add",
            "Add a transaction, or submit the form when called without arguments",
            "add [<title> <value> <period> [category]] [--income|--expense]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Take a row out of the ledger and load it into the form",
            "edit <row>",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Delete a row", "delete <row>", cmd_delete),
        CommandEntry::new("form", "Show the form", "form", cmd_form),
        CommandEntry::new(
            "set",
            "Change one field of the form",
            "set <title|value|period|category|sign> <text>",
            cmd_set,
        ),
        CommandEntry::new("reset", "Clear the form", "reset", cmd_reset),
        CommandEntry::new("list", "List transactions, incomes first", "list", cmd_list),
        CommandEntry::new("totals", "Show the projected totals", "totals", cmd_totals),
        CommandEntry::new(
            "categories",
            "List categories",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "category",
            "Create a category and select it on the form",
            "category <label>",
            cmd_category,
        ),
        CommandEntry::new("load", "Open a .json ledger", "load <path>", cmd_load),
        CommandEntry::new(
            "save",
            "Save the ledger, to the current file when no path is given",
            "save [path]",
            cmd_save,
        ),
        CommandEntry::new("status", "Show the ledger state", "status", cmd_status),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_new(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm_discard("Discard unsaved changes and start a new ledger?")? {
        return Ok(());
    }
    context.controller.new_ledger();
    context.form = TransactionDraft::default();
    output::success("New ledger started.");
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, direction) = split_direction(args)?;
    let draft = match positional.as_slice() {
        [] => {
            let mut draft = context.form.clone();
            if direction.is_some() {
                draft.direction = direction;
            }
            draft
        }
        [title, value, period, rest @ ..] if rest.len() <= 1 => {
            let category = rest
                .first()
                .map(|label| category_choice(context, label))
                .unwrap_or_default();
            TransactionDraft {
                title: (*title).to_string(),
                value: (*value).to_string(),
                period: (*period).to_string(),
                category,
                direction,
            }
        }
        _ => return Err(usage("add")),
    };

    let title = draft.title.clone();
    context.controller.add_transaction(draft)?;
    if positional.is_empty() {
        context.form = TransactionDraft::default();
    }
    output::success(format!("Added `{}`.", title.trim()));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let row = parse_row(args, "edit")?;
    let Some(draft) = context.row_id(row).and_then(|id| context.controller.begin_edit(id)) else {
        output::warning(format!("No row {row} to edit."));
        return Ok(());
    };
    context.form = draft;
    render::form(&context.form);
    output::info("Adjust the form with `set`, then `add` to put the entry back.");
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let row = parse_row(args, "delete")?;
    let selection = context.row_id(row);
    if context.controller.delete_transaction(selection) {
        output::success(format!("Deleted row {row}."));
    } else {
        output::warning(format!("No row {row} to delete."));
    }
    Ok(())
}

fn cmd_form(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::form(&context.form);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [field, text @ ..] = args else {
        return Err(usage("set"));
    };
    let text = text.join(" ");
    match field.to_lowercase().as_str() {
        "title" => context.form.title = text,
        "value" => context.form.value = text,
        "period" => context.form.period = text,
        "category" => context.form.category = category_choice(context, &text),
        "sign" => {
            context.form.direction = match text.to_lowercase().as_str() {
                "income" => Some(Direction::Income),
                "expense" => Some(Direction::Expense),
                "" | "none" => None,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "Unknown sign `{other}`; use income, expense or none."
                    )))
                }
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown field `{other}`."
            )))
        }
    }
    render::form(&context.form);
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.form = TransactionDraft::default();
    output::info("Form cleared.");
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::ledger(context.controller.ledger());
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::totals(context.controller.aggregation());
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::categories(context.controller.categories());
    Ok(())
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let label = args.join(" ");
    let label = label.trim();
    if label.is_empty() {
        return Err(usage("category"));
    }
    if context.controller.choose_new_category(label) {
        output::success(format!("Category `{label}` added."));
    } else {
        output::info(format!("Category `{label}` selected."));
    }
    context.form.category = CategoryChoice::Existing(label.to_string());
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage("load"));
    };
    if !context.confirm_discard("Discard unsaved changes and open another ledger?")? {
        return Ok(());
    }
    let report = context.controller.load_ledger(Path::new(path))?;
    context.form = TransactionDraft::default();
    render::load_report(&report);
    context.remember_ledger(&report.path)
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let outcome = match args {
        [] => context.controller.save()?,
        [path] => context.controller.save_ledger(Path::new(path))?,
        _ => return Err(usage("save")),
    };
    match outcome {
        SaveOutcome::Saved(path) => {
            output::success(format!("Saved to `{}`.", path.display()));
            context.remember_ledger(&path)
        }
        SaveOutcome::NothingToSave => {
            output::warning("Nothing to save!");
            Ok(())
        }
    }
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render::status(&context.controller.status(), context.controller.ledger().len());
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&name) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm_discard("You have unsaved changes. Exit anyway?")? {
        return Ok(());
    }
    if context.controller.has_pending_changes() {
        output::warning("Exiting with unsaved changes.");
    }
    Err(CommandError::ExitRequested)
}

/// Known labels select the category; anything else is typed as a new one.
fn category_choice(context: &ShellContext, label: &str) -> CategoryChoice {
    match CategoryChoice::from_label(label.trim()) {
        CategoryChoice::Existing(label) if !context.controller.categories().contains(&label) => {
            CategoryChoice::AddNew(label)
        }
        choice => choice,
    }
}

fn split_direction<'a>(
    args: &[&'a str],
) -> Result<(Vec<&'a str>, Option<Direction>), CommandError> {
    let mut positional = Vec::new();
    let mut direction = None;
    for arg in args {
        match *arg {
            "--income" => direction = Some(Direction::Income),
            "--expense" => direction = Some(Direction::Expense),
            flag if flag.starts_with("--") => {
                return Err(CommandError::InvalidArguments(format!(
                    "Unknown option `{flag}`."
                )))
            }
            other => positional.push(other),
        }
    }
    Ok((positional, direction))
}

fn parse_row(args: &[&str], command: &str) -> Result<usize, CommandError> {
    let [row] = args else {
        return Err(usage(command));
    };
    row.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{row}` is not a row number.")))
}

fn usage(command: &str) -> CommandError {
    let usage = definitions()
        .into_iter()
        .find(|entry| entry.name == command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_flags_are_split_from_arguments() {
        let (positional, direction) =
            split_direction(&["Rent", "1200", "Month", "--expense"]).expect("split");
        assert_eq!(positional, vec!["Rent", "1200", "Month"]);
        assert_eq!(direction, Some(Direction::Expense));
    }

    #[test]
    fn negative_values_are_not_flags() {
        let (positional, direction) = split_direction(&["Rent", "-1200", "Month"]).expect("split");
        assert_eq!(positional.len(), 3);
        assert!(direction.is_none());
    }

    #[test]
    fn unknown_option_is_rejected() {
        assert!(matches!(
            split_direction(&["--monthly"]),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn registry_keeps_definition_order() {
        let registry = CommandRegistry::new(definitions());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names.first(), Some(&"new"));
        assert_eq!(names.last(), Some(&"exit"));
        assert_eq!(registry.iter().count(), names.len());
    }

    #[test]
    fn usage_message_comes_from_table() {
        let err = usage("load");
        assert_eq!(err.to_string(), "Usage: load <path>");
    }
}
