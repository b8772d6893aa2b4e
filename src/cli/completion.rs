//! Tab completion for the interactive shell.
//!
//! Completes command names, then the arguments that take a fixed vocabulary:
//! periods, category labels, form fields and signs. `load` and `save`
//! complete file paths.

use nubage_domain::Period;
use rustyline::{
    completion::{Completer, FilenameCompleter, Pair},
    Context, Helper, Highlighter, Hinter, Validator,
};

const FORM_FIELDS: [&str; 5] = ["title", "value", "period", "category", "sign"];
const SIGNS: [&str; 3] = ["income", "expense", "none"];

/// Vocabulary expected at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Command,
    Period,
    Category,
    Field,
    Sign,
    Path,
    Free,
}

#[derive(Helper, Highlighter, Hinter, Validator)]
pub(crate) struct CommandHelper {
    commands: Vec<String>,
    categories: Vec<String>,
    paths: FilenameCompleter,
}

impl CommandHelper {
    pub(crate) fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            categories: Vec::new(),
            paths: FilenameCompleter::new(),
        }
    }

    /// Replaces the category labels offered for completion.
    pub(crate) fn set_categories<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) {
        self.categories = labels.into_iter().map(str::to_string).collect();
    }

    fn vocabulary(&self, slot: Slot) -> Vec<&str> {
        match slot {
            Slot::Command => self.commands.iter().map(String::as_str).collect(),
            Slot::Period => Period::ALL.iter().map(|period| period.label()).collect(),
            Slot::Category => self.categories.iter().map(String::as_str).collect(),
            Slot::Field => FORM_FIELDS.to_vec(),
            Slot::Sign => SIGNS.to_vec(),
            Slot::Path | Slot::Free => Vec::new(),
        }
    }

    /// Candidates for the word that ends `prefix`, with the byte offset it starts at.
    fn complete_words(&self, prefix: &str) -> (usize, Slot, Vec<Pair>) {
        let start = word_start(prefix);
        let slot = slot_for(&preceding_words(&prefix[..start]));
        let needle = prefix[start..]
            .trim_start_matches(['"', '\''])
            .to_lowercase();
        let candidates = self
            .vocabulary(slot)
            .into_iter()
            .filter(|label| label.to_lowercase().starts_with(&needle))
            .map(|label| Pair {
                display: label.to_string(),
                replacement: shell_words::quote(label).into_owned(),
            })
            .collect();
        (start, slot, candidates)
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match self.complete_words(&line[..pos]) {
            (_, Slot::Path, _) => self.paths.complete(line, pos, ctx),
            (start, _, candidates) => Ok((start, candidates)),
        }
    }
}

/// Byte offset where the word under the cursor begins. Whitespace inside
/// quotes does not split words.
fn word_start(prefix: &str) -> usize {
    let mut start = 0;
    let mut quote = None;
    for (index, ch) in prefix.char_indices() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ch) if ch.is_whitespace() => start = index + ch.len_utf8(),
            (None, _) => {}
        }
    }
    start
}

fn preceding_words(text: &str) -> Vec<String> {
    shell_words::split(text)
        .unwrap_or_else(|_| text.split_whitespace().map(str::to_string).collect())
}

fn slot_for(words: &[String]) -> Slot {
    let Some((command, args)) = words.split_first() else {
        return Slot::Command;
    };
    match command.to_lowercase().as_str() {
        "add" => {
            let positional = args.iter().filter(|arg| !arg.starts_with("--")).count();
            match positional {
                2 => Slot::Period,
                3 => Slot::Category,
                _ => Slot::Free,
            }
        }
        "set" => match args {
            [] => Slot::Field,
            [field] => match field.to_lowercase().as_str() {
                "period" => Slot::Period,
                "category" => Slot::Category,
                "sign" => Slot::Sign,
                _ => Slot::Free,
            },
            _ => Slot::Free,
        },
        "category" if args.is_empty() => Slot::Category,
        "help" if args.is_empty() => Slot::Command,
        "load" | "save" if args.is_empty() => Slot::Path,
        _ => Slot::Free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubage_core::CategoryRegistry;
    use nubage_domain::{Ledger, Transaction};

    fn helper() -> CommandHelper {
        let mut helper = CommandHelper::new(vec!["save", "add", "save", "set", "status"]);
        let ledger: Ledger = vec![
            Transaction::new("Rent", "-1200", Period::Month, "Housing"),
            Transaction::new("Hotel", "-300", Period::Year, "Holidays"),
        ]
        .into();
        helper.set_categories(CategoryRegistry::derive(&ledger).selectable());
        helper
    }

    fn replacements(helper: &CommandHelper, prefix: &str) -> Vec<String> {
        let (_, _, candidates) = helper.complete_words(prefix);
        candidates
            .into_iter()
            .map(|pair| pair.replacement)
            .collect()
    }

    #[test]
    fn command_names_are_sorted_and_unique() {
        assert_eq!(helper().commands, vec!["add", "save", "set", "status"]);
    }

    #[test]
    fn first_word_completes_commands() {
        assert_eq!(replacements(&helper(), "s"), vec!["save", "set", "status"]);
        assert_eq!(replacements(&helper(), "help st"), vec!["status"]);
    }

    #[test]
    fn add_completes_period_then_category() {
        let helper = helper();
        assert_eq!(replacements(&helper, "add Rent -1200 mo"), vec!["Month"]);
        assert_eq!(replacements(&helper, "add Rent -1200 Month Ho"), vec!["Housing", "Holidays"]);
        assert!(replacements(&helper, "add Re").is_empty());
        assert!(replacements(&helper, "add Rent -1200 Month Housing x").is_empty());
    }

    #[test]
    fn direction_flags_do_not_shift_arguments() {
        assert_eq!(
            replacements(&helper(), "add --expense Rent 1200 We"),
            vec!["Week"]
        );
    }

    #[test]
    fn labels_with_spaces_are_quoted() {
        let helper = helper();
        assert_eq!(replacements(&helper, "add Car -90 6"), vec!["'6 Months'"]);

        let (start, _, candidates) = helper.complete_words("add Car -90 \"6 M");
        assert_eq!(start, "add Car -90 ".len());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display, "6 Months");
    }

    #[test]
    fn sentinel_label_is_never_offered() {
        let helper = helper();
        assert!(replacements(&helper, "set category add").is_empty());
        assert_eq!(replacements(&helper, "set category no"), vec!["'none selected'"]);
    }

    #[test]
    fn set_completes_fields_and_their_values() {
        let helper = helper();
        assert_eq!(replacements(&helper, "set p"), vec!["period"]);
        assert_eq!(replacements(&helper, "set period q"), vec!["Quarter"]);
        assert_eq!(replacements(&helper, "set sign ex"), vec!["expense"]);
        assert!(replacements(&helper, "set title R").is_empty());
    }

    #[test]
    fn load_and_save_defer_to_path_completion() {
        let (_, slot, _) = helper().complete_words("load ./bud");
        assert_eq!(slot, Slot::Path);
        let (_, slot, _) = helper().complete_words("save out.json ");
        assert_eq!(slot, Slot::Free);
    }
}
