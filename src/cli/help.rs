use super::commands::{CommandEntry, CommandRegistry};
use super::output;

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for entry in registry.iter() {
        output::info(format!("  {:<12} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
}
