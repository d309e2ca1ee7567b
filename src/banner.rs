//! Terminal banner and help text.

use console::style;

const RULE_WIDTH: usize = 56;

/// Example phrases shown by `help`, with what each one does.
pub const HELP_ROWS: &[(&str, &str)] = &[
    ("What time is it?", "Current time"),
    ("What's today's date?", "Today's date"),
    ("What is a black hole?", "Wikipedia lookup"),
    ("Search for rust tutorials", "Web search"),
    ("Open firefox", "Launch app"),
    ("Open downloads folder", "Open folder"),
    ("Close firefox", "Close app"),
    ("Remind me to call mom at 8 pm", "Set reminder"),
    ("Show reminders", "List reminders"),
    ("Remember that my wifi is X", "Save a note"),
    ("What do you remember?", "Recall notes"),
    ("Forget everything", "Clear notes"),
    ("Tell me a joke", "Random joke"),
    ("Calculate 25 * 4", "Math"),
    ("Lock screen", "Lock the computer"),
    ("Put to sleep", "Sleep the computer"),
    ("Restart", "Reboot"),
    ("Volume up / volume down / mute", "Audio"),
    ("Screenshot", "Save a screenshot"),
];

/// Spoken alongside the printed help.
pub const HELP_SUMMARY: &str = "I can search Wikipedia and the web, open apps, set reminders, \
     remember things, do maths, and control your computer. \
     Check the terminal for the full list.";

/// Plain help text (no styling), one example per line.
pub fn help_text() -> String {
    let width = HELP_ROWS.iter().map(|(p, _)| p.len()).max().unwrap_or(0) + 2;
    let mut out = String::from("WHAT I CAN DO:\n");
    out.push_str(&"─".repeat(RULE_WIDTH));
    out.push('\n');
    for (phrase, effect) in HELP_ROWS {
        let quoted = format!("\"{phrase}\"");
        out.push_str(&format!("  {quoted:<width$}  {effect}\n", width = width));
    }
    out.push_str(&"─".repeat(RULE_WIDTH));
    out
}

pub fn print_help() {
    println!("\n{}\n", style(help_text()).cyan());
}

pub fn print_banner(name: &str) {
    let rule = "─".repeat(RULE_WIDTH);
    let now = chrono::Local::now().format("%A, %B %d %Y  %I:%M %p");
    println!("\n{}", style(&rule).dim());
    println!("  {}", style(format!("{name}: local voice assistant")).bold());
    println!("  {now}");
    println!("{}\n", style(&rule).dim());
    println!("  Say 'exit' or 'bye' to quit.");
    println!("  Say 'help' to see what I can do.\n");
    println!("{}\n", style(&rule).dim());
}
