//! AppleScript wrappers for the `applescript` and `terminal` launch modes.

/// Escapes `text` for use inside an AppleScript string literal.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if matches!(ch, '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// `osascript -e` arguments that run `line` with `do shell script`.
pub(crate) fn do_shell_script(line: &str) -> Vec<String> {
    vec![
        String::from("-e"),
        format!("do shell script {}", quote(line)),
    ]
}

/// `osascript -e` arguments that open `line` in a new Terminal window.
pub(crate) fn terminal_do_script(line: &str) -> Vec<String> {
    let script = format!("do script {}", quote(line));
    [
        "tell application \"Terminal\"",
        "activate",
        script.as_str(),
        "end tell",
    ]
    .into_iter()
    .flat_map(|statement| [String::from("-e"), statement.to_owned()])
    .collect()
}
