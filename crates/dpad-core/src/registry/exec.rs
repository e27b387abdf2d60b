//! `Exec=` command line parsing.
//!
//! Arguments are split on unquoted whitespace. Inside double quotes a backslash
//! escapes `"`, `` ` ``, `$` and `\`. Field codes are expanded for the launcher
//! case, where no files or URLs are passed.

use std::path::Path;

/// Split an `Exec` value into argv, expanding field codes.
///
/// Returns `None` for an unterminated quote or an empty command.
pub(crate) fn parse_exec(
    exec: &str,
    name: &str,
    icon: Option<&str>,
    desktop_file: &Path,
) -> Option<Vec<String>> {
    let mut argv = Vec::new();

    for token in split_quoted(exec)? {
        match token.as_str() {
            // Whole-argument codes
            "%i" => {
                if let Some(icon) = icon.filter(|i| !i.is_empty()) {
                    argv.push("--icon".to_string());
                    argv.push(icon.to_string());
                }
            }
            "%f" | "%F" | "%u" | "%U" | "%d" | "%D" | "%n" | "%N" | "%v" | "%m" => {}
            _ => argv.push(expand_codes(&token, name, desktop_file)),
        }
    }

    if argv.first().is_none_or(String::is_empty) {
        return None;
    }
    Some(argv)
}

fn split_quoted(exec: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_token = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            escaped @ ('"' | '`' | '$' | '\\') => current.push(escaped),
                            other => {
                                current.push('\\');
                                current.push(other);
                            }
                        },
                        other => current.push(other),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Some(tokens)
}

fn expand_codes(token: &str, name: &str, desktop_file: &Path) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('c') => out.push_str(name),
            Some('k') => out.push_str(&desktop_file.to_string_lossy()),
            // File/URL codes embedded in an argument expand to nothing
            Some(_) | None => {}
        }
    }
    out
}
