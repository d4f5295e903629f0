use serde::{Deserialize, Serialize};

use super::LINKRUNNER_MAVEN_REPOSITORY;

/// Language of the project-level Gradle build script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum GradleDialect {
    /// `build.gradle`
    Groovy,
    /// `build.gradle.kts`
    Kotlin,
}

impl GradleDialect {
    /// Picks the dialect from the build script's file name.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".gradle.kts") {
            Some(Self::Kotlin)
        } else if file_name.ends_with(".gradle") {
            Some(Self::Groovy)
        } else {
            None
        }
    }

    fn maven_entry(self) -> String {
        match self {
            Self::Groovy => format!("maven {{ url '{LINKRUNNER_MAVEN_REPOSITORY}' }}"),
            Self::Kotlin => format!("maven {{ url = uri(\"{LINKRUNNER_MAVEN_REPOSITORY}\") }}"),
        }
    }
}

/// The Android project-level build script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct GradleBuildScript {
    /// Script language
    pub dialect: GradleDialect,
    /// Full text of the script
    pub contents: String,
}

/// Returns the script with the Linkrunner Maven repository registered under
/// `allprojects { repositories { ... } }`, or `None` when it is already there.
pub(super) fn add_maven_repository(script: &GradleBuildScript) -> Option<String> {
    let contents = &script.contents;
    if contents.contains(LINKRUNNER_MAVEN_REPOSITORY) {
        return None;
    }

    let entry = script.dialect.maven_entry();
    let code = code_only(contents);

    let patched = match find_block(&code, "allprojects") {
        Some((open, close)) => match find_block(&code[open..=close], "repositories") {
            Some((repositories_open, _)) => {
                insert_after_brace(contents, open + repositories_open, &[entry])
            }
            None => insert_after_brace(
                contents,
                open,
                &[
                    "repositories {".to_string(),
                    format!("    {entry}"),
                    "}".to_string(),
                ],
            ),
        },
        None => {
            let mut patched = contents.trim_end().to_string();
            if !patched.is_empty() {
                patched.push_str("\n\n");
            }
            patched.push_str(&format!(
                "allprojects {{\n    repositories {{\n        {entry}\n    }}\n}}\n"
            ));
            patched
        }
    };

    Some(patched)
}

#[derive(Clone, Copy)]
enum Scan {
    Code,
    LineComment,
    BlockComment,
    Quoted(char),
}

/// Copy of `source` with comments and string literals blanked out, byte offsets unchanged.
///
/// Newlines are kept so indentation lookups still line up. A string literal ends at the end
/// of its line at the latest.
fn code_only(source: &str) -> String {
    let mut code = String::with_capacity(source.len());
    let mut state = Scan::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        let (keep, next_state, skip_next) = match state {
            Scan::Code => match (c, next) {
                ('/', Some('/')) => (false, Scan::LineComment, false),
                ('/', Some('*')) => (false, Scan::BlockComment, true),
                ('"' | '\'', _) => (false, Scan::Quoted(c), false),
                _ => (true, Scan::Code, false),
            },
            Scan::LineComment | Scan::Quoted(_) if c == '\n' => (true, Scan::Code, false),
            Scan::LineComment => (false, Scan::LineComment, false),
            Scan::BlockComment if c == '*' && next == Some('/') => (false, Scan::Code, true),
            Scan::BlockComment => (false, Scan::BlockComment, false),
            Scan::Quoted(_) if c == '\\' => (false, state, true),
            Scan::Quoted(quote) if c == quote => (false, Scan::Code, false),
            Scan::Quoted(_) => (false, state, false),
        };

        push_blanked(&mut code, c, keep);
        if skip_next {
            if let Some(skipped) = chars.next() {
                push_blanked(&mut code, skipped, false);
            }
        }
        state = next_state;
    }
    code
}

fn push_blanked(code: &mut String, c: char, keep: bool) {
    if keep || c == '\n' {
        code.push(c);
    } else {
        code.push_str(&" ".repeat(c.len_utf8()));
    }
}

/// Byte offsets of the opening and closing brace of the first `name { ... }` block.
fn find_block(source: &str, name: &str) -> Option<(usize, usize)> {
    let mut search_from = 0;
    while let Some(found) = source[search_from..].find(name) {
        let start = search_from + found;
        let after = start + name.len();

        let is_word_start = source[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        let rest = &source[after..];
        let trimmed = rest.trim_start();

        if is_word_start && trimmed.starts_with('{') {
            let open = after + (rest.len() - trimmed.len());
            return matching_brace(source, open).map(|close| (open, close));
        }
        search_from = after;
    }
    None
}

fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0_usize;
    for (offset, c) in source[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn line_indent(source: &str, index: usize) -> &str {
    let line_start = source[..index].rfind('\n').map_or(0, |newline| newline + 1);
    let line = &source[line_start..];
    &line[..line.len() - line.trim_start().len()]
}

/// Inserts `lines` right after the brace at `brace`, one level deeper than the brace's line.
fn insert_after_brace(source: &str, brace: usize, lines: &[String]) -> String {
    let indent = format!("{}    ", line_indent(source, brace));

    let added: usize = lines.iter().map(|line| line.len() + indent.len() + 1).sum();
    let mut patched = String::with_capacity(source.len() + added);
    patched.push_str(&source[..=brace]);
    for line in lines {
        patched.push('\n');
        patched.push_str(&indent);
        patched.push_str(line);
    }
    patched.push_str(&source[brace + 1..]);
    patched
}
