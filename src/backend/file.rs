//! INI-style on-disk backend.
//!
//! Format:
//! ```text
//! # comment
//! [core]
//!     editor = vim
//!     bare                 ; key without a value
//! [remote "origin"]
//!     url = "https://example.com/repo.git"   # quoted, escapes allowed
//! ```
//!
//! Variable names are `section.key` or `section.subsection.key`. Section and
//! key are case-insensitive and stored lowercased; subsections keep their
//! case. `set` rewrites the whole file; comments are not preserved.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::{Backend, Visitor};
use crate::error::ConfigError;

/// File-backed configuration layer.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: IndexMap<String, Option<String>>,
}

impl FileBackend {
    /// Create a backend bound to `path`. Nothing is read until [`Backend::open`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), ConfigError> {
        std::fs::write(&self.path, render(&self.entries)).map_err(|e| ConfigError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl Backend for FileBackend {
    fn open(&mut self) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;
        self.entries = parse(&content).map_err(|(line, message)| ConfigError::ParseFile {
            path: self.path.clone(),
            line,
            message,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            variables = self.entries.len(),
            "opened config file"
        );
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        // A name that cannot be stored is simply absent.
        let name = VarName::parse(name)
            .map_err(|_| ConfigError::not_found(name))?
            .canonical();
        self.entries
            .get(&name)
            .map(Option::as_deref)
            .ok_or(ConfigError::NotFound { name })
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let name = VarName::parse(name)?.canonical();
        let previous = self.entries.insert(name.clone(), Some(value.to_string()));

        if let Err(e) = self.write() {
            // Keep memory in line with what is on disk.
            match previous {
                Some(old) => {
                    self.entries.insert(name, old);
                }
                None => {
                    self.entries.shift_remove(&name);
                }
            }
            return Err(e);
        }
        tracing::trace!(path = %self.path.display(), %name, "wrote config variable");
        Ok(())
    }

    fn foreach(&self, visitor: &mut Visitor<'_>) -> ControlFlow<()> {
        for (name, value) in &self.entries {
            visitor(name, value.as_deref())?;
        }
        ControlFlow::Continue(())
    }

    fn origin(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// A variable name split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct VarName<'a> {
    section: &'a str,
    subsection: Option<&'a str>,
    key: &'a str,
}

impl<'a> VarName<'a> {
    fn parse(name: &'a str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidArgument(format!("invalid config variable name '{name}'"));

        let (section, rest) = name.split_once('.').ok_or_else(invalid)?;
        let (subsection, key) = match rest.rsplit_once('.') {
            Some((sub, key)) => (Some(sub), key),
            None => (None, rest),
        };

        if !is_valid_section(section) || !is_valid_key(key) {
            return Err(invalid());
        }
        if subsection.is_some_and(|s| s.contains('\n')) {
            return Err(invalid());
        }

        Ok(Self {
            section,
            subsection,
            key,
        })
    }

    fn canonical(&self) -> String {
        let section = self.section.to_ascii_lowercase();
        let key = self.key.to_ascii_lowercase();
        match self.subsection {
            Some(sub) => format!("{section}.{sub}.{key}"),
            None => format!("{section}.{key}"),
        }
    }
}

fn is_valid_section(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_key(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

type ParseResult<T> = Result<T, (usize, String)>;

/// Parse file content into canonical variable names and raw values.
///
/// Errors carry the 1-based line number.
fn parse(content: &str) -> ParseResult<IndexMap<String, Option<String>>> {
    let mut entries = IndexMap::new();
    let mut prefix: Option<String> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            prefix = Some(parse_header(header).map_err(|m| (line_no, m))?);
            continue;
        }

        let Some(ref section) = prefix else {
            return Err((line_no, "variable defined outside of any section".to_string()));
        };

        let comment = line.find(['#', ';']);
        let (key, value) = match line.find('=') {
            Some(eq) if comment.is_none_or(|c| eq < c) => {
                let value = parse_value(&line[eq + 1..]).map_err(|m| (line_no, m))?;
                (line[..eq].trim(), Some(value))
            }
            _ => (line[..comment.unwrap_or(line.len())].trim(), None),
        };

        if !is_valid_key(key) {
            return Err((line_no, format!("invalid key '{key}'")));
        }

        // Repeated keys: the last assignment wins.
        entries.insert(format!("{section}.{}", key.to_ascii_lowercase()), value);
    }

    Ok(entries)
}

/// Parse the part of a section header after `[`; returns the name prefix.
fn parse_header(header: &str) -> Result<String, String> {
    let Some(quote) = header.find('"') else {
        let (name, rest) = header
            .split_once(']')
            .ok_or_else(|| "unterminated section header".to_string())?;
        check_header_tail(rest)?;
        let name = name.trim();
        if !is_valid_section(name) {
            return Err(format!("invalid section name '{name}'"));
        }
        return Ok(name.to_ascii_lowercase());
    };

    let name = header[..quote].trim();
    if !is_valid_section(name) {
        return Err(format!("invalid section name '{name}'"));
    }

    let mut subsection = String::new();
    let mut chars = header[quote + 1..].char_indices();
    let close = loop {
        match chars.next() {
            Some((i, '"')) => break quote + 1 + i,
            Some((_, '\\')) => match chars.next() {
                Some((_, c)) => subsection.push(c),
                None => return Err("unterminated subsection name".to_string()),
            },
            Some((_, c)) => subsection.push(c),
            None => return Err("unterminated subsection name".to_string()),
        }
    };

    let rest = header[close + 1..]
        .trim_start()
        .strip_prefix(']')
        .ok_or_else(|| "expected ']' after subsection name".to_string())?;
    check_header_tail(rest)?;

    Ok(format!("{}.{subsection}", name.to_ascii_lowercase()))
}

fn check_header_tail(rest: &str) -> Result<(), String> {
    let rest = rest.trim();
    if rest.is_empty() || rest.starts_with('#') || rest.starts_with(';') {
        Ok(())
    } else {
        Err(format!("unexpected '{rest}' after section header"))
    }
}

/// Parse the text after `=`: quotes, escapes, and trailing comments.
fn parse_value(raw: &str) -> Result<String, String> {
    let mut out = String::new();
    // Length of `out` up to the last character that must be kept; unquoted
    // trailing whitespace is dropped.
    let mut keep = 0;
    let mut in_quotes = false;
    let mut chars = raw.trim_start().chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                keep = out.len();
            }
            '\\' => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('b') => '\u{8}',
                    Some('"') => '"',
                    Some('\\') => '\\',
                    Some(other) => return Err(format!("invalid escape sequence '\\{other}'")),
                    None => return Err("trailing backslash in value".to_string()),
                };
                out.push(escaped);
                keep = out.len();
            }
            '#' | ';' if !in_quotes => break,
            c => {
                out.push(c);
                if in_quotes || !c.is_whitespace() {
                    keep = out.len();
                }
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted value".to_string());
    }
    out.truncate(keep);
    Ok(out)
}

/// Render entries back to file content, grouped by section.
fn render(entries: &IndexMap<String, Option<String>>) -> String {
    let mut sections: IndexMap<(&str, Option<&str>), Vec<(&str, Option<&str>)>> = IndexMap::new();
    for (name, value) in entries {
        // Canonical names always parse.
        let Ok(var) = VarName::parse(name) else {
            tracing::warn!(%name, "skipping unrenderable config variable");
            continue;
        };
        sections
            .entry((var.section, var.subsection))
            .or_default()
            .push((var.key, value.as_deref()));
    }

    let mut out = String::new();
    for ((section, subsection), vars) in sections {
        match subsection {
            Some(sub) => {
                let sub = sub.replace('\\', "\\\\").replace('"', "\\\"");
                out.push_str(&format!("[{section} \"{sub}\"]\n"));
            }
            None => out.push_str(&format!("[{section}]\n")),
        }
        for (key, value) in vars {
            match value {
                Some(v) => out.push_str(&format!("\t{key} = {}\n", render_value(v))),
                None => out.push_str(&format!("\t{key}\n")),
            }
        }
    }
    out
}

fn render_value(value: &str) -> String {
    let needs_quotes = value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(['#', ';']);

    let mut out = String::with_capacity(value.len() + 2);
    if needs_quotes {
        out.push('"');
    }
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            c => out.push(c),
        }
    }
    if needs_quotes {
        out.push('"');
    }
    out
}
