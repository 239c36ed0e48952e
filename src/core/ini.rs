//! Lenient reader/writer for the engine's INI-style profile file.
//!
//! Sections the caller never touches are written back from their original
//! lines, so comments, spacing and repeated keys in them survive a rewrite.
//! Only sections whose options were changed through this API are
//! re-serialized.

use super::encoding::{LineEnding, TextFormat};
use thiserror::Error;

/// Sections that hold engine-wide settings rather than a sandbox.
const GLOBAL_SECTION: &str = "GlobalSettings";
const USER_SECTION_PREFIX: &str = "UserSettings_";
const TEMPLATE_SECTION_PREFIX: &str = "Template";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// A name, key or value that would not read back as written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("invalid section name {0:?}: must be non-empty without ']' or line breaks")]
    SectionName(String),
    #[error("invalid option key {0:?}: must be non-empty and trimmed, without '=' or line breaks, and not start with '[', '#' or ';'")]
    Key(String),
    #[error("invalid value for option {key:?}: line breaks are not allowed")]
    Value { key: String },
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

pub fn check_section_name(name: &str) -> Result<(), EntryError> {
    if name.is_empty() || name.contains(']') || has_line_break(name) {
        return Err(EntryError::SectionName(name.to_string()));
    }
    Ok(())
}

pub fn check_option(key: &str, value: &str) -> Result<(), EntryError> {
    let bad_key = key.is_empty()
        || key.trim() != key
        || key.contains('=')
        || has_line_break(key)
        || key.starts_with(['[', '#', ';']);
    if bad_key {
        return Err(EntryError::Key(key.to_string()));
    }
    if has_line_break(value) {
        return Err(EntryError::Value {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Original text of a section: its header line and everything up to the
/// next header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawSection {
    header: String,
    body: Vec<String>,
    /// The last line of this section ended the file without a line break.
    unterminated: bool,
}

/// A named section and its options, in file order. Keys are unique; a key
/// seen twice keeps its first position and its last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxProfile {
    name: String,
    options: Vec<(String, String)>,
    /// `None` once the options were changed through the API.
    raw: Option<RawSection>,
}

impl SandboxProfile {
    pub fn new<I, K, V>(name: impl Into<String>, options: I) -> Result<Self, EntryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        check_section_name(&name)?;
        let mut profile = Self {
            name,
            options: Vec::new(),
            raw: None,
        };
        profile.replace_options(options)?;
        Ok(profile)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Whether this section will be re-serialized on write.
    pub fn is_modified(&self) -> bool {
        self.raw.is_none()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), EntryError> {
        let (key, value) = (key.into(), value.into());
        check_option(&key, &value)?;
        self.raw = None;
        self.upsert(key, value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.options.iter().position(|(k, _)| k == key)?;
        self.raw = None;
        Some(self.options.remove(idx).1)
    }

    /// Replaces the whole option mapping. Nothing changes if any entry is
    /// rejected.
    pub fn replace_options<I, K, V>(&mut self, options: I) -> Result<(), EntryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let options: Vec<(String, String)> = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, value) in &options {
            check_option(key, value)?;
        }

        self.raw = None;
        self.options.clear();
        for (key, value) in options {
            self.upsert(key, value);
        }
        Ok(())
    }

    /// Whether this section describes a sandbox rather than engine-wide,
    /// per-user or template settings.
    pub fn is_box(&self) -> bool {
        is_box_section(&self.name)
    }

    fn upsert(&mut self, key: String, value: String) {
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.options.push((key, value)),
        }
    }
}

pub fn is_box_section(name: &str) -> bool {
    name != GLOBAL_SECTION
        && !name.starts_with(USER_SECTION_PREFIX)
        && !name.starts_with(TEMPLATE_SECTION_PREFIX)
}

/// The whole profile file: an opaque preamble followed by sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Blank and comment lines before the first header, verbatim.
    preamble: Vec<String>,
    sections: Vec<SandboxProfile>,
    format: TextFormat,
    /// The source ended inside the preamble without a line break.
    preamble_unterminated: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses decoded file text. Repeated section headers are merged into
    /// the first occurrence instead of failing.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut config = Config {
            format: TextFormat {
                bom: false,
                line_ending: LineEnding::detect(text),
            },
            ..Config::default()
        };
        let mut current: Option<usize> = None;

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let trimmed = line.trim();

            if let Some(name) = parse_header(trimmed, lineno)? {
                current = Some(match config.position(name) {
                    Some(existing) => existing,
                    None => {
                        config.sections.push(SandboxProfile {
                            name: name.to_string(),
                            options: Vec::new(),
                            raw: Some(RawSection {
                                header: line.to_string(),
                                body: Vec::new(),
                                unterminated: false,
                            }),
                        });
                        config.sections.len() - 1
                    }
                });
                continue;
            }

            let Some(section_idx) = current else {
                if is_blank_or_comment(trimmed) {
                    config.preamble.push(line.to_string());
                    continue;
                }
                return Err(ParseError::new(
                    lineno,
                    "option outside of any [section] header",
                ));
            };

            let section = &mut config.sections[section_idx];
            if !is_blank_or_comment(trimmed) {
                let (key, value) = trimmed.split_once('=').ok_or_else(|| {
                    ParseError::new(lineno, format!("expected 'key=value', found {trimmed:?}"))
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(ParseError::new(lineno, "option with an empty key"));
                }
                section.upsert(key.to_string(), value.trim().to_string());
            }
            if let Some(raw) = section.raw.as_mut() {
                raw.body.push(line.to_string());
            }
        }

        if !text.is_empty() && !text.ends_with('\n') {
            match current.and_then(|idx| config.sections[idx].raw.as_mut()) {
                Some(raw) => raw.unterminated = true,
                None => config.preamble_unterminated = true,
            }
        }

        Ok(config)
    }

    /// Renders the file text using the line ending the file was read with.
    pub fn render(&self) -> String {
        let eol = self.format.line_ending.as_str();
        let mut writer = LineWriter::new(eol);
        // Where the output stands right after the source's final, unterminated line.
        let mut unterminated_end = None;

        for line in &self.preamble {
            writer.line(line);
        }
        if self.preamble_unterminated {
            unterminated_end = Some(writer.out.len());
        }

        for section in &self.sections {
            match &section.raw {
                Some(raw) => {
                    writer.line(&raw.header);
                    for line in &raw.body {
                        writer.line(line);
                    }
                    if raw.unterminated {
                        unterminated_end = Some(writer.out.len());
                    }
                }
                None => {
                    if !writer.previous_blank {
                        writer.line("");
                    }
                    writer.line(&format!("[{}]", section.name));
                    for (key, value) in &section.options {
                        writer.line(&format!("{key}={value}"));
                    }
                    writer.line("");
                }
            }
        }

        let mut out = writer.out;
        if unterminated_end == Some(out.len()) {
            out.truncate(out.len() - eol.len());
        }
        out
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    pub fn set_format(&mut self, format: TextFormat) {
        self.format = format;
    }

    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    pub fn profile(&self, name: &str) -> Option<&SandboxProfile> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn profile_mut(&mut self, name: &str) -> Option<&mut SandboxProfile> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Sets the options of `name`, replacing any it had. An existing section
    /// keeps its place in the file; a new one is appended. A rejected name or
    /// option leaves the config unchanged.
    pub fn insert<I, K, V>(&mut self, name: &str, options: I) -> Result<(), EntryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        match self.profile_mut(name) {
            Some(profile) => profile.replace_options(options),
            None => {
                let profile = SandboxProfile::new(name, options)?;
                self.sections.push(profile);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<SandboxProfile> {
        let idx = self.position(name)?;
        Some(self.sections.remove(idx))
    }

    /// Every section name, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn profiles(&self) -> impl Iterator<Item = &SandboxProfile> {
        self.sections.iter()
    }

    /// Sections describing sandboxes, in file order.
    pub fn boxes(&self) -> impl Iterator<Item = &SandboxProfile> {
        self.sections.iter().filter(|s| s.is_box())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }
}

fn is_blank_or_comment(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// `[name]` with anything after the last `]` ignored.
fn parse_header(trimmed: &str, lineno: usize) -> Result<Option<&str>, ParseError> {
    if !trimmed.starts_with('[') {
        return Ok(None);
    }
    let Some(close) = trimmed.rfind(']') else {
        return Err(ParseError::new(lineno, "unterminated section header"));
    };
    let name = &trimmed[1..close];
    if name.is_empty() {
        return Err(ParseError::new(lineno, "empty section name"));
    }
    Ok(Some(name))
}

struct LineWriter<'a> {
    out: String,
    eol: &'a str,
    previous_blank: bool,
}

impl<'a> LineWriter<'a> {
    fn new(eol: &'a str) -> Self {
        Self {
            out: String::new(),
            eol,
            previous_blank: true,
        }
    }

    fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push_str(self.eol);
        self.previous_blank = line.trim().is_empty();
    }
}
