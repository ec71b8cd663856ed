use std::collections::HashMap;

/// A named block of source within one file, delimited by `[Name]` headers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Section {
    /// Section name; empty for the implicit default section
    pub name: String,

    /// Section text with annotation lines removed, one `\n` after every line
    pub content: String,

    /// Line of the `[Name]` header in the owning file, or 0 for the default section.
    /// Content line `i` (1-based) of an unannotated section sits at `line_start + i`.
    pub line_start: usize,

    /// Last authored line belonging to the section; `line_end - line_start` is its line count
    pub line_end: usize,

    /// Authored file line of every line in `content`, in order
    pub source_lines: Vec<usize>,
}

impl Section {
    fn new(name: String, line_start: usize) -> Self {
        Self {
            name,
            content: String::new(),
            line_start,
            line_end: line_start,
            source_lines: Vec::new(),
        }
    }

    /// Content lines paired with the line they were authored on.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.source_lines
            .iter()
            .copied()
            .zip(self.content.lines())
    }

    pub fn line_count(&self) -> usize {
        self.line_end - self.line_start
    }
}

/// A parsed file. An empty `path` denotes the editor buffer rather than a real file.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SourceFile {
    pub path: String,
    pub sections: HashMap<String, Section>,
}

impl SourceFile {
    pub fn parse(path: impl Into<String>, text: &str) -> Self {
        Self {
            path: path.into(),
            sections: parse_sections(text),
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub(crate) fn is_annotation(line: &str) -> bool {
    line.starts_with('@')
}

fn section_header(line: &str) -> Option<&str> {
    line.trim_end()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}

/// Split `text` into sections keyed by name.
///
/// Text before the first header is discarded once any header exists; text without any
/// header becomes the default section under the empty key. Lines starting with `@` are
/// left out of the content but still count towards line numbers.
/// A repeated section name replaces the earlier section.
pub fn parse_sections(text: &str) -> HashMap<String, Section> {
    let mut sections = HashMap::new();
    let mut current = Section::new(String::new(), 0);
    let mut saw_header = false;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(name) = section_header(line) {
            if saw_header {
                sections.insert(current.name.clone(), current);
            }
            saw_header = true;
            current = Section::new(name.to_string(), line_no);
            continue;
        }

        current.line_end = line_no;
        if is_annotation(line) {
            continue;
        }

        current.content.push_str(line);
        current.content.push('\n');
        current.source_lines.push(line_no);
    }

    if saw_header || !current.source_lines.is_empty() {
        sections.insert(current.name.clone(), current);
    }

    sections
}
