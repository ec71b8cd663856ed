use std::collections::HashMap;
use std::sync::Arc;

use crate::diagnostics::{self, remap_diagnostics};
use crate::{RemapOptions, SourceFile};

/// Where the lines of a record were taken from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RecordKind {
    /// Lines of a named (or default) section; offsets are relative to the section header
    Section,

    /// Raw text pasted in whole, such as a fragment or the header; offsets are file lines
    Raw,
}

/// A contiguous run of lines in the composed text, pointing back at its origin
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompositionRecord {
    /// Resolved path of the file the lines came from; empty for the editor buffer
    pub origin_file: String,

    /// Section the lines came from; empty for the default section and raw text
    pub origin_section: String,

    /// First composed line (0-based) covered by this record
    pub global_start: usize,

    /// One past the last composed line covered by this record
    pub global_end: usize,

    /// Position of the first line within the section as authored, starting at 1
    pub section_local_offset: usize,

    pub kind: RecordKind,
}

impl CompositionRecord {
    pub fn contains(&self, global_line: usize) -> bool {
        (self.global_start..self.global_end).contains(&global_line)
    }

    pub fn len(&self) -> usize {
        self.global_end - self.global_start
    }

    pub fn is_empty(&self) -> bool {
        self.global_start == self.global_end
    }
}

/// Origin of a single composed line
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedLocation {
    pub origin_file: String,
    pub origin_line: usize,
}

impl ResolvedLocation {
    /// File name fit for display; the editor buffer has no path of its own.
    pub fn display_file(&self) -> &str {
        if self.origin_file.is_empty() {
            "editor buffer"
        } else {
            &self.origin_file
        }
    }
}

/// Lines and records built up while composing; global line numbers are indices into `lines`.
#[derive(Default, Debug)]
pub(crate) struct Composition {
    pub lines: Vec<String>,
    pub records: Vec<CompositionRecord>,
}

impl Composition {
    pub fn next_global_line(&self) -> usize {
        self.lines.len()
    }

    /// Append one line, extending the last record when the line directly follows it
    /// in the same origin; otherwise a new record is started.
    pub fn push_line(
        &mut self,
        line: &str,
        origin_file: &str,
        origin_section: &str,
        section_local_offset: usize,
        kind: RecordKind,
    ) {
        let global = self.next_global_line();
        self.lines.push(line.to_string());

        if let Some(last) = self.records.last_mut() {
            let continues_run = last.global_end == global
                && last.kind == kind
                && last.origin_file == origin_file
                && last.origin_section == origin_section
                && last.section_local_offset + last.len() == section_local_offset;

            if continues_run {
                last.global_end += 1;
                return;
            }
        }

        self.records.push(CompositionRecord {
            origin_file: origin_file.to_string(),
            origin_section: origin_section.to_string(),
            global_start: global,
            global_end: global + 1,
            section_local_offset,
            kind,
        });
    }

    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// Output of one composition run
#[derive(Clone, Debug, Default)]
pub struct ComposedResult {
    /// Composed text; empty when the run failed
    pub text: String,

    /// Records partitioning the composed lines, ordered by `global_start`
    pub records: Vec<CompositionRecord>,

    /// One line per failure encountered during the run
    pub error_log: String,

    main_file: Arc<SourceFile>,
    files: HashMap<String, Arc<SourceFile>>,
}

impl ComposedResult {
    pub(crate) fn new(
        composition: Composition,
        main_file: Arc<SourceFile>,
        files: HashMap<String, Arc<SourceFile>>,
    ) -> Self {
        Self {
            text: composition.text(),
            records: composition.records,
            error_log: String::new(),
            main_file,
            files,
        }
    }

    pub(crate) fn failed(error_log: String) -> Self {
        Self {
            error_log,
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_log.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.records.last().map_or(0, |record| record.global_end)
    }

    /// Header line of the record's section within its file; 0 for raw records.
    pub fn section_start_line(&self, record: &CompositionRecord) -> usize {
        match record.kind {
            RecordKind::Raw => 0,
            RecordKind::Section => self
                .files
                .get(&record.origin_file)
                .unwrap_or(&self.main_file)
                .section(&record.origin_section)
                .map_or(0, |section| section.line_start),
        }
    }

    /// Find the authored location of a 0-based composed line.
    pub fn locate(&self, global_line: usize) -> Option<ResolvedLocation> {
        diagnostics::locate(&self.records, global_line, |record| {
            self.section_start_line(record)
        })
    }

    /// Rewrite compiler output so diagnostics point at authored files and lines.
    pub fn remap_diagnostics(&self, compiler_output: &str, options: &RemapOptions) -> String {
        remap_diagnostics(compiler_output, options, |line| self.locate(line))
    }
}
