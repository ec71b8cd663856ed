//! Compilers only ever see the composed text, so their diagnostics reference lines of
//! a single synthetic file. This module maps those lines back through the
//! [`CompositionRecord`]s of a run and rewrites each diagnostic to name the authored
//! file and line instead.
//!
//! Recognized diagnostics look like `ERROR: <synthetic name>:<line>:<message>`, which is
//! what `glslangValidator` prints. Everything else passes through untouched.

use regex::{Captures, Regex};

use crate::{CompositionRecord, RemapOptions, ResolvedLocation};

lazy_static::lazy_static! {
    static ref DIAGNOSTIC_RE: Regex = Regex::new(r"(?m)^ERROR:\s*(.*?):(\d+)(:.*)$").unwrap();
}

/// Find the record covering `global_line` and turn it into an authored location.
///
/// `section_start_line` supplies the header line of the record's section; raw records use 0.
pub fn locate(
    records: &[CompositionRecord],
    global_line: usize,
    section_start_line: impl Fn(&CompositionRecord) -> usize,
) -> Option<ResolvedLocation> {
    let record = records.iter().find(|record| record.contains(global_line))?;

    Some(ResolvedLocation {
        origin_file: record.origin_file.clone(),
        origin_line: global_line - record.global_start
            + record.section_local_offset
            + section_start_line(record),
    })
}

/// Rewrite `compiler_output` using `records`.
///
/// `section_start_line` supplies the header line of each record's section, as for [`locate`];
/// [`ComposedResult::section_start_line`](crate::ComposedResult::section_start_line) fits here.
pub fn remap(
    compiler_output: &str,
    records: &[CompositionRecord],
    options: &RemapOptions,
    section_start_line: impl Fn(&CompositionRecord) -> usize,
) -> String {
    remap_diagnostics(compiler_output, options, |line| {
        locate(records, line, &section_start_line)
    })
}

pub(crate) fn remap_diagnostics(
    compiler_output: &str,
    options: &RemapOptions,
    locate: impl Fn(usize) -> Option<ResolvedLocation>,
) -> String {
    let rewrite = |captures: &Captures| -> String {
        if captures[1] != options.synthetic_name {
            return captures[0].to_string();
        }

        let reported = match captures[2].parse::<i64>() {
            Ok(line) => line,
            Err(_) => return captures[0].to_string(),
        };

        let location = reported
            .checked_sub(options.line_correction)
            .and_then(|line| usize::try_from(line).ok())
            .and_then(&locate);

        match location {
            Some(location) => format!(
                "ERROR: {}(line: {}, global: {}){}",
                location.display_file(),
                location.origin_line,
                reported,
                &captures[3]
            ),
            None => captures[0].to_string(),
        }
    };

    DIAGNOSTIC_RE
        .replace_all(compiler_output, rewrite)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordKind;

    fn editor_record(global_start: usize, global_end: usize) -> CompositionRecord {
        CompositionRecord {
            origin_file: String::new(),
            origin_section: String::new(),
            global_start,
            global_end,
            section_local_offset: 1,
            kind: RecordKind::Section,
        }
    }

    #[test]
    fn rewrites_matching_line() {
        let records = vec![editor_record(0, 5)];
        let options = RemapOptions::new("combined");

        assert_eq!(
            remap("ERROR: combined:8:syntax error", &records, &options, |_| 0),
            "ERROR: editor buffer(line: 5, global: 8):syntax error"
        );
    }

    #[test]
    fn passes_through_unmatched() {
        let records = vec![editor_record(0, 5)];
        let options = RemapOptions::new("combined");

        let output = "WARNING: something\nERROR: other.glsl:8:nope\nERROR: combined:40:out of range\nERROR: combined:2:before start\n";
        assert_eq!(remap(output, &records, &options, |_| 0), output);
    }

    #[test]
    fn only_error_lines_change() {
        let records = vec![
            editor_record(0, 2),
            CompositionRecord {
                origin_file: "/shaders/common.glsl".to_string(),
                origin_section: "Lighting".to_string(),
                global_start: 2,
                global_end: 6,
                section_local_offset: 3,
                kind: RecordKind::Section,
            },
        ];
        let options = RemapOptions::new("C:\\tmp\\temp_shader.tempcode");

        let output = "C:\\tmp\\temp_shader.tempcode\nERROR: C:\\tmp\\temp_shader.tempcode:7:'x' : undeclared identifier\n1 compilation errors.";
        assert_eq!(
            remap(output, &records, &options, |_| 0),
            "C:\\tmp\\temp_shader.tempcode\nERROR: /shaders/common.glsl(line: 4, global: 7):'x' : undeclared identifier\n1 compilation errors."
        );
    }

    #[test]
    fn overflowing_correction_passes_through() {
        let records = vec![editor_record(0, 5)];
        let options = RemapOptions::new("combined").with_line_correction(-10);

        let output = "ERROR: combined:9223372036854775800:huge";
        assert_eq!(remap(output, &records, &options, |_| 0), output);
    }

    #[test]
    fn section_start_is_applied() {
        let records = vec![CompositionRecord {
            origin_file: "lib.glsl".to_string(),
            origin_section: "Brdf".to_string(),
            global_start: 0,
            global_end: 3,
            section_local_offset: 1,
            kind: RecordKind::Section,
        }];
        let options = RemapOptions::new("combined").with_line_correction(0);

        assert_eq!(
            remap("ERROR: combined:1:bad", &records, &options, |_| 10),
            "ERROR: lib.glsl(line: 12, global: 1):bad"
        );
    }

    #[test]
    fn configurable_correction() {
        let records = vec![editor_record(0, 5)];
        let options = RemapOptions::new("combined").with_line_correction(1);

        assert_eq!(
            remap("ERROR: combined:1:oops", &records, &options, |_| 0),
            "ERROR: editor buffer(line: 1, global: 1):oops"
        );
    }
}
