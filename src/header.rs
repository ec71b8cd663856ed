use crate::composition::Composition;
use crate::{CompositionRecord, RecordKind};

/// Preamble every composed shader starts with for the Vulkan GLSL toolchain.
pub const GLSL_450_HEADER: &str = "#version 450\n\
#extension GL_ARB_separate_shader_objects : enable\n\
#extension GL_ARB_shading_language_420pack : enable\n\
#define SHADER_API 450\n";

/// Where the boilerplate header comes from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HeaderSource {
    /// File relative to the engine directory
    File(String),

    /// Text held in memory; `name` stands in for a file name in diagnostics
    Inline { name: String, text: String },
}

impl HeaderSource {
    pub fn glsl_450() -> Self {
        HeaderSource::Inline {
            name: "glsl_450_header".to_string(),
            text: GLSL_450_HEADER.to_string(),
        }
    }
}

/// Prepend `text` to the composition, shifting all existing records down by its line count.
/// Returns that line count.
pub(crate) fn inject_header(composition: &mut Composition, origin_file: &str, text: &str) -> usize {
    let header_lines: Vec<String> = text.lines().map(str::to_string).collect();
    let height = header_lines.len();
    if height == 0 {
        return 0;
    }

    for record in composition.records.iter_mut() {
        record.global_start += height;
        record.global_end += height;
    }

    composition.records.insert(
        0,
        CompositionRecord {
            origin_file: origin_file.to_string(),
            origin_section: String::new(),
            global_start: 0,
            global_end: height,
            section_local_offset: 1,
            kind: RecordKind::Raw,
        },
    );
    composition.lines.splice(0..0, header_lines);

    height
}
