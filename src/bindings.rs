/// Replace every occurrence of `token` with sequential binding indices, starting at 0,
/// left to right and top to bottom. Returns the number of indices handed out.
///
/// Preprocessor lines and the lines of a `\`-continued macro are left alone.
pub fn allocate_bindings(lines: &mut [String], token: &str) -> usize {
    let mut next_binding = 0;
    let mut in_macro = false;

    for line in lines.iter_mut() {
        if line.trim_start().starts_with('#') || in_macro {
            in_macro = line.trim_end().ends_with('\\');
            continue;
        }

        if token.is_empty() || !line.contains(token) {
            continue;
        }

        let mut replaced = String::with_capacity(line.len());
        let mut last = 0;
        for (start, _) in line.match_indices(token) {
            replaced.push_str(&line[last..start]);
            replaced.push_str(&next_binding.to_string());
            next_binding += 1;
            last = start + token.len();
        }
        replaced.push_str(&line[last..]);
        *line = replaced;
    }

    next_binding
}

/// [`allocate_bindings`] over a whole text; line breaks are preserved exactly.
pub fn allocate_bindings_in_text(text: &str, token: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    allocate_bindings(&mut lines, token);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOKEN: &str = "auto_bind";

    #[test]
    fn sequential_indices() {
        let text = "layout(binding = auto_bind) uniform A a;\nlayout(binding = auto_bind) uniform B b;\n";
        assert_eq!(
            allocate_bindings_in_text(text, TOKEN),
            "layout(binding = 0) uniform A a;\nlayout(binding = 1) uniform B b;\n"
        );
    }

    #[test]
    fn every_occurrence_counts() {
        assert_eq!(
            allocate_bindings_in_text("auto_bind auto_bind\nauto_bind", TOKEN),
            "0 1\n2"
        );
    }

    #[test]
    fn skips_macro_continuations() {
        let text = "#define DECL(n) \\\n    layout(binding = auto_bind) uniform n \\\n    auto_bind\nlayout(binding = auto_bind) uniform C c;";
        assert_eq!(
            allocate_bindings_in_text(text, TOKEN),
            "#define DECL(n) \\\n    layout(binding = auto_bind) uniform n \\\n    auto_bind\nlayout(binding = 0) uniform C c;"
        );
    }

    #[test]
    fn preprocessor_lines_untouched() {
        assert_eq!(
            allocate_bindings_in_text("#define SLOT auto_bind\nauto_bind", TOKEN),
            "#define SLOT auto_bind\n0"
        );
    }

    #[test]
    fn continuation_with_trailing_whitespace() {
        assert_eq!(
            allocate_bindings_in_text("#define X \\  \nauto_bind\nauto_bind", TOKEN),
            "#define X \\  \nauto_bind\n0"
        );
    }

    #[test]
    fn count_returned() {
        let mut lines = vec!["auto_bind".to_string(), "x".to_string(), "auto_bind".to_string()];
        assert_eq!(allocate_bindings(&mut lines, TOKEN), 2);
        assert_eq!(lines, vec!["0", "x", "1"]);
    }

    fn shader_line() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("layout(binding = auto_bind) uniform sampler2D tex;".to_string()),
            Just("#define DECL \\".to_string()),
            Just("    auto_bind \\".to_string()),
            Just("#version 450".to_string()),
            Just(String::new()),
            "[a-z_ ]{0,20}",
        ]
    }

    proptest! {
        #[test]
        fn allocation_is_idempotent(lines in prop::collection::vec(shader_line(), 0..32)) {
            let text = lines.join("\n");
            let once = allocate_bindings_in_text(&text, TOKEN);
            let twice = allocate_bindings_in_text(&once, TOKEN);
            prop_assert_eq!(once, twice);
        }
    }
}
