//! Text helpers shared by the emitters.

use msggen_core::OutputConfig;

/// Comment syntax of the file being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommentStyle {
    /// `/* ... */`, used for C and C++.
    Block,
    /// `# ...`, used for CMake.
    Hash,
}

const GENERATED_NOTICE: &str = "Generated by msggen. Do not edit.";

/// File header: name, generated notice and the configured banner.
pub(crate) fn preamble(config: &OutputConfig, file: &str, style: CommentStyle) -> String {
    let mut lines = vec![file.to_string(), String::new(), GENERATED_NOTICE.to_string()];
    if let Some(banner) = &config.banner {
        lines.push(String::new());
        lines.extend(banner.lines().map(str::to_string));
    }

    let mut out = String::new();
    match style {
        CommentStyle::Block => {
            out.push_str("/*\n");
            for line in &lines {
                if line.is_empty() {
                    out.push_str(" *\n");
                } else {
                    out.push_str(&format!(" * {line}\n"));
                }
            }
            out.push_str(" */\n\n");
        }
        CommentStyle::Hash => {
            for line in &lines {
                if line.is_empty() {
                    out.push_str("#\n");
                } else {
                    out.push_str(&format!("# {line}\n"));
                }
            }
            out.push('\n');
        }
    }
    out
}

/// `#include "..."` lines for the declared includes.
pub(crate) fn user_includes(includes: &[String]) -> String {
    includes
        .iter()
        .map(|path| format!("#include \"{path}\"\n"))
        .collect()
}

/// Python-style `hex()`: lowercase, `0x` prefix, no padding.
pub(crate) fn hex_literal(value: impl Into<u32>) -> String {
    format!("{:#x}", value.into())
}

/// CMake variable fragment for an interface name.
pub(crate) fn cmake_var(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
