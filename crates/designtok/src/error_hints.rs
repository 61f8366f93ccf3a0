use anyhow::Error;
use designtok_types::{DesignTokError, ErrorCode};

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    let code = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<DesignTokError>())
        .map(|e| e.code);
    match code {
        Some(ErrorCode::MalformedInput) => {
            push_hint(
                &mut out,
                "Export the component node again; every node needs a unique id.",
            );
            push_hint(
                &mut out,
                "Raise `--max-depth` (at most 256) if the tree is deep but otherwise valid.",
            );
        }
        Some(ErrorCode::InvalidJson) => {
            push_hint(&mut out, "Check the file named in the error is valid JSON.");
            push_hint(
                &mut out,
                "Token tables in `$value` form need `--tokens-format dtcg`.",
            );
        }
        Some(ErrorCode::InvalidSettings) => {
            push_hint(
                &mut out,
                "Check `designtok.toml` key names and value ranges.",
            );
        }
        _ => {}
    }

    let haystack = err
        .chain()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
        .to_ascii_lowercase();
    if haystack.contains("no such file or directory") || haystack.contains("failed to read") {
        push_hint(&mut out, "Verify the input path exists and is readable.");
    }
    if haystack.contains("failed to write") || haystack.contains("permission denied") {
        push_hint(
            &mut out,
            "Check the output directory is writable and not a regular file.",
        );
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}
