use anyhow::Result;
use designtok_types::ComponentAnalysis;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize the record verbatim. `indent == 0` gives compact output.
pub fn render_json(analysis: &ComponentAnalysis, indent: usize) -> Result<String> {
    let mut buf = Vec::new();
    if indent == 0 {
        serde_json::to_writer(&mut buf, analysis)?;
    } else {
        let pad = " ".repeat(indent);
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(pad.as_bytes()));
        analysis.serialize(&mut ser)?;
    }
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}
