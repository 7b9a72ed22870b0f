use std::io::Write;

use serde_json::Value;

use crate::error::CliError;

/// Write `value` to stdout as a single JSON document.
pub fn render(value: &Value, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value, pretty)?;
    handle.flush()?;
    Ok(())
}

fn write_json(writer: &mut impl Write, value: &Value, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_output_is_one_line() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({"Dominos": {"can_deliver": true}}), false).expect("write");

        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "{\"Dominos\":{\"can_deliver\":true}}\n"
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({"a": 1}), true).expect("write");

        assert_eq!(String::from_utf8(buffer).expect("utf8"), "{\n  \"a\": 1\n}\n");
    }
}
