use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(response), Some(Value::Object(data))) = (response.as_object_mut(), data) {
                response.extend(data);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a data payload: pretty JSON in json mode, one line per item in
/// text mode when the caller supplies lines.
pub fn output_listing(
    output_format: &OutputFormat,
    header: &str,
    lines: Vec<String>,
    payload: Value,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            println!("{}", header);
            for line in lines {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}
