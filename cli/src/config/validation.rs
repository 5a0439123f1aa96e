//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "MONO_OUTPUT_SIZE" => validate_int_range(value, 16, 8192)?,
        "MONO_DISPLAY_SIZE" => validate_int_range(value, 16, 8192)?,
        "MONO_THRESHOLD" => validate_int_range(value, 0, 255)?,
        "MONO_BRUSH_SIZE" => validate_int_range(value, 1, 100)?,
        "MONO_PAN_STEP" => validate_int_range(value, 1, 10_000)?,
        "MONO_TICK_MS" => validate_int_range(value, 1, 1000)?,
        "MONO_EXPORT_DIR" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "MONO_FIT_TO_WIDTH")
}
