//! Turns captured script output into a response body.

use crate::runner::ScriptOutput;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Script exited non-zero (or was killed).
    #[error("{}", execution_message(.exit_code, .stderr))]
    Execution {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Script succeeded but stdout is not a JSON document.
    #[error("Failed to parse JSON from script. Output was: {raw}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TranslateError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TranslateError::Execution { exit_code, .. } => *exit_code,
            TranslateError::Parse { .. } => None,
        }
    }
}

fn execution_message(exit_code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match exit_code {
        Some(code) => format!("Script exited with status {code} and no error output"),
        None => "Script was terminated by a signal".to_string(),
    }
}

/// Parse a finished script's stdout.
///
/// PowerShell may prefix output with a UTF-8 byte order mark; it is stripped
/// along with surrounding whitespace before parsing.
pub fn translate(output: ScriptOutput) -> Result<Value, TranslateError> {
    if !output.success {
        return Err(TranslateError::Execution {
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }

    let body = output.stdout.trim_start_matches('\u{feff}').trim();
    serde_json::from_str(body).map_err(|source| TranslateError::Parse {
        raw: output.stdout.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_object() {
        let value = translate(ScriptOutput::success(
            r#"{"status":"success","metrics":{"totalMemoryGB":16}}"#,
        ))
        .unwrap();
        assert_eq!(value["metrics"]["totalMemoryGB"], json!(16));
    }

    #[test]
    fn strips_bom_and_whitespace() {
        let value = translate(ScriptOutput::success("\u{feff}\r\n{\"ok\": true}\r\n")).unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn non_json_output_embeds_raw_text() {
        let err = translate(ScriptOutput::success("WARNING: something odd")).unwrap_err();
        assert!(matches!(err, TranslateError::Parse { .. }));
        assert!(err.to_string().contains("WARNING: something odd"));
    }

    #[test]
    fn empty_output_is_a_parse_failure() {
        let err = translate(ScriptOutput::success("")).unwrap_err();
        assert!(matches!(err, TranslateError::Parse { .. }));
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let err = translate(ScriptOutput::failure(1, "disk full\n")).unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn non_zero_exit_without_stderr_mentions_status() {
        let err = translate(ScriptOutput::failure(7, "")).unwrap_err();
        assert!(err.to_string().contains("status 7"));
    }

    #[test]
    fn failure_ignores_stdout_even_if_json() {
        let mut out = ScriptOutput::failure(2, "boom");
        out.stdout = r#"{"status":"success"}"#.to_string();
        assert!(matches!(translate(out), Err(TranslateError::Execution { .. })));
    }
}
