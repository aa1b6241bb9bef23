use std::io::Write;

/// Append a `key=value` pair to the file named by `$GITHUB_OUTPUT`.
///
/// When the variable is unset (local runs), the pair is logged instead so
/// the value is still visible for debugging.
pub fn set_output(key: &str, value: &str) -> std::io::Result<()> {
    match std::env::var("GITHUB_OUTPUT") {
        Ok(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            writeln!(file, "{}={}", key, value)?;
        }
        Err(_) => {
            tracing::info!(key, value, "GITHUB_OUTPUT not set, skipping output file");
        }
    }
    Ok(())
}
