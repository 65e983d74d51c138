use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Store the message timestamp so the next run updates the same message.
pub fn persist_timestamp(path: &Path, ts: &str) -> Result<()> {
    fs::write(path, ts).map_err(|source| Error::WriteTimestamp {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(file = %path.display(), ts, "Saved message timestamp");
    Ok(())
}

/// Workflow command understood by the GitHub Actions runner.
pub fn output_line(ts: &str) -> String {
    format!("::set-output name=TIMESTAMP::{ts}")
}

/// Append `TIMESTAMP=<ts>` to the runner's `$GITHUB_OUTPUT` file.
pub fn append_github_output(path: &Path, ts: &str) -> Result<()> {
    let write_err = |source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    writeln!(file, "TIMESTAMP={ts}").map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn timestamp_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ts");

        persist_timestamp(&file, "1589146397.007200").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "1589146397.007200");

        persist_timestamp(&file, "1589146400.000100").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "1589146400.000100");
    }

    #[test]
    fn unwritable_timestamp_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = persist_timestamp(dir.path(), "1").unwrap_err();
        assert_matches!(err, Error::WriteTimestamp { .. });
    }

    #[test]
    fn set_output_line() {
        assert_eq!(
            output_line("1589146397.007200"),
            "::set-output name=TIMESTAMP::1589146397.007200"
        );
    }

    #[test]
    fn github_output_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("output");
        fs::write(&file, "OTHER=1\n").unwrap();

        append_github_output(&file, "1589146397.007200").unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "OTHER=1\nTIMESTAMP=1589146397.007200\n"
        );
    }
}
