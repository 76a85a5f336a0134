use std::path::{Path, PathBuf};

use crate::error::{CodegenError, Result};
use crate::recipe::Recipe;

/// Generate one variant file per `(source, output)` pair
///
/// The batch stops at the first I/O error; files generated before the failure
/// are left in place. Returns the written output paths in order.
pub fn process_files<S, O>(recipe: &Recipe, sources: &[S], outputs: &[O]) -> Result<Vec<PathBuf>>
where
    S: AsRef<Path>,
    O: AsRef<Path>,
{
    if sources.len() != outputs.len() {
        return Err(CodegenError::LengthMismatch {
            sources: sources.len(),
            outputs: outputs.len(),
        });
    }

    let mut written = Vec::with_capacity(outputs.len());

    for (source, output) in sources.iter().zip(outputs) {
        let (source, output) = (source.as_ref(), output.as_ref());

        let content = std::fs::read_to_string(source).map_err(|e| CodegenError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;

        std::fs::write(output, recipe.apply(&content)).map_err(|e| CodegenError::Write {
            path: output.to_path_buf(),
            source: e,
        })?;

        tracing::info!(
            recipe = recipe.name,
            source = %source.display(),
            output = %output.display(),
            "generated {} successfully",
            output.display()
        );

        written.push(output.to_path_buf());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::VERTEX;

    #[test]
    fn mismatched_lengths_fail_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.go");

        let err = process_files(&VERTEX, &[dir.path().join("missing.go"), dir.path().join("b.go")], &[&out])
            .unwrap_err();

        assert!(matches!(err, CodegenError::LengthMismatch { sources: 2, outputs: 1 }));
        assert!(!out.exists());
    }

    #[test]
    fn one_output_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let sources = [dir.path().join("a.go"), dir.path().join("b.go")];
        let outputs = [dir.path().join("a_out.go"), dir.path().join("b_out.go")];

        std::fs::write(&sources[0], "package studio\n").unwrap();
        std::fs::write(&sources[1], "package studio\n\nfunc f() {}\n").unwrap();

        let written = process_files(&VERTEX, &sources, &outputs).unwrap();
        assert_eq!(written, outputs.to_vec());

        let first = std::fs::read_to_string(&outputs[0]).unwrap();
        assert!(first.ends_with("package vertex\n"));

        let second = std::fs::read_to_string(&outputs[1]).unwrap();
        assert!(second.ends_with("package vertex\n\nfunc f() {}\n"));
    }

    #[test]
    fn missing_source_halts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.go");
        std::fs::write(&good, "package studio\n").unwrap();

        let sources = [dir.path().join("missing.go"), good];
        let outputs = [dir.path().join("first.go"), dir.path().join("second.go")];

        let err = process_files(&VERTEX, &sources, &outputs).unwrap_err();

        assert!(matches!(err, CodegenError::Read { ref path, .. } if path == &sources[0]));
        assert!(!outputs[1].exists());
    }

    #[test]
    fn unwritable_output_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.go");
        std::fs::write(&source, "package studio\n").unwrap();
        let output = dir.path().join("no-such-dir").join("out.go");

        let err = process_files(&VERTEX, &[&source], &[&output]).unwrap_err();

        assert!(matches!(err, CodegenError::Write { ref path, .. } if path == &output));
    }
}
