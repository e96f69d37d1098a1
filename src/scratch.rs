use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// A temporary file used to hand a document's text to the external formatter
/// via a path argument.
///
/// The formatter rewrites this file in place; the owner reads it back after
/// the process exits. The file lives in the system temporary directory and is
/// removed when this value is dropped, on every termination path. Removal
/// errors are ignored.
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// The name carries a randomized component so that concurrent saves of
    /// different documents never hand the formatter the same path.
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("phpcbf-")
            .suffix(".php")
            .rand_bytes(10)
            .tempfile()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read_back(&self) -> std::io::Result<String> {
        std::fs::read_to_string(self.file.path())
    }
}

#[cfg(test)]
mod test_scratch {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::ScratchFile;

    #[test]
    fn content_is_written_verbatim() -> anyhow::Result<()> {
        let content = "<?php echo  'a';";
        let scratch = ScratchFile::with_content(content)?;
        assert_eq!(scratch.read_back()?, content);
        assert_eq!(scratch.path().extension().and_then(|s| s.to_str()), Some("php"));
        Ok(())
    }

    #[test]
    fn file_is_removed_on_drop() -> anyhow::Result<()> {
        let scratch = ScratchFile::with_content("<?php\n")?;
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn names_never_collide_across_concurrent_invocations() {
        let paths: Mutex<HashSet<PathBuf>> = Mutex::new(HashSet::new());
        std::thread::scope(|scope| {
            for _ in 0..10 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let scratch = ScratchFile::with_content("<?php\n").unwrap();
                        paths
                            .lock()
                            .unwrap()
                            .insert(scratch.path().to_path_buf());
                    }
                });
            }
        });
        assert_eq!(paths.lock().unwrap().len(), 1000);
    }
}
