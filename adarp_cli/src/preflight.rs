use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{error::BatchError, file_utils::read_folder};

/// Expands instance paths into the list of instance files to run.
///
/// Files are kept as given, directories are replaced by their files in path
/// order. Any missing path fails the whole batch before a solver is started.
pub fn resolve_instances(paths: &[PathBuf]) -> Result<Vec<PathBuf>, BatchError> {
    let mut instances = Vec::new();

    for path in paths {
        if path.is_file() {
            instances.push(path.clone());
        } else if path.is_dir() {
            let files = read_folder(path).map_err(|_| BatchError::NotADirectory(path.clone()))?;
            debug!("Found {} instances in {:?}", files.len(), path);
            instances.extend(files);
        } else {
            return Err(BatchError::InstanceNotFound(path.clone()));
        }
    }

    if instances.is_empty() {
        return Err(BatchError::NoInstances);
    }

    Ok(instances)
}

pub fn ensure_files(paths: &[PathBuf]) -> Result<(), BatchError> {
    match paths.iter().find(|path| !path.is_file()) {
        Some(path) => Err(BatchError::NotAFile(path.clone())),
        None => Ok(()),
    }
}

pub fn ensure_directories(paths: &[PathBuf]) -> Result<(), BatchError> {
    match paths.iter().find(|path| !path.is_dir()) {
        Some(path) => Err(BatchError::NotADirectory(path.clone())),
        None => Ok(()),
    }
}

/// A program given as a path (`build/e-adarp`) must exist, a bare name is
/// left to the `PATH` lookup.
pub fn ensure_program(program: &Path) -> Result<(), BatchError> {
    if program.components().count() > 1 && !program.is_file() {
        return Err(BatchError::SolverNotFound(program.to_path_buf()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn fixture(path: &str) -> PathBuf {
        env::current_dir()
            .unwrap()
            .join("tests/fixtures/instances")
            .join(path)
    }

    #[test]
    fn test_resolve_files_and_directories() {
        let instances =
            resolve_instances(&[fixture("a2-20.txt"), fixture("large")]).unwrap();

        assert_eq!(
            instances,
            vec![fixture("a2-20.txt"), fixture("large/a4-40.txt")]
        );
    }

    #[test]
    fn test_resolve_missing_path() {
        let result = resolve_instances(&[fixture("a2-16.txt"), fixture("missing.txt")]);

        assert!(matches!(
            result,
            Err(BatchError::InstanceNotFound(path)) if path == fixture("missing.txt")
        ));
    }

    #[test]
    fn test_resolve_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_instances(&[dir.path().to_path_buf()]);

        assert!(matches!(result, Err(BatchError::NoInstances)));
    }

    #[test]
    fn test_ensure_kinds() {
        assert!(ensure_files(&[fixture("a2-16.txt")]).is_ok());
        assert!(matches!(
            ensure_files(&[fixture("large")]),
            Err(BatchError::NotAFile(_))
        ));
        assert!(ensure_directories(&[fixture("large")]).is_ok());
        assert!(matches!(
            ensure_directories(&[fixture("a2-16.txt")]),
            Err(BatchError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_ensure_program() {
        assert!(ensure_program(Path::new("sh")).is_ok());
        assert!(matches!(
            ensure_program(Path::new("build/e-adarp-missing")),
            Err(BatchError::SolverNotFound(_))
        ));
    }
}
