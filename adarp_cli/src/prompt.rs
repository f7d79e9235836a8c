use std::{
    io::{BufRead, Write},
    num::NonZeroUsize,
    path::PathBuf,
};

use crate::{
    error::BatchError,
    preflight::{ensure_directories, ensure_files},
};

/// Instances and run count picked through the interactive menu.
#[derive(Debug, PartialEq)]
pub struct Selection {
    pub instances: Vec<PathBuf>,
    pub runs: NonZeroUsize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Files,
    Directories,
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String, anyhow::Error> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(BatchError::UnexpectedEof.into());
    }

    Ok(String::from(line.trim()))
}

fn parse_mode(answer: &str) -> Result<Mode, BatchError> {
    match answer {
        "a" | "A" => Ok(Mode::Files),
        "b" | "B" => Ok(Mode::Directories),
        other => Err(BatchError::InvalidOption(String::from(other))),
    }
}

/// A positive integer without sign or leading zeros.
pub fn parse_runs(answer: &str) -> Result<NonZeroUsize, BatchError> {
    let invalid = || BatchError::InvalidRuns(String::from(answer));

    if answer.is_empty()
        || answer.starts_with('0')
        || !answer.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    answer.parse().map_err(|_| invalid())
}

fn parse_paths(answer: &str) -> Vec<PathBuf> {
    answer.split_whitespace().map(PathBuf::from).collect()
}

/// Asks for the instances and the number of runs.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Selection, anyhow::Error> {
    writeln!(output, "(a) Run instance files")?;
    writeln!(output, "(b) Run data sets (directories of instances)")?;
    writeln!(output)?;

    let mode = parse_mode(&read_answer(input, output, "Choose an option: ")?)?;
    let runs = parse_runs(&read_answer(input, output, "\nNumber of runs: ")?)?;

    let instances = match mode {
        Mode::Files => {
            let paths = parse_paths(&read_answer(
                input,
                output,
                "\nEnter instance paths (separate multiple instances with a space): ",
            )?);
            ensure_files(&paths)?;
            paths
        }
        Mode::Directories => {
            let paths = parse_paths(&read_answer(
                input,
                output,
                "\nEnter instance directories (separate multiple data sets with a space): ",
            )?);
            ensure_directories(&paths)?;
            paths
        }
    };

    if instances.is_empty() {
        return Err(BatchError::NoInstances.into());
    }

    Ok(Selection { instances, runs })
}

#[cfg(test)]
mod tests {
    use std::{env, io::Cursor};

    use super::*;

    fn fixture(path: &str) -> String {
        env::current_dir()
            .unwrap()
            .join("tests/fixtures/instances")
            .join(path)
            .display()
            .to_string()
    }

    fn ask_with(answers: &str) -> Result<Selection, anyhow::Error> {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        ask(&mut input, &mut output)
    }

    #[test]
    fn test_parse_runs() {
        assert_eq!(parse_runs("1").unwrap().get(), 1);
        assert_eq!(parse_runs("30").unwrap().get(), 30);

        for invalid in ["", "0", "07", "-3", "+3", "3.5", "ten"] {
            assert!(
                matches!(parse_runs(invalid), Err(BatchError::InvalidRuns(_))),
                "{invalid}"
            );
        }
    }

    #[test]
    fn test_ask_files() {
        let answers = format!(
            "a\n10\n{} {}\n",
            fixture("a2-16.txt"),
            fixture("a2-20.txt")
        );
        let selection = ask_with(&answers).unwrap();

        assert_eq!(selection.runs.get(), 10);
        assert_eq!(
            selection.instances,
            vec![
                PathBuf::from(fixture("a2-16.txt")),
                PathBuf::from(fixture("a2-20.txt"))
            ]
        );
    }

    #[test]
    fn test_ask_directories() {
        let answers = format!("B\n2\n{}\n", fixture("large"));
        let selection = ask_with(&answers).unwrap();

        assert_eq!(selection.instances, vec![PathBuf::from(fixture("large"))]);
    }

    #[test]
    fn test_ask_invalid_option() {
        let error = ask_with("c\n").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<BatchError>(),
            Some(BatchError::InvalidOption(option)) if option == "c"
        ));
    }

    #[test]
    fn test_ask_directory_instead_of_file() {
        let answers = format!("a\n1\n{}\n", fixture("large"));
        let error = ask_with(&answers).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<BatchError>(),
            Some(BatchError::NotAFile(_))
        ));
    }

    #[test]
    fn test_ask_without_paths() {
        let error = ask_with("a\n1\n\n").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<BatchError>(),
            Some(BatchError::NoInstances)
        ));
    }

    #[test]
    fn test_ask_end_of_input() {
        let error = ask_with("a\n").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<BatchError>(),
            Some(BatchError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_prompts_are_written() {
        let mut input = Cursor::new(b"b\n".to_vec());
        let mut output = Vec::new();
        let _ = ask(&mut input, &mut output);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("(a) Run instance files"));
        assert!(text.contains("Number of runs: "));
    }
}
