// src/cli.rs

use clap::Parser;
use std::error::Error;
use std::io::{self, Write};

use log::info;

use crate::loader::{load_artifacts, LoadError};
use crate::pipeline::PredictionError;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Score the sentiment of one or more sentences", long_about = None)]
pub struct CliArgs {
    #[clap(long, value_parser)]
    pub metadata_path: String,
    #[clap(long, value_parser)]
    pub model_path: String,
    /// Text to score. Repeat the flag to score several sentences.
    #[clap(long = "text", value_parser, required = true)]
    pub texts: Vec<String>,
    /// Also print the shaped index sequence given to the classifier.
    #[clap(long)]
    pub show_sequence: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("failed to load model: {0}")]
    Load(#[from] LoadError),
    #[error("prediction failed for {text:?}")]
    Prediction {
        text: String,
        #[source]
        source: PredictionError,
    },
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Scores every `--text` and writes one `score<TAB>text` line per input.
pub fn run<W: Write>(args: &CliArgs, out: &mut W) -> Result<(), CliError> {
    let context = load_artifacts(&args.metadata_path, &args.model_path)?;
    info!("Scoring {} text(s)", args.texts.len());

    for text in &args.texts {
        if args.show_sequence {
            let encoded = context.encode(text);
            writeln!(out, "sequence\t{:?}", encoded.row(0).to_vec())?;
        }
        let score = context.predict(text).map_err(|source| CliError::Prediction {
            text: text.clone(),
            source,
        })?;
        writeln!(out, "{:.4}\t{}", score, text)?;
    }
    Ok(())
}

pub fn run_cli() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run(&args, &mut handle)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    // "good" -> 1 + 3 = 4, "bad" -> 2 + 3 = 5, unknown -> 2.
    const METADATA: &str =
        r#"{"word_index": {"good": 1, "bad": 2}, "index_from": 3, "vocabulary_size": 5, "max_len": 3}"#;
    const MODEL: &str = r#"{
        "embedding": [[0.0], [0.0], [0.0], [0.0], [4.0], [-4.0]],
        "dense": [1.0],
        "bias": 0.0
    }"#;

    fn args(metadata: &NamedTempFile, model: &NamedTempFile, extra: &[&str]) -> CliArgs {
        let mut argv = vec![
            "sentiment_cli",
            "--metadata-path",
            metadata.path().to_str().unwrap(),
            "--model-path",
            model.path().to_str().unwrap(),
        ];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_cli_scores_each_text() {
        let metadata = write_temp(METADATA);
        let model = write_temp(MODEL);
        let args = args(&metadata, &model, &["--text", "Good!", "--text", "bad"]);

        let mut out = Vec::<u8>::new();
        run(&args, &mut out).unwrap();
        let lines: Vec<String> = String::from_utf8(out).unwrap().lines().map(str::to_string).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "0.9820\tGood!");
        assert_eq!(lines[1], "0.0180\tbad");
    }

    #[test]
    fn test_cli_show_sequence() {
        let metadata = write_temp(METADATA);
        let model = write_temp(MODEL);
        let args = args(&metadata, &model, &["--text", "so very good", "--show-sequence"]);

        let mut out = Vec::<u8>::new();
        run(&args, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("sequence\t[2, 2, 4]\n"));
    }

    #[test]
    fn test_cli_reports_load_failure() {
        let metadata = write_temp(METADATA);
        let args = CliArgs::parse_from([
            "sentiment_cli",
            "--metadata-path",
            metadata.path().to_str().unwrap(),
            "--model-path",
            "missing.json",
            "--text",
            "good",
        ]);

        let err = run(&args, &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, CliError::Load(LoadError::NotFound(_))));
    }

    #[test]
    fn test_cli_requires_text() {
        let result = CliArgs::try_parse_from(["sentiment_cli", "--metadata-path", "m.json", "--model-path", "w.json"]);
        assert!(result.is_err());
    }
}
