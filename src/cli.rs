//! Minimal CLI: process schema documents → (models | rust)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;

use crate::process::{self, ProcessOutput};
use crate::{codegen, path_de};

// ------------------------------- Types ------------------------------------ //

/// turn JSON Schema documents into a flat model map or Rust data types
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// process and print the simplified model map as JSON
    Models(ModelsOut),
    /// process and emit Rust data types
    Rust(RustOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /components/schemas/Pet)
    #[arg(long)]
    json_pointer: Option<String>,

    /// seed name for the root model
    #[arg(long, default_value = process::DEFAULT_ROOT_NAME)]
    root_name: String,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct CommonSettings {
    /// Debugging: print CLI invocation settings and then terminate
    #[arg(long)]
    no_op: bool,

    /// Debugging: track elapsed time and then print to stderr
    #[arg(long)]
    track_time: bool,

    /// Debugging: disable parallelization
    #[arg(long)]
    no_parallel: bool,
}

#[derive(Args, Debug)]
struct ModelsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    common_settings: CommonSettings,
}

#[derive(Args, Debug)]
struct RustOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    common_settings: CommonSettings,
}

// ---------------------------- Implementation ------------------------------ //

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        let start = std::time::Instant::now();

        let (input_settings, common_settings, out, emit): (_, _, _, fn(&ProcessOutput) -> Result<String>) =
            match &self.cmd {
                Command::Models(target) => (
                    &target.input_settings,
                    &target.common_settings,
                    target.out.as_ref(),
                    emit_models,
                ),
                Command::Rust(target) => (
                    &target.input_settings,
                    &target.common_settings,
                    target.out.as_ref(),
                    emit_rust,
                ),
            };

        if common_settings.no_op {
            let sources = expand_inputs(&input_settings.input)?;
            eprintln!("{self:#?}");
            eprintln!("RESOLVED SOURCES:");
            for source in sources {
                eprintln!("\t- {}", source.display());
            }
            return Ok(());
        }

        let rendered = process_inputs(input_settings, common_settings, emit)?;
        write_output(out, &rendered.join("\n"))?;

        if common_settings.track_time {
            eprintln!("pipeline took {}", format_elapsed(start.elapsed()));
        }
        Ok(())
    }
}

fn emit_models(output: &ProcessOutput) -> Result<String> {
    serde_json::to_string_pretty(&output.models).context("serializing model map")
}

fn emit_rust(output: &ProcessOutput) -> Result<String> {
    let mut cg = codegen::RustRenderer::new();
    cg.render(&output.models);
    Ok(cg.into_string())
}

/// Each input document runs through its own pipeline; runs share no state,
/// so they map in parallel unless disabled.
fn process_inputs(
    input_settings: &InputSettings,
    common_settings: &CommonSettings,
    emit: fn(&ProcessOutput) -> Result<String>,
) -> Result<Vec<String>> {
    let source_paths = expand_inputs(&input_settings.input)?;

    let run_one = |path: &PathBuf| -> Result<String> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut value: Value = path_de::value_from_str(&src)
            .with_context(|| format!("parsing {}", path.display()))?;

        if let Some(pointer) = &input_settings.json_pointer {
            value = value.pointer(pointer).cloned().with_context(|| {
                format!("json pointer {pointer} selects nothing in {}", path.display())
            })?;
        }

        anyhow::ensure!(
            process::should_process(&value),
            "{} is not a processable JSON Schema document",
            path.display()
        );

        let output = process::process_named(&value, &input_settings.root_name)
            .with_context(|| format!("processing {}", path.display()))?;
        for warning in &output.warnings {
            tracing::warn!(source = %path.display(), "{warning}");
        }
        emit(&output)
    };

    if common_settings.no_parallel {
        source_paths.iter().map(run_one).collect()
    } else {
        source_paths.par_iter().map(run_one).collect()
    }
}

fn write_output(out: Option<&PathBuf>, rendered: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

// ----------------------------- Internal helpers ---------------------------- //

/// Expand CLI inputs into concrete paths. An argument counts as a glob
/// pattern when escaping it changes it (the `glob` crate's own notion of a
/// special character); anything else passes through as a literal path,
/// whether or not it exists yet. A pattern that matches nothing is an
/// error, a literal that matches nothing surfaces later as a read error.
fn expand_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for arg in args {
        if glob::Pattern::escape(arg) == *arg {
            paths.push(PathBuf::from(arg));
            continue;
        }

        let before = paths.len();
        for hit in glob::glob(arg).with_context(|| format!("invalid glob pattern `{arg}`"))? {
            paths.push(hit.with_context(|| format!("expanding `{arg}`"))?);
        }
        anyhow::ensure!(
            paths.len() > before,
            "glob pattern matched no files: {arg}"
        );
    }

    Ok(paths)
}

fn format_elapsed(d: std::time::Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through_even_when_missing() {
        let paths = expand_inputs(&["does/not/exist.json".to_string()]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("does/not/exist.json")]);
    }

    #[test]
    fn unmatched_glob_pattern_is_an_error() {
        let err = expand_inputs(&["/definitely-missing-*.json".to_string()]).unwrap_err();
        assert!(err.to_string().contains("matched no files"), "{err}");
    }

    #[test]
    fn elapsed_formatting_scales_units() {
        use std::time::Duration;
        assert_eq!(format_elapsed(Duration::from_secs(59)), "59s");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "1m 1s");
        assert_eq!(format_elapsed(Duration::from_secs(3661)), "1h 1m 1s");
    }
}
