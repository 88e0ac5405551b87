//! Minimal CLI: parse → build → (model | check)
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::model::{ModelBuilder, SchemaClass};
use crate::parser;
use crate::settings::GeneratorSettings;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer a typed settings model from a JSON configuration document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse a document and emit its schema model as JSON
    Model(ModelOut),
    /// parse only; report format errors without emitting anything
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input_settings: InputSettings,
}

/// What `model` emits per document: the generator's own settings plus the
/// ordered class sequence a renderer consumes.
#[derive(Debug, Serialize)]
struct ModelDocument {
    settings: GeneratorSettings,
    classes: Vec<SchemaClass>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Resolve every input to a (label, contents) pair.
    fn load(&self) -> Result<Vec<(String, String)>> {
        resolve_inputs(&self.input)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Model(target) => {
                let inputs = target.input_settings.load()?;
                if target.out.is_some() && inputs.len() > 1 {
                    bail!("--out only makes sense with a single input document");
                }
                for (label, source) in inputs {
                    let root = parser::parse(&source)
                        .with_context(|| format!("failed to parse {label}"))?;
                    let document = ModelDocument {
                        settings: GeneratorSettings::from_document(&root),
                        classes: ModelBuilder::build(&root),
                    };
                    let rendered = serde_json::to_string_pretty(&document)
                        .context("failed to serialize schema model")?;
                    match target.out.as_ref() {
                        Some(out) => {
                            if let Some(parent) = out.parent() {
                                std::fs::create_dir_all(parent).with_context(|| {
                                    format!("failed to create {}", parent.display())
                                })?;
                            }
                            std::fs::write(out, &rendered)
                                .with_context(|| format!("failed to write {}", out.display()))?;
                        }
                        None => println!("{rendered}"),
                    }
                }
                Ok(())
            }
            Command::Check(target) => {
                for (label, source) in target.input_settings.load()? {
                    parser::parse(&source)
                        .with_context(|| format!("invalid document {label}"))?;
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Resolve raw inputs to (label, contents) pairs. '-' reads stdin once;
/// anything with glob metacharacters expands via the `glob` crate and must
/// match at least one file.
fn resolve_inputs(raw_inputs: &[String]) -> Result<Vec<(String, String)>> {
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::new();
    for raw in raw_inputs {
        if raw == "-" {
            let source = std::io::read_to_string(std::io::stdin())
                .context("failed to read stdin")?;
            out.push(("<stdin>".to_string(), source));
        } else if has_glob_chars(raw) {
            let mut matched_any = false;
            for entry in glob::glob(raw).with_context(|| format!("bad glob pattern {raw}"))? {
                let path = entry.with_context(|| format!("failed to expand glob {raw}"))?;
                matched_any = true;
                out.push((path.display().to_string(), read_source(&path)?));
            }
            if !matched_any {
                bail!("glob pattern matched no files: {raw}");
            }
        } else {
            let path = PathBuf::from(raw);
            out.push((raw.clone(), read_source(&path)?));
        }
    }
    Ok(out)
}

fn read_source(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_inputs_surface_as_errors() {
        // A missing literal path fails on read.
        assert!(resolve_inputs(&["definitely-missing.json".to_string()]).is_err());
        // A glob matching nothing is an error rather than a silent no-op.
        assert!(resolve_inputs(&["definitely-missing-*.json".to_string()]).is_err());
    }
}
