//! Minimal CLI: introspection JSON → (validation report | Rust model)
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::schema::{ScalarMapping, SchemaDocument};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Rust data models from a GraphQL introspection document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// load and validate a document, printing the emission order
    Check(CheckArgs),
    /// emit a Rust data model
    Rust(RustArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// introspection JSON document: a full response body, a bare `__schema`
    /// container, or the payload itself
    #[arg(long, short)]
    input: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct RustArgs {
    #[command(flatten)]
    input_settings: InputSettings,

    /// document label recorded in the generated header
    #[arg(long, default_value = "schema")]
    label: String,

    /// scalar mapping entries, `Name=RustType` (e.g. `ID=String`); every
    /// scalar the schema references needs one
    #[arg(long = "scalar", value_name = "NAME=TYPE", num_args = 1.., required = true)]
    scalars: Vec<String>,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_document(&self) -> anyhow::Result<SchemaDocument> {
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let doc = crate::introspection::load(&source)
            .with_context(|| format!("invalid introspection document: {}", self.input.display()))?;
        Ok(doc)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Check(target) => {
                let doc = target.input_settings.load_document()?;
                let order = crate::order::build_order(&doc)?;
                println!("{} types; emission order:", doc.len());
                for name in order {
                    println!("  {name}");
                }
                Ok(())
            }
            Command::Rust(target) => {
                let doc = target.input_settings.load_document()?;
                let mapping = parse_scalar_entries(&target.scalars)?;
                let source = crate::codegen::generate_types(&target.label, &mapping, &doc)?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &source)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{source}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_scalar_entries(entries: &[String]) -> anyhow::Result<ScalarMapping> {
    let mut mapping = ScalarMapping::with_capacity(entries.len());
    for entry in entries {
        let Some((name, repr)) = entry.split_once('=') else {
            anyhow::bail!("invalid scalar mapping entry `{entry}`; expected `Name=RustType`");
        };
        mapping.insert(name.trim().to_string(), repr.trim().to_string());
    }
    Ok(mapping)
}
