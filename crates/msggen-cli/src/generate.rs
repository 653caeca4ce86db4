//! `msggen generate`

use anyhow::{Context, Result};
use msggen_codegen::{CommonTypes, Generator, OutputWriter, WriteSummary, write_trees};
use msggen_core::{CompilerConfig, SchemaError};
use msggen_schema::CompilerContext;
use std::path::{Path, PathBuf};

pub struct GenerateArgs {
    pub messages: PathBuf,
    pub addresses: PathBuf,
    pub host_out: PathBuf,
    pub embedded_out: PathBuf,
    pub config: Option<PathBuf>,
    pub force: bool,
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let supplements = SupplementFiles::load(&config, args.config.as_deref())?;
    let context = CompilerContext::new(config);

    println!("Compiling {}", args.messages.display());
    let registry = context.compile_files(&args.messages, Some(args.addresses.as_path()))?;

    let artifacts = Generator::new(&context.config().output)
        .with_shared_enums(supplements.shared_enums.as_deref())
        .with_common_types(supplements.common_types())
        .generate(&registry)?;

    let host = OutputWriter::new(&args.host_out).force(args.force);
    let embedded = OutputWriter::new(&args.embedded_out).force(args.force);
    let (host_summary, embedded_summary) = write_trees(&artifacts, &host, &embedded)?;

    println!(
        "✓ Messages: {} in {} interfaces",
        registry.messages().len(),
        registry.interfaces().len()
    );
    print_summary("Host", &args.host_out, &host_summary);
    print_summary("Embedded", &args.embedded_out, &embedded_summary);
    Ok(())
}

/// Defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    match path {
        Some(path) => CompilerConfig::from_file(path)
            .map_err(SchemaError::from)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(CompilerConfig::default()),
    }
}

/// Hand-written files named by `[output]`; relative paths resolve against
/// the configuration file's directory.
#[derive(Debug, Default)]
pub struct SupplementFiles {
    pub shared_enums: Option<String>,
    pub common_types: Option<String>,
    pub common_types_stream: Option<String>,
}

impl SupplementFiles {
    pub fn load(config: &CompilerConfig, config_path: Option<&Path>) -> Result<Self> {
        let base = config_path.and_then(Path::parent);
        let output = &config.output;
        Ok(Self {
            shared_enums: read_supplement(output.shared_enums.as_deref(), base, "shared enums")?,
            common_types: read_supplement(output.common_types.as_deref(), base, "common types")?,
            common_types_stream: read_supplement(
                output.common_types_stream.as_deref(),
                base,
                "common types stream operators",
            )?,
        })
    }

    pub fn common_types(&self) -> Option<CommonTypes<'_>> {
        self.common_types.as_deref().map(|types| CommonTypes {
            types,
            stream: self.common_types_stream.as_deref(),
        })
    }
}

fn read_supplement(file: Option<&Path>, base: Option<&Path>, what: &str) -> Result<Option<String>> {
    let Some(file) = file else {
        return Ok(None);
    };
    let path = match base {
        Some(base) if file.is_relative() => base.join(file),
        _ => file.to_path_buf(),
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {what} {}", path.display()))?;
    Ok(Some(contents))
}

fn print_summary(label: &str, root: &Path, summary: &WriteSummary) {
    println!(
        "✓ {label}: {} ({} written, {} unchanged, {} removed)",
        root.display(),
        summary.written,
        summary.unchanged,
        summary.removed.len()
    );
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
