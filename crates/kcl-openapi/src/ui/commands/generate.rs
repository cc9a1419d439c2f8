use std::{collections::BTreeMap, path::PathBuf, sync::LazyLock};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use num_format::{CustomFormat, Grouping, ToFormattedString as _};

use super::load_document;
use crate::{
  generator::{
    codegen::RenderedFile,
    metrics::GenerationStats,
    options::GenerateOptions,
    orchestrator::{CodeMetadata, Orchestrator},
  },
  ui::{Colors, cli::GenerateCommand},
};

static COUNT_FORMAT: LazyLock<CustomFormat> = LazyLock::new(|| {
  CustomFormat::builder()
    .grouping(Grouping::Standard)
    .separator(",")
    .build()
    .expect("formatter failed to build.")
});

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

fn format_count(count: usize) -> String {
  count.to_formatted_string(&*COUNT_FORMAT)
}

#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub crd: bool,
  pub verbose: bool,
  pub quiet: bool,
  pub options: GenerateOptions,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      crd,
      models,
      disable_keep_order,
      strict_additional_properties,
      packages,
      model_package,
      verbose,
      quiet,
    } = command;

    let options = GenerateOptions::builder()
      .keep_order(!disable_keep_order)
      .strict_additional_properties(strict_additional_properties)
      .model_package(model_package)
      .package_map(parse_package_mappings(&packages)?)
      .names(models)
      .build();

    Ok(Self {
      input,
      output,
      crd,
      verbose,
      quiet,
      options,
    })
  }

  /// Writes every file under the output directory, creating package directories as needed.
  pub(crate) async fn write_files(&self, files: &[RenderedFile]) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
      let path = self.output.join(&file.path);
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
      }
      tokio::fs::write(&path, &file.content).await?;
      written.push(path);
    }
    Ok(written)
  }
}

/// Parses `NS=PKG` entries into a namespace to package map.
pub(crate) fn parse_package_mappings(entries: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
  let mut map = BTreeMap::new();
  for entry in entries {
    let (namespace, package) = entry
      .split_once('=')
      .filter(|(namespace, package)| !namespace.is_empty() && !package.is_empty())
      .ok_or_else(|| {
        anyhow::anyhow!("Invalid package format '{entry}': expected NS=PKG (e.g., io.k8s.api.core.v1=k8s.api.core.v1)")
      })?;
    map.insert(namespace.trim().to_string(), package.trim().to_string());
  }
  Ok(map)
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    let kind = if self.config.crd { "CRD" } else { "Swagger document" };
    self.info(
      &format!("Loading {kind} from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self, metadata: &CodeMetadata) {
    let title = if metadata.title.is_empty() {
      String::new()
    } else {
      format!(" for {} {}", metadata.title, metadata.version)
    };
    self.info(
      &format!("Generating KCL schemas{title}...")
        .with(self.colors.primary())
        .to_string(),
    );
    if self.config.verbose {
      if let Some(description) = metadata.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        self.stat("Description:", description.lines().next().unwrap_or_default().to_string());
      }
      self.stat("Definitions in input:", format_count(metadata.definition_count));
    }
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Schemas generated:", format_count(stats.total_schemas()));
    self.stat("", format!("{} definitions", format_count(stats.definitions_generated)));
    self.stat("", format!("{} hoisted schemas", format_count(stats.extra_schemas_generated)));
    self.stat("", format!("{} type aliases", format_count(stats.type_aliases_generated)));
    if stats.polymorphic_bases > 0 || stats.polymorphic_subtypes > 0 {
      self.stat(
        "Polymorphic:",
        format!(
          "{} bases, {} subtypes",
          stats.polymorphic_bases, stats.polymorphic_subtypes
        ),
      );
    }
    self.stat("Imports:", format_count(stats.imports_generated));
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  /// Lossy warnings are always shown; the rest only with `--verbose`.
  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !warning.is_lossy() && !self.config.verbose {
        continue;
      }
      if !printed_header {
        println!();
        printed_header = true;
      }
      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.warning()),
        format!("{warning}").with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_written(&self, paths: &[PathBuf]) {
    if !self.config.verbose {
      return;
    }
    for path in paths {
      self.stat("", path.display().to_string());
    }
  }

  fn log_success(&self, count: usize) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Successfully generated {} KCL files", format_count(count)).with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = load_document(&config.input, config.crd).await?;

  let orchestrator = Orchestrator::new(document, config.options.clone())?;
  logger.log_generating(&orchestrator.metadata());
  let (files, stats) = orchestrator.render()?;
  logger.print_statistics(&stats);

  logger.log_writing();
  let written = config.write_files(&files).await?;
  logger.log_written(&written);

  logger.log_success(written.len());
  Ok(())
}
