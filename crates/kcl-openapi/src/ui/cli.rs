use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "kcl-openapi")]
#[command(author, version, about = "Swagger 2.0 and Kubernetes CRD to KCL schema generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from a Swagger document or CRD
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate KCL schemas from a Swagger document or CRD
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateCommand {
  /// Path to the Swagger 2.0 or CRD file (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated KCL packages are written under
  #[arg(short, long, value_name = "DIR", default_value = ".")]
  pub output: PathBuf,

  /// Treat the input as a Kubernetes CustomResourceDefinition
  #[arg(long, default_value_t = false)]
  pub crd: bool,

  /// Generate only these definitions (and what they reference); repeatable
  #[arg(short, long = "model", value_name = "NAME")]
  pub models: Vec<String>,

  /// Sort properties by name instead of keeping document order
  #[arg(long, default_value_t = false)]
  pub disable_keep_order: bool,

  /// Render `additionalProperties: false` objects as closed schemas
  #[arg(long, default_value_t = false)]
  pub strict_additional_properties: bool,

  /// Map a definition namespace to a package, e.g. io.k8s.api.core.v1=k8s.api.core.v1; repeatable
  #[arg(long = "package", value_name = "NS=PKG")]
  pub packages: Vec<String>,

  /// Root package every generated schema lives under
  #[arg(long, value_name = "PKG", default_value = "models")]
  pub model_package: String,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every definition with its KCL category and polymorphic role
  Definitions {
    /// Path to the Swagger 2.0 or CRD file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Treat the input as a Kubernetes CustomResourceDefinition
    #[arg(long, default_value_t = false)]
    crd: bool,
  },
}
