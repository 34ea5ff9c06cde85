use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use girder_rules::Severity;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FailLevel {
    #[default]
    Blocker,
    Error,
    Warn,
    Info,
}

impl FailLevel {
    pub fn severity(self) -> Severity {
        match self {
            FailLevel::Blocker => Severity::Blocker,
            FailLevel::Error => Severity::Error,
            FailLevel::Warn => Severity::Warn,
            FailLevel::Info => Severity::Info,
        }
    }
}

#[derive(Parser)]
#[command(name = "girder", bin_name = "girder")]
#[command(about = "Static architecture analysis for Java repositories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run rules against a repository and report violations
    #[command(after_help = r#"EXAMPLES:
  girder analyze --repo ./app --rules ./rules
  girder analyze --repo ./app --rules ./rules --format json
  girder analyze --repo ./app --rules ./rules --fail-level error"#)]
    Analyze {
        /// Repository root to scan for .java files
        #[arg(long, value_name = "DIR")]
        repo: PathBuf,

        /// Directory of JSON rule definitions
        #[arg(long, value_name = "DIR")]
        rules: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Most lenient severity that still fails the run
        #[arg(long, value_enum, default_value_t = FailLevel::Blocker)]
        fail_level: FailLevel,
    },

    /// Build the model and print parse statistics
    Model {
        #[arg(long, value_name = "DIR")]
        repo: PathBuf,
    },

    /// List the rules in a directory
    Rules {
        #[arg(long, value_name = "DIR")]
        rules: PathBuf,
    },

    /// Print call chains starting at a method
    #[command(after_help = r#"EXAMPLES:
  girder chains --repo ./app --method 'com.shop.OrderService#createOrder(com.shop.Order)'
  girder chains --repo ./app --method 'com.shop.OrderService#createOrder(com.shop.Order)' --to 'com.shop.Repo#save()'"#)]
    Chains {
        #[arg(long, value_name = "DIR")]
        repo: PathBuf,

        /// Method signature FQN to start from
        #[arg(long, value_name = "FQN")]
        method: String,

        /// Only keep chains ending at this method
        #[arg(long, value_name = "FQN")]
        to: Option<String>,
    },
}
