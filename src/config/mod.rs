#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::{PlanIdType, PlanMarketType, ReportingEntity};

pub const DEFAULT_APPROVAL_THRESHOLD: usize = 20;
pub const DEFAULT_REPORTING_ENTITY_NAME: &str = "Sample Healthcare Organization";
pub const DEFAULT_REPORTING_ENTITY_TYPE: &str = "health insurance issuer";

/// Claims intake and machine readable file publisher
#[derive(Parser, Debug)]
#[command(name = "mrf-publisher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info", env = "MRF_LOG_LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the claims review and MRF publishing API
    Serve(ServeArgs),

    /// Validate a claims CSV file and print the ingestion report as JSON
    Validate(ValidateArgs)
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address the HTTP API listens on
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "MRF_BIND")]
    pub bind: String,

    /// Approved claims required before an MRF file is generated
    #[arg(long, default_value_t = DEFAULT_APPROVAL_THRESHOLD, value_parser = parse_threshold, env = "MRF_APPROVAL_THRESHOLD")]
    pub approval_threshold: usize,

    /// Reporting entity name written into generated files
    #[arg(long, default_value = DEFAULT_REPORTING_ENTITY_NAME, env = "MRF_REPORTING_ENTITY_NAME")]
    pub reporting_entity_name: String,

    /// Reporting entity type written into generated files
    #[arg(long, default_value = DEFAULT_REPORTING_ENTITY_TYPE, env = "MRF_REPORTING_ENTITY_TYPE")]
    pub reporting_entity_type: String,

    #[arg(long, env = "MRF_PLAN_NAME")]
    pub plan_name: Option<String>,

    #[arg(long, value_enum, env = "MRF_PLAN_ID_TYPE")]
    pub plan_id_type: Option<PlanIdType>,

    #[arg(long, env = "MRF_PLAN_ID")]
    pub plan_id: Option<String>,

    #[arg(long, value_enum, env = "MRF_PLAN_MARKET_TYPE")]
    pub plan_market_type: Option<PlanMarketType>
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the claims CSV file
    pub path: PathBuf
}

/// Runtime settings for the claim store and aggregator.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ServiceConfig {
    pub approval_threshold: usize,
    pub reporting_entity: ReportingEntity
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            approval_threshold: DEFAULT_APPROVAL_THRESHOLD,
            reporting_entity: ReportingEntity {
                name: DEFAULT_REPORTING_ENTITY_NAME.to_string(),
                entity_type: DEFAULT_REPORTING_ENTITY_TYPE.to_string(),
                ..ReportingEntity::default()
            }
        }
    }
}

impl From<&ServeArgs> for ServiceConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            approval_threshold: args.approval_threshold,
            reporting_entity: ReportingEntity {
                name: args.reporting_entity_name.clone(),
                entity_type: args.reporting_entity_type.clone(),
                plan_name: args.plan_name.clone(),
                plan_id_type: args.plan_id_type,
                plan_id: args.plan_id.clone(),
                plan_market_type: args.plan_market_type
            }
        }
    }
}

fn parse_threshold(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("approval threshold must be at least 1".to_string()),
        Ok(threshold) => Ok(threshold),
        Err(error) => Err(format!("invalid approval threshold '{value}': {error}"))
    }
}
