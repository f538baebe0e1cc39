use super::*;

#[test]
fn test_cli_parse_serve_defaults() {
    let cli = Cli::parse_from(["mrf-publisher", "serve"]);

    assert_eq!(cli.log_level, "info");

    let Commands::Serve(args) = cli.command else {
        panic!("expected serve command");
    };

    assert_eq!(args.bind, "0.0.0.0:8080");
    assert_eq!(ServiceConfig::from(&args), ServiceConfig::default());
}

#[test]
fn test_cli_parse_serve_overrides() {
    let cli = Cli::parse_from([
        "mrf-publisher",
        "--log-level",
        "debug",
        "serve",
        "--bind",
        "127.0.0.1:9000",
        "--approval-threshold",
        "10",
        "--reporting-entity-name",
        "Acme Health",
        "--plan-id-type",
        "hios",
        "--plan-market-type",
        "individual",
    ]);

    assert_eq!(cli.log_level, "debug");

    let Commands::Serve(args) = cli.command else {
        panic!("expected serve command");
    };
    let config = ServiceConfig::from(&args);

    assert_eq!(args.bind, "127.0.0.1:9000");
    assert_eq!(config.approval_threshold, 10);
    assert_eq!(config.reporting_entity.name, "Acme Health");
    assert_eq!(config.reporting_entity.entity_type, DEFAULT_REPORTING_ENTITY_TYPE);
    assert_eq!(config.reporting_entity.plan_id_type, Some(PlanIdType::Hios));
    assert_eq!(config.reporting_entity.plan_market_type, Some(PlanMarketType::Individual));
}

#[test]
fn test_cli_rejects_zero_threshold() {
    let result = Cli::try_parse_from(["mrf-publisher", "serve", "--approval-threshold", "0"]);

    assert!(result.is_err());
}

#[test]
fn test_cli_parse_validate() {
    let cli = Cli::parse_from(["mrf-publisher", "validate", "samples/claims.csv"]);

    let Commands::Validate(args) = cli.command else {
        panic!("expected validate command");
    };

    assert_eq!(args.path, PathBuf::from("samples/claims.csv"));
}

#[test]
fn test_cli_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["mrf-publisher"]).is_err());
}
