use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["gamecat-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["gamecat-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["gamecat-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_add_with_appid() {
    let cli = Cli::try_parse_from(["gamecat-cli", "add", "1145360"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog(CatalogCommands::Add {
            appid: 1_145_360,
            dry_run: false
        }))
    ));
}

#[test]
fn parses_add_dry_run() {
    let cli = Cli::try_parse_from(["gamecat-cli", "add", "620", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog(CatalogCommands::Add {
            appid: 620,
            dry_run: true
        }))
    ));
}

#[test]
fn add_rejects_non_numeric_appid() {
    assert!(Cli::try_parse_from(["gamecat-cli", "add", "portal"]).is_err());
}

#[test]
fn top_defaults_to_ten_without_metadata() {
    let cli = Cli::try_parse_from(["gamecat-cli", "top"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog(CatalogCommands::Top {
            count: 10,
            with_metadata: false
        }))
    ));
}

#[test]
fn parses_top_with_count_and_metadata() {
    let cli = Cli::try_parse_from([
        "gamecat-cli",
        "top",
        "--count",
        "25",
        "--with-metadata",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog(CatalogCommands::Top {
            count: 25,
            with_metadata: true
        }))
    ));
}

#[test]
fn parses_applist_command() {
    let cli = Cli::try_parse_from(["gamecat-cli", "applist"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog(CatalogCommands::Applist))
    ));
}
