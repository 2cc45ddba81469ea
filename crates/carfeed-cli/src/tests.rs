use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["carfeed"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_watch_with_filters() {
    let cli = Cli::try_parse_from([
        "carfeed",
        "watch",
        "--recommended",
        "--region",
        "BL",
        "--brand",
        "skoda",
        "--interval",
        "10",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Watch {
            filter: FilterArgs {
                recommended: true,
                cheap: false,
                region: Some(ref region),
                brand: Some(ref brand),
            },
            interval: Some(10),
        }) if region == "BL" && brand == "skoda"
    ));
}

#[test]
fn recommended_and_cheap_conflict() {
    let result = Cli::try_parse_from(["carfeed", "deals", "--recommended", "--cheap"]);
    assert!(result.is_err());
}

#[test]
fn parses_deals_json() {
    let cli = Cli::try_parse_from(["carfeed", "deals", "--cheap", "--json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Deals {
            filter: FilterArgs { cheap: true, .. },
            json: true,
        })
    ));
}

#[test]
fn parses_read_only_commands() {
    for (arg, expected) in [("stats", "Stats"), ("top", "Top"), ("facets", "Facets")] {
        let cli = Cli::try_parse_from(["carfeed", arg]).expect("expected valid cli args");
        let name = match cli.command {
            Some(Commands::Stats) => "Stats",
            Some(Commands::Top) => "Top",
            Some(Commands::Facets) => "Facets",
            other => panic!("unexpected command {other:?}"),
        };
        assert_eq!(name, expected);
    }
}

#[test]
fn parses_theme_set() {
    let cli = Cli::try_parse_from(["carfeed", "theme", "set", "dark"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Theme {
            command: ThemeCommands::Set { ref theme }
        }) if theme == "dark"
    ));
}
