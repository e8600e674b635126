//! CLI Command Tests
//!
//! Tests for all CLI commands with mocked backends.
//! Covers argument parsing, exit codes and local-state commands.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use flixtui::cli::{Cli, Command, KindArg, ListAction, ProfileAction};
    use flixtui::search::{SearchFilter, SearchSort};

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["flixtui"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::parse_from(["flixtui", "search", "blade runner"]);
        assert!(cli.is_cli_mode());
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.query, "blade runner");
                assert_eq!(cmd.filter, SearchFilter::All);
                assert_eq!(cmd.sort, SearchSort::Relevance);
                assert_eq!(cmd.page, 1);
                assert_eq!(cmd.pages, 1);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_with_filter_and_sort() {
        let cli = Cli::parse_from([
            "flixtui", "s", "matrix", "-f", "movie", "-s", "rating", "--pages", "3",
        ]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.filter, SearchFilter::Movie);
                assert_eq!(cmd.sort, SearchSort::Rating);
                assert_eq!(cmd.pages, 3);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_rejects_unknown_sort() {
        let result = Cli::try_parse_from(["flixtui", "search", "x", "--sort", "loudness"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["flixtui", "search"]).is_err());
    }

    #[test]
    fn test_popular_tv() {
        let cli = Cli::parse_from(["flixtui", "popular", "--type", "tv", "-l", "5"]);
        match cli.command {
            Some(Command::Popular(cmd)) => {
                assert_eq!(cmd.kind, KindArg::Tv);
                assert_eq!(cmd.limit, 5);
            }
            _ => panic!("Expected Popular command"),
        }
    }

    #[test]
    fn test_info_defaults_to_movie() {
        let cli = Cli::parse_from(["flixtui", "info", "603"]);
        match cli.command {
            Some(Command::Info(cmd)) => {
                assert_eq!(cmd.id, 603);
                assert_eq!(cmd.kind, KindArg::Movie);
            }
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_season_command() {
        let cli = Cli::parse_from(["flixtui", "season", "1396", "2"]);
        match cli.command {
            Some(Command::Season(cmd)) => {
                assert_eq!(cmd.id, 1396);
                assert_eq!(cmd.season, 2);
            }
            _ => panic!("Expected Season command"),
        }
    }

    #[test]
    fn test_list_subcommands() {
        let cli = Cli::parse_from(["flixtui", "list", "add", "1396", "-t", "tv"]);
        match cli.command {
            Some(Command::List(args)) => match args.action {
                Some(ListAction::Add { id, kind }) => {
                    assert_eq!(id, 1396);
                    assert_eq!(kind, KindArg::Tv);
                }
                other => panic!("Expected add, got {:?}", other),
            },
            _ => panic!("Expected List command"),
        }

        let cli = Cli::parse_from(["flixtui", "l", "rm", "603"]);
        assert!(matches!(
            cli.command,
            Some(Command::List(args)) if matches!(args.action, Some(ListAction::Remove { id: 603 }))
        ));

        let cli = Cli::parse_from(["flixtui", "list"]);
        assert!(matches!(cli.command, Some(Command::List(args)) if args.action.is_none()));
    }

    #[test]
    fn test_profile_select() {
        let cli = Cli::parse_from(["flixtui", "profile", "select", "3"]);
        match cli.command {
            Some(Command::Profile(args)) => {
                assert!(matches!(args.action, Some(ProfileAction::Select { id }) if id == "3"));
            }
            _ => panic!("Expected Profile command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["flixtui", "genres", "--json", "-q", "--ephemeral"]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.ephemeral);
        assert!(matches!(cli.command, Some(Command::Genres)));
    }

    #[test]
    fn test_discover_requires_genre() {
        assert!(Cli::try_parse_from(["flixtui", "discover"]).is_err());
        let cli = Cli::parse_from(["flixtui", "discover", "-g", "35"]);
        assert!(matches!(cli.command, Some(Command::Discover(cmd)) if cmd.genre == 35));
    }
}

// =============================================================================
// Exit Code Tests
// =============================================================================

mod exit_codes {
    use flixtui::cli::ExitCode;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::AlreadyInList), 5);
    }
}

// =============================================================================
// Command Handler Tests (mocked TMDB)
// =============================================================================

mod handlers {
    use std::sync::Arc;

    use flixtui::api::TmdbClient;
    use flixtui::cli::{
        DiscoverCmd, ExitCode, FeedCmd, InfoCmd, KindArg, ListAction, ListCmd, Output,
        ProfileAction, SearchCmd, SeasonCmd, TrendingCmd,
    };
    use flixtui::commands;
    use flixtui::profile::ProfileGate;
    use flixtui::search::{SearchFilter, SearchSort};
    use flixtui::storage::{KeyValueStore, MemoryStore};
    use flixtui::watchlist::Watchlist;
    use mockito::{Matcher, Server, ServerGuard};

    fn quiet_json() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    async fn mock_ok(server: &mut ServerGuard, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }

    async fn mock_status(server: &mut ServerGuard, path: &str, status: usize) {
        server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .create_async()
            .await;
    }

    const LIST_BODY: &str = r#"{"results": [
        {"id": 603, "title": "The Matrix", "release_date": "1999-03-30", "vote_average": 8.2},
        {"id": 604, "title": "The Matrix Reloaded", "release_date": "2003-05-15", "vote_average": 7.0}
    ]}"#;

    #[tokio::test]
    async fn test_popular_and_top_rated() {
        let mut server = Server::new_async().await;
        let popular = mock_ok(&mut server, "/tv/popular", LIST_BODY).await;
        let top = mock_ok(&mut server, "/movie/top_rated", LIST_BODY).await;
        let client = TmdbClient::with_base_url("test_key", server.url());

        let cmd = ListCmd {
            kind: KindArg::Tv,
            limit: 1,
        };
        assert_eq!(
            commands::popular_cmd(&client, cmd, &quiet_json()).await,
            ExitCode::Success
        );

        let cmd = ListCmd {
            kind: KindArg::Movie,
            limit: 20,
        };
        assert_eq!(
            commands::top_rated_cmd(&client, cmd, &quiet_json()).await,
            ExitCode::Success
        );

        popular.assert_async().await;
        top.assert_async().await;
    }

    #[tokio::test]
    async fn test_trending_genres_discover() {
        let mut server = Server::new_async().await;
        mock_ok(&mut server, "/trending/tv/week", LIST_BODY).await;
        mock_ok(
            &mut server,
            "/genre/movie/list",
            r#"{"genres": [{"id": 35, "name": "Comedy"}]}"#,
        )
        .await;
        let discover = server
            .mock("GET", "/discover/movie")
            .match_query(Matcher::UrlEncoded("with_genres".into(), "35".into()))
            .with_status(200)
            .with_body(LIST_BODY)
            .create_async()
            .await;
        let client = TmdbClient::with_base_url("test_key", server.url());
        let out = quiet_json();

        assert_eq!(
            commands::trending_cmd(&client, TrendingCmd { limit: 5 }, &out).await,
            ExitCode::Success
        );
        assert_eq!(commands::genres_cmd(&client, &out).await, ExitCode::Success);
        assert_eq!(
            commands::discover_cmd(&client, DiscoverCmd { genre: 35, limit: 5 }, &out).await,
            ExitCode::Success
        );
        discover.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_accumulates_pages() {
        let mut server = Server::new_async().await;
        let page1 = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"page": 1, "results": [{"id": 1, "title": "A"}], "total_pages": 2, "total_results": 2}"#)
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(r#"{"page": 2, "results": [{"id": 2, "title": "B"}], "total_pages": 2, "total_results": 2}"#)
            .create_async()
            .await;
        let client = TmdbClient::with_base_url("test_key", server.url());

        let cmd = SearchCmd {
            query: "letters".into(),
            filter: SearchFilter::Movie,
            sort: SearchSort::Relevance,
            page: 1,
            pages: 5,
        };
        assert_eq!(
            commands::search_cmd(&client, cmd, &quiet_json()).await,
            ExitCode::Success
        );
        page1.assert_async().await;
        page2.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_blank_query_is_invalid() {
        let server = Server::new_async().await;
        let client = TmdbClient::with_base_url("test_key", server.url());

        let cmd = SearchCmd {
            query: "   ".into(),
            filter: SearchFilter::All,
            sort: SearchSort::Relevance,
            page: 1,
            pages: 1,
        };
        assert_eq!(
            commands::search_cmd(&client, cmd, &quiet_json()).await,
            ExitCode::InvalidArgs
        );
    }

    #[tokio::test]
    async fn test_info_exit_codes() {
        let mut server = Server::new_async().await;
        mock_ok(
            &mut server,
            "/movie/603",
            r#"{"id": 603, "title": "The Matrix", "runtime": 136}"#,
        )
        .await;
        mock_ok(&mut server, "/movie/603/videos", r#"{"results": []}"#).await;
        mock_ok(&mut server, "/movie/603/credits", r#"{"cast": [], "crew": []}"#).await;
        mock_status(&mut server, "/tv/999", 404).await;
        mock_ok(&mut server, "/tv/999/videos", r#"{"results": []}"#).await;
        mock_status(&mut server, "/movie/500", 500).await;
        mock_ok(&mut server, "/movie/500/videos", r#"{"results": []}"#).await;
        mock_ok(&mut server, "/movie/500/credits", r#"{"cast": [], "crew": []}"#).await;
        let client = TmdbClient::with_base_url("test_key", server.url());
        let out = quiet_json();

        let found = InfoCmd {
            id: 603,
            kind: KindArg::Movie,
        };
        assert_eq!(commands::info_cmd(&client, found, &out).await, ExitCode::Success);

        let missing = InfoCmd {
            id: 999,
            kind: KindArg::Tv,
        };
        assert_eq!(commands::info_cmd(&client, missing, &out).await, ExitCode::NotFound);

        let broken = InfoCmd {
            id: 500,
            kind: KindArg::Movie,
        };
        assert_eq!(
            commands::info_cmd(&client, broken, &out).await,
            ExitCode::NetworkError
        );
    }

    #[tokio::test]
    async fn test_season_and_feed() {
        let mut server = Server::new_async().await;
        mock_ok(
            &mut server,
            "/tv/1396/season/1",
            r#"{"episodes": [{"episode_number": 1, "name": "Pilot", "runtime": 58}]}"#,
        )
        .await;
        mock_ok(&mut server, "/movie/popular", LIST_BODY).await;
        mock_ok(&mut server, "/tv/popular", r#"{"results": []}"#).await;
        let client = TmdbClient::with_base_url("test_key", server.url());
        let out = quiet_json();

        assert_eq!(
            commands::season_cmd(&client, SeasonCmd { id: 1396, season: 1 }, &out).await,
            ExitCode::Success
        );
        assert_eq!(
            commands::feed_cmd(&client, FeedCmd { days: Some(7) }, 30, &out).await,
            ExitCode::Success
        );
    }

    #[tokio::test]
    async fn test_list_add_remove_clear() {
        let mut server = Server::new_async().await;
        mock_ok(
            &mut server,
            "/tv/1396",
            r#"{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20"}"#,
        )
        .await;
        mock_status(&mut server, "/movie/42", 404).await;
        let client = TmdbClient::with_base_url("test_key", server.url());
        let store = memory();
        let out = quiet_json();

        let add = ListAction::Add {
            id: 1396,
            kind: KindArg::Tv,
        };
        assert_eq!(
            commands::list_cmd(Some(&client), Some(add), store.clone(), &out).await,
            ExitCode::Success
        );
        let list = Watchlist::load(store.clone());
        assert_eq!(list.get(1396).map(|e| e.title.as_str()), Some("Breaking Bad"));

        let again = ListAction::Add {
            id: 1396,
            kind: KindArg::Tv,
        };
        assert_eq!(
            commands::list_cmd(Some(&client), Some(again), store.clone(), &out).await,
            ExitCode::AlreadyInList
        );

        let unknown = ListAction::Add {
            id: 42,
            kind: KindArg::Movie,
        };
        assert_eq!(
            commands::list_cmd(Some(&client), Some(unknown), store.clone(), &out).await,
            ExitCode::NotFound
        );

        assert_eq!(
            commands::list_cmd(None, None, store.clone(), &out).await,
            ExitCode::Success
        );
        assert_eq!(
            commands::list_cmd(None, Some(ListAction::Remove { id: 1396 }), store.clone(), &out)
                .await,
            ExitCode::Success
        );
        assert_eq!(
            commands::list_cmd(None, Some(ListAction::Clear), store.clone(), &out).await,
            ExitCode::Success
        );
        assert!(Watchlist::load(store).is_empty());
    }

    #[tokio::test]
    async fn test_list_add_without_key() {
        let add = ListAction::Add {
            id: 1,
            kind: KindArg::Movie,
        };
        assert_eq!(
            commands::list_cmd(None, Some(add), memory(), &quiet_json()).await,
            ExitCode::InvalidArgs
        );
    }

    #[test]
    fn test_profile_select_and_switch() {
        let store = memory();
        let out = quiet_json();

        assert_eq!(
            commands::profile_cmd(
                Some(ProfileAction::Select { id: "4".into() }),
                store.clone(),
                &out
            ),
            ExitCode::Success
        );
        let gate = ProfileGate::restore(store.clone());
        assert_eq!(gate.profile().map(|p| p.name), Some("Kids"));

        assert_eq!(
            commands::profile_cmd(Some(ProfileAction::Switch), store.clone(), &out),
            ExitCode::Success
        );
        assert!(ProfileGate::restore(store.clone()).profile().is_none());

        assert_eq!(commands::profile_cmd(None, store, &out), ExitCode::Success);
    }
}
