//! Shell commands: parsing, pagination state and handlers.
//!
//! Handlers write to any [`Write`] sink so the REPL can hand them stdout and
//! tests can hand them a buffer.

use std::io::Write;

use anyhow::Result;
use console::{Term, style};
use pokedex_client::{NamedResourcePage, PokeApiClient};
use tracing::debug;

/// Commands shown by `help`, in display order.
const COMMANDS: &[(&str, &str)] = &[
    ("help", "Displays a help message"),
    ("exit", "Exit the Pokedex"),
    ("map", "Displays the names of the next page of location areas"),
    ("mapb", "Displays the names of the previous page of location areas"),
    ("explore <area>", "Lists all Pokemon found in a location area"),
    ("cache", "Shows response cache statistics"),
    ("clear", "Clears the screen"),
];

/// Lowercase `text` and split it into words.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(Option<String>),
    Cache,
    Clear,
    Unknown(String),
}

impl ShellCommand {
    /// Parse cleaned words. Returns `None` for a blank line.
    pub fn parse(words: &[String]) -> Option<Self> {
        let (cmd, rest) = words.split_first()?;
        let arg = rest.first().cloned();

        let command = match cmd.as_str() {
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            "map" => Self::Map,
            "mapb" => Self::MapBack,
            "explore" => Self::Explore(arg),
            "cache" => Self::Cache,
            "clear" => Self::Clear,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Control flow for the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// Where the next `map` or `mapb` should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// No page fetched yet.
    First,
    /// Follow a link from the current page.
    Link(&'a str),
    /// Nothing further in this direction.
    End,
}

/// Pagination cursor over the location area listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub next: Option<String>,
    pub previous: Option<String>,
    started: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target of the next `map`.
    pub fn forward(&self) -> Step<'_> {
        match (self.started, self.next.as_deref()) {
            (false, _) => Step::First,
            (true, Some(url)) => Step::Link(url),
            (true, None) => Step::End,
        }
    }

    /// Target of the next `mapb`.
    pub fn back(&self) -> Step<'_> {
        match self.previous.as_deref() {
            Some(url) => Step::Link(url),
            None => Step::End,
        }
    }

    /// Move the cursor onto `page`.
    pub fn advance(&mut self, page: &NamedResourcePage) {
        self.started = true;
        self.next = page.next.clone();
        self.previous = page.previous.clone();
    }
}

/// Shell state shared by all command handlers.
pub struct Shell {
    client: PokeApiClient,
    cursor: Cursor,
    term: Term,
}

impl Shell {
    pub fn new(client: PokeApiClient) -> Self {
        Self {
            client,
            cursor: Cursor::new(),
            term: Term::stdout(),
        }
    }

    /// Parse and run one input line.
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ControlFlow> {
        let words = clean_input(line);
        let Some(command) = ShellCommand::parse(&words) else {
            return Ok(ControlFlow::Continue);
        };

        debug!(?command, "Running shell command");

        match command {
            ShellCommand::Help => self.help(out)?,
            ShellCommand::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(ControlFlow::Exit);
            }
            ShellCommand::Map => self.map(out).await?,
            ShellCommand::MapBack => self.map_back(out).await?,
            ShellCommand::Explore(Some(area)) => self.explore(&area, out).await?,
            ShellCommand::Explore(None) => writeln!(out, "Usage: explore <area>")?,
            ShellCommand::Cache => self.cache_stats(out)?,
            ShellCommand::Clear => self.term.clear_screen()?,
            ShellCommand::Unknown(cmd) => {
                writeln!(out, "Unknown command: {}", cmd)?;
                writeln!(out, "Type help for available commands")?;
            }
        }

        Ok(ControlFlow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for (name, description) in COMMANDS {
            writeln!(out, "  {:<16} {}", style(name).cyan(), description)?;
        }
        writeln!(out)?;
        Ok(())
    }

    async fn map<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let page = match self.cursor.forward() {
            Step::First => self.client.location_areas().page(None).await?,
            Step::Link(url) => self.client.location_areas().page(Some(url)).await?,
            Step::End => {
                writeln!(out, "you're on the last page")?;
                return Ok(());
            }
        };
        self.show_page(&page, out)
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let page = match self.cursor.back() {
            Step::Link(url) => self.client.location_areas().page(Some(url)).await?,
            Step::First | Step::End => {
                writeln!(out, "you're on the first page")?;
                return Ok(());
            }
        };
        self.show_page(&page, out)
    }

    fn show_page<W: Write>(&mut self, page: &NamedResourcePage, out: &mut W) -> Result<()> {
        self.cursor.advance(page);
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&self, area: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Exploring {}...", area)?;
        let location = self.client.location_areas().get(area).await?;
        writeln!(out, "Found Pokemon:")?;
        for name in location.pokemon_names() {
            writeln!(out, "- {}", name)?;
        }
        Ok(())
    }

    fn cache_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let cache = self.client.cache();
        let stats = cache.stats();
        writeln!(out, "Cached responses: {}", stats.entries)?;
        writeln!(out, "  hits:   {}", stats.hits)?;
        writeln!(out, "  misses: {}", stats.misses)?;
        writeln!(out, "  reaped: {}", stats.reaped)?;
        writeln!(
            out,
            "  interval: {}ms ({})",
            cache.interval().as_millis(),
            if cache.is_reaping() {
                "reaping"
            } else {
                "not reaping"
            }
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_cache::{CacheConfig, ExpiringCache};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn shell_for(server: &MockServer) -> Shell {
        let cache = ExpiringCache::new(CacheConfig::new().without_reaping());
        let client = PokeApiClient::builder()
            .base_url(format!("{}/api/v2/", server.uri()))
            .page_size(2)
            .cache(cache)
            .build()
            .unwrap();
        Shell::new(client)
    }

    async fn run(shell: &mut Shell, line: &str) -> (ControlFlow, String) {
        let mut out = Vec::new();
        let flow = shell.execute(line, &mut out).await.unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    /// Mount a two-page listing: offset 0 and offset 2.
    async fn mount_listing(server: &MockServer) {
        let base = format!("{}/api/v2/location-area/", server.uri());
        let second = format!("{base}?offset=2&limit=2");
        let first = format!("{base}?offset=0&limit=2");

        Mock::given(method("GET"))
            .and(path("/api/v2/location-area/"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 4,
                "next": second,
                "previous": null,
                "results": [
                    { "name": "canalave-city-area", "url": "" },
                    { "name": "eterna-city-area", "url": "" }
                ]
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/location-area/"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 4,
                "next": null,
                "previous": first,
                "results": [
                    { "name": "pastoria-city-area", "url": "" },
                    { "name": "sunyshore-city-area", "url": "" }
                ]
            })))
            .mount(server)
            .await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input parsing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_input_trims_and_splits() {
        assert_eq!(clean_input("  hello  world  "), vec!["hello", "world"]);
    }

    #[test]
    fn test_clean_input_lowercases() {
        assert_eq!(
            clean_input("Charmander Bulbasaur PIKACHU"),
            vec!["charmander", "bulbasaur", "pikachu"]
        );
    }

    #[test]
    fn test_clean_input_blank() {
        assert!(clean_input(" \t ").is_empty());
    }

    #[test]
    fn test_parse_commands() {
        let parse = |line: &str| ShellCommand::parse(&clean_input(line));

        assert_eq!(parse(""), None);
        assert_eq!(parse("HELP"), Some(ShellCommand::Help));
        assert_eq!(parse("quit"), Some(ShellCommand::Exit));
        assert_eq!(parse("mapb"), Some(ShellCommand::MapBack));
        assert_eq!(
            parse("explore Pastoria-City-Area extra"),
            Some(ShellCommand::Explore(Some("pastoria-city-area".to_string())))
        );
        assert_eq!(parse("explore"), Some(ShellCommand::Explore(None)));
        assert_eq!(
            parse("catch pikachu"),
            Some(ShellCommand::Unknown("catch".to_string()))
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cursor_starts_at_first_page() {
        let cursor = Cursor::new();
        assert_eq!(cursor.forward(), Step::First);
        assert_eq!(cursor.back(), Step::End);
    }

    #[test]
    fn test_cursor_follows_page_links() {
        let mut cursor = Cursor::new();
        cursor.advance(&NamedResourcePage {
            count: 4,
            next: Some("next-url".to_string()),
            previous: None,
            results: vec![],
        });
        assert_eq!(cursor.forward(), Step::Link("next-url"));
        assert_eq!(cursor.back(), Step::End);

        cursor.advance(&NamedResourcePage {
            count: 4,
            next: None,
            previous: Some("prev-url".to_string()),
            results: vec![],
        });
        assert_eq!(cursor.forward(), Step::End);
        assert_eq!(cursor.back(), Step::Link("prev-url"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_blank_line_is_ignored() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);

        let (flow, output) = run(&mut shell, "   ").await;
        assert_eq!(flow, ControlFlow::Continue);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_exit_and_quit_leave_loop() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);

        for line in ["exit", "QUIT"] {
            let (flow, output) = run(&mut shell, line).await;
            assert_eq!(flow, ControlFlow::Exit);
            assert!(output.contains("Goodbye!"));
        }
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);

        let (_, output) = run(&mut shell, "help").await;
        assert!(output.contains("Welcome to the Pokedex!"));
        for (name, description) in COMMANDS {
            assert!(output.contains(name), "missing {name}");
            assert!(output.contains(description));
        }
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);

        let (flow, output) = run(&mut shell, "Pokeball now").await;
        assert_eq!(flow, ControlFlow::Continue);
        assert!(output.contains("Unknown command: pokeball"));
    }

    #[tokio::test]
    async fn test_map_pages_forward_to_last_page() {
        let server = MockServer::start().await;
        mount_listing(&server).await;
        let mut shell = shell_for(&server);

        let (_, output) = run(&mut shell, "map").await;
        assert_eq!(output, "canalave-city-area\neterna-city-area\n");

        let (_, output) = run(&mut shell, "map").await;
        assert_eq!(output, "pastoria-city-area\nsunyshore-city-area\n");

        let (_, output) = run(&mut shell, "map").await;
        assert_eq!(output, "you're on the last page\n");
    }

    #[tokio::test]
    async fn test_mapb_before_map_is_first_page() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);

        let (_, output) = run(&mut shell, "mapb").await;
        assert_eq!(output, "you're on the first page\n");
    }

    #[tokio::test]
    async fn test_mapb_goes_back_through_cache() {
        let server = MockServer::start().await;
        mount_listing(&server).await;
        let mut shell = shell_for(&server);

        run(&mut shell, "map").await;
        run(&mut shell, "map").await;
        let (_, output) = run(&mut shell, "mapb").await;
        assert_eq!(output, "canalave-city-area\neterna-city-area\n");

        let (_, output) = run(&mut shell, "mapb").await;
        assert_eq!(output, "you're on the first page\n");

        let stats = shell.client.cache().stats();
        assert_eq!(stats.hits, 1, "first page served from cache on the way back");
        assert_eq!(stats.entries, 2);
    }

    #[tokio::test]
    async fn test_failed_map_keeps_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/location-area/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let mut shell = shell_for(&server);

        let mut out = Vec::new();
        assert!(shell.execute("map", &mut out).await.is_err());
        assert_eq!(shell.cursor.forward(), Step::First);
    }

    #[tokio::test]
    async fn test_explore_lists_pokemon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/location-area/pastoria-city-area"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "pastoria-city-area",
                "pokemon_encounters": [
                    { "pokemon": { "name": "tentacool", "url": "" } },
                    { "pokemon": { "name": "magikarp", "url": "" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut shell = shell_for(&server);

        let (_, output) = run(&mut shell, "explore Pastoria-City-Area").await;
        assert_eq!(
            output,
            "Exploring pastoria-city-area...\nFound Pokemon:\n- tentacool\n- magikarp\n"
        );

        // Second visit is served from the cache
        let (_, again) = run(&mut shell, "explore pastoria-city-area").await;
        assert_eq!(again, output);
    }

    #[tokio::test]
    async fn test_explore_requires_area() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);

        let (flow, output) = run(&mut shell, "explore").await;
        assert_eq!(flow, ControlFlow::Continue);
        assert!(output.contains("Usage: explore <area>"));
    }

    #[tokio::test]
    async fn test_cache_command_reports_stats() {
        let server = MockServer::start().await;
        let mut shell = shell_for(&server);
        shell.client.cache().add("k", "v");

        let (_, output) = run(&mut shell, "cache").await;
        assert!(output.contains("Cached responses: 1"));
        assert!(output.contains("not reaping"));
    }
}
