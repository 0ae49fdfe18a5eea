//! REPL (Read-Eval-Print Loop) for browsing location areas.

use anyhow::Result;
use console::{Style, style};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::info;

use super::Context;
use super::shell::{ControlFlow, Shell};

/// Run the interactive shell until the user exits.
pub async fn run(ctx: &Context) -> Result<()> {
    let cache = ctx.build_cache();
    let client = ctx.build_client(cache.clone())?;

    info!(
        base_url = %client.base_url(),
        interval_ms = cache.interval().as_millis() as u64,
        reaping = cache.is_reaping(),
        "Starting shell"
    );

    let mut repl = Repl::new(Shell::new(client), ctx.verbose)?;
    let result = repl.run().await;

    cache.shutdown();
    result
}

/// REPL state and configuration.
pub struct Repl {
    shell: Shell,
    editor: Editor<(), DefaultHistory>,
    verbose: bool,
}

impl Repl {
    /// Create a new REPL instance.
    pub fn new(shell: Shell, verbose: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;

        Ok(Self {
            shell,
            editor,
            verbose,
        })
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut stdout = std::io::stdout();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => match self.shell.execute(&line, &mut stdout).await {
                    Ok(ControlFlow::Continue) => continue,
                    Ok(ControlFlow::Exit) => return Ok(()),
                    Err(e) => {
                        if self.verbose {
                            self.print_error(&format!("{:#}", e));
                        } else {
                            self.print_error(&e.to_string());
                        }
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - drop the current line but don't exit
                    println!();
                    self.print_dim("(Interrupted - type exit to quit)");
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.print_dim("Closing the Pokedex... Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Pokedex").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("{}", dim.apply_to("Type help for commands, Ctrl+D to exit."));
        println!();
    }

    fn format_prompt(&self) -> String {
        format!("{} ", style("pokedex>").cyan().bold())
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }

    fn print_error(&self, msg: &str) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), msg);
    }
}
