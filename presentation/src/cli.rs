use application::assistant_service::{Answer, AssistantService};
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use infrastructure::config::Config;
use infrastructure::retriever::Retriever;
use shared::telemetry::Telemetry;
use shared::types::Result;

#[derive(Parser)]
#[command(name = "manual-assistant")]
#[command(about = "Ask questions about pre-processed technical manuals")]
pub struct Cli {
    /// List available manuals and exit
    #[arg(long)]
    pub list: bool,

    /// Manual to query (prompted interactively when omitted)
    #[arg(long)]
    pub manual: Option<String>,

    /// Number of passages to retrieve per question
    #[arg(long)]
    pub top_k: Option<usize>,

    /// One-shot question (enters the ask loop when omitted)
    #[arg(trailing_var_arg = true)]
    pub question: Vec<String>,
}

pub struct CliApp {
    service: AssistantService,
}

impl CliApp {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = Config::load();
        if let Some(k) = cli.top_k.filter(|k| *k > 0) {
            config.default_top_k = k;
        }
        Ok(Self {
            service: AssistantService::new(config)?,
        })
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        let manuals = self.service.available_manuals()?;
        if cli.list {
            return self.print_manuals(&manuals);
        }
        if manuals.is_empty() {
            println!(
                "{}",
                "No processed manuals found. Run the ingestion pipeline first and make sure \
the processed data directory is present."
                    .yellow()
            );
            return Ok(());
        }

        let manual = match &cli.manual {
            Some(name) if manuals.contains(name) => name.clone(),
            Some(name) => {
                println!("{}", format!("Unknown manual '{}'.", name).red());
                return self.print_manuals(&manuals);
            }
            None => {
                let choice = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Select a manual")
                    .items(&manuals)
                    .default(0)
                    .interact()?;
                manuals[choice].clone()
            }
        };

        eprintln!("Indexing '{manual}'...");
        let retriever = self.service.index_manual(&manual).await?;
        println!(
            "{}",
            format!(
                "Loaded '{}' with {} passages.",
                manual,
                retriever.corpus().len()
            )
            .green()
        );

        let question = cli.question.join(" ");
        if !question.trim().is_empty() {
            return self.ask_once(&manual, &retriever, &question).await;
        }

        // Interactive loop: one question at a time, like the original UI.
        loop {
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Question (or 'exit')")
                .interact_text()?;
            if input.trim().eq_ignore_ascii_case("exit") {
                break;
            }
            if input.trim().is_empty() {
                println!("{}", "Please ask a question.".red());
                continue;
            }
            if let Err(e) = self.ask_once(&manual, &retriever, &input).await {
                println!("{}", format!("Error: {e}").red());
            }
        }
        Ok(())
    }

    fn print_manuals(&self, manuals: &[String]) -> Result<()> {
        if manuals.is_empty() {
            println!("{}", "No processed manuals found.".yellow());
            return Ok(());
        }
        println!("{}", "Available manuals:".green());
        for manual in manuals {
            println!("  {manual}");
        }
        Ok(())
    }

    async fn ask_once(&self, manual: &str, retriever: &Retriever, question: &str) -> Result<()> {
        let timer = Telemetry::new();
        let answer = self.service.ask(retriever, question).await?;
        self.render_answer(manual, &answer);
        eprintln!("Answered in {} ms", timer.elapsed_ms());
        Ok(())
    }

    fn render_answer(&self, manual: &str, answer: &Answer) {
        println!("\n{}", "Answer".green().bold());
        println!("{}", answer.text);

        if answer.cited_pages.is_empty() {
            return;
        }
        println!("\n{}", "Referenced pages:".green());
        for page in &answer.cited_pages {
            let image = self.service.page_image_path(manual, *page);
            if image.exists() {
                println!("  Page {page}: {}", image.display());
            } else {
                println!(
                    "  {}",
                    format!("Page {page}: image not found ({})", image.display()).yellow()
                );
            }
        }
    }
}
