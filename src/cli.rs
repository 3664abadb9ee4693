//! quizforge command line: an interactive practice REPL, a headless
//! `generate` command, and `status`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::GenerationClient;
use crate::config::Config;
use crate::errors::QuizError;
use crate::export;
use crate::input::{self, InputConfig, QuizEditor, ReadlineResult, ReplCommand};
use crate::quiz::{Difficulty, GenerationRequest, QuizController, RevealToken};
use crate::redact::mask_key;
use crate::session::SessionForm;
use crate::telemetry::{init_tracing, init_tracing_verbose, track_generation};
use crate::ui::render;
use crate::ui::spinner::Spinner;
use crate::ui::style::{self, Glyphs, QuizStyle};

#[derive(Parser)]
#[command(name = "quizforge")]
#[command(about = "Generate multiple-choice quizzes on any topic and practice them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Use plain ASCII glyphs
    #[arg(long, global = true)]
    ascii: bool,

    /// Log requests, retries and skipped records to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

/// Output format for `generate` and `status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive practice session (default)
    #[command(alias = "p")]
    Practice,

    /// Generate one quiz and print it with the answers revealed
    #[command(alias = "g")]
    Generate {
        /// Quiz topic
        #[arg(short, long)]
        topic: String,

        /// Number of questions (1-100)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,

        #[arg(short, long, value_enum)]
        difficulty: Option<Difficulty>,

        /// Also write the quiz as a PDF
        #[arg(long)]
        pdf: bool,

        /// Directory for the PDF (defaults to the configured output dir)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Show the effective configuration
    Status {
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_tracing_verbose();
    } else {
        init_tracing();
    }

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }
    if cli.ascii {
        style::set_ascii_mode(true);
    }

    let config_path = cli.config.as_deref().map(resolve_config_path);
    let config = Config::load(config_path.as_deref())
        .map_err(|e| QuizError::Configuration(format!("{:#}", e)))?;

    match cli.command.unwrap_or(Commands::Practice) {
        Commands::Practice => run_practice(config).await,
        Commands::Generate {
            topic,
            count,
            difficulty,
            pdf,
            output_dir,
            output_format,
        } => {
            let request = GenerationRequest::new(
                &topic,
                count.unwrap_or(config.quiz.default_count),
                difficulty.unwrap_or(config.quiz.default_difficulty),
            )?;
            let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
            let pdf_dir = pdf.then_some(output_dir.as_path());
            run_generate(&config, &request, pdf_dir, output_format).await
        }
        Commands::Status { output_format } => {
            print_status(&config, config_path.as_deref(), output_format)
        }
    }
}

/// Expand `~/` and make relative paths absolute against the working directory.
fn resolve_config_path(p: &str) -> String {
    let expanded = match p.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest).to_string_lossy().to_string())
            .unwrap_or_else(|| p.to_string()),
        None => p.to_string(),
    };

    if Path::new(&expanded).is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded).to_string_lossy().to_string())
            .unwrap_or(expanded)
    }
}

fn received_line(records: usize) -> String {
    match records {
        1 => "Received 1 question".to_string(),
        n => format!("Received {} questions", n),
    }
}

async fn run_generate(
    config: &Config,
    request: &GenerationRequest,
    pdf_dir: Option<&Path>,
    output_format: OutputFormat,
) -> Result<()> {
    if !config.has_api_key() {
        return Err(QuizError::missing_api_key().into());
    }
    let client = GenerationClient::new(config)?;

    let spinner = (output_format == OutputFormat::Text).then(|| {
        Spinner::start(&format!(
            "Generating {} {} questions on {}",
            request.count(),
            request.difficulty(),
            request.topic()
        ))
    });
    let result = track_generation(request.topic(), client.generate(request)).await;
    let records = match result {
        Ok(records) => {
            if let Some(s) = spinner {
                s.stop_success(&received_line(records.len()));
            }
            records
        }
        Err(e) => {
            if let Some(s) = spinner {
                s.stop_error(&e.user_message());
            }
            return Err(e.into());
        }
    };

    // Headless output always shows the answers.
    let interval = match output_format {
        OutputFormat::Text => config.reveal_interval(),
        OutputFormat::Json => Duration::ZERO,
    };
    let mut controller = QuizController::new(interval);
    controller.toggle_practice_mode();
    controller.begin_generation();
    let token = controller.ingest(&records);

    match output_format {
        OutputFormat::Text => {
            print_reveal(&controller, token).await;
        }
        OutputFormat::Json => {
            token.finished().await;
        }
    }
    let state = controller.snapshot();

    let exported = match pdf_dir {
        Some(dir) => {
            match export::export(request.topic(), &state.questions, &state.answers, false)? {
                Some(doc) => Some(doc.write_to(dir)?),
                None => None,
            }
        }
        None => None,
    };

    match output_format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "topic": request.topic(),
                "difficulty": request.difficulty(),
                "requested": request.count(),
                "questions": state.questions,
                "notice": state.notice,
                "pdf": exported.as_ref().map(|p| p.display().to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if let Some(notice) = &state.notice {
                println!("{}", render::notice_line(notice));
            }
            if let Some(path) = &exported {
                println!("{} Saved {}", Glyphs::document(), path.display());
            }
        }
    }
    Ok(())
}

/// Print questions as the reveal task appends them. Ctrl+C stops the
/// reveal early. Returns how many questions were printed.
async fn print_reveal(controller: &QuizController, mut token: RevealToken) -> usize {
    let mut printed = 0;
    loop {
        let more = tokio::select! {
            step = token.next() => step.is_some(),
            _ = tokio::signal::ctrl_c() => {
                token.cancel();
                false
            }
        };
        let state = controller.snapshot();
        for (i, question) in state.questions.iter().enumerate().skip(printed) {
            println!(
                "{}",
                render::question_card(i, question, state.answer_for(i), state.practice_mode)
            );
        }
        printed = state.questions.len();
        if !more {
            return printed;
        }
    }
}

fn print_status(config: &Config, config_path: Option<&str>, output_format: OutputFormat) -> Result<()> {
    let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty());
    match output_format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "config_file": config_path,
                "endpoint": config.endpoint,
                "model": config.model,
                "api_key": api_key.map(mask_key),
                "timeout_secs": config.request.timeout_secs,
                "connect_timeout_secs": config.request.connect_timeout_secs,
                "max_retries": config.retry.max_retries,
                "base_delay_ms": config.retry.base_delay_ms,
                "default_count": config.quiz.default_count,
                "default_difficulty": config.quiz.default_difficulty,
                "practice_mode": config.quiz.practice_mode,
                "reveal_interval_ms": config.quiz.reveal_interval_ms,
                "output_dir": config.export.output_dir.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Text => {
            println!("\n{}\n", "quizforge status".title());
            if let Some(path) = config_path {
                println!("   Config file: {}", path);
            }
            println!("   Endpoint: {}", config.endpoint);
            println!("   Model: {}", config.model);
            match api_key {
                Some(key) => println!("   API key: {}", mask_key(key)),
                None => println!("   API key: {}", "not set".incorrect()),
            }
            println!(
                "   Timeout: {}s (connect {}s)",
                config.request.timeout_secs, config.request.connect_timeout_secs
            );
            println!(
                "   Retries: {} (base delay {}ms)",
                config.retry.max_retries, config.retry.base_delay_ms
            );
            println!(
                "   Defaults: {} {} questions, practice mode {}",
                config.quiz.default_count,
                config.quiz.default_difficulty,
                if config.quiz.practice_mode { "on" } else { "off" }
            );
            println!("   Reveal interval: {}ms", config.quiz.reveal_interval_ms);
            println!("   Output dir: {}", config.export.output_dir.display());
        }
    }
    Ok(())
}

/// State of one interactive session.
struct Repl {
    config: Config,
    form: SessionForm,
    controller: QuizController,
    /// Topic the current quiz was generated for.
    quiz_topic: Option<String>,
}

async fn run_practice(config: Config) -> Result<()> {
    let mut editor = QuizEditor::new(InputConfig::default())
        .context("Failed to initialise the line editor")?;

    let mut repl = Repl::new(config);

    println!(
        "{} Type {} for commands, {} to leave.",
        "quizforge".title(),
        "help".option_key(),
        "quit".option_key()
    );
    if !repl.config.has_api_key() {
        println!("{}", render::notice_line(&QuizError::missing_api_key().to_string()));
    }

    loop {
        let state = repl.controller.snapshot();
        editor.set_prompt_context(
            &repl.form.topic,
            state.practice_mode,
            colored::control::SHOULD_COLORIZE.should_colorize(),
        );

        let line = match editor.read_line()? {
            ReadlineResult::Line(line) => line,
            ReadlineResult::Interrupt => continue,
            ReadlineResult::Eof => break,
        };

        let command = match input::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", render::error_line(&message));
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }
        repl.handle(command).await;
    }
    Ok(())
}

impl Repl {
    fn new(config: Config) -> Self {
        let mut repl = Repl {
            form: SessionForm::from_settings(&config.quiz),
            controller: QuizController::new(config.reveal_interval()),
            quiz_topic: None,
            config,
        };
        if !repl.config.quiz.practice_mode {
            repl.controller.toggle_practice_mode();
        }
        repl
    }

    async fn handle(&mut self, command: ReplCommand) {
        match command {
            ReplCommand::Empty | ReplCommand::Quit => {}
            ReplCommand::Topic(topic) => {
                self.form.set_topic(&topic);
                println!("Topic: {}", self.form.topic);
            }
            ReplCommand::Count(raw) => {
                let warning = self.form.set_count(&raw);
                println!("Count: {}", self.form.count);
                if let Some(warning) = warning {
                    println!("{}", render::error_line(&warning));
                }
            }
            ReplCommand::Difficulty(raw) => match self.form.set_difficulty(&raw) {
                Ok(()) => println!("Difficulty: {}", self.form.difficulty),
                Err(e) => println!("{}", render::error_line(&e.user_message())),
            },
            ReplCommand::Generate => self.generate().await,
            ReplCommand::Answer { number, key } => self.answer(number, &key),
            ReplCommand::TogglePractice => {
                let on = self.controller.toggle_practice_mode();
                println!("Practice mode {}", if on { "on" } else { "off" });
                print!("{}", render::quiz_view(&self.controller.snapshot()));
            }
            ReplCommand::Score => {
                let state = self.controller.snapshot();
                if state.practice_mode {
                    println!("{}", render::score_line(state.score()));
                } else {
                    println!("Score is only tracked in practice mode.");
                }
            }
            ReplCommand::Show => {
                println!("{}", render::form_line(&self.form));
                print!("{}", render::quiz_view(&self.controller.snapshot()));
            }
            ReplCommand::Export(dir) => self.export(dir),
            ReplCommand::Help(None) => print_help(),
            ReplCommand::Help(Some(entry)) => {
                println!(
                    "   {}  {}",
                    entry.synopsis().option_key(),
                    entry.description.muted()
                );
            }
        }
    }

    async fn generate(&mut self) {
        let request = match self.form.request() {
            Ok(request) => request,
            Err(e) => {
                self.report(e.user_message());
                return;
            }
        };
        let client = match GenerationClient::new(&self.config) {
            Ok(client) => client,
            Err(e) => {
                self.report(e.user_message());
                return;
            }
        };

        self.controller.begin_generation();
        self.quiz_topic = Some(request.topic().to_string());

        let spinner = Spinner::start(&format!(
            "Generating {} {} questions on {}",
            request.count(),
            request.difficulty(),
            request.topic()
        ));
        let outcome = tokio::select! {
            result = track_generation(request.topic(), client.generate(&request)) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        match outcome {
            Some(Ok(records)) => {
                spinner.stop_success(&received_line(records.len()));
                let token = self.controller.ingest(&records);
                print_reveal(&self.controller, token).await;
                let state = self.controller.snapshot();
                if let Some(notice) = &state.notice {
                    println!("{}", render::notice_line(notice));
                }
                if state.practice_mode && !state.questions.is_empty() {
                    println!("Answer with {}.", "answer <n> <key>".option_key());
                }
            }
            Some(Err(e)) => {
                spinner.stop_error("Generation failed");
                self.report(e.user_message());
            }
            None => {
                spinner.stop_error("Cancelled");
                self.report("Generation cancelled.".to_string());
            }
        }
    }

    fn answer(&mut self, number: usize, key: &str) {
        let index = number - 1;
        if self.controller.record_answer(index, key) {
            let state = self.controller.snapshot();
            if let Some(question) = state.questions.get(index) {
                print!(
                    "{}",
                    render::question_card(index, question, state.answer_for(index), true)
                );
            }
            println!("{}", render::score_line(state.score()));
            return;
        }

        let state = self.controller.snapshot();
        let reason = if !state.practice_mode {
            "Practice mode is off. Type 'practice' to turn it on.".to_string()
        } else if index >= state.questions.len() {
            format!("There is no question {}.", number)
        } else {
            format!("'{}' is not an option for Q{}.", key, number)
        };
        println!("{}", render::error_line(&reason));
    }

    fn export(&mut self, dir: Option<String>) {
        let state = self.controller.snapshot();
        let topic = self.quiz_topic.clone().unwrap_or_default();
        let dir = dir
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.export.output_dir.clone());

        let result = export::export(&topic, &state.questions, &state.answers, state.practice_mode)
            .and_then(|doc| doc.map(|d| d.write_to(&dir)).transpose());
        match result {
            Ok(Some(path)) => println!("{} Saved {}", Glyphs::document(), path.display()),
            Ok(None) => println!("{}", render::notice_line("Nothing to export yet.")),
            Err(e) => self.report(e.user_message()),
        }
    }

    fn report(&mut self, message: String) {
        println!("{}", render::error_line(&message));
        self.controller.fail(message);
    }
}

fn print_help() {
    println!("\n{}\n", "Commands".title());
    for entry in input::command_registry::COMMANDS {
        println!(
            "   {:<28} {}",
            entry.synopsis().option_key(),
            entry.description.muted()
        );
    }
    println!();
}
