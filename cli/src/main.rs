//! react-loop CLI: answer logistics queries with a Gemini-backed ReAct loop.
//!
//! One-shot: `react-loop "Find a route from Boston to Miami"`.
//! Interactive: `react-loop` or `react-loop -i`.

mod display;
mod interrupt;
mod log_format;
mod logging;
mod repl;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use react_loop::{
    register_logistics_tools, ChatGemini, ErrorPolicy, LlmError, ModelConfig, PromptTemplate,
    ReactOptions, ReactOutcome, ReactRunner, ToolRegistry, DEFAULT_ITERATION_BUDGET,
};

use crate::interrupt::Interrupts;

const APP_NAME: &str = "react-loop";

#[derive(Parser, Debug)]
#[command(name = "react-loop")]
#[command(about = "ReAct logistics planner: a model reasons, calls tools and answers")]
struct Args {
    /// Query to answer once (omit to start the interactive prompt)
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    query: Vec<String>,

    /// Interactive REPL (after the query, if one is given)
    #[arg(short, long)]
    interactive: bool,

    /// Max model calls per query
    #[arg(long, env = "REACT_BUDGET", default_value_t = DEFAULT_ITERATION_BUDGET)]
    budget: u32,

    /// Gemini model name (default: gemini-1.5-flash)
    #[arg(long, env = "REACT_MODEL")]
    model: Option<String>,

    /// Sampling temperature, 0.0-1.0
    #[arg(long, env = "REACT_TEMPERATURE")]
    temperature: Option<f32>,

    /// Nucleus sampling, 0.0-1.0
    #[arg(long, env = "REACT_TOP_P")]
    top_p: Option<f32>,

    /// Candidate tokens considered per step
    #[arg(long, env = "REACT_TOP_K")]
    top_k: Option<u32>,

    /// Model call timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS", env = "REACT_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Tool call timeout in seconds
    #[arg(long, value_name = "SECS", env = "REACT_TOOL_TIMEOUT")]
    tool_timeout: Option<u64>,

    /// Pause before each model and tool call, in milliseconds
    #[arg(long, value_name = "MS", env = "REACT_DELAY_MS", default_value_t = 0)]
    delay: u64,

    /// Stop a query at its first error instead of letting the model retry
    #[arg(long)]
    abort_on_error: bool,

    /// Prompt template file with {query}, {history} and {tools} placeholders
    #[arg(long, value_name = "PATH", env = "REACT_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// Print each iteration's model output, tool calls and observations to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the full outcome (answer, termination, history, usage) as JSON
    #[arg(long)]
    json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", env = "REACT_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn query_text(&self) -> Option<String> {
        let q = self.query.join(" ");
        (!q.trim().is_empty()).then_some(q)
    }

    fn react_options(&self) -> Result<ReactOptions, react_loop::OptionsError> {
        let model_timeout = (self.timeout > 0).then(|| Duration::from_secs(self.timeout));
        let policy = if self.abort_on_error {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Continue
        };
        ReactOptions::builder()
            .iteration_budget(self.budget)
            .model_timeout(model_timeout)
            .tool_timeout(self.tool_timeout.map(Duration::from_secs))
            .step_delay(Duration::from_millis(self.delay))
            .error_policy(policy)
            .build()
    }

    fn model_config(&self) -> Result<ModelConfig, LlmError> {
        let mut config = ModelConfig::from_env()?;
        if let Some(ref model) = self.model {
            config = config.with_model(model.clone());
        }
        if let Some(t) = self.temperature {
            config.temperature = t;
        }
        if let Some(p) = self.top_p {
            config.top_p = p;
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        Ok(config)
    }
}

/// How answers and progress are printed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OutputMode {
    pub verbose: bool,
    pub json: bool,
}

/// Runs one query; Ctrl-C cancels it before the next iteration.
pub(crate) async fn run_query(
    runner: &ReactRunner,
    query: &str,
    mode: OutputMode,
    interrupts: &Interrupts,
) -> ReactOutcome {
    let cancel = interrupts.begin();
    let outcome = runner
        .process_cancellable(query, &cancel, |event| {
            if mode.verbose {
                if let Some(line) = display::format_event(&event, display::DEFAULT_EVENT_MAX_LEN) {
                    eprintln!("{}", line);
                }
            }
        })
        .await;
    interrupts.finish();
    outcome
}

/// Prints the answer (or the whole outcome as JSON) to stdout.
pub(crate) fn print_outcome(
    outcome: &ReactOutcome,
    mode: OutputMode,
) -> Result<(), Box<dyn std::error::Error>> {
    if mode.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", outcome.answer);
        if let Some(note) = display::outcome_note(outcome) {
            eprintln!("{}", note);
        }
    }
    std::io::stdout().flush()?;
    Ok(())
}

/// Exits with a message when the API key or the prompt template is unusable.
fn build_runner(args: &Args, options: ReactOptions) -> ReactRunner {
    let config = match args.model_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("react-loop: {}", e);
            eprintln!("Tip: put GOOGLE_API_KEY in .env or ~/.config/react-loop/config.toml [env]");
            std::process::exit(1);
        }
    };
    tracing::info!(model = %config.model, budget = options.iteration_budget(), "starting");

    let mut tools = ToolRegistry::new();
    register_logistics_tools(&mut tools);

    let mut runner = ReactRunner::new(Arc::new(ChatGemini::new(config)), Arc::new(tools), options);
    if let Some(ref path) = args.prompt_file {
        match PromptTemplate::load(path) {
            Ok(template) => runner = runner.with_template(template),
            Err(e) => {
                eprintln!("react-loop: {}", e);
                std::process::exit(1);
            }
        }
    }
    runner
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let applied = config::load_and_apply(APP_NAME, None::<&std::path::Path>);

    let args = Args::parse();
    let _log_guard = logging::init(args.log_file.as_deref())?;
    match applied {
        Ok(a) if !a.is_empty() => tracing::debug!(?a, "applied config"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "config not loaded"),
    }

    let options = match args.react_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("react-loop: {}", e);
            std::process::exit(2);
        }
    };
    let runner = build_runner(&args, options);
    let mode = OutputMode {
        verbose: args.verbose,
        json: args.json,
    };

    let interrupts = Interrupts::install();

    let query = args.query_text();
    if let Some(ref q) = query {
        let outcome = run_query(&runner, q, mode, &interrupts).await;
        print_outcome(&outcome, mode)?;
    }
    if args.interactive || query.is_none() {
        repl::run_repl_loop(&runner, mode, &interrupts).await?;
    }
    Ok(())
}
