use clap::{Parser, Subcommand};
use testdeck_client::ResultKind;

#[derive(Parser, Debug)]
#[command(name = "testdeck", version, about = "Drive the test workbench API from the terminal")]
pub struct Cli {
    /// API base URL, overrides TESTDECK_API_BASE
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check backend health
    Health {
        /// Keep checking every health interval until Ctrl+C
        #[arg(long)]
        watch: bool,
    },
    /// Follow an existing task until it ends
    Watch { task_id: String },
    /// Launch a test run
    Run {
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        product_id: Option<String>,
        /// Print the task id and return without polling
        #[arg(long)]
        no_wait: bool,
    },
    /// Launch product discovery
    Discover {
        #[arg(long)]
        no_wait: bool,
    },
    /// Generate an AI analysis report
    AiReport {
        #[arg(long, default_value = "deepseek")]
        provider: String,
        #[arg(long)]
        summary_only: bool,
        #[arg(long)]
        no_wait: bool,
    },
    /// Detect changes since the last run
    Changes {
        #[arg(long)]
        no_wait: bool,
    },
    /// Analyse result trends
    Trends {
        #[arg(long, default_value_t = 30)]
        days: u32,
        #[arg(long)]
        no_wait: bool,
    },
    /// List discovered products
    Products,
    /// List test reports, newest first
    Reports,
    /// Print the latest output of a finished job
    Latest {
        /// One of `report`, `changes` or `trends`
        kind: ResultKind,
    },
    /// Print the test suite health report
    SuiteHealth,
    /// Regenerate the quality dashboard
    Dashboard,
    /// Show the backend's system configuration
    Config,
}
