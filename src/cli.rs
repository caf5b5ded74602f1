use citygraph::QueueKind;
use clap::{Parser, ValueEnum};

use fleet_router::io::report_writer::ReportFormat;
use fleet_router::io::RouterSettings;
use fleet_router::routing::{DeadlinePolicy, RouterConfig, DEFAULT_MAX_EXACT_STOPS};

#[derive(Parser, Debug)]
#[command(version)]
pub struct ProgramArguments {
    #[arg(long, help = "rng seed")]
    pub seed: Option<i128>,

    #[arg(
        short,
        long,
        help = "scenario file path (toml)",
        required_unless_present = "sample"
    )]
    pub instance: Option<String>,

    #[arg(
        long,
        help = "use the built-in map of Brazil with N trucks per center",
        value_name = "N",
        conflicts_with = "instance"
    )]
    pub sample: Option<usize>,

    #[arg(long, help = "generate N random orders (appended to those of the scenario)")]
    pub generate: Option<usize>,

    #[arg(long, help = "distinct stops up to which all visiting orders are tried [default: 8]")]
    pub max_exact_stops: Option<usize>,

    #[arg(long, value_enum)]
    pub deadline_policy: Option<DeadlinePolicyArg>,

    #[arg(long, value_enum)]
    pub queue: Option<QueueArg>,

    #[arg(short, long, help = "report file path")]
    pub report: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub report_format: ReportFormatArg,

    #[arg(long, help = "print summary to stdout", default_value = "false")]
    pub print_summary_to_stdout: bool,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum DeadlinePolicyArg {
    Reject,
    AllowLate,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum QueueArg {
    BinaryHeap,
    LinearScan,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum ReportFormatArg {
    Text,
    Json,
}

impl ProgramArguments {
    /// Command line values win over the scenario's `[router]` table.
    pub fn router_config(&self, scenario: &RouterSettings) -> RouterConfig {
        RouterConfig {
            max_exact_stops: self
                .max_exact_stops
                .or(scenario.max_exact_stops)
                .unwrap_or(DEFAULT_MAX_EXACT_STOPS),
            deadline_policy: self
                .deadline_policy
                .map(|it| match it {
                    DeadlinePolicyArg::Reject => DeadlinePolicy::Reject,
                    DeadlinePolicyArg::AllowLate => DeadlinePolicy::AllowLate,
                })
                .or(scenario.deadline_policy)
                .unwrap_or_default(),
        }
    }

    /// The given seed, or a random non-negative one.
    pub fn seed(&self) -> i128 {
        self.seed.unwrap_or_else(|| non_negative(rand::random()))
    }

    pub fn queue(&self) -> Option<QueueKind> {
        self.queue.map(|it| match it {
            QueueArg::BinaryHeap => QueueKind::BinaryHeap,
            QueueArg::LinearScan => QueueKind::LinearScan,
        })
    }

    pub fn report_format(&self) -> ReportFormat {
        match self.report_format {
            ReportFormatArg::Text => ReportFormat::Text,
            ReportFormatArg::Json => ReportFormat::Json,
        }
    }
}

fn non_negative(seed: i128) -> i128 {
    seed & i128::MAX
}
