use anyhow::{Context, Result};
use inquire::{CustomType, Select, Text};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use strum::{EnumMessage as _, IntoEnumIterator};
use strum_macros::{EnumIter, EnumMessage};

use crate::ui::cli::args::{
    ClassifyArgs, Command, ControlArgs, DemoArgs, DumpFormat, InfoArgs, SessionArgs, TrainArgs,
};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, EnumIter, EnumMessage)]
enum TaskKind {
    #[strum(
        message = "Train",
        detailed_message = "Build a dataset snapshot from labelled examples."
    )]
    Train,
    #[strum(
        message = "Classify",
        detailed_message = "Print one prediction per frame of a frame file."
    )]
    Classify,
    #[strum(
        message = "Control",
        detailed_message = "Drive a cursor session over a frame file."
    )]
    Control,
    #[strum(
        message = "Demo",
        detailed_message = "Synthetic end-to-end session, no files needed."
    )]
    Demo,
    #[strum(
        message = "Info",
        detailed_message = "Show a dataset's dimensionality and per-class counts."
    )]
    Info,
}

struct TaskItem {
    kind: TaskKind,
    text: String,
}

impl TaskItem {
    fn new(kind: TaskKind) -> Self {
        let label = kind.get_message().unwrap_or("task");
        let desc = kind.get_detailed_message().unwrap_or("");
        let text = if desc.is_empty() {
            label.to_string()
        } else {
            format!("{label}  {DIM_ITALIC}{desc}{RESET}")
        };
        TaskItem { kind, text }
    }
}

impl Display for TaskItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Interactive fallback used when the binary runs without a subcommand.
pub fn prompt_command() -> Result<Command> {
    let items: Vec<TaskItem> = TaskKind::iter().map(TaskItem::new).collect();
    let selected = Select::new("Choose a task:", items)
        .with_help_message("Every task is also available as a subcommand; see --help")
        .prompt()?;

    match selected.kind {
        TaskKind::Train => prompt_train(),
        TaskKind::Classify => prompt_classify(),
        TaskKind::Control => prompt_control(),
        TaskKind::Demo => prompt_demo(),
        TaskKind::Info => prompt_info(),
    }
}

fn prompt_train() -> Result<Command> {
    let examples = optional_text(
        "Examples file:",
        "One 'label,v1,v2,...' per line. Blank draws synthetic examples instead",
    )?
    .map(PathBuf::from);

    let (labels, examples_per_label, dimensions, noise, seed) = if examples.is_none() {
        (
            Text::new("Labels:")
                .with_default("Left,Right,Up,Down,Stop")
                .prompt()?,
            CustomType::<u64>::new("Examples per label:")
                .with_default(20)
                .prompt()?,
            CustomType::<u64>::new("Dimensions:").with_default(16).prompt()?,
            CustomType::<f64>::new("Noise half-width:")
                .with_default(0.5)
                .prompt()?,
            CustomType::<u64>::new("Seed:").with_default(42).prompt()?,
        )
    } else {
        ("Left,Right,Up,Down,Stop".to_string(), 20, 16, 0.5, 42)
    };

    let output = Text::new("Output dataset file:")
        .with_default("dataset.json")
        .prompt()?;

    Ok(Command::Train(TrainArgs {
        synthetic: examples.is_none(),
        examples,
        labels,
        examples_per_label,
        dimensions,
        noise,
        seed,
        output: PathBuf::from(output),
    }))
}

fn prompt_classify() -> Result<Command> {
    Ok(Command::Classify(ClassifyArgs {
        dataset: prompt_dataset_path()?,
        frames: prompt_frames_path()?,
        k: CustomType::<u64>::new("Neighbors (k):").with_default(3).prompt()?,
    }))
}

fn prompt_control() -> Result<Command> {
    Ok(Command::Control(ControlArgs {
        dataset: prompt_dataset_path()?,
        frames: prompt_frames_path()?,
        session: prompt_session()?,
    }))
}

fn prompt_demo() -> Result<Command> {
    Ok(Command::Demo(DemoArgs {
        labels: Text::new("Labels:")
            .with_default("Left,Right,Up,Down,Stop")
            .prompt()?,
        examples_per_label: CustomType::<u64>::new("Examples per label:")
            .with_default(20)
            .prompt()?,
        dimensions: CustomType::<u64>::new("Dimensions:").with_default(16).prompt()?,
        noise: CustomType::<f64>::new("Noise half-width:")
            .with_default(0.5)
            .prompt()?,
        seed: CustomType::<u64>::new("Seed:").with_default(42).prompt()?,
        frames: CustomType::<u64>::new("Frames to stream:")
            .with_default(200)
            .prompt()?,
        session: prompt_session()?,
    }))
}

fn prompt_info() -> Result<Command> {
    Ok(Command::Info(InfoArgs {
        dataset: prompt_dataset_path()?,
    }))
}

fn prompt_session() -> Result<SessionArgs> {
    let k = CustomType::<u64>::new("Neighbors (k):").with_default(3).prompt()?;
    let width = CustomType::<f64>::new("Plane width:").with_default(800.0).prompt()?;
    let height = CustomType::<f64>::new("Plane height:")
        .with_default(600.0)
        .prompt()?;
    let step = CustomType::<f64>::new("Cursor step:").with_default(5.0).prompt()?;

    let distraction_label = optional_text(
        "Distraction label:",
        "Shrinks the focus zoom while this label wins. Blank disables tracking",
    )?;
    let max_frames = optional_u64("Max frames:", "Upper bound on frames")?;

    let trace_file = optional_text("Trace file:", "Blank skips the trace dump")?.map(PathBuf::from);
    let trace_format = if trace_file.is_some() {
        match Select::new("Trace format:", vec!["csv", "tsv", "json"]).prompt()? {
            "tsv" => DumpFormat::Tsv,
            "json" => DumpFormat::Json,
            _ => DumpFormat::Csv,
        }
    } else {
        DumpFormat::default()
    };

    Ok(SessionArgs {
        k,
        width,
        height,
        step,
        distraction_label,
        max_frames,
        trace_file,
        trace_format,
    })
}

fn prompt_dataset_path() -> Result<PathBuf> {
    Ok(PathBuf::from(
        Text::new("Dataset file:").with_default("dataset.json").prompt()?,
    ))
}

fn prompt_frames_path() -> Result<PathBuf> {
    Ok(PathBuf::from(Text::new("Frames file:").prompt()?))
}

fn optional_text(title: &str, help: &str) -> Result<Option<String>> {
    let answer = Text::new(title).with_help_message(help).prompt()?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        None
    } else {
        Some(answer.to_string())
    })
}

fn optional_u64(title: &str, help: &str) -> Result<Option<u64>> {
    let help = format!("{help} (leave blank for none)");
    let answer = Text::new(title).with_help_message(&help).prompt()?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    let n: u64 = answer
        .parse()
        .with_context(|| format!("invalid integer for {title}"))?;
    Ok(Some(n))
}
