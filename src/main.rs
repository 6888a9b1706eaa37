use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use schemars::schema_for;

use nabor::control::{CursorState, DirectionPad, FocusTracker};
use nabor::persistence::{load_dataset, save_dataset};
use nabor::store::{DatasetSnapshot, LabelledExampleStore};
use nabor::streams::{ClusterSource, CsvFrameSource, FeatureSource, read_examples};
use nabor::tasks::{ControlLoop, TickReport, TraceFormat};
use nabor::ui::cli::args::{
    Cli, ClassifyArgs, Command, ControlArgs, DemoArgs, InfoArgs, SessionArgs, TrainArgs,
};
use nabor::ui::cli::wizard::prompt_command;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => prompt_command().context("failed while prompting for task")?,
    };

    match command {
        Command::Train(args) => run_train(args),
        Command::Classify(args) => run_classify(args),
        Command::Control(args) => run_control(args),
        Command::Demo(args) => run_demo(args),
        Command::Info(args) => run_info(args),
        Command::Schema => run_schema(),
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut store = LabelledExampleStore::new();

    if let Some(path) = &args.examples {
        let examples = read_examples(path)
            .with_context(|| format!("failed to read examples from {}", path.display()))?;
        if examples.is_empty() {
            bail!("no labelled examples found in {}", path.display());
        }
        for (label, vector) in examples {
            store
                .add_example(vector, label)
                .context("failed to add example")?;
        }
    } else {
        let labels = split_labels(&args.labels)?;
        let mut source = ClusterSource::with_random_centroids(
            &labels,
            args.dimensions as usize,
            10.0,
            args.noise,
            args.seed,
            None,
        );
        for (label, vector) in source.training_examples(args.examples_per_label as usize) {
            store
                .add_example(vector, label)
                .context("failed to add synthetic example")?;
        }
    }

    let snapshot = store.export_snapshot();
    save_dataset(&args.output, &snapshot)
        .with_context(|| format!("failed to write dataset to {}", args.output.display()))?;

    println!(
        "{BOLD}{FG_CYAN}▶ Dataset written{RESET}  {DIM}{}{RESET}",
        args.output.display()
    );
    print_counts(&snapshot);
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let store = load_store(&args.dataset)?;
    let mut source = CsvFrameSource::new(args.frames.clone())
        .with_context(|| format!("failed to open frames file {}", args.frames.display()))?;

    // Every label the store knows about gets a column; labels missing from
    // a prediction display as 0%.
    let known_labels: Vec<String> = store.class_example_counts().into_keys().collect();

    let mut frame_no = 0u64;
    while let Some(frame) = source.next_frame() {
        frame_no += 1;
        let result = store
            .predict(&frame, args.k as usize)
            .with_context(|| format!("failed to classify frame #{frame_no}"))?;

        let mut cells = String::new();
        for label in &known_labels {
            let pct = result.confidence(label) * 100.0;
            cells.push_str(&format!("  {DIM}{label}{RESET} {pct:>5.1}%"));
        }
        println!(
            "{FG_GREEN}{frame_no:>5}{RESET}  {BOLD}{:<12}{RESET} {:>5.1}%{}",
            result.label,
            result.winning_confidence() * 100.0,
            cells
        );
    }
    Ok(())
}

fn run_control(args: ControlArgs) -> Result<()> {
    let store = load_store(&args.dataset)?;
    let source = CsvFrameSource::new(args.frames.clone())
        .with_context(|| format!("failed to open frames file {}", args.frames.display()))?;
    run_session(store, Box::new(source), args.session, "Control Session")
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let labels = split_labels(&args.labels)?;
    let mut source = ClusterSource::with_random_centroids(
        &labels,
        args.dimensions as usize,
        10.0,
        args.noise,
        args.seed,
        Some(args.frames),
    );

    let mut store = LabelledExampleStore::new();
    for (label, vector) in source.training_examples(args.examples_per_label as usize) {
        store
            .add_example(vector, label)
            .context("failed to add synthetic example")?;
    }

    run_session(store, Box::new(source), args.session, "Demo Session")
}

fn run_session(
    store: LabelledExampleStore,
    source: Box<dyn FeatureSource>,
    session: SessionArgs,
    title: &str,
) -> Result<()> {
    let pad = DirectionPad::arrows(session.step);
    let cursor = CursorState::new(session.width, session.height);

    let header = vec![
        format!("{BOLD}{FG_CYAN}▶ {title}{RESET}"),
        format!(
            "{DIM}k={}{RESET}  {DIM}plane={}x{}{RESET}  {DIM}step={}{RESET}  {}",
            session.k,
            session.width,
            session.height,
            session.step,
            timestamp_now()
        ),
        format!(
            "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
        ),
    ];

    let mut runner = ControlLoop::new(
        store,
        source,
        pad,
        cursor,
        session.k as usize,
        session.max_frames,
    )
    .context("failed to construct session")?;
    if let Some(label) = &session.distraction_label {
        runner = runner.with_focus(FocusTracker::new(label.clone()));
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let max_frames = session.max_frames;
    let render: JoinHandle<()> =
        std::thread::spawn(move || render_status_with_header(rx, header, 150, max_frames));
    let mut runner = runner.with_progress(tx);

    runner.run().context("session failed")?;

    if let Some(path) = &session.trace_file
        && !path.as_os_str().is_empty()
    {
        runner
            .trace()
            .export(path, TraceFormat::from(session.trace_format))
            .with_context(|| format!("failed to export trace to {}", path.display()))?;
    }

    drop(runner);
    let _ = render.join();
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let snapshot = load_dataset(&args.dataset)
        .with_context(|| format!("failed to load dataset from {}", args.dataset.display()))?;
    snapshot
        .validate()
        .context("dataset snapshot failed validation")?;

    println!(
        "{BOLD}{FG_CYAN}▶ Dataset{RESET}  {DIM}{}{RESET}",
        args.dataset.display()
    );
    print_counts(&snapshot);
    Ok(())
}

fn run_schema() -> Result<()> {
    let schema = schema_for!(DatasetSnapshot);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_store(path: &Path) -> Result<LabelledExampleStore> {
    let snapshot = load_dataset(path)
        .with_context(|| format!("failed to load dataset from {}", path.display()))?;
    let mut store = LabelledExampleStore::new();
    store
        .import_snapshot(snapshot)
        .context("dataset snapshot failed validation")?;
    if store.is_empty() {
        bail!(
            "dataset {} holds no examples; add some with `nabor train` first",
            path.display()
        );
    }
    Ok(store)
}

fn split_labels(raw: &str) -> Result<Vec<&str>> {
    let labels: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect();
    if labels.is_empty() {
        bail!("--labels must name at least one label");
    }
    Ok(labels)
}

fn print_counts(snapshot: &DatasetSnapshot) {
    println!(
        "{DIM}dimensions{RESET} {}  {DIM}examples{RESET} {}",
        snapshot
            .dimensions
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        snapshot.total_examples
    );
    for class in &snapshot.classes {
        println!(
            "  {FG_GREEN}{:<12}{RESET} {}",
            class.label,
            class.examples.len()
        );
    }
}

/// Print the header once, then refresh a single status line per report:
/// frames seen, winning label and confidence, cursor position, model size,
/// elapsed CPU time, zoom when tracked, and a progress bar when a frame cap
/// exists.
fn render_status_with_header(
    rx: Receiver<TickReport>,
    header_lines: Vec<String>,
    repaint_every_ms: u64,
    max_frames: Option<u64>,
) {
    for line in &header_lines {
        println!("{line}");
    }

    println!();
    let _ = io::stdout().flush();

    let tick = Duration::from_millis(repaint_every_ms);
    let mut last_draw = Instant::now();
    let mut last_report: Option<TickReport> = None;

    loop {
        match rx.recv_timeout(tick) {
            Ok(report) => last_report = Some(report),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(report) = last_report.take() {
                    print!("\r{}\x1B[K\n", format_status(&report, max_frames));
                    let _ = io::stdout().flush();
                }
                break;
            }
        }

        if last_draw.elapsed() >= tick {
            if let Some(report) = last_report.as_ref() {
                print!("\r{}\x1B[K", format_status(report, max_frames));
                let _ = io::stdout().flush();
            }
            last_draw = Instant::now();
        }
    }
}

fn format_status(r: &TickReport, max_frames: Option<u64>) -> String {
    let mut line = format!(
        "{FG_GREEN}{BOLD}frames{RESET} {:>7}  \
         {FG_CYAN}{BOLD}label{RESET} {:<10}  \
         {FG_MAGENTA}{BOLD}conf{RESET} {:>5.1}%  \
         {DIM}cursor{RESET} ({:>6.1},{:>6.1})  \
         {DIM}model{RESET} {:>8}B  \
         {DIM}t{RESET} {:>8.3}s",
        r.frames_seen,
        r.label,
        r.confidence * 100.0,
        r.cursor_x,
        r.cursor_y,
        r.model_bytes,
        r.seconds
    );

    if let Some(zoom) = r.zoom {
        line.push_str(&format!("  {DIM}zoom{RESET} {zoom:>5.2}"));
    }
    if let Some(cap) = max_frames {
        line.push_str(&format!(
            "  {DIM}[frames]{RESET} {}",
            progress_bar(r.frames_seen as f64, cap as f64, 15)
        ));
    }
    line
}

fn progress_bar(current: f64, total: f64, width: usize) -> String {
    if total.is_finite() && total > 0.0 {
        let ratio = (current / total).clamp(0.0, 1.0);
        let filled = (ratio * width as f64).round() as usize;
        let empty = width.saturating_sub(filled);
        return format!(
            "[{}{}] {:>3.0}%",
            "█".repeat(filled),
            "░".repeat(empty),
            ratio * 100.0
        );
    }

    String::new()
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
