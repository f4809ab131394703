use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use furiganize::{
    AlignPolicy, Compiler, Document, Furiganizer, MarkupStyle, RubyGrouping, Template, Tokenizer,
};
use glob::glob;
use indicatif::ProgressStyle;
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use rustc_hash::FxHashSet;
use tracing::{info, info_span};
use tracing_indicatif::{IndicatifLayer, span_ext::IndicatifSpanExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input paths or glob patterns, e.g. 'texts/*.txt' or 'novel.txt'
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Compiled vibrato system dictionary (e.g. IPADIC system.dic)
    #[arg(short, long, env = "FURIGANIZE_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Feature column holding the katakana reading in the dictionary.
    #[arg(long, default_value_t = 7)]
    reading_field: usize,

    /// Document template with <<TITLE>>, <<AUTHOR>> and <<CONTENT>>. Defaults to the bundled A6 vertical layout.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// How ruby is spread over a multi-character base.
    #[arg(long, value_enum, default_value_t = Grouping::Group)]
    grouping: Grouping,

    /// Control sequence used for ruby, without the backslash.
    #[arg(long, default_value = "ruby")]
    ruby_command: String,

    /// Which end of a word absorbs kana shared between reading and okurigana.
    #[arg(long, value_enum, default_value_t = Policy::Reverse)]
    policy: Policy,

    /// Annotate paragraphs in parallel.
    #[arg(long)]
    parallel: bool,

    /// Only write the annotated source, not its plain counterpart.
    #[arg(long)]
    no_plain: bool,

    /// Run the document compiler on every written source.
    #[arg(long)]
    compile: bool,

    /// Document compiler program.
    #[arg(long, default_value = "lualatex")]
    compiler: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Grouping {
    #[value(name = "g")]
    Group,
    #[value(name = "m")]
    Mono,
    #[value(name = "j")]
    Jukugo,
}

impl From<Grouping> for RubyGrouping {
    fn from(grouping: Grouping) -> Self {
        match grouping {
            Grouping::Group => RubyGrouping::Group,
            Grouping::Mono => RubyGrouping::Mono,
            Grouping::Jukugo => RubyGrouping::Jukugo,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Reverse,
    Forward,
}

impl From<Policy> for AlignPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Reverse => AlignPolicy::ReverseThenFlip,
            Policy::Forward => AlignPolicy::Forward,
        }
    }
}

fn main() -> Result<()> {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "furiganize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    let cli = Cli::parse();

    let mut input_paths: FxHashSet<PathBuf> = FxHashSet::default();

    for pattern in &cli.inputs {
        let entries = glob(pattern)
            .into_diagnostic()
            .wrap_err_with(|| miette!("Failed to expand glob pattern: {pattern:?}"))?;

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    input_paths.insert(path);
                }
                _ => {}
            }
        }
    }

    if input_paths.is_empty() {
        return Err(miette!("No input files found"));
    }

    let mut input_paths: Vec<PathBuf> = input_paths.into_iter().collect();
    input_paths.sort();

    if !cli.out_dir.exists() {
        fs::create_dir_all(&cli.out_dir)
            .into_diagnostic()
            .wrap_err_with(|| miette!("Failed to create out-dir: {:?}", cli.out_dir))?;
    }

    let template = match &cli.template {
        Some(path) => Template::read(path)?,
        None => Template::default(),
    };

    let style = MarkupStyle {
        ruby_command: cli.ruby_command.clone(),
        grouping: cli.grouping.into(),
        ..MarkupStyle::default()
    };

    let furiganizer = Furiganizer::new(load_tokenizer(&cli)?)
        .with_policy(cli.policy.into())
        .with_style(style)
        .with_parallel(cli.parallel);

    info!(
        "Processing {} inputs -> {:?}...",
        input_paths.len(),
        cli.out_dir
    );

    let inputs_span = info_span!("furiganize_inputs");
    inputs_span.pb_set_style(
        &ProgressStyle::with_template(
            "{msg} [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise}]",
        )
        .into_diagnostic()?,
    );
    inputs_span.pb_set_length(input_paths.len() as u64);
    inputs_span.pb_set_message("Processing text inputs");

    let inputs_span_enter = inputs_span.enter();

    for in_path in &input_paths {
        inputs_span.pb_inc(1);
        inputs_span.pb_set_message(&format!("Processing {}", in_path.display()));

        process_text(&cli, &furiganizer, &template, in_path)
            .wrap_err_with(|| miette!("Failed to process {:?}", in_path))?;
    }

    drop(inputs_span_enter);
    drop(inputs_span);

    info!("Done processing inputs.");

    Ok(())
}

#[cfg(feature = "vibrato")]
fn load_tokenizer(cli: &Cli) -> Result<Box<dyn Tokenizer>> {
    use furiganize::tokenizer::vibrato::VibratoTokenizer;

    let path = cli.dictionary.as_ref().ok_or_else(|| {
        miette!("A dictionary is required: pass --dictionary or set FURIGANIZE_DICTIONARY")
    })?;

    let tokenizer = VibratoTokenizer::from_path(path)
        .map_err(|e| miette!("{:#}", e))?
        .with_reading_field(cli.reading_field);

    Ok(Box::new(tokenizer))
}

#[cfg(not(feature = "vibrato"))]
fn load_tokenizer(_cli: &Cli) -> Result<Box<dyn Tokenizer>> {
    Err(miette!(
        "No tokenizer available: rebuild with the `vibrato` feature"
    ))
}

fn process_text(
    cli: &Cli,
    furiganizer: &Furiganizer<Box<dyn Tokenizer>>,
    template: &Template,
    in_path: &Path,
) -> Result<()> {
    let document = Document::read(in_path)?;
    let rendered = furiganize::render_document(&document, furiganizer)?;

    let stem = in_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| miette!("Invalid file name: {:?}", in_path))?;

    let mut outputs = vec![(cli.out_dir.join(format!("{stem}.tex")), rendered.annotated)];

    if !cli.no_plain {
        outputs.push((cli.out_dir.join(format!("{stem}-plain.tex")), rendered.plain));
    }

    let compiler = Compiler::new(&cli.compiler);

    for (out_path, content) in &outputs {
        template.write(out_path, &document.title, &document.author, content)?;

        if cli.compile {
            compiler.compile(out_path)?;
        }
    }

    Ok(())
}
