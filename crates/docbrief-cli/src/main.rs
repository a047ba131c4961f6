use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use docbrief_core::{
    BatchStats, DocumentRef, FsObjectStore, HttpObjectStore, ObjectStore, OpenAiSummarizer,
    Orchestrator, config_file, render_response,
};
use docbrief_extract::{ExtractionEngine, OcrEngine, TesseractOcr};
use docbrief_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// Document Summarizer - Fetch remote documents, extract their text, and summarize each one
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize each document reference, in order
    Summarize {
        /// Object-store keys (e.g. reports/scan.pdf photo.png)
        refs: Vec<String>,

        /// Base URL documents are fetched from
        #[arg(long)]
        store_url: Option<String>,

        /// Bearer token for the object store
        #[arg(long)]
        store_token: Option<String>,

        /// Read documents from a local directory instead of HTTP
        #[arg(long)]
        root: Option<PathBuf>,

        /// API key for the summarization endpoint
        #[arg(long)]
        api_key: Option<String>,

        /// OpenAI-compatible chat-completions endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Summarization model
        #[arg(long)]
        model: Option<String>,

        /// Maximum tokens per summary
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Tesseract language for OCR fallback
        #[arg(long)]
        lang: Option<String>,

        /// Path to output file (summaries go here, progress to stderr)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Check that the OCR engine is installed and usable
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Doctor => doctor(),
        Command::Summarize {
            refs,
            store_url,
            store_token,
            root,
            api_key,
            endpoint,
            model,
            max_tokens,
            lang,
            output,
            no_color,
        } => {
            summarize(
                refs,
                store_url,
                store_token,
                root,
                api_key,
                endpoint,
                model,
                max_tokens,
                lang,
                output,
                no_color,
            )
            .await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn summarize(
    refs: Vec<String>,
    store_url: Option<String>,
    store_token: Option<String>,
    root: Option<PathBuf>,
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    lang: Option<String>,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    if refs.is_empty() {
        anyhow::bail!("No document references given");
    }

    // Resolve configuration: CLI flags > env vars > config file
    let config = config_file::load_config();
    let store_config = config.object_store.unwrap_or_default();
    let summarizer_config = config.summarizer.unwrap_or_default();
    let ocr_config = config.ocr.unwrap_or_default();

    let store_url = store_url
        .or_else(|| std::env::var("DOCBRIEF_STORE_URL").ok())
        .or(store_config.base_url);
    let store_token = store_token
        .or_else(|| std::env::var("DOCBRIEF_STORE_TOKEN").ok())
        .or(store_config.token);
    let root = root.or(store_config.root.map(PathBuf::from));
    let api_key = api_key
        .or_else(|| std::env::var("DOCBRIEF_API_KEY").ok())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .or(summarizer_config.api_key);
    let endpoint = endpoint.or(summarizer_config.endpoint);
    let model = model.or(summarizer_config.model);
    let max_tokens = max_tokens.or(summarizer_config.max_tokens);
    let lang = lang.or(ocr_config.language).unwrap_or_else(|| "eng".to_string());

    // Determine color mode and output writer
    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    // Progress lines go to stderr when summaries are written to a file
    let mut progress: Box<dyn Write> = if output.is_some() {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };

    // Build the object store collaborator
    let store: Box<dyn ObjectStore> = if let Some(root) = root {
        Box::new(FsObjectStore::new(root))
    } else if let Some(url) = store_url {
        let mut store = HttpObjectStore::new(url);
        if let Some(token) = store_token {
            store = store.with_token(token);
        }
        Box::new(store)
    } else {
        anyhow::bail!(
            "No object store configured. Pass --store-url or --root (or set DOCBRIEF_STORE_URL)."
        );
    };

    // Build the summarization collaborator
    let Some(api_key) = api_key else {
        anyhow::bail!(
            "No API key for the summarization service. Pass --api-key or set DOCBRIEF_API_KEY."
        );
    };
    let mut summarizer = OpenAiSummarizer::new(api_key);
    if let Some(endpoint) = endpoint {
        summarizer = summarizer.with_endpoint(endpoint);
    }
    if let Some(model) = model {
        summarizer = summarizer.with_model(model);
    }
    if let Some(max_tokens) = max_tokens {
        summarizer = summarizer.with_max_tokens(max_tokens);
    }

    // Build the extraction engine
    let ocr = TesseractOcr::new().with_language(lang);
    let engine = ExtractionEngine::new(Box::new(MupdfBackend::new()), Box::new(ocr));

    let orchestrator = Orchestrator::new(store, Box::new(engine), Box::new(summarizer));

    let refs: Vec<DocumentRef> = refs.into_iter().map(DocumentRef::new).collect();
    let results = orchestrator.summarize_all(&refs).await;

    let total = results.len();
    for (index, result) in results.iter().enumerate() {
        output::print_result_line(&mut *progress, index, total, result, color)?;
    }
    let stats = BatchStats::from_summaries(&results);
    output::print_batch_summary(&mut *progress, &stats, color)?;
    progress.flush()?;

    writeln!(writer, "{}", render_response(&results))?;
    writer.flush()?;

    Ok(())
}

fn doctor() -> anyhow::Result<()> {
    let ocr = TesseractOcr::new();
    println!("OCR engine: {}", ocr.availability_hint());
    if !ocr.is_available() {
        std::process::exit(1);
    }
    Ok(())
}
