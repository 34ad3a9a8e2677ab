// ABOUTME: CLI binary for the joblens job-posting extractor.
// ABOUTME: Extracts postings from URLs, local HTML files, or bulk search runs.

use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use joblens::{
    bulk, BulkOptions, ExtractOptions, Extractor, Fetcher, JobPosting, Strategy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "joblens")]
#[command(about = "Extract structured job postings from LinkedIn pages")]
struct Args {
    /// Extraction strategy: structural, soup, hybrid, default
    #[arg(short = 's', long = "strategy", default_value = "default")]
    strategy: String,

    /// Output as JSON instead of the display format
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<std::path::PathBuf>,

    /// Local HTML file to extract from instead of fetching
    #[arg(long = "html")]
    html: Option<std::path::PathBuf>,

    /// Run a bulk search with these keywords
    #[arg(long = "search")]
    search: Option<String>,

    /// Location filter for --search
    #[arg(long = "location", default_value = "")]
    location: String,

    /// Number of search result pages to walk with --search
    #[arg(long = "pages", default_value_t = 1)]
    pages: usize,

    /// Delay between posting fetches in milliseconds
    #[arg(long = "delay-ms", default_value_t = 2000)]
    delay_ms: u64,

    /// Override the guest API base URL (testing and proxies)
    #[arg(long = "base-url")]
    base_url: Option<String>,

    /// Job URLs to fetch and extract
    #[arg()]
    urls: Vec<String>,
}

fn make_fetcher(base_url: Option<&str>) -> Fetcher {
    match base_url {
        Some(base) => Fetcher::with_base_url(base),
        None => Fetcher::new(),
    }
}

fn format_output(postings: &[JobPosting], json_output: bool) -> String {
    if json_output {
        if postings.len() == 1 {
            serde_json::to_string_pretty(&postings[0]).unwrap_or_default()
        } else {
            serde_json::to_string_pretty(postings).unwrap_or_default()
        }
    } else {
        postings
            .iter()
            .map(JobPosting::format_display)
            .collect::<Vec<_>>()
            .join("\n\n----------------------------------------\n\n")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let strategy = match args.strategy.parse::<Strategy>() {
        Ok(strategy) => strategy,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let mode_count = [
        args.html.is_some(),
        args.search.is_some(),
        !args.urls.is_empty(),
    ]
    .iter()
    .filter(|&&set| set)
    .count();
    if mode_count == 0 {
        eprintln!("error: provide job URLs, --html <file>, or --search <keywords>");
        return ExitCode::from(1);
    }
    if mode_count > 1 {
        eprintln!("error: --html, --search, and positional URLs are mutually exclusive");
        return ExitCode::from(1);
    }

    let extractor = Extractor::new(ExtractOptions::with_strategy(strategy));
    let mut postings: Vec<JobPosting> = Vec::new();
    let mut had_error = false;

    if let Some(html_path) = &args.html {
        match fs::read_to_string(html_path) {
            Ok(html) => postings.push(extractor.extract(&html)),
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else if let Some(keywords) = &args.search {
        let fetcher = make_fetcher(args.base_url.as_deref());
        let opts = BulkOptions {
            keywords: keywords.clone(),
            location: args.location.clone(),
            pages: args.pages,
            delay: Duration::from_millis(args.delay_ms),
            ..BulkOptions::default()
        };
        postings = bulk::collect(&fetcher, &extractor, &opts).await;
        if postings.is_empty() {
            eprintln!("error: search returned no extractable postings");
            had_error = true;
        }
    } else {
        let fetcher = make_fetcher(args.base_url.as_deref());
        for url in &args.urls {
            match fetcher.fetch_job_url(url).await {
                Ok(html) => postings.push(extractor.extract(&html)),
                Err(e) => {
                    eprintln!("error fetching {}: {}", url, e);
                    had_error = true;
                }
            }
        }
    }

    if !postings.is_empty() {
        let output_str = format_output(&postings, args.json_output);
        if let Some(output_path) = &args.output {
            if let Err(e) = fs::write(output_path, &output_str) {
                eprintln!("error writing to {:?}: {}", output_path, e);
                had_error = true;
            }
        } else {
            println!("{}", output_str);
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
