use clap::{Arg, Command};
use log::LevelFilter;
use phishguard::{AnalysisHistory, DetectionOutcome, DetectorConfig, PhishingDetector};
use std::process;

fn main() {
    let matches = Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Phishing detector for URLs and emails using a rule/model ensemble")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (defaults to built-in tables)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration to a file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("URL to analyze")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .value_name("TEXT")
                .help("Email address or raw message text to analyze")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("email-file")
                .long("email-file")
                .value_name("FILE")
                .help("File containing a raw email message to analyze")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print reports as JSON instead of text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .value_name("FILE")
                .help("Write the analysis history as JSON after the run"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(log_level).init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = DetectorConfig::generate_default(path) {
            eprintln!("Failed to generate config: {}", e);
            process::exit(1);
        }
        println!("Default configuration written to {}", path);
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match DetectorConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => DetectorConfig::default(),
    };

    let detector = match PhishingDetector::new(config) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("Failed to initialize detector: {}", e);
            process::exit(1);
        }
    };

    let as_json = matches.get_flag("json");
    let mut history = AnalysisHistory::new();
    let mut analyzed = 0usize;

    if let Some(urls) = matches.get_many::<String>("url") {
        for url in urls {
            let normalized = normalize_url(url);
            let outcome = detector.detect_phishing_url(&normalized);
            print_outcome(&outcome, as_json);
            record(&mut history, &outcome);
            analyzed += 1;
        }
    }

    if let Some(emails) = matches.get_many::<String>("email") {
        for content in emails {
            let outcome = detector.detect_phishing_email(content);
            print_outcome(&outcome, as_json);
            record(&mut history, &outcome);
            analyzed += 1;
        }
    }

    if let Some(paths) = matches.get_many::<String>("email-file") {
        for path in paths {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let outcome = detector.detect_phishing_email(&content);
                    print_outcome(&outcome, as_json);
                    record(&mut history, &outcome);
                    analyzed += 1;
                }
                Err(e) => eprintln!("Failed to read {}: {}", path, e),
            }
        }
    }

    if analyzed == 0 {
        eprintln!("Nothing to analyze. Pass --url, --email, or --email-file.");
        process::exit(2);
    }

    if let Some(path) = matches.get_one::<String>("export") {
        match history.to_json() {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    eprintln!("Failed to write history to {}: {}", path, e);
                }
            }
            Err(e) => eprintln!("Failed to serialize history: {}", e),
        }
    }
}

/// Scheme-less input gets an http:// prefix before extraction.
fn normalize_url(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn record(history: &mut AnalysisHistory, outcome: &DetectionOutcome) {
    if let Some(report) = outcome.as_report() {
        history.push(report.clone());
    }
}

fn print_outcome(outcome: &DetectionOutcome, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
        return;
    }

    match outcome {
        DetectionOutcome::Report(report) => {
            println!("Input: {}", report.input);
            println!(
                "Verdict: {} (confidence {:.2}, risk {})",
                if report.is_phishing {
                    "PHISHING"
                } else {
                    "SAFE"
                },
                report.confidence,
                report.risk_level
            );
            println!(
                "  rule-based: {} ({:.2})  model: {} ({:.2})",
                report.rule_based_result,
                report.rule_based_confidence,
                report.ml_result,
                report.ml_confidence
            );
            println!("{}", report.explanation);
        }
        DetectionOutcome::Failure(failure) => {
            println!("Analysis failed: {}", failure.error);
            println!("{}", failure.explanation);
        }
    }
}
