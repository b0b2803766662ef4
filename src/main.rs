//! Wisp - Minimal Web Page Viewer
//!
//! Entry point: opens the viewer window, or with `--dump <url>` prints the
//! laid-out text of a page to stdout.

use std::env;
use std::process;
use wisp::renderer::{Rect, RecordingSurface};
use wisp::{NAME, Session, VERSION, ViewerConfig};

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config: Option<String>,
    dump: Option<String>,
    /// Address to open instead of the configured home page
    address: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: wisp [--config <file>] [--dump <url>] [url]");
            process::exit(2);
        }
    };

    let mut config = match &options.config {
        Some(path) => match ViewerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load {path}: {e}");
                process::exit(1);
            }
        },
        None => ViewerConfig::default(),
    };
    if let Some(address) = options.address {
        config.home_url = address;
    }

    match options.dump {
        Some(url) => run_dump_mode(&config, &url),
        None => run_gui_mode(config),
    }
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a file path")?;
                options.config = Some(path.clone());
            }
            "--dump" => {
                let url = iter.next().ok_or("--dump needs a URL")?;
                options.dump = Some(url.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            address => {
                if options.address.replace(address.to_string()).is_some() {
                    return Err("only one address may be given".to_string());
                }
            }
        }
    }
    Ok(options)
}

fn run_dump_mode(config: &ViewerConfig, url: &str) {
    let result = Session::with_network(config).and_then(|mut session| {
        session.open(url)?;
        Ok(session)
    });
    let mut session = match result {
        Ok(session) => session,
        Err(e) => {
            eprintln!("❌ Failed to load {url}: {e}");
            process::exit(1);
        }
    };

    // Measure first so a single viewport covers the whole page
    let mut surface = RecordingSurface::default();
    let width = config.window_width as f32;
    session.render(&mut surface, Rect::new(0.0, 0.0, width, 0.0), 0.0, false);
    let height = session.page_height();
    session.render(&mut surface, Rect::new(0.0, 0.0, width, height), 0.0, true);

    if let Some(title) = session.title() {
        println!("# {title}");
        println!();
    }
    for line in surface.text_lines() {
        println!("{line}");
    }
}

fn run_gui_mode(config: ViewerConfig) {
    println!("🚀 {} v{} - Starting GUI...", NAME, VERSION);

    let session = match Session::with_network(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("❌ Failed to start viewer: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = wisp::ui::run(config, session) {
        eprintln!("❌ Failed to start viewer: {}", e);
        process::exit(1);
    }
}
