//! One-shot refresh: fetch once, print the rendered tables, exit.
//!
//! Usage: snapshot [--plain] [--url <base_url>]
//! Exits non-zero when the fetch fails.

use anyhow::{bail, Result};

use signaldash::client::{HttpSignalSource, SignalSource};
use signaldash::config::Config;
use signaldash::refresh::refresh_signals;
use signaldash::scheduler::SystemClock;
use signaldash::terminal::plain_text;
use signaldash::view::DashboardView;

struct Args {
    plain: bool,
    url: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args {
        plain: false,
        url: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--plain" => parsed.plain = true,
            "--url" => match iter.next() {
                Some(url) => parsed.url = Some(url.clone()),
                None => bail!("--url needs a value"),
            },
            other => bail!("unknown argument {:?}\nusage: snapshot [--plain] [--url <base_url>]", other),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let mut cfg = Config::from_env();
    if let Some(url) = args.url {
        cfg.base_url = url;
    }
    let source = HttpSignalSource::from_config(&cfg)?;

    let mut view = DashboardView::new();
    let outcome = refresh_signals(&source, &mut view, &SystemClock).await;
    if !outcome.is_updated() {
        bail!("refresh from {} failed", source.describe());
    }

    if args.plain {
        print!("{}", plain_text(&view, &source.describe()));
    } else {
        print!("{}", view.to_html());
    }
    Ok(())
}
