use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::StreamExt as _;

use strategist::config::{self, SERVER_ENV};
use strategist::logging;
use strategist::replay::{TestCase, header_line};
use strategist::transport::{HttpTransport, Transport as _};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args: Vec<String> = std::env::args().collect();
    let cases_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cases");

    let cwd = std::env::current_dir()?;
    let config = config::load(None, &cwd)?.with_server(std::env::var(SERVER_ENV).ok(), None);
    let transport = HttpTransport::new(&config)?;

    let names: Vec<String> = if args.len() > 1 {
        args[1..].to_vec()
    } else {
        // Record all cases
        let mut names: Vec<String> = std::fs::read_dir(&cases_dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    };

    for name in &names {
        eprintln!("Recording: {name}");
        record_case(&cases_dir, name, &transport).await?;
        eprintln!("  Done: {name}.sse");
    }

    Ok(())
}

async fn record_case(cases_dir: &Path, name: &str, transport: &HttpTransport) -> Result<()> {
    let toml_path = cases_dir.join(format!("{name}.toml"));
    let sse_path = cases_dir.join(format!("{name}.sse"));

    let toml_content = std::fs::read_to_string(&toml_path)
        .with_context(|| format!("Failed to read {}", toml_path.display()))?;
    let case: TestCase = toml::from_str(&toml_content)?;
    let request = case.request();

    let mut recording = header_line(&request)?.into_bytes();
    let mut body = transport
        .open(&request)
        .await
        .with_context(|| format!("Failed to open stream for {name}"))?;
    while let Some(chunk) = body.next().await {
        recording.extend_from_slice(&chunk?);
    }

    std::fs::write(&sse_path, recording)
        .with_context(|| format!("Failed to write {}", sse_path.display()))?;
    Ok(())
}
