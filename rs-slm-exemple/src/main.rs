use std::path::Path;

use anyhow::Context;
use rs_slm_core::{BuildConfig, InputStatus, MappedCorpus, NGramModel};

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default "info" level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage: rs-slm-exemple [corpus] [config.json]
    // The corpus defaults to "data.txt" in the working directory
    let mut args = std::env::args().skip(1);
    let corpus_path = args.next().unwrap_or_else(|| "data.txt".to_owned());
    let config = match args.next() {
        Some(path) => load_config(&path)?,
        None => BuildConfig::default(),
    };

    // Map the corpus once; the model borrows it until the end of main
    let corpus = MappedCorpus::open(&corpus_path)
        .with_context(|| format!("cannot map corpus {}", corpus_path))?;
    log::info!("size: {} bytes", rs_slm_core::ByteSource::len(&corpus));

    let model = NGramModel::from_source(&corpus, &config)?;

    let summary = model.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if summary.status != InputStatus::Ready {
        return Ok(());
    }

    // A few tokens in id order
    for (view, id) in model.tokens().take(10) {
        println!("token {}: {}", id, view.to_string_lossy());
    }

    // Most likely continuation of the first contexts
    for (_, id) in model.contexts().take(10) {
        let Some(text) = model.context_text(id) else { continue };
        match model.table().most_likely(id) {
            Some((token, count)) => {
                let next = model.token(token).map(|v| v.to_string_lossy().into_owned()).unwrap_or_default();
                let probability = model.table().probability(id, token).unwrap_or(0.0);
                println!("[{}] -> {} ({} times, p = {:.3})", text, next, count, probability);
            }
            None => println!("[{}] -> (end of corpus)", text),
        }
    }

    Ok(())
}

/// Reads a JSON build config; missing fields keep their default.
fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<BuildConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config: BuildConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
