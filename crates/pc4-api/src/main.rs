//! Live self-check against configured stores.
//!
//! ```text
//! pc4-check [config.json]
//! ```
//!
//! Without a file the configuration comes from `PC4_*` environment variables.

use std::process::ExitCode;

use pc4_api::{Config, Factory, SearchParameters, TerminologySession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MND: u64 = 37340000;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?.with_env_overrides(),
        None => Config::from_env(),
    };

    let factory = Factory::from_config(config)?;
    let Some(hermes) = factory.hermes() else {
        tracing::error!("no terminology store configured (set hermes_path or PC4_HERMES_PATH)");
        return Ok(ExitCode::FAILURE);
    };

    let mut passed = true;
    passed &= report("search \"mnd\" finds motor neurone disease", check_search(hermes));
    passed &= report("fetch extended concept 37340000", check_extended_concept(hermes));

    if let Some(ods) = factory.ods() {
        if let Ok(code) = std::env::var("PC4_CHECK_POSTCODE") {
            let found = ods.fetch_by_postcode(&code).map(|l| l.is_some());
            passed &= report(&format!("fetch postcode {code}"), found);
        }
    }

    factory.close();
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check_search(hermes: &TerminologySession) -> pc4_api::ApiResult<bool> {
    let params = SearchParameters::builder().text("mnd").max_hits(10).build();
    let results = hermes.search(&params)?;
    for hit in &results {
        tracing::debug!(concept = hit.concept_id, term = hit.display_term(), score = hit.score);
    }
    Ok(results.iter().any(|r| r.concept_id == MND))
}

fn check_extended_concept(hermes: &TerminologySession) -> pc4_api::ApiResult<bool> {
    let Some(ext) = hermes.fetch_extended_concept(MND)? else {
        return Ok(false);
    };
    let fsn = ext.fsn().map(|d| d.term.as_str()).unwrap_or("?");
    tracing::info!(
        concept = ext.id(),
        fsn,
        descriptions = ext.descriptions.len(),
        parents = ext.direct_parents().count(),
        "extended concept"
    );
    Ok(true)
}

fn report(name: &str, outcome: pc4_api::ApiResult<bool>) -> bool {
    match outcome {
        Ok(true) => {
            println!("✅ {name}");
            true
        }
        Ok(false) => {
            println!("❌ {name}");
            false
        }
        Err(e) => {
            println!("❌ {name}: {e}");
            false
        }
    }
}
