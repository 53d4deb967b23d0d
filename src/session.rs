//! 設定とコマンドライン指定から照合器を組み立てる

use crate::cli::MatchArgs;
use crate::config::{validate_min_score, Config};
use crate::error::{CleanseError, Result};
use crate::loader::{load_catalog, load_rules};
use supplier_cleanse_common::{Resolver, Rule};

/// コマンドライン指定を設定に上書きした結果
pub fn effective_config(config: &Config, args: &MatchArgs) -> Result<Config> {
    let mut effective = config.clone();

    if let Some(catalog) = &args.catalog {
        effective.catalog_path = Some(catalog.clone());
    }
    if let Some(rules) = &args.rules {
        effective.rules_path = Some(rules.clone());
    }
    if args.no_rules {
        effective.rules_path = None;
    }
    if let Some(min_score) = args.min_score {
        validate_min_score(min_score)?;
        effective.min_score = min_score;
    }
    if let Some(strategy) = args.strategy {
        effective.strategy = strategy;
    }
    if let Some(analyzer) = args.analyzer {
        effective.analyzer = analyzer;
    }

    effective.validate()?;
    Ok(effective)
}

/// カタログ・ルールを読み込んで照合器を構築
pub fn build_resolver(config: &Config, args: &MatchArgs) -> Result<Resolver> {
    let config = effective_config(config, args)?;

    let catalog_path = config
        .catalog_path
        .as_deref()
        .ok_or_else(|| CleanseError::Config("カタログファイルが指定されていません".into()))?;
    let catalog = load_catalog(catalog_path)?;

    let rules: Vec<Rule> = match config.rules_path.as_deref() {
        Some(path) => load_rules(path)?,
        None => Vec::new(),
    };

    tracing::debug!(
        catalog = catalog.len(),
        rules = rules.len(),
        strategy = %config.strategy,
        min_score = config.min_score,
        "照合器を構築"
    );

    let resolver = Resolver::builder(&catalog)
        .rules(&rules)
        .min_score(config.min_score)
        .strategy(config.index_strategy())
        .cleanser(config.cleanser())
        .build()?;

    Ok(resolver)
}
