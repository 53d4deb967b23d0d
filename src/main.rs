use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use supplier_cleanse::{batch, cli, config, error, export, geoloc, loader, session};
use supplier_cleanse_common::TextCleanser;
use cli::{Cli, Commands};
use config::{validate_min_score, Config};
use error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}_cleansed.csv", stem))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Clean { texts } => {
            let cleanser: TextCleanser = config.cleanser();
            for text in texts {
                println!("{}\t{}", text, cleanser.clean(&text));
            }
        }

        Commands::Resolve { names, matching, explain } => {
            let resolver = session::build_resolver(&config, &matching)?;

            for name in names {
                let result = resolver.match_name(&name);
                let resolved = result.matched_name.as_deref().unwrap_or("-");
                if explain {
                    println!(
                        "{}\t{}\t{}\t{:.4}\t({})",
                        name, resolved, result.source, result.score, result.cleansed
                    );
                } else {
                    println!("{}\t{}", name, resolved);
                }
            }
        }

        Commands::Priority { names, matching } => {
            let resolver = session::build_resolver(&config, &matching)?;

            match resolver.resolve_from_priority(&names) {
                Some(name) => println!("{}", name),
                None => println!("-"),
            }
        }

        Commands::Batch { input, columns, output, delimiter, keep_cleansed, matching } => {
            println!("📋 supplier-cleanse - 一括クレンジング\n");

            if !delimiter.is_ascii() {
                return Err(error::CleanseError::Config(format!(
                    "区切り文字はASCIIで指定してください: {}",
                    delimiter
                )));
            }
            let delimiter = delimiter as u8;

            // 1. 照合器の構築
            println!("[1/3] カタログを読み込み中...");
            let resolver = session::build_resolver(&config, &matching)?;
            println!("✔ {}件の正式名称\n", resolver.catalog_len());

            // 2. 一括照合
            println!("[2/3] 照合中...");
            let table = loader::read_table(&input, delimiter)?;
            let progress = ProgressBar::new(table.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
                progress.set_style(style);
            }

            let options = batch::BatchOptions { columns, keep_cleansed };
            let report = batch::cleanse_table(&table, &resolver, &options, &progress)?;
            progress.finish_and_clear();

            let stats = &report.stats;
            println!("✔ {}行を処理", stats.total_rows);
            println!("  ルール一致: {}", stats.by_rule);
            println!("  類似度一致: {}", stats.by_similarity);
            println!("  未解決: {}\n", stats.unresolved);

            // 3. 出力
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| default_output_path(&input));
            let format = export::export_report(&report, &output, delimiter)?;
            println!("✔ {}出力: {}", format, output.display());

            println!("\n✅ 完了");
        }

        Commands::Geoloc { names, geoloc: geoloc_path, strict } => {
            let path = geoloc_path
                .or_else(|| config.geoloc_path.clone())
                .ok_or_else(|| error::CleanseError::Config("座標ファイルが指定されていません".into()))?;

            let (table, warnings) = geoloc::GeoTable::load(&path)?;
            for warning in &warnings {
                eprintln!("⚠ {}", warning);
            }

            for name in names {
                let [lat, lon] = if strict {
                    table.try_get(&name)?
                } else {
                    table.get(&name)
                };
                println!("{}\t{}\t{}", name, lat, lon);
            }
        }

        Commands::Config {
            show,
            set_catalog,
            set_rules,
            set_geoloc,
            set_min_score,
            set_strategy,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(path) = set_catalog {
                config.catalog_path = Some(path);
                changed = true;
            }
            if let Some(path) = set_rules {
                config.rules_path = Some(path);
                changed = true;
            }
            if let Some(path) = set_geoloc {
                config.geoloc_path = Some(path);
                changed = true;
            }
            if let Some(min_score) = set_min_score {
                validate_min_score(min_score)?;
                config.min_score = min_score;
                changed = true;
            }
            if let Some(strategy) = set_strategy {
                config.strategy = strategy;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let display = |p: &Option<PathBuf>| {
                    p.as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".to_string())
                };
                println!("設定:");
                println!("  カタログ: {}", display(&config.catalog_path));
                println!("  ルール: {}", display(&config.rules_path));
                println!("  座標: {}", display(&config.geoloc_path));
                println!("  最低スコア: {}", config.min_score);
                println!("  方式: {}", config.strategy);
                println!(
                    "  n-gram: {} {}-{}",
                    config.analyzer, config.ngram_min, config.ngram_max
                );
                if !config.extra_stopwords.is_empty() {
                    println!("  追加の法人格語: {}", config.extra_stopwords.join(", "));
                }
            }
        }
    }

    Ok(())
}
