//! Novelstat - 小说语料库词频统计
//!
//! 读取配置，加载语料库，运行一项分析并打印结果

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use novelstat::application::ports::{FileLoaderPort, ResultCachePort};
use novelstat::application::queries::handlers::{
    DunningComparison, DunningQueryHandler, FrequencyQueryHandler, InstanceDistanceReport,
    PronounFrequencyReport,
};
use novelstat::application::queries::{
    CompareAuthorGenders, CompareWordAssociationAcrossCorpora, CompareWordAssociations,
    GetInstanceDistances, GetPronounFrequencies,
};
use novelstat::config::{load_config, print_config, AnalysisKind, AppConfig};
use novelstat::domain::corpus::Corpus;
use novelstat::domain::dunning::{format_dunning_table, DunningParams};
use novelstat::infrastructure::adapters::{RemoteFileLoaderConfig, ResolvingFileLoader};
use novelstat::infrastructure::persistence::GzPickleCache;

fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},novelstat={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Novelstat - 小说语料库词频统计");
    print_config(&config);

    // 文件加载器
    let remote = RemoteFileLoaderConfig::new(&config.corpus.remote_base_url)
        .with_timeout(config.corpus.timeout_secs);
    let loader: Arc<dyn FileLoaderPort> = Arc::new(ResolvingFileLoader::new(
        config.corpus.source,
        &config.corpus.root_dir,
        remote,
    )?);

    // 结果缓存
    let cache: Option<Arc<dyn ResultCachePort>> = if config.cache.enabled {
        let cache: Arc<dyn ResultCachePort> = GzPickleCache::new(&config.cache.base_dir)
            .context("Failed to open result cache")?
            .arc();
        Some(cache)
    } else {
        None
    };

    let corpus = Corpus::load(&config.analysis.corpus_name, loader)
        .with_context(|| format!("Failed to load corpus {}", config.analysis.corpus_name))?;

    run_analysis(&config, &corpus, cache)
}

fn run_analysis(
    config: &AppConfig,
    corpus: &Corpus,
    cache: Option<Arc<dyn ResultCachePort>>,
) -> anyhow::Result<()> {
    let analysis = &config.analysis;
    let word = analysis.word.clone().unwrap_or_default();

    let dunning = DunningQueryHandler::new(
        cache,
        DunningParams {
            min_combined_count: config.dunning.min_combined_count,
        },
    )
    .with_schema_version(config.cache.schema_version);
    let frequency = FrequencyQueryHandler::new();

    match analysis.kind {
        AnalysisKind::MaleVsFemaleAuthors => {
            let comparison = dunning.compare_author_genders(corpus, CompareAuthorGenders)?;
            report_dunning(config, &comparison)
        }
        AnalysisKind::HeVsSheAssociations => {
            let comparison =
                dunning.compare_word_associations(corpus, CompareWordAssociations::new("she", "he"))?;
            report_dunning(config, &comparison)
        }
        AnalysisKind::WordAssociation => {
            let other_word = analysis.other_word.clone().unwrap_or_default();
            let comparison = dunning
                .compare_word_associations(corpus, CompareWordAssociations::new(word, other_word))?;
            report_dunning(config, &comparison)
        }
        AnalysisKind::WordAssociationByAuthorGender => {
            let female = corpus.filter_by_gender("female")?;
            let male = corpus.filter_by_gender("male")?;
            let query = CompareWordAssociationAcrossCorpora {
                word,
                corpus1_label: "fem aut".to_string(),
                corpus2_label: "male aut".to_string(),
            };
            let comparison =
                dunning.compare_word_association_across_corpora(&female, &male, query)?;
            report_dunning(config, &comparison)
        }
        AnalysisKind::PronounFrequency => {
            let report = frequency.pronoun_frequencies(corpus, GetPronounFrequencies)?;
            print_pronoun_report(&report);
            write_json(config, &report)
        }
        AnalysisKind::InstanceDistance => {
            let report = frequency.instance_distances(corpus, GetInstanceDistances { word })?;
            print_distance_report(&report);
            write_json(config, &report)
        }
    }
}

fn report_dunning(config: &AppConfig, comparison: &DunningComparison) -> anyhow::Result<()> {
    println!(
        "{}",
        format_dunning_table(
            &comparison.result,
            config.dunning.display_terms,
            &comparison.corpus1_label,
            &comparison.corpus2_label,
        )
    );
    write_json(config, comparison)
}

fn print_pronoun_report(report: &PronounFrequencyReport) {
    println!("Pronoun frequencies in {}", report.corpus);
    for row in &report.novels {
        println!(
            "{:<40} {:<8} female {:.4}  he/him {:.4}  she/her {:.4}  she/(he+she) {:.4}",
            row.novel,
            row.author_gender.as_str(),
            row.female_relative_freq,
            row.male_subject_proportion,
            row.female_subject_proportion,
            row.female_subject_share
        );
    }
    for (gender, mean) in &report.mean_female_freq_by_author_gender {
        println!("mean female pronoun share, {} authors: {:.4}", gender, mean);
    }
}

fn print_distance_report(report: &InstanceDistanceReport) {
    println!("Distances between instances of '{}' in {}", report.word, report.corpus);
    for row in &report.novels {
        match row.median {
            Some(median) => println!(
                "{:<40} {:<8} instances {:>6}  median {:.1}",
                row.novel,
                row.author_gender.as_str(),
                row.distances.len() + 1,
                median
            ),
            None => println!("{:<40} {:<8} fewer than two instances", row.novel, row.author_gender.as_str()),
        }
    }
}

fn write_json<T: Serialize>(config: &AppConfig, value: &T) -> anyhow::Result<()> {
    let Some(path) = &config.analysis.output_json else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Results written");
    Ok(())
}
