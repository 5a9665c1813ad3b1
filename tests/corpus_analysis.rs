//! 端到端：本地语料目录 → Corpus → Dunning 查询 → gzip 缓存

use std::fs;
use std::path::Path;
use std::sync::Arc;

use novelstat::application::ports::{FileLoaderPort, ResultCachePort};
use novelstat::application::queries::handlers::{DunningQueryHandler, FrequencyQueryHandler};
use novelstat::application::queries::{
    CompareAuthorGenders, CompareWordAssociations, GetInstanceDistances,
};
use novelstat::application::CorpusSource;
use novelstat::domain::corpus::{Corpus, CorpusError};
use novelstat::domain::dunning::DunningParams;
use novelstat::infrastructure::adapters::{RemoteFileLoaderConfig, ResolvingFileLoader};
use novelstat::infrastructure::persistence::GzPickleCache;

const AUSTEN: &str = "The Project Gutenberg EBook of Persuasion\n\
    *** START OF THIS PROJECT GUTENBERG EBOOK PERSUASION ***\n\
    She walked to the garden, and she walked to the roses.\n\
    *** END OF THIS PROJECT GUTENBERG EBOOK PERSUASION ***\n\
    license license license\n";

const DICKENS: &str = "The Project Gutenberg EBook of Hard Times\n\
    *** START OF THIS PROJECT GUTENBERG EBOOK HARD TIMES ***\n\
    He walked to the market, and he frowned at the crowd.\n\
    *** END OF THIS PROJECT GUTENBERG EBOOK HARD TIMES ***\n\
    license license license\n";

fn write_fixture(root: &Path) {
    let corpus_dir = root.join("corpora").join("sample");
    fs::create_dir_all(corpus_dir.join("texts")).unwrap();
    fs::write(
        corpus_dir.join("sample.csv"),
        "author,date,title,filename,author_gender\n\
         \"Dickens, Charles\",1854,Hard Times,dickens_hard.txt,male\n\
         \"Austen, Jane\",1818,Persuasion,austen_persuasion.txt,female\n",
    )
    .unwrap();
    fs::write(corpus_dir.join("texts").join("austen_persuasion.txt"), AUSTEN).unwrap();
    fs::write(corpus_dir.join("texts").join("dickens_hard.txt"), DICKENS).unwrap();
}

fn local_loader(root: &Path) -> Arc<dyn FileLoaderPort> {
    let remote = RemoteFileLoaderConfig::new("http://127.0.0.1:9");
    Arc::new(ResolvingFileLoader::new(CorpusSource::Local, root, remote).unwrap())
}

fn handler(cache: &Arc<GzPickleCache>) -> DunningQueryHandler {
    let cache: Arc<dyn ResultCachePort> = cache.clone();
    DunningQueryHandler::new(Some(cache), DunningParams { min_combined_count: 0 })
}

#[test]
fn test_load_corpus_from_directory() {
    let root = tempfile::tempdir().unwrap();
    write_fixture(root.path());

    let corpus = Corpus::load("sample", local_loader(root.path())).unwrap();
    assert_eq!(corpus.len(), 2);
    // 按作者排序
    assert_eq!(corpus.novels()[0].author(), "Austen, Jane");
    assert!(!corpus.novels()[0].is_text_loaded());

    let austen = &corpus.novels()[0];
    assert_eq!(austen.word_count().unwrap(), 11);
    assert_eq!(austen.get_count_of_word("license").unwrap(), 0);
    assert_eq!(austen.get_count_of_word("she").unwrap(), 2);
}

#[test]
fn test_missing_manifest() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("corpora")).unwrap();

    let err = Corpus::load("nowhere", local_loader(root.path())).unwrap_err();
    assert!(matches!(err, CorpusError::ManifestNotFound(_)));
}

#[test]
fn test_author_gender_comparison_is_cached() {
    let root = tempfile::tempdir().unwrap();
    write_fixture(root.path());
    let corpus = Corpus::load("sample", local_loader(root.path())).unwrap();
    let cache = GzPickleCache::new(root.path().join("data")).unwrap().arc();

    let first = handler(&cache)
        .compare_author_genders(&corpus, CompareAuthorGenders)
        .unwrap();

    let walked = first.result.get("walked").unwrap();
    assert_eq!(walked.count_corp1, 2);
    assert_eq!(walked.count_corp2, 1);
    assert!(walked.dunning > 0.0);
    assert_eq!(first.result.get("the").unwrap().dunning, 0.0);
    assert!(first.result.get("she").is_none());
    assert!(first.result.get("license").is_none());

    let entries: Vec<_> = fs::read_dir(cache.cache_dir())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "pgz"))
        .collect();
    assert_eq!(entries.len(), 1);

    // 新 handler 读取同一目录
    let second = handler(&cache)
        .compare_author_genders(&corpus, CompareAuthorGenders)
        .unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.computation, "dunning_male_vs_female_authors_sample");
}

#[test]
fn test_reversed_word_association_reuses_cache() {
    let root = tempfile::tempdir().unwrap();
    write_fixture(root.path());
    let corpus = Corpus::load("sample", local_loader(root.path())).unwrap();
    let cache = GzPickleCache::new(root.path().join("data")).unwrap().arc();

    let she_he = handler(&cache)
        .compare_word_associations(&corpus, CompareWordAssociations::new("She", "he"))
        .unwrap();
    assert_eq!(she_he.corpus1_label, "she...");
    assert!(she_he.result.get("walked").unwrap().dunning > 0.0);

    let he_she = handler(&cache)
        .compare_word_associations(&corpus, CompareWordAssociations::new("he", "she"))
        .unwrap();
    assert_eq!(he_she.result, she_he.result.swapped());
    assert_eq!(he_she.computation, "dunning_he_vs_she_associated_words_sample");
}

#[test]
fn test_instance_distances_over_loaded_texts() {
    let root = tempfile::tempdir().unwrap();
    write_fixture(root.path());
    let corpus = Corpus::load("sample", local_loader(root.path())).unwrap();

    let report = FrequencyQueryHandler::new()
        .instance_distances(
            &corpus,
            GetInstanceDistances {
                word: "the".to_string(),
            },
        )
        .unwrap();
    assert_eq!(report.novels[0].distances, vec![6]);
    assert_eq!(report.novels[1].distances, vec![6]);
}
