//! Vocabulary + clustering against flat files on disk.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use modalis_common::ModalisError;
use modalis_subcell::{Cluster, ClusterResolver, VocabularyOptions, VocabularyRegistry};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn test_minimal_two_block_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "UniProt header\nsecond header line\n\nID   Nucleus.\nAC   SL-0191\n//\nID   Secreted.\nAC   SL-0243\n//\n"
    )
    .unwrap();

    let vocab = VocabularyRegistry::from_path(file.path()).unwrap();
    let expected: BTreeMap<String, String> = [
        ("SL-0191".to_string(), "Nucleus".to_string()),
        ("SL-0243".to_string(), "Secreted".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(vocab.code_name_mapping(), &expected);

    let resolver = ClusterResolver::with_uniprot_table(&vocab).unwrap();
    assert_eq!(resolver.classify("SL-0191"), Cluster::Nucleus);
    assert_eq!(vocab.translate("not-a-real-code"), None);
    assert_eq!(resolver.classify("not-a-real-code"), Cluster::Unknown);
}

#[test]
fn test_release_sample_file() {
    let vocab = VocabularyRegistry::from_path(fixture("subcell_sample.txt")).unwrap();
    assert_eq!(vocab.len(), 8);
    // IT / IO topology blocks
    assert_eq!(vocab.n_discarded_blocks(), 2);
    assert_eq!(vocab.integrity_warnings(), 0);

    let names: Vec<&str> = vocab.names().collect();
    assert_eq!(
        names,
        vec![
            "Apical cell membrane", "Cell membrane", "Cell tip", "Cytosol",
            "Golgi apparatus", "Nucleolus", "Nucleus", "Secreted",
        ]
    );

    let apical = vocab.entry("Apical cell membrane").unwrap();
    assert_eq!(apical.code(), Some("SL-0016"));
    assert_eq!(apical.field("GO"), Some("GO:0016324; apical plasma membrane"));
}

#[test]
fn test_release_sample_round_trip() {
    let vocab = VocabularyRegistry::from_path(fixture("subcell_sample.txt")).unwrap();
    for (code, name) in vocab.code_name_mapping() {
        assert_eq!(vocab.translate(code).as_deref(), Some(name.as_str()));
        assert_eq!(vocab.translate(name).as_deref(), Some(code.as_str()));
    }
}

#[test]
fn test_release_sample_classification() {
    let vocab = VocabularyRegistry::from_path(fixture("subcell_sample.txt")).unwrap();
    let resolver = ClusterResolver::with_uniprot_table(&vocab).unwrap();

    let classified: Vec<(String, Cluster)> = vocab
        .code_name_mapping()
        .keys()
        .map(|code| (code.clone(), resolver.classify(code)))
        .collect();

    let expected = vec![
        ("SL-0016".to_string(), Cluster::Surface),
        ("SL-0039".to_string(), Cluster::Surface),
        ("SL-0091".to_string(), Cluster::Cytoplasm),
        ("SL-0132".to_string(), Cluster::Cytoplasm),
        ("SL-0188".to_string(), Cluster::Nucleus),
        ("SL-0191".to_string(), Cluster::Nucleus),
        ("SL-0243".to_string(), Cluster::Secreted),
        ("SL-0456".to_string(), Cluster::Unknown),
    ];
    assert_eq!(classified, expected);
}

#[test]
fn test_classify_is_total() {
    let vocab = VocabularyRegistry::from_path(fixture("subcell_sample.txt")).unwrap();
    let resolver = ClusterResolver::with_uniprot_table(&vocab).unwrap();
    for input in ["", " ", "SL-", "SL-9905", "Single-pass membrane protein", "nucleus", "ÜNICODE:Ω"] {
        let c = resolver.classify(input);
        assert!(matches!(
            c,
            Cluster::Secreted | Cluster::Surface | Cluster::Cytoplasm | Cluster::Nucleus | Cluster::Unknown
        ));
        assert_eq!(c, Cluster::Unknown, "{input:?}");
    }
}

#[test]
fn test_configured_header_skip_matches_scan() {
    let path = fixture("subcell_sample.txt");
    let scanned = VocabularyRegistry::from_path(&path).unwrap();
    let opts = VocabularyOptions { header_lines: Some(16) };
    let skipped = VocabularyRegistry::from_path_with(&path, &opts).unwrap();
    assert_eq!(scanned.code_name_mapping(), skipped.code_name_mapping());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = VocabularyRegistry::from_path(fixture("does_not_exist.txt")).unwrap_err();
    assert!(matches!(err, ModalisError::Io(_)));
}
