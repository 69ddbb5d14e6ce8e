use std::fs;
use std::path::Path;

use rhetor_corpus::{
    CorpusError, CorpusOptions, DocumentsRepository, ExampleFilter, NO_SIGNAL, NO_TYPE,
};
use rhetor_rs3::ErrorCategory;
use tempfile::TempDir;

const RAIN: &str = r#"<rst>
    <header><relations>
        <rel name="span" type="rst"/>
        <rel name="cause" type="rst"/>
        <rel name="elaboration" type="rst"/>
    </relations></header>
    <body>
        <group id="10" type="span"/>
        <segment id="1" parent="10" relname="span">It rained heavily,</segment>
        <segment id="2" parent="1" relname="cause">so we stayed home.</segment>
        <segment id="3" parent="10" relname="elaboration">The roads flooded.</segment>
        <signals>
            <signal source="2" type="dm" subtype="dm" tokens="4"/>
            <signal source="2" type="semantic" subtype="lexical_chain" tokens="5"/>
        </signals>
    </body>
</rst>"#;

const MORNING: &str = r#"<rst>
    <header><relations>
        <rel name="sequence" type="multinuc"/>
    </relations></header>
    <body>
        <group id="20" type="multinuc"/>
        <segment id="1" parent="20" relname="sequence">We woke,</segment>
        <segment id="2" parent="20" relname="sequence">ate,</segment>
        <segment id="3" parent="20" relname="sequence">and left.</segment>
        <segment id="4" parent="20" relname="sequence">It was late.</segment>
    </body>
</rst>"#;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "rain.rs3", RAIN);
    write(dir.path(), "nested/morning.rs3", MORNING);
    write(dir.path(), "nested/notes.txt", "not a document");
    write(dir.path(), "README.xml", "<rst/>");
    dir
}

fn load(dir: &TempDir) -> DocumentsRepository {
    DocumentsRepository::load(&CorpusOptions::default().with_root(dir.path())).unwrap()
}

#[test]
fn loads_nested_documents_and_ignores_other_files() {
    let dir = corpus();
    let repo = load(&dir);
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.filenames(), vec!["morning.rs3", "rain.rs3"]);
    assert_eq!(repo.root(), dir.path());
}

#[test]
fn document_exposes_text_and_selected_relations() {
    let dir = corpus();
    let repo = load(&dir);

    let rain = repo.document("rain.rs3").unwrap();
    assert_eq!(
        rain.full_text,
        "It rained heavily, so we stayed home. The roads flooded."
    );
    let ids: Vec<_> = rain.intra_sentential_relations.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2]);
    let cause = &rain.intra_sentential_relations[0];
    assert_eq!(cause.text, "so we stayed home.");
    assert_eq!(cause.parent_text, "It rained heavily, so we stayed home.");
    let signal_texts: Vec<_> = cause.signals.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(signal_texts, vec!["so", "we"]);

    let morning = repo.document("morning.rs3").unwrap();
    let ids: Vec<_> = morning
        .intra_sentential_relations
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn unknown_document_is_reported() {
    let dir = corpus();
    let repo = load(&dir);
    let err = repo.document("missing.rs3").unwrap_err();
    assert!(matches!(err, CorpusError::DocumentNotFound(name) if name == "missing.rs3"));
}

#[test]
fn relation_names_and_counts_span_the_corpus() {
    let dir = corpus();
    let repo = load(&dir);

    let names: Vec<_> = repo.relation_names().into_iter().collect();
    assert_eq!(names, vec!["cause", "sequence"]);

    let counts = repo.relation_counts();
    assert_eq!(counts["cause"], 1);
    assert_eq!(counts["sequence"], 2);
    assert_eq!(counts.len(), 2);
}

#[test]
fn grouped_relations_bucket_by_signal() {
    let dir = corpus();
    let repo = load(&dir);
    let grouped = repo.grouped_relations();

    assert_eq!(grouped["dm"]["dm"]["cause"], 1);
    assert_eq!(grouped["semantic"]["lexical_chain"]["cause"], 1);
    assert_eq!(grouped[NO_SIGNAL][NO_SIGNAL]["sequence"], 2);
    assert!(!grouped[NO_SIGNAL][NO_SIGNAL].contains_key("cause"));
}

#[test]
fn examples_respect_filters_and_limits() {
    let dir = corpus();
    let repo = load(&dir);

    let all = repo.relation_examples("sequence", 10);
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|example| example.document == "morning.rs3"));

    let one = repo.relation_examples("sequence", 1);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].relation.id, 1);

    assert!(repo.relation_examples("sequence", 0).is_empty());
    assert!(repo.relation_examples("contrast", 10).is_empty());

    let semantic = ExampleFilter {
        signal_type: Some("semantic".into()),
        ..ExampleFilter::default()
    };
    let examples = repo.grouped_relation_examples(&semantic, 10);
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0].document, "rain.rs3");
    assert_eq!(examples[0].relation.relname.as_deref(), Some("cause"));
}

#[test]
fn examples_serialize_with_document_and_relation() {
    let dir = corpus();
    let repo = load(&dir);
    let examples = repo.relation_examples("cause", 10);
    let json = serde_json::to_value(&examples).unwrap();
    assert_eq!(json[0]["document"], "rain.rs3");
    assert_eq!(json[0]["relation"]["relname"], "cause");
    assert_eq!(json[0]["relation"]["signals"][0]["type"], "dm");
    assert_eq!(json[0]["relation"]["relation"]["type"], "rst");
}

#[test]
fn declared_relations_aggregate_headers() {
    let dir = corpus();
    write(
        dir.path(),
        "notes.rs3",
        r#"<rst>
            <header><relations>
                <rel name="cause" type="rst"/>
                <rel name="aside"/>
            </relations></header>
            <body><segment id="1">Unused declarations.</segment></body>
        </rst>"#,
    );
    let repo = load(&dir);
    let declared = repo.declared_relations();

    assert_eq!(declared.by_name["cause"].count, 2);
    assert_eq!(declared.by_name["cause"].kind.as_deref(), Some("rst"));
    assert_eq!(declared.by_name["span"].count, 1);
    assert_eq!(declared.by_name["aside"].kind, None);

    let multinuc: Vec<_> = declared.by_type["multinuc"].iter().collect();
    assert_eq!(multinuc, vec!["sequence"]);
    let rst: Vec<_> = declared.by_type["rst"].iter().collect();
    assert_eq!(rst, vec!["cause", "elaboration", "span"]);
    assert!(declared.by_type[NO_TYPE].contains("aside"));

    assert_eq!(declared.type_counts["rst"], 4);
    assert_eq!(declared.type_counts["multinuc"], 1);
    assert_eq!(declared.type_counts[NO_TYPE], 1);

    let json = serde_json::to_value(&declared).unwrap();
    assert_eq!(json["by_name"]["cause"]["type"], "rst");
    assert_eq!(json["by_name"]["cause"]["count"], 2);
}

#[test]
fn one_malformed_document_fails_the_load() {
    let dir = corpus();
    write(
        dir.path(),
        "broken.rs3",
        r#"<rst><body>
            <segment id="1">First root.</segment>
            <segment id="2">Second root.</segment>
        </body></rst>"#,
    );
    let err = DocumentsRepository::load(&CorpusOptions::default().with_root(dir.path()))
        .unwrap_err();
    match err {
        CorpusError::Document { path, source } => {
            assert!(path.ends_with("broken.rs3"));
            assert_eq!(source.category(), ErrorCategory::MalformedTree);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn root_must_be_a_directory() {
    let dir = corpus();
    let file = dir.path().join("rain.rs3");
    let err = DocumentsRepository::load(&CorpusOptions::default().with_root(&file)).unwrap_err();
    assert!(matches!(err, CorpusError::NotADirectory(_)));
}

#[test]
fn empty_directory_loads_an_empty_repository() {
    let dir = TempDir::new().unwrap();
    let repo = load(&dir);
    assert!(repo.is_empty());
    assert!(repo.relation_counts().is_empty());
    assert!(repo.grouped_relations().is_empty());
}
