//! Snapshot persistence: build, save to disk, reload, and query again.

use std::fs;

use taxon_core::graph::Edge;
use taxon_core::io::{load_snapshot, read_edges_file, read_node_list_file, save_snapshot};
use taxon_core::{BuildOptions, Hierarchy};

const DUMP: &str = "\
item\tcategory\trelation
Science\tRoot\tsubcat
Art\tRoot\tsubcat
Physics\tScience\tsubcat
Optics\tPhysics\tsubcat
Science\tPhysics\tsubcat
Painting\tArt\tsubcat
Orphan\tNowhere\tsubcat
";

fn built() -> Hierarchy {
    let edges: Vec<Edge> = taxon_core::io::tsv::read_edges(DUMP.as_bytes()).expect("parse dump");
    Hierarchy::build(edges, &BuildOptions::with_root("Root"))
        .expect("build")
        .0
}

#[test]
fn saved_snapshot_reloads_identically() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dag = dir.path().join("generated/dag.tsv");
    let depths = dir.path().join("generated/depths.tsv");

    let original = built();
    save_snapshot(&original, &dag, &depths).expect("save");
    let loaded = load_snapshot("Root", &dag, &depths).expect("load");

    assert_eq!(loaded.dag_edges(), original.dag_edges());
    assert_eq!(loaded.depth_table(), original.depth_table());
    assert_eq!(loaded.content_hash(), original.content_hash());
    assert_eq!(
        loaded.categorical_distance("Optics", "Painting"),
        original.categorical_distance("Optics", "Painting")
    );
    assert_eq!(loaded.path_to_root("Optics"), Some(vec!["Physics", "Science", "Root"]));
}

#[test]
fn unresolved_nodes_are_not_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dag = dir.path().join("dag.tsv");
    let depths = dir.path().join("depths.tsv");

    save_snapshot(&built(), &dag, &depths).expect("save");
    let depth_text = fs::read_to_string(&depths).expect("read depths");
    assert!(depth_text.starts_with("node\tdepth\n"));
    assert!(!depth_text.contains("Orphan"));
    assert!(!depth_text.contains("Nowhere"));

    let dag_text = fs::read_to_string(&dag).expect("read dag");
    assert!(dag_text.starts_with("item\tcategory\n"));
    assert!(!dag_text.contains("Science\tPhysics"));
}

#[test]
fn tampered_snapshot_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dag = dir.path().join("dag.tsv");
    let depths = dir.path().join("depths.tsv");

    save_snapshot(&built(), &dag, &depths).expect("save");
    let mut text = fs::read_to_string(&dag).expect("read dag");
    text.push_str("Science\tOptics\n");
    fs::write(&dag, text).expect("tamper");

    let err = load_snapshot("Root", &dag, &depths).expect_err("corrupt");
    let chain = format!("{err:#}");
    assert!(chain.contains("corrupt hierarchy snapshot"), "{chain}");
}

#[test]
fn hash_prefixed_nodes_survive_a_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dag = dir.path().join("dag.tsv");
    let depths = dir.path().join("depths.tsv");

    let edges = vec![
        Edge::new("#Tag", "Root"),
        Edge::new("Child", "#Tag"),
        Edge::new("A", "Root"),
    ];
    let (original, _) = Hierarchy::build(edges, &BuildOptions::with_root("Root")).expect("build");
    assert_eq!(original.depth("#Tag"), Some(1));

    save_snapshot(&original, &dag, &depths).expect("save");
    let loaded = load_snapshot("Root", &dag, &depths).expect("load");
    assert_eq!(loaded.depth_table(), original.depth_table());
    assert_eq!(loaded.path_to_root("Child"), Some(vec!["#Tag", "Root"]));

    let path = dir.path().join("raw.tsv");
    fs::write(&path, "#Tag\tRoot\nA\tRoot\n").expect("write");
    assert_eq!(read_edges_file(&path).expect("read").len(), 2);
}

#[test]
fn names_with_tabs_refuse_to_save() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dag = dir.path().join("dag.tsv");
    let depths = dir.path().join("depths.tsv");

    let edges = vec![Edge::new("Split\tName", "Root")];
    let (h, _) = Hierarchy::build(edges, &BuildOptions::with_root("Root")).expect("build");
    let err = save_snapshot(&h, &dag, &depths).expect_err("unwritable name");
    let chain = format!("{err:#}");
    assert!(chain.contains("tab or line break"), "{chain}");
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.tsv");
    let err = read_edges_file(&missing).expect_err("missing");
    assert!(format!("{err:#}").contains("absent.tsv"));
    assert!(read_node_list_file(&missing).is_err());
}

#[test]
fn malformed_dump_reports_its_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("edges.tsv");
    fs::write(&path, "item\tcategory\nA\tRoot\nbroken\n").expect("write");
    let err = read_edges_file(&path).expect_err("malformed");
    assert!(format!("{err:#}").contains("line 3"));
}

#[test]
fn hidden_list_feeds_extra_hidden() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hidden.tsv");
    fs::write(&path, "category\nStubs\nCleanup\n").expect("write");
    let extra = read_node_list_file(&path).expect("read");

    let edges = vec![
        Edge::new("Stubs", "Root"),
        Edge::new("Cleanup", "Stubs"),
        Edge::new("Physics", "Root"),
    ];
    let options = BuildOptions {
        extra_hidden: extra,
        ..BuildOptions::with_root("Root")
    };
    let (h, stats) = Hierarchy::build(edges, &options).expect("build");
    assert_eq!(stats.hidden_removed, 1);
    assert_eq!(h.depth("Cleanup"), None);
}
