//! Integration tests for the relation store, graph view and tool surface

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use connexa_graph::analysis::{AnalysisRunner, AnalysisService, RunnerConfig};
use connexa_graph::extraction::{ExtractionError, Extractor};
use connexa_graph::graph::{detect_communities, GraphBuilder};
use connexa_graph::relation_store::{RelationStore, StoreError};
use connexa_graph::server::McpServer;
use connexa_graph::tools::register_all_tools;
use connexa_graph::types::{Intent, Metric, Relation, SortKey, SortOrder};
use connexa_graph::visual::{Rgb, ViewOptions, VisualStyle};

fn setup_store(files: &[(&str, String)]) -> (TempDir, RelationStore) {
    let dir = TempDir::new().unwrap();
    let filtered = dir.path().join("filtered");
    fs::create_dir_all(&filtered).unwrap();
    for (name, content) in files {
        fs::write(filtered.join(name), content).unwrap();
    }
    let store = RelationStore::new(filtered, dir.path().join("csv"));
    (dir, store)
}

/// 10 hubs in a ring, 90 leaves hanging off two hubs each
fn hundred_objects() -> String {
    let mut lines = Vec::new();
    for hub in 0..10 {
        lines.push(format!("Hub {}; Hub {}", hub_name(hub), hub_name((hub + 1) % 10)));
    }
    for leaf in 0..90 {
        lines.push(format!("Leaf {}; Hub {}", leaf_name(leaf), hub_name(leaf % 10)));
        lines.push(format!("Leaf {}; Hub {}", leaf_name(leaf), hub_name((leaf + 3) % 10)));
    }
    lines.join("\n")
}

fn hub_name(i: usize) -> String {
    ((b'a' + i as u8) as char).to_string()
}

fn leaf_name(i: usize) -> String {
    format!("{}{}", hub_name(i / 10), hub_name(i % 10))
}

#[test]
fn test_three_people_graph() {
    let (_dir, store) = setup_store(&[("rel.txt", "John; Mary\nMary; Paul\n".to_string())]);

    let view = store.build_graph_view("rel.txt", &ViewOptions::default()).unwrap();
    assert_eq!(view.nodes.len(), 3);
    assert_eq!(view.edges.len(), 2);
    let degrees: Vec<(String, usize)> = view.nodes.iter().map(|n| (n.label.clone(), n.degree)).collect();
    assert_eq!(
        degrees,
        vec![("John".to_string(), 1), ("Mary".to_string(), 2), ("Paul".to_string(), 1)]
    );

    let counts = store.occurrence_counts("rel.txt").unwrap();
    assert_eq!(counts.get("Mary"), Some(&2));
}

#[test]
fn test_truncation_keeps_top_ten_by_degree() {
    let (_dir, store) = setup_store(&[("big.txt", hundred_objects())]);
    assert_eq!(store.degree_table("big.txt").unwrap().len(), 100);

    let options = ViewOptions {
        max_objects: 10,
        ..ViewOptions::default()
    };
    let view = store.build_graph_view("big.txt", &options).unwrap();

    assert_eq!(view.nodes.len(), 10);
    assert!(view.nodes.iter().all(|n| n.id.starts_with("hub ")));
    let kept: HashSet<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(view.edges.len(), 10);
    assert!(view
        .edges
        .iter()
        .all(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str())));
}

#[test]
fn test_graph_building_is_idempotent() {
    let text = hundred_objects();
    let relations: Vec<Relation> = text.lines().filter_map(Relation::parse_line).collect();

    let first = GraphBuilder::from_relations(&relations);
    let second = GraphBuilder::from_relations(&relations);
    assert_eq!(first, second);
    assert_eq!(first.degrees(), second.degrees());
}

#[test]
fn test_layout_is_deterministic_per_seed() {
    let (_dir, store) = setup_store(&[("big.txt", hundred_objects())]);
    let options = ViewOptions {
        max_objects: 30,
        ..ViewOptions::default()
    };

    let first = store.build_graph_view("big.txt", &options).unwrap();
    let second = store.build_graph_view("big.txt", &options).unwrap();
    let positions = |view: &connexa_graph::GraphView| -> Vec<(u64, u64)> {
        view.nodes.iter().map(|n| (n.x.to_bits(), n.y.to_bits())).collect()
    };
    assert_eq!(positions(&first), positions(&second));

    let reseeded = store
        .build_graph_view("big.txt", &ViewOptions { seed: 7, ..options.clone() })
        .unwrap();
    assert_ne!(positions(&first), positions(&reseeded));
}

#[test]
fn test_partition_is_complete_and_dense() {
    let (_dir, store) = setup_store(&[("big.txt", hundred_objects())]);
    let view = store
        .build_graph_view("big.txt", &ViewOptions { max_objects: 40, ..ViewOptions::default() })
        .unwrap();

    let clusters = view.cluster_count();
    assert!(clusters >= 1);
    for node in &view.nodes {
        let cluster = node.cluster_id.expect("every node of a graph with edges has a cluster");
        assert!(cluster < clusters);
    }

    let relations: Vec<Relation> = hundred_objects().lines().filter_map(Relation::parse_line).collect();
    let graph = GraphBuilder::from_relations(&relations);
    let partition = detect_communities(&graph);
    let total: usize = partition.clusters().iter().map(Vec::len).sum();
    assert_eq!(total, graph.node_count());
}

#[test]
fn test_uniform_degrees_use_min_style() {
    // a ring: every node has degree 2
    let (_dir, store) = setup_store(&[("ring.txt", "A; B\nB; C\nC; D\nD; A\n".to_string())]);
    let style = VisualStyle {
        min_color: Rgb::parse("#112233").unwrap(),
        max_color: Rgb::parse("#ffffff").unwrap(),
        avg_size: 12.0,
    };
    let view = store
        .build_graph_view("ring.txt", &ViewOptions { style, ..ViewOptions::default() })
        .unwrap();

    for node in &view.nodes {
        assert_eq!(node.size, 12.0);
        assert_eq!(node.color, "#112233");
        assert_eq!(node.border_color, "#112233");
    }
    assert!(view.edges.iter().all(|e| e.color == "#112233"));
}

#[test]
fn test_store_queries_on_missing_file() {
    let (_dir, store) = setup_store(&[]);
    assert!(matches!(store.occurrence_counts("missing.txt"), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.frequent_objects("missing.txt", Metric::Degree, 3, 50),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_degree_table_sorting() {
    let (_dir, store) = setup_store(&[("rel.txt", "john; Mary\nMary; Paul\nAnna; Mary\n".to_string())]);
    let table = store.degree_table("rel.txt").unwrap();

    let by_degree = table.clone().sorted(SortKey::Degree, SortOrder::Desc);
    assert_eq!(by_degree.rows[0].object, "Mary");
    assert_eq!(by_degree.rows[1].object, "John");

    let by_name = table.sorted(SortKey::Object, SortOrder::Asc);
    let names: Vec<&str> = by_name.rows.iter().map(|r| r.object.as_str()).collect();
    assert_eq!(names, vec!["Anna", "John", "Mary", "Paul"]);
}

// Tool surface

fn server(dir: &Path, store: RelationStore) -> McpServer {
    let runner = AnalysisRunner::new(RunnerConfig::new(dir.join("output"), store.filtered_dir().to_path_buf()));
    let service = AnalysisService::new(
        runner,
        Box::new(|_intent: Intent| {
            let extractor: Arc<dyn Extractor> = Arc::new(|_: &str| -> Result<String, ExtractionError> {
                Ok("Anna; Boris\nBoris; Clara".to_string())
            });
            Some(extractor)
        }),
    );

    let mut server = McpServer::new();
    register_all_tools(&mut server, Arc::new(store), Arc::new(service));
    server
}

fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    });
    let line = server.handle_line(&request.to_string()).unwrap().unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    response["result"].clone()
}

fn text_of(result: &Value) -> String {
    result["content"][0]["text"].as_str().unwrap().to_string()
}

#[test]
fn test_all_tools_are_registered() {
    let (dir, store) = setup_store(&[]);
    let server = server(dir.path(), store);
    assert_eq!(
        server.tool_names(),
        vec![
            "build_graph_view",
            "cancel_analysis",
            "degree_table",
            "export_connections",
            "frequent_objects",
            "get_progress",
            "list_relation_files",
            "occurrence_counts",
            "start_analysis",
        ]
    );
}

#[test]
fn test_graph_tools_round_trip() {
    let (dir, store) = setup_store(&[("rel.txt", "John; Mary\nMary; Paul\n".to_string())]);
    let server = server(dir.path(), store);

    let files: Vec<String> = serde_json::from_str(&text_of(&call_tool(&server, "list_relation_files", json!({})))).unwrap();
    assert_eq!(files, vec!["rel.txt"]);

    let view: Value = serde_json::from_str(&text_of(&call_tool(
        &server,
        "build_graph_view",
        json!({"file": "rel.txt", "maxObjects": 2, "minColor": "#000", "maxColor": "#fff"}),
    )))
    .unwrap();
    assert_eq!(view["nodes"].as_array().unwrap().len(), 2);
    assert!(view["nodes"][0].get("borderColor").is_some());
    assert!(view["nodes"][0].get("clusterId").is_some());

    let table = text_of(&call_tool(&server, "degree_table", json!({"file": "rel.txt", "sortBy": "object", "order": "asc"})));
    assert!(table.contains("\"object\": \"John\""));

    let frequent = text_of(&call_tool(&server, "frequent_objects", json!({"file": "rel.txt"})));
    assert_eq!(frequent, "No objects with more than 3 occurrences found.");

    let exported = text_of(&call_tool(&server, "export_connections", json!({"file": "rel.txt"})));
    assert!(exported.starts_with("Connections saved to"));
    assert_eq!(
        fs::read_to_string(dir.path().join("csv").join("rel_connections.csv")).unwrap(),
        "Source,Target,Strength\nJohn,Mary,N/A\nMary,Paul,N/A\n"
    );
}

#[test]
fn test_tool_errors_are_inline() {
    let (dir, store) = setup_store(&[]);
    let server = server(dir.path(), store);

    let missing = call_tool(&server, "build_graph_view", json!({"file": "missing.txt"}));
    assert_eq!(missing["isError"], true);
    assert!(text_of(&missing).contains("File not found"));

    let bad_color = call_tool(&server, "build_graph_view", json!({"file": "x.txt", "minColor": "pink"}));
    assert_eq!(bad_color["isError"], true);

    let no_file = call_tool(&server, "degree_table", json!({}));
    assert_eq!(no_file["isError"], true);
}

#[test]
fn test_analysis_tools_run_to_completion() {
    let (dir, store) = setup_store(&[]);
    let filtered_dir = store.filtered_dir().to_path_buf();
    let server = server(dir.path(), store);

    let started: Value = serde_json::from_str(&text_of(&call_tool(
        &server,
        "start_analysis",
        json!({"intent": "related_people", "documentText": "Anna knows Boris.", "documentName": "notes.txt"}),
    )))
    .unwrap();
    let run_id = started["runId"].as_u64().unwrap();

    let mut snapshot = Value::Null;
    for _ in 0..200 {
        snapshot = serde_json::from_str(&text_of(&call_tool(&server, "get_progress", json!({"runId": run_id})))).unwrap();
        if snapshot["running"] == false {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    assert_eq!(snapshot["progress"], 100);
    assert_eq!(snapshot["status"]["state"], "completed");
    assert_eq!(snapshot["chunksDone"], 1);
    assert_eq!(snapshot["totalChunks"], 1);

    let cancel = text_of(&call_tool(&server, "cancel_analysis", json!({"runId": run_id})));
    assert_eq!(cancel, format!("Run {} is not running", run_id));

    assert_eq!(
        fs::read_to_string(filtered_dir.join("filtered_output_related_people_notes.txt")).unwrap(),
        "Anna; Boris\nBoris; Clara\n"
    );

    let unknown = call_tool(&server, "get_progress", json!({"runId": 999}));
    assert_eq!(unknown["isError"], true);

    let bad_intent = call_tool(&server, "start_analysis", json!({"intent": "gossip", "documentText": "x"}));
    assert_eq!(bad_intent["isError"], true);
}
