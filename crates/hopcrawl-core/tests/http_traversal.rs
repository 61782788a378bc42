//! End-to-end traversal against a mocked neighbor service.

use std::collections::HashSet;

use hopcrawl_core::{
    BfsEngine, CrawlerConfig, HttpNeighborClient, ParallelBfsEngine, SequentialBfsEngine,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_node(server: &MockServer, encoded: &str, node: &str, neighbors: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/neighbors/{encoded}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "node": node,
            "neighbors": neighbors,
        })))
        .mount(server)
        .await;
}

async fn movie_graph() -> MockServer {
    let server = MockServer::start().await;
    mount_node(
        &server,
        "Kevin%20Bacon",
        "Kevin Bacon",
        &["Footloose", "Apollo 13", "Tremors"],
    )
    .await;
    mount_node(&server, "Footloose", "Footloose", &["Kevin Bacon", "Lori Singer"]).await;
    mount_node(&server, "Apollo%2013", "Apollo 13", &["Tom Hanks", "Kevin Bacon"]).await;
    mount_node(&server, "Lori%20Singer", "Lori Singer", &["Footloose"]).await;
    mount_node(&server, "Tom%20Hanks", "Tom Hanks", &["Apollo 13", "Big"]).await;

    // Tremors answers with a truncated body.
    Mock::given(method("GET"))
        .and(path("/neighbors/Tremors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"neighbors\": [\"Fred"))
        .mount(&server)
        .await;

    // Big is unknown to the service.
    Mock::given(method("GET"))
        .and(path("/neighbors/Big"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    server
}

fn engines(server: &MockServer) -> Vec<Box<dyn BfsEngine>> {
    let config = CrawlerConfig::new()
        .with_base_url(format!("{}/neighbors/", server.uri()))
        .with_max_workers(4);
    let client = HttpNeighborClient::new(&config).unwrap();
    vec![
        Box::new(ParallelBfsEngine::new(client.clone(), config.clone())),
        Box::new(SequentialBfsEngine::new(client, config)),
    ]
}

fn level(levels: &[Vec<String>], depth: usize) -> HashSet<&str> {
    levels[depth].iter().map(String::as_str).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawl_over_http() {
    let server = movie_graph().await;

    for engine in engines(&server) {
        let (result, stats) = engine.traverse("Kevin Bacon", 3).await.unwrap();
        let levels: Vec<_> = result.into_levels().collect();

        assert_eq!(levels.len(), 4, "{}", engine.name());
        assert_eq!(level(&levels, 0), HashSet::from(["Kevin Bacon"]));
        assert_eq!(
            level(&levels, 1),
            HashSet::from(["Footloose", "Apollo 13", "Tremors"])
        );
        assert_eq!(level(&levels, 2), HashSet::from(["Lori Singer", "Tom Hanks"]));
        assert_eq!(level(&levels, 3), HashSet::from(["Big"]));

        // Tremors fails to parse.
        assert_eq!(stats.total_failed_queries(), 1);
        assert_eq!(stats.total_queries(), 1 + 3 + 2);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_server_error_is_a_leaf() {
    let server = movie_graph().await;

    for engine in engines(&server) {
        let (result, stats) = engine.traverse("Big", 2).await.unwrap();
        assert_eq!(result.num_levels(), 3);
        assert_eq!(result.total_nodes(), 1);
        assert_eq!(stats.total_failed_queries(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unreachable_service_still_terminates() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = CrawlerConfig::new().with_base_url(format!("http://{addr}/neighbors/"));
    let client = HttpNeighborClient::new(&config).unwrap();
    let engine = ParallelBfsEngine::new(client, config);

    let (result, stats) = engine.run("Kevin Bacon", 5).await.unwrap();
    assert_eq!(result.num_levels(), 6);
    assert_eq!(result.total_nodes(), 1);
    assert_eq!(stats.total_failed_queries(), 1);
}
