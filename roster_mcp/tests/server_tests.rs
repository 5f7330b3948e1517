mod helpers;

use std::collections::BTreeSet;

use rmcp::model::CallToolRequestParam;
use rmcp::service::RunningService;
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::{RoleClient, ServiceExt};
use roster_mcp::{HTTP_PATH, RosterMcpServer};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use helpers::{count_employees, create_store, get_json, is_error, is_success, john_doe};

/// Connect an in-process client to `server` over an in-memory duplex pipe.
async fn connect(server: RosterMcpServer) -> RunningService<RoleClient, ()> {
    let (server_transport, client_transport) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        if let Ok(service) = server.serve(server_transport).await {
            let _ = service.waiting().await;
        }
    });

    ().serve(client_transport)
        .await
        .expect("Failed to connect client")
}

fn request(name: &str, arguments: Value) -> CallToolRequestParam {
    serde_json::from_value(json!({ "name": name, "arguments": arguments }))
        .expect("Failed to build tool request")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_all_tools() {
        let (_dir, store) = create_store();
        let server = RosterMcpServer::new(store);

        let names: BTreeSet<String> = server.tools().iter().map(|t| t.name.to_string()).collect();

        assert_eq!(
            names,
            BTreeSet::from(
                [
                    "create_record",
                    "delete_record",
                    "get_data",
                    "get_records",
                    "query_database",
                    "update_record"
                ]
                .map(String::from)
            )
        );
        assert!(server.has_tool("get_records"));
        assert!(!server.has_tool("drop_table"));
    }

    #[test]
    fn test_create_record_schema_advertises_employee_fields() {
        let (_dir, store) = create_store();
        let server = RosterMcpServer::new(store);

        let tool = server
            .tools()
            .into_iter()
            .find(|t| t.name == "create_record")
            .unwrap();
        let schema = &tool.input_schema;

        assert_eq!(
            schema["properties"]["location"]["enum"],
            json!(["Noida", "Gurgaon", "Bangalore", "Hyderabad"])
        );
        assert!(schema["required"].as_array().unwrap().contains(&json!("dob")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_and_read_over_transport() {
        let (_dir, store) = create_store();
        let client = connect(RosterMcpServer::new(store)).await;

        let created = client
            .call_tool(request("create_record", Value::Object(john_doe())))
            .await
            .unwrap();
        assert!(is_success(&created));
        let eid = get_json(&created)["eid"].as_i64().unwrap();

        let read = client
            .call_tool(request(
                "get_records",
                json!({"table_name": "employees", "criteria": "eid", "value": eid}),
            ))
            .await
            .unwrap();

        assert!(is_success(&read));
        let body = get_json(&read);
        assert_eq!(body["rows"].as_array().unwrap().len(), 1);
        assert_eq!(body["rows"][0]["first_name"], json!("John"));

        client.cancel().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_tools_over_transport() {
        let (_dir, store) = create_store();
        let client = connect(RosterMcpServer::new(store)).await;

        let tools = client.list_all_tools().await.unwrap();

        assert_eq!(tools.len(), 6);
        client.cancel().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_tool_is_not_found() {
        let (_dir, store) = create_store();
        let client = connect(RosterMcpServer::new(store)).await;

        let error = client
            .call_tool(request("drop_table", json!({})))
            .await
            .unwrap_err();

        assert!(format!("{:?}", error).contains("NotFoundError"));

        // The server keeps serving after the failed call
        let listed = client
            .call_tool(request("get_records", json!({})))
            .await
            .unwrap();
        assert!(is_success(&listed));

        client.cancel().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_validation_failure_is_tool_error() {
        let (dir, store) = create_store();
        let client = connect(RosterMcpServer::new(store)).await;

        let mut payload = john_doe();
        payload.insert("location".to_string(), json!("Mumbai"));

        let result = client
            .call_tool(request("create_record", Value::Object(payload)))
            .await
            .unwrap();

        assert!(is_error(&result));
        assert_eq!(get_json(&result)["error"], json!("ValidationError"));
        assert_eq!(count_employees(&dir), 0);

        client.cancel().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_creates() {
        let (dir, store) = create_store();
        let client = connect(RosterMcpServer::new(store)).await;

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let peer = client.peer().clone();
                let mut payload = john_doe();
                payload.insert("first_name".to_string(), json!(format!("Worker{}", i)));
                tokio::spawn(async move {
                    peer.call_tool(request("create_record", Value::Object(payload)))
                        .await
                })
            })
            .collect();

        let mut ids = BTreeSet::new();
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert!(is_success(&result));
            ids.insert(get_json(&result)["eid"].as_i64().unwrap());
        }

        assert_eq!(ids.len(), 10);
        assert_eq!(count_employees(&dir), 10);

        client.cancel().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_and_list_over_http() {
        let (dir, store) = create_store();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let server = tokio::spawn(RosterMcpServer::new(store).serve_http_listener(
            listener,
            async move {
                let _ = stopped.await;
            },
        ));

        let transport =
            StreamableHttpClientTransport::from_uri(format!("http://{}{}", addr, HTTP_PATH));
        let client = ()
            .serve(transport)
            .await
            .expect("Failed to connect over HTTP");

        let tools = client.list_all_tools().await.unwrap();
        assert_eq!(tools.len(), 6);

        let created = client
            .call_tool(request("create_record", Value::Object(john_doe())))
            .await
            .unwrap();
        assert!(is_success(&created));
        assert!(get_json(&created)["eid"].as_i64().unwrap() > 0);
        assert_eq!(count_employees(&dir), 1);

        client.cancel().await.unwrap();
        let _ = stop.send(());
        server.abort();
    }
}
