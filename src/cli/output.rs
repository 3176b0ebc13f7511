use std::fmt::Write as FmtWrite;

use crate::models::{CollectionStatus, DatasetReport, OutputFormat, SearchResults};

pub trait Formatter: Send + Sync {
    fn format_collection_ready(&self, collection: &str) -> String;
    fn format_uploaded(&self, dataset: &str, count: usize) -> String;
    fn format_summary(&self, reports: &[DatasetReport]) -> String;
    fn format_validation(&self, datasets: &[ValidationInfo]) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_search_results(&self, results: &SearchResults) -> String;
    fn format_message(&self, message: &str) -> String;
}

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_version: Option<String>,
    pub vector_store_url: String,
    pub vector_store_connected: bool,
    pub collections: Vec<CollectionStatus>,
}

#[derive(Debug, Clone)]
pub struct ValidationInfo {
    pub dataset: String,
    pub path: String,
    pub records: usize,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_collection_ready(&self, collection: &str) -> String {
        format!("✅ Created collection {}\n", collection)
    }

    fn format_uploaded(&self, dataset: &str, count: usize) -> String {
        format!("✅ Uploaded {} {}\n", count, dataset)
    }

    fn format_summary(&self, reports: &[DatasetReport]) -> String {
        let mut output = String::new();
        writeln!(output, "🎉 All data uploaded successfully!").unwrap();
        for report in reports {
            writeln!(
                output,
                "   {}: {} points in {}ms",
                report.collection, report.points_uploaded, report.duration_ms
            )
            .unwrap();
        }
        output
    }

    fn format_validation(&self, datasets: &[ValidationInfo]) -> String {
        let mut output = String::new();
        writeln!(output, "Validation successful").unwrap();
        writeln!(output, "---------------------").unwrap();
        for info in datasets {
            writeln!(
                output,
                "  {} ({}): {} records ready",
                info.dataset, info.path, info.records
            )
            .unwrap();
        }
        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        let embedding_status = match status.embedding_version {
            Some(ref version) => format!("[RUNNING] v{}", version),
            None => "[UNREACHABLE]".to_string(),
        };
        writeln!(output, "Ollama:        {}", embedding_status).unwrap();
        writeln!(output, "  URL:         {}", status.embedding_url).unwrap();
        writeln!(output, "  Model:       {}", status.embedding_model).unwrap();
        writeln!(output).unwrap();

        let vector_status = if status.vector_store_connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(output, "Qdrant:        {}", vector_status).unwrap();
        writeln!(output, "  URL:         {}", status.vector_store_url).unwrap();
        for collection in &status.collections {
            if collection.exists {
                writeln!(
                    output,
                    "  {:<12} {} points",
                    collection.name, collection.points_count
                )
                .unwrap();
            } else {
                writeln!(output, "  {:<12} (missing)", collection.name).unwrap();
            }
        }

        output
    }

    fn format_search_results(&self, results: &SearchResults) -> String {
        if results.is_empty() {
            return format!("No results found for: {}\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "Search results for: \"{}\"", results.query).unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.hits.len(),
            results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.hits.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}]", i + 1, hit.score).unwrap();
            writeln!(output, "   Collection: {}", hit.collection).unwrap();
            writeln!(output, "   Id: {}", hit.id).unwrap();
            writeln!(output, "   ---").unwrap();

            let payload = serde_json::to_string(&hit.payload).unwrap_or_default();
            let preview: String = payload.chars().take(PREVIEW_CHARS).collect();
            if payload.chars().count() > PREVIEW_CHARS {
                writeln!(output, "   {}...", preview).unwrap();
            } else {
                writeln!(output, "   {}", preview).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }
}

/// Line-delimited JSON: every checkpoint and summary is one object per line.
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)) + "\n"
    }
}

impl Formatter for JsonFormatter {
    fn format_collection_ready(&self, collection: &str) -> String {
        serde_json::json!({"event": "collection_created", "collection": collection}).to_string()
            + "\n"
    }

    fn format_uploaded(&self, dataset: &str, count: usize) -> String {
        serde_json::json!({"event": "uploaded", "dataset": dataset, "count": count}).to_string()
            + "\n"
    }

    fn format_summary(&self, reports: &[DatasetReport]) -> String {
        self.render(&serde_json::json!({
            "success": true,
            "datasets": reports,
        }))
    }

    fn format_validation(&self, datasets: &[ValidationInfo]) -> String {
        let datasets: Vec<serde_json::Value> = datasets
            .iter()
            .map(|info| {
                serde_json::json!({
                    "dataset": info.dataset,
                    "path": info.path,
                    "records": info.records,
                })
            })
            .collect();
        self.render(&serde_json::json!({"valid": true, "datasets": datasets}))
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        self.render(&serde_json::json!({
            "embedding": {
                "url": status.embedding_url,
                "model": status.embedding_model,
                "running": status.embedding_version.is_some(),
                "version": status.embedding_version,
            },
            "vector_store": {
                "url": status.vector_store_url,
                "connected": status.vector_store_connected,
                "collections": status.collections,
            }
        }))
    }

    fn format_search_results(&self, results: &SearchResults) -> String {
        self.render(&serde_json::json!({
            "query": results.query,
            "collections": results.collections,
            "total": results.hits.len(),
            "duration_ms": results.duration_ms,
            "results": results.hits,
        }))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string() + "\n"
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchHit;
    use serde_json::json;

    fn report(collection: &str, points: usize) -> DatasetReport {
        DatasetReport {
            dataset: collection.to_string(),
            collection: collection.to_string(),
            records: points,
            points_uploaded: points,
            duration_ms: 12,
        }
    }

    #[test]
    fn test_text_checkpoints() {
        let f = TextFormatter;
        assert_eq!(
            f.format_collection_ready("contracts"),
            "✅ Created collection contracts\n"
        );
        assert_eq!(f.format_uploaded("tickets", 4), "✅ Uploaded 4 tickets\n");
        assert!(
            f.format_summary(&[report("contracts", 7)])
                .starts_with("🎉 All data uploaded successfully!")
        );
    }

    #[test]
    fn test_json_summary_parses() {
        let f = JsonFormatter::new(false);
        let out = f.format_summary(&[report("contracts", 7), report("tickets", 0)]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["datasets"][0]["points_uploaded"], 7);
        assert_eq!(value["datasets"][1]["collection"], "tickets");
    }

    fn status(connected: bool) -> StatusInfo {
        StatusInfo {
            embedding_url: "http://localhost:11434".to_string(),
            embedding_model: "deepseek-coder:6.7b".to_string(),
            embedding_version: Some("0.5.7".to_string()),
            vector_store_url: "http://localhost:6334".to_string(),
            vector_store_connected: connected,
            collections: vec![CollectionStatus {
                name: "contracts".to_string(),
                exists: true,
                points_count: 7,
            }],
        }
    }

    fn results(hits: usize) -> SearchResults {
        SearchResults {
            query: "refund for late delivery".to_string(),
            collections: vec!["contracts".to_string(), "tickets".to_string()],
            hits: (0..hits)
                .map(|i| SearchHit {
                    collection: "tickets".to_string(),
                    id: format!("id-{}", i),
                    score: 0.9 - i as f32 * 0.1,
                    payload: match json!({"ticketId": format!("T-{}", i), "subject": "Late refund"}) {
                        serde_json::Value::Object(map) => map,
                        _ => unreachable!(),
                    },
                })
                .collect(),
            duration_ms: 42,
        }
    }

    #[test]
    fn test_json_mode_emits_one_object_per_line() {
        let f = get_formatter(OutputFormat::Json);
        let stream = [
            f.format_collection_ready("contracts"),
            f.format_uploaded("contracts", 7),
            f.format_summary(&[report("contracts", 7), report("tickets", 4)]),
            f.format_validation(&[ValidationInfo {
                dataset: "tickets".to_string(),
                path: "data/tickets.txt".to_string(),
                records: 4,
            }]),
            f.format_status(&status(true)),
            f.format_search_results(&results(2)),
            f.format_message("done"),
        ]
        .concat();

        let lines: Vec<&str> = stream.lines().collect();
        assert_eq!(lines.len(), 7);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("not a JSON line: {:?}: {}", line, e));
            assert!(value.is_object());
        }
    }

    #[test]
    fn test_text_search_results() {
        let out = TextFormatter.format_search_results(&results(2));
        assert!(out.starts_with("Search results for: \"refund for late delivery\""));
        assert!(out.contains("Found 2 results in 42ms"));
        assert!(out.contains("1. [Score: 0.900]"));
        assert!(out.contains("Collection: tickets"));
        assert!(out.contains("\"ticketId\":\"T-1\""));
    }

    #[test]
    fn test_text_search_no_results() {
        let out = TextFormatter.format_search_results(&results(0));
        assert_eq!(out, "No results found for: refund for late delivery\n");
    }

    #[test]
    fn test_text_search_truncates_long_payloads() {
        let mut long = results(1);
        long.hits[0]
            .payload
            .insert("description".to_string(), json!("x".repeat(500)));
        let out = TextFormatter.format_search_results(&long);
        assert!(out.contains("..."));
        assert!(!out.contains(&"x".repeat(300)));
    }

    #[test]
    fn test_json_search_results() {
        let out = JsonFormatter::new(false).format_search_results(&results(2));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["query"], "refund for late delivery");
        assert_eq!(value["total"], 2);
        assert_eq!(value["results"][0]["collection"], "tickets");
        assert_eq!(value["results"][1]["payload"]["ticketId"], "T-1");
    }

    #[test]
    fn test_text_status_marks_missing_collections() {
        let status = StatusInfo {
            embedding_url: "http://localhost:11434".to_string(),
            embedding_model: "deepseek-coder:6.7b".to_string(),
            embedding_version: None,
            vector_store_url: "http://localhost:6334".to_string(),
            vector_store_connected: true,
            collections: vec![
                CollectionStatus {
                    name: "contracts".to_string(),
                    exists: true,
                    points_count: 7,
                },
                CollectionStatus {
                    name: "tickets".to_string(),
                    exists: false,
                    points_count: 0,
                },
            ],
        };
        let out = TextFormatter.format_status(&status);
        assert!(out.contains("[UNREACHABLE]"));
        assert!(out.contains("7 points"));
        assert!(out.contains("(missing)"));
    }
}
