use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Row, Value};
use crate::writers::Sink;

/// One recorded statement execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub statement: String,
    pub values: Vec<Value>,
}

/// Sink that keeps executions in memory; used for dry runs.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    executions: Vec<Execution>,
    commits: usize,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Executions as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.executions)?)
    }
}

#[async_trait]
impl Sink for MemoryWriter {
    async fn store(&mut self, statement: &str, rows: &[Row]) -> Result<usize> {
        for row in rows {
            self.executions.push(Execution {
                statement: statement.to_string(),
                values: row.values().to_vec(),
            });
        }
        self.commits += 1;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_each_row_and_one_commit() {
        let mut writer = MemoryWriter::new();
        let rows = vec![
            Row::new(vec![Value::Int16(1), Value::Text("a".to_string())]),
            Row::new(vec![Value::Int16(2), Value::Text("b".to_string())]),
        ];

        let stored = writer.store("INSERT INTO t VALUES ($1, $2)", &rows).await.unwrap();

        assert_eq!(stored, 2);
        assert_eq!(writer.commits(), 1);
        assert_eq!(writer.executions()[1].values, rows[1].values());
        assert!(writer.to_json().unwrap().contains("\"b\""));
    }
}
