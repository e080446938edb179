//! Runs one subcommand against an initialized repository and returns its JSON output.

use anyhow::{Context, Result};
use repository_core::{Document, DocumentCollection};
use repository_sqlite::DocumentRepository;
use serde_json::{json, Value};

use crate::cli::Commands;

pub async fn execute(repo: &DocumentRepository<Value>, command: &Commands) -> Result<Value> {
    match command {
        Commands::Init => Ok(json!({
            "collection": repo.collection(),
            "state": repo.state().as_str(),
            "documents": repo.count().await?,
        })),
        Commands::Put { id, json } => {
            let body: Value =
                serde_json::from_str(json).with_context(|| format!("invalid JSON for {}", id))?;
            repo.save(id, &body).await?;
            Ok(json!({ "saved": id }))
        }
        Commands::Get { id } => {
            let doc = repo
                .find_by_id(id)
                .await?
                .with_context(|| format!("document not found: {}", id))?;
            Ok(document_json(doc))
        }
        Commands::List => {
            let docs = repo.find_all().await?;
            Ok(Value::Array(docs.into_iter().map(document_json).collect()))
        }
        Commands::Delete { id } => {
            let deleted = repo.delete(id).await?;
            Ok(json!({ "id": id, "deleted": deleted }))
        }
    }
}

fn document_json(doc: Document<Value>) -> Value {
    json!({
        "id": doc.id,
        "body": doc.body,
        "created_at": doc.created_at.to_rfc3339(),
        "updated_at": doc.updated_at.to_rfc3339(),
    })
}
