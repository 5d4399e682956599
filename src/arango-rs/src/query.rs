//! AQL query execution and AQL user functions.

use std::collections::BTreeMap;

use arango_core::{ExplainOptions, QueryOptions};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cursor::Cursor;
use crate::database::Database;
use crate::error::Result;

#[derive(Deserialize)]
struct AqlFunction {
    name: String,
    code: String,
}

impl Database {
    /// Runs an AQL query and returns a lazy cursor over its results.
    pub async fn execute_query(&self, query: &str, options: &QueryOptions) -> Result<Cursor> {
        let response = self
            .conn
            .post(self.name(), "/cursor")
            .json(&options.to_request(query))
            .send()
            .await?
            .ok_or("execute query")?;
        Cursor::from_response(self.conn.clone(), self.name(), &response)
    }

    /// Returns the optimal plan, or every plan when `all_plans` is set.
    pub async fn explain_query(&self, query: &str, options: &ExplainOptions) -> Result<Value> {
        let response = self
            .conn
            .post(self.name(), "/explain")
            .json(&options.to_request(query))
            .send()
            .await?
            .ok_or("explain query")?;
        if options.all_plans {
            response.into_field("plans")
        } else {
            response.into_field("plan")
        }
    }

    /// Parses a query without running it; returns the bind parameter and
    /// collection names it references.
    pub async fn validate_query(&self, query: &str) -> Result<Value> {
        let mut body: Value = self
            .conn
            .post(self.name(), "/query")
            .json(&json!({ "query": query }))
            .send()
            .await?
            .ok_or("validate query")?
            .into_body()?;
        if let Value::Object(map) = &mut body {
            map.remove("error");
            map.remove("code");
        }
        Ok(body)
    }

    // ===== AQL functions =====

    /// User-defined AQL functions, mapped name to JavaScript source.
    pub async fn aql_functions(&self) -> Result<BTreeMap<String, String>> {
        let functions: Vec<AqlFunction> = self
            .conn
            .get(self.name(), "/aqlfunction")
            .send()
            .await?
            .ok_or("list AQL functions")?
            .into_body()?;
        Ok(functions.into_iter().map(|f| (f.name, f.code)).collect())
    }

    pub async fn create_aql_function(&self, name: &str, code: &str) -> Result<Value> {
        self.conn
            .post(self.name(), "/aqlfunction")
            .json(&json!({ "name": name, "code": code }))
            .send()
            .await?
            .ok_or("create AQL function")?
            .into_body()
    }

    /// Deletes one function, or a whole namespace when `group` is true.
    pub async fn delete_aql_function(&self, name: &str, group: Option<bool>) -> Result<Value> {
        self.conn
            .delete(self.name(), format!("/aqlfunction/{}", name))
            .param_opt("group", group)
            .send()
            .await?
            .ok_or("delete AQL function")?
            .into_body()
    }
}
