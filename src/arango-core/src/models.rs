use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// CollectionStatus is the load state the server reports for a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "u64", into = "u64")]
pub enum CollectionStatus {
    New,
    Unloaded,
    Loaded,
    Unloading,
    Deleted,
    /// Any status code the server should never report
    Corrupted(u64),
}

impl From<u64> for CollectionStatus {
    fn from(code: u64) -> Self {
        match code {
            1 => Self::New,
            2 => Self::Unloaded,
            3 => Self::Loaded,
            4 => Self::Unloading,
            5 => Self::Deleted,
            other => Self::Corrupted(other),
        }
    }
}

impl From<CollectionStatus> for u64 {
    fn from(status: CollectionStatus) -> Self {
        match status {
            CollectionStatus::New => 1,
            CollectionStatus::Unloaded => 2,
            CollectionStatus::Loaded => 3,
            CollectionStatus::Unloading => 4,
            CollectionStatus::Deleted => 5,
            CollectionStatus::Corrupted(code) => code,
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Unloaded => write!(f, "unloaded"),
            Self::Loaded => write!(f, "loaded"),
            Self::Unloading => write!(f, "unloading"),
            Self::Deleted => write!(f, "deleted"),
            Self::Corrupted(code) => write!(f, "corrupted ({})", code),
        }
    }
}

/// CollectionType distinguishes document collections (2) from edge collections (3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "u8", into = "u8")]
pub enum CollectionType {
    #[default]
    Document,
    Edge,
}

impl From<u8> for CollectionType {
    fn from(code: u8) -> Self {
        if code == 3 {
            Self::Edge
        } else {
            Self::Document
        }
    }
}

impl From<CollectionType> for u8 {
    fn from(kind: CollectionType) -> Self {
        match kind {
            CollectionType::Document => 2,
            CollectionType::Edge => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyGenerator {
    #[default]
    Traditional,
    Autoincrement,
}

/// KeyOptions controls how document keys are generated in a collection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOptions {
    #[serde(rename = "type", default)]
    pub generator: KeyGenerator,
    #[serde(default = "default_true")]
    pub allow_user_keys: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            generator: KeyGenerator::Traditional,
            allow_user_keys: true,
            increment: None,
            offset: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// CollectionProperties is the answer of `GET /collection/{name}/properties`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProperties {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub collection_type: CollectionType,
    pub status: CollectionStatus,
    #[serde(default)]
    pub do_compact: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_size: Option<u64>,
    #[serde(default)]
    pub wait_for_sync: bool,
    #[serde(default)]
    pub key_options: KeyOptions,
}

impl CollectionProperties {
    pub fn is_edge(&self) -> bool {
        self.collection_type == CollectionType::Edge
    }
}

/// One entry of `GET /collection`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub name: String,
    #[serde(default)]
    pub is_system: bool,
}

/// Collection names of a database split by origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionList {
    pub user: Vec<String>,
    pub system: Vec<String>,
    /// User collections followed by system collections
    pub all: Vec<String>,
}

impl FromIterator<CollectionSummary> for CollectionList {
    fn from_iter<I: IntoIterator<Item = CollectionSummary>>(iter: I) -> Self {
        let mut list = CollectionList::default();
        for summary in iter {
            if summary.is_system {
                list.system.push(summary.name);
            } else {
                list.user.push(summary.name);
            }
        }
        list.all = list.user.iter().chain(list.system.iter()).cloned().collect();
        list
    }
}

/// Options accepted when creating a collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionOptions {
    pub wait_for_sync: bool,
    pub do_compact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_size: Option<u64>,
    pub is_system: bool,
    pub is_volatile: bool,
    #[serde(rename = "type")]
    pub collection_type: CollectionType,
    pub key_options: KeyOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_shards: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_keys: Option<Vec<String>>,
}

impl Default for CreateCollectionOptions {
    fn default() -> Self {
        Self {
            wait_for_sync: false,
            do_compact: true,
            journal_size: None,
            is_system: false,
            is_volatile: false,
            collection_type: CollectionType::Document,
            key_options: KeyOptions::default(),
            number_of_shards: None,
            shard_keys: None,
        }
    }
}

impl CreateCollectionOptions {
    pub fn edge() -> Self {
        Self {
            collection_type: CollectionType::Edge,
            ..Self::default()
        }
    }
}

/// The mutable subset of collection properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPropertiesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_sync: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_size: Option<u64>,
}

impl CollectionPropertiesUpdate {
    pub fn is_empty(&self) -> bool {
        self.wait_for_sync.is_none() && self.journal_size.is_none()
    }
}

/// Database names visible to the connecting user and on the whole server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseList {
    pub all: Vec<String>,
    pub user: Vec<String>,
}

/// Account created together with a new database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseUser {
    pub username: String,
    pub passwd: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl DatabaseUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            passwd: password.into(),
            active: None,
            extra: None,
        }
    }
}

/// DatabaseInfo is the answer of `GET /database/current`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EdgeDefinition {
    pub collection: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

impl EdgeDefinition {
    pub fn new(
        collection: impl Into<String>,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            collection: collection.into(),
            from: from.into_iter().map(Into::into).collect(),
            to: to.into_iter().map(Into::into).collect(),
        }
    }
}

/// GraphInfo describes a named graph
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphInfo {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_rev", default)]
    pub rev: String,
    #[serde(default)]
    pub edge_definitions: Vec<EdgeDefinition>,
    #[serde(default)]
    pub orphan_collections: Vec<String>,
}

/// Options for running an AQL query through `POST /cursor`
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub count: bool,
    pub batch_size: Option<u32>,
    /// Cursor time-to-live in seconds
    pub ttl: Option<u32>,
    pub bind_vars: Option<Map<String, Value>>,
    pub full_count: Option<bool>,
    pub max_plans: Option<u32>,
    pub optimizer_rules: Option<Vec<String>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    pub fn batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn bind_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind_vars
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn full_count(mut self, full_count: bool) -> Self {
        self.full_count = Some(full_count);
        self
    }

    pub fn max_plans(mut self, max_plans: u32) -> Self {
        self.max_plans = Some(max_plans);
        self
    }

    pub fn optimizer_rules(mut self, rules: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.optimizer_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    /// Request body for `POST /cursor`
    pub fn to_request<'a>(&'a self, query: &'a str) -> CursorRequest<'a> {
        let options = CursorRequestOptions {
            full_count: self.full_count,
            max_number_of_plans: self.max_plans,
            optimizer: self
                .optimizer_rules
                .as_ref()
                .map(|rules| OptimizerRules { rules: rules.as_slice() }),
        };
        CursorRequest {
            query,
            count: self.count,
            batch_size: self.batch_size,
            ttl: self.ttl,
            bind_vars: self.bind_vars.as_ref(),
            options: if options.is_empty() { None } else { Some(options) },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRequest<'a> {
    pub query: &'a str,
    pub count: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_vars: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<CursorRequestOptions<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRequestOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_count: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_plans: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerRules<'a>>,
}

impl CursorRequestOptions<'_> {
    fn is_empty(&self) -> bool {
        self.full_count.is_none() && self.max_number_of_plans.is_none() && self.optimizer.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct OptimizerRules<'a> {
    pub rules: &'a [String],
}

/// Options for `POST /explain`
#[derive(Debug, Clone, Default)]
pub struct ExplainOptions {
    pub all_plans: bool,
    pub max_plans: Option<u32>,
    pub optimizer_rules: Option<Vec<String>>,
}

impl ExplainOptions {
    pub fn to_request(&self, query: &str) -> Value {
        let mut options = Map::new();
        options.insert("allPlans".to_string(), Value::Bool(self.all_plans));
        if let Some(max_plans) = self.max_plans {
            options.insert("maxNumberOfPlans".to_string(), max_plans.into());
        }
        if let Some(rules) = &self.optimizer_rules {
            options.insert("optimizer".to_string(), serde_json::json!({ "rules": rules }));
        }
        serde_json::json!({ "query": query, "options": options })
    }
}

/// Index definitions accepted by `POST /index`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndexSpec {
    Hash {
        fields: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unique: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sparse: Option<bool>,
    },
    /// Sorted index used for range lookups
    Skiplist {
        fields: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unique: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sparse: Option<bool>,
    },
    /// Caps the number of documents (or their byte size) kept in a collection
    Cap {
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
        #[serde(rename = "byteSize", skip_serializing_if = "Option::is_none")]
        byte_size: Option<u64>,
    },
    Geo {
        fields: Vec<String>,
        #[serde(rename = "geoJson", skip_serializing_if = "Option::is_none")]
        geo_json: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unique: Option<bool>,
        #[serde(rename = "ignoreNull", skip_serializing_if = "Option::is_none")]
        ignore_null: Option<bool>,
    },
    Fulltext {
        fields: Vec<String>,
        #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
        min_length: Option<u32>,
    },
}

/// UserInfo is what the server reports about an account
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub change_password: Option<bool>,
    #[serde(default)]
    pub extra: Option<Value>,
}

/// One entry of `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub user: String,
    #[serde(flatten)]
    pub info: UserInfo,
}

/// Optional account attributes for create/update/replace
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_password: Option<bool>,
}

/// Options of a server-side JavaScript transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    pub read_collections: Option<Vec<String>>,
    pub write_collections: Option<Vec<String>>,
    pub params: Option<Value>,
    pub wait_for_sync: bool,
    /// Seconds to wait for collection locks; 0 waits forever
    pub lock_timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalStrategy {
    DepthFirst,
    BreadthFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    Preorder,
    Postorder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOrder {
    Forward,
    Backward,
}

/// Traversal parameters; the JavaScript hooks are passed through verbatim
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<TraversalStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<TraversalOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_order: Option<ItemOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniqueness: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expander: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// DocumentMeta is the handle the server returns after a write
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentMeta {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_rev")]
    pub rev: String,
    #[serde(rename = "_oldRev", default, skip_serializing_if = "Option::is_none")]
    pub old_rev: Option<String>,
}

/// ImportResult reports the outcome of `POST /import`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImportResult {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub errors: u64,
    #[serde(default)]
    pub empty: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub ignored: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoveByKeysResult {
    pub removed: u64,
    pub ignored: u64,
}

/// Index details keyed by the index handle without its collection prefix
pub type IndexMap = HashMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_status_codes() {
        assert_eq!(CollectionStatus::from(3), CollectionStatus::Loaded);
        assert_eq!(CollectionStatus::from(5), CollectionStatus::Deleted);
        assert_eq!(CollectionStatus::from(9), CollectionStatus::Corrupted(9));
        assert_eq!(CollectionStatus::from(9).to_string(), "corrupted (9)");
        assert_eq!(CollectionStatus::Unloading.to_string(), "unloading");
    }

    #[test]
    fn test_collection_properties_from_server() {
        let props: CollectionProperties = serde_json::from_value(json!({
            "id": "1234",
            "name": "edges",
            "type": 3,
            "status": 3,
            "doCompact": true,
            "isSystem": false,
            "isVolatile": false,
            "journalSize": 1048576,
            "waitForSync": true,
            "keyOptions": {"type": "autoincrement", "allowUserKeys": false, "increment": 5}
        }))
        .unwrap();

        assert!(props.is_edge());
        assert_eq!(props.status, CollectionStatus::Loaded);
        assert_eq!(props.journal_size, Some(1048576));
        assert_eq!(props.key_options.generator, KeyGenerator::Autoincrement);
        assert!(!props.key_options.allow_user_keys);
        assert_eq!(props.key_options.increment, Some(5));
    }

    #[test]
    fn test_collection_list_split() {
        let list: CollectionList = vec![
            CollectionSummary { name: "_users".into(), is_system: true },
            CollectionSummary { name: "people".into(), is_system: false },
            CollectionSummary { name: "places".into(), is_system: false },
        ]
        .into_iter()
        .collect();

        assert_eq!(list.user, vec!["people", "places"]);
        assert_eq!(list.system, vec!["_users"]);
        assert_eq!(list.all, vec!["people", "places", "_users"]);
    }

    #[test]
    fn test_create_collection_body() {
        let body = serde_json::to_value(CreateCollectionOptions::edge()).unwrap();
        assert_eq!(body["type"], 3);
        assert_eq!(body["doCompact"], true);
        assert_eq!(body["keyOptions"], json!({"type": "traditional", "allowUserKeys": true}));
        assert!(body.get("journalSize").is_none());
    }

    #[test]
    fn test_query_options_request_body() {
        let options = QueryOptions::new()
            .count(true)
            .batch_size(2)
            .bind_var("value", 1)
            .full_count(true)
            .optimizer_rules(["+all"]);

        let body = serde_json::to_value(options.to_request("FOR d IN c RETURN d")).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "FOR d IN c RETURN d",
                "count": true,
                "batchSize": 2,
                "bindVars": {"value": 1},
                "options": {"fullCount": true, "optimizer": {"rules": ["+all"]}}
            })
        );
    }

    #[test]
    fn test_query_options_omits_empty_options() {
        let options = QueryOptions::new();
        let body = serde_json::to_value(options.to_request("RETURN 1")).unwrap();
        assert_eq!(body, json!({"query": "RETURN 1", "count": false}));
    }

    #[test]
    fn test_explain_request() {
        let options = ExplainOptions {
            all_plans: true,
            max_plans: Some(3),
            optimizer_rules: Some(vec!["-all".into()]),
        };
        assert_eq!(
            options.to_request("RETURN 1"),
            json!({
                "query": "RETURN 1",
                "options": {"allPlans": true, "maxNumberOfPlans": 3, "optimizer": {"rules": ["-all"]}}
            })
        );
    }

    #[test]
    fn test_index_spec_serialization() {
        let hash = IndexSpec::Hash {
            fields: vec!["email".into()],
            unique: Some(true),
            sparse: None,
        };
        assert_eq!(
            serde_json::to_value(&hash).unwrap(),
            json!({"type": "hash", "fields": ["email"], "unique": true})
        );

        let cap = IndexSpec::Cap { size: None, byte_size: Some(20000) };
        assert_eq!(
            serde_json::to_value(&cap).unwrap(),
            json!({"type": "cap", "byteSize": 20000})
        );
    }

    #[test]
    fn test_traversal_options_serialization() {
        let options = TraversalOptions {
            direction: Some(Direction::Outbound),
            strategy: Some(TraversalStrategy::BreadthFirst),
            max_depth: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"direction": "outbound", "strategy": "breadthfirst", "maxDepth": 2})
        );
    }

    #[test]
    fn test_graph_info_from_server() {
        let info: GraphInfo = serde_json::from_value(json!({
            "_key": "social",
            "_id": "_graphs/social",
            "_rev": "123",
            "edgeDefinitions": [{"collection": "knows", "from": ["people"], "to": ["people"]}],
            "orphanCollections": ["lonely"]
        }))
        .unwrap();
        assert_eq!(info.key, "social");
        assert_eq!(info.edge_definitions[0], EdgeDefinition::new("knows", ["people"], ["people"]));
        assert_eq!(info.orphan_collections, vec!["lonely"]);
    }
}
