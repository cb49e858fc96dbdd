//! `kong_consumer`: top-level consumers collection.

use super::{null_as_empty, Resource};
use crate::schema::{FieldSchema, ResourceSchema};
use crate::state::ResourceData;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub custom_id: String,
}

pub struct ConsumerResource;

impl Resource for ConsumerResource {
    type Record = Consumer;

    const KIND: &'static str = "consumer";
    const TYPE_NAME: &'static str = "kong_consumer";
    const COLLECTION: &'static str = "consumers/";

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            Self::TYPE_NAME,
            vec![
                FieldSchema::string("username").describe(
                    "The username of the consumer. You must send either this field or custom_id with the request.",
                ),
                FieldSchema::string("custom_id").describe(
                    "Field for storing an existing ID for the consumer, useful for mapping Kong with users in your existing database. You must send either this field or username with the request.",
                ),
            ],
        )
    }

    fn to_record(state: &ResourceData) -> Consumer {
        Consumer {
            id: state.id().to_string(),
            username: state.get_str("username").to_string(),
            custom_id: state.get_str("custom_id").to_string(),
        }
    }

    fn apply_record(record: Consumer, state: &mut ResourceData) {
        state.set("username", record.username);
        state.set("custom_id", record.custom_id);
    }

    fn record_id(record: &Consumer) -> &str {
        &record.id
    }
}
