//! `kong_consumer_key_auth_credential`: API keys nested under a consumer.

use super::{null_as_empty, Owner, Resource};
use crate::schema::{FieldSchema, ResourceSchema, REDACTED};
use crate::state::ResourceData;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAuthCredential {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip)]
    pub consumer: String,
}

impl fmt::Debug for KeyAuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAuthCredential")
            .field("id", &self.id)
            .field("key", &if self.key.is_empty() { "" } else { REDACTED })
            .field("consumer", &self.consumer)
            .finish()
    }
}

pub struct KeyAuthCredentialResource;

impl Resource for KeyAuthCredentialResource {
    type Record = KeyAuthCredential;

    const KIND: &'static str = "key-auth credential";
    const TYPE_NAME: &'static str = "kong_consumer_key_auth_credential";
    const COLLECTION: &'static str = "consumers/";
    const OWNER: Option<Owner> = Some(Owner {
        field: "consumer",
        collection: "key-auth/",
    });

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            Self::TYPE_NAME,
            vec![
                FieldSchema::string("key")
                    .sensitive()
                    .computed()
                    .describe("The API key. If left out, it will be auto-generated."),
                FieldSchema::string("consumer")
                    .required()
                    .force_new()
                    .describe("Id of the consumer that owns this credential."),
            ],
        )
    }

    fn to_record(state: &ResourceData) -> KeyAuthCredential {
        KeyAuthCredential {
            id: state.id().to_string(),
            key: state.get_str("key").to_string(),
            consumer: state.get_str("consumer").to_string(),
        }
    }

    fn apply_record(record: KeyAuthCredential, state: &mut ResourceData) {
        state.set("key", record.key);
    }

    fn record_id(record: &KeyAuthCredential) -> &str {
        &record.id
    }

    fn owner(record: &KeyAuthCredential) -> &str {
        &record.consumer
    }
}
