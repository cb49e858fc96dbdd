//! `kong_consumer_basic_auth_credential`: username/password pairs nested under a consumer.

use super::{null_as_empty, Owner, Resource};
use crate::schema::{FieldSchema, ResourceSchema, REDACTED};
use crate::state::ResourceData;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuthCredential {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip)]
    pub consumer: String,
}

impl fmt::Debug for BasicAuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthCredential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { REDACTED })
            .field("consumer", &self.consumer)
            .finish()
    }
}

pub struct BasicAuthCredentialResource;

impl Resource for BasicAuthCredentialResource {
    type Record = BasicAuthCredential;

    const KIND: &'static str = "basic-auth credential";
    const TYPE_NAME: &'static str = "kong_consumer_basic_auth_credential";
    const COLLECTION: &'static str = "consumers/";
    const OWNER: Option<Owner> = Some(Owner {
        field: "consumer",
        collection: "basic-auth/",
    });

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            Self::TYPE_NAME,
            vec![
                FieldSchema::string("username").describe("The username to use in the Basic Authentication."),
                FieldSchema::string("password")
                    .sensitive()
                    .describe("The password to use in the Basic Authentication."),
                FieldSchema::string("consumer")
                    .required()
                    .force_new()
                    .describe("Id of the consumer that owns this credential."),
            ],
        )
    }

    fn to_record(state: &ResourceData) -> BasicAuthCredential {
        BasicAuthCredential {
            id: state.id().to_string(),
            username: state.get_str("username").to_string(),
            password: state.get_str("password").to_string(),
            consumer: state.get_str("consumer").to_string(),
        }
    }

    fn apply_record(record: BasicAuthCredential, state: &mut ResourceData) {
        state.set("username", record.username);
        // Kong answers with a salted hash; keep the caller's plaintext once it is known.
        if state.get_str("password").is_empty() {
            state.set("password", record.password);
        }
    }

    fn record_id(record: &BasicAuthCredential) -> &str {
        &record.id
    }

    fn owner(record: &BasicAuthCredential) -> &str {
        &record.consumer
    }
}
