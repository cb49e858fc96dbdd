//! `kong_consumer_jwt_credential`: JWT credentials nested under a consumer.

use super::{null_as_empty, Owner, Resource};
use crate::schema::{FieldSchema, ResourceSchema, REDACTED};
use crate::state::ResourceData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature algorithms accepted by the jwt plugin.
pub const ALGORITHMS: &[&str] = &["HS256", "RS256"];

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtCredential {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub algorithm: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub rsa_public_key: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub secret: String,
    /// Owning consumer; part of the path, never the body.
    #[serde(skip)]
    pub consumer: String,
}

impl fmt::Debug for JwtCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCredential")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("algorithm", &self.algorithm)
            .field("rsa_public_key", &self.rsa_public_key)
            .field("secret", &if self.secret.is_empty() { "" } else { REDACTED })
            .field("consumer", &self.consumer)
            .finish()
    }
}

pub struct JwtCredentialResource;

impl Resource for JwtCredentialResource {
    type Record = JwtCredential;

    const KIND: &'static str = "jwt credential";
    const TYPE_NAME: &'static str = "kong_consumer_jwt_credential";
    const COLLECTION: &'static str = "consumers/";
    const OWNER: Option<Owner> = Some(Owner {
        field: "consumer",
        collection: "jwt/",
    });

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            Self::TYPE_NAME,
            vec![
                FieldSchema::string("key")
                    .computed()
                    .describe("A unique string identifying the credential. If left out, it will be auto-generated."),
                FieldSchema::string("algorithm")
                    .allowed(ALGORITHMS)
                    .describe("The algorithm used to verify the token's signature. Can be HS256 or RS256."),
                FieldSchema::string("rsa_public_key").describe(
                    "If algorithm is RS256, the public key (in PEM format) to use to verify the token's signature.",
                ),
                FieldSchema::string("secret").sensitive().computed().describe(
                    "If algorithm is HS256, the secret used to sign JWTs for this credential. If left out, will be auto-generated.",
                ),
                FieldSchema::string("consumer")
                    .required()
                    .force_new()
                    .describe("Id of the consumer that owns this credential."),
            ],
        )
    }

    fn to_record(state: &ResourceData) -> JwtCredential {
        JwtCredential {
            id: state.id().to_string(),
            key: state.get_str("key").to_string(),
            algorithm: state.get_str("algorithm").to_string(),
            rsa_public_key: state.get_str("rsa_public_key").to_string(),
            secret: state.get_str("secret").to_string(),
            consumer: state.get_str("consumer").to_string(),
        }
    }

    fn apply_record(record: JwtCredential, state: &mut ResourceData) {
        state.set("key", record.key);
        state.set("algorithm", record.algorithm);
        state.set("rsa_public_key", record.rsa_public_key);
        state.set("secret", record.secret);
    }

    fn record_id(record: &JwtCredential) -> &str {
        &record.id
    }

    fn owner(record: &JwtCredential) -> &str {
        &record.consumer
    }
}
