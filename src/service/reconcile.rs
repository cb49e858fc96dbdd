//! Generic Create/Read/Update/Delete/Import against the Admin API.

use crate::error::{ReconcileError, TransportError};
use crate::resource::{Operation, Resource};
use crate::response::{classify, StatusClass};
use crate::service::plan::{self, Action, Plan};
use crate::service::StateValidator;
use crate::state::ResourceData;
use crate::transport::{ApiPath, ApiRequest, ApiResponse, Transport};
use serde_json::Value;
use std::marker::PhantomData;

/// Lifecycle operations for entity kind `R`. Holds no state: every call gets the
/// declarative state by reference and the shared transport explicitly. On failure the
/// caller's state is untouched; on success a new state is returned.
pub struct Reconciler<R>(PhantomData<fn() -> R>);

impl<R: Resource> Reconciler<R> {
    /// Create the entity. Success is exactly 201; 409 means it already exists remotely and
    /// must be imported instead.
    pub async fn create<T>(transport: &T, state: &ResourceData) -> Result<ResourceData, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        if state.is_present() {
            return Err(ReconcileError::AlreadyRealized {
                kind: R::KIND,
                id: state.id().to_string(),
            });
        }
        StateValidator::validate(state, &R::schema())?;
        let record = R::to_record(state);
        let owner = Self::owner(&record)?;
        let body = Self::encode(Operation::Create, &record)?;
        let path = Self::path(Operation::Create, "", owner)?;
        let resp = Self::send(Operation::Create, transport, ApiRequest::post(path).with_body(body)).await?;

        match classify(Operation::Create, resp.status) {
            StatusClass::Success => {
                let created: R::Record = Self::decode(Operation::Create, &resp)?;
                if R::record_id(&created).is_empty() {
                    return Err(ReconcileError::Transport {
                        operation: Operation::Create,
                        kind: R::KIND,
                        source: TransportError::MissingIdentity {
                            status: resp.status.as_u16(),
                        },
                    });
                }
                let mut out = state.clone();
                Self::write_back(created, &mut out);
                tracing::info!(kind = R::KIND, id = %out.id(), "created");
                Ok(out)
            }
            StatusClass::Conflict => Err(ReconcileError::Conflict {
                kind: R::KIND,
                body: resp.error_record(),
            }),
            _ => Err(Self::remote(&resp)),
        }
    }

    /// Refresh state from the remote entity. A 404 is not an error: the returned state has
    /// its identity cleared, marking the entity for re-creation.
    pub async fn read<T>(transport: &T, state: &ResourceData) -> Result<ResourceData, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        Self::read_as(Operation::Read, transport, state).await
    }

    /// Send the complete current field set. Empty fields are omitted from the body, and the
    /// Admin API keeps its value for omitted fields, so an emptied field is not cleared remotely.
    pub async fn update<T>(transport: &T, state: &ResourceData) -> Result<ResourceData, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        Self::require_present(Operation::Update, state)?;
        StateValidator::validate(state, &R::schema())?;
        let record = R::to_record(state);
        let owner = Self::owner(&record)?;
        let body = Self::encode(Operation::Update, &record)?;
        let path = Self::path(Operation::Update, state.id(), owner)?;
        let resp = Self::send(Operation::Update, transport, ApiRequest::patch(path).with_body(body)).await?;

        match classify(Operation::Update, resp.status) {
            StatusClass::Success => {
                let updated: R::Record = Self::decode(Operation::Update, &resp)?;
                let mut out = state.clone();
                Self::write_back(updated, &mut out);
                Ok(out)
            }
            _ => Err(Self::remote(&resp)),
        }
    }

    /// Delete the remote entity. Success is exactly 204. The state is not modified; the
    /// caller drops it.
    pub async fn delete<T>(transport: &T, state: &ResourceData) -> Result<(), ReconcileError>
    where
        T: Transport + ?Sized,
    {
        Self::require_present(Operation::Delete, state)?;
        let record = R::to_record(state);
        let owner = Self::owner(&record)?;
        let path = Self::path(Operation::Delete, state.id(), owner)?;
        let resp = Self::send(Operation::Delete, transport, ApiRequest::delete(path)).await?;

        match classify(Operation::Delete, resp.status) {
            StatusClass::Success => {
                tracing::info!(kind = R::KIND, id = %state.id(), "deleted");
                Ok(())
            }
            _ => Err(Self::remote(&resp)),
        }
    }

    /// Bring an existing remote entity under management. Nested kinds take
    /// `<owner>/<id>`; the owner is set before the hydrating read.
    pub async fn import<T>(transport: &T, external_id: &str) -> Result<ResourceData, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        let (owner, id) = R::split_import_id(external_id)?;
        let mut state = ResourceData::with_id(id);
        if let (Some(nested), Some(owner)) = (R::OWNER, owner) {
            state.set(nested.field, owner);
        }
        let hydrated = Self::read_as(Operation::Import, transport, &state).await?;
        if !hydrated.is_present() {
            return Err(ReconcileError::ImportTargetMissing {
                kind: R::KIND,
                id: external_id.to_string(),
            });
        }
        Ok(hydrated)
    }

    /// Diff `prior` against `desired` using this kind's schema.
    pub fn plan(prior: Option<&ResourceData>, desired: Option<&ResourceData>) -> Plan {
        plan::plan(&R::schema(), prior, desired)
    }

    /// Execute a plan. Returns the new state, or None once the entity is deleted.
    /// A failed Replace after its delete succeeded leaves nothing remote; the caller should
    /// treat the prior state as gone.
    pub async fn apply<T>(transport: &T, plan: &Plan) -> Result<Option<ResourceData>, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        tracing::debug!(kind = R::KIND, action = ?plan.action, "apply");
        match (plan.action, &plan.prior, &plan.target) {
            (Action::Noop, prior, _) => Ok(prior.clone()),
            (Action::Create, _, Some(target)) => Self::create(transport, target).await.map(Some),
            (Action::Update, _, Some(target)) => Self::update(transport, target).await.map(Some),
            (Action::Replace, Some(prior), Some(target)) => {
                Self::delete(transport, prior).await?;
                Self::create(transport, target).await.map(Some)
            }
            (Action::Delete, Some(prior), _) => {
                Self::delete(transport, prior).await?;
                Ok(None)
            }
            (action, _, _) => Err(ReconcileError::Validation(format!(
                "{}: inconsistent plan for {:?}",
                R::TYPE_NAME,
                action
            ))),
        }
    }

    async fn read_as<T>(operation: Operation, transport: &T, state: &ResourceData) -> Result<ResourceData, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        Self::require_present(operation, state)?;
        let record = R::to_record(state);
        let owner = Self::owner(&record)?;
        let path = Self::path(operation, state.id(), owner)?;
        let resp = Self::send(operation, transport, ApiRequest::get(path)).await?;

        match classify(operation, resp.status) {
            StatusClass::Success => {
                let fetched: R::Record = Self::decode(operation, &resp)?;
                let mut out = state.clone();
                Self::write_back(fetched, &mut out);
                Ok(out)
            }
            StatusClass::Absent => {
                tracing::warn!(kind = R::KIND, id = %state.id(), "not found remotely, clearing identity");
                let mut out = state.clone();
                out.clear_id();
                Ok(out)
            }
            _ => Err(Self::remote(&resp)),
        }
    }

    fn write_back(record: R::Record, state: &mut ResourceData) {
        let id = R::record_id(&record).to_string();
        R::apply_record(record, state);
        if !id.is_empty() {
            state.set_id(id);
        }
    }

    fn require_present(operation: Operation, state: &ResourceData) -> Result<(), ReconcileError> {
        if state.is_present() {
            Ok(())
        } else {
            Err(ReconcileError::MissingIdentity {
                operation,
                kind: R::KIND,
            })
        }
    }

    fn owner(record: &R::Record) -> Result<&str, ReconcileError> {
        match R::OWNER {
            Some(nested) if R::owner(record).is_empty() => Err(ReconcileError::MissingOwner {
                kind: R::KIND,
                field: nested.field,
            }),
            _ => Ok(R::owner(record)),
        }
    }

    fn path(operation: Operation, id: &str, owner: &str) -> Result<ApiPath, ReconcileError> {
        R::path_for(operation, id, owner).map_err(|source| ReconcileError::Transport {
            operation,
            kind: R::KIND,
            source,
        })
    }

    fn encode(operation: Operation, record: &R::Record) -> Result<Value, ReconcileError> {
        serde_json::to_value(record).map_err(|e| ReconcileError::Transport {
            operation,
            kind: R::KIND,
            source: TransportError::Encode(e),
        })
    }

    fn decode(operation: Operation, resp: &ApiResponse) -> Result<R::Record, ReconcileError> {
        resp.json().map_err(|source| ReconcileError::Transport {
            operation,
            kind: R::KIND,
            source,
        })
    }

    async fn send<T>(operation: Operation, transport: &T, request: ApiRequest) -> Result<ApiResponse, ReconcileError>
    where
        T: Transport + ?Sized,
    {
        tracing::debug!(kind = R::KIND, operation = operation.as_str(), method = %request.method, path = %request.path, "send");
        transport
            .execute(request)
            .await
            .map_err(|source| ReconcileError::Transport {
                operation,
                kind: R::KIND,
                source,
            })
    }

    fn remote(resp: &ApiResponse) -> ReconcileError {
        let body = resp.error_record();
        tracing::debug!(kind = R::KIND, status = resp.status.as_u16(), message = %body.message(), "unexpected status");
        ReconcileError::Remote {
            kind: R::KIND,
            status: resp.status.as_u16(),
            body,
        }
    }
}
