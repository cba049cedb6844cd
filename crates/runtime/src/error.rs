//! Errors surfaced by the simulation driver.
use skill_core::{AllocationError, EntityId, GroupError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("entity {0} is already registered")]
    DuplicateEntity(EntityId),

    #[error("entity {0} already has a caster")]
    DuplicateCaster(EntityId),

    #[error("skill group '{0}' is not in the catalog")]
    UnknownGroup(String),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}
