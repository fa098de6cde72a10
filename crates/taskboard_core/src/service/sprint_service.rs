//! Sprint chain use-case service.
//!
//! # Responsibility
//! - Keep both ends of a sprint link consistent above the repository layer.
//! - Provide append/link/unlink/chain operations over a project's sprints.
//!
//! # Invariants
//! - Linked sprints belong to the same project.
//! - After `link(a, b)`: `a.next == b`, `b.previous == a`, and neither keeps a
//!   stale back-link from a former neighbor.
//! - Chain walks never loop, even over inconsistent persisted links.

use crate::model::sprint::Sprint;
use crate::model::EntityId;
use crate::repo::crud::RepoError;
use crate::repo::sprint_repo::SprintRepository;
use log::info;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from sprint service operations.
#[derive(Debug)]
pub enum SprintServiceError {
    SprintNotFound(EntityId),
    /// Sprints of different projects cannot be chained.
    CrossProjectLink {
        previous_id: EntityId,
        next_id: EntityId,
    },
    /// A sprint cannot follow itself.
    SelfLink(EntityId),
    Repo(RepoError),
}

impl Display for SprintServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SprintNotFound(id) => write!(f, "sprint not found: {id}"),
            Self::CrossProjectLink {
                previous_id,
                next_id,
            } => write!(
                f,
                "sprints {previous_id} and {next_id} belong to different projects"
            ),
            Self::SelfLink(id) => write!(f, "sprint {id} cannot be linked to itself"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SprintServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SprintServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity: "sprint", id } => Self::SprintNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type SprintServiceResult<T> = Result<T, SprintServiceError>;

/// Sprint chain service facade.
pub struct SprintService<R: SprintRepository> {
    repo: R,
}

impl<R: SprintRepository> SprintService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a standalone sprint.
    pub fn create(&self, sprint: &mut Sprint) -> SprintServiceResult<EntityId> {
        Ok(self.repo.create(sprint)?)
    }

    pub fn find_by_id(&self, id: EntityId) -> SprintServiceResult<Option<Sprint>> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Makes `next_id` follow `previous_id`, updating both rows.
    ///
    /// Former neighbors that still point at either sprint are detached.
    pub fn link(&self, previous_id: EntityId, next_id: EntityId) -> SprintServiceResult<()> {
        if previous_id == next_id {
            return Err(SprintServiceError::SelfLink(previous_id));
        }

        let previous = self.require(previous_id)?;
        let next = self.require(next_id)?;
        if previous.project_id != next.project_id {
            return Err(SprintServiceError::CrossProjectLink {
                previous_id,
                next_id,
            });
        }

        if let Some(old_next) = previous.next_sprint_id.filter(|id| *id != next_id) {
            self.clear_previous_if(old_next, previous_id)?;
        }
        if let Some(old_previous) = next.previous_sprint_id.filter(|id| *id != previous_id) {
            self.clear_next_if(old_previous, next_id)?;
        }
        // Reversing an existing link: drop the old direction on both rows.
        if previous.previous_sprint_id == Some(next_id) {
            self.repo.update_previous_sprint(previous_id, None)?;
        }
        if next.next_sprint_id == Some(previous_id) {
            self.repo.update_next_sprint(next_id, None)?;
        }

        self.repo.update_next_sprint(previous_id, Some(next_id))?;
        self.repo.update_previous_sprint(next_id, Some(previous_id))?;

        info!(
            "event=sprint_link module=service status=ok previous_id={} next_id={}",
            previous_id, next_id
        );
        Ok(())
    }

    /// Detaches `sprint_id` from its successor on both ends.
    pub fn unlink(&self, sprint_id: EntityId) -> SprintServiceResult<()> {
        let sprint = self.require(sprint_id)?;
        let Some(next_id) = sprint.next_sprint_id else {
            return Ok(());
        };

        self.repo.update_next_sprint(sprint_id, None)?;
        self.clear_previous_if(next_id, sprint_id)?;

        info!(
            "event=sprint_unlink module=service status=ok sprint_id={} next_id={}",
            sprint_id, next_id
        );
        Ok(())
    }

    /// Creates `sprint` as the new tail of its project's chain.
    pub fn append(&self, sprint: &mut Sprint) -> SprintServiceResult<EntityId> {
        let tail = self.chain(sprint.project_id)?.pop();

        sprint.previous_sprint_id = tail.as_ref().and_then(|tail| tail.id);
        sprint.next_sprint_id = None;
        let id = self.repo.create(sprint)?;

        if let Some(tail_id) = sprint.previous_sprint_id {
            self.repo.update_next_sprint(tail_id, Some(id))?;
        }
        Ok(id)
    }

    /// Returns the project's sprints in chain order.
    ///
    /// The walk starts at the lowest-id sprint without a predecessor and
    /// follows `next_sprint_id` within the project. Sprints not reachable from
    /// that head are omitted.
    pub fn chain(&self, project_id: EntityId) -> SprintServiceResult<Vec<Sprint>> {
        let sprints = self.repo.find_by_project_id(project_id)?;
        let Some(head_id) = sprints
            .iter()
            .find(|sprint| sprint.is_head())
            .or_else(|| sprints.first())
            .and_then(|sprint| sprint.id)
        else {
            return Ok(Vec::new());
        };

        let mut by_id: HashMap<EntityId, Sprint> = sprints
            .into_iter()
            .filter_map(|sprint| sprint.id.map(|id| (id, sprint)))
            .collect();
        let mut visited = HashSet::new();
        let mut ordered = Vec::new();
        let mut cursor = Some(head_id);

        while let Some(id) = cursor {
            if !visited.insert(id) {
                break;
            }
            let Some(sprint) = by_id.remove(&id) else {
                break;
            };
            cursor = sprint.next_sprint_id;
            ordered.push(sprint);
        }

        Ok(ordered)
    }

    fn require(&self, id: EntityId) -> SprintServiceResult<Sprint> {
        self.repo
            .find_by_id(id)?
            .ok_or(SprintServiceError::SprintNotFound(id))
    }

    fn clear_previous_if(&self, sprint_id: EntityId, expected: EntityId) -> SprintServiceResult<()> {
        if let Some(sprint) = self.repo.find_by_id(sprint_id)? {
            if sprint.previous_sprint_id == Some(expected) {
                self.repo.update_previous_sprint(sprint_id, None)?;
            }
        }
        Ok(())
    }

    fn clear_next_if(&self, sprint_id: EntityId, expected: EntityId) -> SprintServiceResult<()> {
        if let Some(sprint) = self.repo.find_by_id(sprint_id)? {
            if sprint.next_sprint_id == Some(expected) {
                self.repo.update_next_sprint(sprint_id, None)?;
            }
        }
        Ok(())
    }
}
