// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::CoreResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteCommand<Id> {
    RequestDelete(Id),
    ConfirmDelete,
    CancelDelete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState<Id> {
    Idle,
    PendingConfirmation(Id),
    InFlight(Id),
    Done(CoreResult<Id>),
}

/// Confirm-before-delete interaction:
///
/// ```text
/// Idle --RequestDelete(id)--> PendingConfirmation(id)
/// PendingConfirmation --CancelDelete--> Idle
/// PendingConfirmation --ConfirmDelete--> InFlight --complete--> Done
/// Done --RequestDelete(id)--> PendingConfirmation(id)
/// ```
///
/// Any other command leaves the state as it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFlow<Id> {
    state: DeleteState<Id>,
}

impl<Id> Default for DeleteFlow<Id> {
    fn default() -> Self {
        Self {
            state: DeleteState::Idle,
        }
    }
}

impl<Id: Clone + std::fmt::Debug> DeleteFlow<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState<Id> {
        &self.state
    }

    /// Applies a command. Returns the id to delete when the command moved the
    /// flow into `InFlight`; the caller then reports back via [`complete`].
    ///
    /// [`complete`]: DeleteFlow::complete
    pub fn apply(&mut self, command: DeleteCommand<Id>) -> Option<Id> {
        let next = match (&self.state, command) {
            (DeleteState::Idle | DeleteState::Done(_), DeleteCommand::RequestDelete(id)) => {
                DeleteState::PendingConfirmation(id)
            }
            (DeleteState::PendingConfirmation(_), DeleteCommand::CancelDelete) => DeleteState::Idle,
            (DeleteState::PendingConfirmation(id), DeleteCommand::ConfirmDelete) => {
                let id = id.clone();
                self.state = DeleteState::InFlight(id.clone());
                return Some(id);
            }
            (state, command) => {
                tracing::debug!(?state, ?command, "delete command ignored");
                return None;
            }
        };
        self.state = next;
        None
    }

    /// Records the outcome of the in-flight delete. Ignored in any other state.
    pub fn complete(&mut self, result: CoreResult<()>) {
        if let DeleteState::InFlight(id) = &self.state {
            let id = id.clone();
            self.state = DeleteState::Done(result.map(|()| id));
        }
    }

    /// Confirms and runs `perform` against the pending id in one step.
    pub fn confirm_with<F>(&mut self, perform: F) -> &DeleteState<Id>
    where
        F: FnOnce(&Id) -> CoreResult<()>,
    {
        if let Some(id) = self.apply(DeleteCommand::ConfirmDelete) {
            let result = perform(&id);
            self.complete(result);
        }
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = DeleteState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;

    #[test]
    fn request_then_cancel_returns_to_idle() {
        let mut flow = DeleteFlow::new();
        flow.apply(DeleteCommand::RequestDelete("c1"));
        assert_eq!(flow.state(), &DeleteState::PendingConfirmation("c1"));
        flow.apply(DeleteCommand::CancelDelete);
        assert_eq!(flow.state(), &DeleteState::Idle);
    }

    #[test]
    fn confirm_without_request_is_ignored() {
        let mut flow: DeleteFlow<&str> = DeleteFlow::new();
        assert_eq!(flow.apply(DeleteCommand::ConfirmDelete), None);
        assert_eq!(flow.state(), &DeleteState::Idle);
    }

    #[test]
    fn confirm_goes_in_flight_and_records_outcome() {
        let mut flow = DeleteFlow::new();
        flow.apply(DeleteCommand::RequestDelete("c1"));
        assert_eq!(flow.apply(DeleteCommand::ConfirmDelete), Some("c1"));
        assert_eq!(flow.state(), &DeleteState::InFlight("c1"));
        // No second request while one is in flight
        flow.apply(DeleteCommand::RequestDelete("c2"));
        assert_eq!(flow.state(), &DeleteState::InFlight("c1"));
        flow.complete(Ok(()));
        assert_eq!(flow.state(), &DeleteState::Done(Ok("c1")));
    }

    #[test]
    fn conflict_is_kept_in_done_state() {
        let mut flow = DeleteFlow::new();
        flow.apply(DeleteCommand::RequestDelete("c1".to_string()));
        let state = flow.confirm_with(|_| Err(CoreError::Conflict("in use".into())));
        assert!(matches!(state, DeleteState::Done(Err(CoreError::Conflict(_)))));

        flow.apply(DeleteCommand::RequestDelete("c2".to_string()));
        assert_eq!(
            flow.state(),
            &DeleteState::PendingConfirmation("c2".to_string())
        );
    }
}
