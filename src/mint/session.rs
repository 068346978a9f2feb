use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::mint::errors::MintError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintPhase {
    Idle,
    Building,
    Submitted,
    Polling,
    Confirmed,
    Failed,
}

impl MintPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            MintPhase::Building | MintPhase::Submitted | MintPhase::Polling
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MintPhase::Confirmed | MintPhase::Failed)
    }

    pub fn can_advance_to(&self, next: MintPhase) -> bool {
        use MintPhase::*;

        matches!(
            (self, next),
            (Idle | Confirmed | Failed, Building)
                | (Building, Submitted)
                | (Submitted, Polling)
                | (Polling, Confirmed)
                | (Building | Submitted | Polling, Failed)
        )
    }
}

/// Allows at most one mint attempt in flight per wallet session.
#[derive(Debug)]
pub struct MintSession {
    phase: Mutex<MintPhase>,
}

impl Default for MintSession {
    fn default() -> Self {
        MintSession {
            phase: Mutex::new(MintPhase::Idle),
        }
    }
}

impl MintSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MintPhase {
        *self.lock()
    }

    pub fn is_minting(&self) -> bool {
        self.phase().is_in_flight()
    }

    /// Starts an attempt, moving the session into `Building`.
    pub fn begin(&self) -> Result<MintAttempt<'_>, MintError> {
        let mut phase = self.lock();

        if phase.is_in_flight() {
            return Err(MintError::AlreadyInFlight(*phase));
        }

        debug!("Mint session {:?} -> {:?}", *phase, MintPhase::Building);
        *phase = MintPhase::Building;

        Ok(MintAttempt {
            session: self,
            finished: false,
        })
    }

    fn transition(&self, next: MintPhase) -> Result<(), MintError> {
        let mut phase = self.lock();

        if !phase.can_advance_to(next) {
            return Err(MintError::InvalidTransition {
                from: *phase,
                to: next,
            });
        }

        debug!("Mint session {:?} -> {:?}", *phase, next);
        *phase = next;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, MintPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An in-flight attempt. Dropping it unfinished marks the session `Failed`.
#[derive(Debug)]
pub struct MintAttempt<'a> {
    session: &'a MintSession,
    finished: bool,
}

impl<'a> MintAttempt<'a> {
    pub fn phase(&self) -> MintPhase {
        self.session.phase()
    }

    pub fn submitted(&mut self) -> Result<(), MintError> {
        self.session.transition(MintPhase::Submitted)
    }

    pub fn polling(&mut self) -> Result<(), MintError> {
        self.session.transition(MintPhase::Polling)
    }

    pub fn confirm(mut self) -> Result<(), MintError> {
        self.session.transition(MintPhase::Confirmed)?;
        self.finished = true;
        Ok(())
    }

    pub fn fail(mut self) {
        self.finished = true;
        self.force_failed();
    }

    fn force_failed(&self) {
        let mut phase = self.session.lock();
        if !phase.is_terminal() {
            debug!("Mint session {:?} -> {:?}", *phase, MintPhase::Failed);
            *phase = MintPhase::Failed;
        }
    }
}

impl<'a> Drop for MintAttempt<'a> {
    fn drop(&mut self) {
        if !self.finished {
            self.force_failed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_confirmed() {
        let session = MintSession::new();
        assert_eq!(session.phase(), MintPhase::Idle);

        let mut attempt = session.begin().unwrap();
        assert_eq!(attempt.phase(), MintPhase::Building);
        attempt.submitted().unwrap();
        attempt.polling().unwrap();
        assert!(session.is_minting());
        attempt.confirm().unwrap();

        assert_eq!(session.phase(), MintPhase::Confirmed);
        assert!(!session.is_minting());
    }

    #[test]
    fn second_attempt_is_rejected_while_in_flight() {
        let session = MintSession::new();
        let mut attempt = session.begin().unwrap();
        attempt.submitted().unwrap();

        match session.begin() {
            Err(MintError::AlreadyInFlight(phase)) => assert_eq!(phase, MintPhase::Submitted),
            other => panic!("unexpected result: {:?}", other),
        }

        attempt.fail();
        assert_eq!(session.phase(), MintPhase::Failed);
        assert!(session.begin().is_ok());
    }

    #[test]
    fn phases_cannot_be_skipped() {
        let session = MintSession::new();
        let attempt = session.begin().unwrap();

        assert!(matches!(
            attempt.confirm(),
            Err(MintError::InvalidTransition {
                from: MintPhase::Building,
                to: MintPhase::Confirmed
            })
        ));
        assert_eq!(session.phase(), MintPhase::Failed);
    }

    #[test]
    fn dropped_attempt_fails_the_session() {
        let session = MintSession::new();
        {
            let mut attempt = session.begin().unwrap();
            attempt.submitted().unwrap();
        }
        assert_eq!(session.phase(), MintPhase::Failed);
    }

    #[test]
    fn transition_table() {
        use MintPhase::*;

        assert!(Idle.can_advance_to(Building));
        assert!(Confirmed.can_advance_to(Building));
        assert!(Polling.can_advance_to(Failed));
        assert!(!Idle.can_advance_to(Polling));
        assert!(!Submitted.can_advance_to(Confirmed));
        assert!(!Confirmed.can_advance_to(Failed));
    }
}
