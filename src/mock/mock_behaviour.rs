//! This module provides ways to tweak a mocked Keep service, so that it can return errors on some tests

use crate::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub login_behaviour: (u32, u32),
    pub resume_behaviour: (u32, u32),
    pub sync_behaviour: (u32, u32),
    pub create_list_behaviour: (u32, u32),

    /// How long every sync takes
    pub sync_delay: Option<std::time::Duration>,
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            login_behaviour: (0, n_fails),
            resume_behaviour: (0, n_fails),
            sync_behaviour: (0, n_fails),
            create_list_behaviour: (0, n_fails),
            sync_delay: None,
        }
    }

    /// Every sync will take `delay`
    pub fn slow_sync(delay: std::time::Duration) -> Self {
        Self {
            sync_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_login(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.login_behaviour, "login")
    }
    pub fn can_resume(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.resume_behaviour, "resume")
    }
    pub fn can_sync(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.sync_behaviour, "sync")
    }
    pub fn can_create_list(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_list_behaviour, "create_list")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Error> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(Error::Network(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_sync().is_ok());
        assert!(ok.can_sync().is_ok());
        assert!(ok.can_login().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_sync().is_err());
        assert!(now.can_create_list().is_err());
        assert!(now.can_create_list().is_err());
        assert!(now.can_sync().is_err());
        assert!(now.can_sync().is_ok());
        assert!(now.can_sync().is_ok());
        assert!(now.can_create_list().is_ok());

        let mut custom = MockBehaviour{
            sync_behaviour: (0,1),
            login_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_sync().is_err());
        assert!(custom.can_sync().is_ok());
        assert!(custom.can_sync().is_ok());
        assert!(custom.can_login().is_ok());
        assert!(custom.can_login().is_err());
        assert!(custom.can_login().is_err());
        assert!(custom.can_login().is_err());
        assert!(custom.can_login().is_ok());

        let mut suspended = MockBehaviour::fail_now(1);
        suspended.suspend();
        assert!(suspended.can_resume().is_ok());
        suspended.resume();
        assert!(suspended.can_resume().is_err());
    }
}
