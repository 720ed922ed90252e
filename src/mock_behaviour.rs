//! This module provides ways to tweak the mocked server, so that it can return errors on some tests

use crate::error::{Action, TaskError, TaskResult};

/// This stores some behaviour tweaks, that describe how a mocked server will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    pub list_tasks_behaviour: (u32, u32),
    pub create_task_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),
    pub login_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            list_tasks_behaviour: (0, n_fails),
            create_task_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
            login_behaviour: (0, n_fails),
        }
    }

    pub fn can_list_tasks(&mut self) -> TaskResult<()> {
        decrement(&mut self.list_tasks_behaviour, Action::Load)
    }
    pub fn can_create_task(&mut self) -> TaskResult<()> {
        decrement(&mut self.create_task_behaviour, Action::Create)
    }
    pub fn can_update_task(&mut self) -> TaskResult<()> {
        decrement(&mut self.update_task_behaviour, Action::Update)
    }
    pub fn can_delete_task(&mut self) -> TaskResult<()> {
        decrement(&mut self.delete_task_behaviour, Action::Delete)
    }
    pub fn can_login(&mut self, action: Action) -> TaskResult<()> {
        decrement(&mut self.login_behaviour, action)
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), action: Action) -> TaskResult<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", action, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", action, value);
        Err(TaskError::network(action, format!("Mocked behaviour requires this request to fail this time. ({:?})", value)))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", action, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_list_tasks().is_ok());
        assert!(ok.can_list_tasks().is_ok());
        assert!(ok.can_update_task().is_ok());
        assert!(ok.can_delete_task().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list_tasks().is_err());
        assert!(now.can_create_task().is_err());
        assert!(now.can_create_task().is_err());
        assert!(now.can_list_tasks().is_err());
        assert!(now.can_list_tasks().is_ok());
        assert!(now.can_list_tasks().is_ok());
        assert!(now.can_create_task().is_ok());

        let mut custom = MockBehaviour{
            list_tasks_behaviour: (0,1),
            update_task_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_list_tasks().is_err());
        assert!(custom.can_list_tasks().is_ok());
        assert!(custom.can_list_tasks().is_ok());
        assert!(custom.can_update_task().is_ok());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_err());
        assert!(custom.can_update_task().is_ok());
    }
}
