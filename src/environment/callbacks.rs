/*!
General callbacks associated with an environment.

# Callback types

Callbacks may be mutable functions.
Still, information passed from the environment is non-mutable.
*/

use super::GenericEnvironment;
use crate::oracle::Oracle;

/// A predicate polled during a solve, which ends the solve if true.
///
/// A time limit is a predicate which captures a deadline, and a time limit may also be configured via `time_limit`.
pub type CallbackTerminate = dyn FnMut() -> bool;

impl<O: Oracle> GenericEnvironment<O> {
    pub fn set_callback_terminate(&mut self, callback: Box<CallbackTerminate>) {
        self.callback_terminate = Some(callback);
    }

    pub fn clear_callback_terminate(&mut self) {
        self.callback_terminate = None;
    }

    pub fn check_callback_terminate(&mut self) -> bool {
        if let Some(callback) = &mut self.callback_terminate {
            callback()
        } else {
            false
        }
    }
}
