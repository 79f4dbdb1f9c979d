//! Script functions called back from native code.
//!
//! A [`ScriptTransform`] wraps the function pointer a script passed to
//! `scan` together with the context of the native call that received it. It
//! borrows that context, so it cannot outlive the call.

use crate::marshal::{dynamic_to_text, raise};
use nuv_host::{HostError, HostResult};
use rhai::{Dynamic, EvalAltResult, FnPtr, NativeCallContext, Position};
use tracing::debug;

/// Script-supplied per-directory transform.
pub struct ScriptTransform<'c, 'n> {
    ctx: &'c NativeCallContext<'n>,
    fn_ptr: FnPtr,
    failure: Option<Box<EvalAltResult>>,
}

impl<'c, 'n> ScriptTransform<'c, 'n> {
    /// Wrap `fn_ptr` for calls made while `ctx` is live.
    pub fn new(ctx: &'c NativeCallContext<'n>, fn_ptr: FnPtr) -> Self {
        Self {
            ctx,
            fn_ptr,
            failure: None,
        }
    }

    /// Call the script function with `path` and return its result as text.
    ///
    /// Runs synchronously on the caller's thread. A script error is kept so
    /// that [`ScriptTransform::into_error`] can report it.
    pub fn call(&mut self, path: &str) -> HostResult<String> {
        match self
            .fn_ptr
            .call_within_context::<Dynamic>(self.ctx, (path.to_string(),))
        {
            Ok(value) => Ok(dynamic_to_text(value)),
            Err(err) => {
                debug!("Transform {} failed on {}: {}", self.fn_ptr.fn_name(), path, err);
                let message = err.to_string();
                self.failure = Some(err);
                Err(HostError::Callback(message))
            }
        }
    }

    /// Build the error thrown back to the script for a failed scan.
    ///
    /// Errors a script cannot catch (termination, resource limits) raised
    /// inside the transform are passed through unchanged.
    pub fn into_error(self, err: HostError, pos: Position) -> Box<EvalAltResult> {
        match self.failure {
            Some(original) if !original.is_catchable() => original,
            _ => raise(err, pos),
        }
    }
}
