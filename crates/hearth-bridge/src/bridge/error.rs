use std::io;
use std::time::Duration;

use thiserror::Error;

use super::event::{EventKind, Phase};
use crate::engine::{EngineCall, EngineError};

/// Errors reported by [`Bridge::handle`](super::Bridge::handle).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The event is not valid in the current phase. Nothing changed.
    #[error("{event} is not allowed while {phase}")]
    ProtocolViolation { event: EventKind, phase: Phase },

    /// An engine call failed. The lifecycle transition still completed.
    #[error("engine {call} failed")]
    EngineCallFailed {
        call: EngineCall,
        #[source]
        source: EngineError,
    },

    /// The render thread did not exit within the configured bound. The bridge
    /// stays in `Stopping`; deliver surface-gone again to keep waiting.
    #[error("render thread did not exit within {timeout:?}")]
    TeardownTimeout { timeout: Duration },

    /// The render thread could not be started. Engine state was torn down.
    #[error("failed to spawn render thread")]
    ThreadSpawn(#[source] io::Error),

    /// The engine was lost with a render thread that died outside the step
    /// loop. No further surfaces can be served.
    #[error("engine is no longer available")]
    EngineUnavailable,
}

impl BridgeError {
    pub(crate) fn engine(call: EngineCall, source: EngineError) -> Self {
        Self::EngineCallFailed { call, source }
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }

    /// The failing engine call, if this is an engine failure.
    pub fn engine_call(&self) -> Option<EngineCall> {
        match self {
            Self::EngineCallFailed { call, .. } => Some(*call),
            _ => None,
        }
    }
}
