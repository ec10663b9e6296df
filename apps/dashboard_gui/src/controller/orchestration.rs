//! Command orchestration helpers from UI actions to backend command queue.

use client_core::EditorError;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::DashboardState;

/// Queues `cmd` for the backend worker. On failure the command is handed
/// back so its bookkeeping can be rolled back.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), BackendCommand> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "UI command queue is full; please retry".to_string();
            Err(cmd)
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the dashboard"
                    .to_string();
            Err(cmd)
        }
    }
}

/// Sends a prepared request, or reports why it could not be prepared.
pub fn submit(
    state: &mut DashboardState,
    cmd_tx: &Sender<BackendCommand>,
    request: Result<BackendCommand, EditorError>,
) {
    let cmd = match request {
        Ok(cmd) => cmd,
        Err(err) => {
            tracing::debug!("ignored dashboard action: {err}");
            state.status = err.to_string();
            return;
        }
    };
    if let Err(cmd) = dispatch_backend_command(cmd_tx, cmd, &mut state.status) {
        state.command_not_sent(&cmd);
    }
}
